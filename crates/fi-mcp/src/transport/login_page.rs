//! Mock login page served at `/mockWebPage`.

use askama::Template;

use fi_data::ProfileSummary;

/// Login form offering every profile found under the data roots.
#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginPageTemplate {
    pub session_id: String,
    pub profiles: Vec<ProfileSummary>,
}

impl LoginPageTemplate {
    /// Session id as a JS string literal that is safe inside a `<script>` block.
    fn session_js(&self) -> String {
        serde_json::Value::from(self.session_id.as_str())
            .to_string()
            .replace('<', "\\u003c")
            .replace('>', "\\u003e")
    }
}
