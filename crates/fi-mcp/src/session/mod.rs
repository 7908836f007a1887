//! Session tracking and mock login.

pub mod login;
pub mod registry;

pub use login::LoginService;
pub use registry::SessionRegistry;
