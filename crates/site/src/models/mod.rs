//! View models and session types for the site.

pub mod session;

pub use session::SessionUser;
