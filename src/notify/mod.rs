//! Notification module - digest rendering and delivery channels

pub mod digest;
pub mod email;

pub use digest::build_digest;
pub use email::SmtpNotifier;
