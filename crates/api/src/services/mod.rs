//! Application services.

pub mod email;

pub use email::{EmailError, EmailMessage, EmailService};
