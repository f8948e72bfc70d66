//! Account emails (verification, password reset) delivered through Mailgun.

mod service;
pub mod templates;

pub use service::{EmailService, MailResponse, MailTransport, ReqwestTransport};

#[cfg(test)]
pub(crate) use service::fakes;
