use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use axum::http::StatusCode;
use base64ct::{Base64, Encoding};
use reqwest::Url;
use tracing::{error, info, instrument};

use super::templates;
use crate::config::MailgunConfig;

const MAILGUN_API_BASE: &str = "https://api.mailgun.net";

/// Status and body of the provider's reply.
#[derive(Debug, Clone)]
pub struct MailResponse {
    pub status: StatusCode,
    pub body: String,
}

/// One form-encoded POST to the mail provider.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn post_form(
        &self,
        url: &str,
        authorization: &str,
        form: &[(&'static str, String)],
    ) -> anyhow::Result<MailResponse>;
}

/// Production transport; uses the client's default timeout.
#[derive(Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

#[async_trait]
impl MailTransport for ReqwestTransport {
    async fn post_form(
        &self,
        url: &str,
        authorization: &str,
        form: &[(&'static str, String)],
    ) -> anyhow::Result<MailResponse> {
        let response = self
            .client
            .post(url)
            .header(reqwest::header::AUTHORIZATION, authorization)
            .form(form)
            .send()
            .await
            .context("mailgun request")?;
        let status = StatusCode::from_u16(response.status().as_u16())
            .context("mailgun status code")?;
        let body = response.text().await.unwrap_or_default();
        Ok(MailResponse { status, body })
    }
}

/// Sends account emails through the Mailgun HTTP API.
///
/// Sending never fails loudly: every problem is logged and reported as
/// `false`, so callers decide whether an unsent email matters.
#[derive(Clone)]
pub struct EmailService {
    transport: Arc<dyn MailTransport>,
    config: MailgunConfig,
    frontend_url: String,
}

impl EmailService {
    pub fn new(transport: Arc<dyn MailTransport>, config: MailgunConfig, frontend_url: String) -> Self {
        Self {
            transport,
            config,
            frontend_url,
        }
    }

    #[instrument(skip(self, user_name, token))]
    pub async fn send_verification_email(&self, to_email: &str, user_name: &str, token: &str) -> bool {
        let Some(url) = self.link("/verify-email", token) else {
            return false;
        };
        self.send(
            to_email,
            templates::VERIFICATION_SUBJECT,
            templates::verification_text(user_name, &url),
            templates::verification_html(user_name, &url),
        )
        .await
    }

    #[instrument(skip(self, user_name, token))]
    pub async fn send_password_reset_email(&self, to_email: &str, user_name: &str, token: &str) -> bool {
        let Some(url) = self.link("/reset-password", token) else {
            return false;
        };
        self.send(
            to_email,
            templates::PASSWORD_RESET_SUBJECT,
            templates::password_reset_text(user_name, &url),
            templates::password_reset_html(user_name, &url),
        )
        .await
    }

    /// Frontend page with the token as an encoded `token` query parameter.
    fn link(&self, path: &str, token: &str) -> Option<String> {
        let base = format!("{}{}", self.frontend_url.trim_end_matches('/'), path);
        match Url::parse(&base) {
            Ok(mut url) => {
                url.query_pairs_mut().append_pair("token", token);
                Some(url.into())
            }
            Err(e) => {
                error!(url = %base, error = %e, "invalid frontend url");
                None
            }
        }
    }

    fn messages_url(&self) -> String {
        format!("{MAILGUN_API_BASE}/v3/{}/messages", self.config.domain)
    }

    fn authorization(&self) -> String {
        let credentials = format!("api:{}", self.config.api_key);
        format!("Basic {}", Base64::encode_string(credentials.as_bytes()))
    }

    async fn send(&self, to_email: &str, subject: &str, text: String, html: String) -> bool {
        let form = [
            ("from", format!("{} <{}>", self.config.from_name, self.config.from_email)),
            ("to", to_email.to_string()),
            ("subject", subject.to_string()),
            ("text", text),
            ("html", html),
        ];

        match self
            .transport
            .post_form(&self.messages_url(), &self.authorization(), &form)
            .await
        {
            Ok(resp) if resp.status.is_success() => {
                info!(to = %to_email, "email sent");
                true
            }
            Ok(resp) => {
                error!(to = %to_email, status = %resp.status, body = %resp.body, "mailgun rejected email");
                false
            }
            Err(e) => {
                error!(to = %to_email, error = %e, "error sending email via mailgun");
                false
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    use std::sync::Mutex;

    use super::*;

    #[derive(Debug, Clone)]
    pub struct SentRequest {
        pub url: String,
        pub authorization: String,
        pub form: Vec<(&'static str, String)>,
    }

    impl SentRequest {
        pub fn field(&self, name: &str) -> &str {
            self.form
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.as_str())
                .unwrap_or_default()
        }
    }

    /// Records every request and answers with a fixed status, or fails.
    pub struct FakeTransport {
        pub status: Option<StatusCode>,
        pub sent: Mutex<Vec<SentRequest>>,
    }

    impl FakeTransport {
        pub fn replying(status: StatusCode) -> Self {
            Self {
                status: Some(status),
                sent: Mutex::new(Vec::new()),
            }
        }

        pub fn failing() -> Self {
            Self {
                status: None,
                sent: Mutex::new(Vec::new()),
            }
        }

        pub fn last(&self) -> SentRequest {
            self.sent.lock().unwrap().last().cloned().expect("no request sent")
        }
    }

    #[async_trait]
    impl MailTransport for FakeTransport {
        async fn post_form(
            &self,
            url: &str,
            authorization: &str,
            form: &[(&'static str, String)],
        ) -> anyhow::Result<MailResponse> {
            self.sent.lock().unwrap().push(SentRequest {
                url: url.to_string(),
                authorization: authorization.to_string(),
                form: form.to_vec(),
            });
            match self.status {
                Some(status) => Ok(MailResponse {
                    status,
                    body: String::new(),
                }),
                None => anyhow::bail!("connection refused"),
            }
        }
    }

    pub fn mailgun_config() -> MailgunConfig {
        MailgunConfig {
            api_key: "key-123".into(),
            domain: "mg.nutrifit.test".into(),
            from_email: "no-reply@nutrifit.test".into(),
            from_name: "NutriFit".into(),
        }
    }
}
