use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

/// Mailgun account used for verification and password reset emails.
#[derive(Debug, Clone, Deserialize)]
pub struct MailgunConfig {
    pub api_key: String,
    pub domain: String,
    pub from_email: String,
    pub from_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub mailgun: MailgunConfig,
    /// Base URL of the web client; email links are built on top of it.
    pub frontend_url: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "nutrifit".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "nutrifit-users".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24),
        };
        let mailgun = MailgunConfig {
            api_key: std::env::var("MAILGUN_API_KEY")?,
            domain: std::env::var("MAILGUN_DOMAIN")?,
            from_email: std::env::var("MAILGUN_FROM_EMAIL")?,
            from_name: std::env::var("MAILGUN_FROM_NAME").unwrap_or_else(|_| "NutriFit".into()),
        };
        let frontend_url =
            std::env::var("APP_FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".into());
        Ok(Self {
            database_url,
            jwt,
            mailgun,
            frontend_url,
        })
    }
}
