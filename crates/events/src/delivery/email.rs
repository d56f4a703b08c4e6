//! Alert email delivery via SMTP.
//!
//! [`EmailDelivery`] wraps the `lettre` async SMTP transport to send
//! plain-text alert emails. Configuration is loaded from environment
//! variables; if `SMTP_HOST` is not set, [`EmailConfig::from_env`] returns
//! `None` and no mailer should be constructed.

use async_trait::async_trait;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

// ---------------------------------------------------------------------------
// AlertEmail / EmailSender
// ---------------------------------------------------------------------------

/// The data rendered into one alert email.
#[derive(Debug, Clone)]
pub struct AlertEmail {
    pub to: String,
    pub item_name: String,
    pub item_status: Option<String>,
    pub item_url: String,
    pub subscription_name: String,
    pub criteria_summary: String,
}

/// Best-effort email transport seam.
///
/// The dispatch engine only ever logs failures from this trait; a failed
/// send never rolls back the notification record.
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send_alert(&self, email: &AlertEmail) -> Result<(), EmailError>;
}

// ---------------------------------------------------------------------------
// EmailConfig
// ---------------------------------------------------------------------------

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address when `SMTP_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "noreply@shelfwatch.local";

/// Configuration for the SMTP email delivery service.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// SMTP server hostname.
    pub smtp_host: String,
    /// SMTP server port (defaults to 587).
    pub smtp_port: u16,
    /// RFC 5322 "From" address.
    pub from_address: String,
    /// Optional SMTP username.
    pub smtp_user: Option<String>,
    /// Optional SMTP password.
    pub smtp_password: Option<String>,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `SMTP_HOST` is not set, signalling that email
    /// delivery is not configured and should be skipped.
    ///
    /// | Variable        | Required | Default                     |
    /// |-----------------|----------|-----------------------------|
    /// | `SMTP_HOST`     | yes      | —                           |
    /// | `SMTP_PORT`     | no       | `587`                       |
    /// | `SMTP_FROM`     | no       | `noreply@shelfwatch.local`  |
    /// | `SMTP_USER`     | no       | —                           |
    /// | `SMTP_PASSWORD` | no       | —                           |
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok()?;
        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

// ---------------------------------------------------------------------------
// EmailDelivery
// ---------------------------------------------------------------------------

/// Sends alert emails via SMTP.
pub struct EmailDelivery {
    config: EmailConfig,
}

impl EmailDelivery {
    /// Create a new email delivery service with the given configuration.
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    fn render_body(email: &AlertEmail) -> String {
        let criteria = if email.criteria_summary.is_empty() {
            "Any new item"
        } else {
            &email.criteria_summary
        };
        format!(
            "A new item matches your alert \"{}\".\n\
             Item: {}\n\
             Status: {}\n\
             Criteria: {}\n\
             Link: {}\n",
            email.subscription_name,
            email.item_name,
            email.item_status.as_deref().unwrap_or("New"),
            criteria,
            email.item_url,
        )
    }
}

#[async_trait]
impl EmailSender for EmailDelivery {
    async fn send_alert(&self, email: &AlertEmail) -> Result<(), EmailError> {
        use lettre::{
            message::header::ContentType, transport::smtp::authentication::Credentials,
            AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
        };

        let subject = format!("Shelfwatch alert: {}", email.item_name);
        let body = Self::render_body(email);

        let message = Message::builder()
            .from(self.config.from_address.parse()?)
            .to(email.to.parse()?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| EmailError::Build(e.to_string()))?;

        let mut transport_builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)?
                .port(self.config.smtp_port);

        if let (Some(user), Some(pass)) = (&self.config.smtp_user, &self.config.smtp_password) {
            transport_builder =
                transport_builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        let mailer = transport_builder.build();
        mailer.send(message).await?;

        tracing::info!(to = %email.to, item = %email.item_name, "Alert email sent");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn alert() -> AlertEmail {
        AlertEmail {
            to: "seller@example.org".to_string(),
            item_name: "Quantum Summer School".to_string(),
            item_status: None,
            item_url: "https://catalog.example.org/items/9".to_string(),
            subscription_name: "Physics alerts".to_string(),
            criteria_summary: String::new(),
        }
    }

    #[test]
    fn from_env_returns_none_without_smtp_host() {
        std::env::remove_var("SMTP_HOST");
        assert!(EmailConfig::from_env().is_none());
    }

    #[test]
    fn empty_criteria_summary_renders_placeholder() {
        let body = EmailDelivery::render_body(&alert());
        assert!(body.contains("Criteria: Any new item"));
        assert!(body.contains("Status: New"));
    }

    #[test]
    fn criteria_summary_and_status_are_rendered() {
        let mut email = alert();
        email.item_status = Some("published".to_string());
        email.criteria_summary = "Language: English".to_string();

        let body = EmailDelivery::render_body(&email);
        assert!(body.contains("Criteria: Language: English"));
        assert!(body.contains("Status: published"));
        assert!(body.contains("alert \"Physics alerts\""));
    }

    #[test]
    fn email_error_display_build() {
        let err = EmailError::Build("missing body".to_string());
        assert_eq!(err.to_string(), "Email build error: missing body");
    }
}
