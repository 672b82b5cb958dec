use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    Address, Message, SmtpTransport, Transport,
};
use thiserror::Error;
use tokio::time::{sleep, Duration};

use crate::config::Config;

const MAX_RETRIES: u32 = 3;
const RETRY_DELAY_MS: u64 = 1000;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    #[error("Failed to build email: {0}")]
    Build(String),

    #[error("SMTP send failed: {0}")]
    Transport(String),
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_html(&self, to_email: &str, subject: &str, html_body: &str) -> Result<(), MailError>;
}

#[derive(Clone)]
pub struct SmtpMailer {
    host: String,
    port: u16,
    username: String,
    password: String,
    from_email: String,
}

impl std::fmt::Debug for SmtpMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpMailer")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("from_email", &self.from_email)
            .finish()
    }
}

impl SmtpMailer {
    pub fn new(
        host: impl Into<String>,
        port: u16,
        username: impl Into<String>,
        password: impl Into<String>,
        from_email: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            username: username.into(),
            password: password.into(),
            from_email: from_email.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.smtp_host.clone(),
            config.smtp_port,
            config.smtp_username.clone(),
            config.smtp_password.clone(),
            config.from_email.clone(),
        )
    }

    fn build_message(&self, to_email: &str, subject: &str, html_body: &str) -> Result<Message, MailError> {
        let from = self
            .from_email
            .parse()
            .map_err(|_| MailError::InvalidAddress(self.from_email.clone()))?;
        let to = to_email
            .parse()
            .map_err(|_| MailError::InvalidAddress(to_email.to_string()))?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .multipart(
                MultiPart::alternative().singlepart(
                    SinglePart::builder()
                        .header(ContentType::TEXT_HTML)
                        .body(html_body.to_string()),
                ),
            )
            .map_err(|e| MailError::Build(e.to_string()))
    }

    fn deliver(&self, email: &Message) -> Result<(), MailError> {
        let creds = Credentials::new(self.username.clone(), self.password.clone());
        let transport = SmtpTransport::relay(&self.host)
            .map_err(|e| MailError::Transport(e.to_string()))?
            .port(self.port)
            .credentials(creds)
            .build();

        transport
            .send(email)
            .map(|_| ())
            .map_err(|e| MailError::Transport(e.to_string()))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_html(&self, to_email: &str, subject: &str, html_body: &str) -> Result<(), MailError> {
        validate_email(to_email)?;
        let email = self.build_message(to_email, subject, html_body)?;

        let mut last_error = None;
        for attempt in 1..=MAX_RETRIES {
            let mailer = self.clone();
            let message = email.clone();
            let result = tokio::task::spawn_blocking(move || mailer.deliver(&message))
                .await
                .map_err(|e| MailError::Transport(e.to_string()))
                .and_then(|sent| sent);

            match result {
                Ok(()) => {
                    tracing::info!("Email sent via SMTP to {}", to_email);
                    return Ok(());
                }
                Err(e) => {
                    last_error = Some(e);
                    if attempt < MAX_RETRIES {
                        let delay = RETRY_DELAY_MS * 2_u64.pow(attempt - 1);
                        tracing::warn!(
                            "Email send attempt {} failed for {}. Retrying in {}ms...",
                            attempt,
                            to_email,
                            delay
                        );
                        sleep(Duration::from_millis(delay)).await;
                    }
                }
            }
        }

        let error = last_error
            .unwrap_or_else(|| MailError::Transport("Unknown email sending error".to_string()));
        tracing::error!("Email failed for {}: {}", to_email, error);
        Err(error)
    }
}

pub fn validate_email(email: &str) -> Result<(), MailError> {
    let invalid = || MailError::InvalidAddress(email.to_string());

    let address: Address = email.trim().parse().map_err(|_| invalid())?;
    let domain = address.domain();
    if domain.starts_with('.') || domain.ends_with('.') || !domain.contains('.') {
        return Err(invalid());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(validate_email("test@example.com").is_ok());
        assert!(validate_email("user.name+tag@domain.co.uk").is_ok());
        assert!(validate_email("invalid-email").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("test@.com").is_err());
        assert!(validate_email("test@localhost").is_err());
    }

    #[test]
    fn builds_html_message() {
        let mailer = SmtpMailer::new("localhost", 587, "", "", "iAyos <noreply@iayos.online>");
        let message = mailer
            .build_message("agency@example.com", "Verify", "<p>Hello</p>")
            .unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("Subject: Verify"));
        assert!(raw.contains("text/html"));
    }

    #[test]
    fn rejects_bad_sender() {
        let mailer = SmtpMailer::new("localhost", 587, "", "", "not an address");
        assert!(matches!(
            mailer.build_message("agency@example.com", "Verify", "<p>Hello</p>"),
            Err(MailError::InvalidAddress(_))
        ));
    }
}
