use super::sendmail::{MailError, Mailer};

const AGENCY_VERIFICATION_TEMPLATE: &str = include_str!("templates/Agency-verification.html");

/// Send the agency account verification link.
pub async fn send_agency_verification_email(
    mailer: &dyn Mailer,
    to_email: &str,
    business_name: &str,
    verification_link: &str,
) -> Result<(), MailError> {
    let subject = "Verify your iAyos agency account";
    let business_name = ammonia::clean_text(business_name);
    let placeholders = [
        ("{{business_name}}", business_name.as_str()),
        ("{{verification_link}}", verification_link),
    ];

    let html_body = render(AGENCY_VERIFICATION_TEMPLATE, &placeholders);
    mailer.send_html(to_email, subject, &html_body).await
}

fn render(template: &str, placeholders: &[(&str, &str)]) -> String {
    placeholders
        .iter()
        .fold(template.to_string(), |html, (key, value)| html.replace(key, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RecordingMailer;

    #[tokio::test]
    async fn fills_in_business_name_and_link() {
        let mailer = RecordingMailer::default();
        send_agency_verification_email(
            &mailer,
            "ops@cleanpro.ph",
            "CleanPro <Zamboanga>",
            "https://iayos.online/auth/verify-email?token=abc123",
        )
        .await
        .unwrap();

        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "ops@cleanpro.ph");
        assert_eq!(sent[0].subject, "Verify your iAyos agency account");
        assert!(sent[0].html.contains("&lt;Zamboanga&gt;"));
        assert!(!sent[0].html.contains("<Zamboanga>"));
        assert!(sent[0]
            .html
            .contains("href=\"https://iayos.online/auth/verify-email?token=abc123\""));
        assert!(!sent[0].html.contains("{{"));
    }
}
