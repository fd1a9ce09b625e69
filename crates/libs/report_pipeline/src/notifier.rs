use async_trait::async_trait;
use common_types::Contact;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("email send failed: {0}")]
    Send(String),
}

/// One rendered delivery notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Delivery seam. Best-effort: a failed send never affects job status, the
/// report stays retrievable by URL regardless.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, email: &ReportEmail) -> Result<(), DeliveryError>;
}

/// Fixed HTML template embedding the public report link.
#[must_use]
pub fn render_report_email(contact: &Contact, report_url: &str) -> ReportEmail {
    let first_name = contact.name.split_whitespace().next().unwrap_or("there");
    let html = format!(
        "<div style=\"font-family: sans-serif; max-width: 560px; margin: 0 auto;\">\
         <h2>Your AI readiness report is ready</h2>\
         <p>Hi {first_name},</p>\
         <p>We analyzed your answers and put together a personalized report with the \
         AI opportunities we found for your business, the tools we recommend, and a \
         phased rollout plan.</p>\
         <p><a href=\"{report_url}\" \
         style=\"display: inline-block; padding: 12px 24px; background: #111; \
         color: #fff; text-decoration: none; border-radius: 6px;\">View your report</a></p>\
         <p>The link stays available for 30 days, no login required.</p>\
         </div>"
    );
    ReportEmail {
        to: contact.email.clone(),
        subject: "Your AI readiness report is ready".to_string(),
        html,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_embeds_link_and_first_name() {
        let contact = Contact {
            email: "jo@example.com".to_string(),
            name: "Jo Vries".to_string(),
        };
        let email = render_report_email(&contact, "https://example.com/report/tok123");
        assert_eq!(email.to, "jo@example.com");
        assert!(email.html.contains("https://example.com/report/tok123"));
        assert!(email.html.contains("Hi Jo,"));
    }

    #[test]
    fn empty_name_falls_back_to_greeting() {
        let contact = Contact {
            email: "x@example.com".to_string(),
            name: String::new(),
        };
        let email = render_report_email(&contact, "u");
        assert!(email.html.contains("Hi there,"));
    }
}
