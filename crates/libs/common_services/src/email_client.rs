use async_trait::async_trait;
use report_pipeline::{DeliveryError, Notifier, ReportEmail};
use serde::Serialize;

/// Resend-compatible transactional email client.
pub struct EmailClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    from: String,
}

#[derive(Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

impl EmailClient {
    #[must_use]
    pub fn new(base_url: &str, api_key: &str, from: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            from: from.to_string(),
        }
    }
}

#[async_trait]
impl Notifier for EmailClient {
    async fn notify(&self, email: &ReportEmail) -> Result<(), DeliveryError> {
        let response = self
            .http
            .post(format!("{}/emails", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&SendEmailRequest {
                from: &self.from,
                to: [&email.to],
                subject: &email.subject,
                html: &email.html,
            })
            .send()
            .await
            .map_err(|e| DeliveryError::Send(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DeliveryError::Send(format!("status {status}: {body}")));
        }
        Ok(())
    }
}
