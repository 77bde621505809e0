use serde_json::json;
use tracing::{info, warn};

/// Posts notification emails to an HTTP mail relay. When the relay is not
/// configured the mailer degrades to a logged no-op, so a missing mail setup
/// never breaks a deployment.
///
/// Every call site treats sending as best-effort: the primary state change
/// is already committed by the time an email goes out.
pub struct Mailer {
    client: reqwest::Client,
    relay: Option<MailRelay>,
}

struct MailRelay {
    url: String,
    api_key: String,
    sender: String,
}

impl Mailer {
    pub fn new(relay_url: Option<String>, api_key: Option<String>, sender: Option<String>) -> Self {
        let relay = match (relay_url, api_key, sender) {
            (Some(url), Some(api_key), Some(sender)) => Some(MailRelay { url, api_key, sender }),
            _ => {
                warn!("Mail relay not configured, notification emails will be skipped");
                None
            }
        };

        Self {
            client: reqwest::Client::new(),
            relay,
        }
    }

    pub async fn send(&self, to: &str, subject: &str, html: &str) {
        let Some(relay) = &self.relay else {
            info!(to, subject, "Mail relay not configured, skipping email");
            return;
        };

        let body = json!({
            "from": relay.sender,
            "to": [to],
            "subject": subject,
            "html": html,
        });

        let result = self.client
            .post(&relay.url)
            .bearer_auth(&relay.api_key)
            .json(&body)
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                info!(to, subject, "Notification email sent");
            }
            Ok(response) => {
                warn!(to, subject, status = %response.status(), "Mail relay rejected email");
            }
            Err(err) => {
                warn!(to, subject, %err, "Unable to reach mail relay");
            }
        }
    }
}
