use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use serde_json::json;
use tracing::warn;

/// Outbound mail. Callers treat delivery as best-effort: a failure is
/// logged and never aborts the workflow that triggered it.
#[automock]
#[async_trait]
pub trait MailNotifier: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()>;
}

/// Posts messages to an HTTP mail gateway.
pub struct MailGateway {
    http: reqwest::Client,
    endpoint: String,
}

impl MailGateway {
    pub fn new(endpoint: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint,
        }
    }
}

#[async_trait]
impl MailNotifier for MailGateway {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        let resp = self
            .http
            .post(&self.endpoint)
            .json(&json!({
                "to": to,
                "subject": subject,
                "body": body,
            }))
            .send()
            .await?;

        if !resp.status().is_success() {
            anyhow::bail!("mail gateway responded with status {}", resp.status());
        }

        Ok(())
    }
}

/// Used when no mail gateway is configured; drops mail with a warning so
/// the rest of the flow is unaffected.
pub struct NoopMailer;

#[async_trait]
impl MailNotifier for NoopMailer {
    async fn send(&self, to: &str, subject: &str, _body: &str) -> Result<()> {
        warn!(to, subject, "mail gateway not configured; dropping message");
        Ok(())
    }
}
