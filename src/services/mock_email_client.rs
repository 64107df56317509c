use color_eyre::eyre::Result;
use tokio::sync::RwLock;

use crate::domain::{Email, EmailClient};

#[derive(Debug, Clone, PartialEq)]
pub struct SentEmail {
    pub recipient: Email,
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
}

/// Records outgoing mail instead of delivering it. Recipients listed in
/// `failing` are rejected, which lets callers exercise delivery failures.
#[derive(Default)]
pub struct MockEmailClient {
    sent: RwLock<Vec<SentEmail>>,
    failing: Vec<Email>,
}

impl MockEmailClient {
    pub fn failing_for(recipients: Vec<Email>) -> Self {
        Self {
            sent: RwLock::default(),
            failing: recipients,
        }
    }

    pub async fn sent_emails(&self) -> Vec<SentEmail> {
        self.sent.read().await.clone()
    }
}

#[async_trait::async_trait]
impl EmailClient for MockEmailClient {
    async fn send_email(
        &self,
        recipient: &Email,
        subject: &str,
        html_body: &str,
        text_body: &str,
    ) -> Result<()> {
        if self.failing.contains(recipient) {
            return Err(color_eyre::eyre::eyre!(
                "delivery to {} refused",
                recipient.as_str()
            ));
        }

        tracing::debug!(
            "Sending email to {} with subject: {}",
            recipient.as_str(),
            subject
        );

        self.sent.write().await.push(SentEmail {
            recipient: recipient.clone(),
            subject: subject.to_owned(),
            html_body: html_body.to_owned(),
            text_body: text_body.to_owned(),
        });

        Ok(())
    }
}
