use color_eyre::eyre::Result;

use super::Email;

#[async_trait::async_trait]
pub trait EmailClient {
    async fn send_email(
        &self,
        recipient: &Email,
        subject: &str,
        html_body: &str,
        text_body: &str,
    ) -> Result<()>;
}
