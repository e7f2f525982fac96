// Mail Transport Trait

use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A fully rendered message ready for delivery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingMail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub text: String,
}

/// Mail transport trait - implement this to deliver reports another way
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Deliver one message
    async fn send(&self, mail: &OutgoingMail) -> Result<()>;

    /// Get the transport name for logging
    fn transport_name(&self) -> &str;

    /// Test the transport connectivity (optional)
    async fn test_connection(&self) -> Result<()> {
        Ok(())
    }
}
