// Console Mail Transport - prints the report instead of sending it

use crate::Result;
use crate::monitor::alerts::{MailTransport, OutgoingMail};
use async_trait::async_trait;
use colored::*;

/// Transport used by `--dry-run`
pub struct ConsoleTransport;

impl ConsoleTransport {
    /// Render the message the way it would be delivered
    pub fn render(mail: &OutgoingMail) -> String {
        format!(
            "From: {}\nTo: {}\nSubject: {}\n\n{}",
            mail.from,
            mail.to.join(", "),
            mail.subject,
            mail.text
        )
    }
}

#[async_trait]
impl MailTransport for ConsoleTransport {
    async fn send(&self, mail: &OutgoingMail) -> Result<()> {
        println!("\n{}", "Dry run - mail not sent:".cyan().bold());
        println!("{}", "=".repeat(80));
        println!("{}", Self::render(mail));
        println!("{}", "=".repeat(80));
        Ok(())
    }

    fn transport_name(&self) -> &str {
        "console"
    }
}
