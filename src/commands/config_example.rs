// ConfigExampleCommand - write an example configuration file
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

use super::Command;
use crate::error::WatchError;
use crate::monitor::RunConfiguration;
use crate::{Args, Result};
use async_trait::async_trait;

/// ConfigExampleCommand writes an example configuration file
pub struct ConfigExampleCommand {
    args: Args,
}

impl ConfigExampleCommand {
    /// Create a new ConfigExampleCommand with the given arguments
    pub fn new(args: Args) -> Self {
        Self { args }
    }
}

#[async_trait]
impl Command for ConfigExampleCommand {
    async fn execute(&self) -> Result<()> {
        let path = self
            .args
            .config_example
            .as_ref()
            .ok_or_else(|| WatchError::config("--config-example requires a file path"))?;

        RunConfiguration::example().save_to_file(path)?;
        println!("✓ Example configuration saved to: {}", path.display());

        Ok(())
    }

    fn name(&self) -> &'static str {
        "ConfigExampleCommand"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[tokio::test]
    async fn test_writes_loadable_example() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("certwatch.toml");
        let args = Args::parse_from([
            "certwatch",
            "--config-example",
            path.to_str().unwrap(),
        ]);

        ConfigExampleCommand::new(args).execute().await.unwrap();

        let loaded = RunConfiguration::from_file(&path).unwrap();
        assert_eq!(loaded.threshold, 30);
    }
}
