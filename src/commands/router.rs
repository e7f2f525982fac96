// CommandRouter - Routes CLI arguments to appropriate Command
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

use super::{CheckCommand, Command, ConfigExampleCommand, TestMailCommand};
use crate::{Args, Result};

/// CommandRouter determines which Command to execute based on CLI arguments
///
/// Priority:
/// 1. Example configuration (--config-example)
/// 2. SMTP test (--test-mail)
/// 3. Certificate check (default)
pub struct CommandRouter;

impl CommandRouter {
    /// Route CLI arguments to the appropriate Command
    ///
    /// # Errors
    /// Returns a configuration error if conflicting flags are combined
    pub fn route(args: Args) -> Result<Box<dyn Command>> {
        args.validate()?;

        if args.config_example.is_some() {
            return Ok(Box::new(ConfigExampleCommand::new(args)));
        }

        if args.test_mail {
            return Ok(Box::new(TestMailCommand::new(args)));
        }

        Ok(Box::new(CheckCommand::new(args)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_route_default_is_check() {
        let cmd = CommandRouter::route(Args::parse_from(["certwatch"])).unwrap();
        assert_eq!(cmd.name(), "CheckCommand");
    }

    #[test]
    fn test_route_config_example() {
        let args = Args::parse_from(["certwatch", "--config-example", "out.toml"]);
        let cmd = CommandRouter::route(args).unwrap();
        assert_eq!(cmd.name(), "ConfigExampleCommand");
    }

    #[test]
    fn test_route_test_mail() {
        let args = Args::parse_from(["certwatch", "--test-mail"]);
        let cmd = CommandRouter::route(args).unwrap();
        assert_eq!(cmd.name(), "TestMailCommand");
    }

    #[test]
    fn test_route_rejects_conflicts() {
        let args = Args::parse_from(["certwatch", "--test-mail", "--config-example", "x.toml"]);
        assert!(CommandRouter::route(args).is_err());
    }

    #[tokio::test]
    async fn test_check_with_missing_config_fails() {
        let args = Args::parse_from(["certwatch", "-c", "/nonexistent/certwatch.toml"]);
        let err = CommandRouter::route(args).unwrap().execute().await.unwrap_err();
        assert!(matches!(err, crate::WatchError::ConfigError { .. }));
    }
}
