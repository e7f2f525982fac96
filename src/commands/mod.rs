// Commands module - Command Pattern implementation
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

mod command;
mod router;

// Individual command implementations
mod check;
mod config_example;
mod test_mail;

pub use command::Command;
pub use router::CommandRouter;

pub use check::{CheckCommand, RunSummary, run_pass};
pub use config_example::ConfigExampleCommand;
pub use test_mail::TestMailCommand;
