//! Opt-in command execution policy.
//!
//! Commands are never handed to a shell. The text is split on whitespace
//! into a program and its arguments, and the program must appear verbatim
//! in the configured allow-list. Actually spawning the process is left to
//! the caller.

use crate::error::{CoreError, CoreResult};

/// A parsed command: program plus arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    program: String,
    args: Vec<String>,
}

impl CommandLine {
    /// Splits `text` on whitespace. Quotes, pipes and redirections are not
    /// interpreted; they reach the program as literal arguments.
    ///
    /// # Errors
    ///
    /// [`CoreError::EmptyInput`] if `text` has no words.
    pub fn parse(text: &str) -> CoreResult<Self> {
        let mut words = text.split_whitespace().map(str::to_owned);
        let program = words.next().ok_or(CoreError::EmptyInput("command"))?;
        Ok(Self {
            program,
            args: words.collect(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

/// Which commands may run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandPolicy {
    enabled: bool,
    allowed_programs: Vec<String>,
}

impl CommandPolicy {
    pub fn new(enabled: bool, allowed_programs: Vec<String>) -> Self {
        Self {
            enabled,
            allowed_programs,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns `true` if `program` is in the allow-list (exact match).
    pub fn allows(&self, program: &str) -> bool {
        self.allowed_programs.iter().any(|p| p == program)
    }

    /// Checks `command` against this policy.
    ///
    /// # Errors
    ///
    /// [`CoreError::CommandRejected`] when execution is disabled or the
    /// program is not allow-listed.
    pub fn authorize(&self, command: &CommandLine) -> CoreResult<()> {
        if !self.enabled {
            return Err(CoreError::CommandRejected(
                "command execution is disabled".to_string(),
            ));
        }
        if !self.allows(command.program()) {
            tracing::warn!("rejected command program '{}'", command.program());
            return Err(CoreError::CommandRejected(format!(
                "'{}' is not an allowed program",
                command.program()
            )));
        }
        Ok(())
    }
}
