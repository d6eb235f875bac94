//! Settings command errors.

/// Specific settings command error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum CommandErrorKind {
    /// Subcommand not recognised.
    #[display("Unknown subcommand: {}", _0)]
    UnknownSubcommand(String),

    /// Argument could not be interpreted.
    #[display("Invalid argument '{}': {}", arg, reason)]
    InvalidArgument {
        /// The offending argument
        arg: String,
        /// Why it was rejected
        reason: String,
    },

    /// Command issued outside a server channel.
    #[display("Command is only available in server channels")]
    NotInGuild,
}

/// Settings command error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Command Error: {} at line {} in {}", kind, line, file)]
pub struct CommandError {
    /// The kind of error
    pub kind: CommandErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl CommandError {
    /// Create a new command error with caller location tracking.
    #[track_caller]
    pub fn new(kind: CommandErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
