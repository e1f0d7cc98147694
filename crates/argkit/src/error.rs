use thiserror::Error;

/// Raised while registering arguments.
///
/// These are programmer errors: the offending argument is never added.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid argument name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },

    #[error("argument name '{0}' is already registered")]
    DuplicateName(String),

    #[error("cannot register '{name}': {reason}")]
    StructuralConflict { name: String, reason: &'static str },
}

/// Raised while consuming user-supplied tokens.
///
/// Arguments are reported by their first registered name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("argument '{0}' does not take a value")]
    UnexpectedValue(String),

    #[error("missing value for '{0}'")]
    MissingValue(String),

    #[error("argument '{0}' specified too many times")]
    TooManyOccurrences(String),

    #[error("argument '{name}' requires at least {min} values, got {count}")]
    TooFewOccurrences {
        name: String,
        min: usize,
        count: usize,
    },

    #[error("'{given}' cannot be used together with '{previous}'")]
    ExclusiveConflict { given: String, previous: String },

    #[error("invalid value '{value}' for '{name}'. possible values: {allowed}")]
    InvalidValue {
        name: String,
        value: String,
        allowed: String,
    },

    #[error("unexpected argument: {0}")]
    UnexpectedArgument(String),

    #[error("missing required argument: {0}")]
    RequiredArgumentMissing(String),

    #[error("unknown subcommand: {0}")]
    UnknownSubcommand(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
