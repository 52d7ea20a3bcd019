use thiserror::Error;

/// Input validation failures raised when creating or editing a timer.
///
/// These are meant to be caught by whatever collects user input (the CLI
/// here) and surfaced as a rejected command, not a crash. Time arithmetic
/// itself has no failure modes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("timer name must be 1 to {max} characters (got {len})")]
    TitleLength { len: usize, max: usize },

    #[error("notification message must be at most {max} characters (got {len})")]
    MessageLength { len: usize, max: usize },
}
