pub mod duration;
pub mod timer;

pub use timer::Timer;

/// Limits enforced on user input when creating or editing a timer.
pub const MAX_NAME_CHARS: usize = 18;
pub const MAX_MESSAGE_CHARS: usize = 80;

/// Upper bounds for the repeated-ring configuration, enforced at the CLI
/// argument level.
pub const MAX_RINGS: u32 = 20;
pub const MAX_INTERVAL_SECS: u32 = 300;
