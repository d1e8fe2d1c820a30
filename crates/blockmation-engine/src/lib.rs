pub mod editing;
pub mod io;
pub mod models;
pub mod playback;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use editing::{Cmd, EditSession, Patch, duplicate_last_frame};
pub use io::{FormatError, LoadError, SaveError, load, load_file, save, save_file};
pub use models::{
    Block, Frame, MAX_NEW_DIMENSIONS, MIN_NEW_DIMENSIONS, Model, ModelError,
    validate_new_dimensions,
};
pub use playback::{PlaybackEvent, PlaybackOutcome, PlaybackSpeed, Player, SpeedPresets};
