/*!
 * # Editing Core Module
 *
 * Everything the editor window does to a movie, without any widgets.
 *
 * ## Architecture Overview
 *
 * ### 1. Single Source of Truth: the `Model`
 * - An [`EditSession`] owns exactly one [`Model`] plus the editor's cursor
 *   state (current frame, brush colour)
 * - All mutation goes through the bounds-checked `Frame`/`Model` API; a bad
 *   coordinate or frame index comes back as a `ModelError` and leaves the
 *   movie untouched
 *
 * ### 2. Command-Based Editing
 * - Every user action is a [`Cmd`] applied with [`EditSession::apply`]
 * - Each applied command returns a [`Patch`] naming the frames whose content
 *   or position changed, the new current frame and the session version
 * - The version only moves when the movie itself changes, which is what the
 *   dirty flag compares against
 *
 * ### 3. Snapshots for Playback
 * - [`EditSession::snapshot`] hands out an `Arc<Model>` copy; a running
 *   player keeps reading its own copy while editing continues
 *
 * ## Usage Pattern
 *
 * ```rust
 * use blockmation_engine::{Block, Cmd, EditSession};
 *
 * let mut session = EditSession::new(3).unwrap();
 * session.apply(Cmd::SetBrush(Block::Red)).unwrap();
 * session.apply(Cmd::Paint { x: 1, y: 1 }).unwrap();
 *
 * // "New frame" copies the last frame and moves to it
 * let patch = session.apply(Cmd::NewFrame).unwrap();
 * assert_eq!(patch.current_frame, 1);
 * assert_eq!(session.model().frame(1).unwrap().block(1, 1).unwrap(), Block::Red);
 * ```
 */

pub mod commands;
pub mod patch;
pub mod session;

pub use commands::Cmd;
pub use patch::Patch;
pub use session::EditSession;

use crate::models::{Model, ModelError};

/// Append a copy of the last frame to the end of the movie.
///
/// Built only from the public frame/movie operations: duplicate the last
/// frame, append a blank one, then overwrite the blank with the copy.
/// Returns the index of the new frame; fails on a movie with no frames.
pub fn duplicate_last_frame(model: &mut Model) -> Result<usize, ModelError> {
    let last = model.total_frames().checked_sub(1).ok_or(ModelError::FrameOutOfRange {
        index: 0,
        total_frames: 0,
    })?;
    let copy = model.frame(last)?.duplicate();
    let index = model.add_new_frame();
    model.set_frame(index, copy)?;
    Ok(index)
}
