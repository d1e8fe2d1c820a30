use crate::models::Block;

/// Editing commands accepted by [`EditSession::apply`](crate::EditSession::apply)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cmd {
    /// Paint one cell of the current frame with the brush
    Paint { x: usize, y: usize },
    SetBrush(Block),
    /// Reset the current frame to light gray
    ClearFrame,
    /// Append a copy of the last frame and make it current.
    /// On a movie with no frames a blank frame is appended instead.
    NewFrame,
    /// Append a blank frame and make it current
    AppendBlankFrame,
    /// Step back one frame; does nothing on the first frame
    PreviousFrame,
    /// Step forward one frame; does nothing on the last frame
    NextFrame,
    GoToFrame(usize),
    /// Delete the current frame
    RemoveFrame,
    /// Move the current frame to another position and follow it
    MoveFrame { to: usize },
}
