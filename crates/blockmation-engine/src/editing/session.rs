use std::sync::Arc;

use crate::editing::{Cmd, Patch, duplicate_last_frame};
use crate::models::{Block, Frame, Model, ModelError, validate_new_dimensions};

/// Brush selected when a session starts
pub const DEFAULT_BRUSH: Block = Block::DarkGray;

/// Editor state for one open movie: the movie, the frame being edited and
/// the brush colour.
#[derive(Debug, Clone)]
pub struct EditSession {
    model: Model,
    current_frame: usize,
    brush: Block,
    version: u64,
    saved_version: u64,
}

impl EditSession {
    /// Start a new movie with a single blank frame.
    ///
    /// The size must be between 1 and 100.
    pub fn new(dimensions: usize) -> Result<Self, ModelError> {
        let mut model = Model::new(validate_new_dimensions(dimensions)?);
        model.add_new_frame();
        Ok(Self::from_model(model))
    }

    /// Edit an existing movie, starting at its first frame
    pub fn from_model(model: Model) -> Self {
        Self {
            model,
            current_frame: 0,
            brush: DEFAULT_BRUSH,
            version: 0,
            saved_version: 0,
        }
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn into_model(self) -> Model {
        self.model
    }

    /// Independent copy of the movie for playback
    pub fn snapshot(&self) -> Arc<Model> {
        Arc::new(self.model.clone())
    }

    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    /// The frame being edited
    pub fn current(&self) -> Result<&Frame, ModelError> {
        self.model.frame(self.current_frame)
    }

    pub fn brush(&self) -> Block {
        self.brush
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// True when the movie changed since it was loaded or last saved
    pub fn is_dirty(&self) -> bool {
        self.version != self.saved_version
    }

    pub fn mark_saved(&mut self) {
        self.saved_version = self.version;
    }

    /// Position text for a status bar, e.g. "Frame 2 of 10"
    pub fn status(&self) -> String {
        if self.model.is_empty() {
            return "No frames".to_string();
        }
        format!(
            "Frame {} of {}",
            self.current_frame + 1,
            self.model.total_frames()
        )
    }

    /// Apply one command.
    ///
    /// A failing command leaves the session exactly as it was.
    pub fn apply(&mut self, cmd: Cmd) -> Result<Patch, ModelError> {
        let changed = match cmd {
            Cmd::Paint { x, y } => {
                let brush = self.brush;
                self.model
                    .frame_mut(self.current_frame)?
                    .set_block(x, y, brush)?;
                vec![self.current_frame]
            }
            Cmd::SetBrush(block) => {
                self.brush = block;
                Vec::new()
            }
            Cmd::ClearFrame => {
                self.model.frame_mut(self.current_frame)?.clear();
                vec![self.current_frame]
            }
            Cmd::NewFrame => {
                let index = if self.model.is_empty() {
                    self.model.add_new_frame()
                } else {
                    duplicate_last_frame(&mut self.model)?
                };
                self.current_frame = index;
                vec![index]
            }
            Cmd::AppendBlankFrame => {
                let index = self.model.add_new_frame();
                self.current_frame = index;
                vec![index]
            }
            Cmd::PreviousFrame => {
                self.current_frame = self.current_frame.saturating_sub(1);
                Vec::new()
            }
            Cmd::NextFrame => {
                if self.current_frame + 1 < self.model.total_frames() {
                    self.current_frame += 1;
                }
                Vec::new()
            }
            Cmd::GoToFrame(index) => {
                self.model.frame(index)?;
                self.current_frame = index;
                Vec::new()
            }
            Cmd::RemoveFrame => {
                let removed_at = self.current_frame;
                self.model.remove_frame(removed_at)?;
                let total = self.model.total_frames();
                self.current_frame = removed_at.min(total.saturating_sub(1));
                // Everything after the removed frame moved down one place
                (removed_at..total).collect()
            }
            Cmd::MoveFrame { to } => {
                let from = self.current_frame;
                self.model.move_frame(from, to)?;
                self.current_frame = to;
                (from.min(to)..=from.max(to)).collect()
            }
        };

        if !changed.is_empty() || matches!(cmd, Cmd::RemoveFrame) {
            self.version += 1;
        }

        Ok(Patch {
            changed,
            current_frame: self.current_frame,
            version: self.version,
        })
    }
}
