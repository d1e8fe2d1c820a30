use crate::models::{Frame, ModelError};

/// A movie: an ordered sequence of frames that all share one dimension.
///
/// Frame order is playback order. Frames are appended blank and edited in
/// place, or replaced wholesale by a frame of the same size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Model {
    dimensions: usize,
    frames: Vec<Frame>,
}

impl Model {
    /// Create an empty movie whose frames will be `dimensions` wide
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            frames: Vec::new(),
        }
    }

    /// Width (and height) shared by every frame
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Number of frames in the movie
    pub fn total_frames(&self) -> usize {
        self.frames.len()
    }

    /// Check if the movie has no frames
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// All frames in playback order
    pub fn frames(&self) -> impl Iterator<Item = &Frame> {
        self.frames.iter()
    }

    /// Append a blank frame to the end of the movie.
    ///
    /// Returns the index of the new frame.
    pub fn add_new_frame(&mut self) -> usize {
        self.frames.push(Frame::new(self.dimensions));
        self.frames.len() - 1
    }

    /// Append an already built frame of the movie's size
    pub(crate) fn push_frame(&mut self, frame: Frame) -> usize {
        debug_assert_eq!(frame.dimensions(), self.dimensions);
        self.frames.push(frame);
        self.frames.len() - 1
    }

    pub fn frame(&self, index: usize) -> Result<&Frame, ModelError> {
        self.frames
            .get(index)
            .ok_or_else(|| self.frame_out_of_range(index))
    }

    pub fn frame_mut(&mut self, index: usize) -> Result<&mut Frame, ModelError> {
        let total_frames = self.frames.len();
        self.frames
            .get_mut(index)
            .ok_or(ModelError::FrameOutOfRange {
                index,
                total_frames,
            })
    }

    /// Replace the frame at `index`, returning the frame it displaced.
    ///
    /// The new frame must have the movie's dimensions.
    pub fn set_frame(&mut self, index: usize, frame: Frame) -> Result<Frame, ModelError> {
        if frame.dimensions() != self.dimensions {
            return Err(ModelError::InvalidDimension {
                expected: self.dimensions,
                actual: frame.dimensions(),
            });
        }
        let slot = self.frame_mut(index)?;
        Ok(std::mem::replace(slot, frame))
    }

    /// Remove the frame at `index`; later frames shift down by one.
    pub fn remove_frame(&mut self, index: usize) -> Result<Frame, ModelError> {
        if index >= self.frames.len() {
            return Err(self.frame_out_of_range(index));
        }
        Ok(self.frames.remove(index))
    }

    /// Move the frame at `from` so that it ends up at index `to`.
    ///
    /// Frames in between shift by one; no frame is created or dropped.
    pub fn move_frame(&mut self, from: usize, to: usize) -> Result<(), ModelError> {
        for index in [from, to] {
            if index >= self.frames.len() {
                return Err(self.frame_out_of_range(index));
            }
        }
        let frame = self.frames.remove(from);
        self.frames.insert(to, frame);
        Ok(())
    }

    fn frame_out_of_range(&self, index: usize) -> ModelError {
        ModelError::FrameOutOfRange {
            index,
            total_frames: self.frames.len(),
        }
    }
}
