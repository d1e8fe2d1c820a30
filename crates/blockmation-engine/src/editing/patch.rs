/// Result of applying a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    /// Frames whose content or position changed, ascending
    pub changed: Vec<usize>,
    pub current_frame: usize,
    pub version: u64,
}
