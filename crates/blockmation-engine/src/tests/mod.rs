use crate::models::{Block, Model};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a temporary directory for movie files
pub fn create_test_movie_dir() -> TempDir {
    tempfile::tempdir().unwrap()
}

/// Create a test movie file with content
pub fn create_test_file(movie_dir: &TempDir, filename: &str, content: &str) -> PathBuf {
    let file_path = movie_dir.path().join(filename);
    fs::write(&file_path, content).unwrap();
    file_path
}

/// Movie where cell `(x, y)` of frame `f` is `Block::ALL[(2 * x + y + f) % 5]`,
/// so every frame differs from its neighbours and no frame is symmetric.
pub fn patterned_movie(dimensions: usize, frames: usize) -> Model {
    let mut model = Model::new(dimensions);
    for f in 0..frames {
        let index = model.add_new_frame();
        let frame = model.frame_mut(index).unwrap();
        for x in 0..dimensions {
            for y in 0..dimensions {
                frame
                    .set_block(x, y, Block::ALL[(2 * x + y + f) % Block::ALL.len()])
                    .unwrap();
            }
        }
    }
    model
}
