use crate::models::{Block, ModelError};

/// One square grid of blocks: a single still of a movie.
///
/// Cells are stored column by column (`x` major), so the cell at `(x, y)`
/// lives at `x * dimensions + y`. Every cell always holds a valid [`Block`];
/// a fresh frame is entirely [`Block::LightGray`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    dimensions: usize,
    blocks: Vec<Block>,
}

impl Frame {
    /// Create a blank `dimensions` x `dimensions` frame.
    ///
    /// A zero sized frame is legal and simply has no cells.
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            blocks: vec![Block::LightGray; dimensions * dimensions],
        }
    }

    /// Build a frame by asking `block_at(x, y)` for every cell
    pub fn from_fn(dimensions: usize, mut block_at: impl FnMut(usize, usize) -> Block) -> Self {
        let mut blocks = Vec::with_capacity(dimensions * dimensions);
        for x in 0..dimensions {
            for y in 0..dimensions {
                blocks.push(block_at(x, y));
            }
        }
        Self { dimensions, blocks }
    }

    /// Width (and height) of the grid
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Get the block at `(x, y)`
    pub fn block(&self, x: usize, y: usize) -> Result<Block, ModelError> {
        let offset = self.offset(x, y)?;
        Ok(self.blocks[offset])
    }

    /// Overwrite the block at `(x, y)`
    pub fn set_block(&mut self, x: usize, y: usize, block: Block) -> Result<(), ModelError> {
        let offset = self.offset(x, y)?;
        self.blocks[offset] = block;
        Ok(())
    }

    /// Reset every cell to light gray
    pub fn clear(&mut self) {
        self.blocks.fill(Block::LightGray);
    }

    /// Deep copy of this frame with its own storage.
    pub fn duplicate(&self) -> Frame {
        self.clone()
    }

    /// True when every cell is light gray
    pub fn is_blank(&self) -> bool {
        self.blocks.iter().all(|block| *block == Block::LightGray)
    }

    /// Blocks of row `y`, left to right
    pub fn row(&self, y: usize) -> Result<impl Iterator<Item = Block> + '_, ModelError> {
        if y >= self.dimensions {
            return Err(ModelError::CoordinateOutOfRange {
                x: 0,
                y,
                dimensions: self.dimensions,
            });
        }
        Ok(self.row_blocks(y))
    }

    /// Every row, top to bottom, each read left to right
    pub fn rows(&self) -> impl Iterator<Item = impl Iterator<Item = Block> + '_> + '_ {
        (0..self.dimensions).map(move |y| self.row_blocks(y))
    }

    fn row_blocks(&self, y: usize) -> impl Iterator<Item = Block> + '_ {
        (0..self.dimensions).map(move |x| self.blocks[x * self.dimensions + y])
    }

    fn offset(&self, x: usize, y: usize) -> Result<usize, ModelError> {
        if x >= self.dimensions || y >= self.dimensions {
            return Err(ModelError::CoordinateOutOfRange {
                x,
                y,
                dimensions: self.dimensions,
            });
        }
        Ok(x * self.dimensions + y)
    }
}
