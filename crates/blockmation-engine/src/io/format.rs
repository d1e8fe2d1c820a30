//! Plain text movie format.
//!
//! ```text
//! <total frames>
//! <dimensions>
//! <frame 0, row 0>
//! ...
//! <frame n-1, row d-1>
//! ```
//!
//! Each row is `dimensions` block characters (`l`, `d`, `r`, `g`, `b`) with
//! no separator. Rows are written top to bottom and there is no newline after
//! the very last row. Reading is token based: any run of whitespace separates
//! tokens, so line endings are not significant.

use std::fmt;

use crate::models::{Block, Frame, MAX_NEW_DIMENSIONS, Model};

/// Which of the two header numbers is being read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderField {
    TotalFrames,
    Dimensions,
}

impl fmt::Display for HeaderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderField::TotalFrames => write!(f, "the number of frames"),
            HeaderField::Dimensions => write!(f, "the frame size"),
        }
    }
}

/// The text does not follow the movie file grammar
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("Movie file is not valid UTF-8 text")]
    InvalidEncoding,
    #[error("Movie file ends before {field}")]
    MissingHeader { field: HeaderField },
    #[error("Expected a whole number for {field} but found '{found}'")]
    InvalidHeader { field: HeaderField, found: String },
    #[error(
        "Frame size {found} is larger than the supported maximum of {max}",
        max = MAX_NEW_DIMENSIONS
    )]
    UnsupportedDimensions { found: usize },
    #[error("Movie declares {total_frames} frames but a frame size of 0")]
    FramesWithoutBlocks { total_frames: usize },
    #[error("Frame {frame} is missing row {row}")]
    MissingRow { frame: usize, row: usize },
    #[error("Frame {frame} row {row} has {found} blocks, expected {expected}")]
    ShortRow {
        frame: usize,
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Frame {frame} row {row} has {found} blocks, expected {expected}")]
    LongRow {
        frame: usize,
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Frame {frame} row {row} column {column}: '{character}' is not a block")]
    UnknownBlock {
        frame: usize,
        row: usize,
        column: usize,
        character: char,
    },
    #[error("Unexpected data after the last frame: '{found}'")]
    TrailingData { found: String },
}

/// Parse a whole movie.
///
/// Either the complete movie is returned or the first grammar violation is
/// reported; nothing partially read escapes.
pub fn parse_model(text: &str) -> Result<Model, FormatError> {
    let mut tokens = text.split_whitespace();

    let total_frames = read_header(&mut tokens, HeaderField::TotalFrames)?;
    let dimensions = read_header(&mut tokens, HeaderField::Dimensions)?;

    // Header values must not decide how much gets allocated
    if dimensions > MAX_NEW_DIMENSIONS {
        return Err(FormatError::UnsupportedDimensions { found: dimensions });
    }
    if dimensions == 0 && total_frames > 0 {
        return Err(FormatError::FramesWithoutBlocks { total_frames });
    }

    let mut model = Model::new(dimensions);
    for frame in 0..total_frames {
        model.push_frame(read_frame(&mut tokens, frame, dimensions)?);
    }

    if let Some(found) = tokens.next() {
        return Err(FormatError::TrailingData {
            found: found.to_string(),
        });
    }

    Ok(model)
}

/// Render a movie in the file format
pub fn to_text(model: &Model) -> String {
    let rows: Vec<String> = model
        .frames()
        .flat_map(Frame::rows)
        .map(|row| row.map(Block::to_char).collect())
        .collect();

    let mut text = format!("{}\n{}\n", model.total_frames(), model.dimensions());
    text.push_str(&rows.join("\n"));
    text
}

fn read_header<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    field: HeaderField,
) -> Result<usize, FormatError> {
    let token = tokens.next().ok_or(FormatError::MissingHeader { field })?;
    token.parse().map_err(|_| FormatError::InvalidHeader {
        field,
        found: token.to_string(),
    })
}

fn read_frame<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    frame: usize,
    dimensions: usize,
) -> Result<Frame, FormatError> {
    // rows[y][x]; grows with the input, not with the header value
    let mut rows = Vec::new();
    for row in 0..dimensions {
        let token = tokens
            .next()
            .ok_or(FormatError::MissingRow { frame, row })?;
        rows.push(read_row(token, frame, row, dimensions)?);
    }

    Ok(Frame::from_fn(dimensions, |x, y| rows[y][x]))
}

fn read_row(
    token: &str,
    frame: usize,
    row: usize,
    dimensions: usize,
) -> Result<Vec<Block>, FormatError> {
    let found = token.chars().count();
    if found < dimensions {
        return Err(FormatError::ShortRow {
            frame,
            row,
            expected: dimensions,
            found,
        });
    }
    if found > dimensions {
        return Err(FormatError::LongRow {
            frame,
            row,
            expected: dimensions,
            found,
        });
    }

    token
        .chars()
        .enumerate()
        .map(|(column, character)| {
            Block::from_char(character).ok_or(FormatError::UnknownBlock {
                frame,
                row,
                column,
                character,
            })
        })
        .collect()
}
