use serde::{Deserialize, Serialize};

/// A single coloured cell in a frame.
///
/// The set is closed: anything else found in a movie file is a format error,
/// never a value of this type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Block {
    /// Background colour of every fresh frame
    #[default]
    LightGray,
    DarkGray,
    Red,
    Green,
    Blue,
}

impl Block {
    /// Every block, in the order they are offered as brushes
    pub const ALL: [Block; 5] = [
        Block::LightGray,
        Block::DarkGray,
        Block::Red,
        Block::Green,
        Block::Blue,
    ];

    /// Character used for this block in a movie file
    pub fn to_char(self) -> char {
        match self {
            Block::LightGray => 'l',
            Block::DarkGray => 'd',
            Block::Red => 'r',
            Block::Green => 'g',
            Block::Blue => 'b',
        }
    }

    /// Parse a movie file character (case-sensitive)
    pub fn from_char(character: char) -> Option<Self> {
        match character {
            'l' => Some(Block::LightGray),
            'd' => Some(Block::DarkGray),
            'r' => Some(Block::Red),
            'g' => Some(Block::Green),
            'b' => Some(Block::Blue),
            _ => None,
        }
    }

    /// Human readable name, e.g. for a status bar
    pub fn name(self) -> &'static str {
        match self {
            Block::LightGray => "Light gray",
            Block::DarkGray => "Dark gray",
            Block::Red => "Red",
            Block::Green => "Green",
            Block::Blue => "Blue",
        }
    }
}
