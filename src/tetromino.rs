//! Tetromino definitions and shapes
//!
//! All 7 tetrominoes with a fixed 4-state offset table per shape. The table is
//! plain data: rotation does not pivot around the visual center, it just
//! selects another row of offsets relative to the same origin.

use std::fmt;
use std::str::FromStr;

/// An RGB color triple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// The 7 tetromino types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeType {
    I, // Cyan - long bar
    O, // Yellow - square
    T, // Purple - T-shape
    L, // Orange - L-shape
    J, // Blue - J-shape
    S, // Green - S-shape
    Z, // Red - Z-shape
}

/// Offsets (dx, dy) for one rotation state; dy grows downward
type Offsets = [(i32, i32); 4];

const I_FLAT: Offsets = [(0, 0), (1, 0), (2, 0), (3, 0)];
const I_UPRIGHT: Offsets = [(1, 0), (1, 1), (1, 2), (1, 3)];
const O_SQUARE: Offsets = [(0, 0), (1, 0), (0, 1), (1, 1)];
const S_FLAT: Offsets = [(1, 0), (2, 0), (0, 1), (1, 1)];
const S_UPRIGHT: Offsets = [(1, 0), (1, 1), (2, 1), (2, 2)];
const Z_FLAT: Offsets = [(0, 0), (1, 0), (1, 1), (2, 1)];
const Z_UPRIGHT: Offsets = [(2, 0), (1, 1), (2, 1), (1, 2)];

impl ShapeType {
    /// All shape types, in table order
    pub const ALL: [ShapeType; 7] = [
        ShapeType::I,
        ShapeType::O,
        ShapeType::T,
        ShapeType::L,
        ShapeType::J,
        ShapeType::S,
        ShapeType::Z,
    ];

    /// Get the color for this tetromino
    pub fn color(&self) -> Rgb {
        match self {
            ShapeType::I => Rgb(0, 255, 255),
            ShapeType::O => Rgb(255, 255, 0),
            ShapeType::T => Rgb(128, 0, 128),
            ShapeType::L => Rgb(255, 165, 0),
            ShapeType::J => Rgb(0, 0, 255),
            ShapeType::S => Rgb(0, 255, 0),
            ShapeType::Z => Rgb(255, 0, 0),
        }
    }

    /// Get the 4 (dx, dy) offsets for this tetromino at a rotation state.
    /// `rotation` is read modulo 4.
    pub fn shape(&self, rotation: u8) -> Offsets {
        let rotation = rotation % 4;
        match self {
            ShapeType::I => {
                if rotation % 2 == 0 {
                    I_FLAT
                } else {
                    I_UPRIGHT
                }
            }
            ShapeType::O => O_SQUARE,
            ShapeType::T => match rotation {
                0 => [(1, 0), (0, 1), (1, 1), (2, 1)],
                1 => [(1, 0), (1, 1), (2, 1), (1, 2)],
                2 => [(0, 1), (1, 1), (2, 1), (1, 2)],
                _ => [(1, 0), (0, 1), (1, 1), (1, 2)],
            },
            ShapeType::L => match rotation {
                0 => [(2, 0), (0, 1), (1, 1), (2, 1)],
                1 => [(1, 0), (1, 1), (1, 2), (2, 2)],
                2 => [(0, 1), (1, 1), (2, 1), (0, 2)],
                _ => [(0, 0), (1, 0), (1, 1), (1, 2)],
            },
            ShapeType::J => match rotation {
                0 => [(0, 0), (0, 1), (1, 1), (2, 1)],
                1 => [(1, 0), (2, 0), (1, 1), (1, 2)],
                2 => [(0, 1), (1, 1), (2, 1), (2, 2)],
                _ => [(1, 0), (1, 1), (0, 2), (1, 2)],
            },
            ShapeType::S => {
                if rotation % 2 == 0 {
                    S_FLAT
                } else {
                    S_UPRIGHT
                }
            }
            ShapeType::Z => {
                if rotation % 2 == 0 {
                    Z_FLAT
                } else {
                    Z_UPRIGHT
                }
            }
        }
    }

    /// Single-letter symbol of this shape
    pub fn symbol(&self) -> char {
        match self {
            ShapeType::I => 'I',
            ShapeType::O => 'O',
            ShapeType::T => 'T',
            ShapeType::L => 'L',
            ShapeType::J => 'J',
            ShapeType::S => 'S',
            ShapeType::Z => 'Z',
        }
    }
}

impl FromStr for ShapeType {
    type Err = TetrominoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ShapeType::ALL
            .into_iter()
            .find(|shape| s.len() == 1 && s.starts_with(shape.symbol()))
            .ok_or_else(|| TetrominoError::UnknownShape(s.to_string()))
    }
}

impl fmt::Display for ShapeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Construction failure for a tetromino
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TetrominoError {
    /// Symbol is not one of I, O, T, L, J, S, Z
    UnknownShape(String),
    /// Rotation outside 0..=3
    InvalidRotation(u8),
}

impl fmt::Display for TetrominoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TetrominoError::UnknownShape(s) => {
                write!(f, "invalid shape type {s:?}, expected one of I, O, T, L, J, S, Z")
            }
            TetrominoError::InvalidRotation(r) => {
                write!(f, "invalid rotation {r}, expected 0, 1, 2 or 3")
            }
        }
    }
}

impl std::error::Error for TetrominoError {}

/// A tetromino value: shape, origin and rotation.
///
/// Tetrominoes are immutable. Moving or rotating returns a new value and
/// leaves the original untouched, so a candidate position can be checked
/// against the playfield before it replaces the active piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tetromino {
    shape_type: ShapeType,
    x: i32,
    y: i32,
    rotation: u8,
}

impl Tetromino {
    /// Create a tetromino, rejecting rotations outside 0..=3
    pub fn new(shape_type: ShapeType, x: i32, y: i32, rotation: u8) -> Result<Self, TetrominoError> {
        if rotation > 3 {
            return Err(TetrominoError::InvalidRotation(rotation));
        }
        Ok(Self {
            shape_type,
            x,
            y,
            rotation,
        })
    }

    /// Create a tetromino in rotation state 0
    pub fn at(shape_type: ShapeType, x: i32, y: i32) -> Self {
        Self {
            shape_type,
            x,
            y,
            rotation: 0,
        }
    }

    /// Create a tetromino from its single-letter symbol ("I", "O", ...)
    pub fn from_symbol(symbol: &str, x: i32, y: i32, rotation: u8) -> Result<Self, TetrominoError> {
        Self::new(symbol.parse()?, x, y, rotation)
    }

    pub fn shape_type(&self) -> ShapeType {
        self.shape_type
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn rotation(&self) -> u8 {
        self.rotation
    }

    pub fn color(&self) -> Rgb {
        self.shape_type.color()
    }

    /// The 4 offsets of the current shape and rotation
    pub fn blocks(&self) -> Offsets {
        self.shape_type.shape(self.rotation)
    }

    /// The 4 grid positions (x, y) this tetromino occupies
    pub fn absolute_blocks(&self) -> [(i32, i32); 4] {
        self.blocks().map(|(dx, dy)| (self.x + dx, self.y + dy))
    }

    /// A copy shifted by (dx, dy)
    pub fn move_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// A copy in the next clockwise rotation state, same origin
    pub fn rotate_clockwise(&self) -> Self {
        Self {
            rotation: (self.rotation + 1) % 4,
            ..*self
        }
    }
}
