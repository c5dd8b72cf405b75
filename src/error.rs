//! Errors raised by grid access, search configuration and layout parsing

use std::fmt;

use thiserror::Error;

use crate::grid::Point;

/// Which end of the search a coordinate belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Start,
    End,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Start => write!(f, "start"),
            Endpoint::End => write!(f, "end"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("grid dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("{endpoint} {point} is outside the {width}x{height} grid")]
    Configuration {
        endpoint: Endpoint,
        point: Point,
        width: usize,
        height: usize,
    },

    #[error("cell {point} is out of bounds for a {width}x{height} grid")]
    OutOfBounds {
        point: Point,
        width: usize,
        height: usize,
    },

    #[error("unknown maze variant {0}, expected 1, 2 or 3")]
    UnknownVariant(u8),

    #[error("unexpected character `{found}` at x={x}, y={y}")]
    UnexpectedCharacter { found: char, x: usize, y: usize },

    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("layout is empty")]
    EmptyLayout,

    #[error("second {endpoint} at x={x}, y={y}")]
    DuplicateEndpoint { endpoint: Endpoint, x: usize, y: usize },

    #[error("{0} is not found in layout")]
    MissingEndpoint(Endpoint),

    #[error("invalid point `{0}`, expected `x,y`")]
    InvalidPoint(String),
}

pub type Result<T> = std::result::Result<T, Error>;
