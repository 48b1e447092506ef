//! Error types used throughout the engine.
//!
//! Malformed caller input (position text, coordinates, move text, option
//! strings) is reported through the structured enums below. Rejections of a
//! well-formed request against the current game state use
//! [`MoveRejection`], since those are expected and frequent in interactive
//! play. Internal invariant violations are not represented here: they panic.

use thiserror::Error;

use crate::game_state::chess_types::Color;

/// Failure to parse coordinate text such as `d2` or `k14`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordError {
    #[error("empty coordinate text")]
    Empty,

    #[error("invalid file letter '{0}'")]
    InvalidFile(char),

    #[error("invalid rank in coordinate '{0}'")]
    InvalidRank(String),

    /// File and rank are individually valid but name one of the removed corner cells.
    #[error("coordinate '{0}' is not on the board")]
    OffBoard(String),
}

/// Failure to parse the four-player position text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Fen4Error {
    #[error("malformed position text at byte {position}: {message}")]
    Malformed { position: usize, message: String },

    #[error("board row {row} spans {width} squares, expected 14")]
    RowWidth { row: usize, width: usize },

    #[error("{color} has {count} kings, expected exactly one")]
    KingCount { color: Color, count: usize },

    #[error("{color} has pieces but no king")]
    MissingKing { color: Color },
}

/// Failure to parse a move in wire form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveParseError {
    #[error(transparent)]
    Coord(#[from] CoordError),

    #[error("unknown promotion piece '{0}'")]
    InvalidPromotionPiece(String),

    #[error("invalid move text '{0}'")]
    InvalidMoveText(String),
}

/// Reasons a submitted move is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveRejection {
    #[error("the game is over")]
    GameOver,

    #[error("move is not legal in the current position")]
    NotLegal,

    #[error("move reaches the promotion line and needs a promotion piece")]
    PromotionRequired,

    #[error("a promotion piece was given for a move that does not promote")]
    PromotionNotAllowed,

    #[error(transparent)]
    Parse(#[from] MoveParseError),
}

/// Failure to apply a named engine option.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown option '{0}'")]
    UnknownOption(String),

    #[error("invalid value '{value}' for option '{name}'")]
    InvalidValue { name: String, value: String },
}

/// Failure surfaced by a background search task.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("search worker failed: {0}")]
    WorkerFailed(String),

    #[error("search worker disconnected without reporting completion")]
    Disconnected,
}
