//! Long algebraic move text: `d2d4`, `e13e14q`.
//!
//! Two coordinates back to back, optionally followed by a lower-case
//! promotion letter. Since ranks may have one or two digits, the split point
//! is found by scanning for the second file letter.

use crate::errors::MoveParseError;
use crate::game_state::chess_types::{Move, PieceKind};
use crate::utils::algebraic::parse_algebraic_coord;

pub fn parse_long_algebraic(text: &str) -> Result<Move, MoveParseError> {
    let text = text.trim();
    if !text.is_ascii() {
        return Err(MoveParseError::InvalidMoveText(text.to_owned()));
    }

    let Some(split) = text
        .char_indices()
        .skip(1)
        .find(|(_, ch)| ch.is_ascii_alphabetic())
        .map(|(index, _)| index)
    else {
        return Err(MoveParseError::InvalidMoveText(text.to_owned()));
    };

    let from = parse_algebraic_coord(&text[..split])?;
    let rest = &text[split..];

    let rank_end = rest
        .char_indices()
        .skip(1)
        .find(|(_, ch)| !ch.is_ascii_digit())
        .map_or(rest.len(), |(index, _)| index);
    let to = parse_algebraic_coord(&rest[..rank_end])?;

    let promotion = match &rest[rank_end..] {
        "" => None,
        suffix => Some(parse_promotion_piece(suffix)?),
    };

    Ok(Move {
        from,
        to,
        promotion,
    })
}

/// Accepts a single letter (`q`, `R`) or a full name (`queen`, `Knight`).
pub fn parse_promotion_piece(text: &str) -> Result<PieceKind, MoveParseError> {
    let kind = match text.to_ascii_lowercase().as_str() {
        "q" | "queen" => PieceKind::Queen,
        "r" | "rook" => PieceKind::Rook,
        "b" | "bishop" => PieceKind::Bishop,
        "n" | "knight" => PieceKind::Knight,
        _ => return Err(MoveParseError::InvalidPromotionPiece(text.to_owned())),
    };
    Ok(kind)
}

pub fn move_to_long_algebraic(mv: Move) -> String {
    mv.to_string()
}
