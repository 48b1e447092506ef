//! Short algebraic notation for display and principal variations.
//!
//! `Nf3`, `exd3`, `Rdd5`, `e14=Q`, `O-O`. A trailing `#` marks a move after
//! which some color is eliminated while in check; `+` marks a move that leaves
//! any active king in check.

use crate::game_state::chess_types::*;
use crate::game_state::position::Position;
use crate::move_generation::legal_move_apply::{classify_move, MoveKind};
use crate::move_generation::legal_move_checks::is_attacked_by_opponents;
use crate::utils::algebraic::{coord_to_algebraic, file_char};

/// Notate `mv`, which must be legal in `position`. The position is left as
/// it was found.
pub fn notate_move(position: &mut Position, mv: Move) -> String {
    let Some(piece) = position.piece_at(mv.from) else {
        panic!("notate_move: no piece on {}", mv.from);
    };
    let kind = classify_move(position.state(), mv);

    let mut text = match kind {
        MoveKind::Castle(CastleSide::KingSide) => "O-O".to_owned(),
        MoveKind::Castle(CastleSide::QueenSide) => "O-O-O".to_owned(),
        _ => describe_move(position, mv, piece, kind.is_capture()),
    };

    text.push_str(check_suffix(position, mv));
    text
}

fn describe_move(position: &Position, mv: Move, piece: Piece, capture: bool) -> String {
    let mut text = String::new();

    if piece.kind == PieceKind::Pawn {
        if capture {
            text.push(file_char(mv.from.file()));
        }
    } else {
        text.push(piece.kind.letter());
        text.push_str(&disambiguation(position, mv, piece));
    }

    if capture {
        text.push('x');
    }
    text.push_str(&coord_to_algebraic(mv.to));

    if let Some(promoted) = mv.promotion {
        text.push('=');
        text.push(promoted.letter());
    }
    text
}

/// Source file, rank, or both, as needed to tell `mv` apart from other legal
/// moves of the same piece type to the same square.
fn disambiguation(position: &Position, mv: Move, piece: Piece) -> String {
    let rivals: Vec<Coord> = position
        .legal_moves()
        .iter()
        .filter(|other| other.to == mv.to && other.from != mv.from)
        .filter(|other| position.piece_at(other.from) == Some(piece))
        .map(|other| other.from)
        .collect();

    if rivals.is_empty() {
        return String::new();
    }
    let file = file_char(mv.from.file()).to_string();
    let rank = (mv.from.rank() + 1).to_string();
    if rivals.iter().all(|from| from.file() != mv.from.file()) {
        file
    } else if rivals.iter().all(|from| from.rank() != mv.from.rank()) {
        rank
    } else {
        file + &rank
    }
}

fn check_suffix(position: &mut Position, mv: Move) -> &'static str {
    let active_before: Vec<Color> = position.state().active_colors().collect();
    position.make_move(mv);

    let mated = active_before.iter().any(|color| {
        let state = position.state();
        !state.is_active(*color)
            && state
                .king_square(*color)
                .is_some_and(|king| is_attacked_by_opponents(state, king, *color, None))
    });
    let checked = Color::ALL
        .iter()
        .any(|color| position.is_active(*color) && position.in_check(*color));

    position.unmake_move();

    if mated {
        "#"
    } else if checked {
        "+"
    } else {
        ""
    }
}
