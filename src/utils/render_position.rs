//! Terminal-oriented board renderer.
//!
//! Draws the cross board as text for debugging, tests and diagnostics. Pieces
//! print as their position-text token (`rK`, `gP`), empty squares as `.` and
//! the removed corners as blanks.

use crate::game_state::chess_types::*;
use crate::game_state::undo_state::PositionState;
use crate::utils::algebraic::file_char;

pub fn render_position(state: &PositionState) -> String {
    let mut out = String::new();
    let footer = file_header();

    out.push_str(&footer);
    out.push('\n');

    for rank in (0..BOARD_WIDTH as u8).rev() {
        out.push_str(&format!("{:>2} ", rank + 1));
        for file in 0..BOARD_WIDTH as u8 {
            let cell = match Coord::new(file, rank) {
                None => "  ".to_owned(),
                Some(coord) => match state.piece_at(coord) {
                    Some(piece) => piece_label(piece, state.is_active(piece.color)),
                    None => " .".to_owned(),
                },
            };
            out.push_str(&cell);
            out.push(' ');
        }
        out.push_str(&format!("{}\n", rank + 1));
    }

    out.push_str(&footer);
    out.push('\n');
    out.push_str(&status_line(state));
    out
}

fn file_header() -> String {
    let files: Vec<String> = (0..BOARD_WIDTH as u8)
        .map(|file| format!(" {}", file_char(file)))
        .collect();
    format!("   {}", files.join(" "))
}

/// Pieces of eliminated colors print in upper case.
fn piece_label(piece: Piece, active: bool) -> String {
    let color = if active {
        piece.color.letter().to_ascii_lowercase()
    } else {
        piece.color.letter()
    };
    format!("{color}{}", piece.kind.letter())
}

fn status_line(state: &PositionState) -> String {
    match state.outcome {
        Some(Outcome::Win(color)) => format!("{color} wins"),
        Some(Outcome::Draw(reason)) => format!("draw ({reason:?})"),
        None => format!(
            "{} to move, ply clock {}",
            state.to_move, state.ply_since_progress
        ),
    }
}
