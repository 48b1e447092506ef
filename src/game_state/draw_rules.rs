//! Claimable draw conditions, evaluated on demand.

use crate::game_state::chess_types::*;
use crate::game_state::undo_state::PositionState;

/// Plies without a capture or pawn move after which a draw may be claimed.
pub const FIFTY_MOVE_PLY_LIMIT: u32 = 99;

/// Earlier occurrences of the current position needed for a repetition claim.
pub const REPETITION_PRIOR_OCCURRENCES: usize = 2;

pub fn is_fifty_move_draw(state: &PositionState) -> bool {
    state.ply_since_progress > FIFTY_MOVE_PLY_LIMIT
}

/// The current position has already occurred twice with the same color to
/// move. Only whole rounds back to the last progress move are compared.
pub fn is_repetition_draw(state: &PositionState, history: &[PositionState]) -> bool {
    let round = state.active_count().max(1);
    let reach = (state.ply_since_progress as usize).min(history.len());

    let repeats = (round..=reach)
        .step_by(round)
        .filter(|back| history[history.len() - back].zobrist_key == state.zobrist_key)
        .count();
    repeats >= REPETITION_PRIOR_OCCURRENCES
}

/// No remaining color can ever deliver mate.
pub fn is_insufficient_material(state: &PositionState) -> bool {
    let mut extras: Vec<Vec<(PieceKind, Coord)>> = Vec::with_capacity(4);
    for color in state.active_colors() {
        extras.push(
            state
                .pieces_of(color)
                .filter(|(kind, _)| *kind != PieceKind::King)
                .collect(),
        );
    }

    if extras.iter().all(|pieces| pieces.is_empty()) {
        return true;
    }
    if extras.len() != 2 {
        return false;
    }

    match (extras[0].as_slice(), extras[1].as_slice()) {
        ([], [(kind, _)]) | ([(kind, _)], []) => {
            matches!(kind, PieceKind::Bishop | PieceKind::Knight)
        }
        ([(PieceKind::Bishop, a)], [(PieceKind::Bishop, b)]) => a.is_light() == b.is_light(),
        _ => false,
    }
}

pub fn claimable_draw(state: &PositionState, history: &[PositionState]) -> Option<DrawReason> {
    if is_repetition_draw(state, history) {
        Some(DrawReason::Repetition)
    } else if is_fifty_move_draw(state) {
        Some(DrawReason::FiftyMove)
    } else if is_insufficient_material(state) {
        Some(DrawReason::InsufficientMaterial)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(text: &str) -> Coord {
        text.parse().expect("test coordinate should parse")
    }

    fn two_kings_plus(extra: &[(&str, PieceKind, Color)]) -> PositionState {
        let mut state = PositionState::default();
        state.eliminated.insert(Color::Blue);
        state.eliminated.insert(Color::Green);
        state.put_piece(sq("h1"), Piece::new(PieceKind::King, Color::Red));
        state.put_piece(sq("g14"), Piece::new(PieceKind::King, Color::Yellow));
        for (coord, kind, color) in extra {
            state.put_piece(sq(coord), Piece::new(*kind, *color));
        }
        state
    }

    #[test]
    fn bare_kings_are_insufficient() {
        assert!(is_insufficient_material(&two_kings_plus(&[])));
    }

    #[test]
    fn single_minor_piece_is_insufficient() {
        let state = two_kings_plus(&[("e5", PieceKind::Knight, Color::Red)]);
        assert!(is_insufficient_material(&state));
        let state = two_kings_plus(&[("e5", PieceKind::Rook, Color::Red)]);
        assert!(!is_insufficient_material(&state));
    }

    #[test]
    fn opposing_bishops_need_matching_square_colors() {
        let same = two_kings_plus(&[
            ("e5", PieceKind::Bishop, Color::Red),
            ("g7", PieceKind::Bishop, Color::Yellow),
        ]);
        assert!(is_insufficient_material(&same));
        let opposite = two_kings_plus(&[
            ("e5", PieceKind::Bishop, Color::Red),
            ("g8", PieceKind::Bishop, Color::Yellow),
        ]);
        assert!(!is_insufficient_material(&opposite));
    }

    #[test]
    fn eliminated_material_does_not_count() {
        let state = two_kings_plus(&[("a5", PieceKind::Queen, Color::Blue)]);
        assert!(is_insufficient_material(&state));
    }

    #[test]
    fn fifty_move_boundary() {
        let mut state = PositionState::default();
        state.ply_since_progress = 99;
        assert!(!is_fifty_move_draw(&state));
        state.ply_since_progress = 100;
        assert!(is_fifty_move_draw(&state));
    }
}
