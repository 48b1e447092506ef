use crate::game_state::chess_rules::castle_spec;
use crate::game_state::chess_types::*;
use crate::game_state::undo_state::PositionState;
use crate::move_generation::legal_move_checks::is_attacked_by_opponents;
use crate::move_generation::legal_move_shared::{push_step_moves, KING_OFFSETS};

pub fn generate_king_moves(state: &PositionState, color: Color, out: &mut Vec<Move>) {
    let Some(from) = state.king_square(color) else {
        return;
    };
    push_step_moves(state, color, from, &KING_OFFSETS, out);
    generate_castling_moves(state, color, from, out);
}

/// Castling moves that pass every precondition; the legality filter does not
/// need to revisit them.
fn generate_castling_moves(state: &PositionState, color: Color, king_from: Coord, out: &mut Vec<Move>) {
    for side in CastleSide::BOTH {
        if !state.castling_rights.has(color, side) {
            continue;
        }
        let spec = castle_spec(color, side);
        if spec.king_from != king_from {
            continue;
        }
        if state.piece_at(spec.rook_from) != Some(Piece::new(PieceKind::Rook, color)) {
            continue;
        }
        if spec.between().any(|sq| state.piece_at(sq).is_some()) {
            continue;
        }
        if spec
            .king_path()
            .into_iter()
            .any(|sq| is_attacked_by_opponents(state, sq, color, None))
        {
            continue;
        }
        out.push(Move::new(spec.king_from, spec.king_to));
    }
}
