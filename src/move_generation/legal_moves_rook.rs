use crate::game_state::chess_types::*;
use crate::game_state::undo_state::PositionState;
use crate::move_generation::legal_move_shared::{push_slide_moves, ORTHOGONAL_DIRECTIONS};

pub fn generate_rook_moves(state: &PositionState, color: Color, out: &mut Vec<Move>) {
    for from in state.pieces(color, PieceKind::Rook).iter() {
        push_slide_moves(state, color, from, &ORTHOGONAL_DIRECTIONS, out);
    }
}
