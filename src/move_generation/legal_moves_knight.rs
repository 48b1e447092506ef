use crate::game_state::chess_types::*;
use crate::game_state::undo_state::PositionState;
use crate::move_generation::legal_move_shared::{push_step_moves, KNIGHT_OFFSETS};

pub fn generate_knight_moves(state: &PositionState, color: Color, out: &mut Vec<Move>) {
    for from in state.pieces(color, PieceKind::Knight).iter() {
        push_step_moves(state, color, from, &KNIGHT_OFFSETS, out);
    }
}
