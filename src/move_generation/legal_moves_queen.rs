use crate::game_state::chess_types::*;
use crate::game_state::undo_state::PositionState;
use crate::move_generation::legal_move_shared::{
    push_slide_moves, DIAGONAL_DIRECTIONS, ORTHOGONAL_DIRECTIONS,
};

pub fn generate_queen_moves(state: &PositionState, color: Color, out: &mut Vec<Move>) {
    for from in state.pieces(color, PieceKind::Queen).iter() {
        push_slide_moves(state, color, from, &ORTHOGONAL_DIRECTIONS, out);
        push_slide_moves(state, color, from, &DIAGONAL_DIRECTIONS, out);
    }
}
