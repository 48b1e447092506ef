//! In-place state transitions with incremental hash maintenance.
//!
//! Every fact that changes is XORed out of the running key before the change
//! and back in afterwards. Castling and en-passant keys are toggled as whole
//! groups, which makes the bookkeeping symmetric even when nothing changed.

use tracing::debug;

use crate::game_state::chess_rules::{castle_for_king_move, castle_spec};
use crate::game_state::chess_types::*;
use crate::game_state::undo_state::PositionState;
use crate::move_generation::legal_move_shared::chebyshev_distance;
use crate::move_generation::legal_moves_pawn::en_passant_victim;
use crate::search::zobrist::ZobristKeys;

/// What kind of move a legal `Move` is, inferred from the board before it is
/// played.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    Quiet,
    DoubleStep,
    Capture(Piece),
    EnPassant { victim: Coord },
    Castle(CastleSide),
}

impl MoveKind {
    #[inline]
    pub fn is_capture(self) -> bool {
        matches!(self, MoveKind::Capture(_) | MoveKind::EnPassant { .. })
    }
}

pub fn classify_move(state: &PositionState, mv: Move) -> MoveKind {
    let Some(piece) = state.piece_at(mv.from) else {
        panic!("move {mv} starts on an empty square");
    };

    if let Some(target) = state.piece_at(mv.to) {
        return MoveKind::Capture(target);
    }

    match piece.kind {
        PieceKind::King if chebyshev_distance(mv.from, mv.to) == 2 => {
            match castle_for_king_move(piece.color, mv.from, mv.to) {
                Some(spec) => MoveKind::Castle(spec.side),
                None => panic!("king move {mv} spans two squares but is not a castle"),
            }
        }
        PieceKind::Pawn => {
            if chebyshev_distance(mv.from, mv.to) == 2 {
                MoveKind::DoubleStep
            } else if mv.from.file() != mv.to.file() && mv.from.rank() != mv.to.rank() {
                match en_passant_victim(state, piece.color, mv.to) {
                    Some(victim) => MoveKind::EnPassant { victim },
                    None => panic!("pawn move {mv} is diagonal onto an empty square"),
                }
            } else {
                MoveKind::Quiet
            }
        }
        _ => MoveKind::Quiet,
    }
}

/// Play `mv` on `state` and hand the turn to the next active color. Does not
/// resolve eliminations; the owning `Position` runs that loop.
pub fn apply_move(state: &mut PositionState, keys: &ZobristKeys, mv: Move) {
    let kind = classify_move(state, mv);
    let mover = state.to_move;

    state.zobrist_key ^= keys.castling_all(state.castling_rights);
    state.zobrist_key ^= keys.en_passant_all(&state.en_passant);

    match kind {
        MoveKind::Capture(_) => {
            let captured = state.take_piece(mv.to);
            state.zobrist_key ^= keys.piece_square(captured, mv.to);
        }
        MoveKind::EnPassant { victim } => {
            let captured = state.take_piece(victim);
            state.zobrist_key ^= keys.piece_square(captured, victim);
        }
        _ => {}
    }

    let piece = state.shift_piece(mv.from, mv.to);
    state.zobrist_key ^= keys.piece_square(piece, mv.from);
    match mv.promotion {
        Some(promoted_kind) => {
            state.take_piece(mv.to);
            let promoted = Piece::new(promoted_kind, piece.color);
            state.put_piece(mv.to, promoted);
            state.zobrist_key ^= keys.piece_square(promoted, mv.to);
        }
        None => state.zobrist_key ^= keys.piece_square(piece, mv.to),
    }

    if let MoveKind::Castle(side) = kind {
        let spec = castle_spec(mover, side);
        let rook = state.shift_piece(spec.rook_from, spec.rook_to);
        state.zobrist_key ^= keys.piece_square(rook, spec.rook_from);
        state.zobrist_key ^= keys.piece_square(rook, spec.rook_to);
    }

    update_castling_rights(state, piece, mv);

    state.en_passant = [None; 4];
    if kind == MoveKind::DoubleStep {
        let (df, dr) = mover.forward();
        state.en_passant[mover.index()] = mv.from.offset(df, dr);
    }

    state.zobrist_key ^= keys.castling_all(state.castling_rights);
    state.zobrist_key ^= keys.en_passant_all(&state.en_passant);

    if kind.is_capture() || piece.kind == PieceKind::Pawn {
        state.ply_since_progress = 0;
    } else {
        state.ply_since_progress += 1;
    }
    state.game_ply += 1;

    let next = state.next_active_after(mover);
    pass_turn(state, keys, next);
}

fn update_castling_rights(state: &mut PositionState, piece: Piece, mv: Move) {
    if piece.kind == PieceKind::King {
        state.castling_rights.clear_color(piece.color);
    }
    for color in Color::ALL {
        for side in CastleSide::BOTH {
            let rook_home = castle_spec(color, side).rook_from;
            if mv.from == rook_home || mv.to == rook_home {
                state.castling_rights.set(color, side, false);
            }
        }
    }
}

fn pass_turn(state: &mut PositionState, keys: &ZobristKeys, next: Color) {
    state.zobrist_key ^= keys.to_move(state.to_move);
    state.to_move = next;
    state.zobrist_key ^= keys.to_move(state.to_move);
}

/// Remove `color` from play. Its pieces stay on the board; its en-passant
/// target is dropped and, if it was on move, the turn passes on.
pub fn eliminate_color(state: &mut PositionState, keys: &ZobristKeys, color: Color) {
    assert!(state.is_active(color), "{color} is already eliminated");

    state.eliminated.insert(color);
    state.zobrist_key ^= keys.eliminated(color);

    if let Some(target) = state.en_passant[color.index()].take() {
        state.zobrist_key ^= keys.en_passant(color, target);
    }

    if state.to_move == color {
        let next = state.next_active_after(color);
        pass_turn(state, keys, next);
    }

    debug!(
        "[ELIMINATE] {color} out at game ply {}, {} colors remain",
        state.game_ply,
        state.active_count()
    );
}
