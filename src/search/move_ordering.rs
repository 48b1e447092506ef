//! Move ordering heuristics shared by both search strategies.
//!
//! Order: transposition-table move (exact entries first), captures by
//! victim and attacker value, promotions, killer moves, then quiet moves by
//! history score.

use crate::game_state::chess_types::*;
use crate::game_state::undo_state::PositionState;
use crate::move_generation::legal_move_apply::{classify_move, MoveKind};
use crate::search::board_scoring::MaterialScorer;

/// Deepest ply with its own killer slots.
pub const MAX_PLY: usize = 64;
pub const KILLERS_PER_PLY: usize = 2;

const TT_EXACT_BONUS: i64 = 1_000_000_000;
const TT_BOUND_BONUS: i64 = 900_000_000;
const CAPTURE_BONUS: i64 = 100_000_000;
const PROMOTION_BONUS: i64 = 90_000_000;
const KILLER_BONUS: i64 = 80_000_000;
const HISTORY_CAP: i32 = 50_000_000;

/// Best move suggested by the transposition table for this node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtHint {
    pub mv: Move,
    pub exact: bool,
}

#[derive(Debug, Clone)]
pub struct MoveOrdering {
    killers: Vec<[Option<Move>; KILLERS_PER_PLY]>,
    /// `[color][from][to]` cutoff credit.
    history: Vec<i32>,
}

impl Default for MoveOrdering {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveOrdering {
    pub fn new() -> Self {
        Self {
            killers: vec![[None; KILLERS_PER_PLY]; MAX_PLY],
            history: vec![0; 4 * GRID_SIZE * GRID_SIZE],
        }
    }

    /// Killers only make sense within one iteration; history carries over.
    pub fn reset_iteration(&mut self) {
        self.killers.fill([None; KILLERS_PER_PLY]);
    }

    pub fn killers_at(&self, ply: usize) -> [Option<Move>; KILLERS_PER_PLY] {
        self.killers
            .get(ply)
            .copied()
            .unwrap_or([None; KILLERS_PER_PLY])
    }

    /// Most recent first, no duplicates.
    pub fn record_killer(&mut self, ply: usize, mv: Move) {
        let Some(slots) = self.killers.get_mut(ply) else {
            return;
        };
        if slots[0] == Some(mv) {
            return;
        }
        let existing = slots.iter().position(|slot| *slot == Some(mv));
        let shift_end = existing.unwrap_or(KILLERS_PER_PLY - 1);
        for index in (1..=shift_end).rev() {
            slots[index] = slots[index - 1];
        }
        slots[0] = Some(mv);
    }

    #[inline]
    fn history_index(color: Color, mv: Move) -> usize {
        (color.index() * GRID_SIZE + mv.from.index()) * GRID_SIZE + mv.to.index()
    }

    pub fn record_history(&mut self, color: Color, mv: Move, depth: u8) {
        let bonus = i32::from(depth) * i32::from(depth);
        let entry = &mut self.history[Self::history_index(color, mv)];
        *entry = (*entry + bonus).min(HISTORY_CAP);
    }

    #[inline]
    pub fn history_score(&self, color: Color, mv: Move) -> i32 {
        self.history[Self::history_index(color, mv)]
    }

    /// Credit a move that caused a cutoff. Captures and promotions are
    /// already ordered early, so only quiet moves are remembered.
    pub fn record_cutoff(&mut self, state: &PositionState, ply: usize, mv: Move, depth: u8) {
        if is_quiet(state, mv) {
            self.record_killer(ply, mv);
            self.record_history(state.to_move, mv, depth);
        }
    }

    pub fn score_move(
        &self,
        state: &PositionState,
        mv: Move,
        tt_hint: Option<TtHint>,
        ply: usize,
    ) -> i64 {
        if let Some(hint) = tt_hint.filter(|hint| hint.mv == mv) {
            return if hint.exact {
                TT_EXACT_BONUS
            } else {
                TT_BOUND_BONUS
            };
        }

        let attacker = state
            .piece_at(mv.from)
            .map_or(0, |piece| MaterialScorer::piece_value(piece.kind));
        let victim = match classify_move(state, mv) {
            MoveKind::Capture(piece) => Some(MaterialScorer::piece_value(piece.kind)),
            MoveKind::EnPassant { .. } => Some(MaterialScorer::piece_value(PieceKind::Pawn)),
            _ => None,
        };
        if let Some(victim) = victim {
            return CAPTURE_BONUS + i64::from(victim) * 10 - i64::from(attacker) / 10;
        }

        if let Some(promoted) = mv.promotion {
            return PROMOTION_BONUS + i64::from(MaterialScorer::piece_value(promoted));
        }

        let killers = self.killers_at(ply);
        if let Some(slot) = killers.iter().position(|killer| *killer == Some(mv)) {
            return KILLER_BONUS - slot as i64;
        }

        i64::from(self.history_score(state.to_move, mv))
    }

    /// Sort `moves` best first. Ties keep generation order.
    pub fn order_moves(
        &self,
        state: &PositionState,
        moves: &mut [Move],
        tt_hint: Option<TtHint>,
        ply: usize,
    ) {
        moves.sort_by_cached_key(|mv| -self.score_move(state, *mv, tt_hint, ply));
    }
}

fn is_quiet(state: &PositionState, mv: Move) -> bool {
    mv.promotion.is_none() && !classify_move(state, mv).is_capture()
}
