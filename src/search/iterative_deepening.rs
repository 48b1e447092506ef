//! Iterative deepening driver shared by the tree search strategies.
//!
//! Each depth is searched from scratch on a private copy of the position.
//! After every completed depth an update with the principal variation is
//! reported. When cancellation or the move-time limit interrupts a depth, its
//! partial result is thrown away; the table keeps only the entries of nodes
//! that were searched to completion before the stop.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::game_state::chess_types::*;
use crate::game_state::position::Position;
use crate::search::board_scoring::{score_to_table, BoardScorer, WIN_SCORE};
use crate::search::move_ordering::{MoveOrdering, TtHint};
use crate::search::transposition_table::{NodeType, TTEntry, TranspositionTable};
use crate::utils::notation::notate_move;

/// Hard cap on iterative deepening depth.
pub const MAX_SEARCH_DEPTH: u8 = 30;
/// Bound above every reachable score.
pub const INFINITY: i32 = WIN_SCORE + 1_000;

const DEADLINE_POLL_MASK: u64 = 0xFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    pub max_depth: u8,
    pub movetime: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PvMove {
    pub mv: Move,
    pub notation: String,
}

/// Result of one completed depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchUpdate {
    pub depth: u8,
    /// Score for the color to move at the root.
    pub evaluation: i32,
    pub principal_variation: Vec<PvMove>,
    pub nodes: u64,
    pub leaves: u64,
    pub elapsed: Duration,
}

impl SearchUpdate {
    pub fn best_move(&self) -> Option<Move> {
        self.principal_variation.first().map(|pv| pv.mv)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RootResult {
    pub best_move: Move,
    pub score: i32,
}

/// One fixed-depth search from the context's root. `None` when interrupted.
pub type DepthSearch = fn(&mut SearchContext<'_>, u8) -> Option<RootResult>;

/// Mutable state threaded through one search.
pub struct SearchContext<'a> {
    pub position: Position,
    pub root: Color,
    pub root_ply: u32,
    pub tt: &'a mut TranspositionTable,
    pub ordering: MoveOrdering,
    pub scorer: &'a dyn BoardScorer,
    pub nodes: u64,
    pub leaves: u64,
    cancel: &'a AtomicBool,
    deadline: Option<Instant>,
    stopped: bool,
}

impl<'a> SearchContext<'a> {
    pub fn new(
        position: &Position,
        tt: &'a mut TranspositionTable,
        scorer: &'a dyn BoardScorer,
        cancel: &'a AtomicBool,
        deadline: Option<Instant>,
    ) -> Self {
        Self {
            position: position.clone(),
            root: position.to_move(),
            root_ply: position.state().game_ply,
            tt,
            ordering: MoveOrdering::new(),
            scorer,
            nodes: 0,
            leaves: 0,
            cancel,
            deadline,
            stopped: false,
        }
    }

    /// Polled at every node. Once set, stays set for the rest of the search.
    pub fn should_stop(&mut self) -> bool {
        if self.stopped {
            return true;
        }
        if self.cancel.load(Ordering::Relaxed) {
            self.stopped = true;
        } else if let Some(deadline) = self.deadline {
            if self.nodes & DEADLINE_POLL_MASK == 0 && Instant::now() >= deadline {
                self.stopped = true;
            }
        }
        self.stopped
    }

    /// Depth exhausted, game decided, or a draw could be claimed below the root.
    pub fn is_leaf(&self, depth: u8, ply: u32) -> bool {
        depth == 0 || self.position.is_game_over() || (ply > 0 && self.position.is_drawable())
    }

    /// Table move for the current node, if it is legal here.
    pub fn tt_hint(&self, entry: Option<TTEntry>) -> Option<TtHint> {
        let entry = entry?;
        let mv = entry.best_move?;
        self.position.is_legal(mv).then_some(TtHint {
            mv,
            exact: entry.node_type == NodeType::Exact,
        })
    }

    pub fn ordered_moves(&self, hint: Option<TtHint>, ply: u32) -> Vec<Move> {
        let mut moves = self.position.legal_moves().to_vec();
        self.ordering
            .order_moves(self.position.state(), &mut moves, hint, ply as usize);
        moves
    }

    /// Store the current node. `score` is root-relative and is rebased onto
    /// the node at `ply` before it goes into the table.
    pub fn store(
        &mut self,
        best_move: Option<Move>,
        depth: u8,
        ply: u32,
        score: i32,
        node_type: NodeType,
    ) {
        self.tt.put(TTEntry {
            key: self.position.zobrist_key(),
            best_move,
            depth: i16::from(depth),
            score: score_to_table(score, ply),
            node_type,
            game_ply: self.root_ply,
        });
    }
}

/// Deepen from 1 to `limits.max_depth`, calling `on_update` after each
/// completed depth. Returns the deepest completed update.
pub fn iterative_deepening(
    position: &Position,
    search: DepthSearch,
    limits: SearchLimits,
    tt: &mut TranspositionTable,
    scorer: &dyn BoardScorer,
    cancel: &AtomicBool,
    mut on_update: impl FnMut(&SearchUpdate),
) -> Option<SearchUpdate> {
    if position.is_game_over() || position.legal_moves().is_empty() {
        return None;
    }

    let started_at = Instant::now();
    let deadline = limits.movetime.map(|movetime| started_at + movetime);
    let max_depth = limits.max_depth.clamp(1, MAX_SEARCH_DEPTH);
    info!(
        "[SEARCH] {} to move, max depth {max_depth}, movetime {:?}",
        position.to_move(),
        limits.movetime
    );

    let mut context = SearchContext::new(position, tt, scorer, cancel, deadline);
    let mut last = None;

    for depth in 1..=max_depth {
        let iteration_start = Instant::now();
        context.nodes = 0;
        context.leaves = 0;
        context.ordering.reset_iteration();

        let Some(result) = search(&mut context, depth) else {
            debug!("[DEPTH] {depth} abandoned after {} nodes", context.nodes);
            break;
        };

        let update = SearchUpdate {
            depth,
            evaluation: result.score,
            principal_variation: principal_variation(
                position,
                &*context.tt,
                result.best_move,
                depth,
            ),
            nodes: context.nodes,
            leaves: context.leaves,
            elapsed: iteration_start.elapsed(),
        };
        debug!(
            "[DEPTH] {depth} eval {} nodes {} leaves {} pv {}",
            update.evaluation,
            update.nodes,
            update.leaves,
            update
                .principal_variation
                .iter()
                .map(|pv| pv.notation.as_str())
                .collect::<Vec<_>>()
                .join(" ")
        );
        on_update(&update);
        last = Some(update);
    }

    info!(
        "[SEARCH] finished at depth {} in {:?}",
        last.as_ref().map_or(0, |update| update.depth),
        started_at.elapsed()
    );
    last
}

/// Replay exact table moves from `position`, starting with `first`, for at
/// most `depth` plies. Stops at a repeated hash or a missing or illegal entry.
pub fn principal_variation(
    position: &Position,
    tt: &TranspositionTable,
    first: Move,
    depth: u8,
) -> Vec<PvMove> {
    let mut walk = position.clone();
    let mut visited = HashSet::new();
    let mut line = Vec::new();
    let mut next = Some(first);

    while let Some(mv) = next {
        if line.len() >= usize::from(depth)
            || !walk.is_legal(mv)
            || !visited.insert(walk.zobrist_key())
        {
            break;
        }
        let notation = notate_move(&mut walk, mv);
        walk.make_move(mv);
        line.push(PvMove { mv, notation });

        next = tt
            .peek(walk.zobrist_key())
            .filter(|entry| entry.node_type == NodeType::Exact)
            .and_then(|entry| entry.best_move);
    }
    line
}
