//! Random-move baseline.
//!
//! Picks uniformly among the legal moves and reports it as a single depth-1
//! update. Used as a sparring opponent and in tests, not as a real search.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use rand::prelude::IndexedRandom;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use crate::engines::engine_trait::Engine;
use crate::game_state::position::Position;
use crate::search::board_scoring::{BoardScorer, MaterialScorer};
use crate::search::iterative_deepening::{PvMove, SearchUpdate};
use crate::search::transposition_table::TranspositionTable;
use crate::utils::notation::notate_move;

pub struct RandomEngine {
    rng: StdRng,
}

impl RandomEngine {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Engine for RandomEngine {
    fn name(&self) -> &str {
        "random"
    }

    fn search(
        &mut self,
        position: &Position,
        _tt: &mut TranspositionTable,
        cancel: &AtomicBool,
        report: &mut dyn FnMut(&SearchUpdate),
    ) -> Option<SearchUpdate> {
        if position.is_game_over() || cancel.load(Ordering::Relaxed) {
            return None;
        }
        let started_at = Instant::now();
        let mv = *position.legal_moves().choose(&mut self.rng)?;

        let mut walk = position.clone();
        let root = walk.to_move();
        let notation = notate_move(&mut walk, mv);
        walk.make_move(mv);
        let update = SearchUpdate {
            depth: 1,
            evaluation: MaterialScorer.score_for(&walk, root),
            principal_variation: vec![PvMove { mv, notation }],
            nodes: 1,
            leaves: 1,
            elapsed: started_at.elapsed(),
        };
        debug!(
            "[RANDOM] picked {} of {} moves",
            update.principal_variation[0].notation,
            position.legal_moves().len()
        );
        report(&update);
        Some(update)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pick(seed: u64) -> SearchUpdate {
        let position = Position::start();
        let mut tt = TranspositionTable::new(4);
        let cancel = AtomicBool::new(false);
        let mut reports = 0;
        let update = RandomEngine::new(seed)
            .search(&position, &mut tt, &cancel, &mut |_| reports += 1)
            .expect("start position has moves");
        assert_eq!(reports, 1);
        assert!(position.is_legal(update.best_move().expect("one move")));
        update
    }

    #[test]
    fn same_seed_same_move() {
        assert_eq!(pick(11).best_move(), pick(11).best_move());
        assert_eq!(pick(11).depth, 1);
    }

    #[test]
    fn cancelled_before_start_reports_nothing() {
        let position = Position::start();
        let mut tt = TranspositionTable::new(4);
        let cancel = AtomicBool::new(true);
        let result = RandomEngine::new(1).search(&position, &mut tt, &cancel, &mut |_| {
            panic!("nothing to report")
        });
        assert!(result.is_none());
    }
}
