use std::sync::atomic::AtomicBool;

use crate::engines::engine_trait::Engine;
use crate::game_state::position::Position;
use crate::search::board_scoring::MaterialScorer;
use crate::search::iterative_deepening::{
    iterative_deepening, DepthSearch, SearchLimits, SearchUpdate,
};
use crate::search::transposition_table::TranspositionTable;
use crate::search::{hypermax, paranoid};

/// Iterative deepening over one of the tree search strategies.
pub struct IterativeEngine {
    name: &'static str,
    search: DepthSearch,
    limits: SearchLimits,
    scorer: MaterialScorer,
}

impl IterativeEngine {
    pub fn paranoid(limits: SearchLimits) -> Self {
        Self {
            name: "paranoid",
            search: paranoid::search_root,
            limits,
            scorer: MaterialScorer,
        }
    }

    pub fn hypermax(limits: SearchLimits) -> Self {
        Self {
            name: "hypermax",
            search: hypermax::search_root,
            limits,
            scorer: MaterialScorer,
        }
    }
}

impl Engine for IterativeEngine {
    fn name(&self) -> &str {
        self.name
    }

    fn search(
        &mut self,
        position: &Position,
        tt: &mut TranspositionTable,
        cancel: &AtomicBool,
        report: &mut dyn FnMut(&SearchUpdate),
    ) -> Option<SearchUpdate> {
        iterative_deepening(
            position,
            self.search,
            self.limits,
            tt,
            &self.scorer,
            cancel,
            report,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_every_depth_up_to_the_limit() {
        let position = Position::start();
        let mut tt = TranspositionTable::new(14);
        let cancel = AtomicBool::new(false);
        let mut engine = IterativeEngine::hypermax(SearchLimits {
            max_depth: 2,
            movetime: None,
        });

        let mut depths = Vec::new();
        let last = engine
            .search(&position, &mut tt, &cancel, &mut |update| {
                depths.push(update.depth)
            })
            .expect("start position has moves");
        assert_eq!(depths, vec![1, 2]);
        assert_eq!(last.depth, 2);
        assert!(position.is_legal(last.best_move().expect("pv is never empty")));
    }
}
