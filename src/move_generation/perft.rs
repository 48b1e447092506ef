//! Move-path enumeration for validating the generator.
//!
//! Leaf counters describe the move that reached each leaf. Eliminations count
//! the colors knocked out by that move's closure loop; checks count leaves
//! where any active king is attacked.

use std::thread;

use crate::game_state::chess_types::*;
use crate::game_state::position::Position;
use crate::move_generation::legal_move_apply::{classify_move, MoveKind};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: usize,
    pub captures: usize,
    pub en_passant: usize,
    pub castles: usize,
    pub promotions: usize,
    pub eliminations: usize,
    pub checks: usize,
}

impl PerftCounts {
    fn merge(&mut self, rhs: PerftCounts) {
        self.nodes += rhs.nodes;
        self.captures += rhs.captures;
        self.en_passant += rhs.en_passant;
        self.castles += rhs.castles;
        self.promotions += rhs.promotions;
        self.eliminations += rhs.eliminations;
        self.checks += rhs.checks;
    }
}

/// Count leaves `depth` plies below `position`. The position is restored
/// before returning.
pub fn perft(position: &mut Position, depth: u8) -> PerftCounts {
    let mut total = PerftCounts::default();
    if depth == 0 {
        total.nodes = 1;
        return total;
    }

    let moves = position.legal_moves().to_vec();
    for mv in moves {
        perft_recurse(position, mv, depth, 1, &mut total);
    }
    total
}

/// Same counts as [`perft`], with each root move walked on its own thread.
pub fn perft_multi_threaded(position: &Position, depth: u8) -> PerftCounts {
    if depth == 0 {
        return PerftCounts {
            nodes: 1,
            ..PerftCounts::default()
        };
    }

    let root_moves = position.legal_moves().to_vec();
    let mut total = PerftCounts::default();
    thread::scope(|scope| {
        let handles: Vec<_> = root_moves
            .into_iter()
            .map(|mv| {
                let mut local_position = position.clone();
                scope.spawn(move || {
                    let mut local = PerftCounts::default();
                    perft_recurse(&mut local_position, mv, depth, 1, &mut local);
                    local
                })
            })
            .collect();

        for handle in handles {
            match handle.join() {
                Ok(local) => total.merge(local),
                Err(_) => panic!("perft worker thread panicked"),
            }
        }
    });
    total
}

fn perft_recurse(
    position: &mut Position,
    mv: Move,
    search_depth: u8,
    current_depth: u8,
    counts: &mut PerftCounts,
) {
    if current_depth == search_depth {
        count_leaf(position, mv, counts);
        return;
    }

    position.make_move(mv);
    let moves = position.legal_moves().to_vec();
    for child in moves {
        perft_recurse(position, child, search_depth, current_depth + 1, counts);
    }
    position.unmake_move();
}

fn count_leaf(position: &mut Position, mv: Move, counts: &mut PerftCounts) {
    counts.nodes += 1;

    match classify_move(position.state(), mv) {
        MoveKind::Capture(_) => counts.captures += 1,
        MoveKind::EnPassant { .. } => {
            counts.captures += 1;
            counts.en_passant += 1;
        }
        MoveKind::Castle(_) => counts.castles += 1,
        MoveKind::Quiet | MoveKind::DoubleStep => {}
    }
    if mv.promotion.is_some() {
        counts.promotions += 1;
    }

    let active_before = position.active_count();
    position.make_move(mv);
    counts.eliminations += active_before - position.active_count();
    if Color::ALL
        .iter()
        .any(|color| position.is_active(*color) && position.in_check(*color))
    {
        counts.checks += 1;
    }
    position.unmake_move();
}
