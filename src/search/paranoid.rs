//! Paranoid search: the root color against a coalition of everyone else.
//!
//! Plain alpha-beta from the root color's point of view. Nodes where the root
//! color moves maximize; every other color minimizes. Table scores are only
//! trusted for cutoffs when they were written by the search of the same root.

use crate::search::board_scoring::{score_at_ply, score_from_table};
use crate::search::iterative_deepening::{RootResult, SearchContext, INFINITY};
use crate::search::transposition_table::NodeType;

pub fn search_root(context: &mut SearchContext<'_>, depth: u8) -> Option<RootResult> {
    if context.should_stop() {
        return None;
    }
    context.nodes += 1;

    let entry = context.tt.get(context.position.zobrist_key());
    let hint = context.tt_hint(entry);
    let moves = context.ordered_moves(hint, 0);

    let mut alpha = -INFINITY;
    let mut best: Option<RootResult> = None;
    for mv in moves {
        context.position.make_move(mv);
        let score = paranoid(context, depth - 1, 1, alpha, INFINITY);
        context.position.unmake_move();
        let score = score?;

        if best.map_or(true, |current| score > current.score) {
            best = Some(RootResult {
                best_move: mv,
                score,
            });
        }
        alpha = alpha.max(score);
    }

    let best = best?;
    context.store(Some(best.best_move), depth, 0, best.score, NodeType::Exact);
    Some(best)
}

fn paranoid(
    context: &mut SearchContext<'_>,
    depth: u8,
    ply: u32,
    mut alpha: i32,
    mut beta: i32,
) -> Option<i32> {
    if context.should_stop() {
        return None;
    }
    context.nodes += 1;

    if context.is_leaf(depth, ply) {
        context.leaves += 1;
        let score = context.scorer.score_for(&context.position, context.root);
        return Some(score_at_ply(score, ply));
    }

    let alpha_orig = alpha;
    let beta_orig = beta;
    let entry = context.tt.get(context.position.zobrist_key());
    if let Some(entry) = entry.filter(|entry| {
        entry.game_ply == context.root_ply && entry.depth >= i16::from(depth)
    }) {
        let score = score_from_table(entry.score, ply);
        match entry.node_type {
            NodeType::Exact => return Some(score),
            NodeType::LowerBound => alpha = alpha.max(score),
            NodeType::UpperBound => beta = beta.min(score),
        }
        if alpha >= beta {
            return Some(score);
        }
    }

    let hint = context.tt_hint(entry);
    let moves = context.ordered_moves(hint, ply);
    let maximizing = context.position.to_move() == context.root;

    let mut best_score = if maximizing { -INFINITY } else { INFINITY };
    let mut best_move = None;
    for mv in moves {
        context.position.make_move(mv);
        let score = paranoid(context, depth - 1, ply + 1, alpha, beta);
        context.position.unmake_move();
        let score = score?;

        if maximizing {
            if score > best_score {
                best_score = score;
                best_move = Some(mv);
            }
            alpha = alpha.max(score);
        } else {
            if score < best_score {
                best_score = score;
                best_move = Some(mv);
            }
            beta = beta.min(score);
        }

        if alpha >= beta {
            context
                .ordering
                .record_cutoff(context.position.state(), ply as usize, mv, depth);
            break;
        }
    }

    let node_type = if best_score <= alpha_orig {
        NodeType::UpperBound
    } else if best_score >= beta_orig {
        NodeType::LowerBound
    } else {
        NodeType::Exact
    };
    context.store(best_move, depth, ply, best_score, node_type);
    Some(best_score)
}
