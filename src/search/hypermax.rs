//! Hypermax: n-player alpha pruning over score vectors.
//!
//! Every node returns the full four-color score vector of its best line for
//! the color to move. Each color keeps its own alpha, inherited from the
//! parent and raised only at nodes where that color moves. Because active
//! colors' scores roughly cancel, a node is pruned as soon as the alphas of
//! the active colors sum to zero or more: no remaining line can satisfy
//! everyone's guarantee at once.
//!
//! The table only supplies move ordering here. A node stores the mover's
//! component as `Exact` when all moves were searched and as `LowerBound`
//! when it was pruned.

use crate::game_state::chess_types::*;
use crate::search::board_scoring::score_at_ply;
use crate::search::iterative_deepening::{RootResult, SearchContext, INFINITY};
use crate::search::transposition_table::NodeType;

type Alphas = [i64; 4];
type Scores = [i32; 4];

pub fn search_root(context: &mut SearchContext<'_>, depth: u8) -> Option<RootResult> {
    let alphas = [-i64::from(INFINITY); 4];
    let (scores, best_move) = hypermax(context, depth, 0, alphas)?;
    Some(RootResult {
        best_move: best_move?,
        score: scores[context.root.index()],
    })
}

fn hypermax(
    context: &mut SearchContext<'_>,
    depth: u8,
    ply: u32,
    mut alphas: Alphas,
) -> Option<(Scores, Option<Move>)> {
    if context.should_stop() {
        return None;
    }
    context.nodes += 1;

    if context.is_leaf(depth, ply) {
        context.leaves += 1;
        let scores = context
            .scorer
            .score_all(&context.position)
            .map(|score| score_at_ply(score, ply));
        return Some((scores, None));
    }

    let mover = context.position.to_move();
    let m = mover.index();
    let entry = context.tt.get(context.position.zobrist_key());
    let hint = context.tt_hint(entry);
    let moves = context.ordered_moves(hint, ply);

    let mut best: Option<Scores> = None;
    let mut best_move = None;
    let mut pruned = false;
    for mv in moves {
        context.position.make_move(mv);
        let child = hypermax(context, depth - 1, ply + 1, alphas);
        context.position.unmake_move();
        let (scores, _) = child?;

        if best.map_or(true, |current| scores[m] > current[m]) {
            best = Some(scores);
            best_move = Some(mv);
        }
        alphas[m] = alphas[m].max(i64::from(scores[m]));

        if active_alpha_sum(context, &alphas) >= 0 {
            context
                .ordering
                .record_cutoff(context.position.state(), ply as usize, mv, depth);
            pruned = true;
            break;
        }
    }

    let best = best?;
    let node_type = if pruned {
        NodeType::LowerBound
    } else {
        NodeType::Exact
    };
    context.store(best_move, depth, ply, best[m], node_type);
    Some((best, best_move))
}

/// Sum of the alphas of colors still in the game at this node.
fn active_alpha_sum(context: &SearchContext<'_>, alphas: &Alphas) -> i64 {
    context
        .position
        .state()
        .active_colors()
        .map(|color| alphas[color.index()])
        .sum()
}
