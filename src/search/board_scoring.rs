//! Pluggable board evaluation.
//!
//! Scores are per color. The material scorer rates a color by its own
//! material minus the average material of the other active colors, so the
//! scores of the active colors roughly cancel in undecided positions.

use crate::game_state::chess_types::*;
use crate::game_state::position::Position;
use crate::game_state::undo_state::PositionState;

/// Score of a won game for the winner; losers get the negation.
pub const WIN_SCORE: i32 = 1_000_000;
/// Fixed score of an eliminated color in an undecided game.
pub const ELIMINATED_SCORE: i32 = -50_000;
/// Scores within this distance of `WIN_SCORE` are decisive.
pub const DECISIVE_MARGIN: i32 = 10_000;

pub trait BoardScorer: Send + Sync {
    /// Score from `color`'s point of view.
    fn score_for(&self, position: &Position, color: Color) -> i32;

    /// Scores of all four colors, indexed by `Color::index`.
    fn score_all(&self, position: &Position) -> [i32; 4] {
        Color::ALL.map(|color| self.score_for(position, color))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialScorer;

impl MaterialScorer {
    #[inline]
    pub const fn piece_value(kind: PieceKind) -> i32 {
        match kind {
            PieceKind::Pawn => 100,
            PieceKind::Knight => 300,
            PieceKind::Bishop => 450,
            PieceKind::Rook => 500,
            PieceKind::Queen => 900,
            PieceKind::King => 10_000,
        }
    }

    pub fn material(state: &PositionState, color: Color) -> i32 {
        PieceKind::ALL
            .iter()
            .map(|kind| state.pieces(color, *kind).len() as i32 * Self::piece_value(*kind))
            .sum()
    }
}

impl BoardScorer for MaterialScorer {
    fn score_for(&self, position: &Position, color: Color) -> i32 {
        match position.outcome() {
            Some(Outcome::Win(winner)) if winner == color => return WIN_SCORE,
            Some(Outcome::Win(_)) => return -WIN_SCORE,
            Some(Outcome::Draw(_)) => return 0,
            None => {}
        }

        let state = position.state();
        if !state.is_active(color) {
            return ELIMINATED_SCORE;
        }

        let (opponents, opponent_material) = state
            .active_colors()
            .filter(|other| *other != color)
            .fold((0, 0), |(count, total), other| {
                (count + 1, total + Self::material(state, other))
            });
        if opponents == 0 {
            return 0;
        }
        Self::material(state, color) - opponent_material / opponents
    }
}

/// Whether `score` reports a forced win or loss.
#[inline]
pub fn is_decisive(score: i32) -> bool {
    score.abs() >= WIN_SCORE - DECISIVE_MARGIN
}

/// Pull decisive scores towards zero by `ply` so quicker wins and slower
/// losses are preferred.
#[inline]
pub fn score_at_ply(score: i32, ply: u32) -> i32 {
    let ply = ply as i32;
    if score >= WIN_SCORE - DECISIVE_MARGIN {
        score - ply
    } else if score <= -WIN_SCORE + DECISIVE_MARGIN {
        score + ply
    } else {
        score
    }
}

/// Rebase a decisive score found at `ply` onto that node, so the table
/// stores the distance to the decision from the node itself.
#[inline]
pub fn score_to_table(score: i32, ply: u32) -> i32 {
    let ply = ply as i32;
    if score >= WIN_SCORE - DECISIVE_MARGIN {
        score + ply
    } else if score <= -WIN_SCORE + DECISIVE_MARGIN {
        score - ply
    } else {
        score
    }
}

/// Inverse of [`score_to_table`] for a node reached at `ply`.
#[inline]
pub fn score_from_table(score: i32, ply: u32) -> i32 {
    score_at_ply(score, ply)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_position_is_balanced() {
        let position = Position::start();
        let scorer = MaterialScorer;
        assert_eq!(scorer.score_all(&position), [0; 4]);
        assert_eq!(
            MaterialScorer::material(position.state(), Color::Red),
            8 * 100 + 2 * 300 + 2 * 450 + 2 * 500 + 900 + 10_000
        );
    }

    #[test]
    fn active_scores_nearly_cancel() {
        // Red is a rook up on three opponents.
        let position = Position::from_fen4(
            "R-0,0,0,0-0,0,0,0-0,0,0,0-0,0,0,0-0-\
             6,yK,7/14/14/bK,13/14/14/14/13,gK/14/14/14/14/3,rR,10/7,rK,6",
        )
        .expect("test position should parse");
        let scores = MaterialScorer.score_all(&position);
        assert_eq!(scores[Color::Red.index()], 500);
        assert!(scores[Color::Blue.index()] < 0);
        assert_eq!(scores.iter().sum::<i32>(), 500 - 3 * (500 / 3));
    }

    #[test]
    fn eliminated_and_decided_positions() {
        let mut position = Position::start();
        assert!(position.make_resignation(Color::Green));
        assert_eq!(MaterialScorer.score_for(&position, Color::Green), ELIMINATED_SCORE);

        assert!(position.make_resignation(Color::Blue));
        assert!(position.make_resignation(Color::Yellow));
        assert_eq!(MaterialScorer.score_for(&position, Color::Red), WIN_SCORE);
        assert_eq!(MaterialScorer.score_for(&position, Color::Blue), -WIN_SCORE);
        assert!(is_decisive(score_at_ply(WIN_SCORE, 3)));
        assert_eq!(score_at_ply(-WIN_SCORE, 3), -WIN_SCORE + 3);
        assert_eq!(score_at_ply(250, 3), 250);
    }

    #[test]
    fn table_scores_are_relative_to_their_node() {
        // A win two plies below a node first seen at ply 3.
        let found = score_at_ply(WIN_SCORE, 5);
        let stored = score_to_table(found, 3);
        assert_eq!(stored, WIN_SCORE - 2);
        assert_eq!(score_from_table(stored, 3), found);
        // Reached at ply 1 through a transposition, the win is now three away.
        assert_eq!(score_from_table(stored, 1), WIN_SCORE - 3);
        assert_eq!(score_from_table(score_to_table(-WIN_SCORE + 4, 4), 2), -WIN_SCORE + 2);
        assert_eq!(score_to_table(-250, 6), -250);
    }
}
