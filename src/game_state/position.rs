//! The mutable game position.
//!
//! `Position` owns the engine-internal state, an undo stack of full prior
//! states, the derived check/pin/attack sets and the legal-move list. Every
//! mutation ends with those derived values recomputed for the new state, so
//! callers can query them freely between moves.

use std::sync::Arc;

use tracing::debug;

use crate::errors::Fen4Error;
use crate::game_state::chess_rules::STARTING_POSITION_FEN4;
use crate::game_state::chess_types::*;
use crate::game_state::draw_rules;
use crate::game_state::undo_state::PositionState;
use crate::move_generation::legal_move_apply::{apply_move, eliminate_color};
use crate::move_generation::legal_move_checks::PositionAnalysis;
use crate::move_generation::legal_move_generator::generate_legal_moves;
use crate::search::zobrist::ZobristKeys;
use crate::utils::fen4_generator::generate_fen4;
use crate::utils::fen4_parser::parse_fen4;

/// The externally exchanged projection of a position. Carries no caches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fen4State {
    pub board: [Option<Piece>; GRID_SIZE],
    pub to_move: Color,
    pub eliminated: ColorSet,
    pub castling_rights: CastlingRights,
    pub en_passant: [Option<Coord>; 4],
    pub ply_since_progress: u32,
}

impl Fen4State {
    pub fn empty() -> Self {
        Self {
            board: [None; GRID_SIZE],
            to_move: Color::Red,
            eliminated: ColorSet::EMPTY,
            castling_rights: CastlingRights::NONE,
            en_passant: [None; 4],
            ply_since_progress: 0,
        }
    }

    #[inline]
    pub fn piece_at(&self, coord: Coord) -> Option<Piece> {
        self.board[coord.index()]
    }

    /// Expand into an engine state with piece lists built. The hash is left
    /// at zero for the caller to compute.
    pub fn to_state(&self) -> PositionState {
        let mut state = PositionState {
            to_move: self.to_move,
            eliminated: self.eliminated,
            castling_rights: self.castling_rights,
            en_passant: self.en_passant,
            ply_since_progress: self.ply_since_progress,
            ..PositionState::default()
        };
        for coord in Coord::all() {
            if let Some(piece) = self.piece_at(coord) {
                state.put_piece(coord, piece);
            }
        }
        state
    }

    pub fn from_state(state: &PositionState) -> Self {
        Self {
            board: state.board,
            to_move: state.to_move,
            eliminated: state.eliminated,
            castling_rights: state.castling_rights,
            en_passant: state.en_passant,
            ply_since_progress: state.ply_since_progress,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Position {
    state: PositionState,
    history: Vec<PositionState>,
    analysis: PositionAnalysis,
    legal_moves: Vec<Move>,
    keys: Arc<ZobristKeys>,
}

impl Position {
    /// Standard starting layout with the default hash tables.
    pub fn start() -> Self {
        match Self::from_fen4(STARTING_POSITION_FEN4) {
            Ok(position) => position,
            Err(err) => panic!("starting position text is invalid: {err}"),
        }
    }

    pub fn from_fen4(text: &str) -> Result<Self, Fen4Error> {
        Self::from_fen4_with_keys(text, Arc::new(ZobristKeys::default()))
    }

    pub fn from_fen4_with_keys(text: &str, keys: Arc<ZobristKeys>) -> Result<Self, Fen4Error> {
        let snapshot = parse_fen4(text)?;
        Ok(Self::from_snapshot(&snapshot, keys))
    }

    pub fn from_snapshot(snapshot: &Fen4State, keys: Arc<ZobristKeys>) -> Self {
        let mut state = snapshot.to_state();
        state.zobrist_key = keys.compute(&state);
        let mut position = Self {
            state,
            history: Vec::new(),
            analysis: PositionAnalysis::default(),
            legal_moves: Vec::new(),
            keys,
        };
        position.settle_turn();
        position
    }

    pub fn snapshot(&self) -> Fen4State {
        Fen4State::from_state(&self.state)
    }

    pub fn fen4(&self) -> String {
        generate_fen4(&self.snapshot())
    }

    #[inline]
    pub fn state(&self) -> &PositionState {
        &self.state
    }

    #[inline]
    pub fn keys(&self) -> &Arc<ZobristKeys> {
        &self.keys
    }

    #[inline]
    pub fn history(&self) -> &[PositionState] {
        &self.history
    }

    #[inline]
    pub fn to_move(&self) -> Color {
        self.state.to_move
    }

    #[inline]
    pub fn zobrist_key(&self) -> u64 {
        self.state.zobrist_key
    }

    #[inline]
    pub fn piece_at(&self, coord: Coord) -> Option<Piece> {
        self.state.piece_at(coord)
    }

    #[inline]
    pub fn legal_moves(&self) -> &[Move] {
        &self.legal_moves
    }

    #[inline]
    pub fn is_legal(&self, mv: Move) -> bool {
        self.legal_moves.contains(&mv)
    }

    #[inline]
    pub fn checks(&self, color: Color) -> &[Check] {
        &self.analysis.checks[color.index()]
    }

    #[inline]
    pub fn pins(&self, color: Color) -> &[Pin] {
        &self.analysis.pins[color.index()]
    }

    #[inline]
    pub fn attacked_squares(&self, color: Color) -> &SquareSet {
        &self.analysis.attacked[color.index()]
    }

    #[inline]
    pub fn in_check(&self, color: Color) -> bool {
        self.analysis.in_check(color)
    }

    #[inline]
    pub fn outcome(&self) -> Option<Outcome> {
        self.state.outcome
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.state.outcome.is_some()
    }

    #[inline]
    pub fn is_active(&self, color: Color) -> bool {
        self.state.is_active(color)
    }

    #[inline]
    pub fn active_count(&self) -> usize {
        self.state.active_count()
    }

    /// Apply a move taken from `legal_moves()`, then resolve any
    /// eliminations it causes.
    pub fn make_move(&mut self, mv: Move) {
        debug_assert!(self.is_legal(mv), "make_move called with illegal move {mv}");
        self.history.push(self.state.clone());
        apply_move(&mut self.state, &self.keys, mv);
        self.settle_turn();
    }

    /// Restore the state from before the last make, resignation or draw claim.
    pub fn unmake_move(&mut self) {
        let Some(previous) = self.history.pop() else {
            panic!("unmake_move with an empty undo stack");
        };
        self.state = previous;
        self.refresh();
    }

    /// Eliminate `color` outright. Returns `false` when the game is already
    /// over or the color is already out. Unlike a move, this never eliminates
    /// anyone else: the next color stays on move even without legal moves.
    pub fn make_resignation(&mut self, color: Color) -> bool {
        if self.is_game_over() || !self.state.is_active(color) {
            return false;
        }
        self.history.push(self.state.clone());
        eliminate_color(&mut self.state, &self.keys, color);
        self.declare_last_standing();
        self.refresh();
        true
    }

    /// A draw the side to move could claim right now, if any.
    pub fn claimable_draw(&self) -> Option<DrawReason> {
        if self.is_game_over() {
            return None;
        }
        draw_rules::claimable_draw(&self.state, &self.history)
    }

    /// End the game as a draw if one is claimable. No-op returning `false`
    /// otherwise.
    pub fn claim_draw(&mut self) -> bool {
        let Some(reason) = self.claimable_draw() else {
            return false;
        };
        self.history.push(self.state.clone());
        self.state.outcome = Some(Outcome::Draw(reason));
        self.refresh();
        debug!("[DRAW] claimed by {} ({reason:?})", self.state.to_move);
        true
    }

    /// Whether a draw could be claimed, ignoring whose turn it is. Used by
    /// search to cut drawn lines short.
    #[inline]
    pub fn is_drawable(&self) -> bool {
        self.claimable_draw().is_some()
    }

    /// Turn-start evaluation: eliminate colors that cannot move until one can,
    /// or until the game is decided.
    fn settle_turn(&mut self) {
        loop {
            self.declare_last_standing();
            self.refresh();
            if self.state.outcome.is_some() || !self.legal_moves.is_empty() {
                return;
            }

            let color = self.state.to_move;
            if self.analysis.in_check(color) || self.state.active_count() >= 3 {
                eliminate_color(&mut self.state, &self.keys, color);
                continue;
            }

            self.state.outcome = Some(Outcome::Draw(DrawReason::Stalemate));
            self.legal_moves.clear();
            debug!("[DRAW] {color} is stalemated with two colors left");
            return;
        }
    }

    fn declare_last_standing(&mut self) {
        if self.state.outcome.is_none() && self.state.active_count() <= 1 {
            let winner = self
                .state
                .active_colors()
                .next()
                .unwrap_or(self.state.to_move);
            self.state.outcome = Some(Outcome::Win(winner));
            debug!("[WIN] {winner} is the last color standing");
        }
    }

    fn refresh(&mut self) {
        self.analysis = PositionAnalysis::compute(&self.state);
        self.legal_moves = generate_legal_moves(&self.state, &self.analysis);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(text: &str) -> Coord {
        text.parse().expect("test coordinate should parse")
    }

    fn mv(text: &str) -> Move {
        crate::utils::long_algebraic::parse_long_algebraic(text).expect("test move should parse")
    }

    fn play(position: &mut Position, moves: &[&str]) {
        for text in moves {
            let m = mv(text);
            assert!(position.is_legal(m), "{text} should be legal");
            position.make_move(m);
        }
    }

    #[derive(Debug, PartialEq)]
    struct Fingerprint {
        state: PositionState,
        analysis: PositionAnalysis,
        legal_moves: Vec<Move>,
    }

    fn fingerprint(position: &Position) -> Fingerprint {
        Fingerprint {
            state: position.state.clone(),
            analysis: position.analysis.clone(),
            legal_moves: position.legal_moves.clone(),
        }
    }

    #[test]
    fn starting_layout_matches_the_documented_placement() {
        let position = Position::start();
        let state = position.state();
        assert_eq!(state.to_move, Color::Red);
        assert_eq!(state.castling_rights, CastlingRights::ALL);
        assert_eq!(state.en_passant, [None; 4]);
        assert_eq!(state.ply_since_progress, 0);
        assert!(state.eliminated.is_empty());

        let expect = |text: &str, kind: PieceKind, color: Color| {
            assert_eq!(state.piece_at(sq(text)), Some(Piece::new(kind, color)), "{text}");
        };
        expect("h1", PieceKind::King, Color::Red);
        expect("g1", PieceKind::Queen, Color::Red);
        expect("a8", PieceKind::King, Color::Blue);
        expect("a7", PieceKind::Queen, Color::Blue);
        expect("g14", PieceKind::King, Color::Yellow);
        expect("h14", PieceKind::Queen, Color::Yellow);
        expect("n7", PieceKind::King, Color::Green);
        expect("n8", PieceKind::Queen, Color::Green);
        expect("k2", PieceKind::Pawn, Color::Red);
        expect("m11", PieceKind::Pawn, Color::Green);

        let total: usize = Coord::all().filter(|c| state.piece_at(*c).is_some()).count();
        assert_eq!(total, 64);
        for color in Color::ALL {
            assert_eq!(state.pieces_of(color).count(), 16);
        }
    }

    #[test]
    fn make_then_unmake_restores_everything() {
        let mut position = Position::start();
        play(&mut position, &["e2e4", "b9d9", "f13f11", "m6k6"]);

        let moves: Vec<Move> = position.legal_moves().to_vec();
        for m in moves {
            let before = fingerprint(&position);
            position.make_move(m);
            assert_eq!(
                position.zobrist_key(),
                position.keys().compute(position.state()),
                "hash drifted after {m}"
            );
            position.unmake_move();
            assert_eq!(fingerprint(&position), before, "unmake of {m} is not exact");
        }
    }

    #[test]
    fn en_passant_target_lives_for_one_ply() {
        let mut position = Position::start();
        play(&mut position, &["e2e4"]);
        assert_eq!(position.state().en_passant[Color::Red.index()], Some(sq("e3")));
        play(&mut position, &["b7c7"]);
        assert_eq!(position.state().en_passant, [None; 4]);
    }

    #[test]
    fn en_passant_capture_is_offered_on_the_next_ply_only() {
        let mut position = Position::from_fen4(
            "R-0,0,0,0-0,0,0,0-0,0,0,0-0,0,0,0-0-\
             3,yK,10/14/14/bK,13/14/14/14/14/14/13,gK/2,bP,11/14/3,rP,10/7,rK,6",
        )
        .expect("test position should parse");
        let capture = Move::new(sq("c4"), sq("d3"));
        play(&mut position, &["d2d4"]);
        assert!(position.is_legal(capture));

        play(&mut position, &["a11b11", "d14e14", "n5n6", "h1h2"]);
        assert_eq!(position.to_move(), Color::Blue);
        assert!(!position.is_legal(capture));
    }

    #[test]
    fn resignation_is_final_and_undoable() {
        let mut position = Position::start();
        let before = position.zobrist_key();
        assert!(position.make_resignation(Color::Red));
        assert!(!position.is_active(Color::Red));
        assert_eq!(position.to_move(), Color::Blue);
        assert!(!position.make_resignation(Color::Red));
        position.unmake_move();
        assert!(position.is_active(Color::Red));
        assert_eq!(position.zobrist_key(), before);
    }

    #[test]
    fn resignation_leaves_a_stalemated_next_color_on_move() {
        // Green's lone king on n4 has no moves but is not in check.
        let mut position = Position::from_fen4(
            "Y-0,0,0,0-0,0,0,0-0,0,0,0-0,0,0,0-0-\
             3,yK,10/14/14/bK,13/14/14/14/14/12,rQ,1/14/13,gK/14/14/7,rK,6",
        )
        .expect("test position should parse");
        assert!(!position.legal_moves().is_empty());

        assert!(position.make_resignation(Color::Yellow));
        assert!(!position.is_active(Color::Yellow));
        assert!(position.is_active(Color::Green));
        assert_eq!(position.to_move(), Color::Green);
        assert!(position.legal_moves().is_empty());
        assert_eq!(position.outcome(), None);
        assert_eq!(position.zobrist_key(), position.keys().compute(position.state()));
    }

    #[test]
    fn random_games_keep_every_invariant() {
        use rand::prelude::IndexedRandom;
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        for seed in 0..4 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut position = Position::start();
            let start_fen = position.fen4();
            let start_key = position.zobrist_key();
            let mut played = 0;

            while played < 200 && !position.is_game_over() {
                let Some(&choice) = position.legal_moves().choose(&mut rng) else {
                    break;
                };
                let mover = position.to_move();
                position.make_move(choice);
                played += 1;

                if position.is_active(mover) {
                    assert!(
                        !position.in_check(mover),
                        "seed {seed}: {choice} left {mover} in check"
                    );
                }
                assert_eq!(
                    position.zobrist_key(),
                    position.keys().compute(position.state()),
                    "seed {seed}: hash drifted after {choice}"
                );
                let reparsed =
                    Position::from_fen4(&position.fen4()).expect("generated text parses");
                assert_eq!(reparsed.snapshot(), position.snapshot(), "seed {seed} ply {played}");
            }

            for _ in 0..played {
                position.unmake_move();
            }
            assert_eq!(position.fen4(), start_fen);
            assert_eq!(position.zobrist_key(), start_key);
        }
    }

    #[test]
    fn last_color_standing_wins() {
        let mut position = Position::start();
        assert!(position.make_resignation(Color::Blue));
        assert!(position.make_resignation(Color::Yellow));
        assert!(position.make_resignation(Color::Green));
        assert_eq!(position.outcome(), Some(Outcome::Win(Color::Red)));
        assert!(position.legal_moves().is_empty());
        assert!(!position.make_resignation(Color::Red));
    }

    #[test]
    fn stalemate_eliminates_while_three_colors_remain() {
        // Green's lone king on n4 is boxed in by the Red queen on m6 but not in check.
        let position = Position::from_fen4(
            "G-0,0,0,0-0,0,0,0-0,0,0,0-0,0,0,0-0-\
             3,yK,10/14/14/bK,13/14/14/14/14/12,rQ,1/14/13,gK/14/14/7,rK,6",
        )
        .expect("test position should parse");
        assert!(!position.is_active(Color::Green));
        assert!(position.outcome().is_none());
        assert_eq!(position.to_move(), Color::Red);
    }

    #[test]
    fn stalemate_with_two_colors_left_is_a_draw() {
        let position = Position::from_fen4(
            "G-0,1,1,0-0,0,0,0-0,0,0,0-0,0,0,0-0-\
             3,yK,10/14/14/bK,13/14/14/14/14/12,rQ,1/14/13,gK/14/14/7,rK,6",
        )
        .expect("test position should parse");
        assert!(position.is_active(Color::Green));
        assert_eq!(
            position.outcome(),
            Some(Outcome::Draw(DrawReason::Stalemate))
        );
        assert!(position.legal_moves().is_empty());
    }

    #[test]
    fn checkmate_with_two_colors_left_wins() {
        // Yellow king g14 boxed by Red rooks on the 13th and 14th ranks.
        let position = Position::from_fen4(
            "Y-0,1,0,1-0,0,0,0-0,0,0,0-0,0,0,0-0-\
             3,rR,2,yK,7/3,rR,10/14/bK,13/14/14/14/13,gK/14/14/14/14/14/7,rK,6",
        )
        .expect("test position should parse");
        assert!(!position.is_active(Color::Yellow));
        assert_eq!(position.outcome(), Some(Outcome::Win(Color::Red)));
    }

    #[test]
    fn fifty_move_draw_needs_a_hundred_quiet_plies() {
        let text = |ply: u32| {
            format!(
                "R-0,1,0,1-0,0,0,0-0,0,0,0-0,0,0,0-{ply}-\
                 6,yK,7/14/14/bK,13/14/14/14/13,gK/14/14/14/14/14/3,rR,3,rK,6"
            )
        };
        let mut position = Position::from_fen4(&text(99)).expect("parses");
        assert_eq!(position.claimable_draw(), None);
        assert!(!position.claim_draw());
        play(&mut position, &["d1d2"]);
        assert_eq!(position.claimable_draw(), Some(DrawReason::FiftyMove));
        assert!(position.claim_draw());
        assert_eq!(
            position.outcome(),
            Some(Outcome::Draw(DrawReason::FiftyMove))
        );
    }

    #[test]
    fn repetition_becomes_claimable_on_the_third_occurrence() {
        let mut position = Position::from_fen4(
            "R-0,1,0,1-0,0,0,0-0,0,0,0-0,0,0,0-0-\
             6,yK,7/14/14/bK,13/14/14/14/13,gK/14/14/14/14/14/3,rR,3,rK,6",
        )
        .expect("test position should parse");
        let shuffle = ["d1d2", "g14f14", "d2d1", "f14g14"];
        play(&mut position, &shuffle);
        assert_eq!(position.claimable_draw(), None);
        play(&mut position, &shuffle);
        assert_eq!(position.claimable_draw(), Some(DrawReason::Repetition));
    }
}
