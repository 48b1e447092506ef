//! Caller-facing game surface.
//!
//! Wraps one `Position` with the options, the shared transposition table and
//! the currently running search. Human moves are validated here, so a UI can
//! show precise rejection reasons; searches work on their own copy of the
//! position and never block move submission.

use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use crate::engines::engine_trait::{build_engine, SearchConfig};
use crate::errors::{ConfigError, Fen4Error, MoveParseError, MoveRejection};
use crate::game_state::chess_types::*;
use crate::game_state::position::Position;
use crate::search::threading::{SearchTask, SharedTable};
use crate::search::transposition_table::TranspositionTable;
use crate::utils::long_algebraic::parse_long_algebraic;
use crate::utils::notation::notate_move;
use crate::utils::render_position::render_position;

/// A move as entered by a player. `promotion` is required exactly when the
/// move reaches the promotion line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRequest {
    pub from: Coord,
    pub to: Coord,
    pub promotion: Option<PieceKind>,
}

impl FromStr for MoveRequest {
    type Err = MoveParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mv = parse_long_algebraic(text)?;
        Ok(Self {
            from: mv.from,
            to: mv.to,
            promotion: mv.promotion,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedMove {
    pub mv: Move,
    pub notation: String,
}

/// Everything a UI needs to draw the game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiState {
    pub board: [Option<Piece>; GRID_SIZE],
    pub to_move: Color,
    pub legal_moves: Vec<Move>,
    /// Checks against each color, indexed by `Color::index`.
    pub checks: [Vec<Check>; 4],
    pub eliminated: ColorSet,
    pub draw_claimable: bool,
    pub game_over: bool,
    pub winner: Option<Color>,
    pub outcome: Option<Outcome>,
}

pub struct GameInterface {
    position: Position,
    config: SearchConfig,
    tt: SharedTable,
    running_search: Option<Arc<AtomicBool>>,
}

impl Default for GameInterface {
    fn default() -> Self {
        Self::new()
    }
}

impl GameInterface {
    pub fn new() -> Self {
        Self::with_position(Position::start(), SearchConfig::default())
    }

    pub fn from_fen4(text: &str) -> Result<Self, Fen4Error> {
        Ok(Self::with_position(
            Position::from_fen4(text)?,
            SearchConfig::default(),
        ))
    }

    pub fn with_position(position: Position, config: SearchConfig) -> Self {
        Self {
            position,
            tt: Arc::new(Mutex::new(TranspositionTable::new(config.tt_size_log2))),
            config,
            running_search: None,
        }
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn fen4(&self) -> String {
        self.position.fen4()
    }

    pub fn render(&self) -> String {
        render_position(self.position.state())
    }

    pub fn ui_state(&self) -> UiState {
        let position = &self.position;
        let winner = match position.outcome() {
            Some(Outcome::Win(color)) => Some(color),
            _ => None,
        };
        UiState {
            board: position.state().board,
            to_move: position.to_move(),
            legal_moves: position.legal_moves().to_vec(),
            checks: Color::ALL.map(|color| position.checks(color).to_vec()),
            eliminated: position.state().eliminated,
            draw_claimable: position.claimable_draw().is_some(),
            game_over: position.is_game_over(),
            winner,
            outcome: position.outcome(),
        }
    }

    /// Validate and play a move for the side to move.
    pub fn submit_move(&mut self, request: &MoveRequest) -> Result<AppliedMove, MoveRejection> {
        let mv = self.validate(request).inspect_err(|rejection| {
            warn!(
                "[MOVE] rejected {}{} for {}: {rejection}",
                request.from,
                request.to,
                self.position.to_move()
            );
        })?;

        let notation = notate_move(&mut self.position, mv);
        self.position.make_move(mv);
        info!("[MOVE] {notation}");
        Ok(AppliedMove { mv, notation })
    }

    /// Parse long algebraic text and submit it.
    pub fn submit_text(&mut self, text: &str) -> Result<AppliedMove, MoveRejection> {
        let request = text.parse::<MoveRequest>().inspect_err(|error| {
            warn!("[MOVE] unreadable move '{text}': {error}");
        })?;
        self.submit_move(&request)
    }

    fn validate(&self, request: &MoveRequest) -> Result<Move, MoveRejection> {
        if self.position.is_game_over() {
            return Err(MoveRejection::GameOver);
        }

        let mut candidates = self
            .position
            .legal_moves()
            .iter()
            .filter(|mv| mv.from == request.from && mv.to == request.to)
            .peekable();
        let Some(first) = candidates.peek().copied() else {
            return Err(MoveRejection::NotLegal);
        };

        match (first.promotion, request.promotion) {
            (Some(_), None) => Err(MoveRejection::PromotionRequired),
            (None, Some(_)) => Err(MoveRejection::PromotionNotAllowed),
            (None, None) => Ok(*first),
            (Some(_), Some(kind)) => candidates
                .find(|mv| mv.promotion == Some(kind))
                .copied()
                .ok_or(MoveRejection::NotLegal),
        }
    }

    /// Eliminate `color`. `false` if it is already out or the game is over.
    pub fn resign(&mut self, color: Color) -> bool {
        let resigned = self.position.make_resignation(color);
        if resigned {
            info!("[RESIGN] {color} resigned");
        } else {
            warn!("[RESIGN] {color} cannot resign now");
        }
        resigned
    }

    pub fn claim_draw(&mut self) -> bool {
        self.position.claim_draw()
    }

    /// Take back the last move, resignation or draw claim.
    pub fn undo(&mut self) -> bool {
        if self.position.history().is_empty() {
            return false;
        }
        self.position.unmake_move();
        true
    }

    /// Start searching the current position in the background. Any search
    /// still running is stopped first. `None` when the game is over.
    pub fn start_search(&mut self) -> Option<SearchTask> {
        self.stop_search();
        if self.position.is_game_over() {
            return None;
        }

        let engine = build_engine(&self.config);
        info!(
            "[SEARCH] starting {} for {}",
            engine.name(),
            self.position.to_move()
        );
        let task = SearchTask::spawn(engine, &self.position, Arc::clone(&self.tt));
        self.running_search = Some(task.cancel_handle());
        Some(task)
    }

    pub fn stop_search(&mut self) {
        if let Some(cancel) = self.running_search.take() {
            cancel.store(true, Ordering::Relaxed);
        }
    }

    /// Apply an option by name. Changing `Hash` replaces the table; every
    /// other option takes effect at the next search.
    pub fn set_option(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        let previous_size = self.config.tt_size_log2;
        self.config.set_option(name, value).inspect_err(|error| {
            warn!("[OPTION] {error}");
        })?;
        if self.config.tt_size_log2 != previous_size {
            self.tt = Arc::new(Mutex::new(TranspositionTable::new(
                self.config.tt_size_log2,
            )));
        }
        Ok(())
    }
}
