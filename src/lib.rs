//! Crate root module declarations for the four-player chess engine.
//!
//! Exposes the position model, move generation, search, engines, the caller
//! interface and text utilities under stable module paths for tests,
//! benchmarks and front ends.

pub mod errors;

pub mod game_state {
    pub mod chess_rules;
    pub mod chess_types;
    pub mod draw_rules;
    pub mod piece_list;
    pub mod position;
    pub mod undo_state;
}

pub mod move_generation {
    pub mod legal_move_apply;
    pub mod legal_move_checks;
    pub mod legal_move_generator;
    pub mod legal_move_shared;
    pub mod legal_moves_bishop;
    pub mod legal_moves_king;
    pub mod legal_moves_knight;
    pub mod legal_moves_pawn;
    pub mod legal_moves_queen;
    pub mod legal_moves_rook;
    pub mod perft;
}

pub mod search {
    pub mod board_scoring;
    pub mod hypermax;
    pub mod iterative_deepening;
    pub mod move_ordering;
    pub mod paranoid;
    pub mod threading;
    pub mod transposition_table;
    pub mod zobrist;
}

pub mod engines {
    pub mod engine_iterative;
    pub mod engine_random;
    pub mod engine_trait;
}

pub mod interface {
    pub mod game_interface;
}

pub mod utils {
    pub mod algebraic;
    pub mod fen4_generator;
    pub mod fen4_parser;
    pub mod long_algebraic;
    pub mod notation;
    pub mod render_position;
}
