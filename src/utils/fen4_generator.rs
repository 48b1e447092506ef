use crate::game_state::chess_types::*;
use crate::game_state::position::Fen4State;
use crate::utils::algebraic::coord_to_algebraic;
use crate::utils::fen4_parser::NO_EN_PASSANT;

pub fn generate_fen4(snapshot: &Fen4State) -> String {
    let eliminated = generate_flag_field(|color| snapshot.eliminated.contains(color));
    let king_side =
        generate_flag_field(|color| snapshot.castling_rights.has(color, CastleSide::KingSide));
    let queen_side =
        generate_flag_field(|color| snapshot.castling_rights.has(color, CastleSide::QueenSide));
    let en_passant = generate_en_passant_field(&snapshot.en_passant);
    let board = generate_board_field(snapshot);

    format!(
        "{}-{}-{}-{}-{}-{}-{}",
        snapshot.to_move.letter(),
        eliminated,
        king_side,
        queen_side,
        en_passant,
        snapshot.ply_since_progress,
        board
    )
}

fn generate_flag_field(flag: impl Fn(Color) -> bool) -> String {
    Color::ALL
        .iter()
        .map(|color| if flag(*color) { "1" } else { "0" })
        .collect::<Vec<_>>()
        .join(",")
}

fn generate_en_passant_field(targets: &[Option<Coord>; 4]) -> String {
    targets
        .iter()
        .map(|target| match target {
            Some(coord) => coord_to_algebraic(*coord),
            None => NO_EN_PASSANT.to_owned(),
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// Rows from rank 14 down to rank 1. Corner cells count as empty.
fn generate_board_field(snapshot: &Fen4State) -> String {
    let mut rows = Vec::with_capacity(BOARD_WIDTH);

    for rank in (0..BOARD_WIDTH).rev() {
        let mut tokens: Vec<String> = Vec::new();
        let mut empty_count = 0usize;

        for file in 0..BOARD_WIDTH {
            match snapshot.board[rank * BOARD_WIDTH + file] {
                Some(piece) => {
                    if empty_count > 0 {
                        tokens.push(empty_count.to_string());
                        empty_count = 0;
                    }
                    tokens.push(piece_token(piece));
                }
                None => empty_count += 1,
            }
        }

        if empty_count > 0 {
            tokens.push(empty_count.to_string());
        }
        rows.push(tokens.join(","));
    }

    rows.join("/")
}

fn piece_token(piece: Piece) -> String {
    format!(
        "{}{}",
        piece.color.letter().to_ascii_lowercase(),
        piece.kind.letter()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN4;
    use crate::game_state::position::Position;
    use crate::utils::fen4_parser::parse_fen4;
    use crate::utils::long_algebraic::parse_long_algebraic;

    #[test]
    fn starting_position_text_is_reproduced_exactly() {
        let snapshot = parse_fen4(STARTING_POSITION_FEN4).expect("start position should parse");
        assert_eq!(generate_fen4(&snapshot), STARTING_POSITION_FEN4);
    }

    #[test]
    fn empty_runs_merge_across_corner_cells() {
        let text = "R-0,0,0,0-0,0,0,0-0,0,0,0-0,0,0,0-0-\
                    3,yK,10/14/14/bK,13/14/14/14/13,gK/14/14/14/14/14/7,rK,6";
        let snapshot = parse_fen4(text).expect("position should parse");
        assert_eq!(generate_fen4(&snapshot), text);
    }

    #[test]
    fn positions_reached_by_play_survive_a_text_round_trip() {
        let mut position = Position::start();
        for text in ["e2e4", "b9d9", "f13f11", "m6k6", "e1f3"] {
            let mv = parse_long_algebraic(text).expect("test move should parse");
            assert!(position.is_legal(mv), "{text} should be legal");
            position.make_move(mv);
        }
        assert!(position.make_resignation(Color::Blue));

        let text = position.fen4();
        assert!(text.starts_with("Y-0,1,0,0-1,1,1,1-1,1,1,1-0,0,0,0-1-"), "{text}");
        let reparsed = parse_fen4(&text).expect("generated text should parse");
        assert_eq!(reparsed, position.snapshot());
        assert_eq!(generate_fen4(&reparsed), text);
    }

    #[test]
    fn en_passant_targets_are_written_per_color() {
        let mut position = Position::start();
        let mv = parse_long_algebraic("e2e4").expect("test move should parse");
        position.make_move(mv);
        assert!(position.fen4().starts_with("B-0,0,0,0-1,1,1,1-1,1,1,1-e3,0,0,0-0-"));
    }
}
