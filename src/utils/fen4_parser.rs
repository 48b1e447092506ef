//! Position text to snapshot parser.
//!
//! `<turn>-<e,e,e,e>-<k,k,k,k>-<q,q,q,q>-<ep,ep,ep,ep>-<ply>-<row14>/.../<row1>`
//!
//! Per-color fields are in Red, Blue, Yellow, Green order. Rows list every
//! grid cell, corners included, as comma-separated empty-run counts or
//! two-letter piece tokens (`rP`, `bK`, ...).

use crate::errors::Fen4Error;
use crate::game_state::chess_types::*;
use crate::game_state::piece_list::PIECE_LIST_CAPACITY;
use crate::game_state::position::Fen4State;
use crate::utils::algebraic::parse_algebraic_coord;

/// Marks an absent en-passant target.
pub const NO_EN_PASSANT: &str = "0";

const FIELD_COUNT: usize = 7;

pub fn parse_fen4(text: &str) -> Result<Fen4State, Fen4Error> {
    let text = text.trim();
    let fields = split_fields(text)?;
    let field = |index: usize| fields[index];

    let mut snapshot = Fen4State::empty();

    let (turn_offset, turn_text) = field(0);
    snapshot.to_move = match turn_text {
        "R" => Color::Red,
        "B" => Color::Blue,
        "Y" => Color::Yellow,
        "G" => Color::Green,
        _ => return Err(malformed(turn_offset, format!("unknown turn '{turn_text}'"))),
    };

    let eliminated = parse_flags(field(1))?;
    let king_side = parse_flags(field(2))?;
    let queen_side = parse_flags(field(3))?;
    for color in Color::ALL {
        if eliminated[color.index()] {
            snapshot.eliminated.insert(color);
        }
        snapshot
            .castling_rights
            .set(color, CastleSide::KingSide, king_side[color.index()]);
        snapshot
            .castling_rights
            .set(color, CastleSide::QueenSide, queen_side[color.index()]);
    }

    snapshot.en_passant = parse_en_passant(field(4))?;

    let (ply_offset, ply_text) = field(5);
    snapshot.ply_since_progress = ply_text
        .parse::<u32>()
        .map_err(|_| malformed(ply_offset, format!("invalid ply counter '{ply_text}'")))?;

    parse_board(field(6), &mut snapshot)?;
    validate_kings(&snapshot)?;

    if snapshot.eliminated.contains(snapshot.to_move) {
        return Err(malformed(
            turn_offset,
            format!("{} is to move but eliminated", snapshot.to_move),
        ));
    }

    Ok(snapshot)
}

fn malformed(position: usize, message: String) -> Fen4Error {
    Fen4Error::Malformed { position, message }
}

/// Split on `-` into the seven fields, remembering each field's byte offset.
fn split_fields(text: &str) -> Result<[(usize, &str); FIELD_COUNT], Fen4Error> {
    let mut fields = [(0usize, ""); FIELD_COUNT];
    let mut offset = 0;
    let mut count = 0;
    for part in text.splitn(FIELD_COUNT, '-') {
        fields[count] = (offset, part);
        offset += part.len() + 1;
        count += 1;
    }
    if count != FIELD_COUNT {
        return Err(malformed(
            text.len(),
            format!("expected {FIELD_COUNT} '-' separated fields, found {count}"),
        ));
    }
    Ok(fields)
}

/// Comma-separated items with their byte offsets.
fn items<'a>((offset, text): (usize, &'a str)) -> impl Iterator<Item = (usize, &'a str)> {
    let mut cursor = offset;
    text.split(',').map(move |item| {
        let start = cursor;
        cursor += item.len() + 1;
        (start, item)
    })
}

fn exactly_four<'a>(
    field: (usize, &'a str),
    what: &str,
) -> Result<[(usize, &'a str); 4], Fen4Error> {
    let parts: Vec<_> = items(field).collect();
    <[(usize, &str); 4]>::try_from(parts.as_slice()).map_err(|_| {
        malformed(
            field.0,
            format!("expected four {what} entries, found {}", parts.len()),
        )
    })
}

fn parse_flags(field: (usize, &str)) -> Result<[bool; 4], Fen4Error> {
    let parts = exactly_four(field, "flag")?;
    let mut flags = [false; 4];
    for (slot, (offset, text)) in flags.iter_mut().zip(parts) {
        *slot = match text {
            "0" => false,
            "1" => true,
            _ => return Err(malformed(offset, format!("flag must be 0 or 1, got '{text}'"))),
        };
    }
    Ok(flags)
}

fn parse_en_passant(field: (usize, &str)) -> Result<[Option<Coord>; 4], Fen4Error> {
    let parts = exactly_four(field, "en-passant")?;
    let mut targets = [None; 4];
    for (slot, (offset, text)) in targets.iter_mut().zip(parts) {
        if text == NO_EN_PASSANT {
            continue;
        }
        let coord = parse_algebraic_coord(text)
            .map_err(|err| malformed(offset, format!("en-passant target: {err}")))?;
        *slot = Some(coord);
    }
    Ok(targets)
}

fn parse_board((offset, text): (usize, &str), snapshot: &mut Fen4State) -> Result<(), Fen4Error> {
    let rows: Vec<&str> = text.split('/').collect();
    if rows.len() != BOARD_WIDTH {
        return Err(malformed(
            offset,
            format!("expected {BOARD_WIDTH} board rows, found {}", rows.len()),
        ));
    }

    let mut row_offset = offset;
    let mut counts = [[0usize; 6]; 4];
    for (row_index, row_text) in rows.iter().enumerate() {
        let rank = (BOARD_WIDTH - 1 - row_index) as u8;
        let mut width = 0usize;
        let mut placements = Vec::new();

        for (token_offset, token) in items((row_offset, *row_text)) {
            if let Some(first) = token.chars().next().filter(char::is_ascii_digit) {
                let run: usize = token.parse().map_err(|_| {
                    malformed(token_offset, format!("invalid empty run '{token}'"))
                })?;
                if run == 0 || first == '0' {
                    return Err(malformed(token_offset, format!("invalid empty run '{token}'")));
                }
                if run > BOARD_WIDTH {
                    return Err(malformed(
                        token_offset,
                        format!("empty run '{token}' is wider than the board"),
                    ));
                }
                width += run;
                continue;
            }

            let piece = parse_piece_token(token)
                .ok_or_else(|| malformed(token_offset, format!("invalid piece token '{token}'")))?;
            placements.push((token_offset, width, piece));
            width += 1;
        }

        if width != BOARD_WIDTH {
            return Err(Fen4Error::RowWidth {
                row: rank as usize + 1,
                width,
            });
        }

        for (token_offset, file, piece) in placements {
            let Some(coord) = Coord::new(file as u8, rank) else {
                return Err(malformed(
                    token_offset,
                    format!("piece on corner cell at file {file}, rank {}", rank + 1),
                ));
            };
            let count = &mut counts[piece.color.index()][piece.kind.index()];
            *count += 1;
            if *count > PIECE_LIST_CAPACITY {
                return Err(malformed(
                    token_offset,
                    format!("more than {PIECE_LIST_CAPACITY} pieces of one kind"),
                ));
            }
            snapshot.board[coord.index()] = Some(piece);
        }

        row_offset += row_text.len() + 1;
    }
    Ok(())
}

fn parse_piece_token(token: &str) -> Option<Piece> {
    let mut chars = token.chars();
    let color_char = chars.next()?;
    let kind_char = chars.next()?;
    if chars.next().is_some() || !color_char.is_ascii_lowercase() || !kind_char.is_ascii_uppercase()
    {
        return None;
    }
    Some(Piece::new(
        PieceKind::from_letter(kind_char)?,
        Color::from_letter(color_char)?,
    ))
}

/// Active colors need exactly one king. Eliminated colors may have lost
/// theirs, but never have two.
fn validate_kings(snapshot: &Fen4State) -> Result<(), Fen4Error> {
    for color in Color::ALL {
        let mut kings = 0;
        let mut others = 0;
        for coord in Coord::all() {
            match snapshot.piece_at(coord) {
                Some(piece) if piece.color == color && piece.kind == PieceKind::King => kings += 1,
                Some(piece) if piece.color == color => others += 1,
                _ => {}
            }
        }

        if kings > 1 {
            return Err(Fen4Error::KingCount { color, count: kings });
        }
        if kings == 0 && !snapshot.eliminated.contains(color) {
            if others > 0 {
                return Err(Fen4Error::MissingKing { color });
            }
            return Err(Fen4Error::KingCount { color, count: 0 });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN4;

    const KINGS_ONLY_BOARD: &str =
        "3,yK,10/14/14/bK,13/14/14/14/13,gK/14/14/14/14/14/7,rK,6";

    fn with_header(header: &str, board: &str) -> String {
        format!("{header}{board}")
    }

    #[test]
    fn parses_the_starting_layout() {
        let snapshot = parse_fen4(STARTING_POSITION_FEN4).expect("start position should parse");
        assert_eq!(snapshot.to_move, Color::Red);
        assert_eq!(snapshot.castling_rights, CastlingRights::ALL);
        assert_eq!(snapshot.en_passant, [None; 4]);
        assert_eq!(snapshot.ply_since_progress, 0);
        assert!(snapshot.eliminated.is_empty());
    }

    #[test]
    fn reads_en_passant_and_flags() {
        let text = with_header("B-0,0,1,0-1,0,0,0-0,0,0,1-d3,0,0,0-7-", KINGS_ONLY_BOARD);
        let snapshot = parse_fen4(&text).expect("position should parse");
        assert_eq!(snapshot.to_move, Color::Blue);
        assert!(snapshot.eliminated.contains(Color::Yellow));
        assert!(snapshot.castling_rights.has(Color::Red, CastleSide::KingSide));
        assert!(snapshot.castling_rights.has(Color::Green, CastleSide::QueenSide));
        assert!(!snapshot.castling_rights.has(Color::Green, CastleSide::KingSide));
        assert_eq!(snapshot.en_passant[0], Some("d3".parse().expect("valid")));
        assert_eq!(snapshot.ply_since_progress, 7);
    }

    #[test]
    fn rejects_wrong_row_width() {
        let board = "3,yK,10/14/14/bK,13/14/14/14/13,gK/14/14/14/14/15/7,rK,6";
        let err = parse_fen4(&with_header("R-0,0,0,0-0,0,0,0-0,0,0,0-0,0,0,0-0-", board))
            .expect_err("row 2 is too wide");
        assert_eq!(err, Fen4Error::RowWidth { row: 2, width: 15 });
    }

    #[test]
    fn rejects_oversized_empty_runs() {
        for row in ["18446744073709551615,1", "18446744073709551615,15", "15"] {
            let board = format!("3,yK,10/14/14/bK,13/14/14/14/13,gK/14/14/14/14/{row}/7,rK,6");
            let err = parse_fen4(&with_header("R-0,0,0,0-0,0,0,0-0,0,0,0-0,0,0,0-0-", &board))
                .expect_err("run longer than a row");
            assert!(matches!(err, Fen4Error::Malformed { .. }), "{row}: {err:?}");
        }
    }

    #[test]
    fn rejects_piece_on_corner() {
        let board = "yK,13/14/14/bK,13/14/14/14/13,gK/14/14/14/14/14/7,rK,6";
        let err = parse_fen4(&with_header("R-0,0,0,0-0,0,0,0-0,0,0,0-0,0,0,0-0-", board))
            .expect_err("a14 is a corner cell");
        assert!(matches!(err, Fen4Error::Malformed { .. }));
    }

    #[test]
    fn rejects_king_count_problems() {
        let two_kings = "3,yK,yK,9/14/14/bK,13/14/14/14/13,gK/14/14/14/14/14/7,rK,6";
        let err = parse_fen4(&with_header("R-0,0,0,0-0,0,0,0-0,0,0,0-0,0,0,0-0-", two_kings))
            .expect_err("two yellow kings");
        assert_eq!(
            err,
            Fen4Error::KingCount {
                color: Color::Yellow,
                count: 2
            }
        );

        let no_king = "3,yK,10/14/14/bK,13/14/14/14/13,gK/14/14/14/14/14/7,rQ,6";
        let err = parse_fen4(&with_header("R-0,0,0,0-0,0,0,0-0,0,0,0-0,0,0,0-0-", no_king))
            .expect_err("red queen without king");
        assert_eq!(err, Fen4Error::MissingKing { color: Color::Red });
    }

    #[test]
    fn eliminated_colors_may_lose_their_king() {
        let board = "3,yK,10/14/14/bR,13/14/14/14/13,gK/14/14/14/14/14/7,rK,6";
        assert!(parse_fen4(&with_header("R-0,0,0,0-0,0,0,0-0,0,0,0-0,0,0,0-0-", board)).is_err());
        assert!(parse_fen4(&with_header("R-0,1,0,0-0,0,0,0-0,0,0,0-0,0,0,0-0-", board)).is_ok());
    }

    #[test]
    fn reports_malformed_header_fields_with_offsets() {
        let text = with_header("R-0,0,0-0,0,0,0-0,0,0,0-0,0,0,0-0-", KINGS_ONLY_BOARD);
        let err = parse_fen4(&text).expect_err("only three elimination flags");
        assert_eq!(
            err,
            Fen4Error::Malformed {
                position: 2,
                message: "expected four flag entries, found 3".to_owned()
            }
        );
        assert!(matches!(
            parse_fen4("X-0,0,0,0"),
            Err(Fen4Error::Malformed { .. })
        ));
    }
}
