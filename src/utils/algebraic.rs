//! Coordinate text conversions.
//!
//! Files run `a..n`, ranks `1..14`; ranks past 9 are written with two digits
//! (`k14`). Corner cells parse as `CoordError::OffBoard`.

use crate::errors::CoordError;
use crate::game_state::chess_types::{Coord, BOARD_WIDTH};

/// Parse coordinate text such as `d2` or `k14`.
pub fn parse_algebraic_coord(text: &str) -> Result<Coord, CoordError> {
    let mut chars = text.chars();
    let Some(file_char) = chars.next() else {
        return Err(CoordError::Empty);
    };
    if !file_char.is_ascii_lowercase() || (file_char as u8 - b'a') as usize >= BOARD_WIDTH {
        return Err(CoordError::InvalidFile(file_char));
    }

    let rank_text = chars.as_str();
    let rank_ok = !rank_text.is_empty()
        && rank_text.bytes().all(|b| b.is_ascii_digit())
        && !rank_text.starts_with('0');
    if !rank_ok {
        return Err(CoordError::InvalidRank(text.to_owned()));
    }
    let rank: usize = rank_text
        .parse()
        .map_err(|_| CoordError::InvalidRank(text.to_owned()))?;
    if !(1..=BOARD_WIDTH).contains(&rank) {
        return Err(CoordError::InvalidRank(text.to_owned()));
    }

    let file = file_char as u8 - b'a';
    Coord::new(file, (rank - 1) as u8).ok_or_else(|| CoordError::OffBoard(text.to_owned()))
}

/// Coordinate text for `coord`, e.g. `"e13"`.
pub fn coord_to_algebraic(coord: Coord) -> String {
    format!("{}{}", file_char(coord.file()), coord.rank() + 1)
}

#[inline]
pub fn file_char(file: u8) -> char {
    char::from(b'a' + file)
}
