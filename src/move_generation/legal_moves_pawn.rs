use crate::game_state::chess_rules::{
    pawn_capture_offsets, pawn_line, PAWN_PROMOTION_LINE, PAWN_START_LINE,
};
use crate::game_state::chess_types::*;
use crate::game_state::undo_state::PositionState;

pub fn generate_pawn_moves(state: &PositionState, color: Color, out: &mut Vec<Move>) {
    let (df, dr) = color.forward();

    for from in state.pieces(color, PieceKind::Pawn).iter() {
        if let Some(one_step) = from.offset(df, dr) {
            if state.piece_at(one_step).is_none() {
                push_pawn_move(color, from, one_step, out);

                if pawn_line(color, from) == PAWN_START_LINE {
                    if let Some(two_step) = one_step.offset(df, dr) {
                        if state.piece_at(two_step).is_none() {
                            out.push(Move::new(from, two_step));
                        }
                    }
                }
            }
        }

        for (cf, cr) in pawn_capture_offsets(color) {
            let Some(to) = from.offset(cf, cr) else {
                continue;
            };
            match state.piece_at(to) {
                Some(piece) if piece.color != color => push_pawn_move(color, from, to, out),
                Some(_) => {}
                None => {
                    if en_passant_victim(state, color, to).is_some() {
                        out.push(Move::new(from, to));
                    }
                }
            }
        }
    }
}

fn push_pawn_move(color: Color, from: Coord, to: Coord, out: &mut Vec<Move>) {
    if pawn_line(color, to) == PAWN_PROMOTION_LINE {
        for kind in PieceKind::PROMOTIONS {
            out.push(Move::with_promotion(from, to, kind));
        }
    } else {
        out.push(Move::new(from, to));
    }
}

/// The pawn a `mover` pawn captures by landing on the empty square `to`, if
/// `to` is another color's live en-passant target.
pub fn en_passant_victim(state: &PositionState, mover: Color, to: Coord) -> Option<Coord> {
    Color::ALL
        .into_iter()
        .filter(|owner| *owner != mover && state.en_passant[owner.index()] == Some(to))
        .find_map(|owner| {
            let (df, dr) = owner.forward();
            let victim = to.offset(df, dr)?;
            (state.piece_at(victim) == Some(Piece::new(PieceKind::Pawn, owner))).then_some(victim)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(text: &str) -> Coord {
        text.parse().expect("test coordinate should parse")
    }

    #[test]
    fn start_line_pawn_has_single_and_double_step() {
        let mut state = PositionState::default();
        state.put_piece(sq("b6"), Piece::new(PieceKind::Pawn, Color::Blue));
        let mut moves = Vec::new();
        generate_pawn_moves(&state, Color::Blue, &mut moves);
        assert_eq!(
            moves,
            vec![Move::new(sq("b6"), sq("c6")), Move::new(sq("b6"), sq("d6"))]
        );
    }

    #[test]
    fn far_edge_push_fans_out_into_promotions() {
        let mut state = PositionState::default();
        state.put_piece(sq("g13"), Piece::new(PieceKind::Pawn, Color::Red));
        let mut moves = Vec::new();
        generate_pawn_moves(&state, Color::Red, &mut moves);
        assert_eq!(moves.len(), 4);
        assert!(moves.iter().all(|m| m.promotion.is_some() && m.to == sq("g14")));
    }

    #[test]
    fn en_passant_target_is_capturable_by_another_color() {
        let mut state = PositionState::default();
        state.put_piece(sq("d4"), Piece::new(PieceKind::Pawn, Color::Red));
        state.put_piece(sq("c4"), Piece::new(PieceKind::Pawn, Color::Blue));
        state.en_passant[Color::Red.index()] = Some(sq("d3"));
        assert_eq!(en_passant_victim(&state, Color::Blue, sq("d3")), Some(sq("d4")));
        assert_eq!(en_passant_victim(&state, Color::Red, sq("d3")), None);

        let mut moves = Vec::new();
        generate_pawn_moves(&state, Color::Blue, &mut moves);
        assert!(moves.contains(&Move::new(sq("c4"), sq("d3"))));
    }
}
