//! Bonus decision - which match spawns which bonus tile
//!
//! A pure function from a detected match to an optional placement, applied
//! per match in scan order inside one cascade iteration. Keeping the
//! decision separate from the clear/drop pipeline lets the tie-break rules
//! be tested in isolation.

use trimatch_types::{
    BonusKind, BonusPlacement, MatchDirection, MatchRun, ARROW_MATCH_LEN, STAR_MATCH_MIN_LEN,
};

/// Decide the bonus placement for one match
///
/// Rules:
/// - vertical run of exactly 4: `HorizontalArrow` at the bottommost cell
/// - horizontal run of exactly 4: `VerticalArrow` at the rightmost cell
/// - L-shaped union of 5+: `BonusStar` at the intersection, at most once
///   per cascade iteration (`star_already_placed` is the per-iteration
///   guard; the first qualifying match in scan order wins)
/// - anything else: no bonus
pub fn bonus_for_match(run: &MatchRun, star_already_placed: bool) -> Option<BonusPlacement> {
    match run.direction {
        MatchDirection::Vertical if run.len() == ARROW_MATCH_LEN => {
            let pos = run.positions.iter().copied().max_by_key(|p| p.row)?;
            Some(BonusPlacement {
                pos,
                kind: BonusKind::HorizontalArrow,
            })
        }
        MatchDirection::Horizontal if run.len() == ARROW_MATCH_LEN => {
            let pos = run.positions.iter().copied().max_by_key(|p| p.col)?;
            Some(BonusPlacement {
                pos,
                kind: BonusKind::VerticalArrow,
            })
        }
        MatchDirection::LShaped if run.len() >= STAR_MATCH_MIN_LEN && !star_already_placed => {
            Some(BonusPlacement {
                pos: run.intersection?,
                kind: BonusKind::BonusStar,
            })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trimatch_types::{Position, ShapeId};

    fn run(direction: MatchDirection, positions: Vec<Position>, intersection: Option<Position>) -> MatchRun {
        MatchRun {
            positions,
            direction,
            shape: ShapeId(1),
            intersection,
        }
    }

    #[test]
    fn test_vertical_four_spawns_horizontal_arrow_at_bottom() {
        let m = run(
            MatchDirection::Vertical,
            (2..6).map(|r| Position::new(r, 3)).collect(),
            None,
        );
        assert_eq!(
            bonus_for_match(&m, false),
            Some(BonusPlacement {
                pos: Position::new(5, 3),
                kind: BonusKind::HorizontalArrow,
            })
        );
    }

    #[test]
    fn test_horizontal_four_spawns_vertical_arrow_at_right() {
        let m = run(
            MatchDirection::Horizontal,
            (1..5).map(|c| Position::new(2, c)).collect(),
            None,
        );
        assert_eq!(
            bonus_for_match(&m, false),
            Some(BonusPlacement {
                pos: Position::new(2, 4),
                kind: BonusKind::VerticalArrow,
            })
        );
    }

    #[test]
    fn test_position_order_does_not_change_tie_break() {
        // The detector reports L arms pivot-first; arrows must still pick
        // the extremal cell, not the last one in the list.
        let m = run(
            MatchDirection::Vertical,
            vec![
                Position::new(5, 3),
                Position::new(3, 3),
                Position::new(4, 3),
                Position::new(2, 3),
            ],
            None,
        );
        assert_eq!(bonus_for_match(&m, false).unwrap().pos, Position::new(5, 3));
    }

    #[test]
    fn test_triples_and_long_straights_spawn_nothing() {
        let three = run(
            MatchDirection::Horizontal,
            (0..3).map(|c| Position::new(0, c)).collect(),
            None,
        );
        assert_eq!(bonus_for_match(&three, false), None);

        let five_straight = run(
            MatchDirection::Vertical,
            (0..5).map(|r| Position::new(r, 0)).collect(),
            None,
        );
        assert_eq!(bonus_for_match(&five_straight, false), None);
    }

    #[test]
    fn test_l_of_five_spawns_star_at_intersection() {
        let positions = vec![
            Position::new(2, 0),
            Position::new(2, 1),
            Position::new(2, 2),
            Position::new(1, 0),
            Position::new(0, 0),
        ];
        let m = run(MatchDirection::LShaped, positions, Some(Position::new(2, 0)));

        assert_eq!(
            bonus_for_match(&m, false),
            Some(BonusPlacement {
                pos: Position::new(2, 0),
                kind: BonusKind::BonusStar,
            })
        );
        // Guard: a star already placed this iteration suppresses the next one.
        assert_eq!(bonus_for_match(&m, true), None);
    }
}
