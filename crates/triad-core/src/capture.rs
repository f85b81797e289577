//! Capture resolution.
//!
//! After a character card lands, each orthogonal opposing neighbor is
//! attacked on the element axis fixed for that direction (see
//! [`Direction::axis`]). The attacker wins ties. All captures from a single
//! placement are decided against the board as it was before any flip, so a
//! freshly captured card never triggers captures of its own.

use crate::board::{Board, Direction, Position, Seat};
use crate::card::{Card, EffectCard};
use tracing::debug;

/// A single capture decided during resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureDuel {
    pub direction: Direction,
    pub target: Position,
    pub attack: u32,
    pub defense: u32,
}

/// Work out which neighbors of `placed` would be captured, without mutating.
///
/// `effect` is the placing player's active effect, if any; its bonus is added
/// to the attacker's value on the compared axis.
pub fn find_captures(
    board: &Board,
    placed: Position,
    effect: Option<&EffectCard>,
) -> Vec<CaptureDuel> {
    let attacker = match board.get(placed).and_then(Card::as_character) {
        Some(c) => c,
        None => return Vec::new(),
    };
    let owner = attacker.owner;

    board
        .neighbors(placed)
        .into_iter()
        .filter_map(|(direction, target)| {
            let defender = board.get(target)?.as_character()?;
            if defender.owner == owner {
                return None;
            }

            let axis = direction.axis();
            let bonus = effect.map(|e| e.bonus(axis)).unwrap_or(0);
            let attack = attacker.elements.get(axis).saturating_add_signed(bonus);
            let defense = defender.elements.get(axis);

            (attack >= defense).then_some(CaptureDuel {
                direction,
                target,
                attack,
                defense,
            })
        })
        .collect()
}

/// Resolve captures around a just-placed card and flip ownership.
///
/// Returns the captured positions in direction order (up, down, left, right).
pub fn resolve_captures(
    board: &mut Board,
    placed: Position,
    captor: Seat,
    effect: Option<&EffectCard>,
) -> Vec<Position> {
    let duels = find_captures(board, placed, effect);

    for duel in &duels {
        if let Some(target) = board.get_mut(duel.target).and_then(Card::as_character_mut) {
            debug!(
                "{:?} captures ({}, {}) going {:?}: {} >= {}",
                captor, duel.target.row, duel.target.col, duel.direction, duel.attack, duel.defense
            );
            target.owner = Some(captor);
            target.is_captured = true;
        }
    }

    duels.into_iter().map(|d| d.target).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{CharacterCard, Element, Elements};
    use std::collections::BTreeMap;

    fn put(board: &mut Board, row: usize, col: usize, elements: Elements, owner: Seat) {
        let card = CharacterCard::new(format!("c{row}{col}"), "Light", elements);
        board.place(row, col, Card::Character(card), owner).unwrap();
    }

    fn owner_at(board: &Board, row: usize, col: usize) -> Option<Seat> {
        board
            .get(Position::new(row, col))
            .and_then(Card::as_character)
            .and_then(|c| c.owner)
    }

    #[test]
    fn test_no_neighbors_no_captures() {
        let mut board = Board::new();
        put(&mut board, 1, 2, Elements::uniform(5), Seat::Player1);
        let captured = resolve_captures(&mut board, Position::new(1, 2), Seat::Player1, None);
        assert!(captured.is_empty());
    }

    #[test]
    fn test_up_compares_water_only() {
        let mut board = Board::new();
        // Neighbor above has huge Fire but Water 5
        put(&mut board, 0, 2, Elements::new(10, 5, 10, 10), Seat::Player2);
        put(&mut board, 1, 2, Elements::new(1, 5, 1, 1), Seat::Player1);

        let captured = resolve_captures(&mut board, Position::new(1, 2), Seat::Player1, None);
        assert_eq!(captured, vec![Position::new(0, 2)]);
        assert_eq!(owner_at(&board, 0, 2), Some(Seat::Player1));

        let flipped = board.get(Position::new(0, 2)).unwrap().as_character().unwrap();
        assert!(flipped.is_captured);
    }

    #[test]
    fn test_each_direction_uses_its_axis() {
        let cases = [
            (Direction::Up, Element::Water),
            (Direction::Down, Element::Fire),
            (Direction::Left, Element::Air),
            (Direction::Right, Element::Earth),
        ];

        for (direction, axis) in cases {
            let center = Position::new(1, 2);
            let target = center.step(direction).unwrap();

            // Attacker is weak everywhere except the expected axis
            let mut attack = Elements::uniform(1);
            attack.set(axis, 6);
            let mut defense = Elements::uniform(9);
            defense.set(axis, 6);

            let mut board = Board::new();
            put(&mut board, target.row, target.col, defense, Seat::Player2);
            put(&mut board, center.row, center.col, attack, Seat::Player1);

            let captured = resolve_captures(&mut board, center, Seat::Player1, None);
            assert_eq!(captured, vec![target], "direction {:?}", direction);
        }
    }

    #[test]
    fn test_lower_value_does_not_capture() {
        let mut board = Board::new();
        put(&mut board, 1, 1, Elements::new(5, 5, 7, 5), Seat::Player2);
        // (1,1) is to the left of (1,2): Air 6 < 7
        put(&mut board, 1, 2, Elements::new(9, 9, 6, 9), Seat::Player1);

        let captured = resolve_captures(&mut board, Position::new(1, 2), Seat::Player1, None);
        assert!(captured.is_empty());
        assert_eq!(owner_at(&board, 1, 1), Some(Seat::Player2));
    }

    #[test]
    fn test_own_cards_are_skipped() {
        let mut board = Board::new();
        put(&mut board, 0, 2, Elements::uniform(1), Seat::Player1);
        put(&mut board, 1, 2, Elements::uniform(9), Seat::Player1);

        let captured = resolve_captures(&mut board, Position::new(1, 2), Seat::Player1, None);
        assert!(captured.is_empty());
        let card = board.get(Position::new(0, 2)).unwrap().as_character().unwrap();
        assert!(!card.is_captured);
    }

    #[test]
    fn test_captures_are_simultaneous_and_do_not_chain() {
        let mut board = Board::new();
        // Two opponents around (1,2); a third opponent beyond (0,2) at (0,1)
        put(&mut board, 0, 2, Elements::uniform(1), Seat::Player2);
        put(&mut board, 2, 2, Elements::uniform(1), Seat::Player2);
        put(&mut board, 0, 1, Elements::uniform(1), Seat::Player2);
        put(&mut board, 1, 2, Elements::uniform(5), Seat::Player1);

        let captured = resolve_captures(&mut board, Position::new(1, 2), Seat::Player1, None);
        assert_eq!(captured, vec![Position::new(0, 2), Position::new(2, 2)]);
        // (0,1) is adjacent to the captured (0,2) but stays put
        assert_eq!(owner_at(&board, 0, 1), Some(Seat::Player2));
    }

    #[test]
    fn test_effect_bonus_applies_to_attacker() {
        let mut board = Board::new();
        put(&mut board, 0, 2, Elements::new(1, 7, 1, 1), Seat::Player2);
        put(&mut board, 1, 2, Elements::new(1, 5, 1, 1), Seat::Player1);

        let mut bonuses = BTreeMap::new();
        bonuses.insert(Element::Water, 2);
        let effect = EffectCard::new("Tide", bonuses);

        assert!(find_captures(&board, Position::new(1, 2), None).is_empty());
        let duels = find_captures(&board, Position::new(1, 2), Some(&effect));
        assert_eq!(duels.len(), 1);
        assert_eq!(duels[0].attack, 7);
        assert_eq!(duels[0].defense, 7);
    }
}
