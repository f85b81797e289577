//! Board representation.
//!
//! The arena is a fixed 3×5 grid. Each cell is either empty or holds exactly
//! one card. Cells are never cleared during a match.

use crate::card::{Card, Element};
use crate::game::GameError;
use serde::{Deserialize, Serialize};

/// Number of rows on the board
pub const BOARD_ROWS: usize = 3;

/// Number of columns on the board
pub const BOARD_COLS: usize = 5;

/// Total number of cells
pub const BOARD_CELLS: usize = BOARD_ROWS * BOARD_COLS;

/// Which side of the table a player sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Seat {
    Player1,
    Player2,
}

impl Seat {
    pub const ALL: [Seat; 2] = [Seat::Player1, Seat::Player2];

    /// The opposing seat
    pub fn other(&self) -> Seat {
        match self {
            Seat::Player1 => Seat::Player2,
            Seat::Player2 => Seat::Player1,
        }
    }
}

/// A cell coordinate on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Checked constructor
    pub fn checked(row: usize, col: usize) -> Result<Self, GameError> {
        if row < BOARD_ROWS && col < BOARD_COLS {
            Ok(Self { row, col })
        } else {
            Err(GameError::OutOfRange)
        }
    }

    /// The in-bounds cell one step in `direction`, if any
    pub fn step(&self, direction: Direction) -> Option<Position> {
        let (dr, dc) = direction.offset();
        let row = self.row.checked_add_signed(dr)?;
        let col = self.col.checked_add_signed(dc)?;
        Position::checked(row, col).ok()
    }
}

/// Orthogonal neighbor directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// (row, col) offset
    pub fn offset(&self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    /// Element compared when attacking a neighbor in this direction.
    ///
    /// The axis is fixed per direction and is the same on both cards. It does
    /// not mirror faces: attacking upward compares Water with Water.
    pub fn axis(&self) -> Element {
        match self {
            Direction::Up => Element::Water,
            Direction::Down => Element::Fire,
            Direction::Left => Element::Air,
            Direction::Right => Element::Earth,
        }
    }
}

/// The 3×5 arena grid
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: [[Option<Card>; BOARD_COLS]; BOARD_ROWS],
}

impl Board {
    /// Create an empty board
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the cell at (row, col)
    pub fn cell_at(&self, row: usize, col: usize) -> Result<Option<&Card>, GameError> {
        let pos = Position::checked(row, col)?;
        Ok(self.get(pos))
    }

    /// Get the card at an in-bounds position
    pub fn get(&self, pos: Position) -> Option<&Card> {
        self.cells.get(pos.row)?.get(pos.col)?.as_ref()
    }

    pub(crate) fn get_mut(&mut self, pos: Position) -> Option<&mut Card> {
        self.cells.get_mut(pos.row)?.get_mut(pos.col)?.as_mut()
    }

    /// Place a card. A character card becomes owned by `owner`.
    pub fn place(
        &mut self,
        row: usize,
        col: usize,
        mut card: Card,
        owner: Seat,
    ) -> Result<Position, GameError> {
        let pos = Position::checked(row, col)?;
        let cell = &mut self.cells[pos.row][pos.col];
        if cell.is_some() {
            return Err(GameError::CellOccupied);
        }

        if let Card::Character(character) = &mut card {
            character.owner = Some(owner);
        }
        *cell = Some(card);
        Ok(pos)
    }

    /// Whether every cell is occupied
    pub fn is_full(&self) -> bool {
        self.occupied_count() == BOARD_CELLS
    }

    /// Number of occupied cells
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().flatten().filter(|c| c.is_some()).count()
    }

    /// Empty positions in row-major order
    pub fn empty_positions(&self) -> Vec<Position> {
        self.positions().filter(|p| self.get(*p).is_none()).collect()
    }

    /// Every position in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        (0..BOARD_ROWS).flat_map(|row| (0..BOARD_COLS).map(move |col| Position::new(row, col)))
    }

    /// Number of character cards currently owned by `seat`
    pub fn count_owned(&self, seat: Seat) -> u32 {
        self.characters()
            .filter(|(_, c)| c.owner == Some(seat))
            .count() as u32
    }

    /// Number of character cards on the board
    pub fn character_count(&self) -> u32 {
        self.characters().count() as u32
    }

    /// All placed character cards with their positions
    pub fn characters(&self) -> impl Iterator<Item = (Position, &crate::card::CharacterCard)> {
        self.positions()
            .filter_map(move |p| self.get(p).and_then(Card::as_character).map(|c| (p, c)))
    }

    /// In-bounds neighbors with the direction they lie in
    pub fn neighbors(&self, pos: Position) -> Vec<(Direction, Position)> {
        Direction::ALL
            .iter()
            .filter_map(|d| pos.step(*d).map(|p| (*d, p)))
            .collect()
    }

    /// Boost every character owned by `seat`
    pub(crate) fn boost_owned(&mut self, seat: Seat, delta: i32) -> u32 {
        let mut boosted = 0;
        for card in self.cells.iter_mut().flatten().flatten() {
            if let Card::Character(c) = card {
                if c.owner == Some(seat) {
                    c.elements.boost_all(delta);
                    boosted += 1;
                }
            }
        }
        boosted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{ActionCard, ActionEffect, CharacterCard, Elements};

    fn character(name: &str) -> Card {
        Card::Character(CharacterCard::new(name, "Light", Elements::uniform(3)))
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new();
        assert_eq!(board.occupied_count(), 0);
        assert_eq!(board.empty_positions().len(), BOARD_CELLS);
        assert!(!board.is_full());
    }

    #[test]
    fn test_cell_at_bounds() {
        let board = Board::new();
        assert!(board.cell_at(2, 4).unwrap().is_none());
        assert!(matches!(board.cell_at(3, 0), Err(GameError::OutOfRange)));
        assert!(matches!(board.cell_at(0, 5), Err(GameError::OutOfRange)));
    }

    #[test]
    fn test_place_sets_owner() {
        let mut board = Board::new();
        board.place(1, 2, character("A"), Seat::Player2).unwrap();

        let placed = board.cell_at(1, 2).unwrap().unwrap();
        assert_eq!(placed.as_character().unwrap().owner, Some(Seat::Player2));
        assert_eq!(board.count_owned(Seat::Player2), 1);
        assert_eq!(board.count_owned(Seat::Player1), 0);
    }

    #[test]
    fn test_place_occupied_fails() {
        let mut board = Board::new();
        board.place(0, 0, character("A"), Seat::Player1).unwrap();
        let err = board.place(0, 0, character("B"), Seat::Player2).unwrap_err();
        assert!(matches!(err, GameError::CellOccupied));
        assert_eq!(board.get(Position::new(0, 0)).unwrap().name(), "A");
    }

    #[test]
    fn test_place_out_of_range_fails() {
        let mut board = Board::new();
        let err = board.place(5, 0, character("A"), Seat::Player1).unwrap_err();
        assert!(matches!(err, GameError::OutOfRange));
    }

    #[test]
    fn test_is_full() {
        let mut board = Board::new();
        for (i, pos) in board.positions().collect::<Vec<_>>().into_iter().enumerate() {
            assert!(!board.is_full());
            board
                .place(pos.row, pos.col, character(&format!("C{i}")), Seat::Player1)
                .unwrap();
        }
        assert!(board.is_full());
    }

    #[test]
    fn test_non_character_not_counted() {
        let mut board = Board::new();
        let action = Card::Action(ActionCard::new("Surge", ActionEffect::Boost, 1));
        board.place(0, 0, action, Seat::Player1).unwrap();
        assert_eq!(board.occupied_count(), 1);
        assert_eq!(board.character_count(), 0);
    }

    #[test]
    fn test_corner_neighbors() {
        let board = Board::new();
        let n = board.neighbors(Position::new(0, 0));
        assert_eq!(
            n,
            vec![
                (Direction::Down, Position::new(1, 0)),
                (Direction::Right, Position::new(0, 1)),
            ]
        );
        assert_eq!(board.neighbors(Position::new(1, 2)).len(), 4);
    }

    #[test]
    fn test_direction_axes_are_fixed() {
        assert_eq!(Direction::Up.axis(), Element::Water);
        assert_eq!(Direction::Down.axis(), Element::Fire);
        assert_eq!(Direction::Left.axis(), Element::Air);
        assert_eq!(Direction::Right.axis(), Element::Earth);
    }
}
