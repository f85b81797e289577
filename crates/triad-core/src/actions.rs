//! Moves players submit and the events they produce.

use crate::board::{Position, Seat};
use crate::card::{ActionEffect, CardKind};
use crate::turn::{FinalScores, Outcome};
use serde::{Deserialize, Serialize};

/// All moves a player can submit. Cards are referenced by name from the
/// mover's hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Move {
    /// Put a character card on the board. Always ends the turn.
    PlaceCharacter { card: String, row: usize, col: usize },
    /// Play an action or effect card. Does not end the turn.
    PlaySpecial { card: String },
    /// Pass control to the opponent
    EndTurn,
}

impl Move {
    pub fn place(card: impl Into<String>, row: usize, col: usize) -> Self {
        Move::PlaceCharacter {
            card: card.into(),
            row,
            col,
        }
    }

    pub fn special(card: impl Into<String>) -> Self {
        Move::PlaySpecial { card: card.into() }
    }

    /// Which per-turn limit this move counts against, if any
    pub fn kind(&self) -> Option<CardKind> {
        match self {
            Move::PlaceCharacter { .. } => Some(CardKind::Character),
            Move::PlaySpecial { .. } => Some(CardKind::Special),
            Move::EndTurn => None,
        }
    }
}

/// Events that occur as a result of moves
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A character card was placed
    CharacterPlaced {
        player: Seat,
        card: String,
        position: Position,
    },

    /// Adjacent cards changed owner
    CardsCaptured {
        player: Seat,
        positions: Vec<Position>,
    },

    /// An action card resolved
    ActionPlayed {
        player: Seat,
        card: String,
        effect: ActionEffect,
        value: i32,
    },

    /// An effect card became active
    EffectActivated {
        player: Seat,
        card: String,
        /// The effect it replaced, now in the discard pile
        replaced: Option<String>,
    },

    /// A card was drawn (name hidden from the opponent by the caller)
    CardDrawn { player: Seat, to_hand: bool },

    /// Turn ended
    TurnEnded { player: Seat, next_player: Seat },

    /// The match reached its terminal state
    GameOver {
        scores: FinalScores,
        outcome: Outcome,
    },
}
