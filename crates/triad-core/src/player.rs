//! Player state.
//!
//! This module contains:
//! - Player struct with hand, draw pile, discard pile and active effect
//! - Per-turn play flags
//! - Card drawing with the hand limit

use crate::card::{Card, EffectCard};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Maximum number of cards a hand can hold
pub const HAND_LIMIT: usize = 10;

/// Name reserved for the AI opponent
pub const COMPUTER_NAME: &str = "Computer";

/// Result of drawing a single card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawOutcome {
    /// The card went into the hand
    ToHand,
    /// The hand was full, the card went to the discard pile
    Discarded,
    /// Nothing left to draw
    Exhausted,
}

/// A player in a match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Unique identity within the match
    pub name: String,
    /// Cards in hand, in the order they were drawn
    pub hand: Vec<Card>,
    /// Draw pile, top card first
    pub deck: Vec<Card>,
    pub discard_pile: Vec<Card>,
    /// Effect card currently modifying this player's attacks
    pub active_effect: Option<EffectCard>,
    pub has_played_character: bool,
    pub has_played_special: bool,
    /// Characters this player has put on the board this match
    pub characters_placed: u32,
}

impl Player {
    /// Create a player with a draw pile and an empty hand
    pub fn new(name: impl Into<String>, deck: Vec<Card>) -> Self {
        Self {
            name: name.into(),
            hand: Vec::new(),
            deck,
            discard_pile: Vec::new(),
            active_effect: None,
            has_played_character: false,
            has_played_special: false,
            characters_placed: 0,
        }
    }

    /// Whether this is the AI opponent
    pub fn is_computer(&self) -> bool {
        self.name == COMPUTER_NAME
    }

    /// Clear both per-turn flags
    pub fn reset_turn_flags(&mut self) {
        self.has_played_character = false;
        self.has_played_special = false;
    }

    /// Find a card in hand by name
    pub fn find_in_hand(&self, name: &str) -> Option<&Card> {
        self.hand.iter().find(|c| c.name() == name)
    }

    /// Remove a card from hand by name
    pub fn take_from_hand(&mut self, name: &str) -> Option<Card> {
        let idx = self.hand.iter().position(|c| c.name() == name)?;
        Some(self.hand.remove(idx))
    }

    /// Whether the hand holds at least one character card
    pub fn has_character_in_hand(&self) -> bool {
        self.hand.iter().any(Card::is_character)
    }

    /// Draw the top card of the deck.
    ///
    /// An empty deck is refilled by shuffling the discard pile.
    pub fn draw_card<R: Rng>(&mut self, rng: &mut R) -> DrawOutcome {
        if self.deck.is_empty() {
            if self.discard_pile.is_empty() {
                return DrawOutcome::Exhausted;
            }
            self.deck = std::mem::take(&mut self.discard_pile);
            self.deck.shuffle(rng);
        }

        let card = self.deck.remove(0);
        if self.hand.len() < HAND_LIMIT {
            self.hand.push(card);
            DrawOutcome::ToHand
        } else {
            self.discard_pile.push(card);
            DrawOutcome::Discarded
        }
    }

    /// Deal `count` character cards from the deck into the hand.
    ///
    /// Characters are taken in deck order; other cards stay in the deck.
    pub fn deal_characters(&mut self, count: usize) -> usize {
        let mut dealt = 0;
        let mut i = 0;
        while dealt < count && i < self.deck.len() {
            if self.deck[i].is_character() && self.hand.len() < HAND_LIMIT {
                let card = self.deck.remove(i);
                self.hand.push(card);
                dealt += 1;
            } else {
                i += 1;
            }
        }
        dealt
    }
}
