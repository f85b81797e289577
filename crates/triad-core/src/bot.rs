//! AI players for the `"Computer"` seat.
//!
//! The engine only requires that a policy picks a currently-legal move; how
//! it picks is up to the policy. Three difficulty levels are provided:
//! - Easy: random placement
//! - Medium: greedy, maximizes immediate captures
//! - Hard: captures minus the opponent's best immediate reply

use crate::actions::Move;
use crate::board::Seat;
use crate::card::{ActionEffect, Card};
use crate::game::GameState;
use crate::player::HAND_LIMIT;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

/// Chooses moves for a seat
pub trait MovePolicy {
    /// Pick a move for `seat`, or `None` if it has nothing to do
    fn choose_move(&mut self, state: &GameState, seat: Seat) -> Option<Move>;
}

/// Bot difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BotDifficulty {
    Easy,
    Medium,
    Hard,
}

impl std::str::FromStr for BotDifficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(BotDifficulty::Easy),
            "medium" => Ok(BotDifficulty::Medium),
            "hard" => Ok(BotDifficulty::Hard),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// A bot player that can decide on moves
pub struct Bot {
    pub difficulty: BotDifficulty,
    rng: StdRng,
}

impl Bot {
    pub fn new(difficulty: BotDifficulty) -> Self {
        Self {
            difficulty,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(difficulty: BotDifficulty, seed: u64) -> Self {
        Self {
            difficulty,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Play a held special card when it would do something useful
    fn choose_special(&mut self, state: &GameState, seat: Seat, moves: &[Move]) -> Option<Move> {
        let player = state.player(seat);
        let owns_board_cards = state.grid.count_owned(seat) > 0;

        moves
            .iter()
            .filter_map(|mv| match mv {
                Move::PlaySpecial { card } => player.find_in_hand(card).map(|c| (mv, c)),
                _ => None,
            })
            .find(|(_, card)| match card {
                Card::Action(a) => match a.effect_type {
                    ActionEffect::Boost => a.value > 0 && owns_board_cards,
                    ActionEffect::ExtraDraw => {
                        player.hand.len() + (a.value.max(0) as usize) <= HAND_LIMIT
                    }
                },
                Card::Effect(_) => player.active_effect.is_none(),
                Card::Character(_) => false,
            })
            .map(|(mv, _)| mv.clone())
    }

    /// Captures a placement would make right now
    fn captures_for(state: &GameState, seat: Seat, mv: &Move) -> Option<(i32, GameState)> {
        let t = state.apply_move(seat, mv.clone()).ok()?;
        Some((t.captures.len() as i32, t.state))
    }

    /// Best capture count available to `seat` on its next placement
    fn best_reply(state: &GameState, seat: Seat) -> i32 {
        state
            .valid_moves(seat)
            .iter()
            .filter(|mv| matches!(mv, Move::PlaceCharacter { .. }))
            .filter_map(|mv| Self::captures_for(state, seat, mv).map(|(n, _)| n))
            .max()
            .unwrap_or(0)
    }

    fn score(&self, state: &GameState, seat: Seat, mv: &Move) -> i32 {
        let (captures, after) = match Self::captures_for(state, seat, mv) {
            Some(result) => result,
            None => return i32::MIN,
        };

        match self.difficulty {
            BotDifficulty::Easy => 0,
            BotDifficulty::Medium => captures,
            BotDifficulty::Hard => {
                if let Some(outcome) = after.outcome() {
                    return match outcome.winner() {
                        Some(w) if w == seat => 1000,
                        Some(_) => -1000,
                        None => 0,
                    };
                }
                captures - Self::best_reply(&after, seat.other())
            }
        }
    }

    /// Pick the highest scoring placement, breaking ties at random
    fn choose_placement(
        &mut self,
        state: &GameState,
        seat: Seat,
        placements: &[&Move],
    ) -> Option<Move> {
        if self.difficulty == BotDifficulty::Easy {
            return placements.choose(&mut self.rng).map(|mv| (*mv).clone());
        }

        let scored: Vec<(&Move, i32)> = placements
            .iter()
            .map(|mv| (*mv, self.score(state, seat, mv)))
            .collect();
        let best = scored.iter().map(|(_, s)| *s).max()?;
        let top: Vec<&Move> = scored
            .into_iter()
            .filter(|(_, s)| *s == best)
            .map(|(mv, _)| mv)
            .collect();
        top.choose(&mut self.rng).map(|mv| (*mv).clone())
    }
}

impl MovePolicy for Bot {
    fn choose_move(&mut self, state: &GameState, seat: Seat) -> Option<Move> {
        let moves = state.valid_moves(seat);
        if moves.is_empty() {
            return None;
        }

        if let Some(special) = self.choose_special(state, seat, &moves) {
            return Some(special);
        }

        let placements: Vec<&Move> = moves
            .iter()
            .filter(|mv| matches!(mv, Move::PlaceCharacter { .. }))
            .collect();
        if placements.is_empty() {
            return Some(Move::EndTurn);
        }

        self.choose_placement(state, seat, &placements)
    }
}

/// Places the first character in hand on the first empty cell, row by row
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstFit;

impl MovePolicy for FirstFit {
    fn choose_move(&mut self, state: &GameState, seat: Seat) -> Option<Move> {
        let moves = state.valid_moves(seat);
        moves
            .iter()
            .find(|mv| matches!(mv, Move::PlaceCharacter { .. }))
            .or_else(|| moves.last())
            .cloned()
    }
}
