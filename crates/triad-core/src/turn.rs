//! Turn state machine.
//!
//! A match alternates between `Player1Turn` and `Player2Turn` until a
//! placement leaves the board in a terminal position, after which it is
//! `GameOver` for good. Within a turn a player may play at most one character
//! card and at most one special (action or effect) card. Placing a character
//! always ends the turn; playing a special never does.

use crate::actions::GameEvent;
use crate::board::{Board, Seat};
use crate::card::CardKind;
use crate::game::{GameError, GameState};
use crate::player::DrawOutcome;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Where the match is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnState {
    Player1Turn,
    Player2Turn,
    GameOver,
}

impl TurnState {
    /// Seat whose turn it is, `None` once the game is over
    pub fn seat(&self) -> Option<Seat> {
        match self {
            TurnState::Player1Turn => Some(Seat::Player1),
            TurnState::Player2Turn => Some(Seat::Player2),
            TurnState::GameOver => None,
        }
    }
}

/// Owned character counts at game end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalScores {
    pub player1: u32,
    pub player2: u32,
}

impl FinalScores {
    /// Count current ownership on a board
    pub fn tally(board: &Board) -> Self {
        Self {
            player1: board.count_owned(Seat::Player1),
            player2: board.count_owned(Seat::Player2),
        }
    }

    pub fn get(&self, seat: Seat) -> u32 {
        match seat {
            Seat::Player1 => self.player1,
            Seat::Player2 => self.player2,
        }
    }

    pub fn outcome(&self) -> Outcome {
        use std::cmp::Ordering;
        match self.player1.cmp(&self.player2) {
            Ordering::Greater => Outcome::Winner(Seat::Player1),
            Ordering::Less => Outcome::Winner(Seat::Player2),
            Ordering::Equal => Outcome::Tie,
        }
    }
}

/// How a finished match ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Winner(Seat),
    Tie,
}

impl Outcome {
    pub fn winner(&self) -> Option<Seat> {
        match self {
            Outcome::Winner(seat) => Some(*seat),
            Outcome::Tie => None,
        }
    }
}

/// Decide whether the board is terminal.
///
/// The match ends when the grid is full, or when a player who has placed at
/// least one character owns none on the board while the opponent owns at
/// least one. `placed` is the number of characters each seat has put down.
pub fn evaluate_game_over(board: &Board, placed: FinalScores) -> Option<FinalScores> {
    let owned = FinalScores::tally(board);

    if board.is_full() {
        return Some(owned);
    }
    if board.character_count() == 0 {
        return None;
    }

    let wiped_out = |seat: Seat| {
        placed.get(seat) > 0 && owned.get(seat) == 0 && owned.get(seat.other()) > 0
    };
    if wiped_out(Seat::Player1) || wiped_out(Seat::Player2) {
        return Some(owned);
    }

    None
}

impl GameState {
    /// Current state of the turn machine
    pub fn turn_state(&self) -> TurnState {
        if self.final_scores.is_some() {
            return TurnState::GameOver;
        }
        match self.current_turn {
            Seat::Player1 => TurnState::Player1Turn,
            Seat::Player2 => TurnState::Player2Turn,
        }
    }

    /// Check whether `seat` may make a move of the given kind right now.
    ///
    /// `None` stands for ending the turn. A player who has placed a character
    /// keeps its flag until its next turn starts, so a repeated placement is
    /// reported as `AlreadyPlayedThisTurn` rather than `NotYourTurn`.
    pub fn check_turn(&self, seat: Seat, kind: Option<CardKind>) -> Result<(), GameError> {
        if self.is_finished() {
            return Err(GameError::GameAlreadyOver);
        }

        let player = self.player(seat);
        match kind {
            Some(CardKind::Character) => {
                if player.has_played_character {
                    return Err(GameError::AlreadyPlayedThisTurn);
                }
                if self.current_turn != seat {
                    return Err(GameError::NotYourTurn);
                }
            }
            Some(CardKind::Special) => {
                if self.current_turn != seat {
                    return Err(GameError::NotYourTurn);
                }
                if player.has_played_special {
                    return Err(GameError::AlreadyPlayedThisTurn);
                }
            }
            None => {
                if self.current_turn != seat {
                    return Err(GameError::NotYourTurn);
                }
            }
        }
        Ok(())
    }

    /// Hand control to the other seat.
    ///
    /// The ending player draws a card, the next player's flags reset.
    pub(crate) fn advance_turn<R: Rng>(&mut self, rng: &mut R) -> Vec<GameEvent> {
        let ending = self.current_turn;
        let next = ending.other();
        let mut events = Vec::new();

        match self.player_mut(ending).draw_card(rng) {
            DrawOutcome::Exhausted => {}
            outcome => events.push(GameEvent::CardDrawn {
                player: ending,
                to_hand: outcome == DrawOutcome::ToHand,
            }),
        }

        self.player_mut(next).reset_turn_flags();
        self.current_turn = next;
        debug!("Turn passes from {:?} to {:?}", ending, next);

        events.push(GameEvent::TurnEnded {
            player: ending,
            next_player: next,
        });
        events
    }

    /// Enter `GameOver` if the board is terminal
    pub(crate) fn finish_if_over(&mut self) -> Option<GameEvent> {
        let placed = FinalScores {
            player1: self.player1.characters_placed,
            player2: self.player2.characters_placed,
        };
        let scores = evaluate_game_over(&self.grid, placed)?;
        let outcome = scores.outcome();

        info!(
            "Game over: {} {} - {} {} ({:?})",
            self.player1.name, scores.player1, scores.player2, self.player2.name, outcome
        );
        self.final_scores = Some(scores);
        Some(GameEvent::GameOver { scores, outcome })
    }
}
