//! Core game engine.
//!
//! This module contains the `GameState` struct and the single entry point
//! that applies moves to it. `apply_move` never mutates its input: it works
//! on a copy and hands back the new state, so a rejected move leaves the
//! caller's state exactly as it was.

use crate::actions::{GameEvent, Move};
use crate::board::{Board, Position, Seat};
use crate::bot::MovePolicy;
use crate::capture::resolve_captures;
use crate::card::{ActionEffect, Card, CardKind, Faction};
use crate::config::MatchConfig;
use crate::player::Player;
use crate::turn::{FinalScores, Outcome};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when applying moves
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GameError {
    #[error("Position is outside the board")]
    OutOfRange,

    #[error("Cell is occupied")]
    CellOccupied,

    #[error("Not your turn")]
    NotYourTurn,

    #[error("Already played a card of that kind this turn")]
    AlreadyPlayedThisTurn,

    #[error("Game is over")]
    GameAlreadyOver,

    #[error("Card not found in hand: {0}")]
    CardNotInHand(String),

    #[error("Card cannot be played that way")]
    WrongCardKind,

    #[error("Computer policy chose an illegal move")]
    IllegalPolicyMove,
}

/// Result of a successful move
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// State after the move
    pub state: GameState,
    /// Cells whose owner changed, for the caller to animate
    pub captures: Vec<Position>,
    pub events: Vec<GameEvent>,
}

/// The complete game state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub player1: Player,
    pub player2: Player,
    pub grid: Board,
    /// Whose turn it is (the last mover once the game is over)
    pub current_turn: Seat,
    /// Present iff the game has ended
    pub final_scores: Option<FinalScores>,
    /// Number of moves applied so far
    pub move_number: u32,
    /// Random number generator seed (for deterministic replays)
    rng_seed: u64,
}

impl GameState {
    /// Create a new match with freshly built faction decks and dealt hands
    pub fn new(
        player1_name: impl Into<String>,
        player2_name: impl Into<String>,
        config: &MatchConfig,
    ) -> Self {
        let rng_seed = config.seed.unwrap_or_else(|| rand::thread_rng().gen());
        let mut rng = StdRng::seed_from_u64(rng_seed);

        let light = Faction::Light.build_deck(config.deck_size, &mut rng);
        let dark = Faction::Dark.build_deck(config.deck_size, &mut rng);
        let mut player1 = Player::new(player1_name, light);
        let mut player2 = Player::new(player2_name, dark);
        player1.deal_characters(config.starting_hand);
        player2.deal_characters(config.starting_hand);

        Self::from_players(player1, player2, rng_seed)
    }

    /// Start a match from prepared players on an empty board. Player1 moves first.
    pub fn from_players(player1: Player, player2: Player, rng_seed: u64) -> Self {
        Self {
            player1,
            player2,
            grid: Board::new(),
            current_turn: Seat::Player1,
            final_scores: None,
            move_number: 0,
            rng_seed,
        }
    }

    /// Create a match against the AI opponent
    pub fn new_vs_computer(player_name: impl Into<String>, config: &MatchConfig) -> Self {
        Self::new(player_name, crate::player::COMPUTER_NAME, config)
    }

    pub fn rng_seed(&self) -> u64 {
        self.rng_seed
    }

    pub fn player(&self, seat: Seat) -> &Player {
        match seat {
            Seat::Player1 => &self.player1,
            Seat::Player2 => &self.player2,
        }
    }

    pub(crate) fn player_mut(&mut self, seat: Seat) -> &mut Player {
        match seat {
            Seat::Player1 => &mut self.player1,
            Seat::Player2 => &mut self.player2,
        }
    }

    /// Look up a seat by player name
    pub fn seat_of(&self, name: &str) -> Option<Seat> {
        Seat::ALL.into_iter().find(|s| self.player(*s).name == name)
    }

    /// Check if the game is finished
    pub fn is_finished(&self) -> bool {
        self.final_scores.is_some()
    }

    /// How the match ended, if it has
    pub fn outcome(&self) -> Option<Outcome> {
        self.final_scores.map(|s| s.outcome())
    }

    /// Get the winner if the game is finished and not tied
    pub fn winner(&self) -> Option<Seat> {
        self.outcome()?.winner()
    }

    /// Characters each seat currently owns on the board
    pub fn current_scores(&self) -> FinalScores {
        FinalScores::tally(&self.grid)
    }

    /// RNG for the next move, derived from the match seed and move count
    fn move_rng(&self) -> StdRng {
        let salt = u64::from(self.move_number).wrapping_mul(0x9E37_79B9_7F4A_7C15);
        StdRng::seed_from_u64(self.rng_seed ^ salt)
    }

    /// Get all currently valid moves for a player
    pub fn valid_moves(&self, seat: Seat) -> Vec<Move> {
        let mut moves = Vec::new();
        if self.is_finished() || self.current_turn != seat {
            return moves;
        }

        let player = self.player(seat);

        if !player.has_played_special {
            for card in player.hand.iter().filter(|c| !c.is_character()) {
                moves.push(Move::special(card.name()));
            }
        }

        if !player.has_played_character {
            let empty = self.grid.empty_positions();
            for card in player.hand.iter().filter(|c| c.is_character()) {
                for pos in &empty {
                    moves.push(Move::place(card.name(), pos.row, pos.col));
                }
            }
        }

        moves.push(Move::EndTurn);
        moves
    }

    /// Apply a move for `seat`, returning the resulting state.
    ///
    /// The same input always yields the same output.
    pub fn apply_move(&self, seat: Seat, mv: Move) -> Result<Transition, GameError> {
        if self.is_finished() {
            return Err(GameError::GameAlreadyOver);
        }

        let mut next = self.clone();
        let mut rng = self.move_rng();
        let mut captures = Vec::new();
        let mut events = Vec::new();

        match mv {
            Move::PlaceCharacter { card, row, col } => {
                if self.grid.cell_at(row, col)?.is_some() {
                    return Err(GameError::CellOccupied);
                }
                self.check_turn(seat, Some(CardKind::Character))?;
                self.require_in_hand(seat, &card, CardKind::Character)?;

                let taken = next
                    .player_mut(seat)
                    .take_from_hand(&card)
                    .ok_or_else(|| GameError::CardNotInHand(card.clone()))?;
                let pos = next.grid.place(row, col, taken, seat)?;
                debug!("{:?} places {} at ({}, {})", seat, card, row, col);

                let effect = next.player(seat).active_effect.clone();
                captures = resolve_captures(&mut next.grid, pos, seat, effect.as_ref());

                let player = next.player_mut(seat);
                player.has_played_character = true;
                player.characters_placed += 1;

                events.push(GameEvent::CharacterPlaced {
                    player: seat,
                    card,
                    position: pos,
                });
                if !captures.is_empty() {
                    events.push(GameEvent::CardsCaptured {
                        player: seat,
                        positions: captures.clone(),
                    });
                }

                // Placing a character always consumes the turn
                match next.finish_if_over() {
                    Some(game_over) => events.push(game_over),
                    None => events.extend(next.advance_turn(&mut rng)),
                }
            }

            Move::PlaySpecial { card } => {
                self.check_turn(seat, Some(CardKind::Special))?;
                self.require_in_hand(seat, &card, CardKind::Special)?;

                let taken = next
                    .player_mut(seat)
                    .take_from_hand(&card)
                    .ok_or_else(|| GameError::CardNotInHand(card.clone()))?;
                events.push(next.resolve_special(seat, taken, &mut rng)?);
                next.player_mut(seat).has_played_special = true;
            }

            Move::EndTurn => {
                self.check_turn(seat, None)?;
                events.extend(next.advance_turn(&mut rng));
            }
        }

        next.move_number += 1;
        Ok(Transition {
            state: next,
            captures,
            events,
        })
    }

    /// Let the `"Computer"` seat play out its turn using `policy`.
    ///
    /// Every move the policy picks goes through `apply_move`. Returns the
    /// transitions in order; the last one holds the resulting state.
    pub fn computer_turn(
        &self,
        policy: &mut dyn MovePolicy,
    ) -> Result<Vec<Transition>, GameError> {
        if self.is_finished() {
            return Err(GameError::GameAlreadyOver);
        }
        let seat = self.current_turn;
        if !self.player(seat).is_computer() {
            return Err(GameError::NotYourTurn);
        }

        let mut transitions: Vec<Transition> = Vec::new();
        loop {
            let state = transitions.last().map(|t| &t.state).unwrap_or(self);
            if state.is_finished() || state.current_turn != seat {
                break;
            }

            let mv = policy
                .choose_move(state, seat)
                .ok_or(GameError::IllegalPolicyMove)?;
            if !state.valid_moves(seat).contains(&mv) {
                return Err(GameError::IllegalPolicyMove);
            }

            let transition = state.apply_move(seat, mv)?;
            transitions.push(transition);
        }

        Ok(transitions)
    }

    fn require_in_hand(&self, seat: Seat, name: &str, kind: CardKind) -> Result<(), GameError> {
        let card = self
            .player(seat)
            .find_in_hand(name)
            .ok_or_else(|| GameError::CardNotInHand(name.to_string()))?;
        if card.kind() != kind {
            return Err(GameError::WrongCardKind);
        }
        Ok(())
    }

    fn resolve_special<R: Rng>(
        &mut self,
        seat: Seat,
        card: Card,
        rng: &mut R,
    ) -> Result<GameEvent, GameError> {
        let event = match card {
            Card::Action(action) => {
                match action.effect_type {
                    ActionEffect::Boost => {
                        let boosted = self.grid.boost_owned(seat, action.value);
                        debug!("{:?} boosts {} cards by {}", seat, boosted, action.value);
                    }
                    ActionEffect::ExtraDraw => {
                        let player = self.player_mut(seat);
                        for _ in 0..action.value.max(0) {
                            player.draw_card(rng);
                        }
                    }
                }
                let event = GameEvent::ActionPlayed {
                    player: seat,
                    card: action.name.clone(),
                    effect: action.effect_type,
                    value: action.value,
                };
                self.player_mut(seat).discard_pile.push(Card::Action(action));
                event
            }
            Card::Effect(effect) => {
                let name = effect.name.clone();
                let player = self.player_mut(seat);
                let replaced = player.active_effect.replace(effect).map(|old| {
                    let old_name = old.name.clone();
                    player.discard_pile.push(Card::Effect(old));
                    old_name
                });
                GameEvent::EffectActivated {
                    player: seat,
                    card: name,
                    replaced,
                }
            }
            Card::Character(_) => return Err(GameError::WrongCardKind),
        };
        Ok(event)
    }
}

/// JSON-friendly summary used by hosts and bindings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameStateJson {
    pub state: GameState,
    pub turn: crate::turn::TurnState,
    pub scores: FinalScores,
}

impl From<&GameState> for GameStateJson {
    fn from(state: &GameState) -> Self {
        Self {
            state: state.clone(),
            turn: state.turn_state(),
            scores: state.current_scores(),
        }
    }
}
