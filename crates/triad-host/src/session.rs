//! A single hosted match.

use thiserror::Error;
use tracing::warn;
use triad_core::{
    GameError, GameState, MatchConfig, Move, MovePolicy, Outcome, Seat, Transition,
};
use uuid::Uuid;

use crate::protocol::{MatchInfo, MatchStatus};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Match not found")]
    MatchNotFound,

    #[error("Player not in match")]
    PlayerNotInMatch,

    #[error("Match already finished")]
    MatchFinished,

    #[error("Computer is not in this match")]
    NoComputer,

    #[error("Both seats use the name {0}")]
    DuplicatePlayer(String),

    #[error(transparent)]
    Game(#[from] GameError),
}

/// A match between two named players.
pub struct MatchSession {
    pub id: Uuid,
    pub status: MatchStatus,
    pub game: GameState,
    /// Set when a player conceded instead of playing it out
    pub surrendered_by: Option<Seat>,
}

impl MatchSession {
    /// Names identify seats, so both must differ.
    pub fn new(
        id: Uuid,
        player1: String,
        player2: String,
        config: &MatchConfig,
    ) -> Result<Self, SessionError> {
        if player1 == player2 {
            return Err(SessionError::DuplicatePlayer(player1));
        }

        Ok(Self {
            id,
            status: MatchStatus::InProgress,
            game: GameState::new(player1, player2, config),
            surrendered_by: None,
        })
    }

    pub fn player_name(&self, seat: Seat) -> &str {
        &self.game.player(seat).name
    }

    pub fn has_computer(&self) -> bool {
        Seat::ALL.iter().any(|s| self.game.player(*s).is_computer())
    }

    /// Whether the Computer should move next
    pub fn computer_to_move(&self) -> bool {
        self.status == MatchStatus::InProgress
            && self.game.player(self.game.current_turn).is_computer()
    }

    fn seat(&self, player: &str) -> Result<Seat, SessionError> {
        self.game.seat_of(player).ok_or(SessionError::PlayerNotInMatch)
    }

    fn ensure_in_progress(&self) -> Result<(), SessionError> {
        if self.status != MatchStatus::InProgress {
            return Err(SessionError::MatchFinished);
        }
        Ok(())
    }

    /// Keep the latest state and track whether the match ended
    fn commit(&mut self, transitions: &[Transition]) {
        if let Some(last) = transitions.last() {
            self.game = last.state.clone();
        }
        if self.game.is_finished() {
            self.status = MatchStatus::Finished;
        }
    }

    /// Apply a player's move, then let the Computer answer if it's its turn.
    pub fn apply_move(
        &mut self,
        player: &str,
        mv: Move,
        policy: &mut dyn MovePolicy,
    ) -> Result<Vec<Transition>, SessionError> {
        self.ensure_in_progress()?;
        let seat = self.seat(player)?;

        let transition = self.game.apply_move(seat, mv)?;
        let mut transitions = vec![transition];
        self.commit(&transitions);

        // The player's move stands even if the reply fails; ComputerTurn retries it
        if self.computer_to_move() {
            match self.game.computer_turn(policy) {
                Ok(replies) => {
                    self.commit(&replies);
                    transitions.extend(replies);
                }
                Err(e) => warn!("Computer reply failed in match {}: {}", self.id, e),
            }
        }

        Ok(transitions)
    }

    /// Let the Computer play its turn
    pub fn computer_turn(
        &mut self,
        policy: &mut dyn MovePolicy,
    ) -> Result<Vec<Transition>, SessionError> {
        self.ensure_in_progress()?;
        if !self.has_computer() {
            return Err(SessionError::NoComputer);
        }

        let transitions = self.game.computer_turn(policy)?;
        self.commit(&transitions);
        Ok(transitions)
    }

    /// Concede; the opponent wins
    pub fn surrender(&mut self, player: &str) -> Result<Outcome, SessionError> {
        self.ensure_in_progress()?;
        let seat = self.seat(player)?;

        self.surrendered_by = Some(seat);
        self.status = MatchStatus::Surrendered;
        Ok(Outcome::Winner(seat.other()))
    }

    /// How the match ended, if it has
    pub fn outcome(&self) -> Option<Outcome> {
        match self.surrendered_by {
            Some(seat) => Some(Outcome::Winner(seat.other())),
            None => self.game.outcome(),
        }
    }

    pub fn winner_name(&self) -> Option<String> {
        let seat = self.outcome()?.winner()?;
        Some(self.player_name(seat).to_string())
    }

    pub fn to_info(&self) -> MatchInfo {
        MatchInfo {
            id: self.id,
            player1: self.player_name(Seat::Player1).to_string(),
            player2: self.player_name(Seat::Player2).to_string(),
            status: self.status,
            scores: self
                .game
                .final_scores
                .unwrap_or_else(|| self.game.current_scores()),
        }
    }
}
