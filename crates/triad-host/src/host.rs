//! Match registry and message dispatch.

use crate::protocol::{ClientMessage, MatchInfo, MatchStatus, RatingInfo, ServerMessage};
use crate::session::{MatchSession, SessionError};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, warn};
use triad_core::{
    forfeit, settle, Bot, BotDifficulty, MatchConfig, Rating, Seat, Transition, COMPUTER_NAME,
};
use uuid::Uuid;

/// Host settings read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    /// Base seed for match setup and Computer moves; random when unset
    pub seed: Option<u64>,
    pub bot: BotDifficulty,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            seed: None,
            bot: BotDifficulty::Medium,
        }
    }
}

impl HostConfig {
    /// Read `TRIAD_SEED` and `TRIAD_BOT`.
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Ok(seed) = std::env::var("TRIAD_SEED") {
            config.seed = Some(seed.trim().parse()?);
        }
        if let Ok(bot) = std::env::var("TRIAD_BOT") {
            config.bot = bot.parse().map_err(anyhow::Error::msg)?;
        }

        Ok(config)
    }
}

/// Host state shared by every request.
pub struct HostState {
    pub config: HostConfig,
    /// All matches, finished ones included
    pub matches: DashMap<Uuid, MatchSession>,
    /// Ladder records keyed by player name
    pub ratings: DashMap<String, Rating>,
    matches_created: AtomicU64,
}

impl HostState {
    pub fn new(config: HostConfig) -> Self {
        Self {
            config,
            matches: DashMap::new(),
            ratings: DashMap::new(),
            matches_created: AtomicU64::new(0),
        }
    }

    fn match_config(&self) -> MatchConfig {
        let index = self.matches_created.fetch_add(1, Ordering::Relaxed);
        MatchConfig {
            seed: self.config.seed.map(|s| s.wrapping_add(index)),
            ..MatchConfig::default()
        }
    }

    /// Computer policy for the next move of a match
    fn bot(&self, session: &MatchSession) -> Bot {
        match self.config.seed {
            Some(seed) => Bot::with_seed(self.config.bot, seed ^ session.game.move_number as u64),
            None => Bot::new(self.config.bot),
        }
    }

    pub fn rating(&self, player: &str) -> RatingInfo {
        RatingInfo {
            player: player.to_string(),
            rating: self.ratings.get(player).map(|r| *r).unwrap_or_default(),
        }
    }

    pub fn list_matches(&self) -> Vec<MatchInfo> {
        let mut matches: Vec<MatchInfo> = self.matches.iter().map(|m| m.to_info()).collect();
        matches.sort_by(|a, b| a.id.cmp(&b.id));
        matches
    }

    /// Update both players' ratings once a match has ended.
    ///
    /// Matches against the Computer are unrated. A surrender moves a flat
    /// amount; a played-out match uses the Elo update.
    fn settle_ratings(&self, session: &MatchSession) -> Vec<RatingInfo> {
        let Some(outcome) = session.outcome() else {
            return Vec::new();
        };
        if session.has_computer() {
            return Vec::new();
        }

        let name1 = session.player_name(Seat::Player1);
        let name2 = session.player_name(Seat::Player2);
        let (r1, r2) = (self.rating(name1).rating, self.rating(name2).rating);
        let (p1, p2) = match session.surrendered_by {
            Some(Seat::Player1) => forfeit(r1, r2),
            Some(Seat::Player2) => {
                let (loser, winner) = forfeit(r2, r1);
                (winner, loser)
            }
            None => settle(r1, r2, outcome),
        };
        self.ratings.insert(name1.to_string(), p1);
        self.ratings.insert(name2.to_string(), p2);

        info!(
            "Ratings settled for {}: {} {} / {} {}",
            session.id, name1, p1.rating, name2, p2.rating
        );

        vec![self.rating(name1), self.rating(name2)]
    }

    fn game_over(&self, session: &MatchSession) -> ServerMessage {
        ServerMessage::GameOver {
            match_id: session.id,
            scores: session.game.final_scores,
            outcome: session.outcome(),
            winner: session.winner_name(),
            ratings: self.settle_ratings(session),
        }
    }

    /// Replies for a batch of applied transitions, plus `GameOver` when the match ended
    fn applied(&self, session: &MatchSession, transitions: Vec<Transition>) -> Vec<ServerMessage> {
        let mut replies: Vec<ServerMessage> = transitions
            .into_iter()
            .map(|t| ServerMessage::MoveApplied {
                match_id: session.id,
                captures: t.captures,
                events: t.events,
            })
            .collect();

        if session.status != MatchStatus::InProgress {
            replies.push(self.game_over(session));
        }
        replies
    }

    /// Handle one client message and return the replies in order.
    pub fn handle_message(&self, msg: ClientMessage) -> Vec<ServerMessage> {
        match self.dispatch(msg) {
            Ok(replies) => replies,
            Err(e) => {
                debug!("Request rejected: {}", e);
                vec![ServerMessage::Error {
                    message: e.to_string(),
                }]
            }
        }
    }

    fn dispatch(&self, msg: ClientMessage) -> Result<Vec<ServerMessage>, SessionError> {
        match msg {
            ClientMessage::NewMatch { player1, player2 } => {
                let match_id = Uuid::new_v4();
                let player2 = player2.unwrap_or_else(|| COMPUTER_NAME.to_string());
                let config = self.match_config();
                let session = MatchSession::new(match_id, player1, player2, &config)?;

                info!(
                    "Match {} created: {} vs {}",
                    match_id,
                    session.player_name(Seat::Player1),
                    session.player_name(Seat::Player2)
                );

                let state = (&session.game).into();
                self.matches.insert(match_id, session);
                Ok(vec![ServerMessage::MatchCreated { match_id, state }])
            }

            ClientMessage::Play {
                match_id,
                player,
                mv,
            } => {
                let mut session = self
                    .matches
                    .get_mut(&match_id)
                    .ok_or(SessionError::MatchNotFound)?;
                let mut bot = self.bot(&session);
                let transitions = session.apply_move(&player, mv, &mut bot)?;
                Ok(self.applied(&session, transitions))
            }

            ClientMessage::ComputerTurn { match_id } => {
                let mut session = self
                    .matches
                    .get_mut(&match_id)
                    .ok_or(SessionError::MatchNotFound)?;
                let mut bot = self.bot(&session);
                let transitions = session.computer_turn(&mut bot)?;
                Ok(self.applied(&session, transitions))
            }

            ClientMessage::GetState { match_id } => {
                let session = self
                    .matches
                    .get(&match_id)
                    .ok_or(SessionError::MatchNotFound)?;
                Ok(vec![ServerMessage::GameState {
                    match_id,
                    state: (&session.game).into(),
                }])
            }

            ClientMessage::ValidMoves { match_id, player } => {
                let session = self
                    .matches
                    .get(&match_id)
                    .ok_or(SessionError::MatchNotFound)?;
                let seat = session
                    .game
                    .seat_of(&player)
                    .ok_or(SessionError::PlayerNotInMatch)?;
                let moves = if session.status == MatchStatus::InProgress {
                    session.game.valid_moves(seat)
                } else {
                    Vec::new()
                };
                Ok(vec![ServerMessage::ValidMoves { match_id, moves }])
            }

            ClientMessage::Surrender { match_id, player } => {
                let mut session = self
                    .matches
                    .get_mut(&match_id)
                    .ok_or(SessionError::MatchNotFound)?;
                session.surrender(&player)?;
                info!("{} surrendered match {}", player, match_id);
                Ok(vec![self.game_over(&session)])
            }

            ClientMessage::ListMatches => Ok(vec![ServerMessage::MatchList {
                matches: self.list_matches(),
            }]),

            ClientMessage::GetRating { player } => Ok(vec![ServerMessage::Rating {
                rating: self.rating(&player),
            }]),

            ClientMessage::Ping => Ok(vec![ServerMessage::Pong]),
        }
    }

    /// Handle one raw protocol line
    pub fn handle_line(&self, line: &str) -> Vec<ServerMessage> {
        match serde_json::from_str::<ClientMessage>(line) {
            Ok(msg) => self.handle_message(msg),
            Err(e) => {
                warn!("Invalid message: {}: {}", e, line);
                vec![ServerMessage::Error {
                    message: format!("Invalid message: {}", e),
                }]
            }
        }
    }
}

impl Default for HostState {
    fn default() -> Self {
        Self::new(HostConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use triad_core::{GameEvent, Move, Outcome};

    fn seeded() -> HostState {
        HostState::new(HostConfig {
            seed: Some(99),
            bot: BotDifficulty::Hard,
        })
    }

    fn create(host: &HostState, player2: Option<&str>) -> Uuid {
        let replies = host.handle_message(ClientMessage::NewMatch {
            player1: "Alice".to_string(),
            player2: player2.map(str::to_string),
        });
        match &replies[..] {
            [ServerMessage::MatchCreated { match_id, .. }] => *match_id,
            other => panic!("unexpected replies: {:?}", other),
        }
    }

    fn first_character(host: &HostState, match_id: Uuid, seat: Seat) -> String {
        let session = host.matches.get(&match_id).unwrap();
        session
            .game
            .player(seat)
            .hand
            .iter()
            .find(|c| c.is_character())
            .unwrap()
            .name()
            .to_string()
    }

    #[test]
    fn test_ping() {
        let host = HostState::default();
        let replies = host.handle_line(r#"{"type":"Ping"}"#);
        assert!(matches!(replies[..], [ServerMessage::Pong]));
    }

    #[test]
    fn test_invalid_line() {
        let host = HostState::default();
        let replies = host.handle_line("not json");
        assert!(matches!(replies[..], [ServerMessage::Error { .. }]));
    }

    #[test]
    fn test_unknown_match() {
        let host = HostState::default();
        let replies = host.handle_message(ClientMessage::GetState {
            match_id: Uuid::new_v4(),
        });
        match &replies[..] {
            [ServerMessage::Error { message }] => assert_eq!(message, "Match not found"),
            other => panic!("unexpected replies: {:?}", other),
        }
    }

    #[test]
    fn test_new_match_defaults_to_computer() {
        let host = seeded();
        let match_id = create(&host, None);
        let session = host.matches.get(&match_id).unwrap();
        assert!(session.has_computer());
        assert_eq!(session.player_name(Seat::Player2), COMPUTER_NAME);
    }

    #[test]
    fn test_play_against_computer() {
        let host = seeded();
        let match_id = create(&host, None);
        let card = first_character(&host, match_id, Seat::Player1);

        let replies = host.handle_message(ClientMessage::Play {
            match_id,
            player: "Alice".to_string(),
            mv: Move::place(card, 1, 2),
        });

        assert!(replies.len() >= 2);
        match &replies[0] {
            ServerMessage::MoveApplied { events, .. } => {
                assert!(matches!(events[0], GameEvent::CharacterPlaced { .. }));
            }
            other => panic!("unexpected reply: {:?}", other),
        }
        assert_eq!(host.matches.get(&match_id).unwrap().game.grid.occupied_count(), 2);
    }

    #[test]
    fn test_rejected_move_reports_error() {
        let host = seeded();
        let match_id = create(&host, Some("Bob"));

        let replies = host.handle_message(ClientMessage::Play {
            match_id,
            player: "Bob".to_string(),
            mv: Move::EndTurn,
        });
        match &replies[..] {
            [ServerMessage::Error { message }] => assert_eq!(message, "Not your turn"),
            other => panic!("unexpected replies: {:?}", other),
        }
    }

    #[test]
    fn test_valid_moves_for_player() {
        let host = seeded();
        let match_id = create(&host, Some("Bob"));

        let replies = host.handle_message(ClientMessage::ValidMoves {
            match_id,
            player: "Alice".to_string(),
        });
        match &replies[..] {
            [ServerMessage::ValidMoves { moves, .. }] => assert!(!moves.is_empty()),
            other => panic!("unexpected replies: {:?}", other),
        }
    }

    #[test]
    fn test_surrender_settles_ratings() {
        let host = seeded();
        let match_id = create(&host, Some("Bob"));

        let replies = host.handle_message(ClientMessage::Surrender {
            match_id,
            player: "Alice".to_string(),
        });
        match &replies[..] {
            [ServerMessage::GameOver {
                outcome,
                winner,
                ratings,
                ..
            }] => {
                assert_eq!(*outcome, Some(Outcome::Winner(Seat::Player2)));
                assert_eq!(winner.as_deref(), Some("Bob"));
                assert_eq!(ratings.len(), 2);
            }
            other => panic!("unexpected replies: {:?}", other),
        }

        assert_eq!(host.rating("Bob").rating.rating, 1020);
        assert_eq!(host.rating("Alice").rating.rating, 980);
        assert_eq!(host.rating("Bob").rating.games_won, 1);

        let again = host.handle_message(ClientMessage::Surrender {
            match_id,
            player: "Bob".to_string(),
        });
        assert!(matches!(again[..], [ServerMessage::Error { .. }]));
    }

    #[test]
    fn test_same_name_twice_rejected() {
        let host = seeded();
        let replies = host.handle_message(ClientMessage::NewMatch {
            player1: "Alice".to_string(),
            player2: Some("Alice".to_string()),
        });
        match &replies[..] {
            [ServerMessage::Error { message }] => {
                assert_eq!(message, "Both seats use the name Alice")
            }
            other => panic!("unexpected replies: {:?}", other),
        }
        assert!(host.matches.is_empty());
    }

    #[test]
    fn test_computer_name_reserved_against_default_opponent() {
        let host = seeded();
        let replies = host.handle_message(ClientMessage::NewMatch {
            player1: COMPUTER_NAME.to_string(),
            player2: None,
        });
        assert!(matches!(replies[..], [ServerMessage::Error { .. }]));
        assert!(host.matches.is_empty());
    }

    #[test]
    fn test_player2_surrender_settles_flat() {
        let host = seeded();
        let match_id = create(&host, Some("Bob"));

        host.handle_message(ClientMessage::Surrender {
            match_id,
            player: "Bob".to_string(),
        });

        assert_eq!(host.rating("Alice").rating.rating, 1020);
        assert_eq!(host.rating("Alice").rating.games_won, 1);
        assert_eq!(host.rating("Bob").rating.rating, 980);
    }

    #[test]
    fn test_computer_matches_are_unrated() {
        let host = seeded();
        let match_id = create(&host, None);

        host.handle_message(ClientMessage::Surrender {
            match_id,
            player: "Alice".to_string(),
        });

        assert_eq!(host.rating("Alice").rating, Rating::default());
        assert!(host.ratings.is_empty());
    }

    #[test]
    fn test_list_matches() {
        let host = seeded();
        create(&host, Some("Bob"));
        create(&host, None);

        let replies = host.handle_message(ClientMessage::ListMatches);
        match &replies[..] {
            [ServerMessage::MatchList { matches }] => {
                assert_eq!(matches.len(), 2);
                assert!(matches.iter().all(|m| m.status == MatchStatus::InProgress));
            }
            other => panic!("unexpected replies: {:?}", other),
        }
    }
}
