//! Line-delimited JSON protocol for the Triad Arena match host.

use serde::{Deserialize, Serialize};
use triad_core::{FinalScores, GameEvent, GameStateJson, Move, Outcome, Position, Rating};
use uuid::Uuid;

/// Messages sent from client to host.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ClientMessage {
    /// Start a match; no second player means playing the Computer
    NewMatch {
        player1: String,
        player2: Option<String>,
    },

    /// Submit a move for a player
    Play {
        match_id: Uuid,
        player: String,
        #[serde(rename = "move")]
        mv: Move,
    },

    /// Ask the Computer to play its turn
    ComputerTurn { match_id: Uuid },

    /// Request the current state
    GetState { match_id: Uuid },

    /// Request the legal moves for a player
    ValidMoves { match_id: Uuid, player: String },

    /// Concede the match
    Surrender { match_id: Uuid, player: String },

    /// Request match list
    ListMatches,

    /// Request a player's rating
    GetRating { player: String },

    /// Ping for keepalive
    Ping,
}

/// Messages sent from host to client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ServerMessage {
    /// Match created
    MatchCreated {
        match_id: Uuid,
        state: GameStateJson,
    },

    /// A move (or a Computer turn) was applied
    MoveApplied {
        match_id: Uuid,
        captures: Vec<Position>,
        events: Vec<GameEvent>,
    },

    /// Game state snapshot
    GameState {
        match_id: Uuid,
        state: GameStateJson,
    },

    /// Legal moves for a player
    ValidMoves { match_id: Uuid, moves: Vec<Move> },

    /// Match finished
    GameOver {
        match_id: Uuid,
        scores: Option<FinalScores>,
        outcome: Option<Outcome>,
        winner: Option<String>,
        ratings: Vec<RatingInfo>,
    },

    /// List of matches
    MatchList { matches: Vec<MatchInfo> },

    /// A player's ladder record
    Rating { rating: RatingInfo },

    /// Error occurred
    Error { message: String },

    /// Pong response
    Pong,
}

/// Match information for clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchInfo {
    pub id: Uuid,
    pub player1: String,
    pub player2: String,
    pub status: MatchStatus,
    pub scores: FinalScores,
}

/// A named ladder record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingInfo {
    pub player: String,
    #[serde(flatten)]
    pub rating: Rating,
}

/// Match status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStatus {
    InProgress,
    Finished,
    Surrendered,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_message_shape() {
        let line = r#"{"type":"Play","payload":{"match_id":"67e55044-10b1-426f-9247-bb680e5fe0c8","player":"Alice","move":{"PlaceCharacter":{"card":"Light Creature 1","row":1,"col":2}}}}"#;
        let msg: ClientMessage = serde_json::from_str(line).unwrap();
        match msg {
            ClientMessage::Play { player, mv, .. } => {
                assert_eq!(player, "Alice");
                assert_eq!(mv, Move::place("Light Creature 1", 1, 2));
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[test]
    fn test_unit_messages() {
        let msg: ClientMessage = serde_json::from_str(r#"{"type":"Ping"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::Ping));

        let json = serde_json::to_string(&ServerMessage::Pong).unwrap();
        assert_eq!(json, r#"{"type":"Pong"}"#);
    }
}
