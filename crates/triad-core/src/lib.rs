//! Triad Arena - a 3×5 elemental card-placement battle engine
//!
//! This crate provides the authoritative rules for Triad Arena, including:
//! - Card model (character, action and effect cards)
//! - The 3×5 board and its coordinate rules
//! - Capture resolution with fixed direction-to-element axes
//! - Turn state machine and game-over scoring
//! - Computer opponents and post-match ratings
//!
//! # Architecture
//!
//! The engine is pure: [`GameState::apply_move`] takes a state by reference
//! and returns a new one, so callers own storage and serialize moves per
//! match. It can be compiled to:
//! - Native Rust for server-side or local hosting
//! - WebAssembly for client-side play and prediction (feature `wasm`)

pub mod actions;
pub mod board;
pub mod bot;
pub mod capture;
pub mod card;
pub mod config;
pub mod game;
pub mod player;
pub mod rating;
pub mod turn;
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use actions::{GameEvent, Move};
pub use board::{Board, Direction, Position, Seat, BOARD_COLS, BOARD_ROWS};
pub use bot::{Bot, BotDifficulty, FirstFit, MovePolicy};
pub use capture::{find_captures, resolve_captures, CaptureDuel};
pub use card::{
    ActionCard, ActionEffect, Card, CardKind, CharacterCard, EffectCard, Element, Elements,
    Faction,
};
pub use config::MatchConfig;
pub use game::{GameError, GameState, GameStateJson, Transition};
pub use player::{DrawOutcome, Player, COMPUTER_NAME, HAND_LIMIT};
pub use rating::{forfeit, settle, Rating};
pub use turn::{evaluate_game_over, FinalScores, Outcome, TurnState};
