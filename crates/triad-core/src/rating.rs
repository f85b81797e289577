//! Elo-style ratings settled after a finished match.

use crate::board::Seat;
use crate::turn::Outcome;
use serde::{Deserialize, Serialize};

/// Rating assigned to new players
pub const DEFAULT_RATING: i32 = 1000;

/// Cap on the bonus for beating a higher rated player
const MAX_UPSET_BONUS: i32 = 15;

/// Flat points moved when a player concedes
pub const SURRENDER_PENALTY: i32 = 20;

/// A player's ladder record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    pub rating: i32,
    pub games_played: u32,
    pub games_won: u32,
}

impl Default for Rating {
    fn default() -> Self {
        Self {
            rating: DEFAULT_RATING,
            games_played: 0,
            games_won: 0,
        }
    }
}

/// K-factor by experience: new players move faster
pub fn k_factor(games_played: u32) -> f64 {
    match games_played {
        0..=9 => 40.0,
        10..=29 => 32.0,
        _ => 24.0,
    }
}

/// Points the winner gains (and the loser drops)
pub fn rating_change(winner_rating: i32, loser_rating: i32, k_factor: f64) -> i32 {
    let diff = f64::from(loser_rating - winner_rating);
    let expected = 1.0 / (1.0 + 10f64.powf(diff / 400.0));

    let spread = (winner_rating - loser_rating).abs();
    let k = if spread > 400 {
        k_factor * 1.5
    } else if spread < 100 {
        k_factor * 0.8
    } else {
        k_factor
    };

    let mut change = (k * (1.0 - expected)).round() as i32;

    if winner_rating < loser_rating {
        let bonus = (f64::from(loser_rating - winner_rating) * 0.1).round() as i32;
        change += bonus.min(MAX_UPSET_BONUS);
    }

    change
}

/// Apply a match result to both players' records.
///
/// Ties only count as a game played. Ratings never drop below 1.
pub fn settle(player1: Rating, player2: Rating, outcome: Outcome) -> (Rating, Rating) {
    let k = k_factor(player1.games_played).min(k_factor(player2.games_played));
    let (mut p1, mut p2) = (player1, player2);

    match outcome {
        Outcome::Winner(Seat::Player1) => {
            let change = rating_change(p1.rating, p2.rating, k);
            p1.rating += change;
            p2.rating -= change;
            p1.games_won += 1;
        }
        Outcome::Winner(Seat::Player2) => {
            let change = rating_change(p2.rating, p1.rating, k);
            p2.rating += change;
            p1.rating -= change;
            p2.games_won += 1;
        }
        Outcome::Tie => {}
    }

    p1.games_played += 1;
    p2.games_played += 1;
    p1.rating = p1.rating.max(1);
    p2.rating = p2.rating.max(1);
    (p1, p2)
}

/// Apply a surrender: a flat transfer instead of the Elo update.
///
/// Returns the conceding player's record first.
pub fn forfeit(surrendered: Rating, opponent: Rating) -> (Rating, Rating) {
    let (mut loser, mut winner) = (surrendered, opponent);

    loser.rating = (loser.rating - SURRENDER_PENALTY).max(1);
    winner.rating += SURRENDER_PENALTY;
    winner.games_won += 1;
    loser.games_played += 1;
    winner.games_played += 1;
    (loser, winner)
}
