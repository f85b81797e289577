//! Card model.
//!
//! Three card kinds exist:
//! - Character cards, which occupy board cells and can be captured
//! - Action cards, one-shot effects resolved immediately
//! - Effect cards, which stay active and modify future capture comparisons

use crate::board::Seat;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of character cards in a freshly built faction deck
pub const FACTION_DECK_SIZE: usize = 20;

/// The four element axes every character card carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Element {
    Fire,
    Water,
    Air,
    Earth,
}

impl Element {
    /// All elements in canonical order
    pub const ALL: [Element; 4] = [Element::Fire, Element::Water, Element::Air, Element::Earth];
}

/// Element values printed on a character card
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Elements {
    #[serde(rename = "Fire")]
    pub fire: u32,
    #[serde(rename = "Water")]
    pub water: u32,
    #[serde(rename = "Air")]
    pub air: u32,
    #[serde(rename = "Earth")]
    pub earth: u32,
}

impl Elements {
    pub fn new(fire: u32, water: u32, air: u32, earth: u32) -> Self {
        Self {
            fire,
            water,
            air,
            earth,
        }
    }

    /// Same value on every axis
    pub fn uniform(value: u32) -> Self {
        Self::new(value, value, value, value)
    }

    /// Get the value on one axis
    pub fn get(&self, element: Element) -> u32 {
        match element {
            Element::Fire => self.fire,
            Element::Water => self.water,
            Element::Air => self.air,
            Element::Earth => self.earth,
        }
    }

    /// Set the value on one axis
    pub fn set(&mut self, element: Element, value: u32) {
        match element {
            Element::Fire => self.fire = value,
            Element::Water => self.water = value,
            Element::Air => self.air = value,
            Element::Earth => self.earth = value,
        }
    }

    /// Shift every axis by `delta`, clamping at zero
    pub fn boost_all(&mut self, delta: i32) {
        for element in Element::ALL {
            let value = self.get(element).saturating_add_signed(delta);
            self.set(element, value);
        }
    }
}

/// A card that can be placed on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterCard {
    pub name: String,
    /// Cosmetic faction label
    pub faction: String,
    pub elements: Elements,
    /// Unset while the card is in a hand or deck
    pub owner: Option<Seat>,
    /// True once ownership has changed at least once
    pub is_captured: bool,
}

impl CharacterCard {
    pub fn new(name: impl Into<String>, faction: impl Into<String>, elements: Elements) -> Self {
        Self {
            name: name.into(),
            faction: faction.into(),
            elements,
            owner: None,
            is_captured: false,
        }
    }
}

/// What an action card does when played
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionEffect {
    /// Add `value` to every element of the player's board characters
    Boost,
    /// Draw `value` cards
    ExtraDraw,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionCard {
    pub name: String,
    pub effect_type: ActionEffect,
    pub value: i32,
}

impl ActionCard {
    pub fn new(name: impl Into<String>, effect_type: ActionEffect, value: i32) -> Self {
        Self {
            name: name.into(),
            effect_type,
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectCard {
    pub name: String,
    /// Bonus added to the holder's attack value on each listed axis
    pub element_bonuses: BTreeMap<Element, i32>,
    pub bonus_effect: Option<String>,
}

impl EffectCard {
    pub fn new(name: impl Into<String>, element_bonuses: BTreeMap<Element, i32>) -> Self {
        Self {
            name: name.into(),
            element_bonuses,
            bonus_effect: None,
        }
    }

    /// Bonus for an axis, zero when the effect doesn't touch it
    pub fn bonus(&self, element: Element) -> i32 {
        self.element_bonuses.get(&element).copied().unwrap_or(0)
    }
}

/// Broad category of a card, used for per-turn play limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardKind {
    Character,
    Special,
}

/// Any card in the game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Card {
    #[serde(rename = "CharacterCard")]
    Character(CharacterCard),
    #[serde(rename = "ActionCard")]
    Action(ActionCard),
    #[serde(rename = "EffectCard")]
    Effect(EffectCard),
}

impl Card {
    pub fn name(&self) -> &str {
        match self {
            Card::Character(c) => &c.name,
            Card::Action(c) => &c.name,
            Card::Effect(c) => &c.name,
        }
    }

    pub fn kind(&self) -> CardKind {
        match self {
            Card::Character(_) => CardKind::Character,
            Card::Action(_) | Card::Effect(_) => CardKind::Special,
        }
    }

    pub fn is_character(&self) -> bool {
        matches!(self, Card::Character(_))
    }

    pub fn as_character(&self) -> Option<&CharacterCard> {
        match self {
            Card::Character(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_character_mut(&mut self) -> Option<&mut CharacterCard> {
        match self {
            Card::Character(c) => Some(c),
            _ => None,
        }
    }
}

impl From<CharacterCard> for Card {
    fn from(card: CharacterCard) -> Self {
        Card::Character(card)
    }
}

impl From<ActionCard> for Card {
    fn from(card: ActionCard) -> Self {
        Card::Action(card)
    }
}

impl From<EffectCard> for Card {
    fn from(card: EffectCard) -> Self {
        Card::Effect(card)
    }
}

/// Deck flavour; each faction leans towards a different pair of axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Faction {
    /// Strong Fire and Air
    Light,
    /// Strong Water and Earth
    Dark,
}

impl Faction {
    pub fn label(&self) -> &'static str {
        match self {
            Faction::Light => "Light",
            Faction::Dark => "Dark",
        }
    }

    /// Build a shuffled deck of `size` character cards for this faction
    pub fn build_deck<R: Rng>(&self, size: usize, rng: &mut R) -> Vec<Card> {
        let (strong, weak) = (2..=5u32, 1..=4u32);
        let mut deck: Vec<Card> = (0..size)
            .map(|i| {
                let elements = match self {
                    Faction::Light => Elements::new(
                        rng.gen_range(strong.clone()),
                        rng.gen_range(weak.clone()),
                        rng.gen_range(strong.clone()),
                        rng.gen_range(weak.clone()),
                    ),
                    Faction::Dark => Elements::new(
                        rng.gen_range(weak.clone()),
                        rng.gen_range(strong.clone()),
                        rng.gen_range(weak.clone()),
                        rng.gen_range(strong.clone()),
                    ),
                };
                let name = format!("{} Creature {}", self.label(), i + 1);
                Card::Character(CharacterCard::new(name, self.label(), elements))
            })
            .collect();

        deck.shuffle(rng);
        deck
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_elements_get_set() {
        let mut e = Elements::new(1, 2, 3, 4);
        assert_eq!(e.get(Element::Water), 2);
        e.set(Element::Earth, 9);
        assert_eq!(e.earth, 9);
    }

    #[test]
    fn test_boost_clamps_at_zero() {
        let mut e = Elements::new(1, 2, 3, 4);
        e.boost_all(-2);
        assert_eq!(e, Elements::new(0, 0, 1, 2));
        e.boost_all(3);
        assert_eq!(e, Elements::new(3, 3, 4, 5));
    }

    #[test]
    fn test_card_json_uses_type_tag() {
        let card = Card::Character(CharacterCard::new("Ember", "Light", Elements::uniform(3)));
        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json["type"], "CharacterCard");
        assert_eq!(json["elements"]["Fire"], 3);

        let back: Card = serde_json::from_value(json).unwrap();
        assert_eq!(back, card);
    }

    #[test]
    fn test_action_effect_names() {
        let card = Card::Action(ActionCard::new("Surge", ActionEffect::ExtraDraw, 2));
        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json["effect_type"], "extra_draw");
    }

    #[test]
    fn test_faction_deck_ranges() {
        let mut rng = StdRng::seed_from_u64(7);
        let deck = Faction::Dark.build_deck(FACTION_DECK_SIZE, &mut rng);
        assert_eq!(deck.len(), FACTION_DECK_SIZE);

        for card in &deck {
            let c = card.as_character().expect("faction decks hold characters only");
            assert_eq!(c.faction, "Dark");
            assert!((1..=4).contains(&c.elements.fire));
            assert!((2..=5).contains(&c.elements.water));
            assert!((1..=4).contains(&c.elements.air));
            assert!((2..=5).contains(&c.elements.earth));
            assert!(c.owner.is_none());
        }
    }

    #[test]
    fn test_effect_bonus_defaults_to_zero() {
        let mut bonuses = BTreeMap::new();
        bonuses.insert(Element::Air, 2);
        let effect = EffectCard::new("Tailwind", bonuses);
        assert_eq!(effect.bonus(Element::Air), 2);
        assert_eq!(effect.bonus(Element::Fire), 0);
    }
}
