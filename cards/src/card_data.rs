use crate::pokemon_types::{
    energy_type, resistance, weakness, EnergyContainer, EnergyType, PokemonType,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How an attack's base damage is computed from attacker state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageFormula {
    /// A fixed amount.
    Flat(u16),
    /// `base`, plus `bonus` if the attacker holds at least `extra` units of
    /// `energy` beyond what the attack cost itself demands.
    BonusIfExtraEnergy {
        base: u16,
        bonus: u16,
        energy: EnergyType,
        extra: u32,
    },
    /// `base` plus `per` for each of the attacker's benched creatures.
    PerOwnBench { base: u16, per: u16 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attack {
    pub name: String,
    pub text: String,
    pub cost: EnergyContainer,
    pub damage: DamageFormula,
}

/// Filter applied when an effect searches the deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchFilter {
    Any,
    Basic,
}

/// A sub-effect carried by a trainer card or an ability. These are data;
/// the engine translates them into queued effects when the card is played.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardEffect {
    /// Draw up to this many cards.
    Draw(u8),
    /// Heal one of the player's in-play creatures; the target is chosen
    /// by the player when the effect resolves.
    HealActive(u16),
    /// Search the deck for up to `count` cards passing `filter`.
    SearchDeck { count: u8, filter: SearchFilter },
    /// Swap the player's active creature with a benched one of their choice.
    SwitchActive,
    /// Discard one energy of the given type from the opponent's active.
    DiscardOpponentEnergy(EnergyType),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbilityTrigger {
    /// Activated by the player, once per creature slot per turn.
    Manual,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ability {
    pub name: String,
    pub text: String,
    pub effects: Vec<CardEffect>,
    pub trigger: AbilityTrigger,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonCard {
    pub name: String,
    /// Name of the creature this evolves from; `None` for a basic.
    pub evolves_from: Option<String>,
    pub hit_points: u16,
    pub pokemon_type: PokemonType,
    pub attacks: Vec<Attack>,
    pub retreat_cost: u32,
    /// Levels above 100 mark boosted ("ex") cards worth two points.
    pub level: u8,
    pub abilities: Vec<Ability>,
}

impl PokemonCard {
    pub fn is_basic(&self) -> bool {
        self.evolves_from.is_none()
    }

    pub fn is_ex(&self) -> bool {
        self.level > 100
    }

    pub fn weakness(&self) -> Option<EnergyType> {
        weakness(self.pokemon_type)
    }

    pub fn resistance(&self) -> Option<EnergyType> {
        resistance(self.pokemon_type)
    }

    /// The energy type this creature's attacks deal damage as.
    pub fn energy_type(&self) -> EnergyType {
        energy_type(self.pokemon_type)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrainerKind {
    /// One supporter may be played per turn.
    Supporter,
    Item,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainerCard {
    pub name: String,
    pub text: String,
    pub kind: TrainerKind,
    pub effects: Vec<CardEffect>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Card {
    Pokemon(PokemonCard),
    Trainer(TrainerCard),
}

impl Card {
    pub fn name(&self) -> &str {
        match self {
            Card::Pokemon(card) => &card.name,
            Card::Trainer(card) => &card.name,
        }
    }

    pub fn is_basic(&self) -> bool {
        matches!(self, Card::Pokemon(card) if card.is_basic())
    }

    pub fn as_pokemon(&self) -> Option<&PokemonCard> {
        match self {
            Card::Pokemon(card) => Some(card),
            Card::Trainer(_) => None,
        }
    }

    pub fn as_trainer(&self) -> Option<&TrainerCard> {
        match self {
            Card::Trainer(card) => Some(card),
            Card::Pokemon(_) => None,
        }
    }
}

/// A constructed deck: its cards plus the energy types its generator
/// produces each turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    pub name: String,
    pub cards: Vec<Card>,
    pub energies: Vec<EnergyType>,
}

/// Match configuration. Defaults mirror the small-format rules: 20-card
/// decks, three points to win, a bench of three.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rules {
    pub deck_size: usize,
    pub duplicate_limit: usize,
    pub basic_required: bool,
    pub points_to: u8,
    pub turns_to_evolve: u32,
    pub bench_size: usize,
    pub initial_hand_size: usize,
    pub max_hand_size: usize,
    pub future_energies: usize,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            deck_size: 20,
            duplicate_limit: 2,
            basic_required: true,
            points_to: 3,
            turns_to_evolve: 1,
            bench_size: 3,
            initial_hand_size: 5,
            max_hand_size: 10,
            future_energies: 1,
        }
    }
}

impl Rules {
    /// Whether a deck is legal for a battle under these rules: exact size,
    /// per-name duplicate limit, and (if required) at least one basic.
    pub fn is_valid_deck(&self, deck: &Deck) -> bool {
        if deck.cards.len() != self.deck_size || deck.energies.is_empty() {
            return false;
        }
        let mut has_basic = false;
        let mut name_counts: HashMap<&str, usize> = HashMap::new();
        for card in &deck.cards {
            if card.is_basic() {
                has_basic = true;
            }
            let count = name_counts.entry(card.name()).or_insert(0);
            *count += 1;
            if *count > self.duplicate_limit {
                return false;
            }
        }
        has_basic || !self.basic_required
    }
}
