use crate::collection::Collection;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// The energy currencies attacks and retreats are paid in. `Colorless` is
/// the wildcard: a colorless cost entry is payable with any energy type.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    Display,
)]
#[strum(serialize_all = "lowercase")]
pub enum EnergyType {
    Colorless,
    Fire,
    Water,
    Lightning,
    Grass,
    Fighting,
    Psychic,
    Darkness,
    Metal,
    Dragon,
    Fairy,
}

/// Counted multiset of energy. Used for attached energy, attack costs,
/// retreat payments and the energy graveyard.
pub type EnergyContainer = Collection<EnergyType>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PokemonType {
    Normal,
    Fire,
    Water,
    Electric,
    Grass,
    Fighting,
    Psychic,
    Dark,
    Steel,
    Dragon,
    Fairy,
    Ice,
    Ground,
    Flying,
    Poison,
    Bug,
    Rock,
    Ghost,
}

/// The energy type a creature of this type attacks with.
pub fn energy_type(pokemon_type: PokemonType) -> EnergyType {
    match pokemon_type {
        PokemonType::Normal => EnergyType::Colorless,
        PokemonType::Fire => EnergyType::Fire,
        PokemonType::Water | PokemonType::Ice => EnergyType::Water,
        PokemonType::Electric => EnergyType::Lightning,
        PokemonType::Grass | PokemonType::Bug => EnergyType::Grass,
        PokemonType::Fighting | PokemonType::Ground | PokemonType::Rock => EnergyType::Fighting,
        PokemonType::Psychic | PokemonType::Ghost => EnergyType::Psychic,
        PokemonType::Dark | PokemonType::Poison => EnergyType::Darkness,
        PokemonType::Steel => EnergyType::Metal,
        PokemonType::Dragon | PokemonType::Flying => EnergyType::Dragon,
        PokemonType::Fairy => EnergyType::Fairy,
    }
}

/// Declared weakness: attacks of the returned energy type deal +20.
pub fn weakness(pokemon_type: PokemonType) -> Option<EnergyType> {
    match pokemon_type {
        PokemonType::Normal | PokemonType::Dragon => None,
        PokemonType::Fire => Some(EnergyType::Water),
        PokemonType::Water | PokemonType::Ice | PokemonType::Flying => Some(EnergyType::Lightning),
        PokemonType::Electric | PokemonType::Poison | PokemonType::Dark => {
            Some(EnergyType::Fighting)
        }
        PokemonType::Grass | PokemonType::Steel | PokemonType::Bug => Some(EnergyType::Fire),
        PokemonType::Fighting => Some(EnergyType::Psychic),
        PokemonType::Psychic | PokemonType::Ghost => Some(EnergyType::Darkness),
        PokemonType::Fairy => Some(EnergyType::Metal),
        PokemonType::Ground | PokemonType::Rock => Some(EnergyType::Grass),
    }
}

/// Declared resistance: attacks of the returned energy type deal -20.
/// No creature type currently declares one; the hook exists because the
/// damage pipeline applies it and content may introduce one.
pub fn resistance(_pokemon_type: PokemonType) -> Option<EnergyType> {
    None
}

/// A status condition on an in-play creature. A creature with no conditions
/// simply has an empty condition list; there is no `None` variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Condition {
    Poisoned,
    Asleep,
    Paralyzed,
    Confused,
    CantAttack,
    CantRetreat,
    ReducedAttack,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn energy_names_round_trip_for_the_text_front_end() {
        assert_eq!(EnergyType::from_str("water"), Ok(EnergyType::Water));
        assert_eq!(EnergyType::from_str("colorless"), Ok(EnergyType::Colorless));
        assert_eq!(EnergyType::Lightning.to_string(), "lightning");
        assert!(EnergyType::from_str("plasma").is_err());
    }

    #[test]
    fn weakness_table_matches_declared_matchups() {
        assert_eq!(weakness(PokemonType::Fire), Some(EnergyType::Water));
        assert_eq!(weakness(PokemonType::Water), Some(EnergyType::Lightning));
        assert_eq!(weakness(PokemonType::Normal), None);
        assert_eq!(weakness(PokemonType::Dragon), None);
    }

    #[test]
    fn attack_energy_type_follows_creature_type() {
        assert_eq!(energy_type(PokemonType::Electric), EnergyType::Lightning);
        assert_eq!(energy_type(PokemonType::Ghost), EnergyType::Psychic);
        assert_eq!(energy_type(PokemonType::Normal), EnergyType::Colorless);
    }
}
