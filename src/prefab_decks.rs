//! Predefined demo decks for quick battles and tests.

use cards::{
    Ability, AbilityTrigger, Attack, Card, CardEffect, DamageFormula, Deck, EnergyContainer,
    EnergyType, PokemonCard, PokemonType, SearchFilter, TrainerCard, TrainerKind,
};

fn cost(parts: &[(EnergyType, u32)]) -> EnergyContainer {
    parts.iter().copied().collect()
}

pub fn squirtle() -> PokemonCard {
    PokemonCard {
        name: "Squirtle".to_string(),
        evolves_from: None,
        hit_points: 60,
        pokemon_type: PokemonType::Water,
        attacks: vec![Attack {
            name: "Water Gun".to_string(),
            text: String::new(),
            cost: cost(&[(EnergyType::Water, 1)]),
            damage: DamageFormula::Flat(20),
        }],
        retreat_cost: 1,
        level: 8,
        abilities: vec![],
    }
}

pub fn wartortle() -> PokemonCard {
    PokemonCard {
        name: "Wartortle".to_string(),
        evolves_from: Some("Squirtle".to_string()),
        hit_points: 80,
        pokemon_type: PokemonType::Water,
        attacks: vec![Attack {
            name: "Wave Splash".to_string(),
            text: String::new(),
            cost: cost(&[(EnergyType::Water, 1), (EnergyType::Colorless, 1)]),
            damage: DamageFormula::Flat(40),
        }],
        retreat_cost: 1,
        level: 22,
        abilities: vec![],
    }
}

pub fn blastoise_ex() -> PokemonCard {
    PokemonCard {
        name: "Blastoise ex".to_string(),
        evolves_from: Some("Wartortle".to_string()),
        hit_points: 180,
        pokemon_type: PokemonType::Water,
        attacks: vec![Attack {
            name: "Hydro Bazooka".to_string(),
            text: "If this creature has 2 extra Water energy attached, this attack does 60 more damage.".to_string(),
            cost: cost(&[(EnergyType::Water, 2), (EnergyType::Colorless, 1)]),
            damage: DamageFormula::BonusIfExtraEnergy {
                base: 100,
                bonus: 60,
                energy: EnergyType::Water,
                extra: 2,
            },
        }],
        retreat_cost: 3,
        level: 102,
        abilities: vec![],
    }
}

pub fn psyduck() -> PokemonCard {
    PokemonCard {
        name: "Psyduck".to_string(),
        evolves_from: None,
        hit_points: 70,
        pokemon_type: PokemonType::Water,
        attacks: vec![Attack {
            name: "Headache".to_string(),
            text: String::new(),
            cost: cost(&[(EnergyType::Colorless, 1)]),
            damage: DamageFormula::Flat(10),
        }],
        retreat_cost: 1,
        level: 12,
        abilities: vec![],
    }
}

pub fn staryu() -> PokemonCard {
    PokemonCard {
        name: "Staryu".to_string(),
        evolves_from: None,
        hit_points: 50,
        pokemon_type: PokemonType::Water,
        attacks: vec![Attack {
            name: "Slap".to_string(),
            text: String::new(),
            cost: cost(&[(EnergyType::Water, 1)]),
            damage: DamageFormula::Flat(20),
        }],
        retreat_cost: 1,
        level: 10,
        abilities: vec![],
    }
}

pub fn clefairy() -> PokemonCard {
    PokemonCard {
        name: "Clefairy".to_string(),
        evolves_from: None,
        hit_points: 60,
        pokemon_type: PokemonType::Fairy,
        attacks: vec![Attack {
            name: "Slap".to_string(),
            text: String::new(),
            cost: cost(&[(EnergyType::Colorless, 1)]),
            damage: DamageFormula::Flat(10),
        }],
        retreat_cost: 1,
        level: 14,
        abilities: vec![Ability {
            name: "Moonlight".to_string(),
            text: "Once per turn, heal 20 damage from one of your creatures.".to_string(),
            effects: vec![CardEffect::HealActive(20)],
            trigger: AbilityTrigger::Manual,
        }],
    }
}

pub fn charmander() -> PokemonCard {
    PokemonCard {
        name: "Charmander".to_string(),
        evolves_from: None,
        hit_points: 60,
        pokemon_type: PokemonType::Fire,
        attacks: vec![Attack {
            name: "Ember".to_string(),
            text: String::new(),
            cost: cost(&[(EnergyType::Fire, 1)]),
            damage: DamageFormula::Flat(30),
        }],
        retreat_cost: 1,
        level: 10,
        abilities: vec![],
    }
}

pub fn charmeleon() -> PokemonCard {
    PokemonCard {
        name: "Charmeleon".to_string(),
        evolves_from: Some("Charmander".to_string()),
        hit_points: 90,
        pokemon_type: PokemonType::Fire,
        attacks: vec![Attack {
            name: "Fire Claws".to_string(),
            text: String::new(),
            cost: cost(&[(EnergyType::Fire, 1), (EnergyType::Colorless, 1)]),
            damage: DamageFormula::Flat(50),
        }],
        retreat_cost: 1,
        level: 24,
        abilities: vec![],
    }
}

pub fn charizard_ex() -> PokemonCard {
    PokemonCard {
        name: "Charizard ex".to_string(),
        evolves_from: Some("Charmeleon".to_string()),
        hit_points: 180,
        pokemon_type: PokemonType::Fire,
        attacks: vec![Attack {
            name: "Slash".to_string(),
            text: String::new(),
            cost: cost(&[(EnergyType::Fire, 1), (EnergyType::Colorless, 2)]),
            damage: DamageFormula::Flat(60),
        }],
        retreat_cost: 2,
        level: 105,
        abilities: vec![],
    }
}

pub fn growlithe() -> PokemonCard {
    PokemonCard {
        name: "Growlithe".to_string(),
        evolves_from: None,
        hit_points: 70,
        pokemon_type: PokemonType::Fire,
        attacks: vec![Attack {
            name: "Bite".to_string(),
            text: String::new(),
            cost: cost(&[(EnergyType::Fire, 1), (EnergyType::Colorless, 1)]),
            damage: DamageFormula::Flat(40),
        }],
        retreat_cost: 1,
        level: 15,
        abilities: vec![],
    }
}

pub fn ponyta() -> PokemonCard {
    PokemonCard {
        name: "Ponyta".to_string(),
        evolves_from: None,
        hit_points: 60,
        pokemon_type: PokemonType::Fire,
        attacks: vec![Attack {
            name: "Stampede".to_string(),
            text: "This attack does 10 more damage for each of your benched creatures.".to_string(),
            cost: cost(&[(EnergyType::Fire, 1)]),
            damage: DamageFormula::PerOwnBench { base: 10, per: 10 },
        }],
        retreat_cost: 1,
        level: 13,
        abilities: vec![],
    }
}

pub fn vulpix() -> PokemonCard {
    PokemonCard {
        name: "Vulpix".to_string(),
        evolves_from: None,
        hit_points: 60,
        pokemon_type: PokemonType::Fire,
        attacks: vec![Attack {
            name: "Tail Whip".to_string(),
            text: String::new(),
            cost: cost(&[(EnergyType::Colorless, 1)]),
            damage: DamageFormula::Flat(10),
        }],
        retreat_cost: 1,
        level: 11,
        abilities: vec![],
    }
}

pub fn professors_research() -> TrainerCard {
    TrainerCard {
        name: "Professor's Research".to_string(),
        text: "Draw 2 cards.".to_string(),
        kind: TrainerKind::Supporter,
        effects: vec![CardEffect::Draw(2)],
    }
}

pub fn potion() -> TrainerCard {
    TrainerCard {
        name: "Potion".to_string(),
        text: "Heal 20 damage from one of your creatures.".to_string(),
        kind: TrainerKind::Item,
        effects: vec![CardEffect::HealActive(20)],
    }
}

pub fn poke_ball() -> TrainerCard {
    TrainerCard {
        name: "Poke Ball".to_string(),
        text: "Put a random basic creature from your deck into your hand.".to_string(),
        kind: TrainerKind::Item,
        effects: vec![CardEffect::SearchDeck {
            count: 1,
            filter: SearchFilter::Basic,
        }],
    }
}

pub fn switch() -> TrainerCard {
    TrainerCard {
        name: "Switch".to_string(),
        text: "Swap your active creature with one on your bench.".to_string(),
        kind: TrainerKind::Item,
        effects: vec![CardEffect::SwitchActive],
    }
}

fn two_of(card: Card) -> [Card; 2] {
    [card.clone(), card]
}

/// A water-typed demo deck built around the Squirtle line.
pub fn water_deck() -> Deck {
    let mut cards = Vec::with_capacity(20);
    cards.extend(two_of(Card::Pokemon(squirtle())));
    cards.extend(two_of(Card::Pokemon(wartortle())));
    cards.extend(two_of(Card::Pokemon(blastoise_ex())));
    cards.extend(two_of(Card::Pokemon(psyduck())));
    cards.extend(two_of(Card::Pokemon(staryu())));
    cards.extend(two_of(Card::Pokemon(clefairy())));
    cards.extend(two_of(Card::Trainer(professors_research())));
    cards.extend(two_of(Card::Trainer(potion())));
    cards.extend(two_of(Card::Trainer(poke_ball())));
    cards.extend(two_of(Card::Trainer(switch())));
    Deck {
        name: "Squirtle Squad".to_string(),
        cards,
        energies: vec![EnergyType::Water],
    }
}

/// A fire-typed demo deck built around the Charmander line.
pub fn fire_deck() -> Deck {
    let mut cards = Vec::with_capacity(20);
    cards.extend(two_of(Card::Pokemon(charmander())));
    cards.extend(two_of(Card::Pokemon(charmeleon())));
    cards.extend(two_of(Card::Pokemon(charizard_ex())));
    cards.extend(two_of(Card::Pokemon(growlithe())));
    cards.extend(two_of(Card::Pokemon(ponyta())));
    cards.extend(two_of(Card::Pokemon(vulpix())));
    cards.extend(two_of(Card::Trainer(professors_research())));
    cards.extend(two_of(Card::Trainer(potion())));
    cards.extend(two_of(Card::Trainer(poke_ball())));
    cards.extend(two_of(Card::Trainer(switch())));
    Deck {
        name: "Blaze Brigade".to_string(),
        cards,
        energies: vec![EnergyType::Fire],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::validate_deck;
    use cards::Rules;

    #[test]
    fn prefab_decks_pass_validation() {
        let rules = Rules::default();
        assert!(validate_deck(&rules, &water_deck()).is_ok());
        assert!(validate_deck(&rules, &fire_deck()).is_ok());
    }

    #[test]
    fn boosted_cards_are_marked() {
        assert!(blastoise_ex().is_ex());
        assert!(charizard_ex().is_ex());
        assert!(!squirtle().is_ex());
    }
}
