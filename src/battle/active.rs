use cards::{Condition, EnergyContainer, EnergyType, InsufficientItems, PokemonCard};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Step applied per declared weakness or resistance match.
const WEAKNESS_RESISTANCE_STEP: u16 = 20;

/// One creature in play: its evolution stack (front = current form, the rest
/// is the pre-evolution history needed to reconstruct the discard on
/// knockout), accumulated damage, status conditions, attached energy and
/// per-turn ability usage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivePokemon {
    cards: Vec<PokemonCard>,
    turns_in_active: u32,
    damage: u16,
    conditions: Vec<Condition>,
    energies: EnergyContainer,
    used_abilities: BTreeSet<usize>,
}

impl ActivePokemon {
    /// Places a basic creature card into play.
    pub fn new(card: PokemonCard) -> Self {
        Self {
            cards: vec![card],
            turns_in_active: 0,
            damage: 0,
            conditions: Vec::new(),
            energies: EnergyContainer::new(),
            used_abilities: BTreeSet::new(),
        }
    }

    /// The card that is currently on top / highest evolved.
    pub fn card(&self) -> &PokemonCard {
        &self.cards[0]
    }

    /// The whole evolution stack, current form first.
    pub fn cards(&self) -> &[PokemonCard] {
        &self.cards
    }

    /// Evolves this creature. Lineage and the evolution cooldown are the
    /// action layer's responsibility; this method does not re-validate.
    pub fn evolve(&mut self, card: PokemonCard) {
        self.cards.insert(0, card);
        self.conditions.clear();
        self.turns_in_active = 0;
    }

    pub fn hp(&self) -> u16 {
        self.card().hit_points.saturating_sub(self.damage)
    }

    pub fn is_knocked_out(&self) -> bool {
        self.hp() == 0
    }

    pub fn damage(&self) -> u16 {
        self.damage
    }

    pub fn turns_in_active(&self) -> u32 {
        self.turns_in_active
    }

    pub fn energies(&self) -> &EnergyContainer {
        &self.energies
    }

    pub fn attach_energy(&mut self, energy: EnergyType) {
        self.energies.add(energy);
    }

    /// Pays the retreat cost. Fails without debiting anything if the
    /// attached energy cannot cover it.
    pub fn retreat(&mut self, cost: &EnergyContainer) -> Result<(), InsufficientItems> {
        self.energies.remove_all(cost)
    }

    /// Removes a single attached energy, e.g. for opposing discard effects.
    pub fn remove_energy(&mut self, energy: EnergyType) -> Result<(), InsufficientItems> {
        self.energies.remove(energy)
    }

    /// Applies damage. With `apply_weakness_resistance` set, the amount is
    /// adjusted by a fixed step when the damage type matches this card's
    /// declared weakness or resistance. Damage only ever increases.
    pub fn take_damage(
        &mut self,
        amount: u16,
        damage_type: EnergyType,
        apply_weakness_resistance: bool,
    ) {
        let mut total = amount;
        if apply_weakness_resistance {
            if self.card().weakness() == Some(damage_type) {
                total += WEAKNESS_RESISTANCE_STEP;
            }
            if self.card().resistance() == Some(damage_type) {
                total = total.saturating_sub(WEAKNESS_RESISTANCE_STEP);
            }
        }
        self.damage = self.damage.saturating_add(total);
    }

    /// Heals up to `amount` damage. Healing never raises HP above the
    /// card's printed maximum.
    pub fn heal(&mut self, amount: u16) {
        self.damage = self.damage.saturating_sub(amount);
    }

    pub fn has_condition(&self, condition: Condition) -> bool {
        self.conditions.contains(&condition)
    }

    pub fn add_condition(&mut self, condition: Condition) {
        if !self.conditions.contains(&condition) {
            self.conditions.push(condition);
        }
    }

    pub fn use_ability(&mut self, index: usize) {
        self.used_abilities.insert(index);
    }

    pub fn used_ability(&self, index: usize) -> bool {
        self.used_abilities.contains(&index)
    }

    /// End-of-turn bookkeeping: ability usage resets, and the creature has
    /// now sat through one more of its owner's turns (evolution cooldown).
    pub fn end_turn(&mut self) {
        self.used_abilities.clear();
        self.turns_in_active += 1;
    }

    /// Between-turns condition tick. Conditions are currently inert; this
    /// is the extension point for poison/sleep style effects.
    pub fn between_turns(&mut self) {}

    /// Tears the creature down for discard: its card stack and its
    /// attached energy.
    pub fn into_parts(self) -> (Vec<PokemonCard>, EnergyContainer) {
        (self.cards, self.energies)
    }
}
