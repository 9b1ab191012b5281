use cards::{EnergyType, SearchFilter};
use serde::{Deserialize, Serialize};

use crate::battle::actions::ActionKind;
use crate::battle::rng::BattleRng;
use crate::battle::state::{BattleEvent, BattleState, EventBus, Priority};

/// A play-index parameter of a queued effect. Effects queue with
/// `Awaiting` when the owner still has to choose; the engine suspends on
/// them and fills the choice in from the matching selection action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputSlot {
    Chosen(usize),
    Awaiting,
}

impl InputSlot {
    pub fn chosen(&self) -> Option<usize> {
        match self {
            InputSlot::Chosen(index) => Some(*index),
            InputSlot::Awaiting => None,
        }
    }
}

/// A unit of deferred game logic. Actions translate into effects on the
/// resolution queue; the engine drains the queue one effect at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Effect {
    /// Draw up to `count` cards.
    Draw { team1: bool, count: u8 },
    /// Heal an in-play creature.
    Heal {
        team1: bool,
        target: InputSlot,
        amount: u16,
    },
    /// Attack damage against the defending active, with knockout handling.
    Damage {
        team1_defending: bool,
        amount: u16,
        energy_type: EnergyType,
        apply_weakness: bool,
    },
    /// Remove one attached energy of a type from the target's active.
    DiscardEnergy { team1: bool, energy: EnergyType },
    /// Move random matching cards from the pile to the hand.
    SearchDeck {
        team1: bool,
        count: u8,
        filter: SearchFilter,
    },
    /// Put a bench creature into the active slot. Used both for free
    /// switches and for post-knockout replacement.
    SwapActive { team1: bool, target: InputSlot },
    /// Hand input back to a side mid-resolution, after an opposing choice.
    SwitchMove { team1: bool },
    /// Close out the current turn.
    EndTurn,
}

impl Effect {
    /// Whether this effect still needs a choice from a player before it
    /// can resolve.
    pub fn awaiting_input(&self) -> bool {
        matches!(
            self,
            Effect::SwapActive {
                target: InputSlot::Awaiting,
                ..
            } | Effect::Heal {
                target: InputSlot::Awaiting,
                ..
            }
        )
    }

    /// Which side owes the pending choice.
    pub fn input_team1(&self) -> Option<bool> {
        match self {
            Effect::SwapActive { team1, .. } | Effect::Heal { team1, .. } => Some(*team1),
            _ => None,
        }
    }

    /// The action kind that satisfies the pending choice.
    pub fn expected_action(&self) -> Option<ActionKind> {
        match self {
            Effect::SwapActive {
                target: InputSlot::Awaiting,
                ..
            } => Some(ActionKind::SelectActive),
            Effect::Heal {
                target: InputSlot::Awaiting,
                ..
            } => Some(ActionKind::Select),
            _ => None,
        }
    }

    /// Fills the suspended choice in. No-op on effects that are not
    /// awaiting input.
    pub fn fill_choice(&mut self, choice: usize) {
        match self {
            Effect::SwapActive { target, .. } | Effect::Heal { target, .. } => {
                if *target == InputSlot::Awaiting {
                    *target = InputSlot::Chosen(choice);
                }
            }
            _ => {}
        }
    }
}

/// Evaluates an attack's damage formula against the attacker's current
/// board position.
pub fn attack_damage(
    attack: &cards::Attack,
    attacker: &crate::battle::active::ActivePokemon,
    own_bench_count: usize,
) -> u16 {
    match &attack.damage {
        cards::DamageFormula::Flat(amount) => *amount,
        cards::DamageFormula::BonusIfExtraEnergy {
            base,
            bonus,
            energy,
            extra,
        } => {
            let attached = attacker.energies().size_of(*energy);
            let threshold = attack.cost.size_of(*energy) + extra;
            if attached >= threshold {
                base + bonus
            } else {
                *base
            }
        }
        cards::DamageFormula::PerOwnBench { base, per } => {
            base + per * own_bench_count as u16
        }
    }
}

/// Resolves a single effect against the battle state. Effects still
/// awaiting input must never reach this point; the engine suspends on
/// them instead.
pub fn resolve(effect: Effect, state: &mut BattleState, rng: &mut BattleRng, bus: &mut EventBus) {
    match effect {
        Effect::Draw { team1, count } => {
            let max_hand = state.rules.max_hand_size;
            let deck = state.deck_mut(team1);
            for _ in 0..count {
                if deck.hand.len() >= max_hand {
                    break;
                }
                match deck.draw_card() {
                    Some(card) => bus.push(BattleEvent::CardDrawn { team1, card }),
                    None => break,
                }
            }
        }
        Effect::Heal {
            team1,
            target,
            amount,
        } => {
            let play_index = match target.chosen() {
                Some(index) => index,
                None => unreachable!("effect awaiting input reached resolution"),
            };
            if let Some(active) = state.deck_mut(team1).in_play_mut(play_index) {
                active.heal(amount);
                bus.push(BattleEvent::Healed {
                    team1,
                    play_index,
                    amount,
                });
            }
        }
        Effect::Damage {
            team1_defending,
            amount,
            energy_type,
            apply_weakness,
        } => {
            resolve_damage(state, bus, team1_defending, amount, energy_type, apply_weakness);
        }
        Effect::DiscardEnergy { team1, energy } => {
            if let Some(active) = state.deck_mut(team1).in_play_mut(0) {
                if active.remove_energy(energy).is_ok() {
                    state.deck_mut(team1).energy_discard.add(energy);
                    bus.push(BattleEvent::EnergyRemoved { team1, energy });
                }
            }
        }
        Effect::SearchDeck {
            team1,
            count,
            filter,
        } => {
            let found = state
                .deck_mut(team1)
                .search_deck(count as usize, filter, rng);
            bus.push(BattleEvent::DeckSearched {
                team1,
                filter,
                found,
            });
        }
        Effect::SwapActive { team1, target } => {
            let play_index = match target.chosen() {
                Some(index) => index,
                None => unreachable!("effect awaiting input reached resolution"),
            };
            let deck = state.deck_mut(team1);
            if deck.has_active() {
                deck.swap_active(play_index);
                let incoming = deck.in_play(0).expect("swap leaves an active").card().name.clone();
                bus.push(BattleEvent::Retreated { team1, incoming });
            } else {
                deck.replace_starter(play_index);
                let incoming = deck
                    .in_play(0)
                    .expect("replacement leaves an active")
                    .card()
                    .name
                    .clone();
                bus.push(BattleEvent::ActiveReplaced { team1, incoming });
            }
        }
        Effect::SwitchMove { team1 } => {
            state.next_move_team1 = team1;
        }
        Effect::EndTurn => {
            state.end_turn(rng, bus);
        }
    }
}

fn resolve_damage(
    state: &mut BattleState,
    bus: &mut EventBus,
    team1_defending: bool,
    amount: u16,
    energy_type: EnergyType,
    apply_weakness: bool,
) {
    let defender = state.deck_mut(team1_defending);
    if !defender.has_active() {
        return;
    }
    let knocked_out = defender.take_damage(amount, energy_type, apply_weakness);
    let remaining_hp = defender.in_play(0).expect("active survived the borrow").hp();
    bus.push(BattleEvent::DamageDealt {
        team1_defending,
        amount,
        remaining_hp,
    });
    if !knocked_out {
        return;
    }

    let fallen = defender.in_play(0).expect("active checked above");
    let card_name = fallen.card().name.clone();
    let worth = if fallen.card().is_ex() { 2 } else { 1 };
    defender.discard_from_active(0);
    bus.push(BattleEvent::KnockedOut {
        team1: team1_defending,
        card: card_name,
    });

    let attacker = !team1_defending;
    let total = state.add_points(attacker, worth);
    bus.push(BattleEvent::PointsScored {
        team1: attacker,
        points: worth,
        total,
    });

    if state.is_over() {
        return;
    }

    if state.deck(team1_defending).needs_replacement() {
        state.next_move_team1 = team1_defending;
        state.push_step(
            Priority::ReplaceActive,
            Effect::SwapActive {
                team1: team1_defending,
                target: InputSlot::Awaiting,
            },
        );
        state.push_step(
            Priority::AfterReplace,
            Effect::SwitchMove { team1: attacker },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::active::ActivePokemon;
    use cards::{Attack, DamageFormula, EnergyContainer, PokemonCard, PokemonType};
    use pretty_assertions::assert_eq;

    fn attacker_with(energies: &[(EnergyType, u32)]) -> ActivePokemon {
        let mut active = ActivePokemon::new(PokemonCard {
            name: "Blastoise".to_string(),
            evolves_from: Some("Wartortle".to_string()),
            hit_points: 150,
            pokemon_type: PokemonType::Water,
            attacks: vec![],
            retreat_cost: 3,
            level: 102,
            abilities: vec![],
        });
        for &(energy, count) in energies {
            for _ in 0..count {
                active.attach_energy(energy);
            }
        }
        active
    }

    #[test]
    fn energy_bonus_triggers_only_past_the_threshold() {
        let cost: EnergyContainer = [(EnergyType::Water, 2), (EnergyType::Colorless, 1)]
            .into_iter()
            .collect();
        let attack = Attack {
            name: "Hydro Pump".to_string(),
            text: String::new(),
            cost,
            damage: DamageFormula::BonusIfExtraEnergy {
                base: 80,
                bonus: 60,
                energy: EnergyType::Water,
                extra: 2,
            },
        };

        let short = attacker_with(&[(EnergyType::Water, 3), (EnergyType::Colorless, 1)]);
        assert_eq!(attack_damage(&attack, &short, 0), 80);

        let loaded = attacker_with(&[(EnergyType::Water, 4)]);
        assert_eq!(attack_damage(&attack, &loaded, 0), 140);
    }

    #[test]
    fn bench_scaling_counts_own_bench() {
        let attack = Attack {
            name: "Stampede".to_string(),
            text: String::new(),
            cost: EnergyContainer::new(),
            damage: DamageFormula::PerOwnBench { base: 10, per: 20 },
        };
        let attacker = attacker_with(&[]);
        assert_eq!(attack_damage(&attack, &attacker, 0), 10);
        assert_eq!(attack_damage(&attack, &attacker, 3), 70);
    }

    #[test]
    fn fill_choice_only_fills_awaiting_slots() {
        let mut effect = Effect::SwapActive {
            team1: true,
            target: InputSlot::Awaiting,
        };
        assert!(effect.awaiting_input());
        assert_eq!(effect.expected_action(), Some(ActionKind::SelectActive));

        effect.fill_choice(2);
        assert!(!effect.awaiting_input());
        assert_eq!(
            effect,
            Effect::SwapActive {
                team1: true,
                target: InputSlot::Chosen(2),
            }
        );

        effect.fill_choice(5);
        assert_eq!(
            effect,
            Effect::SwapActive {
                team1: true,
                target: InputSlot::Chosen(2),
            }
        );
    }
}
