use cards::{AbilityTrigger, Card, CardEffect, EnergyContainer, EnergyType, TrainerKind};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{EnumIter, IntoEnumIterator};

use crate::battle::effects::{self, Effect, InputSlot};
use crate::battle::rng::BattleRng;
use crate::battle::state::{BattleEvent, BattleState, EventBus, Priority};

/// Everything a player can submit to the engine. Each variant carries the
/// indices that pin the action down; validation happens against the
/// current state, not at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlayerAction {
    /// Choose the opening board: hand indices of basics, first one active.
    Setup { team1: bool, picks: Vec<usize> },
    /// Put a basic from the hand onto the bench.
    PlayBasic { hand_index: usize },
    /// Evolve the creature at `play_index` with the hand card.
    Evolve { hand_index: usize, play_index: usize },
    /// Use the active's attack by index.
    Attack { attack_index: usize },
    /// Swap the active with `play_index`, paying `cost` from its energy.
    Retreat {
        play_index: usize,
        cost: EnergyContainer,
    },
    /// Attach this turn's energy to the creature at `play_index`.
    PlaceEnergy { play_index: usize },
    /// Answer a pending replacement choice with a bench index.
    SelectActive { bench_index: usize },
    /// Play a trainer card from the hand.
    Trainer { hand_index: usize },
    /// Use a manual ability of an in-play creature.
    Ability {
        play_index: usize,
        ability_index: usize,
    },
    /// Answer a pending target choice with a play index.
    Select { choice: usize },
    /// Pass, ending the turn.
    EndTurn,
}

/// The shape of an action without its parameters. Drives the
/// available-action menu and text parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
pub enum ActionKind {
    Setup,
    PlayBasic,
    Evolve,
    Attack,
    Retreat,
    PlaceEnergy,
    SelectActive,
    Trainer,
    Ability,
    Select,
    EndTurn,
}

impl ActionKind {
    pub fn name(&self) -> &'static str {
        match self {
            ActionKind::Setup => "setup",
            ActionKind::PlayBasic => "play_basic",
            ActionKind::Evolve => "evolve",
            ActionKind::Attack => "attack",
            ActionKind::Retreat => "retreat",
            ActionKind::PlaceEnergy => "place_energy",
            ActionKind::SelectActive => "select_active",
            ActionKind::Trainer => "trainer",
            ActionKind::Ability => "ability",
            ActionKind::Select => "select",
            ActionKind::EndTurn => "end_turn",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ActionKind::Setup => "choose your starting creatures: setup <team> <hand indices..>",
            ActionKind::PlayBasic => "bench a basic from your hand: play_basic <hand index>",
            ActionKind::Evolve => "evolve a creature in play: evolve <hand index> <play index>",
            ActionKind::Attack => "attack with your active: attack <attack index>",
            ActionKind::Retreat => "retreat your active: retreat <play index> <energy names..>",
            ActionKind::PlaceEnergy => "attach this turn's energy: place_energy <play index>",
            ActionKind::SelectActive => "send out a replacement: select_active <bench index>",
            ActionKind::Trainer => "play a trainer card: trainer <hand index>",
            ActionKind::Ability => "use an ability: ability <play index> <ability index>",
            ActionKind::Select => "choose a target: select <play index>",
            ActionKind::EndTurn => "end your turn",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        ActionKind::iter().find(|kind| kind.name() == name)
    }

    /// Parses a tokenized command line into a concrete action.
    pub fn parse(tokens: &[&str]) -> Option<PlayerAction> {
        let (&head, rest) = tokens.split_first()?;
        let kind = Self::from_name(head)?;
        match kind {
            ActionKind::Setup => {
                let (&team, picks) = rest.split_first()?;
                let team1 = match team {
                    "1" => true,
                    "2" => false,
                    _ => return None,
                };
                let picks: Option<Vec<usize>> =
                    picks.iter().map(|token| token.parse().ok()).collect();
                let picks = picks?;
                if picks.is_empty() {
                    return None;
                }
                Some(PlayerAction::Setup { team1, picks })
            }
            ActionKind::PlayBasic => Some(PlayerAction::PlayBasic {
                hand_index: single_index(rest)?,
            }),
            ActionKind::Evolve => {
                let (hand_index, play_index) = index_pair(rest)?;
                Some(PlayerAction::Evolve {
                    hand_index,
                    play_index,
                })
            }
            ActionKind::Attack => Some(PlayerAction::Attack {
                attack_index: single_index(rest)?,
            }),
            ActionKind::Retreat => {
                let (&index, energy_names) = rest.split_first()?;
                let play_index = index.parse().ok()?;
                let mut cost = EnergyContainer::new();
                for name in energy_names {
                    cost.add(EnergyType::from_str(name).ok()?);
                }
                Some(PlayerAction::Retreat { play_index, cost })
            }
            ActionKind::PlaceEnergy => Some(PlayerAction::PlaceEnergy {
                play_index: single_index(rest)?,
            }),
            ActionKind::SelectActive => Some(PlayerAction::SelectActive {
                bench_index: single_index(rest)?,
            }),
            ActionKind::Trainer => Some(PlayerAction::Trainer {
                hand_index: single_index(rest)?,
            }),
            ActionKind::Ability => {
                let (play_index, ability_index) = index_pair(rest)?;
                Some(PlayerAction::Ability {
                    play_index,
                    ability_index,
                })
            }
            ActionKind::Select => Some(PlayerAction::Select {
                choice: single_index(rest)?,
            }),
            ActionKind::EndTurn => {
                if rest.is_empty() {
                    Some(PlayerAction::EndTurn)
                } else {
                    None
                }
            }
        }
    }

    /// Whether any action of this kind could be valid for the side to
    /// move. Used together with `BattleState::ready_for` to build the
    /// action menu.
    pub fn could_act(&self, state: &BattleState) -> bool {
        match self {
            ActionKind::Setup => !state.both_ready(),
            ActionKind::SelectActive | ActionKind::Select => match &state.pending_input {
                Some(effect) => effect.expected_action() == Some(*self),
                None => false,
            },
            _ if !state.battle_going() => false,
            ActionKind::PlayBasic => {
                let deck = state.current_deck();
                deck.bench_size() < state.rules.bench_size
                    && deck.hand.iter().any(|card| card.is_basic())
            }
            ActionKind::Evolve => {
                let deck = state.current_deck();
                deck.hand.iter().any(|card| {
                    card.as_pokemon()
                        .and_then(|pokemon| pokemon.evolves_from.as_deref())
                        .is_some_and(|from| {
                            (0..=deck.bench_size()).any(|slot| {
                                deck.in_play(slot).is_some_and(|target| {
                                    target.card().name == from
                                        && target.turns_in_active()
                                            >= state.rules.turns_to_evolve
                                })
                            })
                        })
                })
            }
            ActionKind::Attack => {
                let deck = state.current_deck();
                deck.in_play(0).is_some_and(|active| {
                    active.card().attacks.iter().any(|attack| {
                        active
                            .energies()
                            .at_least_as_big(&attack.cost, Some(EnergyType::Colorless))
                    })
                })
            }
            ActionKind::Retreat => {
                let deck = state.current_deck();
                state.counters.retreats_used == 0
                    && deck.bench_size() > 0
                    && deck.in_play(0).is_some_and(|active| {
                        active.energies().size() >= active.card().retreat_cost
                    })
            }
            ActionKind::PlaceEnergy => {
                !state.counters.energy_used
                    && !state.current_deck().next_energies.is_empty()
                    && state.current_deck().has_active()
            }
            ActionKind::Trainer => {
                let deck = state.current_deck();
                deck.hand.iter().any(|card| {
                    card.as_trainer().is_some_and(|trainer| {
                        trainer.kind != TrainerKind::Supporter
                            || state.counters.supporters_used == 0
                    })
                })
            }
            ActionKind::Ability => {
                let deck = state.current_deck();
                (0..=deck.bench_size()).any(|slot| {
                    deck.in_play(slot).is_some_and(|creature| {
                        creature.card().abilities.iter().enumerate().any(
                            |(index, ability)| {
                                ability.trigger == AbilityTrigger::Manual
                                    && !creature.used_ability(index)
                            },
                        )
                    })
                })
            }
            ActionKind::EndTurn => true,
        }
    }
}

fn single_index(tokens: &[&str]) -> Option<usize> {
    match tokens {
        [one] => one.parse().ok(),
        _ => None,
    }
}

fn index_pair(tokens: &[&str]) -> Option<(usize, usize)> {
    match tokens {
        [first, second] => Some((first.parse().ok()?, second.parse().ok()?)),
        _ => None,
    }
}

impl PlayerAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            PlayerAction::Setup { .. } => ActionKind::Setup,
            PlayerAction::PlayBasic { .. } => ActionKind::PlayBasic,
            PlayerAction::Evolve { .. } => ActionKind::Evolve,
            PlayerAction::Attack { .. } => ActionKind::Attack,
            PlayerAction::Retreat { .. } => ActionKind::Retreat,
            PlayerAction::PlaceEnergy { .. } => ActionKind::PlaceEnergy,
            PlayerAction::SelectActive { .. } => ActionKind::SelectActive,
            PlayerAction::Trainer { .. } => ActionKind::Trainer,
            PlayerAction::Ability { .. } => ActionKind::Ability,
            PlayerAction::Select { .. } => ActionKind::Select,
            PlayerAction::EndTurn => ActionKind::EndTurn,
        }
    }

    /// Checks the action against the current state without mutating it.
    pub fn is_valid(&self, state: &BattleState) -> bool {
        match self {
            PlayerAction::Setup { team1, picks } => {
                if state.both_ready() {
                    return false;
                }
                let already_ready = if *team1 {
                    state.team1_ready
                } else {
                    state.team2_ready
                };
                if already_ready {
                    return false;
                }
                let deck = state.deck(*team1);
                if picks.is_empty() || picks.len() > state.rules.bench_size + 1 {
                    return false;
                }
                let mut seen = picks.clone();
                seen.sort_unstable();
                seen.dedup();
                if seen.len() != picks.len() {
                    return false;
                }
                picks.iter().all(|&pick| {
                    deck.hand_card(pick).is_some_and(Card::is_basic)
                })
            }
            PlayerAction::PlayBasic { hand_index } => {
                let deck = state.current_deck();
                state.battle_going()
                    && deck.bench_size() < state.rules.bench_size
                    && deck.hand_card(*hand_index).is_some_and(Card::is_basic)
            }
            PlayerAction::Evolve {
                hand_index,
                play_index,
            } => {
                if !state.battle_going() {
                    return false;
                }
                let deck = state.current_deck();
                let Some(evolution) = deck.hand_pokemon(*hand_index) else {
                    return false;
                };
                let Some(target) = deck.in_play(*play_index) else {
                    return false;
                };
                evolution.evolves_from.as_deref() == Some(target.card().name.as_str())
                    && target.turns_in_active() >= state.rules.turns_to_evolve
            }
            PlayerAction::Attack { attack_index } => {
                if !state.battle_going() {
                    return false;
                }
                state.current_deck().in_play(0).is_some_and(|active| {
                    active.card().attacks.get(*attack_index).is_some_and(|attack| {
                        active
                            .energies()
                            .at_least_as_big(&attack.cost, Some(EnergyType::Colorless))
                    })
                })
            }
            PlayerAction::Retreat { play_index, cost } => {
                if !state.battle_going() || state.counters.retreats_used > 0 {
                    return false;
                }
                if *play_index == 0 {
                    return false;
                }
                let deck = state.current_deck();
                if deck.in_play(*play_index).is_none() {
                    return false;
                }
                deck.in_play(0).is_some_and(|active| {
                    cost.size() == active.card().retreat_cost
                        && active.energies().at_least_as_big(cost, None)
                })
            }
            PlayerAction::PlaceEnergy { play_index } => {
                state.battle_going()
                    && !state.counters.energy_used
                    && !state.current_deck().next_energies.is_empty()
                    && state.current_deck().in_play(*play_index).is_some()
            }
            PlayerAction::SelectActive { bench_index } => {
                let Some(effect) = &state.pending_input else {
                    return false;
                };
                if effect.expected_action() != Some(ActionKind::SelectActive) {
                    return false;
                }
                let owner = effect.input_team1().expect("selection effects have an owner");
                *bench_index >= 1 && *bench_index <= state.deck(owner).bench_size()
            }
            PlayerAction::Trainer { hand_index } => {
                if !state.battle_going() {
                    return false;
                }
                state
                    .current_deck()
                    .hand_card(*hand_index)
                    .and_then(Card::as_trainer)
                    .is_some_and(|trainer| {
                        trainer.kind != TrainerKind::Supporter
                            || state.counters.supporters_used == 0
                    })
            }
            PlayerAction::Ability {
                play_index,
                ability_index,
            } => {
                if !state.battle_going() {
                    return false;
                }
                state
                    .current_deck()
                    .in_play(*play_index)
                    .is_some_and(|creature| {
                        creature
                            .card()
                            .abilities
                            .get(*ability_index)
                            .is_some_and(|ability| ability.trigger == AbilityTrigger::Manual)
                            && !creature.used_ability(*ability_index)
                    })
            }
            PlayerAction::Select { choice } => {
                let Some(effect) = &state.pending_input else {
                    return false;
                };
                if effect.expected_action() != Some(ActionKind::Select) {
                    return false;
                }
                let owner = effect.input_team1().expect("selection effects have an owner");
                state.deck(owner).in_play(*choice).is_some()
            }
            PlayerAction::EndTurn => state.battle_going(),
        }
    }

    /// Validates and applies the action, queuing its follow-on effects.
    /// Returns false without touching the state if the action is invalid.
    pub fn apply(&self, state: &mut BattleState, rng: &mut BattleRng, bus: &mut EventBus) -> bool {
        if !self.is_valid(state) {
            return false;
        }
        match self {
            PlayerAction::Setup { team1, picks } => {
                let deck = state.deck_mut(*team1);
                for (placed, &pick) in picks.iter().enumerate() {
                    // Earlier picks below this index have already left the
                    // hand, shifting it down.
                    let shift = picks[..placed].iter().filter(|&&earlier| earlier < pick).count();
                    let name = deck
                        .hand_card(pick - shift)
                        .expect("picks were validated")
                        .name()
                        .to_string();
                    deck.play_basic(pick - shift);
                    bus.push(BattleEvent::BasicPlayed {
                        team1: *team1,
                        card: name,
                    });
                }
                if *team1 {
                    state.team1_ready = true;
                } else {
                    state.team2_ready = true;
                }
                bus.push(BattleEvent::SetupComplete { team1: *team1 });
                if state.both_ready() {
                    // Turn 0 grants a draw but no energy.
                    state.start_turn(false, rng, bus);
                }
                true
            }
            PlayerAction::PlayBasic { hand_index } => {
                let team1 = state.team1_move();
                let deck = state.current_deck_mut();
                let name = deck
                    .hand_card(*hand_index)
                    .expect("index was validated")
                    .name()
                    .to_string();
                deck.play_basic(*hand_index);
                bus.push(BattleEvent::BasicPlayed { team1, card: name });
                true
            }
            PlayerAction::Evolve {
                hand_index,
                play_index,
            } => {
                let team1 = state.team1_move();
                let deck = state.current_deck_mut();
                let into = deck
                    .hand_card(*hand_index)
                    .expect("index was validated")
                    .name()
                    .to_string();
                deck.evolve(*hand_index, *play_index);
                bus.push(BattleEvent::Evolved {
                    team1,
                    play_index: *play_index,
                    into,
                });
                true
            }
            PlayerAction::Attack { attack_index } => {
                let team1 = state.team1_move();
                let deck = state.current_deck();
                let active = deck.in_play(0).expect("attacker was validated");
                let attack = &active.card().attacks[*attack_index];
                let amount = effects::attack_damage(attack, active, deck.bench_size());
                let energy_type = active.card().energy_type();
                bus.push(BattleEvent::AttackUsed {
                    team1,
                    attacker: active.card().name.clone(),
                    attack: attack.name.clone(),
                });
                state.counters.attacks_used += 1;
                state.push_step(
                    Priority::AttackEffect,
                    Effect::Damage {
                        team1_defending: !team1,
                        amount,
                        energy_type,
                        apply_weakness: true,
                    },
                );
                state.push_step(Priority::EndTurn, Effect::EndTurn);
                true
            }
            PlayerAction::Retreat { play_index, cost } => {
                let team1 = state.team1_move();
                let deck = state.current_deck_mut();
                if deck.retreat(*play_index, cost).is_err() {
                    return false;
                }
                state.counters.retreats_used += 1;
                let incoming = state
                    .current_deck()
                    .in_play(0)
                    .expect("retreat leaves an active")
                    .card()
                    .name
                    .clone();
                bus.push(BattleEvent::Retreated { team1, incoming });
                true
            }
            PlayerAction::PlaceEnergy { play_index } => {
                let team1 = state.team1_move();
                let energy = state.current_deck_mut().attach_energy(*play_index);
                state.counters.energy_used = true;
                bus.push(BattleEvent::EnergyAttached {
                    team1,
                    play_index: *play_index,
                    energy,
                });
                true
            }
            PlayerAction::SelectActive { bench_index } => {
                let mut effect = state
                    .pending_input
                    .take()
                    .expect("validation checked the pending effect");
                effect.fill_choice(*bench_index);
                effects::resolve(effect, state, rng, bus);
                true
            }
            PlayerAction::Trainer { hand_index } => {
                let team1 = state.team1_move();
                let deck = state.current_deck_mut();
                let trainer = deck
                    .hand_card(*hand_index)
                    .and_then(Card::as_trainer)
                    .expect("index was validated")
                    .clone();
                let name = deck.discard_from_hand(*hand_index);
                if trainer.kind == TrainerKind::Supporter {
                    state.counters.supporters_used += 1;
                }
                bus.push(BattleEvent::TrainerPlayed { team1, card: name });
                queue_card_effects(state, team1, &trainer.effects);
                true
            }
            PlayerAction::Ability {
                play_index,
                ability_index,
            } => {
                let team1 = state.team1_move();
                let deck = state.current_deck_mut();
                let creature = deck
                    .in_play_mut(*play_index)
                    .expect("index was validated");
                creature.use_ability(*ability_index);
                let ability = creature.card().abilities[*ability_index].clone();
                bus.push(BattleEvent::AbilityUsed {
                    team1,
                    play_index: *play_index,
                    ability: ability.name.clone(),
                });
                queue_card_effects(state, team1, &ability.effects);
                true
            }
            PlayerAction::Select { choice } => {
                let mut effect = state
                    .pending_input
                    .take()
                    .expect("validation checked the pending effect");
                effect.fill_choice(*choice);
                effects::resolve(effect, state, rng, bus);
                true
            }
            PlayerAction::EndTurn => {
                state.push_step(Priority::EndTurn, Effect::EndTurn);
                true
            }
        }
    }
}

/// Queues the effects printed on a trainer card or ability, owned by the
/// side that played it.
fn queue_card_effects(state: &mut BattleState, team1: bool, card_effects: &[CardEffect]) {
    for card_effect in card_effects {
        let effect = match card_effect {
            CardEffect::Draw(count) => Effect::Draw {
                team1,
                count: *count,
            },
            CardEffect::HealActive(amount) => Effect::Heal {
                team1,
                target: InputSlot::Awaiting,
                amount: *amount,
            },
            CardEffect::SearchDeck { count, filter } => Effect::SearchDeck {
                team1,
                count: *count,
                filter: *filter,
            },
            CardEffect::SwitchActive => {
                // Nothing to switch with on an empty bench.
                if state.deck(team1).bench_size() == 0 {
                    continue;
                }
                Effect::SwapActive {
                    team1,
                    target: InputSlot::Awaiting,
                }
            }
            CardEffect::DiscardOpponentEnergy(energy) => Effect::DiscardEnergy {
                team1: !team1,
                energy: *energy,
            },
        };
        state.push_step(Priority::Late, effect);
    }
}
