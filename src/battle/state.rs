use cards::{EnergyType, Rules, SearchFilter};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt;

use crate::battle::deck::DeckSetup;
use crate::battle::effects::Effect;
use crate::battle::rng::BattleRng;
use crate::errors::validate_deck;
use crate::errors::DeckError;

/// Everything observable that happens during a battle, in order. The engine
/// emits these as it resolves actions and effects; callers read them for
/// display, logging or replay.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum BattleEvent {
    // Turn management
    TurnStarted {
        turn_number: u32,
        team1: bool,
    },
    TurnEnded {
        turn_number: u32,
    },

    // Card flow
    CardDrawn {
        team1: bool,
        card: String,
    },
    EnergyGenerated {
        team1: bool,
        energy: EnergyType,
    },
    EnergyAttached {
        team1: bool,
        play_index: usize,
        energy: EnergyType,
    },
    EnergyDiscarded {
        team1: bool,
        energy: EnergyType,
    },
    EnergyRemoved {
        team1: bool,
        energy: EnergyType,
    },

    // Board changes
    BasicPlayed {
        team1: bool,
        card: String,
    },
    Evolved {
        team1: bool,
        play_index: usize,
        into: String,
    },
    Retreated {
        team1: bool,
        incoming: String,
    },
    ActiveReplaced {
        team1: bool,
        incoming: String,
    },

    // Combat
    AttackUsed {
        team1: bool,
        attacker: String,
        attack: String,
    },
    DamageDealt {
        team1_defending: bool,
        amount: u16,
        remaining_hp: u16,
    },
    KnockedOut {
        team1: bool,
        card: String,
    },
    PointsScored {
        team1: bool,
        points: u8,
        total: u8,
    },

    // Cards and abilities
    TrainerPlayed {
        team1: bool,
        card: String,
    },
    AbilityUsed {
        team1: bool,
        play_index: usize,
        ability: String,
    },
    DeckSearched {
        team1: bool,
        filter: SearchFilter,
        found: Vec<String>,
    },
    Healed {
        team1: bool,
        play_index: usize,
        amount: u16,
    },

    // Flow control
    SetupComplete {
        team1: bool,
    },
    AwaitingSelection {
        team1: bool,
    },
    BattleEnded {
        winner_team1: Option<bool>,
    },
}

impl fmt::Display for BattleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn side(team1: bool) -> &'static str {
            if team1 {
                "team 1"
            } else {
                "team 2"
            }
        }
        match self {
            BattleEvent::TurnStarted { turn_number, team1 } => {
                write!(f, "Turn {} started for {}", turn_number, side(*team1))
            }
            BattleEvent::TurnEnded { turn_number } => write!(f, "Turn {} ended", turn_number),
            BattleEvent::CardDrawn { team1, card } => {
                write!(f, "{} drew {}", side(*team1), card)
            }
            BattleEvent::EnergyGenerated { team1, energy } => {
                write!(f, "{} revealed {} energy", side(*team1), energy)
            }
            BattleEvent::EnergyAttached {
                team1,
                play_index,
                energy,
            } => write!(
                f,
                "{} attached {} energy to slot {}",
                side(*team1),
                energy,
                play_index
            ),
            BattleEvent::EnergyDiscarded { team1, energy } => {
                write!(f, "{} lost an unused {} energy", side(*team1), energy)
            }
            BattleEvent::EnergyRemoved { team1, energy } => {
                write!(f, "{} had a {} energy removed", side(*team1), energy)
            }
            BattleEvent::BasicPlayed { team1, card } => {
                write!(f, "{} played {}", side(*team1), card)
            }
            BattleEvent::Evolved {
                team1,
                play_index,
                into,
            } => write!(
                f,
                "{} evolved slot {} into {}",
                side(*team1),
                play_index,
                into
            ),
            BattleEvent::Retreated { team1, incoming } => {
                write!(f, "{} retreated; {} is now active", side(*team1), incoming)
            }
            BattleEvent::ActiveReplaced { team1, incoming } => {
                write!(f, "{} sent out {}", side(*team1), incoming)
            }
            BattleEvent::AttackUsed {
                team1,
                attacker,
                attack,
            } => write!(f, "{}'s {} used {}", side(*team1), attacker, attack),
            BattleEvent::DamageDealt {
                team1_defending,
                amount,
                remaining_hp,
            } => write!(
                f,
                "{} took {} damage ({} HP left)",
                side(*team1_defending),
                amount,
                remaining_hp
            ),
            BattleEvent::KnockedOut { team1, card } => {
                write!(f, "{}'s {} was knocked out", side(*team1), card)
            }
            BattleEvent::PointsScored {
                team1,
                points,
                total,
            } => write!(
                f,
                "{} scored {} point(s), now at {}",
                side(*team1),
                points,
                total
            ),
            BattleEvent::TrainerPlayed { team1, card } => {
                write!(f, "{} played trainer {}", side(*team1), card)
            }
            BattleEvent::AbilityUsed {
                team1,
                play_index,
                ability,
            } => write!(
                f,
                "{}'s slot {} used ability {}",
                side(*team1),
                play_index,
                ability
            ),
            BattleEvent::DeckSearched {
                team1,
                filter: _,
                found,
            } => write!(f, "{} searched the deck, found {:?}", side(*team1), found),
            BattleEvent::Healed {
                team1,
                play_index,
                amount,
            } => write!(
                f,
                "{} healed slot {} for {}",
                side(*team1),
                play_index,
                amount
            ),
            BattleEvent::SetupComplete { team1 } => {
                write!(f, "{} finished setup", side(*team1))
            }
            BattleEvent::AwaitingSelection { team1 } => {
                write!(f, "Waiting on {} to choose", side(*team1))
            }
            BattleEvent::BattleEnded { winner_team1 } => match winner_team1 {
                Some(true) => write!(f, "Battle over: team 1 wins"),
                Some(false) => write!(f, "Battle over: team 2 wins"),
                None => write!(f, "Battle over: draw"),
            },
        }
    }
}

/// Ordered sink for battle events.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventBus {
    events: Vec<BattleEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    pub fn drain(&mut self) -> Vec<BattleEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl fmt::Display for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for event in &self.events {
            writeln!(f, "{}", event)?;
        }
        Ok(())
    }
}

/// Resolution tiers for queued effects. Lower tiers resolve first; within
/// a tier, effects resolve in the order they were queued.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Priority {
    /// Resolves before anything else, e.g. immediate card effects.
    Immediate,
    /// Damage and other attack consequences.
    AttackEffect,
    /// The defender chooses a replacement after a knockout.
    ReplaceActive,
    /// Steps that must wait until the replacement is in.
    AfterReplace,
    /// Deferred card effects.
    Late,
    /// Counter effects against the attacker.
    Retaliation,
    /// Turn handoff, always last.
    EndTurn,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct QueueEntry {
    priority: Priority,
    seq: u64,
    effect: Effect,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.seq == other.seq
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.priority, self.seq).cmp(&(other.priority, other.seq))
    }
}

/// Per-turn action budgets. Reset on every turn handoff.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TurnCounters {
    pub supporters_used: u8,
    pub retreats_used: u8,
    pub energy_used: bool,
    pub attacks_used: u8,
}

/// Full authoritative state of one battle: both sides' boards, scores,
/// the turn clock and the queue of effects still to resolve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleState {
    pub(crate) rules: Rules,
    pub(crate) deck1: DeckSetup,
    pub(crate) deck2: DeckSetup,
    pub(crate) turn_number: u32,
    pub(crate) next_move_team1: bool,
    pub(crate) team1_points: u8,
    pub(crate) team2_points: u8,
    pub(crate) team1_ready: bool,
    pub(crate) team2_ready: bool,
    pub(crate) counters: TurnCounters,
    #[serde(with = "queue_serde")]
    pub(crate) queue: BinaryHeap<Reverse<QueueEntry>>,
    pub(crate) next_seq: u64,
    pub(crate) pending_input: Option<Effect>,
    pub(crate) finished: bool,
}

mod queue_serde {
    use super::QueueEntry;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::cmp::Reverse;
    use std::collections::BinaryHeap;

    pub fn serialize<S: Serializer>(
        queue: &BinaryHeap<Reverse<QueueEntry>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let entries: Vec<&QueueEntry> = queue.iter().map(|entry| &entry.0).collect();
        entries.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BinaryHeap<Reverse<QueueEntry>>, D::Error> {
        let entries = Vec::<QueueEntry>::deserialize(deserializer)?;
        Ok(entries.into_iter().map(Reverse).collect())
    }
}

impl BattleState {
    /// Builds the opening state: both decks validated, shuffled and dealt.
    /// Team 1 moves first during setup.
    pub fn new(
        deck1: &cards::Deck,
        deck2: &cards::Deck,
        rules: Rules,
        rng: &mut BattleRng,
    ) -> Result<Self, DeckError> {
        validate_deck(&rules, deck1)?;
        validate_deck(&rules, deck2)?;
        let setup1 = DeckSetup::new(deck1, &rules, rng);
        let setup2 = DeckSetup::new(deck2, &rules, rng);
        Ok(Self {
            rules,
            deck1: setup1,
            deck2: setup2,
            turn_number: 0,
            next_move_team1: true,
            team1_points: 0,
            team2_points: 0,
            team1_ready: false,
            team2_ready: false,
            counters: TurnCounters::default(),
            queue: BinaryHeap::new(),
            next_seq: 0,
            pending_input: None,
            finished: false,
        })
    }

    pub fn deck(&self, team1: bool) -> &DeckSetup {
        if team1 {
            &self.deck1
        } else {
            &self.deck2
        }
    }

    pub fn deck_mut(&mut self, team1: bool) -> &mut DeckSetup {
        if team1 {
            &mut self.deck1
        } else {
            &mut self.deck2
        }
    }

    /// The side whose input the engine expects next.
    pub fn team1_move(&self) -> bool {
        self.next_move_team1
    }

    /// The side whose turn it is on the turn clock. Team 1 takes even
    /// turns, starting with turn 0.
    pub fn team1_turn(&self) -> bool {
        self.turn_number % 2 == 0
    }

    pub fn current_deck(&self) -> &DeckSetup {
        self.deck(self.next_move_team1)
    }

    pub fn current_deck_mut(&mut self) -> &mut DeckSetup {
        self.deck_mut(self.next_move_team1)
    }

    /// The board opposing the side to move.
    pub fn defending_deck(&self) -> &DeckSetup {
        self.deck(!self.next_move_team1)
    }

    pub fn score(&self) -> (u8, u8) {
        (self.team1_points, self.team2_points)
    }

    /// Credits points and returns the scorer's new total.
    pub fn add_points(&mut self, team1: bool, points: u8) -> u8 {
        if team1 {
            self.team1_points += points;
            self.team1_points
        } else {
            self.team2_points += points;
            self.team2_points
        }
    }

    pub fn both_ready(&self) -> bool {
        self.team1_ready && self.team2_ready
    }

    /// The battle ends when a side reaches the point goal, or when a side
    /// has nothing left to send out.
    pub fn is_over(&self) -> bool {
        if self.team1_points >= self.rules.points_to || self.team2_points >= self.rules.points_to {
            return true;
        }
        if self.both_ready() {
            let wiped =
                |deck: &DeckSetup| !deck.has_active() && deck.bench_size() == 0;
            return wiped(&self.deck1) || wiped(&self.deck2);
        }
        false
    }

    /// `Some(true)` for a team 1 win, `Some(false)` for team 2, `None`
    /// while the battle is running or on a mutual wipe.
    pub fn winner(&self) -> Option<bool> {
        if !self.is_over() {
            return None;
        }
        if self.team1_points >= self.rules.points_to && self.team2_points >= self.rules.points_to {
            return None;
        }
        if self.team1_points >= self.rules.points_to {
            return Some(true);
        }
        if self.team2_points >= self.rules.points_to {
            return Some(false);
        }
        let wiped = |deck: &DeckSetup| !deck.has_active() && deck.bench_size() == 0;
        match (wiped(&self.deck1), wiped(&self.deck2)) {
            (true, false) => Some(false),
            (false, true) => Some(true),
            _ => None,
        }
    }

    pub fn battle_going(&self) -> bool {
        self.both_ready() && !self.is_over()
    }

    /// Queues an effect at a priority tier. Ties within a tier resolve
    /// first-queued-first.
    pub fn push_step(&mut self, priority: Priority, effect: Effect) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Reverse(QueueEntry {
            priority,
            seq,
            effect,
        }));
    }

    pub fn pop_step(&mut self) -> Option<Effect> {
        self.queue.pop().map(|entry| entry.0.effect)
    }

    pub fn queue_is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn clear_queue(&mut self) {
        self.queue.clear();
        self.pending_input = None;
    }

    /// Whether the engine will accept an action of this kind right now.
    /// While an effect is suspended awaiting input, only the matching
    /// selection action is accepted; otherwise the queue must be drained.
    pub fn ready_for(&self, kind: crate::battle::actions::ActionKind) -> bool {
        match &self.pending_input {
            Some(effect) => effect.expected_action() == Some(kind),
            None => self.queue_is_empty(),
        }
    }

    /// Start-of-turn upkeep for the side on the clock.
    pub fn start_turn(&mut self, generate_energy: bool, rng: &mut BattleRng, bus: &mut EventBus) {
        let team1 = self.team1_turn();
        self.next_move_team1 = team1;
        bus.push(BattleEvent::TurnStarted {
            turn_number: self.turn_number,
            team1,
        });
        let max_hand = self.rules.max_hand_size;
        let deck = self.deck_mut(team1);
        let draw_card = !deck.deck.is_empty() && deck.hand.len() < max_hand;
        let (energy, drawn) = deck.start_turn(generate_energy, draw_card, rng);
        if let Some(energy) = energy {
            bus.push(BattleEvent::EnergyGenerated { team1, energy });
        }
        if let Some(card) = drawn {
            bus.push(BattleEvent::CardDrawn { team1, card });
        }
        // The first turn of the battle grants no energy to attach.
        self.counters.energy_used = !generate_energy;
    }

    /// Turn handoff: unused energy is lost, creatures tick, the clock
    /// advances and the next side's turn begins.
    pub fn end_turn(&mut self, rng: &mut BattleRng, bus: &mut EventBus) {
        let team1 = self.team1_turn();
        if !self.counters.energy_used {
            if let Some(energy) = self.deck_mut(team1).delete_energy() {
                bus.push(BattleEvent::EnergyDiscarded { team1, energy });
            }
        }
        self.deck_mut(team1).end_turn();
        bus.push(BattleEvent::TurnEnded {
            turn_number: self.turn_number,
        });
        self.counters = TurnCounters::default();
        self.turn_number += 1;
        self.next_move_team1 = self.team1_turn();
        self.deck1.between_turns();
        self.deck2.between_turns();
        self.start_turn(true, rng, bus);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::effects::{Effect, InputSlot};
    use pretty_assertions::assert_eq;

    #[test]
    fn queue_orders_by_tier_then_insertion() {
        let mut state = BattleState::new(
            &crate::prefab_decks::water_deck(),
            &crate::prefab_decks::fire_deck(),
            Rules::default(),
            &mut BattleRng::from_seed(1),
        )
        .unwrap();

        state.push_step(Priority::EndTurn, Effect::EndTurn);
        state.push_step(Priority::Late, Effect::Draw { team1: true, count: 1 });
        state.push_step(Priority::Late, Effect::Draw { team1: false, count: 2 });
        state.push_step(
            Priority::AttackEffect,
            Effect::Damage {
                team1_defending: false,
                amount: 10,
                energy_type: EnergyType::Water,
                apply_weakness: true,
            },
        );

        assert!(matches!(
            state.pop_step(),
            Some(Effect::Damage { amount: 10, .. })
        ));
        assert!(matches!(
            state.pop_step(),
            Some(Effect::Draw { team1: true, count: 1 })
        ));
        assert!(matches!(
            state.pop_step(),
            Some(Effect::Draw { team1: false, count: 2 })
        ));
        assert!(matches!(state.pop_step(), Some(Effect::EndTurn)));
        assert_eq!(state.pop_step(), None);
    }

    #[test]
    fn turn_parity_tracks_the_clock() {
        let mut state = BattleState::new(
            &crate::prefab_decks::water_deck(),
            &crate::prefab_decks::fire_deck(),
            Rules::default(),
            &mut BattleRng::from_seed(2),
        )
        .unwrap();
        assert!(state.team1_turn());
        state.turn_number = 1;
        assert!(!state.team1_turn());
        state.turn_number = 2;
        assert!(state.team1_turn());
    }

    #[test]
    fn state_survives_a_serde_round_trip() {
        let mut state = BattleState::new(
            &crate::prefab_decks::water_deck(),
            &crate::prefab_decks::fire_deck(),
            Rules::default(),
            &mut BattleRng::from_seed(9),
        )
        .unwrap();
        state.push_step(Priority::EndTurn, Effect::EndTurn);
        state.push_step(Priority::Late, Effect::Draw { team1: true, count: 1 });

        let json = serde_json::to_string(&state).unwrap();
        let mut restored: BattleState = serde_json::from_str(&json).unwrap();

        // Queue order is preserved even though the heap itself has no
        // canonical layout.
        assert!(matches!(
            restored.pop_step(),
            Some(Effect::Draw { team1: true, count: 1 })
        ));
        assert!(matches!(restored.pop_step(), Some(Effect::EndTurn)));
        assert_eq!(restored.deck1, state.deck1);
        assert_eq!(restored.turn_number, state.turn_number);
    }

    #[test]
    fn pending_input_gates_ready_for() {
        let mut state = BattleState::new(
            &crate::prefab_decks::water_deck(),
            &crate::prefab_decks::fire_deck(),
            Rules::default(),
            &mut BattleRng::from_seed(3),
        )
        .unwrap();
        use crate::battle::actions::ActionKind;

        assert!(state.ready_for(ActionKind::Setup));

        state.pending_input = Some(Effect::SwapActive {
            team1: true,
            target: InputSlot::Awaiting,
        });
        assert!(state.ready_for(ActionKind::SelectActive));
        assert!(!state.ready_for(ActionKind::Attack));
        assert!(!state.ready_for(ActionKind::Setup));
    }
}
