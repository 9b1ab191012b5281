use cards::{Deck, Rules};
use strum::IntoEnumIterator;

use crate::battle::actions::{ActionKind, PlayerAction};
use crate::battle::deck::{OpponentDeckView, OwnDeckView};
use crate::battle::effects;
use crate::battle::rng::BattleRng;
use crate::battle::state::{BattleEvent, BattleState, EventBus};
use crate::errors::BattleResult;

/// A running battle. Owns the authoritative state, the randomness source
/// and the event log, and exposes the submit-an-action / read-the-events
/// surface that callers drive.
///
/// Actions apply immediately and their queued consequences resolve in the
/// same call, stopping only when an effect needs a choice from a player.
/// At that point `pending_input` is set and the only accepted action is
/// the matching selection.
#[derive(Debug, Clone)]
pub struct Battle {
    pub(crate) state: BattleState,
    pub(crate) rng: BattleRng,
    pub(crate) events: EventBus,
}

impl Battle {
    /// Validates both decks and deals the opening state. The battle then
    /// waits for both sides' setup actions.
    pub fn new(
        deck1: &Deck,
        deck2: &Deck,
        rules: Rules,
        mut rng: BattleRng,
    ) -> BattleResult<Self> {
        let state = BattleState::new(deck1, deck2, rules, &mut rng)?;
        Ok(Self {
            state,
            rng,
            events: EventBus::new(),
        })
    }

    /// Submits a player action. Returns false if the action was rejected;
    /// on success the action and all its non-suspended consequences have
    /// resolved.
    pub fn action(&mut self, action: &PlayerAction) -> bool {
        if self.state.finished {
            return false;
        }
        if !self.state.ready_for(action.kind()) {
            return false;
        }
        if !action.apply(&mut self.state, &mut self.rng, &mut self.events) {
            return false;
        }
        self.drain();
        true
    }

    /// Resolves queued effects until the queue empties, an effect suspends
    /// for input, or the battle ends.
    fn drain(&mut self) {
        while !self.state.is_over() {
            let Some(effect) = self.state.pop_step() else {
                break;
            };
            if effect.awaiting_input() {
                let team1 = effect
                    .input_team1()
                    .expect("suspending effects have an owner");
                self.state.next_move_team1 = team1;
                self.state.pending_input = Some(effect);
                self.events.push(BattleEvent::AwaitingSelection { team1 });
                return;
            }
            effects::resolve(effect, &mut self.state, &mut self.rng, &mut self.events);
        }
        if self.state.is_over() && !self.state.finished {
            self.state.finished = true;
            self.state.clear_queue();
            self.events.push(BattleEvent::BattleEnded {
                winner_team1: self.state.winner(),
            });
        }
    }

    /// The kinds of action the side to move could submit right now.
    pub fn available_actions(&self) -> Vec<ActionKind> {
        if self.state.finished {
            return Vec::new();
        }
        ActionKind::iter()
            .filter(|kind| self.state.ready_for(*kind) && kind.could_act(&self.state))
            .collect()
    }

    /// The effect currently suspended on a player choice, if any.
    pub fn pending_input(&self) -> Option<&effects::Effect> {
        self.state.pending_input.as_ref()
    }

    pub fn state(&self) -> &BattleState {
        &self.state
    }

    pub fn score(&self) -> (u8, u8) {
        self.state.score()
    }

    pub fn is_over(&self) -> bool {
        self.state.finished || self.state.is_over()
    }

    pub fn winner(&self) -> Option<bool> {
        self.state.winner()
    }

    /// The side whose input the engine expects next.
    pub fn team1_move(&self) -> bool {
        self.state.team1_move()
    }

    /// The side on the turn clock.
    pub fn team1_turn(&self) -> bool {
        self.state.team1_turn()
    }

    pub fn own_view(&self, team1: bool) -> OwnDeckView {
        self.state.deck(team1).own_view(&self.state.rules)
    }

    pub fn opponent_view(&self, team1: bool) -> OpponentDeckView {
        self.state.deck(!team1).opponent_view(&self.state.rules)
    }

    /// Everything that has happened so far, in order.
    pub fn events(&self) -> &[BattleEvent] {
        self.events.events()
    }

    /// Takes the accumulated events, leaving the log empty.
    pub fn drain_events(&mut self) -> Vec<BattleEvent> {
        self.events.drain()
    }
}
