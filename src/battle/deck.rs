use cards::{
    Card, EnergyContainer, EnergyType, InsufficientItems, PokemonCard, Rules, SearchFilter,
};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::battle::active::ActivePokemon;
use crate::battle::rng::BattleRng;

/// One side's board and card zones: draw pile, hand, active slot, bench,
/// discard piles and the upcoming-energy queue.
///
/// In-play creatures are addressed by a single index space: 0 is the active
/// slot, 1..=bench_limit are bench positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckSetup {
    pub(crate) energies: Vec<EnergyType>,
    pub(crate) deck: VecDeque<Card>,
    pub(crate) hand: Vec<Card>,
    pub(crate) active: Option<ActivePokemon>,
    pub(crate) bench: Vec<ActivePokemon>,
    pub(crate) discard: Vec<Card>,
    pub(crate) energy_discard: EnergyContainer,
    pub(crate) next_energies: VecDeque<EnergyType>,
}

/// What a player may see of their own side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnDeckView {
    pub hand: Vec<Card>,
    pub active: Option<ActivePokemon>,
    pub bench: Vec<ActivePokemon>,
    pub deck_size: usize,
    pub energy_queue: Vec<EnergyType>,
    pub discard: Vec<Card>,
    pub energy_discard: EnergyContainer,
    pub bench_limit: usize,
}

/// What a player may see of the opposing side. The hand is hidden; only
/// its size is exposed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpponentDeckView {
    pub hand_size: usize,
    pub active: Option<ActivePokemon>,
    pub bench: Vec<ActivePokemon>,
    pub deck_size: usize,
    pub energy_queue: Vec<EnergyType>,
    pub discard: Vec<Card>,
    pub energy_discard: EnergyContainer,
    pub bench_limit: usize,
}

impl DeckSetup {
    /// Shuffles a validated deck into a draw pile and deals the opening hand.
    /// A randomly chosen basic is planted on top of the pile first, so the
    /// opening hand always contains at least one playable starter.
    pub fn new(deck: &cards::Deck, rules: &Rules, rng: &mut BattleRng) -> Self {
        let mut cards: Vec<Card> = deck.cards.clone();

        let basic_positions: Vec<usize> = cards
            .iter()
            .enumerate()
            .filter(|(_, card)| card.is_basic())
            .map(|(index, _)| index)
            .collect();
        let starter = if basic_positions.is_empty() {
            None
        } else {
            Some(cards.remove(rng.pick(&basic_positions)))
        };

        rng.shuffle(&mut cards);

        let mut pile = VecDeque::with_capacity(cards.len() + 1);
        pile.extend(starter);
        pile.extend(cards);

        let mut hand = Vec::with_capacity(rules.initial_hand_size);
        for _ in 0..rules.initial_hand_size {
            if let Some(card) = pile.pop_front() {
                hand.push(card);
            }
        }

        let mut setup = Self {
            energies: deck.energies.clone(),
            deck: pile,
            hand,
            active: None,
            bench: Vec::new(),
            discard: Vec::new(),
            energy_discard: EnergyContainer::new(),
            next_energies: VecDeque::new(),
        };
        for _ in 0..rules.future_energies {
            setup.queue_energy(rng);
        }
        setup
    }

    fn queue_energy(&mut self, rng: &mut BattleRng) {
        self.next_energies.push_back(rng.pick(&self.energies));
    }

    /// Start-of-turn upkeep for this side: optionally reveal a fresh energy
    /// onto the queue, and draw a card. Returns what happened so the caller
    /// can report it.
    pub fn start_turn(
        &mut self,
        draw_energy: bool,
        draw_card: bool,
        rng: &mut BattleRng,
    ) -> (Option<EnergyType>, Option<String>) {
        let energy = if draw_energy {
            self.queue_energy(rng);
            self.next_energies.back().copied()
        } else {
            None
        };
        let drawn = if draw_card { self.draw_card() } else { None };
        (energy, drawn)
    }

    /// Draws the top card of the pile into the hand, if any.
    pub fn draw_card(&mut self) -> Option<String> {
        let card = self.deck.pop_front()?;
        let name = card.name().to_string();
        self.hand.push(card);
        Some(name)
    }

    /// Moves a basic creature from the hand into play. It becomes the
    /// active if that slot is open and the bench is empty (opening setup),
    /// otherwise it goes to the bench.
    pub fn play_basic(&mut self, hand_index: usize) {
        let card = self.hand.remove(hand_index);
        let pokemon = card
            .as_pokemon()
            .expect("play_basic is only called on a validated creature card")
            .clone();
        let active = ActivePokemon::new(pokemon);
        if self.active.is_none() && self.bench.is_empty() {
            self.active = Some(active);
        } else {
            self.bench.push(active);
        }
    }

    /// Evolves the creature at `play_index` using the hand card at
    /// `hand_index`. Lineage and cooldown must already be checked.
    pub fn evolve(&mut self, hand_index: usize, play_index: usize) {
        let card = self.hand.remove(hand_index);
        let pokemon = card
            .as_pokemon()
            .expect("evolve is only called on a validated creature card")
            .clone();
        self.in_play_mut(play_index)
            .expect("evolve target was validated")
            .evolve(pokemon);
    }

    /// Pays `cost` from the active's attached energy into the energy
    /// discard, then swaps it with the bench creature at `play_index`.
    /// Fails without side effects if the energy does not cover the cost.
    pub fn retreat(
        &mut self,
        play_index: usize,
        cost: &EnergyContainer,
    ) -> Result<(), InsufficientItems> {
        let active = self
            .active
            .as_mut()
            .expect("retreat requires an active creature");
        active.retreat(cost)?;
        self.energy_discard.add_all(cost);
        std::mem::swap(
            self.active.as_mut().expect("active checked above"),
            &mut self.bench[play_index - 1],
        );
        Ok(())
    }

    /// Applies damage to the active creature. Returns whether it was
    /// knocked out by the hit.
    pub fn take_damage(
        &mut self,
        amount: u16,
        damage_type: EnergyType,
        apply_weakness_resistance: bool,
    ) -> bool {
        let active = self
            .active
            .as_mut()
            .expect("damage requires an active creature");
        active.take_damage(amount, damage_type, apply_weakness_resistance);
        active.is_knocked_out()
    }

    /// Removes the creature at `play_index` from play, sending its card
    /// stack to the discard and its energy to the energy discard. Bench
    /// positions after it shift down; the active slot is left empty.
    pub fn discard_from_active(&mut self, play_index: usize) {
        let removed = if play_index == 0 {
            self.active.take().expect("discard target was validated")
        } else {
            self.bench.remove(play_index - 1)
        };
        let (stack, energies) = removed.into_parts();
        for card in stack {
            self.discard.push(Card::Pokemon(card));
        }
        self.energy_discard.add_all(&energies);
    }

    /// Attaches the front of the energy queue to the creature at
    /// `play_index` and returns the attached type.
    pub fn attach_energy(&mut self, play_index: usize) -> EnergyType {
        let energy = self
            .next_energies
            .pop_front()
            .expect("attach was validated against a non-empty queue");
        self.in_play_mut(play_index)
            .expect("attach target was validated")
            .attach_energy(energy);
        energy
    }

    /// Drops the front of the energy queue unused. Unchanneled energy is
    /// lost, not discarded.
    pub fn delete_energy(&mut self) -> Option<EnergyType> {
        self.next_energies.pop_front()
    }

    /// Promotes a bench creature into the empty active slot after a
    /// knockout.
    pub fn replace_starter(&mut self, bench_index: usize) {
        let replacement = self.bench.remove(bench_index - 1);
        self.active = Some(replacement);
    }

    /// Swaps the active with a bench creature for free (card effects).
    pub fn swap_active(&mut self, bench_index: usize) {
        std::mem::swap(
            self.active.as_mut().expect("swap requires an active"),
            &mut self.bench[bench_index - 1],
        );
    }

    /// Searches the pile for up to `count` cards matching `filter`, chosen
    /// at random, moving them to the hand. The pile is reshuffled whether
    /// or not anything was found.
    pub fn search_deck(
        &mut self,
        count: usize,
        filter: SearchFilter,
        rng: &mut BattleRng,
    ) -> Vec<String> {
        let matching: Vec<usize> = self
            .deck
            .iter()
            .enumerate()
            .filter(|(_, card)| match filter {
                SearchFilter::Any => true,
                SearchFilter::Basic => card.is_basic(),
            })
            .map(|(index, _)| index)
            .collect();

        let mut chosen = rng.sample_indices(matching.len(), count);
        chosen.sort_unstable();

        let mut found = Vec::with_capacity(chosen.len());
        for pick in chosen.into_iter().rev() {
            let card = self
                .deck
                .remove(matching[pick])
                .expect("sampled index is in bounds");
            found.push(card.name().to_string());
            self.hand.push(card);
        }

        let mut rest: Vec<Card> = self.deck.drain(..).collect();
        rng.shuffle(&mut rest);
        self.deck.extend(rest);

        found
    }

    /// Discards a card from the hand and returns its name.
    pub fn discard_from_hand(&mut self, hand_index: usize) -> String {
        let card = self.hand.remove(hand_index);
        let name = card.name().to_string();
        self.discard.push(card);
        name
    }

    /// End-of-turn upkeep for this side's creatures.
    pub fn end_turn(&mut self) {
        if let Some(active) = self.active.as_mut() {
            active.end_turn();
        }
        for benched in &mut self.bench {
            benched.end_turn();
        }
    }

    /// Between-turns condition tick for this side's creatures.
    pub fn between_turns(&mut self) {
        if let Some(active) = self.active.as_mut() {
            active.between_turns();
        }
        for benched in &mut self.bench {
            benched.between_turns();
        }
    }

    /// Total cards across every zone, counting evolution stacks card by
    /// card. Constant for the whole battle.
    pub fn card_count(&self) -> usize {
        let in_play: usize = self
            .active
            .iter()
            .chain(self.bench.iter())
            .map(|active| active.cards().len())
            .sum();
        self.deck.len() + self.hand.len() + self.discard.len() + in_play
    }

    pub fn bench_size(&self) -> usize {
        self.bench.len()
    }

    pub fn has_active(&self) -> bool {
        self.active.is_some()
    }

    /// True when the active slot is empty but the bench can refill it.
    pub fn needs_replacement(&self) -> bool {
        self.active.is_none() && !self.bench.is_empty()
    }

    /// The creature at a play index: 0 for the active, 1.. for the bench.
    pub fn in_play(&self, play_index: usize) -> Option<&ActivePokemon> {
        if play_index == 0 {
            self.active.as_ref()
        } else {
            self.bench.get(play_index - 1)
        }
    }

    pub fn in_play_mut(&mut self, play_index: usize) -> Option<&mut ActivePokemon> {
        if play_index == 0 {
            self.active.as_mut()
        } else {
            self.bench.get_mut(play_index - 1)
        }
    }

    pub fn hand_card(&self, hand_index: usize) -> Option<&Card> {
        self.hand.get(hand_index)
    }

    /// Looks up the creature card at a hand index, if it is one.
    pub fn hand_pokemon(&self, hand_index: usize) -> Option<&PokemonCard> {
        self.hand.get(hand_index).and_then(Card::as_pokemon)
    }

    pub fn own_view(&self, rules: &Rules) -> OwnDeckView {
        OwnDeckView {
            hand: self.hand.clone(),
            active: self.active.clone(),
            bench: self.bench.clone(),
            deck_size: self.deck.len(),
            energy_queue: self.next_energies.iter().copied().collect(),
            discard: self.discard.clone(),
            energy_discard: self.energy_discard.clone(),
            bench_limit: rules.bench_size,
        }
    }

    pub fn opponent_view(&self, rules: &Rules) -> OpponentDeckView {
        OpponentDeckView {
            hand_size: self.hand.len(),
            active: self.active.clone(),
            bench: self.bench.clone(),
            deck_size: self.deck.len(),
            energy_queue: self.next_energies.iter().copied().collect(),
            discard: self.discard.clone(),
            energy_discard: self.energy_discard.clone(),
            bench_limit: rules.bench_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefab_decks;
    use pretty_assertions::assert_eq;

    fn fresh_setup(seed: u64) -> (DeckSetup, Rules) {
        let rules = Rules::default();
        let mut rng = BattleRng::from_seed(seed);
        let setup = DeckSetup::new(&prefab_decks::water_deck(), &rules, &mut rng);
        (setup, rules)
    }

    #[test]
    fn opening_hand_contains_a_basic() {
        for seed in 0..20 {
            let (setup, rules) = fresh_setup(seed);
            assert_eq!(setup.hand.len(), rules.initial_hand_size);
            assert!(
                setup.hand.iter().any(|card| card.is_basic()),
                "seed {seed} produced a hand with no basic"
            );
        }
    }

    #[test]
    fn card_count_is_conserved_through_play() {
        let (mut setup, _rules) = fresh_setup(7);
        let total = setup.card_count();

        let basic_index = setup
            .hand
            .iter()
            .position(|card| card.is_basic())
            .expect("starter is guaranteed");
        setup.play_basic(basic_index);
        assert_eq!(setup.card_count(), total);

        setup.draw_card();
        assert_eq!(setup.card_count(), total);

        setup.discard_from_hand(0);
        assert_eq!(setup.card_count(), total);

        setup.discard_from_active(0);
        assert_eq!(setup.card_count(), total);
        assert!(setup.active.is_none());
    }

    #[test]
    fn search_reshuffles_even_when_nothing_matches() {
        let (mut setup, _rules) = fresh_setup(3);
        let deck_before = setup.deck.len();
        let hand_before = setup.hand.len();

        // Strip the pile of basics so a basic search finds nothing.
        setup.deck.retain(|card| !card.is_basic());
        let stripped = setup.deck.len();

        let mut rng = BattleRng::from_seed(11);
        let found = setup.search_deck(1, SearchFilter::Basic, &mut rng);
        assert!(found.is_empty());
        assert_eq!(setup.deck.len(), stripped);
        assert_eq!(setup.hand.len(), hand_before);
        assert!(deck_before >= stripped);
    }

    #[test]
    fn failed_retreat_leaves_both_creatures_in_place() {
        let (mut setup, _rules) = fresh_setup(5);
        let basic_index = setup
            .hand
            .iter()
            .position(|card| card.is_basic())
            .expect("starter is guaranteed");
        setup.play_basic(basic_index);
        setup
            .bench
            .push(ActivePokemon::new(prefab_decks::squirtle()));

        let active_name = setup.in_play(0).unwrap().card().name.clone();
        let cost: EnergyContainer = [(EnergyType::Colorless, 1)].into_iter().collect();
        assert!(setup.retreat(1, &cost).is_err());
        assert_eq!(setup.in_play(0).unwrap().card().name, active_name);
        assert_eq!(setup.energy_discard.size(), 0);
    }

    #[test]
    fn energy_queue_advances_on_attach() {
        let (mut setup, rules) = fresh_setup(9);
        assert_eq!(setup.next_energies.len(), rules.future_energies);

        let basic_index = setup
            .hand
            .iter()
            .position(|card| card.is_basic())
            .expect("starter is guaranteed");
        setup.play_basic(basic_index);

        let expected = *setup.next_energies.front().unwrap();
        let attached = setup.attach_energy(0);
        assert_eq!(attached, expected);
        assert!(setup.next_energies.is_empty());
        assert_eq!(setup.in_play(0).unwrap().energies().size(), 1);
    }
}
