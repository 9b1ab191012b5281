use cards::{Card, Deck, EnergyType, PokemonCard, Rules};

use crate::battle::actions::PlayerAction;
use crate::battle::engine::Battle;
use crate::battle::rng::BattleRng;

/// A deck of twenty copies of one basic creature. Every draw and every
/// generated energy is then known in advance, which keeps scenario tests
/// deterministic without fixing a seed per assertion.
pub fn mono_deck(card: PokemonCard, energy: EnergyType) -> Deck {
    assert!(card.is_basic(), "mono decks are built from basics");
    Deck {
        name: format!("All {}", card.name),
        cards: std::iter::repeat_with(|| Card::Pokemon(card.clone()))
            .take(20)
            .collect(),
        energies: vec![energy],
    }
}

/// Default rules with the duplicate limit lifted, so mono decks validate.
pub fn loose_rules() -> Rules {
    Rules {
        duplicate_limit: 20,
        ..Rules::default()
    }
}

/// Builds a battle and runs both sides' setup. `picks1`/`picks2` are hand
/// indices; with mono decks any indices work.
pub fn started_battle(
    deck1: &Deck,
    deck2: &Deck,
    rules: Rules,
    seed: u64,
    picks1: &[usize],
    picks2: &[usize],
) -> Battle {
    let mut battle =
        Battle::new(deck1, deck2, rules, BattleRng::from_seed(seed)).expect("decks validate");
    submit(
        &mut battle,
        PlayerAction::Setup {
            team1: true,
            picks: picks1.to_vec(),
        },
    );
    submit(
        &mut battle,
        PlayerAction::Setup {
            team1: false,
            picks: picks2.to_vec(),
        },
    );
    battle
}

/// Submits an action that the test expects to succeed.
pub fn submit(battle: &mut Battle, action: PlayerAction) {
    assert!(
        battle.action(&action),
        "action {:?} was rejected; available: {:?}",
        action,
        battle.available_actions()
    );
}

/// Submits an action that the test expects to be rejected.
pub fn submit_rejected(battle: &mut Battle, action: PlayerAction) {
    assert!(
        !battle.action(&action),
        "action {:?} was unexpectedly accepted",
        action
    );
}

/// Ends the current turn for whoever is to move.
pub fn pass_turn(battle: &mut Battle) {
    submit(battle, PlayerAction::EndTurn);
}
