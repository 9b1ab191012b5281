#[cfg(test)]
mod tests {
    use crate::battle::actions::{ActionKind, PlayerAction};
    use crate::battle::state::BattleEvent;
    use crate::battle::tests::common::{
        loose_rules, mono_deck, pass_turn, started_battle, submit, submit_rejected,
    };
    use crate::prefab_decks;
    use cards::{Card, EnergyType};
    use pretty_assertions::assert_eq;

    fn battle_with_hand_card(seed: u64, card: Card) -> (crate::battle::engine::Battle, usize) {
        let squirtle = mono_deck(prefab_decks::squirtle(), EnergyType::Water);
        let psyduck = mono_deck(prefab_decks::psyduck(), EnergyType::Water);
        let mut battle = started_battle(&squirtle, &psyduck, loose_rules(), seed, &[0, 1], &[0]);
        battle.state.deck1.hand.push(card);
        let index = battle.state.deck1.hand.len() - 1;
        (battle, index)
    }

    #[test]
    fn supporters_are_limited_to_one_per_turn() {
        let (mut battle, first) =
            battle_with_hand_card(30, Card::Trainer(prefab_decks::professors_research()));
        battle
            .state
            .deck1
            .hand
            .push(Card::Trainer(prefab_decks::professors_research()));

        let hand_before = battle.state.deck1.hand.len();
        submit(&mut battle, PlayerAction::Trainer { hand_index: first });
        // Played one, drew two.
        assert_eq!(battle.state.deck1.hand.len(), hand_before + 1);
        assert!(battle.events().iter().any(|event| matches!(
            event,
            BattleEvent::TrainerPlayed { team1: true, .. }
        )));

        let second = battle.state.deck1.hand.len() - 1;
        submit_rejected(&mut battle, PlayerAction::Trainer { hand_index: second });

        // The budget resets with the turn.
        pass_turn(&mut battle);
        pass_turn(&mut battle);
        let second = battle
            .state
            .deck1
            .hand
            .iter()
            .position(|card| card.name() == "Professor's Research")
            .expect("second copy still in hand");
        submit(&mut battle, PlayerAction::Trainer { hand_index: second });
    }

    #[test]
    fn items_are_not_limited_per_turn() {
        let (mut battle, first) = battle_with_hand_card(31, Card::Trainer(prefab_decks::potion()));
        battle.state.deck1.hand.push(Card::Trainer(prefab_decks::potion()));
        let second = battle.state.deck1.hand.len() - 1;

        battle
            .state
            .deck1
            .in_play_mut(0)
            .expect("active exists")
            .take_damage(50, EnergyType::Colorless, false);

        submit(&mut battle, PlayerAction::Trainer { hand_index: first });
        assert_eq!(battle.available_actions(), vec![ActionKind::Select]);
        submit(&mut battle, PlayerAction::Select { choice: 0 });

        // Second copy shifted down after the first left the hand.
        submit(
            &mut battle,
            PlayerAction::Trainer {
                hand_index: second - 1,
            },
        );
        submit(&mut battle, PlayerAction::Select { choice: 0 });

        // 50 damage healed by two potions of 20.
        assert_eq!(
            battle.state.deck1.in_play(0).expect("active exists").damage(),
            10
        );
    }

    #[test]
    fn healing_suspends_until_a_target_is_chosen() {
        let (mut battle, index) = battle_with_hand_card(32, Card::Trainer(prefab_decks::potion()));
        battle
            .state
            .deck1
            .in_play_mut(1)
            .expect("bench exists")
            .take_damage(30, EnergyType::Colorless, false);

        submit(&mut battle, PlayerAction::Trainer { hand_index: index });
        assert!(battle.pending_input().is_some());

        // Only the matching selection is accepted while suspended.
        submit_rejected(&mut battle, PlayerAction::EndTurn);
        submit_rejected(&mut battle, PlayerAction::SelectActive { bench_index: 1 });
        // Slot 5 holds nothing.
        submit_rejected(&mut battle, PlayerAction::Select { choice: 5 });

        submit(&mut battle, PlayerAction::Select { choice: 1 });
        assert!(battle.pending_input().is_none());
        assert!(battle.events().iter().any(|event| matches!(
            event,
            BattleEvent::Healed {
                team1: true,
                play_index: 1,
                amount: 20,
            }
        )));
        assert_eq!(
            battle.state.deck1.in_play(1).expect("bench exists").damage(),
            10
        );
    }

    #[test]
    fn deck_search_moves_a_match_into_the_hand() {
        let (mut battle, index) =
            battle_with_hand_card(33, Card::Trainer(prefab_decks::poke_ball()));
        let hand_before = battle.state.deck1.hand.len();
        let deck_before = battle.state.deck1.deck.len();

        submit(&mut battle, PlayerAction::Trainer { hand_index: index });

        // The mono deck is all basics, so the search always finds one.
        assert!(battle.events().iter().any(|event| matches!(
            event,
            BattleEvent::DeckSearched { team1: true, found, .. } if found.len() == 1
        )));
        assert_eq!(battle.state.deck1.hand.len(), hand_before);
        assert_eq!(battle.state.deck1.deck.len(), deck_before - 1);
    }

    #[test]
    fn deck_search_with_no_match_still_resolves() {
        let (mut battle, index) =
            battle_with_hand_card(34, Card::Trainer(prefab_decks::poke_ball()));
        battle.state.deck1.deck.clear();
        let hand_before = battle.state.deck1.hand.len();

        submit(&mut battle, PlayerAction::Trainer { hand_index: index });
        assert!(battle.events().iter().any(|event| matches!(
            event,
            BattleEvent::DeckSearched { team1: true, found, .. } if found.is_empty()
        )));
        // The trainer itself was discarded, nothing came back.
        assert_eq!(battle.state.deck1.hand.len(), hand_before - 1);
        assert!(battle.pending_input().is_none());
    }

    #[test]
    fn switch_swaps_with_a_chosen_bench_creature() {
        let (mut battle, index) = battle_with_hand_card(35, Card::Trainer(prefab_decks::switch()));

        submit(&mut battle, PlayerAction::Trainer { hand_index: index });
        assert_eq!(battle.available_actions(), vec![ActionKind::SelectActive]);
        submit(&mut battle, PlayerAction::SelectActive { bench_index: 1 });

        assert!(battle.pending_input().is_none());
        assert!(battle.own_view(true).active.is_some());
        // Still team 1's turn; a free switch is not a retreat.
        assert!(battle.team1_move());
        assert_eq!(battle.state.counters.retreats_used, 0);
    }

    #[test]
    fn switch_with_an_empty_bench_does_nothing() {
        let squirtle = mono_deck(prefab_decks::squirtle(), EnergyType::Water);
        let psyduck = mono_deck(prefab_decks::psyduck(), EnergyType::Water);
        let mut battle = started_battle(&squirtle, &psyduck, loose_rules(), 36, &[0], &[0]);
        battle.state.deck1.hand.push(Card::Trainer(prefab_decks::switch()));
        let index = battle.state.deck1.hand.len() - 1;

        submit(&mut battle, PlayerAction::Trainer { hand_index: index });
        assert!(battle.pending_input().is_none());
        assert!(battle.team1_move());
    }
}
