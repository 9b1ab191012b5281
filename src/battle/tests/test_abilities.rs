#[cfg(test)]
mod tests {
    use crate::battle::actions::{ActionKind, PlayerAction};
    use crate::battle::state::BattleEvent;
    use crate::battle::tests::common::{
        loose_rules, mono_deck, pass_turn, started_battle, submit, submit_rejected,
    };
    use crate::prefab_decks;
    use cards::EnergyType;
    use pretty_assertions::assert_eq;

    fn clefairy_battle(seed: u64) -> crate::battle::engine::Battle {
        let clefairy = mono_deck(prefab_decks::clefairy(), EnergyType::Colorless);
        let psyduck = mono_deck(prefab_decks::psyduck(), EnergyType::Water);
        started_battle(&clefairy, &psyduck, loose_rules(), seed, &[0, 1], &[0])
    }

    #[test]
    fn ability_heals_a_chosen_target() {
        let mut battle = clefairy_battle(40);
        battle
            .state
            .deck1
            .in_play_mut(0)
            .expect("active exists")
            .take_damage(30, EnergyType::Water, false);

        submit(
            &mut battle,
            PlayerAction::Ability {
                play_index: 0,
                ability_index: 0,
            },
        );
        assert!(battle.events().iter().any(|event| matches!(
            event,
            BattleEvent::AbilityUsed { team1: true, play_index: 0, .. }
        )));
        assert_eq!(battle.available_actions(), vec![ActionKind::Select]);

        submit(&mut battle, PlayerAction::Select { choice: 0 });
        assert_eq!(
            battle.state.deck1.in_play(0).expect("active exists").damage(),
            10
        );
    }

    #[test]
    fn each_slot_has_its_own_once_per_turn_budget() {
        let mut battle = clefairy_battle(41);

        submit(
            &mut battle,
            PlayerAction::Ability {
                play_index: 0,
                ability_index: 0,
            },
        );
        submit(&mut battle, PlayerAction::Select { choice: 0 });

        // The active already moonlighted this turn.
        submit_rejected(
            &mut battle,
            PlayerAction::Ability {
                play_index: 0,
                ability_index: 0,
            },
        );

        // The benched copy has not.
        submit(
            &mut battle,
            PlayerAction::Ability {
                play_index: 1,
                ability_index: 0,
            },
        );
        submit(&mut battle, PlayerAction::Select { choice: 1 });
    }

    #[test]
    fn ability_budget_resets_with_the_turn() {
        let mut battle = clefairy_battle(42);

        submit(
            &mut battle,
            PlayerAction::Ability {
                play_index: 0,
                ability_index: 0,
            },
        );
        submit(&mut battle, PlayerAction::Select { choice: 0 });
        submit_rejected(
            &mut battle,
            PlayerAction::Ability {
                play_index: 0,
                ability_index: 0,
            },
        );

        pass_turn(&mut battle);
        pass_turn(&mut battle);

        submit(
            &mut battle,
            PlayerAction::Ability {
                play_index: 0,
                ability_index: 0,
            },
        );
    }

    #[test]
    fn creatures_without_abilities_cannot_activate_any() {
        let squirtle = mono_deck(prefab_decks::squirtle(), EnergyType::Water);
        let psyduck = mono_deck(prefab_decks::psyduck(), EnergyType::Water);
        let mut battle = started_battle(&squirtle, &psyduck, loose_rules(), 43, &[0], &[0]);

        assert!(!battle.available_actions().contains(&ActionKind::Ability));
        submit_rejected(
            &mut battle,
            PlayerAction::Ability {
                play_index: 0,
                ability_index: 0,
            },
        );
    }
}
