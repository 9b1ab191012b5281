//! Pocket TCG Battle Engine
//!
//! A two-player, turn-based trading-card battle simulation: play areas,
//! energy bookkeeping, evolutions, attacks and a priority-ordered pending
//! action queue, driven through a single `Battle` facade. The engine is a
//! pure, seedable, single-threaded simulation over in-memory state.

// --- MODULE DECLARATIONS ---
// This declares the module hierarchy for the crate.
pub mod battle;
pub mod errors;
pub mod prefab_decks;

// --- PUBLIC API RE-EXPORTS ---
// This section defines the public-facing API of the `pocket-tcg` crate,
// making it easy for users to import the most important types directly.

// --- From the `cards` crate ---
// Re-export the content vocabulary the engine consumes.
pub use cards::{
    // Supporting Types & Enums
    Ability,
    AbilityTrigger,
    Attack,
    // Core Data Structs
    Card,
    CardEffect,
    Collection,
    Condition,
    DamageFormula,
    Deck,
    EnergyContainer,
    // Core Enums
    EnergyType,
    InsufficientItems,
    PokemonCard,
    PokemonType,
    Rules,
    SearchFilter,
    TrainerCard,
    TrainerKind,
};

// --- From this crate's modules (`src/`) ---

// The battle facade and its state machine.
pub use battle::engine::Battle;
pub use battle::state::{BattleEvent, BattleState, EventBus, Priority};

// Core runtime types for a battle.
pub use battle::actions::{ActionKind, PlayerAction};
pub use battle::active::ActivePokemon;
pub use battle::deck::{DeckSetup, OpponentDeckView, OwnDeckView};
pub use battle::effects::{Effect, InputSlot};
pub use battle::rng::BattleRng;

// Crate-specific error and result types.
pub use errors::{BattleResult, DeckError, EngineError};
