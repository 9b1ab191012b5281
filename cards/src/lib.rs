// Pocket TCG Cards - Shared content definitions
// This crate contains the card vocabulary consumed by the battle engine:
// energy and creature types, the counted multiset used for energy bookkeeping,
// and the immutable card/deck/rules value objects supplied by content modules.

pub use card_data::*;
pub use collection::*;
pub use pokemon_types::*;

pub mod card_data;
pub mod collection;
pub mod pokemon_types;
