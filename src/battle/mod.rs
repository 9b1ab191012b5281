pub mod actions;
pub mod active;
pub mod deck;
pub mod effects;
pub mod engine;
pub mod rng;
pub mod state;

#[cfg(test)]
mod tests;
