use std::fmt;

pub use cards::InsufficientItems;

/// Main error type for the Pocket TCG battle engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Error related to deck construction or validation
    Deck(DeckError),
    /// Error related to energy bookkeeping
    Energy(InsufficientItems),
}

/// Errors related to deck validation at battle creation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeckError {
    /// The deck does not have the configured number of cards
    WrongSize { expected: usize, actual: usize },
    /// A card name appears more often than the duplicate limit allows
    TooManyDuplicates(String),
    /// The rules require at least one basic creature card
    MissingBasic,
    /// The deck declares no energy types for its generator
    NoEnergyTypes,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Deck(err) => write!(f, "Deck error: {}", err),
            EngineError::Energy(err) => write!(f, "Energy error: {}", err),
        }
    }
}

impl fmt::Display for DeckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeckError::WrongSize { expected, actual } => {
                write!(f, "Deck has {} cards, rules require {}", actual, expected)
            }
            DeckError::TooManyDuplicates(name) => {
                write!(f, "Too many copies of card: {}", name)
            }
            DeckError::MissingBasic => write!(f, "Deck contains no basic creature"),
            DeckError::NoEnergyTypes => write!(f, "Deck declares no energy types"),
        }
    }
}

impl std::error::Error for EngineError {}
impl std::error::Error for DeckError {}

impl From<DeckError> for EngineError {
    fn from(err: DeckError) -> Self {
        EngineError::Deck(err)
    }
}

impl From<InsufficientItems> for EngineError {
    fn from(err: InsufficientItems) -> Self {
        EngineError::Energy(err)
    }
}

/// Type alias for Results using EngineError
pub type BattleResult<T> = Result<T, EngineError>;

/// Validates a deck against the rules, reporting the first violation found.
/// `Rules::is_valid_deck` gives the same answer as a plain boolean.
pub fn validate_deck(rules: &cards::Rules, deck: &cards::Deck) -> Result<(), DeckError> {
    use std::collections::HashMap;

    if deck.cards.len() != rules.deck_size {
        return Err(DeckError::WrongSize {
            expected: rules.deck_size,
            actual: deck.cards.len(),
        });
    }
    if deck.energies.is_empty() {
        return Err(DeckError::NoEnergyTypes);
    }
    let mut name_counts: HashMap<&str, usize> = HashMap::new();
    for card in &deck.cards {
        let count = name_counts.entry(card.name()).or_insert(0);
        *count += 1;
        if *count > rules.duplicate_limit {
            return Err(DeckError::TooManyDuplicates(card.name().to_string()));
        }
    }
    if rules.basic_required && !deck.cards.iter().any(|card| card.is_basic()) {
        return Err(DeckError::MissingBasic);
    }
    Ok(())
}
