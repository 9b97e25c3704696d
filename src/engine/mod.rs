pub mod frequency;
pub mod matcher;
pub mod ranker;
pub mod search;

pub use frequency::FrequencyAnalyzer;
pub use matcher::{PatternHit, PatternMatcher};
pub use ranker::{FieldWeightPolicy, FuzzyRanker, ScoringPolicy, ScoringWeights};
pub use search::{SearchEngine, MIN_SEARCH_TEXT_LEN};
