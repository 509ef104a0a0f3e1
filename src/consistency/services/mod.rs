pub mod aggregator;
pub mod divergence;
pub mod grouping_engine;
pub mod suggestion;

pub use aggregator::DependencyAggregator;
pub use divergence::{DivergenceClassifier, DivergenceReport, DivergentDependency};
pub use grouping_engine::{VersionGroupingEngine, VersionGroupings};
pub use suggestion::{Suggestion, SuggestionEngine, SuggestionKind};
