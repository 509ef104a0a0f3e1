pub mod dependency_policy;

pub use dependency_policy::{merge_scope, DependencyPolicy, EffectiveRules};
