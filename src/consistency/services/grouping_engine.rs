//! Groups the global dependency list by name and resolved version.

use crate::consistency::domain::{DependencyRecord, GroupedDependencies};
use crate::consistency::policies::DependencyPolicy;

/// Both groupings produced from one traversal of the aggregate list.
#[derive(Debug, Clone, Default)]
pub struct VersionGroupings {
    /// Every record (workspace links aside)
    pub all: GroupedDependencies,
    /// Only records passing the active policy filter
    pub filtered: GroupedDependencies,
}

/// VersionGroupingEngine - builds the unfiltered and policy-filtered
/// groupings in a single pass so neither can drift from the other.
pub struct VersionGroupingEngine;

impl VersionGroupingEngine {
    pub fn group(records: &[DependencyRecord], policy: &DependencyPolicy) -> VersionGroupings {
        let mut groupings = VersionGroupings::default();
        for record in records {
            groupings.all.insert(record.clone());
            if policy.passes(record) {
                groupings.filtered.insert(record.clone());
            }
        }
        groupings
    }
}
