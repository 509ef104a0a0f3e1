//! Decides which grouped dependencies count as version-divergent.

use crate::consistency::domain::{DependencyRecord, GroupedDependencies};

/// One dependency name the classifier flagged as divergent.
#[derive(Debug, Clone, PartialEq)]
pub struct DivergentDependency {
    pub name: String,
    /// Non-empty version buckets that still carry signal: records whose
    /// manual lock agrees with the manifest are pruned out first.
    pub buckets: Vec<Vec<DependencyRecord>>,
    /// Some record of this name has a manual lock that disagrees with the
    /// raw manifest value.
    pub any_manual_diff: bool,
}

/// The classifier's output over the policy-filtered grouping.
#[derive(Debug, Clone, Default)]
pub struct DivergenceReport {
    pub divergent: Vec<DivergentDependency>,
    /// Records whose convergence target is already determined by a manual
    /// lock; applying them needs no human version choice.
    pub auto_fixable: Vec<DependencyRecord>,
}

impl DivergenceReport {
    pub fn is_consistent(&self) -> bool {
        self.divergent.is_empty()
    }

    pub fn divergent_names(&self) -> Vec<String> {
        self.divergent.iter().map(|d| d.name.clone()).collect()
    }
}

/// DivergenceClassifier - operates on the filtered grouping.
///
/// A dependency is divergent iff more than one non-empty bucket remains
/// after pruning signal-free manual-lock records, or exactly one bucket
/// remains but a manual lock disagrees with the manifest somewhere.
/// Divergence is a finding, not an error.
pub struct DivergenceClassifier;

impl DivergenceClassifier {
    pub fn classify(filtered: &GroupedDependencies) -> DivergenceReport {
        let mut report = DivergenceReport::default();

        for group in filtered.iter() {
            let mut any_manual_diff = false;
            let mut pruned_buckets: Vec<Vec<DependencyRecord>> = Vec::new();

            for bucket in &group.buckets {
                let mut pruned = Vec::new();
                for record in bucket {
                    match &record.manual_lock {
                        // a manual lock that agrees with reality contributes
                        // no signal and is dropped from consideration
                        Some(manual) if !manual.has_diff() => continue,
                        Some(_) => {
                            any_manual_diff = true;
                            pruned.push(record.clone());
                        }
                        None => pruned.push(record.clone()),
                    }
                }
                if !pruned.is_empty() {
                    pruned_buckets.push(pruned);
                }
            }

            let divergent = pruned_buckets.len() > 1
                || (pruned_buckets.len() == 1 && any_manual_diff);
            if !divergent {
                continue;
            }

            for bucket in &pruned_buckets {
                for record in bucket {
                    if record
                        .manual_lock
                        .as_ref()
                        .is_some_and(|manual| manual.has_diff())
                    {
                        report.auto_fixable.push(record.clone());
                    }
                }
            }

            report.divergent.push(DivergentDependency {
                name: group.name.clone(),
                buckets: pruned_buckets,
                any_manual_diff,
            });
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consistency::domain::{DependencyKind, ManualLock, PackageRef};
    use std::path::PathBuf;

    fn record(name: &str, declared: &str, lock: Option<&str>, pkg: &str) -> DependencyRecord {
        let mut record = DependencyRecord::new(
            name,
            declared,
            DependencyKind::Normal,
            PackageRef {
                path: PathBuf::from(format!("/ws/{}/package.json", pkg)),
                name: pkg.to_string(),
                relative_name: pkg.to_string(),
                is_root: pkg == "root",
            },
        );
        record.lock_version = lock.map(String::from);
        record
    }

    fn with_manual_lock(mut record: DependencyRecord, version: &str, diff: bool) -> DependencyRecord {
        record.manual_lock = Some(ManualLock {
            version: Some(version.to_string()),
            peer_version: Some(version.to_string()),
            diff_from_declared: diff,
            diff_from_peer_declared: false,
        });
        record
    }

    fn grouped(records: Vec<DependencyRecord>) -> GroupedDependencies {
        let mut grouped = GroupedDependencies::new();
        for record in records {
            grouped.insert(record);
        }
        grouped
    }

    #[test]
    fn test_single_lock_version_not_divergent() {
        // Scenario A: both packages resolve to 4.17.21
        let grouped = grouped(vec![
            record("lodash", "^4.17.0", Some("4.17.21"), "root"),
            record("lodash", "^4.16.0", Some("4.17.21"), "pkg-a"),
        ]);
        let report = DivergenceClassifier::classify(&grouped);
        assert!(report.is_consistent());
        assert!(report.auto_fixable.is_empty());
    }

    #[test]
    fn test_two_lock_versions_divergent() {
        // Scenario B: pkg-a resolves to 4.16.6
        let grouped = grouped(vec![
            record("lodash", "^4.17.0", Some("4.17.21"), "root"),
            record("lodash", "^4.16.0", Some("4.16.6"), "pkg-a"),
        ]);
        let report = DivergenceClassifier::classify(&grouped);
        assert_eq!(report.divergent_names(), vec!["lodash"]);
        assert_eq!(report.divergent[0].buckets.len(), 2);
        assert!(!report.divergent[0].any_manual_diff);
    }

    #[test]
    fn test_manual_diff_with_single_bucket_is_divergent() {
        // Scenario C: one lock-version bucket, but the manual lock disagrees
        // with pkg-a's declared range
        let grouped = grouped(vec![
            record("lodash", "^4.17.0", Some("4.17.21"), "root"),
            with_manual_lock(
                record("lodash", "^4.16.0", Some("4.17.21"), "pkg-a"),
                "4.17.21",
                true,
            ),
        ]);
        let report = DivergenceClassifier::classify(&grouped);
        assert_eq!(report.divergent_names(), vec!["lodash"]);
        assert!(report.divergent[0].any_manual_diff);

        assert_eq!(report.auto_fixable.len(), 1);
        assert_eq!(report.auto_fixable[0].package.name, "pkg-a");
        assert_eq!(
            report.auto_fixable[0]
                .manual_lock
                .as_ref()
                .unwrap()
                .version
                .as_deref(),
            Some("4.17.21")
        );
    }

    #[test]
    fn test_agreeing_manual_lock_prunes_record() {
        // the manual lock matches the declared range, so that record carries
        // no signal; the remaining single bucket is consistent
        let grouped = grouped(vec![
            record("lodash", "^4.17.0", Some("4.17.21"), "root"),
            with_manual_lock(
                record("lodash", "^4.17.0", Some("4.16.6"), "pkg-a"),
                "^4.17.0",
                false,
            ),
        ]);
        let report = DivergenceClassifier::classify(&grouped);
        assert!(report.is_consistent());
    }

    #[test]
    fn test_unresolved_and_resolved_split_is_divergent() {
        let grouped = grouped(vec![
            record("lodash", "^4.17.0", Some("4.17.21"), "root"),
            record("lodash", "^4.17.0", None, "pkg-a"),
        ]);
        let report = DivergenceClassifier::classify(&grouped);
        assert_eq!(report.divergent_names(), vec!["lodash"]);
    }

    #[test]
    fn test_multiple_names_classified_independently() {
        let grouped = grouped(vec![
            record("lodash", "^4.17.0", Some("4.17.21"), "root"),
            record("lodash", "^4.16.0", Some("4.16.6"), "pkg-a"),
            record("react", "^18.0.0", Some("18.2.0"), "root"),
            record("react", "^18.0.0", Some("18.2.0"), "pkg-a"),
        ]);
        let report = DivergenceClassifier::classify(&grouped);
        assert_eq!(report.divergent_names(), vec!["lodash"]);
    }
}
