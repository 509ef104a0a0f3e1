//! Include/exclude and manual version-lock policy.
//!
//! The two-scope rule tables (common + per-package) from configuration are
//! merged by the pure [`merge_scope`] function with documented precedence:
//! a per-package `"*"` wins outright, otherwise per-package names extend the
//! common list. The policy pass never mutates records in place; the manual
//! lock overlay returns new records.

use std::collections::HashMap;

use crate::config::{DependencyPolicyConfig, LockScopes, LockValue, PackageRule, RuleScopes};
use crate::consistency::domain::{DependencyRecord, ManualLock, PackageRef};

/// Rules effective for one package after merging the common and
/// per-package scopes.
#[derive(Debug, Clone, PartialEq)]
pub enum EffectiveRules {
    /// The per-package rule was `"*"`: applies to every dependency
    All,
    /// Merged common + per-package dependency name list
    Names(Vec<String>),
}

/// Merges the common scope with the per-package scope for one package.
/// The per-package entry is looked up by package name first, then by
/// workspace-relative name.
pub fn merge_scope(scopes: Option<&RuleScopes>, package: &PackageRef) -> EffectiveRules {
    let Some(scopes) = scopes else {
        return EffectiveRules::Names(Vec::new());
    };

    let package_rule = scopes
        .package
        .get(&package.name)
        .or_else(|| scopes.package.get(&package.relative_name));

    match package_rule {
        Some(rule) if rule.is_star() => EffectiveRules::All,
        Some(PackageRule::Names(names)) => {
            let mut merged = scopes.common.clone();
            merged.extend(names.iter().cloned());
            EffectiveRules::Names(merged)
        }
        // a non-star string value names a single dependency
        Some(PackageRule::All(single)) => {
            let mut merged = scopes.common.clone();
            merged.push(single.clone());
            EffectiveRules::Names(merged)
        }
        None => EffectiveRules::Names(scopes.common.clone()),
    }
}

/// The active dependency policy: include/exclude filtering plus manual
/// version-lock overlay, built from configuration and CLI package filters.
#[derive(Debug, Clone, Default)]
pub struct DependencyPolicy {
    include: Option<RuleScopes>,
    exclude: Option<RuleScopes>,
    lock: Option<LockScopes>,
}

impl DependencyPolicy {
    pub fn new(config: Option<DependencyPolicyConfig>) -> Self {
        let config = config.unwrap_or_default();
        Self {
            include: config.include,
            exclude: config.exclude,
            lock: config.lock,
        }
    }

    /// Merges CLI `--include-package` / `--exclude-package` arguments into
    /// the policy as per-package `"*"` rules.
    pub fn with_cli_package_filters(
        mut self,
        include_packages: &[String],
        exclude_packages: &[String],
    ) -> Self {
        if !include_packages.is_empty() {
            let scopes = self.include.get_or_insert_with(RuleScopes::default);
            for name in include_packages {
                scopes
                    .package
                    .insert(name.clone(), PackageRule::All("*".to_string()));
            }
        }
        if !exclude_packages.is_empty() {
            let scopes = self.exclude.get_or_insert_with(RuleScopes::default);
            for name in exclude_packages {
                scopes
                    .package
                    .insert(name.clone(), PackageRule::All("*".to_string()));
            }
        }
        self
    }

    /// A record passes the filter iff it is included and not excluded.
    pub fn passes(&self, record: &DependencyRecord) -> bool {
        self.is_included(record) && !self.is_excluded(record)
    }

    fn is_included(&self, record: &DependencyRecord) -> bool {
        match merge_scope(self.include.as_ref(), &record.package) {
            EffectiveRules::All => true,
            EffectiveRules::Names(names) => {
                let any_rule = self.include.as_ref().is_some_and(RuleScopes::has_rules);
                if any_rule {
                    names.iter().any(|n| n == &record.name)
                } else {
                    // no include rule at any scope defaults to "all pass"
                    true
                }
            }
        }
    }

    fn is_excluded(&self, record: &DependencyRecord) -> bool {
        match merge_scope(self.exclude.as_ref(), &record.package) {
            EffectiveRules::All => true,
            EffectiveRules::Names(names) => {
                let any_rule = self.exclude.as_ref().is_some_and(RuleScopes::has_rules);
                any_rule && names.iter().any(|n| n == &record.name)
            }
        }
    }

    /// Looks up the effective manual lock value for a record: common
    /// entries overridden by per-package entries (by package name, then by
    /// relative name) for the same dependency name.
    fn manual_lock_value(&self, record: &DependencyRecord) -> Option<&LockValue> {
        let lock = self.lock.as_ref()?;
        let package_table = lock
            .package
            .get(&record.package.name)
            .or_else(|| lock.package.get(&record.package.relative_name));
        package_table
            .and_then(|table| table.get(&record.name))
            .or_else(|| lock.common.get(&record.name))
    }

    /// Overlays the configured manual lock onto a record, returning a new
    /// record. Records without a matching override pass through unchanged.
    pub fn overlay_manual_lock(&self, record: DependencyRecord) -> DependencyRecord {
        let Some(value) = self.manual_lock_value(&record) else {
            return record;
        };
        let Some(version) = value.version() else {
            return record;
        };
        let peer_version = value.peer_version().unwrap_or(version);

        let diff_from_declared = version != record.declared_version;
        let diff_from_peer_declared = record
            .peer_declared_version
            .as_deref()
            .is_some_and(|declared| declared != peer_version);

        DependencyRecord {
            manual_lock: Some(ManualLock {
                version: Some(version.to_string()),
                peer_version: Some(peer_version.to_string()),
                diff_from_declared,
                diff_from_peer_declared,
            }),
            ..record
        }
    }

    /// Applies the manual-lock overlay across a whole aggregate list.
    pub fn overlay_manual_locks(&self, records: Vec<DependencyRecord>) -> Vec<DependencyRecord> {
        records
            .into_iter()
            .map(|record| self.overlay_manual_lock(record))
            .collect()
    }

    /// Groups a set of records by their owning package path, for callers
    /// that fan out one write per manifest.
    pub fn group_by_package<'a>(
        records: impl IntoIterator<Item = &'a DependencyRecord>,
    ) -> Vec<(PackageRef, Vec<&'a DependencyRecord>)> {
        let mut order: Vec<PackageRef> = Vec::new();
        let mut by_package: HashMap<String, Vec<&'a DependencyRecord>> = HashMap::new();
        for record in records {
            let key = record.package.relative_name.clone();
            if !by_package.contains_key(&key) {
                order.push(record.package.clone());
            }
            by_package.entry(key).or_default().push(record);
        }
        order
            .into_iter()
            .map(|package| {
                let records = by_package.remove(&package.relative_name).unwrap_or_default();
                (package, records)
            })
            .collect()
    }
}
