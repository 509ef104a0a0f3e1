use std::collections::HashMap;

use super::dependency::{strip_peer_suffix, DependencyRecord};

/// The key a record is bucketed under within its dependency name group.
///
/// Resolved records bucket by their stripped lock version. Unresolved
/// records bucket by their declared version under a dedicated variant, so
/// "unresolved" can never collide with a real lock version string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VersionKey {
    Locked(String),
    Unresolved(String),
}

impl VersionKey {
    pub fn for_record(record: &DependencyRecord) -> Self {
        match record.lock_version.as_deref() {
            Some(lock) => VersionKey::Locked(strip_peer_suffix(lock).to_string()),
            None => VersionKey::Unresolved(record.declared_version.clone()),
        }
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self, VersionKey::Unresolved(_))
    }
}

/// All records sharing one dependency name, partitioned into version buckets.
/// Bucket order is first-encountered.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DependencyGroup {
    pub name: String,
    pub buckets: Vec<Vec<DependencyRecord>>,
}

impl DependencyGroup {
    /// Distinct stripped lock versions among the bucket leaders.
    pub fn leader_lock_versions(&self) -> Vec<&str> {
        let mut versions: Vec<&str> = Vec::new();
        for bucket in &self.buckets {
            if let Some(version) = bucket.first().and_then(|r| r.stripped_lock_version()) {
                if !versions.contains(&version) {
                    versions.push(version);
                }
            }
        }
        versions
    }

    pub fn record_count(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }
}

/// Dependency records grouped by name, then by version bucket.
///
/// Name order and bucket order are both first-encountered, which makes the
/// first record of the first bucket the "base" display sample for a name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedDependencies {
    groups: Vec<DependencyGroup>,
    index: HashMap<String, usize>,
}

impl GroupedDependencies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts one record into its name group and version bucket, creating
    /// both as needed. Workspace-protocol links are never grouped.
    pub fn insert(&mut self, record: DependencyRecord) {
        if record.is_workspace_link() {
            return;
        }

        let key = VersionKey::for_record(&record);
        let group_idx = match self.index.get(&record.name) {
            Some(idx) => *idx,
            None => {
                let idx = self.groups.len();
                self.index.insert(record.name.clone(), idx);
                self.groups.push(DependencyGroup {
                    name: record.name.clone(),
                    buckets: Vec::new(),
                });
                idx
            }
        };

        let group = &mut self.groups[group_idx];
        let bucket = group
            .buckets
            .iter_mut()
            .find(|bucket| bucket.first().map(VersionKey::for_record).as_ref() == Some(&key));
        match bucket {
            Some(bucket) => bucket.push(record),
            None => group.buckets.push(vec![record]),
        }
    }

    pub fn get(&self, name: &str) -> Option<&DependencyGroup> {
        self.index.get(name).map(|idx| &self.groups[*idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = &DependencyGroup> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// A copy restricted to the given dependency names, preserving order.
    /// An empty name list means "everything".
    pub fn restricted_to(&self, names: &[String]) -> Self {
        if names.is_empty() {
            return self.clone();
        }
        let mut restricted = Self::new();
        for group in &self.groups {
            if names.iter().any(|n| n == &group.name) {
                let idx = restricted.groups.len();
                restricted.index.insert(group.name.clone(), idx);
                restricted.groups.push(group.clone());
            }
        }
        restricted
    }
}
