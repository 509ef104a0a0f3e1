//! Console tree renderer for grouped dependency versions.

use std::fmt::Write as _;

use owo_colors::OwoColorize;

use crate::consistency::domain::{DependencyGroup, DependencyRecord, GroupedDependencies};

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE: &str = "│   ";
const INDENT: &str = "    ";

/// Renders dependency version groups as an indented tree, one group per
/// dependency name, one branch per version bucket, one leaf per package.
pub struct TreeRenderer {
    use_color: bool,
}

impl TreeRenderer {
    pub fn new() -> Self {
        Self { use_color: true }
    }

    /// Plain output, for tests and non-tty consumers.
    pub fn plain() -> Self {
        Self { use_color: false }
    }

    pub fn render(&self, grouped: &GroupedDependencies) -> String {
        let mut out = String::new();
        for group in grouped.iter() {
            out.push_str(&self.render_group(group));
        }
        out
    }

    /// Renders pre-classified divergent buckets under one dependency name.
    pub fn render_buckets(&self, name: &str, buckets: &[Vec<DependencyRecord>]) -> String {
        let group = DependencyGroup {
            name: name.to_string(),
            buckets: buckets.to_vec(),
        };
        self.render_group(&group)
    }

    pub fn render_group(&self, group: &DependencyGroup) -> String {
        let mut out = String::new();
        let name = if self.use_color {
            group.name.bold().to_string()
        } else {
            group.name.clone()
        };
        let _ = writeln!(out, "{}", name);

        let bucket_count = group.buckets.len();
        for (bucket_idx, bucket) in group.buckets.iter().enumerate() {
            let last_bucket = bucket_idx + 1 == bucket_count;
            let branch = if last_bucket { LAST_BRANCH } else { BRANCH };
            let _ = writeln!(out, "{}{}", branch, self.bucket_label(bucket));

            let child_indent = if last_bucket { INDENT } else { PIPE };
            for (record_idx, record) in bucket.iter().enumerate() {
                let last_record = record_idx + 1 == bucket.len();
                let leaf = if last_record { LAST_BRANCH } else { BRANCH };
                let _ = writeln!(out, "{}{}{}", child_indent, leaf, self.record_label(record));
            }
        }
        out
    }

    fn bucket_label(&self, bucket: &[DependencyRecord]) -> String {
        match bucket.first().and_then(|r| r.stripped_lock_version()) {
            Some(version) => version.to_string(),
            None if self.use_color => "lock version unknown".yellow().to_string(),
            None => "lock version unknown".to_string(),
        }
    }

    fn record_label(&self, record: &DependencyRecord) -> String {
        let mut label = format!(
            "{} ({})",
            record.package.display_location(),
            record.declared_version
        );
        if let Some(dev) = &record.dev_declared_version {
            let _ = write!(label, " dev: {}", dev);
        }
        if let Some(peer) = &record.peer_declared_version {
            let _ = write!(label, " peer: {}", peer);
        }
        if let Some(manual) = record.manual_lock.as_ref().filter(|m| m.has_diff()) {
            if let Some(version) = &manual.version {
                let note = format!("locked to {}", version);
                if self.use_color {
                    let _ = write!(label, " {}", note.yellow());
                } else {
                    let _ = write!(label, " {}", note);
                }
            }
        }
        label
    }
}

impl Default for TreeRenderer {
    fn default() -> Self {
        Self::new()
    }
}
