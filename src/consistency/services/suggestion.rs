//! Computes convergence suggestions for divergent dependencies.

use std::collections::HashMap;

use semver::{Version, VersionReq};

use crate::consistency::domain::{strip_peer_suffix, DependencyKind, DependencyRecord};
use crate::consistency::services::divergence::DivergentDependency;

/// Which heading a suggestion line renders under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionKind {
    Normal,
    /// Peer-dependency fallout: the buckets collide on one lock version but
    /// their lockfile-reported peer children disagree
    DifferentVersionPeer,
    /// Transitive peer dependencies resolved back to workspace records
    TransitivePeer,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub kind: SuggestionKind,
    pub dependency_name: String,
    pub message: String,
}

/// SuggestionEngine - proposes convergence targets for one divergent
/// dependency using version-range semantics.
pub struct SuggestionEngine;

impl SuggestionEngine {
    /// Suggestions for one name's bucket list (post-filter). With more than
    /// one distinct lock version across bucket leaders, the proposal is the
    /// minimum or maximum satisfying version under the any-version range.
    /// When the buckets collide on one lock version but the classifier still
    /// flagged the name (a manual-lock diff), the same computation recurses
    /// over peer children and transitive peer dependencies.
    pub fn suggest(
        divergent: &DivergentDependency,
        all_records: &[DependencyRecord],
    ) -> Vec<Suggestion> {
        let Some(_base) = divergent.buckets.first().and_then(|bucket| bucket.first()) else {
            return Vec::new();
        };

        let mut leader_versions: Vec<&str> = Vec::new();
        for bucket in &divergent.buckets {
            if let Some(version) = bucket.first().and_then(|r| r.stripped_lock_version()) {
                if !leader_versions.contains(&version) {
                    leader_versions.push(version);
                }
            }
        }

        if leader_versions.len() > 1 {
            return match min_max_satisfying(&leader_versions) {
                Some((min, max)) => vec![Suggestion {
                    kind: SuggestionKind::Normal,
                    dependency_name: divergent.name.clone(),
                    message: lock_message(&divergent.name, &min, &max),
                }],
                None => Vec::new(),
            };
        }

        if !divergent.any_manual_diff {
            return Vec::new();
        }

        let mut suggestions = Vec::new();
        suggestions.extend(Self::peer_child_suggestions(divergent));
        suggestions.extend(Self::transitive_peer_suggestions(divergent, all_records));
        suggestions
    }

    /// Different-version peer dependencies: peer-kind children across the
    /// collapsed bucket set.
    fn peer_child_suggestions(divergent: &DivergentDependency) -> Vec<Suggestion> {
        let mut versions_by_name: HashMap<&str, Vec<&str>> = HashMap::new();
        let mut name_order: Vec<&str> = Vec::new();

        for record in divergent.buckets.iter().flatten() {
            for child in &record.children {
                if child.kind != DependencyKind::Peer {
                    continue;
                }
                if !versions_by_name.contains_key(child.name.as_str()) {
                    name_order.push(child.name.as_str());
                }
                let versions = versions_by_name.entry(child.name.as_str()).or_default();
                if !versions.contains(&child.version.as_str()) {
                    versions.push(child.version.as_str());
                }
            }
        }

        name_order
            .into_iter()
            .filter_map(|name| {
                let versions = &versions_by_name[name];
                if versions.len() < 2 {
                    return None;
                }
                let (min, max) = min_max_satisfying(versions)?;
                Some(Suggestion {
                    kind: SuggestionKind::DifferentVersionPeer,
                    dependency_name: name.to_string(),
                    message: lock_message(name, &min, &max),
                })
            })
            .collect()
    }

    /// Transitive peer dependencies, resolved back to their own records in
    /// the global aggregate list.
    fn transitive_peer_suggestions(
        divergent: &DivergentDependency,
        all_records: &[DependencyRecord],
    ) -> Vec<Suggestion> {
        let mut names: Vec<&str> = Vec::new();
        for record in divergent.buckets.iter().flatten() {
            for name in &record.transitive_peer_names {
                if !names.contains(&name.as_str()) {
                    names.push(name.as_str());
                }
            }
        }

        names
            .into_iter()
            .filter_map(|name| {
                let mut versions: Vec<&str> = Vec::new();
                for record in all_records.iter().filter(|r| r.name == name) {
                    if let Some(version) = record.stripped_lock_version() {
                        if !versions.contains(&version) {
                            versions.push(version);
                        }
                    }
                }
                if versions.len() < 2 {
                    return None;
                }
                let (min, max) = min_max_satisfying(&versions)?;
                Some(Suggestion {
                    kind: SuggestionKind::TransitivePeer,
                    dependency_name: name.to_string(),
                    message: lock_message(name, &min, &max),
                })
            })
            .collect()
    }
}

fn lock_message(name: &str, min: &str, max: &str) -> String {
    format!("lock \"{}\" to \"{}\" or \"{}\"", name, min, max)
}

/// The minimum and maximum satisfying version under the any-version range.
/// Version strings semver cannot parse fall back to lexicographic order.
fn min_max_satisfying(versions: &[&str]) -> Option<(String, String)> {
    if versions.is_empty() {
        return None;
    }

    let any_version = VersionReq::STAR;
    let parsed: Vec<(Version, &str)> = versions
        .iter()
        .filter_map(|raw| Version::parse(raw).ok().map(|v| (v, *raw)))
        .filter(|(version, _)| any_version.matches(version))
        .collect();

    if parsed.len() == versions.len() {
        let min = parsed.iter().min_by(|a, b| a.0.cmp(&b.0))?.1;
        let max = parsed.iter().max_by(|a, b| a.0.cmp(&b.0))?.1;
        Some((min.to_string(), max.to_string()))
    } else {
        let min = versions.iter().min()?;
        let max = versions.iter().max()?;
        Some(((*min).to_string(), (*max).to_string()))
    }
}
