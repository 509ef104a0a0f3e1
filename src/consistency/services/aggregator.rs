//! Flattens per-package dependency records into one global list.

use std::collections::HashMap;

use crate::consistency::domain::{DependencyKind, DependencyRecord, Package};

/// DependencyAggregator - builds the unified global dependency list.
///
/// For each package: peer-kind records become a version lookup that is
/// cross-referenced onto every emitted record; dev-kind records that
/// duplicate a normal-kind declaration with an equal declared version are
/// merged into the normal record's `dev_declared_version` instead of being
/// emitted twice. Packages contribute in scan order, which is the tie-break
/// later grouping uses for its "base" display sample.
pub struct DependencyAggregator;

impl DependencyAggregator {
    pub fn aggregate(packages: &[Package]) -> Vec<DependencyRecord> {
        let mut all = Vec::new();
        for package in packages {
            all.extend(Self::aggregate_package(package));
        }
        all
    }

    fn aggregate_package(package: &Package) -> Vec<DependencyRecord> {
        let peer_versions: HashMap<&str, &str> = package
            .dependencies
            .iter()
            .filter(|record| record.kind == DependencyKind::Peer)
            .map(|record| (record.name.as_str(), record.declared_version.as_str()))
            .collect();

        // normal-kind records keep priority: dev duplicates merge into them
        let mut emitted: Vec<DependencyRecord> = package
            .dependencies
            .iter()
            .filter(|record| record.kind == DependencyKind::Normal)
            .cloned()
            .collect();

        for dev_record in package
            .dependencies
            .iter()
            .filter(|record| record.kind == DependencyKind::Dev)
        {
            let duplicate = emitted.iter_mut().find(|existing| {
                existing.kind == DependencyKind::Normal
                    && existing.name == dev_record.name
                    && existing.declared_version == dev_record.declared_version
            });
            match duplicate {
                Some(existing) => {
                    existing.dev_declared_version = Some(dev_record.declared_version.clone());
                }
                None => emitted.push(dev_record.clone()),
            }
        }

        for record in &mut emitted {
            if let Some(peer_version) = peer_versions.get(record.name.as_str()) {
                record.peer_declared_version = Some((*peer_version).to_string());
            }
        }

        emitted
    }
}
