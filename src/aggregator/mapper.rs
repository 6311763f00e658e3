//! Cross-source name mapping.
//!
//! Builds the canonical-name index over the spellings seen in each source
//! and provides best-effort resolution for callers that only know one
//! source's spelling. All lookups are total: a missing name yields an
//! empty result, never an error.

use super::standardizer::standardize_name;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Which source a name variant was observed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameSource {
    Insights,
    Sales,
}

/// One observed spelling of a creative name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NameVariant {
    /// The spelling as it appears in the source records
    pub original_name: String,

    /// Canonical form shared by every variant in the bucket
    pub standardized_name: String,

    /// Source the spelling was observed in
    pub source: NameSource,
}

/// Build the canonical-name index over both sources
///
/// **Public** - main entry point for name reconciliation
///
/// Empty and whitespace-only names are skipped entirely. Within a bucket,
/// insight variants come before sale variants, each in first-seen order.
/// Repeated spellings stay repeated; callers reconstruct the full record
/// lists from the distinct spellings, so nothing is deduplicated here.
pub fn build_name_mapping(
    insight_names: &[&str],
    sale_names: &[&str],
) -> HashMap<String, Vec<NameVariant>> {
    let mut mapping: HashMap<String, Vec<NameVariant>> = HashMap::new();

    insert_variants(&mut mapping, insight_names, NameSource::Insights);
    insert_variants(&mut mapping, sale_names, NameSource::Sales);

    debug!(
        "Built name mapping: {} canonical names from {} insight and {} sale spellings",
        mapping.len(),
        insight_names.len(),
        sale_names.len()
    );

    mapping
}

/// Append one source's spellings to the mapping
///
/// **Private** - internal helper for build_name_mapping
fn insert_variants(
    mapping: &mut HashMap<String, Vec<NameVariant>>,
    names: &[&str],
    source: NameSource,
) {
    for name in names {
        if name.trim().is_empty() {
            continue;
        }

        let standardized = standardize_name(name);
        mapping.entry(standardized.clone()).or_default().push(NameVariant {
            original_name: (*name).to_string(),
            standardized_name: standardized,
            source,
        });
    }
}

/// Find the best matching candidate for a target name
///
/// **Public** - used when only one source's spelling is at hand
///
/// Tries an exact standardized match first, then partial containment of
/// standardized forms in either direction. Candidate order breaks ties:
/// the first match wins, there is no scoring. Falls back to the target
/// itself when nothing matches.
pub fn find_best_match(target_name: &str, candidates: &[&str]) -> String {
    let standardized_target = standardize_name(target_name);

    let exact = candidates
        .iter()
        .find(|candidate| standardize_name(candidate) == standardized_target);

    if let Some(candidate) = exact {
        return (*candidate).to_string();
    }

    let partial = candidates.iter().find(|candidate| {
        let standardized = standardize_name(candidate);
        standardized_target.contains(&standardized) || standardized.contains(&standardized_target)
    });

    match partial {
        Some(candidate) => (*candidate).to_string(),
        None => target_name.to_string(),
    }
}

/// Look up the records bucketed under a name, tolerating spelling drift
///
/// **Public** - used by the aggregator to collect matched records
///
/// Exact key match first; failing that, scans for a key with the same
/// standardized form. Returns an empty slice when nothing matches.
pub fn records_for_name<'a, R>(
    name: &str,
    records_by_name: &'a HashMap<String, Vec<R>>,
) -> &'a [R] {
    if let Some(records) = records_by_name.get(name) {
        return records;
    }

    let standardized = standardize_name(name);
    let matching_key = records_by_name
        .keys()
        .find(|key| standardize_name(key) == standardized);

    match matching_key {
        Some(key) => &records_by_name[key],
        None => &[],
    }
}
