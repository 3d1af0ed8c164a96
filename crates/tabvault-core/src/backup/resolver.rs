//! Table resolution for a backup run
//!
//! Computes which tables participate, tolerating case differences between
//! configured names and live tables. Never fails: unknown names are either
//! skipped with a warning (operator subsets) or kept literally (configured
//! special tables, which then fail per-table at fetch time).

use std::collections::BTreeMap;

/// Outcome of table resolution.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    /// Tables to back up, live canonical casing preferred.
    pub tables: Vec<String>,
    /// Operator-requested names that matched no live table.
    pub skipped: Vec<String>,
}

/// Resolve the effective table set for one run.
///
/// With an explicit `subset` (operator override) only case-insensitive
/// matches against live tables are kept; everything else lands in
/// `skipped`. Without a subset, the live tables are unioned with the
/// configured `special` names, case-insensitively deduplicated with the
/// live canonical casing winning.
pub fn resolve_tables(
    live: &BTreeMap<String, u64>,
    subset: Option<&[String]>,
    special: &[String],
) -> Resolution {
    if let Some(subset) = subset {
        let mut tables = Vec::new();
        let mut skipped = Vec::new();
        for wanted in subset {
            let lowered = wanted.to_lowercase();
            match live.keys().find(|name| name.to_lowercase() == lowered) {
                Some(name) => {
                    if !tables.contains(name) {
                        tables.push(name.clone());
                    }
                }
                None => skipped.push(wanted.clone()),
            }
        }
        return Resolution { tables, skipped };
    }

    let mut tables: Vec<String> = live.keys().cloned().collect();
    for name in special {
        let lowered = name.to_lowercase();
        if !tables.iter().any(|t| t.to_lowercase() == lowered) {
            // best effort: kept verbatim, may fail at fetch time
            tables.push(name.clone());
        }
    }
    Resolution {
        tables,
        skipped: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn live(names: &[&str]) -> BTreeMap<String, u64> {
        names.iter().map(|n| (n.to_string(), 1)).collect()
    }

    fn owned(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_special_dedup_prefers_canonical_casing() {
        let resolution = resolve_tables(&live(&["Channel", "User"]), None, &owned(&["user"]));
        assert_eq!(resolution.tables, ["Channel", "User"]);
        assert!(resolution.skipped.is_empty());
    }

    #[test]
    fn test_unknown_special_kept_literally() {
        let resolution = resolve_tables(&live(&["user"]), None, &owned(&["Session"]));
        assert_eq!(resolution.tables, ["user", "Session"]);
    }

    #[test]
    fn test_subset_filters_case_insensitively() {
        let resolution = resolve_tables(
            &live(&["Channel", "User"]),
            Some(&owned(&["USER", "ghost"])),
            &owned(&["ignored"]),
        );
        assert_eq!(resolution.tables, ["User"]);
        assert_eq!(resolution.skipped, ["ghost"]);
    }

    #[test]
    fn test_subset_deduplicates() {
        let resolution =
            resolve_tables(&live(&["User"]), Some(&owned(&["user", "USER"])), &[]);
        assert_eq!(resolution.tables, ["User"]);
    }

    #[test]
    fn test_empty_everything_resolves_empty() {
        let resolution = resolve_tables(&BTreeMap::new(), None, &[]);
        assert!(resolution.tables.is_empty());
        assert!(resolution.skipped.is_empty());
    }
}
