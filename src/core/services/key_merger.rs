use crate::core::models::authorized_keys::{AuthorizedKeys, PublicKey};

/// Result of merging a fetched key list into a key store.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    /// The store with new keys appended.
    pub store: AuthorizedKeys,
    /// Key lines that were appended, trimmed, in input order.
    pub added: Vec<String>,
    /// Valid key lines that were already in the store.
    pub already_present: usize,
    /// Non-blank, non-comment lines whose first token is not an accepted key type.
    pub rejected: usize,
}

impl MergeOutcome {
    pub fn any_added(&self) -> bool {
        !self.added.is_empty()
    }
}

/// Merges newly fetched public keys into an existing `authorized_keys`.
pub struct KeyMerger;

impl KeyMerger {
    /// Append every valid key line of `fetched` that `store` does not hold yet.
    ///
    /// - Lines are trimmed; blank and `#` lines are skipped silently
    /// - Lines whose first token is not an accepted key type are counted as rejected
    /// - Duplicate detection is an exact match against trimmed store lines,
    ///   including keys appended earlier in the same merge
    ///
    /// Existing lines are never reordered or rewritten.
    pub fn merge(&self, fetched: &str, store: AuthorizedKeys) -> MergeOutcome {
        let mut store = store;
        let mut added = Vec::new();
        let mut already_present = 0;
        let mut rejected = 0;

        for raw in fetched.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some(key) = PublicKey::parse(line) else {
                rejected += 1;
                continue;
            };

            if store.contains_line(line) {
                already_present += 1;
                continue;
            }

            added.push(line.to_string());
            store.push(key);
        }

        MergeOutcome {
            store,
            added,
            already_present,
            rejected,
        }
    }
}
