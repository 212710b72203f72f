//! Key identity strategies.
use std::sync::Arc;

/// Key equality and hashing strategy for a collection.
///
/// The collection only ever uses the policy's answers. A policy that violates
/// the usual equivalence laws (non-transitive equality, constant hash) still
/// yields deterministic, if collapsed, behavior.
///
/// The null key is handled by the collection itself and never reaches a
/// policy.
pub trait KeyPolicy: std::fmt::Debug + Send + Sync {
    /// Whether two keys belong to the same equivalence class.
    fn eq(&self, a: &str, b: &str) -> bool;

    /// Hash of a key, consistent with [`eq`][KeyPolicy::eq] for lawful
    /// policies.
    fn hash(&self, key: &str) -> u64;
}

/// Default ASCII-case-insensitive ordinal policy.
#[derive(Clone, Copy, Debug, Default)]
pub struct CaseInsensitive;

impl KeyPolicy for CaseInsensitive {
    #[inline]
    fn eq(&self, a: &str, b: &str) -> bool {
        a.eq_ignore_ascii_case(b)
    }

    #[inline]
    fn hash(&self, key: &str) -> u64 {
        hash_lowercase(key.as_bytes())
    }
}

/// FNV-1a over lowercased bytes, so differently-cased keys land in the same
/// bucket.
pub(crate) const fn hash_lowercase(bytes: &[u8]) -> u64 {
    const INITIAL_STATE: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0100_0000_01b3;

    let mut hash = INITIAL_STATE;
    let mut i = 0;

    while i < bytes.len() {
        hash ^= bytes[i].to_ascii_lowercase() as u64;
        hash = hash.wrapping_mul(PRIME);
        i += 1;
    }

    hash
}

pub(crate) fn default_policy() -> Arc<dyn KeyPolicy> {
    Arc::new(CaseInsensitive)
}

/// Hash reserved for the null key.
const NULL_KEY_HASH: u64 = 0;

pub(crate) fn hash_key(policy: &dyn KeyPolicy, key: Option<&str>) -> u64 {
    match key {
        Some(key) => policy.hash(key),
        None => NULL_KEY_HASH,
    }
}

/// The null key equals only itself; the policy decides everything else.
pub(crate) fn keys_eq(policy: &dyn KeyPolicy, a: Option<&str>, b: Option<&str>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => policy.eq(a, b),
        (None, None) => true,
        _ => false,
    }
}
