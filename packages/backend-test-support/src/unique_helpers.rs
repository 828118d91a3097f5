//! Unique test data so parallel tests never share identities.

use ulid::Ulid;

/// `{prefix}-{ulid}`
///
/// ```
/// use beanpot_test_support::unique_helpers::unique_str;
///
/// let a = unique_str("wallet");
/// let b = unique_str("wallet");
/// assert_ne!(a, b);
/// assert!(a.starts_with("wallet-"));
/// ```
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// Stable seed derived from a test label, so each test gets its own
/// reproducible RNG stream.
///
/// ```
/// use beanpot_test_support::unique_helpers::test_seed;
///
/// assert_eq!(test_seed("lobby"), test_seed("lobby"));
/// assert_ne!(test_seed("lobby"), test_seed("arena"));
/// ```
pub fn test_seed(label: &str) -> u64 {
    let hash = blake3::hash(label.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[..8]);
    u64::from_le_bytes(bytes)
}
