use blake3::Hasher;

/// Full 32-byte BLAKE3 hash of a text, used as the embedding memo key.
#[inline]
pub fn hash_text(text: &str) -> [u8; 32] {
    *blake3::hash(text.as_bytes()).as_bytes()
}

/// Computes a 64-bit hash of the input data using BLAKE3, truncated from 256 bits.
///
/// # Truncation Rationale
///
/// The first 8 bytes of a BLAKE3 hash are used for:
///
/// - **Record file names**: one file per user per table in [`crate::storage::FileStore`]
/// - **Feature hashing**: token buckets in the hashed embedding provider
///
/// # Collision Tolerance
///
/// With 64 bits the birthday bound sits around 4.3 billion items, far beyond the
/// number of users a single store holds. The file store additionally keeps the
/// full user id inside each record and verifies it on load, so a collision reads
/// as "no record" rather than as another user's data. Token bucket collisions
/// only blur the stub embedding slightly.
#[inline]
pub fn hash_to_u64(data: &[u8]) -> u64 {
    let hash = blake3::hash(data);
    let bytes: [u8; 8] = hash.as_bytes()[0..8]
        .try_into()
        .expect("BLAKE3 always produces at least 8 bytes");
    u64::from_le_bytes(bytes)
}

/// Hashes a canonical user id for record addressing.
#[inline]
pub fn hash_user_id(user_id: &str) -> u64 {
    hash_to_u64(user_id.as_bytes())
}

/// Hashes a token under a seed, so the same token can feed independent buckets.
#[inline]
pub fn hash_token(seed: &str, token: &str) -> u64 {
    let mut hasher = Hasher::new();
    hasher.update(seed.as_bytes());
    hasher.update(b"|");
    hasher.update(token.as_bytes());

    let hash = hasher.finalize();
    let bytes: [u8; 8] = hash.as_bytes()[0..8]
        .try_into()
        .expect("BLAKE3 always produces at least 8 bytes");
    u64::from_le_bytes(bytes)
}

/// Renders a user id hash as the fixed-width hex stem used for record files.
#[inline]
pub fn user_record_stem(user_id: &str) -> String {
    format!("{:016x}", hash_user_id(user_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_hash_text_determinism() {
        let text = "Python Machine Learning Backend Development AWS";

        let hash1 = hash_text(text);
        let hash2 = hash_text(text);

        assert_eq!(hash1, hash2);
    }

    #[test]
    fn test_hash_text_uniqueness() {
        let texts = [
            "Technical Co-founder San Francisco, CA",
            "Business Co-founder San Francisco, CA",
            "technical co-founder san francisco, ca",
            "Technical Co-founder San Francisco, CA ",
        ];

        let hashes: Vec<_> = texts.iter().map(|t| hash_text(t)).collect();
        let unique_hashes: HashSet<_> = hashes.iter().collect();

        assert_eq!(unique_hashes.len(), texts.len());
    }

    #[test]
    fn test_hash_text_empty_string() {
        let hash = hash_text("");
        assert!(!hash.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_hash_to_u64_uniqueness() {
        let inputs = [
            b"user-001".as_slice(),
            b"user-002".as_slice(),
            b"USER-001".as_slice(),
            b"user-001 ".as_slice(),
        ];

        let hashes: Vec<_> = inputs.iter().map(|i| hash_to_u64(i)).collect();
        let unique_hashes: HashSet<_> = hashes.iter().collect();

        assert_eq!(unique_hashes.len(), inputs.len());
    }

    #[test]
    fn test_hash_user_id_equals_hash_to_u64() {
        let user = "64f1c0ffee0000000000beef";
        assert_eq!(hash_user_id(user), hash_to_u64(user.as_bytes()));
    }

    #[test]
    fn test_hash_token_seed_sensitivity() {
        assert_ne!(hash_token("bucket", "rust"), hash_token("sign", "rust"));
        assert_eq!(hash_token("bucket", "rust"), hash_token("bucket", "rust"));
    }

    #[test]
    fn test_hash_token_separator_prevents_ambiguity() {
        assert_ne!(hash_token("ab", "cd"), hash_token("abc", "d"));
    }

    #[test]
    fn test_user_record_stem_is_fixed_width_hex() {
        let stem = user_record_stem("42");
        assert_eq!(stem.len(), 16);
        assert!(stem.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(stem, user_record_stem("42"));
    }
}
