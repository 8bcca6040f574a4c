//! Provider request secret hash
//!
//! The user pool requires every unauthenticated client request to carry
//! `base64(HMAC-SHA256(key = client_secret, msg = username || client_id))`.
//! The message ordering is a fixed provider contract and must match
//! bit-for-bit or the pool rejects the call.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Compute the secret hash for a provider request
pub fn secret_hash(username: &str, client_id: &str, client_secret: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(client_secret.as_bytes())
        .unwrap_or_else(|_| unreachable!("HMAC accepts keys of any length"));
    mac.update(username.as_bytes());
    mac.update(client_id.as_bytes());
    STANDARD.encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Expected values computed independently with the reference algorithm
    #[test]
    fn test_known_vectors() {
        assert_eq!(
            secret_hash("test_username", "4pon8gi9t6f6dllka6ap2ihcad", "SECRET"),
            "U8eBq46Oh4VdXc2pLvbps8mAlfwQHSroTG/BoyPy8rY="
        );
        assert_eq!(
            secret_hash("alice", "client-123", "shared-secret"),
            "n4Lwpv57t/O9zfOhtgjeMirLTmXH/0H4HI8O5Op7dKU="
        );
        assert_eq!(
            secret_hash("bob", "client-123", "shared-secret"),
            "USGXrfc17C1SJpJXtfnWbX4PqjdV+mEc+7pRzjgcPuU="
        );
    }

    #[test]
    fn test_ordering_matters() {
        // username || client_id, never the reverse
        let forward = secret_hash("alice", "client-123", "shared-secret");
        let reversed = secret_hash("client-123", "alice", "shared-secret");
        assert_ne!(forward, reversed);
    }

    #[test]
    fn test_distinct_users_get_distinct_hashes() {
        let a = secret_hash("alice", "client-123", "shared-secret");
        let b = secret_hash("bob", "client-123", "shared-secret");
        assert_ne!(a, b);
    }
}
