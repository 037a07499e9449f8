use argon2::password_hash::{PasswordHash, SaltString, rand_core::OsRng};
use argon2::{Algorithm, Argon2, Params, PasswordHasher, PasswordVerifier, Version};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("invalid argon2 parameters: {0}")]
    Params(argon2::Error),
    #[error("hashing failed: {0}")]
    Hash(argon2::password_hash::Error),
}

/// Argon2id with a per-call random salt. Digests are PHC strings, so the salt
/// and cost parameters travel with the hash.
#[derive(Clone)]
pub struct Hasher {
    params: Params,
}

impl Hasher {
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Result<Self, PasswordError> {
        let params =
            Params::new(memory_kib, iterations, parallelism, None).map_err(PasswordError::Params)?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    pub fn hash(&self, plain: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        Ok(self
            .argon2()
            .hash_password(plain.as_bytes(), &salt)
            .map_err(PasswordError::Hash)?
            .to_string())
    }

    /// Cost parameters are taken from the digest, not from `self`, so digests
    /// produced under an older work factor keep verifying.
    pub fn verify(&self, plain: &str, digest: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(digest) else {
            return false;
        };
        self.argon2()
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok()
    }
}

impl Default for Hasher {
    fn default() -> Self {
        Self { params: Params::default() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast() -> Hasher {
        Hasher::new(256, 1, 1).unwrap()
    }

    #[test]
    fn same_password_hashes_differently() {
        let h = fast();
        let a = h.hash("pw123").unwrap();
        let b = h.hash("pw123").unwrap();
        assert_ne!(a, b);
        assert!(a.starts_with("$argon2id$"));
        assert!(h.verify("pw123", &a));
        assert!(h.verify("pw123", &b));
    }

    #[test]
    fn wrong_password_is_rejected() {
        let h = fast();
        let digest = h.hash("pw123").unwrap();
        assert!(!h.verify("pw124", &digest));
        assert!(!h.verify("", &digest));
    }

    #[test]
    fn malformed_digest_is_a_plain_failure() {
        let h = fast();
        assert!(!h.verify("pw123", ""));
        assert!(!h.verify("pw123", "not-a-phc-string"));
        assert!(!h.verify("pw123", "$argon2id$v=19$m=256,t=1,p=1$garbage"));
    }

    #[test]
    fn digest_from_other_cost_still_verifies() {
        let digest = Hasher::new(512, 2, 1).unwrap().hash("pw123").unwrap();
        assert!(fast().verify("pw123", &digest));
    }

    #[test]
    fn rejects_impossible_params() {
        assert!(Hasher::new(1, 0, 1).is_err());
    }
}
