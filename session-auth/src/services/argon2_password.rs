use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
};
use async_trait::async_trait;

use crate::domain::PasswordComparator;

/// Argon2id hash with the same parameters as [`hash_password`], of a password
/// nobody holds. Comparing against it costs as much as a real check, which
/// keeps unknown names as slow to reject as wrong passwords.
pub const DUMMY_PASSWORD_HASH: &str =
    "$argon2id$v=19$m=15000,t=2,p=1$c2Vzc2lvbi1hdXRoLWR1bQ$5kL82/pCUhI9d1ILrlEM3wRA00JupXQxD8vWDMGPf0M";

fn argon2id() -> Result<Argon2<'static>, argon2::Error> {
    Ok(Argon2::new(
        Algorithm::Argon2id,
        Version::V0x13,
        Params::new(15000, 2, 1, None)?,
    ))
}

/// Hash a password into a PHC string. Runs on the blocking pool.
pub async fn hash_password(password: &str) -> Result<String, String> {
    let password_clone = password.to_owned();
    tokio::task::spawn_blocking(move || {
        let argon2 = argon2id().map_err(|e| e.to_string())?;
        let salt = SaltString::generate(&mut OsRng);
        argon2
            .hash_password(password_clone.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| e.to_string())
    })
    .await
    .map_err(|e| e.to_string())?
}

/// Verifies PHC-format Argon2 hashes. The parameters are read from the hash itself.
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2PasswordComparator;

#[async_trait]
impl PasswordComparator for Argon2PasswordComparator {
    async fn compare(&self, hash: &str, plaintext: &str) -> bool {
        let password_clone = plaintext.to_owned();
        let hash_clone = hash.to_owned();

        tokio::task::spawn_blocking(move || {
            let Ok(parsed_hash) = PasswordHash::new(&hash_clone) else {
                return false;
            };
            Argon2::default()
                .verify_password(password_clone.as_bytes(), &parsed_hash)
                .is_ok()
        })
        .await
        .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn compare_matches_only_the_right_password() {
        let hash = hash_password("Str0ng!pass").await.unwrap();
        let cmp = Argon2PasswordComparator;
        assert!(cmp.compare(&hash, "Str0ng!pass").await);
        assert!(!cmp.compare(&hash, "wrong").await);
    }

    #[test]
    fn dummy_hash_uses_the_hashing_parameters() {
        let parsed = PasswordHash::new(DUMMY_PASSWORD_HASH).unwrap();
        assert_eq!(parsed.algorithm, Algorithm::Argon2id.ident());
        let params = Params::try_from(&parsed).unwrap();
        assert_eq!((params.m_cost(), params.t_cost(), params.p_cost()), (15000, 2, 1));
    }

    #[tokio::test]
    async fn dummy_hash_is_a_real_argon2_hash() {
        let cmp = Argon2PasswordComparator;
        assert!(cmp.compare(DUMMY_PASSWORD_HASH, "not-a-real-password").await);
        assert!(!cmp.compare(DUMMY_PASSWORD_HASH, "").await);
    }

    #[tokio::test]
    async fn garbage_hash_never_matches() {
        assert!(!Argon2PasswordComparator.compare("not-a-phc-string", "x").await);
    }
}
