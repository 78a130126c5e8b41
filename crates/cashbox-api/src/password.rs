use std::sync::LazyLock;

use anyhow::{Result, anyhow};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use rand_core::OsRng;

/// Hash with Argon2id and a fresh random salt. The result is a PHC string,
/// so the salt and parameters travel with the hash.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("Password hashing failed: {}", e))?;

    Ok(hash.to_string())
}

/// `Ok(false)` on a wrong password; `Err` only when the stored hash is unusable.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| anyhow!("Malformed password hash: {}", e))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(anyhow!("Password verification failed: {}", e)),
    }
}

/// Hash checked against when the username does not exist.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("cashbox-no-such-user").ok());

/// Do the work of a password check for an unknown user. Always `false`.
pub fn verify_missing_user(password: &str) -> bool {
    if let Some(hash) = DUMMY_HASH.as_deref() {
        let _ = verify_password(password, hash);
    }
    false
}
