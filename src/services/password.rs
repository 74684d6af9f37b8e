use argon2::{
    password_hash::SaltString, Algorithm, Argon2, Params, PasswordHash, PasswordHasher,
    PasswordVerifier, Version,
};

use crate::errors::InternalError;

/// Hash a password with Argon2id, mixing in the process-wide pepper as
/// the secret parameter.
pub fn hash_password(pepper: &str, password: &str) -> Result<String, InternalError> {
    let salt = SaltString::generate(&mut rand_core::OsRng);
    let argon2 = argon2_with_pepper(pepper)?;

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| InternalError::Crypto {
            operation: "hash_password".to_string(),
            message: e.to_string(),
        })?
        .to_string();

    Ok(hash)
}

/// Verify a password against a stored hash. Any parse or verification
/// failure is just "no match" - callers never learn why.
pub fn verify_password(pepper: &str, password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };
    let Ok(argon2) = argon2_with_pepper(pepper) else {
        return false;
    };
    argon2.verify_password(password.as_bytes(), &parsed).is_ok()
}

fn argon2_with_pepper(pepper: &str) -> Result<Argon2<'_>, InternalError> {
    Argon2::new_with_secret(
        pepper.as_bytes(),
        Algorithm::Argon2id,
        Version::V0x13,
        Params::default(),
    )
    .map_err(|e| InternalError::Crypto {
        operation: "argon2_init".to_string(),
        message: e.to_string(),
    })
}
