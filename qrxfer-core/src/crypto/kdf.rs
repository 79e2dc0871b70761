use crate::error::{Result, XferError};
use argon2::{Algorithm, Argon2, Params, Version};

pub const KEY_LEN: usize = 32;

// Fixed per the wire contract; changing any of these produces a different
// key for the same password/salt and breaks interop.
const M_COST_KIB: u32 = 19_456;
const T_COST: u32 = 2;
const P_COST: u32 = 1;

/// Argon2id(password, salt) → 256-bit symmetric key.
pub fn derive_key(password: &str, salt: &[u8]) -> Result<[u8; KEY_LEN]> {
    let params =
        Params::new(M_COST_KIB, T_COST, P_COST, Some(KEY_LEN)).map_err(|_| XferError::Authentication)?;
    let kdf = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut key = [0u8; KEY_LEN];
    kdf.hash_password_into(password.as_bytes(), salt, &mut key)
        .map_err(|_| XferError::Authentication)?;
    Ok(key)
}
