use rand::{distributions::Uniform, Rng};

use crate::model::common::election::{AccessCode, ACCESS_CODE_LENGTH};

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generate a random access code.
///
/// Codes are not guaranteed unique.
pub fn generate() -> AccessCode {
    generate_with(&mut rand::thread_rng())
}

/// Generate an access code from the given source of randomness.
pub fn generate_with<R: Rng>(rng: &mut R) -> AccessCode {
    let dist = Uniform::from(0..ALPHABET.len());
    (0..ACCESS_CODE_LENGTH)
        .map(|_| char::from(ALPHABET[rng.sample(dist)]))
        .collect()
}
