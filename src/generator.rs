//! Random password generation.
//!
//! Passwords always contain at least one character from each class
//! (upper, lower, digit, symbol). Easily confused characters such as
//! `I`, `l`, `O`, `0` and `1` are left out.

use rand::seq::{IndexedRandom, SliceRandom};

use crate::errors::{ItemVaultError, Result};

/// Shortest password the generator will produce.
pub const MIN_LENGTH: usize = 12;

/// Longest password the generator will produce.
pub const MAX_LENGTH: usize = 128;

const UPPER: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ";
const LOWER: &[u8] = b"abcdefghijkmnopqrstuvwxyz";
const DIGITS: &[u8] = b"23456789";
const SYMBOLS: &[u8] = b"!@#$%^&*()-_=+[]{};:,.?";

/// Generate a password of exactly `length` characters.
pub fn generate_password(length: usize) -> Result<String> {
    if !(MIN_LENGTH..=MAX_LENGTH).contains(&length) {
        return Err(ItemVaultError::CommandFailed(format!(
            "password length must be between {MIN_LENGTH} and {MAX_LENGTH}"
        )));
    }

    let mut rng = rand::rng();
    let mut chars: Vec<u8> = Vec::with_capacity(length);

    for class in [UPPER, LOWER, DIGITS, SYMBOLS] {
        if let Some(c) = class.choose(&mut rng) {
            chars.push(*c);
        }
    }

    let all: Vec<u8> = [UPPER, LOWER, DIGITS, SYMBOLS].concat();
    while chars.len() < length {
        if let Some(c) = all.choose(&mut rng) {
            chars.push(*c);
        }
    }

    chars.shuffle(&mut rng);
    Ok(chars.into_iter().map(char::from).collect())
}
