// src/common/id_generator.rs
//! Identifier generation
//!
//! Two flavours of ids are handed out:
//! - time-derived ids for records synthesized without a datastore
//!   (milliseconds since the Unix epoch, rendered as a decimal string)
//! - prefixed Crockford Base32 ids for rows written by the SQL store
//!   (e.g. `U_K7NP3XY2` for profiles)

use chrono::Utc;
use rand::Rng;
use std::sync::atomic::{AtomicI64, Ordering};

/// Crockford Base32 alphabet (excludes I, L, O, U to avoid confusion)
const CROCKFORD_ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Number of random characters in a prefixed id
const PREFIXED_ID_LENGTH: usize = 8;

/// Highest time-derived id handed out so far in this process
static LAST_TIME_ID: AtomicI64 = AtomicI64::new(0);

/// Entity type prefixes for ID generation
#[derive(Debug, Clone, Copy)]
pub enum EntityPrefix {
    /// User profile (U_)
    User,
}

impl EntityPrefix {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityPrefix::User => "U",
        }
    }
}

fn generate_crockford_string(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| CROCKFORD_ALPHABET[rng.gen_range(0..32)] as char)
        .collect()
}

/// Generate a prefixed ID using Crockford Base32 encoding
///
/// # Example
/// ```ignore
/// let id = generate_id(EntityPrefix::User);
/// // Returns something like "U_K7NP3XY2"
/// ```
pub fn generate_id(prefix: EntityPrefix) -> String {
    format!(
        "{}_{}",
        prefix.as_str(),
        generate_crockford_string(PREFIXED_ID_LENGTH)
    )
}

/// Generate a User profile ID (U_XXXXXXXX)
pub fn generate_user_id() -> String {
    generate_id(EntityPrefix::User)
}

/// Generate a time-derived id from the current wall clock in milliseconds.
///
/// Ids are strictly increasing within the process: when two calls land in the
/// same millisecond (or the clock steps backwards) the later call gets the
/// previous id plus one.
pub fn generate_time_id() -> String {
    next_time_id(&LAST_TIME_ID, Utc::now().timestamp_millis()).to_string()
}

fn next_time_id(high_water: &AtomicI64, now_millis: i64) -> i64 {
    let mut last = high_water.load(Ordering::Relaxed);
    loop {
        let candidate = now_millis.max(last + 1);
        match high_water.compare_exchange_weak(
            last,
            candidate,
            Ordering::Relaxed,
            Ordering::Relaxed,
        ) {
            Ok(_) => return candidate,
            Err(observed) => last = observed,
        }
    }
}
