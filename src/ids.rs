//! Entity identifiers: base-36 millisecond timestamp followed by a random
//! base-36 suffix. Unique enough for a single board store, not for
//! adversarial use.

use chrono::Utc;
use rand::Rng;

const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 9;

pub fn generate_id() -> String {
    let mut id = to_base36(Utc::now().timestamp_millis().max(0) as u64);
    let mut rng = rand::rng();
    id.extend((0..SUFFIX_LEN).map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char));
    id
}

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }

    let mut digits = Vec::new();
    while value > 0 {
        digits.push(ALPHABET[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}
