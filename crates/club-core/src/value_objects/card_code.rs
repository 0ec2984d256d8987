//! Share codes for virtual ID cards

use rand::Rng;

/// Length of a generated card code
pub const CARD_CODE_LEN: usize = 10;

// No 0/O or 1/I so codes survive being read aloud or retyped.
const CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Generate a random share code for a member's virtual ID card
pub fn generate_card_code() -> String {
    let mut rng = rand::thread_rng();
    (0..CARD_CODE_LEN)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect()
}

/// Check that a string has the shape of a card code
pub fn is_valid_card_code(code: &str) -> bool {
    code.len() == CARD_CODE_LEN && code.bytes().all(|b| CHARSET.contains(&b))
}
