use rand::Rng;

/// Alphabet for access codes. Visually ambiguous glyphs (0/O, 1/I) are
/// excluded so codes survive being read over the phone or typed from a
/// printed gift card.
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

pub const CODE_LENGTH: usize = 6;

/// Generate a random access code. Uniqueness is statistical only; the code
/// space is large enough that no existence check is made against the store.
pub fn generate_code() -> String {
    let mut rng = rand::thread_rng();
    (0..CODE_LENGTH)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}
