// src/utils/share_code.rs

use std::sync::LazyLock;

use regex::Regex;

use crate::utils::rng::GameRng;

pub const SHARE_CODE_LEN: usize = 6;

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

static SHARE_CODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z0-9]{6}$").expect("share code pattern is a valid regex")
});

/// Generates a 6-character uppercase alphanumeric share code.
///
/// Codes are not checked for collisions against existing games.
pub fn generate(rng: &mut GameRng) -> String {
    (0..SHARE_CODE_LEN)
        .map(|_| ALPHABET[rng.index(ALPHABET.len())] as char)
        .collect()
}

/// Trims and uppercases user input. Returns `None` when the result is not a
/// well-formed share code.
pub fn normalize(input: &str) -> Option<String> {
    let code = input.trim().to_uppercase();
    SHARE_CODE_RE.is_match(&code).then_some(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_codes_are_well_formed() {
        let mut rng = GameRng::new(3);
        for _ in 0..100 {
            let code = generate(&mut rng);
            assert_eq!(normalize(&code).as_deref(), Some(code.as_str()));
        }
    }

    #[test]
    fn normalize_uppercases() {
        assert_eq!(normalize(" ab12cd ").as_deref(), Some("AB12CD"));
    }

    #[test]
    fn normalize_rejects_bad_input() {
        assert!(normalize("ABC").is_none());
        assert!(normalize("ABC-12").is_none());
        assert!(normalize("ABCDEFG").is_none());
    }
}
