use unicode_normalization::{is_nfc, UnicodeNormalization};

/// Canonical composition (NFC). Precomposed and decomposed spellings of the
/// same text come out byte-identical.
pub fn normalize_nfc(text: &str) -> String {
    if is_nfc(text) {
        return text.to_owned();
    }
    text.nfc().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // "Xin chào" with the grave accent as a separate combining mark.
    const DECOMPOSED: &str = "Xin cha\u{0300}o";
    const PRECOMPOSED: &str = "Xin ch\u{00e0}o";

    #[test]
    fn decomposed_and_precomposed_normalize_identically() {
        assert_ne!(DECOMPOSED.as_bytes(), PRECOMPOSED.as_bytes());
        assert_eq!(
            normalize_nfc(DECOMPOSED).as_bytes(),
            normalize_nfc(PRECOMPOSED).as_bytes()
        );
        assert_eq!(normalize_nfc(DECOMPOSED), PRECOMPOSED);
    }

    #[test]
    fn normalization_is_idempotent() {
        let once = normalize_nfc("Tie\u{0302}\u{0301}ng Vie\u{0323}\u{0302}t");
        let twice = normalize_nfc(&once);
        assert_eq!(once, twice);
        assert_eq!(once, "Ti\u{1ebf}ng Vi\u{1ec7}t");
    }

    #[test]
    fn ascii_passes_through() {
        assert_eq!(normalize_nfc("hello world"), "hello world");
    }
}
