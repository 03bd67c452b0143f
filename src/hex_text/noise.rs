/// Filler patterns stripped from a dump line before chunking, in removal order.
pub const NOISE_TOKENS: [&str; 3] = ["8200", "20", "00"];

/// Removes spaces, then every occurrence of each of [`NOISE_TOKENS`], one pass per token.
///
/// Each pass is a plain non-overlapping substring replacement, so digits that merely
/// look like a token are removed as well, and a later pass sees what an earlier one joined.
pub fn clean(raw: &str) -> String {
    let without_spaces = raw.replace(' ', "");
    NOISE_TOKENS
        .iter()
        .fold(without_spaces, |hex, token| hex.replace(token, ""))
}

#[cfg(test)]
mod tests {
    use super::clean;

    #[test]
    fn test_clean() {
        assert_eq!(clean(""), "");
        assert_eq!(clean("e38182e38184"), "e38182e38184");
        assert_eq!(clean("82 a0 82 a2"), "82a082a2");
        assert_eq!(clean("8200 2000"), "");
        assert_eq!(clean("820020"), "");
        assert_eq!(clean("08200"), "0");
        assert_eq!(clean("41 20 42"), "4142");
    }

    #[test]
    fn test_clean_passes_are_sequential() {
        // The "20" pass joins "0" and "0", and only then does the "00" pass remove them.
        // A single sweep over all three tokens would leave "00".
        assert_eq!(clean("0200"), "");
        // Replacement does not rescan text it has just joined.
        assert_eq!(clean("2200"), "20");
        assert_eq!(clean("a0200b"), "ab");
    }
}
