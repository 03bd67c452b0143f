//! Best-effort decoding of hex dump text as Shift_JIS-2000 (JIS X 0213).
//!
//! A cleaned dump is cut into 4-digit (2-byte) chunks starting at each of four
//! alignments, because the dump gives no hint where a character begins.
//! Chunks that are not valid hex are skipped, and bytes the codec rejects are dropped.

mod noise;

use std::io::{self, Write};

use hex::FromHexError;
use itertools::Itertools;
use tracing::trace;

use crate::sjis::{decode_ignoring_malformed, Codec};

pub use noise::{clean, NOISE_TOKENS};

/// Number of hex digits in a chunk.
pub const CHUNK_LEN: usize = 4;
/// Number of alignments tried for every input.
pub const OFFSET_COUNT: usize = 4;

/// Result of decoding a cleaned dump from one alignment.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct OffsetDecode {
    pub offset: usize,
    pub text: String,
    /// Character positions of chunks that were not valid hex.
    pub skipped: Vec<usize>,
    /// Malformed byte sequences dropped by the codec.
    pub malformed: usize,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Decoding {
    pub cleaned: String,
    pub offsets: [OffsetDecode; OFFSET_COUNT],
}

/// Parses a chunk of hex digit pairs.
/// ASCII whitespace may separate pairs but not the two digits of one pair.
pub fn parse_chunk(chunk: &str) -> Result<Vec<u8>, FromHexError> {
    let is_separator = |b: u8| matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0B | 0x0C);
    let mut digits = Vec::with_capacity(chunk.len());
    let mut rest = chunk.as_bytes();
    loop {
        let skip = rest.iter().take_while(|&&b| is_separator(b)).count();
        match &rest[skip..] {
            [] => break,
            [high, low, tail @ ..] => {
                digits.extend([*high, *low]);
                rest = tail;
            }
            [_] => return Err(FromHexError::OddLength),
        }
    }
    hex::decode(digits)
}

/// Decodes `cleaned` from character position `offset`.
pub fn decode_at(cleaned: &str, offset: usize) -> OffsetDecode {
    let chars = cleaned.chars().collect_vec();
    let mut result = OffsetDecode {
        offset,
        ..Default::default()
    };
    let chunks = chars.get(offset..).unwrap_or_default().chunks(CHUNK_LEN);
    for (index, chunk) in chunks.enumerate() {
        let position = offset + index * CHUNK_LEN;
        let chunk: String = chunk.iter().collect();
        match parse_chunk(&chunk) {
            Ok(bytes) => {
                let (text, malformed) = decode_ignoring_malformed(Codec::ShiftJisX0213, &bytes);
                result.text.push_str(&text);
                result.malformed += malformed;
            }
            Err(error) => {
                trace!(offset, position, %chunk, %error, "skipping chunk");
                result.skipped.push(position);
            }
        }
    }
    result
}

/// Cleans `raw` and decodes it from every alignment, in offset order.
pub fn decode_offsets(raw: &str) -> Decoding {
    let cleaned = clean(raw);
    let offsets = [0, 1, 2, 3].map(|offset| decode_at(&cleaned, offset));
    Decoding { cleaned, offsets }
}

/// Writes one `Original: ` block per alignment to `out`.
pub fn write_decoded<W: Write>(mut out: W, raw: &str) -> io::Result<Decoding> {
    let decoding = decode_offsets(raw);
    for offset in &decoding.offsets {
        writeln!(out, "Original: {}", offset.text)?;
        writeln!(out)?;
    }
    Ok(decoding)
}

/// Prints the decoded alignments of `raw` to stdout.
pub fn decode(raw: &str) -> io::Result<()> {
    let stdout = io::stdout();
    write_decoded(stdout.lock(), raw).map(|_| ())
}

#[cfg(test)]
mod tests {
    use hex::FromHexError;
    use itertools::Itertools;

    use super::{decode_at, decode_offsets, parse_chunk, write_decoded, Decoding};

    fn render(raw: &str) -> (String, Decoding) {
        let mut out = Vec::new();
        let decoding = write_decoded(&mut out, raw).unwrap();
        (String::from_utf8(out).unwrap(), decoding)
    }

    fn texts(decoding: &Decoding) -> Vec<&str> {
        decoding.offsets.iter().map(|x| x.text.as_str()).collect_vec()
    }

    const EMPTY_OUTPUT: &str = "Original: \n\nOriginal: \n\nOriginal: \n\nOriginal: \n\n";

    #[test]
    fn test_empty() {
        let (out, decoding) = render("");
        assert_eq!(out, EMPTY_OUTPUT);
        assert_eq!(decoding.cleaned, "");
        assert!(decoding.offsets.iter().all(|x| x.skipped.is_empty()));
    }

    #[test]
    fn test_noise_only() {
        let (out, decoding) = render("8200 2000");
        assert_eq!(out, EMPTY_OUTPUT);
        assert_eq!(decoding.cleaned, "");
    }

    #[test]
    fn test_every_offset() {
        // あい
        let decoding = decode_offsets("82a0 82a2");
        assert_eq!(decoding.cleaned, "82a082a2");
        assert_eq!(texts(&decoding), ["あい", "*\u{8}", "｢", "\u{8}*"]);
        assert_eq!(
            decoding.offsets.iter().map(|x| x.offset).collect_vec(),
            [0, 1, 2, 3]
        );

        // Offset 1: "2a08" then the odd leftover "2a2".
        assert_eq!(decoding.offsets[1].skipped, [5]);
        // Offset 2: 0xA0 is invalid and 0x82 lacks a trail byte; "a2" is a half-width bracket.
        assert_eq!(decoding.offsets[2].skipped, Vec::<usize>::new());
        assert_eq!(decoding.offsets[2].malformed, 2);
        // Offset 3: "082a" then the leftover "2".
        assert_eq!(decoding.offsets[3].skipped, [7]);
        assert_eq!(decoding.offsets[0].malformed, 0);

        let (out, _) = render("82a0 82a2");
        assert_eq!(
            out,
            "Original: あい\n\nOriginal: *\u{8}\n\nOriginal: ｢\n\nOriginal: \u{8}*\n\n"
        );
    }

    #[test]
    fn test_shifted_kanji() {
        let decoding = decode_offsets("e38182e38184");

        assert_eq!(texts(&decoding), ["縺ゅ＞", "8\u{18}.8", "≠縺", "\u{18}.8\u{18}"]);
        assert!(decoding.offsets[0].skipped.is_empty());
        assert_eq!(decoding.offsets[0].malformed, 0);
        assert_eq!(decoding.offsets[1].skipped, [9]);
        // The trailing "84" is a lead byte without its trail.
        assert_eq!(decoding.offsets[2].malformed, 1);
        assert_eq!(decoding.offsets[3].skipped, [11]);
    }

    #[test]
    fn test_jis_x0213_chunks() {
        assert_eq!(decode_at("5c7e", 0).text, "¥‾");
        assert_eq!(decode_at("5c", 0).text, "¥");
        assert_eq!(decode_at("7e", 0).text, "‾");
        assert_eq!(decode_at("8191", 0).text, "¢");
        assert_eq!(decode_at("f040", 0).text, "𠂉");
        assert_eq!(decode_at("824c", 0).text, "⇩");
        assert_eq!(decode_at("83e7", 0).text, "☁");
        assert_eq!(decode_at("82f5", 0).text, "か\u{309A}");
        let nul = decode_at("0080", 0);
        assert_eq!(nul.text, "\u{0}");
        assert_eq!(nul.malformed, 1);
    }

    #[test]
    fn test_parse_chunk() {
        assert_eq!(parse_chunk("4142"), Ok(vec![0x41, 0x42]));
        assert_eq!(parse_chunk(""), Ok(vec![]));
        assert_eq!(parse_chunk("41\t\t"), Ok(vec![0x41]));
        assert_eq!(parse_chunk("\t41"), Ok(vec![0x41]));
        assert_eq!(parse_chunk("\u{b}41\n"), Ok(vec![0x41]));
        assert_eq!(parse_chunk("414"), Err(FromHexError::OddLength));
        assert!(parse_chunk("4\t1").is_err());
        assert!(parse_chunk("zz41").is_err());
    }

    #[test]
    fn test_whitespace_between_pairs() {
        // Only spaces are cleaned away, so other whitespace reaches the chunks.
        let decoding = decode_offsets("41\t\t4243");
        assert_eq!(decoding.cleaned, "41\t\t4243");
        assert_eq!(decoding.offsets[0].text, "ABC");
        assert!(decoding.offsets[0].skipped.is_empty());
    }

    #[test]
    fn test_offset_past_end() {
        let result = decode_at("41", 3);
        assert_eq!(result.text, "");
        assert!(result.skipped.is_empty());

        let decoding = decode_offsets("4142");
        assert_eq!(texts(&decoding), ["AB", "", "B", ""]);
        assert_eq!(decoding.offsets[1].skipped, [1]);
        assert_eq!(decoding.offsets[3].skipped, [3]);
    }

    #[test]
    fn test_non_hex_is_skipped() {
        let decoding = decode_offsets("zz414141");
        assert_eq!(decoding.offsets[0].text, "AA");
        assert_eq!(decoding.offsets[0].skipped, [0]);

        // Non-ASCII characters count as one position each.
        let decoding = decode_offsets("あ4141");
        assert_eq!(decoding.offsets[1].text, "AA");
        assert_eq!(decoding.offsets[0].skipped, [0, 4]);
    }

    #[test]
    fn test_idempotent() {
        let raw = "e3 81 82 e3 81 84 8200 4142";
        assert_eq!(render(raw), render(raw));
    }
}
