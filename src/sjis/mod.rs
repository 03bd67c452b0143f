//! Shift_JIS decoding that drops what it cannot map.
//!
//! Two variants share one table: plain Shift_JIS (JIS X 0208 with ASCII in the
//! single-byte half) and Shift_JIS-2000, which maps the JIS X 0213 planes and reads
//! 0x5C and 0x7E as JIS X 0201 Roman.

mod rows;

use rows::{COMBINED, JIS_X0208_RANGES, ROWS, UNDEFINED_IN_2000};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Codec {
    ShiftJis,
    ShiftJisX0213,
}
impl Codec {
    fn single(self, byte: u8) -> Option<char> {
        match (self, byte) {
            (Codec::ShiftJisX0213, 0x5C) => Some('¥'),
            (Codec::ShiftJisX0213, 0x7E) => Some('‾'),
            (_, 0x00..=0x7F) => Some(byte.into()),
            (_, 0xA1..=0xDF) => char::from_u32(0xFEC0 + u32::from(byte)),
            _ => None,
        }
    }

    fn pair(self, lead: u8, trail: u8) -> Option<&'static str> {
        let lead_index = match lead {
            0x81..=0x9F => lead - 0x81,
            0xE0..=0xFC => lead - 0xC1,
            _ => return None,
        };
        let trail_index = match trail {
            0x40..=0x7E => trail - 0x40,
            0x80..=0xFC => trail - 0x41,
            _ => return None,
        };
        let code = u16::from_be_bytes([lead, trail]);
        if self == Codec::ShiftJis {
            if !JIS_X0208_RANGES
                .iter()
                .any(|&(start, end)| (start..=end).contains(&code))
            {
                return None;
            }
            if code == 0x815F {
                return Some("＼");
            }
        }
        if let Ok(i) = COMBINED.binary_search_by_key(&code, |&(code, _)| code) {
            return Some(COMBINED[i].1);
        }
        let row = ROWS[2 * usize::from(lead_index) + usize::from(trail_index) / 94];
        let (start, c) = row.char_indices().nth(usize::from(trail_index) % 94)?;
        (c != '\u{FFFD}').then(|| &row[start..start + c.len_utf8()])
    }

    /// Whether an unmappable pair is discarded whole rather than only its lead byte.
    fn drops_pair(self, lead: u8, trail: u8) -> bool {
        self == Codec::ShiftJisX0213
            && UNDEFINED_IN_2000.contains(&u16::from_be_bytes([lead, trail]))
    }
}

/// Decodes `bytes` with `codec`, dropping every malformed sequence instead of
/// substituting U+FFFD.
/// Returns the decoded text and the number of malformed sequences that were dropped.
///
/// When a lead byte cannot be paired with the next byte, only the lead byte is dropped
/// and decoding resumes at the byte after it.
pub fn decode_ignoring_malformed(codec: Codec, bytes: &[u8]) -> (String, usize) {
    let mut decoded = String::with_capacity(bytes.len() * 2);
    let mut malformed = 0;
    let mut rest = bytes;
    while let [first, tail @ ..] = rest {
        if let Some(c) = codec.single(*first) {
            decoded.push(c);
            rest = tail;
            continue;
        }
        match tail.first() {
            Some(&second) => match codec.pair(*first, second) {
                Some(text) => {
                    decoded.push_str(text);
                    rest = &tail[1..];
                }
                None if codec.drops_pair(*first, second) => {
                    malformed += 1;
                    rest = &tail[1..];
                }
                None => {
                    malformed += 1;
                    rest = tail;
                }
            },
            None => {
                malformed += 1;
                rest = tail;
            }
        }
    }
    (decoded, malformed)
}

#[cfg(test)]
mod tests {
    use encoding_rs::SHIFT_JIS;

    use super::{
        decode_ignoring_malformed,
        Codec::{ShiftJis, ShiftJisX0213},
    };

    fn x0213(bytes: &[u8]) -> String {
        decode_ignoring_malformed(ShiftJisX0213, bytes).0
    }

    fn plain(bytes: &[u8]) -> String {
        decode_ignoring_malformed(ShiftJis, bytes).0
    }

    #[test]
    fn test_decode_ignoring_malformed() {
        assert_eq!(
            decode_ignoring_malformed(ShiftJisX0213, &[0x82, 0xA0, 0x82, 0xA2]),
            ("あい".to_owned(), 0)
        );
        assert_eq!(
            decode_ignoring_malformed(ShiftJisX0213, b"ABC"),
            ("ABC".to_owned(), 0)
        );
        assert_eq!(
            decode_ignoring_malformed(ShiftJisX0213, &[]),
            (String::new(), 0)
        );
        assert_eq!(x0213(&[0xB1, 0xB2]), "ｱｲ");
        assert_eq!(x0213(&[0x00, 0x80]), "\u{0}");
    }

    #[test]
    fn test_malformed_is_dropped() {
        // 0xA0 is never valid, and a lead byte at the very end is truncated.
        assert_eq!(
            decode_ignoring_malformed(ShiftJisX0213, &[0xA0, 0x82]),
            (String::new(), 2)
        );
        assert_eq!(
            decode_ignoring_malformed(ShiftJisX0213, &[0x41, 0xA0, 0x42]),
            ("AB".to_owned(), 1)
        );
        assert_eq!(
            decode_ignoring_malformed(ShiftJisX0213, &[0x82, 0xA0, 0x82]),
            ("あ".to_owned(), 1)
        );
        assert_eq!(x0213(&[0x80, 0xA0, 0xFD, 0xFE, 0xFF]), "");
    }

    #[test]
    fn test_jis_x0213() {
        assert_eq!(x0213(b"\x5c\x7e"), "¥‾");
        assert_eq!(x0213(&[0x81, 0x91]), "¢");
        assert_eq!(x0213(&[0x81, 0x5F]), "\\");
        assert_eq!(x0213(&[0x82, 0x4C]), "⇩");
        assert_eq!(x0213(&[0x83, 0xE7]), "☁");
        assert_eq!(x0213(&[0x82, 0x40]), "▷");
        // Plane 2
        assert_eq!(x0213(&[0xF0, 0x40]), "𠂉");
        assert_eq!(x0213(&[0xF0, 0x40, 0x41]), "𠂉A");
        assert_eq!(x0213(&[0xED, 0x40]), "硃");
        assert_eq!(x0213(&[0xFA, 0x40]), "豗");
        assert_eq!(x0213(&[0xEA, 0xA4]), "熙");
    }

    #[test]
    fn test_combining_sequences() {
        assert_eq!(x0213(&[0x82, 0xF5]), "か\u{309A}");
        assert_eq!(x0213(&[0x83, 0x97]), "カ\u{309A}");
        assert_eq!(x0213(&[0x86, 0x63]), "æ\u{300}");
        assert_eq!(x0213(&[0x86, 0x85]), "˩˥");
    }

    #[test]
    fn test_unmapped_pair() {
        // Only the lead byte is dropped, so the trail byte is read again.
        assert_eq!(plain(&[0x82, 0x4C]), "L");
        assert_eq!(plain(&[0xF0, 0x40, 0x41]), "@A");
        assert_eq!(plain(&[0x87, 0x9F, 0x41]), "蘗");
        // Codes that JIS X 0213:2000 leaves undefined are dropped as a pair.
        assert_eq!(
            decode_ignoring_malformed(ShiftJisX0213, &[0x87, 0x9F, 0x41]),
            ("A".to_owned(), 1)
        );
        assert_eq!(x0213(&[0xEF, 0xFC, 0x41]), "A");
    }

    #[test]
    fn test_plain_shift_jis() {
        assert_eq!(plain(b"\x5c\x7e"), "\\~");
        assert_eq!(plain(&[0x81, 0x5F]), "＼");
        assert_eq!(plain(&[0x81, 0x91]), "¢");
        assert_eq!(plain(&[0x83, 0xE7]), "");
        assert_eq!(plain(&[0xED, 0x40]), "@");
        assert_eq!(plain(&[0x82, 0xF5]), "");
        assert_eq!(plain(&[0xEA, 0xA4]), "熙");
        assert_eq!(plain(&[0x82, 0xA0, 0x82]), "あ");
    }

    #[test]
    fn test_kana_agree_with_windows_31j() {
        let hiragana = (0x9F..=0xF1).map(|trail| [0x82, trail]);
        let katakana = (0x40..=0x96)
            .filter(|&trail| trail != 0x7F)
            .map(|trail| [0x83, trail]);
        let kanji = (0x9F..=0xFC).map(|trail| [0x88, trail]);
        for code in hiragana.chain(katakana).chain(kanji) {
            let (expected, _, had_errors) = SHIFT_JIS.decode(&code);
            assert!(!had_errors, "{:02X?}", code);
            assert_eq!(x0213(&code), expected, "{:02X?}", code);
            assert_eq!(plain(&code), expected, "{:02X?}", code);
        }
    }
}
