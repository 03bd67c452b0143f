pub mod config;

use std::io::{self, BufRead, Write};

use tracing::debug;

use crate::hex_text::write_decoded;

pub use config::MonitorConfig;

/// Drops segments that are too short or equal to the last accepted one.
#[derive(Clone, Debug)]
pub struct LineFilter {
    min_len: usize,
    last: Option<String>,
}
impl LineFilter {
    pub fn new(min_len: usize) -> Self {
        Self {
            min_len,
            last: None,
        }
    }

    /// Returns whether `segment` should be decoded, remembering it if so.
    pub fn accept(&mut self, segment: &str) -> bool {
        if segment.chars().count() <= self.min_len || self.last.as_deref() == Some(segment) {
            return false;
        }
        self.last = Some(segment.to_owned());
        true
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct MonitorStats {
    pub lines: usize,
    pub decoded: usize,
}

/// Decodes every accepted segment of `input` into `out` until `input` is exhausted.
pub fn monitor<R, W>(config: &MonitorConfig, input: R, mut out: W) -> io::Result<MonitorStats>
where
    R: BufRead,
    W: Write,
{
    let mut filter = LineFilter::new(config.min_len);
    let mut stats = MonitorStats::default();
    for line in input.split(b'\n') {
        let line = line?;
        let line = String::from_utf8_lossy(&line);
        stats.lines += 1;
        for segment in line.trim().split(config.separator.as_str()) {
            if !filter.accept(segment) {
                continue;
            }
            let decoding = write_decoded(&mut out, segment)?;
            debug!(
                cleaned_len = decoding.cleaned.len(),
                skipped = decoding.offsets.iter().map(|x| x.skipped.len()).sum::<usize>(),
                "decoded segment"
            );
            stats.decoded += 1;
        }
        writeln!(out, "\n\n")?;
        out.flush()?;
    }
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::{monitor, LineFilter, MonitorConfig, MonitorStats};

    #[test]
    fn test_line_filter() {
        let mut filter = LineFilter::new(3);
        assert!(!filter.accept(""));
        assert!(!filter.accept("abc"));
        assert!(filter.accept("abcd"));
        assert!(!filter.accept("abcd"));
        // Rejected segments do not reset the memo.
        assert!(!filter.accept("ab"));
        assert!(!filter.accept("abcd"));
        assert!(filter.accept("bcde"));
        assert!(filter.accept("abcd"));
        // Length is counted in characters.
        assert!(!filter.accept("あいう"));
    }

    #[test]
    fn test_monitor() {
        let a = "82a082a282a082a282a082a2";
        let b = "4142434441424344414243444142";
        let input = format!("{a} 0 abc 0 {a}\n{a}\n  {b}  \n");
        let mut out = Vec::new();
        let stats = monitor(&MonitorConfig::default(), input.as_bytes(), &mut out).unwrap();
        assert_eq!(
            stats,
            MonitorStats {
                lines: 3,
                decoded: 2
            }
        );

        let out = String::from_utf8(out).unwrap();
        assert_eq!(out.matches("Original: ").count(), 8);
        assert!(out.starts_with("Original: あいあいあい\n\n"));
        assert!(out.contains("Original: ABCDABCDABCDAB\n\n"));
        assert_eq!(out.matches("\n\n\n").count(), 3);
    }

    #[test]
    fn test_monitor_custom_separator() {
        let config = MonitorConfig {
            separator: "|".to_owned(),
            min_len: 3,
            ..Default::default()
        };
        let mut out = Vec::new();
        let stats = monitor(&config, &b"4142|4344|41\n"[..], &mut out).unwrap();
        assert_eq!(stats.decoded, 2);
        let out = String::from_utf8(out).unwrap();
        assert!(out.starts_with("Original: AB\n\n"));
        assert!(out.contains("Original: CD\n\n"));
    }

    #[test]
    fn test_monitor_empty_input() {
        let mut out = Vec::new();
        let stats = monitor(&MonitorConfig::avocado(), &b""[..], &mut out).unwrap();
        assert_eq!(stats, MonitorStats::default());
        assert!(out.is_empty());
    }
}
