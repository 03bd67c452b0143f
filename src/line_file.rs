use std::{
    io,
    path::{Path, PathBuf},
};

use fs_err::OpenOptions;
use memmap2::Mmap;
use thiserror::Error;
use tracing::debug;

use crate::sjis::{decode_ignoring_malformed, Codec};

/// Reads the line that starts at byte `address` of the file at `path` and decodes it as plain Shift_JIS.
///
/// The returned line keeps its `\n` terminator when it has one. Reading at the very end
/// of the file yields an empty string, and an empty file reads as zero bytes.
pub fn decode_line_at(path: impl AsRef<Path>, address: usize) -> Result<String, LineFileError> {
    let path = path.as_ref();
    let file = OpenOptions::new().read(true).write(true).open(path)?;

    // Mapping an empty file fails on some platforms
    let map;
    let contents: &[u8] = if file.metadata()?.len() == 0 {
        &[]
    } else {
        // SAFETY: the map is private to this call, but another process that truncates or
        // rewrites the file while it is mapped can still change or invalidate these bytes.
        map = unsafe { Mmap::map(file.file())? };
        &map[..]
    };

    let rest = contents
        .get(address..)
        .ok_or_else(|| LineFileError::AddressOutOfRange {
            path: path.to_owned(),
            address,
            len: contents.len(),
        })?;
    let line = match rest.iter().position(|&b| b == b'\n') {
        Some(end) => &rest[..=end],
        None => rest,
    };
    let (decoded, malformed) = decode_ignoring_malformed(Codec::ShiftJis, line);
    debug!(?path, address, bytes = line.len(), malformed, "decoded line");
    Ok(decoded)
}

#[derive(Debug, Error)]
pub enum LineFileError {
    #[error("Cannot read file: {0}")]
    Io(#[from] io::Error),
    #[error("Address {address:#x} is past the end of {path:?} ({len} bytes)")]
    AddressOutOfRange {
        path: PathBuf,
        address: usize,
        len: usize,
    },
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use assert_matches::assert_matches;
    use tempfile::NamedTempFile;

    use super::{decode_line_at, LineFileError};

    fn fixture(contents: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_decode_line_at() {
        let file = fixture(b"hello\n\x82\xa0\x82\xa2\nlast");
        let path = file.path();
        assert_eq!(decode_line_at(path, 0).unwrap(), "hello\n");
        assert_eq!(decode_line_at(path, 3).unwrap(), "lo\n");
        assert_eq!(decode_line_at(path, 6).unwrap(), "あい\n");
        assert_eq!(decode_line_at(path, 11).unwrap(), "last");
        assert_eq!(decode_line_at(path, 15).unwrap(), "");
        assert_matches!(
            decode_line_at(path, 16),
            Err(LineFileError::AddressOutOfRange { address: 16, len: 15, .. })
        );
    }

    #[test]
    fn test_plain_shift_jis() {
        let file = fixture(b"\x5c\x81\x5f~\n\xf0\x40");
        assert_eq!(decode_line_at(file.path(), 0).unwrap(), "\\＼~\n");
        // Plane 2 of JIS X 0213 is not part of plain Shift_JIS.
        assert_eq!(decode_line_at(file.path(), 5).unwrap(), "@");
    }

    #[test]
    fn test_malformed_bytes_are_dropped() {
        let file = fixture(b"A\xa0B\x82");
        assert_eq!(decode_line_at(file.path(), 0).unwrap(), "AB");
    }

    #[test]
    fn test_empty_file() {
        let file = fixture(b"");
        assert_eq!(decode_line_at(file.path(), 0).unwrap(), "");
        assert_matches!(
            decode_line_at(file.path(), 1),
            Err(LineFileError::AddressOutOfRange { .. })
        );
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert_matches!(
            decode_line_at(dir.path().join("missing.bin"), 0),
            Err(LineFileError::Io(_))
        );
    }
}
