use std::{num::ParseIntError, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use hex_sjis_monitor::{line_file::decode_line_at, logging};

#[derive(Parser)]
struct Opts {
    path: PathBuf,
    /// Byte offset, decimal or 0x-prefixed hex
    #[clap(value_parser = parse_address)]
    address: usize,
}

fn parse_address(s: &str) -> Result<usize, ParseIntError> {
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16),
        None => s.parse(),
    }
}

fn main() -> anyhow::Result<()> {
    logging::init();
    let opts = Opts::parse();
    let line = decode_line_at(&opts.path, opts.address)
        .with_context(|| format!("Failed to read {:?} at {:#x}", opts.path, opts.address))?;
    print!("{}", line);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::parse_address;

    #[test]
    fn test_parse_address() {
        assert_eq!(parse_address("0"), Ok(0));
        assert_eq!(parse_address("1234"), Ok(1234));
        assert_eq!(parse_address("0x1f"), Ok(31));
        assert_eq!(parse_address("0X1F"), Ok(31));
        assert!(parse_address("0x").is_err());
        assert!(parse_address("zz").is_err());
    }
}
