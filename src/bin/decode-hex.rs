use std::io::{self, BufRead};

use clap::Parser;
use hex_sjis_monitor::{hex_text::decode, logging};

#[derive(Parser)]
struct Opts {
    /// Hex dump to decode; lines of stdin are decoded when omitted
    arg: Option<String>,
}

fn main() -> anyhow::Result<()> {
    logging::init();
    let opts = Opts::parse();
    match opts.arg {
        Some(arg) => decode(&arg)?,
        None => {
            for line in io::stdin().lock().lines() {
                decode(&line?)?;
            }
        }
    }
    Ok(())
}
