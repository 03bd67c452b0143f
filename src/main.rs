use std::{
    io::{self, BufReader},
    process::{Command, Stdio},
};

use anyhow::{anyhow, Context};
use clap::Parser;
use hex_sjis_monitor::{
    logging,
    monitor::{monitor, MonitorConfig},
};
use tracing::info;

/// Decodes the hex dumps an emulator prints to stdout as Shift-JIS text.
#[derive(Parser)]
struct Opts {
    /// Segments of at most this many characters are ignored
    #[clap(long, default_value_t = 20)]
    min_len: usize,
    /// Separator between dumps on the same line
    #[clap(long, default_value = " 0 ")]
    separator: String,
    /// Read dumps from stdin instead of spawning a producer
    #[clap(long)]
    stdin: bool,
    /// Producer command line [default: ./avocado]
    #[clap(allow_hyphen_values = true)]
    command: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    logging::init();
    let opts = Opts::parse();

    let mut config = MonitorConfig::avocado();
    config.min_len = opts.min_len;
    config.separator = opts.separator;
    if !opts.command.is_empty() {
        config.command = opts.command;
    }

    let stdout = io::stdout();
    if opts.stdin {
        let stdin = io::stdin();
        let stats = monitor(&config, stdin.lock(), stdout.lock())?;
        info!(lines = stats.lines, decoded = stats.decoded, "input finished");
        return Ok(());
    }

    let (program, args) = config
        .command
        .split_first()
        .ok_or_else(|| anyhow!("No producer command given"))?;
    let mut child = Command::new(program)
        .args(args)
        .stdout(Stdio::piped())
        .spawn()
        .with_context(|| format!("Failed to spawn {:?}", program))?;
    info!(program = %program, pid = child.id(), "spawned producer");

    let child_stdout = child
        .stdout
        .take()
        .ok_or_else(|| anyhow!("Stdout of {:?} was not captured", program))?;
    let stats = monitor(&config, BufReader::new(child_stdout), stdout.lock())
        .with_context(|| format!("Failed while reading the output of {:?}", program))?;
    let status = child.wait()?;
    info!(%status, lines = stats.lines, decoded = stats.decoded, "producer finished");

    Ok(())
}
