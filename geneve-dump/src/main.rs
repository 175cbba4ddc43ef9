use std::io::BufRead;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info, warn};

mod input;
mod process;
mod stats;

#[derive(Parser, Debug)]
#[command(name = "geneve-dump")]
#[command(about = "Decode and inspect hex-encoded Geneve headers", long_about = None)]
struct Args {
    /// Hex dump to read, one header per line (`-` for stdin)
    #[arg(short, long, value_name = "FILE", default_value = "-")]
    input: PathBuf,

    /// Print every decoded header and its options
    #[arg(short, long)]
    dump: bool,

    /// Re-encode each decoded header and compare it with the input bytes
    #[arg(short, long)]
    reencode: bool,

    /// Report reserved bits and inconsistent critical flags
    #[arg(long)]
    strict: bool,

    /// Print statistics at the end
    #[arg(short, long)]
    stats: bool,

    /// Log level used when RUST_LOG is not set
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&args.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let stats = stats::Stats::default();

    info!("Reading Geneve records from {:?}", args.input);
    let failed = match process_input(&args, &stats) {
        Ok(failed) => failed,
        Err(e) => {
            error!("Failed to process input: {e:#}");
            return Ok(ExitCode::FAILURE);
        }
    };

    if args.stats {
        println!("{stats}");
    }

    if failed > 0 {
        warn!("{failed} record(s) failed to decode");
    }
    Ok(ExitCode::from(exit_status(failed)))
}

/// Exit status once the whole input was read: 1 if any record failed
fn exit_status(failed: u64) -> u8 {
    if failed > 0 {
        1
    } else {
        0
    }
}

/// Process the input record by record, returning the number of records
/// that failed to decode
fn process_input(args: &Args, stats: &stats::Stats) -> anyhow::Result<u64> {
    let reader =
        input::open(&args.input).with_context(|| format!("cannot open {:?}", args.input))?;
    process_reader(reader, args, stats)
}

fn process_reader<R: BufRead>(
    reader: R,
    args: &Args,
    stats: &stats::Stats,
) -> anyhow::Result<u64> {
    // Local counters, flushed periodically to the shared stats
    let mut local_stats = stats::LocalStats::new();

    let mut record_count: u64 = 0;
    let mut failed: u64 = 0;

    let start = std::time::Instant::now();

    for record in input::Records::new(reader) {
        let record = record.with_context(|| format!("cannot read {:?}", args.input))?;
        record_count += 1;
        if !process::process_record(&record, args, &mut local_stats, stats) {
            failed += 1;
        }
    }

    // Final flush of local stats
    local_stats.flush(stats);

    info!(
        "Total records processed: {}, {} failed, {:.3}K rec/sec",
        record_count,
        failed,
        (record_count as f64 / start.elapsed().as_secs_f64()) / 1_000.0,
    );
    Ok(failed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::Ordering;

    fn args(extra: &[&str]) -> Args {
        Args::parse_from(std::iter::once("geneve-dump").chain(extra.iter().copied()))
    }

    #[test]
    fn test_process_reader_counts_failures() {
        let stats = stats::Stats::default();
        let input = "\
# empty Ethernet header
00 00 65 58 00 00 00 00
# truncated
00 00 65 58 00 00 00
zz
01 00 00 00 00 00 00 00 00 00 00 00
";

        let failed = process_reader(input.as_bytes(), &args(&[]), &stats).unwrap();
        assert_eq!(failed, 2);
        assert_eq!(stats.total_records.load(Ordering::Relaxed), 4);
        assert_eq!(stats.headers.load(Ordering::Relaxed), 2);
        assert_eq!(stats.too_short.load(Ordering::Relaxed), 1);
        assert_eq!(stats.bad_hex.load(Ordering::Relaxed), 1);
        assert_eq!(exit_status(failed), 1);
    }

    #[test]
    fn test_process_reader_all_decoded() {
        let stats = stats::Stats::default();
        let input = "00 00 65 58 00 00 00 00\n0x0000655800006400deadbeef\n";

        let failed = process_reader(input.as_bytes(), &args(&[]), &stats).unwrap();
        assert_eq!(failed, 0);
        assert_eq!(stats.headers.load(Ordering::Relaxed), 2);
        assert_eq!(exit_status(failed), 0);
    }

    #[test]
    fn test_process_reader_read_error() {
        let stats = stats::Stats::default();
        let input: &[u8] = &[0xff, 0xfe, b'\n'];

        assert!(process_reader(input, &args(&[]), &stats).is_err());
    }

    #[test]
    fn test_process_input_missing_file() {
        let stats = stats::Stats::default();
        let args = args(&["--input", "/nonexistent/geneve-records.hex"]);

        let err = process_input(&args, &stats).unwrap_err();
        assert!(err.to_string().contains("cannot open"));
    }
}
