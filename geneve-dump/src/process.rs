use geneve::wire::{RawOptionHeader, WireHeader};
use geneve::GeneveHeaderView;
use tracing::{debug, warn};

use crate::input::Record;
use crate::stats::{LocalStats, Stats, FLUSH_INTERVAL};
use crate::Args;

/// Process a single input record
///
/// Decodes the record as a Geneve header, updates the counters and reports
/// whatever the enabled checks find. Returns false when the record could not
/// be decoded.
pub fn process_record(
    record: &Record,
    args: &Args,
    local_stats: &mut LocalStats,
    stats: &Stats,
) -> bool {
    local_stats.total_records += 1;

    let ok = match record.decode_hex() {
        Ok(data) => {
            local_stats.total_bytes += data.len() as u64;
            process_header(record.line, &data, args, local_stats)
        }
        Err(e) => {
            warn!(line = record.line, "invalid hex: {e}");
            local_stats.bad_hex += 1;
            false
        }
    };

    // Periodic flush to shared stats
    if local_stats.should_flush(FLUSH_INTERVAL) {
        local_stats.flush(stats);
    }

    ok
}

fn process_header(line: usize, data: &[u8], args: &Args, local_stats: &mut LocalStats) -> bool {
    let decoded = GeneveHeaderView::parse(data)
        .and_then(|(view, payload)| Ok((view, view.to_owned_header()?, payload)));

    let (view, header, payload) = match decoded {
        Ok(decoded) => decoded,
        Err(e) => {
            warn!(line, "failed to decode Geneve header: {e}");
            local_stats.record_error(&e);
            return false;
        }
    };

    debug!(line, header_len = view.header_len(), payload_len = payload.len(), "decoded {header}");

    local_stats.headers += 1;
    local_stats.oam += header.oam as u64;
    local_stats.critical += header.critical as u64;
    local_stats.options += header.options.len() as u64;
    local_stats.critical_options += header.options.iter().filter(|o| o.critical).count() as u64;
    local_stats.payload_bytes += payload.len() as u64;
    local_stats.record_protocol(header.protocol_type);

    if args.dump {
        println!("{:>5}   {} ({} bytes)", line, header, data.len());
        for option in &header.options {
            println!("        {option}");
        }
        if !payload.is_empty() {
            println!("        payload {} bytes", payload.len());
        }
    }

    if args.strict {
        let reserved_options = options_with_reserved_bits(view.options());
        if !view.raw().reserved_bits_clear() || reserved_options > 0 {
            warn!(
                line,
                header_flags = view.reserved_flags(),
                header_vni = view.reserved_vni(),
                options = reserved_options,
                "reserved bits set"
            );
            local_stats.reserved_bits += 1;
        }
        if !header.critical_flag_consistent() {
            warn!(
                line,
                critical = header.critical,
                "critical flag does not match options"
            );
            local_stats.inconsistent_critical += 1;
        }
    }

    if args.reencode {
        match header.encode() {
            Ok(bytes) if bytes[..] != data[..view.header_len()] => {
                warn!(
                    line,
                    "re-encoded header differs: {}",
                    hex::encode(&bytes)
                );
                local_stats.reencode_mismatch += 1;
            }
            Ok(_) => {}
            Err(e) => {
                warn!(line, "failed to re-encode header: {e}");
                local_stats.reencode_errors += 1;
            }
        }
    }

    true
}

/// Counts the options in an already validated option region whose
/// reserved length bits are set
fn options_with_reserved_bits(mut region: &[u8]) -> usize {
    let mut count = 0;
    while let Ok((option, _, rest)) = RawOptionHeader::split_prefix(region) {
        if option.reserved_bits() != 0 {
            count += 1;
        }
        region = rest;
    }
    count
}
