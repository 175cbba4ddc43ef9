use std::{fmt::Display, sync::atomic::AtomicU64};

use geneve::{GeneveError, ProtocolType};

/// Record counters local to one processing loop
///
/// These counters avoid atomic operations on every record by accumulating
/// counts locally and periodically flushing to the shared `Stats` struct.
#[derive(Default, Debug, Clone)]
pub struct LocalStats {
    // General statistics
    pub total_records: u64,
    pub total_bytes: u64,

    // Error statistics
    pub bad_hex: u64,
    pub too_short: u64,
    pub other_errors: u64,

    // Decoded headers
    pub headers: u64,
    pub oam: u64,
    pub critical: u64,
    pub options: u64,
    pub critical_options: u64,
    pub payload_bytes: u64,

    // Protocol types
    pub ethernet: u64,
    pub ipv4: u64,
    pub ipv6: u64,
    pub other_proto: u64,

    // Strict / re-encode findings
    pub reserved_bits: u64,
    pub inconsistent_critical: u64,
    pub reencode_mismatch: u64,
    pub reencode_errors: u64,
}

impl LocalStats {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a decode failure under its error kind
    #[inline]
    pub fn record_error(&mut self, err: &GeneveError) {
        match err {
            GeneveError::UnexpectedEof { .. } => self.too_short += 1,
            _ => self.other_errors += 1,
        }
    }

    #[inline]
    pub fn record_protocol(&mut self, proto: ProtocolType) {
        if proto == ProtocolType::ETHERNET {
            self.ethernet += 1;
        } else if proto == ProtocolType::IPV4 {
            self.ipv4 += 1;
        } else if proto == ProtocolType::IPV6 {
            self.ipv6 += 1;
        } else {
            self.other_proto += 1;
        }
    }

    /// Flush all local counters to the shared atomic stats
    ///
    /// This performs atomic additions for all non-zero counters and
    /// resets the local counters to zero.
    #[inline]
    pub fn flush(&mut self, stats: &Stats) {
        macro_rules! flush_counter {
            ($($field:ident),+ $(,)?) => {
                $(
                    if self.$field > 0 {
                        stats
                            .$field
                            .fetch_add(self.$field, std::sync::atomic::Ordering::Relaxed);
                        self.$field = 0;
                    }
                )+
            };
        }

        flush_counter!(
            total_records,
            total_bytes,
            bad_hex,
            too_short,
            other_errors,
            headers,
            oam,
            critical,
            options,
            critical_options,
            payload_bytes,
            ethernet,
            ipv4,
            ipv6,
            other_proto,
            reserved_bits,
            inconsistent_critical,
            reencode_mismatch,
            reencode_errors,
        );
    }

    /// Returns true every `interval` records (`interval` must be a power of 2)
    #[inline]
    pub fn should_flush(&self, interval: u64) -> bool {
        self.total_records & (interval - 1) == 0
    }
}

/// Flush interval for local stats (must be power of 2)
pub const FLUSH_INTERVAL: u64 = 1024;

#[derive(Default, Debug)]
pub struct Stats {
    pub total_records: AtomicU64,
    pub total_bytes: AtomicU64,

    pub bad_hex: AtomicU64,
    pub too_short: AtomicU64,
    pub other_errors: AtomicU64,

    pub headers: AtomicU64,
    pub oam: AtomicU64,
    pub critical: AtomicU64,
    pub options: AtomicU64,
    pub critical_options: AtomicU64,
    pub payload_bytes: AtomicU64,

    pub ethernet: AtomicU64,
    pub ipv4: AtomicU64,
    pub ipv6: AtomicU64,
    pub other_proto: AtomicU64,

    pub reserved_bits: AtomicU64,
    pub inconsistent_critical: AtomicU64,
    pub reencode_mismatch: AtomicU64,
    pub reencode_errors: AtomicU64,
}

impl Stats {
    /// Get the value of a counter using relaxed ordering
    #[inline]
    fn get(&self, counter: &AtomicU64) -> u64 {
        counter.load(std::sync::atomic::Ordering::Relaxed)
    }

    /// Get total errors
    pub fn total_errors(&self) -> u64 {
        self.get(&self.bad_hex)
            + self.get(&self.too_short)
            + self.get(&self.other_errors)
    }

    pub fn total_findings(&self) -> u64 {
        self.get(&self.reserved_bits)
            + self.get(&self.inconsistent_critical)
            + self.get(&self.reencode_mismatch)
            + self.get(&self.reencode_errors)
    }
}

impl Display for Stats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Geneve Statistics ===")?;
        writeln!(f)?;

        writeln!(f, "--- General ---")?;
        writeln!(f, "Total records processed: {}", self.get(&self.total_records))?;
        writeln!(f, "Total bytes processed: {}", self.get(&self.total_bytes))?;
        writeln!(f)?;

        writeln!(f, "--- Errors ---")?;
        writeln!(f, "Total errors: {}", self.total_errors())?;
        writeln!(f, "  Bad hex: {}", self.get(&self.bad_hex))?;
        writeln!(f, "  Too short: {}", self.get(&self.too_short))?;
        writeln!(f, "  Other errors: {}", self.get(&self.other_errors))?;
        writeln!(f)?;

        writeln!(f, "--- Headers ---")?;
        writeln!(f, "Decoded: {}", self.get(&self.headers))?;
        writeln!(f, "  OAM: {}", self.get(&self.oam))?;
        writeln!(f, "  Critical: {}", self.get(&self.critical))?;
        writeln!(f, "Options: {}", self.get(&self.options))?;
        writeln!(f, "  Critical: {}", self.get(&self.critical_options))?;
        writeln!(f, "Payload bytes: {}", self.get(&self.payload_bytes))?;
        writeln!(f)?;

        writeln!(f, "--- Protocol Types ---")?;
        writeln!(f, "Ethernet: {}", self.get(&self.ethernet))?;
        writeln!(f, "IPv4: {}", self.get(&self.ipv4))?;
        writeln!(f, "IPv6: {}", self.get(&self.ipv6))?;
        writeln!(f, "Other: {}", self.get(&self.other_proto))?;

        let total_findings = self.total_findings();
        if total_findings > 0 {
            writeln!(f)?;
            writeln!(f, "--- Findings ---")?;
            if self.get(&self.reserved_bits) > 0 {
                writeln!(f, "  Reserved bits set: {}", self.get(&self.reserved_bits))?;
            }
            if self.get(&self.inconsistent_critical) > 0 {
                writeln!(
                    f,
                    "  Inconsistent critical flag: {}",
                    self.get(&self.inconsistent_critical)
                )?;
            }
            if self.get(&self.reencode_mismatch) > 0 {
                writeln!(
                    f,
                    "  Re-encode mismatch: {}",
                    self.get(&self.reencode_mismatch)
                )?;
            }
            if self.get(&self.reencode_errors) > 0 {
                writeln!(f, "  Re-encode errors: {}", self.get(&self.reencode_errors))?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::Ordering;

    #[test]
    fn test_flush_moves_counts() {
        let stats = Stats::default();
        let mut local = LocalStats::new();

        local.total_records = 3;
        local.headers = 2;
        local.record_error(&GeneveError::InvalidVersion(1));
        local.record_protocol(ProtocolType::ETHERNET);
        local.record_protocol(ProtocolType::from(0x1234));
        local.flush(&stats);

        assert_eq!(local.total_records, 0);
        assert_eq!(local.headers, 0);
        assert_eq!(stats.total_records.load(Ordering::Relaxed), 3);
        assert_eq!(stats.headers.load(Ordering::Relaxed), 2);
        assert_eq!(stats.other_errors.load(Ordering::Relaxed), 1);
        assert_eq!(stats.ethernet.load(Ordering::Relaxed), 1);
        assert_eq!(stats.other_proto.load(Ordering::Relaxed), 1);
        assert_eq!(stats.total_errors(), 1);
    }

    #[test]
    fn test_record_error_kinds() {
        let mut local = LocalStats::new();
        local.record_error(&GeneveError::UnexpectedEof {
            what: "GeneveHeader",
            needed: 8,
            available: 0,
        });
        local.record_error(&GeneveError::InvalidVersion(1));

        assert_eq!(local.too_short, 1);
        assert_eq!(local.other_errors, 1);
    }

    #[test]
    fn test_should_flush() {
        let mut local = LocalStats::new();
        local.total_records = FLUSH_INTERVAL;
        assert!(local.should_flush(FLUSH_INTERVAL));
        local.total_records += 1;
        assert!(!local.should_flush(FLUSH_INTERVAL));
    }
}
