//! Geneve header codec
//!
//! [`GeneveHeader`] is the owned, in-memory form of a Geneve header and its
//! options. It encodes to, and decodes from, the exact wire layout of
//! RFC 8926 §3.4.
//!
//! # Examples
//!
//! ## Encode a header with options
//!
//! ```
//! use geneve::{GeneveHeader, GeneveOption, ProtocolType, Vni};
//!
//! let header = GeneveHeader {
//!     oam: true,
//!     critical: true,
//!     protocol_type: ProtocolType::ETHERNET,
//!     vni: Vni(0x00bbeeff),
//!     options: vec![
//!         GeneveOption::new(0x0001, 0x02, vec![0, 1, 2, 3]).with_critical(true),
//!         GeneveOption::new(0x0002, 0x04, vec![4, 5, 6, 7, 8, 9, 10, 11]),
//!     ],
//!     ..Default::default()
//! };
//!
//! let bytes = header.encode().unwrap();
//! assert_eq!(&bytes[..8], &[0x05, 0xc0, 0x65, 0x58, 0xbb, 0xee, 0xff, 0x00]);
//! assert_eq!(bytes.len(), 28);
//! ```
//!
//! ## Locate the payload on the receive path
//!
//! ```
//! use geneve::{GeneveHeader, ProtocolType};
//!
//! let packet = [
//!     0x00, 0x00, 0x65, 0x58,  // Ver=0, OptLen=0, O=0, C=0, Proto=Ethernet
//!     0x00, 0x00, 0x64, 0x00,  // VNI = 100, Reserved
//!     0xde, 0xad, 0xbe, 0xef,  // inner frame ...
//! ];
//!
//! let (header, offset) = GeneveHeader::decode_with_offset(&packet).unwrap();
//! assert_eq!(header.vni.get(), 100);
//! assert_eq!(header.protocol_type, ProtocolType::ETHERNET);
//! assert_eq!(&packet[offset..], &[0xde, 0xad, 0xbe, 0xef]);
//! ```

use std::fmt::{self, Formatter};
use std::ops::Deref;

use serde::{Deserialize, Serialize};
use zerocopy::IntoBytes;

use crate::error::GeneveError;
use crate::option::{GeneveOption, OptionsIter};
use crate::protocol::ProtocolType;
use crate::vni::Vni;
use crate::wire::{RawGeneveHeader, WireHeader};

/// Current version of the Geneve protocol.
pub const VERSION: u8 = 0;

/// Length of the fixed Geneve header in bytes.
pub const HEADER_LEN: usize = 8;

/// Maximum options length in bytes (63 * 4 = 252)
pub const MAX_OPTIONS_LEN: usize = 252;

/// Geneve UDP destination port (IANA assigned)
pub const GENEVE_UDP_PORT: u16 = 6081;

/// Check if a UDP destination port is the Geneve port
#[inline]
pub fn is_geneve_port(dst_port: u16) -> bool {
    dst_port == GENEVE_UDP_PORT
}

/// A Geneve header and its options.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GeneveHeader {
    /// Protocol version (2 bits). Only [`VERSION`] encodes.
    pub version: u8,
    /// The packet carries a control message instead of a data payload.
    pub oam: bool,
    /// One or more options have the critical bit set. Written and read
    /// as-is; see [`GeneveHeader::critical_flag_consistent`].
    pub critical: bool,
    /// Type of the protocol data unit following the header.
    pub protocol_type: ProtocolType,
    /// Virtual network identifier (24 bits).
    pub vni: Vni,
    /// Options in wire order.
    pub options: Vec<GeneveOption>,
}

impl GeneveHeader {
    /// Number of bytes this header and its options occupy on the wire.
    pub fn wire_len(&self) -> usize {
        HEADER_LEN + self.options.iter().map(GeneveOption::wire_len).sum::<usize>()
    }

    /// Allocates a buffer and encodes the header followed by its options.
    ///
    /// Fails with [`GeneveError::InvalidVersion`], then
    /// [`GeneveError::InvalidVni`], then the first option error, then
    /// [`GeneveError::InvalidOptionsLength`]. No bytes are returned on error.
    pub fn encode(&self) -> Result<Vec<u8>, GeneveError> {
        if self.version != VERSION {
            return Err(GeneveError::InvalidVersion(self.version));
        }

        if !self.vni.is_valid() {
            return Err(GeneveError::InvalidVni(self.vni.get()));
        }

        // Options go in first, the fixed header is patched in once their length is known
        let mut buf = vec![0u8; HEADER_LEN];
        buf.reserve(self.wire_len() - HEADER_LEN);
        for option in &self.options {
            option.encode_into(&mut buf)?;
        }

        let options_len = buf.len() - HEADER_LEN;
        if options_len > MAX_OPTIONS_LEN {
            return Err(GeneveError::InvalidOptionsLength(options_len));
        }

        let raw = RawGeneveHeader::new(
            self.version,
            (options_len / 4) as u8,
            self.oam,
            self.critical,
            self.protocol_type,
            self.vni.get(),
        );
        buf[..HEADER_LEN].copy_from_slice(raw.as_bytes());

        Ok(buf)
    }

    /// Decodes a header and its options, copying option data.
    pub fn decode(buf: &[u8]) -> Result<Self, GeneveError> {
        Self::decode_with_offset(buf).map(|(header, _)| header)
    }

    /// Decodes a header and returns the offset of the payload trailing it.
    pub fn decode_with_offset(buf: &[u8]) -> Result<(Self, usize), GeneveError> {
        let (view, _) = GeneveHeaderView::parse(buf)?;
        let header = view.to_owned_header()?;
        Ok((header, view.header_len()))
    }

    /// Decodes a header and returns the payload slice trailing it.
    pub fn decode_with_payload(buf: &[u8]) -> Result<(Self, &[u8]), GeneveError> {
        let (view, payload) = GeneveHeaderView::parse(buf)?;
        Ok((view.to_owned_header()?, payload))
    }

    /// True when `critical` matches whether any option is critical.
    ///
    /// Neither encode nor decode performs this check.
    pub fn critical_flag_consistent(&self) -> bool {
        self.critical == self.options.iter().any(|opt| opt.critical)
    }

    /// Returns a string representation of flags
    pub fn flags_string(&self) -> String {
        flags_string(self.oam, self.critical)
    }
}

fn flags_string(oam: bool, critical: bool) -> String {
    match (oam, critical) {
        (false, false) => "none".to_string(),
        (true, false) => "O".to_string(),
        (false, true) => "C".to_string(),
        (true, true) => "OC".to_string(),
    }
}

impl fmt::Display for GeneveHeader {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Geneve v{} vni={} proto={}(0x{:04x}) opt_len={} flags={}",
            self.version,
            self.vni,
            self.protocol_type,
            self.protocol_type.get(),
            self.wire_len() - HEADER_LEN,
            self.flags_string()
        )?;

        if !self.options.is_empty() {
            write!(f, " options={}", self.options.len())?;
        }

        Ok(())
    }
}

/// Zero-copy view of a Geneve header: the fixed wire header plus the raw
/// option region, both borrowing the parsed buffer.
#[derive(Debug, Clone, Copy)]
pub struct GeneveHeaderView<'a> {
    header: &'a RawGeneveHeader,
    options: &'a [u8],
}

impl<'a> GeneveHeaderView<'a> {
    /// Parses the fixed header and splits off the option region it
    /// advertises. Returns the view and the payload.
    ///
    /// Options are not decoded until iterated.
    pub fn parse(buf: &'a [u8]) -> Result<(Self, &'a [u8]), GeneveError> {
        let (header, options, payload) = RawGeneveHeader::split_prefix(buf)?;
        Ok((GeneveHeaderView { header, options }, payload))
    }

    #[inline]
    pub fn raw(&self) -> &'a RawGeneveHeader {
        self.header
    }

    /// Returns the raw option region
    #[inline]
    pub fn options(&self) -> &'a [u8] {
        self.options
    }

    #[inline]
    pub fn has_options(&self) -> bool {
        !self.options.is_empty()
    }

    /// Returns an iterator over the Geneve options
    pub fn options_iter(&self) -> OptionsIter<'a> {
        OptionsIter::new(self.options)
    }

    /// Decodes every option and builds the owned header.
    pub fn to_owned_header(&self) -> Result<GeneveHeader, GeneveError> {
        let options = self
            .options_iter()
            .map(|opt| opt.map(|opt| opt.to_owned_option()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(GeneveHeader {
            version: self.version(),
            oam: self.is_oam(),
            critical: self.is_critical(),
            protocol_type: self.protocol_type(),
            vni: Vni(self.vni()),
            options,
        })
    }
}

impl Deref for GeneveHeaderView<'_> {
    type Target = RawGeneveHeader;

    #[inline]
    fn deref(&self) -> &Self::Target {
        self.header
    }
}

impl fmt::Display for GeneveHeaderView<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Geneve v{} vni={} proto={}(0x{:04x}) opt_len={} flags={}",
            self.version(),
            self.vni(),
            self.protocol_type(),
            self.protocol_type().get(),
            self.options_len(),
            flags_string(self.is_oam(), self.is_critical())
        )?;

        if self.has_options() {
            write!(f, " options={}", self.options_iter().count())?;
        }

        Ok(())
    }
}
