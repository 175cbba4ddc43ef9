//! Geneve (Generic Network Virtualization Encapsulation) header codec
//!
//! This crate marshals and unmarshals Geneve headers as described in
//! draft-ietf-nvo3-geneve §3.4–3.5 (published as RFC 8926). It converts between
//! an in-memory [`GeneveHeader`] with zero or more variable-length
//! [`GeneveOption`]s and the exact bytes that precede an encapsulated
//! Ethernet frame (or other PDU) in a virtual-network overlay.
//!
//! The codec is pure: it performs no I/O and keeps no state. Encoding
//! returns a freshly allocated buffer; decoding reads its input and copies
//! option data out of it. [`GeneveHeaderView`] and [`GeneveOptionRef`] offer
//! zero-copy decoding tied to the lifetime of the input instead.
//!
//! # Key characteristics
//!
//! - Fixed header: 8 bytes
//! - VNI (Virtual Network Identifier): 24 bits
//! - Variable-length options: 0-252 bytes (in 4-byte multiples)
//! - Option data: 0-124 bytes (in 4-byte multiples)
//! - Version: must be 0
//! - Typically encapsulates Ethernet frames (protocol type 0x6558)
//!
//! # Examples
//!
//! ```
//! use geneve::{GeneveHeader, GeneveOption, ProtocolType, Vni};
//!
//! let header = GeneveHeader {
//!     protocol_type: ProtocolType::ETHERNET,
//!     vni: Vni(100),
//!     options: vec![GeneveOption::new(0x0102, 0x01, vec![0xde, 0xad, 0xbe, 0xef])],
//!     ..Default::default()
//! };
//!
//! let mut packet = header.encode().unwrap();
//! packet.extend_from_slice(b"inner frame");
//!
//! let (decoded, offset) = GeneveHeader::decode_with_offset(&packet).unwrap();
//! assert_eq!(decoded, header);
//! assert_eq!(&packet[offset..], b"inner frame");
//! ```

pub mod error;
pub mod header;
pub mod macros;
pub mod option;
pub mod protocol;
pub mod vni;
pub mod wire;

pub use error::GeneveError;
pub use header::{
    is_geneve_port, GeneveHeader, GeneveHeaderView, GENEVE_UDP_PORT, HEADER_LEN,
    MAX_OPTIONS_LEN, VERSION,
};
pub use option::{
    GeneveOption, GeneveOptionRef, OptionsIter, MAX_OPTION_DATA_LEN, MAX_OPTION_LEN_WORDS,
    MAX_OPTION_TYPE, OPTION_HEADER_LEN,
};
pub use protocol::{ProtocolType, PROTOCOL_TYPE_ETHERNET};
pub use vni::{Vni, MAX_VNI};
