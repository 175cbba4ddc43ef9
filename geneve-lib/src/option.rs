//! Geneve option codec
//!
//! A Geneve option is a Type-Length-Value element carried between the fixed
//! header and the encapsulated payload. Each option is a 4-byte header
//! followed by up to 31 words of data.
//!
//! [`GeneveOption`] owns its data and is what [`GeneveHeader`](crate::GeneveHeader)
//! stores. [`GeneveOptionRef`] is the borrowing counterpart: its `data`
//! references the input buffer and lives exactly as long as it does.
//!
//! # Examples
//!
//! ```
//! use geneve::GeneveOption;
//!
//! let opt = GeneveOption::new(0x0001, 0x02, vec![0, 1, 2, 3]).with_critical(true);
//! let bytes = opt.encode().unwrap();
//! assert_eq!(bytes, [0x00, 0x01, 0x82, 0x01, 0, 1, 2, 3]);
//!
//! let decoded = GeneveOption::decode(&bytes).unwrap();
//! assert_eq!(decoded, opt);
//! ```

use std::fmt::{self, Display, Formatter};
use std::iter::FusedIterator;

use serde::{Deserialize, Serialize};
use zerocopy::IntoBytes;

use crate::error::GeneveError;
use crate::wire::{RawOptionHeader, WireHeader};

/// Length of an option header in bytes.
pub const OPTION_HEADER_LEN: usize = 4;

/// Maximum value of the 7-bit option type.
pub const MAX_OPTION_TYPE: u8 = (1 << 7) - 1;

/// Maximum value of the 5-bit option length field, in 4-byte words.
pub const MAX_OPTION_LEN_WORDS: u8 = (1 << 5) - 1;

/// Maximum option data length in bytes (31 * 4 = 124).
pub const MAX_OPTION_DATA_LEN: usize = MAX_OPTION_LEN_WORDS as usize * 4;

/// A Geneve option with owned data.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GeneveOption {
    /// Namespace for the `option_type` field.
    pub class: u16,
    /// Receivers that do not understand a critical option must drop the packet.
    pub critical: bool,
    /// Format of `data` within `class` (7 bits).
    pub option_type: u8,
    /// Option payload; its length must be a multiple of 4, at most 124.
    pub data: Vec<u8>,
}

impl GeneveOption {
    pub fn new(class: u16, option_type: u8, data: impl Into<Vec<u8>>) -> Self {
        GeneveOption {
            class,
            critical: false,
            option_type,
            data: data.into(),
        }
    }

    pub fn with_critical(mut self, critical: bool) -> Self {
        self.critical = critical;
        self
    }

    /// Number of bytes this option occupies on the wire.
    #[inline]
    pub fn wire_len(&self) -> usize {
        OPTION_HEADER_LEN + self.data.len()
    }

    /// Validates the option and returns its data length in words.
    fn length_words(&self) -> Result<u8, GeneveError> {
        let len = self.data.len();
        if len % 4 != 0 {
            return Err(GeneveError::InvalidOptionDataLength(len));
        }
        if self.option_type > MAX_OPTION_TYPE {
            return Err(GeneveError::InvalidOptionType(self.option_type));
        }
        if len / 4 > MAX_OPTION_LEN_WORDS as usize {
            return Err(GeneveError::InvalidOptionLength(len));
        }
        Ok((len / 4) as u8)
    }

    /// Allocates a buffer and encodes the option into it.
    pub fn encode(&self) -> Result<Vec<u8>, GeneveError> {
        let mut buf = Vec::with_capacity(self.wire_len());
        self.encode_into(&mut buf)?;
        Ok(buf)
    }

    /// Appends the encoded option to `buf`. Nothing is appended on error.
    pub fn encode_into(&self, buf: &mut Vec<u8>) -> Result<(), GeneveError> {
        let words = self.length_words()?;
        let header = RawOptionHeader::new(self.class, self.critical, self.option_type, words);
        buf.extend_from_slice(header.as_bytes());
        buf.extend_from_slice(&self.data);
        Ok(())
    }

    /// Decodes an option from the front of `buf`, copying its data.
    ///
    /// `buf` must be a multiple of 4 bytes long, even though only the
    /// option header and its declared data are consumed.
    pub fn decode(buf: &[u8]) -> Result<Self, GeneveError> {
        GeneveOptionRef::decode(buf).map(|opt| opt.to_owned_option())
    }

    /// Borrows this option as a [`GeneveOptionRef`].
    pub fn as_option_ref(&self) -> GeneveOptionRef<'_> {
        GeneveOptionRef {
            class: self.class,
            critical: self.critical,
            option_type: self.option_type,
            data: &self.data,
        }
    }
}

impl Display for GeneveOption {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.as_option_ref(), f)
    }
}

/// A Geneve option whose data borrows the decoded buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GeneveOptionRef<'a> {
    pub class: u16,
    pub critical: bool,
    pub option_type: u8,
    pub data: &'a [u8],
}

impl<'a> GeneveOptionRef<'a> {
    /// Decodes an option from the front of `buf` without copying.
    ///
    /// Applies the same checks, in the same order, as [`GeneveOption::decode`].
    pub fn decode(buf: &'a [u8]) -> Result<Self, GeneveError> {
        if buf.len() < OPTION_HEADER_LEN {
            return Err(GeneveError::UnexpectedEof {
                what: RawOptionHeader::NAME,
                needed: OPTION_HEADER_LEN,
                available: buf.len(),
            });
        }

        if buf.len() % 4 != 0 {
            return Err(GeneveError::InvalidOptionLength(buf.len()));
        }

        let (header, data, _) = RawOptionHeader::split_prefix(buf)?;

        Ok(GeneveOptionRef {
            class: header.class(),
            critical: header.is_critical(),
            option_type: header.option_type(),
            data,
        })
    }

    #[inline]
    pub fn wire_len(&self) -> usize {
        OPTION_HEADER_LEN + self.data.len()
    }

    pub fn to_owned_option(&self) -> GeneveOption {
        GeneveOption {
            class: self.class,
            critical: self.critical,
            option_type: self.option_type,
            data: self.data.to_vec(),
        }
    }
}

impl Display for GeneveOptionRef<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GeneveOpt class=0x{:04x} type=0x{:02x}{} len={}",
            self.class,
            self.option_type,
            if self.critical { "(C)" } else { "" },
            self.data.len()
        )
    }
}

/// Iterator over the options of a 4-aligned option region.
///
/// Yields each option in wire order. After an error it yields nothing more.
#[derive(Debug, Clone)]
pub struct OptionsIter<'a> {
    data: &'a [u8],
    offset: usize,
    failed: bool,
}

impl<'a> OptionsIter<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        OptionsIter {
            data,
            offset: 0,
            failed: false,
        }
    }

    /// Bytes consumed by the options yielded so far.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl<'a> Iterator for OptionsIter<'a> {
    type Item = Result<GeneveOptionRef<'a>, GeneveError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.data.len() {
            return None;
        }

        match GeneveOptionRef::decode(&self.data[self.offset..]) {
            Ok(option) => {
                self.offset += option.wire_len();
                Some(Ok(option))
            }
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

impl FusedIterator for OptionsIter<'_> {}
