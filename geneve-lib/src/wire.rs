//! Zero-copy wire layouts
//!
//! Both codecs read and write bytes exclusively through the packed structs
//! in this module. Accessors mask and shift the raw big-endian words;
//! constructors mask their inputs to the width of each field and always
//! leave reserved bits zero.
//!
//! # Geneve Header Format
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |Ver|  Opt Len  |O|C|    Rsvd.  |          Protocol Type        |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |        Virtual Network Identifier (VNI)       |    Reserved   |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                                                               |
//! ~                    Variable-Length Options                    ~
//! |                                                               |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! # Geneve Option Format
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |          Option Class         |C|    Type     |R|R|R| Length  |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                  Variable-Length Option Data                  |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```

use std::mem;

use zerocopy::byteorder::{BigEndian, U16, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Ref, Unaligned};

use crate::error::GeneveError;
use crate::protocol::ProtocolType;

/// A fixed-size wire prefix followed by a variable part whose length the
/// prefix itself declares.
pub trait WireHeader: FromBytes + KnownLayout + Immutable + Unaligned + Sized {
    const NAME: &'static str;
    const FIXED_LEN: usize = mem::size_of::<Self>();

    /// Length of the fixed prefix plus the variable part it declares.
    fn total_len(&self) -> usize;

    /// Splits `buf` into the fixed prefix, the declared variable part, and
    /// whatever trails it.
    #[inline]
    fn split_prefix(buf: &[u8]) -> Result<(&Self, &[u8], &[u8]), GeneveError> {
        let (header_ref, rest) =
            Ref::<_, Self>::from_prefix(buf).map_err(|_| GeneveError::UnexpectedEof {
                what: Self::NAME,
                needed: Self::FIXED_LEN,
                available: buf.len(),
            })?;
        let header = Ref::into_ref(header_ref);

        let total_len = header.total_len();
        let variable_len = total_len - Self::FIXED_LEN;
        if rest.len() < variable_len {
            return Err(GeneveError::UnexpectedEof {
                what: Self::NAME,
                needed: total_len,
                available: buf.len(),
            });
        }

        let (variable, trailer) = rest.split_at(variable_len);
        Ok((header, variable, trailer))
    }
}

/// Fixed 8-byte Geneve header as it appears on the wire.
#[repr(C, packed)]
#[derive(FromBytes, IntoBytes, Unaligned, Debug, Clone, Copy, KnownLayout, Immutable)]
pub struct RawGeneveHeader {
    ver_optlen_flags: U16<BigEndian>,
    protocol_type: ProtocolType,
    vni_reserved: U32<BigEndian>,
}

impl RawGeneveHeader {
    const VERSION_MASK: u16 = 0xC000;
    const VERSION_SHIFT: u16 = 14;
    const OPTLEN_MASK: u16 = 0x3F00;
    const OPTLEN_SHIFT: u16 = 8;
    const FLAG_O_MASK: u16 = 0x0080;
    const FLAG_C_MASK: u16 = 0x0040;
    const RESERVED_MASK: u16 = 0x003F;

    const VNI_MASK: u32 = 0xFFFFFF00;
    const VNI_SHIFT: u32 = 8;
    const VNI_RESERVED_MASK: u32 = 0x000000FF;

    /// Builds a header with every reserved bit cleared. Inputs wider than
    /// their field are truncated to it.
    pub fn new(
        version: u8,
        options_len_words: u8,
        oam: bool,
        critical: bool,
        protocol_type: ProtocolType,
        vni: u32,
    ) -> Self {
        let mut word = ((version as u16) << Self::VERSION_SHIFT) & Self::VERSION_MASK;
        word |= ((options_len_words as u16) << Self::OPTLEN_SHIFT) & Self::OPTLEN_MASK;
        if oam {
            word |= Self::FLAG_O_MASK;
        }
        if critical {
            word |= Self::FLAG_C_MASK;
        }

        RawGeneveHeader {
            ver_optlen_flags: U16::new(word),
            protocol_type,
            vni_reserved: U32::new((vni << Self::VNI_SHIFT) & Self::VNI_MASK),
        }
    }

    /// Returns the version field (2 bits)
    #[inline]
    pub fn version(&self) -> u8 {
        ((self.ver_optlen_flags.get() & Self::VERSION_MASK) >> Self::VERSION_SHIFT) as u8
    }

    /// Returns the options length in 4-byte units (6 bits)
    #[inline]
    pub fn options_len_words(&self) -> u8 {
        ((self.ver_optlen_flags.get() & Self::OPTLEN_MASK) >> Self::OPTLEN_SHIFT) as u8
    }

    /// Returns the options length in bytes
    #[inline]
    pub fn options_len(&self) -> usize {
        self.options_len_words() as usize * 4
    }

    /// Check if the O (OAM) flag is set
    ///
    /// When set, the packet carries a control message instead of a data payload.
    #[inline]
    pub fn is_oam(&self) -> bool {
        self.ver_optlen_flags.get() & Self::FLAG_O_MASK != 0
    }

    /// Check if the C (critical options present) flag is set
    #[inline]
    pub fn is_critical(&self) -> bool {
        self.ver_optlen_flags.get() & Self::FLAG_C_MASK != 0
    }

    /// Returns the six reserved bits following the flags
    #[inline]
    pub fn reserved_flags(&self) -> u8 {
        (self.ver_optlen_flags.get() & Self::RESERVED_MASK) as u8
    }

    #[inline]
    pub fn protocol_type(&self) -> ProtocolType {
        self.protocol_type
    }

    /// Returns the Virtual Network Identifier (VNI) - 24 bits
    #[inline]
    pub fn vni(&self) -> u32 {
        (self.vni_reserved.get() & Self::VNI_MASK) >> Self::VNI_SHIFT
    }

    /// Returns the reserved byte after the VNI
    #[inline]
    pub fn reserved_vni(&self) -> u8 {
        (self.vni_reserved.get() & Self::VNI_RESERVED_MASK) as u8
    }

    /// Returns the total header length including options
    #[inline]
    pub fn header_len(&self) -> usize {
        Self::FIXED_LEN + self.options_len()
    }

    /// True when neither reserved field carries a set bit.
    #[inline]
    pub fn reserved_bits_clear(&self) -> bool {
        self.reserved_flags() == 0 && self.reserved_vni() == 0
    }
}

impl WireHeader for RawGeneveHeader {
    const NAME: &'static str = "GeneveHeader";

    #[inline]
    fn total_len(&self) -> usize {
        self.header_len()
    }
}

/// Fixed 4-byte Geneve option header as it appears on the wire.
#[repr(C, packed)]
#[derive(FromBytes, IntoBytes, Unaligned, Debug, Clone, Copy, KnownLayout, Immutable)]
pub struct RawOptionHeader {
    class: U16<BigEndian>,
    crit_type: u8,
    rsvd_len: u8,
}

impl RawOptionHeader {
    const FLAG_C_MASK: u8 = 0x80;
    const TYPE_MASK: u8 = 0x7F;
    const RESERVED_MASK: u8 = 0xE0;
    const RESERVED_SHIFT: u8 = 5;
    const LENGTH_MASK: u8 = 0x1F;

    /// Builds an option header with the reserved bits cleared. `option_type`
    /// and `length_words` are truncated to 7 and 5 bits.
    pub fn new(class: u16, critical: bool, option_type: u8, length_words: u8) -> Self {
        let mut crit_type = option_type & Self::TYPE_MASK;
        if critical {
            crit_type |= Self::FLAG_C_MASK;
        }

        RawOptionHeader {
            class: U16::new(class),
            crit_type,
            rsvd_len: length_words & Self::LENGTH_MASK,
        }
    }

    #[inline]
    pub fn class(&self) -> u16 {
        self.class.get()
    }

    #[inline]
    pub fn is_critical(&self) -> bool {
        self.crit_type & Self::FLAG_C_MASK != 0
    }

    /// Returns the option type without the critical bit
    #[inline]
    pub fn option_type(&self) -> u8 {
        self.crit_type & Self::TYPE_MASK
    }

    /// Returns the data length in 4-byte units (5 bits)
    #[inline]
    pub fn length_words(&self) -> u8 {
        self.rsvd_len & Self::LENGTH_MASK
    }

    #[inline]
    pub fn data_len(&self) -> usize {
        self.length_words() as usize * 4
    }

    /// Returns the three reserved bits preceding the length
    #[inline]
    pub fn reserved_bits(&self) -> u8 {
        (self.rsvd_len & Self::RESERVED_MASK) >> Self::RESERVED_SHIFT
    }
}

impl WireHeader for RawOptionHeader {
    const NAME: &'static str = "GeneveOption";

    #[inline]
    fn total_len(&self) -> usize {
        Self::FIXED_LEN + self.data_len()
    }
}
