use thiserror::Error;

/// Errors produced while encoding or decoding Geneve headers and options.
///
/// Encoding errors are reported before any byte is returned; decoding
/// errors leave no partially populated value behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeneveError {
    /// The header version is not [`VERSION`](crate::VERSION).
    #[error("invalid version {0} in header")]
    InvalidVersion(u8),

    /// The VNI does not fit in 24 bits.
    #[error("invalid VNI {0:#x} in header")]
    InvalidVni(u32),

    /// The option type does not fit in 7 bits.
    #[error("invalid option type {0:#x}")]
    InvalidOptionType(u8),

    /// On encode, the option data exceeds 31 words. On decode, the input
    /// buffer length is not a multiple of 4.
    #[error("invalid option length {0}")]
    InvalidOptionLength(usize),

    /// The option data length is not a multiple of 4.
    #[error("option data length {0} must be multiple of 4")]
    InvalidOptionDataLength(usize),

    /// The encoded option vector does not fit the 6-bit header length field.
    #[error("options length {0} exceeds {max} bytes", max = crate::MAX_OPTIONS_LEN)]
    InvalidOptionsLength(usize),

    /// The input ended before a complete header, option, or option data.
    #[error("unexpected end of input reading {what}: need {needed} bytes, have {available}")]
    UnexpectedEof {
        what: &'static str,
        needed: usize,
        available: usize,
    },
}

impl GeneveError {
    /// Returns true for the short-read kind.
    #[inline]
    pub fn is_unexpected_eof(&self) -> bool {
        matches!(self, Self::UnexpectedEof { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            GeneveError::InvalidVersion(1).to_string(),
            "invalid version 1 in header"
        );
        assert_eq!(
            GeneveError::InvalidVni(0x1000000).to_string(),
            "invalid VNI 0x1000000 in header"
        );
        assert_eq!(
            GeneveError::InvalidOptionsLength(256).to_string(),
            "options length 256 exceeds 252 bytes"
        );

        let eof = GeneveError::UnexpectedEof {
            what: "GeneveHeader",
            needed: 8,
            available: 7,
        };
        assert_eq!(
            eof.to_string(),
            "unexpected end of input reading GeneveHeader: need 8 bytes, have 7"
        );
    }

    #[test]
    fn test_is_unexpected_eof() {
        let eof = GeneveError::UnexpectedEof {
            what: "GeneveOption",
            needed: 4,
            available: 3,
        };
        assert!(eof.is_unexpected_eof());
        assert!(!GeneveError::InvalidOptionLength(5).is_unexpected_eof());
    }
}
