//! Protocol types carried after a Geneve header
//!
//! The Geneve Protocol Type field follows the Ethertype convention. The
//! codec treats it as opaque: every 16-bit value round-trips unchanged.
//! Well-known values have named constants and human-readable names.
//!
//! # Examples
//!
//! ```
//! use geneve::ProtocolType;
//!
//! assert_eq!(ProtocolType::ETHERNET.get(), 0x6558);
//! assert_eq!(format!("{}", ProtocolType::ETHERNET), "ethernet");
//! assert_eq!(format!("{}", ProtocolType::from(0x1234)), "0x1234");
//!
//! let proto: ProtocolType = "mpls-uc".parse().unwrap();
//! assert_eq!(proto, ProtocolType::MPLS_UC);
//! assert!(!ProtocolType::from(0x1234).is_known());
//! ```

use zerocopy::byteorder::{BigEndian, U16};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

crate::protocol_constants! {
    ProtocolType, U16<BigEndian>, u16, default = ETHERNET:
        /// Transparent Ethernet bridging: an Ethernet frame follows the header.
        ETHERNET = 0x6558;
        IPV4 = 0x0800;
        ARP = 0x0806;
        IPV6 = 0x86DD;
        MPLS_UC = 0x8847;
        MPLS_MC = 0x8848;
        /// Network Service Header (RFC 8300)
        NSH = 0x894F;
}

/// Protocol type for an encapsulated Ethernet frame.
pub const PROTOCOL_TYPE_ETHERNET: ProtocolType = ProtocolType::ETHERNET;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_type_constants() {
        assert_eq!(PROTOCOL_TYPE_ETHERNET.get(), 0x6558);
        assert_eq!(ProtocolType::IPV4.get(), 0x0800);
        assert_eq!(ProtocolType::IPV6.get(), 0x86DD);
        assert_eq!(ProtocolType::default(), ProtocolType::ETHERNET);
    }

    #[test]
    fn test_protocol_type_is_opaque() {
        let proto = ProtocolType::from(0xBEEF);
        assert!(!proto.is_known());
        assert_eq!(proto.name(), None);
        assert_eq!(u16::from(proto), 0xBEEF);
        assert_eq!(proto.as_bytes(), &[0xBE, 0xEF]);
    }

    #[test]
    fn test_protocol_type_display() {
        assert_eq!(ProtocolType::ETHERNET.to_string(), "ethernet");
        assert_eq!(ProtocolType::MPLS_MC.to_string(), "mpls-mc");
        assert_eq!(ProtocolType::from(0x0001).to_string(), "0x0001");
    }

    #[test]
    fn test_protocol_type_from_str() {
        assert_eq!("ethernet".parse::<ProtocolType>(), Ok(ProtocolType::ETHERNET));
        assert_eq!("0x6558".parse::<ProtocolType>(), Ok(ProtocolType::ETHERNET));
        assert_eq!("0XBEEF".parse::<ProtocolType>(), Ok(ProtocolType::from(0xBEEF)));
        assert!("0xZZ".parse::<ProtocolType>().is_err());
        assert!("bogus".parse::<ProtocolType>().is_err());
    }

    #[cfg(not(feature = "protocol_names"))]
    #[test]
    fn test_protocol_type_serde_integer() {
        assert_eq!(serde_json::to_string(&ProtocolType::ETHERNET).unwrap(), "25944");
        assert_eq!(serde_json::to_string(&ProtocolType::from(0x1234)).unwrap(), "4660");

        let proto: ProtocolType = serde_json::from_str("4660").unwrap();
        assert_eq!(proto, ProtocolType::from(0x1234));
        assert!(serde_json::from_str::<ProtocolType>("\"ethernet\"").is_err());
        assert!(serde_json::from_str::<ProtocolType>("65536").is_err());
    }

    #[cfg(feature = "protocol_names")]
    #[test]
    fn test_protocol_type_serde_names() {
        assert_eq!(
            serde_json::to_string(&ProtocolType::ETHERNET).unwrap(),
            "\"ethernet\""
        );
        assert_eq!(
            serde_json::to_string(&ProtocolType::MPLS_UC).unwrap(),
            "\"mpls-uc\""
        );
        assert_eq!(
            serde_json::to_string(&ProtocolType::from(0x1234)).unwrap(),
            "\"0x1234\""
        );

        let proto: ProtocolType = serde_json::from_str("\"ipv6\"").unwrap();
        assert_eq!(proto, ProtocolType::IPV6);
        let proto: ProtocolType = serde_json::from_str("\"0x1234\"").unwrap();
        assert_eq!(proto, ProtocolType::from(0x1234));
        assert!(serde_json::from_str::<ProtocolType>("\"bogus\"").is_err());
        assert!(serde_json::from_str::<ProtocolType>("25944").is_err());
    }
}
