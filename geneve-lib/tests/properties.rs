use geneve::{
    GeneveError, GeneveHeader, GeneveOption, ProtocolType, Vni, MAX_OPTIONS_LEN,
    MAX_OPTION_DATA_LEN, MAX_OPTION_TYPE, MAX_VNI, VERSION,
};
use proptest::collection::vec;
use proptest::prelude::*;

fn arb_option() -> impl Strategy<Value = GeneveOption> {
    (
        any::<u16>(),
        any::<bool>(),
        0..=MAX_OPTION_TYPE,
        (0..=MAX_OPTION_DATA_LEN / 4).prop_flat_map(|words| vec(any::<u8>(), words * 4)),
    )
        .prop_map(|(class, critical, option_type, data)| GeneveOption {
            class,
            critical,
            option_type,
            data,
        })
}

/// Option lists whose encoded length fits the 6-bit header field.
fn arb_options() -> impl Strategy<Value = Vec<GeneveOption>> {
    vec(arb_option(), 0..6).prop_map(|mut options| {
        while options.iter().map(GeneveOption::wire_len).sum::<usize>() > MAX_OPTIONS_LEN {
            options.pop();
        }
        options
    })
}

fn arb_header() -> impl Strategy<Value = GeneveHeader> {
    (
        any::<bool>(),
        any::<bool>(),
        any::<u16>(),
        0..=MAX_VNI,
        arb_options(),
    )
        .prop_map(|(oam, critical, proto, vni, options)| GeneveHeader {
            version: VERSION,
            oam,
            critical,
            protocol_type: ProtocolType::from(proto),
            vni: Vni(vni),
            options,
        })
}

proptest! {
    #[test]
    fn option_round_trip(option in arb_option()) {
        let bytes = option.encode().unwrap();
        prop_assert_eq!(bytes.len(), option.wire_len());
        prop_assert_eq!(GeneveOption::decode(&bytes).unwrap(), option);
    }

    #[test]
    fn header_round_trip(header in arb_header()) {
        let bytes = header.encode().unwrap();
        prop_assert_eq!(bytes.len(), header.wire_len());
        prop_assert_eq!(GeneveHeader::decode(&bytes).unwrap(), header);
    }

    #[test]
    fn payload_offset_is_header_length(
        header in arb_header(),
        payload in vec(any::<u8>(), 0..64),
    ) {
        let mut packet = header.encode().unwrap();
        let header_len = packet.len();
        packet.extend_from_slice(&payload);

        let (decoded, offset) = GeneveHeader::decode_with_offset(&packet).unwrap();
        prop_assert_eq!(offset, header_len);
        prop_assert_eq!(&packet[offset..], &payload[..]);
        prop_assert_eq!(decoded, header);
    }

    #[test]
    fn header_reserved_bits_ignored(
        header in arb_header(),
        flags_rsvd in 0u8..=0x3f,
        vni_rsvd in any::<u8>(),
    ) {
        let mut bytes = header.encode().unwrap();
        bytes[1] |= flags_rsvd;
        bytes[7] |= vni_rsvd;
        prop_assert_eq!(GeneveHeader::decode(&bytes).unwrap(), header);
    }

    #[test]
    fn option_reserved_bits_ignored(option in arb_option(), rsvd in 0u8..8) {
        let mut bytes = option.encode().unwrap();
        bytes[3] |= rsvd << 5;
        prop_assert_eq!(GeneveOption::decode(&bytes).unwrap(), option);
    }

    #[test]
    fn oversize_option_type_rejected(option in arb_option(), option_type in (MAX_OPTION_TYPE + 1)..=u8::MAX) {
        let option = GeneveOption { option_type, ..option };
        prop_assert_eq!(option.encode(), Err(GeneveError::InvalidOptionType(option_type)));
    }

    #[test]
    fn unaligned_option_data_rejected(len in (0usize..256).prop_filter("unaligned", |len| len % 4 != 0)) {
        let option = GeneveOption::new(0, 0, vec![0; len]);
        prop_assert_eq!(option.encode(), Err(GeneveError::InvalidOptionDataLength(len)));
    }

    #[test]
    fn oversize_option_data_rejected(words in 32usize..64) {
        let option = GeneveOption::new(0, 0, vec![0; words * 4]);
        prop_assert_eq!(option.encode(), Err(GeneveError::InvalidOptionLength(words * 4)));
    }

    #[test]
    fn invalid_version_rejected(header in arb_header(), version in 1u8..=u8::MAX) {
        let header = GeneveHeader { version, ..header };
        prop_assert_eq!(header.encode(), Err(GeneveError::InvalidVersion(version)));
    }

    #[test]
    fn invalid_vni_rejected(header in arb_header(), vni in (MAX_VNI + 1)..=u32::MAX) {
        let header = GeneveHeader { vni: Vni(vni), ..header };
        prop_assert_eq!(header.encode(), Err(GeneveError::InvalidVni(vni)));
    }

    #[test]
    fn truncated_header_rejected(header in arb_header(), cut in 1usize..8) {
        let bytes = header.encode().unwrap();
        let truncated = &bytes[..bytes.len().saturating_sub(cut)];
        prop_assert!(GeneveHeader::decode(truncated).unwrap_err().is_unexpected_eof());
    }
}
