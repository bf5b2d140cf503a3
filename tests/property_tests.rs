use proptest::prelude::*;

use qr_codec::config::Version;
use qr_codec::imaging;
use qr_codec::reedsolomon::{rs_decode, rs_encode};
use qr_codec::{generate_qr_code, read_qr_code, EncodeError};


proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn roundtrip_any_alphanumeric_text(text in "[A-Z0-9 $%*+./:-]{0,47}") {
        let symbol = generate_qr_code(&text).unwrap();
        let version = Version::for_text_len(text.len());
        prop_assert_eq!(symbol.dimensions(), (version.dimensions(), version.dimensions()));
        prop_assert!(imaging::is_binary(&symbol));
        prop_assert_eq!(read_qr_code(&symbol).unwrap(), text);
    }

    #[test]
    fn roundtrip_scaled_symbols(text in "[A-Z0-9 $%*+./:-]{0,47}", factor in 1u32..12) {
        let symbol = imaging::scale(&generate_qr_code(&text).unwrap(), factor);
        prop_assert_eq!(read_qr_code(&symbol).unwrap(), text);
    }

    #[test]
    fn lowercase_text_is_rejected(text in "[A-Z]{0,5}[a-z][A-Z]{0,5}") {
        prop_assert!(matches!(generate_qr_code(&text), Err(EncodeError::InvalidInput(_))));
    }

    #[test]
    fn single_byte_error_is_corrected(
        data in prop::collection::vec(any::<u8>(), 19),
        position in 0usize..26,
        error in 1u8..=255,
    ) {
        let ecc = rs_encode(&data, 7);
        let mut block: Vec<u8> = data.iter().chain(ecc.iter()).cloned().collect();
        block[position] ^= error;
        prop_assert_eq!(rs_decode(&block[..19], &block[19..]).unwrap(), data);
    }
}
