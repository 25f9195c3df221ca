use crate::error::{HexLayer, Result, StashError};

/// Decodes hex text (either case) into bytes.
pub fn decode(layer: HexLayer, text: impl AsRef<[u8]>) -> Result<Vec<u8>> {
    hex::decode(text).map_err(|source| StashError::InvalidHex { layer, source })
}

/// Encodes bytes as lowercase hex, two characters per byte.
pub fn encode(bytes: impl AsRef<[u8]>) -> String {
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use quickcheck_macros::quickcheck;

    use super::{decode, encode};
    use crate::error::{HexLayer, StashError};

    #[test]
    fn encode_is_lowercase_two_chars_per_byte() {
        assert_eq!(encode([0x00u8, 0xab, 0x7f, 0xff]), "00ab7fff");
        assert_eq!(encode(b""), "");
    }

    #[test]
    fn decode_accepts_mixed_case() {
        assert_eq!(decode(HexLayer::Blob, "aBcD").unwrap(), vec![0xab, 0xcd]);
    }

    #[test]
    fn decode_rejects_odd_length() {
        let err = decode(HexLayer::ItemPayload, "abc").unwrap_err();
        assert!(matches!(
            err,
            StashError::InvalidHex {
                layer: HexLayer::ItemPayload,
                source: hex::FromHexError::OddLength,
            }
        ));
    }

    #[test]
    fn decode_rejects_non_hex_characters() {
        let err = decode(HexLayer::Blob, "0g").unwrap_err();
        assert!(matches!(
            err,
            StashError::InvalidHex {
                layer: HexLayer::Blob,
                ..
            }
        ));
    }

    #[quickcheck]
    fn bytes_survive_hex_round_trip(bytes: Vec<u8>) -> bool {
        decode(HexLayer::Blob, encode(&bytes)).unwrap() == bytes
    }

    #[quickcheck]
    fn hex_text_normalizes_to_lowercase(bytes: Vec<u8>) -> bool {
        let upper = encode(&bytes).to_ascii_uppercase();
        let decoded = decode(HexLayer::Blob, &upper).unwrap();
        encode(decoded) == upper.to_ascii_lowercase()
    }
}
