use sha2::{Digest, Sha256};

const BASE58_ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";
const BECH32_CHARSET: &str = "qpzry9x8gf2tvdw0s3jn54khce6mua7l";

/// Local escrow address check, independent of remote trust.
///
/// Accepts Base58Check pay-to-pubkey-hash / pay-to-script-hash
/// addresses (version 0x00/0x05, double-SHA256 checksum verified) and
/// native segwit `bc1...` addresses (charset and length only). A
/// failing address is not an error state; the contract is simply shown
/// without derived status text.
pub struct EscrowVerifier;

impl EscrowVerifier {
    pub fn verify(address: &str) -> bool {
        if address.starts_with("bc1") {
            return Self::verify_bech32(address);
        }
        Self::verify_base58check(address)
    }

    fn verify_base58check(address: &str) -> bool {
        if address.len() < 26 || address.len() > 35 {
            return false;
        }

        let payload = match Self::base58_decode(address) {
            Some(p) => p,
            None => return false,
        };
        // version byte + 20-byte hash + 4-byte checksum
        if payload.len() != 25 {
            return false;
        }
        if payload[0] != 0x00 && payload[0] != 0x05 {
            return false;
        }

        let checksum = &payload[21..];
        let digest = Sha256::digest(Sha256::digest(&payload[..21]));
        checksum == &digest[..4]
    }

    fn verify_bech32(address: &str) -> bool {
        if address.len() < 14 || address.len() > 74 {
            return false;
        }
        // mixed case is invalid in bech32
        let has_lower = address.chars().any(|c| c.is_ascii_lowercase());
        let has_upper = address.chars().any(|c| c.is_ascii_uppercase());
        if has_lower && has_upper {
            return false;
        }

        let lower = address.to_ascii_lowercase();
        lower[3..].chars().all(|c| BECH32_CHARSET.contains(c))
    }

    fn base58_decode(input: &str) -> Option<Vec<u8>> {
        let mut bytes: Vec<u8> = vec![0];
        for c in input.chars() {
            let digit = BASE58_ALPHABET.find(c)? as u32;
            let mut carry = digit;
            for byte in bytes.iter_mut().rev() {
                carry += (*byte as u32) * 58;
                *byte = (carry & 0xff) as u8;
                carry >>= 8;
            }
            while carry > 0 {
                bytes.insert(0, (carry & 0xff) as u8);
                carry >>= 8;
            }
        }

        // leading '1's encode leading zero bytes
        let leading_zeros = input.chars().take_while(|&c| c == '1').count();
        let stripped: Vec<u8> = bytes.into_iter().skip_while(|&b| b == 0).collect();
        let mut out = vec![0u8; leading_zeros];
        out.extend(stripped);
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_p2pkh_address() {
        assert!(EscrowVerifier::verify("1BvBMSEYstWetqTFn5Au4m4GFg7xJaNVN2"));
    }

    #[test]
    fn test_valid_p2sh_address() {
        assert!(EscrowVerifier::verify("3J98t1WpEZ73CNmQviecrnyiWrnqRhWNLy"));
    }

    #[test]
    fn test_valid_bech32_address() {
        assert!(EscrowVerifier::verify(
            "bc1qar0srrr7xfkvy5l643lydnw9re59gtzzwf5mdq"
        ));
    }

    #[test]
    fn test_corrupted_checksum_rejected() {
        // last character flipped
        assert!(!EscrowVerifier::verify("1BvBMSEYstWetqTFn5Au4m4GFg7xJaNVN3"));
    }

    #[test]
    fn test_invalid_base58_characters_rejected() {
        // 'O' and 'l' are not in the base58 alphabet
        assert!(!EscrowVerifier::verify("1OvBMSEYstWetqTFn5Au4m4GFg7xJaNVN2"));
    }

    #[test]
    fn test_mixed_case_bech32_rejected() {
        assert!(!EscrowVerifier::verify(
            "bc1Qar0srrr7xfkvy5l643lydnw9re59gtzzwf5mdq"
        ));
    }

    #[test]
    fn test_empty_and_garbage_rejected() {
        assert!(!EscrowVerifier::verify(""));
        assert!(!EscrowVerifier::verify("not-an-address"));
    }
}
