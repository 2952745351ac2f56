use crate::domain::address::Address;
use sha3::{Digest, Keccak256};

pub const ADD_TRANSACTION_SIGNATURE: &str =
    "addTransaction(address,address,uint256,uint256,bytes)";

const WORD: usize = 32;

/// Wraps method calldata as the RLP list `[calldata, leader_only]` carried in `data`.
pub fn serialize_call(calldata: &[u8], leader_only: bool) -> Vec<u8> {
    let mut payload = rlp_bytes(calldata);
    payload.push(u8::from(leader_only));
    let mut out = rlp_header(payload.len(), 0xc0);
    out.extend(payload);
    out
}

/// ABI-encoded `addTransaction` call on the consensus contract.
pub fn encode_add_transaction(
    sender: &Address,
    recipient: &Address,
    initial_validators: u64,
    max_rotations: u64,
    data: &[u8],
) -> Vec<u8> {
    let mut out = selector(ADD_TRANSACTION_SIGNATURE).to_vec();
    out.extend(address_word(sender));
    out.extend(address_word(recipient));
    out.extend(uint_word(initial_validators));
    out.extend(uint_word(max_rotations));
    // Head is five words; the dynamic `bytes` tail starts right after it.
    out.extend(uint_word((5 * WORD) as u64));
    out.extend(uint_word(data.len() as u64));
    out.extend_from_slice(data);
    let padding = (WORD - data.len() % WORD) % WORD;
    out.resize(out.len() + padding, 0);
    out
}

pub fn selector(signature: &str) -> [u8; 4] {
    let hash = Keccak256::digest(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

fn address_word(address: &Address) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[WORD - 20..].copy_from_slice(&address.to_bytes());
    word
}

fn uint_word(value: u64) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[WORD - 8..].copy_from_slice(&value.to_be_bytes());
    word
}

fn rlp_bytes(bytes: &[u8]) -> Vec<u8> {
    if bytes.len() == 1 && bytes[0] < 0x80 {
        return bytes.to_vec();
    }
    let mut out = rlp_header(bytes.len(), 0x80);
    out.extend_from_slice(bytes);
    out
}

fn rlp_header(len: usize, offset: u8) -> Vec<u8> {
    if len < 56 {
        return vec![offset + len as u8];
    }
    let len_bytes: Vec<u8> = len
        .to_be_bytes()
        .into_iter()
        .skip_while(|b| *b == 0)
        .collect();
    let mut out = vec![offset + 55 + len_bytes.len() as u8];
    out.extend(len_bytes);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_matches_known_erc20_transfer() {
        assert_eq!(selector("transfer(address,uint256)"), [0xa9, 0x05, 0x9c, 0xbb]);
    }

    #[test]
    fn test_short_call_serialization() {
        assert_eq!(serialize_call(&[0x01], false), vec![0xc2, 0x01, 0x00]);
        assert_eq!(serialize_call(&[0x16, 0x04], true), vec![0xc4, 0x82, 0x16, 0x04, 0x01]);
    }

    #[test]
    fn test_long_call_uses_length_prefix() {
        let calldata = vec![0xaa; 60];
        let serialized = serialize_call(&calldata, false);
        // Item: 0xb8 0x3c + 60 bytes; list payload is 63 bytes.
        assert_eq!(&serialized[..4], &[0xf8, 0x3f, 0xb8, 0x3c]);
        assert_eq!(serialized.len(), 2 + 63);
        assert_eq!(*serialized.last().unwrap(), 0x00);
    }

    #[test]
    fn test_add_transaction_layout() {
        let sender = Address::parse("0x3333333333333333333333333333333333333333").unwrap();
        let recipient = Address::parse("0x1111111111111111111111111111111111111111").unwrap();
        let data = vec![0xc2, 0x01, 0x00];
        let encoded = encode_add_transaction(&sender, &recipient, 5, 3, &data);

        assert_eq!(&encoded[..4], &selector(ADD_TRANSACTION_SIGNATURE));
        let word = |i: usize| &encoded[4 + i * WORD..4 + (i + 1) * WORD];
        assert_eq!(&word(0)[12..], &[0x33; 20]);
        assert_eq!(&word(1)[12..], &[0x11; 20]);
        assert_eq!(word(2)[31], 5);
        assert_eq!(word(3)[31], 3);
        assert_eq!(word(4)[31], 160);
        assert_eq!(word(5)[31], 3);
        assert_eq!(&word(6)[..3], &data[..]);
        assert!(word(6)[3..].iter().all(|b| *b == 0));
        assert_eq!(encoded.len(), 4 + 7 * WORD);
    }
}
