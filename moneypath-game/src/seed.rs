//! Reversible replay-code scheme over the deterministic seed.
//! Code format: MP-<WORD><NN>, e.g., MP-GOLD42, MP-BUDGET07

fn fnv1a64(bytes: &[u8]) -> u64 {
    const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0100_0000_01b3;
    let mut hash = FNV_OFFSET;
    for b in bytes {
        hash = (hash ^ u64::from(*b)).wrapping_mul(FNV_PRIME);
    }
    hash
}

fn sanitize_word(word: &str) -> String {
    word.chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

const CODE_PREFIX: &str = "MP";

// Word list for replay codes
pub const WORD_LIST: [&str; 32] = [
    "COIN", "SALARY", "BUDGET", "WANTS", "NEEDS", "RENT", "GOLD", "SIP", "INDEX", "DEPOSIT",
    "SAVER", "SPENDER", "BONUS", "WALLET", "PIGGY", "LEDGER", "STREAK", "SCORE", "MARKET",
    "COMPOUND", "INTEREST", "FUND", "CAREER", "STREAM", "MONTH", "EVENT", "FINE", "GIG", "FEST",
    "LOAN", "EMERGENCY", "GOAL",
];

#[inline]
fn pack(word_index: u16, nn: u8) -> u16 {
    word_index & 0x001F | ((u16::from(nn) & 0x7F) << 5)
}

#[inline]
fn unpack(packed: u16) -> (u16, u8) {
    (packed & 0x001F, ((packed >> 5) & 0x7F) as u8)
}

fn compose_seed(word_index: u16, nn: u8) -> u64 {
    let packed = pack(word_index, nn);
    // Domain-separated FNV input
    let mut buf = [0u8; 9];
    buf[..6].copy_from_slice(b"MPATH-");
    buf[6] = (packed & 0xFF) as u8;
    buf[7] = (packed >> 8) as u8;
    buf[8] = 0x5A;
    let h = fnv1a64(&buf);
    (h & 0xFFFF_FFFF_FFFF_F000) | u64::from(packed)
}

#[must_use]
pub fn encode_replay_code(seed: u64) -> String {
    let packed = (seed & 0x0FFF) as u16;
    let (wi, mut nn) = unpack(packed);
    let word = WORD_LIST.get(wi as usize).copied().unwrap_or("COIN");
    if nn > 99 {
        nn %= 100;
    }
    format!("{CODE_PREFIX}-{word}{nn:02}")
}

#[must_use]
pub fn decode_replay_code(code: &str) -> Option<u64> {
    let s = code.trim();
    let (prefix, rest) = s.split_once('-')?;
    if !prefix.eq_ignore_ascii_case(CODE_PREFIX) {
        return None;
    }
    if rest.len() < 3 {
        return None;
    }
    let (word_part, nn_part) = rest.split_at(rest.len() - 2);
    let nn: u8 = nn_part.parse().ok()?;
    let word = sanitize_word(word_part);
    let idx = WORD_LIST.iter().position(|w| sanitize_word(w) == word)?;
    let wi = u16::try_from(idx).ok()?;
    Some(compose_seed(wi, nn))
}

#[must_use]
pub fn generate_code_from_entropy(entropy: u64) -> String {
    let wi = u16::try_from(entropy % WORD_LIST.len() as u64).unwrap_or(0);
    let nn = ((entropy >> 13) % 100) as u8;
    let seed = compose_seed(wi, nn);
    encode_replay_code(seed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_decode_roundtrips_code() {
        let seed = decode_replay_code("MP-GOLD42").unwrap();
        let code = encode_replay_code(seed);
        assert_eq!(code, "MP-GOLD42");
    }

    #[test]
    fn decode_is_case_and_space_tolerant() {
        let canonical = decode_replay_code("MP-PIGGY07").unwrap();
        assert_eq!(decode_replay_code(" mp-piggy07 "), Some(canonical));
    }

    #[test]
    fn bad_codes_are_rejected() {
        assert!(decode_replay_code("XX-GOLD42").is_none());
        assert!(decode_replay_code("MP-GOLD").is_none());
        assert!(decode_replay_code("MP-UNLISTED42").is_none());
        assert!(decode_replay_code("MPGOLD42").is_none());
    }

    #[test]
    fn entropy_codes_stay_decodable() {
        for entropy in [0_u64, 1, 0xDEAD_BEEF, u64::MAX] {
            let code = generate_code_from_entropy(entropy);
            let seed = decode_replay_code(&code).expect("generated code decodes");
            assert_eq!(encode_replay_code(seed), code);
        }
    }
}
