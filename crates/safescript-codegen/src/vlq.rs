//! Base-64 VLQ, the relative-offset encoding of source map segments.
//!
//! Each value is sign-folded into its lowest bit, then emitted five bits per
//! base-64 digit, least significant group first, with bit 6 of every digit
//! but the last set as a continuation flag.

use crate::error::{MappingError, MappingResult};

const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
const SHIFT: u32 = 5;
const CONTINUATION: u32 = 1 << SHIFT;
const MASK: u32 = CONTINUATION - 1;

/// Append the encoding of `value` to `out`.
pub fn encode_value(value: i64, out: &mut String) {
    let mut folded: u64 = if value < 0 {
        (value.unsigned_abs() << 1) | 1
    } else {
        (value as u64) << 1
    };
    loop {
        let mut digit = (folded & u64::from(MASK)) as u32;
        folded >>= SHIFT;
        if folded > 0 {
            digit |= CONTINUATION;
        }
        out.push(ALPHABET[digit as usize] as char);
        if folded == 0 {
            break;
        }
    }
}

/// Encode a whole segment.
pub fn encode(values: &[i64]) -> String {
    let mut out = String::new();
    for &value in values {
        encode_value(value, &mut out);
    }
    out
}

/// Decode every value of one segment.
pub fn decode(segment: &str) -> MappingResult<Vec<i64>> {
    let mut values = Vec::new();
    let mut accum: u64 = 0;
    let mut shift: u32 = 0;
    let mut pending = false;

    for ch in segment.chars() {
        let digit = digit_value(ch)?;
        if shift >= 60 {
            return Err(MappingError::Overflow(segment.to_string()));
        }
        accum |= u64::from(digit & MASK) << shift;
        if digit & CONTINUATION != 0 {
            shift += SHIFT;
            pending = true;
            continue;
        }
        let magnitude = (accum >> 1) as i64;
        values.push(if accum & 1 == 1 { -magnitude } else { magnitude });
        accum = 0;
        shift = 0;
        pending = false;
    }

    if pending {
        return Err(MappingError::TruncatedVlq(segment.to_string()));
    }
    Ok(values)
}

fn digit_value(ch: char) -> MappingResult<u32> {
    let value = match ch {
        'A'..='Z' => ch as u32 - 'A' as u32,
        'a'..='z' => ch as u32 - 'a' as u32 + 26,
        '0'..='9' => ch as u32 - '0' as u32 + 52,
        '+' => 62,
        '/' => 63,
        _ => return Err(MappingError::InvalidBase64(ch)),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_encodings() {
        assert_eq!(encode(&[0]), "A");
        assert_eq!(encode(&[1]), "C");
        assert_eq!(encode(&[-1]), "D");
        assert_eq!(encode(&[15]), "e");
        assert_eq!(encode(&[16]), "gB");
        assert_eq!(encode(&[0, 0, 0, 0]), "AAAA");
        assert_eq!(encode(&[4, 0, 1, -3]), "IACH");
    }

    #[test]
    fn decodes_multi_digit_values() {
        assert_eq!(decode("gB").unwrap(), vec![16]);
        assert_eq!(decode("IACH").unwrap(), vec![4, 0, 1, -3]);
        assert_eq!(decode("2HwcrxB").unwrap(), vec![123, 456, -789]);
    }

    #[test]
    fn large_values_survive() {
        for value in [1_000_000, -65_536, i64::from(u32::MAX)] {
            assert_eq!(decode(&encode(&[value])).unwrap(), vec![value]);
        }
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(decode("A!"), Err(MappingError::InvalidBase64('!'))));
        assert!(matches!(decode("g"), Err(MappingError::TruncatedVlq(_))));
        assert!(decode("").unwrap().is_empty());
    }
}
