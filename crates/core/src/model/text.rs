//! Fixed-size character buffer conversion

use std::ffi::c_char;

use super::ModelError;

/// Decode a NUL-terminated buffer.
///
/// Stops at the first NUL, or at the end of the buffer if the library filled
/// it completely. Invalid UTF-8 is replaced rather than rejected.
pub fn decode(buf: &[c_char]) -> String {
    let bytes: Vec<u8> = buf.iter().take_while(|&&c| c != 0).map(|&c| c as u8).collect();
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Encode `value` into `buf`, NUL-terminated and zero-padded.
///
/// Fails without touching `buf` if `value` needs more than `buf.len() - 1`
/// bytes or contains a NUL.
pub fn encode(buf: &mut [c_char], value: &str, field: &'static str) -> Result<(), ModelError> {
    let bytes = value.as_bytes();
    if bytes.contains(&0) {
        return Err(ModelError::InteriorNul { field });
    }
    let max = buf.len().saturating_sub(1);
    if bytes.len() > max {
        return Err(ModelError::TextTooLong {
            field,
            len: bytes.len(),
            max,
        });
    }
    for (dst, &src) in buf.iter_mut().zip(bytes) {
        *dst = src as c_char;
    }
    buf[bytes.len()..].fill(0);
    Ok(())
}

/// Encode `value` into a fresh buffer of width `N`
pub fn to_buffer<const N: usize>(value: &str, field: &'static str) -> Result<[c_char; N], ModelError> {
    let mut buf = [0; N];
    encode(&mut buf, value, field)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_up_to_width_minus_one() {
        let mut buf = [0 as c_char; 8];
        for len in 0..8 {
            let value = "x".repeat(len);
            encode(&mut buf, &value, "test").unwrap();
            assert_eq!(decode(&buf), value);
        }
    }

    #[test]
    fn test_too_long_fails() {
        let mut buf = [0 as c_char; 8];
        encode(&mut buf, "keep", "test").unwrap();

        let err = encode(&mut buf, "12345678", "test").unwrap_err();
        assert_eq!(
            err,
            ModelError::TextTooLong {
                field: "test",
                len: 8,
                max: 7
            }
        );
        // Buffer is left untouched on failure
        assert_eq!(decode(&buf), "keep");
    }

    #[test]
    fn test_shorter_value_clears_tail() {
        let mut buf = [0 as c_char; 16];
        encode(&mut buf, "a longer value", "test").unwrap();
        encode(&mut buf, "short", "test").unwrap();
        assert_eq!(decode(&buf), "short");
        assert!(buf[5..].iter().all(|&c| c == 0));
    }

    #[test]
    fn test_multibyte_length_counts_bytes() {
        let mut buf = [0 as c_char; 4];
        // "é" is two bytes in UTF-8
        encode(&mut buf, "éa", "test").unwrap();
        assert_eq!(decode(&buf), "éa");
        assert!(encode(&mut buf, "éé", "test").is_err());
    }

    #[test]
    fn test_interior_nul_fails() {
        let mut buf = [0 as c_char; 8];
        assert_eq!(
            encode(&mut buf, "a\0b", "test"),
            Err(ModelError::InteriorNul { field: "test" })
        );
    }

    #[test]
    fn test_decode_unterminated() {
        let buf = [b'a' as c_char, b'b' as c_char, b'c' as c_char];
        assert_eq!(decode(&buf), "abc");
    }

    #[test]
    fn test_to_buffer() {
        let buf: [c_char; 6] = to_buffer("level", "key").unwrap();
        assert_eq!(decode(&buf), "level");
        assert!(to_buffer::<5>("level", "key").is_err());
    }
}
