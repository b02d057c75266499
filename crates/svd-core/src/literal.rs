//! Integer and boolean literal decoding for SVD text content.

use tracing::warn;

use crate::error::SvdError;

/// Decode a decimal or `0x`/`0X`-prefixed hexadecimal literal.
///
/// Signs, octal and other radix prefixes are rejected, as are values that do
/// not fit `T`.
pub fn decode_integer<T: TryFrom<u64>>(tag: &str, text: &str) -> Result<T, SvdError> {
    let malformed = || SvdError::MalformedIntegerLiteral {
        tag: tag.to_string(),
        text: text.to_string(),
    };
    let trimmed = text.trim();
    let (digits, radix) = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) => (hex, 16),
        None => (trimmed, 10),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(malformed());
    }
    let value = u64::from_str_radix(digits, radix).map_err(|_| malformed())?;
    T::try_from(value).map_err(|_| malformed())
}

/// Decode a case-insensitive `true`/`false` literal.
///
/// With `lenient` set, any other text decodes to `false`.
pub fn decode_boolean(tag: &str, text: &str, lenient: bool) -> Result<bool, SvdError> {
    let trimmed = text.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if trimmed.eq_ignore_ascii_case("false") {
        Ok(false)
    } else if lenient {
        warn!(tag, text = trimmed, "unrecognized boolean literal, using false");
        Ok(false)
    } else {
        Err(SvdError::MalformedBooleanLiteral {
            tag: tag.to_string(),
            text: text.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_accept_decimal_and_hex() {
        assert_eq!(decode_integer::<u64>("size", "32").unwrap(), 32);
        assert_eq!(decode_integer::<u64>("size", "0x20").unwrap(), 32);
        assert_eq!(decode_integer::<u64>("size", "0X2f").unwrap(), 47);
        assert_eq!(decode_integer::<u64>("size", " 7 ").unwrap(), 7);
        assert_eq!(
            decode_integer::<u64>("baseAddress", "0xFFFFFFFFFFFFFFFF").unwrap(),
            u64::MAX
        );
    }

    #[test]
    fn integers_reject_other_forms() {
        for text in ["", "0x", "+5", "-1", "#10", "0b101", "12abc", "0xZZ", "1_000"] {
            let err = decode_integer::<u64>("offset", text).unwrap_err();
            assert!(
                matches!(err, SvdError::MalformedIntegerLiteral { .. }),
                "{text:?} should be rejected"
            );
        }
    }

    #[test]
    fn integers_respect_target_width() {
        let err = decode_integer::<u32>("size", "0x100000000").unwrap_err();
        assert_eq!(
            err,
            SvdError::MalformedIntegerLiteral {
                tag: "size".into(),
                text: "0x100000000".into(),
            }
        );
    }

    #[test]
    fn booleans_are_case_insensitive() {
        assert!(decode_boolean("mpuPresent", "TRUE", false).unwrap());
        assert!(decode_boolean("mpuPresent", "true", false).unwrap());
        assert!(!decode_boolean("mpuPresent", "False", false).unwrap());
    }

    #[test]
    fn unknown_boolean_depends_on_leniency() {
        let err = decode_boolean("fpuPresent", "1", false).unwrap_err();
        assert!(matches!(err, SvdError::MalformedBooleanLiteral { .. }));
        assert!(!decode_boolean("fpuPresent", "yes", true).unwrap());
    }
}
