//! Bit position resolution for register fields.
//!
//! SVD offers three mutually exclusive encodings of a field's position. They
//! are tried in priority order:
//!
//! 1. `<bitOffset>` + `<bitWidth>`
//! 2. `<lsb>` + `<msb>`
//! 3. `<bitRange>[msb:lsb]</bitRange>`

use tracing::warn;

use crate::error::SvdError;
use crate::literal::decode_integer;
use crate::node::{optional_text, single_child_by_tag, Node};
use crate::options::DecodeOptions;

/// Position of a field inside its register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct BitRange {
    /// Least significant bit.
    pub bit_offset: u32,
    /// Number of bits covered.
    pub bit_width: u32,
}

impl BitRange {
    /// Build a range from its inclusive `lsb..=msb` bounds.
    pub fn from_lsb_msb(field: &str, lsb: u32, msb: u32) -> Result<Self, SvdError> {
        if msb < lsb {
            return Err(SvdError::InvertedBitRange {
                field: field.to_string(),
                lsb,
                msb,
            });
        }
        Ok(BitRange {
            bit_offset: lsb,
            bit_width: msb - lsb + 1,
        })
    }

    /// Most significant bit, absent for a zero-width range at offset 0.
    pub fn msb(&self) -> Option<u32> {
        self.bit_offset.checked_add(self.bit_width)?.checked_sub(1)
    }
}

/// Resolve the bit range of a `<field>` node.
///
/// An encoding counts only when all of its parts are present; a field without
/// any complete encoding yields `None`. Only the first complete encoding is
/// decoded. With [`DecodeOptions::reject_ambiguous_bit_ranges`], declaring
/// more than one fails instead.
pub fn resolve<N: Node>(
    node: &N,
    field: &str,
    options: &DecodeOptions,
) -> Result<Option<BitRange>, SvdError> {
    let declared = declared_encodings(node);
    if declared > 1 {
        if options.reject_ambiguous_bit_ranges {
            return Err(SvdError::AmbiguousBitRange {
                field: field.to_string(),
            });
        }
        warn!(field, encodings = declared, "several bit range encodings, using the first");
    }

    if let Some((bit_offset, bit_width)) = int_pair(node, "bitOffset", "bitWidth")? {
        return Ok(Some(BitRange {
            bit_offset,
            bit_width,
        }));
    }
    if let Some((lsb, msb)) = int_pair(node, "lsb", "msb")? {
        return BitRange::from_lsb_msb(field, lsb, msb).map(Some);
    }
    if let Some(text) = optional_text(node, "bitRange")? {
        let (lsb, msb) = parse_bit_range(&text)?;
        return BitRange::from_lsb_msb(field, lsb, msb).map(Some);
    }
    Ok(None)
}

/// Decode a two-element encoding, only when both elements are present.
fn int_pair<N: Node>(node: &N, first: &str, second: &str) -> Result<Option<(u32, u32)>, SvdError> {
    match (
        single_child_by_tag(node, first)?,
        single_child_by_tag(node, second)?,
    ) {
        (Some(a), Some(b)) => Ok(Some((
            decode_integer(first, a.text_content())?,
            decode_integer(second, b.text_content())?,
        ))),
        _ => Ok(None),
    }
}

/// Number of encodings whose elements are all present, without decoding them.
fn declared_encodings<N: Node>(node: &N) -> usize {
    let has = |tag: &str| node.child_nodes().any(|child| child.node_name() == tag);
    [
        has("bitOffset") && has("bitWidth"),
        has("lsb") && has("msb"),
        has("bitRange"),
    ]
    .iter()
    .filter(|declared| **declared)
    .count()
}

/// Parse `[msb:lsb]` into `(lsb, msb)`. Decimal only.
fn parse_bit_range(text: &str) -> Result<(u32, u32), SvdError> {
    let malformed = || SvdError::MalformedIntegerLiteral {
        tag: "bitRange".to_string(),
        text: text.to_string(),
    };
    let (msb, lsb) = text
        .trim()
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .and_then(|inner| inner.split_once(':'))
        .ok_or_else(malformed)?;
    let decimal = |part: &str| -> Result<u32, SvdError> {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        part.parse().map_err(|_| malformed())
    };
    Ok((decimal(lsb)?, decimal(msb)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use svd_xml::Element;

    fn field(body: &str) -> Element {
        svd_xml::parse(&format!("<field><name>F</name>{body}</field>")).expect("parse field")
    }

    fn resolve_default(body: &str) -> Result<Option<BitRange>, SvdError> {
        resolve(&field(body), "F", &DecodeOptions::default())
    }

    #[test]
    fn three_encodings_agree() {
        let expected = BitRange {
            bit_offset: 0,
            bit_width: 8,
        };
        let a = resolve_default("<bitOffset>0</bitOffset><bitWidth>8</bitWidth>").unwrap();
        let b = resolve_default("<lsb>0</lsb><msb>7</msb>").unwrap();
        let c = resolve_default("<bitRange>[7:0]</bitRange>").unwrap();
        assert_eq!(a, Some(expected));
        assert_eq!(b, Some(expected));
        assert_eq!(c, Some(expected));
        assert_eq!(expected.msb(), Some(7));
    }

    #[test]
    fn msb_is_offset_plus_width_minus_one() {
        let range = resolve_default("<bitOffset>0x4</bitOffset><bitWidth>3</bitWidth>")
            .unwrap()
            .unwrap();
        assert_eq!(range.msb(), Some(6));
        let range = resolve_default("<bitRange>[31:16]</bitRange>").unwrap().unwrap();
        assert_eq!(range.bit_offset, 16);
        assert_eq!(range.bit_width, 16);
        assert_eq!(range.msb(), Some(31));
    }

    #[test]
    fn partial_encodings_fall_through() {
        let range = resolve_default("<bitOffset>3</bitOffset><lsb>1</lsb><msb>2</msb>")
            .unwrap()
            .unwrap();
        assert_eq!(range.bit_offset, 1);
        assert_eq!(range.bit_width, 2);
        assert_eq!(resolve_default("<bitWidth>3</bitWidth><msb>2</msb>").unwrap(), None);
        assert_eq!(resolve_default("").unwrap(), None);
    }

    #[test]
    fn priority_order_wins_unless_strict() {
        let body = "<bitRange>[3:2]</bitRange><lsb>0</lsb><msb>0</msb>";
        let range = resolve_default(body).unwrap().unwrap();
        assert_eq!(range.bit_offset, 0);
        assert_eq!(range.bit_width, 1);

        let err = resolve(&field(body), "F", &DecodeOptions::strict()).unwrap_err();
        assert_eq!(err, SvdError::AmbiguousBitRange { field: "F".into() });
    }

    #[test]
    fn first_complete_encoding_stops_search() {
        let range = resolve_default(
            "<bitOffset>0</bitOffset><bitWidth>8</bitWidth><bitRange>7..0</bitRange>",
        )
        .unwrap();
        assert_eq!(
            range,
            Some(BitRange {
                bit_offset: 0,
                bit_width: 8,
            })
        );
        let range =
            resolve_default("<bitOffset>2</bitOffset><bitWidth>1</bitWidth><lsb>zero</lsb><msb>7</msb>")
                .unwrap();
        assert_eq!(range.map(|r| r.bit_offset), Some(2));
        let range = resolve_default("<lsb>0</lsb><msb>7</msb><bitRange>[0x7:0]</bitRange>").unwrap();
        assert_eq!(range.and_then(|r| r.msb()), Some(7));
        let range = resolve_default("<bitOffset>x</bitOffset><lsb>4</lsb><msb>5</msb>").unwrap();
        assert_eq!(range.map(|r| r.bit_width), Some(2));

        let body = "<bitOffset>0</bitOffset><bitWidth>8</bitWidth><bitRange>7..0</bitRange>";
        let err = resolve(&field(body), "F", &DecodeOptions::strict()).unwrap_err();
        assert_eq!(err, SvdError::AmbiguousBitRange { field: "F".into() });
    }

    #[test]
    fn malformed_inputs_fail() {
        let err = resolve_default("<bitRange>7:0</bitRange>").unwrap_err();
        assert!(matches!(err, SvdError::MalformedIntegerLiteral { ref tag, .. } if tag == "bitRange"));
        let err = resolve_default("<bitRange>[0x7:0]</bitRange>").unwrap_err();
        assert!(matches!(err, SvdError::MalformedIntegerLiteral { .. }));
        let err = resolve_default("<bitOffset>x</bitOffset><bitWidth>1</bitWidth>").unwrap_err();
        assert!(matches!(err, SvdError::MalformedIntegerLiteral { ref tag, .. } if tag == "bitOffset"));
        let err = resolve_default("<lsb>4</lsb><msb>3</msb>").unwrap_err();
        assert!(matches!(err, SvdError::InvertedBitRange { lsb: 4, msb: 3, .. }));
        let err = resolve_default("<lsb>1</lsb><lsb>2</lsb>").unwrap_err();
        assert!(matches!(err, SvdError::MultipleElements { .. }));
    }

    #[test]
    fn zero_width_has_no_msb() {
        let range = BitRange {
            bit_offset: 0,
            bit_width: 0,
        };
        assert_eq!(range.msb(), None);
    }
}
