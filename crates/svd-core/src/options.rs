/// Switches controlling how strictly a document is decoded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct DecodeOptions {
    /// Decode unrecognized boolean text as `false` instead of failing.
    pub lenient_booleans: bool,
    /// Fail when a field provides more than one complete bit position
    /// encoding instead of taking the first in priority order.
    pub reject_ambiguous_bit_ranges: bool,
}

impl DecodeOptions {
    /// Options that never fail on recoverable oddities.
    pub fn lenient() -> Self {
        DecodeOptions {
            lenient_booleans: true,
            reject_ambiguous_bit_ranges: false,
        }
    }

    /// Options that reject every ambiguous or malformed construct.
    pub fn strict() -> Self {
        DecodeOptions {
            lenient_booleans: false,
            reject_ambiguous_bit_ranges: true,
        }
    }
}
