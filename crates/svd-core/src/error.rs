use thiserror::Error;

/// Error type produced while decoding an SVD tree into a [`crate::Device`].
///
/// Every variant aborts the whole decode; there is no partial device.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SvdError {
    /// A node handed to a decoder has an unexpected tag name.
    #[error("cannot build {expected} from a <{found}> element")]
    WrongElementKind { expected: &'static str, found: String },
    /// A singleton child element appears more than once.
    #[error("more than one <{tag}> element in <{parent}>")]
    MultipleElements { tag: String, parent: String },
    /// A mandatory child element is absent.
    #[error("missing required <{tag}> element in <{parent}>")]
    MissingRequiredField { tag: String, parent: String },
    /// Numeric text is neither decimal nor `0x`-prefixed hexadecimal.
    #[error("malformed integer literal {text:?} in <{tag}>")]
    MalformedIntegerLiteral { tag: String, text: String },
    /// Boolean text is neither `true` nor `false`.
    #[error("malformed boolean literal {text:?} in <{tag}>")]
    MalformedBooleanLiteral { tag: String, text: String },
    /// `derivedFrom` names a peripheral that was not built earlier in the document.
    #[error("peripheral {peripheral} derives from unknown peripheral {derived_from}")]
    UnresolvedDerivation {
        peripheral: String,
        derived_from: String,
    },
    /// A field carries more than one complete bit position encoding.
    #[error("field {field} declares more than one bit range encoding")]
    AmbiguousBitRange { field: String },
    /// `msb` lies below `lsb`.
    #[error("field {field} has msb {msb} below lsb {lsb}")]
    InvertedBitRange { field: String, lsb: u32, msb: u32 },
    /// Dimension expansion pushed an address past the 64-bit range.
    #[error("address of <{tag}> {name} instance {index} overflows")]
    AddressOverflow {
        tag: &'static str,
        name: String,
        index: u32,
    },
    /// `dim` asks for more instances than [`crate::dim::MAX_DIM`].
    #[error("<{tag}> {name} has dim {dim}, above the limit of {max}")]
    DimTooLarge {
        tag: &'static str,
        name: String,
        dim: u32,
        max: u32,
    },
}
