//! `dim`/`dimIncrement` array expansion shared by peripherals and registers.

use tracing::{trace, warn};

use crate::error::SvdError;
use crate::node::{optional_int, Node};

/// Array templating attributes of a peripheral or register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimSpec {
    /// Number of instances.
    pub dim: u32,
    /// Address stride between consecutive instances.
    pub increment: u64,
}

impl Default for DimSpec {
    fn default() -> Self {
        DimSpec {
            dim: 1,
            increment: 0,
        }
    }
}

impl DimSpec {
    /// Read `dim` and `dimIncrement`, defaulting to a single instance.
    pub fn from_node<N: Node>(node: &N) -> Result<Self, SvdError> {
        let defaults = DimSpec::default();
        Ok(DimSpec {
            dim: optional_int(node, "dim")?.unwrap_or(defaults.dim),
            increment: optional_int(node, "dimIncrement")?.unwrap_or(defaults.increment),
        })
    }
}

/// Largest accepted `dim`. Each instance is a full copy of its template.
pub const MAX_DIM: u32 = 1 << 16;

/// One concrete instance of a templated declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    pub index: u32,
    pub name: String,
    pub address: u64,
}

/// Expand `template` into `spec.dim` instances starting at `base`.
///
/// Instance `i` is named `format_name(template, i)` and placed at
/// `base + i * spec.increment`. A `dim` above [`MAX_DIM`] is rejected before
/// anything is allocated.
pub fn expand(
    tag: &'static str,
    template: &str,
    base: u64,
    spec: DimSpec,
) -> Result<Vec<Instance>, SvdError> {
    if spec.dim > MAX_DIM {
        return Err(SvdError::DimTooLarge {
            tag,
            name: template.to_string(),
            dim: spec.dim,
            max: MAX_DIM,
        });
    }
    if spec.dim == 0 {
        warn!(tag, name = template, "dim is zero, element expands to nothing");
    }
    (0..spec.dim)
        .map(|index| -> Result<Instance, SvdError> {
            let address = u64::from(index)
                .checked_mul(spec.increment)
                .and_then(|step| base.checked_add(step))
                .ok_or_else(|| SvdError::AddressOverflow {
                    tag,
                    name: template.to_string(),
                    index,
                })?;
            let name = format_name(template, index);
            trace!(tag, name = %name, address, "expanded instance");
            Ok(Instance {
                index,
                name,
                address,
            })
        })
        .collect()
}

/// Substitute the first `%s` placeholder of `template` with `index`.
///
/// `%%` produces a literal percent sign; any other `%` sequence is copied
/// unchanged.
pub fn format_name(template: &str, index: u32) -> String {
    let mut out = String::with_capacity(template.len() + 2);
    let mut substituted = false;
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('s') if !substituted => {
                chars.next();
                out.push_str(&index.to_string());
                substituted = true;
            }
            Some('%') => {
                chars.next();
                out.push('%');
            }
            _ => out.push('%'),
        }
    }
    out
}
