//! `derivedFrom` resolution: merging a peripheral with an earlier one.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::error::SvdError;
use crate::model::{AddressBlock, Peripheral, Register};

/// The part of a peripheral declaration that can be inherited.
///
/// `name` and `baseAddress` always come from the deriving peripheral.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inheritable {
    pub version: Option<String>,
    pub description: Option<String>,
    pub group_name: Option<String>,
    pub address_blocks: Vec<AddressBlock>,
    pub registers: Vec<Register>,
}

/// Merge `own` declarations over `base`.
///
/// Scalars: own value, else base value. Lists: a copy of base's list followed
/// by own entries, never deduplicated.
pub fn merge(own: Inheritable, base: Option<&Peripheral>) -> Inheritable {
    let Some(base) = base else {
        return own;
    };
    let mut address_blocks = base.address_blocks.clone();
    address_blocks.extend(own.address_blocks);
    let mut registers = base.registers.clone();
    registers.extend(own.registers);
    Inheritable {
        version: own.version.or_else(|| base.version.clone()),
        description: own.description.or_else(|| base.description.clone()),
        group_name: own.group_name.or_else(|| base.group_name.clone()),
        address_blocks,
        registers,
    }
}

/// Peripherals built so far, in document order, with a name index.
#[derive(Debug, Default)]
pub struct PeripheralRegistry {
    peripherals: Vec<Peripheral>,
    by_name: HashMap<String, usize>,
}

impl PeripheralRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.peripherals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peripherals.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Peripheral> {
        self.by_name.get(name).map(|&idx| &self.peripherals[idx])
    }

    /// Look up the base of `peripheral`, if it declares one.
    pub fn resolve(
        &self,
        peripheral: &str,
        derived_from: Option<&str>,
    ) -> Result<Option<&Peripheral>, SvdError> {
        let Some(base_name) = derived_from else {
            return Ok(None);
        };
        let base = self
            .get(base_name)
            .ok_or_else(|| SvdError::UnresolvedDerivation {
                peripheral: peripheral.to_string(),
                derived_from: base_name.to_string(),
            })?;
        debug!(peripheral, base = base_name, "resolved derivedFrom");
        Ok(Some(base))
    }

    /// Append a built peripheral. A repeated name keeps the index on the
    /// first occurrence.
    pub fn push(&mut self, peripheral: Peripheral) {
        let idx = self.peripherals.len();
        if self.by_name.contains_key(&peripheral.name) {
            warn!(peripheral = %peripheral.name, "duplicate peripheral name");
        } else {
            self.by_name.insert(peripheral.name.clone(), idx);
        }
        self.peripherals.push(peripheral);
    }

    pub fn into_peripherals(self) -> Vec<Peripheral> {
        self.peripherals
    }
}
