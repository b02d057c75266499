//! Immutable device model produced by the decoder.

use crate::bitrange::BitRange;

/// Root of a decoded SVD document.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[non_exhaustive]
pub struct Device {
    pub vendor: Option<String>,
    pub vendor_id: Option<String>,
    pub name: Option<String>,
    pub series: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
    pub license_text: Option<String>,
    /// Bits per addressable unit, usually 8.
    pub address_unit_bits: Option<u32>,
    /// Maximum data bus width in bits.
    pub width: Option<u32>,
    /// Default register size cascaded into peripherals and registers.
    pub size: Option<u32>,
    pub cpu: Cpu,
    /// Peripherals in document order, after dimension expansion.
    pub peripherals: Vec<Peripheral>,
}

impl Device {
    /// Find a peripheral by exact name.
    pub fn peripheral(&self, name: &str) -> Option<&Peripheral> {
        self.peripherals.iter().find(|p| p.name == name)
    }
}

/// Processor description. Every field is independently optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[non_exhaustive]
pub struct Cpu {
    pub name: Option<String>,
    pub revision: Option<String>,
    pub endian: Option<String>,
    pub mpu_present: Option<bool>,
    pub fpu_present: Option<bool>,
    pub fpu_dp: Option<bool>,
    pub icache_present: Option<bool>,
    pub dcache_present: Option<bool>,
    pub vtor_present: Option<bool>,
    pub vendor_systick_config: Option<bool>,
    pub nvic_prio_bits: Option<u32>,
    pub device_num_interrupts: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[non_exhaustive]
pub struct Peripheral {
    pub name: String,
    pub version: Option<String>,
    pub description: Option<String>,
    pub group_name: Option<String>,
    pub base_address: u64,
    pub address_blocks: Vec<AddressBlock>,
    pub registers: Vec<Register>,
}

impl Peripheral {
    /// First register with the given name.
    ///
    /// Derivation may leave several registers sharing a name; the inherited
    /// one comes first.
    pub fn register(&self, name: &str) -> Option<&Register> {
        self.registers.iter().find(|r| r.name == name)
    }

    /// Absolute address of `register` within this peripheral.
    pub fn register_address(&self, register: &Register) -> Option<u64> {
        self.base_address.checked_add(register.offset)
    }
}

/// Address range mapped to a peripheral, relative to its base address.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[non_exhaustive]
pub struct AddressBlock {
    pub offset: u64,
    pub size: u64,
    /// Conventionally `registers`, `buffer` or `reserved`; not enforced.
    pub usage: String,
}

impl AddressBlock {
    /// Exclusive end offset relative to the peripheral base.
    pub fn end(&self) -> Option<u64> {
        self.offset.checked_add(self.size)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[non_exhaustive]
pub struct Register {
    pub name: String,
    pub description: Option<String>,
    /// Width in bits, inherited from the peripheral or device when not declared.
    pub size: Option<u32>,
    /// Offset from the peripheral base address.
    pub offset: u64,
    pub fields: Vec<Field>,
}

impl Register {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Named bit range within a register.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[non_exhaustive]
pub struct Field {
    pub name: String,
    pub description: Option<String>,
    pub bit_range: Option<BitRange>,
}

impl Field {
    pub fn bit_offset(&self) -> Option<u32> {
        self.bit_range.map(|r| r.bit_offset)
    }

    pub fn bit_width(&self) -> Option<u32> {
        self.bit_range.map(|r| r.bit_width)
    }

    pub fn msb(&self) -> Option<u32> {
        self.bit_range.and_then(|r| r.msb())
    }
}
