//! Single-pass construction of a [`Device`] from its `<device>` node.

use tracing::{debug, trace, warn};

use crate::bitrange;
use crate::derive::{merge, Inheritable, PeripheralRegistry};
use crate::dim::{expand, DimSpec};
use crate::error::SvdError;
use crate::model::{AddressBlock, Cpu, Device, Field, Peripheral, Register};
use crate::node::{
    children_by_tag, expect_kind, optional_bool, optional_int, optional_text, required_child,
    required_int, required_text, single_child_by_tag, Node,
};
use crate::options::DecodeOptions;

impl Device {
    /// Decode a `<device>` node with default options.
    pub fn from_node<N: Node>(node: &N) -> Result<Self, SvdError> {
        Self::from_node_with(node, &DecodeOptions::default())
    }

    /// Decode a `<device>` node.
    ///
    /// Decoding is all-or-nothing: the first structural violation is
    /// returned and no partial device is produced.
    pub fn from_node_with<N: Node>(node: &N, options: &DecodeOptions) -> Result<Self, SvdError> {
        expect_kind(node, "device")?;

        let vendor = optional_text(node, "vendor")?;
        let vendor_id = optional_text(node, "vendorID")?;
        let name = optional_text(node, "name")?;
        let series = optional_text(node, "series")?;
        let version = optional_text(node, "version")?;
        let description = optional_text(node, "description")?;
        let license_text = optional_text(node, "licenseText")?;
        let cpu = Cpu::from_node(single_child_by_tag(node, "cpu")?, options)?;
        let address_unit_bits = optional_int(node, "addressUnitBits")?;
        let width = optional_int(node, "width")?;
        let size = optional_int(node, "size")?;

        let container = required_child(node, "peripherals")?;
        let mut registry = PeripheralRegistry::new();
        for element in children_by_tag(container, "peripheral") {
            for peripheral in Peripheral::expand_from_node(element, size, &registry, options)? {
                registry.push(peripheral);
            }
        }

        let device = Device {
            vendor,
            vendor_id,
            name,
            series,
            version,
            description,
            license_text,
            address_unit_bits,
            width,
            size,
            cpu,
            peripherals: registry.into_peripherals(),
        };
        debug!(
            device = device.name.as_deref().unwrap_or("<unnamed>"),
            peripherals = device.peripherals.len(),
            "decoded device"
        );
        Ok(device)
    }
}

impl Cpu {
    /// Decode an optional `<cpu>` node; an absent node yields an all-absent CPU.
    pub fn from_node<N: Node>(node: Option<&N>, options: &DecodeOptions) -> Result<Self, SvdError> {
        let Some(node) = node else {
            return Ok(Cpu::default());
        };
        expect_kind(node, "cpu")?;
        Ok(Cpu {
            name: optional_text(node, "name")?,
            revision: optional_text(node, "revision")?,
            endian: optional_text(node, "endian")?,
            mpu_present: optional_bool(node, "mpuPresent", options)?,
            fpu_present: optional_bool(node, "fpuPresent", options)?,
            fpu_dp: optional_bool(node, "fpuDP", options)?,
            icache_present: optional_bool(node, "icachePresent", options)?,
            dcache_present: optional_bool(node, "dcachePresent", options)?,
            vtor_present: optional_bool(node, "vtorPresent", options)?,
            vendor_systick_config: optional_bool(node, "vendorSystickConfig", options)?,
            nvic_prio_bits: optional_int(node, "nvicPrioBits")?,
            device_num_interrupts: optional_int(node, "deviceNumInterrupts")?,
        })
    }
}

impl Peripheral {
    /// Decode a `<peripheral>` node into its concrete instances.
    ///
    /// `default_size` is the register size cascaded from the device;
    /// `registry` holds the peripherals built earlier in the document and is
    /// the only place `derivedFrom` is looked up.
    pub fn expand_from_node<N: Node>(
        node: &N,
        default_size: Option<u32>,
        registry: &PeripheralRegistry,
        options: &DecodeOptions,
    ) -> Result<Vec<Self>, SvdError> {
        expect_kind(node, "peripheral")?;
        let name = required_text(node, "name")?;
        let base = registry.resolve(&name, node.attribute("derivedFrom"))?;

        let base_address: u64 = required_int(node, "baseAddress")?;
        let size = optional_int(node, "size")?.or(default_size);

        let address_blocks = children_by_tag(node, "addressBlock")
            .into_iter()
            .map(AddressBlock::from_node)
            .collect::<Result<Vec<_>, _>>()?;

        let mut registers = Vec::new();
        if let Some(container) = single_child_by_tag(node, "registers")? {
            let clusters = children_by_tag(container, "cluster").len();
            if clusters > 0 {
                warn!(peripheral = %name, clusters, "skipping cluster elements");
            }
            for element in children_by_tag(container, "register") {
                registers.extend(Register::expand_from_node(element, size, options)?);
            }
        }

        let own = Inheritable {
            version: optional_text(node, "version")?,
            description: optional_text(node, "description")?,
            group_name: optional_text(node, "groupName")?,
            address_blocks,
            registers,
        };
        let merged = merge(own, base);

        let instances = expand("peripheral", &name, base_address, DimSpec::from_node(node)?)?;
        debug!(
            peripheral = %name,
            instances = instances.len(),
            registers = merged.registers.len(),
            derived = base.is_some(),
            "decoded peripheral"
        );
        Ok(instances
            .into_iter()
            .map(|instance| Peripheral {
                name: instance.name,
                version: merged.version.clone(),
                description: merged.description.clone(),
                group_name: merged.group_name.clone(),
                base_address: instance.address,
                address_blocks: merged.address_blocks.clone(),
                registers: merged.registers.clone(),
            })
            .collect())
    }
}

impl AddressBlock {
    pub fn from_node<N: Node>(node: &N) -> Result<Self, SvdError> {
        expect_kind(node, "addressBlock")?;
        Ok(AddressBlock {
            offset: required_int(node, "offset")?,
            size: required_int(node, "size")?,
            usage: required_text(node, "usage")?,
        })
    }
}

impl Register {
    /// Decode a `<register>` node into its concrete instances.
    ///
    /// A declared `size` overrides `default_size`.
    pub fn expand_from_node<N: Node>(
        node: &N,
        default_size: Option<u32>,
        options: &DecodeOptions,
    ) -> Result<Vec<Self>, SvdError> {
        expect_kind(node, "register")?;
        let dim = DimSpec::from_node(node)?;
        let name = required_text(node, "name")?;
        let description = optional_text(node, "description")?;
        let size = optional_int(node, "size")?.or(default_size);
        let offset: u64 = required_int(node, "addressOffset")?;

        let fields = match single_child_by_tag(node, "fields")? {
            Some(container) => children_by_tag(container, "field")
                .into_iter()
                .map(|field| Field::from_node(field, options))
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };

        let instances = expand("register", &name, offset, dim)?;
        trace!(register = %name, size, instances = instances.len(), "decoded register");
        Ok(instances
            .into_iter()
            .map(|instance| Register {
                name: instance.name,
                description: description.clone(),
                size,
                offset: instance.address,
                fields: fields.clone(),
            })
            .collect())
    }
}

impl Field {
    pub fn from_node<N: Node>(node: &N, options: &DecodeOptions) -> Result<Self, SvdError> {
        expect_kind(node, "field")?;
        let name = required_text(node, "name")?;
        let description = optional_text(node, "description")?;
        let bit_range = bitrange::resolve(node, &name, options)?;
        Ok(Field {
            name,
            description,
            bit_range,
        })
    }
}
