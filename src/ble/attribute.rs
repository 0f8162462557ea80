//! Attribute table of the Nordic UART Service
//!
//! The table is laid out once at compile time. Indices of the attributes the
//! engine needs to reach directly (RX value, TX value, TX CCC descriptor) are
//! derived from that layout rather than written down by hand, so reordering
//! the table cannot silently break `notify`.

use crate::ble::uuid::Uuid;
use crate::config::{gatt, nus};
use enumset::{enum_set, EnumSet, EnumSetType};
use heapless::Vec;

/// Access permissions enforced on an attribute
#[derive(EnumSetType, Debug)]
pub enum Permission {
    Read,
    Write,
}

/// Characteristic properties advertised in the declaration
#[derive(EnumSetType, Debug)]
pub enum Property {
    Read,
    WriteWithoutResponse,
    Write,
    Notify,
    Indicate,
}

impl Property {
    /// Bit in the characteristic declaration properties field
    pub fn bit(self) -> u8 {
        match self {
            Property::Read => 0x02,
            Property::WriteWithoutResponse => 0x04,
            Property::Write => 0x08,
            Property::Notify => 0x10,
            Property::Indicate => 0x20,
        }
    }

    /// Encode a property set into the declaration byte
    pub fn bits(set: EnumSet<Property>) -> u8 {
        set.iter().fold(0, |acc, p| acc | p.bit())
    }
}

/// What an attribute is and where its value comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    /// Primary service declaration carrying the service UUID
    PrimaryService(Uuid),
    /// Characteristic declaration; its value attribute follows immediately
    Characteristic {
        uuid: Uuid,
        properties: EnumSet<Property>,
    },
    /// RX characteristic value, backed by the RX buffer
    RxValue(Uuid),
    /// TX characteristic value, only ever notified
    TxValue(Uuid),
    /// Client characteristic configuration of the TX characteristic
    ClientConfig,
}

/// Fieldless tag used to locate bound attributes at compile time
#[derive(Clone, Copy)]
enum Role {
    Declaration,
    RxValue,
    TxValue,
    ClientConfig,
}

impl AttributeKind {
    const fn role(&self) -> Role {
        match self {
            AttributeKind::PrimaryService(_) | AttributeKind::Characteristic { .. } => {
                Role::Declaration
            }
            AttributeKind::RxValue(_) => Role::RxValue,
            AttributeKind::TxValue(_) => Role::TxValue,
            AttributeKind::ClientConfig => Role::ClientConfig,
        }
    }
}

/// One entry of the attribute table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attribute {
    pub kind: AttributeKind,
    pub permissions: EnumSet<Permission>,
}

impl Attribute {
    /// Attribute type as seen during discovery
    pub fn attribute_type(&self) -> Uuid {
        match self.kind {
            AttributeKind::PrimaryService(_) => Uuid::Uuid16(gatt::PRIMARY_SERVICE_UUID),
            AttributeKind::Characteristic { .. } => Uuid::Uuid16(gatt::CHARACTERISTIC_UUID),
            AttributeKind::RxValue(uuid) | AttributeKind::TxValue(uuid) => uuid,
            AttributeKind::ClientConfig => Uuid::Uuid16(gatt::CCCD_UUID),
        }
    }

    pub fn is_readable(&self) -> bool {
        self.permissions.contains(Permission::Read)
    }

    pub fn is_writable(&self) -> bool {
        self.permissions.contains(Permission::Write)
    }
}

const fn index_of(attributes: &[Attribute], role: Role) -> usize {
    let mut i = 0;
    while i < attributes.len() {
        if attributes[i].kind.role() as u8 == role as u8 {
            return i;
        }
        i += 1;
    }
    panic!("attribute table is missing a bound attribute");
}

/// Number of attributes in the NUS table
pub const NUS_ATTRIBUTE_COUNT: usize = 6;

const NUS_ATTRIBUTES: [Attribute; NUS_ATTRIBUTE_COUNT] = [
    Attribute {
        kind: AttributeKind::PrimaryService(Uuid::Uuid128(nus::SERVICE_UUID)),
        permissions: enum_set!(Permission::Read),
    },
    // RX
    Attribute {
        kind: AttributeKind::Characteristic {
            uuid: Uuid::Uuid128(nus::RX_UUID),
            properties: enum_set!(Property::Write | Property::WriteWithoutResponse),
        },
        permissions: enum_set!(Permission::Read),
    },
    Attribute {
        kind: AttributeKind::RxValue(Uuid::Uuid128(nus::RX_UUID)),
        permissions: enum_set!(Permission::Read | Permission::Write),
    },
    // TX
    Attribute {
        kind: AttributeKind::Characteristic {
            uuid: Uuid::Uuid128(nus::TX_UUID),
            properties: enum_set!(Property::Notify),
        },
        permissions: enum_set!(Permission::Read),
    },
    Attribute {
        kind: AttributeKind::TxValue(Uuid::Uuid128(nus::TX_UUID)),
        permissions: EnumSet::empty(),
    },
    Attribute {
        kind: AttributeKind::ClientConfig,
        permissions: enum_set!(Permission::Read | Permission::Write),
    },
];

/// The Nordic UART Service attribute table
pub const NUS_TABLE: AttributeTable = AttributeTable::new(&NUS_ATTRIBUTES);

/// Ordered, immutable attribute table
///
/// Attribute indices are stable for the lifetime of the service; the
/// transport maps index `i` to handle `first_handle + i`.
#[derive(Debug, Clone, Copy)]
pub struct AttributeTable {
    attributes: &'static [Attribute],
    rx_value: usize,
    tx_value: usize,
    tx_cccd: usize,
}

impl AttributeTable {
    const fn new(attributes: &'static [Attribute]) -> Self {
        Self {
            attributes,
            rx_value: index_of(attributes, Role::RxValue),
            tx_value: index_of(attributes, Role::TxValue),
            tx_cccd: index_of(attributes, Role::ClientConfig),
        }
    }

    pub fn get(&self, index: usize) -> Option<&Attribute> {
        self.attributes.get(index)
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.iter()
    }

    pub fn rx_value_index(&self) -> usize {
        self.rx_value
    }

    /// Index notifications are sent on
    pub fn tx_value_index(&self) -> usize {
        self.tx_value
    }

    pub fn tx_cccd_index(&self) -> usize {
        self.tx_cccd
    }

    /// Handle of the attribute at `index` once registered at `first_handle`
    pub fn handle_of(&self, index: usize, first_handle: u16) -> u16 {
        first_handle.wrapping_add(index as u16)
    }

    /// Value of a service or characteristic declaration
    ///
    /// Returns `None` for attributes whose value is not static.
    pub fn declaration_value(&self, index: usize, first_handle: u16) -> Option<Vec<u8, 19>> {
        let mut out = Vec::new();
        match self.get(index)?.kind {
            AttributeKind::PrimaryService(uuid) => {
                out.extend_from_slice(&uuid.to_le_bytes()).ok()?;
            }
            AttributeKind::Characteristic { uuid, properties } => {
                let value_handle = self.handle_of(index + 1, first_handle);
                out.push(Property::bits(properties)).ok()?;
                out.extend_from_slice(&value_handle.to_le_bytes()).ok()?;
                out.extend_from_slice(&uuid.to_le_bytes()).ok()?;
            }
            _ => return None,
        }
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bound_indices() {
        assert_eq!(NUS_TABLE.len(), NUS_ATTRIBUTE_COUNT);
        assert_eq!(NUS_TABLE.rx_value_index(), 2);
        assert_eq!(NUS_TABLE.tx_value_index(), 4);
        assert_eq!(NUS_TABLE.tx_cccd_index(), 5);
    }

    #[test]
    fn test_tx_value_kind() {
        let attr = NUS_TABLE.get(NUS_TABLE.tx_value_index()).unwrap();
        assert_eq!(attr.kind, AttributeKind::TxValue(Uuid::Uuid128(nus::TX_UUID)));
        assert!(!attr.is_readable());
        assert!(!attr.is_writable());
    }

    #[test]
    fn test_permissions() {
        let rx = NUS_TABLE.get(NUS_TABLE.rx_value_index()).unwrap();
        assert!(rx.is_readable());
        assert!(rx.is_writable());

        let cccd = NUS_TABLE.get(NUS_TABLE.tx_cccd_index()).unwrap();
        assert!(cccd.is_readable());
        assert!(cccd.is_writable());
        assert_eq!(cccd.attribute_type(), Uuid::Uuid16(0x2902));
    }

    #[test]
    fn test_service_declaration_value() {
        let value = NUS_TABLE.declaration_value(0, 1).unwrap();
        assert_eq!(value.as_slice(), Uuid::Uuid128(nus::SERVICE_UUID).to_le_bytes().as_slice());
    }

    #[test]
    fn test_characteristic_declaration_value() {
        // RX declaration at index 1, value at index 2 -> handle 0x0012 with base 0x0010
        let value = NUS_TABLE.declaration_value(1, 0x0010).unwrap();
        assert_eq!(value[0], 0x04 | 0x08);
        assert_eq!(&value[1..3], &[0x12, 0x00]);
        assert_eq!(&value[3..], Uuid::Uuid128(nus::RX_UUID).to_le_bytes().as_slice());

        let value = NUS_TABLE.declaration_value(3, 0x0010).unwrap();
        assert_eq!(value[0], 0x10);
        assert_eq!(&value[1..3], &[0x14, 0x00]);
    }

    #[test]
    fn test_no_declaration_for_values() {
        assert!(NUS_TABLE.declaration_value(2, 1).is_none());
        assert!(NUS_TABLE.declaration_value(5, 1).is_none());
        assert!(NUS_TABLE.declaration_value(42, 1).is_none());
    }
}
