use crate::atm::{Aal, AtmTrafficSubtype, AtmTrafficType};
use crate::encapsulation::{Encapsulation, TsPrecision};

/// A packet record, decoded from any of the supported capture formats
///
/// The payload is owned by the record. `caplen` is always the length of `data`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraceRecord {
    /// The date and time when this packet was captured (seconds since epoch)
    pub ts_sec: u32,
    /// Fractional part of the timestamp, in nanoseconds. Always 0 if the precision is seconds.
    pub ts_nsec: u32,
    /// Precision of the timestamp
    pub ts_precision: TsPrecision,
    /// The number of bytes of packet data actually captured and saved in the file.
    pub caplen: u32,
    /// The length of the packet as it appeared on the network when it was captured.
    pub origlen: u32,
    /// Link-layer encapsulation of `data`
    pub encap: Encapsulation,
    /// Out-of-band information required to interpret `data`
    pub pseudo_header: PseudoHeader,
    /// Interface description, if the format stores one
    pub interface: Option<InterfaceInfo>,
    /// Network packet data
    pub data: Vec<u8>,
}

impl TraceRecord {
    /// The timestamp as a `f64` number of seconds
    pub fn ts_f64(&self) -> f64 {
        f64::from(self.ts_sec) + f64::from(self.ts_nsec) / 1_000_000_000.0
    }

    /// ATM pseudo-header, if this is an ATM record
    pub fn atm(&self) -> Option<&AtmPseudoHeader> {
        match self.pseudo_header {
            PseudoHeader::Atm(ref atm) => Some(atm),
            _ => None,
        }
    }
}

/// Encapsulation-specific information which is not part of the packet data
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PseudoHeader {
    None,
    Atm(AtmPseudoHeader),
    Ethernet(EthernetPseudoHeader),
}

impl Default for PseudoHeader {
    fn default() -> Self {
        PseudoHeader::None
    }
}

/// Pseudo-header for ATM PDUs
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AtmPseudoHeader {
    /// Virtual path identifier
    pub vpi: u16,
    /// Virtual channel identifier
    pub vci: u16,
    /// Traffic direction indicator, as stored in the capture
    pub channel: u8,
    pub flags: u32,
    /// Number of cells
    pub cells: u16,
    /// AAL5 trailer: user-to-user indicator
    pub aal5t_u2u: u16,
    /// AAL5 trailer: length
    pub aal5t_len: u16,
    /// AAL5 trailer: checksum
    pub aal5t_chksum: u32,
    pub aal: Aal,
    pub traffic_type: AtmTrafficType,
    pub traffic_subtype: AtmTrafficSubtype,
}

/// Pseudo-header for Ethernet frames
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EthernetPseudoHeader {
    /// Length of the frame check sequence at the end of the frame, 0 if absent
    pub fcs_len: u8,
}

/// Direction of a packet, relative to the capturing interface
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Received,
    Transmitted,
    /// Raw flag value, neither 0 nor 1
    Other(u8),
}

impl From<u8> for Direction {
    fn from(flag: u8) -> Direction {
        match flag {
            0 => Direction::Received,
            1 => Direction::Transmitted,
            n => Direction::Other(n),
        }
    }
}

/// Capturing interface, as described in iptrace packet information
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InterfaceInfo {
    /// SNMP ifType value
    pub if_type: u8,
    /// Interface unit number
    pub unit: u8,
    /// Interface name prefix (for ex. `en`)
    pub prefix: String,
    pub direction: Direction,
}

impl InterfaceInfo {
    /// Interface name, as printed by the capturing system (for ex. `en0`)
    pub fn name(&self) -> String {
        format!("{}{}", self.prefix, self.unit)
    }
}
