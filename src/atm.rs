//! ATM traffic classification
//!
//! Capture formats storing ATM PDUs usually do not say what kind of traffic is carried on a
//! virtual circuit. [`guess_traffic_type`] makes a best-effort guess from the VPI/VCI and the
//! first bytes of the PDU.

use crate::encapsulation::Encapsulation;
use crate::record::{PseudoHeader, TraceRecord};

/// ATM adaptation layer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Aal {
    Unknown,
    Aal1,
    Aal3_4,
    Aal5,
    Signalling,
}

impl Default for Aal {
    fn default() -> Self {
        Aal::Unknown
    }
}

/// Type of traffic on an ATM virtual circuit
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AtmTrafficType {
    Unknown,
    /// LLC multiplexed
    LlcMultiplexed,
    /// LAN emulation
    Lane,
    /// Interim local management interface
    Ilmi,
}

impl Default for AtmTrafficType {
    fn default() -> Self {
        AtmTrafficType::Unknown
    }
}

/// Subtype of ATM traffic
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AtmTrafficSubtype {
    Unknown,
    /// LANE LE Control
    LaneLeControl,
    /// LANE 802.3
    Lane8023,
}

impl Default for AtmTrafficSubtype {
    fn default() -> Self {
        AtmTrafficSubtype::Unknown
    }
}

/// Function called on ATM records to refine the pseudo-header
pub type AtmClassifierFn = fn(&mut TraceRecord);

/// Guess the kind of traffic of an ATM record, from its VPI/VCI and data
///
/// The pseudo-header is updated in place. Records which are not ATM PDUs are not modified.
pub fn guess_traffic_type(record: &mut TraceRecord) {
    if record.encap != Encapsulation::ATM_PDUS {
        return;
    }
    let data = &record.data;
    let atm = match record.pseudo_header {
        PseudoHeader::Atm(ref mut atm) => atm,
        _ => return,
    };
    // start from "AAL5, unknown traffic"
    atm.aal = Aal::Aal5;
    atm.traffic_type = AtmTrafficType::Unknown;
    atm.traffic_subtype = AtmTrafficSubtype::Unknown;

    if atm.vpi == 0 {
        match atm.vci {
            5 => {
                atm.aal = Aal::Signalling;
                return;
            }
            16 => {
                atm.traffic_type = AtmTrafficType::Ilmi;
                return;
            }
            _ => (),
        }
    }
    if data.len() < 3 {
        return;
    }
    if data.starts_with(&[0xaa, 0xaa, 0x03]) {
        atm.traffic_type = AtmTrafficType::LlcMultiplexed;
    } else if (atm.aal5t_len != 0 && atm.aal5t_len < 16) || data.len() < 16 {
        // too short for a LANE frame
    } else {
        atm.traffic_type = AtmTrafficType::Lane;
        atm.traffic_subtype = if data.starts_with(&[0xff, 0x00]) {
            AtmTrafficSubtype::LaneLeControl
        } else {
            AtmTrafficSubtype::Lane8023
        };
    }
}
