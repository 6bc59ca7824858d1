use rusticata_macros::newtype_enum;

/// Maximum size of a packet payload.
///
/// Bigger records are treated as file corruption.
pub const MAX_PACKET_SIZE: u32 = 262_144;

/// Link-layer encapsulation of a record
///
/// Describes the framing at the start of the record payload. The container-wide value
/// can also be `UNKNOWN` (no record seen yet) or `PER_PACKET` (records disagree, check
/// each record).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Encapsulation(pub i32);

newtype_enum! {
impl display Encapsulation {
    UNKNOWN = 0,
    ETHERNET = 1,
    TOKEN_RING = 2,
    // FDDI, with bit-reversed MAC addresses
    FDDI_BITSWAPPED = 6,
    // Raw IP; the packet begins with an IPv4 or IPv6 header
    RAW_IP = 7,
    LAPB = 12,
    // ATM AAL5 PDUs, with VPI/VCI in the pseudo-header
    ATM_PDUS = 13,
    INFINIBAND = 132,
    // records use different encapsulations
    PER_PACKET = 0xffff,
}
}

impl Encapsulation {
    /// Returns true if the encapsulation is a real link-layer type
    #[inline]
    pub fn is_known(self) -> bool {
        self != Encapsulation::UNKNOWN && self != Encapsulation::PER_PACKET
    }
}

/// Precision of the timestamps stored in a capture
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TsPrecision {
    Seconds,
    Nanoseconds,
}

impl TsPrecision {
    /// Number of fractional units per second
    pub const fn units_per_second(self) -> u32 {
        match self {
            TsPrecision::Seconds => 1,
            TsPrecision::Nanoseconds => 1_000_000_000,
        }
    }
}
