use crate::encapsulation::Encapsulation;

// RFC 1573 interface types, as found in <net/if_types.h>
pub const IFT_X25DDN: u8 = 0x04;
pub const IFT_ETHER: u8 = 0x06;
pub const IFT_ISO88023: u8 = 0x07;
pub const IFT_ISO88025: u8 = 0x09;
/// IBM SP switch
pub const IFT_P10: u8 = 0x0c;
pub const IFT_FDDI: u8 = 0x0f;
pub const IFT_LAPB: u8 = 0x10;
pub const IFT_LOOP: u8 = 0x18;
pub const IFT_ATM: u8 = 0x25;
/// PERCS Host Fabric Interface
pub const IFT_HF: u8 = 0x3d;
/// IP over Infiniband (number assigned by IANA)
pub const IFT_IB: u8 = 0xc7;

/// Convert a SNMP ifType value to an encapsulation
///
/// Returns `Encapsulation::UNKNOWN` for interface types that are not supported. This is not
/// an error: the packet data can still be read, without link-layer information.
pub fn ift_to_encapsulation(ift: u8) -> Encapsulation {
    match ift {
        IFT_X25DDN => Encapsulation::RAW_IP,
        IFT_ETHER | IFT_ISO88023 => Encapsulation::ETHERNET,
        IFT_ISO88025 => Encapsulation::TOKEN_RING,
        IFT_P10 => Encapsulation::RAW_IP,
        IFT_FDDI => Encapsulation::FDDI_BITSWAPPED,
        // no data to back this up
        IFT_LAPB => Encapsulation::LAPB,
        IFT_LOOP => Encapsulation::RAW_IP,
        IFT_ATM => Encapsulation::ATM_PDUS,
        IFT_IB => Encapsulation::INFINIBAND,
        // The HFI interface on AIX provides raw IP in the packet trace. It is unclear if it can
        // carry any other protocol, and which field would tell. Revisit when a trace with
        // something else than IP on HFI is available.
        IFT_HF => Encapsulation::RAW_IP,
        _ => Encapsulation::UNKNOWN,
    }
}
