use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// 48-bit Bluetooth device address, most significant octet first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct BdAddr(pub [u8; 6]);

impl BdAddr {
    pub const ANY: BdAddr = BdAddr([0; 6]);

    pub const fn new(octets: [u8; 6]) -> Self {
        BdAddr(octets)
    }

    pub fn octets(&self) -> [u8; 6] {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::ANY
    }

    /// Address form safe for logs: only the last two octets are kept.
    pub fn redacted(&self) -> String {
        format!("XX:XX:XX:XX:{:02X}:{:02X}", self.0[4], self.0[5])
    }
}

impl fmt::Display for BdAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let o = &self.0;
        write!(
            f,
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            o[0], o[1], o[2], o[3], o[4], o[5]
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseAddrError {
    #[error("expected 6 octets, found {0}")]
    OctetCount(usize),

    #[error("invalid octet '{0}'")]
    InvalidOctet(String),
}

impl FromStr for BdAddr {
    type Err = ParseAddrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 6 {
            return Err(ParseAddrError::OctetCount(parts.len()));
        }

        let mut octets = [0u8; 6];
        for (slot, part) in octets.iter_mut().zip(parts) {
            if part.len() != 2 {
                return Err(ParseAddrError::InvalidOctet(part.to_string()));
            }
            *slot = u8::from_str_radix(part, 16)
                .map_err(|_| ParseAddrError::InvalidOctet(part.to_string()))?;
        }
        Ok(BdAddr(octets))
    }
}

const BASE_UUID_BITS: u128 = 0x0000_0000_0000_1000_8000_0080_5F9B_34FB;

/// Bluetooth base UUID, `00000000-0000-1000-8000-00805F9B34FB`.
pub const BASE_UUID: Uuid = Uuid::from_u128(BASE_UUID_BITS);

/// Expand a 16-bit assigned number against the base UUID.
pub const fn uuid16(short: u16) -> Uuid {
    uuid32(short as u32)
}

/// Expand a 32-bit assigned number against the base UUID.
pub const fn uuid32(short: u32) -> Uuid {
    Uuid::from_u128(BASE_UUID_BITS | ((short as u128) << 96))
}

/// Short form of a UUID derived from the base UUID, if it is one.
pub fn as_short_uuid(uuid: &Uuid) -> Option<u32> {
    let value = uuid.as_u128();
    let mask = (u32::MAX as u128) << 96;
    if value & !mask == BASE_UUID_BITS {
        Some((value >> 96) as u32)
    } else {
        None
    }
}
