use std::fmt;
use std::str::FromStr;
use crate::error::NiError;

/// Hash algorithm suites from the RFC 6920 "Named Information Hash Algorithm Registry"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Suite {
    Sha256 = 1,
    Sha256_128 = 2,
    Sha256_120 = 3,
    Sha256_96 = 4,
    Sha256_64 = 5,
    Sha256_32 = 6,
}

impl Suite {
    /// Registry order
    pub const ALL: [Suite; 6] = [
        Suite::Sha256,
        Suite::Sha256_128,
        Suite::Sha256_120,
        Suite::Sha256_96,
        Suite::Sha256_64,
        Suite::Sha256_32,
    ];

    /// Mask selecting the suite ID bits of a binary header byte
    pub const ID_MASK: u8 = 0x3f;

    pub fn id(&self) -> u8 {
        *self as u8
    }

    pub fn name(&self) -> &'static str {
        match self {
            Suite::Sha256 => "sha-256",
            Suite::Sha256_128 => "sha-256-128",
            Suite::Sha256_120 => "sha-256-120",
            Suite::Sha256_96 => "sha-256-96",
            Suite::Sha256_64 => "sha-256-64",
            Suite::Sha256_32 => "sha-256-32",
        }
    }

    /// Length in bytes of the (possibly truncated) hash value
    pub fn hash_len(&self) -> usize {
        match self {
            Suite::Sha256 => 32,
            Suite::Sha256_128 => 16,
            Suite::Sha256_120 => 15,
            Suite::Sha256_96 => 12,
            Suite::Sha256_64 => 8,
            Suite::Sha256_32 => 4,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "sha-256" => Some(Suite::Sha256),
            "sha-256-128" => Some(Suite::Sha256_128),
            "sha-256-120" => Some(Suite::Sha256_120),
            "sha-256-96" => Some(Suite::Sha256_96),
            "sha-256-64" => Some(Suite::Sha256_64),
            "sha-256-32" => Some(Suite::Sha256_32),
            _ => None,
        }
    }
}

impl TryFrom<u8> for Suite {
    type Error = NiError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        match id {
            1 => Ok(Suite::Sha256),
            2 => Ok(Suite::Sha256_128),
            3 => Ok(Suite::Sha256_120),
            4 => Ok(Suite::Sha256_96),
            5 => Ok(Suite::Sha256_64),
            6 => Ok(Suite::Sha256_32),
            other => Err(NiError::UnsupportedSuite(other)),
        }
    }
}

impl FromStr for Suite {
    type Err = NiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Suite::from_name(s).ok_or_else(|| NiError::UnencodableAlgorithm(s.to_string()))
    }
}

impl fmt::Display for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
