use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NiError {
    #[error("Unsupported suite ID: {0}")]
    UnsupportedSuite(u8),
    #[error("Hash value length {actual} does not match {expected} bytes required by {algorithm}")]
    HashLength {
        algorithm: String,
        expected: usize,
        actual: usize,
    },
    #[error("Empty binary record")]
    EmptyRecord,
    #[error("Invalid URI: {0}")]
    InvalidUri(String),
    #[error("Not a well-known Named Information URI: {0}")]
    NotWellKnown(String),
    #[error("Check digit does not match: expected {expected}, found {found}")]
    ChecksumMismatch { expected: char, found: String },
    #[error("Check digit required but missing")]
    MissingCheckDigit,
    #[error("Not a Named Information URI: {0}")]
    NotNamedInformation(String),
    #[error("Unrecognized scheme: {0}")]
    UnrecognizedScheme(String),
    #[error("Algorithm has no binary suite ID: {0}")]
    UnencodableAlgorithm(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<hex::FromHexError> for NiError {
    fn from(err: hex::FromHexError) -> Self {
        NiError::InvalidUri(format!("invalid hex hash value: {}", err))
    }
}

impl From<base64::DecodeError> for NiError {
    fn from(err: base64::DecodeError) -> Self {
        NiError::InvalidUri(format!("invalid base64 hash value: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, NiError>;
