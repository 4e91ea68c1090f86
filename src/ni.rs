use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use base64::alphabet;
use base64::engine::general_purpose::STANDARD;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::trace;
use crate::checksum;
use crate::codec::NiCodec;
use crate::error::{NiError, Result};
use crate::suite::Suite;

/// Path prefix of the HTTP(S) form
pub const WELL_KNOWN_PREFIX: &str = "/.well-known/ni/";

/// Authority used for HTTP(S) URLs of records that carry none
pub const DEFAULT_AUTHORITY: &str = "localhost";

/// URL-safe, unpadded on output. Decoding tolerates padding and loose
/// trailing bits; the standard alphabet is mapped onto this one first.
const BASE64_NI: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

pub(crate) fn encode_base64(bytes: &[u8]) -> String {
    BASE64_NI.encode(bytes)
}

pub(crate) fn decode_base64(s: &str) -> Result<Vec<u8>> {
    let normalized: String = s
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            c => c,
        })
        .collect();
    Ok(BASE64_NI.decode(normalized)?)
}

/// URI schemes a Named Information identifier can be written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    Ni,
    Nih,
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Ni => "ni",
            Scheme::Nih => "nih",
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }

    /// Like `from_str`, but anything unrecognized selects `Scheme::Ni`.
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or(Scheme::Ni)
    }
}

impl FromStr for Scheme {
    type Err = NiError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let name = s.strip_suffix(':').unwrap_or(s);
        if name.eq_ignore_ascii_case("ni") {
            Ok(Scheme::Ni)
        } else if name.eq_ignore_ascii_case("nih") {
            Ok(Scheme::Nih)
        } else if name.eq_ignore_ascii_case("http") {
            Ok(Scheme::Http)
        } else if name.eq_ignore_ascii_case("https") {
            Ok(Scheme::Https)
        } else {
            Err(NiError::UnrecognizedScheme(s.to_string()))
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Text encodings for `Ni::digest`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Hex,
    /// Standard alphabet, padded
    Base64,
    /// URL-safe alphabet, unpadded
    Base64Url,
}

/// A Named Information identifier: digest algorithm, hash value and an
/// optional authority.
///
/// Two identifiers are equal when their algorithm names and hash values are
/// identical. The authority is not part of the identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ni {
    algorithm: String,
    #[serde(with = "hex::serde")]
    hash: Vec<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    authority: Option<String>,
}

impl Ni {
    pub fn new(algorithm: impl Into<String>, hash: impl Into<Vec<u8>>) -> Self {
        Self {
            algorithm: algorithm.into(),
            hash: hash.into(),
            authority: None,
        }
    }

    /// Build a record for a registry suite, checking the hash length.
    pub fn from_suite(suite: Suite, hash: impl Into<Vec<u8>>) -> Result<Self> {
        let hash = hash.into();
        if hash.len() != suite.hash_len() {
            return Err(NiError::HashLength {
                algorithm: suite.name().to_string(),
                expected: suite.hash_len(),
                actual: hash.len(),
            });
        }
        Ok(Self::new(suite.name(), hash))
    }

    pub fn with_authority(mut self, authority: impl Into<String>) -> Self {
        self.authority = Some(authority.into());
        self
    }

    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    pub fn hash(&self) -> &[u8] {
        &self.hash
    }

    pub fn authority(&self) -> Option<&str> {
        self.authority.as_deref()
    }

    /// Registry entry for the algorithm, if it has one
    pub fn suite(&self) -> Option<Suite> {
        Suite::from_name(&self.algorithm)
    }

    pub fn digest(&self, encoding: Encoding) -> String {
        match encoding {
            Encoding::Hex => hex::encode(&self.hash),
            Encoding::Base64 => STANDARD.encode(&self.hash),
            Encoding::Base64Url => encode_base64(&self.hash),
        }
    }

    /// Decode the binary form: one header byte carrying the suite ID in its
    /// low six bits, followed by the hash value.
    ///
    /// The two high header bits and anything past the hash are ignored.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let header = *bytes.first().ok_or(NiError::EmptyRecord)?;
        let suite = Suite::try_from(header & Suite::ID_MASK)?;
        let len = suite.hash_len();

        if bytes.len() < len + 1 {
            return Err(NiError::HashLength {
                algorithm: suite.name().to_string(),
                expected: len,
                actual: bytes.len() - 1,
            });
        }
        if bytes.len() > len + 1 {
            trace!(suite = %suite, extra = bytes.len() - len - 1, "ignoring trailing bytes");
        }

        Ok(Self::new(suite.name(), &bytes[1..=len]))
    }

    /// Encode the binary form. Only registry algorithms have one.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let suite = self
            .suite()
            .ok_or_else(|| NiError::UnencodableAlgorithm(self.algorithm.clone()))?;
        if self.hash.len() != suite.hash_len() {
            return Err(NiError::HashLength {
                algorithm: self.algorithm.clone(),
                expected: suite.hash_len(),
                actual: self.hash.len(),
            });
        }

        let mut bytes = Vec::with_capacity(self.hash.len() + 1);
        bytes.push(suite.id());
        bytes.extend_from_slice(&self.hash);
        Ok(bytes)
    }

    pub fn format(&self, scheme: Scheme) -> String {
        self.format_with_default_authority(scheme, DEFAULT_AUTHORITY)
    }

    pub(crate) fn format_with_default_authority(&self, scheme: Scheme, default_authority: &str) -> String {
        match scheme {
            Scheme::Http | Scheme::Https => format!(
                "{}://{}{}{}/{}",
                scheme,
                self.authority.as_deref().unwrap_or(default_authority),
                WELL_KNOWN_PREFIX,
                self.algorithm,
                encode_base64(&self.hash)
            ),
            Scheme::Nih => {
                let hex = hex::encode(&self.hash);
                format!(
                    "nih:{};{};{}",
                    self.algorithm,
                    group_hex(&hex),
                    checksum::check_digit(&hex)
                )
            }
            Scheme::Ni => format!(
                "ni://{}/{};{}",
                self.authority.as_deref().unwrap_or(""),
                self.algorithm,
                encode_base64(&self.hash)
            ),
        }
    }
}

/// Split into dash-separated runs of four characters.
fn group_hex(hex: &str) -> String {
    let mut grouped = String::with_capacity(hex.len() + hex.len() / 4);
    for (i, c) in hex.chars().enumerate() {
        if i > 0 && i % 4 == 0 {
            grouped.push('-');
        }
        grouped.push(c);
    }
    grouped
}

impl PartialEq for Ni {
    fn eq(&self, other: &Self) -> bool {
        self.algorithm == other.algorithm && self.hash == other.hash
    }
}

impl Eq for Ni {}

impl Hash for Ni {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.algorithm.hash(state);
        self.hash.hash(state);
    }
}

impl FromStr for Ni {
    type Err = NiError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        NiCodec::default().parse_str(s)
    }
}

impl TryFrom<&[u8]> for Ni {
    type Error = NiError;

    fn try_from(bytes: &[u8]) -> std::result::Result<Self, Self::Error> {
        Self::from_bytes(bytes)
    }
}

impl fmt::Display for Ni {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(Scheme::Ni))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RFC_HASH_120: &str = "53269057e12fe2b74ba07c892560a2";

    fn rfc_record() -> Ni {
        Ni::new("sha-256-120", hex::decode(RFC_HASH_120).unwrap())
    }

    #[test]
    fn test_decode_binary() {
        let mut bytes = vec![0x03];
        bytes.extend(hex::decode(RFC_HASH_120).unwrap());
        let ni = Ni::from_bytes(&bytes).unwrap();

        assert_eq!(ni.algorithm(), "sha-256-120");
        assert_eq!(ni.digest(Encoding::Hex), RFC_HASH_120);
        assert_eq!(ni.authority(), None);
        assert_eq!(ni.to_bytes().unwrap(), bytes);
    }

    #[test]
    fn test_header_flags_ignored() {
        for header in [0x06, 0x46, 0x86, 0xc6] {
            let ni = Ni::from_bytes(&[header, 0, 0, 0, 0]).unwrap();
            assert_eq!(ni.algorithm(), "sha-256-32");
            assert_eq!(ni.to_bytes().unwrap()[0], 0x06);
        }
    }

    #[test]
    fn test_trailing_bytes_ignored() {
        let ni = Ni::from_bytes(&[0x06, 1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(ni.hash(), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_unsupported_suite() {
        assert_eq!(Ni::from_bytes(&[0x00, 0, 0]), Err(NiError::UnsupportedSuite(0)));
        assert_eq!(Ni::from_bytes(&[0x20, 0, 0]), Err(NiError::UnsupportedSuite(0x20)));
    }

    #[test]
    fn test_short_record() {
        let result = Ni::from_bytes(&[0x06, 0, 0]);
        assert!(matches!(
            result,
            Err(NiError::HashLength { expected: 4, actual: 2, .. })
        ));
        assert_eq!(Ni::from_bytes(&[]), Err(NiError::EmptyRecord));
    }

    #[test]
    fn test_unencodable_algorithm() {
        let ni = Ni::new("sha256", vec![0u8; 32]);
        assert_eq!(ni.to_bytes(), Err(NiError::UnencodableAlgorithm("sha256".to_string())));
    }

    #[test]
    fn test_encode_wrong_length() {
        let ni = Ni::new("sha-256-32", vec![0u8; 5]);
        assert!(matches!(ni.to_bytes(), Err(NiError::HashLength { expected: 4, actual: 5, .. })));
        assert!(Ni::from_suite(Suite::Sha256_32, vec![0u8; 5]).is_err());
    }

    #[test]
    fn test_format_ni() {
        let ni = rfc_record();
        assert_eq!(ni.format(Scheme::Ni), "ni:///sha-256-120;UyaQV-Ev4rdLoHyJJWCi");
        assert_eq!(ni.to_string(), "ni:///sha-256-120;UyaQV-Ev4rdLoHyJJWCi");

        let ni = ni.with_authority("example.com");
        assert_eq!(ni.format(Scheme::Ni), "ni://example.com/sha-256-120;UyaQV-Ev4rdLoHyJJWCi");
    }

    #[test]
    fn test_format_well_known() {
        let ni = rfc_record();
        assert_eq!(
            ni.format(Scheme::Http),
            "http://localhost/.well-known/ni/sha-256-120/UyaQV-Ev4rdLoHyJJWCi"
        );

        let ni = ni.with_authority("example.com");
        assert_eq!(
            ni.format(Scheme::Https),
            "https://example.com/.well-known/ni/sha-256-120/UyaQV-Ev4rdLoHyJJWCi"
        );
    }

    #[test]
    fn test_format_nih() {
        let ni = rfc_record();
        assert_eq!(
            ni.format(Scheme::Nih),
            "nih:sha-256-120;5326-9057-e12f-e2b7-4ba0-7c89-2560-a2;f"
        );

        let short = Ni::new("sha-256-32", hex::decode("53269057").unwrap());
        assert_eq!(short.format(Scheme::Nih), "nih:sha-256-32;5326-9057;b");
    }

    #[test]
    fn test_digest_encodings() {
        let ni = Ni::new("sha-256-32", vec![0xfb, 0xff, 0x00, 0x01]);
        assert_eq!(ni.digest(Encoding::Hex), "fbff0001");
        assert_eq!(ni.digest(Encoding::Base64), "+/8AAQ==");
        assert_eq!(ni.digest(Encoding::Base64Url), "-_8AAQ");
    }

    #[test]
    fn test_base64_decode_accepts_both_alphabets() {
        assert_eq!(decode_base64("+/8AAQ==").unwrap(), vec![0xfb, 0xff, 0x00, 0x01]);
        assert_eq!(decode_base64("-_8AAQ").unwrap(), vec![0xfb, 0xff, 0x00, 0x01]);
        assert!(decode_base64("not base64!").is_err());
    }

    #[test]
    fn test_equality_ignores_authority() {
        let a = rfc_record();
        let b = rfc_record().with_authority("example.com");
        assert_eq!(a, b);
        assert_ne!(a, Ni::new("sha-256", hex::decode(RFC_HASH_120).unwrap()));
        assert_ne!(a, Ni::new("sha-256-120", vec![0u8; 15]));
    }

    #[test]
    fn test_scheme_parsing() {
        assert_eq!("nih:".parse::<Scheme>().unwrap(), Scheme::Nih);
        assert_eq!("HTTPS".parse::<Scheme>().unwrap(), Scheme::Https);
        assert!("ftp".parse::<Scheme>().is_err());
        assert_eq!(Scheme::parse_lenient("ftp"), Scheme::Ni);
        assert_eq!(Scheme::parse_lenient("http:"), Scheme::Http);
    }

    #[test]
    fn test_serde_hex_hash() {
        let ni = rfc_record().with_authority("example.com");
        let json = serde_json::to_value(&ni).unwrap();
        assert_eq!(json["algorithm"], "sha-256-120");
        assert_eq!(json["hash"], RFC_HASH_120);
        assert_eq!(json["authority"], "example.com");

        let back: Ni = serde_json::from_value(json).unwrap();
        assert_eq!(back, ni);
        assert_eq!(back.authority(), Some("example.com"));
    }
}
