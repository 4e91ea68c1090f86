//! Parsing entry points and codec options.
//!
//! Input is classified once into [`NiInput`]; text is then dispatched on its
//! scheme to the grammar for that form. Every arm either yields a complete
//! [`Ni`] or an error.

use tracing::debug;
use url::Url;
use crate::checksum;
use crate::error::{NiError, Result};
use crate::ni::{decode_base64, Ni, Scheme, DEFAULT_AUTHORITY, WELL_KNOWN_PREFIX};
use crate::suite::Suite;

/// Something `parse` accepts: a binary record or URI text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NiInput<'a> {
    Binary(&'a [u8]),
    Text(&'a str),
}

impl<'a> From<&'a [u8]> for NiInput<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        NiInput::Binary(bytes)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for NiInput<'a> {
    fn from(bytes: &'a [u8; N]) -> Self {
        NiInput::Binary(bytes)
    }
}

impl<'a> From<&'a Vec<u8>> for NiInput<'a> {
    fn from(bytes: &'a Vec<u8>) -> Self {
        NiInput::Binary(bytes)
    }
}

impl<'a> From<&'a str> for NiInput<'a> {
    fn from(text: &'a str) -> Self {
        NiInput::Text(text)
    }
}

impl<'a> From<&'a String> for NiInput<'a> {
    fn from(text: &'a String) -> Self {
        NiInput::Text(text)
    }
}

#[derive(Debug, Clone)]
pub struct NiCodec {
    pub require_check_digit: bool,
    pub default_authority: String,
}

impl Default for NiCodec {
    fn default() -> Self {
        Self {
            require_check_digit: false,
            default_authority: DEFAULT_AUTHORITY.to_string(),
        }
    }
}

impl NiCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject `nih:` URIs that omit the trailing check digit
    pub fn with_require_check_digit(mut self, require_check_digit: bool) -> Self {
        self.require_check_digit = require_check_digit;
        self
    }

    /// Authority written into HTTP(S) URLs for records without one
    pub fn with_default_authority(mut self, default_authority: impl Into<String>) -> Self {
        self.default_authority = default_authority.into();
        self
    }

    pub fn parse<'a>(&self, input: impl Into<NiInput<'a>>) -> Result<Ni> {
        match input.into() {
            NiInput::Binary(bytes) => Ni::from_bytes(bytes),
            NiInput::Text(text) => self.parse_str(text),
        }
    }

    pub fn parse_str(&self, s: &str) -> Result<Ni> {
        let scheme = s
            .split_once(':')
            .and_then(|(scheme, _)| scheme.parse::<Scheme>().ok())
            .ok_or_else(|| NiError::NotNamedInformation(s.to_string()))?;

        debug!(%scheme, uri = s, "parsing named information URI");
        match scheme {
            Scheme::Ni => self.parse_ni(s),
            Scheme::Nih => self.parse_nih(s),
            Scheme::Http | Scheme::Https => self.parse_well_known(s),
        }
    }

    pub fn format(&self, ni: &Ni, scheme: Scheme) -> String {
        ni.format_with_default_authority(scheme, &self.default_authority)
    }

    /// `ni://[authority]/<algorithm>;<base64 hash>`
    fn parse_ni(&self, s: &str) -> Result<Ni> {
        let url = parse_url(s)?;
        let path = url
            .path()
            .strip_prefix('/')
            .ok_or_else(|| NiError::InvalidUri(format!("path must start with '/': {}", s)))?;

        let parts: Vec<&str> = path.split(';').collect();
        if parts.len() != 2 || parts.iter().any(|part| part.is_empty()) {
            return Err(NiError::InvalidUri(format!(
                "expected <algorithm>;<hash> in path, got {}",
                path
            )));
        }

        let ni = Ni::new(parts[0], decode_base64(parts[1])?);
        Ok(match authority(&url) {
            Some(authority) => ni.with_authority(authority),
            None => ni,
        })
    }

    /// `nih:<algorithm or suite ID>;<hex hash>[;<check digit>]`
    fn parse_nih(&self, s: &str) -> Result<Ni> {
        let rest = s
            .split_once(':')
            .map(|(_, rest)| rest)
            .unwrap_or_default();
        let (host, path) = rest
            .split_once(';')
            .ok_or_else(|| NiError::InvalidUri(format!("missing ';' after algorithm: {}", s)))?;
        if host.is_empty() || host.contains('/') {
            return Err(NiError::InvalidUri(format!("invalid algorithm '{}': {}", host, s)));
        }

        let suite = if host.bytes().all(|b| b.is_ascii_digit()) {
            let id = host
                .parse::<u8>()
                .map_err(|_| NiError::InvalidUri(format!("suite ID out of range: {}", host)))?;
            let suite = Suite::try_from(id)?;
            debug!(id, %suite, "resolved numeric suite ID");
            Some(suite)
        } else {
            None
        };

        let parts: Vec<&str> = path.split(';').collect();
        if parts.len() > 2 {
            return Err(NiError::InvalidUri(format!(
                "too many ';'-separated parts in {}",
                path
            )));
        }

        let hex_value: String = parts[0].chars().filter(|&c| c != '-').collect();
        if hex_value.is_empty() {
            return Err(NiError::InvalidUri(format!("empty hash value: {}", s)));
        }
        let hash = hex::decode(&hex_value)?;

        match parts.get(1) {
            Some(digit) => {
                if !checksum::verify(&hex_value, digit) {
                    let expected = checksum::check_digit(&hex_value);
                    debug!(%expected, found = *digit, "check digit mismatch");
                    return Err(NiError::ChecksumMismatch {
                        expected,
                        found: digit.to_string(),
                    });
                }
            }
            None if self.require_check_digit => return Err(NiError::MissingCheckDigit),
            None => {}
        }

        match suite {
            Some(suite) => Ni::from_suite(suite, hash),
            None => Ok(Ni::new(host, hash)),
        }
    }

    /// `http(s)://<authority>/.well-known/ni/<algorithm>/<base64 hash>`
    fn parse_well_known(&self, s: &str) -> Result<Ni> {
        let url = parse_url(s)?;
        let rest = url
            .path()
            .strip_prefix(WELL_KNOWN_PREFIX)
            .ok_or_else(|| NiError::NotWellKnown(s.to_string()))?;

        let parts: Vec<&str> = rest.split('/').collect();
        if parts.len() != 2 || parts.iter().any(|part| part.is_empty()) {
            return Err(NiError::InvalidUri(format!(
                "expected <algorithm>/<hash> after {}, got {}",
                WELL_KNOWN_PREFIX, rest
            )));
        }

        let ni = Ni::new(parts[0], decode_base64(parts[1])?);
        Ok(match authority(&url) {
            Some(authority) => ni.with_authority(authority),
            None => ni,
        })
    }
}

fn parse_url(s: &str) -> Result<Url> {
    Url::parse(s).map_err(|err| NiError::NotNamedInformation(format!("{}: {}", s, err)))
}

/// `host[:port]`, or `None` when the URL has no non-empty host
fn authority(url: &Url) -> Option<String> {
    let host = url.host_str().filter(|host| !host.is_empty())?;
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}
