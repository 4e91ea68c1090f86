//! Named Information identifiers (RFC 6920).
//!
//! An identifier names content by the hash of it. The same identifier can be
//! written as a binary record, an `ni:` URI, a human-typable `nih:` URI with
//! a check digit, or an `http(s)` URL under `/.well-known/ni/`:
//!
//! ```
//! use ni_uri::{Ni, Scheme};
//!
//! let ni = ni_uri::parse("nih:3;532690-57e12f-e2b74b-a07c89-2560a2;f").unwrap();
//! assert_eq!(ni.algorithm(), "sha-256-120");
//! assert_eq!(ni.format(Scheme::Ni), "ni:///sha-256-120;UyaQV-Ev4rdLoHyJJWCi");
//! assert_eq!(ni, Ni::from_bytes(&ni.to_bytes().unwrap()).unwrap());
//! ```

pub mod checksum;
pub mod codec;
pub mod error;
pub mod ni;
pub mod suite;

pub use checksum::check_digit;
pub use codec::{NiCodec, NiInput};
pub use error::{NiError, Result};
pub use ni::{Encoding, Ni, Scheme};
pub use suite::Suite;

/// Parse a binary record or any of the URI forms with default options.
pub fn parse<'a>(input: impl Into<NiInput<'a>>) -> Result<Ni> {
    NiCodec::default().parse(input)
}

/// Parse one of the URI forms with default options.
pub fn parse_str(s: &str) -> Result<Ni> {
    NiCodec::default().parse_str(s)
}
