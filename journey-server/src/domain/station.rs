//! Station code types.

use std::fmt;

use serde::{Serialize, Serializer};

/// Maximum length of a station identifier.
const MAX_LEN: usize = 10;

/// Error returned when parsing an invalid station code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station code: {reason}")]
pub struct InvalidStationCode {
    reason: &'static str,
}

/// An upstream station identifier.
///
/// Either a short station code (`UT`, `ASD`, `AMF`) or a numeric UIC code
/// (`8400621`). Both address the same station endpoints upstream, so they
/// share one type. Codes are stored uppercase.
///
/// # Examples
///
/// ```
/// use journey_server::domain::StationCode;
///
/// let ut = StationCode::parse("UT").unwrap();
/// assert_eq!(ut.as_str(), "UT");
/// assert!(!ut.is_uic());
///
/// let uic = StationCode::parse("8400621").unwrap();
/// assert!(uic.is_uic());
///
/// // Lowercase is rejected by `parse` but accepted by `parse_normalized`
/// assert!(StationCode::parse("ut").is_err());
/// assert!(StationCode::parse_normalized(" ut ").is_ok());
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct StationCode(String);

impl StationCode {
    /// Parse a station code.
    ///
    /// The input must be 1-10 uppercase ASCII letters or digits.
    pub fn parse(s: &str) -> Result<Self, InvalidStationCode> {
        if s.is_empty() {
            return Err(InvalidStationCode {
                reason: "must not be empty",
            });
        }

        if s.len() > MAX_LEN {
            return Err(InvalidStationCode {
                reason: "must be at most 10 characters",
            });
        }

        if !s
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
        {
            return Err(InvalidStationCode {
                reason: "must be uppercase ASCII letters or digits",
            });
        }

        Ok(StationCode(s.to_string()))
    }

    /// Parse user input, trimming whitespace and uppercasing first.
    pub fn parse_normalized(s: &str) -> Result<Self, InvalidStationCode> {
        Self::parse(&s.trim().to_ascii_uppercase())
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is a numeric UIC code rather than a short station code.
    pub fn is_uic(&self) -> bool {
        self.0.bytes().all(|b| b.is_ascii_digit())
    }
}

impl fmt::Debug for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationCode({})", self.0)
    }
}

impl fmt::Display for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for StationCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_codes() {
        assert!(StationCode::parse("UT").is_ok());
        assert!(StationCode::parse("ASD").is_ok());
        assert!(StationCode::parse("AMF").is_ok());
        assert!(StationCode::parse("8400621").is_ok());
    }

    #[test]
    fn reject_lowercase() {
        assert!(StationCode::parse("ut").is_err());
        assert!(StationCode::parse("Asd").is_err());
    }

    #[test]
    fn reject_wrong_length() {
        assert!(StationCode::parse("").is_err());
        assert!(StationCode::parse("ABCDEFGHIJK").is_err());
    }

    #[test]
    fn reject_punctuation() {
        assert!(StationCode::parse("U-T").is_err());
        assert!(StationCode::parse("U T").is_err());
        assert!(StationCode::parse("ÜT").is_err());
    }

    #[test]
    fn normalized_parse() {
        let code = StationCode::parse_normalized("  asd\n").unwrap();
        assert_eq!(code.as_str(), "ASD");
    }

    #[test]
    fn uic_detection() {
        assert!(StationCode::parse("8400058").unwrap().is_uic());
        assert!(!StationCode::parse("UT").unwrap().is_uic());
        assert!(!StationCode::parse("A1").unwrap().is_uic());
    }

    #[test]
    fn display_and_debug() {
        let code = StationCode::parse("UT").unwrap();
        assert_eq!(format!("{}", code), "UT");
        assert_eq!(format!("{:?}", code), "StationCode(UT)");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Roundtrip: parse then as_str returns the original
        #[test]
        fn roundtrip(s in "[A-Z0-9]{1,10}") {
            let code = StationCode::parse(&s).unwrap();
            prop_assert_eq!(code.as_str(), s.as_str());
        }

        /// Lowercase letters are always rejected
        #[test]
        fn lowercase_rejected(s in "[a-z]{1,10}") {
            prop_assert!(StationCode::parse(&s).is_err());
        }

        /// Normalization accepts any case
        #[test]
        fn normalized_accepts_any_case(s in "[a-zA-Z0-9]{1,10}") {
            prop_assert!(StationCode::parse_normalized(&s).is_ok());
        }
    }
}
