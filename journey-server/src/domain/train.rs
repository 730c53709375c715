//! Train number ("ritnummer") type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an invalid train number.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid train number: {reason}")]
pub struct InvalidTrainNumber {
    reason: &'static str,
}

/// A validated train number.
///
/// Train numbers identify one scheduled run of a train for the day and
/// address the composition and journey-detail endpoints. They are always
/// positive integers; upstream sends them as strings in board payloads
/// and as integers elsewhere.
///
/// # Examples
///
/// ```
/// use journey_server::domain::TrainNumber;
///
/// let n = TrainNumber::parse("3049").unwrap();
/// assert_eq!(n.get(), 3049);
/// assert_eq!(n.to_string(), "3049");
///
/// assert!(TrainNumber::parse("0").is_err());
/// assert!(TrainNumber::parse("IC 3049").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct TrainNumber(u32);

impl TrainNumber {
    /// Parse a train number from its decimal string form.
    pub fn parse(s: &str) -> Result<Self, InvalidTrainNumber> {
        let s = s.trim();

        if s.is_empty() {
            return Err(InvalidTrainNumber {
                reason: "must not be empty",
            });
        }

        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidTrainNumber {
                reason: "must be decimal digits",
            });
        }

        let value: u32 = s.parse().map_err(|_| InvalidTrainNumber {
            reason: "out of range",
        })?;

        Self::try_from(value)
    }

    /// Returns the numeric value.
    pub fn get(&self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for TrainNumber {
    type Error = InvalidTrainNumber;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        if value == 0 {
            return Err(InvalidTrainNumber {
                reason: "must be positive",
            });
        }
        Ok(TrainNumber(value))
    }
}

impl From<TrainNumber> for u32 {
    fn from(n: TrainNumber) -> Self {
        n.0
    }
}

impl fmt::Debug for TrainNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TrainNumber({})", self.0)
    }
}

impl fmt::Display for TrainNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid() {
        assert_eq!(TrainNumber::parse("1").unwrap().get(), 1);
        assert_eq!(TrainNumber::parse("3049").unwrap().get(), 3049);
        assert_eq!(TrainNumber::parse(" 12345 ").unwrap().get(), 12345);
    }

    #[test]
    fn reject_zero() {
        assert!(TrainNumber::parse("0").is_err());
        assert!(TrainNumber::try_from(0).is_err());
    }

    #[test]
    fn reject_non_numeric() {
        assert!(TrainNumber::parse("").is_err());
        assert!(TrainNumber::parse("IC3049").is_err());
        assert!(TrainNumber::parse("-12").is_err());
        assert!(TrainNumber::parse("99999999999").is_err());
    }

    #[test]
    fn serde_as_integer() {
        let n = TrainNumber::parse("3049").unwrap();
        assert_eq!(serde_json::to_string(&n).unwrap(), "3049");

        let back: TrainNumber = serde_json::from_str("3049").unwrap();
        assert_eq!(back, n);

        assert!(serde_json::from_str::<TrainNumber>("0").is_err());
    }

    #[test]
    fn display() {
        let n = TrainNumber::parse("812").unwrap();
        assert_eq!(format!("{}", n), "812");
        assert_eq!(format!("{:?}", n), "TrainNumber(812)");
    }
}
