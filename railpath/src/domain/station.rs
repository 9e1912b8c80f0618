//! Station types.

use std::fmt;
use std::hash::{Hash, Hasher};

/// Error returned when parsing an invalid station telecode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station code: {reason}")]
pub struct InvalidStationCode {
    reason: &'static str,
}

/// A valid 3-letter station telecode (e.g. `VAP` for Beijing North).
///
/// Telecodes are always 3 uppercase ASCII letters. This type guarantees
/// that any `StationCode` value is valid by construction.
///
/// # Examples
///
/// ```
/// use railpath::domain::StationCode;
///
/// let vap = StationCode::parse("VAP").unwrap();
/// assert_eq!(vap.as_str(), "VAP");
///
/// // Lowercase is rejected
/// assert!(StationCode::parse("vap").is_err());
///
/// // Wrong length is rejected
/// assert!(StationCode::parse("VA").is_err());
/// assert!(StationCode::parse("VAPX").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StationCode([u8; 3]);

impl StationCode {
    /// Parse a telecode from a string.
    ///
    /// The input must be exactly 3 uppercase ASCII letters (A-Z).
    pub fn parse(s: &str) -> Result<Self, InvalidStationCode> {
        let bytes = s.as_bytes();

        if bytes.len() != 3 {
            return Err(InvalidStationCode {
                reason: "must be exactly 3 characters",
            });
        }

        if !bytes.iter().all(u8::is_ascii_uppercase) {
            return Err(InvalidStationCode {
                reason: "must be uppercase ASCII letters A-Z",
            });
        }

        Ok(StationCode([bytes[0], bytes[1], bytes[2]]))
    }

    /// Returns the telecode as a string slice.
    pub fn as_str(&self) -> &str {
        // Only ASCII uppercase letters are ever stored
        std::str::from_utf8(&self.0).unwrap_or("???")
    }
}

impl fmt::Debug for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationCode({})", self.as_str())
    }
}

impl fmt::Display for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A station from the station directory.
///
/// Two stations are the same station when their telecodes match; the
/// names are display data and take no part in equality.
#[derive(Clone)]
pub struct Station {
    code: StationCode,
    name: String,
    pinyin: String,
    abbreviation: String,
}

impl Station {
    /// Create a station from its directory fields.
    pub fn new(
        code: StationCode,
        name: impl Into<String>,
        pinyin: impl Into<String>,
        abbreviation: impl Into<String>,
    ) -> Self {
        Self {
            code,
            name: name.into(),
            pinyin: pinyin.into(),
            abbreviation: abbreviation.into(),
        }
    }

    /// The station telecode.
    pub fn code(&self) -> StationCode {
        self.code
    }

    /// The user-facing station name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The romanized (pinyin) name.
    pub fn pinyin(&self) -> &str {
        &self.pinyin
    }

    /// The abbreviated romanized name. Not unique across stations.
    pub fn abbreviation(&self) -> &str {
        &self.abbreviation
    }
}

impl PartialEq for Station {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for Station {}

impl Hash for Station {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state);
    }
}

impl fmt::Debug for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Station({} {})", self.code, self.name)
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.code)
    }
}
