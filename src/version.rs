//! NAV RINEX revision
use thiserror::Error;

/// Most recent revision this crate can ingest
pub const SUPPORTED_VERSION: Version = Version { major: 3, minor: 5 };

/// [Version] describes the RINEX revision of a NAV file.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Version {
    /// Version major number
    pub major: u8,
    /// Version minor number
    pub minor: u8,
}

#[derive(Clone, Debug, PartialEq, Error)]
pub enum ParsingError {
    #[error("non supported version \"{0}\"")]
    NotSupported(String),
    #[error("failed to parse version")]
    ParseIntError(#[from] std::num::ParseIntError),
}

impl Default for Version {
    fn default() -> Self {
        SUPPORTED_VERSION
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}.{:02}", self.major, self.minor)
    }
}

impl std::str::FromStr for Version {
    type Err = ParsingError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let version = match s.split_once('.') {
            Some((major, minor)) => Self {
                major: major.parse::<u8>()?,
                minor: match minor.len() {
                    0 => 0,
                    n => minor
                        .get(..n.min(2))
                        .ok_or_else(|| ParsingError::NotSupported(s.to_string()))?
                        .parse::<u8>()?,
                },
            },
            None => Self {
                major: s.parse::<u8>()?,
                minor: 0,
            },
        };
        if version.is_supported() {
            Ok(version)
        } else {
            Err(ParsingError::NotSupported(s.to_string()))
        }
    }
}

impl Version {
    /// Builds a new [Version]
    pub fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }
    /// Returns true if this revision can be ingested.
    /// V4 files use a different frame structure and are not supported.
    pub fn is_supported(&self) -> bool {
        self.major >= 2 && *self <= SUPPORTED_VERSION
    }
    /// Returns true if the GLONASS frames of this revision
    /// carry the fourth (status) orbit line.
    pub(crate) fn has_glonass_status_line(&self) -> bool {
        *self >= Self::new(3, 5)
    }
}
