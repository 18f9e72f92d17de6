//! `LEAP SECONDS` header description
use hifitime::TimeScale;
use thiserror::Error;

/// [Leap] describes leap seconds.
/// GLO = UTC = GPS - ΔtLS
/// GPS = UTC + ΔtLS
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Leap {
    /// Current number of leap seconds
    pub leap: u32,
    /// ΔtLS: future or past leap second(s)
    pub delta_tls: Option<u32>,
    /// Week counter
    pub week: Option<u32>,
    /// Day counter
    pub day: Option<u32>,
    /// Timescale the description applies to
    pub timescale: Option<TimeScale>,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParsingError {
    #[error("failed to parse leap integer number")]
    ParseIntError(#[from] std::num::ParseIntError),
    #[error("unknown timescale \"{0}\"")]
    TimeScale(String),
    #[error("empty leap second description")]
    Empty,
    #[error("multibyte character across column {0}")]
    CharBoundary(usize),
}

impl std::str::FromStr for Leap {
    type Err = ParsingError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let items = s.split_ascii_whitespace().collect::<Vec<_>>();
        let first = items.first().ok_or(ParsingError::Empty)?;
        if items.len() < 3 {
            return Ok(Self {
                leap: first.parse::<u32>()?,
                ..Default::default()
            });
        }
        // 4 fixed width I6 fields, followed by a timescale identifier
        let mut ls = Self::default();
        let mut rem = s;
        for index in 0..4 {
            let width = rem.len().min(6);
            if !rem.is_char_boundary(width) {
                return Err(ParsingError::CharBoundary(index * 6 + width));
            }
            let (field, r) = rem.split_at(width);
            rem = r;
            let value = field.trim().parse::<u32>()?;
            match index {
                0 => ls.leap = value,
                1 => ls.delta_tls = Some(value),
                2 => ls.week = Some(value),
                _ => ls.day = Some(value),
            }
        }
        ls.timescale = match rem.trim() {
            "" => None,
            "GPS" | "GPST" => Some(TimeScale::GPST),
            "GAL" | "GST" => Some(TimeScale::GST),
            "BDS" | "BDT" => Some(TimeScale::BDT),
            "QZS" | "QZSST" => Some(TimeScale::QZSST),
            other => return Err(ParsingError::TimeScale(other.to_string())),
        };
        Ok(ls)
    }
}
