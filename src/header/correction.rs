use crate::{
    navigation::{
        formatting::format_float,
        parsing::{column, parse_f64},
    },
    prelude::ParsingError,
};

/// [TimeSystemCorrection] describes one polynomial relation between two
/// timescales, as broadcast in NAV headers (`TIME SYSTEM CORR`,
/// `DELTA-UTC: A0,A1,T,W` and `CORR TO SYSTEM TIME`).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct TimeSystemCorrection {
    /// Correction type, like "GPUT" or "GAGP"
    pub kind: String,
    /// Constant term (s)
    pub a0: f64,
    /// First order term (s.s⁻¹)
    pub a1: f64,
    /// Reference time of week (s)
    pub t_ref: u32,
    /// Reference week counter
    pub week: u32,
}

fn parse_u32(content: &str) -> Result<u32, ParsingError> {
    let content = content.trim();
    if content.is_empty() {
        return Ok(0);
    }
    content
        .parse::<u32>()
        .map_err(|_| ParsingError::Integer(content.to_string()))
}

impl TimeSystemCorrection {
    /// Parses V3 `TIME SYSTEM CORR` content
    pub(crate) fn from_rinex3(content: &str) -> Result<Self, ParsingError> {
        let kind = column(content, 0, 4)?.trim();
        if kind.is_empty() {
            return Err(ParsingError::HeaderContent("TIME SYSTEM CORR"));
        }
        Ok(Self {
            kind: kind.to_string(),
            a0: parse_f64(column(content, 5, 22)?)?,
            a1: parse_f64(column(content, 22, 38)?)?,
            t_ref: parse_u32(column(content, 38, 45)?)?,
            week: parse_u32(column(content, 45, 50)?)?,
        })
    }

    /// Parses V2 `DELTA-UTC: A0,A1,T,W` content (GPS to UTC)
    pub(crate) fn from_rinex2_delta_utc(content: &str) -> Result<Self, ParsingError> {
        Ok(Self {
            kind: "GPUT".to_string(),
            a0: parse_f64(column(content, 3, 22)?)?,
            a1: parse_f64(column(content, 22, 41)?)?,
            t_ref: parse_u32(column(content, 41, 50)?)?,
            week: parse_u32(column(content, 50, 59)?)?,
        })
    }

    /// Parses V2 `CORR TO SYSTEM TIME` content (GLONASS to UTC).
    /// The reference date is not retained.
    pub(crate) fn from_rinex2_glonass(content: &str) -> Result<Self, ParsingError> {
        Ok(Self {
            kind: "GLUT".to_string(),
            a0: parse_f64(column(content, 21, 40)?)?,
            a1: 0.0,
            t_ref: 0,
            week: 0,
        })
    }

    /// Formats as V3 `TIME SYSTEM CORR` content
    pub(crate) fn format_rinex3(&self) -> String {
        format!(
            "{:<4} {:>17}{:>16} {:>6} {:>4}",
            self.kind,
            format_float(self.a0, 10),
            format_float(self.a1, 9),
            self.t_ref,
            self.week,
        )
    }
}
