//! Fixed column NAV frame parsing
use log::trace;

use crate::{
    epoch::{native_timescale, parse_in_timescale},
    prelude::{Constellation, Epoch, ParsingError, TimeScale, Version, SV},
};

use std::str::FromStr;

/// Width of one orbit field
pub(crate) const FIELD_WIDTH: usize = 19;

/// Returns the `start..end` columns of this line, truncated to
/// what the line actually contains. Fails when a multibyte character
/// crosses one of the column limits.
pub(crate) fn column(line: &str, start: usize, end: usize) -> Result<&str, ParsingError> {
    let end = end.min(line.len());
    if start >= end {
        return Ok("");
    }
    line.get(start..end).ok_or_else(|| {
        if line.is_char_boundary(start) {
            ParsingError::CharBoundary(end)
        } else {
            ParsingError::CharBoundary(start)
        }
    })
}

/// Parses one floating point field. Fortran `D` exponents are tolerated,
/// blank fields are interpreted as zero.
pub(crate) fn parse_f64(content: &str) -> Result<f64, ParsingError> {
    let content = content.trim();
    if content.is_empty() {
        return Ok(0.0);
    }
    content
        .replace(|c: char| c == 'D' || c == 'd', "E")
        .parse::<f64>()
        .map_err(|_| ParsingError::Float(content.to_string()))
}

/// Column layout of NAV frames, which depends on the revision
#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) struct Layout {
    /// Width of the satellite identifier on the first line
    pub sv_width: usize,
    /// First column of the clock fields on the first line
    pub clock_offset: usize,
    /// Left margin of continuation lines
    pub margin: usize,
}

impl Layout {
    pub fn new(version: Version) -> Self {
        if version.major < 3 {
            Self {
                sv_width: 2,
                clock_offset: 22,
                margin: 3,
            }
        } else {
            Self {
                sv_width: 3,
                clock_offset: 23,
                margin: 4,
            }
        }
    }
}

/// Number of physical lines of one frame
pub(crate) fn block_length(constellation: Constellation, version: Version) -> usize {
    match constellation {
        Constellation::Glonass => {
            if version.has_glonass_status_line() {
                5
            } else {
                4
            }
        },
        c if c.is_sbas() => 4,
        _ => 8,
    }
}

/// Fields that must be present on each line of a frame,
/// in terms of 19 byte fields.
fn mandatory_fields(constellation: Constellation, line_index: usize) -> usize {
    match constellation {
        Constellation::Glonass => match line_index {
            0..=3 => [3, 4, 4, 4][line_index],
            _ => 1,
        },
        c if c.is_sbas() => [3, 4, 4, 4].get(line_index).copied().unwrap_or(0),
        _ => [3, 4, 4, 4, 4, 3, 4, 1]
            .get(line_index)
            .copied()
            .unwrap_or(0),
    }
}

/// Frame rows: the first one holds the 3 clock terms, every
/// following row the 4 orbit fields of one line.
pub(crate) type Rows = Vec<[f64; 4]>;

/// A frame being gathered, one line at a time
#[derive(Debug, Clone)]
pub(crate) struct PendingBlock {
    /// Satellite
    pub sv: SV,
    /// Epoch of the first line, in the native timescale
    pub epoch: Epoch,
    /// Parsed fields
    pub rows: Rows,
    /// Total number of lines
    pub length: usize,
    layout: Layout,
}

impl PendingBlock {
    /// Identifies the satellite and parses the first line of a frame.
    /// `constellation` is the file constellation, used by V2 files
    /// that only describe the PRN.
    pub fn new(
        line: &str,
        version: Version,
        constellation: Option<Constellation>,
    ) -> Result<Self, ParsingError> {
        let layout = Layout::new(version);

        let sv_str = column(line, 0, layout.sv_width)?;
        let sv = if version.major < 3 {
            let prn = sv_str
                .trim()
                .parse::<u8>()
                .map_err(|_| ParsingError::SV(sv_str.to_string()))?;
            let constellation = match constellation {
                Some(Constellation::Mixed) | None => {
                    return Err(ParsingError::Constellation(sv_str.to_string()))
                },
                Some(c) => c,
            };
            SV::new(constellation, prn)
        } else {
            let sv_str = sv_str.trim();
            if sv_str.len() < 2 {
                return Err(ParsingError::SV(sv_str.to_string()));
            }
            SV::from_str(sv_str).map_err(|_| ParsingError::SV(sv_str.to_string()))?
        };

        let required = layout.clock_offset + 3 * FIELD_WIDTH;
        if line.len() < required {
            return Err(ParsingError::LineTooShort {
                expected: required,
                found: line.len(),
            });
        }

        // SBAS and IRNSS frames are skipped, their epoch is parsed anyway
        let ts = native_timescale(sv.constellation).unwrap_or(TimeScale::GPST);
        let epoch = parse_in_timescale(column(line, layout.sv_width, layout.clock_offset)?, ts)?;

        let mut clock = [0.0_f64; 4];
        for (i, field) in clock.iter_mut().take(3).enumerate() {
            let start = layout.clock_offset + i * FIELD_WIDTH;
            *field = parse_f64(column(line, start, start + FIELD_WIDTH)?)?;
        }

        trace!("{}({}): new frame", epoch, sv);

        let length = block_length(sv.constellation, version);
        let mut rows = Rows::with_capacity(length);
        rows.push(clock);

        Ok(Self {
            sv,
            epoch,
            rows,
            length,
            layout,
        })
    }

    /// Parses one continuation line
    pub fn push(&mut self, line: &str) -> Result<(), ParsingError> {
        let line_index = self.rows.len();
        let required =
            self.layout.margin + mandatory_fields(self.sv.constellation, line_index) * FIELD_WIDTH;
        if line.len() < required {
            return Err(ParsingError::LineTooShort {
                expected: required,
                found: line.len(),
            });
        }
        let mut row = [0.0_f64; 4];
        for (i, field) in row.iter_mut().enumerate() {
            let start = self.layout.margin + i * FIELD_WIDTH;
            *field = parse_f64(column(line, start, start + FIELD_WIDTH)?)?;
        }
        self.rows.push(row);
        Ok(())
    }

    /// True once all lines were gathered
    pub fn is_complete(&self) -> bool {
        self.rows.len() == self.length
    }

    /// Number of lines still expected
    pub fn missing(&self) -> usize {
        self.length.saturating_sub(self.rows.len())
    }
}
