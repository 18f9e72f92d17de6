//! NAV header description and parsing
use std::{collections::BTreeMap, io::Write, str::FromStr};

use log::{debug, trace};

use crate::{
    leap::Leap,
    navigation::{formatting::format_float, parsing::column},
    prelude::{Constellation, ParsingError, TimeScale, Version},
};

mod correction;
mod ionosphere;

pub use correction::TimeSystemCorrection;
pub use ionosphere::{IonosphereModel, KbModel, NgModel};

use ionosphere::IonosphereTerms;

/// NAV [Header]. Correction terms are stored as is,
/// they are not used by the propagators.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Header {
    /// File revision
    pub version: Version,
    /// File constellation, [Constellation::Mixed] for multi GNSS files
    pub constellation: Option<Constellation>,
    /// Program that generated this file
    pub program: Option<String>,
    /// Operator, agency or receiver that generated this file
    pub run_by: Option<String>,
    /// File production date, as is
    pub date: Option<String>,
    /// Header comments, as is
    pub comments: Vec<String>,
    /// Ionospheric correction models, per constellation
    pub ionosphere: BTreeMap<Constellation, IonosphereModel>,
    /// Time system corrections
    pub time_corrections: Vec<TimeSystemCorrection>,
    /// Leap seconds
    pub leap: Option<Leap>,
    /// Number of merged files
    pub merged_files: Option<u32>,
    /// Digital object identifier
    pub doi: Option<String>,
    /// License of use
    pub license: Option<String>,
    /// Station information
    pub station: Option<String>,
}

/// Header parsing state, returned for every header line
#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) enum HeaderState {
    /// More header lines to come
    Pending,
    /// `END OF HEADER` was encountered
    Done,
}

fn optional_string(content: &str) -> Option<String> {
    let content = content.trim();
    if content.is_empty() {
        None
    } else {
        Some(content.to_string())
    }
}

impl Header {
    /// Returns true if this is a multi constellation file
    pub fn is_mixed(&self) -> bool {
        matches!(self.constellation, Some(Constellation::Mixed) | None)
    }

    /// Parses one header line.
    pub(crate) fn parse_line(&mut self, line: &str) -> Result<HeaderState, ParsingError> {
        if line.len() < 61 {
            return Err(ParsingError::LineTooShort {
                expected: 61,
                found: line.len(),
            });
        }
        if !line.is_char_boundary(60) {
            return Err(ParsingError::HeaderContent("label"));
        }

        let (content, label) = line.split_at(60);
        let label = label.trim();
        trace!("header: \"{}\"", label);

        match label {
            "END OF HEADER" => return Ok(HeaderState::Done),
            "COMMENT" => self.comments.push(content.trim_end().to_string()),
            "RINEX VERSION / TYPE" => self.parse_version_type(content)?,
            "PGM / RUN BY / DATE" => {
                self.program = optional_string(column(content, 0, 20)?);
                self.run_by = optional_string(column(content, 20, 40)?);
                self.date = optional_string(column(content, 40, 60)?);
            },
            "ION ALPHA" => {
                self.latch_ionosphere(IonosphereTerms::from_rinex2(content, false)?);
            },
            "ION BETA" => {
                self.latch_ionosphere(IonosphereTerms::from_rinex2(content, true)?);
            },
            "IONOSPHERIC CORR" => {
                self.latch_ionosphere(IonosphereTerms::from_rinex3(content)?);
            },
            "DELTA-UTC: A0,A1,T,W" => {
                let corr = TimeSystemCorrection::from_rinex2_delta_utc(content)?;
                self.time_corrections.push(corr);
            },
            "TIME SYSTEM CORR" => {
                let corr = TimeSystemCorrection::from_rinex3(content)?;
                self.time_corrections.push(corr);
            },
            "CORR TO SYSTEM TIME" => {
                let corr = TimeSystemCorrection::from_rinex2_glonass(content)?;
                self.time_corrections.push(corr);
            },
            "LEAP SECONDS" => {
                self.leap = Some(Leap::from_str(content)?);
            },
            "MERGED FILE" => {
                let count = content.trim();
                self.merged_files = Some(
                    count
                        .parse::<u32>()
                        .map_err(|_| ParsingError::Integer(count.to_string()))?,
                );
            },
            "DOI" => self.doi = optional_string(content),
            "LICENSE OF USE" => self.license = optional_string(content),
            "STATION INFORMATION" => self.station = optional_string(content),
            label => return Err(ParsingError::UnknownHeaderLabel(label.to_string())),
        }
        Ok(HeaderState::Pending)
    }

    fn parse_version_type(&mut self, content: &str) -> Result<(), ParsingError> {
        self.version = Version::from_str(column(content, 0, 20)?.trim())?;

        let type_str = column(content, 20, 40)?.trim();
        let constell_str = column(content, 40, 60)?.trim();

        self.constellation = match type_str.chars().next() {
            Some('N') => {
                if self.version.major < 3 || constell_str.is_empty() {
                    // old GPS NAVIGATION DATA
                    Some(Constellation::GPS)
                } else {
                    let code = column(constell_str, 0, 1)?;
                    Some(
                        Constellation::from_str(code)
                            .map_err(|_| ParsingError::Constellation(code.to_string()))?,
                    )
                }
            },
            // V2 GLONASS NAV
            Some('G') => Some(Constellation::Glonass),
            // V2 GEO NAV
            Some('H') => Some(Constellation::SBAS),
            _ => return Err(ParsingError::NotNavigationData),
        };
        debug!(
            "NAV V{} ({:?})",
            self.version,
            self.constellation.unwrap_or_default()
        );
        Ok(())
    }

    fn latch_ionosphere(&mut self, terms: IonosphereTerms) {
        let (constellation, alpha, beta) = match terms {
            IonosphereTerms::NequickG(a) => {
                let model = NgModel {
                    a: (a[0], a[1], a[2]),
                };
                self.ionosphere
                    .insert(Constellation::Galileo, IonosphereModel::NequickG(model));
                return;
            },
            IonosphereTerms::Alpha(constellation, alpha) => (constellation, Some(alpha), None),
            IonosphereTerms::Beta(constellation, beta) => (constellation, None, Some(beta)),
        };
        // alpha and beta terms come on separate lines, in any order
        let entry = self
            .ionosphere
            .entry(constellation)
            .or_insert(IonosphereModel::Klobuchar(KbModel::default()));
        if let IonosphereModel::Klobuchar(model) = entry {
            if let Some(a) = alpha {
                model.alpha = (a[0], a[1], a[2], a[3]);
            }
            if let Some(b) = beta {
                model.beta = (b[0], b[1], b[2], b[3]);
            }
        }
    }

    /// Formats this [Header] as a NAV V3 header, in given revision.
    pub(crate) fn format<W: Write>(&self, w: &mut W, version: Version) -> std::io::Result<()> {
        let constellation = match self.constellation {
            Some(Constellation::GPS) => "G: GPS",
            Some(Constellation::Glonass) => "R: GLONASS",
            Some(Constellation::Galileo) => "E: GALILEO",
            Some(Constellation::BeiDou) => "C: BEIDOU",
            Some(Constellation::QZSS) => "J: QZSS",
            Some(Constellation::IRNSS) => "I: IRNSS",
            Some(c) if c.is_sbas() => "S: SBAS",
            _ => "M: MIXED",
        };
        write_line(
            w,
            &format!(
                "{:>9}{:11}{:<20}{:<20}",
                format!("{}.{:02}", version.major, version.minor),
                "",
                "N: GNSS NAV DATA",
                constellation
            ),
            "RINEX VERSION / TYPE",
        )?;
        write_line(
            w,
            &format!(
                "{:<20}{:<20}{:<20}",
                self.program.as_deref().unwrap_or(""),
                self.run_by.as_deref().unwrap_or(""),
                self.date.as_deref().unwrap_or("")
            ),
            "PGM / RUN BY / DATE",
        )?;
        for comment in self.comments.iter() {
            write_line(w, comment, "COMMENT")?;
        }
        if let Some(merged) = self.merged_files {
            write_line(w, &format!("{:>9}", merged), "MERGED FILE")?;
        }
        if let Some(doi) = &self.doi {
            write_line(w, doi, "DOI")?;
        }
        if let Some(license) = &self.license {
            write_line(w, license, "LICENSE OF USE")?;
        }
        if let Some(station) = &self.station {
            write_line(w, station, "STATION INFORMATION")?;
        }
        for (constellation, model) in self.ionosphere.iter() {
            match model {
                IonosphereModel::NequickG(ng) => {
                    let content = format!(
                        "GAL  {:>12}{:>12}{:>12}{:>12}",
                        format_float(ng.a.0, 4),
                        format_float(ng.a.1, 4),
                        format_float(ng.a.2, 4),
                        format_float(0.0, 4),
                    );
                    write_line(w, &content, "IONOSPHERIC CORR")?;
                },
                IonosphereModel::Klobuchar(kb) => {
                    let code = match constellation {
                        Constellation::BeiDou => "BDS",
                        Constellation::QZSS => "QZS",
                        Constellation::IRNSS => "IRN",
                        _ => "GPS",
                    };
                    for (suffix, terms) in [('A', kb.alpha), ('B', kb.beta)] {
                        let content = format!(
                            "{}{} {:>12}{:>12}{:>12}{:>12}",
                            code,
                            suffix,
                            format_float(terms.0, 4),
                            format_float(terms.1, 4),
                            format_float(terms.2, 4),
                            format_float(terms.3, 4),
                        );
                        write_line(w, &content, "IONOSPHERIC CORR")?;
                    }
                },
            }
        }
        for corr in self.time_corrections.iter() {
            write_line(w, &corr.format_rinex3(), "TIME SYSTEM CORR")?;
        }
        if let Some(leap) = self.leap {
            let mut content = format!("{:>6}", leap.leap);
            if let (Some(tls), Some(week), Some(day)) = (leap.delta_tls, leap.week, leap.day) {
                content.push_str(&format!("{:>6}{:>6}{:>6}", tls, week, day));
                match leap.timescale {
                    Some(TimeScale::BDT) => content.push_str("BDS"),
                    Some(TimeScale::GST) => content.push_str("GAL"),
                    Some(TimeScale::QZSST) => content.push_str("QZS"),
                    Some(_) => content.push_str("GPS"),
                    None => {},
                }
            }
            write_line(w, &content, "LEAP SECONDS")?;
        }
        write_line(w, "", "END OF HEADER")
    }
}

fn write_line<W: Write>(w: &mut W, content: &str, label: &str) -> std::io::Result<()> {
    writeln!(w, "{:<60}{}", content, label)
}
