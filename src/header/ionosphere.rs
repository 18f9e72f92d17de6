//! Ionospheric correction terms, as found in NAV headers.
//! They are stored, not interpreted.
use crate::{
    navigation::parsing::{column, parse_f64},
    prelude::{Constellation, ParsingError},
};

/// Klobuchar model payload
#[derive(Default, Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct KbModel {
    /// Alpha coefficients
    /// ((sec), (sec.semi-circle⁻¹), (sec.semi-circle⁻²), (sec.semi-circle⁻³))
    pub alpha: (f64, f64, f64, f64),
    /// Beta coefficients
    /// ((sec), (sec.semi-circle⁻¹), (sec.semi-circle⁻²), (sec.semi-circle⁻³))
    pub beta: (f64, f64, f64, f64),
}

/// NeQuick-G (Galileo) model payload
#[derive(Default, Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct NgModel {
    /// Effective ionisation level coefficients
    /// ((sfu), (sfu.semi-circle⁻¹), (sfu.semi-circle⁻²))
    pub a: (f64, f64, f64),
}

/// [IonosphereModel] broadcast in NAV headers
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum IonosphereModel {
    /// Klobuchar Model
    Klobuchar(KbModel),
    /// NeQuick-G Model
    NequickG(NgModel),
}

impl IonosphereModel {
    /// Returns [KbModel] if this is a Klobuchar model
    pub fn as_klobuchar(&self) -> Option<&KbModel> {
        match self {
            Self::Klobuchar(model) => Some(model),
            _ => None,
        }
    }
    /// Returns [NgModel] if this is a NeQuick-G model
    pub fn as_nequick_g(&self) -> Option<&NgModel> {
        match self {
            Self::NequickG(model) => Some(model),
            _ => None,
        }
    }
}

/// Kind of coefficients found on one header line
#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) enum IonosphereTerms {
    Alpha(Constellation, [f64; 4]),
    Beta(Constellation, [f64; 4]),
    NequickG([f64; 3]),
}

fn parse_fields<const N: usize>(content: &str, offset: usize) -> Result<[f64; N], ParsingError> {
    let mut fields = [0.0_f64; N];
    for (i, field) in fields.iter_mut().enumerate() {
        let start = offset + i * 12;
        *field = parse_f64(column(content, start, start + 12)?)?;
    }
    Ok(fields)
}

impl IonosphereTerms {
    /// Parses V2 "ION ALPHA" / "ION BETA" content (GPS)
    pub(crate) fn from_rinex2(content: &str, beta: bool) -> Result<Self, ParsingError> {
        let fields = parse_fields::<4>(content, 2)?;
        if beta {
            Ok(Self::Beta(Constellation::GPS, fields))
        } else {
            Ok(Self::Alpha(Constellation::GPS, fields))
        }
    }

    /// Parses V3 "IONOSPHERIC CORR" content
    pub(crate) fn from_rinex3(content: &str) -> Result<Self, ParsingError> {
        let system = column(content, 0, 4)?;
        if system.trim() == "GAL" {
            return Ok(Self::NequickG(parse_fields::<3>(content, 5)?));
        }
        let constellation = match column(system, 0, 3)? {
            "GPS" => Constellation::GPS,
            "BDS" => Constellation::BeiDou,
            "QZS" => Constellation::QZSS,
            "IRN" => Constellation::IRNSS,
            _ => return Err(ParsingError::HeaderContent("IONOSPHERIC CORR")),
        };
        let fields = parse_fields::<4>(content, 5)?;
        if system.ends_with('B') {
            Ok(Self::Beta(constellation, fields))
        } else {
            Ok(Self::Alpha(constellation, fields))
        }
    }
}
