use thiserror::Error;

use crate::{
    leap::ParsingError as LeapParsingError,
    prelude::{Constellation, Epoch, SV},
    version::ParsingError as VersionParsingError,
};

/// Errors that may rise while parsing NAV content.
/// They are always wrapped into [Error::Parsing], which
/// locates the faulty line.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParsingError {
    #[error("unknown header label \"{0}\"")]
    UnknownHeaderLabel(String),
    #[error("header is not terminated")]
    MissingHeaderTerminator,
    #[error("not a navigation file")]
    NotNavigationData,
    #[error("version: {0}")]
    Version(#[from] VersionParsingError),
    #[error("line too short: {found} bytes while {expected} are required")]
    LineTooShort { expected: usize, found: usize },
    #[error("invalid floating point number \"{0}\"")]
    Float(String),
    #[error("invalid integer number \"{0}\"")]
    Integer(String),
    #[error("invalid epoch \"{0}\"")]
    Epoch(String),
    #[error("invalid satellite \"{0}\"")]
    SV(String),
    #[error("invalid constellation \"{0}\"")]
    Constellation(String),
    #[error("truncated block: {0} line(s) missing")]
    TruncatedBlock(usize),
    #[error("leap second: {0}")]
    LeapSecond(#[from] LeapParsingError),
    #[error("invalid \"{0}\" header content")]
    HeaderContent(&'static str),
    #[error("multibyte character across column {0}")]
    CharBoundary(usize),
}

/// Errors returned by the [EphemerisStore](crate::store::EphemerisStore)
/// and the orbit propagators.
#[derive(Error, Debug)]
pub enum Error {
    /// Fatal format error, ingestion is aborted
    #[error("line {line_number}: {kind} (\"{line}\")")]
    Parsing {
        line_number: usize,
        line: String,
        kind: ParsingError,
    },
    /// No ephemeris qualifies for this query
    #[error("no ephemeris for {0} at {1}")]
    NotFound(SV, Epoch),
    /// Kepler equation solver did not converge (strict mode)
    #[error("kepler solver did not converge: residual {residual:e} after {iterations} iterations")]
    KeplerNonConvergence { iterations: usize, residual: f64 },
    /// GLONASS integration over more than one hour (strict mode)
    #[error("glonass propagation over {0} s exceeds one hour")]
    GlonassOutOfRange(f64),
    #[error("{0} is not supported")]
    UnsupportedConstellation(Constellation),
    /// Query issued before any ingestion completed
    #[error("ephemeris store is not ready")]
    NotReady,
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
