//! Navigation frames: parsing, formatting and propagation
mod ephemeris;
mod xvt;

pub(crate) mod formatting;
pub(crate) mod parsing;

pub use ephemeris::{
    solve_kepler, Ephemeris, GlonassEphemeris, GlonassStatus, Kepler, KeplerEphemeris,
    KeplerSolution, Perturbations, SystemSpecific,
};

pub use xvt::{ReferenceFrame, Xvt};
