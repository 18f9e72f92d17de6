#![doc(html_logo_url = "https://raw.githubusercontent.com/georust/meta/master/logo/logo.png")]
#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

/*
 * RINEX-BRDC is part of the Geo-Rust framework.
 * Authors: Guillaume W. Bres <guillaume.bressaix@gmail.com> et al.
 * (cf. https://github.com/georust/rinex/graphs/contributors)
 * This framework is shipped under both Apache-2.0 and MIT License.
 *
 * Documentation: https://github.com/georust/rinex
 */

extern crate gnss_rs as gnss;

#[cfg(feature = "serde")]
#[macro_use]
extern crate serde;

pub mod cfg;
pub mod constants;
pub mod epoch;
pub mod header;
pub mod navigation;
pub mod store;
pub mod version;

mod error;
mod leap;

#[cfg(test)]
mod tests;

/// Package to include all basic structures
pub mod prelude {
    pub use crate::{
        cfg::Config,
        constants::OrbitModel,
        error::{Error, ParsingError},
        header::{Header, IonosphereModel, KbModel, NgModel, TimeSystemCorrection},
        leap::Leap,
        navigation::{
            Ephemeris, GlonassEphemeris, GlonassStatus, Kepler, KeplerEphemeris, Perturbations,
            ReferenceFrame, SystemSpecific, Xvt,
        },
        store::EphemerisStore,
        version::Version,
    };

    // pub re-export
    pub use gnss::prelude::{Constellation, SV};
    pub use hifitime::{Duration, Epoch, TimeScale};
}
