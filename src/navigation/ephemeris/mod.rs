use crate::{
    cfg::Config,
    constants::OrbitModel,
    navigation::{parsing::{PendingBlock, Rows}, Xvt},
    prelude::{Constellation, Epoch, Error, ParsingError, SV},
};

mod glonass;
mod kepler;

pub use glonass::{GlonassEphemeris, GlonassStatus};
pub use kepler::{
    solve_kepler, Kepler, KeplerEphemeris, KeplerSolution, Perturbations, SystemSpecific,
};

/// [Ephemeris] is one broadcast message, for one satellite
/// at one reference epoch.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Ephemeris {
    /// GPS, QZSS, Galileo and BeiDou keplerian ephemeris
    Kepler(KeplerEphemeris),
    /// GLONASS cartesian ephemeris
    Glonass(GlonassEphemeris),
}

impl Ephemeris {
    /// Builds [Ephemeris] from a completed frame.
    /// Returns None for SBAS and IRNSS frames, which are not supported.
    pub(crate) fn from_block(block: &PendingBlock) -> Result<Option<Self>, ParsingError> {
        match block.sv.constellation {
            Constellation::GPS
            | Constellation::QZSS
            | Constellation::Galileo
            | Constellation::BeiDou => Ok(Some(Self::Kepler(KeplerEphemeris::from_rows(
                block.sv,
                block.epoch,
                &block.rows,
            )?))),
            Constellation::Glonass => Ok(Some(Self::Glonass(GlonassEphemeris::from_rows(
                block.sv,
                block.epoch,
                &block.rows,
            )?))),
            _ => Ok(None),
        }
    }

    /// Returns the frame rows describing this [Ephemeris]
    pub(crate) fn to_rows(&self) -> Rows {
        match self {
            Self::Kepler(eph) => eph.to_rows(),
            Self::Glonass(eph) => eph.to_rows(),
        }
    }

    /// Satellite
    pub fn sv(&self) -> SV {
        match self {
            Self::Kepler(eph) => eph.sv,
            Self::Glonass(eph) => eph.sv,
        }
    }

    /// Epoch of the frame (time of clock), in the native timescale
    pub fn toc(&self) -> Epoch {
        match self {
            Self::Kepler(eph) => eph.toc,
            Self::Glonass(eph) => eph.epoch,
        }
    }

    /// Reference epoch of the orbit, in the native timescale.
    /// This is tb for GLONASS.
    pub fn toe(&self) -> Epoch {
        match self {
            Self::Kepler(eph) => eph.toe,
            Self::Glonass(eph) => eph.epoch,
        }
    }

    /// Satellite health, as broadcast
    pub fn health(&self) -> f64 {
        match self {
            Self::Kepler(eph) => eph.health,
            Self::Glonass(eph) => eph.health,
        }
    }

    /// Returns [KeplerEphemeris] if this is a keplerian ephemeris
    pub fn as_kepler(&self) -> Option<&KeplerEphemeris> {
        match self {
            Self::Kepler(eph) => Some(eph),
            _ => None,
        }
    }

    /// Returns [GlonassEphemeris] if this is a GLONASS ephemeris
    pub fn as_glonass(&self) -> Option<&GlonassEphemeris> {
        match self {
            Self::Glonass(eph) => Some(eph),
            _ => None,
        }
    }

    /// True if this [Ephemeris] carries the V3.05 GLONASS status line
    pub(crate) fn has_status_line(&self) -> bool {
        matches!(self, Self::Glonass(eph) if eph.status.is_some())
    }

    /// Returns true if this [Ephemeris] is healthy and fit for `t`
    pub fn is_valid(&self, t: Epoch) -> bool {
        match self {
            Self::Kepler(eph) => eph.is_valid(t),
            Self::Glonass(eph) => eph.is_valid(t),
        }
    }

    /// Resolves the satellite state at `t`.
    /// BeiDou satellites declared geostationary in [Config] follow the GEO branch.
    pub fn propagate(&self, t: Epoch, cfg: &Config) -> Result<Xvt, Error> {
        match self {
            Self::Kepler(eph) => {
                let sv = eph.sv;
                let mut model = OrbitModel::new(sv.constellation)
                    .ok_or(Error::UnsupportedConstellation(sv.constellation))?;
                if sv.constellation == Constellation::BeiDou && cfg.is_bds_geo(sv.prn) {
                    model = model.geostationary();
                }
                eph.propagate(t, &model, cfg)
            },
            Self::Glonass(eph) => eph.propagate(t, cfg),
        }
    }
}
