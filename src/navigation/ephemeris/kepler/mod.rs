//! Keplerian ephemerides: GPS, QZSS, Galileo and BeiDou
use log::{debug, warn};

use crate::{
    cfg::Config,
    constants::{OrbitModel, GST_WEEK_OFFSET, HALF_WEEK_SECONDS, WEEK_SECONDS},
    epoch::{fold_half_week, from_week_seconds},
    navigation::{parsing::Rows, ReferenceFrame, Xvt},
    prelude::{Constellation, Epoch, Error, ParsingError, SV},
};

use hifitime::Unit;

mod helper;
mod solver;

use helper::Helper;

pub use solver::{solve_kepler, KeplerSolution};

/// [Kepler] stores the keplerian parameters
#[derive(Default, Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Kepler {
    /// Square root of the semi major axis (m^1/2)
    pub sqrt_a: f64,
    /// Eccentricity (n.a)
    pub e: f64,
    /// Inclination angle at reference time (rad)
    pub i_0: f64,
    /// Longitude of ascending node at weekly epoch (rad)
    pub omega_0: f64,
    /// Argument of perigee (rad)
    pub omega: f64,
    /// Mean anomaly at reference time (rad)
    pub m_0: f64,
}

impl Kepler {
    /// Semi major axis (m)
    pub fn semi_major_axis(&self) -> f64 {
        self.sqrt_a.powi(2)
    }
}

/// Orbit [Perturbations]
#[derive(Default, Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Perturbations {
    /// Mean motion difference from computed value (rad.s⁻¹)
    pub dn: f64,
    /// Inclination rate of change (rad.s⁻¹)
    pub i_dot: f64,
    /// Right ascension rate of change (rad.s⁻¹)
    pub omega_dot: f64,
    /// Amplitude of sine harmonic correction term of the argument
    /// of latitude (rad)
    pub cus: f64,
    /// Amplitude of cosine harmonic correction term of the argument
    /// of latitude (rad)
    pub cuc: f64,
    /// Amplitude of sine harmonic correction term of the angle of inclination (rad)
    pub cis: f64,
    /// Amplitude of cosine harmonic correction term of the angle of inclination (rad)
    pub cic: f64,
    /// Amplitude of sine harmonic correction term of the orbit radius (m)
    pub crs: f64,
    /// Amplitude of cosine harmonic correction term of the orbit radius (m)
    pub crc: f64,
}

/// Fields that only exist for some constellations
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SystemSpecific {
    /// GPS and QZSS
    Gps {
        /// Codes on L2 channel
        l2_codes: f64,
        /// L2P data flag
        l2p_flag: f64,
        /// Total group delay (s)
        tgd: f64,
        /// Issue of data, clock
        iodc: f64,
        /// Fit interval (hours)
        fit_interval: f64,
    },
    Galileo {
        /// Data sources bitmask
        data_sources: f64,
        /// E5a/E1 broadcast group delay (s)
        bgd_e5a_e1: f64,
        /// E5b/E1 broadcast group delay (s)
        bgd_e5b_e1: f64,
    },
    BeiDou {
        /// B1/B3 group delay (s)
        tgd1: f64,
        /// B2/B3 group delay (s)
        tgd2: f64,
        /// Age of data, clock
        aodc: f64,
    },
}

/// Keplerian broadcast ephemeris, for one satellite at one reference epoch
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct KeplerEphemeris {
    /// Satellite
    pub sv: SV,
    /// Time of clock, in the constellation timescale
    pub toc: Epoch,
    /// Clock bias af0 (s)
    pub clock_bias: f64,
    /// Clock drift af1 (s.s⁻¹)
    pub clock_drift: f64,
    /// Clock drift rate af2 (s.s⁻²)
    pub clock_drift_rate: f64,
    /// Issue of data: IODE (GPS, QZSS), IODnav (Galileo) or AODE (BeiDou)
    pub iode: f64,
    /// Keplerian parameters
    pub kepler: Kepler,
    /// Orbit perturbations
    pub perturbations: Perturbations,
    /// Time of ephemeris, resolved to an absolute epoch
    /// in the constellation timescale
    pub toe: Epoch,
    /// Time of ephemeris, as broadcast (seconds of week)
    pub toe_sow: f64,
    /// Week counter, as broadcast. Galileo weeks are GPS aligned.
    pub week: u32,
    /// SV accuracy (m), or SISA for Galileo
    pub accuracy: f64,
    /// SV health (SatH1 for BeiDou)
    pub health: f64,
    /// Transmission time of message (seconds of week)
    pub tx_tow: f64,
    /// Constellation dependent terms
    pub system: SystemSpecific,
}

/// Folds a broadcast week counter into the native week counter
fn native_week(constellation: Constellation, week: u32) -> u32 {
    if constellation == Constellation::Galileo && week >= GST_WEEK_OFFSET {
        week - GST_WEEK_OFFSET
    } else {
        week
    }
}

/// Resolves the time of ephemeris from the broadcast week. The week counter
/// is moved by one when transmission and toe lie on each side of a week boundary.
fn resolve_toe(sv: SV, week: u32, toe_sow: f64, tx_tow: f64, toc: Epoch) -> Epoch {
    let mut week = week as i64;
    if (0.0..WEEK_SECONDS).contains(&tx_tow) {
        let dt = toe_sow - tx_tow;
        if dt < -HALF_WEEK_SECONDS {
            debug!("{}({}): toe week rollover (+1)", toc, sv);
            week += 1;
        } else if dt > HALF_WEEK_SECONDS {
            debug!("{}({}): toe week rollover (-1)", toc, sv);
            week -= 1;
        }
    }
    from_week_seconds(week, toe_sow, toc.time_scale)
}

/// Shifts `t` by whole weeks, so it lies within half a week of `reference`.
pub(crate) fn align_weeks(t: Epoch, reference: Epoch) -> Epoch {
    let weeks = ((t - reference).to_seconds() / WEEK_SECONDS).round() as i64;
    if weeks == 0 {
        t
    } else {
        t - weeks * Unit::Week
    }
}

fn parse_week(value: f64) -> Result<u32, ParsingError> {
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= u32::MAX as f64 {
        Ok(value as u32)
    } else {
        Err(ParsingError::Integer(format!("{}", value)))
    }
}

impl KeplerEphemeris {
    /// Builds [KeplerEphemeris] from the 8 rows of a frame
    pub(crate) fn from_rows(sv: SV, toc: Epoch, rows: &[[f64; 4]]) -> Result<Self, ParsingError> {
        if rows.len() < 8 {
            return Err(ParsingError::TruncatedBlock(8 - rows.len()));
        }

        let kepler = Kepler {
            m_0: rows[1][3],
            e: rows[2][1],
            sqrt_a: rows[2][3],
            omega_0: rows[3][2],
            i_0: rows[4][0],
            omega: rows[4][2],
        };

        let perturbations = Perturbations {
            crs: rows[1][1],
            dn: rows[1][2],
            cuc: rows[2][0],
            cus: rows[2][2],
            cic: rows[3][1],
            cis: rows[3][3],
            crc: rows[4][1],
            omega_dot: rows[4][3],
            i_dot: rows[5][0],
        };

        let system = match sv.constellation {
            Constellation::Galileo => SystemSpecific::Galileo {
                data_sources: rows[5][1],
                bgd_e5a_e1: rows[6][2],
                bgd_e5b_e1: rows[6][3],
            },
            Constellation::BeiDou => SystemSpecific::BeiDou {
                tgd1: rows[6][2],
                tgd2: rows[6][3],
                aodc: rows[7][1],
            },
            _ => SystemSpecific::Gps {
                l2_codes: rows[5][1],
                l2p_flag: rows[5][3],
                tgd: rows[6][2],
                iodc: rows[6][3],
                fit_interval: rows[7][1],
            },
        };

        let toe_sow = rows[3][0];
        let week = parse_week(rows[5][2])?;
        let tx_tow = rows[7][0];

        let resolved = resolve_toe(
            sv,
            native_week(sv.constellation, week),
            toe_sow,
            tx_tow,
            toc,
        );

        // BDS toc is shifted by whole weeks, to the occurrence nearest
        // to toe. Other systems have their toe aligned on the clock epoch
        let (toc, toe) = if sv.constellation == Constellation::BeiDou {
            (align_weeks(toc, resolved), resolved)
        } else {
            (toc, align_weeks(resolved, toc))
        };

        Ok(Self {
            sv,
            toc,
            clock_bias: rows[0][0],
            clock_drift: rows[0][1],
            clock_drift_rate: rows[0][2],
            iode: rows[1][0],
            kepler,
            perturbations,
            toe,
            toe_sow,
            week,
            accuracy: rows[6][0],
            health: rows[6][1],
            tx_tow,
            system,
        })
    }

    /// Returns the 8 rows of the NAV frame describing this ephemeris
    pub(crate) fn to_rows(&self) -> Rows {
        let (x5, y5, a6, b6, c7) = match self.system {
            SystemSpecific::Gps {
                l2_codes,
                l2p_flag,
                tgd,
                iodc,
                fit_interval,
            } => (l2_codes, l2p_flag, tgd, iodc, fit_interval),
            SystemSpecific::Galileo {
                data_sources,
                bgd_e5a_e1,
                bgd_e5b_e1,
            } => (data_sources, 0.0, bgd_e5a_e1, bgd_e5b_e1, 0.0),
            SystemSpecific::BeiDou { tgd1, tgd2, aodc } => (0.0, 0.0, tgd1, tgd2, aodc),
        };
        vec![
            [self.clock_bias, self.clock_drift, self.clock_drift_rate, 0.0],
            [
                self.iode,
                self.perturbations.crs,
                self.perturbations.dn,
                self.kepler.m_0,
            ],
            [
                self.perturbations.cuc,
                self.kepler.e,
                self.perturbations.cus,
                self.kepler.sqrt_a,
            ],
            [
                self.toe_sow,
                self.perturbations.cic,
                self.kepler.omega_0,
                self.perturbations.cis,
            ],
            [
                self.kepler.i_0,
                self.perturbations.crc,
                self.kepler.omega,
                self.perturbations.omega_dot,
            ],
            [self.perturbations.i_dot, x5, self.week as f64, y5],
            [self.accuracy, self.health, a6, b6],
            [self.tx_tow, c7, 0.0, 0.0],
        ]
    }

    /// Half width (s) of the interval this ephemeris is fit for,
    /// centered on toe.
    pub fn fit_half_width(&self) -> f64 {
        match self.system {
            SystemSpecific::Gps { fit_interval, .. } => {
                if fit_interval > 0.0 {
                    fit_interval * 3600.0 / 2.0
                } else {
                    7200.0
                }
            },
            SystemSpecific::Galileo { .. } => 10800.0,
            SystemSpecific::BeiDou { .. } => 21600.0,
        }
    }

    /// Returns true if this ephemeris is healthy and `t` lies
    /// within its fit interval.
    pub fn is_valid(&self, t: Epoch) -> bool {
        let t = t.to_time_scale(self.toe.time_scale);
        self.health == 0.0 && (t - self.toe).to_seconds().abs() <= self.fit_half_width()
    }

    /// Returns (bias, drift) of the onboard clock at `t`, without
    /// relativistic correction.
    pub fn clock_correction(&self, t: Epoch) -> (f64, f64) {
        let t = t.to_time_scale(self.toc.time_scale);
        let dt = fold_half_week((t - self.toc).to_seconds());
        let bias = self.clock_bias + dt * (self.clock_drift + dt * self.clock_drift_rate);
        let drift = self.clock_drift + dt * self.clock_drift_rate;
        (bias, drift)
    }

    /// Resolves the satellite state at `t`, using this [OrbitModel].
    pub fn propagate(&self, t: Epoch, model: &OrbitModel, cfg: &Config) -> Result<Xvt, Error> {
        let t = t.to_time_scale(self.toe.time_scale);
        let t_k = fold_half_week((t - self.toe).to_seconds());

        let a = self.kepler.semi_major_axis();
        let n = (model.gm / a.powi(3)).sqrt() + self.perturbations.dn;
        let m_k = self.kepler.m_0 + n * t_k;

        let solution = solve_kepler(m_k, self.kepler.e, cfg.kepler_tolerance, cfg.kepler_max_iter);
        if !solution.converged {
            if cfg.strict {
                return Err(Error::KeplerNonConvergence {
                    iterations: solution.iterations,
                    residual: solution.residual,
                });
            }
            warn!(
                "{}({}): kepler solver did not converge (residual={:e})",
                t, self.sv, solution.residual
            );
        }

        let helper = Helper::new(
            &self.kepler,
            &self.perturbations,
            self.toe_sow,
            model,
            t_k,
            solution.e_k,
            n,
        );
        let (position, velocity) = helper.position_velocity();

        let (clock_bias, clock_drift) = self.clock_correction(t);
        let relativity = model.dtr_f * self.kepler.e * self.kepler.sqrt_a * solution.e_k.sin();

        Ok(Xvt {
            position,
            velocity,
            clock_bias,
            clock_drift,
            relativity,
            frame: model.frame,
        })
    }

    /// Frame the propagated states are expressed in
    pub fn frame(&self) -> Option<ReferenceFrame> {
        OrbitModel::new(self.sv.constellation).map(|model| model.frame)
    }
}
