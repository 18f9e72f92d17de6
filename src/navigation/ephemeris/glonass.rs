//! GLONASS ephemerides and their numerical propagation
use log::warn;

use crate::{
    cfg::Config,
    constants::{PZ90, SPEED_OF_LIGHT_M_S},
    navigation::{parsing::Rows, ReferenceFrame, Xvt},
    prelude::{Epoch, Error, ParsingError, TimeScale, SV},
};

use nalgebra::{Vector3, Vector6};

use std::f64::consts::TAU;

/// Beyond one hour, GLONASS ephemerides are not reliable anymore
const MAX_PROPAGATION_SECONDS: f64 = 3600.0;

/// V3.05 fourth orbit line
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GlonassStatus {
    /// Status flags
    pub status_flags: f64,
    /// L1/L2 group delay difference (s)
    pub group_delay: f64,
    /// User range accuracy index
    pub urai: f64,
    /// Health flags
    pub health_flags: f64,
}

/// GLONASS broadcast ephemeris: instantaneous ECEF state
/// at the reference epoch tb.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct GlonassEphemeris {
    /// Satellite
    pub sv: SV,
    /// Reference epoch (tb), in UTC
    pub epoch: Epoch,
    /// Clock bias -TauN (s)
    pub clock_bias: f64,
    /// Relative frequency bias +GammaN
    pub gamma: f64,
    /// Message frame time (seconds of UTC week)
    pub frame_time: f64,
    /// PZ-90 position (km)
    pub position: Vector3<f64>,
    /// PZ-90 velocity (km.s⁻¹)
    pub velocity: Vector3<f64>,
    /// Luni-solar acceleration (km.s⁻²)
    pub acceleration: Vector3<f64>,
    /// Health (0=healthy)
    pub health: f64,
    /// Frequency channel number
    pub channel: i8,
    /// Age of operation (days)
    pub age: f64,
    /// Status line, for V3.05 and later
    pub status: Option<GlonassStatus>,
}

/// Greenwich mean sidereal time (rad) at `t` (UTC)
pub(crate) fn gmst(t: Epoch) -> f64 {
    let jd = t.to_jde_utc_days();
    // previous midnight
    let jd0 = (jd - 0.5).floor() + 0.5;
    let seconds = (jd - jd0) * 86400.0;
    let centuries = (jd0 - 2451545.0) / 36525.0;
    let gmst0 = 24110.54841
        + 8640184.812866 * centuries
        + 0.093104 * centuries.powi(2)
        - 6.2E-6 * centuries.powi(3);
    (gmst0 * TAU / 86400.0 + PZ90::OMEGA * seconds).rem_euclid(TAU)
}

/// ECEF (m, m/s) to inertial-like state, at sidereal angle `s`
fn ecef_to_inertial(position: Vector3<f64>, velocity: Vector3<f64>, s: f64) -> Vector6<f64> {
    let (sin_s, cos_s) = s.sin_cos();
    let x = position[0] * cos_s - position[1] * sin_s;
    let y = position[0] * sin_s + position[1] * cos_s;
    let vx = velocity[0] * cos_s - velocity[1] * sin_s - PZ90::OMEGA * y;
    let vy = velocity[0] * sin_s + velocity[1] * cos_s + PZ90::OMEGA * x;
    Vector6::new(x, y, position[2], vx, vy, velocity[2])
}

/// Inertial-like state to ECEF (m, m/s), at sidereal angle `s`
fn inertial_to_ecef(state: &Vector6<f64>, s: f64) -> (Vector3<f64>, Vector3<f64>) {
    let (sin_s, cos_s) = s.sin_cos();
    let x = state[0] * cos_s + state[1] * sin_s;
    let y = -state[0] * sin_s + state[1] * cos_s;
    let vx = state[3] * cos_s + state[4] * sin_s + PZ90::OMEGA * y;
    let vy = -state[3] * sin_s + state[4] * cos_s - PZ90::OMEGA * x;
    (
        Vector3::new(x, y, state[2]),
        Vector3::new(vx, vy, state[5]),
    )
}

/// Equations of motion in the inertial-like frame: central term,
/// J2 term and the broadcast luni-solar acceleration (ECEF, m/s²),
/// rotated by sidereal angle `s`.
fn derivative(state: &Vector6<f64>, luni_solar: &Vector3<f64>, s: f64) -> Vector6<f64> {
    let (x, y, z) = (state[0], state[1], state[2]);
    let r2 = x * x + y * y + z * z;
    let r = r2.sqrt();
    let mu_r3 = PZ90::GM / (r2 * r);
    let j2 = 1.5 * PZ90::J2 * PZ90::GM * PZ90::AE.powi(2) / r2.powi(2) / r;
    let z2_r2 = 5.0 * z * z / r2;

    let (sin_s, cos_s) = s.sin_cos();
    let ax = luni_solar[0] * cos_s - luni_solar[1] * sin_s;
    let ay = luni_solar[0] * sin_s + luni_solar[1] * cos_s;

    Vector6::new(
        state[3],
        state[4],
        state[5],
        -mu_r3 * x - j2 * x * (1.0 - z2_r2) + ax,
        -mu_r3 * y - j2 * y * (1.0 - z2_r2) + ay,
        -mu_r3 * z - j2 * z * (3.0 - z2_r2) + luni_solar[2],
    )
}

impl GlonassEphemeris {
    /// Builds [GlonassEphemeris] from the rows of a frame
    pub(crate) fn from_rows(sv: SV, epoch: Epoch, rows: &[[f64; 4]]) -> Result<Self, ParsingError> {
        if rows.len() < 4 {
            return Err(ParsingError::TruncatedBlock(4 - rows.len()));
        }
        let channel = rows[2][3];
        if !channel.is_finite() || channel.fract() != 0.0 || channel.abs() > i8::MAX as f64 {
            return Err(ParsingError::Integer(format!("{}", channel)));
        }
        let status = rows.get(4).map(|row| GlonassStatus {
            status_flags: row[0],
            group_delay: row[1],
            urai: row[2],
            health_flags: row[3],
        });
        Ok(Self {
            sv,
            epoch,
            clock_bias: rows[0][0],
            gamma: rows[0][1],
            frame_time: rows[0][2],
            position: Vector3::new(rows[1][0], rows[2][0], rows[3][0]),
            velocity: Vector3::new(rows[1][1], rows[2][1], rows[3][1]),
            acceleration: Vector3::new(rows[1][2], rows[2][2], rows[3][2]),
            health: rows[1][3],
            channel: channel as i8,
            age: rows[3][3],
            status,
        })
    }

    /// Returns the rows of the NAV frame describing this ephemeris
    pub(crate) fn to_rows(&self) -> Rows {
        let mut rows = vec![
            [self.clock_bias, self.gamma, self.frame_time, 0.0],
            [
                self.position[0],
                self.velocity[0],
                self.acceleration[0],
                self.health,
            ],
            [
                self.position[1],
                self.velocity[1],
                self.acceleration[1],
                self.channel as f64,
            ],
            [
                self.position[2],
                self.velocity[2],
                self.acceleration[2],
                self.age,
            ],
        ];
        if let Some(status) = &self.status {
            rows.push([
                status.status_flags,
                status.group_delay,
                status.urai,
                status.health_flags,
            ]);
        }
        rows
    }

    /// Returns true if this ephemeris is healthy and `t` lies
    /// within half an hour of its reference epoch.
    pub fn is_valid(&self, t: Epoch) -> bool {
        let t = t.to_time_scale(TimeScale::UTC);
        self.health == 0.0 && (t - self.epoch).to_seconds().abs() <= 1800.0
    }

    /// Integrates the state over `dt` seconds, with RK4 steps of `step` seconds
    /// (the last one being shortened). Returns ECEF (position, velocity) in (m, m/s).
    pub fn integrate(&self, dt: f64, step: f64) -> (Vector3<f64>, Vector3<f64>) {
        let s0 = gmst(self.epoch);
        let luni_solar = self.acceleration * 1000.0;

        let mut state = ecef_to_inertial(self.position * 1000.0, self.velocity * 1000.0, s0);

        let step = if step > 0.0 { step } else { 1.0 };
        let nb_steps = (dt.abs() / step).ceil() as usize;
        let h_nominal = step.copysign(dt);

        let mut tau = 0.0;
        for i in 0..nb_steps {
            let h = if i + 1 == nb_steps {
                dt - tau
            } else {
                h_nominal
            };

            let s = |tau: f64| s0 + PZ90::OMEGA * tau;

            let k1 = derivative(&state, &luni_solar, s(tau));
            let k2 = derivative(&(state + k1 * (h / 2.0)), &luni_solar, s(tau + h / 2.0));
            let k3 = derivative(&(state + k2 * (h / 2.0)), &luni_solar, s(tau + h / 2.0));
            let k4 = derivative(&(state + k3 * h), &luni_solar, s(tau + h));

            state += (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (h / 6.0);
            tau += h;
        }

        inertial_to_ecef(&state, s0 + PZ90::OMEGA * dt)
    }

    /// Resolves the satellite state at `t`
    pub fn propagate(&self, t: Epoch, cfg: &Config) -> Result<Xvt, Error> {
        let t = t.to_time_scale(TimeScale::UTC);
        let dt = (t - self.epoch).to_seconds();

        if dt.abs() > MAX_PROPAGATION_SECONDS {
            if cfg.strict {
                return Err(Error::GlonassOutOfRange(dt));
            }
            warn!("{}({}): propagating over {} s", t, self.sv, dt);
        }

        let (position, velocity) = if dt == 0.0 {
            (self.position * 1000.0, self.velocity * 1000.0)
        } else {
            self.integrate(dt, cfg.glonass_step_s)
        };

        let relativity = -2.0 * position.dot(&velocity) / SPEED_OF_LIGHT_M_S.powi(2);

        Ok(Xvt {
            position,
            velocity,
            clock_bias: self.clock_bias + self.gamma * dt - relativity,
            clock_drift: self.gamma,
            relativity,
            frame: ReferenceFrame::PZ90,
        })
    }
}
