use nalgebra::Vector3;

#[cfg(feature = "anise")]
use crate::prelude::Epoch;

#[cfg(feature = "anise")]
use anise::{
    constants::frames::IAU_EARTH_FRAME,
    math::Vector6,
    prelude::{Frame, Orbit},
};

/// Earth fixed frame a satellite state is expressed in
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ReferenceFrame {
    /// GPS
    WGS84,
    /// Galileo Terrestrial Reference Frame
    GTRF,
    /// BeiDou
    CGCS2000,
    /// GLONASS
    PZ90,
    /// QZSS
    JGS,
}

impl std::fmt::Display for ReferenceFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::WGS84 => write!(f, "WGS84"),
            Self::GTRF => write!(f, "GTRF"),
            Self::CGCS2000 => write!(f, "CGCS2000"),
            Self::PZ90 => write!(f, "PZ-90"),
            Self::JGS => write!(f, "JGS"),
        }
    }
}

/// [Xvt] is the satellite state resolved for one query
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Xvt {
    /// ECEF position (m)
    pub position: Vector3<f64>,
    /// ECEF velocity (m.s⁻¹)
    pub velocity: Vector3<f64>,
    /// Onboard clock offset to the constellation time (s),
    /// without relativistic correction
    pub clock_bias: f64,
    /// Onboard clock drift (s.s⁻¹)
    pub clock_drift: f64,
    /// Relativistic clock correction (s).
    /// Keplerian states report it separately, GLONASS states
    /// already have it removed from the clock bias.
    pub relativity: f64,
    /// Frame the state is expressed in
    pub frame: ReferenceFrame,
}

impl Xvt {
    /// Returns the (position, velocity) state in (km, km/s)
    pub fn to_km(&self) -> (Vector3<f64>, Vector3<f64>) {
        (self.position / 1000.0, self.velocity / 1000.0)
    }

    /// Converts this state to an [Orbit] at `t`, in the IAU Earth frame.
    #[cfg(feature = "anise")]
    #[cfg_attr(docsrs, doc(cfg(feature = "anise")))]
    pub fn to_orbit(&self, t: Epoch) -> Orbit {
        self.to_orbit_in_frame(t, IAU_EARTH_FRAME)
    }

    /// Converts this state to an [Orbit] at `t`, in desired body fixed [Frame].
    #[cfg(feature = "anise")]
    #[cfg_attr(docsrs, doc(cfg(feature = "anise")))]
    pub fn to_orbit_in_frame(&self, t: Epoch, frame: Frame) -> Orbit {
        let (pos_km, vel_km_s) = self.to_km();
        Orbit::from_cartesian_pos_vel(
            Vector6::new(
                pos_km[0], pos_km[1], pos_km[2], vel_km_s[0], vel_km_s[1], vel_km_s[2],
            ),
            t,
            frame,
        )
    }

    /// Orbital radius (m)
    pub fn radius(&self) -> f64 {
        self.position.norm()
    }
}
