//! Physical constants and per constellation [OrbitModel]s
use crate::{navigation::ReferenceFrame, prelude::Constellation};

/// Speed of light in vacuum (m.s⁻¹)
pub const SPEED_OF_LIGHT_M_S: f64 = 299_792_458.0;

/// Duration of one GNSS week (s)
pub const WEEK_SECONDS: f64 = 604_800.0;

/// Half a GNSS week (s)
pub const HALF_WEEK_SECONDS: f64 = 302_400.0;

/// Galileo weeks in RINEX are aligned to the GPS week counter
pub(crate) const GST_WEEK_OFFSET: u32 = 1024;

/// Earth gravitational constant (m³.s⁻²)
pub(crate) struct GM;

impl GM {
    pub const GPS: f64 = 3.9860050E14;
    pub const BDS: f64 = 3.986004418E14;
    pub const GLO: f64 = 3.9860044E14;
    pub const GAL: f64 = 3.986004418E14;
    pub const QZS: f64 = 3.986005E14;
}

/// Earth rotation rate (rad.s⁻¹)
pub(crate) struct Omega;

impl Omega {
    pub const GPS: f64 = 7.2921151467E-5;
    pub const BDS: f64 = 7.292115E-5;
    pub const GLO: f64 = 7.292115E-5;
    pub const GAL: f64 = 7.2921151467E-5;
    pub const QZS: f64 = 7.2921151467E-5;
}

/// - 2 * sqrt(gm) / c / c
pub(crate) struct DtrF;

impl DtrF {
    pub const GPS: f64 = -0.000000000444280763339306;
    pub const BDS: f64 = -0.00000000044428073090439775;
    pub const GAL: f64 = -0.00000000044428073090439775;
}

/// PZ-90 parameters, used by the GLONASS integrator,
/// expressed in meters and seconds.
pub(crate) struct PZ90;

impl PZ90 {
    /// Gravitational constant (m³.s⁻²)
    pub const GM: f64 = 3.986004418E14;
    /// Equatorial radius (m)
    pub const AE: f64 = 6_378_136.0;
    /// Second zonal harmonic
    pub const J2: f64 = 1.0826257E-3;
    /// Earth rotation rate (rad.s⁻¹)
    pub const OMEGA: f64 = Omega::GLO;
}

/// BeiDou GEO orbital planes are inclined by 5° in the BDCS frame
pub(crate) const BDS_GEO_INCLINATION_DEG: f64 = -5.0;

/// [OrbitModel] gathers the constants that parametrize the keplerian
/// propagator, for one [Constellation].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OrbitModel {
    /// Earth gravitational constant (m³.s⁻²)
    pub gm: f64,
    /// Earth rotation rate (rad.s⁻¹)
    pub omega_e: f64,
    /// Relativistic clock correction constant (s.m^-1/2)
    pub dtr_f: f64,
    /// Frame the resulting states are expressed in
    pub frame: ReferenceFrame,
    /// True when the satellite follows the BDS GEO branch
    pub geo: bool,
}

impl OrbitModel {
    /// Returns the [OrbitModel] for this [Constellation], if it is
    /// propagated with keplerian elements.
    pub fn new(constellation: Constellation) -> Option<Self> {
        match constellation {
            Constellation::GPS => Some(Self {
                gm: GM::GPS,
                omega_e: Omega::GPS,
                dtr_f: DtrF::GPS,
                frame: ReferenceFrame::WGS84,
                geo: false,
            }),
            Constellation::QZSS => Some(Self {
                gm: GM::QZS,
                omega_e: Omega::QZS,
                dtr_f: DtrF::GPS,
                frame: ReferenceFrame::JGS,
                geo: false,
            }),
            Constellation::Galileo => Some(Self {
                gm: GM::GAL,
                omega_e: Omega::GAL,
                dtr_f: DtrF::GAL,
                frame: ReferenceFrame::GTRF,
                geo: false,
            }),
            Constellation::BeiDou => Some(Self {
                gm: GM::BDS,
                omega_e: Omega::BDS,
                dtr_f: DtrF::BDS,
                frame: ReferenceFrame::CGCS2000,
                geo: false,
            }),
            _ => None,
        }
    }

    /// Copies and returns [OrbitModel] switched to the GEO branch
    pub fn geostationary(&self) -> Self {
        let mut s = *self;
        s.geo = true;
        s
    }
}
