//! Store and propagators configuration
#[cfg(feature = "serde")]
use serde::Deserialize;

fn default_kepler_window() -> f64 {
    7200.0
}

fn default_glonass_window() -> f64 {
    1800.0
}

fn default_kepler_max_iter() -> usize {
    20
}

fn default_kepler_tolerance() -> f64 {
    1.0E-11
}

fn default_glonass_step() -> f64 {
    1.0
}

fn default_bds_geo_prns() -> Vec<u8> {
    vec![1, 2, 3, 4, 5, 59, 60, 61, 62, 63]
}

/// [Config] is passed to the [EphemerisStore](crate::store::EphemerisStore)
/// on construction and drives ephemeris selection and propagation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct Config {
    /// Maximal |t - toe| (s) for a keplerian ephemeris to be selected
    #[cfg_attr(feature = "serde", serde(default = "default_kepler_window"))]
    pub kepler_window_s: f64,
    /// Maximal |t - tb| (s) for a GLONASS ephemeris to be selected
    #[cfg_attr(feature = "serde", serde(default = "default_glonass_window"))]
    pub glonass_window_s: f64,
    /// Iteration cap of the Kepler equation solver
    #[cfg_attr(feature = "serde", serde(default = "default_kepler_max_iter"))]
    pub kepler_max_iter: usize,
    /// Convergence threshold (rad) of the Kepler equation solver
    #[cfg_attr(feature = "serde", serde(default = "default_kepler_tolerance"))]
    pub kepler_tolerance: f64,
    /// Nominal RK4 step (s) of the GLONASS integrator
    #[cfg_attr(feature = "serde", serde(default = "default_glonass_step"))]
    pub glonass_step_s: f64,
    /// In strict mode, Kepler non convergence and GLONASS propagation
    /// beyond one hour are reported as errors, instead of warnings.
    #[cfg_attr(feature = "serde", serde(default))]
    pub strict: bool,
    /// When set, selected ephemerides must also be healthy and
    /// within their fit interval.
    #[cfg_attr(feature = "serde", serde(default))]
    pub enforce_validity: bool,
    /// BeiDou PRNs that follow the GEO propagation branch
    #[cfg_attr(feature = "serde", serde(default = "default_bds_geo_prns"))]
    pub bds_geo_prns: Vec<u8>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            kepler_window_s: default_kepler_window(),
            glonass_window_s: default_glonass_window(),
            kepler_max_iter: default_kepler_max_iter(),
            kepler_tolerance: default_kepler_tolerance(),
            glonass_step_s: default_glonass_step(),
            strict: false,
            enforce_validity: false,
            bds_geo_prns: default_bds_geo_prns(),
        }
    }
}

impl Config {
    /// Returns true if this BeiDou PRN is declared geostationary
    pub fn is_bds_geo(&self, prn: u8) -> bool {
        self.bds_geo_prns.contains(&prn)
    }
    /// Copies and returns [Config] with strict mode enabled
    pub fn strict(&self) -> Self {
        let mut s = self.clone();
        s.strict = true;
        s
    }
    /// Copies and returns [Config] with validity enforcement
    pub fn with_validity_enforcement(&self) -> Self {
        let mut s = self.clone();
        s.enforce_validity = true;
        s
    }
    /// Copies and returns [Config] with a custom BeiDou GEO PRN set
    pub fn with_bds_geo_prns(&self, prns: &[u8]) -> Self {
        let mut s = self.clone();
        s.bds_geo_prns = prns.to_vec();
        s
    }
}
