//! Test tools: synthetic ephemerides and NAV content helpers
use crate::{epoch::to_week_seconds, prelude::*};

use hifitime::Unit;
use nalgebra::Vector3;
use rand::{rngs::StdRng, Rng};

/// Returns the full path to a test resource
pub fn test_resource(path: &str) -> String {
    env!("CARGO_MANIFEST_DIR").to_owned() + "/test_resources/" + path
}

/// Loads the mixed V3 NAV file
pub fn mixed_store() -> EphemerisStore {
    EphemerisStore::from_file(test_resource("NAV/V3/MIXED.rnx")).unwrap()
}

/// Rounds to 13 significant digits, which NAV files represent exactly
pub fn quantize(value: f64) -> f64 {
    format!("{:.12E}", value).parse::<f64>().unwrap()
}

/// Builds a realistic MEO keplerian ephemeris, with toe=toc.
/// `toc` must be expressed in the native timescale of `sv`.
pub fn kepler_ephemeris(sv: SV, toc: Epoch) -> KeplerEphemeris {
    let (week, toe_sow) = to_week_seconds(toc, toc.time_scale);
    let week = if sv.constellation == Constellation::Galileo {
        week + 1024
    } else {
        week
    };

    let system = match sv.constellation {
        Constellation::Galileo => SystemSpecific::Galileo {
            data_sources: 516.0,
            bgd_e5a_e1: -2.095475792885E-09,
            bgd_e5b_e1: -2.328306436539E-09,
        },
        Constellation::BeiDou => SystemSpecific::BeiDou {
            tgd1: -5.8E-09,
            tgd2: -5.8E-09,
            aodc: 1.0,
        },
        _ => SystemSpecific::Gps {
            l2_codes: 1.0,
            l2p_flag: 0.0,
            tgd: -5.587935447693E-09,
            iodc: 64.0,
            fit_interval: 4.0,
        },
    };

    KeplerEphemeris {
        sv,
        toc,
        clock_bias: -3.460352309048E-04,
        clock_drift: -6.366462912410E-12,
        clock_drift_rate: 0.0,
        iode: 64.0,
        kepler: Kepler {
            sqrt_a: 5.153652618408E+03,
            e: 8.618216658942E-03,
            i_0: 9.748900532350E-01,
            omega_0: -1.145372453127E+00,
            omega: 6.794935073927E-01,
            m_0: 2.134532913542E+00,
        },
        perturbations: Perturbations {
            dn: 4.611977524497E-09,
            i_dot: -1.117903137396E-10,
            omega_dot: -8.289987896235E-09,
            cus: 5.709007382393E-06,
            cuc: 1.145899295807E-06,
            cis: -5.401670932770E-08,
            cic: 1.862645149231E-09,
            crs: 1.987500000000E+01,
            crc: 2.723750000000E+02,
        },
        toe: toc,
        toe_sow,
        week: week as u32,
        accuracy: 2.0,
        health: 0.0,
        tx_tow: (toe_sow - 7200.0).max(0.0),
        system,
    }
}

/// Randomizes the orbit and clock terms of a keplerian ephemeris,
/// keeping them representable in NAV files.
pub fn randomize(eph: &KeplerEphemeris, rng: &mut StdRng) -> KeplerEphemeris {
    let mut eph = eph.clone();
    eph.clock_bias = quantize(rng.gen_range(-1.0E-3..1.0E-3));
    eph.clock_drift = quantize(rng.gen_range(-1.0E-11..1.0E-11));
    eph.kepler.sqrt_a = quantize(rng.gen_range(5100.0..5500.0));
    eph.kepler.e = quantize(rng.gen_range(0.0..0.03));
    eph.kepler.i_0 = quantize(rng.gen_range(0.9..1.0));
    eph.kepler.omega_0 = quantize(rng.gen_range(-3.14..3.14));
    eph.kepler.omega = quantize(rng.gen_range(-3.14..3.14));
    eph.kepler.m_0 = quantize(rng.gen_range(-3.14..3.14));
    eph.perturbations.crs = quantize(rng.gen_range(-200.0..200.0));
    eph.perturbations.crc = quantize(rng.gen_range(100.0..400.0));
    eph.perturbations.cuc = quantize(rng.gen_range(-1.0E-5..1.0E-5));
    eph.perturbations.cus = quantize(rng.gen_range(-1.0E-5..1.0E-5));
    eph
}

/// Builds a GLONASS ephemeris on a near circular orbit
pub fn glonass_ephemeris(prn: u8, epoch: Epoch) -> GlonassEphemeris {
    GlonassEphemeris {
        sv: SV::new(Constellation::Glonass, prn),
        epoch,
        clock_bias: 7.282570004460E-05,
        gamma: 9.094947017729E-13,
        frame_time: 3.420000000000E+05,
        position: Vector3::new(1.586724526308E+04, -1.877143032425E+04, 6.820703434627E+03),
        velocity: Vector3::new(-6.469761108310E-01, 6.947273162450E-01, 3.417060170486E+00),
        acceleration: Vector3::new(-9.313225746155E-10, -1.862645149231E-09, -2.793967723846E-09),
        health: 0.0,
        channel: 1,
        age: 0.0,
        status: None,
    }
}

/// Central difference of the positions, around `t`
pub fn finite_difference<F: Fn(Epoch) -> Xvt>(f: F, t: Epoch) -> Vector3<f64> {
    let before = f(t - 0.5 * Unit::Second);
    let after = f(t + 0.5 * Unit::Second);
    after.position - before.position
}

/// Splits the body of NAV V3 content into frames, each frame
/// being the concatenation of its lines.
pub fn v3_frames(content: &str) -> Vec<String> {
    let mut frames = Vec::<String>::new();
    let body = content
        .lines()
        .skip_while(|line| !line.contains("END OF HEADER"))
        .skip(1);
    for line in body {
        if line.starts_with(' ') {
            if let Some(frame) = frames.last_mut() {
                frame.push('\n');
                frame.push_str(line);
            }
        } else {
            frames.push(line.to_string());
        }
    }
    frames
}
