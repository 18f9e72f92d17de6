use std::f64::consts::{PI, TAU};

/// Outcome of the Kepler equation resolution
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct KeplerSolution {
    /// Eccentric anomaly (rad)
    pub e_k: f64,
    /// Number of iterations performed
    pub iterations: usize,
    /// |M - (E - e.sin(E))| (rad)
    pub residual: f64,
    /// True if the last correction fell below the tolerance
    pub converged: bool,
}

/// Solves Kepler's equation M = E - e.sin(E) for the eccentric anomaly,
/// with Newton iterations starting from M (or π for e >= 0.8).
/// The mean anomaly is first reduced to [0, 2π[.
pub fn solve_kepler(m_k: f64, e: f64, tolerance: f64, max_iter: usize) -> KeplerSolution {
    let m_k = m_k.rem_euclid(TAU);
    let mut e_k = if e >= 0.8 { PI } else { m_k };

    let mut iterations = 0;
    let mut converged = false;

    while iterations < max_iter {
        let correction = (m_k - e_k + e * e_k.sin()) / (1.0 - e * e_k.cos());
        e_k += correction;
        iterations += 1;
        if correction.abs() < tolerance {
            converged = true;
            break;
        }
    }

    KeplerSolution {
        e_k,
        iterations,
        residual: (m_k - (e_k - e * e_k.sin())).abs(),
        converged,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn circular_orbit() {
        let solution = solve_kepler(1.0, 0.0, 1.0E-11, 20);
        assert!(solution.converged);
        assert_eq!(solution.e_k, 1.0);
        assert_eq!(solution.iterations, 1);
    }

    #[test]
    fn gps_like_orbit() {
        // sqrt(a)=5153.79, e=0.01, M0=0.5 at toe
        let solution = solve_kepler(0.5, 0.01, 1.0E-11, 20);
        assert!(solution.converged);
        assert!(solution.residual < 1.0E-10);
        let e_k = solution.e_k;
        assert!((e_k - 0.01 * e_k.sin() - 0.5).abs() < 1.0E-10);
    }

    #[test]
    fn mean_anomaly_reduction() {
        let a = solve_kepler(0.5, 0.1, 1.0E-11, 20);
        let b = solve_kepler(0.5 + 4.0 * PI, 0.1, 1.0E-11, 20);
        assert!((a.e_k - b.e_k).abs() < 1.0E-12);
        let c = solve_kepler(-1.0, 0.1, 1.0E-11, 20);
        assert!(c.converged);
        assert!(c.e_k >= 0.0 && c.e_k < TAU + 1.0E-9);
    }

    #[test]
    fn iteration_cap() {
        let solution = solve_kepler(0.1, 0.9, 1.0E-11, 1);
        assert_eq!(solution.iterations, 1);
        assert!(!solution.converged);
        assert!(solution.residual > 1.0E-10);
    }
}
