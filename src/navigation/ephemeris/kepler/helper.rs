use crate::{
    constants::{OrbitModel, BDS_GEO_INCLINATION_DEG},
    navigation::ephemeris::kepler::{Kepler, Perturbations},
};

use nalgebra::{Matrix3, Rotation3, SMatrix, Vector3, Vector4};

/// [Helper] gathers the corrected orbital terms, and their first
/// derivatives, from which the ECEF state is obtained.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Helper {
    /// Time from ephemeris reference epoch (s)
    pub t_k: f64,
    /// Argument of latitude (corrected)
    pub u_k: f64,
    /// Radius (corrected)
    pub r_k: f64,
    /// Inclination (corrected)
    pub i_k: f64,
    /// Longitude of the ascending node
    pub omega_k: f64,
    /// First derivative of the argument of latitude
    pub fd_u_k: f64,
    /// First derivative of the radius
    pub fd_r_k: f64,
    /// First derivative of the inclination
    pub fd_i_k: f64,
    /// First derivative of the ascending node longitude
    pub fd_omega_k: f64,
    /// Earth rotation rate
    pub omega_e: f64,
    /// BDS GEO branch
    pub geo: bool,
}

impl Helper {
    /// Builds the [Helper] from the eccentric anomaly `e_k`, obtained
    /// at `t_k` with corrected mean motion `n`.
    pub fn new(
        kepler: &Kepler,
        perturbations: &Perturbations,
        toe_sow: f64,
        model: &OrbitModel,
        t_k: f64,
        e_k: f64,
        n: f64,
    ) -> Self {
        let a = kepler.semi_major_axis();
        let e = kepler.e;
        let (sin_e_k, cos_e_k) = e_k.sin_cos();
        let one_minus_e_cos = 1.0 - e * cos_e_k;
        let sqrt_1_e2 = (1.0 - e * e).sqrt();

        // true anomaly
        let v_k = (sqrt_1_e2 * sin_e_k).atan2(cos_e_k - e);

        let phi_k = v_k + kepler.omega;
        let (sin_2phi, cos_2phi) = (2.0 * phi_k).sin_cos();

        let du_k = perturbations.cus * sin_2phi + perturbations.cuc * cos_2phi;
        let dr_k = perturbations.crs * sin_2phi + perturbations.crc * cos_2phi;
        let di_k = perturbations.cis * sin_2phi + perturbations.cic * cos_2phi;

        let u_k = phi_k + du_k;
        let r_k = a * one_minus_e_cos + dr_k;
        let i_k = kepler.i_0 + perturbations.i_dot * t_k + di_k;

        let fd_e_k = n / one_minus_e_cos;
        let fd_v_k = fd_e_k * sqrt_1_e2 / one_minus_e_cos;

        let fd_u_k = fd_v_k
            * (1.0 + 2.0 * (perturbations.cus * cos_2phi - perturbations.cuc * sin_2phi));
        let fd_r_k = a * e * sin_e_k * fd_e_k
            + 2.0 * fd_v_k * (perturbations.crs * cos_2phi - perturbations.crc * sin_2phi);
        let fd_i_k = perturbations.i_dot
            + 2.0 * fd_v_k * (perturbations.cis * cos_2phi - perturbations.cic * sin_2phi);

        // GEO ascending node is expressed in the inertial-like frame
        let (omega_k, fd_omega_k) = if model.geo {
            (
                kepler.omega_0 + perturbations.omega_dot * t_k - model.omega_e * toe_sow,
                perturbations.omega_dot,
            )
        } else {
            (
                kepler.omega_0 + (perturbations.omega_dot - model.omega_e) * t_k
                    - model.omega_e * toe_sow,
                perturbations.omega_dot - model.omega_e,
            )
        };

        Self {
            t_k,
            u_k,
            r_k,
            i_k,
            omega_k,
            fd_u_k,
            fd_r_k,
            fd_i_k,
            fd_omega_k,
            omega_e: model.omega_e,
            geo: model.geo,
        }
    }

    /// Position within the orbital plane
    fn orbit_position(&self) -> (f64, f64) {
        let (sin_u_k, cos_u_k) = self.u_k.sin_cos();
        (self.r_k * cos_u_k, self.r_k * sin_u_k)
    }

    /// Returns ẋ and ẏ within the orbital plane
    fn orbit_velocity(&self) -> (f64, f64) {
        let (sin_u_k, cos_u_k) = self.u_k.sin_cos();
        let fd_x = self.fd_r_k * cos_u_k - self.r_k * self.fd_u_k * sin_u_k;
        let fd_y = self.fd_r_k * sin_u_k + self.r_k * self.fd_u_k * cos_u_k;
        (fd_x, fd_y)
    }

    /// Orbital plane to (earth fixed or inertial-like) frame rotation
    fn orbit_rotation_matrix(&self) -> Rotation3<f64> {
        // Positive angles mean counterclockwise rotation
        let rotation_x = Rotation3::from_axis_angle(&Vector3::x_axis(), self.i_k);
        let rotation_z = Rotation3::from_axis_angle(&Vector3::z_axis(), self.omega_k);
        rotation_z * rotation_x
    }

    fn plane_position(&self) -> Vector3<f64> {
        let (x, y) = self.orbit_position();
        self.orbit_rotation_matrix() * Vector3::new(x, y, 0.0)
    }

    fn plane_velocity(&self) -> Vector3<f64> {
        let (x, y) = self.orbit_position();
        let (fd_x, fd_y) = self.orbit_velocity();
        let (sin_omega_k, cos_omega_k) = self.omega_k.sin_cos();
        let (sin_i_k, cos_i_k) = self.i_k.sin_cos();

        let mut fd_r = SMatrix::<f64, 3, 4>::zeros();
        fd_r[(0, 0)] = cos_omega_k;
        fd_r[(0, 1)] = -sin_omega_k * cos_i_k;
        fd_r[(0, 2)] = -(x * sin_omega_k + y * cos_omega_k * cos_i_k);
        fd_r[(0, 3)] = y * sin_omega_k * sin_i_k;
        fd_r[(1, 0)] = sin_omega_k;
        fd_r[(1, 1)] = cos_omega_k * cos_i_k;
        fd_r[(1, 2)] = x * cos_omega_k - y * sin_omega_k * cos_i_k;
        fd_r[(1, 3)] = -y * cos_omega_k * sin_i_k;
        fd_r[(2, 1)] = sin_i_k;
        fd_r[(2, 3)] = y * cos_i_k;

        fd_r * Vector4::new(fd_x, fd_y, self.fd_omega_k, self.fd_i_k)
    }

    /// GEO inertial-like to BDCS rotation: Rz(ωe.tk).Rx(-5°)
    fn geo_rotation_matrices(&self) -> (Rotation3<f64>, Rotation3<f64>) {
        let rotation_x = Rotation3::from_axis_angle(
            &Vector3::x_axis(),
            -BDS_GEO_INCLINATION_DEG.to_radians(),
        );
        let rotation_z =
            Rotation3::from_axis_angle(&Vector3::z_axis(), -self.omega_e * self.t_k);
        (rotation_z, rotation_x)
    }

    fn geo_position_velocity(&self) -> (Vector3<f64>, Vector3<f64>) {
        let (rotation_z, rotation_x) = self.geo_rotation_matrices();
        let g = self.plane_position();
        let fd_g = self.plane_velocity();

        let (sin_omega_tk, cos_omega_tk) = (self.omega_e * self.t_k).sin_cos();
        let fd_rz = self.omega_e
            * Matrix3::new(
                -sin_omega_tk,
                cos_omega_tk,
                0.0,
                -cos_omega_tk,
                -sin_omega_tk,
                0.0,
                0.0,
                0.0,
                0.0,
            );

        let position = rotation_z * rotation_x * g;
        let velocity =
            fd_rz * (rotation_x * g) + rotation_z.matrix() * (rotation_x * fd_g);
        (position, velocity)
    }

    /// Returns the ECEF (position, velocity) in (m, m.s⁻¹)
    pub fn position_velocity(&self) -> (Vector3<f64>, Vector3<f64>) {
        if self.geo {
            self.geo_position_velocity()
        } else {
            (self.plane_position(), self.plane_velocity())
        }
    }
}
