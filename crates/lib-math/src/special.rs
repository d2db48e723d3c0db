//! Special functions for pupil transforms and turbulence spectra.
//!
//! The jinc/zinc kernels are Bessel-derived pupil transforms; each switches
//! to a second-order Taylor expansion below a threshold chosen so both
//! branches agree to machine precision at the crossover.

/// Fourth root of the f64 machine epsilon (2^-13).
const FORTH_ROOT_EPSILON: f64 = 1.220703125e-4;

/// Kolmogorov turbulence structure-constant scaling factor.
///
/// Γ(8/3)·sin(π/3)/(2π)^(8/3), precomputed at full precision.
pub const KOLMOGOROV_CN2_SCALE: f64 = 0.009693150704312342;

/// jinc(x) = 2·J₁(x)/x, the circular-pupil transform kernel.
pub fn jinc_pi(x: f64) -> f64 {
    if x.is_infinite() {
        return 0.0;
    }

    if x.abs() >= 3.7 * FORTH_ROOT_EPSILON {
        2.0 * libm::j1(x) / x
    } else {
        // |x| < (eps*192)^(1/4)
        1.0 - x * x / 8.0
    }
}

/// zinc(x) = 8·J₂(x)/x², the tilt-removed circular-pupil transform kernel.
pub fn zinc_pi(x: f64) -> f64 {
    if x.is_infinite() {
        return 0.0;
    }

    if x.abs() >= 7.2 * FORTH_ROOT_EPSILON {
        8.0 * libm::jn(2, x) / (x * x)
    } else {
        1.0 - x * x / 12.0
    }
}

/// sinc(x) = sin(x)/x.
pub fn sinc_pi(x: f64) -> f64 {
    if x.is_infinite() {
        return 0.0;
    }

    if x.abs() >= 3.3 * FORTH_ROOT_EPSILON {
        x.sin() / x
    } else {
        1.0 - x * x / 6.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_jinc_pi() {
        assert_abs_diff_eq!(jinc_pi(0.0), 1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(
            jinc_pi(0.1),
            0.99875052072483995088407208329032034367448,
            epsilon = 1e-15
        );
        assert_abs_diff_eq!(
            jinc_pi(1.0),
            0.88010117148986703191936440743782982625493,
            epsilon = 1e-15
        );
        assert_abs_diff_eq!(
            jinc_pi(10.0),
            0.0086945492337722873339497536051718576612593,
            epsilon = 1e-15
        );
        assert_eq!(jinc_pi(f64::INFINITY), 0.0);
    }

    #[test]
    fn test_jinc_pi_even() {
        for x in [0.3, 1.7, 8.1] {
            assert_eq!(jinc_pi(x), jinc_pi(-x));
        }
    }

    #[test]
    fn test_jinc_pi_taylor_crossover() {
        // both branches agree near the switch point
        let x = 3.7 * FORTH_ROOT_EPSILON;
        let bessel = 2.0 * libm::j1(x) / x;
        let taylor = 1.0 - x * x / 8.0;
        assert_abs_diff_eq!(bessel, taylor, epsilon = 1e-15);
    }

    #[test]
    fn test_zinc_pi() {
        assert_abs_diff_eq!(zinc_pi(0.0), 1.0, epsilon = 1e-15);
        assert_eq!(zinc_pi(f64::INFINITY), 0.0);

        // J2 = 2*J1/x - J0
        for x in [0.5, 2.0, 7.3] {
            let j2 = 2.0 * libm::j1(x) / x - libm::j0(x);
            assert_abs_diff_eq!(zinc_pi(x), 8.0 * j2 / (x * x), epsilon = 1e-12);
        }

        let x = 7.2 * FORTH_ROOT_EPSILON;
        let taylor = 1.0 - x * x / 12.0;
        assert_abs_diff_eq!(zinc_pi(x), taylor, epsilon = 1e-14);
    }

    #[test]
    fn test_sinc_pi() {
        assert_abs_diff_eq!(sinc_pi(0.0), 1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(
            sinc_pi(0.1),
            0.99833416646828152274465063467924745690004,
            epsilon = 1e-15
        );
        assert_abs_diff_eq!(
            sinc_pi(1.0),
            0.84147098480789650665250232163029899962245,
            epsilon = 1e-15
        );
        assert_abs_diff_eq!(
            sinc_pi(10.0),
            -0.054402111088936981340474766185137728168366,
            epsilon = 1e-15
        );
        assert_eq!(sinc_pi(f64::INFINITY), 0.0);
    }

    #[test]
    fn test_kolmogorov_scale() {
        // Γ(8/3)·sin(π/3)/(2π)^(8/3)
        assert_abs_diff_eq!(KOLMOGOROV_CN2_SCALE, 9.69e-3, epsilon = 1e-5);
    }
}
