//! Gaussian-band spectral filter.

use super::SpectralFilter;
use lib_math::special::sinc_pi;
use std::f64::consts::{LN_2, PI};

/// Spectral filter of a Gaussian passband.
///
/// Monochromatic oscillations damped by a Gaussian envelope:
///
/// E(x) = sin²(πx) · exp(−(πΛx)²/(8 ln 2)),
///
/// where Λ is the full width at half maximum of the passband in relative
/// units. Λ = 0 degenerates to the monochromatic filter.
///
/// Reference: Tokovinin (2003), "Polychromatic scintillation".
#[derive(Clone, Copy, Debug)]
pub struct Gauss {
    fwhm: f64,
}

impl Gauss {
    /// Envelope damping constant 1/(8 ln 2).
    const C: f64 = 1.0 / (8.0 * LN_2);

    pub fn new(fwhm: f64) -> Self {
        Self { fwhm }
    }

    /// Full width at half maximum Λ of the envelope.
    pub fn fwhm(&self) -> f64 {
        self.fwhm
    }
}

impl SpectralFilter for Gauss {
    fn eval(&self, x: f64) -> f64 {
        let pix = PI * x;
        let envelope = (-Self::C * (self.fwhm * pix).powi(2)).exp();
        if envelope == 0.0 {
            return 0.0;
        }

        envelope * pix.sin().powi(2)
    }

    fn regular(&self, x: f64) -> f64 {
        let pix = PI * x;
        (PI * sinc_pi(pix)).powi(2) * (-Self::C * (self.fwhm * pix).powi(2)).exp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_zero_width_is_monochromatic() {
        use crate::sf::Mono;

        let gauss = Gauss::new(0.0);
        for x in [0.0, 0.1, 0.5, 0.9, 1.7] {
            assert_abs_diff_eq!(gauss.eval(x), Mono.eval(x), epsilon = 1e-15);
            assert_abs_diff_eq!(gauss.regular(x), Mono.regular(x), epsilon = 1e-13);
        }
    }

    #[test]
    fn test_eval() {
        let sf = Gauss::new(0.1);
        assert_abs_diff_eq!(sf.eval(0.0), 0.0, epsilon = 1e-15);
        assert_abs_diff_eq!(
            sf.eval(0.1),
            0.095474508234832555785906908949474601604,
            epsilon = 1e-15
        );
        assert_abs_diff_eq!(
            sf.eval(0.5),
            0.99556025079112537972064984724386080498,
            epsilon = 1e-15
        );
        assert_abs_diff_eq!(sf.eval(1.0), 0.0, epsilon = 1e-14);
    }

    #[test]
    fn test_regular() {
        let sf = Gauss::new(0.1);
        assert_abs_diff_eq!(sf.regular(0.0), PI * PI, epsilon = 1e-14);
        assert_abs_diff_eq!(
            sf.regular(0.5),
            3.9822410031645015188825993889754432199,
            epsilon = 1e-13
        );
        assert_abs_diff_eq!(
            sf.regular(0.9),
            0.11620332800976904535514786383332017124,
            epsilon = 1e-13
        );
    }

    #[test]
    fn test_envelope_underflow() {
        // far outside the envelope, E collapses to an exact zero rather
        // than a denormal times an oscillation
        let sf = Gauss::new(0.5);
        assert_eq!(sf.eval(1e9), 0.0);
    }
}
