//! Butterworth IIR design by pole placement and the bilinear transform
//!
//! Design steps for a sampling rate `fs`:
//!
//! 1. Prewarp each corner `f` to the analog frequency `Ω = 2·tan(π·f/fs)`
//! 2. Place the `n` prototype poles on the left half of the unit circle,
//!    `p_k = exp(jπ(2k + n + 1) / 2n)`
//! 3. Map the prototype to the requested band (lowpass, highpass,
//!    bandpass, bandstop), giving s-plane poles and zeros
//! 4. Move every root into the z-plane with `z = (2 + s) / (2 − s)`
//! 5. Expand the roots into polynomials and scale the numerator for unit
//!    gain at DC (lowpass, bandstop), Nyquist (highpass) or the centre
//!    frequency (bandpass)

use crate::types::FilterType;
use num_complex::Complex;
use std::f64::consts::PI;
use std::fmt;
use tracing::debug;
use wave_core::{Error, IirCoefficients, IirDesign, Result};

/// Largest supported prototype order
pub const MAX_ORDER: usize = 10;

type C64 = Complex<f64>;

/// Butterworth band shape and corners, designed per sampling rate
#[derive(Debug, Clone, PartialEq)]
pub struct Butterworth {
    filter_type: FilterType,
    order: usize,
    corner1: f64,
    corner2: f64,
}

impl Butterworth {
    /// Create a design; parameters are checked when coefficients are built
    ///
    /// # Arguments
    /// * `filter_type` - Band shape
    /// * `order` - Number of prototype poles (1 to [`MAX_ORDER`])
    /// * `corner1` - Corner frequency in Hz, lower corner for band shapes
    /// * `corner2` - Upper corner in Hz for band shapes, otherwise unused
    pub fn new(filter_type: FilterType, order: usize, corner1: f64, corner2: f64) -> Self {
        Self {
            filter_type,
            order,
            corner1,
            corner2,
        }
    }

    pub fn lowpass(order: usize, corner: f64) -> Self {
        Self::new(FilterType::Lowpass, order, corner, 0.0)
    }

    pub fn highpass(order: usize, corner: f64) -> Self {
        Self::new(FilterType::Highpass, order, corner, 0.0)
    }

    pub fn bandpass(order: usize, low: f64, high: f64) -> Self {
        Self::new(FilterType::Bandpass, order, low, high)
    }

    pub fn bandstop(order: usize, low: f64, high: f64) -> Self {
        Self::new(FilterType::Bandstop, order, low, high)
    }

    pub fn filter_type(&self) -> FilterType {
        self.filter_type
    }

    pub fn order(&self) -> usize {
        self.order
    }

    /// `(corner1, corner2)` in Hz
    pub fn corners(&self) -> (f64, f64) {
        (self.corner1, self.corner2)
    }

    fn validate(&self, sampling_rate: f64) -> Result<()> {
        if sampling_rate <= 0.0 || !sampling_rate.is_finite() {
            return Err(Error::InvalidParameter(format!(
                "sampling rate must be positive, got {sampling_rate}"
            )));
        }
        if self.order == 0 || self.order > MAX_ORDER {
            return Err(Error::InvalidParameter(format!(
                "filter order must be between 1 and {MAX_ORDER}, got {}",
                self.order
            )));
        }
        let nyquist = sampling_rate / 2.0;
        let in_band = |f: f64| f > 0.0 && f < nyquist;
        if !in_band(self.corner1) {
            return Err(Error::InvalidParameter(format!(
                "corner frequency {} Hz must lie in (0, {nyquist}) Hz",
                self.corner1
            )));
        }
        if self.filter_type.is_band() && !(in_band(self.corner2) && self.corner2 > self.corner1) {
            return Err(Error::InvalidParameter(format!(
                "upper corner {} Hz must lie in ({}, {nyquist}) Hz",
                self.corner2, self.corner1
            )));
        }
        Ok(())
    }

    /// Poles of the unit-cutoff analog prototype
    fn prototype_poles(&self) -> Vec<C64> {
        let n = self.order as f64;
        (0..self.order)
            .map(|k| C64::from_polar(1.0, PI * (2.0 * k as f64 + n + 1.0) / (2.0 * n)))
            .collect()
    }

    /// s-plane poles and zeros for the requested band; `None` zeros sit at infinity
    fn analog_roots(&self, sampling_rate: f64) -> (Vec<C64>, Vec<Option<C64>>) {
        let warp = |f: f64| 2.0 * (PI * f / sampling_rate).tan();
        let prototype = self.prototype_poles();
        let n = self.order;
        let zero = C64::new(0.0, 0.0);

        match self.filter_type {
            FilterType::Lowpass => {
                let w = warp(self.corner1);
                (prototype.iter().map(|&p| p * w).collect(), vec![None; n])
            }
            FilterType::Highpass => {
                let w = warp(self.corner1);
                (prototype.iter().map(|&p| w / p).collect(), vec![Some(zero); n])
            }
            FilterType::Bandpass | FilterType::Bandstop => {
                let (w1, w2) = (warp(self.corner1), warp(self.corner2));
                let bandwidth = w2 - w1;
                let centre = (w1 * w2).sqrt();
                let mut poles = Vec::with_capacity(2 * n);
                for &p in &prototype {
                    let half = if self.filter_type == FilterType::Bandpass {
                        p * (bandwidth / 2.0)
                    } else {
                        (bandwidth / 2.0) / p
                    };
                    let spread = (C64::new(1.0, 0.0) - (centre / half).powi(2)).sqrt();
                    poles.push(half * (1.0 + spread));
                    poles.push(half * (1.0 - spread));
                }
                let zeros = if self.filter_type == FilterType::Bandpass {
                    let mut zeros = vec![Some(zero); n];
                    zeros.extend(vec![None; n]);
                    zeros
                } else {
                    let notch = C64::new(0.0, centre);
                    (0..n).flat_map(|_| [Some(notch), Some(notch.conj())]).collect()
                };
                (poles, zeros)
            }
        }
    }

    /// Frequency in Hz where the gain is normalised to one
    fn reference_frequency(&self, sampling_rate: f64) -> f64 {
        match self.filter_type {
            FilterType::Lowpass | FilterType::Bandstop => 0.0,
            FilterType::Highpass => sampling_rate / 2.0,
            FilterType::Bandpass => {
                // Digital image of the analog geometric centre
                let w1 = (PI * self.corner1 / sampling_rate).tan();
                let w2 = (PI * self.corner2 / sampling_rate).tan();
                (w1 * w2).sqrt().atan() * sampling_rate / PI
            }
        }
    }
}

impl IirDesign for Butterworth {
    fn design(&self, sampling_rate: f64) -> Result<IirCoefficients> {
        self.validate(sampling_rate)?;
        let (poles, zeros) = self.analog_roots(sampling_rate);

        let z_poles: Vec<C64> = poles.iter().map(|&s| bilinear(s)).collect();
        // A zero at s = ∞ lands on z = -1
        let z_zeros: Vec<C64> = zeros
            .iter()
            .map(|zero| zero.map_or(C64::new(-1.0, 0.0), bilinear))
            .collect();

        let mut b: Vec<f64> = expand(&z_zeros).iter().map(|c| c.re).collect();
        let a: Vec<f64> = expand(&z_poles).iter().map(|c| c.re).collect();

        let reference = self.reference_frequency(sampling_rate);
        let unscaled = IirCoefficients::new(b.clone(), a.clone())?;
        let gain = unscaled.frequency_response(reference, sampling_rate);
        if gain <= 0.0 || !gain.is_finite() {
            return Err(Error::InvalidParameter(format!(
                "design has no usable gain at {reference} Hz"
            )));
        }
        b.iter_mut().for_each(|c| *c /= gain);

        debug!(
            filter = %self.filter_type,
            order = self.order,
            sampling_rate,
            gain,
            "designed butterworth filter"
        );
        IirCoefficients::new(b, a)
    }
}

impl fmt::Display for Butterworth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.filter_type.is_band() {
            write!(
                f,
                "Butterworth {} order {} ({}-{} Hz)",
                self.filter_type, self.order, self.corner1, self.corner2
            )
        } else {
            write!(
                f,
                "Butterworth {} order {} ({} Hz)",
                self.filter_type, self.order, self.corner1
            )
        }
    }
}

fn bilinear(s: C64) -> C64 {
    (2.0 + s) / (2.0 - s)
}

/// Coefficients of `Π (z − r)` from the highest power down
fn expand(roots: &[C64]) -> Vec<C64> {
    let mut coefficients = vec![C64::new(1.0, 0.0)];
    for &root in roots {
        coefficients.push(C64::new(0.0, 0.0));
        for k in (1..coefficients.len()).rev() {
            let previous = coefficients[k - 1];
            coefficients[k] -= root * previous;
        }
    }
    coefficients
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const RATE: f64 = 100.0;
    const HALF_POWER: f64 = std::f64::consts::FRAC_1_SQRT_2;

    #[test]
    fn test_expand() {
        let roots = [C64::new(1.0, 0.0), C64::new(-2.0, 0.0)];
        let coefficients: Vec<f64> = expand(&roots).iter().map(|c| c.re).collect();
        // (z - 1)(z + 2) = z² + z - 2
        assert_eq!(coefficients, vec![1.0, 1.0, -2.0]);
    }

    #[test]
    fn test_prototype_poles_are_stable() {
        let design = Butterworth::lowpass(5, 1.0);
        for p in design.prototype_poles() {
            assert!(p.re < 0.0);
            assert_relative_eq!(p.norm(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_first_order_lowpass() {
        // Bilinear first-order section: b = [k, k], a = [1, -c]
        let c = Butterworth::lowpass(1, 25.0).design(RATE).unwrap();
        assert_eq!(c.order(), 1);
        assert_relative_eq!(c.b()[0], c.b()[1], epsilon = 1e-12);
        assert_relative_eq!(c.a()[1], 0.0, epsilon = 1e-12);
        assert_relative_eq!(c.b()[0], 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_lowpass_response() {
        let c = Butterworth::lowpass(4, 10.0).design(RATE).unwrap();
        assert_eq!(c.order(), 4);
        assert_relative_eq!(c.frequency_response(0.0, RATE), 1.0, epsilon = 1e-9);
        assert_relative_eq!(c.frequency_response(10.0, RATE), HALF_POWER, epsilon = 1e-6);
        assert!(c.frequency_response(40.0, RATE) < 1e-3);
    }

    #[test]
    fn test_highpass_response() {
        let c = Butterworth::highpass(3, 5.0).design(RATE).unwrap();
        assert_relative_eq!(c.frequency_response(50.0, RATE), 1.0, epsilon = 1e-9);
        assert_relative_eq!(c.frequency_response(5.0, RATE), HALF_POWER, epsilon = 1e-6);
        assert!(c.frequency_response(0.0, RATE) < 1e-9);
    }

    #[test]
    fn test_bandpass_response() {
        let design = Butterworth::bandpass(2, 5.0, 15.0);
        let c = design.design(RATE).unwrap();
        assert_eq!(c.order(), 4);
        let centre = design.reference_frequency(RATE);
        assert!(centre > 5.0 && centre < 15.0);
        assert_relative_eq!(c.frequency_response(centre, RATE), 1.0, epsilon = 1e-9);
        assert_relative_eq!(c.frequency_response(5.0, RATE), HALF_POWER, epsilon = 1e-6);
        assert_relative_eq!(c.frequency_response(15.0, RATE), HALF_POWER, epsilon = 1e-6);
        assert!(c.frequency_response(0.0, RATE) < 1e-9);
        assert!(c.frequency_response(50.0, RATE) < 1e-9);
    }

    #[test]
    fn test_bandstop_response() {
        let design = Butterworth::bandstop(2, 5.0, 15.0);
        let c = design.design(RATE).unwrap();
        let centre = Butterworth::bandpass(2, 5.0, 15.0).reference_frequency(RATE);
        assert_relative_eq!(c.frequency_response(0.0, RATE), 1.0, epsilon = 1e-9);
        assert_relative_eq!(c.frequency_response(50.0, RATE), 1.0, epsilon = 1e-6);
        assert_relative_eq!(c.frequency_response(5.0, RATE), HALF_POWER, epsilon = 1e-6);
        assert!(c.frequency_response(centre, RATE) < 1e-6);
    }

    #[test]
    fn test_invalid_designs() {
        assert!(Butterworth::lowpass(0, 1.0).design(RATE).is_err());
        assert!(Butterworth::lowpass(MAX_ORDER + 1, 1.0).design(RATE).is_err());
        assert!(Butterworth::lowpass(2, 50.0).design(RATE).is_err());
        assert!(Butterworth::highpass(2, -1.0).design(RATE).is_err());
        assert!(Butterworth::bandpass(2, 10.0, 5.0).design(RATE).is_err());
        assert!(Butterworth::bandstop(2, 10.0, 60.0).design(RATE).is_err());
        assert!(Butterworth::lowpass(2, 1.0).design(0.0).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Butterworth::bandpass(2, 0.5, 2.0).to_string(),
            "Butterworth Bandpass order 2 (0.5-2 Hz)"
        );
        assert_eq!(
            Butterworth::lowpass(4, 1.0).to_string(),
            "Butterworth Lowpass order 4 (1 Hz)"
        );
    }
}
