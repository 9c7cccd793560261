//! IIR filter coefficients and their application to buffers
//!
//! Coefficients are stored normalised so `a[0] == 1`, with `b` and `a` padded
//! to the same length. Filtering runs the transposed direct-form II
//! recursion from a zero initial state:
//!
//! `y[n] = Σ b[k]·x[n-k] − Σ_{k≥1} a[k]·y[n-k]`

use crate::buffer::{to_sample, SampleBuffer};
use crate::error::{Error, Result};
use crate::stats::NO_DATA;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::{debug, instrument};

/// Numerator (`b`) and denominator (`a`) polynomials of a digital filter
///
/// Deserialisation goes through [`IirCoefficients::new`], so stored
/// coefficients are validated and normalised on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoefficients")]
pub struct IirCoefficients {
    b: Vec<f64>,
    a: Vec<f64>,
}

#[derive(Deserialize)]
struct RawCoefficients {
    b: Vec<f64>,
    a: Vec<f64>,
}

impl TryFrom<RawCoefficients> for IirCoefficients {
    type Error = Error;

    fn try_from(raw: RawCoefficients) -> Result<Self> {
        Self::new(raw.b, raw.a)
    }
}

impl IirCoefficients {
    /// Create normalised coefficients
    ///
    /// # Errors
    /// Returns `Error::InvalidParameter` if either polynomial is empty, `a[0]`
    /// is zero, or any coefficient is not finite.
    pub fn new(mut b: Vec<f64>, mut a: Vec<f64>) -> Result<Self> {
        if b.is_empty() || a.is_empty() {
            return Err(Error::InvalidParameter(
                "filter polynomials must not be empty".to_string(),
            ));
        }
        if a[0] == 0.0 {
            return Err(Error::InvalidParameter(
                "leading denominator coefficient must be non-zero".to_string(),
            ));
        }
        if b.iter().chain(a.iter()).any(|c| !c.is_finite()) {
            return Err(Error::InvalidParameter(
                "filter coefficients must be finite".to_string(),
            ));
        }

        let a0 = a[0];
        b.iter_mut().chain(a.iter_mut()).for_each(|c| *c /= a0);
        let order = b.len().max(a.len());
        b.resize(order, 0.0);
        a.resize(order, 0.0);
        Ok(Self { b, a })
    }

    /// Numerator coefficients
    pub fn b(&self) -> &[f64] {
        &self.b
    }

    /// Denominator coefficients, `a[0] == 1`
    pub fn a(&self) -> &[f64] {
        &self.a
    }

    /// Filter order (number of delay elements)
    pub fn order(&self) -> usize {
        self.b.len() - 1
    }

    /// Run the recursion over `data` in place from a zero state
    pub fn apply(&self, data: &mut [f64]) {
        let taps = self.b.len();
        // state[taps - 1] is never written and stays zero
        let mut state = vec![0.0; taps];
        for x in data.iter_mut() {
            let input = *x;
            let output = self.b[0] * input + state[0];
            for k in 1..taps {
                state[k - 1] = self.b[k] * input - self.a[k] * output + state[k];
            }
            *x = output;
        }
    }

    /// Magnitude of the frequency response at `frequency` Hz
    pub fn frequency_response(&self, frequency: f64, sampling_rate: f64) -> f64 {
        let omega = 2.0 * PI * frequency / sampling_rate;
        let evaluate = |coefficients: &[f64]| {
            let (re, im) = coefficients
                .iter()
                .enumerate()
                .fold((0.0, 0.0), |(re, im), (k, &c)| {
                    let phase = omega * k as f64;
                    (re + c * phase.cos(), im - c * phase.sin())
                });
            re.hypot(im)
        };
        evaluate(&self.b) / evaluate(&self.a)
    }
}

/// Something that can produce IIR coefficients for a sampling rate
pub trait IirDesign {
    /// Coefficients for data sampled at `sampling_rate` Hz
    fn design(&self, sampling_rate: f64) -> Result<IirCoefficients>;
}

impl IirDesign for IirCoefficients {
    fn design(&self, _sampling_rate: f64) -> Result<IirCoefficients> {
        Ok(self.clone())
    }
}

impl SampleBuffer {
    /// Filter the samples in place
    ///
    /// The samples are copied into a working buffer 50% longer, with the
    /// first quarter-length and the tail filled with the mean and gaps also
    /// replaced by the mean. After filtering (and, with `zero_phase`,
    /// reversing, filtering again and reversing back) the region that held
    /// the original samples is rounded and written back. Output length
    /// equals input length and no padding is written back.
    #[instrument(skip(self, coefficients), fields(samples = self.len()), level = "debug")]
    pub fn filter(&mut self, coefficients: &IirCoefficients, zero_phase: bool) {
        let n = self.samples.len();
        if n == 0 {
            return;
        }
        let mean = self.mean();
        let lead = n / 4;
        let mut padded = vec![mean; n + n / 2];
        for (dst, &s) in padded[lead..lead + n].iter_mut().zip(&self.samples) {
            if s != NO_DATA {
                *dst = f64::from(s);
            }
        }

        coefficients.apply(&mut padded);
        if zero_phase {
            padded.reverse();
            coefficients.apply(&mut padded);
            padded.reverse();
        }

        for (dst, &v) in self.samples.iter_mut().zip(&padded[lead..lead + n]) {
            *dst = to_sample(v);
        }
        self.stats.invalidate();
        debug!(order = coefficients.order(), zero_phase, "filtered buffer");
    }

    /// Design coefficients for this buffer's rate, then [`filter`](SampleBuffer::filter)
    pub fn filter_with<D: IirDesign + ?Sized>(&mut self, design: &D, zero_phase: bool) -> Result<()> {
        let coefficients = design.design(self.sampling_rate)?;
        self.filter(&coefficients, zero_phase);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Two-point moving average
    fn smoother() -> IirCoefficients {
        IirCoefficients::new(vec![0.5, 0.5], vec![1.0]).unwrap()
    }

    #[test]
    fn test_normalisation_and_padding() {
        let c = IirCoefficients::new(vec![2.0], vec![2.0, -1.0]).unwrap();
        assert_eq!(c.b(), &[1.0, 0.0]);
        assert_eq!(c.a(), &[1.0, -0.5]);
        assert_eq!(c.order(), 1);
    }

    #[test]
    fn test_invalid_coefficients() {
        assert!(IirCoefficients::new(vec![], vec![1.0]).is_err());
        assert!(IirCoefficients::new(vec![1.0], vec![0.0, 1.0]).is_err());
        assert!(IirCoefficients::new(vec![f64::NAN], vec![1.0]).is_err());
    }

    #[test]
    fn test_serde_validates() {
        let json = serde_json::to_string(&smoother()).unwrap();
        assert_eq!(json, r#"{"b":[0.5,0.5],"a":[1.0,0.0]}"#);
        let back: IirCoefficients = serde_json::from_str(&json).unwrap();
        assert_eq!(back, smoother());

        let scaled: IirCoefficients = serde_json::from_str(r#"{"b":[1.0],"a":[2.0,1.0]}"#).unwrap();
        assert_eq!(scaled.a(), &[1.0, 0.5]);
        assert!(serde_json::from_str::<IirCoefficients>(r#"{"b":[1.0],"a":[0.0]}"#).is_err());
    }

    #[test]
    fn test_fir_application() {
        let mut data = vec![2.0, 4.0, 6.0];
        smoother().apply(&mut data);
        assert_eq!(data, vec![1.0, 3.0, 5.0]);
    }

    #[test]
    fn test_recursive_application() {
        // y[n] = x[n] + 0.5 y[n-1]: impulse response 1, 0.5, 0.25, ...
        let c = IirCoefficients::new(vec![1.0], vec![1.0, -0.5]).unwrap();
        let mut data = vec![1.0, 0.0, 0.0, 0.0];
        c.apply(&mut data);
        assert_eq!(data, vec![1.0, 0.5, 0.25, 0.125]);
    }

    #[test]
    fn test_frequency_response() {
        let c = smoother();
        assert_relative_eq!(c.frequency_response(0.0, 100.0), 1.0);
        assert_relative_eq!(c.frequency_response(50.0, 100.0), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_filter_constant_buffer_is_unchanged() {
        let mut buffer = SampleBuffer::new(vec![42; 40], 0.0, 10.0);
        buffer.filter(&smoother(), true);
        assert_eq!(buffer.samples(), &[42; 40]);
    }

    #[test]
    fn test_filter_fills_gaps_and_keeps_length() {
        let mut buffer = SampleBuffer::new(vec![10, NO_DATA, 10, 30], 0.0, 1.0);
        assert_relative_eq!(buffer.mean(), 50.0 / 3.0);
        buffer.filter(&IirCoefficients::new(vec![1.0], vec![1.0]).unwrap(), false);
        assert_eq!(buffer.samples(), &[10, 17, 10, 30]);
        assert_eq!(buffer.len(), 4);
    }

    #[test]
    fn test_filter_with_design() {
        let mut buffer = SampleBuffer::new(vec![0, 8, 0, 8, 0, 8, 0, 8], 0.0, 2.0);
        buffer.filter_with(&smoother(), false).unwrap();
        assert_eq!(&buffer.samples()[1..], &[4; 7]);
    }
}
