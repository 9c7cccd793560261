//! Applying a filter design to waveform buffers

use crate::butterworth::Butterworth;
use tracing::instrument;
use wave_core::{IirCoefficients, IirDesign, Result, SampleBuffer};

/// A filter design bound to an application mode
///
/// Coefficients are designed for each buffer's own sampling rate, so one
/// `StreamFilter` serves buffers recorded at different rates.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamFilter<D = Butterworth> {
    design: D,
    zero_phase: bool,
}

impl<D: IirDesign> StreamFilter<D> {
    /// Forward-only filter
    pub fn new(design: D) -> Self {
        Self {
            design,
            zero_phase: false,
        }
    }

    /// Builder-style forward-backward mode
    pub fn zero_phase(mut self, zero_phase: bool) -> Self {
        self.zero_phase = zero_phase;
        self
    }

    pub fn is_zero_phase(&self) -> bool {
        self.zero_phase
    }

    pub fn design(&self) -> &D {
        &self.design
    }

    /// Coefficients this filter uses at `sampling_rate`
    pub fn coefficients(&self, sampling_rate: f64) -> Result<IirCoefficients> {
        self.design.design(sampling_rate)
    }

    /// Filter `buffer` in place
    ///
    /// The buffer's length and timing are unchanged. On a design error the
    /// buffer is left untouched.
    ///
    /// # Errors
    /// Returns the design's error for an unusable sampling rate or corner.
    #[instrument(skip(self, buffer), fields(samples = buffer.len(), zero_phase = self.zero_phase), level = "debug")]
    pub fn apply(&self, buffer: &mut SampleBuffer) -> Result<()> {
        let coefficients = self.coefficients(buffer.sampling_rate())?;
        buffer.filter(&coefficients, self.zero_phase);
        Ok(())
    }

    /// Filtered copy of `buffer`
    pub fn filtered(&self, buffer: &SampleBuffer) -> Result<SampleBuffer> {
        let mut copy = buffer.clone();
        self.apply(&mut copy)?;
        Ok(copy)
    }
}
