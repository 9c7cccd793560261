//! FFT and spectrogram computation with gap filling and padding rules

use crate::params::SpectrogramParams;
use num_complex::Complex;
use rustfft::FftPlanner;
use std::f64::consts::PI;
use std::fmt;
use tracing::{debug, instrument};
use wave_core::{Result, SampleSource};

/// Smallest power of two holding `n` samples
pub fn padded_up(n: usize) -> usize {
    if n == 0 {
        0
    } else {
        n.next_power_of_two()
    }
}

/// Largest power of two not exceeding `n`
pub fn padded_down(n: usize) -> usize {
    if n == 0 {
        0
    } else {
        1 << (usize::BITS - 1 - n.leading_zeros())
    }
}

/// Symmetric Hann window
pub fn hann_window(size: usize) -> Vec<f64> {
    if size == 1 {
        return vec![1.0];
    }
    (0..size)
        .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f64 / (size - 1) as f64).cos()))
        .collect()
}

/// Magnitude grid produced by a sliding-window FFT
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrogram {
    /// Centre frequency of each bin in Hz
    pub frequencies: Vec<f64>,
    /// Centre time of each frame
    pub times: Vec<f64>,
    /// `magnitudes[frame][bin]`, raw or in dB depending on `log_power`
    pub magnitudes: Vec<Vec<f64>>,
    /// FFT length used per frame
    pub nfft: usize,
    pub log_power: bool,
}

impl Spectrogram {
    /// Number of frames
    pub fn frames(&self) -> usize {
        self.times.len()
    }

    /// Number of frequency bins per frame
    pub fn bins(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Frequency of the strongest non-DC bin in `frame`
    pub fn peak_frequency(&self, frame: usize) -> Option<f64> {
        let row = self.magnitudes.get(frame)?;
        row.iter()
            .enumerate()
            .skip(1)
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(bin, _)| self.frequencies[bin])
    }
}

impl fmt::Display for Spectrogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Spectrogram: {} frames x {} bins (nfft={}, {})",
            self.frames(),
            self.bins(),
            self.nfft,
            if self.log_power { "dB" } else { "magnitude" }
        )
    }
}

/// Holds an FFT planner so repeated transforms of one length reuse a plan
pub struct SpectralAnalyzer {
    planner: FftPlanner<f64>,
}

impl Default for SpectralAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SpectralAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpectralAnalyzer").finish_non_exhaustive()
    }
}

impl SpectralAnalyzer {
    pub fn new() -> Self {
        Self {
            planner: FftPlanner::new(),
        }
    }

    /// Complex FFT, padded up to the next power of two
    ///
    /// Gaps and padding take the source's mean. The output has
    /// [`padded_up`]`(n)` bins.
    pub fn fft<S: SampleSource + ?Sized>(&mut self, source: &S) -> Vec<Complex<f64>> {
        let len = padded_up(source.samples().len());
        let mut spectrum = prepared(source, len);
        self.transform(&mut spectrum);
        spectrum
    }

    /// FFT truncated down to the previous power of two
    ///
    /// Trailing samples beyond [`padded_down`]`(n)` are discarded. Returns
    /// `[re0, im0, re1, im1, ...]`.
    pub fn fast_fft<S: SampleSource + ?Sized>(&mut self, source: &S) -> Vec<f64> {
        let len = padded_down(source.samples().len());
        let mut spectrum = prepared(source, len);
        self.transform(&mut spectrum);
        spectrum.iter().flat_map(|c| [c.re, c.im]).collect()
    }

    /// Sliding-window magnitude spectrogram
    ///
    /// Frames of `bin_size` samples advance by [`SpectrogramParams::step`],
    /// are Hann-windowed and zero-padded to the resolved FFT length. Each
    /// frame keeps the `nfft / 2 + 1` non-negative frequency bins. A source
    /// shorter than one frame yields an empty grid.
    ///
    /// # Errors
    /// Returns `Error::InvalidParameter` if `params` fail validation.
    #[instrument(skip(self, source, params), fields(samples = source.samples().len()), level = "debug")]
    pub fn spectrogram<S: SampleSource + ?Sized>(
        &mut self,
        source: &S,
        params: &SpectrogramParams,
    ) -> Result<Spectrogram> {
        params.validate()?;
        let rate = source.sampling_rate();
        let nfft = params.resolve_nfft(rate);
        let bin_size = params.bin_size;
        let step = params.step();
        let signal = source.signal();
        let window = hann_window(bin_size);
        let fft = self.planner.plan_fft_forward(nfft);

        let bins = nfft / 2 + 1;
        let frequencies = (0..bins).map(|k| k as f64 * rate / nfft as f64).collect();
        let mut times = Vec::new();
        let mut magnitudes = Vec::new();
        let mut frame = vec![Complex::new(0.0, 0.0); nfft];

        let mut start = 0;
        while start + bin_size <= signal.len() {
            frame.fill(Complex::new(0.0, 0.0));
            for ((slot, &x), &w) in frame.iter_mut().zip(&signal[start..start + bin_size]).zip(&window) {
                slot.re = x * w;
            }
            fft.process(&mut frame);

            let row = frame[..bins]
                .iter()
                .map(|c| {
                    let magnitude = c.norm();
                    if params.log_power {
                        20.0 * magnitude.max(f64::MIN_POSITIVE).log10()
                    } else {
                        magnitude
                    }
                })
                .collect();
            magnitudes.push(row);
            times.push(source.start_time() + (start as f64 + bin_size as f64 / 2.0) / rate);
            start += step;
        }

        debug!(frames = times.len(), nfft, step, "computed spectrogram");
        Ok(Spectrogram {
            frequencies,
            times,
            magnitudes,
            nfft,
            log_power: params.log_power,
        })
    }

    fn transform(&mut self, data: &mut [Complex<f64>]) {
        if data.is_empty() {
            return;
        }
        let fft = self.planner.plan_fft_forward(data.len());
        fft.process(data);
    }
}

/// Signal of exactly `len` samples, mean-filled where gaps or padding sit
fn prepared<S: SampleSource + ?Sized>(source: &S, len: usize) -> Vec<Complex<f64>> {
    let mean = source.statistics().mean;
    let mut signal = source.signal();
    signal.resize(len, mean);
    signal.into_iter().map(|x| Complex::new(x, 0.0)).collect()
}
