//! Tilt-meter style processing: merge segments, clean, filter, analyse, encode
//!
//! Run with `RUST_LOG=debug` to see the engine's tracing output.

use anyhow::Result;
use std::f64::consts::PI;
use tracing::info;
use tracing_subscriber::EnvFilter;
use wavekit::prelude::*;
use wavekit::{write_text, DataType};

fn segment(start: f64, rate: f64, len: usize, phase0: usize) -> SampleBuffer {
    let samples = (phase0..phase0 + len)
        .map(|i| {
            let t = i as f64 / rate;
            let drift = 0.5 * i as f64;
            let tide = 400.0 * (2.0 * PI * t / 600.0).sin();
            let chatter = 40.0 * (2.0 * PI * 3.0 * t).sin();
            let spike = if i % 997 == 0 { 5000.0 } else { 0.0 };
            (drift + tide + chatter + spike).round() as i32
        })
        .collect();
    SampleBuffer::new(samples, start, rate)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Waveform Pipeline ===\n");
    let rate = 10.0;

    // Two overlapping uploads and a late one after an outage
    let first = segment(0.0, rate, 3000, 0);
    let second = segment(250.0, rate, 3000, 2500);
    let third = segment(700.0, rate, 1000, 7000);

    println!("1. Merge");
    let merged = first.combine(&second)?;
    let mut buffer = SampleBuffer::join(&[merged, third])?
        .with_data_type(DataType::new("TL")?);
    println!("  {buffer}");
    println!("  gaps: {} samples", buffer.no_data_count());

    println!("\n2. Clean");
    buffer.register();
    buffer.despike(2.0)?;
    buffer.detrend();
    println!("  range after despike/detrend: {:?}", buffer.data_range());

    println!("\n3. Filter");
    let settings = wavekit::ButterworthSettings {
        corner1: 1.0,
        ..Default::default()
    };
    let filter = StreamFilter::new(Butterworth::from(settings)).zero_phase(true);
    filter.apply(&mut buffer)?;
    println!("  rsam after 1 Hz lowpass: {:.1}", buffer.rsam());

    println!("\n4. Analyse");
    let mut view = buffer.view();
    if view.set_slice(100.0, 500.0) == RangeOutcome::Applied {
        let grid = view.to_spectrogram(&SpectrogramParams::new(512, 0, false))?;
        println!("  {grid}");
        println!("  peak in first frame: {:?} Hz", grid.peak_frequency(0));
    }
    let position = view.position();
    view.set_bounds(position, position + 3);
    let mut preview = Vec::new();
    write_text(&mut view, &mut preview)?;
    print!("  preview:\n{}", String::from_utf8_lossy(&preview));

    println!("\n5. Encode");
    let bytes = buffer.to_bytes()?;
    let decoded = SampleBuffer::from_bytes(&bytes)?;
    info!(bytes = bytes.len(), "encoded buffer");
    println!(
        "  {} bytes, round trip equal: {}",
        bytes.len(),
        decoded.samples() == buffer.samples()
    );

    Ok(())
}
