//! Audio-level to LED bargraph mapping.
//!
//! This is the reusable half of a VU-meter front end: given one period worth
//! of PCM samples it derives an amplitude, spreads it over up to 18 meter
//! segments and commits the result with a single [`crate::Sn3218::update`]
//! call. One bounded I2C write per period keeps the caller (typically an
//! audio callback) inside its deadline.
//!
//! The driver decides which channels are enabled; [`VuMeter::render`] only
//! writes brightness values, so a segment that was never turned on stays
//! dark no matter what the meter computes.

use embedded_hal::blocking::i2c::Write;

use crate::{Error, Sn3218, NUM_CHANNELS};

/// Amplitude measure extracted from a sample period.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Detector {
    /// Largest absolute sample value.
    Peak,
    /// Root mean square over the period.
    Rms,
}

/// Maps period amplitude onto a row of LED segments.
pub struct VuMeter {
    segments: u8,
    detector: Detector,
}

impl VuMeter {
    /// A meter over the first `segments` channels (capped at 18).
    pub fn new(segments: u8, detector: Detector) -> Self {
        Self {
            segments: segments.min(NUM_CHANNELS as u8),
            detector,
        }
    }

    /// Amplitude of one period, 0..=32767.
    pub fn amplitude(&self, samples: &[i16]) -> u16 {
        match self.detector {
            Detector::Peak => peak(samples),
            Detector::Rms => rms(samples),
        }
    }

    /// Linear brightness per channel for one period: lit segments at full
    /// scale, the topmost segment scaled by the remaining fraction, the rest
    /// dark.
    pub fn levels(&self, samples: &[i16]) -> [u8; NUM_CHANNELS] {
        let mut levels = [0u8; NUM_CHANNELS];
        let segments = self.segments as usize;
        if segments == 0 {
            return levels;
        }
        let span = self.amplitude(samples) as f32 / i16::MAX as f32 * segments as f32;
        let full = span as usize;
        for (i, level) in levels.iter_mut().take(segments).enumerate() {
            if i < full {
                *level = 255;
            } else if i == full {
                *level = ((span - full as f32) * 255.0) as u8;
            }
        }
        levels
    }

    /// Computes the bargraph for one period and commits it in one write.
    pub fn render<I2C, E>(&self, leds: &mut Sn3218<I2C>, samples: &[i16]) -> Result<(), Error<E>>
    where
        I2C: Write<u8, Error = E>,
    {
        let levels = self.levels(samples);
        for (id, level) in levels.iter().enumerate() {
            leds.set_brightness(id as u8, *level)?;
        }
        leds.update()
    }
}

fn peak(samples: &[i16]) -> u16 {
    samples
        .iter()
        .map(|s| (*s as i32).unsigned_abs().min(i16::MAX as u32) as u16)
        .max()
        .unwrap_or(0)
}

fn rms(samples: &[i16]) -> u16 {
    if samples.is_empty() {
        return 0;
    }
    let sum: u64 = samples
        .iter()
        .map(|s| {
            let v = *s as i64;
            (v * v) as u64
        })
        .sum();
    let mean = sum as f32 / samples.len() as f32;
    libm::sqrtf(mean).min(i16::MAX as f32) as u16
}
