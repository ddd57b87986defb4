//! Piecewise-linear calibration curve, e.g. tank sender resistance to fill
//! ratio.
//!
//! A curve always holds at least one sample: construction and every
//! reconfiguration are validated, and a rejected update leaves the previous
//! samples in place.
use heapless::Vec;

use crate::error::CurveError;

/// Maximum number of samples in a curve.
pub const MAX_SAMPLES: usize = 16;

/// One calibration point.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sample {
    pub input: f64,
    pub output: f64,
}

impl Sample {
    pub const fn new(input: f64, output: f64) -> Self {
        Self { input, output }
    }
}

/// European 0-180 ohm tank sender, HALMET inputs.
pub const EUROPEAN_TANK_SENDER: [Sample; 3] = [
    Sample::new(0.0, 0.0),
    Sample::new(180.0, 1.0),
    Sample::new(1000.0, 1.0),
];

/// European 0-180 ohm tank sender, engine hat inputs (300 ohm full scale).
pub const EUROPEAN_TANK_SENDER_SHORT: [Sample; 3] = [
    Sample::new(0.0, 0.0),
    Sample::new(180.0, 1.0),
    Sample::new(300.0, 1.0),
];

/// Maps a raw reading to a calibrated value by linear interpolation between
/// the two surrounding samples. Readings outside the curve clamp to the
/// first or last output.
#[derive(Debug, Clone)]
pub struct CurveInterpolator {
    samples: Vec<Sample, MAX_SAMPLES>,
    input_title: &'static str,
    output_title: &'static str,
}

impl CurveInterpolator {
    /// Curve with the given samples. They must be sorted by strictly
    /// increasing input.
    pub fn new(samples: &[Sample]) -> Result<Self, CurveError> {
        Ok(Self {
            samples: validated(samples)?,
            input_title: "Input",
            output_title: "Output",
        })
    }

    /// Curve restored from persisted samples, or `default` when nothing was
    /// persisted. Persisted samples that fail validation also fall back to
    /// `default`.
    pub fn load(persisted: Option<&[Sample]>, default: &[Sample]) -> Result<Self, CurveError> {
        match persisted.map(Self::new) {
            Some(Ok(curve)) => Ok(curve),
            Some(Err(_err)) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("Persisted curve rejected ({}), using default", _err);
                Self::new(default)
            }
            None => Self::new(default),
        }
    }

    /// Titles shown by the configuration UI.
    pub fn with_titles(mut self, input_title: &'static str, output_title: &'static str) -> Self {
        self.input_title = input_title;
        self.output_title = output_title;
        self
    }

    pub fn input_title(&self) -> &'static str {
        self.input_title
    }

    pub fn output_title(&self) -> &'static str {
        self.output_title
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Replace every sample.
    pub fn configure(&mut self, samples: &[Sample]) -> Result<(), CurveError> {
        self.samples = validated(samples)?;
        Ok(())
    }

    /// Insert one sample at its place in input order.
    pub fn add_sample(&mut self, sample: Sample) -> Result<(), CurveError> {
        if sample.input.is_nan() || sample.output.is_nan() {
            return Err(CurveError::NotANumber);
        }
        let index = match self
            .samples
            .binary_search_by(|probe| probe.input.total_cmp(&sample.input))
        {
            Ok(_) => return Err(CurveError::DuplicateInput),
            Err(index) => index,
        };
        self.samples
            .insert(index, sample)
            .map_err(|_| CurveError::CapacityExceeded)
    }

    /// Calibrated value for `input`. A NaN input yields NaN.
    pub fn interpolate(&self, input: f64) -> f64 {
        let (first, last) = match (self.samples.first(), self.samples.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return f64::NAN,
        };
        if input.is_nan() {
            return f64::NAN;
        }
        if input <= first.input {
            return first.output;
        }
        if input >= last.input {
            return last.output;
        }

        for pair in self.samples.windows(2) {
            let (lower, upper) = (pair[0], pair[1]);
            if input <= upper.input {
                return lower.output
                    + (input - lower.input) * (upper.output - lower.output)
                        / (upper.input - lower.input);
            }
        }
        last.output
    }
}

fn validated(samples: &[Sample]) -> Result<Vec<Sample, MAX_SAMPLES>, CurveError> {
    if samples.is_empty() {
        return Err(CurveError::Empty);
    }
    if samples.iter().any(|s| s.input.is_nan() || s.output.is_nan()) {
        return Err(CurveError::NotANumber);
    }
    for pair in samples.windows(2) {
        if pair[0].input == pair[1].input {
            return Err(CurveError::DuplicateInput);
        }
        if pair[0].input > pair[1].input {
            return Err(CurveError::Unsorted);
        }
    }
    Vec::from_slice(samples).map_err(|_| CurveError::CapacityExceeded)
}
