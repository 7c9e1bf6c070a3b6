//! Quantile classification of region means
//!
//! Five classes are cut at the 0/20/40/60/80/100th percentiles of the
//! non-missing means. With fewer than five means a linear scheme is used
//! instead, and the choice is recorded in [`SchemeKind`].

use log::info;

/// Percentiles that bound the five classes
pub const CUT_POINTS: [f64; 6] = [0.0, 0.2, 0.4, 0.6, 0.8, 1.0];

/// Smallest sample for which quantile breakpoints are used
pub const MIN_QUANTILE_SAMPLES: usize = 5;

/// Relative tolerance under which min and max count as identical
const DEGENERATE_RANGE_TOLERANCE: f64 = 1e-9;

/// Which branch produced the breakpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemeKind {
    /// Empirical quantiles of at least five means
    Quantile,
    /// No means at all: evenly spaced over [0, 1]
    LinearFallbackEmpty,
    /// One to four means: evenly spaced over [min, max]
    LinearFallbackSingleRange,
}

/// Breakpoints computed once per run, plus how they were derived
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassificationScheme {
    kind: SchemeKind,
    breakpoints: [f64; 6],
    widened: bool,
}

impl ClassificationScheme {
    /// Derive the scheme from a set of means; NaN entries are ignored
    pub fn from_means(means: &[f64]) -> Self {
        let mut sorted: Vec<f64> = means.iter().copied().filter(|m| !m.is_nan()).collect();
        sorted.sort_by(f64::total_cmp);

        if sorted.len() >= MIN_QUANTILE_SAMPLES {
            let mut breakpoints = [0.0; 6];
            for (bp, p) in breakpoints.iter_mut().zip(CUT_POINTS) {
                *bp = quantile_sorted(&sorted, p);
            }
            return ClassificationScheme { kind: SchemeKind::Quantile, breakpoints, widened: false };
        }

        match (sorted.first(), sorted.last()) {
            (Some(&min), Some(&max)) => {
                let widened = is_close(min, max);
                let upper = if widened { min + 1.0 } else { max };
                ClassificationScheme {
                    kind: SchemeKind::LinearFallbackSingleRange,
                    breakpoints: linspace(min, upper),
                    widened,
                }
            },
            _ => ClassificationScheme {
                kind: SchemeKind::LinearFallbackEmpty,
                breakpoints: linspace(0.0, 1.0),
                widened: false,
            },
        }
    }

    pub fn kind(&self) -> SchemeKind {
        self.kind
    }

    pub fn breakpoints(&self) -> &[f64; 6] {
        &self.breakpoints
    }

    /// Whether a zero-width range was widened by one unit
    pub fn is_widened(&self) -> bool {
        self.widened
    }

    /// Index of the first breakpoint >= `value`
    ///
    /// A value exactly on a breakpoint falls into the lower class. NaN has no class.
    pub fn class_of(&self, value: f64) -> Option<usize> {
        if value.is_nan() {
            return None;
        }
        Some(self.breakpoints.iter().filter(|bp| **bp < value).count())
    }
}

/// Assigns ordinal classes to region means
#[derive(Debug, Clone, Copy, Default)]
pub struct Classifier;

impl Classifier {
    pub fn new() -> Self {
        Classifier
    }

    /// Compute the scheme from the present means and classify each entry
    ///
    /// The returned classes line up with `means`; a missing mean gets no class.
    pub fn classify(&self, means: &[Option<f64>]) -> (ClassificationScheme, Vec<Option<usize>>) {
        let present: Vec<f64> = means.iter().flatten().copied().collect();
        let scheme = ClassificationScheme::from_means(&present);

        info!("Classification scheme {:?} from {} means, breakpoints {:?}",
              scheme.kind(), present.len(), scheme.breakpoints());

        let classes = means.iter()
            .map(|mean| mean.and_then(|m| scheme.class_of(m)))
            .collect();

        (scheme, classes)
    }
}

/// Linear-interpolation quantile of an ascending, non-empty slice
fn quantile_sorted(sorted: &[f64], p: f64) -> f64 {
    let position = p * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;

    if lower == upper {
        sorted[lower]
    } else {
        sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
    }
}

/// Six evenly spaced points from `start` to `stop`, both included exactly
fn linspace(start: f64, stop: f64) -> [f64; 6] {
    let step = (stop - start) / 5.0;
    let mut points = [0.0; 6];
    for (i, point) in points.iter_mut().enumerate() {
        *point = start + step * i as f64;
    }
    points[5] = stop;
    points
}

fn is_close(a: f64, b: f64) -> bool {
    (a - b).abs() <= DEGENERATE_RANGE_TOLERANCE * a.abs().max(b.abs())
}
