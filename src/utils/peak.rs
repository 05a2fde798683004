use crate::float::Float;

/// How a chosen integer lag is refined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeakCorrection {
    /// Parabolic interpolation through the lag and its two neighbors.
    Quadratic,
    /// Keep the integer lag and its NSDF value.
    None,
}

struct Point<T: Float> {
    x: T,
    y: T,
}

/// Where the key maximum scan currently is in the NSDF.
#[derive(Debug, Clone, Copy, PartialEq)]
enum ScanState {
    /// Looking for the first negative value, which ends the lobe around lag zero.
    SeekingFirstCrossing,
    /// Walking through the lobes after the first crossing, tracking the tallest value
    /// of the current lobe.
    ScanningLobe,
    /// A lobe cleared the threshold.
    Done,
}

/// Chooses the lag of the pitch period in `nsdf` using the key maximum rule.
///
/// Every lobe between two downward zero crossings (after the lobe around lag zero) is a
/// candidate. The first lobe whose maximum is greater than `threshold` times the
/// global maximum (taken from the first negative value onwards) wins. If no closed lobe
/// qualifies, the argmax of the last lobe tracked when the scan runs out of lags is
/// returned, even though it never cleared the threshold.
///
/// Returns `None` if `nsdf` never goes negative, or if no positive value follows the
/// first negative one.
pub fn choose_key_maximum<T: Float>(nsdf: &[T], threshold: T) -> Option<(usize, T)> {
    let first_negative = nsdf.iter().position(|&v| v < T::zero())?;

    let global_max = nsdf[first_negative..]
        .iter()
        .fold(T::neg_infinity(), |max, &v| if v > max { v } else { max });
    let limit = threshold * global_max;

    let mut state = ScanState::SeekingFirstCrossing;
    let mut key_max = T::zero();
    let mut key_index: Option<usize> = None;

    for i in first_negative..nsdf.len() {
        match state {
            ScanState::SeekingFirstCrossing => {
                // The first crossing sits at `first_negative` itself.
                state = ScanState::ScanningLobe;
            }
            ScanState::ScanningLobe => {
                if nsdf[i] < T::zero() && nsdf[i - 1] >= T::zero() {
                    if key_index.is_some() && key_max > limit {
                        state = ScanState::Done;
                        continue;
                    }
                    // The index is kept so a later lobe with no positive values
                    // still falls back to this one.
                    key_max = T::zero();
                }
            }
            ScanState::Done => break,
        }
        if nsdf[i] > key_max {
            key_max = nsdf[i];
            key_index = Some(i);
        }
    }

    if state != ScanState::Done {
        log::trace!("no lobe cleared the key maximum threshold, using the last lobe");
    }

    key_index.map(|i| (i, nsdf[i]))
}

/// Refines `peak` to a fractional lag and value. Peaks on the edge of `data`, and flat
/// neighborhoods where the parabola is degenerate, fall back to the unrefined peak.
pub fn correct_peak<T: Float>(peak: (usize, T), data: &[T], correction: PeakCorrection) -> (T, T) {
    let idx = peak.0;
    let unrefined = (T::from_usize(idx).unwrap_or_else(T::zero), data[idx]);
    match correction {
        PeakCorrection::Quadratic => {
            if idx == 0 || idx + 1 >= data.len() {
                return unrefined;
            }
            let x = T::from_usize(idx).unwrap_or_else(T::zero);
            let point = quadratic_interpolation(
                Point {
                    x: x - T::one(),
                    y: data[idx - 1],
                },
                Point { x, y: data[idx] },
                Point {
                    x: x + T::one(),
                    y: data[idx + 1],
                },
            );
            match point {
                Some(point) => (point.x, point.y),
                None => {
                    log::warn!(
                        "degenerate parabola around lag {}, keeping the integer lag",
                        idx
                    );
                    unrefined
                }
            }
        }
        PeakCorrection::None => unrefined,
    }
}

/// Fits `a*x^2 + b*x + c` through three equally spaced points and returns its vertex.
/// Returns `None` when `a` is zero and the vertex does not exist.
fn quadratic_interpolation<T: Float>(
    left: Point<T>,
    center: Point<T>,
    right: Point<T>,
) -> Option<Point<T>> {
    let half = T::from_f64_lossy(0.5);
    let two = T::from_f64_lossy(2.0);
    let a = half * (right.y + left.y - two * center.y);
    let b = half * (right.y - left.y);
    if a == T::zero() {
        return None;
    }
    let offset = -b / (two * a);
    let x = center.x + offset;
    let y = a * offset * offset + b * offset + center.y;
    Some(Point { x, y })
}
