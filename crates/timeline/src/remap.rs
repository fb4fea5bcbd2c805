//! Timestamp remapping between the original timeline and the edited timeline.
//!
//! The edited timeline is the original with every cut interval removed.
//! Both directions are pure functions of (time, sorted cuts). Malformed input
//! (NaN or infinite times) is logged and mapped to zero; nothing here fails.

use wc_common::TimeCode;

use crate::cut::{sorted_cuts, CutInterval};

/// Map an original-timeline time onto the edited timeline.
///
/// `cuts` must be sorted ascending by start. Times inside a cut collapse onto
/// the cut's start in edited time.
pub fn to_edited_time(original: TimeCode, cuts: &[CutInterval]) -> TimeCode {
    if !original.is_valid() {
        tracing::warn!(time = original.as_secs(), "Non-finite original time, using 0");
        return TimeCode::ZERO;
    }

    let t = original.as_secs();
    let mut shift = 0.0;

    for cut in cuts {
        let (start, end) = (cut.start.as_secs(), cut.end.as_secs());
        if end <= t {
            shift += cut.duration();
        } else if start < t {
            return TimeCode::from_secs((start - shift).max(0.0));
        } else {
            break;
        }
    }

    TimeCode::from_secs((t - shift).max(0.0))
}

/// Map an edited-timeline time back onto the original timeline.
///
/// `cuts` must be sorted ascending by start. A time landing exactly on a
/// splice point resolves to the end of the removed span.
pub fn to_original_time(edited: TimeCode, cuts: &[CutInterval]) -> TimeCode {
    if !edited.is_valid() {
        tracing::warn!(time = edited.as_secs(), "Non-finite edited time, using 0");
        return TimeCode::ZERO;
    }

    let e = edited.as_secs();
    let mut original = e;
    let mut accumulated = 0.0;

    for cut in cuts {
        if e >= cut.start.as_secs() - accumulated {
            let dur = cut.duration();
            original += dur;
            accumulated += dur;
        } else {
            break;
        }
    }

    TimeCode::from_secs(original.max(0.0))
}

/// Owns a sorted cut list and remaps times in both directions.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Remapper {
    cuts: Vec<CutInterval>,
}

impl Remapper {
    /// Build a remapper. The cuts are sorted by start; invalid cuts are dropped.
    pub fn new(cuts: &[CutInterval]) -> Self {
        Self {
            cuts: sorted_cuts(cuts),
        }
    }

    /// Remapper with no cuts (both directions are the identity).
    pub fn identity() -> Self {
        Self::default()
    }

    pub fn cuts(&self) -> &[CutInterval] {
        &self.cuts
    }

    pub fn is_identity(&self) -> bool {
        self.cuts.is_empty()
    }

    /// Total seconds removed by all cuts.
    pub fn total_removed(&self) -> f64 {
        self.cuts.iter().map(CutInterval::duration).sum()
    }

    /// Whether `time` falls strictly inside any cut.
    pub fn is_cut(&self, time: TimeCode) -> bool {
        self.cuts.iter().any(|cut| cut.contains(time))
    }

    pub fn to_edited(&self, original: TimeCode) -> TimeCode {
        to_edited_time(original, &self.cuts)
    }

    pub fn to_original(&self, edited: TimeCode) -> TimeCode {
        to_original_time(edited, &self.cuts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(secs: f64) -> TimeCode {
        TimeCode::from_secs(secs)
    }

    fn approx(a: TimeCode, b: f64) -> bool {
        (a.as_secs() - b).abs() < 1e-9
    }

    #[test]
    fn identity_without_cuts() {
        for secs in [0.0, 0.5, 7.25, 1000.0] {
            assert_eq!(to_edited_time(t(secs), &[]), t(secs));
            assert_eq!(to_original_time(t(secs), &[]), t(secs));
        }
    }

    #[test]
    fn time_inside_cut_collapses_to_cut_start() {
        let cuts = [CutInterval::from_secs(10.0, 15.0)];
        assert_eq!(to_edited_time(t(12.0), &cuts), t(10.0));
    }

    #[test]
    fn shifts_accumulate() {
        let cuts = [CutInterval::from_secs(2.0, 4.0), CutInterval::from_secs(10.0, 12.0)];
        assert!(approx(to_edited_time(t(20.0), &cuts), 16.0));
        assert!(approx(to_edited_time(t(6.0), &cuts), 4.0));
        assert!(approx(to_edited_time(t(1.0), &cuts), 1.0));
        // Inside the second cut: its start minus the first cut's duration.
        assert!(approx(to_edited_time(t(11.0), &cuts), 8.0));
    }

    #[test]
    fn round_trip_outside_cuts() {
        let cuts = [
            CutInterval::from_secs(2.0, 4.0),
            CutInterval::from_secs(4.0, 5.0),
            CutInterval::from_secs(10.0, 12.5),
        ];
        for secs in [0.0, 1.0, 1.99, 5.0, 7.3, 9.9, 12.5, 13.0, 40.0] {
            let edited = to_edited_time(t(secs), &cuts);
            let back = to_original_time(edited, &cuts);
            assert!(approx(back, secs), "{secs} -> {} -> {}", edited.as_secs(), back.as_secs());
        }
    }

    #[test]
    fn splice_point_resolves_to_cut_end() {
        let cuts = [CutInterval::from_secs(10.0, 15.0)];
        assert!(approx(to_original_time(t(10.0), &cuts), 15.0));
        assert!(approx(to_original_time(t(9.5), &cuts), 9.5));
    }

    #[test]
    fn non_finite_input_maps_to_zero() {
        let cuts = [CutInterval::from_secs(1.0, 2.0)];
        assert_eq!(to_edited_time(t(f64::NAN), &cuts), TimeCode::ZERO);
        assert_eq!(to_original_time(t(f64::INFINITY), &cuts), TimeCode::ZERO);
    }

    #[test]
    fn remapper_sorts_its_cuts() {
        let remapper = Remapper::new(&[CutInterval::from_secs(10.0, 12.0), CutInterval::from_secs(2.0, 4.0)]);
        assert_eq!(remapper.cuts()[0], CutInterval::from_secs(2.0, 4.0));
        assert!(approx(remapper.to_edited(t(20.0)), 16.0));
        assert!(approx(remapper.to_original(t(16.0)), 20.0));
        assert!((remapper.total_removed() - 4.0).abs() < 1e-9);
        assert!(remapper.is_cut(t(3.0)));
        assert!(!remapper.is_cut(t(4.0)));
        assert!(Remapper::identity().is_identity());
    }
}
