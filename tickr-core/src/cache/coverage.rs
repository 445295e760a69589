use crate::DateRange;

/// Minimal set of disjoint date intervals known to be fully cached.
///
/// Intervals are kept sorted by start. Overlapping intervals and intervals on
/// consecutive days are always coalesced, so no two entries overlap or touch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoverageSet {
    intervals: Vec<DateRange>,
}

impl CoverageSet {
    /// Record `range` as covered, coalescing it with any overlapping or
    /// adjacent intervals.
    pub fn insert(&mut self, range: DateRange) {
        let mut all = std::mem::take(&mut self.intervals);
        all.push(range);
        self.intervals = coalesce(all);
    }

    /// The interval fully containing `range`, if one exists.
    #[must_use]
    pub fn covering(&self, range: &DateRange) -> Option<DateRange> {
        // Only the last interval starting on or before the request can contain it.
        let idx = self
            .intervals
            .partition_point(|c| c.start() <= range.start());
        let candidate = self.intervals.get(idx.checked_sub(1)?)?;
        candidate.contains(range).then_some(*candidate)
    }

    /// Covered intervals in ascending order.
    #[must_use]
    pub fn intervals(&self) -> &[DateRange] {
        &self.intervals
    }

    /// Number of disjoint intervals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// True when nothing is covered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }
}

impl FromIterator<DateRange> for CoverageSet {
    fn from_iter<T: IntoIterator<Item = DateRange>>(iter: T) -> Self {
        Self {
            intervals: coalesce(iter.into_iter().collect()),
        }
    }
}

/// Sort by start and sweep once, folding every interval that touches the
/// running interval into it.
fn coalesce(mut ranges: Vec<DateRange>) -> Vec<DateRange> {
    ranges.sort_by_key(DateRange::start);
    let mut out: Vec<DateRange> = Vec::with_capacity(ranges.len());
    for r in ranges {
        match out.last_mut() {
            Some(last) if last.touches(&r) => *last = last.span(&r),
            _ => out.push(r),
        }
    }
    out
}
