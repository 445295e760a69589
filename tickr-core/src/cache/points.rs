use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use chrono::NaiveDate;

use crate::{DateRange, PricePoint, TickrError};

/// Deduplicated, date-ordered price points for one symbol.
///
/// Points are keyed by date; the first point stored for a date wins and later
/// duplicates are skipped rather than replacing it.
#[derive(Debug, Clone, Default)]
pub struct PointStore {
    points: BTreeMap<NaiveDate, PricePoint>,
}

impl PointStore {
    /// Insert every point whose date is not already present.
    ///
    /// Returns the number of points actually added.
    pub fn merge<I>(&mut self, incoming: I) -> usize
    where
        I: IntoIterator<Item = PricePoint>,
    {
        let mut added = 0;
        for p in incoming {
            if let Entry::Vacant(v) = self.points.entry(p.date) {
                v.insert(p);
                added += 1;
            }
        }
        added
    }

    /// Points dated `range.start()..=range.end()`, newest first.
    ///
    /// Both boundary dates must have a stored point.
    ///
    /// # Errors
    /// Returns `TickrError::BoundaryNotCached` naming the first boundary date
    /// (start, then end) that has no point.
    pub fn slice_desc(&self, symbol: &str, range: DateRange) -> Result<Vec<PricePoint>, TickrError> {
        for boundary in [range.start(), range.end()] {
            if !self.points.contains_key(&boundary) {
                return Err(TickrError::boundary_not_cached(symbol, boundary));
            }
        }
        Ok(self
            .points
            .range(range.start()..=range.end())
            .rev()
            .map(|(_, p)| p.clone())
            .collect())
    }

    /// Point stored for `date`, if any.
    #[must_use]
    pub fn get(&self, date: NaiveDate) -> Option<&PricePoint> {
        self.points.get(&date)
    }

    /// Iterate stored points in ascending date order.
    pub fn iter(&self) -> impl Iterator<Item = &PricePoint> {
        self.points.values()
    }

    /// Number of stored points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when nothing has been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
