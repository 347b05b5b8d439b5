//! Offset pagination for catalog listings.

/// A 1-based page of `per_page` rows whose offset fits a Postgres `bigint`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    per_page: u32,
    offset: i64,
}

impl PageWindow {
    /// Returns `None` unless both values are positive and the offset is representable;
    /// callers treat that as "no pagination".
    pub fn new(page: u32, per_page: u32) -> Option<Self> {
        if page == 0 || per_page == 0 {
            return None;
        }
        let offset = i64::from(page - 1).checked_mul(i64::from(per_page))?;
        Some(Self { per_page, offset })
    }

    /// Builds a window from caller-supplied values.
    ///
    /// Missing, zero, negative or oversized inputs disable pagination instead of failing.
    pub fn from_params(page: Option<i64>, per_page: Option<i64>) -> Option<Self> {
        let page = u32::try_from(page?).ok()?;
        let per_page = u32::try_from(per_page?).ok()?;
        Self::new(page, per_page)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.per_page)
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// Applies the window to an already-ordered slice.
    pub fn slice<'a, T>(&self, rows: &'a [T]) -> &'a [T] {
        let start = usize::try_from(self.offset).unwrap_or(usize::MAX);
        if start >= rows.len() {
            return &[];
        }
        let end = start.saturating_add(self.per_page as usize).min(rows.len());
        &rows[start..end]
    }
}
