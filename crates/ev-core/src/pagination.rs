//! Fixed-size page slicing over the working dataset.

/// Return page `page_index` (zero-based) of `data`.
///
/// The page covers rows `[page_index * page_size, page_index * page_size +
/// page_size)` clipped to the data length. Pages past the end, and any page
/// when `page_size` is zero, are empty.
///
/// # Examples
///
/// ```
/// use ev_core::pagination::page;
///
/// let rows: Vec<u32> = (0..25).collect();
/// assert_eq!(page(&rows, 0, 10).len(), 10);
/// assert_eq!(page(&rows, 2, 10), &[20, 21, 22, 23, 24]);
/// assert!(page(&rows, 3, 10).is_empty());
/// ```
pub fn page<T>(data: &[T], page_index: usize, page_size: usize) -> &[T] {
    let start = page_index.saturating_mul(page_size);
    if page_size == 0 || start >= data.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(data.len());
    &data[start..end]
}

/// Number of pages needed for `total_rows`: `ceil(total_rows / page_size)`.
///
/// Returns `0` for an empty dataset or a zero page size.
pub fn page_count(total_rows: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total_rows.div_ceil(page_size)
}

// ── Pager ─────────────────────────────────────────────────────────────────────

/// Page selector driven by forward/backward/jump interactions.
///
/// Holds only the current zero-based index and the page geometry; slicing is
/// left to [`page`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    current: usize,
    page_size: usize,
    total_rows: usize,
}

impl Pager {
    pub fn new(total_rows: usize, page_size: usize) -> Self {
        Self {
            current: 0,
            page_size,
            total_rows,
        }
    }

    /// Zero-based index of the selected page.
    pub fn current(&self) -> usize {
        self.current
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_count(&self) -> usize {
        page_count(self.total_rows, self.page_size)
    }

    fn last_index(&self) -> usize {
        self.page_count().saturating_sub(1)
    }

    /// Advance one page, staying on the last page.
    pub fn next(self) -> Self {
        self.jump_to(self.current.saturating_add(1))
    }

    /// Go back one page, staying on the first page.
    pub fn previous(self) -> Self {
        self.jump_to(self.current.saturating_sub(1))
    }

    pub fn first(self) -> Self {
        self.jump_to(0)
    }

    pub fn last(self) -> Self {
        self.jump_to(self.last_index())
    }

    /// Select `index`, clamped to the valid page range.
    pub fn jump_to(self, index: usize) -> Self {
        Self {
            current: index.min(self.last_index()),
            ..self
        }
    }

    /// Slice the selected page out of `data`.
    pub fn slice<'a, T>(&self, data: &'a [T]) -> &'a [T] {
        page(data, self.current, self.page_size)
    }
}
