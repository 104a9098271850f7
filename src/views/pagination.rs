use crate::utils::div_ceil;

/// Fixed page size of the job list.
pub const PAGE_SIZE: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub size: u32,
    pub total: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            size: PAGE_SIZE,
            total: 0,
        }
    }
}

impl Pagination {
    pub fn total_pages(&self) -> u64 {
        div_ceil(self.total, u64::from(self.size))
    }

    /// "Previous" is disabled on the first page.
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// "Next" is disabled once `page == ceil(total / size)`.
    pub fn has_next(&self) -> bool {
        u64::from(self.page) < self.total_pages()
    }

    /// Controls only appear when there is more than one page of results.
    pub fn shows_controls(&self) -> bool {
        self.total > u64::from(self.size)
    }

    pub fn reset(&mut self) {
        self.page = 1;
    }

    pub fn label(&self) -> String {
        format!("Page {} of {}", self.page, self.total_pages())
    }

    pub fn total_label(&self) -> String {
        format!(
            "{} job{}",
            self.total,
            if self.total == 1 { "" } else { "s" }
        )
    }
}
