/// Severity of a notification row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warning,
    Error,
}

impl Level {
    pub fn title(self) -> &'static str {
        match self {
            Level::Info => "INFO",
            Level::Warning => "WARN",
            Level::Error => "ERROR",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub level: Level,
    pub title: String,
    pub body: String,
}

/// Page cursor over a fixed list; prev/next clamp at the edges.
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    page: usize,
    per_page: usize,
    total: usize,
}

impl Paginator {
    pub fn new(total: usize, per_page: usize) -> Self {
        Self {
            page: 0,
            per_page: per_page.max(1),
            total,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_count(&self) -> usize {
        if self.total == 0 {
            1
        } else {
            self.total.div_ceil(self.per_page)
        }
    }

    pub fn next(&mut self) {
        if self.page + 1 < self.page_count() {
            self.page += 1;
        }
    }

    pub fn prev(&mut self) {
        self.page = self.page.saturating_sub(1);
    }

    /// Index range of the current page, half-open.
    pub fn range(&self) -> std::ops::Range<usize> {
        let start = self.page * self.per_page;
        let end = (start + self.per_page).min(self.total);
        start..end
    }
}

/// The error feed shows five rows per page.
pub const ERRORS_PER_PAGE: usize = 5;

/// Demo notification feed; the dashboard ships with a fixed error list.
pub fn demo_feed() -> Vec<Notice> {
    (1..=20)
        .map(|n| Notice {
            level: if n % 4 == 0 {
                Level::Warning
            } else {
                Level::Error
            },
            title: format!("Delivery failure #{n}"),
            body: format!("Message {n} could not be delivered to the recipient."),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twenty_items_make_four_pages_of_five() {
        let pager = Paginator::new(20, ERRORS_PER_PAGE);
        assert_eq!(pager.page_count(), 4);
        assert_eq!(pager.range(), 0..5);
    }

    #[test]
    fn next_and_prev_clamp_at_edges() {
        let mut pager = Paginator::new(20, ERRORS_PER_PAGE);
        pager.prev();
        assert_eq!(pager.page(), 0);
        for _ in 0..10 {
            pager.next();
        }
        assert_eq!(pager.page(), 3);
        assert_eq!(pager.range(), 15..20);
    }

    #[test]
    fn last_page_range_is_truncated() {
        let mut pager = Paginator::new(12, 5);
        pager.next();
        pager.next();
        assert_eq!(pager.range(), 10..12);
    }

    #[test]
    fn empty_feed_has_one_empty_page() {
        let pager = Paginator::new(0, 5);
        assert_eq!(pager.page_count(), 1);
        assert_eq!(pager.range(), 0..0);
    }
}
