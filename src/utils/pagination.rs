/// View state for a list split into pages. Page numbers are zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    current: usize,
    total: usize,
}

impl PageState {
    /// Create a state positioned on the first of `total` pages
    pub fn new(total: usize) -> Self {
        Self {
            current: 0,
            total: total.max(1),
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    /// Move forward one page, returning whether the page changed
    pub fn next(&mut self) -> bool {
        if self.current + 1 < self.total {
            self.current += 1;
            true
        } else {
            false
        }
    }

    /// Move back one page, returning whether the page changed
    pub fn previous(&mut self) -> bool {
        if self.current > 0 {
            self.current -= 1;
            true
        } else {
            false
        }
    }
}

/// Custom IDs of the Previous/Next buttons attached to one reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageButtons {
    pub previous: String,
    pub next: String,
}

impl PageButtons {
    pub fn new(reply_id: u64) -> Self {
        Self {
            previous: format!("{}prev", reply_id),
            next: format!("{}next", reply_id),
        }
    }

    pub fn contains(&self, custom_id: &str) -> bool {
        custom_id == self.previous || custom_id == self.next
    }

    /// Apply a button press to `state`; presses past either end leave it as is
    pub fn apply(&self, custom_id: &str, state: &mut PageState) {
        if custom_id == self.next {
            state.next();
        } else if custom_id == self.previous {
            state.previous();
        }
    }
}

/// Split items into consecutive pages of at most `page_size` items
pub fn paginate<T>(items: &[T], page_size: usize) -> Vec<&[T]> {
    items.chunks(page_size.max(1)).collect()
}
