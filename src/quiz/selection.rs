/// Radio-style answer selection over a fixed number of options.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnswerSelection {
    option_count: usize,
    selected: Option<usize>,
}

/// Result of a selection: which option lost the mark, which gained it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectionChange {
    pub previous: Option<usize>,
    pub current: usize,
}

impl AnswerSelection {
    pub fn new(option_count: usize) -> Self {
        Self {
            option_count,
            selected: None,
        }
    }

    pub fn option_count(&self) -> usize {
        self.option_count
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Marks option `index` (0-based). Out of range leaves the state alone.
    pub fn select(&mut self, index: usize) -> Option<SelectionChange> {
        if index >= self.option_count {
            return None;
        }
        let previous = self.selected.replace(index);
        Some(SelectionChange {
            previous,
            current: index,
        })
    }

    /// Submit stays disabled until something is selected.
    pub fn submit_enabled(&self) -> bool {
        self.selected.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty_and_disabled() {
        let s = AnswerSelection::new(3);
        assert_eq!(s.selected(), None);
        assert!(!s.submit_enabled());
    }

    #[test]
    fn reselect_reports_previous() {
        let mut s = AnswerSelection::new(3);
        assert_eq!(s.select(0), Some(SelectionChange { previous: None, current: 0 }));
        assert_eq!(s.select(2), Some(SelectionChange { previous: Some(0), current: 2 }));
        assert!(s.submit_enabled());
    }

    #[test]
    fn out_of_range_is_ignored() {
        let mut s = AnswerSelection::new(3);
        s.select(1);
        assert_eq!(s.select(3), None);
        assert_eq!(s.selected(), Some(1));
    }
}
