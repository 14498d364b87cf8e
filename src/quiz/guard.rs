/// Where a submission attempt came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitSource {
    Click,
    EnterKey,
    Timer,
}

/// At most one submission per page. The flag only ever goes false → true.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubmissionGuard {
    submitted: Option<SubmitSource>,
    rejected: u32,
}

impl SubmissionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// True for the first attempt only; every later attempt is counted and refused.
    pub fn try_submit(&mut self, source: SubmitSource) -> bool {
        if self.submitted.is_some() {
            self.rejected += 1;
            return false;
        }
        self.submitted = Some(source);
        true
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted.is_some()
    }

    /// Source of the submission that went through.
    pub fn submitted_by(&self) -> Option<SubmitSource> {
        self.submitted
    }

    pub fn rejected(&self) -> u32 {
        self.rejected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn n_attempts_one_proceed() {
        for n in 1..=6u32 {
            let mut guard = SubmissionGuard::new();
            let proceeded = (0..n).filter(|_| guard.try_submit(SubmitSource::Click)).count();
            assert_eq!(proceeded, 1);
            assert_eq!(guard.rejected(), n - 1);
        }
    }

    #[test]
    fn first_source_wins() {
        let mut guard = SubmissionGuard::new();
        assert!(guard.try_submit(SubmitSource::Timer));
        assert!(!guard.try_submit(SubmitSource::EnterKey));
        assert!(!guard.try_submit(SubmitSource::Click));
        assert_eq!(guard.submitted_by(), Some(SubmitSource::Timer));
    }
}
