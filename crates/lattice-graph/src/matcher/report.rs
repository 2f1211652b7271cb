//! Side channel through which matchers explain their decisions.

/// Receives every field a matcher inspected.
///
/// Reports are informational only; a reporter cannot change a match result.
pub trait MatchReporter {
    fn report(&mut self, field: &str, value: &str, matched: bool);
}

/// Discards all reports.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl MatchReporter for Silent {
    fn report(&mut self, _field: &str, _value: &str, _matched: bool) {}
}

/// One field inspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchReport {
    pub field: String,
    pub value: String,
    pub matched: bool,
}

/// Collects reports for later rendering.
#[derive(Debug, Default, Clone)]
pub struct MatchLog {
    entries: Vec<MatchReport>,
}

impl MatchLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[MatchReport] {
        &self.entries
    }

    /// Reports whose field matched, deduplicated, in first-seen order.
    pub fn matched(&self) -> Vec<&MatchReport> {
        let mut seen = Vec::<&MatchReport>::new();
        for entry in self.entries.iter().filter(|entry| entry.matched) {
            if !seen.contains(&entry) {
                seen.push(entry);
            }
        }
        seen
    }
}

impl MatchReporter for MatchLog {
    fn report(&mut self, field: &str, value: &str, matched: bool) {
        self.entries.push(MatchReport {
            field: field.to_string(),
            value: value.to_string(),
            matched,
        });
    }
}

/// Flips the `matched` flag of everything passing through, so reports under a
/// negation describe the negated semantics.
pub(crate) struct Inverted<'a>(pub(crate) &'a mut dyn MatchReporter);

impl MatchReporter for Inverted<'_> {
    fn report(&mut self, field: &str, value: &str, matched: bool) {
        self.0.report(field, value, !matched);
    }
}
