/// Session-level flow. Trials only run in `Practice` and `Experiment`;
/// the other phases gate on participant acknowledgment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Instructions,
    Practice,
    Experiment,
    Complete,
}

impl SessionPhase {
    pub fn next(self) -> Option<Self> {
        use SessionPhase::*;
        Some(match self {
            Instructions => Practice,
            Practice => Experiment,
            Experiment => Complete,
            Complete => return None,
        })
    }

    pub fn is_practice(self) -> bool {
        matches!(self, SessionPhase::Practice)
    }

    pub fn is_experiment(self) -> bool {
        matches!(self, SessionPhase::Experiment)
    }

    /// Prefix for per-trial marker labels ("practice_isi_3" vs "isi_3").
    pub fn marker_prefix(self) -> &'static str {
        if self.is_practice() { "practice_" } else { "" }
    }

    /// Label emitted when the session is aborted during this phase.
    pub fn abort_label(self) -> &'static str {
        if self.is_practice() {
            "practice_aborted"
        } else {
            "experiment_aborted"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_advance_in_order_and_stop() {
        let mut phase = SessionPhase::default();
        let mut seen = vec![phase];
        while let Some(next) = phase.next() {
            phase = next;
            seen.push(phase);
        }
        assert_eq!(
            seen,
            [
                SessionPhase::Instructions,
                SessionPhase::Practice,
                SessionPhase::Experiment,
                SessionPhase::Complete,
            ]
        );
    }
}
