//! Signals to the host
//!
//! The counter text and the end-of-round notice are host calls. The game
//! fires them and moves on; it never waits for an acknowledgement.

use crate::simulation::{SceneEvent, StepReport};

/// How a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Crashed
    Died,
    /// Collected every ring
    Won,
}

/// Host-side display of game progress
pub trait HostSignals {
    /// Show "collected `n` of `total`"
    fn collected(&mut self, n: usize, total: usize);

    /// Announce the end of a round
    fn notify(&mut self, outcome: Outcome);
}

/// Signals written to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSignals;

impl HostSignals for LogSignals {
    fn collected(&mut self, n: usize, total: usize) {
        log::info!("Collected {n} of {total}");
    }

    fn notify(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Died => log::info!("You died"),
            Outcome::Won => log::info!("You won"),
        }
    }
}

/// Forward a step's events to the host
///
/// A reset also sets the counter back to zero of `total`.
pub fn dispatch(report: &StepReport, total: usize, signals: &mut dyn HostSignals) {
    for event in &report.events {
        match event {
            SceneEvent::RingCollected { collected, total } => signals.collected(*collected, *total),
            SceneEvent::Crashed { .. } => signals.notify(Outcome::Died),
            SceneEvent::Completed => signals.notify(Outcome::Won),
        }
    }
    if report.reset {
        signals.collected(0, total);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solar_system::Hazard;

    #[derive(Default)]
    struct Recording {
        counter: Vec<(usize, usize)>,
        outcomes: Vec<Outcome>,
    }

    impl HostSignals for Recording {
        fn collected(&mut self, n: usize, total: usize) {
            self.counter.push((n, total));
        }

        fn notify(&mut self, outcome: Outcome) {
            self.outcomes.push(outcome);
        }
    }

    #[test]
    fn test_quiet_step_sends_nothing() {
        let mut host = Recording::default();
        dispatch(&StepReport::default(), 20, &mut host);
        assert!(host.counter.is_empty() && host.outcomes.is_empty());
    }

    #[test]
    fn test_completion_sends_counter_then_win_then_zero() {
        let report = StepReport {
            events: vec![SceneEvent::RingCollected { collected: 20, total: 20 }, SceneEvent::Completed],
            reset: true,
        };
        let mut host = Recording::default();
        dispatch(&report, 20, &mut host);
        assert_eq!(host.counter, vec![(20, 20), (0, 20)]);
        assert_eq!(host.outcomes, vec![Outcome::Won]);
    }

    #[test]
    fn test_crash_reports_death() {
        let report = StepReport { events: vec![SceneEvent::Crashed { hazard: Hazard::Sun }], reset: true };
        let mut host = Recording::default();
        dispatch(&report, 20, &mut host);
        assert_eq!(host.outcomes, vec![Outcome::Died]);
        assert_eq!(host.counter, vec![(0, 20)]);
    }
}
