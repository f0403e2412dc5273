//! Counted completion gate: wait for a fixed number of participants to report.

use crossbeam_channel::{Receiver, Sender};

use crate::error::Error;

/// Releases once exactly `expected` arrivals have been received.
///
/// Each participant reports through a cloned `Sender`. Order of arrival is
/// irrelevant; the caller's continuation runs once, after `wait` returns.
pub struct CompletionGate<T> {
    /// Number of arrivals required before release.
    expected: usize,
    /// Arrival queue.
    receiver: Receiver<T>,
    /// Template sender cloned for each participant; dropped by `wait`.
    sender: Sender<T>,
}

impl<T> CompletionGate<T> {
    /// A handle for one participant to report its arrival through.
    pub fn participant(&self) -> Sender<T> {
        return self.sender.clone();
    }

    /// Gate expecting `expected` arrivals.
    pub fn new(expected: usize) -> Self {
        let (sender, receiver) = crossbeam_channel::bounded(expected);
        return Self { expected, receiver, sender };
    }

    /// Block until every participant has arrived, returning arrivals in arrival order.
    ///
    /// # Errors
    ///
    /// Returns `Error::IncompleteCatalog` if every participant handle is dropped
    /// before the expected number of arrivals.
    pub fn wait(self) -> Result<Vec<T>, Error> {
        let Self { expected, receiver, sender } = self;
        drop(sender);

        let mut arrivals = Vec::with_capacity(expected);
        while arrivals.len() < expected {
            let Ok(arrival) = receiver.recv() else {
                return Err(Error::IncompleteCatalog {
                    reason: format!(
                        "only {} of {expected} loads reported before the gate closed",
                        arrivals.len()
                    ),
                });
            };
            arrivals.push(arrival);
        }
        return Ok(arrivals);
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, reason = "tests")]
mod tests {
    use std::thread;
    use std::time::Duration;

    use super::*;

    #[test]
    fn releases_after_all_participants_arrive() {
        let gate = CompletionGate::new(2);
        let slow = gate.participant();
        let fast = gate.participant();

        thread::scope(|scope| {
            scope.spawn(move || {
                thread::sleep(Duration::from_millis(20));
                slow.send("slow").unwrap();
            });
            scope.spawn(move || fast.send("fast").unwrap());

            let arrivals = gate.wait().unwrap();
            assert_eq!(arrivals.len(), 2);
            assert!(arrivals.contains(&"slow"));
            assert!(arrivals.contains(&"fast"));
        });
    }

    #[test]
    fn fails_when_a_participant_never_reports() {
        let gate: CompletionGate<u8> = CompletionGate::new(2);
        let only = gate.participant();
        let silent = gate.participant();

        thread::scope(|scope| {
            scope.spawn(move || only.send(1).unwrap());
            scope.spawn(move || drop(silent));

            match gate.wait() {
                Err(Error::IncompleteCatalog { reason }) => assert!(reason.contains("only 1 of 2")),
                other => panic!("expected IncompleteCatalog, got {other:?}"),
            }
        });
    }
}
