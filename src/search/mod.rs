// src/search/mod.rs
//! Binary search over an ordered candidate sequence driven by a boolean
//! oracle.
//!
//! The oracle answers "is the hidden value greater than this candidate?".
//! A search returns the FIRST candidate for which the oracle answers
//! `false`, or the last candidate when it never does. For candidates
//! `0..=9` and the oracle `x < 7` the result is `7`.
//!
//! Observers are notified before every probe and once more when the
//! window has collapsed (`low == mid == high`).

pub mod error;
pub mod observer;
pub mod step;

use std::future::Future;

use tracing::debug;

pub use error::SearchError;
pub use observer::{LogObserver, NoopObserver, ObserverError, StepObserver};
pub use step::{CellState, Step};

use observer::notify;

/// Index bookkeeping shared by the blocking and async searches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bisection {
    low: usize,
    high: usize,
}

impl Bisection {
    /// `None` for an empty sequence
    pub fn new(len: usize) -> Option<Self> {
        if len == 0 {
            None
        } else {
            Some(Self { low: 0, high: len - 1 })
        }
    }

    /// Midpoint to probe next, `None` once the window is a single index
    pub fn next_probe(&self) -> Option<usize> {
        if self.low < self.high {
            Some(self.low + (self.high - self.low) / 2)
        } else {
            None
        }
    }

    /// Apply the oracle's answer for `mid`
    pub fn narrow(&mut self, mid: usize, greater: bool) {
        debug_assert!(self.low <= mid && mid < self.high);
        if greater {
            self.low = mid + 1;
        } else {
            self.high = mid;
        }
    }

    pub fn low(&self) -> usize {
        self.low
    }

    pub fn high(&self) -> usize {
        self.high
    }

    fn step<'a, T>(&self, values: &'a [T], mid: usize) -> Step<'a, T> {
        Step { values, low: self.low, mid, high: self.high }
    }

    fn settled<'a, T>(&self, values: &'a [T]) -> Step<'a, T> {
        Step { values, low: self.low, mid: self.low, high: self.low }
    }
}

/// Blocking search. `greater_than` is called at most `ceil(log2(len))`
/// times; its first error aborts the search.
pub fn binary_search<T, E, F, O>(
    candidates: impl IntoIterator<Item = T>,
    mut greater_than: F,
    observer: &mut O,
) -> Result<T, SearchError<E>>
where
    F: FnMut(&T) -> Result<bool, E>,
    O: StepObserver<T> + ?Sized,
{
    let mut values: Vec<T> = candidates.into_iter().collect();
    let mut bisection =
        Bisection::new(values.len()).ok_or(SearchError::InvalidInput("no candidates to search"))?;

    while let Some(mid) = bisection.next_probe() {
        debug!("Binary search - number of candidates: {}", bisection.high() - bisection.low() + 1);
        notify(observer, bisection.step(&values, mid));
        let greater = greater_than(&values[mid]).map_err(SearchError::Oracle)?;
        bisection.narrow(mid, greater);
    }

    notify(observer, bisection.settled(&values));
    Ok(values.swap_remove(bisection.low()))
}

/// Async flavour of [`binary_search`] for oracles backed by network probes.
/// Probes run one after another; the loop never has two in flight.
pub async fn binary_search_async<T, E, F, Fut, O>(
    candidates: impl IntoIterator<Item = T>,
    mut greater_than: F,
    observer: &mut O,
) -> Result<T, SearchError<E>>
where
    F: FnMut(&T) -> Fut,
    Fut: Future<Output = Result<bool, E>>,
    O: StepObserver<T> + ?Sized,
{
    let mut values: Vec<T> = candidates.into_iter().collect();
    let mut bisection =
        Bisection::new(values.len()).ok_or(SearchError::InvalidInput("no candidates to search"))?;

    while let Some(mid) = bisection.next_probe() {
        debug!("Binary search - number of candidates: {}", bisection.high() - bisection.low() + 1);
        notify(observer, bisection.step(&values, mid));
        let greater = greater_than(&values[mid]).await.map_err(SearchError::Oracle)?;
        bisection.narrow(mid, greater);
    }

    notify(observer, bisection.settled(&values));
    Ok(values.swap_remove(bisection.low()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::convert::Infallible;

    /// Records every notification it receives
    #[derive(Default)]
    struct Recorder {
        steps: Vec<(usize, usize, usize)>,
    }

    impl<T> StepObserver<T> for Recorder {
        fn on_step(&mut self, step: &Step<'_, T>) -> Result<(), ObserverError> {
            self.steps.push((step.low, step.mid, step.high));
            Ok(())
        }
    }

    struct Broken;

    impl<T> StepObserver<T> for Broken {
        fn on_step(&mut self, _step: &Step<'_, T>) -> Result<(), ObserverError> {
            Err("terminal closed".into())
        }
    }

    fn ceil_log2(n: usize) -> usize {
        (n as f64).log2().ceil() as usize
    }

    #[test]
    fn test_first_false_convention() {
        let result = binary_search(0..10, |x| Ok::<_, Infallible>(*x < 7), &mut NoopObserver);
        assert_eq!(result.unwrap(), 7);
    }

    #[test]
    fn test_every_boundary_is_found_within_log_bound() {
        for n in 1..=70usize {
            for boundary in 0..n {
                let mut probes = 0;
                let mut recorder = Recorder::default();
                let found = binary_search(
                    0..n,
                    |&index| {
                        probes += 1;
                        Ok::<_, Infallible>(index < boundary)
                    },
                    &mut recorder,
                )
                .unwrap();

                assert_eq!(found, boundary, "n={} boundary={}", n, boundary);
                assert!(probes <= ceil_log2(n), "n={} took {} probes", n, probes);
                assert_eq!(recorder.steps.len(), probes + 1);
            }
        }
    }

    #[test]
    fn test_observer_sees_ordered_shrinking_windows() {
        let mut recorder = Recorder::default();
        binary_search(0..100u32, |x| Ok::<_, Infallible>(*x < 42), &mut recorder).unwrap();

        for &(low, mid, high) in &recorder.steps {
            assert!(low <= mid && mid <= high && high <= 99);
        }
        for pair in recorder.steps.windows(2) {
            assert!(pair[1].2 - pair[1].0 < pair[0].2 - pair[0].0);
        }
        assert_eq!(recorder.steps.last(), Some(&(42, 42, 42)));
        assert_eq!(
            recorder.steps.iter().filter(|(low, _, high)| low == high).count(),
            1
        );
    }

    fn step_logger(log: &RefCell<Vec<String>>) -> impl FnMut(&Step<'_, u32>) + '_ {
        move |step| log.borrow_mut().push(format!("step {}", step.mid))
    }

    #[test]
    fn test_observer_runs_before_probe() {
        let log = RefCell::new(Vec::new());
        let mut observer = step_logger(&log);
        binary_search(
            0..4u32,
            |x| {
                log.borrow_mut().push(format!("probe {}", x));
                Ok::<_, Infallible>(*x < 3)
            },
            &mut observer,
        )
        .unwrap();
        drop(observer);

        assert_eq!(
            log.into_inner(),
            vec!["step 1", "probe 1", "step 2", "probe 2", "step 3"]
        );
    }

    #[test]
    fn test_empty_input_is_rejected_without_probing() {
        let mut probes = 0;
        let mut recorder = Recorder::default();
        let result = binary_search(
            Vec::<u8>::new(),
            |_| {
                probes += 1;
                Ok::<_, Infallible>(true)
            },
            &mut recorder,
        );

        assert!(matches!(result, Err(SearchError::InvalidInput(_))));
        assert_eq!(probes, 0);
        assert!(recorder.steps.is_empty());
    }

    #[test]
    fn test_single_value_needs_no_probe() {
        let mut recorder = Recorder::default();
        let result = binary_search(
            ['x'],
            |_| -> Result<bool, Infallible> { panic!("no probe expected") },
            &mut recorder,
        );

        assert_eq!(result.unwrap(), 'x');
        assert_eq!(recorder.steps, vec![(0, 0, 0)]);
    }

    #[test]
    fn test_degenerate_oracles() {
        let values: Vec<char> = ('a'..='z').collect();

        let mut probes = 0;
        let last = binary_search(
            values.clone(),
            |_| {
                probes += 1;
                Ok::<_, Infallible>(true)
            },
            &mut NoopObserver,
        );
        assert_eq!(last.unwrap(), 'z');
        assert!(probes <= 5);

        let first = binary_search(values, |_| Ok::<_, Infallible>(false), &mut NoopObserver);
        assert_eq!(first.unwrap(), 'a');
    }

    #[test]
    fn test_oracle_failure_aborts_search() {
        let mut probes = 0;
        let result: Result<u32, SearchError<&str>> = binary_search(
            0..1000u32,
            |x| {
                probes += 1;
                if probes == 3 {
                    Err("connection reset")
                } else {
                    Ok(*x < 500)
                }
            },
            &mut NoopObserver,
        );

        assert!(matches!(result, Err(SearchError::Oracle("connection reset"))));
        assert_eq!(probes, 3);
    }

    #[test]
    fn test_failing_observer_does_not_change_result() {
        let result = binary_search(0..10, |x| Ok::<_, Infallible>(*x < 7), &mut Broken);
        assert_eq!(result.unwrap(), 7);
    }

    #[test]
    fn test_bisection_rejects_empty() {
        assert!(Bisection::new(0).is_none());
        let single = Bisection::new(1).unwrap();
        assert_eq!(single.next_probe(), None);
    }

    #[tokio::test]
    async fn test_async_search_matches_blocking_search() {
        for boundary in 0..26usize {
            let values: Vec<char> = ('a'..='z').collect();
            let expected = values[boundary];
            let mut recorder = Recorder::default();
            let found = binary_search_async(
                values,
                |c| {
                    let greater = (*c as usize - 'a' as usize) < boundary;
                    async move { Ok::<_, Infallible>(greater) }
                },
                &mut recorder,
            )
            .await
            .unwrap();

            assert_eq!(found, expected);
            assert!(recorder.steps.len() <= ceil_log2(26) + 1);
            assert_eq!(recorder.steps.last(), Some(&(boundary, boundary, boundary)));
        }
    }

    #[tokio::test]
    async fn test_async_empty_input() {
        let result = binary_search_async(
            Vec::<u32>::new(),
            |_| async { Ok::<_, Infallible>(true) },
            &mut NoopObserver,
        )
        .await;
        assert!(matches!(result, Err(SearchError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_async_oracle_failure_propagates() {
        let result: Result<u32, SearchError<String>> = binary_search_async(
            0..10u32,
            |_| async { Err("probe refused".to_string()) },
            &mut NoopObserver,
        )
        .await;
        assert!(matches!(result, Err(SearchError::Oracle(ref s)) if s == "probe refused"));
    }
}
