//! Progress notifications emitted while an operation runs.

/// Receives one notification per processed item.
///
/// `current` counts from 1 up to `total`; `label` names the item (usually
/// the file name). Implementations are presentation-only and must not
/// influence the run.
pub trait ProgressObserver {
    fn item_processed(&mut self, current: usize, total: usize, label: &str);
}

/// Observer that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn item_processed(&mut self, _current: usize, _total: usize, _label: &str) {}
}

impl<F> ProgressObserver for F
where
    F: FnMut(usize, usize, &str),
{
    fn item_processed(&mut self, current: usize, total: usize, label: &str) {
        self(current, total, label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_observer() {
        let mut seen = Vec::new();
        {
            let mut observer = |current: usize, total: usize, label: &str| {
                seen.push((current, total, label.to_string()));
            };
            observer.item_processed(1, 2, "a.txt");
            observer.item_processed(2, 2, "b.txt");
        }
        assert_eq!(
            seen,
            vec![(1, 2, "a.txt".to_string()), (2, 2, "b.txt".to_string())]
        );
    }
}
