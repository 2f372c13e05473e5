use crate::core::{JsonlError, Result};

/// Assigns positional row identifiers to a record stream.
///
/// Identifiers are only stable while the file is append-only, so the tracker
/// checks the stream against the row count observed when the schema was
/// built: ending early yields [`JsonlError::RowCountChanged`], while extra
/// trailing records simply receive identifiers past `expected`.
pub struct RowIdTracker<I> {
    inner: I,
    next_id: usize,
    expected: usize,
    finished: bool,
}

impl<I> RowIdTracker<I> {
    pub fn new(inner: I, expected: usize) -> Self {
        Self {
            inner,
            next_id: 0,
            expected,
            finished: false,
        }
    }
}

impl<I, T> Iterator for RowIdTracker<I>
where
    I: Iterator<Item = Result<T>>,
{
    type Item = Result<(usize, T)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.inner.next() {
            Some(Ok(record)) => {
                let id = self.next_id;
                self.next_id += 1;
                Some(Ok((id, record)))
            }
            Some(Err(err)) => {
                self.finished = true;
                Some(Err(err))
            }
            None => {
                self.finished = true;
                if self.next_id < self.expected {
                    Some(Err(JsonlError::RowCountChanged {
                        expected: self.expected,
                        actual: self.next_id,
                    }))
                } else {
                    None
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(n: usize) -> impl Iterator<Item = Result<&'static str>> {
        std::iter::repeat_n("record", n).map(Ok)
    }

    #[test]
    fn test_ids_are_dense_from_zero() {
        let ids: Vec<usize> = RowIdTracker::new(source(3), 3)
            .map(|item| item.unwrap().0)
            .collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn test_growth_extends_ids() {
        let ids: Vec<usize> = RowIdTracker::new(source(5), 3)
            .map(|item| item.unwrap().0)
            .collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_shrink_is_reported_once() {
        let mut tracker = RowIdTracker::new(source(2), 4);

        assert!(tracker.next().unwrap().is_ok());
        assert!(tracker.next().unwrap().is_ok());
        match tracker.next() {
            Some(Err(JsonlError::RowCountChanged { expected, actual })) => {
                assert_eq!(expected, 4);
                assert_eq!(actual, 2);
            }
            other => panic!("expected row count error, got {:?}", other),
        }
        assert!(tracker.next().is_none());
    }

    #[test]
    fn test_early_stop_does_not_check_count() {
        let taken: Vec<_> = RowIdTracker::new(source(2), 4).take(2).collect();
        assert!(taken.iter().all(|item| item.is_ok()));
    }

    #[test]
    fn test_inner_error_ends_stream() {
        let inner = vec![Ok("a"), Err(JsonlError::NoData), Ok("b")].into_iter();
        let items: Vec<_> = RowIdTracker::new(inner, 3).collect();

        assert_eq!(items.len(), 2);
        assert!(matches!(items[1], Err(JsonlError::NoData)));
    }
}
