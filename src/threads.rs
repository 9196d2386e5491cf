use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;

use thiserror::Error;

/// Work that can be cut into independent parts.
pub trait Split: Sized {
    /// At most `n` parts, in order.
    fn split_to_vec(self, n: usize) -> Vec<Self>;
}

/// Results that can be reassembled from ordered parts.
pub trait Join: Sized {
    fn join_vec(parts: Vec<Self>) -> Self;
}

impl<T> Split for Vec<T> {
    fn split_to_vec(self, n: usize) -> Vec<Self> {
        let ranges = RangeSplitter::split(0, self.len(), n);
        let mut items = self.into_iter();
        ranges
            .into_iter()
            .map(|(start, end)| items.by_ref().take(end - start).collect())
            .collect()
    }
}

impl<T> Join for Vec<T> {
    fn join_vec(parts: Vec<Self>) -> Self {
        parts.into_iter().flatten().collect()
    }
}

impl<U, E> Join for Result<U, E>
where
    U: Join,
{
    fn join_vec(parts: Vec<Self>) -> Self {
        parts
            .into_iter()
            .collect::<Result<Vec<U>, E>>()
            .map(U::join_vec)
    }
}

pub struct RangeSplitter;

impl RangeSplitter {
    /// Cuts `start..end` into `n` contiguous ranges whose lengths differ by
    /// at most one.
    pub fn split(start: usize, end: usize, n: usize) -> Vec<(usize, usize)> {
        let n = n.max(1);
        let len = end.saturating_sub(start);
        let size = len / n;
        let size_xtra = len % n;

        let mut ranges = Vec::with_capacity(n);
        let mut lo = start;
        for i in 0..n {
            let hi = lo + size + usize::from(i < size_xtra);
            ranges.push((lo, hi));
            lo = hi;
        }
        ranges
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PoolError {
    #[error("worker thread hung up")]
    Disconnected,
}

pub trait Call<T, U> {
    fn call(&self, input: T) -> Result<U, PoolError>;
}

struct Worker<T> {
    tx: Sender<(usize, T)>,
}

impl<T> Worker<T>
where
    T: Send + 'static,
{
    fn spawn<U, F>(f: F, results: Sender<(usize, U)>) -> Self
    where
        U: Send + 'static,
        F: Fn(T) -> U + Send + 'static,
    {
        let (tx, rx) = channel::<(usize, T)>();
        thread::spawn(move || {
            for (n, input) in rx {
                if results.send((n, f(input))).is_err() {
                    return;
                }
            }
        });
        Self { tx }
    }
}

/// Fixed set of threads, each running its own copy of a function.
///
/// `call` splits the input, hands the parts out to the workers and joins
/// the results back in part order. Workers exit when the pool is dropped.
pub struct WorkerPool<T, U> {
    workers: Vec<Worker<T>>,
    rx: Receiver<(usize, U)>,
}

impl<T, U> WorkerPool<T, U>
where
    T: Send + 'static,
    U: Send + 'static,
{
    pub fn with<F, G>(n: usize, make: G) -> Self
    where
        G: Fn() -> F,
        F: Fn(T) -> U + Send + 'static,
    {
        let (tx, rx) = channel();
        let workers = (0..n.max(1))
            .map(|_| Worker::spawn(make(), tx.clone()))
            .collect();
        Self { workers, rx }
    }

    pub fn size(&self) -> usize {
        self.workers.len()
    }
}

impl<T, U> Call<T, U> for WorkerPool<T, U>
where
    T: Split,
    U: Join,
{
    fn call(&self, input: T) -> Result<U, PoolError> {
        let parts = input.split_to_vec(self.workers.len());
        let n = parts.len();
        for (i, part) in parts.into_iter().enumerate() {
            self.workers[i % self.workers.len()]
                .tx
                .send((i, part))
                .map_err(|_| PoolError::Disconnected)?;
        }

        let mut results: Vec<Option<U>> = (0..n).map(|_| None).collect();
        for _ in 0..n {
            let (i, result) = self.rx.recv().map_err(|_| PoolError::Disconnected)?;
            results[i] = Some(result);
        }
        results
            .into_iter()
            .collect::<Option<Vec<U>>>()
            .map(U::join_vec)
            .ok_or(PoolError::Disconnected)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn test_vec_split(length: usize, n: usize) {
        let v: Vec<usize> = (0..length).collect();
        let parts = v.clone().split_to_vec(n);
        assert_eq!(parts.len(), n);
        let sizes: Vec<usize> = parts.iter().map(Vec::len).collect();
        let (min, max) = (sizes.iter().min().unwrap(), sizes.iter().max().unwrap());
        assert!(max - min <= 1);
        assert_eq!(Vec::join_vec(parts), v);
    }

    #[test]
    fn test_vec_splits() {
        test_vec_split(1, 1);
        test_vec_split(0, 2);
        test_vec_split(5, 8);
        test_vec_split(8, 5);
        test_vec_split(100, 1);
        test_vec_split(55, 47);
    }

    #[test]
    fn test_range_splitter() {
        assert_eq!(
            RangeSplitter::split(3, 13, 4),
            vec![(3, 6), (6, 9), (9, 11), (11, 13)]
        );
        assert_eq!(RangeSplitter::split(0, 2, 3), vec![(0, 1), (1, 2), (2, 2)]);
    }

    #[test]
    fn test_join_results() {
        let ok: Vec<Result<Vec<u8>, &str>> = vec![Ok(vec![1]), Ok(vec![2, 3])];
        assert_eq!(Result::join_vec(ok), Ok(vec![1, 2, 3]));
        let err: Vec<Result<Vec<u8>, &str>> = vec![Ok(vec![1]), Err("bad")];
        assert_eq!(Result::join_vec(err), Err("bad"));
    }

    #[test]
    fn test_worker_pool() {
        let pool = WorkerPool::with(3, || |v: Vec<u64>| {
            v.iter().map(|x| x * x).collect::<Vec<u64>>()
        });
        assert_eq!(pool.size(), 3);
        let input: Vec<u64> = (0..50).collect();
        let expected: Vec<u64> = input.iter().map(|x| x * x).collect();
        for _ in 0..3 {
            assert_eq!(pool.call(input.clone()), Ok(expected.clone()));
        }
    }
}
