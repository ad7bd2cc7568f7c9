//! Fan-out of room lookups across a fixed set of workers.
//!
//! Links are cut into contiguous partitions up front; each partition is
//! resolved sequentially by its own spawned task, and the coordinator waits
//! for every task before returning. Results are concatenated in partition
//! order. When a partition fails, workers still running are aborted.

use crate::portal::Portal;
use crate::room::{RoomAvailabilityResolver, RoomError, RoomReport};
use crate::search::RoomLink;
use crate::utils::fmt_duration;
use chrono::DateTime;
use chrono_tz::Tz;
use futures::StreamExt;
use futures::stream::FuturesOrdered;
use std::ops::Range;
use std::sync::Arc;
use std::time::Instant;
use tracing::{Instrument, debug, info, warn};

#[derive(Debug, thiserror::Error)]
pub enum AggregateError {
    #[error("worker {worker} failed")]
    Room {
        worker: usize,
        #[source]
        source: RoomError,
    },
    #[error("worker {worker} did not finish")]
    Worker {
        worker: usize,
        #[source]
        source: tokio::task::JoinError,
    },
}

/// Index ranges splitting `len` items between `workers` workers.
///
/// With at least as many workers as items every item gets its own range.
/// Otherwise there are exactly `workers` ranges; the first `len % workers`
/// of them hold one extra item.
pub fn partition(len: usize, workers: usize) -> Vec<Range<usize>> {
    if len == 0 {
        return Vec::new();
    }
    let workers = workers.clamp(1, len);

    let base = len / workers;
    let remainder = len % workers;
    let mut ranges = Vec::with_capacity(workers);
    let mut start = 0;
    for i in 0..workers {
        let size = base + usize::from(i < remainder);
        ranges.push(start..start + size);
        start += size;
    }
    ranges
}

pub struct ConcurrentAggregator<P: Portal + ?Sized> {
    resolver: RoomAvailabilityResolver<P>,
}

impl<P: Portal + ?Sized + 'static> ConcurrentAggregator<P> {
    pub fn new(resolver: RoomAvailabilityResolver<P>) -> Self {
        Self { resolver }
    }

    /// Resolve every link with up to `workers` concurrent workers.
    ///
    /// An empty input yields the single "no reservations" placeholder. The
    /// first room that fails aborts the whole run; the error reported is the
    /// one from the lowest-indexed failing partition.
    pub async fn aggregate(
        &self,
        links: Vec<RoomLink>,
        workers: usize,
        now: DateTime<Tz>,
    ) -> Result<Vec<RoomReport>, AggregateError> {
        if links.is_empty() {
            info!("no rooms to resolve");
            return Ok(vec![RoomReport::no_reservations()]);
        }

        let start = Instant::now();
        let links: Arc<[RoomLink]> = links.into();
        let ranges = partition(links.len(), workers);
        info!(
            rooms = links.len(),
            workers = ranges.len(),
            "resolving rooms"
        );

        let handles: Vec<_> = ranges
            .into_iter()
            .enumerate()
            .map(|(worker, range)| {
                let resolver = self.resolver.clone();
                let links = links.clone();
                let span = tracing::debug_span!("worker", worker);
                tokio::spawn(
                    async move {
                        debug!(rooms = range.len(), "worker started");
                        let mut reports = Vec::with_capacity(range.len());
                        for link in &links[range] {
                            reports.push(resolver.resolve(link, now).await?);
                        }
                        Ok::<_, RoomError>(reports)
                    }
                    .instrument(span),
                )
            })
            .collect();

        let abort_handles: Vec<_> = handles.iter().map(|h| h.abort_handle()).collect();
        let mut joined: FuturesOrdered<_> = handles.into_iter().collect();

        // Results arrive in partition order; the first failure cancels the rest.
        let mut reports = Vec::with_capacity(links.len());
        let mut worker = 0;
        while let Some(result) = joined.next().await {
            let outcome = result
                .map_err(|source| AggregateError::Worker { worker, source })
                .and_then(|r| r.map_err(|source| AggregateError::Room { worker, source }));
            match outcome {
                Ok(worker_reports) => reports.extend(worker_reports),
                Err(e) => {
                    abort_handles.iter().for_each(|h| h.abort());
                    warn!(worker, "room lookup failed, cancelled remaining workers");
                    return Err(e);
                }
            }
            worker += 1;
        }

        info!(
            rooms = reports.len(),
            duration = fmt_duration(start.elapsed()),
            "resolved all rooms"
        );
        Ok(reports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(len: usize, workers: usize) {
        let ranges = partition(len, workers);
        let sizes: Vec<usize> = ranges.iter().map(|r| r.len()).collect();

        assert_eq!(sizes.iter().sum::<usize>(), len);
        assert!(sizes.iter().all(|&s| s > 0), "no empty partitions");
        assert!(
            sizes.windows(2).all(|w| w[0].abs_diff(w[1]) <= 1),
            "sizes differ by more than one: {sizes:?}"
        );
        // contiguous, in order, covering 0..len
        let flattened: Vec<usize> = ranges.into_iter().flatten().collect();
        assert_eq!(flattened, (0..len).collect::<Vec<_>>());
    }

    #[test]
    fn test_partition_properties() {
        for len in 1..=40 {
            for workers in 1..=12 {
                check(len, workers);
            }
        }
    }

    #[test]
    fn test_partition_remainder_goes_first() {
        assert_eq!(partition(10, 4), vec![0..3, 3..6, 6..8, 8..10]);
        assert_eq!(partition(9, 3), vec![0..3, 3..6, 6..9]);
    }

    #[test]
    fn test_partition_more_workers_than_links() {
        assert_eq!(partition(3, 8), vec![0..1, 1..2, 2..3]);
        assert_eq!(partition(4, 4), vec![0..1, 1..2, 2..3, 3..4]);
    }

    #[test]
    fn test_partition_empty() {
        assert!(partition(0, 4).is_empty());
    }

    #[test]
    fn test_partition_exact_worker_count_when_fewer() {
        assert_eq!(partition(31, 4).len(), 4);
        assert_eq!(partition(31, 4)[0].len(), 8);
        assert_eq!(partition(31, 4)[3].len(), 7);
    }
}
