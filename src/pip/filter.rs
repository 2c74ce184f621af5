//! Batch filtering of located records against a region.

use geo_types::Coord;
use rayon::prelude::*;
use tracing::debug;

use super::region::point_in_multipolygon;
use crate::models::{Locate, Location, MultiPolygon};

/// Smallest slice handed to a single rayon task
const MIN_PARALLEL_CHUNK: usize = 1024;

/// Result of one filtering pass
#[derive(Debug)]
pub struct FilterOutcome<'a, E> {
    /// Accepted records, in input order
    pub accepted: Vec<&'a E>,
    /// Every record looked at, accepted or not
    pub total_seen: usize,
    /// Records skipped because their coordinates were missing or malformed
    pub skipped: usize,
}

impl<E> FilterOutcome<'_, E> {
    pub fn accepted_count(&self) -> usize {
        self.accepted.len()
    }

    /// Records that were located but fell outside the region
    pub fn rejected_count(&self) -> usize {
        self.total_seen - self.skipped - self.accepted.len()
    }
}

/// Keep the events that fall inside `multipolygon`.
///
/// Coordinates are read as (x, y) = (longitude, latitude). Events with
/// missing or malformed coordinates are dropped without error.
pub fn filter_events<'a, E: Locate>(
    events: &'a [E],
    multipolygon: &MultiPolygon,
) -> FilterOutcome<'a, E> {
    filter_events_with(events, |p| point_in_multipolygon(p, multipolygon))
}

/// Same as [`filter_events`] with a caller-supplied classifier
pub fn filter_events_with<'a, E, F>(events: &'a [E], classify: F) -> FilterOutcome<'a, E>
where
    E: Locate,
    F: Fn(Coord<f64>) -> bool,
{
    let mut accepted = Vec::new();
    let mut skipped = 0;

    for (idx, event) in events.iter().enumerate() {
        match event.locate() {
            Location::Point(p) => {
                if classify(p) {
                    accepted.push(event);
                }
            }
            location => {
                debug!("Skipping event {}: {:?} coordinates", idx, location);
                skipped += 1;
            }
        }
    }

    FilterOutcome {
        accepted,
        total_seen: events.len(),
        skipped,
    }
}

/// Parallel [`filter_events_with`].
///
/// The slice is split into chunks across the rayon pool. Every record
/// carries its input index through the map so the accepted set is
/// reassembled in input order.
pub fn par_filter_events_with<'a, E, F>(events: &'a [E], classify: F) -> FilterOutcome<'a, E>
where
    E: Locate + Sync,
    F: Fn(Coord<f64>) -> bool + Sync,
{
    let verdicts: Vec<(usize, Option<bool>)> = events
        .par_iter()
        .with_min_len(MIN_PARALLEL_CHUNK)
        .enumerate()
        .map(|(idx, event)| (idx, event.locate().point().map(&classify)))
        .collect();

    let mut accepted = Vec::new();
    let mut skipped = 0;
    for (idx, verdict) in verdicts {
        match verdict {
            Some(true) => accepted.push(&events[idx]),
            Some(false) => {}
            None => skipped += 1,
        }
    }

    FilterOutcome {
        accepted,
        total_seen: events.len(),
        skipped,
    }
}
