use tracing::debug;

use crate::config::FILTER_SETS;
use crate::rules::is_daytime_only;
use crate::types::{BucketStats, DashboardStats, FilterResult, ResultsByFilter, ShipRecord};

/// Dashboard counters for every (direction, status) bucket.
/// Failed or missing filters leave their bucket at zero; never fails.
pub fn aggregate(results: &ResultsByFilter) -> DashboardStats {
    let mut stats = DashboardStats::default();

    for filter in &FILTER_SETS {
        let (direction, status) = filter.bucket();
        *stats.bucket_mut(direction, status) = match results.get(filter.name) {
            Some(FilterResult::Ships(ships)) => count(ships),
            Some(FilterResult::Failed { .. }) | None => BucketStats::default(),
        };
        let bucket = stats.bucket(direction, status);
        debug!(
            filter = filter.name,
            %direction,
            %status,
            total = bucket.total,
            daytime_only = bucket.daytime_only,
            "bucket counted",
        );
    }

    stats
}

fn count(ships: &[ShipRecord]) -> BucketStats {
    let with_pilot = ships.iter().filter(|s| s.has_pilot).count();
    BucketStats {
        total: ships.len(),
        with_pilot,
        without_pilot: ships.len() - with_pilot,
        daytime_only: ships.iter().filter(|s| is_daytime_only(s)).count(),
    }
}
