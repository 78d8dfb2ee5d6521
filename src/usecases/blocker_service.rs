//! Maintenance commands on the destination calendar: wipe and list blockers.

use crate::domain::{Blocker, DomainError, SyncWindow};
use crate::ports::BlockerSink;
use std::sync::Arc;
use tracing::info;

pub struct BlockerService {
    sink: Arc<dyn BlockerSink>,
}

impl BlockerService {
    pub fn new(sink: Arc<dyn BlockerSink>) -> Self {
        Self { sink }
    }

    /// Delete every blocker in `window`. Returns how many were deleted.
    pub async fn wipe(&self, window: SyncWindow) -> Result<usize, DomainError> {
        let deleted = self
            .sink
            .delete_blockers_in_range(window.start, window.end)
            .await?;
        info!(start = %window.start, end = %window.end, deleted, "blockers wiped");
        Ok(deleted)
    }

    pub async fn list(&self, window: SyncWindow) -> Result<Vec<Blocker>, DomainError> {
        let blockers = self
            .sink
            .list_blockers_in_range(window.start, window.end)
            .await?;
        info!(start = %window.start, end = %window.end, count = blockers.len(), "blockers listed");
        Ok(blockers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryCalendar;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[tokio::test]
    async fn test_wipe_and_list_respect_window() {
        let calendar = Arc::new(InMemoryCalendar::new(chrono_tz::Asia::Ho_Chi_Minh));
        for date in [d(2024, 2, 28), d(2024, 3, 1), d(2024, 3, 29), d(2024, 4, 1)] {
            calendar.write_blocker(date, "FREEZE").await.unwrap();
        }
        let svc = BlockerService::new(calendar.clone());
        let window = SyncWindow {
            start: d(2024, 3, 1),
            end: d(2024, 4, 1),
        };

        let listed = svc.list(window).await.unwrap();
        assert_eq!(listed.len(), 2);

        assert_eq!(svc.wipe(window).await.unwrap(), 2);
        assert!(svc.list(window).await.unwrap().is_empty());
        assert_eq!(calendar.blockers().await.len(), 2);
    }
}
