use chrono::{DateTime, Duration, DurationRound, Utc};
use tokio::task::JoinHandle;

use crate::job::PopulateJob;

/// First instant strictly after `now` that falls on `minute` past the hour
/// with zero seconds, i.e. the next firing of cron `{minute} * * * *`
pub fn next_run_after(now: DateTime<Utc>, minute: u32) -> DateTime<Utc> {
    let hour_start = now
        .duration_trunc(Duration::hours(1))
        .unwrap_or(now);
    let candidate = hour_start + Duration::minutes(i64::from(minute));
    if candidate > now {
        candidate
    } else {
        candidate + Duration::hours(1)
    }
}

/// Spawn the hourly population loop
///
/// Runs are sequential: a run that is still going when the next slot comes
/// around delays that slot instead of overlapping it.
pub fn spawn_hourly(job: PopulateJob, minute: u32, run_on_startup: bool) -> JoinHandle<()> {
    tokio::spawn(async move {
        if run_on_startup {
            tracing::info!("Running population job on startup");
            job.run().await;
        }

        loop {
            let now = Utc::now();
            let next = next_run_after(now, minute);
            let wait = (next - now).to_std().unwrap_or_default();
            tracing::info!("Next population run scheduled at {}", next.to_rfc3339());

            tokio::time::sleep(wait).await;
            job.run().await;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::job::JobSettings;
    use crate::placeholder::{
        PlaceholderComment, PlaceholderError, PlaceholderPost, PlaceholderSource, PlaceholderUser,
    };
    use async_trait::async_trait;
    use chrono::{TimeZone, Timelike};
    use std::sync::Arc;

    struct SingleUserSource;

    #[async_trait]
    impl PlaceholderSource for SingleUserSource {
        async fn users(&self) -> Result<Vec<PlaceholderUser>, PlaceholderError> {
            Ok(vec![PlaceholderUser {
                id: 1,
                name: "Leanne Graham".to_string(),
                username: "Bret".to_string(),
                email: "Sincere@april.biz".to_string(),
            }])
        }

        async fn posts(&self) -> Result<Vec<PlaceholderPost>, PlaceholderError> {
            Ok(vec![PlaceholderPost {
                id: 1,
                user_id: 1,
                title: "sunt aut facere".to_string(),
                body: "quia et suscipit".to_string(),
            }])
        }

        async fn comments(&self) -> Result<Vec<PlaceholderComment>, PlaceholderError> {
            Ok(vec![PlaceholderComment {
                id: 1,
                post_id: 1,
                name: "id labore ex et quam laborum".to_string(),
                email: "Eliseo@gardner.biz".to_string(),
                body: "laudantium enim quasi".to_string(),
            }])
        }
    }

    fn autobot_count(db: &Database) -> i64 {
        let conn = db.connection().expect("Failed to get connection");
        conn.query_row("SELECT COUNT(*) FROM autobots", [], |row| row.get(0))
            .expect("Failed to count autobots")
    }

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, h, m, s).unwrap()
    }

    #[test]
    fn test_top_of_hour() {
        assert_eq!(next_run_after(at(10, 15, 30), 0), at(11, 0, 0));
        assert_eq!(next_run_after(at(10, 59, 59), 0), at(11, 0, 0));
    }

    #[test]
    fn test_exact_slot_moves_to_next_hour() {
        assert_eq!(next_run_after(at(10, 0, 0), 0), at(11, 0, 0));
        assert_eq!(next_run_after(at(10, 30, 0), 30), at(11, 30, 0));
    }

    #[test]
    fn test_later_minute_same_hour() {
        assert_eq!(next_run_after(at(10, 15, 30), 45), at(10, 45, 0));
    }

    #[test]
    fn test_rolls_over_midnight() {
        let next = next_run_after(at(23, 50, 0), 0);
        assert_eq!(next, Utc.with_ymd_and_hms(2024, 3, 11, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_subsecond_precision_ignored() {
        let now = at(10, 0, 0) + Duration::milliseconds(1);
        assert_eq!(next_run_after(now, 0), at(11, 0, 0));
    }

    #[tokio::test]
    async fn test_startup_run_happens_before_first_slot() {
        let db = Database::in_memory().expect("Failed to create database");
        db.initialize().expect("Failed to initialize schema");
        let settings = JobSettings {
            iterations: 1,
            posts_per_autobot: 1,
            comments_per_post: 1,
        };
        let job = PopulateJob::new(db.clone(), Arc::new(SingleUserSource), settings);

        // Half an hour away, so only the startup run can fire during the test
        let minute = (Utc::now().minute() + 30) % 60;
        let handle = spawn_hourly(job, minute, true);

        let mut inserted = 0;
        for _ in 0..100 {
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            inserted = autobot_count(&db);
            if inserted > 0 {
                break;
            }
        }
        handle.abort();

        assert_eq!(inserted, 1);
    }

    #[tokio::test]
    async fn test_no_run_before_first_slot_without_startup_flag() {
        let db = Database::in_memory().expect("Failed to create database");
        db.initialize().expect("Failed to initialize schema");
        let job = PopulateJob::new(db.clone(), Arc::new(SingleUserSource), JobSettings::default());

        let minute = (Utc::now().minute() + 30) % 60;
        let handle = spawn_hourly(job, minute, false);

        tokio::time::sleep(std::time::Duration::from_millis(200)).await;
        handle.abort();

        assert_eq!(autobot_count(&db), 0);
    }
}
