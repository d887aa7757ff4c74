use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveTime, Offset, TimeZone, Utc};
use sqlx::PgPool;
use strum::IntoEnumIterator;

use crate::error::Result;
use crate::models::Site;

/// Aggregate counts for the dashboard overview.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_jobs: i64,
    pub today_jobs: i64,
    pub per_site: BTreeMap<Site, i64>,
}

impl DashboardStats {
    pub fn site(&self, site: Site) -> i64 {
        self.per_site.get(&site).copied().unwrap_or(0)
    }
}

/// Midnight of the calendar day containing `now`, in `now`'s timezone.
pub fn start_of_day<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Utc> {
    let midnight = now.date_naive().and_time(NaiveTime::MIN);
    match now.timezone().from_local_datetime(&midnight).earliest() {
        Some(local) => local.with_timezone(&Utc),
        None => {
            // Midnight skipped by a DST transition; keep the current offset.
            let offset = now.offset().fix().local_minus_utc();
            (midnight - Duration::seconds(i64::from(offset))).and_utc()
        }
    }
}

/// Count all postings, those posted since `day_start`, and those per known site.
///
/// Postings whose site is not a [`Site`] value are included in the total but
/// not reported under any site.
#[tracing::instrument(skip(pool))]
pub async fn compute_stats(pool: &PgPool, day_start: DateTime<Utc>) -> Result<DashboardStats> {
    let total_jobs: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM job_postings")
        .fetch_one(pool)
        .await?;

    let today_jobs: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM job_postings WHERE date_posted >= $1")
            .bind(day_start)
            .fetch_one(pool)
            .await?;

    let known: Vec<String> = Site::iter().map(|s| s.to_string()).collect();
    let rows: Vec<(String, i64)> = sqlx::query_as(
        "SELECT site, COUNT(*) FROM job_postings WHERE site = ANY($1) GROUP BY site",
    )
    .bind(known)
    .fetch_all(pool)
    .await?;

    let mut per_site: BTreeMap<Site, i64> = Site::iter().map(|s| (s, 0)).collect();
    for (site, count) in rows {
        if let Ok(site) = site.parse::<Site>() {
            per_site.insert(site, count);
        }
    }

    let uncounted = total_jobs - per_site.values().sum::<i64>();
    if uncounted > 0 {
        tracing::debug!(uncounted, "postings with unrecognized site values");
    }

    Ok(DashboardStats {
        total_jobs,
        today_jobs,
        per_site,
    })
}
