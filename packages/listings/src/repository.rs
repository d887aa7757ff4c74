use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::{QueryAs, QueryScalar};
use sqlx::PgPool;

use crate::error::Result;
use crate::models::{JobPosting, JobPostingRow};
use crate::pagination::{paginate, Pagination};
use crate::query::{build_query, BindValue, FilterCriteria, ORDER_BY};

const SELECT_COLUMNS: &str = "row_id, id, site, job_url, job_url_direct, title, company, location, \
     date_posted, added_on, is_remote, job_level, job_function, listing_type, description, \
     search_term, job_type, emails, salary_source, salary_interval, min_amount, max_amount, \
     currency, company_industry, company_url, company_logo, company_url_direct, \
     company_description, company_addresses, company_num_employees, company_revenue";

/// One page of matching postings plus the pagination block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobsPage {
    pub jobs: Vec<JobPosting>,
    pub pagination: Pagination,
}

fn bind_scalar<'q, O>(
    query: QueryScalar<'q, Postgres, O, PgArguments>,
    value: &'q BindValue,
) -> QueryScalar<'q, Postgres, O, PgArguments> {
    match value {
        BindValue::Text(s) => query.bind(s.as_str()),
        BindValue::Bool(b) => query.bind(*b),
    }
}

fn bind_row<'q, O>(
    query: QueryAs<'q, Postgres, O, PgArguments>,
    value: &'q BindValue,
) -> QueryAs<'q, Postgres, O, PgArguments> {
    match value {
        BindValue::Text(s) => query.bind(s.as_str()),
        BindValue::Bool(b) => query.bind(*b),
    }
}

/// Count matching postings and load the requested page, newest first.
///
/// A page past the end returns no rows together with the real total.
#[tracing::instrument(skip(pool, criteria), fields(search = %criteria.search, site = %criteria.site, remote = criteria.remote_only))]
pub async fn fetch_jobs(
    pool: &PgPool,
    criteria: &FilterCriteria,
    page: u32,
    limit: u32,
) -> Result<JobsPage> {
    let filter = build_query(criteria);
    let sql = filter.to_sql();

    let count_sql = format!("SELECT COUNT(*) FROM job_postings {}", sql.where_sql);
    let count_query = sql
        .binds
        .iter()
        .fold(sqlx::query_scalar::<_, i64>(&count_sql), bind_scalar);
    let total = u64::try_from(count_query.fetch_one(pool).await?).unwrap_or(0);

    let pagination = Pagination::new(total, page, limit);
    let span = paginate(total, pagination.page, pagination.limit);

    if span.skip >= total {
        tracing::debug!(total, skip = span.skip, "page past the last match");
        return Ok(JobsPage {
            jobs: Vec::new(),
            pagination,
        });
    }

    let limit_idx = sql.next_bind_index();
    let offset_idx = limit_idx + 1;
    let data_sql = format!(
        "SELECT {SELECT_COLUMNS} FROM job_postings {} \
         ORDER BY {ORDER_BY} LIMIT ${limit_idx} OFFSET ${offset_idx}",
        sql.where_sql
    );

    let rows: Vec<JobPostingRow> = sql
        .binds
        .iter()
        .fold(sqlx::query_as::<_, JobPostingRow>(&data_sql), bind_row)
        .bind(i64::from(pagination.limit))
        .bind(i64::try_from(span.skip).unwrap_or(i64::MAX))
        .fetch_all(pool)
        .await?;

    tracing::debug!(total, returned = rows.len(), "jobs fetched");

    Ok(JobsPage {
        jobs: rows.into_iter().map(JobPosting::from).collect(),
        pagination,
    })
}

/// Connection and content summary of the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreOverview {
    pub connected: bool,
    pub database: String,
    pub total_rows: i64,
    pub latest: Option<JobPosting>,
}

#[tracing::instrument(skip(pool))]
pub async fn store_overview(pool: &PgPool) -> Result<StoreOverview> {
    let database: String = sqlx::query_scalar("SELECT current_database()")
        .fetch_one(pool)
        .await?;

    let total_rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM job_postings")
        .fetch_one(pool)
        .await?;

    let latest_sql =
        format!("SELECT {SELECT_COLUMNS} FROM job_postings ORDER BY {ORDER_BY} LIMIT 1");
    let latest = sqlx::query_as::<_, JobPostingRow>(&latest_sql)
        .fetch_optional(pool)
        .await?
        .map(JobPosting::from);

    Ok(StoreOverview {
        connected: true,
        database,
        total_rows,
        latest,
    })
}
