mod common;

use chrono::{Duration, TimeZone, Utc};
use pretty_assertions::assert_eq;

use common::Seed;
use jobdash_listings::models::Loose;
use jobdash_listings::query::FilterCriteria;
use jobdash_listings::repository::{self, fetch_jobs};

#[tokio::test]
async fn test_empty_filters_return_newest_first_with_full_total() {
    let db = common::TestDb::new().await;
    let base = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();

    for i in 0..12 {
        Seed::new(&format!("job-{i}"), "indeed", "Engineer", "Acme")
            .added(base + Duration::hours(i))
            .insert(&db.pool)
            .await;
    }

    let page = fetch_jobs(&db.pool, &FilterCriteria::default(), 1, 10)
        .await
        .unwrap();

    assert_eq!(page.jobs.len(), 10);
    assert_eq!(page.pagination.total, 12);
    assert_eq!(page.pagination.pages, 2);
    assert_eq!(page.pagination.page, 1);
    assert_eq!(page.pagination.limit, 10);
    assert_eq!(page.jobs[0].id, "job-11");
    assert_eq!(page.jobs[9].id, "job-2");

    let second = fetch_jobs(&db.pool, &FilterCriteria::default(), 2, 10)
        .await
        .unwrap();
    let ids: Vec<&str> = second.jobs.iter().map(|j| j.id.as_str()).collect();
    assert_eq!(ids, vec!["job-1", "job-0"]);
}

#[tokio::test]
async fn test_remote_and_site_filter() {
    let db = common::TestDb::new().await;

    Seed::new("a", "linkedin", "Rust Engineer", "Acme").remote().insert(&db.pool).await;
    Seed::new("b", "linkedin", "Go Engineer", "Acme").insert(&db.pool).await;
    Seed::new("c", "indeed", "Rust Engineer", "Acme").remote().insert(&db.pool).await;

    let criteria = FilterCriteria::default()
        .with_site("linkedin")
        .with_remote_only(true);
    let page = fetch_jobs(&db.pool, &criteria, 1, 20).await.unwrap();

    let ids: Vec<&str> = page.jobs.iter().map(|j| j.id.as_str()).collect();
    assert_eq!(ids, vec!["a"]);
    assert!(page.jobs.iter().all(|j| j.site == "linkedin" && j.is_remote));
    assert_eq!(page.pagination.total, 1);
}

#[tokio::test]
async fn test_remote_and_site_filter_without_matches() {
    let db = common::TestDb::new().await;

    Seed::new("b", "linkedin", "Go Engineer", "Acme").insert(&db.pool).await;

    let criteria = FilterCriteria::default()
        .with_site("linkedin")
        .with_remote_only(true);
    let page = fetch_jobs(&db.pool, &criteria, 1, 20).await.unwrap();

    assert!(page.jobs.is_empty());
    assert_eq!(page.pagination.total, 0);
    assert_eq!(page.pagination.pages, 0);
}

#[tokio::test]
async fn test_out_of_range_page_is_empty_not_an_error() {
    let db = common::TestDb::new().await;

    for i in 0..5 {
        Seed::new(&format!("job-{i}"), "google", "Engineer", "Acme")
            .insert(&db.pool)
            .await;
    }

    let page = fetch_jobs(&db.pool, &FilterCriteria::default(), 3, 10)
        .await
        .unwrap();

    assert!(page.jobs.is_empty());
    assert_eq!(page.pagination.total, 5);
    assert_eq!(page.pagination.pages, 1);
    assert_eq!(page.pagination.page, 3);
}

#[tokio::test]
async fn test_search_matches_company_name_only() {
    let db = common::TestDb::new().await;

    Seed::new("hit", "glassdoor", "Platform Engineer", "Initech")
        .location("Utrecht")
        .description("Keep the lights on")
        .insert(&db.pool)
        .await;
    Seed::new("miss", "glassdoor", "Platform Engineer", "Globex")
        .location("Utrecht")
        .insert(&db.pool)
        .await;

    let page = fetch_jobs(&db.pool, &FilterCriteria::default().with_search("initech"), 1, 10)
        .await
        .unwrap();

    let ids: Vec<&str> = page.jobs.iter().map(|j| j.id.as_str()).collect();
    assert_eq!(ids, vec!["hit"]);
}

#[tokio::test]
async fn test_search_treats_wildcards_literally() {
    let db = common::TestDb::new().await;

    Seed::new("pct", "indeed", "100% remote engineer", "Acme").insert(&db.pool).await;
    Seed::new("plain", "indeed", "1000 engineers", "Acme").insert(&db.pool).await;

    let page = fetch_jobs(&db.pool, &FilterCriteria::default().with_search("100%"), 1, 10)
        .await
        .unwrap();

    let ids: Vec<&str> = page.jobs.iter().map(|j| j.id.as_str()).collect();
    assert_eq!(ids, vec!["pct"]);
}

#[tokio::test]
async fn test_job_title_filter_is_exact() {
    let db = common::TestDb::new().await;

    Seed::new("exact", "indeed", "Python Developer", "Acme").insert(&db.pool).await;
    Seed::new("longer", "indeed", "Senior Python Developer", "Acme").insert(&db.pool).await;

    let criteria = FilterCriteria::default().with_job_title("Python Developer");
    let page = fetch_jobs(&db.pool, &criteria, 1, 10).await.unwrap();

    let ids: Vec<&str> = page.jobs.iter().map(|j| j.id.as_str()).collect();
    assert_eq!(ids, vec!["exact"]);
}

#[tokio::test]
async fn test_loose_columns_are_decoded() {
    let db = common::TestDb::new().await;

    Seed::new("n", "indeed", "Engineer", "Acme")
        .min_amount(serde_json::json!(85000))
        .insert(&db.pool)
        .await;
    Seed::new("t", "indeed", "Engineer", "Acme")
        .min_amount(serde_json::json!("competitive"))
        .insert(&db.pool)
        .await;

    let page = fetch_jobs(&db.pool, &FilterCriteria::default(), 1, 10)
        .await
        .unwrap();

    let by_id = |id: &str| {
        page.jobs
            .iter()
            .find(|j| j.id == id)
            .map(|j| j.salary.min_amount.clone())
    };
    assert_eq!(by_id("n"), Some(Loose::Number(85000.0)));
    assert_eq!(by_id("t"), Some(Loose::Text("competitive".into())));
}

#[tokio::test]
async fn test_store_overview() {
    let db = common::TestDb::new().await;

    let empty = repository::store_overview(&db.pool).await.unwrap();
    assert!(empty.connected);
    assert_eq!(empty.database, "postgres");
    assert_eq!(empty.total_rows, 0);
    assert!(empty.latest.is_none());

    let base = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
    Seed::new("old", "indeed", "Engineer", "Acme").added(base).insert(&db.pool).await;
    Seed::new("new", "indeed", "Engineer", "Acme")
        .added(base + Duration::days(1))
        .insert(&db.pool)
        .await;

    let overview = repository::store_overview(&db.pool).await.unwrap();
    assert_eq!(overview.total_rows, 2);
    assert_eq!(overview.latest.map(|j| j.id), Some("new".to_string()));
}
