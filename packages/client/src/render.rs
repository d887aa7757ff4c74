//! Terminal rendering of listing views and stats.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use console::style;
use jobdash_listings::{DashboardStats, JobPosting, Loose, Pagination, Salary, Site};
use strum::IntoEnumIterator;

use crate::view::ListingView;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Human-friendly distance between `date` and `now`, counted in started days.
pub fn format_relative_date(date: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed_ms = (now - date).num_milliseconds().abs();
    let days = (elapsed_ms + DAY_MS - 1) / DAY_MS;

    match days {
        0..=1 => "Today".to_string(),
        2 => "Yesterday".to_string(),
        3..=5 => format!("{days} days ago"),
        _ => date.format("%b %-d, %Y").to_string(),
    }
}

/// Whether the posting was ingested within the last day.
pub fn is_new(posting: &JobPosting, now: DateTime<Utc>) -> bool {
    posting
        .added_on
        .is_some_and(|added| format_relative_date(added, now) == "Today")
}

fn render_row(out: &mut String, posting: &JobPosting, now: DateTime<Utc>) {
    let new = is_new(posting, now);

    let title = if new {
        style(&posting.title).blue().bold()
    } else {
        style(&posting.title).bold()
    };
    let _ = write!(out, "{title}");
    if new {
        let _ = write!(out, " {}", style("New").black().on_blue());
    }
    if posting.is_remote {
        let _ = write!(out, " {}", style("Remote").green());
    }
    if let Some(level) = &posting.job_level {
        let _ = write!(out, " {}", style(level).cyan());
    }
    out.push('\n');

    let _ = write!(out, "  {}", posting.company);
    if let Some(location) = &posting.location {
        let _ = write!(out, " · {location}");
    }
    let site = posting
        .known_site()
        .map(|s| s.label().to_string())
        .unwrap_or_else(|| posting.site.clone());
    let _ = write!(out, " · {}", style(site).dim());
    out.push('\n');

    let mut dates = Vec::new();
    if let Some(added) = posting.added_on {
        dates.push(format!("Added {}", format_relative_date(added, now)));
    }
    if let Some(posted) = posting.date_posted {
        dates.push(format!("Posted {}", format_relative_date(posted, now)));
    }
    if !dates.is_empty() {
        let _ = writeln!(out, "  {}", style(dates.join(" | ")).dim());
    }
    let _ = writeln!(out, "  {}", style(&posting.job_url).underlined());
}

pub fn render_table(rows: &[JobPosting], now: DateTime<Utc>) -> String {
    if rows.is_empty() {
        return format!(
            "{}\nTry adjusting your search or filter criteria.\n",
            style("No job listings found").bold()
        );
    }

    let mut out = String::new();
    for (i, posting) in rows.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        render_row(&mut out, posting, now);
    }
    out
}

fn salary_range(salary: &Salary) -> Option<String> {
    let range = match (salary.min_amount.is_absent(), salary.max_amount.is_absent()) {
        (false, false) => format!("{} – {}", salary.min_amount, salary.max_amount),
        (false, true) => format!("from {}", salary.min_amount),
        (true, false) => format!("up to {}", salary.max_amount),
        (true, true) => return None,
    };

    let mut line = range;
    if !salary.currency.is_absent() {
        let _ = write!(line, " {}", salary.currency);
    }
    if !salary.interval.is_absent() {
        let _ = write!(line, " / {}", salary.interval);
    }
    Some(line)
}

fn field(out: &mut String, label: &str, value: Option<&str>) {
    if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
        let _ = writeln!(out, "  {:<10} {value}", style(label).dim());
    }
}

fn loose_field(out: &mut String, label: &str, value: &Loose) {
    if !value.is_absent() {
        field(out, label, Some(&value.to_string()));
    }
}

/// Expanded view of one posting: description paragraphs, salary, role and
/// company details, and the apply links.
pub fn render_details(posting: &JobPosting) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", style(&posting.title).bold());
    let _ = write!(out, "  {}", posting.company);
    if let Some(location) = &posting.location {
        let _ = write!(out, " · {location}");
    }
    if posting.is_remote {
        let _ = write!(out, " {}", style("Remote").green());
    }
    out.push_str("\n\n");

    let paragraphs: Vec<&str> = posting
        .description
        .as_deref()
        .unwrap_or_default()
        .split('\n')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    if paragraphs.is_empty() {
        let _ = writeln!(out, "{}", style("No job description available").dim());
    } else {
        let _ = writeln!(out, "{}", paragraphs.join("\n\n"));
    }
    out.push('\n');

    field(&mut out, "Salary", salary_range(&posting.salary).as_deref());
    field(&mut out, "Level", posting.job_level.as_deref());
    field(&mut out, "Function", posting.job_function.as_deref());
    loose_field(&mut out, "Type", &posting.job_type);
    loose_field(&mut out, "Emails", &posting.emails);

    let company = &posting.company_profile;
    field(&mut out, "Industry", company.industry.as_deref());
    field(&mut out, "Website", company.url.as_deref());
    loose_field(&mut out, "Employees", &company.num_employees);
    loose_field(&mut out, "Revenue", &company.revenue);
    loose_field(&mut out, "Addresses", &company.addresses);
    if let Some(about) = company.description.as_deref().filter(|d| !d.trim().is_empty()) {
        let _ = writeln!(out, "\n{}\n{}", style(format!("About {}", posting.company)).bold(), about.trim());
    }

    out.push('\n');
    let _ = writeln!(out, "  {:<10} {}", style("Apply").dim(), style(&posting.job_url).underlined());
    if let Some(direct) = &posting.job_url_direct {
        let _ = writeln!(out, "  {:<10} {}", style("Direct").dim(), style(direct).underlined());
    }
    out
}

/// "Showing X to Y of Z results" plus the page-number control. Empty when
/// there are no pages.
pub fn render_pagination(pagination: &Pagination) -> String {
    let window = pagination.window();
    if !window.is_visible() {
        return String::new();
    }

    let (from, to) = pagination.range();
    let mut out = format!(
        "Showing {} to {} of {} results\n",
        style(from).bold(),
        style(to).bold(),
        style(pagination.total).bold()
    );

    let mut buttons: Vec<String> = Vec::new();
    buttons.push(if pagination.has_previous() { "‹".into() } else { style("‹").dim().to_string() });
    if window.show_first {
        buttons.push("1".into());
    }
    if window.show_left_ellipsis {
        buttons.push("…".into());
    }
    for n in &window.numbers {
        if *n == pagination.page {
            buttons.push(style(format!("[{n}]")).reverse().to_string());
        } else {
            buttons.push(n.to_string());
        }
    }
    if window.show_right_ellipsis {
        buttons.push("…".into());
    }
    if window.show_last {
        buttons.push(pagination.pages.to_string());
    }
    buttons.push(if pagination.has_next() { "›".into() } else { style("›").dim().to_string() });

    out.push_str(&buttons.join(" "));
    out.push('\n');
    out
}

pub fn render_stats(stats: &DashboardStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<14} {}", "Total Jobs", style(stats.total_jobs).bold());
    let _ = writeln!(out, "{:<14} {}", "Today's Jobs", style(stats.today_jobs).bold());
    for site in Site::iter() {
        let _ = writeln!(out, "{:<14} {}", site.label(), stats.site(site));
    }
    out
}

pub fn render_view(view: &ListingView, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", style(view.section().title()).bold().underlined());

    let mut filters = Vec::new();
    if !view.search_term().is_empty() {
        filters.push(format!("search: {}", view.search_term()));
    }
    if !view.job_title().is_empty() {
        filters.push(format!("title: {}", view.job_title()));
    }
    if view.remote_only() {
        filters.push("remote only".to_string());
    }
    if view.section().site_filter().is_empty() && !view.site().is_empty() {
        filters.push(format!("site: {}", view.site()));
    }
    if !filters.is_empty() {
        let _ = writeln!(out, "{}", style(filters.join(", ")).dim());
    }

    if let Some(error) = view.error() {
        let _ = writeln!(out, "{}", style(error).red().bold());
    }
    if view.is_loading() && view.rows().is_empty() {
        let _ = writeln!(out, "Loading...");
        return out;
    }

    out.push('\n');
    out.push_str(&render_table(view.rows(), now));
    let pagination = render_pagination(view.pagination());
    if !pagination.is_empty() {
        out.push('\n');
        out.push_str(&pagination);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 12, 0, 0).unwrap()
    }

    fn plain(s: &str) -> String {
        console::strip_ansi_codes(s).into_owned()
    }

    fn posting(added: Option<DateTime<Utc>>, remote: bool) -> JobPosting {
        JobPosting {
            row_id: 1,
            id: "li-1".into(),
            site: "linkedin".into(),
            job_url: "https://example.com/li-1".into(),
            job_url_direct: None,
            title: "Rust Engineer".into(),
            company: "Acme".into(),
            location: Some("Berlin".into()),
            date_posted: Some(now() - Duration::days(3)),
            added_on: added,
            is_remote: remote,
            job_level: None,
            job_function: None,
            listing_type: None,
            description: None,
            search_term: None,
            job_type: Default::default(),
            emails: Default::default(),
            salary: Default::default(),
            company_profile: Default::default(),
        }
    }

    #[test]
    fn test_relative_date_buckets() {
        let now = now();
        assert_eq!(format_relative_date(now, now), "Today");
        assert_eq!(format_relative_date(now - Duration::hours(23), now), "Today");
        assert_eq!(format_relative_date(now - Duration::hours(24), now), "Today");
        assert_eq!(format_relative_date(now - Duration::hours(25), now), "Yesterday");
        assert_eq!(format_relative_date(now - Duration::hours(60), now), "3 days ago");
        assert_eq!(format_relative_date(now - Duration::days(5), now), "5 days ago");
        assert_eq!(
            format_relative_date(now - Duration::days(9), now),
            "Mar 5, 2025"
        );
    }

    #[test]
    fn test_relative_date_ignores_direction() {
        let now = now();
        assert_eq!(format_relative_date(now + Duration::hours(30), now), "Yesterday");
    }

    #[test]
    fn test_new_badge_and_remote_marker() {
        let fresh = posting(Some(now() - Duration::hours(2)), true);
        let old = posting(Some(now() - Duration::days(4)), false);
        assert!(is_new(&fresh, now()));
        assert!(!is_new(&old, now()));
        assert!(!is_new(&posting(None, false), now()));

        let out = plain(&render_table(&[fresh], now()));
        assert!(out.starts_with("Rust Engineer New Remote\n"));
        assert!(out.contains("Acme · Berlin · LinkedIn"));
        assert!(out.contains("Added Today | Posted 3 days ago"));

        let out = plain(&render_table(&[old], now()));
        assert!(out.starts_with("Rust Engineer\n"));
    }

    #[test]
    fn test_empty_table_message() {
        assert!(plain(&render_table(&[], now())).starts_with("No job listings found"));
    }

    #[test]
    fn test_pagination_control() {
        let out = plain(&render_pagination(&Pagination::new(200, 7, 10)));
        assert_eq!(
            out,
            "Showing 61 to 70 of 200 results\n‹ 1 … 5 6 [7] 8 9 … 20 ›\n"
        );

        let out = plain(&render_pagination(&Pagination::new(25, 3, 10)));
        assert_eq!(out, "Showing 21 to 25 of 25 results\n‹ 1 2 [3] ›\n");

        assert_eq!(render_pagination(&Pagination::new(0, 1, 10)), "");
    }

    #[test]
    fn test_details_show_description_and_salary() {
        let mut job = posting(None, true);
        job.description = Some("Build the ingest pipeline.\n\n  Own the query layer.  \n".into());
        job.job_level = Some("Senior".into());
        job.job_url_direct = Some("https://acme.example/careers/1".into());
        job.salary = Salary {
            interval: Loose::Text("yearly".into()),
            min_amount: Loose::Number(90000.0),
            max_amount: Loose::Number(120000.0),
            currency: Loose::Text("EUR".into()),
            ..Default::default()
        };
        job.company_profile.industry = Some("Software".into());
        job.company_profile.num_employees = Loose::Text("51-200".into());

        let out = plain(&render_details(&job));
        assert!(out.starts_with("Rust Engineer\n  Acme · Berlin Remote\n\n"));
        assert!(out.contains("Build the ingest pipeline.\n\nOwn the query layer.\n"));
        assert!(out.contains("Salary     90000 – 120000 EUR / yearly"));
        assert!(out.contains("Level      Senior"));
        assert!(out.contains("Industry   Software"));
        assert!(out.contains("Employees  51-200"));
        assert!(out.contains("Apply      https://example.com/li-1"));
        assert!(out.contains("Direct     https://acme.example/careers/1"));
        assert!(!out.contains("Revenue"));
    }

    #[test]
    fn test_details_without_description() {
        let mut job = posting(None, false);
        job.description = Some("  \n ".into());
        job.salary.min_amount = Loose::Number(40.5);
        job.salary.interval = Loose::Text("hourly".into());

        let out = plain(&render_details(&job));
        assert!(out.contains("No job description available"));
        assert!(out.contains("Salary     from 40.5 / hourly"));
        assert!(!out.contains("Direct"));

        job.description = None;
        job.salary = Salary {
            max_amount: Loose::Number(70000.0),
            ..Default::default()
        };
        let out = plain(&render_details(&job));
        assert!(out.contains("No job description available"));
        assert!(out.contains("Salary     up to 70000\n"));
    }

    #[test]
    fn test_stats_overview() {
        let mut stats = DashboardStats {
            total_jobs: 12,
            today_jobs: 2,
            ..Default::default()
        };
        stats.per_site.insert(Site::Google, 5);
        let out = plain(&render_stats(&stats));
        assert!(out.contains("Total Jobs     12"));
        assert!(out.contains("Today's Jobs   2"));
        assert!(out.contains("Google         5"));
        assert!(out.contains("Indeed         0"));
    }
}
