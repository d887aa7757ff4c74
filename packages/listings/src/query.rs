//! Filter construction for job listing queries.
//!
//! [`build_query`] is a pure translation from user-facing criteria to a
//! [`JobFilter`]. The filter is a plain value: it can be compared, evaluated
//! against a posting in memory, or rendered to a parameterized SQL `WHERE`
//! clause for the store.

use serde::{Deserialize, Serialize};

use crate::models::JobPosting;

/// Newest first. `added_on` is the ingestion time; postings without it fall
/// back to their posting date.
pub const ORDER_BY: &str = "added_on DESC NULLS LAST, date_posted DESC NULLS LAST, row_id DESC";

/// User-controlled filters. Empty strings and `false` impose no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub remote_only: bool,
    #[serde(default)]
    pub site: String,
    #[serde(default)]
    pub job_title: String,
}

impl FilterCriteria {
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_remote_only(mut self, remote_only: bool) -> Self {
        self.remote_only = remote_only;
        self
    }

    pub fn with_site(mut self, site: impl Into<String>) -> Self {
        self.site = site.into();
        self
    }

    pub fn with_job_title(mut self, job_title: impl Into<String>) -> Self {
        self.job_title = job_title.into();
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Company,
    Description,
    Location,
    Site,
    IsRemote,
}

impl Field {
    pub fn column(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Company => "company",
            Field::Description => "description",
            Field::Location => "location",
            Field::Site => "site",
            Field::IsRemote => "is_remote",
        }
    }
}

/// Fields the free-text search looks at.
pub const SEARCH_FIELDS: [Field; 4] = [
    Field::Title,
    Field::Company,
    Field::Description,
    Field::Location,
];

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BindValue {
    Text(String),
    Bool(bool),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Condition {
    /// Case-insensitive substring match on at least one of `fields`.
    ContainsAny { fields: Vec<Field>, term: String },
    /// Exact, case-sensitive equality.
    Equals { field: Field, value: BindValue },
}

/// Conjunction of conditions. No conditions matches every posting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct JobFilter {
    conditions: Vec<Condition>,
}

/// A rendered `WHERE` clause together with its bind values, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlFilter {
    pub where_sql: String,
    pub binds: Vec<BindValue>,
}

impl SqlFilter {
    /// Index the next bind placeholder should use, e.g. for LIMIT/OFFSET.
    pub fn next_bind_index(&self) -> usize {
        self.binds.len() + 1
    }
}

impl JobFilter {
    pub fn match_all() -> Self {
        Self::default()
    }

    pub fn is_match_all(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    fn and(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Render as `WHERE ...` with `$1..$n` placeholders, or an empty string
    /// for the match-all filter.
    pub fn to_sql(&self) -> SqlFilter {
        let mut clauses = Vec::with_capacity(self.conditions.len());
        let mut binds = Vec::with_capacity(self.conditions.len());

        for condition in &self.conditions {
            let idx = binds.len() + 1;
            match condition {
                Condition::ContainsAny { fields, term } => {
                    let ors: Vec<String> = fields
                        .iter()
                        .map(|f| format!("{} ILIKE ${idx} ESCAPE '\\'", f.column()))
                        .collect();
                    clauses.push(format!("({})", ors.join(" OR ")));
                    binds.push(BindValue::Text(like_pattern(term)));
                }
                Condition::Equals { field, value } => {
                    clauses.push(format!("{} = ${idx}", field.column()));
                    binds.push(value.clone());
                }
            }
        }

        let where_sql = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };

        SqlFilter { where_sql, binds }
    }

    /// Evaluate the filter against a posting already in memory.
    pub fn matches(&self, posting: &JobPosting) -> bool {
        self.conditions.iter().all(|c| match c {
            Condition::ContainsAny { fields, term } => {
                let needle = term.to_lowercase();
                fields.iter().any(|f| {
                    text_field(posting, *f)
                        .is_some_and(|value| value.to_lowercase().contains(&needle))
                })
            }
            Condition::Equals {
                field: Field::IsRemote,
                value: BindValue::Bool(b),
            } => posting.is_remote == *b,
            Condition::Equals {
                field,
                value: BindValue::Text(expected),
            } => text_field(posting, *field) == Some(expected.as_str()),
            Condition::Equals { .. } => false,
        })
    }
}

fn text_field(posting: &JobPosting, field: Field) -> Option<&str> {
    match field {
        Field::Title => Some(&posting.title),
        Field::Company => Some(&posting.company),
        Field::Description => posting.description.as_deref(),
        Field::Location => posting.location.as_deref(),
        Field::Site => Some(&posting.site),
        Field::IsRemote => None,
    }
}

/// `%term%` with LIKE metacharacters escaped so the term matches literally.
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

/// Translate filter criteria into a store predicate.
///
/// Surrounding whitespace in the search term is ignored; site and job title
/// are compared exactly as given.
pub fn build_query(criteria: &FilterCriteria) -> JobFilter {
    let mut filter = JobFilter::match_all();

    let search = criteria.search.trim();
    if !search.is_empty() {
        filter = filter.and(Condition::ContainsAny {
            fields: SEARCH_FIELDS.to_vec(),
            term: search.to_string(),
        });
    }

    if !criteria.site.is_empty() {
        filter = filter.and(Condition::Equals {
            field: Field::Site,
            value: BindValue::Text(criteria.site.clone()),
        });
    }

    if !criteria.job_title.is_empty() {
        filter = filter.and(Condition::Equals {
            field: Field::Title,
            value: BindValue::Text(criteria.job_title.clone()),
        });
    }

    if criteria.remote_only {
        filter = filter.and(Condition::Equals {
            field: Field::IsRemote,
            value: BindValue::Bool(true),
        });
    }

    filter
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CompanyProfile, Loose, Salary};
    use pretty_assertions::assert_eq;

    fn posting(title: &str, company: &str, site: &str, remote: bool) -> JobPosting {
        JobPosting {
            row_id: 1,
            id: "x".into(),
            site: site.into(),
            job_url: String::new(),
            job_url_direct: None,
            title: title.into(),
            company: company.into(),
            location: Some("Amsterdam".into()),
            date_posted: None,
            added_on: None,
            is_remote: remote,
            job_level: None,
            job_function: None,
            listing_type: None,
            description: Some("Work on payment systems".into()),
            search_term: None,
            job_type: Loose::Absent,
            emails: Loose::Absent,
            salary: Salary::default(),
            company_profile: CompanyProfile::default(),
        }
    }

    #[test]
    fn test_empty_criteria_match_everything() {
        let filter = build_query(&FilterCriteria::default());
        assert!(filter.is_match_all());
        assert_eq!(filter.to_sql().where_sql, "");
        assert!(filter.matches(&posting("Any", "Co", "indeed", false)));
    }

    #[test]
    fn test_build_query_is_idempotent() {
        let criteria = FilterCriteria::default()
            .with_search("rust")
            .with_site("linkedin")
            .with_remote_only(true);
        assert_eq!(build_query(&criteria), build_query(&criteria));
        assert_eq!(build_query(&criteria).to_sql(), build_query(&criteria).to_sql());
    }

    #[test]
    fn test_all_filters_render_in_order() {
        let criteria = FilterCriteria::default()
            .with_search("rust")
            .with_site("linkedin")
            .with_job_title("Backend Engineer")
            .with_remote_only(true);
        let sql = build_query(&criteria).to_sql();

        assert_eq!(
            sql.where_sql,
            "WHERE (title ILIKE $1 ESCAPE '\\' OR company ILIKE $1 ESCAPE '\\' \
             OR description ILIKE $1 ESCAPE '\\' OR location ILIKE $1 ESCAPE '\\') \
             AND site = $2 AND title = $3 AND is_remote = $4"
        );
        assert_eq!(
            sql.binds,
            vec![
                BindValue::Text("%rust%".into()),
                BindValue::Text("linkedin".into()),
                BindValue::Text("Backend Engineer".into()),
                BindValue::Bool(true),
            ]
        );
        assert_eq!(sql.next_bind_index(), 5);
    }

    #[test]
    fn test_site_only_filter() {
        let sql = build_query(&FilterCriteria::default().with_site("indeed")).to_sql();
        assert_eq!(sql.where_sql, "WHERE site = $1");
        assert_eq!(sql.binds, vec![BindValue::Text("indeed".into())]);
    }

    #[test]
    fn test_like_metacharacters_are_escaped() {
        assert_eq!(like_pattern("100%_c\\d"), "%100\\%\\_c\\\\d%");
    }

    #[test]
    fn test_blank_search_is_ignored() {
        assert!(build_query(&FilterCriteria::default().with_search("   ")).is_match_all());
    }

    #[test]
    fn test_search_matches_company_only() {
        let filter = build_query(&FilterCriteria::default().with_search("acme"));
        assert!(filter.matches(&posting("Engineer", "ACME Corp", "google", false)));
        assert!(!filter.matches(&posting("Engineer", "Globex", "google", false)));
    }

    #[test]
    fn test_site_is_case_sensitive() {
        let filter = build_query(&FilterCriteria::default().with_site("linkedin"));
        assert!(filter.matches(&posting("a", "b", "linkedin", false)));
        assert!(!filter.matches(&posting("a", "b", "LinkedIn", false)));
    }

    #[test]
    fn test_remote_and_title_combine_with_and() {
        let filter = build_query(
            &FilterCriteria::default()
                .with_job_title("Python Developer")
                .with_remote_only(true),
        );
        assert!(filter.matches(&posting("Python Developer", "b", "indeed", true)));
        assert!(!filter.matches(&posting("Python Developer", "b", "indeed", false)));
        assert!(!filter.matches(&posting("Senior Python Developer", "b", "indeed", true)));
    }
}
