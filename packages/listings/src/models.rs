use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use sqlx::types::Json;
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Job boards the dashboard knows about.
///
/// The store keeps `site` as free text, so postings may carry values outside
/// this list; those are still listed and filterable but never counted in the
/// per-site statistics.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Site {
    Linkedin,
    Indeed,
    Glassdoor,
    Google,
    ZipRecruiter,
}

impl Site {
    /// Store value, e.g. `zip_recruiter`.
    pub fn as_str(&self) -> &str {
        self.as_ref()
    }

    pub fn label(&self) -> &'static str {
        match self {
            Site::Linkedin => "LinkedIn",
            Site::Indeed => "Indeed",
            Site::Glassdoor => "Glassdoor",
            Site::Google => "Google",
            Site::ZipRecruiter => "ZipRecruiter",
        }
    }
}

/// A loosely typed store value.
///
/// Salary and company metadata arrive from the scrapers as numbers, strings
/// or nothing at all. Anything else (arrays, objects, booleans) is kept as its
/// compact JSON text so that decoding never fails.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Loose {
    #[default]
    Absent,
    Number(f64),
    Text(String),
}

impl Loose {
    pub fn is_absent(&self) -> bool {
        matches!(self, Loose::Absent)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Loose::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Loose::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<Value> for Loose {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Loose::Absent,
            Value::Number(n) => n.as_f64().map(Loose::Number).unwrap_or(Loose::Absent),
            Value::String(s) => Loose::Text(s),
            other => Loose::Text(other.to_string()),
        }
    }
}

impl From<Option<Json<Value>>> for Loose {
    fn from(value: Option<Json<Value>>) -> Self {
        value.map(|Json(v)| Loose::from(v)).unwrap_or_default()
    }
}

impl std::fmt::Display for Loose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Loose::Absent => Ok(()),
            Loose::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Loose::Number(n) => write!(f, "{n}"),
            Loose::Text(s) => f.write_str(s),
        }
    }
}

impl Serialize for Loose {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Loose::Absent => serializer.serialize_none(),
            Loose::Number(n) => serializer.serialize_f64(*n),
            Loose::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl<'de> Deserialize<'de> for Loose {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Loose::from)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Salary {
    #[serde(default, skip_serializing_if = "Loose::is_absent")]
    pub source: Loose,
    #[serde(default, skip_serializing_if = "Loose::is_absent")]
    pub interval: Loose,
    #[serde(default, skip_serializing_if = "Loose::is_absent")]
    pub min_amount: Loose,
    #[serde(default, skip_serializing_if = "Loose::is_absent")]
    pub max_amount: Loose,
    #[serde(default, skip_serializing_if = "Loose::is_absent")]
    pub currency: Loose,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub url_direct: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Loose::is_absent")]
    pub addresses: Loose,
    #[serde(default, skip_serializing_if = "Loose::is_absent")]
    pub num_employees: Loose,
    #[serde(default, skip_serializing_if = "Loose::is_absent")]
    pub revenue: Loose,
}

/// One scraped job listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub row_id: i64,
    pub id: String,
    pub site: String,
    pub job_url: String,
    #[serde(default)]
    pub job_url_direct: Option<String>,
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub date_posted: Option<DateTime<Utc>>,
    #[serde(default)]
    pub added_on: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_remote: bool,
    #[serde(default)]
    pub job_level: Option<String>,
    #[serde(default)]
    pub job_function: Option<String>,
    #[serde(default)]
    pub listing_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub search_term: Option<String>,
    #[serde(default, skip_serializing_if = "Loose::is_absent")]
    pub job_type: Loose,
    #[serde(default, skip_serializing_if = "Loose::is_absent")]
    pub emails: Loose,
    #[serde(default)]
    pub salary: Salary,
    #[serde(default)]
    pub company_profile: CompanyProfile,
}

impl JobPosting {
    /// The known board this posting came from, if any.
    pub fn known_site(&self) -> Option<Site> {
        self.site.parse().ok()
    }
}

/// Flat row as stored in `job_postings`.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct JobPostingRow {
    pub row_id: i64,
    pub id: String,
    pub site: String,
    pub job_url: String,
    pub job_url_direct: Option<String>,
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub date_posted: Option<DateTime<Utc>>,
    pub added_on: Option<DateTime<Utc>>,
    pub is_remote: bool,
    pub job_level: Option<String>,
    pub job_function: Option<String>,
    pub listing_type: Option<String>,
    pub description: Option<String>,
    pub search_term: Option<String>,
    pub job_type: Option<Json<Value>>,
    pub emails: Option<Json<Value>>,
    pub salary_source: Option<Json<Value>>,
    pub salary_interval: Option<Json<Value>>,
    pub min_amount: Option<Json<Value>>,
    pub max_amount: Option<Json<Value>>,
    pub currency: Option<Json<Value>>,
    pub company_industry: Option<String>,
    pub company_url: Option<String>,
    pub company_logo: Option<String>,
    pub company_url_direct: Option<String>,
    pub company_description: Option<String>,
    pub company_addresses: Option<Json<Value>>,
    pub company_num_employees: Option<Json<Value>>,
    pub company_revenue: Option<Json<Value>>,
}

impl From<JobPostingRow> for JobPosting {
    fn from(row: JobPostingRow) -> Self {
        Self {
            row_id: row.row_id,
            id: row.id,
            site: row.site,
            job_url: row.job_url,
            job_url_direct: row.job_url_direct,
            title: row.title,
            company: row.company,
            location: row.location,
            date_posted: row.date_posted,
            added_on: row.added_on,
            is_remote: row.is_remote,
            job_level: row.job_level,
            job_function: row.job_function,
            listing_type: row.listing_type,
            description: row.description,
            search_term: row.search_term,
            job_type: row.job_type.into(),
            emails: row.emails.into(),
            salary: Salary {
                source: row.salary_source.into(),
                interval: row.salary_interval.into(),
                min_amount: row.min_amount.into(),
                max_amount: row.max_amount.into(),
                currency: row.currency.into(),
            },
            company_profile: CompanyProfile {
                industry: row.company_industry,
                url: row.company_url,
                logo: row.company_logo,
                url_direct: row.company_url_direct,
                description: row.company_description,
                addresses: row.company_addresses.into(),
                num_employees: row.company_num_employees.into(),
                revenue: row.company_revenue.into(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use strum::IntoEnumIterator;

    #[test]
    fn test_site_wire_names() {
        let names: Vec<String> = Site::iter().map(|s| s.to_string()).collect();
        assert_eq!(
            names,
            vec!["linkedin", "indeed", "glassdoor", "google", "zip_recruiter"]
        );
        assert_eq!("zip_recruiter".parse::<Site>().ok(), Some(Site::ZipRecruiter));
        assert!("LinkedIn".parse::<Site>().is_err());
    }

    #[test]
    fn test_site_serde_matches_store_value() {
        assert_eq!(
            serde_json::to_value(Site::ZipRecruiter).unwrap(),
            json!("zip_recruiter")
        );
        assert_eq!(Site::ZipRecruiter.label(), "ZipRecruiter");
    }

    #[test]
    fn test_loose_from_json_shapes() {
        assert_eq!(Loose::from(json!(null)), Loose::Absent);
        assert_eq!(Loose::from(json!(85000)), Loose::Number(85000.0));
        assert_eq!(Loose::from(json!("yearly")), Loose::Text("yearly".into()));
        assert_eq!(
            Loose::from(json!(["a@b.nl", "c@d.nl"])),
            Loose::Text(r#"["a@b.nl","c@d.nl"]"#.into())
        );
        assert_eq!(Loose::from(None::<Json<Value>>), Loose::Absent);
    }

    #[test]
    fn test_loose_display() {
        assert_eq!(Loose::Number(120000.0).to_string(), "120000");
        assert_eq!(Loose::Number(42.5).to_string(), "42.5");
        assert_eq!(Loose::Text("USD".into()).to_string(), "USD");
        assert_eq!(Loose::Absent.to_string(), "");
    }

    #[test]
    fn test_posting_with_sparse_fields_deserializes() {
        let posting: JobPosting = serde_json::from_value(json!({
            "row_id": 7,
            "id": "li-123",
            "site": "linkedin",
            "job_url": "https://www.linkedin.com/jobs/view/123",
            "title": "Backend Engineer",
            "company": "Acme",
            "salary": { "min_amount": 90000, "currency": "EUR" }
        }))
        .unwrap();

        assert_eq!(posting.known_site(), Some(Site::Linkedin));
        assert!(!posting.is_remote);
        assert_eq!(posting.salary.min_amount.as_number(), Some(90000.0));
        assert_eq!(posting.salary.currency.as_text(), Some("EUR"));
        assert!(posting.salary.max_amount.is_absent());
        assert!(posting.company_profile.revenue.is_absent());

        let back = serde_json::to_value(&posting).unwrap();
        assert!(back["salary"].get("max_amount").is_none());
        let again: JobPosting = serde_json::from_value(back).unwrap();
        assert_eq!(again, posting);
    }
}
