use std::cmp::Ordering;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use regex::Regex;
use tracing::warn;

use crate::models::{FeedData, FeedStats, Opportunity, Provenance};
use crate::view::Memo;

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: [&str; 7] = [
    "%Y-%m-%d",
    "%B %d, %Y",
    "%d %B %Y",
    "%d %B, %Y",
    "%B %d %Y",
    "%m/%d/%Y",
    "%Y/%m/%d",
];

// chrono lets a space in the format match nothing, so "March 2026" can
// read as day 20 of year 26.
const MIN_YEAR: i32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Deadline {
    On(NaiveDateTime),
    Unknown,
}

fn sept_abbrev() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bsept\b\.?").expect("static regex"))
}

fn plausible(dt: NaiveDateTime) -> Option<NaiveDateTime> {
    (dt.year() >= MIN_YEAR).then_some(dt)
}

fn parse_date(text: &str, fmt: &str) -> Option<NaiveDateTime> {
    NaiveDate::parse_from_str(text, fmt)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .and_then(plausible)
}

pub fn parse_deadline(text: &str) -> Deadline {
    let normalized = sept_abbrev().replace_all(text.trim(), "Sep");
    let text: &str = &normalized;

    if let Some(dt) = DateTime::parse_from_rfc3339(text)
        .ok()
        .and_then(|dt| plausible(dt.naive_utc()))
    {
        return Deadline::On(dt);
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| {
            NaiveDateTime::parse_from_str(text, fmt)
                .ok()
                .and_then(plausible)
        })
        .or_else(|| DATE_FORMATS.iter().find_map(|fmt| parse_date(text, fmt)))
        // Month and year only, read as the first of that month.
        .or_else(|| parse_date(&format!("1 {text}"), "%d %B %Y"))
        .map_or(Deadline::Unknown, Deadline::On)
}

pub fn normalize(data: Option<&FeedData>) -> Vec<Opportunity> {
    let Some(data) = data else {
        return Vec::new();
    };
    let domestic = data
        .indian_opportunities
        .iter()
        .cloned()
        .map(|o| Opportunity::tagged(o, Provenance::Domestic));
    let international = data
        .international_opportunities
        .iter()
        .cloned()
        .map(|o| Opportunity::tagged(o, Provenance::International));
    domestic.chain(international).collect()
}

pub fn stats(data: Option<&FeedData>) -> FeedStats {
    let Some(data) = data else {
        return FeedStats::default();
    };
    let domestic_count = data.indian_opportunities.len();
    let international_count = data.international_opportunities.len();
    if let Some(meta) = &data.metadata {
        let checks = [
            ("total_opportunities", meta.total_opportunities, domestic_count + international_count),
            ("indian_opportunities", meta.indian_opportunities, domestic_count),
            ("international_opportunities", meta.international_opportunities, international_count),
        ];
        for (key, declared, counted) in checks {
            if let Some(declared) = declared.filter(|d| *d != counted as u64) {
                warn!(key, declared, counted, "feed metadata count disagrees with records");
            }
        }
    }
    FeedStats {
        last_updated: data
            .metadata
            .as_ref()
            .and_then(|m| m.last_updated.clone())
            .unwrap_or_default(),
        source: data.metadata.as_ref().and_then(|m| m.source.clone()),
        total: domestic_count + international_count,
        domestic_count,
        international_count,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedSortKey {
    #[default]
    Deadline,
    Title,
}

impl FromStr for FeedSortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "deadline" => Ok(FeedSortKey::Deadline),
            "title" => Ok(FeedSortKey::Title),
            other => Err(format!("unknown sort key: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeedQuery {
    pub category: Option<String>,
    pub provenance: Option<Provenance>,
    pub remote_only: bool,
    pub text: String,
    pub sort: FeedSortKey,
}

/// Maps the `All` sentinel used by the pickers to `None`.
pub fn facet(value: &str) -> Option<&str> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("all") {
        None
    } else {
        Some(value)
    }
}

pub fn filter(rows: Vec<Opportunity>, query: &FeedQuery) -> Vec<Opportunity> {
    let searching = !query.text.trim().is_empty();
    let needle = query.text.to_lowercase();
    rows.into_iter()
        .filter(|o| match &query.category {
            Some(category) => o.category.to_lowercase() == category.to_lowercase(),
            None => true,
        })
        .filter(|o| query.provenance.map_or(true, |p| o.provenance == p))
        .filter(|o| !query.remote_only || o.location.to_lowercase().contains("remote"))
        .filter(|o| {
            !searching
                || o.title.to_lowercase().contains(&needle)
                || o.description.to_lowercase().contains(&needle)
                || o.location.to_lowercase().contains(&needle)
        })
        .collect()
}

fn compare_titles(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Stable sort: soonest deadline first, or title A-Z.
pub fn sort(mut rows: Vec<Opportunity>, key: FeedSortKey) -> Vec<Opportunity> {
    match key {
        FeedSortKey::Deadline => rows.sort_by_cached_key(|o| parse_deadline(&o.deadline)),
        FeedSortKey::Title => rows.sort_by(|a, b| compare_titles(&a.title, &b.title)),
    }
    rows
}

pub fn build_view(rows: &[Opportunity], query: &FeedQuery) -> Vec<Opportunity> {
    sort(filter(rows.to_vec(), query), query.sort)
}

pub struct FeedBoard {
    opportunities: Vec<Opportunity>,
    stats: FeedStats,
    view: Memo<FeedQuery, Vec<Opportunity>>,
}

impl FeedBoard {
    pub fn new(data: Option<&FeedData>) -> Self {
        Self {
            opportunities: normalize(data),
            stats: stats(data),
            view: Memo::new(),
        }
    }

    #[cfg(test)]
    pub fn opportunities(&self) -> &[Opportunity] {
        &self.opportunities
    }

    pub fn stats(&self) -> &FeedStats {
        &self.stats
    }

    pub fn view(&mut self, query: &FeedQuery) -> &[Opportunity] {
        let rows = &self.opportunities;
        self.view.get_or_compute(query, |q| build_view(rows, q))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FeedMetadata, RawOpportunity};

    fn raw(title: &str, category: &str, location: &str, deadline: &str) -> RawOpportunity {
        RawOpportunity {
            title: title.to_string(),
            link: format!("https://jobs.example.com/{}", title.to_lowercase()),
            description: format!("{title} role"),
            deadline: deadline.to_string(),
            location: location.to_string(),
            pay: Some("$1000/month".to_string()),
            category: category.to_string(),
            ..RawOpportunity::default()
        }
    }

    fn sample() -> FeedData {
        FeedData {
            indian_opportunities: vec![
                raw("Backend Intern", "Internship", "Bengaluru", "2025-10-15"),
                raw("Frontend Engineer", "Job", "Remote (India)", "Rolling"),
                raw("ML Intern", "internship", "Pune", "September 1, 2025"),
            ],
            international_opportunities: vec![
                raw("Cloud Engineer", "Job", "Berlin", "2025-09-20"),
                raw("Research Intern", "Internship", "remote", "ASAP"),
            ],
            metadata: Some(FeedMetadata {
                last_updated: Some("2025-08-30".to_string()),
                ..FeedMetadata::default()
            }),
        }
    }

    #[test]
    fn normalize_tags_every_record_with_its_bucket() {
        let rows = normalize(Some(&sample()));
        assert_eq!(rows.len(), 5);
        assert!(rows[..3].iter().all(|o| o.provenance == Provenance::Domestic));
        assert!(rows[3..]
            .iter()
            .all(|o| o.provenance == Provenance::International));
    }

    #[test]
    fn missing_document_normalizes_to_empty() {
        assert!(normalize(None).is_empty());
        assert_eq!(stats(None), FeedStats::default());
    }

    #[test]
    fn stats_count_buckets() {
        let stats = stats(Some(&sample()));
        assert_eq!(stats.total, 5);
        assert_eq!(stats.domestic_count, 3);
        assert_eq!(stats.international_count, 2);
        assert_eq!(stats.last_updated, "2025-08-30");
    }

    #[test]
    fn stats_count_records_not_declared_totals() {
        let mut data = sample();
        data.metadata = Some(FeedMetadata {
            total_opportunities: Some(40),
            indian_opportunities: Some(3),
            ..FeedMetadata::default()
        });
        let stats = stats(Some(&data));
        assert_eq!(stats.total, 5);
        assert_eq!(stats.domestic_count, 3);
    }

    #[test]
    fn parse_deadline_accepts_common_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 9, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap();
        for text in [
            "2025-09-01",
            "September 1, 2025",
            "Sep 1, 2025",
            "Sept 1, 2025",
            "1 September 2025",
            "1 Sep, 2025",
            "09/01/2025",
            "September 2025",
        ] {
            assert_eq!(parse_deadline(text), Deadline::On(expected), "{text}");
        }
        let evening = NaiveDate::from_ymd_opt(2025, 9, 30)
            .and_then(|d| d.and_hms_opt(23, 59, 0))
            .unwrap();
        for text in ["2025-09-30 23:59", "2025-09-30T23:59", "2025-09-30 23:59:00"] {
            assert_eq!(parse_deadline(text), Deadline::On(evening), "{text}");
        }
        assert!(matches!(
            parse_deadline("2025-09-01T10:00:00Z"),
            Deadline::On(_)
        ));
        assert_eq!(parse_deadline("Rolling basis"), Deadline::Unknown);
        assert_eq!(parse_deadline(""), Deadline::Unknown);
    }

    #[test]
    fn month_and_year_reads_as_first_of_month() {
        let march = NaiveDate::from_ymd_opt(2026, 3, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap();
        assert_eq!(parse_deadline("March 2026"), Deadline::On(march));

        let data = FeedData {
            indian_opportunities: vec![
                raw("Later", "Job", "Pune", "March 2026"),
                raw("Sooner", "Job", "Pune", "2025-09-01"),
            ],
            ..FeedData::default()
        };
        let sorted = sort(normalize(Some(&data)), FeedSortKey::Deadline);
        let titles: Vec<&str> = sorted.iter().map(|o| o.title.as_str()).collect();
        assert_eq!(titles, vec!["Sooner", "Later"]);
    }

    #[test]
    fn unparseable_deadlines_sort_last_in_any_input_order() {
        let rows = normalize(Some(&sample()));
        let mut reversed = rows.clone();
        reversed.reverse();
        for input in [rows, reversed] {
            let sorted = sort(input, FeedSortKey::Deadline);
            let keys: Vec<Deadline> = sorted.iter().map(|o| parse_deadline(&o.deadline)).collect();
            let first_unknown = keys
                .iter()
                .position(|k| *k == Deadline::Unknown)
                .unwrap();
            assert_eq!(first_unknown, 3);
            assert!(keys[first_unknown..].iter().all(|k| *k == Deadline::Unknown));
            assert_eq!(sorted[0].title, "ML Intern");
        }
    }

    #[test]
    fn deadline_sort_is_stable_for_unknowns() {
        let sorted = sort(normalize(Some(&sample())), FeedSortKey::Deadline);
        let tail: Vec<&str> = sorted[3..].iter().map(|o| o.title.as_str()).collect();
        assert_eq!(tail, vec!["Frontend Engineer", "Research Intern"]);
    }

    #[test]
    fn title_sort_is_alphabetical_and_idempotent() {
        let once = sort(normalize(Some(&sample())), FeedSortKey::Title);
        let titles: Vec<&str> = once.iter().map(|o| o.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Backend Intern",
                "Cloud Engineer",
                "Frontend Engineer",
                "ML Intern",
                "Research Intern"
            ]
        );
        assert_eq!(sort(once.clone(), FeedSortKey::Title), once);
    }

    #[test]
    fn filters_are_independent_and_optional() {
        let rows = normalize(Some(&sample()));
        assert_eq!(filter(rows.clone(), &FeedQuery::default()).len(), 5);

        let internships = FeedQuery {
            category: Some("Internship".to_string()),
            ..FeedQuery::default()
        };
        assert_eq!(filter(rows.clone(), &internships).len(), 3);

        let intl = FeedQuery {
            provenance: Some(Provenance::International),
            ..FeedQuery::default()
        };
        assert_eq!(filter(rows.clone(), &intl).len(), 2);

        let remote = FeedQuery {
            remote_only: true,
            ..FeedQuery::default()
        };
        let remote_titles: Vec<String> =
            filter(rows.clone(), &remote).into_iter().map(|o| o.title).collect();
        assert_eq!(remote_titles, vec!["Frontend Engineer", "Research Intern"]);

        let text = FeedQuery {
            text: "BERLIN".to_string(),
            ..FeedQuery::default()
        };
        assert_eq!(filter(rows.clone(), &text).len(), 1);

        let padded = FeedQuery {
            text: " berlin ".to_string(),
            ..FeedQuery::default()
        };
        assert!(filter(rows.clone(), &padded).is_empty());

        let blank = FeedQuery {
            text: "   ".to_string(),
            ..FeedQuery::default()
        };
        assert_eq!(filter(rows.clone(), &blank).len(), 5);

        let combined = FeedQuery {
            category: Some("internship".to_string()),
            provenance: Some(Provenance::International),
            remote_only: true,
            text: "research".to_string(),
            sort: FeedSortKey::Title,
        };
        assert_eq!(filter(rows, &combined).len(), 1);
    }

    #[test]
    fn facet_maps_all_to_none() {
        assert_eq!(facet("All"), None);
        assert_eq!(facet(" all "), None);
        assert_eq!(facet(""), None);
        assert_eq!(facet("Job"), Some("Job"));
    }

    #[test]
    fn board_view_is_memoized_and_repeatable() {
        let mut board = FeedBoard::new(Some(&sample()));
        let query = FeedQuery {
            sort: FeedSortKey::Title,
            ..FeedQuery::default()
        };
        let first = board.view(&query).to_vec();
        let second = board.view(&query).to_vec();
        assert_eq!(first, second);
        assert_eq!(board.stats().total, board.opportunities().len());
    }
}
