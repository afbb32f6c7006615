use std::fmt;

use serde::{Deserialize, Deserializer};

#[derive(Debug, Clone, PartialEq)]
pub struct Student {
    pub id: String,
    pub name: String,
    pub roll: String,
    pub institute: String,
    pub location: String,
    pub cgpa: f64,
    pub score: u32,
    pub projects: u32,
    pub streak: u32,
    pub skills: Vec<String>,
    pub avatar_bg: &'static str,
}

impl Student {
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .take(2)
            .collect::<String>()
            .to_uppercase()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedStudent {
    pub rank: usize,
    pub student: Student,
}

#[derive(Debug, Clone)]
pub struct RosterStats {
    pub total: usize,
    pub avg_cgpa: f64,
    pub avg_score: f64,
    pub top_streak: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provenance {
    Domestic,
    International,
}

impl Provenance {
    pub fn label(self) -> &'static str {
        match self {
            Provenance::Domestic => "India",
            Provenance::International => "International",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "india" | "domestic" => Some(Provenance::Domestic),
            "international" => Some(Provenance::International),
            _ => None,
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawOpportunity {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub link: String,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub deadline: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub location: String,
    #[serde(default)]
    pub pay: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub category: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Opportunity {
    pub title: String,
    pub link: String,
    pub logo: Option<String>,
    pub description: String,
    pub deadline: String,
    pub location: String,
    pub pay: Option<String>,
    pub category: String,
    pub provenance: Provenance,
}

impl Opportunity {
    pub fn tagged(raw: RawOpportunity, provenance: Provenance) -> Self {
        Self {
            title: raw.title,
            link: raw.link,
            logo: raw.logo,
            description: raw.description,
            deadline: raw.deadline,
            location: raw.location,
            pay: raw.pay.filter(|p| !p.is_empty()),
            category: raw.category,
            provenance,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FeedMetadata {
    pub last_updated: Option<String>,
    pub total_opportunities: Option<u64>,
    pub indian_opportunities: Option<u64>,
    pub international_opportunities: Option<u64>,
    pub source: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FeedData {
    pub indian_opportunities: Vec<RawOpportunity>,
    pub international_opportunities: Vec<RawOpportunity>,
    #[serde(default)]
    pub metadata: Option<FeedMetadata>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedStats {
    pub last_updated: String,
    pub source: Option<String>,
    pub total: usize,
    pub domestic_count: usize,
    pub international_count: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct SkillLevel {
    pub name: &'static str,
    pub level: u8,
}

#[derive(Debug, Clone, Copy)]
pub struct Activity {
    pub title: &'static str,
    pub desc: &'static str,
    pub date: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct Experience {
    pub title: &'static str,
    pub org: &'static str,
    pub range: &'static str,
    pub desc: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct Certification {
    pub title: &'static str,
    pub org: &'static str,
    pub date: &'static str,
    pub url: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct Course {
    pub provider: &'static str,
    pub title: &'static str,
    pub url: &'static str,
    pub progress: u8,
}

#[derive(Debug, Clone, Copy)]
pub struct Platform {
    pub label: &'static str,
    pub username: &'static str,
    pub url: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileMetrics {
    pub sgpa: f64,
    pub attendance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricValidation {
    pub sgpa_valid: bool,
    pub attendance_valid: bool,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
