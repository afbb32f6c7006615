use std::io::Write;
use std::path::Path;

use anyhow::Context;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use tracing::info;

use crate::models::{Opportunity, RankedStudent};

pub const ROSTER_HEADER: [&str; 9] = [
    "Rank",
    "Name",
    "Roll",
    "Institute",
    "CGPA",
    "Score",
    "Projects",
    "Streak",
    "Skills",
];

pub const FEED_HEADER: [&str; 7] = [
    "Title", "Category", "Source", "Location", "Deadline", "Pay", "Link",
];

/// Wraps a value in double quotes, doubling any quote inside it.
fn quoted(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

pub fn write_roster<W: Write>(out: W, view: &[RankedStudent]) -> anyhow::Result<()> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(out);

    writer.write_record(ROSTER_HEADER)?;
    for row in view {
        let s = &row.student;
        writer.write_record([
            row.rank.to_string(),
            s.name.clone(),
            s.roll.clone(),
            s.institute.clone(),
            s.cgpa.to_string(),
            s.score.to_string(),
            s.projects.to_string(),
            s.streak.to_string(),
            s.skills.join("|"),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

// Description is not exported.
pub fn write_feed<W: Write>(out: W, view: &[Opportunity]) -> anyhow::Result<()> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(out);

    writer.write_record(FEED_HEADER)?;
    for o in view {
        writer.write_record([
            quoted(&o.title),
            o.category.clone(),
            o.provenance.label().to_string(),
            quoted(&o.location),
            quoted(&o.deadline),
            quoted(o.pay.as_deref().unwrap_or("")),
            o.link.clone(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn roster_to_string(view: &[RankedStudent]) -> anyhow::Result<String> {
    let mut buf = Vec::new();
    write_roster(&mut buf, view)?;
    String::from_utf8(buf).context("roster csv is not utf-8")
}

pub fn feed_to_string(view: &[Opportunity]) -> anyhow::Result<String> {
    let mut buf = Vec::new();
    write_feed(&mut buf, view)?;
    String::from_utf8(buf).context("feed csv is not utf-8")
}

pub fn save(path: &Path, contents: &str, rows: usize) -> anyhow::Result<()> {
    std::fs::write(path, contents)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), rows, "csv export written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Provenance, RawOpportunity};
    use crate::roster::{build_view, generate_students, RosterQuery, SkillFacet};

    #[test]
    fn roster_csv_has_header_plus_one_line_per_row() {
        let students = generate_students(40);
        let query = RosterQuery {
            skill: SkillFacet::parse("React"),
            ..RosterQuery::default()
        };
        let view = build_view(&students, &query);
        let csv = roster_to_string(&view).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), view.len() + 1);
        assert_eq!(
            lines[0],
            "Rank,Name,Roll,Institute,CGPA,Score,Projects,Streak,Skills"
        );
        for line in &lines[1..] {
            assert_eq!(line.split(',').count(), 9, "{line}");
        }
    }

    #[test]
    fn roster_row_joins_skills_with_pipe() {
        let view = build_view(&generate_students(1), &RosterQuery::default());
        let csv = roster_to_string(&view).unwrap();
        assert_eq!(
            csv.lines().nth(1),
            Some("1,Aarav Sharma,MSIT-CSE2028-001,MSIT,7.2,70,3,0,React")
        );
    }

    #[test]
    fn empty_roster_view_exports_header_only() {
        let csv = roster_to_string(&[]).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }

    #[test]
    fn feed_csv_quotes_free_text_fields() {
        let raw = RawOpportunity {
            title: "Intern \"Platform\"".to_string(),
            link: "https://example.com/apply".to_string(),
            deadline: "Sep 30, 2025".to_string(),
            location: "Remote, IN".to_string(),
            pay: Some("$1,000/month".to_string()),
            category: "Internship".to_string(),
            ..RawOpportunity::default()
        };
        let view = vec![Opportunity::tagged(raw, Provenance::International)];
        let csv = feed_to_string(&view).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "Title,Category,Source,Location,Deadline,Pay,Link");
        assert_eq!(
            lines[1],
            "\"Intern \"\"Platform\"\"\",Internship,International,\"Remote, IN\",\"Sep 30, 2025\",\"$1,000/month\",https://example.com/apply"
        );
    }

    #[test]
    fn feed_csv_renders_missing_pay_as_empty_quotes() {
        let raw = RawOpportunity {
            title: "SDE".to_string(),
            category: "Job".to_string(),
            ..RawOpportunity::default()
        };
        let view = vec![Opportunity::tagged(raw, Provenance::Domestic)];
        let csv = feed_to_string(&view).unwrap();
        assert_eq!(csv.lines().nth(1), Some("\"SDE\",Job,India,\"\",\"\",\"\","));
    }

    #[test]
    fn save_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        save(&path, "a,b\n", 0).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a,b\n");
    }
}
