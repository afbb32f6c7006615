use std::fmt::Write;

use crate::currency::{to_display_currency, FxTable};
use crate::loader::FeedState;
use crate::models::{FeedStats, MetricValidation, Opportunity, RankedStudent, RosterStats};
use crate::profile::{Profile, ShareArtifact};
use crate::roster;

fn or_dash(value: &str) -> &str {
    if value.is_empty() {
        "—"
    } else {
        value
    }
}

pub fn build_leaderboard(stats: &RosterStats, view: &[RankedStudent], limit: usize) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# MSIT • CSE 2028 • Rankings");
    let _ = writeln!(output);
    let _ = writeln!(output, "- Total Students: {}", stats.total);
    let _ = writeln!(output, "- Average CGPA: {:.2}", stats.avg_cgpa);
    let _ = writeln!(output, "- Average Score: {:.0}", stats.avg_score.round());
    let _ = writeln!(output, "- Top Streak: {} days", stats.top_streak);
    let _ = writeln!(output);

    if view.is_empty() {
        let _ = writeln!(output, "No students match the current filters.");
        return output;
    }

    let (podium, rest) = roster::podium(view);
    let _ = writeln!(output, "## Podium");
    for entry in podium {
        let s = &entry.student;
        let _ = writeln!(
            output,
            "- #{} [{} {}] {} <{}> ({}, {}) CGPA {} • Score {} • Projects {}",
            entry.rank,
            s.initials(),
            s.avatar_bg,
            s.name,
            s.id,
            s.institute,
            s.location,
            s.cgpa,
            s.score,
            s.projects
        );
    }

    if !rest.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "## Leaderboard");
        let _ = writeln!(
            output,
            "| Rank | Student | Roll | CGPA | Score | Projects | Streak | Skills |"
        );
        let _ = writeln!(output, "|---|---|---|---|---|---|---|---|");
        for entry in rest.iter().take(limit) {
            let s = &entry.student;
            let _ = writeln!(
                output,
                "| #{} | {} | {} | {} | {} | {} | {} | {} |",
                entry.rank,
                s.name,
                s.roll,
                s.cgpa,
                s.score,
                s.projects,
                s.streak,
                s.skills.join(", ")
            );
        }
        if rest.len() > limit {
            let _ = writeln!(output, "... {} more", rest.len() - limit);
        }
    }

    output
}

pub fn build_feed(
    state: &FeedState,
    stats: &FeedStats,
    view: &[Opportunity],
    fx: &FxTable,
) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Opportunities Feed");
    let _ = writeln!(output, "Last updated: {}", or_dash(&stats.last_updated));
    if let Some(source) = &stats.source {
        let _ = writeln!(output, "Source: {source}");
    }
    let _ = writeln!(
        output,
        "Total: {} • India: {} • International: {}",
        stats.total, stats.domestic_count, stats.international_count
    );
    let _ = writeln!(output);

    if let Some(err) = &state.error {
        let _ = writeln!(output, "> {err}");
        let _ = writeln!(output);
    }

    let _ = writeln!(
        output,
        "Showing {} of {} opportunities",
        view.len(),
        stats.total
    );

    if view.is_empty() {
        let _ = writeln!(output, "No opportunities match current filters.");
        return output;
    }

    for o in view {
        let _ = writeln!(output);
        let category = if o.category.is_empty() {
            "N/A"
        } else {
            o.category.as_str()
        };
        let _ = writeln!(output, "## {} [{}]", o.title, category);
        let mut line = format!(
            "{} • {} • {}",
            or_dash(&o.location),
            or_dash(&o.deadline),
            o.provenance
        );
        if let Some(pay) = &o.pay {
            let _ = write!(line, " • {}", to_display_currency(pay, fx));
        }
        let _ = writeln!(output, "{line}");
        if !o.description.is_empty() {
            let _ = writeln!(output, "{}", o.description);
        }
        let _ = writeln!(output, "Apply: {}", o.link);
        if let Some(logo) = o.logo.as_deref().filter(|l| !l.is_empty()) {
            let _ = writeln!(output, "Logo: {logo}");
        }
    }

    output
}

pub fn build_profile(
    profile: &Profile,
    validation: MetricValidation,
    share: Option<&ShareArtifact>,
) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# {}", profile.name);
    let _ = writeln!(
        output,
        "Class rank {}/{} ({:.2}% of the dial)",
        profile.rank,
        profile.total_students,
        profile.rank_fill()
    );
    let _ = writeln!(
        output,
        "SGPA {:.2} ({:.0}%){}",
        profile.metrics.sgpa,
        profile.sgpa_fill(),
        if validation.sgpa_valid { "" } else { " [out of range]" }
    );
    let _ = writeln!(
        output,
        "Attendance {}%{}",
        profile.attendance_fill(),
        if validation.attendance_valid {
            ""
        } else {
            " [out of range]"
        }
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Skills");
    for skill in &profile.skills {
        let _ = writeln!(output, "- {}: {}", skill.name, skill.level);
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Experience");
    for exp in &profile.experiences {
        let _ = writeln!(
            output,
            "- {} @ {} ({}): {}",
            exp.title, exp.org, exp.range, exp.desc
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Extracurriculars");
    for activity in &profile.extracurriculars {
        let _ = writeln!(
            output,
            "- {} ({}): {}",
            activity.title, activity.date, activity.desc
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Certifications");
    for cert in &profile.certifications {
        let _ = writeln!(
            output,
            "- {} by {}, {} <{}>",
            cert.title, cert.org, cert.date, cert.url
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Courses");
    for course in &profile.courses {
        let _ = writeln!(
            output,
            "- {} ({}): {}% <{}>",
            course.title, course.provider, course.progress, course.url
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Coding Platforms");
    for platform in &profile.platforms {
        let _ = writeln!(
            output,
            "- {}: {} <{}>",
            platform.label, platform.username, platform.url
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Share");
    match share {
        Some(artifact) => {
            let _ = writeln!(output, "Link: {}", artifact.page_url);
            let _ = writeln!(output, "QR: {}", artifact.image_url);
            let _ = writeln!(output, "Download as: {}", artifact.download_name);
        }
        None => {
            let _ = writeln!(output, "Share link unavailable.");
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{FeedBoard, FeedQuery};
    use crate::models::{FeedData, Provenance, RawOpportunity};
    use crate::profile::{demo_profile, share_artifact, validate_metrics, FixedUrl, QrServer};
    use crate::roster::{Leaderboard, RosterQuery};

    #[test]
    fn leaderboard_lists_podium_then_table() {
        let mut board = Leaderboard::new(roster::generate_students(10));
        let stats = board.stats().clone();
        let view = board.view(&RosterQuery::default()).to_vec();
        let report = build_leaderboard(&stats, &view, 5);

        assert!(report.contains("- Total Students: 10"));
        assert!(report.contains("## Podium"));
        assert!(report.contains("| #4 |"));
        assert!(report.contains(&format!("<{}>", view[0].student.id)));
        assert!(report.contains("... 2 more"));
    }

    #[test]
    fn leaderboard_reports_empty_view() {
        let stats = roster::summarize(&[]);
        let report = build_leaderboard(&stats, &[], 10);
        assert!(report.contains("No students match the current filters."));
    }

    #[test]
    fn feed_report_shows_error_and_converted_pay() {
        let data = FeedData {
            international_opportunities: vec![RawOpportunity {
                title: "Cloud Engineer".to_string(),
                logo: Some("https://cdn.example.com/cloud.png".to_string()),
                pay: Some("$1000 - $2000/month".to_string()),
                category: "Job".to_string(),
                ..RawOpportunity::default()
            }],
            ..FeedData::default()
        };
        let mut board = FeedBoard::new(Some(&data));
        let stats = board.stats().clone();
        let view = board.view(&FeedQuery::default()).to_vec();
        assert_eq!(view[0].provenance, Provenance::International);

        let state = FeedState {
            error: Some("Failed to load feed (503)".to_string()),
            ..FeedState::default()
        };
        let report = build_feed(&state, &stats, &view, &FxTable::default());
        assert!(report.contains("> Failed to load feed (503)"));
        assert!(report.contains("Showing 1 of 1 opportunities"));
        assert!(report.contains("₹83,000 - ₹1,66,000/month"));
        assert!(report.contains("Last updated: —"));
        assert!(report.contains("Logo: https://cdn.example.com/cloud.png"));
    }

    #[test]
    fn profile_report_includes_share_block() {
        let profile = demo_profile();
        let qr = QrServer::new("https://qr.example/");
        let share = share_artifact(&FixedUrl("https://skillsync.dev/p".to_string()), &qr);
        let report = build_profile(&profile, validate_metrics(profile.metrics), share.as_ref());
        assert!(report.contains("Class rank 12/220 (5.45% of the dial)"));
        assert!(report.contains("SGPA 9.20 (92%)"));
        assert!(report.contains("Download as: profile-qr.svg"));
        assert!(!report.contains("[out of range]"));
    }
}
