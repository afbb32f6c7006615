use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod config;
mod currency;
mod error;
mod export;
mod feed;
mod loader;
mod models;
mod profile;
mod report;
mod roster;
mod view;

use crate::feed::{facet, FeedQuery, FeedSortKey};
use crate::loader::{FeedLoader, FeedPage};
use crate::models::{ProfileMetrics, Provenance};
use crate::profile::{FixedUrl, QrServer};
use crate::roster::{Leaderboard, RosterQuery, SkillFacet, SortField};

#[derive(Parser)]
#[command(name = "skillsync")]
#[command(about = "Leaderboard, opportunities feed and student profile views for Skill Sync", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank the generated cohort roster
    Leaderboard {
        #[arg(long)]
        count: Option<usize>,
        #[arg(long, default_value = "")]
        query: String,
        #[arg(long, default_value = "All")]
        skill: String,
        #[arg(long, default_value = "score")]
        sort: SortField,
        #[arg(long)]
        asc: bool,
        #[arg(long, default_value_t = 25)]
        limit: usize,
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// List the skill facet values
    Skills {
        #[arg(long)]
        count: Option<usize>,
    },
    /// Load and filter the opportunities feed
    Feed {
        #[arg(long)]
        path: Option<PathBuf>,
        #[arg(long)]
        base_url: Option<String>,
        #[arg(long, default_value = "All")]
        category: String,
        #[arg(long, default_value = "All")]
        source: String,
        #[arg(long)]
        remote_only: bool,
        #[arg(long, default_value = "")]
        query: String,
        #[arg(long, default_value = "deadline")]
        sort: FeedSortKey,
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Show the student profile and its share link
    Profile {
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        sgpa: Option<f64>,
        #[arg(long)]
        attendance: Option<f64>,
    },
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_app_config().context("failed to load configuration")?;
    init_tracing(&cfg.log_level);

    match cli.command {
        Commands::Leaderboard {
            count,
            query,
            skill,
            sort,
            asc,
            limit,
            csv,
        } => {
            let mut board =
                Leaderboard::new(roster::generate_students(count.unwrap_or(cfg.roster_size)));
            let query = RosterQuery {
                text: query,
                skill: SkillFacet::parse(&skill),
                sort,
                ascending: asc,
            };
            let stats = board.stats().clone();
            let view = board.view(&query);

            print!("{}", report::build_leaderboard(&stats, view, limit));

            if let Some(path) = csv {
                let contents = export::roster_to_string(view)?;
                export::save(&path, &contents, view.len())?;
                println!("Export written to {}.", path.display());
            }
        }
        Commands::Skills { count } => {
            let students = roster::generate_students(count.unwrap_or(cfg.roster_size));
            for skill in roster::skill_options(&students) {
                println!("{skill}");
            }
        }
        Commands::Feed {
            path,
            base_url,
            category,
            source,
            remote_only,
            query,
            sort,
            csv,
        } => {
            let loader = FeedLoader::new(
                path.unwrap_or(cfg.feed_path),
                base_url.as_deref().unwrap_or(cfg.feed_base_url.as_str()),
                cfg.http_timeout_secs,
            )
            .context("failed to build feed loader")?;

            let provenance = match facet(&source) {
                Some(label) => Some(
                    Provenance::parse(label)
                        .with_context(|| format!("unknown source: {label}"))?,
                ),
                None => None,
            };

            let page = FeedPage::mount();
            page.spawn_load(Arc::new(loader))
                .await
                .context("feed load task failed")?;

            let state = page.snapshot();
            let mut board = page.board();
            let query = FeedQuery {
                category: facet(&category).map(str::to_string),
                provenance,
                remote_only,
                text: query,
                sort,
            };
            let stats = board.stats().clone();
            let view = board.view(&query);

            print!("{}", report::build_feed(&state, &stats, view, &cfg.fx));

            if let Some(path) = csv {
                if view.is_empty() {
                    println!("Nothing to export.");
                } else {
                    let contents = export::feed_to_string(view)?;
                    export::save(&path, &contents, view.len())?;
                    println!("Export written to {}.", path.display());
                }
            }
        }
        Commands::Profile {
            url,
            sgpa,
            attendance,
        } => {
            let mut profile = profile::demo_profile();
            profile.metrics = ProfileMetrics {
                sgpa: sgpa.unwrap_or(profile.metrics.sgpa),
                attendance: attendance.unwrap_or(profile.metrics.attendance),
            };
            let validation = profile::validate_metrics(profile.metrics);
            let share = profile::share_artifact(
                &FixedUrl(url.unwrap_or(cfg.profile_url)),
                &QrServer::new(&cfg.qr_endpoint),
            );

            print!(
                "{}",
                report::build_profile(&profile, validation, share.as_ref())
            );
        }
    }

    Ok(())
}
