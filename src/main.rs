//! Drupal 7 → Jekyll exporter.
//!
//! Reads every blog node (title, body, summary, URL alias, taxonomy terms)
//! from a Drupal 7 database and writes one Markdown file per node:
//! published nodes to `_posts/`, unpublished ones to `_drafts/`.

mod db;
mod error;
mod frontmatter;
mod pipeline;
mod query;
mod settings;
mod slug;
mod writer;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use config::Environment;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use pipeline::{MigrationStats, OutputLayout};
use settings::{Overrides, Settings};

#[derive(Parser)]
#[command(name = "drupal_posts", about = "Export Drupal 7 blog nodes as Jekyll posts")]
struct Cli {
    /// Settings file (TOML, YAML or JSON)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Database name (path to the SQLite database file)
    #[arg(long)]
    dbname: Option<String>,
    /// Database user name
    #[arg(long)]
    user: Option<String>,
    /// Database user's password (default: "")
    #[arg(long)]
    password: Option<String>,
    /// Database host name (default: "localhost")
    #[arg(long)]
    host: Option<String>,
    /// Table prefix name
    #[arg(long)]
    prefix: Option<String>,
    /// Site root that receives _posts, _drafts and _layouts (default: ".")
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl From<Cli> for Overrides {
    fn from(cli: Cli) -> Self {
        Overrides {
            config: cli.config,
            dbname: cli.dbname,
            user: cli.user,
            password: cli.password,
            host: cli.host,
            prefix: cli.prefix,
            output: cli.output,
        }
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .try_init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let t0 = Instant::now();
    let cli = Cli::parse();

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {pos} posts")?);

    let stats = run(cli.into(), Environment::with_prefix(settings::ENV_PREFIX), &pb)?;
    pb.finish_and_clear();

    println!(
        "Wrote {} posts ({} published, {} drafts).",
        stats.total(),
        stats.published,
        stats.drafts
    );
    if stats.empty_slugs > 0 || stats.collisions > 0 {
        println!(
            "Warnings: {} empty slugs, {} overwritten files.",
            stats.empty_slugs, stats.collisions
        );
    }

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("Done in {}", format_duration(elapsed));
    }
    Ok(())
}

/// Settings are validated and the database opened before anything is
/// created under the output root.
fn run(overrides: Overrides, env: Environment, pb: &ProgressBar) -> anyhow::Result<MigrationStats> {
    let settings = Settings::load(overrides, env)?;
    info!(
        prefix = %settings.prefix,
        output = %settings.output.display(),
        "Settings loaded"
    );

    let conn = db::connect(&settings)
        .with_context(|| format!("Failed to open database {}", settings.dbname))?;
    let sql = query::build_query(&settings.prefix);
    debug!("Extraction query:\n{}", sql);

    let layout = OutputLayout::create(&settings.output)?;
    let stats = pipeline::run(&conn, &sql, &layout, pb).context("Migration aborted")?;
    Ok(stats)
}

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::fixtures::{create_schema, insert_node, Node};
    use std::collections::HashMap;

    fn empty_env() -> Environment {
        Environment::with_prefix(settings::ENV_PREFIX).source(Some(HashMap::new()))
    }

    fn overrides(dbname: &std::path::Path, user: Option<&str>, output: &std::path::Path) -> Overrides {
        Overrides {
            dbname: Some(dbname.display().to_string()),
            user: user.map(String::from),
            output: Some(output.to_path_buf()),
            ..Overrides::default()
        }
    }

    fn site_database(path: &std::path::Path) {
        let conn = rusqlite::Connection::open(path).unwrap();
        create_schema(&conn, "");
        insert_node(&conn, "", &Node::default());
    }

    #[test]
    fn missing_option_aborts_before_output_exists() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("site.sqlite");
        site_database(&db);
        let out = dir.path().join("site");

        let err = run(overrides(&db, None, &out), empty_env(), &ProgressBar::hidden()).unwrap_err();
        assert_eq!(err.to_string(), "Missing mandatory option --user.");
        assert!(!out.exists());
    }

    #[test]
    fn unreadable_database_aborts_before_output_exists() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("site");

        let err = run(
            overrides(&dir.path().join("missing.sqlite"), Some("admin"), &out),
            empty_env(),
            &ProgressBar::hidden(),
        )
        .unwrap_err();
        assert!(err.to_string().starts_with("Failed to open database"));
        assert!(!out.exists());
    }

    #[test]
    fn run_exports_site_database() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("site.sqlite");
        site_database(&db);
        let out = dir.path().join("site");

        let stats = run(overrides(&db, Some("admin"), &out), empty_env(), &ProgressBar::hidden()).unwrap();
        assert_eq!(stats.published, 1);
        assert!(out.join("_posts/2001-09-09-hello-world.md").is_file());
        assert!(out.join("_drafts").is_dir());
        assert!(out.join("_layouts").is_dir());
    }

    #[test]
    fn cli_flags_become_overrides() {
        let cli = Cli::parse_from([
            "drupal_posts",
            "--dbname",
            "site.sqlite",
            "--user",
            "admin",
            "--prefix",
            "d7_",
            "-o",
            "out",
        ]);
        let o: Overrides = cli.into();
        assert_eq!(o.dbname.as_deref(), Some("site.sqlite"));
        assert_eq!(o.user.as_deref(), Some("admin"));
        assert_eq!(o.prefix.as_deref(), Some("d7_"));
        assert_eq!(o.output, Some(PathBuf::from("out")));
        assert_eq!(o.password, None);
    }

    #[test]
    fn durations_format_by_scale() {
        assert_eq!(format_duration(Duration::from_millis(2500)), "2.5s");
        assert_eq!(format_duration(Duration::from_secs(125)), "2m 5s");
        assert_eq!(format_duration(Duration::from_secs(3725)), "1h 2m 5s");
    }
}
