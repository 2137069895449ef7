mod chef;
mod config;
mod db;
mod error;
mod export;
mod fetch;
mod parser;
mod practice;
mod tree;
mod utils;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::chef::GarageChef;
use crate::config::Settings;
use crate::fetch::{HttpPages, LocalPages, PageSource, SessionCookie};

#[derive(Parser)]
#[command(name = "garage_chef", about = "Google Garage Digital channel builder")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    /// Directory of pre-saved pages (catalog.html, course.html, ...)
    #[arg(long, global = true)]
    pages: Option<PathBuf>,
    /// Fetch pages from the live site instead of the pages directory
    #[arg(long, global = true)]
    online: bool,
    /// SQLite store for the finished channel
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// Also write the channel as a JSON manifest
    #[arg(long)]
    json: Option<PathBuf>,
    /// Session cookie sent with every request in online mode
    #[arg(long)]
    cookie: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape the site and store the channel tree (default)
    Run,
    /// Show what the store currently holds
    Stats,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let mut settings = Settings::load()?;
    if let Some(dir) = cli.pages {
        settings.pages_dir = dir;
    }
    if let Some(path) = cli.db {
        settings.db_path = path;
    }
    if cli.json.is_some() {
        settings.json_path = cli.json;
    }
    if cli.cookie.is_some() {
        settings.session_cookie = cli.cookie;
    }
    settings.online |= cli.online;

    let result = match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run(&settings),
        Commands::Stats => {
            let conn = db::connect(&settings.db_path)?;
            db::init_schema(&conn)?;
            let s = db::get_stats(&conn)?;
            println!("Channels:  {}", s.channels);
            println!("Topics:    {}", s.topics);
            println!("Videos:    {}", s.videos);
            println!("Exercises: {}", s.exercises);
            println!("Questions: {}", s.questions);
            println!("Last run:  {}", s.last_run.as_deref().unwrap_or("-"));
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {:.1}s", elapsed.as_secs_f64());
    }

    result
}

fn run(settings: &Settings) -> anyhow::Result<()> {
    let source: Box<dyn PageSource> = if settings.online {
        let cookie = settings.session_cookie.clone().map(SessionCookie::new);
        Box::new(HttpPages::new(cookie)?)
    } else {
        Box::new(LocalPages::new(&settings.pages_dir))
    };

    let channel = GarageChef::new(source.as_ref(), &settings.base_url, &settings.language)
        .construct_channel()
        .context("Failed to build channel")?;

    let conn = db::connect(&settings.db_path)?;
    db::init_schema(&conn)?;
    let counts = db::save_channel(&conn, &channel)?;
    println!(
        "Saved {} topics, {} videos, {} exercises, {} questions to {}.",
        counts.topics,
        counts.videos,
        counts.exercises,
        counts.questions,
        settings.db_path.display(),
    );

    if let Some(path) = &settings.json_path {
        export::write_manifest(path, &channel)?;
        println!("Manifest written to {}", path.display());
    }
    Ok(())
}
