use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;

use tweetai_server::db::{
    repositories::{AutobotRepository, CommentRepository, PostRepository},
    Database,
};
use tweetai_server::job::{JobSettings, PopulateJob};
use tweetai_server::placeholder::{HttpPlaceholderSource, DEFAULT_BASE_URL};

/// TweetAI database seeding utility
///
/// Runs the autobot population job on demand instead of waiting for the
/// hourly schedule, and reports table sizes.
#[derive(Parser, Debug)]
#[command(name = "tweetai-seed")]
#[command(about = "Populate and inspect the TweetAI database", long_about = None)]
struct Args {
    /// Path to the SQLite database file
    #[arg(short, long, env = "DATABASE_PATH", default_value = "./tweetai.db", global = true)]
    database: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one population pass against the placeholder API
    Populate {
        /// Number of autobot iterations to attempt
        #[arg(short, long, default_value_t = 500)]
        iterations: u32,

        /// Posts to attempt for every new autobot
        #[arg(long, default_value_t = 10)]
        posts: u32,

        /// Comments to insert for every new post
        #[arg(long, default_value_t = 10)]
        comments: u32,

        /// Placeholder API base URL
        #[arg(long, env = "PLACEHOLDER_BASE_URL", default_value = DEFAULT_BASE_URL)]
        base_url: String,

        /// Per-request timeout in seconds
        #[arg(long, default_value_t = 10)]
        timeout: u64,
    },

    /// Print row counts for every table
    Stats,
}

/// Row counts for the three tables
#[derive(Debug)]
struct TableStats {
    autobots: i64,
    posts: i64,
    comments: i64,
}

fn collect_stats(db: &Database) -> Result<TableStats> {
    Ok(TableStats {
        autobots: AutobotRepository::new(db.pool.clone())
            .count()
            .context("Failed to count autobots")?,
        posts: PostRepository::new(db.pool.clone())
            .count()
            .context("Failed to count posts")?,
        comments: CommentRepository::new(db.pool.clone())
            .count()
            .context("Failed to count comments")?,
    })
}

fn print_stats(stats: &TableStats) {
    println!("=== Database Stats ===");
    println!("Autobots: {}", stats.autobots);
    println!("Posts:    {}", stats.posts);
    println!("Comments: {}", stats.comments);
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let db = Database::new(&args.database)
        .with_context(|| format!("Failed to open database {}", args.database))?;
    db.initialize()?;

    match args.command {
        Command::Populate {
            iterations,
            posts,
            comments,
            base_url,
            timeout,
        } => {
            let source = HttpPlaceholderSource::new(base_url, Duration::from_secs(timeout))
                .context("Failed to create placeholder API client")?;
            let settings = JobSettings {
                iterations,
                posts_per_autobot: posts,
                comments_per_post: comments,
            };

            println!("Populating {} from {}", args.database, source.base_url());
            let job = PopulateJob::new(db.clone(), Arc::new(source), settings);
            let run = job.run().await;

            println!("\n=== Population Summary ===");
            println!("Autobots inserted: {}", run.autobots_inserted);
            println!("Posts inserted:    {}", run.posts_inserted);
            println!("Comments inserted: {}", run.comments_inserted);
            println!("Autobots skipped:  {}", run.autobots_skipped);
            println!("Posts skipped:     {}", run.posts_skipped);
            println!("Failed iterations: {}", run.failed_iterations);
            println!();

            print_stats(&collect_stats(&db)?);
        }
        Command::Stats => {
            print_stats(&collect_stats(&db)?);
        }
    }

    Ok(())
}
