use anyhow::Result;
use rand::seq::SliceRandom;
use std::collections::HashSet;
use std::sync::Arc;

use crate::config;
use crate::db::repositories::{AutobotRepository, CommentRepository, PostRepository};
use crate::db::Database;
use crate::placeholder::{PlaceholderError, PlaceholderPost, PlaceholderSource};

/// How much work one population run attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobSettings {
    pub iterations: u32,
    pub posts_per_autobot: u32,
    pub comments_per_post: u32,
}

impl Default for JobSettings {
    fn default() -> Self {
        Self {
            iterations: 500,
            posts_per_autobot: 10,
            comments_per_post: 10,
        }
    }
}

impl From<&config::Job> for JobSettings {
    fn from(job: &config::Job) -> Self {
        Self {
            iterations: job.iterations,
            posts_per_autobot: job.posts_per_autobot,
            comments_per_post: job.comments_per_post,
        }
    }
}

/// Outcome of one population run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PopulateStats {
    pub autobots_inserted: u32,
    pub posts_inserted: u32,
    pub comments_inserted: u32,
    pub autobots_skipped: u32,
    pub posts_skipped: u32,
    pub failed_iterations: u32,
}

/// Usernames and titles already taken, remembered for the length of one run
#[derive(Default)]
struct RunMemory {
    usernames: HashSet<String>,
    titles: HashSet<String>,
}

/// Populates the database with autobots, posts and comments drawn from a
/// `PlaceholderSource`
#[derive(Clone)]
pub struct PopulateJob {
    db: Database,
    source: Arc<dyn PlaceholderSource>,
    settings: JobSettings,
}

impl PopulateJob {
    pub fn new(db: Database, source: Arc<dyn PlaceholderSource>, settings: JobSettings) -> Self {
        Self { db, source, settings }
    }

    pub fn settings(&self) -> JobSettings {
        self.settings
    }

    /// Run every iteration sequentially
    ///
    /// A failing iteration is logged and counted; whatever it inserted before
    /// failing stays in the database and the run moves on to the next one.
    pub async fn run(&self) -> PopulateStats {
        tracing::info!(
            "Starting population run: {} iterations, {} posts per autobot, {} comments per post",
            self.settings.iterations,
            self.settings.posts_per_autobot,
            self.settings.comments_per_post
        );

        let mut memory = RunMemory::default();
        let mut stats = PopulateStats::default();

        for iteration in 0..self.settings.iterations {
            if let Err(e) = self.run_iteration(&mut memory, &mut stats).await {
                stats.failed_iterations += 1;
                tracing::error!(
                    "Error creating autobot or associated data (iteration {}): {:#}",
                    iteration + 1,
                    e
                );
            }
        }

        tracing::info!(
            "Population run finished: {} autobots, {} posts, {} comments inserted; {} autobots and {} posts skipped; {} iterations failed",
            stats.autobots_inserted,
            stats.posts_inserted,
            stats.comments_inserted,
            stats.autobots_skipped,
            stats.posts_skipped,
            stats.failed_iterations
        );

        stats
    }

    async fn run_iteration(&self, memory: &mut RunMemory, stats: &mut PopulateStats) -> Result<()> {
        let pool = self.db.pool.clone();
        let autobot_repo = AutobotRepository::new(pool.clone());
        let post_repo = PostRepository::new(pool.clone());
        let comment_repo = CommentRepository::new(pool);

        let users = self.source.users().await?;
        let user = pick_random(&users).ok_or(PlaceholderError::Empty("user"))?;

        if memory.usernames.contains(&user.username) {
            tracing::debug!("Username {} already inserted, skipping", user.username);
            stats.autobots_skipped += 1;
            return Ok(());
        }

        if autobot_repo.username_exists(&user.username)? {
            tracing::debug!("Username {} already exists in database, skipping", user.username);
            memory.usernames.insert(user.username);
            stats.autobots_skipped += 1;
            return Ok(());
        }

        let autobot_id = autobot_repo.create(&user.username, &user.name, &user.email)?;
        memory.usernames.insert(user.username.clone());
        stats.autobots_inserted += 1;
        tracing::debug!("Inserted autobot {} as id {}", user.username, autobot_id);

        for _ in 0..self.settings.posts_per_autobot {
            let posts = self.source.posts().await?;

            let Some(post) = pick_unused_post(&posts, &memory.titles) else {
                tracing::warn!("Every post title has been used in this run, no more posts for {}", user.username);
                break;
            };

            if post_repo.title_exists(&post.title)? {
                tracing::debug!("Post title \"{}\" already exists in database, skipping", post.title);
                memory.titles.insert(post.title);
                stats.posts_skipped += 1;
                continue;
            }

            let post_id = post_repo.create(&post.title, &post.body, autobot_id)?;
            memory.titles.insert(post.title);
            stats.posts_inserted += 1;

            for _ in 0..self.settings.comments_per_post {
                let comments = self.source.comments().await?;
                let comment = pick_random(&comments).ok_or(PlaceholderError::Empty("comment"))?;
                comment_repo.create(post_id, &comment.body)?;
                stats.comments_inserted += 1;
            }
        }

        Ok(())
    }
}

fn pick_random<T: Clone>(items: &[T]) -> Option<T> {
    items.choose(&mut rand::thread_rng()).cloned()
}

/// Pick a random post whose title is not in `used`
fn pick_unused_post(posts: &[PlaceholderPost], used: &HashSet<String>) -> Option<PlaceholderPost> {
    let candidates: Vec<&PlaceholderPost> = posts
        .iter()
        .filter(|post| !used.contains(&post.title))
        .collect();
    candidates
        .choose(&mut rand::thread_rng())
        .map(|post| (*post).clone())
}
