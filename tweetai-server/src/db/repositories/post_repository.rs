use anyhow::{Context, Result};
use rusqlite::OptionalExtension;

use tweetai_types::Post;

use crate::db::DbPool;

pub struct PostRepository {
    pool: DbPool,
}

impl PostRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Insert a post for an autobot and return its row id
    pub fn create(&self, title: &str, body: &str, autobot_id: i64) -> Result<i64> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO posts (title, body, autobot_id) VALUES (?, ?, ?)",
            (title, body, autobot_id),
        )
        .context("Failed to create post")?;
        Ok(conn.last_insert_rowid())
    }

    /// Get an autobot's posts ordered by id
    pub fn get_by_autobot(&self, autobot_id: i64, limit: i64) -> Result<Vec<Post>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT id, title, body, autobot_id
             FROM posts
             WHERE autobot_id = ?
             ORDER BY id
             LIMIT ?",
        )?;

        let posts = stmt
            .query_map([autobot_id, limit], |row| {
                Ok(Post {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    body: row.get(2)?,
                    autobot_id: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(posts)
    }

    pub fn title_exists(&self, title: &str) -> Result<bool> {
        let conn = self.pool.get()?;
        let exists = conn
            .query_row(
                "SELECT 1 FROM posts WHERE title = ? LIMIT 1",
                [title],
                |_| Ok(()),
            )
            .optional()?
            .is_some();
        Ok(exists)
    }

    pub fn count(&self) -> Result<i64> {
        let conn = self.pool.get()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM posts", [], |row| row.get(0))?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::AutobotRepository;
    use crate::db::Database;

    fn setup() -> (AutobotRepository, PostRepository) {
        let db = Database::in_memory().expect("Failed to create database");
        db.initialize().expect("Failed to initialize schema");
        (
            AutobotRepository::new(db.pool.clone()),
            PostRepository::new(db.pool),
        )
    }

    #[test]
    fn test_get_by_autobot_filters_owner() {
        let (autobots, posts) = setup();
        let first = autobots.create("Bret", "Leanne Graham", "a@example.com").unwrap();
        let second = autobots.create("Antonette", "Ervin Howell", "b@example.com").unwrap();

        for i in 0..12 {
            posts.create(&format!("first {}", i), "body", first).unwrap();
        }
        for i in 0..3 {
            posts.create(&format!("second {}", i), "body", second).unwrap();
        }

        let page = posts.get_by_autobot(first, 10).unwrap();
        assert_eq!(page.len(), 10);
        assert!(page.iter().all(|p| p.autobot_id == first));

        let page = posts.get_by_autobot(second, 10).unwrap();
        assert_eq!(page.len(), 3);
        assert!(page.iter().all(|p| p.autobot_id == second));

        assert!(posts.get_by_autobot(9999, 10).unwrap().is_empty());
        assert_eq!(posts.count().unwrap(), 15);
    }

    #[test]
    fn test_title_exists() {
        let (autobots, posts) = setup();
        let owner = autobots.create("Bret", "Leanne Graham", "a@example.com").unwrap();
        posts.create("qui est esse", "est rerum tempore", owner).unwrap();

        assert!(posts.title_exists("qui est esse").unwrap());
        assert!(!posts.title_exists("eum et est occaecati").unwrap());
        assert!(posts.create("qui est esse", "again", owner).is_err());
    }
}
