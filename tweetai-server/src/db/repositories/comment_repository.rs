use anyhow::{Context, Result};

use tweetai_types::Comment;

use crate::db::DbPool;

pub struct CommentRepository {
    pool: DbPool,
}

impl CommentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Insert a comment on a post and return its row id
    pub fn create(&self, post_id: i64, body: &str) -> Result<i64> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO comments (post_id, body) VALUES (?, ?)",
            (post_id, body),
        )
        .context("Failed to create comment")?;
        Ok(conn.last_insert_rowid())
    }

    /// Get a post's comments ordered by id
    pub fn get_by_post(&self, post_id: i64, limit: i64) -> Result<Vec<Comment>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT id, post_id, body
             FROM comments
             WHERE post_id = ?
             ORDER BY id
             LIMIT ?",
        )?;

        let comments = stmt
            .query_map([post_id, limit], |row| {
                Ok(Comment {
                    id: row.get(0)?,
                    post_id: row.get(1)?,
                    body: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(comments)
    }

    pub fn count(&self) -> Result<i64> {
        let conn = self.pool.get()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM comments", [], |row| row.get(0))?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{AutobotRepository, PostRepository};
    use crate::db::Database;

    #[test]
    fn test_get_by_post() {
        let db = Database::in_memory().expect("Failed to create database");
        db.initialize().expect("Failed to initialize schema");
        let autobot_id = AutobotRepository::new(db.pool.clone())
            .create("Bret", "Leanne Graham", "a@example.com")
            .unwrap();
        let posts = PostRepository::new(db.pool.clone());
        let post_id = posts.create("qui est esse", "body", autobot_id).unwrap();
        let other_post = posts.create("ea molestias", "body", autobot_id).unwrap();

        let comments = CommentRepository::new(db.pool);
        for i in 0..11 {
            comments.create(post_id, &format!("comment {}", i)).unwrap();
        }
        comments.create(other_post, "elsewhere").unwrap();

        let page = comments.get_by_post(post_id, 10).unwrap();
        assert_eq!(page.len(), 10);
        assert!(page.iter().all(|c| c.post_id == post_id));
        assert_eq!(page[0].body, "comment 0");
        assert_eq!(comments.count().unwrap(), 12);
    }

    #[test]
    fn test_comment_requires_existing_post() {
        let db = Database::in_memory().expect("Failed to create database");
        db.initialize().expect("Failed to initialize schema");
        let comments = CommentRepository::new(db.pool);
        assert!(comments.create(42, "dangling").is_err());
    }
}
