use anyhow::{Context, Result};
use rusqlite::{OptionalExtension, Row};

use tweetai_types::Autobot;

use crate::db::DbPool;

pub struct AutobotRepository {
    pool: DbPool,
}

fn map_autobot(row: &Row<'_>) -> rusqlite::Result<Autobot> {
    Ok(Autobot {
        id: row.get(0)?,
        username: row.get(1)?,
        name: row.get(2)?,
        email: row.get(3)?,
    })
}

impl AutobotRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// List autobots ordered by id
    pub fn list(&self, limit: i64) -> Result<Vec<Autobot>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT id, username, name, email
             FROM autobots
             ORDER BY id
             LIMIT ?",
        )?;

        let autobots = stmt
            .query_map([limit], map_autobot)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(autobots)
    }

    pub fn username_exists(&self, username: &str) -> Result<bool> {
        let conn = self.pool.get()?;
        let exists = conn
            .query_row(
                "SELECT 1 FROM autobots WHERE username = ? LIMIT 1",
                [username],
                |_| Ok(()),
            )
            .optional()?
            .is_some();
        Ok(exists)
    }

    /// Insert an autobot and return its row id
    pub fn create(&self, username: &str, name: &str, email: &str) -> Result<i64> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO autobots (username, name, email) VALUES (?, ?, ?)",
            [username, name, email],
        )
        .with_context(|| format!("Failed to create autobot {}", username))?;
        Ok(conn.last_insert_rowid())
    }

    /// Total number of autobots
    pub fn count(&self) -> Result<i64> {
        let conn = self.pool.get()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM autobots", [], |row| row.get(0))?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    fn setup_repo() -> AutobotRepository {
        let db = Database::in_memory().expect("Failed to create database");
        db.initialize().expect("Failed to initialize schema");
        AutobotRepository::new(db.pool)
    }

    #[test]
    fn test_create_and_lookup() {
        let repo = setup_repo();
        let id = repo
            .create("Bret", "Leanne Graham", "Sincere@april.biz")
            .expect("Failed to create autobot");

        let autobots = repo.list(10).expect("Failed to list autobots");
        assert_eq!(autobots.len(), 1);
        let autobot = &autobots[0];
        assert_eq!(autobot.id, id);
        assert_eq!(autobot.name, "Leanne Graham");
        assert_eq!(autobot.email, "Sincere@april.biz");

        assert!(repo.username_exists("Bret").unwrap());
        assert!(!repo.username_exists("Antonette").unwrap());
    }

    #[test]
    fn test_duplicate_username_rejected() {
        let repo = setup_repo();
        repo.create("Bret", "Leanne Graham", "Sincere@april.biz").unwrap();
        assert!(repo.create("Bret", "Someone Else", "other@example.com").is_err());
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn test_list_respects_limit_and_order() {
        let repo = setup_repo();
        for i in 0..15 {
            repo.create(&format!("bot{:02}", i), "Bot", "bot@example.com").unwrap();
        }

        let autobots = repo.list(10).unwrap();
        assert_eq!(autobots.len(), 10);
        assert!(autobots.windows(2).all(|w| w[0].id < w[1].id));
        assert_eq!(autobots[0].username, "bot00");
        assert_eq!(repo.count().unwrap(), 15);
    }
}
