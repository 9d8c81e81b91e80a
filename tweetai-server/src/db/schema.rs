/// SQL schema for the TweetAI database
/// Creates all tables with foreign keys and the indexes used by the API queries
pub const SCHEMA: &str = r#"
-- Autobots table
CREATE TABLE IF NOT EXISTS autobots (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL,
    name TEXT NOT NULL,
    email TEXT NOT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_autobots_username ON autobots(username);

-- Posts table
CREATE TABLE IF NOT EXISTS posts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    body TEXT NOT NULL,
    autobot_id INTEGER NOT NULL,
    FOREIGN KEY (autobot_id) REFERENCES autobots(id)
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_posts_title ON posts(title);
CREATE INDEX IF NOT EXISTS idx_posts_autobot_id ON posts(autobot_id);

-- Comments table
CREATE TABLE IF NOT EXISTS comments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    post_id INTEGER NOT NULL,
    body TEXT NOT NULL,
    FOREIGN KEY (post_id) REFERENCES posts(id)
);

CREATE INDEX IF NOT EXISTS idx_comments_post_id ON comments(post_id);
"#;

/// Demo data for local development
/// Usernames and titles do not collide with the placeholder API, so the
/// population job still inserts its own records on top of these.
/// Every statement is idempotent.
pub const DEMO_DATA: &str = r#"
INSERT OR IGNORE INTO autobots (username, name, email) VALUES
    ('optimus', 'Optimus Prime', 'optimus@autobots.example'),
    ('bumblebee', 'Bumblebee', 'bumblebee@autobots.example');

INSERT OR IGNORE INTO posts (title, body, autobot_id)
    SELECT 'roll out', 'Autobots, transform and roll out.', id
    FROM autobots WHERE username = 'optimus';

INSERT OR IGNORE INTO posts (title, body, autobot_id)
    SELECT 'radio days', 'Speaking through the radio again today.', id
    FROM autobots WHERE username = 'bumblebee';

INSERT INTO comments (post_id, body)
    SELECT p.id, 'Right behind you, Prime.'
    FROM posts p
    WHERE p.title = 'roll out'
      AND NOT EXISTS (
          SELECT 1 FROM comments c
          WHERE c.post_id = p.id AND c.body = 'Right behind you, Prime.'
      );

INSERT INTO comments (post_id, body)
    SELECT p.id, 'Loud and clear.'
    FROM posts p
    WHERE p.title = 'radio days'
      AND NOT EXISTS (
          SELECT 1 FROM comments c
          WHERE c.post_id = p.id AND c.body = 'Loud and clear.'
      );
"#;
