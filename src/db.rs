use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{Connection, Transaction};

use crate::tree::{Channel, Node, TreeCounts};

pub fn connect(path: &Path) -> Result<Connection> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS channels (
            source_id     TEXT PRIMARY KEY,
            source_domain TEXT NOT NULL,
            title         TEXT NOT NULL,
            language      TEXT NOT NULL,
            description   TEXT,
            thumbnail     TEXT,
            updated_at    TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS nodes (
            id               INTEGER PRIMARY KEY,
            channel_id       TEXT NOT NULL REFERENCES channels(source_id),
            parent_id        INTEGER REFERENCES nodes(id),
            position         INTEGER NOT NULL,
            kind             TEXT NOT NULL CHECK(kind IN ('topic','video','exercise')),
            source_id        TEXT NOT NULL,
            title            TEXT NOT NULL,
            thumbnail        TEXT,
            license          TEXT,
            copyright_holder TEXT,
            language         TEXT,
            youtube_id       TEXT,
            mastery_model    TEXT,
            randomize        BOOLEAN
        );
        CREATE INDEX IF NOT EXISTS idx_nodes_parent ON nodes(parent_id);
        CREATE INDEX IF NOT EXISTS idx_nodes_kind ON nodes(kind);

        CREATE TABLE IF NOT EXISTS questions (
            id              INTEGER PRIMARY KEY,
            node_id         INTEGER NOT NULL REFERENCES nodes(id),
            question_id     TEXT NOT NULL,
            kind            TEXT NOT NULL CHECK(kind IN ('single_selection','multiple_selection')),
            prompt          TEXT NOT NULL,
            all_answers     TEXT NOT NULL,
            correct_answers TEXT NOT NULL,
            UNIQUE(node_id, question_id)
        );

        CREATE TABLE IF NOT EXISTS runs (
            id          INTEGER PRIMARY KEY,
            channel_id  TEXT NOT NULL,
            topics      INTEGER NOT NULL,
            videos      INTEGER NOT NULL,
            exercises   INTEGER NOT NULL,
            questions   INTEGER NOT NULL,
            finished_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        ",
    )?;
    Ok(())
}

/// Replace the stored tree of `channel` with the given one, in one transaction.
pub fn save_channel(conn: &Connection, channel: &Channel) -> Result<TreeCounts> {
    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "DELETE FROM questions WHERE node_id IN (SELECT id FROM nodes WHERE channel_id = ?1)",
        [&channel.source_id],
    )?;
    tx.execute("DELETE FROM nodes WHERE channel_id = ?1", [&channel.source_id])?;
    tx.execute(
        "INSERT OR REPLACE INTO channels
         (source_id, source_domain, title, language, description, thumbnail)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        rusqlite::params![
            channel.source_id, channel.source_domain, channel.title,
            channel.language, channel.description, channel.thumbnail,
        ],
    )?;

    let mut counts = TreeCounts::default();
    save_nodes(&tx, &channel.source_id, None, &channel.children, &mut counts)?;

    tx.execute(
        "INSERT INTO runs (channel_id, topics, videos, exercises, questions)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![
            channel.source_id, counts.topics, counts.videos, counts.exercises, counts.questions,
        ],
    )?;
    tx.commit()?;
    Ok(counts)
}

fn save_nodes(
    tx: &Transaction,
    channel_id: &str,
    parent: Option<i64>,
    nodes: &[Node],
    counts: &mut TreeCounts,
) -> Result<()> {
    let mut node_stmt = tx.prepare_cached(
        "INSERT INTO nodes
         (channel_id, parent_id, position, kind, source_id, title, thumbnail, license,
          copyright_holder, language, youtube_id, mastery_model, randomize)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
    )?;

    for (position, node) in nodes.iter().enumerate() {
        let (thumbnail, license, language, youtube_id, mastery) = match node {
            Node::Topic(t) => (t.thumbnail.as_deref(), None, None, None, None),
            Node::Video(v) => (
                None,
                Some(&v.license),
                Some(v.language.as_str()),
                Some(v.video.youtube_id.as_str()),
                None,
            ),
            Node::Exercise(e) => (None, Some(&e.license), Some(e.language.as_str()), None, Some(&e.mastery)),
        };
        node_stmt.execute(rusqlite::params![
            channel_id,
            parent,
            position as i64,
            node.kind_name(),
            node.source_id(),
            node.title(),
            thumbnail,
            license.map(|l| l.kind),
            license.map(|l| l.copyright_holder.as_str()),
            language,
            youtube_id,
            mastery.map(|m| m.mastery_model),
            mastery.map(|m| m.randomize),
        ])?;
        let node_id = tx.last_insert_rowid();

        match node {
            Node::Topic(t) => {
                counts.topics += 1;
                save_nodes(tx, channel_id, Some(node_id), &t.children, counts)?;
            }
            Node::Video(_) => counts.videos += 1,
            Node::Exercise(e) => {
                counts.exercises += 1;
                let mut q_stmt = tx.prepare_cached(
                    "INSERT INTO questions
                     (node_id, question_id, kind, prompt, all_answers, correct_answers)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                )?;
                for question in &e.questions {
                    let q = question.inner();
                    q_stmt.execute(rusqlite::params![
                        node_id,
                        q.id,
                        question.kind_name(),
                        q.prompt,
                        serde_json::to_string(&q.all_answers)?,
                        serde_json::to_string(&q.correct_answers)?,
                    ])?;
                    counts.questions += 1;
                }
            }
        }
    }
    Ok(())
}

pub struct StoreStats {
    pub channels: i64,
    pub topics: i64,
    pub videos: i64,
    pub exercises: i64,
    pub questions: i64,
    pub last_run: Option<String>,
}

pub fn get_stats(conn: &Connection) -> Result<StoreStats> {
    let count_kind = |kind: &str| -> Result<i64> {
        Ok(conn.query_row("SELECT COUNT(*) FROM nodes WHERE kind = ?1", [kind], |r| r.get(0))?)
    };
    let last_run = conn
        .query_row("SELECT finished_at FROM runs ORDER BY id DESC LIMIT 1", [], |r| r.get(0))
        .ok();

    Ok(StoreStats {
        channels: conn.query_row("SELECT COUNT(*) FROM channels", [], |r| r.get(0))?,
        topics: count_kind("topic")?,
        videos: count_kind("video")?,
        exercises: count_kind("exercise")?,
        questions: conn.query_row("SELECT COUNT(*) FROM questions", [], |r| r.get(0))?,
        last_run,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chef::GarageChef;
    use crate::fetch::LocalPages;

    fn fixture_channel() -> Channel {
        let pages = LocalPages::new("tests/fixtures");
        GarageChef::new(&pages, "https://learndigital.withgoogle.com/garagedigital/", "es")
            .construct_channel()
            .unwrap()
    }

    fn memory_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn
    }

    #[test]
    fn saves_whole_tree() {
        let conn = memory_db();
        let channel = fixture_channel();
        let counts = save_channel(&conn, &channel).unwrap();
        assert_eq!(counts, channel.counts());

        let stats = get_stats(&conn).unwrap();
        assert_eq!(stats.channels, 1);
        assert_eq!(stats.topics as usize, counts.topics);
        assert_eq!(stats.videos as usize, counts.videos);
        assert_eq!(stats.questions as usize, counts.questions);
        assert!(stats.last_run.is_some());
    }

    #[test]
    fn rerun_replaces_previous_tree() {
        let conn = memory_db();
        let channel = fixture_channel();
        save_channel(&conn, &channel).unwrap();
        save_channel(&conn, &channel).unwrap();

        let stats = get_stats(&conn).unwrap();
        assert_eq!(stats.exercises as usize, channel.counts().exercises);
        let runs: i64 = conn.query_row("SELECT COUNT(*) FROM runs", [], |r| r.get(0)).unwrap();
        assert_eq!(runs, 2);
    }

    #[test]
    fn answers_stored_as_json() {
        let conn = memory_db();
        save_channel(&conn, &fixture_channel()).unwrap();
        let (kind, correct): (String, String) = conn
            .query_row("SELECT kind, correct_answers FROM questions LIMIT 1", [], |r| {
                Ok((r.get(0)?, r.get(1)?))
            })
            .unwrap();
        assert_eq!(kind, "multiple_selection");
        let correct: Vec<String> = serde_json::from_str(&correct).unwrap();
        assert_eq!(correct.len(), 2);
    }

    #[test]
    fn topics_keep_parent_links() {
        let conn = memory_db();
        save_channel(&conn, &fixture_channel()).unwrap();
        let roots: i64 = conn
            .query_row("SELECT COUNT(*) FROM nodes WHERE parent_id IS NULL", [], |r| r.get(0))
            .unwrap();
        assert_eq!(roots, 2);
    }
}
