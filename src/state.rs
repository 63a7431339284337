use std::path::Path;

use rusqlite::{Connection, OptionalExtension, params};

use crate::catalog::resolve_media_path;
use crate::error::{Error, Result};
use crate::logging;
use crate::models::{DEFAULT_POSITION, VerseRecord};
use crate::navigation::PositionStore;

/// The SQLite file holding the verse catalog and the last viewed position.
pub struct State {
    conn: Connection,
}

impl State {
    pub fn open(filepath: &Path) -> Result<Self> {
        // Ensure the parent directory exists
        if let Some(parent) = filepath.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let unavailable = |source: rusqlite::Error| Error::DataUnavailable {
            reason: format!("could not open {}: {source}", filepath.display()),
            source: Some(source),
        };

        let conn = Connection::open(filepath).map_err(unavailable)?;

        // Tables are created only if missing, so this is safe to run on an
        // existing database. A file that is not SQLite fails here.
        Self::init_db(&conn).map_err(unavailable)?;

        Ok(Self { conn })
    }

    fn init_db(conn: &Connection) -> rusqlite::Result<()> {
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS current_position (
                current_aya INTEGER
            );

            CREATE TABLE IF NOT EXISTS all_aya (
                id INTEGER PRIMARY KEY,
                audio TEXT,
                image TEXT,
                sura INTEGER,
                aya INTEGER,
                aya_suffix INTEGER,
                sura_name TEXT
            );
            ",
        )?;
        Ok(())
    }

    /// Every catalog row ordered by id, with filenames joined onto `media_root`.
    pub fn load_verses(&self, media_root: &Path) -> Result<Vec<VerseRecord>> {
        let unavailable = |source: rusqlite::Error| Error::DataUnavailable {
            reason: format!("could not read all_aya: {source}"),
            source: Some(source),
        };

        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, audio, image, sura, aya, aya_suffix, sura_name FROM all_aya ORDER BY id",
            )
            .map_err(unavailable)?;

        let verses_iter = stmt
            .query_map([], |row| {
                let audio: String = row.get(1)?;
                let image: String = row.get(2)?;
                let suffix: Option<u32> = row.get(5)?;
                Ok(VerseRecord {
                    id: row.get(0)?,
                    audio_path: resolve_media_path(media_root, &audio),
                    image_path: resolve_media_path(media_root, &image),
                    surah_number: row.get(3)?,
                    verse_number: row.get(4)?,
                    verse_suffix: suffix.filter(|s| *s != 0),
                    surah_name: row.get(6)?,
                })
            })
            .map_err(unavailable)?;

        let mut verses = Vec::new();
        for verse_result in verses_iter {
            verses.push(verse_result.map_err(unavailable)?);
        }

        logging::debug(format!("loaded {} verses from all_aya", verses.len()));
        Ok(verses)
    }
}

impl PositionStore for State {
    fn read_position(&self) -> Result<i64> {
        let tx = self.conn.unchecked_transaction()?;
        let stored: Option<i64> = tx
            .query_row("SELECT current_aya FROM current_position LIMIT 1", [], |row| {
                row.get(0)
            })
            .optional()?;

        let position = match stored {
            Some(position) => position,
            None => {
                logging::info("no stored position, starting at the first verse");
                tx.execute(
                    "INSERT INTO current_position (current_aya) VALUES (?)",
                    params![DEFAULT_POSITION],
                )?;
                DEFAULT_POSITION
            }
        };
        tx.commit()?;
        Ok(position)
    }

    fn write_position(&self, verse_id: i64) -> Result<()> {
        // Dropping the transaction on an early return rolls it back.
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM current_position", [])?;
        tx.execute(
            "INSERT INTO current_position (current_aya) VALUES (?)",
            params![verse_id],
        )?;
        tx.commit()?;
        Ok(())
    }
}
