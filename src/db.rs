//! Source database: connection and streaming extraction of blog nodes.

use rusqlite::{Connection, OpenFlags, Row};
use std::path::Path;
use tracing::info;

use crate::error::Result;
use crate::settings::Settings;

/// One extracted blog node, as returned by the extraction query.
#[derive(Debug, Clone)]
pub struct NodeRecord {
    pub nid: i64,
    pub title: String,
    pub created: i64,
    pub changed: i64,
    pub body: Option<String>,
    pub excerpt: Option<String>,
    pub status: i64,
    pub alias: String,
    pub tags: Option<String>,
}

impl NodeRecord {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(NodeRecord {
            nid: row.get("nid")?,
            title: row.get::<_, Option<String>>("title")?.unwrap_or_default(),
            created: row.get("created")?,
            changed: row.get("changed")?,
            body: row.get("body_value")?,
            excerpt: row.get("body_summary")?,
            status: row.get("status")?,
            alias: row.get("alias")?,
            tags: row.get("tags")?,
        })
    }

    pub fn permalink(&self) -> String {
        format!("/{}", self.alias)
    }
}

/// Open the Drupal database read-only. SQLite does not authenticate, so the
/// user, password and host settings only show up in the log line.
pub fn connect(settings: &Settings) -> Result<Connection> {
    info!(
        "Connecting to {}@{}/{}",
        settings.user, settings.host, settings.dbname
    );
    open_read_only(Path::new(&settings.dbname))
}

fn open_read_only(path: &Path) -> Result<Connection> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    Ok(conn)
}

/// Run `sql` and hand each node to `f` in cursor order. Only one record is
/// alive at a time; the first error from `f` stops the cursor and is returned.
pub fn for_each_node<F>(conn: &Connection, sql: &str, mut f: F) -> Result<usize>
where
    F: FnMut(NodeRecord) -> Result<()>,
{
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query([])?;
    let mut count = 0;
    while let Some(row) = rows.next()? {
        f(NodeRecord::from_row(row)?)?;
        count += 1;
    }
    Ok(count)
}
