//! Node → post pipeline: output bootstrap, per-record conversion, writing.

use indicatif::ProgressBar;
use rusqlite::Connection;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::db::{self, NodeRecord};
use crate::error::{MigrateError, Result};
use crate::frontmatter::{post_filename, Metadata};
use crate::slug::slugify;
use crate::writer::write_post;

pub const POSTS_DIR: &str = "_posts";
pub const DRAFTS_DIR: &str = "_drafts";
pub const LAYOUTS_DIR: &str = "_layouts";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Posts,
    Drafts,
}

impl Destination {
    pub fn for_status(status: i64) -> Self {
        if status == 1 {
            Destination::Posts
        } else {
            Destination::Drafts
        }
    }
}

/// Output directories under the site root.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    pub posts: PathBuf,
    pub drafts: PathBuf,
    pub layouts: PathBuf,
}

impl OutputLayout {
    pub fn under(root: &Path) -> Self {
        OutputLayout {
            posts: root.join(POSTS_DIR),
            drafts: root.join(DRAFTS_DIR),
            layouts: root.join(LAYOUTS_DIR),
        }
    }

    /// Create all three directories if they are missing.
    pub fn create(root: &Path) -> Result<Self> {
        let layout = Self::under(root);
        for dir in [&layout.posts, &layout.drafts, &layout.layouts] {
            fs::create_dir_all(dir).map_err(|e| MigrateError::io(dir, e))?;
        }
        Ok(layout)
    }

    pub fn dir(&self, dest: Destination) -> &Path {
        match dest {
            Destination::Posts => &self.posts,
            Destination::Drafts => &self.drafts,
        }
    }
}

/// A node converted and ready to write.
#[derive(Debug, Clone)]
pub struct Post {
    pub nid: i64,
    pub destination: Destination,
    pub slug: String,
    pub filename: String,
    pub metadata: Metadata,
    pub body: Option<String>,
}

pub fn convert(node: NodeRecord) -> Result<Post> {
    let slug = slugify(&node.title);
    let filename = post_filename(node.nid, node.created, &slug)?;
    let metadata = Metadata::for_node(&node);
    Ok(Post {
        nid: node.nid,
        destination: Destination::for_status(node.status),
        slug,
        filename,
        metadata,
        body: node.body,
    })
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MigrationStats {
    pub published: usize,
    pub drafts: usize,
    pub empty_slugs: usize,
    pub collisions: usize,
}

impl MigrationStats {
    pub fn total(&self) -> usize {
        self.published + self.drafts
    }
}

/// Stream every node from `sql`, writing each post before the next row is
/// read. Stops at the first error; files already written stay in place.
/// Warnings are logged with `pb` suspended so they don't land on the spinner.
pub fn run(
    conn: &Connection,
    sql: &str,
    layout: &OutputLayout,
    pb: &ProgressBar,
) -> Result<MigrationStats> {
    let mut stats = MigrationStats::default();
    let mut written: HashSet<PathBuf> = HashSet::new();

    db::for_each_node(conn, sql, |node| {
        let changed = node.changed;
        let post = convert(node)?;

        if post.slug.is_empty() {
            stats.empty_slugs += 1;
            pb.suspend(|| {
                warn!("Node {} has an empty slug, writing {}", post.nid, post.filename)
            });
        }

        let dir = layout.dir(post.destination);
        let metadata = post.metadata.render()?;
        let path = write_post(dir, &post.filename, &metadata, post.body.as_deref())?;
        debug!(nid = post.nid, changed, path = %path.display(), "wrote post");

        if !written.insert(path.clone()) {
            stats.collisions += 1;
            pb.suspend(|| warn!("Node {} overwrote {}", post.nid, path.display()));
        }
        match post.destination {
            Destination::Posts => stats.published += 1,
            Destination::Drafts => stats.drafts += 1,
        }
        pb.inc(1);
        Ok(())
    })?;

    Ok(stats)
}
