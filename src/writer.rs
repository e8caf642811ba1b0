//! Writes one post file: metadata block, `---` separator, raw body.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{MigrateError, Result};

pub const SEPARATOR: &str = "---";

/// Create or truncate `dir/filename` and write the post. The directory must
/// already exist.
pub fn write_post(dir: &Path, filename: &str, metadata: &str, body: Option<&str>) -> Result<PathBuf> {
    let path = dir.join(filename);
    let file = File::create(&path).map_err(|e| MigrateError::io(&path, e))?;
    let mut out = BufWriter::new(file);

    write_parts(&mut out, metadata, body).map_err(|e| MigrateError::io(&path, e))?;
    Ok(path)
}

fn write_parts<W: Write>(out: &mut W, metadata: &str, body: Option<&str>) -> std::io::Result<()> {
    put_line(out, metadata)?;
    put_line(out, SEPARATOR)?;
    put_line(out, body.unwrap_or(""))?;
    out.flush()
}

/// Write `text` followed by a newline unless it already ends with one.
fn put_line<W: Write>(out: &mut W, text: &str) -> std::io::Result<()> {
    out.write_all(text.as_bytes())?;
    if !text.ends_with('\n') {
        out.write_all(b"\n")?;
    }
    Ok(())
}
