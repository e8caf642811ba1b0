//! Post filenames and the YAML metadata header.

use chrono::DateTime;
use regex::Regex;
use serde_yaml::{Mapping, Value};
use std::sync::OnceLock;

use crate::db::NodeRecord;
use crate::error::{MigrateError, Result};

pub const POST_EXTENSION: &str = "md";
pub const LAYOUT: &str = "post";

/// `YYYY-MM-DD-<slug>.md`, with the date taken from `created` in UTC.
pub fn post_filename(nid: i64, created: i64, slug: &str) -> Result<String> {
    let time = DateTime::from_timestamp(created, 0)
        .ok_or(MigrateError::InvalidTimestamp { nid, created })?;
    Ok(format!(
        "{}{}.{}",
        time.format("%Y-%m-%d-"),
        slug,
        POST_EXTENSION
    ))
}

/// Ordered header fields. Empty or absent values are never inserted,
/// except `layout`, which is always first.
#[derive(Debug, Clone, PartialEq)]
pub struct Metadata {
    fields: Mapping,
}

impl Metadata {
    pub fn new() -> Self {
        let mut fields = Mapping::new();
        fields.insert(key("layout"), Value::String(LAYOUT.to_string()));
        Metadata { fields }
    }

    pub fn text(mut self, name: &str, value: Option<&str>) -> Self {
        if let Some(v) = value.filter(|v| !v.is_empty()) {
            self.fields.insert(key(name), Value::String(v.to_string()));
        }
        self
    }

    pub fn number(mut self, name: &str, value: i64) -> Self {
        self.fields.insert(key(name), Value::Number(value.into()));
        self
    }

    pub fn for_node(node: &NodeRecord) -> Self {
        Metadata::new()
            .text("title", Some(node.title.as_str()))
            .text("permalink", Some(node.permalink().as_str()))
            .text("excerpt", node.excerpt.as_deref())
            .number("created", node.created)
            .text("tags", node.tags.as_deref())
    }

    /// Render as a YAML document, starting with the `---` document marker.
    /// Strings that a YAML 1.1 reader (Jekyll) would resolve to a bool,
    /// null, number or timestamp are single-quoted.
    pub fn render(&self) -> Result<String> {
        let mut out = String::from("---\n");
        for (k, v) in &self.fields {
            match (k.as_str(), v.as_str()) {
                (Some(name), Some(s)) if yaml11_implicit(s) => {
                    out.push_str(&format!("{}: {}\n", name, single_quoted(s)));
                }
                _ => {
                    let mut entry = Mapping::new();
                    entry.insert(k.clone(), v.clone());
                    out.push_str(&serde_yaml::to_string(&entry)?);
                }
            }
        }
        Ok(out)
    }
}

/// True when a plain scalar `s` would not load as a string under the
/// YAML 1.1 type repository.
fn yaml11_implicit(s: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        let patterns = [
            // bool
            r"y|Y|yes|Yes|YES|n|N|no|No|NO|true|True|TRUE|false|False|FALSE|on|On|ON|off|Off|OFF",
            // null
            r"~|null|Null|NULL",
            // int: binary, octal, decimal, hex, sexagesimal
            r"[-+]?0b[0-1_]+",
            r"[-+]?0[0-7_]+",
            r"[-+]?(0|[1-9][0-9_,]*)",
            r"[-+]?0x[0-9a-fA-F_]+",
            r"[-+]?[1-9][0-9_]*(:[0-5]?[0-9])+",
            // float
            r"[-+]?([0-9][0-9_,]*)?\.[0-9.]*([eE][-+]?[0-9]+)?",
            r"[-+]?[0-9][0-9_]*(:[0-5]?[0-9])+\.[0-9_]*",
            r"[-+]?\.(inf|Inf|INF)",
            r"\.(nan|NaN|NAN)",
            // timestamp
            r"[0-9]{4}-[0-9]{1,2}-[0-9]{1,2}(([Tt]|[ \t]+)[0-9]{1,2}:[0-9]{2}:[0-9]{2}(\.[0-9]*)?([ \t]*(Z|[-+][0-9]{1,2}(:[0-9]{2})?))?)?",
            // merge and value keys
            r"<<|=",
        ];
        Regex::new(&format!("^(?:{})$", patterns.join("|"))).unwrap()
    });
    re.is_match(s)
}

fn single_quoted(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

impl Default for Metadata {
    fn default() -> Self {
        Self::new()
    }
}

fn key(name: &str) -> Value {
    Value::String(name.to_string())
}

#[cfg(test)]
impl Metadata {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn keys(&self) -> Vec<&str> {
        self.fields.keys().filter_map(Value::as_str).collect()
    }
}
