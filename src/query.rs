//! Extraction query for Drupal 7 blog nodes.

use regex::{Captures, Regex};
use std::sync::OnceLock;

/// Base query, SQLite dialect. Prefixable table names are written with a
/// single space on each side so they can be rewritten as whole tokens.
pub const BASE_QUERY: &str = "
SELECT
    n.nid,
    n.title,
    n.created,
    n.changed,
    b.body_value,
    b.body_summary,
    n.status,
    l.alias,
    GROUP_CONCAT( d.name, ', ' ) AS tags

FROM url_alias l, node n
JOIN field_data_body b ON b.entity_id = n.nid
JOIN taxonomy_index t ON t.nid = n.nid
JOIN taxonomy_term_data d ON t.tid = d.tid

WHERE n.type = 'blog'
AND b.revision_id = n.vid
AND l.source = 'node/' || n.nid

GROUP BY n.nid
";

/// Tables that follow the site's table prefix. The taxonomy tables are
/// left alone.
pub const PREFIXED_TABLES: [&str; 3] = ["node", "field_data_body", "url_alias"];

fn table_token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let alternation = PREFIXED_TABLES.join("|");
        Regex::new(&format!(r"(\s)({})(\s)", alternation)).unwrap()
    })
}

/// Build the extraction query with every prefixable table name rewritten to
/// `<prefix><table>`. An empty prefix returns the base query untouched.
pub fn build_query(prefix: &str) -> String {
    if prefix.is_empty() {
        return BASE_QUERY.to_string();
    }
    table_token_re()
        .replace_all(BASE_QUERY, |caps: &Captures| {
            format!("{}{}{}{}", &caps[1], prefix, &caps[2], &caps[3])
        })
        .into_owned()
}
