//! Website sync: `universities.json` export and the embedded data block of
//! `universities.html`

use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};
use rusqlite::Connection;
use tracing::{error, info, warn};

use crate::config::SiteConfig;
use crate::db::Database;
use crate::error::{Result, StoreError};
use crate::models::UniversityExport;

static EMBEDDED_DATA: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)window\.EMBEDDED_UNIVERSITIES = \[.*?\];").expect("embedded data pattern")
});
static UNIQUE_COUNTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<strong id="uniqueUniCount">\d+</strong>"#).expect("counter pattern"));
static TOTAL_COUNTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<strong id="totalSpecsCount">\d+</strong>"#).expect("counter pattern"));

/// Outcome of rewriting the HTML document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HtmlUpdate {
    Updated { rows: usize, unique: usize },
    /// Target document does not exist; nothing was written
    Missing,
}

fn export_rows(conn: &Connection) -> Result<Vec<UniversityExport>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT u.name, u.location, u.score_min, u.score_max, u.url, s.name AS specialization
        FROM universities u
        LEFT JOIN specializations s ON s.id = u.specialization_id
        ORDER BY u.name COLLATE NOCASE, u.id
        "#,
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok(UniversityExport {
                name: row.get(0)?,
                city: row.get(1)?,
                score_min: row.get(2)?,
                score_max: row.get(3)?,
                url: row.get(4)?,
                specialization: row.get(5)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

fn to_pretty_json(rows: &[UniversityExport]) -> Result<String> {
    serde_json::to_string_pretty(rows).map_err(|e| StoreError::json("university export", e))
}

/// Substitute the data block and both counters in `html`
pub fn render_html(html: &str, rows: &[UniversityExport]) -> Result<String> {
    let data = format!("window.EMBEDDED_UNIVERSITIES = {};", to_pretty_json(rows)?);
    let unique = rows.iter().map(|r| r.name.as_str()).collect::<HashSet<_>>().len();

    let html = EMBEDDED_DATA.replace_all(html, NoExpand(&data));
    let unique_tag = format!(r#"<strong id="uniqueUniCount">{unique}</strong>"#);
    let html = UNIQUE_COUNTER.replace_all(&html, NoExpand(&unique_tag));
    let total_tag = format!(r#"<strong id="totalSpecsCount">{}</strong>"#, rows.len());
    let html = TOTAL_COUNTER.replace_all(&html, NoExpand(&total_tag));

    Ok(html.into_owned())
}

impl Database {
    /// Universities joined with their specialization name, ordered by name
    pub fn university_export(&self) -> Result<Vec<UniversityExport>> {
        let conn = self.conn()?;
        export_rows(&conn)
    }

    /// Write every university row to `path` as a pretty JSON array.
    /// Returns the number of entries written.
    pub fn export_universities_to_json(&self, path: &Path) -> Result<usize> {
        let conn = self.conn()?;
        let rows = export_rows(&conn)?;
        fs::write(path, to_pretty_json(&rows)?)?;
        Ok(rows.len())
    }

    /// Rewrite the embedded data block and counters of the HTML document at `path`.
    pub fn update_universities_html(&self, path: &Path) -> Result<HtmlUpdate> {
        let rows = self.university_export()?;

        let html = match fs::read_to_string(path) {
            Ok(html) => html,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(path = %path.display(), "website document not found, skipping update");
                return Ok(HtmlUpdate::Missing);
            }
            Err(e) => return Err(e.into()),
        };

        fs::write(path, render_html(&html, &rows)?)?;

        let unique = rows.iter().map(|r| r.name.as_str()).collect::<HashSet<_>>().len();
        info!(path = %path.display(), rows = rows.len(), unique, "website document updated");
        Ok(HtmlUpdate::Updated {
            rows: rows.len(),
            unique,
        })
    }

    /// Export JSON then refresh the HTML document. Never raises; failures
    /// are logged and reported as `false`.
    pub fn sync_website_data(&self, site: &SiteConfig) -> bool {
        match self.export_universities_to_json(&site.json_path) {
            Ok(count) => {
                info!(count, path = %site.json_path.display(), "universities exported");
            }
            Err(err) => {
                error!(error = %err, path = %site.json_path.display(), "website export failed");
                return false;
            }
        }

        match self.update_universities_html(&site.html_path) {
            Ok(_) => true,
            Err(err) => {
                error!(error = %err, path = %site.html_path.display(), "website document update failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, spec: Option<&str>) -> UniversityExport {
        UniversityExport {
            name: name.to_string(),
            city: Some("Москва".into()),
            score_min: Some(80.0),
            score_max: Some(95.0),
            url: Some("https://example.ru/$1".into()),
            specialization: spec.map(str::to_string),
        }
    }

    const PAGE: &str = r#"<html>
<p><strong id="uniqueUniCount">0</strong> / <strong id="totalSpecsCount">0</strong></p>
<script>
window.EMBEDDED_UNIVERSITIES = [
  {"name": "old"}
];
</script>
</html>"#;

    #[test]
    fn render_replaces_block_and_counters() {
        let rows = vec![row("МГУ", Some("Data Science")), row("МГУ", None), row("ИТМО", None)];
        let out = render_html(PAGE, &rows).unwrap();

        assert!(out.contains(r#"<strong id="uniqueUniCount">2</strong>"#));
        assert!(out.contains(r#"<strong id="totalSpecsCount">3</strong>"#));
        assert!(!out.contains("\"old\""));
        assert!(out.contains("\"МГУ\""));
        // Replacement text is literal
        assert!(out.contains("https://example.ru/$1"));
        assert!(out.starts_with("<html>") && out.ends_with("</html>"));
    }

    #[test]
    fn render_without_markers_is_unchanged() {
        let html = "<html><body>no data here</body></html>";
        assert_eq!(render_html(html, &[row("A", None)]).unwrap(), html);
    }

    #[test]
    fn missing_document_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open_in_memory().unwrap();
        let outcome = db
            .update_universities_html(&dir.path().join("universities.html"))
            .unwrap();
        assert_eq!(outcome, HtmlUpdate::Missing);
        assert!(!dir.path().join("universities.html").exists());
    }
}
