//! `.env` file rendering and writing.

use std::fs;
use std::path::Path;

use tracing::{info, warn};

use super::error::DeployError;
use super::fields::ConfigRecord;

const HEADER: &[&str] = &[
    "# ListPull Configuration",
    "# Generated by listpull-deploy",
    "# Rebuild container after changes: docker compose up -d --build",
    "",
];

/// Format a single `KEY=VALUE` line.
///
/// Values containing a space or an opening parenthesis are double-quoted.
pub fn format_line(key: &str, value: &str) -> String {
    if value.contains(' ') || value.contains('(') {
        format!("{}=\"{}\"", key, value)
    } else {
        format!("{}={}", key, value)
    }
}

/// Render the full file content, header included.
pub fn render(record: &ConfigRecord) -> String {
    let mut lines: Vec<String> = HEADER.iter().map(|l| l.to_string()).collect();
    lines.extend(record.iter().map(|(k, v)| format_line(k, v)));

    let mut content = lines.join("\n");
    content.push('\n');
    content
}

/// Write the record to `path`, replacing any existing file.
pub fn write(path: &Path, record: &ConfigRecord) -> Result<(), DeployError> {
    if record.is_empty() {
        warn!(path = %path.display(), "Writing environment file without entries");
    }
    fs::write(path, render(record))?;
    info!(path = %path.display(), entries = record.len(), "Wrote environment file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ConfigRecord {
        let mut record = ConfigRecord::new();
        record.insert("JWT_SECRET", "abc123");
        record.insert("VITE_STORE_NAME", "My Store");
        record.insert("VITE_STORE_PHONE", "(555) 123-4567");
        record.insert("SMTP_HOST", "");
        record
    }

    #[test]
    fn test_format_line_quoting() {
        assert_eq!(format_line("A", "plain"), "A=plain");
        assert_eq!(format_line("A", "two words"), "A=\"two words\"");
        assert_eq!(format_line("A", "(x"), "A=\"(x\"");
        assert_eq!(format_line("A", ""), "A=");
        assert_eq!(format_line("A", "a@b.com"), "A=a@b.com");
    }

    #[test]
    fn test_render_has_header_and_one_line_per_entry() {
        let content = render(&sample());
        assert!(content.starts_with("# ListPull Configuration\n"));
        assert!(content.ends_with('\n'));

        let body: Vec<_> = content
            .lines()
            .filter(|l| !l.starts_with('#') && !l.is_empty())
            .collect();
        assert_eq!(
            body,
            vec![
                "JWT_SECRET=abc123",
                "VITE_STORE_NAME=\"My Store\"",
                "VITE_STORE_PHONE=\"(555) 123-4567\"",
                "SMTP_HOST=",
            ]
        );
    }

    #[test]
    fn test_write_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        fs::write(&path, "STALE=1\n").unwrap();

        write(&path, &sample()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(!content.contains("STALE"));
        assert!(content.contains("JWT_SECRET=abc123\n"));
    }
}
