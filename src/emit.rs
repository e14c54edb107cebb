use chrono::{DateTime, Local};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::results::Candidate;
use crate::utils::sanitize_filename;

/// `<dir>/<prefix>_<YYYYmmdd_HHMM>.json`
pub fn output_path(dir: &Path, prefix: &str, now: DateTime<Local>) -> PathBuf {
    let file_name = format!(
        "{}_{}.json",
        sanitize_filename(prefix),
        now.format("%Y%m%d_%H%M")
    );
    dir.join(file_name)
}

/// Write listings as two-space indented UTF-8 JSON
pub fn write_listings(path: &Path, listings: &[Candidate]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, listings)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Write listings to a fresh timestamped file in `dir` and return its path
pub fn emit(dir: &Path, prefix: &str, listings: &[Candidate]) -> Result<PathBuf> {
    let path = output_path(dir, prefix, Local::now());
    write_listings(&path, listings)?;
    ::log::info!("Saved {} listings to {}", listings.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn scratch_dir(label: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        std::env::temp_dir().join(format!("job-harvest-{label}-{}-{nanos}", std::process::id()))
    }

    #[test]
    fn test_output_path_is_timestamped() {
        let now = Local.with_ymd_and_hms(2025, 3, 7, 9, 5, 59).unwrap();
        let path = output_path(Path::new("out"), "linkedin_uk_jobs", now);
        assert_eq!(path, Path::new("out").join("linkedin_uk_jobs_20250307_0905.json"));
    }

    #[test]
    fn test_emit_writes_indented_utf8_json() {
        let dir = scratch_dir("emit");
        let mut candidate = Candidate::new(
            "Økonomimedarbejder",
            "https://dk.linkedin.com/jobs/view/7",
            "Send din ansøgning til job@firma.dk",
        );
        candidate.emails = vec!["job@firma.dk".to_string()];

        let path = emit(&dir, "linkedin_denmark_jobs", &[candidate.clone()]).unwrap();
        assert!(path.starts_with(&dir));

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("Økonomimedarbejder"));
        assert!(written.contains("\n  {\n    \"title\""));

        let parsed: Vec<Candidate> = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed, vec![candidate]);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_emit_empty_list() {
        let dir = scratch_dir("emit-empty");
        let path = emit(&dir, "empty", &[]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap().trim(), "[]");
        fs::remove_dir_all(&dir).unwrap();
    }
}
