use super::base::{MeetingSink, StorageError};
use crate::meeting::Meeting;
use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Writes meetings as JSON lines, one file per spider per run:
/// `<base>/<spider>/<YYYYmmdd_HHMMSS>_<uuid>.jsonl`.
#[derive(Clone)]
pub struct DiskStorage {
    base_path: PathBuf,
    run_name: String,
}

impl DiskStorage {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Result<Self, StorageError> {
        let base_path = base_path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path)?;
        let run_name = format!("{}_{}", Utc::now().format("%Y%m%d_%H%M%S"), Uuid::now_v7());
        Ok(Self {
            base_path,
            run_name,
        })
    }

    pub fn output_path(&self, spider: &str) -> PathBuf {
        self.base_path
            .join(spider)
            .join(format!("{}.jsonl", self.run_name))
    }
}

#[async_trait]
impl MeetingSink for DiskStorage {
    async fn store(&self, spider: &str, meeting: &Meeting) -> Result<(), StorageError> {
        let path = self.output_path(spider);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let line = serde_json::to_string(meeting)?;
        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        writeln!(file, "{}", line)?;

        debug!("Stored meeting {} in {}", meeting.id, path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meeting::{Classification, MeetingDraft};
    use crate::Normalizer;
    use chrono::NaiveDate;

    fn meeting(title: &str) -> Meeting {
        let start = NaiveDate::from_ymd_opt(2019, 3, 14)
            .unwrap()
            .and_hms_opt(13, 30, 0);
        Normalizer::new("chi_standards_tests")
            .finalize(
                MeetingDraft::new(title, Classification::Committee, "https://example.com")
                    .with_start(start),
                start.unwrap(),
            )
            .unwrap()
    }

    #[tokio::test]
    async fn test_meetings_appended_as_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let storage = DiskStorage::new(dir.path()).unwrap();

        storage
            .store("chi_standards_tests", &meeting("First"))
            .await
            .unwrap();
        storage
            .store("chi_standards_tests", &meeting("Second"))
            .await
            .unwrap();

        let path = storage.output_path("chi_standards_tests");
        assert!(path.starts_with(dir.path().join("chi_standards_tests")));

        let contents = fs::read_to_string(path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: Meeting = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first.id, "chi_standards_tests/201903141330/x/first");
        assert!(first.links.is_empty());
    }
}
