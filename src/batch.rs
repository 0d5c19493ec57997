use anyhow::Context;
use std::ffi::OsString;
use std::fs;
use std::path::Path;

use crate::metadata::{AudioFormat, TagWriter};
use crate::parser;

/// Per-file result of one batch pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Updated { file: String },
    SkippedInvalidName { file: String },
    SkippedUnsupportedFormat { file: String },
    Failed { file: String, reason: String },
}

impl Outcome {
    pub fn file(&self) -> &str {
        match self {
            Outcome::Updated { file }
            | Outcome::SkippedInvalidName { file }
            | Outcome::SkippedUnsupportedFormat { file }
            | Outcome::Failed { file, .. } => file,
        }
    }

    /// Stable machine-readable label, used as the JSON event type.
    pub fn kind(&self) -> &'static str {
        match self {
            Outcome::Updated { .. } => "updated",
            Outcome::SkippedInvalidName { .. } => "skipped_invalid_name",
            Outcome::SkippedUnsupportedFormat { .. } => "skipped_unsupported_format",
            Outcome::Failed { .. } => "failed",
        }
    }

    /// One transcript line for this file.
    pub fn message(&self) -> String {
        match self {
            Outcome::Updated { file } => format!("Updated: {}", file),
            Outcome::SkippedInvalidName { file } => {
                format!("Skipped (invalid filename format): {}", file)
            }
            Outcome::SkippedUnsupportedFormat { file } => {
                format!("Skipped (unsupported format): {}", file)
            }
            Outcome::Failed { file, reason } => format!("Failed: {} — {}", file, reason),
        }
    }
}

/// Run-level tally. A failed write still counts as processed; only the
/// two skip classifications count as skipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub processed: usize,
    pub skipped: usize,
}

impl Summary {
    pub fn message(&self) -> String {
        format!(
            "Complete! Processed: {} | Skipped: {}",
            self.processed, self.skipped
        )
    }
}

/// Presentation seam. The batch run pushes every outcome through this so
/// the same core drives a CLI transcript, a GUI log pane, or a test
/// recorder without re-deriving any of the logic.
pub trait Report {
    fn begin(&self, directory: &Path);
    fn report(&self, outcome: &Outcome);
    fn finish(&self, summary: &Summary);
}

/// Walks one directory and updates every supported, well-named file.
pub struct BatchProcessor {
    writer: TagWriter,
}

impl BatchProcessor {
    pub fn new(writer: TagWriter) -> Self {
        Self { writer }
    }

    /// Process every entry of `directory` in lexicographic name order.
    ///
    /// Per-file problems become outcomes and the run keeps going; only a
    /// failure to list the directory itself aborts the whole run.
    pub fn run(&self, directory: &Path, reporter: &dyn Report) -> anyhow::Result<Summary> {
        let entries = fs::read_dir(directory)
            .with_context(|| format!("Failed to list directory: {}", directory.display()))?;

        let mut names: Vec<OsString> = Vec::new();
        for entry in entries {
            let entry = entry
                .with_context(|| format!("Failed to read entry in {}", directory.display()))?;
            names.push(entry.file_name());
        }
        names.sort();

        reporter.begin(directory);

        let mut summary = Summary::default();
        for name in &names {
            // transcript lines use the lossy name; the file itself is
            // opened under its real on-disk name
            let outcome = self.process_file(&directory.join(name), &name.to_string_lossy());
            match outcome {
                Outcome::Updated { .. } | Outcome::Failed { .. } => summary.processed += 1,
                Outcome::SkippedInvalidName { .. }
                | Outcome::SkippedUnsupportedFormat { .. } => summary.skipped += 1,
            }
            reporter.report(&outcome);
        }

        reporter.finish(&summary);
        Ok(summary)
    }

    fn process_file(&self, path: &Path, name: &str) -> Outcome {
        let Some(format) = AudioFormat::from_file_name(name) else {
            return Outcome::SkippedUnsupportedFormat {
                file: name.to_string(),
            };
        };

        let Some(metadata) = parser::parse_filename(name) else {
            return Outcome::SkippedInvalidName {
                file: name.to_string(),
            };
        };

        match self.writer.write(path, format, &metadata) {
            Ok(()) => Outcome::Updated {
                file: name.to_string(),
            },
            Err(e) => Outcome::Failed {
                file: name.to_string(),
                reason: format!("{e:#}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::PresetMetadata;
    use std::cell::RefCell;

    /// Collects everything the batch run emits, in order.
    #[derive(Default)]
    struct Recorder {
        outcomes: RefCell<Vec<Outcome>>,
        summaries: RefCell<Vec<Summary>>,
    }

    impl Report for Recorder {
        fn begin(&self, _directory: &Path) {}

        fn report(&self, outcome: &Outcome) {
            self.outcomes.borrow_mut().push(outcome.clone());
        }

        fn finish(&self, summary: &Summary) {
            self.summaries.borrow_mut().push(*summary);
        }
    }

    fn processor() -> BatchProcessor {
        BatchProcessor::new(TagWriter::new(PresetMetadata::default()))
    }

    #[test]
    fn test_mixed_directory_counts() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::File::create(dir.path().join("Alpha_2024-1122.mp3")).unwrap();
        std::fs::write(dir.path().join("Beta_2024-0101.m4a"), b"garbage").unwrap();
        std::fs::File::create(dir.path().join("Malformed.mp3")).unwrap();
        std::fs::File::create(dir.path().join("notes.txt")).unwrap();

        let recorder = Recorder::default();
        let summary = processor().run(dir.path(), &recorder).unwrap();

        assert_eq!(summary, Summary { processed: 2, skipped: 2 });
        assert_eq!(recorder.summaries.borrow().as_slice(), &[summary]);

        // one outcome per listed entry
        let outcomes = recorder.outcomes.borrow();
        assert_eq!(outcomes.len(), 4);
        assert_eq!(
            outcomes[2],
            Outcome::SkippedInvalidName {
                file: "Malformed.mp3".to_string()
            }
        );
        assert_eq!(
            outcomes[3],
            Outcome::SkippedUnsupportedFormat {
                file: "notes.txt".to_string()
            }
        );
    }

    #[test]
    fn test_entries_visited_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["charlie.txt", "alpha.txt", "bravo.txt"] {
            std::fs::File::create(dir.path().join(name)).unwrap();
        }

        let recorder = Recorder::default();
        processor().run(dir.path(), &recorder).unwrap();

        let visited: Vec<String> = recorder
            .outcomes
            .borrow()
            .iter()
            .map(|o| o.file().to_string())
            .collect();
        assert_eq!(visited, ["alpha.txt", "bravo.txt", "charlie.txt"]);
    }

    #[test]
    fn test_failed_write_still_counts_processed() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Broken_2024-1122.m4a"), b"garbage").unwrap();

        let recorder = Recorder::default();
        let summary = processor().run(dir.path(), &recorder).unwrap();

        assert_eq!(summary, Summary { processed: 1, skipped: 0 });
        let outcomes = recorder.outcomes.borrow();
        match &outcomes[0] {
            Outcome::Failed { file, reason } => {
                assert_eq!(file, "Broken_2024-1122.m4a");
                assert!(!reason.is_empty());
            }
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    #[test]
    fn test_updated_mp3_outcome() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::File::create(dir.path().join("Alpha_2024-1122.mp3")).unwrap();

        let recorder = Recorder::default();
        let summary = processor().run(dir.path(), &recorder).unwrap();

        assert_eq!(summary, Summary { processed: 1, skipped: 0 });
        assert_eq!(
            recorder.outcomes.borrow()[0],
            Outcome::Updated {
                file: "Alpha_2024-1122.mp3".to_string()
            }
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_name_opens_real_path() {
        use std::os::unix::ffi::OsStringExt;

        let dir = tempfile::tempdir().unwrap();
        // well-formed pattern, one byte of invalid UTF-8 in the title
        let name = std::ffi::OsString::from_vec(b"S\xFFong_2024-1122.mp3".to_vec());
        std::fs::File::create(dir.path().join(&name)).unwrap();

        let recorder = Recorder::default();
        let summary = processor().run(dir.path(), &recorder).unwrap();

        assert_eq!(summary, Summary { processed: 1, skipped: 0 });
        assert_eq!(
            recorder.outcomes.borrow()[0],
            Outcome::Updated {
                file: "S\u{FFFD}ong_2024-1122.mp3".to_string()
            }
        );
    }

    #[test]
    fn test_empty_directory() {
        let dir = tempfile::tempdir().unwrap();

        let recorder = Recorder::default();
        let summary = processor().run(dir.path(), &recorder).unwrap();

        assert_eq!(summary, Summary::default());
        assert!(recorder.outcomes.borrow().is_empty());
        assert_eq!(recorder.summaries.borrow().len(), 1);
    }

    #[test]
    fn test_missing_directory_is_fatal() {
        let recorder = Recorder::default();
        let err = processor()
            .run(Path::new("/no/such/directory"), &recorder)
            .unwrap_err();
        assert!(err.to_string().contains("Failed to list directory"));
        assert!(recorder.outcomes.borrow().is_empty());
        assert!(recorder.summaries.borrow().is_empty());
    }

    #[test]
    fn test_outcome_messages() {
        assert_eq!(
            Outcome::Updated { file: "a.mp3".into() }.message(),
            "Updated: a.mp3"
        );
        assert_eq!(
            Outcome::SkippedInvalidName { file: "a.mp3".into() }.message(),
            "Skipped (invalid filename format): a.mp3"
        );
        assert_eq!(
            Outcome::SkippedUnsupportedFormat { file: "a.txt".into() }.message(),
            "Skipped (unsupported format): a.txt"
        );
        assert_eq!(
            Outcome::Failed {
                file: "a.mp3".into(),
                reason: "boom".into()
            }
            .message(),
            "Failed: a.mp3 — boom"
        );
        assert_eq!(
            Summary { processed: 2, skipped: 2 }.message(),
            "Complete! Processed: 2 | Skipped: 2"
        );
    }
}
