//! File metadata extraction
//!
//! Reads size and modification time for a single file, either as raw
//! numbers or as human-readable strings. Unreadable files produce
//! [`FileMetadata::Inaccessible`] plus a warning on the diagnostic sink;
//! extraction itself never fails.

use std::io;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Local};
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink};

const SIZE_UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// A file's size, as a byte count or a formatted string.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum Size {
    Bytes(u64),
    Human(String),
}

/// A file's modification time, as seconds since the epoch or a formatted
/// local date.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum ModifiedTime {
    Timestamp(f64),
    Human(String),
}

/// Metadata attached to a file node.
///
/// Serializes as `{"size": ..., "modified_time": ...}`, or as `{}` when the
/// file could not be inspected.
#[derive(Debug, Clone, PartialEq)]
pub enum FileMetadata {
    Available {
        size: Size,
        modified_time: ModifiedTime,
    },
    Inaccessible,
}

impl FileMetadata {
    fn from_stat(len: u64, modified: SystemTime, human_readable: bool) -> Self {
        if human_readable {
            FileMetadata::Available {
                size: Size::Human(format_size(len)),
                modified_time: ModifiedTime::Human(format_time(modified)),
            }
        } else {
            FileMetadata::Available {
                size: Size::Bytes(len),
                modified_time: ModifiedTime::Timestamp(epoch_seconds(modified)),
            }
        }
    }

    pub fn size(&self) -> Option<&Size> {
        match self {
            FileMetadata::Available { size, .. } => Some(size),
            FileMetadata::Inaccessible => None,
        }
    }

    pub fn modified_time(&self) -> Option<&ModifiedTime> {
        match self {
            FileMetadata::Available { modified_time, .. } => Some(modified_time),
            FileMetadata::Inaccessible => None,
        }
    }
}

impl Serialize for FileMetadata {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FileMetadata::Available {
                size,
                modified_time,
            } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("size", size)?;
                map.serialize_entry("modified_time", modified_time)?;
                map.end()
            }
            FileMetadata::Inaccessible => serializer.serialize_map(Some(0))?.end(),
        }
    }
}

/// Read metadata for the file at `path`.
///
/// A missing or unreadable file yields [`FileMetadata::Inaccessible`] and a
/// warning on `sink`.
pub fn extract(path: &Path, human_readable: bool, sink: &dyn DiagnosticSink) -> FileMetadata {
    match stat(path) {
        Ok((len, modified)) => FileMetadata::from_stat(len, modified, human_readable),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            sink.report(Diagnostic::warn(path, DiagnosticKind::Vanished));
            FileMetadata::Inaccessible
        }
        Err(e) => {
            sink.report(Diagnostic::warn(
                path,
                DiagnosticKind::MetadataUnreadable(e.to_string()),
            ));
            FileMetadata::Inaccessible
        }
    }
}

fn stat(path: &Path) -> io::Result<(u64, SystemTime)> {
    let meta = path.metadata()?;
    Ok((meta.len(), meta.modified()?))
}

/// Format a byte count with 1024-based units.
///
/// Below 1 KB the exact count is shown (`"512 B"`); above, one decimal in the
/// largest unit that keeps the value under 1024, up to PB.
pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    let mut value = bytes as f64;
    for unit in SIZE_UNITS {
        value /= 1024.0;
        if value < 1024.0 {
            return format!("{:.1} {}", value, unit);
        }
    }
    format!("{:.1} PB", value / 1024.0)
}

/// Format a timestamp as `YYYY-MM-DD HH:MM` in local time.
pub fn format_time(time: SystemTime) -> String {
    DateTime::<Local>::from(time).format(TIME_FORMAT).to_string()
}

/// Seconds since the Unix epoch, negative for earlier times.
pub fn epoch_seconds(time: SystemTime) -> f64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(d) => d.as_secs_f64(),
        Err(e) => -e.duration().as_secs_f64(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{Level, NullSink};
    use crate::test_utils::RecordingSink;
    use chrono::TimeZone;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_format_size_bytes() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(5), "5 B");
        assert_eq!(format_size(1023), "1023 B");
    }

    #[test]
    fn test_format_size_units() {
        assert_eq!(format_size(1024), "1.0 KB");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(1024 * 1024), "1.0 MB");
        assert_eq!(format_size(5 * 1024 * 1024 * 1024), "5.0 GB");
        assert_eq!(format_size(3 * 1024_u64.pow(4)), "3.0 TB");
    }

    #[test]
    fn test_format_size_falls_back_to_pb() {
        assert_eq!(format_size(1024_u64.pow(5)), "1.0 PB");
        assert_eq!(format_size(2048 * 1024_u64.pow(5)), "2048.0 PB");
    }

    #[test]
    fn test_format_time() {
        let local = Local
            .with_ymd_and_hms(2025, 11, 10, 22, 30, 45)
            .earliest()
            .unwrap();
        assert_eq!(format_time(SystemTime::from(local)), "2025-11-10 22:30");
    }

    #[test]
    fn test_epoch_seconds() {
        let t = UNIX_EPOCH + Duration::from_millis(1_500);
        assert_eq!(epoch_seconds(t), 1.5);
        let before = UNIX_EPOCH - Duration::from_secs(10);
        assert_eq!(epoch_seconds(before), -10.0);
    }

    #[test]
    fn test_extract_raw() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, "hello").unwrap();

        let meta = extract(&path, false, &NullSink);
        assert_eq!(meta.size(), Some(&Size::Bytes(5)));
        match meta.modified_time() {
            Some(ModifiedTime::Timestamp(t)) => assert!(*t > 0.0),
            other => panic!("expected raw timestamp, got {:?}", other),
        }
    }

    #[test]
    fn test_extract_human_readable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("note.txt");
        fs::write(&path, vec![b'x'; 2048]).unwrap();

        let meta = extract(&path, true, &NullSink);
        assert_eq!(meta.size(), Some(&Size::Human("2.0 KB".to_string())));
        match meta.modified_time() {
            Some(ModifiedTime::Human(s)) => {
                assert_eq!(s.len(), 16, "unexpected time format: {}", s);
                assert_eq!(&s[4..5], "-");
                assert_eq!(&s[10..11], " ");
                assert_eq!(&s[13..14], ":");
            }
            other => panic!("expected formatted time, got {:?}", other),
        }
    }

    #[test]
    fn test_extract_missing_file_warns() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gone.txt");
        let sink = RecordingSink::new();

        let meta = extract(&path, false, &sink);
        assert_eq!(meta, FileMetadata::Inaccessible);

        let reports = sink.diagnostics();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].level, Level::Warn);
        assert_eq!(reports[0].kind, DiagnosticKind::Vanished);
    }

    #[test]
    fn test_extract_unreadable_is_not_vanished() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.txt");
        fs::write(&file, "a").unwrap();
        // Stat through a regular file fails with ENOTDIR
        let path = file.join("x");
        let sink = RecordingSink::new();

        let meta = extract(&path, false, &sink);
        assert_eq!(meta, FileMetadata::Inaccessible);

        let reports = sink.diagnostics();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].level, Level::Warn);
        assert!(
            matches!(reports[0].kind, DiagnosticKind::MetadataUnreadable(_)),
            "{:?}",
            reports[0].kind
        );
    }

    #[test]
    fn test_serialize_metadata() {
        let meta = FileMetadata::Available {
            size: Size::Bytes(5),
            modified_time: ModifiedTime::Timestamp(1.5),
        };
        assert_eq!(
            serde_json::to_string(&meta).unwrap(),
            r#"{"size":5,"modified_time":1.5}"#
        );

        let meta = FileMetadata::Available {
            size: Size::Human("2.0 KB".to_string()),
            modified_time: ModifiedTime::Human("2025-11-10 22:30".to_string()),
        };
        assert_eq!(
            serde_json::to_string(&meta).unwrap(),
            r#"{"size":"2.0 KB","modified_time":"2025-11-10 22:30"}"#
        );

        assert_eq!(
            serde_json::to_string(&FileMetadata::Inaccessible).unwrap(),
            "{}"
        );
    }
}
