//! Zip container for multi-member exports.

use std::io::{Cursor, Write};

use chrono::{Datelike, Local, Timelike};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::ExportError;

/// Build a deflated archive holding `(name, content)` entries in the given order.
pub fn write_archive(entries: &[(String, Vec<u8>)]) -> Result<Vec<u8>, ExportError> {
    let mut options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    if let Some(modified) = modified_now() {
        options = options.last_modified_time(modified);
    }

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in entries {
        writer.start_file(name.as_str(), options)?;
        writer.write_all(content)?;
    }
    Ok(writer.finish()?.into_inner())
}

/// Local wall-clock time as a zip timestamp; `None` outside 1980..=2107.
fn modified_now() -> Option<zip::DateTime> {
    let now = Local::now();
    zip::DateTime::from_date_and_time(
        u16::try_from(now.year()).ok()?,
        now.month() as u8,
        now.day() as u8,
        now.hour() as u8,
        now.minute() as u8,
        now.second() as u8,
    )
    .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use zip::ZipArchive;

    #[test]
    fn test_entries_read_back_in_order() {
        let entries = vec![
            ("działka.txt".to_string(), "ąęśź ".repeat(100).into_bytes()),
            ("empty.cpg".to_string(), Vec::new()),
        ];
        let archive = write_archive(&entries).unwrap();
        assert_eq!(&archive[..4], b"PK\x03\x04");

        let mut reader = ZipArchive::new(Cursor::new(archive)).unwrap();
        assert_eq!(reader.len(), entries.len());
        for (i, (name, content)) in entries.iter().enumerate() {
            let mut file = reader.by_index(i).unwrap();
            assert_eq!(file.name(), name);
            assert_eq!(file.compression(), CompressionMethod::Deflated);
            let mut read = Vec::new();
            file.read_to_end(&mut read).unwrap();
            assert_eq!(&read, content);
        }
    }

    #[test]
    fn test_many_members() {
        let entries: Vec<_> = (0..300)
            .map(|i| (format!("member_{i:03}.txt"), vec![b'x'; i]))
            .collect();
        let archive = write_archive(&entries).unwrap();
        let mut reader = ZipArchive::new(Cursor::new(archive)).unwrap();
        assert_eq!(reader.len(), 300);
        assert_eq!(reader.by_name("member_299.txt").unwrap().size(), 299);
    }

    #[test]
    fn test_modified_now_is_current_year() {
        let modified = modified_now().unwrap();
        assert_eq!(i32::from(modified.year()), Local::now().year());
    }
}
