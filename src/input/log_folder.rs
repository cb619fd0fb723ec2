//! Read `*.log` files from a folder through a line parser
//!
//! Lines the parser rejects are counted and dropped. Files are visited in
//! name order so repeated runs see records in the same order.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::error::{Result, SentryError};
use crate::models::{AccessRecord, AuthRecord, MessageRecord};
use crate::parser::{parse_access_line, parse_auth_line, parse_message_line};

const LOG_EXTENSION: &str = ".log";

/// Outcome of parsing one file
#[derive(Debug, Clone)]
pub struct ParsedFile<T> {
    pub records: Vec<T>,
    pub total_lines: usize,
}

impl<T> ParsedFile<T> {
    pub fn dropped_lines(&self) -> usize {
        self.total_lines - self.records.len()
    }
}

/// Parse every line of a single file
pub fn parse_file<T, P>(path: &Path, parser: P) -> Result<ParsedFile<T>>
where
    P: Fn(&str) -> Option<T>,
{
    let mut reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();
    let mut total_lines = 0;
    let mut buf = Vec::new();

    // Log lines may carry attacker-supplied bytes; decode lossily rather
    // than failing the whole file.
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        total_lines += 1;
        let line = String::from_utf8_lossy(&buf);
        if let Some(record) = parser(line.trim()) {
            records.push(record);
        }
    }

    Ok(ParsedFile {
        records,
        total_lines,
    })
}

fn log_files(folder: &Path) -> Result<Vec<PathBuf>> {
    if !folder.is_dir() {
        return Err(SentryError::Configuration(format!(
            "log folder {:?} does not exist or is not a directory",
            folder
        )));
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(folder)? {
        let path = entry?.path();
        let is_log = path
            .file_name()
            .and_then(|n| n.to_str())
            .map_or(false, |n| n.ends_with(LOG_EXTENSION));
        if is_log && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Parse every `*.log` file in `folder`, handing each record its file name
pub fn load_folder<T, P, S>(folder: &Path, parser: P, mut stamp: S) -> Result<Vec<T>>
where
    P: Fn(&str) -> Option<T>,
    S: FnMut(&mut T, &str),
{
    let mut all_records = Vec::new();

    for path in log_files(folder)? {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let parsed = parse_file(&path, &parser)?;
        log::debug!(
            "{}: {} of {} line(s) parsed, {} dropped",
            file_name,
            parsed.records.len(),
            parsed.total_lines,
            parsed.dropped_lines()
        );

        for mut record in parsed.records {
            stamp(&mut record, &file_name);
            all_records.push(record);
        }
    }

    log::info!("Loaded {} record(s) from {:?}", all_records.len(), folder);
    Ok(all_records)
}

pub fn load_auth_folder(folder: &Path) -> Result<Vec<AuthRecord>> {
    load_folder(folder, parse_auth_line, |r: &mut AuthRecord, name: &str| {
        r.source_file = Some(name.to_string())
    })
}

pub fn load_access_folder(folder: &Path) -> Result<Vec<AccessRecord>> {
    load_folder(folder, parse_access_line, |r: &mut AccessRecord, name: &str| {
        r.source_file = Some(name.to_string())
    })
}

pub fn load_message_folder(folder: &Path) -> Result<Vec<MessageRecord>> {
    load_folder(folder, parse_message_line, |_: &mut MessageRecord, _: &str| {})
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const AUTH_LINES: &str = "\
Jun 30 10:12:45 myserver sshd[1]: Failed password for invalid user admin from 192.168.0.10 port 54321 ssh2
this line is noise
Jun 30 10:12:46 myserver sshd[1]: Accepted password for alice from 192.168.0.11 port 22 ssh2
";

    const ACCESS_LINES: &str = r#"192.168.0.1 - - [30/Jun/2025:10:12:45 +0000] "GET /admin HTTP/1.1" 403 200 "-" "curl/7.80.0"
garbage log line
"#;

    #[test]
    fn test_load_auth_folder_stamps_source_file() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("auth.log"), AUTH_LINES).unwrap();
        fs::write(dir.path().join("notes.txt"), AUTH_LINES).unwrap();

        let records = load_auth_folder(dir.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.source_file.as_deref() == Some("auth.log")));
    }

    #[test]
    fn test_load_access_folder_in_name_order() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.log"), ACCESS_LINES).unwrap();
        fs::write(dir.path().join("a.log"), ACCESS_LINES).unwrap();

        let records = load_access_folder(dir.path()).unwrap();
        let files: Vec<_> = records.iter().map(|r| r.source_file.clone().unwrap()).collect();
        assert_eq!(files, vec!["a.log", "b.log"]);
    }

    #[test]
    fn test_message_folder_keeps_lines_with_ip() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("auth.log"), AUTH_LINES).unwrap();

        let records = load_message_folder(dir.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].ip, "192.168.0.10");
    }

    #[test]
    fn test_parse_file_counts_dropped_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("auth.log");
        fs::write(&path, AUTH_LINES).unwrap();

        let parsed = parse_file(&path, parse_auth_line).unwrap();
        assert_eq!(parsed.total_lines, 3);
        assert_eq!(parsed.dropped_lines(), 1);
    }

    #[test]
    fn test_undecodable_line_does_not_stop_loading() {
        let dir = tempdir().unwrap();
        let mut contents = Vec::new();
        contents.extend_from_slice(
            b"Jun 30 10:12:45 host sshd[1]: Failed password for root from 10.0.0.1 port 22 ssh2\n",
        );
        contents.extend_from_slice(b"Jun 30 10:12:46 host sshd[1]: \xff\xfe broken\n");
        contents.extend_from_slice(
            b"Jun 30 10:12:47 host sshd[1]: Failed password for root from 10.0.0.2 port 22 ssh2\n",
        );
        fs::write(dir.path().join("auth.log"), contents).unwrap();

        let records = load_auth_folder(dir.path()).unwrap();
        let ips: Vec<&str> = records.iter().map(|r| r.ip.as_str()).collect();
        assert_eq!(ips, vec!["10.0.0.1", "10.0.0.2"]);

        let parsed = parse_file(&dir.path().join("auth.log"), parse_auth_line).unwrap();
        assert_eq!(parsed.total_lines, 3);
        assert_eq!(parsed.dropped_lines(), 1);
    }

    #[test]
    fn test_missing_folder_is_configuration_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            load_auth_folder(&missing),
            Err(SentryError::Configuration(_))
        ));
    }
}
