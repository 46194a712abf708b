//! Reading informational lines out of gzip-compressed log archives.

use crate::error::{AnalyzerError, Result};
use crate::filter::is_info_line;
use flate2::read::GzDecoder;
use log::{debug, info, warn};
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Extension of the log archives that are read.
pub const ARCHIVE_EXTENSION: &str = "gz";

/// Reads trimmed informational lines from any buffered reader.
///
/// Stops at the first read or decode error and returns the lines read so far
/// together with that error.
pub fn read_info_lines<R: BufRead>(reader: R) -> (Vec<String>, Option<std::io::Error>) {
    let mut kept = Vec::new();
    for line in reader.lines() {
        match line {
            Ok(line) => {
                if is_info_line(&line) {
                    kept.push(line.trim().to_string());
                }
            }
            Err(e) => return (kept, Some(e)),
        }
    }
    (kept, None)
}

/// Collects every `.gz` file under `root`, in sorted order.
///
/// `root` may itself be a single archive.
pub fn find_archives(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.exists() {
        return Err(AnalyzerError::InputNotFound {
            path: root.to_path_buf(),
        });
    }

    let mut archives = Vec::new();
    if root.is_file() {
        if is_archive(root) {
            archives.push(root.to_path_buf());
        }
        return Ok(archives);
    }

    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.is_dir() {
                pending.push(path);
            } else if is_archive(&path) {
                archives.push(path);
            }
        }
    }
    archives.sort();
    Ok(archives)
}

fn is_archive(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == ARCHIVE_EXTENSION)
}

/// Loads informational lines from every archive under `root`.
///
/// An archive that cannot be opened or decoded is logged and skipped; lines
/// read from it before the failure are kept.
pub fn load_info_lines(root: &Path) -> Result<Vec<String>> {
    info!("Loading logs from {}", root.display());
    let archives = find_archives(root)?;

    let mut lines = Vec::new();
    for path in &archives {
        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Error reading {}: {}", path.display(), e);
                continue;
            }
        };

        let (mut kept, err) = read_info_lines(BufReader::new(GzDecoder::new(file)));
        if let Some(e) = err {
            warn!("Error reading {}: {}", path.display(), e);
        }
        debug!("{}: {} informational lines", path.display(), kept.len());
        lines.append(&mut kept);
    }

    info!(
        "Loaded {} informational lines from {} archives",
        lines.len(),
        archives.len()
    );
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::{Cursor, Write};

    fn write_gz(path: &Path, content: &str) {
        let file = File::create(path).unwrap();
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder.write_all(content.as_bytes()).unwrap();
        encoder.finish().unwrap();
    }

    #[test]
    fn test_read_info_lines_filters_and_trims() {
        let input = "  a\tINFO\tx  \nb\tERROR\ty\nc\tINFO\tz\n";
        let (lines, err) = read_info_lines(Cursor::new(input));
        assert!(err.is_none());
        assert_eq!(lines, vec!["a\tINFO\tx", "c\tINFO\tz"]);
    }

    #[test]
    fn test_read_info_lines_stops_at_invalid_utf8() {
        let mut input = b"a INFO 1\n".to_vec();
        input.extend_from_slice(&[0xff, 0xfe, b'\n']);
        input.extend_from_slice(b"b INFO 2\n");
        let (lines, err) = read_info_lines(Cursor::new(input));
        assert_eq!(lines, vec!["a INFO 1"]);
        assert!(err.is_some());
    }

    #[test]
    fn test_missing_root_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_info_lines(&dir.path().join("nope")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_walks_nested_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("2024").join("01");
        fs::create_dir_all(&nested).unwrap();

        write_gz(&dir.path().join("a.gz"), "1\tINFO\tone\n2\tDEBUG\tskip\n");
        write_gz(&nested.join("b.log.gz"), "3\tINFO\tthree\n");
        fs::write(dir.path().join("plain.log"), "4\tINFO\tignored\n").unwrap();

        let lines = load_info_lines(dir.path()).unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines.contains(&"1\tINFO\tone".to_string()));
        assert!(lines.contains(&"3\tINFO\tthree".to_string()));
    }

    #[test]
    fn test_corrupt_archive_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write_gz(&dir.path().join("good.gz"), "1\tINFO\tok\n");
        fs::write(dir.path().join("bad.gz"), b"not gzip at all").unwrap();

        let lines = load_info_lines(dir.path()).unwrap();
        assert_eq!(lines, vec!["1\tINFO\tok"]);
    }

    #[test]
    fn test_single_archive_root() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("only.gz");
        write_gz(&path, "x\tINFO\ty\n");
        assert_eq!(find_archives(&path).unwrap(), vec![path]);
    }
}
