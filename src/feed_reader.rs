use anyhow::{bail, Context, Result};
use gtfs_validator_core::{GtfsFile, RawRow};
use log::{debug, info, warn};
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

/// Rows of every file of a feed, as found on the disk
#[derive(Debug, Default)]
pub struct RawFeed {
    pub files: Vec<(GtfsFile, Vec<RawRow>)>,
    /// Required files that are missing and files that are not valid CSV
    pub invalid_files: Vec<String>,
}

impl RawFeed {
    fn missing(&mut self, file: GtfsFile) {
        if file.is_required() {
            warn!("missing required file {}", file);
            self.invalid_files.push(file.file_name().to_owned());
        }
    }

    fn add(&mut self, file: GtfsFile, rows: Result<Vec<RawRow>, csv::Error>) {
        match rows {
            Ok(rows) => {
                debug!("{}: {} rows read", file, rows.len());
                self.files.push((file, rows));
            }
            Err(e) => {
                warn!("{} cannot be read: {}", file, e);
                self.invalid_files.push(file.file_name().to_owned());
            }
        }
    }
}

/// Reads a local path, either a directory or zipped file
pub fn read_feed(path: &Path) -> Result<RawFeed> {
    info!("reading feed {}", path.display());
    if path.is_file() {
        let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
        read_archive(file)
    } else if path.is_dir() {
        read_directory(path)
    } else {
        bail!("{} is neither a file nor a directory", path.display())
    }
}

fn read_directory(dir: &Path) -> Result<RawFeed> {
    let mut feed = RawFeed::default();
    for file in GtfsFile::ALL {
        let path = dir.join(file.file_name());
        if !path.exists() {
            feed.missing(file);
            continue;
        }
        let bytes = std::fs::read(&path).with_context(|| format!("cannot read {}", path.display()))?;
        feed.add(file, read_rows(&bytes));
    }
    for entry in std::fs::read_dir(dir)? {
        let name = entry?.file_name();
        let name = name.to_string_lossy();
        if name.ends_with(".txt") && GtfsFile::from_file_name(&name).is_err() {
            warn!("ignoring unknown file {}", name);
        }
    }
    Ok(feed)
}

fn read_archive<R: Read + Seek>(reader: R) -> Result<RawFeed> {
    let mut archive = zip::ZipArchive::new(reader).context("invalid zip archive")?;
    let mut file_mapping = Vec::new();
    for i in 0..archive.len() {
        let archive_file = archive.by_index(i)?;
        let path = Path::new(archive_file.name());
        let file_name = match path.file_name().and_then(|f| f.to_str()) {
            Some(file_name) => file_name,
            None => continue,
        };
        match GtfsFile::from_file_name(file_name) {
            Ok(file) => file_mapping.push((file, i)),
            Err(_) if file_name.ends_with(".txt") => warn!("ignoring unknown file {}", file_name),
            Err(_) => {}
        }
    }

    let mut feed = RawFeed::default();
    for file in GtfsFile::ALL {
        let index = match file_mapping.iter().find(|(f, _)| *f == file) {
            Some((_, index)) => *index,
            None => {
                feed.missing(file);
                continue;
            }
        };
        let mut bytes = Vec::new();
        archive
            .by_index(index)?
            .read_to_end(&mut bytes)
            .with_context(|| format!("cannot unzip {}", file))?;
        feed.add(file, read_rows(&bytes));
    }
    Ok(feed)
}

/// Every record of a CSV file, keyed by the header. Fields and headers are trimmed, a UTF-8 BOM is skipped
pub fn read_rows(bytes: &[u8]) -> Result<Vec<RawRow>, csv::Error> {
    let bytes = bytes.strip_prefix(b"\xef\xbb\xbf").unwrap_or(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);
    let headers = reader.headers()?.clone();

    let mut rec = csv::StringRecord::new();
    let mut rows = Vec::new();
    while reader.read_record(&mut rec)? {
        rows.push(RawRow::from_record(headers.iter(), rec.iter()));
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gtfs_validator_core::RawValue;

    #[test]
    fn bom_and_short_records() {
        let rows = read_rows(b"\xef\xbb\xbfstop_id, stop_name,stop_desc\ns1, Gare ,desc\ns2,Mairie\n").unwrap();
        assert_eq!(2, rows.len());
        assert_eq!(Some(&RawValue::from("s1")), rows[0].get("stop_id"));
        assert_eq!(Some(&RawValue::from("Gare")), rows[0].get("stop_name"));
        assert_eq!(None, rows[1].get("stop_desc"));
    }

    #[test]
    fn empty_file() {
        assert!(read_rows(b"").unwrap().is_empty());
    }

    #[test]
    fn read_directory_feed() {
        let feed = read_feed(Path::new("fixtures/basic")).unwrap();
        assert!(feed.invalid_files.is_empty());
        let stops = feed
            .files
            .iter()
            .find(|(file, _)| *file == GtfsFile::Stops)
            .map(|(_, rows)| rows.len());
        assert_eq!(Some(4), stops);
    }

    #[test]
    fn missing_required_files() {
        let feed = read_feed(Path::new("fixtures/missing_stops")).unwrap();
        assert_eq!(vec!["stops.txt".to_owned()], feed.invalid_files);
    }
}
