// Modules for data loading
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::error::{Error, Result};

fn is_gzipped(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext == "gz")
}

/// Open a file for line reading, decompressing if the name ends in `.gz`.
pub fn open_reader(path: &Path) -> Result<Box<dyn BufRead>> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    if is_gzipped(path) {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Output file, gzip compressed when the name ends in `.gz`. Must be
/// closed with [`finish`](OutputFile::finish); dropping it discards errors.
pub enum OutputFile {
    Plain(BufWriter<File>),
    Gzip(GzEncoder<BufWriter<File>>),
}

impl OutputFile {
    /// Write the gzip trailer if any, flush and sync, reporting any failure.
    pub fn finish(self) -> std::io::Result<()> {
        let buffered = match self {
            OutputFile::Plain(out) => out,
            OutputFile::Gzip(out) => out.finish()?,
        };
        let file = buffered.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()
    }
}

impl Write for OutputFile {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self {
            OutputFile::Plain(out) => out.write(buf),
            OutputFile::Gzip(out) => out.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self {
            OutputFile::Plain(out) => out.flush(),
            OutputFile::Gzip(out) => out.flush(),
        }
    }
}

/// Create an output file, compressing if the name ends in `.gz`.
pub fn create_writer(path: &Path) -> Result<OutputFile> {
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    if is_gzipped(path) {
        Ok(OutputFile::Gzip(GzEncoder::new(BufWriter::new(file), Compression::default())))
    } else {
        Ok(OutputFile::Plain(BufWriter::new(file)))
    }
}

/// Resolve `rel_path` relative to the directory containing `file`.
/// Absolute paths are returned unchanged.
pub fn path_relative_to_file(file: &Path, rel_path: &str) -> PathBuf {
    let rel = Path::new(rel_path);
    if rel.is_absolute() {
        return rel.to_path_buf();
    }
    match file.parent() {
        Some(dir) => dir.join(rel),
        None => rel.to_path_buf(),
    }
}

/// A tab-separated row together with its one-based line number.
pub struct Row {
    pub line_num: usize,
    pub fields: Vec<String>,
}

/// Line-oriented reader of tab-separated rows. Blank lines and `#` comments are skipped.
pub struct TsvReader {
    path: PathBuf,
    lines: std::io::Lines<Box<dyn BufRead>>,
    line_num: usize,
}

impl TsvReader {
    pub fn open(path: &Path) -> Result<Self> {
        Ok(TsvReader {
            path: path.to_path_buf(),
            lines: open_reader(path)?.lines(),
            line_num: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Next row, requiring exactly `num_cols` fields.
    pub fn next_row_exact(&mut self, num_cols: usize) -> Result<Option<Row>> {
        match self.next_row()? {
            Some(row) if row.fields.len() != num_cols => Err(Error::parse(
                &self.path,
                row.line_num,
                format!("expected {} columns, found {}", num_cols, row.fields.len()),
            )),
            other => Ok(other),
        }
    }

    /// Next row, requiring at least `min_cols` fields.
    pub fn next_row_min(&mut self, min_cols: usize) -> Result<Option<Row>> {
        match self.next_row()? {
            Some(row) if row.fields.len() < min_cols => Err(Error::parse(
                &self.path,
                row.line_num,
                format!("expected at least {} columns, found {}", min_cols, row.fields.len()),
            )),
            other => Ok(other),
        }
    }

    pub fn next_row(&mut self) -> Result<Option<Row>> {
        self.next_row_split(|line| line.split('\t').map(str::to_string).collect())
    }

    pub(crate) fn next_row_split<F>(&mut self, split: F) -> Result<Option<Row>>
    where
        F: Fn(&str) -> Vec<String>,
    {
        for line in self.lines.by_ref() {
            let line = line.map_err(|e| Error::io(&self.path, e))?;
            self.line_num += 1;
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            return Ok(Some(Row {
                line_num: self.line_num,
                fields: split(line),
            }));
        }
        Ok(None)
    }

    pub fn parse_field<T: std::str::FromStr>(&self, row: &Row, idx: usize, name: &str) -> Result<T> {
        row.fields[idx].trim().parse::<T>().map_err(|_| {
            Error::parse(
                &self.path,
                row.line_num,
                format!("invalid {} value \"{}\"", name, row.fields[idx]),
            )
        })
    }
}
