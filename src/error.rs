// Error types shared by all loaders, the intron map and the front ends
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}:{line}: {msg}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        msg: String,
    },

    #[error("unknown STAR strand code: {0}")]
    UnknownStrandCode(u32),

    #[error("unknown STAR intron motif code: {0}")]
    UnknownMotifCode(u32),

    #[error("{}: unexpected splice TSV column header \"{found}\", expected \"{expected}\"", path.display())]
    BadHeader {
        path: PathBuf,
        found: String,
        expected: String,
    },

    #[error("{}: premature EOF on splice TSV", path.display())]
    PrematureEof { path: PathBuf },

    /// Two junction calls at one coordinate disagree on a fixed attribute.
    #[error("star splice junction {field} difference for {chrom} {start}-{end}, {existing} vs {incoming}")]
    MergeMismatch {
        field: &'static str,
        chrom: String,
        start: u64,
        end: u64,
        existing: u32,
        incoming: u32,
    },

    /// STAR annotated flag contradicts the presence of transcript links.
    #[error("intron {chrom}:{start}-{end}: STAR annotated state ({star_novel}) not the same as transcript state ({trans_novel})")]
    AnnotationMismatch {
        chrom: String,
        start: u64,
        end: u64,
        star_novel: bool,
        trans_novel: bool,
    },

    #[error("chrom split output file already exists, either output directory was not empty or rows not sorted by chrom: {}", .0.display())]
    OutputExists(PathBuf),

    #[error("cannot open indexed FASTA {}: {msg}", path.display())]
    GenomeOpen { path: PathBuf, msg: String },

    #[error("sequence lookup failed for {chrom}:{start}-{end}: {msg}")]
    Sequence {
        chrom: String,
        start: u64,
        end: u64,
        msg: String,
    },

    #[error("{0}")]
    InvalidArgument(String),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, line: usize, msg: impl Into<String>) -> Self {
        Error::Parse {
            path: path.into(),
            line,
            msg: msg.into(),
        }
    }
}
