// Modules for handling STAR splice junction calls
use std::cmp::Ordering;
use std::fmt;
use std::path::Path;

use log::debug;

use crate::analysis::AnalysisId;
use crate::config::MotifNormalization;
use crate::data_loader::{Row, TsvReader};
use crate::error::{Error, Result};

pub const SJ_NUM_COLS: usize = 9;

/// Strand column of STAR's `SJ.out.tab`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SjStrand {
    Unknown = 0,
    Plus = 1,
    Minus = 2,
}

impl SjStrand {
    pub fn from_code(code: u32) -> Result<Self> {
        match code {
            0 => Ok(SjStrand::Unknown),
            1 => Ok(SjStrand::Plus),
            2 => Ok(SjStrand::Minus),
            _ => Err(Error::UnknownStrandCode(code)),
        }
    }

    pub fn code(self) -> u32 {
        self as u32
    }

    pub fn as_char(self) -> char {
        match self {
            SjStrand::Unknown => '?',
            SjStrand::Plus => '+',
            SjStrand::Minus => '-',
        }
    }
}

impl fmt::Display for SjStrand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Intron motif column of STAR's `SJ.out.tab`, validated to 0..=6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntronMotif(u8);

const RAW_MOTIFS: [&str; 7] = ["??/??", "GT/AG", "CT/AC", "GC/AG", "CT/GC", "AT/AC", "GT/AT"];
const CANONICAL_MOTIFS: [&str; 7] = ["??/??", "GT/AG", "GT/AG", "GC/AG", "GC/AG", "AT/AC", "AT/AC"];

pub const NON_CANONICAL_MOTIF: &str = "??/??";

impl IntronMotif {
    pub fn from_code(code: u32) -> Result<Self> {
        if (code as usize) < RAW_MOTIFS.len() {
            Ok(IntronMotif(code as u8))
        } else {
            Err(Error::UnknownMotifCode(code))
        }
    }

    pub fn code(self) -> u32 {
        self.0 as u32
    }

    pub fn as_str(self, normalization: MotifNormalization) -> &'static str {
        match normalization {
            MotifNormalization::Raw => RAW_MOTIFS[self.0 as usize],
            MotifNormalization::CanonicalizeReverseComplement => CANONICAL_MOTIFS[self.0 as usize],
        }
    }
}

/// Convert a STAR strand code to a character.
pub fn strand_code_to_char(code: u32) -> Result<char> {
    SjStrand::from_code(code).map(SjStrand::as_char)
}

/// Convert a STAR intron motif code to a string, non-canonical is `??/??`.
pub fn motif_code_to_str(code: u32, normalization: MotifNormalization) -> Result<&'static str> {
    IntronMotif::from_code(code).map(|m| m.as_str(normalization))
}

/// How fields of a junction file are separated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SjDelimiter {
    Tab,
    Whitespace,
    /// Comma separated, optionally with a quoted chrom and a trailing comma.
    Comma,
}

/// One STAR splice junction call, or the running sum of several.
///
/// `start` is zero-based (the file's one-based first intron base minus one)
/// and `end` is the last intron base, so the pair is a half-open interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpliceJunction {
    pub chrom: String,
    pub start: u64,
    pub end: u64,
    pub strand: SjStrand,
    pub intron_motif: IntronMotif,
    pub annotated: bool,
    pub num_unique_map_reads: u64,
    pub num_multi_map_reads: u64,
    pub max_overhang: u32,
    /// Analyses this call came from; more than one once summed.
    pub src_analyses: Vec<AnalysisId>,
}

impl SpliceJunction {
    /// Parse the nine `SJ.out.tab` columns, converting the start to zero-based.
    pub fn from_fields<S: AsRef<str>>(fields: &[S]) -> std::result::Result<Self, String> {
        if fields.len() != SJ_NUM_COLS {
            return Err(format!("expected {} columns, found {}", SJ_NUM_COLS, fields.len()));
        }
        let num = |idx: usize, name: &str| -> std::result::Result<u64, String> {
            let val = fields[idx].as_ref().trim();
            val.parse::<u64>()
                .map_err(|_| format!("invalid {} value \"{}\"", name, val))
        };
        let one_based_start = num(1, "chromStart")?;
        if one_based_start == 0 {
            return Err("chromStart must be one-based".to_string());
        }
        let code = |idx: usize, name: &str| -> std::result::Result<u32, String> {
            let val = num(idx, name)?;
            u32::try_from(val).map_err(|_| format!("{} value {} out of range", name, val))
        };
        let strand = SjStrand::from_code(code(3, "strand")?).map_err(|e| e.to_string())?;
        let intron_motif = IntronMotif::from_code(code(4, "intronMotif")?).map_err(|e| e.to_string())?;
        let annotated = match code(5, "annotated")? {
            0 => false,
            1 => true,
            other => return Err(format!("invalid annotated value {}", other)),
        };
        Ok(SpliceJunction {
            chrom: fields[0].as_ref().trim().to_string(),
            start: one_based_start - 1,
            end: num(2, "chromEnd")?,
            strand,
            intron_motif,
            annotated,
            num_unique_map_reads: num(6, "numUniqueMapReads")?,
            num_multi_map_reads: num(7, "numMultiMapReads")?,
            max_overhang: code(8, "maxOverhang")?,
            src_analyses: Vec::new(),
        })
    }

    /// Start a running sum from the first call seen at a coordinate. The
    /// provenance list is copied so the sum owns its own links.
    pub fn new_summary(first: &SpliceJunction) -> Self {
        SpliceJunction {
            chrom: first.chrom.clone(),
            start: first.start,
            end: first.end,
            strand: first.strand,
            intron_motif: first.intron_motif,
            annotated: first.annotated,
            num_unique_map_reads: first.num_unique_map_reads,
            num_multi_map_reads: first.num_multi_map_reads,
            max_overhang: first.max_overhang,
            src_analyses: first.src_analyses.clone(),
        }
    }

    fn mismatch(&self, field: &'static str, existing: u32, incoming: u32) -> Error {
        Error::MergeMismatch {
            field,
            chrom: self.chrom.clone(),
            start: self.start,
            end: self.end,
            existing,
            incoming,
        }
    }

    /// Calls at one coordinate must agree on strand, motif and annotation.
    pub fn check_compatible(&self, other: &SpliceJunction) -> Result<()> {
        if self.strand != other.strand {
            return Err(self.mismatch("strand", self.strand.code(), other.strand.code()));
        }
        if self.intron_motif != other.intron_motif {
            return Err(self.mismatch("intronMotif", self.intron_motif.code(), other.intron_motif.code()));
        }
        if self.annotated != other.annotated {
            return Err(self.mismatch("annotated", self.annotated as u32, other.annotated as u32));
        }
        Ok(())
    }

    /// Fold another call at the same coordinate into this sum.
    pub fn accumulate(&mut self, other: &SpliceJunction) -> Result<()> {
        self.check_compatible(other)?;
        self.num_unique_map_reads += other.num_unique_map_reads;
        self.num_multi_map_reads += other.num_multi_map_reads;
        self.max_overhang = self.max_overhang.max(other.max_overhang);
        self.src_analyses.extend_from_slice(&other.src_analyses);
        Ok(())
    }

    pub fn motif_str(&self, normalization: MotifNormalization) -> &'static str {
        self.intron_motif.as_str(normalization)
    }

    /// Format as an `SJ.out.tab` row, restoring the one-based start.
    pub fn to_tab_row(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            self.chrom,
            self.start + 1,
            self.end,
            self.strand.code(),
            self.intron_motif.code(),
            self.annotated as u32,
            self.num_unique_map_reads,
            self.num_multi_map_reads,
            self.max_overhang
        )
    }

    /// Default ordering of bare junction lists: chrom, then start.
    pub fn cmp_location(&self, other: &SpliceJunction) -> Ordering {
        self.chrom
            .cmp(&other.chrom)
            .then_with(|| self.start.cmp(&other.start))
    }
}

pub fn sort_by_location(junctions: &mut [SpliceJunction]) {
    junctions.sort_by(SpliceJunction::cmp_location);
}

fn split_fields(line: &str, delimiter: SjDelimiter) -> Vec<String> {
    match delimiter {
        SjDelimiter::Tab => line.split('\t').map(str::to_string).collect(),
        SjDelimiter::Whitespace => line.split_whitespace().map(str::to_string).collect(),
        SjDelimiter::Comma => {
            let mut fields: Vec<String> = line
                .split(',')
                .map(|f| f.trim().trim_matches('"').to_string())
                .collect();
            if fields.last().map_or(false, |f| f.is_empty()) {
                fields.pop();
            }
            fields
        }
    }
}

/// Parse a row read from `reader` as an `SJ.out.tab` junction call.
pub(crate) fn parse_junction_row(reader: &TsvReader, row: &Row) -> Result<SpliceJunction> {
    SpliceJunction::from_fields(&row.fields)
        .map_err(|msg| Error::parse(reader.path(), row.line_num, msg))
}

/// Read all junction calls from a file, in file order.
pub fn read_junctions_with(path: &Path, delimiter: SjDelimiter) -> Result<Vec<SpliceJunction>> {
    let mut reader = TsvReader::open(path)?;
    let mut junctions = Vec::new();
    while let Some(row) = reader.next_row_split(|line| split_fields(line, delimiter))? {
        junctions.push(parse_junction_row(&reader, &row)?);
    }
    debug!("Read {} splice junctions from {}", junctions.len(), path.display());
    Ok(junctions)
}

/// Read a tab-separated `SJ.out.tab` file.
pub fn read_junctions(path: &Path) -> Result<Vec<SpliceJunction>> {
    read_junctions_with(path, SjDelimiter::Tab)
}
