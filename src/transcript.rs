// Modules for transcript models and their introns
use std::path::Path;

use log::debug;

use crate::data_loader::{Row, TsvReader};
use crate::error::{Error, Result};

/// Introns shorter than this are treated as alignment artifacts in the annotation.
pub const MIN_INTRON_SIZE: u64 = 30;

/// Handle to a transcript owned by an intron map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TranscriptId(pub usize);

/// A transcript model with zero-based, half-open exons in genomic order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    pub name: String,
    pub chrom: String,
    pub strand: String,
    pub exon_starts: Vec<u64>,
    pub exon_ends: Vec<u64>,
}

impl Transcript {
    pub fn exon_count(&self) -> usize {
        self.exon_starts.len()
    }

    /// Span of the intron following exon `intron_idx`.
    pub fn intron_span(&self, intron_idx: usize) -> (u64, u64) {
        (self.exon_ends[intron_idx], self.exon_starts[intron_idx + 1])
    }

    pub fn should_include_intron(&self, intron_idx: usize) -> bool {
        let (start, end) = self.intron_span(intron_idx);
        end.saturating_sub(start) >= MIN_INTRON_SIZE
    }

    /// Indices of introns passing the minimum size filter.
    pub fn intron_indices(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.exon_count().saturating_sub(1)).filter(move |&i| self.should_include_intron(i))
    }
}

// genePred columns: name chrom strand txStart txEnd cdsStart cdsEnd exonCount exonStarts exonEnds
const GENE_PRED_MIN_COLS: usize = 10;

fn parse_coord_list(reader: &TsvReader, row: &Row, idx: usize, name: &str) -> Result<Vec<u64>> {
    row.fields[idx]
        .split(',')
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.trim().parse::<u64>().map_err(|_| {
                Error::parse(reader.path(), row.line_num, format!("invalid {} value \"{}\"", name, s))
            })
        })
        .collect()
}

fn parse_gene_pred(reader: &TsvReader, row: &Row) -> Result<Transcript> {
    let exon_count: usize = reader.parse_field(row, 7, "exonCount")?;
    let exon_starts = parse_coord_list(reader, row, 8, "exonStarts")?;
    let exon_ends = parse_coord_list(reader, row, 9, "exonEnds")?;
    if exon_starts.len() != exon_count || exon_ends.len() != exon_count {
        return Err(Error::parse(
            reader.path(),
            row.line_num,
            format!(
                "exonCount {} does not match {} exonStarts and {} exonEnds",
                exon_count,
                exon_starts.len(),
                exon_ends.len()
            ),
        ));
    }
    Ok(Transcript {
        name: row.fields[0].clone(),
        chrom: row.fields[1].clone(),
        strand: row.fields[2].clone(),
        exon_starts,
        exon_ends,
    })
}

/// Read all transcripts from a genePred file. Extended genePred columns are ignored.
pub fn read_gene_preds(path: &Path) -> Result<Vec<Transcript>> {
    let mut reader = TsvReader::open(path)?;
    let mut transcripts = Vec::new();
    while let Some(row) = reader.next_row_min(GENE_PRED_MIN_COLS)? {
        transcripts.push(parse_gene_pred(&reader, &row)?);
    }
    debug!("Read {} transcripts from {}", transcripts.len(), path.display());
    Ok(transcripts)
}
