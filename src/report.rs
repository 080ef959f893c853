// Modules for reporting per-intron evidence
use std::io::Write;
use std::path::Path;

use itertools::Itertools;
use log::debug;

use crate::config::MotifNormalization;
use crate::data_loader::create_writer;
use crate::error::{Error, Result};
use crate::intron_map::{IntronInfo, IntronMap};

pub const EVIDENCE_TSV_HEADER: [&str; 10] = [
    "chrom",
    "intronStart",
    "intronEnd",
    "novel",
    "annotStrand",
    "rnaSeqStrand",
    "intronMotif",
    "numUniqueMapReads",
    "numMultiMapReads",
    "transcripts",
];

/// Strands of the transcripts containing the intron, joined with `/` when
/// the annotation is in conflict.
pub fn annot_strand(intron_map: &IntronMap, intron_info: &IntronInfo) -> String {
    intron_info
        .intron_transes
        .iter()
        .map(|link| intron_map.transcript(link.transcript).strand.as_str())
        .unique()
        .join("/")
}

/// Strand STAR assigned, empty without STAR evidence.
pub fn rna_seq_strand(intron_info: &IntronInfo) -> String {
    intron_info
        .mappings_sum
        .as_ref()
        .map_or_else(String::new, |sum| sum.strand.to_string())
}

/// Format one evidence row. Transcripts are listed in load order.
pub fn evidence_row(
    intron_map: &IntronMap,
    intron_info: &IntronInfo,
    normalization: MotifNormalization,
) -> Result<String> {
    Ok(format!(
        "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
        intron_info.chrom(),
        intron_info.start(),
        intron_info.end(),
        intron_info.is_novel()? as u8,
        annot_strand(intron_map, intron_info),
        rna_seq_strand(intron_info),
        intron_info.motif_str(normalization),
        intron_info.num_unique_map_reads(),
        intron_info.num_multi_map_reads(),
        intron_map.transcript_names(intron_info).join(",")
    ))
}

/// Build all rows first so an inconsistent intron aborts before anything is written.
pub fn evidence_rows(intron_map: &IntronMap, normalization: MotifNormalization) -> Result<Vec<String>> {
    intron_map
        .get_sorted()
        .into_iter()
        .map(|intron_info| evidence_row(intron_map, intron_info, normalization))
        .collect()
}

fn write_rows<W: Write>(out: &mut W, rows: &[String]) -> std::io::Result<()> {
    writeln!(out, "{}", EVIDENCE_TSV_HEADER.join("\t"))?;
    for row in rows {
        writeln!(out, "{}", row)?;
    }
    Ok(())
}

/// Write the evidence TSV, one row per intron in location order.
pub fn save_evidence_report(
    intron_map: &IntronMap,
    normalization: MotifNormalization,
    path: &Path,
) -> Result<()> {
    let rows = evidence_rows(intron_map, normalization)?;
    let mut out = create_writer(path)?;
    write_rows(&mut out, &rows)
        .and_then(|_| out.finish())
        .map_err(|e| Error::io(path, e))?;
    debug!("Wrote {} introns to {}", rows.len(), path.display());
    Ok(())
}
