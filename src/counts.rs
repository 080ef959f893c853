// Modules for summarizing intron support by category
use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

use log::debug;

use crate::config::MotifNormalization;
use crate::data_loader::create_writer;
use crate::error::{Error, Result};
use crate::intron_map::{IntronInfo, IntronMap};

/// Support totals for all introns of one annotated state and motif.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntronCounts {
    pub annotated: bool,
    pub intron_motif: String,
    pub count: u64,
    pub num_unique_map_reads: u64,
    pub min_num_unique_map_reads: u64,
    pub max_num_unique_map_reads: u64,
    pub num_multi_map_reads: u64,
    pub min_num_multi_map_reads: u64,
    pub max_num_multi_map_reads: u64,
    pub transcript_count: u64,
}

impl IntronCounts {
    fn new(annotated: bool, intron_motif: String) -> Self {
        IntronCounts {
            annotated,
            intron_motif,
            count: 0,
            num_unique_map_reads: 0,
            min_num_unique_map_reads: u64::MAX,
            max_num_unique_map_reads: 0,
            num_multi_map_reads: 0,
            min_num_multi_map_reads: u64::MAX,
            max_num_multi_map_reads: 0,
            transcript_count: 0,
        }
    }

    fn add(&mut self, intron_info: &IntronInfo) {
        let unique = intron_info.num_unique_map_reads();
        let multi = intron_info.num_multi_map_reads();
        self.count += 1;
        self.num_unique_map_reads += unique;
        self.min_num_unique_map_reads = self.min_num_unique_map_reads.min(unique);
        self.max_num_unique_map_reads = self.max_num_unique_map_reads.max(unique);
        self.num_multi_map_reads += multi;
        self.min_num_multi_map_reads = self.min_num_multi_map_reads.min(multi);
        self.max_num_multi_map_reads = self.max_num_multi_map_reads.max(multi);
        self.transcript_count += intron_info.intron_transes.len() as u64;
    }
}

/// Bucket introns by annotated state and motif. Buckets are returned in the
/// order first seen walking the map by location.
pub fn collect_intron_counts(intron_map: &IntronMap, normalization: MotifNormalization) -> Result<Vec<IntronCounts>> {
    let mut counts: Vec<IntronCounts> = Vec::new();
    let mut index: HashMap<(bool, String), usize> = HashMap::new();
    for intron_info in intron_map.get_sorted() {
        let annotated = intron_info.is_annotated()?;
        let motif = intron_info.motif_str(normalization);
        let idx = *index.entry((annotated, motif.clone())).or_insert_with(|| {
            counts.push(IntronCounts::new(annotated, motif));
            counts.len() - 1
        });
        counts[idx].add(intron_info);
    }
    debug!("Collected {} intron count categories", counts.len());
    Ok(counts)
}

pub const COUNTS_TSV_HEADER: [&str; 10] = [
    "annotated",
    "intronMotif",
    "count",
    "numUniqueMapReads",
    "minNumUniqueMapReads",
    "maxNumUniqueMapReads",
    "numMultiMapReads",
    "minNumMultiMapReads",
    "maxNumMultiMapReads",
    "transcriptCount",
];

fn write_counts<W: Write + ?Sized>(out: &mut W, counts: &[IntronCounts]) -> std::io::Result<()> {
    writeln!(out, "{}", COUNTS_TSV_HEADER.join("\t"))?;
    for c in counts {
        writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            c.annotated as u8,
            c.intron_motif,
            c.count,
            c.num_unique_map_reads,
            c.min_num_unique_map_reads,
            c.max_num_unique_map_reads,
            c.num_multi_map_reads,
            c.min_num_multi_map_reads,
            c.max_num_multi_map_reads,
            c.transcript_count
        )?;
    }
    Ok(())
}

/// Write category counts as a TSV.
pub fn save_intron_counts(path: &Path, counts: &[IntronCounts]) -> Result<()> {
    let mut out = create_writer(path)?;
    write_counts(&mut out, counts)
        .and_then(|_| out.finish())
        .map_err(|e| Error::io(path, e))
}
