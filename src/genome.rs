// Modules for looking up intron splice sites in the genome
use std::path::Path;

use log::{debug, info};
use rust_htslib::faidx;

use crate::error::{Error, Result};
use crate::intron_map::IntronMap;

/// Random access to genomic sequence.
pub trait SequenceSource {
    /// Sequence of `chrom` over the zero-based half-open range `start..end`.
    fn fetch(&self, chrom: &str, start: u64, end: u64) -> Result<String>;
}

/// Indexed FASTA (`.fai`, optionally bgzip compressed with `.gzi`).
pub struct FaidxGenome {
    reader: faidx::Reader,
}

impl FaidxGenome {
    pub fn open(path: &Path) -> Result<Self> {
        let reader = faidx::Reader::from_path(path).map_err(|e| Error::GenomeOpen {
            path: path.to_path_buf(),
            msg: e.to_string(),
        })?;
        Ok(FaidxGenome { reader })
    }
}

impl SequenceSource for FaidxGenome {
    fn fetch(&self, chrom: &str, start: u64, end: u64) -> Result<String> {
        let err = |msg: String| Error::Sequence {
            chrom: chrom.to_string(),
            start,
            end,
            msg,
        };
        if end <= start {
            return Err(err("empty range".to_string()));
        }
        // faidx end is inclusive
        let seq = self
            .reader
            .fetch_seq_string(chrom, start as usize, (end - 1) as usize)
            .map_err(|e| err(e.to_string()))?;
        if seq.len() as u64 != end - start {
            return Err(err(format!("expected {} bases, got {}", end - start, seq.len())));
        }
        Ok(seq)
    }
}

fn complement(base: u8) -> u8 {
    match base {
        b'A' => b'T',
        b'C' => b'G',
        b'G' => b'C',
        b'T' => b'A',
        other => other,
    }
}

pub fn reverse_complement(seq: &str) -> String {
    seq.bytes().rev().map(|b| complement(b) as char).collect()
}

/// Donor and acceptor dinucleotides of an intron on the given transcript
/// strand, upper-cased. Any strand other than `+` is read as the minus
/// strand: both ends are reverse complemented and swapped.
pub fn splice_sites<S: SequenceSource + ?Sized>(
    genome: &S,
    chrom: &str,
    start: u64,
    end: u64,
    strand: &str,
) -> Result<(String, String)> {
    let first = genome.fetch(chrom, start, start + 2)?.to_ascii_uppercase();
    let last = genome.fetch(chrom, end - 2, end)?.to_ascii_uppercase();
    if strand == "+" {
        Ok((first, last))
    } else {
        Ok((reverse_complement(&last), reverse_complement(&first)))
    }
}

/// Fill in donor and acceptor for every intron in the map.
pub fn annotate_splice_sites<S: SequenceSource + ?Sized>(intron_map: &mut IntronMap, genome: &S) -> Result<()> {
    let mut num_introns = 0;
    for intron_info in intron_map.get_sorted_mut() {
        if intron_info.end() < intron_info.start() + 4 {
            debug!(
                "Skipping splice site lookup for short intron {}:{}-{}",
                intron_info.chrom(),
                intron_info.start(),
                intron_info.end()
            );
            continue;
        }
        let (donor, acceptor) = splice_sites(
            genome,
            intron_info.chrom(),
            intron_info.start(),
            intron_info.end(),
            &intron_info.trans_strand,
        )?;
        intron_info.trans_donor = donor;
        intron_info.trans_acceptor = acceptor;
        num_introns += 1;
    }
    info!("Looked up splice sites for {} introns", num_introns);
    Ok(())
}
