// Modules for collecting transcript and RNA-seq evidence per intron
use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

use itertools::Itertools;
use log::{debug, info};

use crate::analysis::{AnalysisId, AnalysisSet};
use crate::config::MotifNormalization;
use crate::data_loader::{create_writer, TsvReader};
use crate::error::{Error, Result};
use crate::junction::{read_junctions, SpliceJunction, NON_CANONICAL_MOTIF};
use crate::transcript::{Transcript, TranscriptId};

/// Location of an intron, zero-based half-open. Orders by chrom, start, end.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IntronKey {
    pub chrom: String,
    pub start: u64,
    pub end: u64,
}

impl IntronKey {
    pub fn new(chrom: &str, start: u64, end: u64) -> Self {
        IntronKey {
            chrom: chrom.to_string(),
            start,
            end,
        }
    }
}

/// Link from an intron to a transcript containing it. `intron_idx` is the
/// index of the exon the intron follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntronTransLink {
    pub transcript: TranscriptId,
    pub intron_idx: usize,
}

/// Everything known about one intron.
#[derive(Debug, Clone)]
pub struct IntronInfo {
    pub key: IntronKey,
    /// Strand of the transcripts containing the intron, empty if none.
    pub trans_strand: String,
    /// Donor and acceptor dinucleotides from the genome, empty until looked up.
    pub trans_donor: String,
    pub trans_acceptor: String,
    /// Individual STAR calls, in load order.
    pub star_mappings: Vec<SpliceJunction>,
    /// Sum of `star_mappings`.
    pub mappings_sum: Option<SpliceJunction>,
    /// Transcripts containing the intron, in load order.
    pub intron_transes: Vec<IntronTransLink>,
}

impl IntronInfo {
    fn new(key: IntronKey) -> Self {
        IntronInfo {
            key,
            trans_strand: String::new(),
            trans_donor: String::new(),
            trans_acceptor: String::new(),
            star_mappings: Vec::new(),
            mappings_sum: None,
            intron_transes: Vec::new(),
        }
    }

    pub fn chrom(&self) -> &str {
        &self.key.chrom
    }

    pub fn start(&self) -> u64 {
        self.key.start
    }

    pub fn end(&self) -> u64 {
        self.key.end
    }

    fn add_star_mapping(&mut self, star_junc: SpliceJunction) -> Result<()> {
        match self.mappings_sum.as_mut() {
            None => self.mappings_sum = Some(SpliceJunction::new_summary(&star_junc)),
            Some(sum) => sum.accumulate(&star_junc)?,
        }
        self.star_mappings.push(star_junc);
        Ok(())
    }

    /// Is the intron absent from the annotation? When there is STAR evidence,
    /// STAR's annotated flag must agree with whether any transcript contains
    /// the intron, otherwise STAR was run against a different annotation.
    pub fn is_novel(&self) -> Result<bool> {
        let trans_novel = self.intron_transes.is_empty();
        match &self.mappings_sum {
            Some(sum) => {
                let star_novel = !sum.annotated;
                if star_novel != trans_novel {
                    return Err(Error::AnnotationMismatch {
                        chrom: self.key.chrom.clone(),
                        start: self.key.start,
                        end: self.key.end,
                        star_novel,
                        trans_novel,
                    });
                }
                Ok(star_novel)
            }
            None => Ok(trans_novel),
        }
    }

    pub fn is_annotated(&self) -> Result<bool> {
        self.is_novel().map(|novel| !novel)
    }

    /// Intron motif, from the genome lookup if available, otherwise from STAR.
    pub fn motif_str(&self, normalization: MotifNormalization) -> String {
        if !self.trans_donor.is_empty() {
            format!("{}/{}", self.trans_donor, self.trans_acceptor)
        } else if let Some(sum) = &self.mappings_sum {
            sum.motif_str(normalization).to_string()
        } else {
            NON_CANONICAL_MOTIF.to_string()
        }
    }

    pub fn num_unique_map_reads(&self) -> u64 {
        self.mappings_sum.as_ref().map_or(0, |s| s.num_unique_map_reads)
    }

    pub fn num_multi_map_reads(&self) -> u64 {
        self.mappings_sum.as_ref().map_or(0, |s| s.num_multi_map_reads)
    }
}

/// Column names of the transcript splice site TSV.
pub const SPLICE_TSV_HEADER: [&str; 7] = [
    "chrom",
    "chromStart",
    "chromEnd",
    "strand",
    "donor",
    "acceptor",
    "transcripts",
];

/// Introns indexed by location, collected from transcripts and STAR junction calls.
#[derive(Debug, Default)]
pub struct IntronMap {
    introns: HashMap<IntronKey, IntronInfo>,
    transcripts: Vec<Transcript>,
}

impl IntronMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.introns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.introns.is_empty()
    }

    pub fn transcript(&self, id: TranscriptId) -> &Transcript {
        &self.transcripts[id.0]
    }

    pub fn transcripts(&self) -> &[Transcript] {
        &self.transcripts
    }

    pub fn lookup(&self, chrom: &str, start: u64, end: u64) -> Option<&IntronInfo> {
        self.introns.get(&IntronKey::new(chrom, start, end))
    }

    // get or create, the single point where transcripts and STAR calls meet
    fn obtain<'a>(
        introns: &'a mut HashMap<IntronKey, IntronInfo>,
        chrom: &str,
        start: u64,
        end: u64,
    ) -> &'a mut IntronInfo {
        introns
            .entry(IntronKey::new(chrom, start, end))
            .or_insert_with_key(|key| IntronInfo::new(key.clone()))
    }

    /// Add transcripts and link each of their introns of at least
    /// [`MIN_INTRON_SIZE`](crate::transcript::MIN_INTRON_SIZE) bases. When
    /// transcripts disagree on strand for an intron, the last one loaded sets
    /// `trans_strand`.
    pub fn load_transcripts<I>(&mut self, transcripts: I)
    where
        I: IntoIterator<Item = Transcript>,
    {
        let mut num_links = 0;
        for transcript in transcripts {
            let id = TranscriptId(self.transcripts.len());
            for intron_idx in transcript.intron_indices() {
                let (start, end) = transcript.intron_span(intron_idx);
                let info = Self::obtain(&mut self.introns, &transcript.chrom, start, end);
                info.intron_transes.push(IntronTransLink {
                    transcript: id,
                    intron_idx,
                });
                info.trans_strand = transcript.strand.clone();
                num_links += 1;
            }
            self.transcripts.push(transcript);
        }
        debug!(
            "Linked {} transcript introns, {} transcripts, {} introns in map",
            num_links,
            self.transcripts.len(),
            self.introns.len()
        );
    }

    /// Merge STAR junction calls, discarding those with `max_overhang` below
    /// `min_overhang`. Returns the number of calls kept.
    pub fn merge_junctions<I>(&mut self, star_juncs: I, min_overhang: u32) -> Result<usize>
    where
        I: IntoIterator<Item = SpliceJunction>,
    {
        let mut kept = 0;
        for star_junc in star_juncs {
            if star_junc.max_overhang < min_overhang {
                continue;
            }
            let info = Self::obtain(&mut self.introns, &star_junc.chrom, star_junc.start, star_junc.end);
            info.add_star_mapping(star_junc)?;
            kept += 1;
        }
        Ok(kept)
    }

    /// Load the junction file of one analysis, recording the analysis as the
    /// source of each call.
    pub fn load_junctions(
        &mut self,
        analyses: &AnalysisSet,
        analysis_id: AnalysisId,
        min_overhang: u32,
    ) -> Result<()> {
        let analysis = analyses.get(analysis_id).ok_or_else(|| {
            Error::InvalidArgument(format!("no analysis {} in set \"{}\"", analysis_id.0, analyses.name))
        })?;
        let mut star_juncs = read_junctions(&analysis.sj_path)?;
        let total = star_juncs.len();
        for star_junc in star_juncs.iter_mut() {
            star_junc.src_analyses.push(analysis_id);
        }
        let kept = self.merge_junctions(star_juncs, min_overhang)?;
        info!(
            "Loaded {} {}: kept {} of {} junctions",
            analysis.run_acc, analysis.tissue, kept, total
        );
        Ok(())
    }

    /// Load the junctions of every analysis in the set.
    pub fn load_analysis_set(&mut self, analyses: &AnalysisSet, min_overhang: u32) -> Result<()> {
        for id in analyses.ids() {
            self.load_junctions(analyses, id, min_overhang)?;
        }
        Ok(())
    }

    /// All introns, in no particular order.
    pub fn get(&self) -> Vec<&IntronInfo> {
        self.introns.values().collect()
    }

    /// All introns, ordered by location.
    pub fn get_sorted(&self) -> Vec<&IntronInfo> {
        self.introns
            .values()
            .sorted_by(|a, b| a.key.cmp(&b.key))
            .collect()
    }

    pub fn get_sorted_mut(&mut self) -> Vec<&mut IntronInfo> {
        self.introns
            .values_mut()
            .sorted_by(|a, b| a.key.cmp(&b.key))
            .collect()
    }

    /// Names of the transcripts linked to an intron, in link order.
    pub fn transcript_names<'a>(&'a self, info: &'a IntronInfo) -> impl Iterator<Item = &'a str> + 'a {
        info.intron_transes
            .iter()
            .map(move |link| self.transcript(link.transcript).name.as_str())
    }

    /// Check STAR annotation state against transcripts for every intron.
    pub fn check_consistency(&self) -> Result<()> {
        for info in self.get_sorted() {
            info.is_novel()?;
        }
        Ok(())
    }

    fn write_splice_tsv_row<W: Write + ?Sized>(&self, out: &mut W, info: &IntronInfo) -> std::io::Result<()> {
        writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            info.key.chrom,
            info.key.start,
            info.key.end,
            info.trans_strand,
            info.trans_donor,
            info.trans_acceptor,
            self.transcript_names(info).join(",")
        )
    }

    fn write_splice_tsv(&self, out: &mut dyn Write) -> std::io::Result<usize> {
        writeln!(out, "{}", SPLICE_TSV_HEADER.join("\t"))?;
        let mut num_rows = 0;
        for info in self.get_sorted() {
            if !info.trans_donor.is_empty() {
                self.write_splice_tsv_row(out, info)?;
                num_rows += 1;
            }
        }
        Ok(num_rows)
    }

    /// Save the splice sites of introns whose donor/acceptor has been looked up.
    pub fn save_transcript_splice_sites(&self, path: &Path) -> Result<()> {
        let mut out = create_writer(path)?;
        let num_rows = self
            .write_splice_tsv(&mut out)
            .and_then(|num_rows| out.finish().map(|_| num_rows))
            .map_err(|e| Error::io(path, e))?;
        debug!("Wrote {} splice sites to {}", num_rows, path.display());
        Ok(())
    }

    fn check_splice_tsv_header(reader: &mut TsvReader) -> Result<()> {
        let row = reader.next_row()?.ok_or_else(|| Error::PrematureEof {
            path: reader.path().to_path_buf(),
        })?;
        for (i, expected) in SPLICE_TSV_HEADER.iter().enumerate() {
            let found = row.fields.get(i).map(String::as_str).unwrap_or("");
            if found != *expected {
                return Err(Error::BadHeader {
                    path: reader.path().to_path_buf(),
                    found: found.to_string(),
                    expected: expected.to_string(),
                });
            }
        }
        if row.fields.len() != SPLICE_TSV_HEADER.len() {
            return Err(Error::BadHeader {
                path: reader.path().to_path_buf(),
                found: row.fields.join("\t"),
                expected: SPLICE_TSV_HEADER.join("\t"),
            });
        }
        Ok(())
    }

    /// Load splice sites saved by [`save_transcript_splice_sites`](Self::save_transcript_splice_sites),
    /// overwriting strand, donor and acceptor of the matching introns.
    /// Evidence and transcript links are untouched.
    pub fn load_transcript_splice_sites(&mut self, path: &Path) -> Result<()> {
        let mut reader = TsvReader::open(path)?;
        Self::check_splice_tsv_header(&mut reader)?;
        let mut num_rows = 0;
        while let Some(row) = reader.next_row_min(SPLICE_TSV_HEADER.len() - 1)? {
            let start: u64 = reader.parse_field(&row, 1, "chromStart")?;
            let end: u64 = reader.parse_field(&row, 2, "chromEnd")?;
            let info = Self::obtain(&mut self.introns, &row.fields[0], start, end);
            info.trans_strand = row.fields[3].clone();
            info.trans_donor = row.fields[4].clone();
            info.trans_acceptor = row.fields[5].clone();
            num_rows += 1;
        }
        debug!("Loaded {} splice sites from {}", num_rows, path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Analysis;
    use crate::junction::{IntronMotif, SjStrand};
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn transcript(name: &str, strand: &str, exons: &[(u64, u64)]) -> Transcript {
        Transcript {
            name: name.to_string(),
            chrom: "chr1".to_string(),
            strand: strand.to_string(),
            exon_starts: exons.iter().map(|e| e.0).collect(),
            exon_ends: exons.iter().map(|e| e.1).collect(),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn star_junc(
        start: u64,
        end: u64,
        strand: u32,
        motif: u32,
        annotated: bool,
        unique: u64,
        multi: u64,
        overhang: u32,
        src: usize,
    ) -> SpliceJunction {
        SpliceJunction {
            chrom: "chr1".to_string(),
            start,
            end,
            strand: SjStrand::from_code(strand).unwrap(),
            intron_motif: IntronMotif::from_code(motif).unwrap(),
            annotated,
            num_unique_map_reads: unique,
            num_multi_map_reads: multi,
            max_overhang: overhang,
            src_analyses: vec![AnalysisId(src)],
        }
    }

    #[test]
    fn transcript_and_star_share_one_intron() {
        let mut map = IntronMap::new();
        map.load_transcripts(vec![transcript("T1", "+", &[(0, 100), (140, 300)])]);
        map.merge_junctions(vec![star_junc(100, 140, 1, 1, true, 10, 0, 20, 0)], 0)
            .unwrap();
        assert_eq!(map.len(), 1);
        let info = map.lookup("chr1", 100, 140).unwrap();
        assert_eq!(info.intron_transes.len(), 1);
        assert_eq!(info.star_mappings.len(), 1);
        assert_eq!(info.num_unique_map_reads(), 10);
        assert!(!info.is_novel().unwrap());
    }

    #[test]
    fn merge_is_additive() {
        let mut map = IntronMap::new();
        map.merge_junctions(
            vec![
                star_junc(500, 900, 1, 1, false, 5, 2, 10, 0),
                star_junc(500, 900, 1, 1, false, 3, 4, 15, 1),
            ],
            0,
        )
        .unwrap();
        let info = map.lookup("chr1", 500, 900).unwrap();
        let sum = info.mappings_sum.as_ref().unwrap();
        assert_eq!(sum.num_unique_map_reads, 8);
        assert_eq!(sum.num_multi_map_reads, 6);
        assert_eq!(sum.max_overhang, 15);
        assert_eq!(sum.src_analyses, vec![AnalysisId(0), AnalysisId(1)]);
        assert_eq!(info.star_mappings.len(), 2);
        assert_eq!(info.star_mappings[0].num_unique_map_reads, 5);
        assert!(info.is_novel().unwrap());
    }

    #[test]
    fn merge_strand_mismatch_is_an_error() {
        let mut map = IntronMap::new();
        let result = map.merge_junctions(
            vec![
                star_junc(500, 900, 1, 1, false, 5, 2, 10, 0),
                star_junc(500, 900, 2, 1, false, 3, 4, 15, 1),
            ],
            0,
        );
        assert!(matches!(result, Err(Error::MergeMismatch { field: "strand", .. })));
    }

    #[test]
    fn min_overhang_filter() {
        let mut map = IntronMap::new();
        let kept = map
            .merge_junctions(
                vec![
                    star_junc(500, 900, 1, 1, false, 5, 2, 7, 0),
                    star_junc(1000, 2000, 1, 1, false, 5, 2, 8, 0),
                    star_junc(1000, 2000, 1, 1, false, 9, 9, 3, 1),
                ],
                8,
            )
            .unwrap();
        assert_eq!(kept, 1);
        assert!(map.lookup("chr1", 500, 900).is_none());
        let info = map.lookup("chr1", 1000, 2000).unwrap();
        assert_eq!(info.star_mappings.len(), 1);
        assert_eq!(info.num_unique_map_reads(), 5);
        assert_eq!(info.mappings_sum.as_ref().unwrap().src_analyses, vec![AnalysisId(0)]);
    }

    #[test]
    fn annotated_without_transcripts_is_inconsistent() {
        let mut map = IntronMap::new();
        map.merge_junctions(vec![star_junc(500, 900, 1, 1, true, 5, 2, 10, 0)], 0)
            .unwrap();
        let info = map.lookup("chr1", 500, 900).unwrap();
        assert!(matches!(
            info.is_novel(),
            Err(Error::AnnotationMismatch { star_novel: false, trans_novel: true, .. })
        ));
        assert!(map.check_consistency().is_err());
    }

    #[test]
    fn unannotated_with_transcripts_is_inconsistent() {
        let mut map = IntronMap::new();
        map.load_transcripts(vec![transcript("T1", "+", &[(0, 100), (140, 300)])]);
        map.merge_junctions(vec![star_junc(100, 140, 1, 1, false, 5, 2, 10, 0)], 0)
            .unwrap();
        assert!(matches!(
            map.lookup("chr1", 100, 140).unwrap().is_novel(),
            Err(Error::AnnotationMismatch { star_novel: true, trans_novel: false, .. })
        ));
    }

    #[test]
    fn novelty_without_star_evidence() {
        let mut map = IntronMap::new();
        map.load_transcripts(vec![transcript("T1", "+", &[(0, 100), (140, 300)])]);
        map.load_transcript_splice_sites_from_rows(&[("chr1", 5000, 6000, "+", "GT", "AG")]);
        assert!(!map.lookup("chr1", 100, 140).unwrap().is_novel().unwrap());
        assert!(map.lookup("chr1", 5000, 6000).unwrap().is_novel().unwrap());
        assert!(map.check_consistency().is_ok());
    }

    impl IntronMap {
        fn load_transcript_splice_sites_from_rows(&mut self, rows: &[(&str, u64, u64, &str, &str, &str)]) {
            for (chrom, start, end, strand, donor, acceptor) in rows {
                let info = Self::obtain(&mut self.introns, chrom, *start, *end);
                info.trans_strand = strand.to_string();
                info.trans_donor = donor.to_string();
                info.trans_acceptor = acceptor.to_string();
            }
        }
    }

    #[test]
    fn last_loaded_transcript_strand_wins() {
        // No conflict detection on the transcript side; this documents the overwrite.
        let mut map = IntronMap::new();
        map.load_transcripts(vec![
            transcript("T1", "+", &[(0, 100), (140, 300)]),
            transcript("T2", "-", &[(10, 100), (140, 250)]),
        ]);
        let info = map.lookup("chr1", 100, 140).unwrap();
        assert_eq!(info.trans_strand, "-");
        assert_eq!(map.transcript_names(info).collect::<Vec<_>>(), vec!["T1", "T2"]);
        assert_eq!(info.intron_transes[1].intron_idx, 0);
    }

    #[test]
    fn sorted_traversal() {
        let mut map = IntronMap::new();
        map.merge_junctions(
            vec![
                star_junc(100, 200, 1, 1, false, 1, 0, 10, 0),
                star_junc(50, 150, 1, 1, false, 1, 0, 10, 0),
                star_junc(50, 120, 1, 1, false, 1, 0, 10, 0),
            ],
            0,
        )
        .unwrap();
        let mut chr0 = star_junc(900, 1000, 1, 1, false, 1, 0, 10, 0);
        chr0.chrom = "chr0".to_string();
        map.merge_junctions(vec![chr0], 0).unwrap();

        let keys: Vec<(String, u64, u64)> = map
            .get_sorted()
            .iter()
            .map(|i| (i.chrom().to_string(), i.start(), i.end()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("chr0".to_string(), 900, 1000),
                ("chr1".to_string(), 50, 120),
                ("chr1".to_string(), 50, 150),
                ("chr1".to_string(), 100, 200),
            ]
        );
        let again: Vec<&IntronKey> = map.get_sorted().into_iter().map(|i| &i.key).collect();
        let first: Vec<&IntronKey> = map.get_sorted().into_iter().map(|i| &i.key).collect();
        assert_eq!(again, first);
        assert_eq!(map.get().len(), 4);
    }

    #[test]
    fn motif_prefers_genome_lookup() {
        let mut map = IntronMap::new();
        map.merge_junctions(vec![star_junc(500, 900, 2, 2, false, 1, 0, 10, 0)], 0)
            .unwrap();
        let info = map.lookup("chr1", 500, 900).unwrap();
        assert_eq!(info.motif_str(MotifNormalization::Raw), "CT/AC");
        assert_eq!(
            info.motif_str(MotifNormalization::CanonicalizeReverseComplement),
            "GT/AG"
        );
        map.load_transcript_splice_sites_from_rows(&[("chr1", 500, 900, "-", "GT", "AG")]);
        let info = map.lookup("chr1", 500, 900).unwrap();
        assert_eq!(info.motif_str(MotifNormalization::Raw), "GT/AG");

        let mut map = IntronMap::new();
        map.load_transcripts(vec![transcript("T1", "+", &[(0, 100), (140, 300)])]);
        assert_eq!(
            map.lookup("chr1", 100, 140).unwrap().motif_str(MotifNormalization::Raw),
            "??/??"
        );
    }

    #[test]
    fn splice_site_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("splice.tsv");
        let transcripts = vec![
            transcript("T1", "+", &[(0, 100), (140, 300), (400, 500)]),
            transcript("T2", "+", &[(20, 100), (140, 280)]),
        ];

        let mut map = IntronMap::new();
        map.load_transcripts(transcripts.clone());
        for info in map.get_sorted_mut() {
            if info.key.start == 100 {
                info.trans_donor = "GT".to_string();
                info.trans_acceptor = "AG".to_string();
            }
        }
        map.save_transcript_splice_sites(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "chrom\tchromStart\tchromEnd\tstrand\tdonor\tacceptor\ttranscripts\n\
             chr1\t100\t140\t+\tGT\tAG\tT1,T2\n"
        );

        let mut fresh = IntronMap::new();
        fresh.load_transcripts(transcripts);
        fresh.load_transcript_splice_sites(&path).unwrap();
        let info = fresh.lookup("chr1", 100, 140).unwrap();
        assert_eq!(
            (info.trans_strand.as_str(), info.trans_donor.as_str(), info.trans_acceptor.as_str()),
            ("+", "GT", "AG")
        );
        assert_eq!(info.intron_transes.len(), 2);
        assert!(fresh.lookup("chr1", 300, 400).unwrap().trans_donor.is_empty());
        assert_eq!(fresh.len(), 2);
    }

    #[test]
    fn splice_site_load_checks_header() {
        let dir = tempdir().unwrap();
        let empty = dir.path().join("empty.tsv");
        std::fs::write(&empty, "").unwrap();
        let mut map = IntronMap::new();
        assert!(matches!(
            map.load_transcript_splice_sites(&empty),
            Err(Error::PrematureEof { .. })
        ));

        let bad = dir.path().join("bad.tsv");
        std::fs::write(&bad, "chrom\tstart\tchromEnd\tstrand\tdonor\tacceptor\ttranscripts\n").unwrap();
        match map.load_transcript_splice_sites(&bad) {
            Err(Error::BadHeader { found, expected, .. }) => {
                assert_eq!(found, "start");
                assert_eq!(expected, "chromStart");
            }
            other => panic!("expected bad header, got {:?}", other),
        }
    }

    #[test]
    fn splice_site_load_does_not_touch_evidence() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("splice.tsv");
        std::fs::write(
            &path,
            "chrom\tchromStart\tchromEnd\tstrand\tdonor\tacceptor\ttranscripts\n\
             chr1\t500\t900\t-\tGC\tAG\t\n",
        )
        .unwrap();
        let mut map = IntronMap::new();
        map.merge_junctions(vec![star_junc(500, 900, 2, 4, false, 6, 1, 10, 0)], 0)
            .unwrap();
        map.load_transcript_splice_sites(&path).unwrap();
        let info = map.lookup("chr1", 500, 900).unwrap();
        assert_eq!(info.trans_strand, "-");
        assert_eq!(info.trans_donor, "GC");
        assert_eq!(info.num_unique_map_reads(), 6);
        assert_eq!(info.star_mappings.len(), 1);
        assert!(info.intron_transes.is_empty());
    }

    #[test]
    fn load_junctions_tags_provenance() {
        let dir = tempdir().unwrap();
        let sj = dir.path().join("SJ.out.tab");
        std::fs::write(&sj, "chr1\t101\t140\t1\t1\t0\t3\t1\t12\nchr1\t501\t900\t1\t1\t0\t1\t0\t2\n").unwrap();
        let mut set = AnalysisSet::new("test");
        set.push(Analysis {
            run_acc: "SRR1".to_string(),
            tissue: "liver".to_string(),
            sj_path: PathBuf::from("missing.tab"),
        });
        let id = set.push(Analysis {
            run_acc: "SRR2".to_string(),
            tissue: "lung".to_string(),
            sj_path: sj,
        });

        let mut map = IntronMap::new();
        map.load_junctions(&set, id, 5).unwrap();
        assert_eq!(map.len(), 1);
        let info = map.lookup("chr1", 100, 140).unwrap();
        assert_eq!(info.star_mappings[0].src_analyses, vec![id]);
        assert_eq!(set[info.mappings_sum.as_ref().unwrap().src_analyses[0]].tissue, "lung");

        assert!(matches!(
            map.load_junctions(&set, AnalysisId(0), 5),
            Err(Error::Io { .. })
        ));
        assert!(matches!(
            map.load_junctions(&set, AnalysisId(7), 5),
            Err(Error::InvalidArgument(_))
        ));
    }
}
