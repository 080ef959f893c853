// Modules for splitting STAR junction files by chromosome
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::data_loader::{path_relative_to_file, TsvReader};
use crate::error::{Error, Result};
use crate::junction::{parse_junction_row, SpliceJunction};

/// One row of a STAR results directory TSV.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StarResults {
    pub run_acc: String,
    pub mapping_param_symid: String,
    pub mapping_symid: String,
    /// `SJ.out.tab`, resolved relative to the directory TSV.
    pub sjout: PathBuf,
}

const STAR_RESULTS_COLS: usize = 4;

/// Load `run_acc mapping_param_symid mapping_symid sjout`, skipping the header.
pub fn load_star_results_dir(path: &Path) -> Result<Vec<StarResults>> {
    let mut reader = TsvReader::open(path)?;
    reader.next_row()?;
    let mut results = Vec::new();
    while let Some(row) = reader.next_row_exact(STAR_RESULTS_COLS)? {
        results.push(StarResults {
            run_acc: row.fields[0].clone(),
            mapping_param_symid: row.fields[1].clone(),
            mapping_symid: row.fields[2].clone(),
            sjout: path_relative_to_file(path, &row.fields[3]),
        });
    }
    Ok(results)
}

/// Half-open range of directory TSV lines to process. The header is line zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    pub start: usize,
    pub end: usize,
}

impl LineRange {
    /// Both bounds or neither must be given; neither means every data line.
    pub fn from_options(start: Option<usize>, end: Option<usize>, num_rows: usize) -> Result<Self> {
        match (start, end) {
            (Some(start), Some(end)) => Ok(LineRange { start, end }),
            (None, None) => Ok(LineRange {
                start: 1,
                end: num_rows + 1,
            }),
            _ => Err(Error::InvalidArgument(
                "must specify either both or neither of --start-line and --end-line".to_string(),
            )),
        }
    }

    pub fn contains(&self, line: usize) -> bool {
        self.start <= line && line < self.end
    }
}

/// Writes junctions of one run into per-chromosome files, opening a new file
/// each time the chromosome changes.
struct ChromSplitter<'a> {
    out_dir: &'a Path,
    mapping_symid: &'a str,
    current_chrom: Option<String>,
    out: Option<(PathBuf, BufWriter<fs::File>)>,
}

impl<'a> ChromSplitter<'a> {
    fn new(out_dir: &'a Path, mapping_symid: &'a str) -> Self {
        ChromSplitter {
            out_dir,
            mapping_symid,
            current_chrom: None,
            out: None,
        }
    }

    fn open_chrom(&mut self, chrom: &str) -> Result<()> {
        let chrom_dir = self.out_dir.join(chrom);
        let path = chrom_dir.join(format!("{}.sjsup", self.mapping_symid));
        if path.exists() {
            return Err(Error::OutputExists(path));
        }
        self.close()?;
        fs::create_dir_all(&chrom_dir).map_err(|e| Error::io(&chrom_dir, e))?;
        let file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| Error::io(&path, e))?;
        self.out = Some((path, BufWriter::new(file)));
        self.current_chrom = Some(chrom.to_string());
        Ok(())
    }

    fn write(&mut self, sj: &SpliceJunction) -> Result<()> {
        if self.current_chrom.as_deref() != Some(sj.chrom.as_str()) {
            self.open_chrom(&sj.chrom)?;
        }
        if let Some((path, file)) = self.out.as_mut() {
            // zero-based start, unlike SJ.out.tab
            writeln!(
                file,
                "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
                sj.chrom,
                sj.start,
                sj.end,
                sj.strand.code(),
                sj.intron_motif.code(),
                sj.annotated as u8,
                sj.num_unique_map_reads,
                sj.num_multi_map_reads,
                sj.max_overhang,
                self.mapping_symid
            )
            .map_err(|e| Error::io(path.as_path(), e))?;
        }
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if let Some((path, mut file)) = self.out.take() {
            file.flush().map_err(|e| Error::io(&path, e))?;
        }
        Ok(())
    }
}

fn split_rows(reader: &mut TsvReader, splitter: &mut ChromSplitter, min_overhang: u32) -> Result<usize> {
    let mut num_written = 0;
    while let Some(row) = reader.next_row()? {
        let sj = parse_junction_row(reader, &row)?;
        if sj.max_overhang >= min_overhang {
            splitter.write(&sj)?;
            num_written += 1;
        }
    }
    Ok(num_written)
}

/// Split one run's junctions, which must be grouped by chromosome. Rows are
/// streamed, so a bad row stops the run after the rows before it are written.
/// Returns the number of junctions written.
pub fn split_star_results(star_results: &StarResults, min_overhang: u32, out_dir: &Path) -> Result<usize> {
    let mut reader = TsvReader::open(&star_results.sjout)?;
    let mut splitter = ChromSplitter::new(out_dir, &star_results.mapping_symid);
    let split = split_rows(&mut reader, &mut splitter, min_overhang);
    // close even on error, the row error takes precedence
    let closed = splitter.close();
    let num_written = split?;
    closed?;
    debug!(
        "Split {} junctions of {} {}",
        num_written, star_results.run_acc, star_results.mapping_symid
    );
    Ok(num_written)
}

/// Split every run in `lines` of a STAR results directory TSV.
pub fn split_star_results_dir(
    star_results_dir: &[StarResults],
    lines: LineRange,
    min_overhang: u32,
    out_dir: &Path,
) -> Result<()> {
    fs::create_dir_all(out_dir).map_err(|e| Error::io(out_dir, e))?;
    let mut num_runs = 0;
    for (i, star_results) in star_results_dir.iter().enumerate() {
        // header is line zero
        if lines.contains(i + 1) {
            split_star_results(star_results, min_overhang, out_dir)?;
            num_runs += 1;
        }
    }
    info!("Split {} STAR runs into {}", num_runs, out_dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn setup(dir: &Path) -> PathBuf {
        fs::create_dir_all(dir.join("runs")).unwrap();
        fs::write(
            dir.join("runs/run1.SJ.out.tab"),
            "chr1\t101\t140\t1\t1\t1\t10\t0\t20\n\
             chr1\t501\t900\t1\t1\t0\t2\t0\t3\n\
             chr2\t11\t90\t2\t2\t0\t4\t1\t9\n",
        )
        .unwrap();
        fs::write(dir.join("runs/run2.SJ.out.tab"), "chr2\t11\t90\t2\t2\t0\t1\t1\t30\n").unwrap();
        let tsv = dir.join("star_results.tsv");
        fs::write(
            &tsv,
            "run_acc\tmapping_param_symid\tmapping_symid\tsjout\n\
             SRR1\tstd\tSRR1_std\truns/run1.SJ.out.tab\n\
             SRR2\tstd\tSRR2_std\truns/run2.SJ.out.tab\n",
        )
        .unwrap();
        tsv
    }

    #[test]
    fn line_range_options() {
        assert_eq!(
            LineRange::from_options(None, None, 5).unwrap(),
            LineRange { start: 1, end: 6 }
        );
        assert!(LineRange::from_options(Some(1), None, 5).is_err());
        let range = LineRange::from_options(Some(2), Some(3), 5).unwrap();
        assert!(!range.contains(1));
        assert!(range.contains(2));
        assert!(!range.contains(3));
    }

    #[test]
    fn split_by_chrom_with_zero_based_starts() {
        let dir = tempdir().unwrap();
        let tsv = setup(dir.path());
        let results = load_star_results_dir(&tsv).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].sjout, dir.path().join("runs/run1.SJ.out.tab"));

        let out_dir = dir.path().join("split");
        let lines = LineRange::from_options(None, None, results.len()).unwrap();
        split_star_results_dir(&results, lines, 5, &out_dir).unwrap();

        let chr1 = fs::read_to_string(out_dir.join("chr1/SRR1_std.sjsup")).unwrap();
        assert_eq!(chr1, "chr1\t100\t140\t1\t1\t1\t10\t0\t20\tSRR1_std\n");
        let chr2 = fs::read_to_string(out_dir.join("chr2/SRR1_std.sjsup")).unwrap();
        assert_eq!(chr2, "chr2\t10\t90\t2\t2\t0\t4\t1\t9\tSRR1_std\n");
        assert!(out_dir.join("chr2/SRR2_std.sjsup").exists());
    }

    #[test]
    fn only_selected_lines_are_split() {
        let dir = tempdir().unwrap();
        let tsv = setup(dir.path());
        let results = load_star_results_dir(&tsv).unwrap();
        let out_dir = dir.path().join("split");
        let lines = LineRange::from_options(Some(2), Some(3), results.len()).unwrap();
        split_star_results_dir(&results, lines, 0, &out_dir).unwrap();
        assert!(!out_dir.join("chr1").exists());
        assert!(out_dir.join("chr2/SRR2_std.sjsup").exists());
    }

    #[test]
    fn existing_output_is_an_error() {
        let dir = tempdir().unwrap();
        let tsv = setup(dir.path());
        let results = load_star_results_dir(&tsv).unwrap();
        let out_dir = dir.path().join("split");
        split_star_results(&results[0], 0, &out_dir).unwrap();
        assert!(matches!(
            split_star_results(&results[0], 0, &out_dir),
            Err(Error::OutputExists(_))
        ));
    }

    #[test]
    fn unsorted_chroms_are_detected() {
        let dir = tempdir().unwrap();
        let sjout = dir.path().join("unsorted.SJ.out.tab");
        fs::write(
            &sjout,
            "chr1\t101\t140\t1\t1\t1\t10\t0\t20\n\
             chr2\t11\t90\t2\t2\t0\t4\t1\t9\n\
             chr1\t501\t900\t1\t1\t0\t2\t0\t3\n",
        )
        .unwrap();
        let results = StarResults {
            run_acc: "SRR3".to_string(),
            mapping_param_symid: "std".to_string(),
            mapping_symid: "SRR3_std".to_string(),
            sjout,
        };
        assert!(matches!(
            split_star_results(&results, 0, &dir.path().join("split")),
            Err(Error::OutputExists(_))
        ));
    }

    #[test]
    fn rows_before_a_bad_row_are_written() {
        let dir = tempdir().unwrap();
        let sjout = dir.path().join("bad.SJ.out.tab");
        fs::write(
            &sjout,
            "chr1\t101\t140\t1\t1\t1\t10\t0\t20\n\
             chr1\t501\t900\t7\t1\t0\t2\t0\t3\n",
        )
        .unwrap();
        let results = StarResults {
            run_acc: "SRR4".to_string(),
            mapping_param_symid: "std".to_string(),
            mapping_symid: "SRR4_std".to_string(),
            sjout,
        };
        let out_dir = dir.path().join("split");
        assert!(matches!(
            split_star_results(&results, 0, &out_dir),
            Err(Error::Parse { line: 2, .. })
        ));
        let chr1 = fs::read_to_string(out_dir.join("chr1/SRR4_std.sjsup")).unwrap();
        assert_eq!(chr1, "chr1\t100\t140\t1\t1\t1\t10\t0\t20\tSRR4_std\n");
    }
}
