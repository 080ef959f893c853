// Modules for RNA-seq analysis sets
use std::ops::Index;
use std::path::{Path, PathBuf};

use log::debug;

use crate::data_loader::{path_relative_to_file, TsvReader};
use crate::error::Result;

/// Handle to an [`Analysis`] within the [`AnalysisSet`] it was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnalysisId(pub usize);

/// One STAR run of one tissue and the splice junction file it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    pub run_acc: String,
    pub tissue: String,
    /// Resolved relative to the manifest's directory.
    pub sj_path: PathBuf,
}

/// Ordered analyses from a manifest. Junction provenance refers to entries
/// by [`AnalysisId`], so the set must be kept for as long as any intron map
/// built from it is being reported on.
#[derive(Debug, Clone, Default)]
pub struct AnalysisSet {
    pub name: String,
    analyses: Vec<Analysis>,
}

const MANIFEST_COLS: usize = 3;

impl AnalysisSet {
    pub fn new(name: &str) -> Self {
        AnalysisSet {
            name: name.to_string(),
            analyses: Vec::new(),
        }
    }

    /// Load a manifest of `runAccession tissue relativeSjPath`. The header
    /// line is skipped without being checked.
    pub fn load(manifest: &Path, name: &str) -> Result<Self> {
        let mut set = AnalysisSet::new(name);
        let mut reader = TsvReader::open(manifest)?;
        reader.next_row()?;
        while let Some(row) = reader.next_row_exact(MANIFEST_COLS)? {
            let sj_path = path_relative_to_file(manifest, &row.fields[2]);
            set.push(Analysis {
                run_acc: row.fields[0].clone(),
                tissue: row.fields[1].clone(),
                sj_path,
            });
        }
        debug!("Loaded {} analyses from {}", set.len(), manifest.display());
        Ok(set)
    }

    pub fn push(&mut self, analysis: Analysis) -> AnalysisId {
        self.analyses.push(analysis);
        AnalysisId(self.analyses.len() - 1)
    }

    pub fn get(&self, id: AnalysisId) -> Option<&Analysis> {
        self.analyses.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.analyses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.analyses.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = AnalysisId> {
        (0..self.analyses.len()).map(AnalysisId)
    }
}

impl Index<AnalysisId> for AnalysisSet {
    type Output = Analysis;

    fn index(&self, id: AnalysisId) -> &Analysis {
        &self.analyses[id.0]
    }
}
