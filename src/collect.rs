// Modules for assembling an intron map from annotation and RNA-seq inputs
use std::path::Path;

use log::info;

use crate::analysis::AnalysisSet;
use crate::config::EvidenceConfig;
use crate::error::Result;
use crate::intron_map::IntronMap;
use crate::transcript::read_gene_preds;

/// Build the intron map used by the evidence and summary reports: transcripts
/// first, then every analysis' junctions, then the cached splice sites.
/// The map is checked for STAR/annotation agreement before it is returned.
pub fn load_intron_map(
    gene_pred: &Path,
    splice_tsv: Option<&Path>,
    analyses: &AnalysisSet,
    config: &EvidenceConfig,
) -> Result<IntronMap> {
    let mut intron_map = IntronMap::new();

    info!("Loading transcripts from {}", gene_pred.display());
    intron_map.load_transcripts(read_gene_preds(gene_pred)?);

    info!(
        "Loading splice junctions from {} analyses (min overhang {})",
        analyses.len(),
        config.min_overhang
    );
    intron_map.load_analysis_set(analyses, config.min_overhang)?;

    if let Some(splice_tsv) = splice_tsv {
        info!("Loading transcript splice sites from {}", splice_tsv.display());
        intron_map.load_transcript_splice_sites(splice_tsv)?;
    }

    intron_map.check_consistency()?;
    info!("Collected {} introns", intron_map.len());
    Ok(intron_map)
}
