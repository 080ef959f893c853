// Run configuration shared by the front ends
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Which STAR intron motif code table is used when converting codes to strings.
///
/// `Raw` keeps all six STAR motifs distinct (code 2 is `CT/AC`, the reverse
/// complement of `GT/AG`). `CanonicalizeReverseComplement` reports the
/// reverse-complement codes 2, 4 and 6 under the motif they represent on
/// the transcribed strand, so `GT/AG` introns are counted together
/// regardless of the strand STAR assigned.
///
/// Only the motif column of the evidence report and the motif buckets of the
/// counts report depend on this; the splice-site TSV stores donor/acceptor
/// taken from the genome and is unaffected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MotifNormalization {
    #[default]
    Raw,
    CanonicalizeReverseComplement,
}

impl FromStr for MotifNormalization {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "raw" => Ok(MotifNormalization::Raw),
            "canonical" => Ok(MotifNormalization::CanonicalizeReverseComplement),
            _ => Err(Error::InvalidArgument(format!(
                "invalid motif normalization \"{}\", expected \"raw\" or \"canonical\"",
                s
            ))),
        }
    }
}

impl fmt::Display for MotifNormalization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotifNormalization::Raw => write!(f, "raw"),
            MotifNormalization::CanonicalizeReverseComplement => write!(f, "canonical"),
        }
    }
}

/// Options for building an intron map from an analysis set and reporting on it.
#[derive(Debug, Clone, Default)]
pub struct EvidenceConfig {
    /// Junction calls with a maximum overhang below this are discarded on load.
    pub min_overhang: u32,
    pub motif_normalization: MotifNormalization,
}
