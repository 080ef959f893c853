//! Collect RNA-seq splice junction support for annotated and novel introns.
//!
//! Transcript introns and STAR `SJ.out.tab` calls from many runs are merged
//! into an [`IntronMap`](intron_map::IntronMap) keyed by intron location,
//! which the reports then walk in location order.

pub mod analysis;
pub mod collect;
pub mod config;
pub mod counts;
pub mod data_loader;
pub mod error;
pub mod genome;
pub mod intron_map;
pub mod junction;
pub mod report;
pub mod split;
pub mod transcript;

pub use error::{Error, Result};
