//! Input data of a genomic-prediction run
//!
//! - [`catalog`]: names of the published kinship and phenotype files
//! - [`PhenotypeLoader`]: reads one trait out of the phenotype table
//! - [`KinshipStack`]: stacks the kinship matrices of a folder into one array
//! - [`TrainValSplit`]: seeded, reproducible validation hold-out
//!
//! Phenotype and kinship files share one sample order (the `_sorted`
//! phenotype file), so sample `i` of a [`TraitPhenotypes`] is row `i` of
//! every kinship layer. Loading checks that the two agree.

pub mod catalog;
mod kinship;
mod phenotypes;
mod split;

pub use catalog::{kinship_file_names, phenotype_file_name};
pub use kinship::KinshipStack;
pub use phenotypes::{PhenotypeLoader, TraitPhenotypes};
pub use split::TrainValSplit;
