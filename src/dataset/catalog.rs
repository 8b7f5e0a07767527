//! Names of the input data files published for each dataset
//!
//! Kinship matrices come in one file per relationship type and minor allele
//! frequency band. Fetching them is left to the caller.

/// Relationship types with a published kinship matrix.
pub const KINSHIP_TYPES: [&str; 5] = [
    "additive",
    "dominance",
    "epistasis_AA",
    "epistasis_AD",
    "epistasis_DD",
];

/// Lower MAF bounds, as written in file names.
pub const MIN_MAF: [&str; 2] = ["0.01", "0.05"];

/// Upper MAF bounds, as written in file names.
pub const MAX_MAF: [&str; 2] = ["0.05", "0.5"];

/// All kinship file names, `kinship_<type>_minMAF<min>_maxMAF<max>.csv.gz`.
///
/// Only bands whose lower bound is below the upper bound exist. Names are
/// ordered by type, then lower bound, then upper bound.
#[must_use]
pub fn kinship_file_names() -> Vec<String> {
    let mut names = Vec::new();
    for ktype in KINSHIP_TYPES {
        for min in MIN_MAF {
            for max in MAX_MAF {
                if parse_maf(min) < parse_maf(max) {
                    names.push(format!("kinship_{ktype}_minMAF{min}_maxMAF{max}.csv.gz"));
                }
            }
        }
    }
    names
}

fn parse_maf(bound: &str) -> f64 {
    bound.parse().unwrap_or(f64::NAN)
}

/// Phenotype file name for a stem; sorted files match kinship sample order.
#[must_use]
pub fn phenotype_file_name(stem: &str, sorted: bool) -> String {
    if sorted {
        format!("{stem}_sorted.csv")
    } else {
        format!("{stem}.csv")
    }
}
