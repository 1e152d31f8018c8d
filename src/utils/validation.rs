//! Validation utilities for beacon query input

use std::sync::OnceLock;

use regex_lite::Regex;

use crate::error::{PortalError, Result};
use crate::models::BeaconQuery;

/// Field of a beacon query being validated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeaconField {
    Chromosome,
    Position,
    Allele,
    ReferenceAllele,
    ReferenceGenome,
    Dataset,
}

impl std::fmt::Display for BeaconField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BeaconField::Chromosome => write!(f, "chromosome"),
            BeaconField::Position => write!(f, "position"),
            BeaconField::Allele => write!(f, "allele"),
            BeaconField::ReferenceAllele => write!(f, "referenceAllele"),
            BeaconField::ReferenceGenome => write!(f, "reference"),
            BeaconField::Dataset => write!(f, "dataset"),
        }
    }
}

fn chromosome_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^(chr)?([1-9]|1[0-9]|2[0-2]|X|Y|MT?)$").unwrap_or_else(|_| {
            // Pattern costante, non dovrebbe mai fallire
            Regex::new(r"^$").unwrap()
        })
    })
}

fn allele_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[ACGTNacgtn]+$").unwrap_or_else(|_| Regex::new(r"^$").unwrap())
    })
}

/// Validate a single beacon field
///
/// # Arguments
/// * `field` - Which field the value belongs to
/// * `value` - The raw value as entered
///
/// # Returns
/// Ok(()) if valid, Err(Validation) naming the field if not
pub fn validate_beacon_field(field: BeaconField, value: &str) -> Result<()> {
    let is_valid = match field {
        BeaconField::Chromosome => chromosome_pattern().is_match(value.trim()),
        BeaconField::Position => value.trim().parse::<u64>().map(|p| p >= 1).unwrap_or(false),
        BeaconField::Allele | BeaconField::ReferenceAllele => allele_pattern().is_match(value.trim()),
        BeaconField::ReferenceGenome | BeaconField::Dataset => !value.trim().is_empty(),
    };

    if is_valid {
        Ok(())
    } else {
        Err(PortalError::Validation(format!(
            "{} non valido: '{}'",
            field, value
        )))
    }
}

/// Validate a whole query before it is sent
///
/// Position must be 1-based, so 0 is rejected here rather than underflowing
/// during the coordinate translation.
pub fn validate_beacon_query(query: &BeaconQuery) -> Result<()> {
    validate_beacon_field(BeaconField::Chromosome, &query.chromosome)?;
    validate_beacon_field(BeaconField::Position, &query.position.to_string())?;
    validate_beacon_field(BeaconField::Allele, &query.allele)?;
    validate_beacon_field(BeaconField::ReferenceAllele, &query.reference_allele)?;
    validate_beacon_field(BeaconField::ReferenceGenome, &query.reference_genome)?;
    validate_beacon_field(BeaconField::Dataset, &query.dataset_id)?;
    Ok(())
}
