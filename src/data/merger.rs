//! Reference Merger Module
//! Joins regions with departments, then referendum rows with that lookup.

use crate::data::columns::{
    CODE, CODE_DEP, CODE_REG, DEPARTMENT_CODE, NAME, NAME_DEP, NAME_REG, REGION_CODE,
};
use polars::prelude::*;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum MergeError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Department code '{0}' appears more than once in the region lookup")]
    DuplicateDepartment(String),
    #[error("Region code '{0}' appears more than once in the regions table")]
    DuplicateRegion(String),
}

/// Merge regions and departments into one lookup table.
///
/// Output columns: `[code_reg, name_reg, code_dep, name_dep]`, one row per
/// department whose `region_code` matches a region, sorted by `code_dep`.
pub fn merge_regions_and_departments(
    regions: &DataFrame,
    departments: &DataFrame,
) -> Result<DataFrame, MergeError> {
    let region_codes = regions
        .clone()
        .lazy()
        .select([col(CODE)])
        .sort([CODE], Default::default())
        .collect()?;
    if let Some(code) = first_duplicate(region_codes.column(CODE)?.str()?) {
        return Err(MergeError::DuplicateRegion(code));
    }

    let regions = regions
        .clone()
        .lazy()
        .select([col(CODE).alias(CODE_REG), col(NAME).alias(NAME_REG)]);
    let departments = departments.clone().lazy().select([
        col(REGION_CODE),
        col(CODE).alias(CODE_DEP),
        col(NAME).alias(NAME_DEP),
    ]);

    let merged = regions
        .join(
            departments,
            [col(CODE_REG)],
            [col(REGION_CODE)],
            JoinArgs::new(JoinType::Inner),
        )
        .select([col(CODE_REG), col(NAME_REG), col(CODE_DEP), col(NAME_DEP)])
        .sort([CODE_DEP], Default::default())
        .collect()?;

    if let Some(code) = first_duplicate(merged.column(CODE_DEP)?.str()?) {
        return Err(MergeError::DuplicateDepartment(code));
    }

    debug!(departments = merged.height(), "merged regions and departments");
    Ok(merged)
}

/// Zero-pad single digit department codes ("1" -> "01").
///
/// Any other code ("10", "2A", "ZA", ...) is returned unchanged.
pub fn normalize_department_code(code: &str) -> String {
    match code.as_bytes() {
        [digit] if digit.is_ascii_digit() => format!("0{code}"),
        _ => code.to_string(),
    }
}

/// Merge referendum rows with the region/department lookup.
///
/// Rows whose department is absent from the lookup (overseas departments and
/// territories, French citizens living abroad) are dropped by the inner join.
/// The lookup's `code_dep` key is not repeated in the output.
pub fn merge_referendum_and_areas(
    referendum: &DataFrame,
    regions_and_departments: &DataFrame,
) -> Result<DataFrame, MergeError> {
    let normalized: Vec<Option<String>> = referendum
        .column(DEPARTMENT_CODE)?
        .str()?
        .into_iter()
        .map(|code| code.map(normalize_department_code))
        .collect();

    let mut referendum_normalized = referendum.clone();
    referendum_normalized.with_column(Column::new(DEPARTMENT_CODE.into(), normalized))?;

    let merged = referendum_normalized
        .lazy()
        .join(
            regions_and_departments.clone().lazy(),
            [col(DEPARTMENT_CODE)],
            [col(CODE_DEP)],
            JoinArgs::new(JoinType::Inner),
        )
        .collect()?;

    info!(
        kept = merged.height(),
        dropped = referendum.height().saturating_sub(merged.height()),
        "merged referendum with regions, rows outside the lookup dropped"
    );
    Ok(merged)
}

fn first_duplicate(codes: &StringChunked) -> Option<String> {
    let mut previous: Option<&str> = None;
    // Input is sorted, so duplicates are adjacent.
    for code in codes.into_iter().flatten() {
        if previous == Some(code) {
            return Some(code.to_string());
        }
        previous = Some(code);
    }
    None
}
