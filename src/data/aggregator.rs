//! Regional Aggregation Module
//! Sums vote counts per region.

use crate::data::columns::{CODE_REG, NAME_REG, VOTE_COLUMNS};
use polars::prelude::*;
use thiserror::Error;
use tracing::{info, warn};

const NAME_VARIANTS: &str = "name_variants";

#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Vote counts must be integers: {0}")]
    NonNumeric(PolarsError),
    #[error("Missing '{column}' count in region '{region}'")]
    MissingVoteCount { column: String, region: String },
    #[error("Negative '{column}' count in region '{region}'")]
    NegativeVoteCount { column: String, region: String },
    #[error("Regions with more than one name: {}", .0.join(", "))]
    InconsistentRegionName(Vec<String>),
}

/// Return a table with the absolute vote counts for each region.
///
/// Output columns: `[code_reg, name_reg, Registered, Abstentions, Null,
/// Choice A, Choice B]`, one row per region, sorted by `code_reg`.
pub fn compute_referendum_result_by_regions(
    referendum_and_areas: &DataFrame,
) -> Result<DataFrame, AggregateError> {
    let coerced = coerce_vote_counts(referendum_and_areas)?;

    let mut aggregations = vec![
        col(NAME_REG).first(),
        col(NAME_REG).n_unique().alias(NAME_VARIANTS),
    ];
    aggregations.extend(VOTE_COLUMNS.iter().map(|c| col(*c).sum()));

    let grouped = coerced
        .lazy()
        .group_by([col(CODE_REG)])
        .agg(aggregations)
        .sort([CODE_REG], Default::default())
        .collect()?;

    let inconsistent = regions_with_several_names(&grouped)?;
    if !inconsistent.is_empty() {
        warn!(regions = ?inconsistent, "region name differs between departments");
        return Err(AggregateError::InconsistentRegionName(inconsistent));
    }

    let mut columns = vec![col(CODE_REG), col(NAME_REG)];
    columns.extend(VOTE_COLUMNS.iter().map(|c| col(*c)));
    let result = grouped.lazy().select(columns).collect()?;

    info!(regions = result.height(), "aggregated referendum by region");
    Ok(result)
}

/// Build a new table keeping the region key and the vote counts cast to `Int64`.
///
/// Every count must be present and non-negative.
fn coerce_vote_counts(df: &DataFrame) -> Result<DataFrame, AggregateError> {
    let mut columns = vec![col(CODE_REG), col(NAME_REG)];
    columns.extend(
        VOTE_COLUMNS
            .iter()
            .map(|c| col(*c).strict_cast(DataType::Int64)),
    );

    let coerced = df
        .clone()
        .lazy()
        .select(columns)
        .collect()
        .map_err(|e| match e {
            PolarsError::ComputeError(_) | PolarsError::InvalidOperation(_) => {
                AggregateError::NonNumeric(e)
            }
            other => AggregateError::PolarsError(other),
        })?;

    check_vote_counts(&coerced)?;
    Ok(coerced)
}

fn check_vote_counts(coerced: &DataFrame) -> Result<(), AggregateError> {
    let regions = coerced.column(CODE_REG)?.str()?;

    for column in VOTE_COLUMNS {
        let counts = coerced.column(column)?.i64()?;
        for (row, count) in counts.into_iter().enumerate() {
            let region = || regions.get(row).unwrap_or_default().to_string();
            match count {
                None => {
                    return Err(AggregateError::MissingVoteCount {
                        column: column.to_string(),
                        region: region(),
                    })
                }
                Some(n) if n < 0 => {
                    return Err(AggregateError::NegativeVoteCount {
                        column: column.to_string(),
                        region: region(),
                    })
                }
                Some(_) => {}
            }
        }
    }
    Ok(())
}

fn regions_with_several_names(grouped: &DataFrame) -> Result<Vec<String>, AggregateError> {
    let offending = grouped
        .clone()
        .lazy()
        .filter(col(NAME_VARIANTS).gt(lit(1)))
        .select([col(CODE_REG)])
        .collect()?;

    Ok(offending
        .column(CODE_REG)?
        .str()?
        .into_iter()
        .flatten()
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::columns::{
        ABSTENTIONS, CHOICE_A, CHOICE_B, DEPARTMENT_CODE, NULL, REGISTERED,
    };

    fn areas() -> DataFrame {
        df!(
            DEPARTMENT_CODE => ["01", "03", "75", "77"],
            CODE_REG => ["84", "84", "11", "11"],
            NAME_REG => [
                "Auvergne-Rhône-Alpes",
                "Auvergne-Rhône-Alpes",
                "Île-de-France",
                "Île-de-France",
            ],
            REGISTERED => ["100", "50", "200", "300"],
            ABSTENTIONS => ["20", "10", "40", "60"],
            NULL => ["5", "1", "10", "15"],
            CHOICE_A => ["30", "15", "60", "90"],
            CHOICE_B => ["45", "24", "90", "135"],
        )
        .unwrap()
    }

    fn int_column(df: &DataFrame, column: &str) -> Vec<i64> {
        df.column(column)
            .unwrap()
            .i64()
            .unwrap()
            .into_iter()
            .map(|v| v.unwrap())
            .collect()
    }

    #[test]
    fn sums_votes_per_region() {
        let result = compute_referendum_result_by_regions(&areas()).unwrap();

        assert_eq!(result.height(), 2);
        let codes: Vec<&str> = result
            .column(CODE_REG)
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .flatten()
            .collect();
        assert_eq!(codes, vec!["11", "84"]);

        assert_eq!(int_column(&result, REGISTERED), vec![500, 150]);
        assert_eq!(int_column(&result, ABSTENTIONS), vec![100, 30]);
        assert_eq!(int_column(&result, NULL), vec![25, 6]);
        assert_eq!(int_column(&result, CHOICE_A), vec![150, 45]);
        assert_eq!(int_column(&result, CHOICE_B), vec![225, 69]);
    }

    #[test]
    fn output_columns_are_fixed() {
        let result = compute_referendum_result_by_regions(&areas()).unwrap();
        let names: Vec<&str> = result.get_column_names().iter().map(|s| s.as_str()).collect();

        assert_eq!(
            names,
            vec![CODE_REG, NAME_REG, REGISTERED, ABSTENTIONS, NULL, CHOICE_A, CHOICE_B]
        );
        assert_eq!(result.column(REGISTERED).unwrap().dtype(), &DataType::Int64);
    }

    #[test]
    fn single_department_region_keeps_its_counts() {
        let areas = df!(
            CODE_REG => ["84"],
            NAME_REG => ["Auvergne-Rhône-Alpes"],
            REGISTERED => ["100"],
            ABSTENTIONS => ["20"],
            NULL => ["5"],
            CHOICE_A => ["30"],
            CHOICE_B => ["45"],
        )
        .unwrap();

        let result = compute_referendum_result_by_regions(&areas).unwrap();

        assert_eq!(result.height(), 1);
        assert_eq!(int_column(&result, REGISTERED), vec![100]);
        assert_eq!(int_column(&result, CHOICE_B), vec![45]);
    }

    #[test]
    fn non_numeric_votes_fail() {
        let mut areas = areas();
        areas
            .with_column(Column::new(REGISTERED.into(), ["100", "n/a", "200", "300"]))
            .unwrap();

        let err = compute_referendum_result_by_regions(&areas).unwrap_err();
        assert!(matches!(err, AggregateError::NonNumeric(_)));
    }

    #[test]
    fn empty_vote_cell_fails() {
        let mut areas = areas();
        areas
            .with_column(Column::new(
                REGISTERED.into(),
                [Some("100"), None, Some("200"), Some("300")],
            ))
            .unwrap();

        let err = compute_referendum_result_by_regions(&areas).unwrap_err();
        match err {
            AggregateError::MissingVoteCount { column, region } => {
                assert_eq!(column, REGISTERED);
                assert_eq!(region, "84");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn negative_vote_count_fails() {
        let mut areas = areas();
        areas
            .with_column(Column::new(CHOICE_B.into(), ["45", "24", "-60", "135"]))
            .unwrap();

        let err = compute_referendum_result_by_regions(&areas).unwrap_err();
        match err {
            AggregateError::NegativeVoteCount { column, region } => {
                assert_eq!(column, CHOICE_B);
                assert_eq!(region, "11");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_column_is_not_a_coercion_error() {
        let areas = areas().drop(CHOICE_A).unwrap();

        let err = compute_referendum_result_by_regions(&areas).unwrap_err();
        assert!(matches!(err, AggregateError::PolarsError(_)));
    }

    #[test]
    fn conflicting_region_names_are_reported() {
        let mut areas = areas();
        areas
            .with_column(Column::new(
                NAME_REG.into(),
                ["Auvergne-Rhône-Alpes", "Auvergne", "Île-de-France", "Île-de-France"],
            ))
            .unwrap();

        let err = compute_referendum_result_by_regions(&areas).unwrap_err();
        match err {
            AggregateError::InconsistentRegionName(codes) => assert_eq!(codes, vec!["84"]),
            other => panic!("unexpected error: {other}"),
        }
    }
}
