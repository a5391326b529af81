//! Outer join of the population and GDP tables.

use std::collections::HashMap;

use polars::prelude::DataFrame;
use tracing::{debug, info};

use worldstat_model::schema::{COUNTRY_CODE, COUNTRY_NAME, GDP, POPULATION, YEAR};
use worldstat_model::{CanonicalRow, Measure, MergedRow};

use crate::data_utils::{ensure_country_code, f64_column, i32_column, string_column};
use crate::dedupe::dedupe_frame_by_keys;
use crate::error::{Result, TransformError};
use crate::frame::MeasureFrame;

/// Merges the available measure tables into one row per country and year.
///
/// Returns `None` when neither table is present. With both present the rows
/// are outer-joined on `(country_code, year)`; null codes never match. The
/// result is deduplicated on the same key, keeping the first row.
pub fn merge_measures(
    population: Option<&MeasureFrame>,
    gdp: Option<&MeasureFrame>,
) -> Result<Option<DataFrame>> {
    let rows = match (population, gdp) {
        (None, None) => {
            debug!("no measure tables to merge");
            return Ok(None);
        }
        (Some(only), None) | (None, Some(only)) => measure_rows(only)?
            .iter()
            .map(MergedRow::from_single)
            .collect(),
        (Some(pop), Some(gdp)) => outer_join(&measure_rows(pop)?, &measure_rows(gdp)?),
    };

    let joined = merged_frame(&rows)?;
    let merged = dedupe_frame_by_keys(&joined, &[COUNTRY_CODE, YEAR])?;
    info!(
        joined = joined.height(),
        merged = merged.height(),
        "merged measure tables"
    );
    Ok(Some(merged))
}

fn measure_rows(frame: &MeasureFrame) -> Result<Vec<CanonicalRow>> {
    let data = ensure_country_code(&frame.data)?;
    MeasureFrame::new(frame.measure, data).rows()
}

/// Full outer join in population order, unmatched GDP rows last.
pub fn outer_join(population: &[CanonicalRow], gdp: &[CanonicalRow]) -> Vec<MergedRow> {
    let mut index: HashMap<(&str, i32), Vec<usize>> = HashMap::new();
    for (pos, row) in gdp.iter().enumerate() {
        if let Some(code) = row.country_code.as_deref() {
            index.entry((code, row.year)).or_default().push(pos);
        }
    }

    let mut matched = vec![false; gdp.len()];
    let mut out = Vec::with_capacity(population.len().max(gdp.len()));
    for pop in population {
        let partners = pop
            .country_code
            .as_deref()
            .and_then(|code| index.get(&(code, pop.year)));
        match partners {
            Some(partners) => {
                for &pos in partners {
                    matched[pos] = true;
                    out.push(combine(Some(pop), Some(&gdp[pos])));
                }
            }
            None => out.push(combine(Some(pop), None)),
        }
    }
    for (row, _) in gdp.iter().zip(&matched).filter(|(_, hit)| !**hit) {
        out.push(combine(None, Some(row)));
    }
    out
}

fn combine(pop: Option<&CanonicalRow>, gdp: Option<&CanonicalRow>) -> MergedRow {
    MergedRow {
        country_name: pop
            .and_then(|r| r.country_name.clone())
            .or_else(|| gdp.and_then(|r| r.country_name.clone())),
        country_code: pop
            .and_then(|r| r.country_code.clone())
            .or_else(|| gdp.and_then(|r| r.country_code.clone())),
        year: pop.or(gdp).map_or(0, |r| r.year),
        population: pop.and_then(|r| value_for(r, Measure::Population)),
        gdp: gdp.and_then(|r| value_for(r, Measure::Gdp)),
    }
}

fn value_for(row: &CanonicalRow, measure: Measure) -> Option<f64> {
    (row.measure == measure).then_some(row.value).flatten()
}

/// Builds the output frame `country_name, country_code, year, population, gdp`.
pub fn merged_frame(rows: &[MergedRow]) -> Result<DataFrame> {
    let frame = DataFrame::new(vec![
        string_column(
            COUNTRY_NAME,
            rows.iter().map(|r| r.country_name.clone()).collect(),
        ),
        string_column(
            COUNTRY_CODE,
            rows.iter().map(|r| r.country_code.clone()).collect(),
        ),
        i32_column(YEAR, rows.iter().map(|r| Some(r.year)).collect()),
        f64_column(POPULATION, rows.iter().map(|r| r.population).collect()),
        f64_column(GDP, rows.iter().map(|r| r.gdp).collect()),
    ])?;
    Ok(frame)
}

/// Reads a merged frame back as typed rows.
pub fn merged_rows(df: &DataFrame) -> Result<Vec<MergedRow>> {
    use crate::data_utils::{column_f64, column_i32, column_strings};

    let names = column_strings(df, COUNTRY_NAME)?;
    let codes = column_strings(df, COUNTRY_CODE)?;
    let years = column_i32(df, YEAR)?;
    let population = column_f64(df, POPULATION)?;
    let gdp = column_f64(df, GDP)?;

    names
        .into_iter()
        .zip(codes)
        .zip(years)
        .zip(population.into_iter().zip(gdp))
        .map(|(((country_name, country_code), year), (population, gdp))| {
            let year = year.ok_or_else(|| TransformError::schema_mismatch([YEAR]))?;
            Ok(MergedRow {
                country_name,
                country_code,
                year,
                population,
                gdp,
            })
        })
        .collect()
}
