//! Combined annual table across concepts.
//!
//! Series are outer-joined on fiscal year: a year present in any series gets a
//! row, and a concept with no value for that year gets an empty cell.

use chrono::NaiveDateTime;
use fiscal_core::{CompanyMeta, FiscalError, ResolvedAnnualValue, Result};
use polars::prelude::*;
use std::collections::BTreeMap;
use std::io::Write;

/// One row of an [`AnnualTable`].
#[derive(Clone, Debug, PartialEq)]
pub struct TableRow {
    /// Fiscal year.
    pub fiscal_year: i32,
    /// One cell per table column; `None` where the concept has no value.
    pub values: Vec<Option<f64>>,
}

/// Resolved series of several concepts, outer-joined on fiscal year.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnnualTable {
    columns: Vec<String>,
    rows: Vec<TableRow>,
}

impl AnnualTable {
    /// Outer-joins named series on fiscal year. Rows are ascending by year.
    pub fn outer_join<'a, I>(series: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a [ResolvedAnnualValue])>,
    {
        let series: Vec<(&str, &[ResolvedAnnualValue])> = series.into_iter().collect();
        let width = series.len();
        let mut by_year: BTreeMap<i32, Vec<Option<f64>>> = BTreeMap::new();

        for (idx, (_, values)) in series.iter().enumerate() {
            for v in *values {
                by_year.entry(v.fiscal_year).or_insert_with(|| vec![None; width])[idx] =
                    Some(v.value);
            }
        }

        Self {
            columns: series.iter().map(|(name, _)| (*name).to_string()).collect(),
            rows: by_year
                .into_iter()
                .map(|(fiscal_year, values)| TableRow {
                    fiscal_year,
                    values,
                })
                .collect(),
        }
    }

    /// Column names, excluding the fiscal year.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows, ascending by fiscal year.
    #[must_use]
    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    /// Returns true if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell for a fiscal year and column.
    #[must_use]
    pub fn get(&self, fiscal_year: i32, column: &str) -> Option<f64> {
        let idx = self.columns.iter().position(|c| c == column)?;
        self.rows
            .iter()
            .find(|row| row.fiscal_year == fiscal_year)
            .and_then(|row| row.values[idx])
    }

    /// Keeps only the last `n` fiscal years.
    #[must_use]
    pub fn tail(mut self, n: usize) -> Self {
        let skip = self.rows.len().saturating_sub(n);
        self.rows.drain(..skip);
        self
    }

    /// Converts the table into a `DataFrame` with a `fiscal_year` column followed by
    /// one nullable `f64` column per concept.
    ///
    /// # Errors
    /// Returns [`FiscalError::Other`] if the frame cannot be assembled.
    pub fn to_data_frame(&self) -> Result<DataFrame> {
        let years: Vec<i32> = self.rows.iter().map(|row| row.fiscal_year).collect();
        let mut columns = Vec::with_capacity(self.columns.len() + 1);
        columns.push(Column::new("fiscal_year".into(), years));

        for (idx, name) in self.columns.iter().enumerate() {
            let cells: Vec<Option<f64>> = self.rows.iter().map(|row| row.values[idx]).collect();
            columns.push(Column::new(PlSmallStr::from(name.as_str()), cells));
        }

        DataFrame::new(columns).map_err(|e| FiscalError::Other(e.to_string()))
    }
}

/// Metadata written as comment lines above the CSV body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CsvHeader {
    /// Company the table describes.
    pub meta: CompanyMeta,
    /// When the export was generated.
    pub generated_at: NaiveDateTime,
}

/// Writes the table as CSV preceded by `#` metadata lines.
///
/// # Errors
/// Returns [`FiscalError::Other`] on I/O or serialization failure.
pub fn write_csv<W: Write>(mut writer: W, table: &AnnualTable, header: &CsvHeader) -> Result<()> {
    let io_err = |e: std::io::Error| FiscalError::Other(format!("Failed to write CSV: {e}"));

    writeln!(writer, "# Company: {}", header.meta.entity_name).map_err(io_err)?;
    writeln!(writer, "# CIK: {}", header.meta.cik.value()).map_err(io_err)?;
    writeln!(
        writer,
        "# Ticker: {}",
        header.meta.ticker_list().unwrap_or_default()
    )
    .map_err(io_err)?;
    writeln!(
        writer,
        "# Generated: {}",
        header.generated_at.format("%Y-%m-%d %H:%M:%S")
    )
    .map_err(io_err)?;
    writeln!(writer, "#").map_err(io_err)?;

    let mut df = table.to_data_frame()?;
    CsvWriter::new(&mut writer)
        .include_header(true)
        .finish(&mut df)
        .map_err(|e| FiscalError::Other(format!("Failed to write CSV: {e}")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use fiscal_core::Cik;

    fn series(points: &[(i32, f64)]) -> Vec<ResolvedAnnualValue> {
        points
            .iter()
            .map(|&(fy, v)| ResolvedAnnualValue::new(fy, v))
            .collect()
    }

    fn sample_table() -> AnnualTable {
        let net_income = series(&[(2019, 10.0), (2020, 20.0), (2021, 30.0)]);
        let revenue = series(&[(2020, 100.0), (2021, 200.0), (2022, 300.0)]);
        AnnualTable::outer_join([
            ("net_income", net_income.as_slice()),
            ("revenue", revenue.as_slice()),
        ])
    }

    #[test]
    fn test_outer_join_keeps_every_year() {
        let table = sample_table();
        assert_eq!(table.columns(), ["net_income", "revenue"]);

        let years: Vec<i32> = table.rows().iter().map(|r| r.fiscal_year).collect();
        assert_eq!(years, vec![2019, 2020, 2021, 2022]);

        assert_eq!(table.get(2019, "net_income"), Some(10.0));
        assert_eq!(table.get(2019, "revenue"), None);
        assert_eq!(table.get(2022, "net_income"), None);
        assert_eq!(table.get(2022, "revenue"), Some(300.0));
        assert_eq!(table.get(2022, "assets"), None);
    }

    #[test]
    fn test_tail() {
        let table = sample_table().tail(2);
        let years: Vec<i32> = table.rows().iter().map(|r| r.fiscal_year).collect();
        assert_eq!(years, vec![2021, 2022]);

        let table = sample_table().tail(10);
        assert_eq!(table.rows().len(), 4);
    }

    #[test]
    fn test_empty_join() {
        let table = AnnualTable::outer_join(std::iter::empty());
        assert!(table.is_empty());
        assert!(table.columns().is_empty());
    }

    #[test]
    fn test_to_data_frame() {
        let df = sample_table().to_data_frame().unwrap();
        assert_eq!(df.height(), 4);
        assert_eq!(df.width(), 3);

        let revenue = df.column("revenue").unwrap();
        assert_eq!(revenue.null_count(), 1);
        let revenue = revenue.f64().unwrap();
        assert_eq!(revenue.get(0), None);
        assert_eq!(revenue.get(1), Some(100.0));
    }

    #[test]
    fn test_write_csv_with_metadata_header() {
        let header = CsvHeader {
            meta: CompanyMeta {
                entity_name: "ADVANCED MICRO DEVICES, INC.".to_string(),
                cik: Cik::new(2488),
                tickers: vec!["AMD".to_string()],
            },
            generated_at: NaiveDate::from_ymd_opt(2024, 3, 1)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap(),
        };

        let mut buf = Vec::new();
        write_csv(&mut buf, &sample_table(), &header).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "# Company: ADVANCED MICRO DEVICES, INC.");
        assert_eq!(lines[1], "# CIK: 2488");
        assert_eq!(lines[2], "# Ticker: AMD");
        assert_eq!(lines[3], "# Generated: 2024-03-01 09:30:00");
        assert_eq!(lines[4], "#");
        assert_eq!(lines[5], "fiscal_year,net_income,revenue");
        assert_eq!(lines.len(), 10);
        // Missing values are empty cells, never zero.
        assert!(lines[6].starts_with("2019,") && lines[6].ends_with(','));
        assert!(lines[9].starts_with("2022,,"));
    }
}
