use anyhow::{Context, Result};
use chrono::NaiveDate;
use csv::Writer;
use serde::{Deserialize, Serialize};
use std::path::Path;

//how the used-margin column is expressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarginUnit {
    Fraction,
    Percent,
}

impl MarginUnit {
    pub fn scale(&self) -> f64 {
        match self {
            MarginUnit::Fraction => 1.0,
            MarginUnit::Percent => 100.0,
        }
    }

    pub fn column_name(&self) -> &'static str {
        match self {
            MarginUnit::Fraction => "used_asset",
            MarginUnit::Percent => "used_asset_pct",
        }
    }
}

//one simulated day: the input price plus the derived sizing columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    pub date: NaiveDate,
    pub close: f64,
    pub contract_count: u32,
    pub total_asset: f64,
    pub used_asset: f64,
    pub lever_ratio: f64,
    pub rolling_average_asset: Option<f64>,
}

//price series enriched with the per-day simulation state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultTable {
    pub rule: String,
    pub margin_unit: MarginUnit,
    rows: Vec<ResultRow>,
}

impl ResultTable {
    pub fn new(rule: String, margin_unit: MarginUnit, rows: Vec<ResultRow>) -> Self {
        ResultTable {
            rule,
            margin_unit,
            rows,
        }
    }

    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.rows.iter().map(|r| r.date).collect()
    }

    pub fn total_assets(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.total_asset).collect()
    }

    pub fn contract_counts(&self) -> Vec<u32> {
        self.rows.iter().map(|r| r.contract_count).collect()
    }

    pub fn has_rolling_average(&self) -> bool {
        self.rows.iter().any(|r| r.rolling_average_asset.is_some())
    }

    //writes the table as csv, the rolling average column only when present
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut writer =
            Writer::from_path(path).context(format!("Failed to create CSV file: {:?}", path))?;

        let with_average = self.has_rolling_average();
        let mut header = vec![
            "date",
            "close",
            "contract_number",
            "total_asset",
            self.margin_unit.column_name(),
            "lever_ratio",
        ];
        if with_average {
            header.push("average_asset");
        }
        writer.write_record(&header)?;

        for row in &self.rows {
            let mut record = vec![
                row.date.format("%Y-%m-%d").to_string(),
                row.close.to_string(),
                row.contract_count.to_string(),
                row.total_asset.to_string(),
                row.used_asset.to_string(),
                row.lever_ratio.to_string(),
            ];
            if with_average {
                record.push(
                    row.rolling_average_asset
                        .map(|v| v.to_string())
                        .unwrap_or_default(),
                );
            }
            writer.write_record(&record)?;
        }

        writer.flush()?;
        Ok(())
    }
}
