use anyhow::Result;
use chrono::{DateTime, Utc};
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use courseqa_core::derive::derive_fields;
use courseqa_core::pipeline::IssuePipeline;
use courseqa_core::views::wip_view;
use polars::prelude::*;

use super::{FilterArgs, SourceArgs};

pub fn run(source: &SourceArgs, filter: &FilterArgs, limit: Option<usize>) -> Result<()> {
    let mut pipeline = IssuePipeline::new();
    let table = source.load(&mut pipeline)?;
    let filter = filter.to_filter()?;

    let derived = derive_fields(&table, Utc::now())?;
    let filtered = filter.apply(&derived)?;
    let wip = wip_view(&filtered)?;

    let rows = limit.unwrap_or(wip.height()).min(wip.height());
    println!("Work in progress: {} open issues", wip.height());

    let mut out = Table::new();
    out.load_preset(UTF8_FULL).set_header(
        wip.get_columns()
            .iter()
            .map(|column| column.name().to_string())
            .collect::<Vec<_>>(),
    );
    for idx in 0..rows {
        let mut cells = Vec::with_capacity(wip.get_columns().len());
        for column in wip.get_columns() {
            cells.push(format_cell(column, idx)?);
        }
        out.add_row(cells);
    }
    println!("{out}");

    if rows < wip.height() {
        println!("... {} more rows", wip.height() - rows);
    }

    Ok(())
}

fn format_cell(column: &Column, idx: usize) -> Result<String> {
    let value = match column.dtype() {
        DataType::String => column.str()?.get(idx).unwrap_or("").to_string(),
        DataType::Int64 => column
            .i64()?
            .get(idx)
            .map(|v| v.to_string())
            .unwrap_or_default(),
        DataType::Boolean => column
            .bool()?
            .get(idx)
            .map(|v| if v { "yes" } else { "no" }.to_string())
            .unwrap_or_default(),
        DataType::Datetime(_, _) => column
            .datetime()?
            .get(idx)
            .and_then(DateTime::<Utc>::from_timestamp_micros)
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default(),
        _ => String::new(),
    };
    Ok(value)
}
