use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use courseqa_core::derive::derive_fields;
use courseqa_core::pipeline::IssuePipeline;
use polars::io::parquet::write::{ParquetCompression, ParquetWriter};

use super::{FilterArgs, SourceArgs};

pub fn run(source: &SourceArgs, filter: &FilterArgs, out: &Path) -> Result<()> {
    let mut pipeline = IssuePipeline::new();
    let table = source.load(&mut pipeline)?;
    let filter = filter.to_filter()?;

    let derived = derive_fields(&table, Utc::now())?;
    let mut filtered = filter.apply(&derived)?;

    let file =
        File::create(out).with_context(|| format!("failed to create {}", out.display()))?;
    ParquetWriter::new(file)
        .with_compression(ParquetCompression::Zstd(None))
        .finish(&mut filtered)
        .context("failed to write parquet output")?;

    println!("Wrote {} rows to {}", filtered.height(), out.display());
    Ok(())
}
