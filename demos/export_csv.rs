//! Writes a month of daily data for Nairobi to a CSV file in the working directory.

use climate_odds::{ClimateOdds, Coordinate, ExportFormat, Month};
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let engine = ClimateOdds::new().await?;
    let nairobi = Coordinate::new(-1.29, 36.82)?;

    let file = engine
        .export()
        .period(nairobi, Month::new(3, 2024), ExportFormat::Csv)
        .await?;

    tokio::fs::write(&file.file_name, &file.bytes).await?;
    println!(
        "Wrote {} rows ({}) to {}",
        file.row_count, file.data_source, file.file_name
    );
    Ok(())
}
