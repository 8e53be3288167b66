//! Fetches a year of daily temperatures straight from NASA POWER and plots
//! the daily maximum and minimum.
//!
//! cargo run --example graph_data --features examples

use chrono::NaiveDate;
use climate_odds::{tabulate, Coordinate, EngineConfig, Parameter, PowerClient, SampleProvider};
use plotlars::{Axis, Legend, Line, Plot, Rgb, Shape, Text, TimeSeriesPlot};
use polars::prelude::*;
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let client = PowerClient::new(&EngineConfig::default())?;
    let de_bilt = Coordinate::new(52.10, 5.18)?;
    let start = NaiveDate::from_ymd_opt(2023, 1, 1).ok_or("invalid start date")?;
    let end = NaiveDate::from_ymd_opt(2023, 12, 31).ok_or("invalid end date")?;

    println!("Fetching daily temperatures from {}...", client.describe());
    let samples = client
        .fetch(
            de_bilt,
            start,
            end,
            &[Parameter::TemperatureMax, Parameter::TemperatureMin],
        )
        .await?;
    let frame = tabulate(&samples).to_frame(de_bilt)?;

    plot_temperature(&frame);
    println!("Plot shown in browser.");
    Ok(())
}

fn plot_temperature(data: &DataFrame) {
    TimeSeriesPlot::builder()
        .data(data)
        .x("date")
        .y(Parameter::TemperatureMax.code())
        .additional_series(vec![Parameter::TemperatureMin.code()])
        .size(6)
        .colors(vec![Rgb(235, 117, 0), Rgb(69, 157, 230)])
        .lines(vec![Line::Solid, Line::Dash])
        .with_shape(false)
        .shapes(vec![Shape::Circle, Shape::Square])
        .plot_title(Text::from("Daily temperature, De Bilt 2023").size(18))
        .legend(&Legend::new().x(0.05).y(0.9))
        .x_title("date")
        .y_title(Text::from("°C").color(Rgb(0, 0, 0)))
        .y_axis(
            &Axis::new()
                .value_color(Rgb(0, 0, 0))
                .show_grid(false)
                .zero_line_color(Rgb(0, 0, 0)),
        )
        .build()
        .plot();
}
