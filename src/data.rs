use crate::config::AppConfig;
use crate::types::CityRecord;
use anyhow::{Context, Result, anyhow};
use csv::ReaderBuilder;
use geo::Point;
use std::fs::File;
use std::io::Read;

pub fn load_city_records(config: &AppConfig) -> Result<Vec<CityRecord>> {
    println!("Loading city data...");

    let file = File::open(&config.input.cities_csv)
        .with_context(|| format!("Failed to open CSV file: {:?}", config.input.cities_csv))?;
    let records = read_city_records(file)
        .with_context(|| format!("Failed to read CSV file: {:?}", config.input.cities_csv))?;

    println!("Loaded {} city records", records.len());

    Ok(records)
}

fn read_city_records<R: Read>(reader: R) -> Result<Vec<CityRecord>> {
    let mut rdr = ReaderBuilder::new().from_reader(reader);
    let headers = rdr.headers()?.clone();

    let column = |name: &str| -> Result<usize> {
        headers.iter().position(|h| h == name)
            .ok_or_else(|| anyhow!("Column '{}' not found in CSV", name))
    };

    let name_idx = column("city_ascii")?;
    let state_idx = column("state_id")?;
    let lat_idx = column("lat")?;
    let lng_idx = column("lng")?;
    let population_idx = column("population")?;

    let mut records = Vec::new();

    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        let row = i + 1;

        let state_id = record.get(state_idx).unwrap_or("").to_string();
        if state_id.is_empty() { continue; }

        let lat: f64 = record.get(lat_idx).unwrap_or("").parse()
            .with_context(|| format!("Row {}: invalid latitude '{}'", row, record.get(lat_idx).unwrap_or("")))?;
        let lng: f64 = record.get(lng_idx).unwrap_or("").parse()
            .with_context(|| format!("Row {}: invalid longitude '{}'", row, record.get(lng_idx).unwrap_or("")))?;
        let population: u64 = record.get(population_idx).unwrap_or("").parse()
            .with_context(|| format!("Row {}: invalid population '{}'", row, record.get(population_idx).unwrap_or("")))?;

        records.push(CityRecord {
            name: record.get(name_idx).unwrap_or("").to_string(),
            state_id,
            coordinates: Point::new(lng, lat),
            population,
        });
    }

    Ok(records)
}
