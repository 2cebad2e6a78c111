use crate::config::AppConfig;
use crate::ranking::PerStateRanking;
use crate::types::CityRecord;
use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;

/// One ranked city as it appears in the feed and the API.
#[derive(Debug, Serialize)]
pub struct FeedCity {
    pub name: String,
    pub state_id: String,
    pub lat: f64,
    pub lon: f64,
    pub population: u64,
}

impl From<&CityRecord> for FeedCity {
    fn from(record: &CityRecord) -> Self {
        FeedCity {
            name: record.name.clone(),
            state_id: record.state_id.clone(),
            lat: record.coordinates.y(),
            lon: record.coordinates.x(),
            population: record.population,
        }
    }
}

pub fn write_feed(config: &AppConfig, ranking: &PerStateRanking) -> Result<()> {
    let feed: BTreeMap<&str, Vec<FeedCity>> = ranking.iter()
        .map(|(state, cities)| (state.as_str(), cities.iter().map(FeedCity::from).collect()))
        .collect();

    if let Some(parent) = config.output.feed_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create output directory: {:?}", parent))?;
        }
    }

    let json = serde_json::to_string_pretty(&feed)?;
    fs::write(&config.output.feed_path, json)
        .with_context(|| format!("Failed to write feed: {:?}", config.output.feed_path))?;

    let total: usize = feed.values().map(Vec::len).sum();
    println!("Wrote {} cities across {} states to {:?}", total, feed.len(), config.output.feed_path);

    Ok(())
}
