use crate::config::AppConfig;
use crate::types::CityRecord;
use anyhow::{Result, ensure};
use std::collections::{BTreeMap, HashSet};

pub type PerStateRanking = BTreeMap<String, Vec<CityRecord>>;

/// Keeps, per state, the `capacity` most populous cities seen so far,
/// sorted descending by population.
#[derive(Debug)]
pub struct TopKRanker {
    excluded_states: HashSet<String>,
    min_population: u64,
    capacity: usize,
    cities: PerStateRanking,
}

impl TopKRanker {
    pub fn new(
        excluded_states: impl IntoIterator<Item = String>,
        min_population: u64,
        capacity: usize,
    ) -> Result<Self> {
        ensure!(capacity >= 1, "capacity must be at least 1 (got {})", capacity);
        Ok(TopKRanker {
            excluded_states: excluded_states.into_iter().collect(),
            min_population,
            capacity,
            cities: BTreeMap::new(),
        })
    }

    /// Field validation is the loader's job; the only checks here are the
    /// exclusion and threshold filters.
    pub fn ingest(&mut self, record: CityRecord) {
        if self.excluded_states.contains(&record.state_id) {
            return;
        }

        if record.population < self.min_population {
            return;
        }

        // The state key only materializes once a record passes both filters.
        let entries = self.cities.entry(record.state_id.clone()).or_default();

        // Walk back from the tail past every strictly smaller entry, so a
        // later-arriving tie lands after the earlier ones.
        let mut index = entries.len();
        while index > 0 && entries[index - 1].population < record.population {
            index -= 1;
        }

        if index < self.capacity {
            entries.insert(index, record);
            if entries.len() > self.capacity {
                entries.truncate(self.capacity);
            }
        }
    }

    pub fn finalize(self) -> PerStateRanking {
        self.cities
    }
}

pub fn rank_records(config: &AppConfig, records: Vec<CityRecord>) -> Result<PerStateRanking> {
    println!("Ranking {} city records...", records.len());

    let mut ranker = TopKRanker::new(
        config.ranking.excluded_states.iter().cloned(),
        config.ranking.min_population,
        config.ranking.cities_per_state,
    )?;

    for record in records {
        ranker.ingest(record);
    }

    let ranking = ranker.finalize();
    let retained: usize = ranking.values().map(Vec::len).sum();
    println!("Retained {} cities across {} states.", retained, ranking.len());

    Ok(ranking)
}
