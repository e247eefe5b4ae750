use std::{fs::File, io, mem};

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::{flock::Flock, options::SaveOptions};

// more of a sample accumulator than a watcher, it only ever looks at the flock it is handed
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct AgentData {
    pub id: usize,
    pub x: f32,
    pub y: f32,
    pub heading: f32,
    pub time: u64,
}

#[derive(Debug, Error)]
pub enum WatchError {
    #[error("can't open data file: {0}")]
    Io(#[from] io::Error),
    #[error("can't serialize data point: {0}")]
    Csv(#[from] csv::Error),
}

pub struct Birdwatcher {
    locations: Vec<AgentData>,
    render_ticker: u64,
    sample_rate: u64,
}

const PREFIX: &str = "flock-data";

impl Birdwatcher {
    /// `sample_rate` of n keeps every nth call to [`Birdwatcher::watch`], 0 is treated as 1
    pub fn new(sample_rate: u64) -> Self {
        Birdwatcher {
            locations: Vec::new(),
            render_ticker: 0,
            sample_rate: sample_rate.max(1),
        }
    }

    /// Triggers data collection
    pub fn watch(&mut self, flock: &Flock) {
        if !self.should_sample() {
            return;
        }

        let time = self.render_ticker / self.sample_rate;
        self.locations
            .extend(flock.agents().iter().map(|a| AgentData {
                id: a.id,
                x: a.position.x,
                y: a.position.y,
                heading: a.heading(),
                time,
            }));
    }

    pub fn restart(&mut self) {
        self.locations.clear();
        self.render_ticker = 0;
    }

    pub fn data(&self) -> &[AgentData] {
        &self.locations
    }

    pub fn pop_data(&mut self) -> Vec<AgentData> {
        mem::take(&mut self.locations)
    }

    /// Writes samples as CSV with a header row
    pub fn write_csv<W: io::Write>(data: &[AgentData], writer: W) -> Result<(), WatchError> {
        let mut wtr = csv::Writer::from_writer(writer);
        for point in data {
            wtr.serialize(point)?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Saves the latest data in CSV format, then returns it while emptying the birdwatcher's memory
    ///
    /// Depending on save options, either overwrites the current file or writes a new timestamped file
    pub fn pop_data_save(&mut self, save_options: &SaveOptions) -> Result<Vec<AgentData>, WatchError> {
        let data = self.pop_data();

        if !save_options.save_locations {
            return Ok(data);
        }

        if let Some(path) = &save_options.save_locations_path {
            let file_path = format!(
                "{path}{file_name}",
                file_name = Birdwatcher::get_dataset_name(save_options, Utc::now())
            );

            let file = File::create(&file_path)?;
            Birdwatcher::write_csv(&data, file)?;
            info!(path = %file_path, samples = data.len(), "flock data saved");
        }

        Ok(data)
    }

    fn get_dataset_name(save_options: &SaveOptions, now: DateTime<Utc>) -> String {
        match save_options.save_locations_timestamp {
            true => {
                let datetime_part = now.timestamp_millis();
                format!(
                    "{prefix}_{datetime}.csv",
                    prefix = PREFIX,
                    datetime = datetime_part
                )
            }
            false => format!("{prefix}.csv", prefix = PREFIX),
        }
    }

    fn should_sample(&mut self) -> bool {
        self.render_ticker += 1;

        self.render_ticker % self.sample_rate == 0
    }
}
