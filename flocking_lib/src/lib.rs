use birdwatcher::{AgentData, Birdwatcher};
use flock::Flock;
use options::FlockOptions;

pub mod agent;
pub mod flock;

pub mod birdwatcher;
pub mod demo;
pub mod geometry;
pub mod math_helpers;
pub mod options;
pub mod scheduler;

/// Runs a flock for `no_iter` steps without any driver, sampling every `sample_rate`th step
pub fn flock_base(no_iter: u64, options: &FlockOptions, sample_rate: u64) -> Vec<AgentData> {
    let mut flock = Flock::new(options);
    let mut bird_watcher = Birdwatcher::new(sample_rate);

    (0..no_iter).for_each(|_| {
        flock.update();
        bird_watcher.watch(&flock);
    });

    bird_watcher.pop_data()
}

#[cfg(test)]
mod tests {
    use crate::{flock_base, options::FlockOptions};

    #[test]
    fn flock_base_samples_the_whole_run() {
        let options = FlockOptions {
            size: 5,
            ..Default::default()
        };

        let data = flock_base(10, &options, 5);

        assert_eq!(data.len(), 10);
        assert!(data.iter().all(|d| d.time == 1 || d.time == 2));
    }
}
