use std::{
    cell::RefCell,
    error::Error,
    fs::File,
    io::BufReader,
    rc::Rc,
    time::{Duration, Instant},
};

use circular_queue::CircularQueue;
use clap_serde_derive::{clap::Parser, ClapSerde};
use flocking_lib::{
    birdwatcher::Birdwatcher,
    demo::{DemoKind, FlockDemo},
    flock::Flock,
    options::{FlockOptions, PlaneSize, SaveOptions, Tunables},
    scheduler::Scheduler,
};
use glam::Vec2;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod cliargs;
use cliargs::{Args, Config};

/// Number of most recent steps the reported step time is averaged over
const TICK_WINDOW: usize = 120;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = Args::parse();
    let config = load_config(&mut args)?;

    let res = if config.demos {
        run_demos(&config)
    } else {
        run_flock(&config)
    };

    if let Err(err) = &res {
        warn!(%err, "run failed");
    }
    res
}

/// Defaults, then the config file if there is one, then the command line
fn load_config(args: &mut Args) -> Result<Config, Box<dyn Error>> {
    let config = if let Ok(f) = File::open(&args.config_path) {
        let from_file =
            serde_yaml::from_reader::<_, <Config as ClapSerde>::Opt>(BufReader::new(f))?;
        info!(path = %args.config_path.display(), "loaded configuration file");
        Config::from(from_file).merge(&mut args.config)
    } else {
        Config::from(&mut args.config)
    };

    Ok(config)
}

fn flock_options(config: &Config) -> FlockOptions {
    FlockOptions::new(
        config.no_agents,
        PlaneSize::new(config.init_width, config.init_height),
        config.wrap,
        Tunables {
            separation_strength: config.separation_strength,
            separation_distance: config.separation_distance,
            alignment_strength: config.alignment_strength,
            alignment_distance: config.alignment_distance,
            cohesion_strength: config.cohesion_strength,
            cohesion_distance: config.cohesion_distance,
        },
    )
}

fn run_flock(config: &Config) -> Result<(), Box<dyn Error>> {
    let options = flock_options(config);
    options.validate()?;

    let mut flock = Flock::new(&options);
    let mut bird_watcher = Birdwatcher::new(config.sample_rate);
    let mut tick_times: CircularQueue<Duration> = CircularQueue::with_capacity(TICK_WINDOW);
    let report_every = config.report_every.max(1);

    info!(agents = options.size, iterations = config.iterations, "running flock");

    for tick in 1..=config.iterations {
        let started = Instant::now();
        flock.update();
        tick_times.push(started.elapsed());

        bird_watcher.watch(&flock);

        if tick % report_every == 0 {
            let (centroid, mean_speed) = describe(&flock);
            info!(
                tick,
                centroid_x = centroid.x,
                centroid_y = centroid.y,
                mean_speed,
                mean_step_us = mean_micros(&tick_times),
                "progress"
            );
        }
    }

    let save_options = SaveOptions {
        save_locations: config.save,
        save_locations_timestamp: config.save_timestamp,
        ..Default::default()
    };
    let data = bird_watcher.pop_data_save(&save_options)?;

    let (centroid, mean_speed) = describe(&flock);
    info!(
        samples = data.len(),
        centroid_x = centroid.x,
        centroid_y = centroid.y,
        mean_speed,
        "done"
    );

    Ok(())
}

fn run_demos(config: &Config) -> Result<(), Box<dyn Error>> {
    let plane = PlaneSize::new(config.init_width, config.init_height);
    FlockOptions {
        plane,
        ..Default::default()
    }
    .validate()?;

    let mut scheduler = Scheduler::new();
    let mut demos = Vec::with_capacity(DemoKind::ALL.len());
    for kind in DemoKind::ALL {
        let demo = Rc::new(RefCell::new(FlockDemo::new(kind, plane)));
        let id = scheduler.register(Box::new(Rc::clone(&demo)));
        scheduler.set_visible(id, true)?;
        demos.push(demo);
    }

    let dt = Duration::from_millis(config.tick_ms);
    let report_every = config.report_every.max(1);
    info!(panels = scheduler.len(), iterations = config.iterations, "running demos");

    for tick in 1..=config.iterations {
        scheduler.tick(dt);

        if tick % report_every == 0 {
            for demo in &demos {
                log_demo(&demo.borrow());
            }
        }
    }

    for demo in &demos {
        log_demo(&demo.borrow());
    }

    Ok(())
}

fn log_demo(demo: &FlockDemo) {
    if let Some(flock) = demo.flock() {
        let (centroid, mean_speed) = describe(flock);
        info!(
            kind = ?demo.kind(),
            ticks = demo.ticks(),
            centroid_x = centroid.x,
            centroid_y = centroid.y,
            mean_speed,
            "demo"
        );
    }
}

/// Centroid and mean speed of the flock
fn describe(flock: &Flock) -> (Vec2, f32) {
    let n = flock.agents().len().max(1) as f32;
    let (position_sum, speed_sum) = flock
        .agents()
        .iter()
        .fold((Vec2::ZERO, 0.), |(p, s), a| (p + a.position, s + a.velocity.length()));

    (position_sum / n, speed_sum / n)
}

fn mean_micros(tick_times: &CircularQueue<Duration>) -> f64 {
    if tick_times.is_empty() {
        return 0.;
    }
    let total: Duration = tick_times.iter().sum();
    total.as_secs_f64() * 1e6 / tick_times.len() as f64
}
