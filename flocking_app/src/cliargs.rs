use clap_serde_derive::{
    clap::{self, Parser},
    serde::Serialize,
    ClapSerde,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
/// Headless runner for the flocking (Reynolds '87 boids) simulation.
pub struct Args {
    /// Config file (YAML), command line arguments take precedence over it
    #[arg(short, long = "config", default_value = "config.yaml")]
    pub config_path: std::path::PathBuf,

    /// Rest of arguments
    #[command(flatten)]
    pub config: <Config as ClapSerde>::Opt,
}

#[derive(ClapSerde, Serialize)]
/// Programatic configuration
///
/// Uses defaults, which can be overwritten by specifying a filepath for the `-c` or `--config` arg option
pub struct Config {
    #[default(30)]
    #[arg(short = 'n', long)]
    /// number of agents
    pub no_agents: usize,

    #[default(1000)]
    #[arg(short = 'i', long)]
    /// number of simulation steps to run
    pub iterations: u64,

    #[default(600.)]
    #[arg(short = 'x', long)]
    pub init_width: f32,

    #[default(400.)]
    #[arg(short = 'y', long)]
    pub init_height: f32,

    #[default(true)]
    #[arg(short = 'w', long)]
    /// wrap around the plane edges instead of flying off
    pub wrap: bool,

    #[default(1.)]
    #[arg(long = "sep_str")]
    pub separation_strength: f32,
    #[default(30.)]
    #[arg(long = "sep_dist")]
    pub separation_distance: f32,
    #[default(0.03)]
    #[arg(long = "ali_str")]
    pub alignment_strength: f32,
    #[default(40.)]
    #[arg(long = "ali_dist")]
    pub alignment_distance: f32,
    #[default(0.05)]
    #[arg(long = "coh_str")]
    pub cohesion_strength: f32,
    #[default(100.)]
    #[arg(long = "coh_dist")]
    pub cohesion_distance: f32,

    #[default(4)]
    #[arg(short = 'r', long)]
    /// ratio of steps/samples, e,g, 4 = sample every 4th step
    pub sample_rate: u64,

    #[default(false)]
    #[arg(short = 's', long)]
    pub save: bool,

    #[default(false)]
    #[arg(short = 't', long)]
    pub save_timestamp: bool,

    #[default(false)]
    #[arg(short = 'd', long)]
    /// drive all six demo panels through the scheduler instead of a single flock
    pub demos: bool,

    #[default(16)]
    #[arg(long)]
    /// frame time handed to the demo panels, in milliseconds
    pub tick_ms: u64,

    #[default(100)]
    #[arg(long)]
    /// log progress every n steps
    pub report_every: u64,
}
