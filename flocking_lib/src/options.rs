use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Dimensions of the plane the flock lives on, with the origin in the top left corner
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct PlaneSize {
    pub width: f32,
    pub height: f32,
}

impl PlaneSize {
    pub fn new(width: f32, height: f32) -> PlaneSize {
        PlaneSize { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2., self.height / 2.)
    }
}

impl Default for PlaneSize {
    fn default() -> Self {
        PlaneSize::new(600., 400.)
    }
}

/// Names one of the six runtime tunables shared by a flock and its agents
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tunable {
    SeparationStrength,
    SeparationDistance,
    AlignmentStrength,
    AlignmentDistance,
    CohesionStrength,
    CohesionDistance,
}

impl Tunable {
    pub const ALL: [Tunable; 6] = [
        Tunable::SeparationStrength,
        Tunable::SeparationDistance,
        Tunable::AlignmentStrength,
        Tunable::AlignmentDistance,
        Tunable::CohesionStrength,
        Tunable::CohesionDistance,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Tunable::SeparationStrength => "separation_strength",
            Tunable::SeparationDistance => "separation_distance",
            Tunable::AlignmentStrength => "alignment_strength",
            Tunable::AlignmentDistance => "alignment_distance",
            Tunable::CohesionStrength => "cohesion_strength",
            Tunable::CohesionDistance => "cohesion_distance",
        }
    }
}

impl fmt::Display for Tunable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Strengths scale the force of a rule, distances are the radius within which
/// a neighbour takes part in it. A zero strength switches the rule off.
#[derive(Debug, PartialEq, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tunables {
    pub separation_strength: f32,
    pub separation_distance: f32,
    pub alignment_strength: f32,
    pub alignment_distance: f32,
    pub cohesion_strength: f32,
    pub cohesion_distance: f32,
}

impl Tunables {
    pub fn get(&self, tunable: Tunable) -> f32 {
        match tunable {
            Tunable::SeparationStrength => self.separation_strength,
            Tunable::SeparationDistance => self.separation_distance,
            Tunable::AlignmentStrength => self.alignment_strength,
            Tunable::AlignmentDistance => self.alignment_distance,
            Tunable::CohesionStrength => self.cohesion_strength,
            Tunable::CohesionDistance => self.cohesion_distance,
        }
    }

    pub fn set(&mut self, tunable: Tunable, value: f32) {
        let field = match tunable {
            Tunable::SeparationStrength => &mut self.separation_strength,
            Tunable::SeparationDistance => &mut self.separation_distance,
            Tunable::AlignmentStrength => &mut self.alignment_strength,
            Tunable::AlignmentDistance => &mut self.alignment_distance,
            Tunable::CohesionStrength => &mut self.cohesion_strength,
            Tunable::CohesionDistance => &mut self.cohesion_distance,
        };
        *field = value;
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum OptionsError {
    #[error("a flock needs at least one agent")]
    EmptyFlock,
    #[error("plane dimensions must be positive and finite, got {width}x{height}")]
    InvalidPlane { width: f32, height: f32 },
    #[error("{tunable} must be a finite number, got {value}")]
    NonFiniteTunable { tunable: Tunable, value: f32 },
}

/// Everything a [`crate::flock::Flock`] is built from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlockOptions {
    pub size: usize,
    pub plane: PlaneSize,
    pub wrap: bool,
    pub tunables: Tunables,
}

impl FlockOptions {
    pub fn new(size: usize, plane: PlaneSize, wrap: bool, tunables: Tunables) -> Self {
        FlockOptions {
            size,
            plane,
            wrap,
            tunables,
        }
    }

    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.size == 0 {
            return Err(OptionsError::EmptyFlock);
        }

        let PlaneSize { width, height } = self.plane;
        let valid_extent = |v: f32| v.is_finite() && v > 0.;
        if !valid_extent(width) || !valid_extent(height) {
            return Err(OptionsError::InvalidPlane { width, height });
        }

        for tunable in Tunable::ALL {
            let value = self.tunables.get(tunable);
            if !value.is_finite() {
                return Err(OptionsError::NonFiniteTunable { tunable, value });
            }
        }

        Ok(())
    }
}

impl Default for FlockOptions {
    fn default() -> Self {
        // every behaviour starts switched off, the demo panels dial them in
        FlockOptions {
            size: 30,
            plane: Default::default(),
            wrap: true,
            tunables: Default::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SaveOptions {
    pub save_locations: bool,
    pub save_locations_path: Option<String>,
    pub save_locations_timestamp: bool,
}

impl Default for SaveOptions {
    fn default() -> Self {
        SaveOptions {
            save_locations: false,
            save_locations_path: Some("./".to_owned()),
            save_locations_timestamp: true,
        }
    }
}
