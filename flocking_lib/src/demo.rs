use std::time::Duration;

use glam::Vec2;
use thiserror::Error;
use tracing::debug;

use crate::{
    flock::Flock,
    geometry::DEFAULT_SIDE_LENGTH,
    options::{FlockOptions, PlaneSize, Tunable, Tunables},
    scheduler::Panel,
};

/// The demo panels, each introducing one more rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoKind {
    Rendering,
    RenderingWrapped,
    Separation,
    Cohesion,
    CohesionSeparation,
    Final,
}

/// A slider feeding one tunable: `value = raw / divisor`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slider {
    pub tunable: Tunable,
    pub divisor: f32,
    pub raw: f32,
}

impl Slider {
    const fn new(tunable: Tunable, divisor: f32, raw: f32) -> Self {
        Slider {
            tunable,
            divisor,
            raw,
        }
    }

    pub fn value(&self) -> f32 {
        self.raw / self.divisor
    }
}

const SEPARATION_SLIDERS: [Slider; 2] = [
    Slider::new(Tunable::SeparationDistance, 1.5, 50.),
    Slider::new(Tunable::SeparationStrength, 50., 50.),
];

const COHESION_SLIDERS: [Slider; 2] = [
    Slider::new(Tunable::CohesionDistance, 3., 150.),
    Slider::new(Tunable::CohesionStrength, 1000., 50.),
];

const COHESION_SEPARATION_SLIDERS: [Slider; 4] = [
    Slider::new(Tunable::CohesionDistance, 1., 100.),
    Slider::new(Tunable::CohesionStrength, 400., 20.),
    Slider::new(Tunable::SeparationDistance, 1.7, 50.),
    Slider::new(Tunable::SeparationStrength, 20., 20.),
];

const FINAL_SLIDERS: [Slider; 6] = [
    Slider::new(Tunable::CohesionDistance, 1., 100.),
    Slider::new(Tunable::CohesionStrength, 400., 20.),
    Slider::new(Tunable::SeparationDistance, 1.7, 50.),
    Slider::new(Tunable::SeparationStrength, 20., 20.),
    Slider::new(Tunable::AlignmentDistance, 2.5, 100.),
    Slider::new(Tunable::AlignmentStrength, 1700., 50.),
];

impl DemoKind {
    pub const ALL: [DemoKind; 6] = [
        DemoKind::Rendering,
        DemoKind::RenderingWrapped,
        DemoKind::Separation,
        DemoKind::Cohesion,
        DemoKind::CohesionSeparation,
        DemoKind::Final,
    ];

    pub fn flock_size(&self) -> usize {
        match self {
            DemoKind::Rendering | DemoKind::RenderingWrapped => 20,
            _ => 30,
        }
    }

    pub fn wraps(&self) -> bool {
        !matches!(self, DemoKind::Rendering)
    }

    /// Sliders with their default positions
    pub fn sliders(&self) -> &'static [Slider] {
        match self {
            DemoKind::Rendering | DemoKind::RenderingWrapped => &[],
            DemoKind::Separation => &SEPARATION_SLIDERS,
            DemoKind::Cohesion => &COHESION_SLIDERS,
            DemoKind::CohesionSeparation => &COHESION_SEPARATION_SLIDERS,
            DemoKind::Final => &FINAL_SLIDERS,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum DemoError {
    #[error("{kind:?} demo has no slider for {tunable}")]
    NoSlider { kind: DemoKind, tunable: Tunable },
}

/// A flock on a panel of its own, driven by sliders
pub struct FlockDemo {
    kind: DemoKind,
    plane: PlaneSize,
    sliders: Vec<Slider>,
    flock: Option<Flock>,
    ticks: u64,
}

impl FlockDemo {
    pub fn new(kind: DemoKind, plane: PlaneSize) -> Self {
        FlockDemo {
            kind,
            plane,
            sliders: kind.sliders().to_vec(),
            flock: None,
            ticks: 0,
        }
    }

    pub fn kind(&self) -> DemoKind {
        self.kind
    }

    /// The flock, once the panel has been started
    pub fn flock(&self) -> Option<&Flock> {
        self.flock.as_ref()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn sliders(&self) -> &[Slider] {
        &self.sliders
    }

    /// Moves a slider, the flock picks the new value up on its next update
    pub fn set_slider(&mut self, tunable: Tunable, raw: f32) -> Result<(), DemoError> {
        let slider = self
            .sliders
            .iter_mut()
            .find(|s| s.tunable == tunable)
            .ok_or(DemoError::NoSlider {
                kind: self.kind,
                tunable,
            })?;
        slider.raw = raw;
        Ok(())
    }

    /// Throws the current flock away and spawns a new one with every rule switched off
    pub fn restart(&mut self) {
        let options = FlockOptions::new(
            self.kind.flock_size(),
            self.plane,
            self.kind.wraps(),
            Tunables::default(),
        );
        debug!(kind = ?self.kind, "restarting demo");
        self.flock = Some(Flock::new(&options));
        self.ticks = 0;
    }

    /// Outline of every agent, for whoever draws the panel
    pub fn shapes(&self) -> Vec<[Vec2; 4]> {
        self.flock
            .iter()
            .flat_map(|f| f.agents().iter())
            .map(|a| a.outline(DEFAULT_SIDE_LENGTH))
            .collect()
    }
}

impl Panel for FlockDemo {
    // the step size is fixed, dt is not used by the physics
    fn update(&mut self, _dt: Duration) {
        let Some(flock) = self.flock.as_mut() else {
            return;
        };

        for slider in &self.sliders {
            flock.set_tunable(slider.tunable, slider.value());
        }
        flock.update();
        self.ticks += 1;
    }

    fn start(&mut self) {
        self.restart();
    }

    fn stop(&mut self) {}
}
