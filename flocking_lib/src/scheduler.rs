use std::{
    cell::RefCell,
    rc::Rc,
    time::{Duration, Instant},
};

use thiserror::Error;
use tracing::debug;

/// Something the scheduler can drive, e.g. a flock shown on screen.
///
/// `start` is called when the panel becomes visible, `stop` when it is
/// hidden again; only started panels receive `update`.
pub trait Panel {
    fn update(&mut self, dt: Duration);
    fn start(&mut self);
    fn stop(&mut self);
}

/// Lets whoever draws a panel keep a handle to it after handing it to the scheduler
impl<P: Panel> Panel for Rc<RefCell<P>> {
    fn update(&mut self, dt: Duration) {
        self.borrow_mut().update(dt)
    }

    fn start(&mut self) {
        self.borrow_mut().start()
    }

    fn stop(&mut self) {
        self.borrow_mut().stop()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PanelId(usize);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("no panel registered under {0:?}")]
    UnknownPanel(PanelId),
}

struct Entry {
    panel: Box<dyn Panel>,
    active: bool,
}

/// A single loop shared by any number of panels, ticking only the visible ones
#[derive(Default)]
pub struct Scheduler {
    entries: Vec<Entry>,
    last_tick: Option<Instant>,
}

impl Scheduler {
    pub fn new() -> Self {
        Default::default()
    }

    /// Registers a panel, it stays inactive until made visible
    pub fn register(&mut self, panel: Box<dyn Panel>) -> PanelId {
        self.entries.push(Entry {
            panel,
            active: false,
        });
        PanelId(self.entries.len() - 1)
    }

    /// Starts a panel on becoming visible and stops it on being hidden.
    /// Repeating the current visibility does nothing.
    pub fn set_visible(&mut self, id: PanelId, visible: bool) -> Result<(), SchedulerError> {
        let entry = self
            .entries
            .get_mut(id.0)
            .ok_or(SchedulerError::UnknownPanel(id))?;

        match (visible, entry.active) {
            (true, false) => {
                debug!(panel = id.0, "starting panel");
                entry.panel.start();
                entry.active = true;
            }
            (false, true) => {
                debug!(panel = id.0, "stopping panel");
                entry.panel.stop();
                entry.active = false;
            }
            _ => (),
        }

        Ok(())
    }

    pub fn is_active(&self, id: PanelId) -> Result<bool, SchedulerError> {
        self.entries
            .get(id.0)
            .map(|e| e.active)
            .ok_or(SchedulerError::UnknownPanel(id))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Updates every active panel, in registration order
    pub fn tick(&mut self, dt: Duration) {
        self.entries
            .iter_mut()
            .filter(|e| e.active)
            .for_each(|e| e.panel.update(dt));
    }

    /// Ticks with the wall-clock time elapsed since the previous call, zero the first time
    pub fn tick_now(&mut self) -> Duration {
        let now = Instant::now();
        let dt = self
            .last_tick
            .map(|last| now.duration_since(last))
            .unwrap_or_default();
        self.last_tick = Some(now);

        self.tick(dt);
        dt
    }
}
