//! Bevy plugin wiring the per-frame thing systems into the schedule.

use bevy::ecs::prelude::On;
use bevy::prelude::*;
use log::info;

use crate::scene::{despawn_detaching, integrate_motion, integrating, tick_countdowns};
use crate::thing::thing_logic;

/// Timing for the frame about to run.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct Frame {
    /// Seconds covered by the frame.
    pub dt: f32,
    /// Whether free entities move by their velocity before the logic runs.
    pub integrate: bool,
}

/// Event raised when the level restarts. Collected pickups listen for it to
/// show their tiles again.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct LevelReset;

/// Marker for the observer entities listening for [`LevelReset`].
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResetListener;

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must take On<T> by value."
)]
fn log_reset(_event: On<LevelReset>, listeners: Query<(), With<ResetListener>>) {
    info!("level reset; {} pickups restored", listeners.iter().count());
}

/// Installs the thing systems.
///
/// Each frame runs, in order: optional integration, thing logic, countdowns
/// and the removal of everything marked as detaching. Commands queued by a
/// step are applied before the next one starts.
#[derive(Default)]
pub struct ThingPlugin;

impl Plugin for ThingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Frame>();
        app.add_observer(log_reset);
        app.add_systems(
            Update,
            (
                integrate_motion.run_if(integrating),
                thing_logic,
                tick_countdowns,
                despawn_detaching,
            )
                .chain(),
        );
    }
}
