use serde::{Deserialize, Serialize};

use spinbound_core::config::PhysicsConfig;
use spinbound_core::geom::{Rect, Vec2, lerp};
use spinbound_core::level::TILE_SIZE;

use crate::room::Room;

/// Stable platform identity: the owning room plus the platform's position
/// among that room's endpoint definitions. Rebuilds reorder
/// `World::platforms`, so anything that outlives a frame must hold one of
/// these instead of a list index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformId {
    pub room: usize,
    pub slot: usize,
}

/// A moving platform oscillating between two world-pixel endpoints.
///
/// Phase ping-pongs in [0, 1]; position is the interpolation of the
/// endpoints by phase, and velocity is derived as Δposition/dt each tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    /// Owning room index. Platforms are rebuilt when that room rotates.
    pub room: usize,
    /// Index into the owning room's `platform_defs`.
    pub slot: usize,
    pub a: Vec2,
    pub b: Vec2,
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    pub phase: f32,
    /// +1 while phase climbs toward 1, −1 toward 0.
    pub dir: f32,
    /// Oscillation rate in phase units per second.
    pub speed: f32,
}

impl Platform {
    /// Build a platform from a room's endpoint definition, at rest at phase 0.
    pub fn from_def(room: &Room, def_index: usize, cfg: &PhysicsConfig) -> Platform {
        let def = &room.platform_defs[def_index];
        let a = Vec2::new(
            room.origin.x + def.a.x as f32 * TILE_SIZE,
            room.origin.y + def.a.y as f32 * TILE_SIZE,
        );
        let b = Vec2::new(
            room.origin.x + def.b.x as f32 * TILE_SIZE,
            room.origin.y + def.b.y as f32 * TILE_SIZE,
        );
        Platform {
            room: room.index,
            slot: def_index,
            a,
            b,
            pos: a,
            size: Vec2::new(
                TILE_SIZE * cfg.platform_w_tiles,
                TILE_SIZE * cfg.platform_h_tiles,
            ),
            vel: Vec2::ZERO,
            phase: 0.0,
            dir: 1.0,
            speed: cfg.platform_speed,
        }
    }

    pub fn id(&self) -> PlatformId {
        PlatformId {
            room: self.room,
            slot: self.slot,
        }
    }

    /// Carry another platform's continuous motion into this geometry
    /// (used when rebuilding after a room rotation).
    pub fn with_motion_of(mut self, prev: &Platform) -> Platform {
        self.phase = prev.phase;
        self.dir = prev.dir;
        self.speed = prev.speed;
        self.pos = self.interpolate();
        self
    }

    fn interpolate(&self) -> Vec2 {
        Vec2::new(
            lerp(self.a.x, self.b.x, self.phase),
            lerp(self.a.y, self.b.y, self.phase),
        )
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }

    /// Advance phase, reflecting at the bounds. With `dt <= 0` (pause) the
    /// platform holds position and reports zero velocity.
    pub fn tick(&mut self, dt: f32) {
        if dt <= 0.0 {
            self.vel = Vec2::ZERO;
            return;
        }
        let prev = self.pos;

        self.phase += dt * self.speed * self.dir;
        if self.phase >= 1.0 {
            self.phase = 1.0;
            self.dir = -1.0;
        }
        if self.phase <= 0.0 {
            self.phase = 0.0;
            self.dir = 1.0;
        }

        self.pos = self.interpolate();
        self.vel = (self.pos - prev) * (1.0 / dt);
    }
}

/// Derive a room's platforms from its current endpoint definitions.
pub fn build_for_room(room: &Room, cfg: &PhysicsConfig) -> Vec<Platform> {
    (0..room.platform_defs.len())
        .map(|i| Platform::from_def(room, i, cfg))
        .collect()
}
