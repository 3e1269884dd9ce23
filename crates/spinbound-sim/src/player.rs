use serde::{Deserialize, Serialize};

use spinbound_core::geom::{Rect, Vec2, clamp};
use spinbound_core::level::{ROOM_PIXEL, TileKind};

use crate::platform::PlatformId;
use crate::world::{Hit, World};

/// Per-frame movement intent, already decoded from bindings by the session.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Intent {
    /// -1 (left), 0, +1 (right).
    pub move_dir: f32,
    /// Jump key edge this frame.
    pub jump_pressed: bool,
    /// Jump key currently held.
    pub jump_down: bool,
}

/// The player body: a fixed-size axis-aligned rectangle with continuous
/// position/velocity, resolved against the world one axis at a time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner in world pixels.
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    pub on_ground: bool,
    /// Identity of the platform carrying the player. Cleared and recomputed
    /// every frame. Rebuilds reorder `World::platforms`, so this must be a
    /// stable id, never a list index; an id whose platform is gone reads as
    /// "not riding".
    pub riding: Option<PlatformId>,
    pub coyote: f32,
    pub jump_buffer: f32,
    jump_held: bool,
}

impl Player {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self {
            pos: center - size * 0.5,
            size,
            vel: Vec2::ZERO,
            on_ground: false,
            riding: None,
            coyote: 0.0,
            jump_buffer: 0.0,
            jump_held: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Move back to a spawn center with all motion state cleared.
    pub fn respawn_at(&mut self, center: Vec2) {
        self.pos = center - self.size * 0.5;
        self.vel = Vec2::ZERO;
        self.on_ground = false;
        self.riding = None;
        self.coyote = 0.0;
        self.jump_buffer = 0.0;
    }

    pub fn update(&mut self, dt: f32, intent: &Intent, world: &World) {
        let cfg = world.physics();

        // Carry-over from the platform ridden last frame. The delta is
        // clamped to the owning room's interior and dropped entirely if it
        // would push the player into non-platform geometry.
        if let Some(id) = self.riding
            && let Some(platform) = world.platform_by_id(id)
            && let Some(room) = world.rooms.get(platform.room)
        {
            let min_x = room.origin.x + cfg.room_margin;
            let max_x = room.origin.x + ROOM_PIXEL - self.size.x - cfg.room_margin;
            let min_y = room.origin.y + cfg.room_margin;
            let max_y = room.origin.y + ROOM_PIXEL - self.size.y - cfg.room_margin;

            let dx = platform.vel.x * dt;
            let dy = platform.vel.y * dt;

            if dx != 0.0 {
                let nx = clamp(self.pos.x + dx, min_x, max_x);
                let test = Rect::new(nx, self.pos.y, self.size.x, self.size.y);
                if world.collide(test, false).is_none() {
                    self.pos.x = nx;
                }
            }
            if dy != 0.0 {
                let ny = clamp(self.pos.y + dy, min_y, max_y);
                let test = Rect::new(self.pos.x, ny, self.size.x, self.size.y);
                if world.collide(test, false).is_none() {
                    self.pos.y = ny;
                }
            }
        }
        self.riding = None;

        let move_dir = if intent.move_dir.is_finite() {
            intent.move_dir
        } else {
            0.0
        };
        let jump_released = self.jump_held && !intent.jump_down;
        self.jump_held = intent.jump_down;

        if intent.jump_pressed {
            self.jump_buffer = cfg.jump_buffer_max;
        } else {
            self.jump_buffer = (self.jump_buffer - dt).max(0.0);
        }
        if self.on_ground {
            self.coyote = cfg.coyote_max;
        } else {
            self.coyote = (self.coyote - dt).max(0.0);
        }

        if move_dir != 0.0 {
            self.vel.x += move_dir * cfg.accel * dt;
            self.vel.x = clamp(self.vel.x, -cfg.max_speed, cfg.max_speed);
        } else {
            let dv = cfg.friction * dt;
            if self.vel.x.abs() <= dv {
                self.vel.x = 0.0;
            } else {
                self.vel.x -= self.vel.x.signum() * dv;
            }
        }

        let wind = world.wind_acceleration(self.rect());
        self.vel.x += wind.x * dt;
        self.vel.y += wind.y * dt;
        self.vel.y += cfg.gravity * dt;

        // A jump consumes the buffer, the coyote window, and ground contact.
        if self.jump_buffer > 0.0 && (self.on_ground || self.coyote > 0.0) {
            self.vel.y = -cfg.jump_speed;
            self.on_ground = false;
            self.jump_buffer = 0.0;
            self.coyote = 0.0;
        }

        // Variable jump height: releasing early cuts the rise short.
        if jump_released && self.vel.y < 0.0 {
            self.vel.y *= cfg.jump_cut;
        }

        // Horizontal sweep: platforms are not walls, only tiles stop lateral motion.
        self.pos.x += self.vel.x * dt;
        if let Some(hit) = world.collide(self.rect(), false) {
            let rect = hit.rect();
            if self.vel.x > 0.0 {
                self.pos.x = rect.x - self.size.x;
            } else if self.vel.x < 0.0 {
                self.pos.x = rect.right();
            }
            self.vel.x = 0.0;
        }

        // Vertical sweep: platforms count, but only as landings from above.
        let prev_bottom = self.pos.y + self.size.y;
        self.pos.y += self.vel.y * dt;

        let mut hit = world.collide(self.rect(), true);
        if let Some(Hit::Platform { rect, .. }) = hit {
            let falling = self.vel.y >= 0.0;
            let from_above = prev_bottom <= rect.y + cfg.platform_land_tolerance;
            if !(falling && from_above) {
                hit = world.collide(self.rect(), false);
            }
        }

        match hit {
            Some(hit) if self.vel.y > 0.0 => {
                let rect = hit.rect();
                self.pos.y = rect.y - self.size.y;
                self.vel.y = 0.0;
                self.on_ground = true;

                match hit {
                    Hit::Tile {
                        kind: TileKind::Bounce,
                        ..
                    } => {
                        self.vel.y = -cfg.bounce_speed;
                        self.on_ground = false;
                    },
                    Hit::Platform { index, .. } => {
                        self.riding = world.platforms.get(index).map(|p| p.id());
                    },
                    Hit::Tile { .. } => {},
                }
            },
            Some(hit) if self.vel.y < 0.0 => {
                self.pos.y = hit.rect().bottom();
                self.vel.y = 0.0;
            },
            Some(_) => {},
            None => {
                self.on_ground = false;
            },
        }
    }
}
