use serde::{Deserialize, Serialize};

use spinbound_core::config::PhysicsConfig;
use spinbound_core::geom::{Rect, Vec2};
use spinbound_core::level::{LevelDef, ROOM_PIXEL, ROOM_SIZE, TILE_SIZE, TileKind, TilePos};

use crate::platform::{Platform, PlatformId, build_for_room};
use crate::room::Room;

/// World-pixel envelope of all rooms, computed once at construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

/// Result of a collision query: what the rectangle hit, if anything.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Hit {
    /// A moving platform, identified by its index in `World::platforms`.
    Platform { index: usize, rect: Rect },
    /// A solid tile in a room.
    Tile {
        kind: TileKind,
        room: usize,
        tx: i32,
        ty: i32,
        rect: Rect,
    },
}

impl Hit {
    pub fn rect(&self) -> Rect {
        match self {
            Hit::Platform { rect, .. } | Hit::Tile { rect, .. } => *rect,
        }
    }
}

/// All rooms and platforms of a level in world-pixel space, plus the
/// aggregate queries the player and session run against them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub rooms: Vec<Room>,
    pub platforms: Vec<Platform>,
    pub bounds: Bounds,
    cfg: PhysicsConfig,
}

impl World {
    pub fn new(level: &LevelDef, cfg: PhysicsConfig) -> Self {
        let rooms: Vec<Room> = level
            .rooms
            .iter()
            .enumerate()
            .map(|(i, layout)| Room::new(layout, i))
            .collect();

        let mut min = Vec2::new(f32::INFINITY, f32::INFINITY);
        let mut max = Vec2::new(f32::NEG_INFINITY, f32::NEG_INFINITY);
        for room in &rooms {
            min.x = min.x.min(room.origin.x);
            min.y = min.y.min(room.origin.y);
            max.x = max.x.max(room.origin.x + ROOM_PIXEL);
            max.y = max.y.max(room.origin.y + ROOM_PIXEL);
        }

        let mut world = Self {
            rooms,
            platforms: Vec::new(),
            bounds: Bounds { min, max },
            cfg,
        };
        world.build_all_platforms();
        world
    }

    pub fn physics(&self) -> &PhysicsConfig {
        &self.cfg
    }

    /// Resolve a stable platform identity against the current list. `None`
    /// means the platform no longer exists (its room's definitions shrank).
    pub fn platform_by_id(&self, id: PlatformId) -> Option<&Platform> {
        self.platforms.iter().find(|p| p.id() == id)
    }

    fn build_all_platforms(&mut self) {
        self.platforms.clear();
        for room in &self.rooms {
            self.platforms.extend(build_for_room(room, &self.cfg));
        }
    }

    /// Restore every room to its construction-time orientation and rebuild
    /// all platforms from scratch. Coin/plate flags are untouched.
    pub fn reset_rotations(&mut self) {
        for room in &mut self.rooms {
            room.reset_to_base();
        }
        self.build_all_platforms();
    }

    /// Rotate one room's content and rebuild its platforms, carrying each
    /// platform's motion phase over by positional pairing.
    pub fn rotate_room(&mut self, index: usize, dir: i8, spin_duration: f32) {
        let Some(room) = self.rooms.get_mut(index) else {
            tracing::warn!("Rotation requested for missing room {index}");
            return;
        };
        room.rotate(dir);
        room.start_spin(dir, spin_duration);
        tracing::debug!("Rotated room {index} dir {dir}");
        self.rebuild_room_platforms(index);
    }

    fn rebuild_room_platforms(&mut self, index: usize) {
        let old: Vec<Platform> = self
            .platforms
            .iter()
            .filter(|p| p.room == index)
            .cloned()
            .collect();
        self.platforms.retain(|p| p.room != index);

        let room = &self.rooms[index];
        for (i, mut platform) in build_for_room(room, &self.cfg).into_iter().enumerate() {
            if let Some(prev) = old.get(i) {
                platform = platform.with_motion_of(prev);
            }
            self.platforms.push(platform);
        }
    }

    /// Advance platform motion, then press/release plates against the player
    /// rectangle. A room's gates open monotonically: once any of its plates
    /// has been pressed, they stay open until an explicit reset.
    pub fn update_tick(&mut self, dt: f32, player_rect: Option<Rect>) {
        for platform in &mut self.platforms {
            platform.tick(dt);
        }

        let Some(player_rect) = player_rect else {
            return;
        };

        for room in &mut self.rooms {
            let mut any_pressed = false;
            let inset = self.cfg.plate_inset;
            let plate_rects: Vec<Rect> = room
                .plates
                .iter()
                .map(|p| room.tile_rect(p.pos).inset(inset))
                .collect();
            for (plate, rect) in room.plates.iter_mut().zip(plate_rects) {
                plate.pressed = player_rect.intersects(&rect);
                any_pressed |= plate.pressed;
            }
            room.gates_open = room.gates_open || any_pressed;
        }
    }

    /// Broad-phase + tile-level collision against a single rectangle.
    ///
    /// Platforms (when included) take precedence over tiles: the first
    /// intersecting platform in list order wins. Tiles are scanned row-major
    /// within the rectangle's tile range expanded by one tile of margin, room
    /// by room in list order.
    pub fn collide(&self, rect: Rect, include_platforms: bool) -> Option<Hit> {
        if include_platforms {
            for (index, platform) in self.platforms.iter().enumerate() {
                let prect = platform.rect();
                if rect.intersects(&prect) {
                    return Some(Hit::Platform { index, rect: prect });
                }
            }
        }

        for room in &self.rooms {
            if !rect.intersects(&room.bounds()) {
                continue;
            }

            let clamp_tile =
                |v: i32| -> i32 { v.max(0).min(ROOM_SIZE - 1) };
            let tx0 = clamp_tile(((rect.x - room.origin.x) / TILE_SIZE).floor() as i32 - 1);
            let ty0 = clamp_tile(((rect.y - room.origin.y) / TILE_SIZE).floor() as i32 - 1);
            let tx1 = clamp_tile(((rect.right() - room.origin.x) / TILE_SIZE).floor() as i32 + 1);
            let ty1 = clamp_tile(((rect.bottom() - room.origin.y) / TILE_SIZE).floor() as i32 + 1);

            for ty in ty0..=ty1 {
                for tx in tx0..=tx1 {
                    if !room.is_solid(tx, ty) {
                        continue;
                    }
                    let trect = room.tile_rect(TilePos::new(tx, ty));
                    if rect.intersects(&trect) {
                        return Some(Hit::Tile {
                            kind: room.tile_kind(tx, ty),
                            room: room.index,
                            tx,
                            ty,
                            rect: trect,
                        });
                    }
                }
            }
        }

        None
    }

    /// Sum of wind-cell accelerations over every cell intersecting `rect`.
    /// Overlapping cells accumulate additively.
    pub fn wind_acceleration(&self, rect: Rect) -> Vec2 {
        let mut accel = Vec2::ZERO;
        for room in &self.rooms {
            for cell in &room.wind {
                if !rect.intersects(&room.tile_rect(cell.pos)) {
                    continue;
                }
                let (ux, uy) = cell.dir.unit();
                accel.x += ux * self.cfg.wind_accel;
                accel.y += uy * self.cfg.wind_accel;
            }
        }
        accel
    }

    /// Mark every untaken coin intersecting `rect` (inset by the pickup
    /// margin) as taken. Returns the count newly taken this call.
    pub fn try_collect_coins(&mut self, rect: Rect) -> u32 {
        let mut got = 0;
        let inset = self.cfg.coin_inset;
        for room in &mut self.rooms {
            let rects: Vec<Rect> = room
                .coins
                .iter()
                .map(|c| room.tile_rect(c.pos).inset(inset))
                .collect();
            for (coin, crect) in room.coins.iter_mut().zip(rects) {
                if !coin.taken && rect.intersects(&crect) {
                    coin.taken = true;
                    got += 1;
                }
            }
        }
        got
    }

    pub fn total_coins(&self) -> u32 {
        self.rooms.iter().map(|r| r.coins.len() as u32).sum()
    }

    pub fn collected_coins(&self) -> u32 {
        self.rooms
            .iter()
            .flat_map(|r| r.coins.iter())
            .filter(|c| c.taken)
            .count() as u32
    }

    /// The first room (in list order) with a door, as a world rectangle.
    pub fn door_rect(&self) -> Option<Rect> {
        self.rooms
            .iter()
            .find_map(|r| r.door.map(|d| r.tile_rect(d)))
    }

    /// Center of the first spawn tile found, or a fallback two tiles inside
    /// the world minimum when the level data has no spawn.
    pub fn spawn_point(&self) -> Vec2 {
        for room in &self.rooms {
            if let Some(spawn) = room.spawn {
                let rect = room.tile_rect(spawn);
                return rect.center();
            }
        }
        tracing::warn!("Level has no spawn tile, using world-minimum fallback");
        Vec2::new(
            self.bounds.min.x + TILE_SIZE * 2.0,
            self.bounds.min.y + TILE_SIZE * 2.0,
        )
    }

    /// Index of the room whose bounds contain the point; room 0 when none do.
    pub fn room_index_at_point(&self, p: Vec2) -> usize {
        for room in &self.rooms {
            if p.x >= room.origin.x
                && p.x < room.origin.x + ROOM_PIXEL
                && p.y >= room.origin.y
                && p.y < room.origin.y + ROOM_PIXEL
            {
                return room.index;
            }
        }
        0
    }

    pub fn room_index_for_rect(&self, rect: Rect) -> usize {
        self.room_index_at_point(rect.center())
    }
}
