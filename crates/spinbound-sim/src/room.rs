use serde::{Deserialize, Serialize};

use spinbound_core::geom::{Rect, Vec2, ease_in_out_cubic};
use spinbound_core::level::{
    ROOM_PIXEL, ROOM_SIZE, RoomLayout, TILE_SIZE, TileKind, TilePos, WindDir,
};

/// Clockwise 90° tile transform for an N×N grid: (x, y) → (N−1−y, x).
fn rot_cw(p: TilePos) -> TilePos {
    TilePos::new(ROOM_SIZE - 1 - p.y, p.x)
}

/// Counter-clockwise 90° tile transform: (x, y) → (y, N−1−x).
fn rot_ccw(p: TilePos) -> TilePos {
    TilePos::new(p.y, ROOM_SIZE - 1 - p.x)
}

/// Rotate a tile coordinate by 90° in the given direction (+1 CW, −1 CCW).
pub fn rotate_tile(p: TilePos, dir: i8) -> TilePos {
    if dir > 0 { rot_cw(p) } else { rot_ccw(p) }
}

/// Square tile grid, row-major. Out-of-range reads are `Empty`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileGrid {
    cells: Vec<TileKind>,
}

impl TileGrid {
    fn empty() -> Self {
        Self {
            cells: vec![TileKind::Empty; (ROOM_SIZE * ROOM_SIZE) as usize],
        }
    }

    pub fn get(&self, x: i32, y: i32) -> TileKind {
        if x < 0 || y < 0 || x >= ROOM_SIZE || y >= ROOM_SIZE {
            return TileKind::Empty;
        }
        self.cells[(y * ROOM_SIZE + x) as usize]
    }

    fn set(&mut self, x: i32, y: i32, kind: TileKind) {
        if x >= 0 && y >= 0 && x < ROOM_SIZE && y < ROOM_SIZE {
            self.cells[(y * ROOM_SIZE + x) as usize] = kind;
        }
    }
}

/// A coin at a tile, collected at most once per level attempt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coin {
    pub pos: TilePos,
    pub taken: bool,
}

/// A pressure plate; `pressed` is recomputed every tick from player overlap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plate {
    pub pos: TilePos,
    pub pressed: bool,
}

/// A wind cell pushing in a fixed direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindCell {
    pub pos: TilePos,
    pub dir: WindDir,
}

/// Endpoint pair for one moving platform, in tile coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlatformDef {
    pub a: TilePos,
    pub b: TilePos,
}

/// Transient visual spin attached to a room during a rotation. Presentation
/// only; collision never samples it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpinAnim {
    pub t: f32,
    pub duration: f32,
    pub dir: i8,
}

/// Rotation-origin snapshot captured at construction, used only by
/// `reset_to_base`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BaseState {
    grid: TileGrid,
    platform_defs: Vec<PlatformDef>,
    coin_pos: Vec<TilePos>,
    wind: Vec<WindCell>,
    plate_pos: Vec<TilePos>,
    spawn: Option<TilePos>,
    door: Option<TilePos>,
}

/// One room of a level: a rotatable solid grid plus the point collections
/// (coins, wind, plates, spawn, door, platform endpoints) that rotate with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub index: usize,
    /// World-pixel origin, fixed for the room's lifetime.
    pub origin: Vec2,
    grid: TileGrid,
    pub platform_defs: Vec<PlatformDef>,
    pub coins: Vec<Coin>,
    pub wind: Vec<WindCell>,
    pub plates: Vec<Plate>,
    pub spawn: Option<TilePos>,
    pub door: Option<TilePos>,
    /// Monotonic per attempt: once any plate in the room is pressed, gates
    /// stay open until `reset_to_base`.
    pub gates_open: bool,
    pub spin: Option<SpinAnim>,
    base: BaseState,
}

impl Room {
    pub fn new(layout: &RoomLayout, index: usize) -> Self {
        let origin = Vec2::new(layout.x as f32 * ROOM_PIXEL, layout.y as f32 * ROOM_PIXEL);

        let mut grid = TileGrid::empty();
        let mut platform_defs = Vec::new();
        let mut coins = Vec::new();
        let mut wind = Vec::new();
        let mut plates = Vec::new();
        let mut spawn = None;
        let mut door = None;
        let mut markers_a = Vec::new();
        let mut markers_b = Vec::new();

        for ty in 0..ROOM_SIZE {
            let row = layout.grid.get(ty as usize).map(String::as_str).unwrap_or("");
            let mut chars = row.chars();
            for tx in 0..ROOM_SIZE {
                let ch = chars.next().unwrap_or('.');
                let Some(kind) = TileKind::from_char(ch) else {
                    tracing::warn!(
                        "Unknown tile {ch:?} at ({tx},{ty}) in room {index}, treating as empty"
                    );
                    continue;
                };
                let pos = TilePos::new(tx, ty);
                match kind {
                    TileKind::Wall | TileKind::Bounce | TileKind::Gate => grid.set(tx, ty, kind),
                    TileKind::Coin => coins.push(Coin { pos, taken: false }),
                    TileKind::Spawn => spawn = Some(pos),
                    TileKind::Door => door = Some(pos),
                    TileKind::Plate => plates.push(Plate { pos, pressed: false }),
                    TileKind::Wind(dir) => wind.push(WindCell { pos, dir }),
                    TileKind::MarkerA => markers_a.push(pos),
                    TileKind::MarkerB => markers_b.push(pos),
                    TileKind::Empty => {},
                }
            }
        }

        // The i-th A marker pairs with the i-th B marker in scan order;
        // unmatched markers are dropped.
        let pairs = markers_a.len().min(markers_b.len());
        for i in 0..pairs {
            platform_defs.push(PlatformDef {
                a: markers_a[i],
                b: markers_b[i],
            });
        }

        let base = BaseState {
            grid: grid.clone(),
            platform_defs: platform_defs.clone(),
            coin_pos: coins.iter().map(|c| c.pos).collect(),
            wind: wind.clone(),
            plate_pos: plates.iter().map(|p| p.pos).collect(),
            spawn,
            door,
        };

        Self {
            index,
            origin,
            grid,
            platform_defs,
            coins,
            wind,
            plates,
            spawn,
            door,
            gates_open: false,
            spin: None,
            base,
        }
    }

    /// Rotate the room's entire content by 90°. Applies to current state,
    /// never the base snapshot; coin/plate flags survive the remap.
    pub fn rotate(&mut self, dir: i8) {
        let mut next = TileGrid::empty();
        for y in 0..ROOM_SIZE {
            for x in 0..ROOM_SIZE {
                let kind = self.grid.get(x, y);
                if kind == TileKind::Empty {
                    continue;
                }
                let p = rotate_tile(TilePos::new(x, y), dir);
                next.set(p.x, p.y, kind);
            }
        }
        self.grid = next;

        for def in &mut self.platform_defs {
            def.a = rotate_tile(def.a, dir);
            def.b = rotate_tile(def.b, dir);
        }
        for coin in &mut self.coins {
            coin.pos = rotate_tile(coin.pos, dir);
        }
        for cell in &mut self.wind {
            cell.pos = rotate_tile(cell.pos, dir);
            cell.dir = cell.dir.rotated(dir);
        }
        for plate in &mut self.plates {
            plate.pos = rotate_tile(plate.pos, dir);
        }
        if let Some(spawn) = self.spawn {
            self.spawn = Some(rotate_tile(spawn, dir));
        }
        if let Some(door) = self.door {
            self.door = Some(rotate_tile(door, dir));
        }
    }

    /// Restore grid and point positions from the construction-time snapshot.
    /// Coin `taken` and plate `pressed` flags persist across the reset; the
    /// base is authoritative for collection counts.
    pub fn reset_to_base(&mut self) {
        self.grid = self.base.grid.clone();
        self.platform_defs = self.base.platform_defs.clone();

        let taken: Vec<bool> = self.coins.iter().map(|c| c.taken).collect();
        self.coins = self
            .base
            .coin_pos
            .iter()
            .enumerate()
            .map(|(i, &pos)| Coin {
                pos,
                taken: taken.get(i).copied().unwrap_or(false),
            })
            .collect();

        let pressed: Vec<bool> = self.plates.iter().map(|p| p.pressed).collect();
        self.plates = self
            .base
            .plate_pos
            .iter()
            .enumerate()
            .map(|(i, &pos)| Plate {
                pos,
                pressed: pressed.get(i).copied().unwrap_or(false),
            })
            .collect();

        self.wind = self.base.wind.clone();
        self.spawn = self.base.spawn;
        self.door = self.base.door;
        self.gates_open = false;
        self.spin = None;
    }

    pub fn tile_at(&self, tx: i32, ty: i32) -> TileKind {
        self.grid.get(tx, ty)
    }

    /// Like `tile_at`, but an open gate reads as empty.
    pub fn tile_kind(&self, tx: i32, ty: i32) -> TileKind {
        let kind = self.grid.get(tx, ty);
        if kind == TileKind::Gate && self.gates_open {
            TileKind::Empty
        } else {
            kind
        }
    }

    /// Out-of-range tiles are never solid. Gates are solid while closed.
    pub fn is_solid(&self, tx: i32, ty: i32) -> bool {
        match self.grid.get(tx, ty) {
            TileKind::Wall | TileKind::Bounce => true,
            TileKind::Gate => !self.gates_open,
            _ => false,
        }
    }

    pub fn tile_rect(&self, pos: TilePos) -> Rect {
        Rect::new(
            self.origin.x + pos.x as f32 * TILE_SIZE,
            self.origin.y + pos.y as f32 * TILE_SIZE,
            TILE_SIZE,
            TILE_SIZE,
        )
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.origin.x, self.origin.y, ROOM_PIXEL, ROOM_PIXEL)
    }

    pub fn start_spin(&mut self, dir: i8, duration: f32) {
        self.spin = Some(SpinAnim {
            t: 0.0,
            duration,
            dir,
        });
    }

    /// Age the visual spin; it expires after its duration.
    pub fn tick_spin(&mut self, dt: f32) {
        if let Some(spin) = &mut self.spin {
            spin.t += dt;
            if spin.t >= spin.duration {
                self.spin = None;
            }
        }
    }

    /// Eased render angle in radians. Zero when no spin is in flight.
    pub fn spin_angle(&self) -> f32 {
        match &self.spin {
            Some(spin) => {
                let t = (spin.t / spin.duration).min(1.0);
                std::f32::consts::FRAC_PI_2 * spin.dir as f32 * ease_in_out_cubic(t)
            },
            None => 0.0,
        }
    }
}
