use serde::{Deserialize, Serialize};

/// Room grid dimension in tiles (rooms are square).
pub const ROOM_SIZE: i32 = 12;
/// Tile edge length in world pixels.
pub const TILE_SIZE: f32 = 36.0;
/// Room edge length in world pixels.
pub const ROOM_PIXEL: f32 = TILE_SIZE * ROOM_SIZE as f32;

/// A tile coordinate inside a room, in [0, ROOM_SIZE).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TilePos {
    pub x: i32,
    pub y: i32,
}

impl TilePos {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Direction a wind cell pushes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindDir {
    Up,
    Down,
    Left,
    Right,
}

impl WindDir {
    /// Unit push direction (y grows downward).
    pub fn unit(self) -> (f32, f32) {
        match self {
            WindDir::Up => (0.0, -1.0),
            WindDir::Down => (0.0, 1.0),
            WindDir::Left => (-1.0, 0.0),
            WindDir::Right => (1.0, 0.0),
        }
    }

    /// Cyclic permutation under a 90° room rotation:
    /// clockwise Up→Right→Down→Left→Up, counter-clockwise the reverse.
    pub fn rotated(self, dir: i8) -> WindDir {
        if dir > 0 {
            match self {
                WindDir::Up => WindDir::Right,
                WindDir::Right => WindDir::Down,
                WindDir::Down => WindDir::Left,
                WindDir::Left => WindDir::Up,
            }
        } else {
            match self {
                WindDir::Up => WindDir::Left,
                WindDir::Left => WindDir::Down,
                WindDir::Down => WindDir::Right,
                WindDir::Right => WindDir::Up,
            }
        }
    }
}

/// One character of level data.
///
/// `MarkerA`/`MarkerB` mark moving-platform endpoints; they are paired in
/// scan order at room construction and never become terrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileKind {
    Empty,
    Wall,
    Bounce,
    Gate,
    Coin,
    Spawn,
    Door,
    Plate,
    Wind(WindDir),
    MarkerA,
    MarkerB,
}

impl TileKind {
    pub fn from_char(ch: char) -> Option<TileKind> {
        Some(match ch {
            '.' | ' ' => TileKind::Empty,
            '#' => TileKind::Wall,
            'B' => TileKind::Bounce,
            'G' => TileKind::Gate,
            'C' => TileKind::Coin,
            'S' => TileKind::Spawn,
            'D' => TileKind::Door,
            'P' => TileKind::Plate,
            '^' => TileKind::Wind(WindDir::Up),
            'v' => TileKind::Wind(WindDir::Down),
            '<' => TileKind::Wind(WindDir::Left),
            '>' => TileKind::Wind(WindDir::Right),
            'M' => TileKind::MarkerA,
            'V' => TileKind::MarkerB,
            _ => return None,
        })
    }
}

/// One room's worth of level data: a grid of tile characters plus the room's
/// placement on the level-wide room grid (pixel origin = placement × ROOM_PIXEL).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomLayout {
    pub grid: Vec<String>,
    pub x: i32,
    pub y: i32,
}

/// A complete level: an ordered list of rooms (index = identity).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelDef {
    pub name: String,
    pub rooms: Vec<RoomLayout>,
    #[serde(default)]
    pub tutorial: bool,
}

/// A set of levels, loadable from JSON with built-in fallback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelPack {
    pub levels: Vec<LevelDef>,
}

impl LevelPack {
    /// Load a pack from the JSON file named by `SPINBOUND_LEVELS` (default
    /// `config/levels.json`). Falls back to the built-in pack if the file is
    /// missing, unparseable, or empty.
    pub fn load() -> Self {
        let path = std::env::var("SPINBOUND_LEVELS")
            .unwrap_or_else(|_| "config/levels.json".to_string());
        match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<LevelPack>(&content) {
                Ok(pack) if !pack.levels.is_empty() => pack,
                Ok(_) => {
                    tracing::warn!("{path} contains no levels, using built-ins");
                    Self::builtin()
                },
                Err(e) => {
                    tracing::warn!("Failed to parse {path}: {e}, using built-in levels");
                    Self::builtin()
                },
            },
            Err(_) => Self::builtin(),
        }
    }

    /// The authored levels shipped with the game.
    pub fn builtin() -> Self {
        let level = |name: &str, tutorial: bool, rooms: Vec<RoomLayout>| LevelDef {
            name: name.to_string(),
            rooms,
            tutorial,
        };
        let room = |x: i32, y: i32, rows: &[&str]| RoomLayout {
            grid: rows.iter().map(|r| r.to_string()).collect(),
            x,
            y,
        };

        LevelPack {
            levels: vec![
                level(
                    "First Light",
                    true,
                    vec![
                        room(0, 0, &[
                            "############",
                            "#..........#",
                            "#..C....C..#",
                            "#..........#",
                            "#...####...#",
                            "#..........#",
                            "#.S........#",
                            "#####..#####",
                            "#..........#",
                            "#..M....V..#",
                            "#...........",
                            "############",
                        ]),
                        room(1, 0, &[
                            "############",
                            "#..........#",
                            "#....C.....#",
                            "#..........#",
                            "#..####....#",
                            "#..........#",
                            "#.......D..#",
                            "#.....######",
                            "#..........#",
                            "#..C.......#",
                            "............",
                            "############",
                        ]),
                    ],
                ),
                level(
                    "Crosswinds",
                    false,
                    vec![
                        room(0, 0, &[
                            "############",
                            "#..........#",
                            "#.C......C.#",
                            "#..........#",
                            "#..^....^..#",
                            "#..^....^..#",
                            "#..^....^..#",
                            "#..........#",
                            "#.S........#",
                            "####.....###",
                            "#....B......",
                            "############",
                        ]),
                        room(1, 0, &[
                            "############",
                            "#..........#",
                            "#...C...C..#",
                            "#..........#",
                            "#.M......V.#",
                            "#..........#",
                            "#<<......>>#",
                            "#..........#",
                            "#......D...#",
                            "#....#######",
                            ".....#......",
                            "############",
                        ]),
                    ],
                ),
                level(
                    "The Gate",
                    false,
                    vec![
                        room(0, 0, &[
                            "############",
                            "#..........#",
                            "#..C.......#",
                            "#......#...#",
                            "#..####....#",
                            "#.........C#",
                            "#.S....##..#",
                            "######.....#",
                            "#..........#",
                            "#...M...V..#",
                            "#...........",
                            "############",
                        ]),
                        room(1, 0, &[
                            "############",
                            "#..........#",
                            "#.....C....#",
                            "#..........#",
                            "#...#####..#",
                            "#..........#",
                            "#.P.....G..#",
                            "#####...G..#",
                            "#.......G..#",
                            "#..C....G..#",
                            "........G...",
                            "############",
                        ]),
                        room(2, 0, &[
                            "############",
                            "#..........#",
                            "#..C....C..#",
                            "#..........#",
                            "#.M....V...#",
                            "#..........#",
                            "#^^......D.#",
                            "#^^...######",
                            "#..........#",
                            "#...B......#",
                            "............",
                            "############",
                        ]),
                    ],
                ),
            ],
        }
    }
}
