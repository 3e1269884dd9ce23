pub mod config;
pub mod events;
pub mod geom;
pub mod input;
pub mod level;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::input::{InputState, Key};
    use crate::level::{LevelDef, ROOM_SIZE, RoomLayout};

    /// Build a RoomLayout from string rows at the given room-grid placement.
    pub fn room_at(x: i32, y: i32, rows: &[&str]) -> RoomLayout {
        RoomLayout {
            grid: rows.iter().map(|r| r.to_string()).collect(),
            x,
            y,
        }
    }

    /// Single-room level at placement (0, 0).
    pub fn single_room_level(rows: &[&str]) -> LevelDef {
        LevelDef {
            name: "test".to_string(),
            rooms: vec![room_at(0, 0, rows)],
            tutorial: false,
        }
    }

    /// A walled 12×12 room with a flat floor, a spawn on the left, and
    /// otherwise empty interior. The workhorse fixture for collision tests.
    pub fn boxed_room() -> Vec<&'static str> {
        vec![
            "############",
            "#..........#",
            "#..........#",
            "#..........#",
            "#..........#",
            "#..........#",
            "#..........#",
            "#..........#",
            "#..........#",
            "#.S........#",
            "#..........#",
            "############",
        ]
    }

    /// An input snapshot with the given keys held (no edges).
    pub fn input_holding(keys: &[Key]) -> InputState {
        let mut input = InputState::new();
        for &k in keys {
            input.press(k);
        }
        input.end_frame();
        input
    }

    /// An input snapshot where the given keys were pressed this frame.
    pub fn input_pressing(keys: &[Key]) -> InputState {
        let mut input = InputState::new();
        for &k in keys {
            input.press(k);
        }
        input
    }

    /// Sanity check used by fixtures: every row fits the room grid.
    pub fn assert_room_shape(rows: &[&str]) {
        assert_eq!(rows.len(), ROOM_SIZE as usize, "Room must have {ROOM_SIZE} rows");
        for row in rows {
            assert!(
                row.len() <= ROOM_SIZE as usize,
                "Row longer than {ROOM_SIZE}: {row:?}"
            );
        }
    }
}
