//! End-to-end session scenarios: walking, coins, doors, falls, rotation.

use spinbound_core::config::SpinboundConfig;
use spinbound_core::events::SessionEvent;
use spinbound_core::geom::{Rect, Vec2};
use spinbound_core::input::{InputState, Key};
use spinbound_core::level::{LevelDef, TILE_SIZE};
use spinbound_core::test_helpers::{boxed_room, input_holding, room_at, single_room_level};
use spinbound_sim::Session;

const STEP: f32 = 1.0 / 120.0;

fn session_for(rows: &[&str]) -> Session {
    Session::new(&single_room_level(rows), &SpinboundConfig::default())
}

fn run_frames(session: &mut Session, frames: usize, input: &InputState) -> Vec<SessionEvent> {
    let mut events = Vec::new();
    for _ in 0..frames {
        events.extend(session.update(STEP, input));
    }
    events
}

fn settle(session: &mut Session) {
    run_frames(session, 120, &InputState::new());
}

fn tile_rect(tx: f32, ty: f32) -> Rect {
    Rect::new(tx * TILE_SIZE, ty * TILE_SIZE, TILE_SIZE, TILE_SIZE)
}

#[test]
fn walking_across_a_coin_collects_it_once() {
    let mut session = session_for(&[
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
        "#....C.....#",
        "############",
    ]);
    settle(&mut session);

    // Walk right along the floor, through the coin tile, into the far wall.
    let events = run_frames(&mut session, 300, &input_holding(&[Key::D]));

    let collected: Vec<_> = events
        .iter()
        .filter(|e| matches!(e, SessionEvent::CoinsCollected { .. }))
        .collect();
    assert_eq!(collected.len(), 1, "One pickup event for one coin: {events:?}");
    assert!(matches!(collected[0], SessionEvent::CoinsCollected { count: 1 }));
    assert_eq!(session.world.collected_coins(), 1);
    assert_eq!(session.world.total_coins(), 1);
}

#[test]
fn door_rejects_then_completes_once_coins_are_in() {
    let mut session = session_for(&[
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
        "#...D..C...#",
        "############",
    ]);
    settle(&mut session);

    // Stand in front of the door (tile (4,10)) on the floor.
    session.player.pos = Vec2::new(
        4.5 * TILE_SIZE - session.player.size.x / 2.0,
        11.0 * TILE_SIZE - session.player.size.y,
    );
    session.player.vel = Vec2::ZERO;

    assert!(session.door_status().near, "Player stands inside the door zone");
    assert_eq!(session.door_status().missing, 1);

    // Hold interact past the threshold with the coin still out there.
    let events = run_frames(&mut session, 90, &input_holding(&[Key::E]));
    assert!(
        events
            .iter()
            .any(|e| matches!(e, SessionEvent::CoinsInsufficient { missing: 1 })),
        "Door refuses while a coin is missing: {events:?}"
    );
    assert!(!session.is_complete());

    // Releasing the key resets the hold bar.
    run_frames(&mut session, 5, &InputState::new());
    assert_eq!(session.door_status().hold, 0.0);

    // Grab the coin, then hold again.
    session.world.try_collect_coins(tile_rect(7.0, 10.0));
    assert_eq!(session.door_status().missing, 0);

    let events = run_frames(&mut session, 90, &input_holding(&[Key::E]));
    let complete = events
        .iter()
        .find(|e| matches!(e, SessionEvent::LevelComplete { .. }))
        .unwrap_or_else(|| panic!("Expected completion, got {events:?}"));
    if let SessionEvent::LevelComplete { time_secs, tries } = complete {
        assert!(*time_secs > 0.0, "Run timer accumulated");
        assert_eq!(*tries, 0);
    }
    assert!(session.is_complete());

    // A completed session is inert.
    let pos = session.player.pos;
    let after = run_frames(&mut session, 30, &input_holding(&[Key::D]));
    assert!(after.is_empty());
    assert_eq!(session.player.pos, pos, "No motion after completion");
}

#[test]
fn falling_out_respawns_with_reset_rotations_but_kept_coins() {
    let mut session = session_for(&[
        "############",
        "#..........#",
        "#..........#",
        "#..........#",
        "#..........#",
        "#..........#",
        "#..........#",
        "#..........#",
        "#..#.......#",
        "#.S....C...#",
        "#..........#",
        "############",
    ]);
    settle(&mut session);

    session.world.try_collect_coins(tile_rect(7.0, 9.0));
    session.rotate_room(0, 1);
    assert!(
        session.world.rooms[0].is_solid(3, 3),
        "Interior wall (3,8) maps to (3,3) under a clockwise quarter turn"
    );
    assert!(!session.world.rooms[0].is_solid(3, 8));

    // Drop the player past the fall threshold below the envelope.
    session.player.pos.y = session.world.bounds.max.y + 500.0;
    let events = session.update(STEP, &InputState::new());

    assert!(
        events
            .iter()
            .any(|e| matches!(e, SessionEvent::Respawned { tries: 1 })),
        "Fall produces a respawn event: {events:?}"
    );
    assert_eq!(session.tries(), 1);
    assert_eq!(session.player.center(), session.world.spawn_point());
    assert!(session.world.rooms[0].is_solid(3, 8), "Rotation undone on respawn");
    assert!(!session.world.rooms[0].is_solid(3, 3));
    assert_eq!(session.world.collected_coins(), 1, "Coins survive the respawn");
}

#[test]
fn rotating_the_players_room_remaps_velocity() {
    let mut session = session_for(&boxed_room());
    settle(&mut session);

    session.player.vel = Vec2::new(120.0, -40.0);
    session.rotate_room(0, 1);

    assert_eq!(
        session.player.vel,
        Vec2::new(-40.0, -120.0),
        "(vx, vy) becomes (vy, -vx) under a clockwise turn"
    );
    assert!(
        session
            .world
            .collide(session.player.rect(), false)
            .is_none(),
        "Reoriented player lands in free space"
    );
}

#[test]
fn riding_survives_a_rotation_of_another_room() {
    let level = LevelDef {
        name: "ride".to_string(),
        rooms: vec![
            room_at(0, 0, &[
                "############",
                "#..........#",
                "#..........#",
                "#..........#",
                "#..........#",
                "#.M......V.#",
                "#..........#",
                "#..........#",
                "#..........#",
                "#.S........#",
                "#..........#",
                "############",
            ]),
            room_at(1, 0, &[
                "############",
                "#..........#",
                "#..........#",
                "#..........#",
                "#..........#",
                "#M........V#",
                "#..........#",
                "#..........#",
                "#..........#",
                "#..........#",
                "#..........#",
                "############",
            ]),
        ],
        tutorial: false,
    };
    let mut session = Session::new(&level, &SpinboundConfig::default());

    // Park the player just above room 1's platform and let it land.
    let start = session.world.platforms[1].rect();
    session.player.pos = Vec2::new(
        start.center().x - session.player.size.x / 2.0,
        start.y - session.player.size.y - 4.0,
    );
    session.player.vel = Vec2::ZERO;
    for _ in 0..30 {
        session.update(STEP, &InputState::new());
        if session.player.riding.is_some() {
            break;
        }
    }
    let ridden = session.player.riding.expect("player rides room 1's platform");
    assert_eq!(ridden.room, 1);

    // Rotate the *other* room: its platform is rebuilt and the list reorders.
    session.rotate_room(0, 1);

    let before = session.player.pos.x;
    session.update(STEP, &InputState::new());
    let moved = session.player.pos.x - before;

    assert_eq!(
        session.world.room_index_for_rect(session.player.rect()),
        1,
        "Player must not be yanked out of its room by the rebuild"
    );
    assert!(
        moved.abs() < 2.0,
        "One frame of ride carry stays small, moved {moved}px"
    );
    assert_eq!(
        session.player.riding,
        Some(ridden),
        "Ride keeps tracking the same platform"
    );
}

#[test]
fn rotation_targets_grow_with_visited_rooms() {
    let level = LevelDef {
        name: "pair".to_string(),
        rooms: vec![
            room_at(0, 0, &[
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
            ]),
            room_at(1, 0, &[
                "############",
                "#..........#",
                "#..........#",
                "#..........#",
                "#..........#",
                "#..........#",
                "#..........#",
                "#..........#",
                "#..........#",
                "#..........#",
                "#..........#",
                "############",
            ]),
        ],
        tutorial: false,
    };
    let mut session = Session::new(&level, &SpinboundConfig::default());
    assert_eq!(session.rotation_targets(), vec![0, 1], "Next unvisited room is offered");
    assert_eq!(session.max_visited_room(), 0);

    // Teleport into room 1 and tick once so room tracking catches up.
    session.player.pos = Vec2::new(
        spinbound_core::level::ROOM_PIXEL + 5.0 * TILE_SIZE,
        5.0 * TILE_SIZE,
    );
    session.update(STEP, &InputState::new());

    assert_eq!(session.current_room(), 1);
    assert_eq!(session.max_visited_room(), 1);
    assert_eq!(session.rotation_targets(), vec![0, 1]);
}
