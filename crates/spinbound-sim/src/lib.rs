pub mod platform;
pub mod player;
pub mod room;
pub mod rotation;
pub mod world;

use serde::{Deserialize, Serialize};

use spinbound_core::config::{SessionConfig, SpinboundConfig};
use spinbound_core::events::{DoorStatus, SessionEvent};
use spinbound_core::geom::{Rect, Vec2};
use spinbound_core::input::{Bindings, InputState};
use spinbound_core::level::LevelDef;

use crate::player::{Intent, Player};
use crate::world::World;

/// One level attempt: the world, the player, and the objective state
/// (coins, door hold, tries, run timer) driven by a per-frame `update`.
///
/// The session returns events instead of calling into presentation code;
/// the surrounding scene layer interprets them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub world: World,
    pub player: Player,
    pub bindings: Bindings,
    cfg: SessionConfig,
    tries: u32,
    elapsed: f32,
    timer_running: bool,
    door_hold: f32,
    current_room: usize,
    max_visited_room: usize,
    complete: bool,
}

impl Session {
    pub fn new(level: &LevelDef, config: &SpinboundConfig) -> Self {
        let world = World::new(level, config.physics.clone());
        let spawn = world.spawn_point();
        let player = Player::new(
            spawn,
            Vec2::new(config.physics.player_w, config.physics.player_h),
        );
        let current_room = world.room_index_for_rect(player.rect());

        Self {
            world,
            player,
            bindings: Bindings::default(),
            cfg: config.session.clone(),
            tries: 0,
            elapsed: 0.0,
            timer_running: true,
            door_hold: 0.0,
            current_room,
            max_visited_room: current_room,
            complete: false,
        }
    }

    pub fn tries(&self) -> u32 {
        self.tries
    }

    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn current_room(&self) -> usize {
        self.current_room
    }

    pub fn max_visited_room(&self) -> usize {
        self.max_visited_room
    }

    /// Gate run-timer accumulation (e.g. while an intro cutscene plays).
    pub fn set_timer_running(&mut self, running: bool) {
        self.timer_running = running;
    }

    /// Rooms the navigation overlay may rotate: every visited room plus the
    /// next unvisited one.
    pub fn rotation_targets(&self) -> Vec<usize> {
        let mut targets: Vec<usize> = (0..=self.max_visited_room).collect();
        let next = (self.max_visited_room + 1).min(self.world.rooms.len().saturating_sub(1));
        if !targets.contains(&next) {
            targets.push(next);
        }
        targets
    }

    /// Advance one frame. Ordering within the frame: spins, platforms and
    /// plates, player motion, envelope clamp, coins, fall check, room
    /// tracking, door. A completed session is inert.
    pub fn update(&mut self, dt: f32, input: &InputState) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        if self.complete {
            return events;
        }
        if self.timer_running {
            self.elapsed += dt;
        }

        for room in &mut self.world.rooms {
            room.tick_spin(dt);
        }
        self.world.update_tick(dt, Some(self.player.rect()));

        let intent = Intent {
            move_dir: self.bindings.move_dir(input),
            jump_pressed: self.bindings.any_pressed(input, &self.bindings.jump),
            jump_down: self.bindings.any_down(input, &self.bindings.jump),
        };
        self.player.update(dt, &intent, &self.world);
        self.clamp_player_to_bounds();

        let got = self.world.try_collect_coins(self.player.rect());
        if got > 0 {
            events.push(SessionEvent::CoinsCollected { count: got });
        }

        if self.player.pos.y > self.world.bounds.max.y + self.cfg.fall_margin {
            self.respawn();
            events.push(SessionEvent::Respawned { tries: self.tries });
            return events;
        }

        self.current_room = self.world.room_index_for_rect(self.player.rect());
        self.max_visited_room = self.max_visited_room.max(self.current_room);

        self.update_door(dt, input, &mut events);
        events
    }

    /// Side and top edges of the world envelope are hard walls; the bottom
    /// is open (falls are handled by the respawn threshold).
    fn clamp_player_to_bounds(&mut self) {
        let b = self.world.bounds;
        if self.player.pos.x < b.min.x {
            self.player.pos.x = b.min.x;
            self.player.vel.x = 0.0;
        }
        if self.player.pos.x + self.player.size.x > b.max.x {
            self.player.pos.x = b.max.x - self.player.size.x;
            self.player.vel.x = 0.0;
        }
        if self.player.pos.y < b.min.y {
            self.player.pos.y = b.min.y;
            self.player.vel.y = 0.0;
        }
    }

    fn door_near_rect(&self) -> Option<Rect> {
        self.world.door_rect().map(|door| {
            Rect::new(
                door.x - self.cfg.door_near_side,
                door.y - self.cfg.door_near_above,
                door.w + self.cfg.door_near_side * 2.0,
                door.h + self.cfg.door_near_above + self.cfg.door_near_below,
            )
        })
    }

    fn update_door(&mut self, dt: f32, input: &InputState, events: &mut Vec<SessionEvent>) {
        let Some(near_rect) = self.door_near_rect() else {
            self.door_hold = 0.0;
            return;
        };
        let near = self.player.rect().intersects(&near_rect);
        let missing = self
            .world
            .total_coins()
            .saturating_sub(self.world.collected_coins());

        let holding = self.bindings.any_down(input, &self.bindings.interact);
        if near && holding {
            self.door_hold = (self.door_hold + dt).min(self.cfg.door_hold_secs);
        } else {
            self.door_hold = 0.0;
        }

        if near && self.door_hold >= self.cfg.door_hold_secs {
            self.door_hold = 0.0;
            if missing > 0 {
                events.push(SessionEvent::CoinsInsufficient { missing });
            } else {
                self.complete = true;
                events.push(SessionEvent::LevelComplete {
                    time_secs: self.elapsed,
                    tries: self.tries,
                });
            }
        }
    }

    /// Per-frame door readout for the HUD prompt and hold bar.
    pub fn door_status(&self) -> DoorStatus {
        let near = self
            .door_near_rect()
            .is_some_and(|r| self.player.rect().intersects(&r));
        DoorStatus {
            near,
            hold: self.door_hold,
            threshold: self.cfg.door_hold_secs,
            missing: self
                .world
                .total_coins()
                .saturating_sub(self.world.collected_coins()),
        }
    }

    /// Reset every room to its base orientation and put the player back at
    /// spawn. Collected coins stay collected; gates close until their
    /// plates are pressed again.
    fn respawn(&mut self) {
        self.tries += 1;
        self.world.reset_rotations();
        self.player.respawn_at(self.world.spawn_point());
        self.door_hold = 0.0;
        tracing::debug!("Respawned, tries = {}", self.tries);
    }

    /// The room-rotation transaction: rotate the room's content, start its
    /// visual spin, rebuild its platforms, and reorient the player if it is
    /// inside the rotated room. Invoked between frames, never mid-update.
    pub fn rotate_room(&mut self, index: usize, dir: i8) {
        if self.complete {
            return;
        }
        self.world.rotate_room(index, dir, self.cfg.spin_duration);
        if self.world.room_index_for_rect(self.player.rect()) == index {
            rotation::reorient_player(&self.world, &mut self.player, index, dir, &self.cfg);
        }
    }

    /// Serialize the full session state (debugging aid for the harness).
    pub fn snapshot(&self) -> Vec<u8> {
        match rmp_serde::to_vec(self) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::debug!("Snapshot failed: {e}");
                Vec::new()
            },
        }
    }

    /// Restore from `snapshot` output. Malformed bytes are ignored.
    pub fn restore(&mut self, bytes: &[u8]) {
        match rmp_serde::from_slice::<Session>(bytes) {
            Ok(session) => *self = session,
            Err(e) => {
                tracing::debug!("Ignoring malformed session snapshot: {e}");
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spinbound_core::geom::Vec2;
    use spinbound_core::test_helpers::{boxed_room, single_room_level};

    fn boxed_session() -> Session {
        Session::new(
            &single_room_level(&boxed_room()),
            &SpinboundConfig::default(),
        )
    }

    #[test]
    fn new_session_spawns_player_at_spawn_tile() {
        let session = boxed_session();
        let spawn = session.world.spawn_point();
        assert_eq!(session.player.center(), spawn);
        assert_eq!(session.current_room(), 0);
        assert_eq!(session.tries(), 0);
        assert!(!session.is_complete());
    }

    #[test]
    fn zero_dt_update_is_a_motion_no_op() {
        let mut session = boxed_session();
        let input = InputState::new();
        // Settle first so the player is at rest on the floor.
        for _ in 0..240 {
            session.update(1.0 / 120.0, &input);
        }
        let pos = session.player.pos;
        let elapsed = session.elapsed_secs();

        let events = session.update(0.0, &input);
        assert!(events.is_empty());
        assert_eq!(session.player.pos, pos, "dt = 0 must not move the player");
        assert_eq!(session.elapsed_secs(), elapsed, "dt = 0 must not advance the timer");
    }

    #[test]
    fn timer_gating_freezes_elapsed() {
        let mut session = boxed_session();
        session.set_timer_running(false);
        session.update(0.5, &InputState::new());
        assert_eq!(session.elapsed_secs(), 0.0);

        session.set_timer_running(true);
        session.update(0.5, &InputState::new());
        assert!((session.elapsed_secs() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn envelope_clamp_stops_at_side_walls() {
        let mut session = boxed_session();
        session.player.pos.x = session.world.bounds.min.x - 50.0;
        session.player.vel = Vec2::new(-100.0, 0.0);
        session.update(1.0 / 120.0, &InputState::new());
        assert!(session.player.pos.x >= session.world.bounds.min.x);
        assert_eq!(session.player.vel.x, 0.0);
    }

    #[test]
    fn rotation_targets_include_next_unvisited_room() {
        let session = boxed_session();
        // Single-room level: only room 0, listed once.
        assert_eq!(session.rotation_targets(), vec![0]);
    }

    #[test]
    fn snapshot_roundtrip_is_stable() {
        let mut session = boxed_session();
        for _ in 0..30 {
            session.update(1.0 / 120.0, &InputState::new());
        }
        let snap = session.snapshot();
        assert!(!snap.is_empty());

        for _ in 0..30 {
            session.update(1.0 / 120.0, &InputState::new());
        }
        session.restore(&snap);
        assert_eq!(session.snapshot(), snap, "Restore must reproduce the snapshot");
    }

    #[test]
    fn malformed_snapshot_is_ignored() {
        let mut session = boxed_session();
        let before = session.snapshot();
        session.restore(b"definitely not msgpack");
        assert_eq!(session.snapshot(), before);
    }
}
