use spinbound_core::config::SessionConfig;
use spinbound_core::geom::{Rect, Vec2, clamp};
use spinbound_core::level::ROOM_PIXEL;

use crate::player::Player;
use crate::world::World;

/// Rotate an offset from a room center by 90°: clockwise (dx, dy) → (dy, −dx),
/// counter-clockwise the inverse. Applied to both the player's center offset
/// and velocity so the two stay consistent.
pub fn rotate_offset(d: Vec2, dir: i8) -> Vec2 {
    if dir > 0 {
        Vec2::new(d.y, -d.x)
    } else {
        Vec2::new(-d.y, d.x)
    }
}

fn clamp_into_room(pos: Vec2, room_origin: Vec2, size: Vec2, margin: f32) -> Vec2 {
    Vec2::new(
        clamp(
            pos.x,
            room_origin.x + margin,
            room_origin.x + ROOM_PIXEL - size.x - margin,
        ),
        clamp(
            pos.y,
            room_origin.y + margin,
            room_origin.y + ROOM_PIXEL - size.y - margin,
        ),
    )
}

fn spot_free(world: &World, pos: Vec2, size: Vec2) -> bool {
    world
        .collide(Rect::new(pos.x, pos.y, size.x, size.y), false)
        .is_none()
}

/// Reorient the player after its room rotated: rotate its center about the
/// room center and its velocity by the same 90°, clamp into the room
/// interior, then search outward for a collision-free spot. If the bounded
/// search exhausts, force the player to the room center at rest — a
/// degenerate layout signal, never an error.
pub fn reorient_player(world: &World, player: &mut Player, room_index: usize, dir: i8, cfg: &SessionConfig) {
    let Some(room) = world.rooms.get(room_index) else {
        return;
    };
    let margin = world.physics().room_margin;
    let room_center = room.bounds().center();

    let offset = player.center() - room_center;
    let new_center = room_center + rotate_offset(offset, dir);
    player.pos = new_center - player.size * 0.5;
    player.vel = rotate_offset(player.vel, dir);

    player.pos = clamp_into_room(player.pos, room.origin, player.size, margin);

    if spot_free(world, player.pos, player.size) {
        return;
    }

    let base = player.pos;
    let mut radius = cfg.search_step;
    while radius <= cfg.search_max_radius {
        let candidates = [
            Vec2::new(base.x, base.y - radius),
            Vec2::new(base.x + radius, base.y),
            Vec2::new(base.x - radius, base.y),
            Vec2::new(base.x, base.y + radius),
            Vec2::new(base.x + radius, base.y - radius),
            Vec2::new(base.x - radius, base.y - radius),
            Vec2::new(base.x + radius, base.y + radius),
            Vec2::new(base.x - radius, base.y + radius),
        ];
        for candidate in candidates {
            let pos = clamp_into_room(candidate, room.origin, player.size, margin);
            if spot_free(world, pos, player.size) {
                player.pos = pos;
                return;
            }
        }
        radius += cfg.search_step;
    }

    tracing::warn!("No free spot after rotating room {room_index}, recentering player");
    player.pos = room_center - player.size * 0.5;
    player.vel = Vec2::ZERO;
}
