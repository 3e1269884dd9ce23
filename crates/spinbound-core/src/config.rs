use serde::{Deserialize, Serialize};

/// Player max horizontal speed (px/s).
pub const MAX_SPEED: f32 = 260.0;
/// Ground acceleration toward max speed (px/s²).
pub const ACCEL: f32 = 1900.0;
/// Friction deceleration with no input (px/s²).
pub const FRICTION: f32 = 2200.0;
/// Gravity (px/s², downward).
pub const GRAVITY: f32 = 1800.0;
/// Jump takeoff speed (px/s, upward).
pub const JUMP_SPEED: f32 = 700.0;
/// Bounce-pad launch speed (px/s, upward).
pub const BOUNCE_SPEED: f32 = 820.0;
/// Coyote-time window after leaving the ground (s).
pub const COYOTE_MAX: f32 = 0.10;
/// Jump-buffer window before landing (s).
pub const JUMP_BUFFER_MAX: f32 = 0.12;
/// Fraction of upward velocity kept when the jump key is released early.
pub const JUMP_CUT: f32 = 0.55;
/// Player rectangle size (px).
pub const PLAYER_W: f32 = 22.0;
pub const PLAYER_H: f32 = 28.0;
/// Wind cell acceleration magnitude (px/s²).
pub const WIND_ACCEL: f32 = 1400.0;
/// Coin pickup rectangle inset (px).
pub const COIN_INSET: f32 = 6.0;
/// Pressure-plate trigger rectangle inset (px).
pub const PLATE_INSET: f32 = 4.0;
/// Moving-platform oscillation rate (phase units/s).
pub const PLATFORM_SPEED: f32 = 0.35;
/// Platform size as multiples of a tile.
pub const PLATFORM_W_TILES: f32 = 3.0;
pub const PLATFORM_H_TILES: f32 = 0.6;
/// Tolerance for treating a platform contact as a landing (px).
pub const PLATFORM_LAND_TOLERANCE: f32 = 2.0;
/// Margin kept between the player and a room edge when clamping (px).
pub const ROOM_MARGIN: f32 = 2.0;

/// How far below the world envelope the player may fall before respawning (px).
pub const FALL_MARGIN: f32 = 420.0;
/// How long the interact key must be held at the door (s).
pub const DOOR_HOLD_SECS: f32 = 0.7;
/// Door proximity rectangle inflation (px): sides, above, below.
pub const DOOR_NEAR_SIDE: f32 = 22.0;
pub const DOOR_NEAR_ABOVE: f32 = 44.0;
pub const DOOR_NEAR_BELOW: f32 = 28.0;
/// Visual room-spin duration (s).
pub const SPIN_DURATION: f32 = 0.35;
/// Post-rotation placement search: step and maximum radius (px).
pub const SEARCH_STEP: f32 = 4.0;
pub const SEARCH_MAX_RADIUS: f32 = 64.0;

/// Motion and collision tuning, loadable from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub max_speed: f32,
    pub accel: f32,
    pub friction: f32,
    pub gravity: f32,
    pub jump_speed: f32,
    pub bounce_speed: f32,
    pub coyote_max: f32,
    pub jump_buffer_max: f32,
    pub jump_cut: f32,
    pub player_w: f32,
    pub player_h: f32,
    pub wind_accel: f32,
    pub coin_inset: f32,
    pub plate_inset: f32,
    pub platform_speed: f32,
    pub platform_w_tiles: f32,
    pub platform_h_tiles: f32,
    pub platform_land_tolerance: f32,
    pub room_margin: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            max_speed: MAX_SPEED,
            accel: ACCEL,
            friction: FRICTION,
            gravity: GRAVITY,
            jump_speed: JUMP_SPEED,
            bounce_speed: BOUNCE_SPEED,
            coyote_max: COYOTE_MAX,
            jump_buffer_max: JUMP_BUFFER_MAX,
            jump_cut: JUMP_CUT,
            player_w: PLAYER_W,
            player_h: PLAYER_H,
            wind_accel: WIND_ACCEL,
            coin_inset: COIN_INSET,
            plate_inset: PLATE_INSET,
            platform_speed: PLATFORM_SPEED,
            platform_w_tiles: PLATFORM_W_TILES,
            platform_h_tiles: PLATFORM_H_TILES,
            platform_land_tolerance: PLATFORM_LAND_TOLERANCE,
            room_margin: ROOM_MARGIN,
        }
    }
}

/// Session-level tuning: respawn, door, rotation search.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub fall_margin: f32,
    pub door_hold_secs: f32,
    pub door_near_side: f32,
    pub door_near_above: f32,
    pub door_near_below: f32,
    pub spin_duration: f32,
    pub search_step: f32,
    pub search_max_radius: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            fall_margin: FALL_MARGIN,
            door_hold_secs: DOOR_HOLD_SECS,
            door_near_side: DOOR_NEAR_SIDE,
            door_near_above: DOOR_NEAR_ABOVE,
            door_near_below: DOOR_NEAR_BELOW,
            spin_duration: SPIN_DURATION,
            search_step: SEARCH_STEP,
            search_max_radius: SEARCH_MAX_RADIUS,
        }
    }
}

/// Top-level game configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinboundConfig {
    pub physics: PhysicsConfig,
    pub session: SessionConfig,
}

impl SpinboundConfig {
    /// Load config from a TOML file. Falls back to defaults if the file is
    /// missing or unparseable.
    pub fn load() -> Self {
        let path = std::env::var("SPINBOUND_CONFIG")
            .unwrap_or_else(|_| "config/spinbound.toml".to_string());
        match std::fs::read_to_string(&path) {
            Ok(content) => match toml::from_str::<SpinboundConfig>(&content) {
                Ok(cfg) => cfg,
                Err(e) => {
                    tracing::warn!("Failed to parse {path}: {e}, using defaults");
                    SpinboundConfig::default()
                },
            },
            Err(_) => SpinboundConfig::default(),
        }
    }
}
