//! Gameplay constants shared by spawning and the collision handlers.
//!
//! Distances are in world units, times in seconds.

/// Hit points of a thing whose config has no `hp` key.
pub const DEFAULT_HP: i32 = 5;
/// Damage dealt by a projectile whose config has no `damage` key.
pub const DEFAULT_DAMAGE: i32 = 1;
/// Horizontal speed monsters start patrolling with (they start walking left).
pub const PATROL_SPEED: f32 = 10.0;
/// Minimum upward speed a spring imparts to the player.
pub const SPRING_SPEED: f32 = 250.0;
/// Velocities closer to zero than this do not flip a monster's facing.
pub const FACING_EPSILON: f32 = 1e-5;
/// Half thickness of a collision box along the depth axis.
pub const BOX_HALF_DEPTH: f32 = 0.5;

/// Reach of the point lights attached to glowing pickups.
pub const LIGHT_RANGE: f32 = 50.0;

/// Number of blood particles emitted by a killing blow.
pub const GIB_COUNT: usize = 20;
/// Side of the square gibs are scattered over, centred on the thing.
pub const GIB_SCATTER: f32 = 32.0;
/// Depth offset that keeps gibs drawn in front of their parent.
pub const GIB_DEPTH_OFFSET: f32 = 2.0;
/// Launch speed of every gib.
pub const GIB_SPEED: f32 = 100.0;
/// Downward pull on gibs; screen space grows downwards.
pub const GIB_GRAVITY: f32 = 500.0;
/// Exclusive upper bound of a gib's uniform scale.
pub const GIB_MAX_SCALE: f32 = 2.0;
/// Gib lifetimes come in this many steps of [`GIB_LIFE_STEP`].
pub const GIB_LIFE_BUCKETS: u8 = 4;
/// Lifetime granted per bucket, in seconds.
pub const GIB_LIFE_STEP: f32 = 0.25;

/// How long a sound entity stays attached to the entity that played it.
pub const SOUND_HOOK_SECONDS: f32 = 0.5;

/// Sprite sheet the gibs are drawn with.
pub const BLOOD_ASSET: &str = "blood.json";
/// Played when the player collects a star.
pub const SOUND_STAR_PICKUP: &str = "pickup2.wav";
/// Played when the player collects any other pickup.
pub const SOUND_PICKUP: &str = "pickup.wav";
/// Played when a spring launches the player.
pub const SOUND_SPRING: &str = "spring.wav";
/// Played when a projectile hits a monster.
pub const SOUND_DAMAGE: &str = "damage.wav";
