//! Player, wall and projectile contacts routed through `Game::contact`.

use anyhow::Result;
use bevy::prelude::{Entity, Transform, Vec2, Vec3};
use mockall::mock;
use rstest::{fixture, rstest};
use test_utils::{named, Level, MemoryResources};
use thingkit::{
    Audio, BasicPartitioner, BulletOutcome, Contact, ContactOutcome, Effect, Game, Hidden,
    SceneExt, Sprite, GIB_COUNT,
};

mock! {
    pub Speaker {}
    impl Audio for Speaker {
        fn play(&mut self, path: &str);
    }
}

#[fixture]
fn level() -> Level {
    Level::new(42)
}

fn sprite_state(level: &Level, id: Entity) -> Option<String> {
    let sheet = level.game.thing(id)?.sprite()?;
    let sprite = level.game.world().get::<Sprite>(sheet)?;
    sprite.state_name().map(str::to_owned)
}

fn touch(level: &mut Level, player: Entity, thing: Entity) -> ContactOutcome {
    level.game.contact(Contact::Player { player, thing })
}

fn wall(level: &mut Level, thing: Entity) -> ContactOutcome {
    let other = level.tile(160.0, 0.0).tile;
    level.game.contact(Contact::Static { thing, other })
}

fn shoot(level: &mut Level, thing: Entity, bullet: Entity) -> ContactOutcome {
    level.game.contact(Contact::Bullet { thing, bullet })
}

#[rstest]
#[case("star", "pickup2.wav")]
#[case("heart", "pickup.wav")]
#[case("battery", "pickup.wav")]
fn pickups_vanish_once_until_reset(
    mut level: Level,
    #[case] name: &str,
    #[case] clip: &str,
) -> Result<()> {
    let id = level.spawn(name, 0.0, 0.0)?;
    let tile = level.game.thing(id).map(|t| t.placeholder().tile).expect("thing");
    let player = level.player(Vec3::ZERO);

    assert_eq!(touch(&mut level, player, id), ContactOutcome::Handled);
    assert!(level.game.world().get::<Hidden>(tile).is_some());
    assert_eq!(touch(&mut level, player, id), ContactOutcome::Unhandled);
    assert_eq!(level.audio.count(clip), 1);
    assert_eq!(level.audio.played().len(), 1);
    assert_eq!(level.game.reset_listeners(), 1);

    level.game.reset();
    assert!(level.game.world().visible(tile));

    assert_eq!(touch(&mut level, player, id), ContactOutcome::Handled);
    assert_eq!(level.audio.count(clip), 2);
    assert_eq!(level.game.reset_listeners(), 1);
    assert!(level.game.thing(id).is_some_and(|t| t.has_reset_subscription()));
    Ok(())
}

#[rstest]
fn collecting_again_replaces_the_reset_listener(mut level: Level) -> Result<()> {
    let id = level.spawn("star", 0.0, 0.0)?;
    let player = level.player(Vec3::ZERO);
    touch(&mut level, player, id);
    let first = level.game.thing(id).and_then(|t| t.reset_listener()).expect("listener");

    level.game.reset();
    touch(&mut level, player, id);
    let second = level.game.thing(id).and_then(|t| t.reset_listener()).expect("listener");
    assert_ne!(first, second);
    assert!(!level.game.world().contains(first));
    assert_eq!(level.game.reset_listeners(), 1);
    Ok(())
}

#[rstest]
fn removing_a_collected_pickup_drops_its_listener(mut level: Level) -> Result<()> {
    let id = level.spawn("heart", 0.0, 0.0)?;
    let tile = level.game.thing(id).map(|t| t.placeholder().tile).expect("thing");
    let player = level.player(Vec3::ZERO);
    touch(&mut level, player, id);
    assert_eq!(level.game.reset_listeners(), 1);

    level.game.world_mut().safe_detach(id);
    level.game.tick(0.1);
    assert!(level.game.thing(id).is_none());
    assert_eq!(level.game.reset_listeners(), 0);

    // Nothing is left to restore the tile.
    level.game.reset();
    assert!(!level.game.world().visible(tile));
    Ok(())
}

#[rstest]
#[case(-300.0, -300.0)]
#[case(-100.0, -250.0)]
#[case(0.0, -250.0)]
#[case(400.0, -400.0)]
fn springs_launch_the_player(mut level: Level, #[case] vy: f32, #[case] expected: f32) -> Result<()> {
    let id = level.spawn("spring", 0.0, 0.0)?;
    let player = level.player(Vec3::new(30.0, vy, 0.0));
    assert_eq!(touch(&mut level, player, id), ContactOutcome::Handled);
    assert_eq!(level.game.world().velocity(player), Vec3::new(0.0, expected, 0.0));
    Ok(())
}

#[rstest]
fn spring_sound_does_not_stack(mut level: Level) -> Result<()> {
    let id = level.spawn("spring", 0.0, 0.0)?;
    let player = level.player(Vec3::ZERO);
    touch(&mut level, player, id);
    touch(&mut level, player, id);
    assert_eq!(level.audio.count("spring.wav"), 1);

    // The sound entity expires after half a second.
    level.game.tick(0.25);
    touch(&mut level, player, id);
    assert_eq!(level.audio.count("spring.wav"), 1);
    level.game.tick(0.25);
    touch(&mut level, player, id);
    assert_eq!(level.audio.count("spring.wav"), 2);
    Ok(())
}

#[rstest]
fn spring_plays_through_the_audio_backend() -> Result<()> {
    let mut speaker = MockSpeaker::new();
    speaker
        .expect_play()
        .withf(|path| path.ends_with("/spring.wav"))
        .times(1)
        .return_const(());
    let mut game = Game::with_seed(MemoryResources::standard(), BasicPartitioner::new(), speaker, 1);
    let tile = game.place_tile(Vec3::ZERO, Vec2::splat(16.0));
    let thing = game.spawn_thing(tile, named("spring"))?;
    let player = game.world_mut().spawn(Transform::default()).id();
    game.contact(Contact::Player { player, thing });
    game.contact(Contact::Player { player, thing });
    Ok(())
}

#[rstest]
#[case("mouse")]
#[case("door")]
fn player_contact_ignores_other_kinds(mut level: Level, #[case] name: &str) -> Result<()> {
    let id = level.spawn(name, 0.0, 0.0)?;
    let player = level.player(Vec3::new(0.0, -100.0, 0.0));
    assert_eq!(touch(&mut level, player, id), ContactOutcome::Unhandled);
    assert_eq!(level.game.world().velocity(player), Vec3::new(0.0, -100.0, 0.0));
    assert!(level.audio.played().is_empty());
    Ok(())
}

#[rstest]
fn walls_turn_monsters_around(mut level: Level) -> Result<()> {
    let id = level.spawn("mouse", 0.0, 0.0)?;

    // No snapshot yet: the monster has not ticked.
    assert_eq!(wall(&mut level, id), ContactOutcome::Unhandled);

    level.game.world_mut().set_velocity(id, Vec3::new(5.0, 0.0, 0.0));
    level.game.tick(1.0 / 60.0);
    assert_eq!(level.game.thing(id).map(|t| t.num_snapshots()), Some(1));

    assert_eq!(wall(&mut level, id), ContactOutcome::Handled);
    assert_eq!(level.game.world().velocity(id), Vec3::new(-5.0, 0.0, 0.0));
    assert_eq!(sprite_state(&level, id).as_deref(), Some("left"));

    assert_eq!(wall(&mut level, id), ContactOutcome::Handled);
    assert_eq!(level.game.world().velocity(id), Vec3::new(5.0, 0.0, 0.0));
    assert_eq!(sprite_state(&level, id).as_deref(), Some("right"));
    Ok(())
}

#[rstest]
fn near_zero_velocity_keeps_facing(mut level: Level) -> Result<()> {
    let id = level.spawn("mouse", 0.0, 0.0)?;
    level.game.tick(0.1);
    wall(&mut level, id);
    assert_eq!(sprite_state(&level, id).as_deref(), Some("right"));

    level.game.world_mut().set_velocity(id, Vec3::new(1e-7, 3.0, 0.0));
    wall(&mut level, id);
    assert_eq!(sprite_state(&level, id).as_deref(), Some("right"));
    assert_eq!(level.game.world().velocity(id), Vec3::new(-1e-7, -3.0, 0.0));
    Ok(())
}

#[rstest]
fn walls_do_not_move_pickups(mut level: Level) -> Result<()> {
    let id = level.spawn("star", 0.0, 0.0)?;
    level.game.tick(0.1);
    assert_eq!(wall(&mut level, id), ContactOutcome::Unhandled);
    Ok(())
}

#[rstest]
fn bullets_wound_then_kill(mut level: Level) -> Result<()> {
    let id = level.spawn("mouse", 0.0, 0.0)?;

    let first = level.bullet(Some(3));
    assert_eq!(shoot(&mut level, id, first), ContactOutcome::Bullet(BulletOutcome::Hit));
    assert_eq!(level.game.thing(id).map(|t| t.hp()), Some(2));
    assert!(!level.game.world().is_detaching(first));
    assert_eq!(level.audio.count("damage.wav"), 1);

    let second = level.bullet(Some(3));
    assert_eq!(
        shoot(&mut level, id, second),
        ContactOutcome::Bullet(BulletOutcome::Killed)
    );
    let thing = level.game.thing(id).expect("still registered until the next tick");
    assert_eq!(thing.hp(), 0);
    assert!(thing.dying());
    assert!(!thing.alive());
    let world = level.game.world();
    assert_eq!(world.velocity(id), Vec3::ZERO);
    assert!(world.is_detaching(second));

    let gibs: Vec<Entity> = world
        .children_of(id)
        .into_iter()
        .filter(|c| world.get::<Effect>(*c).is_some())
        .collect();
    assert_eq!(gibs.len(), GIB_COUNT);

    let third = level.bullet(Some(3));
    assert_eq!(
        shoot(&mut level, id, third),
        ContactOutcome::Bullet(BulletOutcome::Ignored)
    );
    assert_eq!(level.audio.count("damage.wav"), 2);
    Ok(())
}

#[rstest]
fn bullets_default_to_one_damage(mut level: Level) -> Result<()> {
    let id = level.spawn("mouse", 0.0, 0.0)?;
    let bullet = level.bullet(None);
    shoot(&mut level, id, bullet);
    assert_eq!(level.game.thing(id).map(|t| t.hp()), Some(4));
    Ok(())
}

#[rstest]
fn spent_bullets_are_ignored(mut level: Level) -> Result<()> {
    let id = level.spawn("mouse", 0.0, 0.0)?;
    let bullet = level.bullet(Some(1));
    level.game.world_mut().safe_detach(bullet);
    assert_eq!(
        shoot(&mut level, id, bullet),
        ContactOutcome::Bullet(BulletOutcome::Ignored)
    );
    assert_eq!(level.game.thing(id).map(|t| t.hp()), Some(5));
    assert!(level.audio.played().is_empty());
    Ok(())
}

#[rstest]
fn bullets_pass_through_pickups(mut level: Level) -> Result<()> {
    let id = level.spawn("heart", 0.0, 0.0)?;
    let bullet = level.bullet(Some(10));
    assert_eq!(
        shoot(&mut level, id, bullet),
        ContactOutcome::Bullet(BulletOutcome::Ignored)
    );
    assert!(level.audio.played().is_empty());
    Ok(())
}

#[rstest]
fn contacts_resolve_through_the_sprite_mesh(mut level: Level) -> Result<()> {
    let id = level.spawn("mouse", 0.0, 0.0)?;
    let sprite = level.game.thing(id).and_then(|t| t.sprite()).expect("sprite");
    let mesh = *level
        .game
        .world()
        .children_of(sprite)
        .first()
        .expect("mesh");
    let bullet = level.bullet(Some(1));
    assert_eq!(
        level.game.contact(Contact::Bullet { thing: mesh, bullet }),
        ContactOutcome::Bullet(BulletOutcome::Hit)
    );
    Ok(())
}

#[rstest]
fn contacts_with_unowned_entities_are_unhandled(mut level: Level) {
    let stray = level.player(Vec3::ZERO);
    let bullet = level.bullet(Some(1));
    assert_eq!(
        level.game.contact(Contact::Bullet { thing: stray, bullet }),
        ContactOutcome::Unhandled
    );
}
