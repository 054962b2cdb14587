//! Ticking, damage and death.

use anyhow::Result;
use approx::assert_relative_eq;
use bevy::prelude::{ChildOf, Entity, Transform, Vec3, With, Without};
use rstest::{fixture, rstest};
use test_utils::Level;
use thingkit::{
    BulletOutcome, Contact, ContactOutcome, Countdown, Effect, Lazy, NodeConfig, SceneExt,
    Snapshot, GIB_COUNT,
};

const DT: f32 = 0.125;

#[fixture]
fn level() -> Level {
    Level::new(7)
}

/// Gibs that outlived their parent and now stand on their own.
fn effects(level: &mut Level) -> Vec<Entity> {
    let world = level.game.world_mut();
    world
        .query_filtered::<Entity, (With<Effect>, Without<ChildOf>)>()
        .iter(world)
        .collect()
}

/// Gibs still attached to `parent`, with their lifetimes.
fn gib_lives(level: &Level, parent: Entity) -> Vec<(Entity, f32)> {
    let world = level.game.world();
    world
        .children_of(parent)
        .into_iter()
        .filter(|c| world.get::<Effect>(*c).is_some())
        .map(|c| {
            let life = world
                .get::<NodeConfig>(c)
                .map_or(0.0, |config| config.float("life", 0.0));
            (c, life)
        })
        .collect()
}

#[rstest]
fn damage_guards_reject_bad_input(mut level: Level) -> Result<()> {
    let mouse = level.spawn("mouse", 0.0, 0.0)?;
    let star = level.spawn("star", 16.0, 0.0)?;

    assert!(!level.game.damage(mouse, -1));
    assert!(!level.game.damage(star, 1));
    assert_eq!(level.game.thing(mouse).map(|t| t.hp()), Some(5));

    assert!(level.game.damage(mouse, 10));
    assert!(!level.game.damage(mouse, 1));
    assert_eq!(level.game.thing(mouse).map(|t| t.hp()), Some(0));
    Ok(())
}

#[rstest]
fn hp_never_rises_and_dying_never_clears(mut level: Level) -> Result<()> {
    let id = level.spawn("snail", 0.0, 0.0)?;
    let mut last = level.game.thing(id).map_or(0, |t| t.hp());
    let mut was_dying = false;
    for amount in [0, 2, -4, 1, 3, 0, 7, 1] {
        level.game.damage(id, amount);
        let thing = level.game.thing(id).expect("not ticked yet");
        assert!(thing.hp() <= last);
        assert!(thing.hp() >= 0);
        assert!(!was_dying || thing.dying());
        last = thing.hp();
        was_dying = thing.dying();
    }
    assert!(was_dying);
    Ok(())
}

#[rstest]
fn monsters_snapshot_each_tick(mut level: Level) -> Result<()> {
    let id = level.spawn("mouse", 0.0, 0.0)?;
    let start = level.game.world().world_position(id);

    level.game.advance(0.5);
    let thing = level.game.thing(id).expect("alive");
    let [snapshot] = thing.snapshots() else {
        panic!("expected exactly one snapshot, got {:?}", thing.snapshots());
    };
    assert_eq!(snapshot.velocity, Vec3::new(-10.0, 0.0, 0.0));
    assert_relative_eq!(snapshot.position.x, start.x - 5.0);
    assert_relative_eq!(snapshot.position.y, start.y);

    level.game.advance(0.5);
    let later = level.game.thing(id).expect("alive");
    let [latest] = later.snapshots() else {
        panic!("history must stay one tick deep");
    };
    assert_relative_eq!(latest.position.x, start.x - 10.0);
    Ok(())
}

#[rstest]
fn non_monsters_never_snapshot(mut level: Level) -> Result<()> {
    let id = level.spawn("spring", 0.0, 0.0)?;
    for _ in 0..3 {
        level.game.tick(DT);
    }
    assert_eq!(
        level.game.thing(id).map(|t| t.snapshots().to_vec()),
        Some(Vec::<Snapshot>::new())
    );
    Ok(())
}

#[rstest]
fn dead_things_detach_next_tick_and_gibs_linger(mut level: Level) -> Result<()> {
    let id = level.spawn("mouse", 32.0, 32.0)?;
    let tile = level.game.thing(id).map(|t| t.placeholder().tile).expect("thing");
    let bullet = level.bullet(Some(5));

    assert_eq!(
        level.game.contact(Contact::Bullet { thing: id, bullet }),
        ContactOutcome::Bullet(BulletOutcome::Killed)
    );
    assert!(effects(&mut level).is_empty());
    // The bullet is spent but stays until the frame ends.
    assert!(level.game.world().contains(bullet));
    assert!(level.game.world().is_detaching(bullet));

    level.game.tick(DT);
    let world = level.game.world();
    assert!(!world.contains(id));
    assert!(!world.contains(bullet));
    assert!(world.get::<Lazy>(tile).is_none());
    assert!(level.game.thing(id).is_none());
    assert_eq!(level.game.thing_count(), 0);

    // Gibs were re-rooted and outlive the corpse.
    let gibs = effects(&mut level);
    assert!(!gibs.is_empty() && gibs.len() <= GIB_COUNT);
    for gib in &gibs {
        let life = level
            .game
            .world()
            .get::<NodeConfig>(*gib)
            .map_or(0.0, |c| c.float("life", 0.0));
        assert!(life > DT, "gib with life {life} outlived it");
    }

    // The longest lifetime is one second: eight ticks in total.
    for _ in 1..8 {
        level.game.tick(DT);
    }
    assert!(effects(&mut level).is_empty());
    Ok(())
}

#[rstest]
fn gibs_expire_exactly_at_their_lifetime(mut level: Level) -> Result<()> {
    let id = level.spawn("mouse", 0.0, 0.0)?;
    let bullet = level.bullet(Some(99));
    level.game.contact(Contact::Bullet { thing: id, bullet });

    let lives = gib_lives(&level, id);
    assert_eq!(lives.len(), GIB_COUNT);

    let mut elapsed = 0.0;
    for _ in 0..8 {
        level.game.tick(DT);
        elapsed += DT;
        for (gib, life) in &lives {
            assert_eq!(
                level.game.world().contains(*gib),
                elapsed < *life,
                "gib with life {life} at {elapsed}s"
            );
        }
    }
    Ok(())
}

#[rstest]
fn same_seed_scatters_gibs_identically() -> Result<()> {
    let burst = || -> Result<Vec<Vec3>> {
        let mut level = Level::new(99);
        let id = level.spawn("mouse", 0.0, 0.0)?;
        let bullet = level.bullet(Some(5));
        level.game.contact(Contact::Bullet { thing: id, bullet });
        let world = level.game.world();
        Ok(gib_lives(&level, id)
            .into_iter()
            .filter_map(|(gib, _)| world.get::<Transform>(gib).map(|t| t.translation))
            .collect())
    };
    assert_eq!(burst()?, burst()?);
    Ok(())
}

#[rstest]
fn lazy_placeholders_forward_their_ticks(mut level: Level) -> Result<()> {
    let id = level.spawn("key", 0.0, 0.0)?;
    let tile = level.game.thing(id).map(|t| t.placeholder().tile).expect("thing");
    assert!(level.game.world().get::<Lazy>(tile).is_some());

    level.game.world_mut().entity_mut(tile).insert(Countdown::new(10.0));
    level.game.tick(DT);
    level.game.tick(DT);
    let remaining = level
        .game
        .world()
        .get::<Countdown>(tile)
        .map(Countdown::remaining)
        .expect("tile keeps its countdown");
    assert_relative_eq!(remaining, 9.75);
    Ok(())
}

#[rstest]
fn expired_lazy_placeholders_take_their_thing_with_them(mut level: Level) -> Result<()> {
    let id = level.spawn("key", 0.0, 0.0)?;
    let tile = level.game.thing(id).map(|t| t.placeholder().tile).expect("thing");
    level.game.world_mut().entity_mut(tile).insert(Countdown::new(DT));

    level.game.tick(DT);
    assert!(!level.game.world().contains(tile));
    assert!(level.game.thing(id).is_none());
    Ok(())
}
