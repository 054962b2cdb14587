//! Scripted demo level: a mouse patrolling between two walls, a star and a
//! spring for the player, and a couple of shots to finish the mouse off.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};
use thingkit::prelude::*;
use thingkit::{init_logging, Aabb, Thing};

const DT: f32 = 1.0 / 60.0;
const TILE: f32 = 16.0;
const STAR_FRAME: u32 = 10;
const SPRING_FRAME: u32 = 20;
const SHOT_FRAMES: [u32; 2] = [112, 114];
const SHOT_DAMAGE: i32 = 3;

/// Runs a tiny scripted level and logs what the things do.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
    /// Number of 60 Hz frames to simulate
    #[arg(long, default_value_t = 120)]
    ticks: u32,
    /// Seed for gib scatter; random when omitted
    #[arg(long)]
    seed: Option<u64>,
    /// Directory holding the thing configs
    #[arg(long, default_value = "assets")]
    assets: PathBuf,
}

struct Demo {
    game: Game,
    mouse: Entity,
    /// Offset between the mouse's tile corner and its entity.
    anchor: Vec3,
    walls: [MapTile; 2],
    star: Entity,
    spring: Entity,
    player: Entity,
}

impl Demo {
    fn build(mut game: Game) -> Result<Self> {
        let walls = [
            game.place_tile(Vec3::new(TILE, 0.0, 0.0), Vec2::splat(TILE)),
            game.place_tile(Vec3::new(5.0 * TILE, 0.0, 0.0), Vec2::splat(TILE)),
        ];
        let mouse_tile = game.place_tile(Vec3::new(3.0 * TILE, 0.0, 0.0), Vec2::splat(TILE));
        let mouse = game.spawn_thing(mouse_tile, ThingConfig::new().with("name", "mouse"))?;
        let star_tile = game.place_tile(Vec3::new(7.0 * TILE, 0.0, 0.0), Vec2::splat(TILE));
        let star = game.spawn_thing(star_tile, ThingConfig::new().with("name", "star"))?;
        let spring_tile = game.place_tile(Vec3::new(8.0 * TILE, 0.0, 0.0), Vec2::splat(TILE));
        let spring = game.spawn_thing(spring_tile, ThingConfig::new().with("name", "spring"))?;

        let anchor =
            game.world().world_position(mouse) - game.world().world_position(mouse_tile.tile);
        let player = game
            .world_mut()
            .spawn((
                Transform::from_xyz(7.0 * TILE, 0.0, 0.0),
                Velocity(Vec3::new(0.0, 60.0, 0.0)),
            ))
            .id();
        Ok(Self {
            game,
            mouse,
            anchor,
            walls,
            star,
            spring,
            player,
        })
    }

    fn step(&mut self, frame: u32) {
        self.game.advance(DT);
        self.bounce();
        match frame {
            STAR_FRAME => self.touch(self.star),
            SPRING_FRAME => self.touch(self.spring),
            f if SHOT_FRAMES.contains(&f) => self.shoot(),
            _ => {}
        }
    }

    fn bounce(&mut self) {
        let Some(thing) = self.game.thing(self.mouse) else {
            return;
        };
        let position = self.game.world().world_position(self.mouse);
        let bbox: Aabb = thing.bbox().translated(position - self.anchor);
        for wall in self.walls {
            if bbox.overlaps(&wall.world_box) {
                let outcome = self.game.contact(Contact::Static {
                    thing: self.mouse,
                    other: wall.tile,
                });
                debug!("mouse hit wall at {:?}: {outcome:?}", wall.world_box.min);
            }
        }
    }

    fn touch(&mut self, thing: Entity) {
        let outcome = self.game.contact(Contact::Player {
            player: self.player,
            thing,
        });
        info!(
            "player touched {:?}: {outcome:?}, velocity now {}",
            self.game.thing(thing).map(Thing::kind),
            self.game.world().velocity(self.player)
        );
    }

    fn shoot(&mut self) {
        if self.game.thing(self.mouse).is_none() {
            info!("nothing left to shoot");
            return;
        }
        let bullet = self
            .game
            .world_mut()
            .spawn((
                Transform::default(),
                NodeConfig(ThingConfig::new().with("damage", SHOT_DAMAGE)),
            ))
            .id();
        match self.game.contact(Contact::Bullet {
            thing: self.mouse,
            bullet,
        }) {
            ContactOutcome::Bullet(BulletOutcome::Killed) => info!("the mouse is dead"),
            outcome => info!(
                "shot the mouse: {outcome:?}, {} hp left",
                self.game.thing(self.mouse).map_or(0, Thing::hp)
            ),
        }
    }

    fn report(&mut self) {
        let star_tile = self.game.thing(self.star).map(|t| t.placeholder().tile);
        let star_visible = |game: &Game| star_tile.is_some_and(|e| game.world().visible(e));
        let entities = self.game.world().entities().len();
        info!(
            "after the run: {} things, {entities} entities, star visible: {}",
            self.game.thing_count(),
            star_visible(&self.game)
        );
        self.game.reset();
        info!("after reset: star visible: {}", star_visible(&self.game));
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let assets = AssetDir::new(&args.assets);
    let game = match args.seed {
        Some(seed) => Game::with_seed(assets, BasicPartitioner::new(), LogAudio, seed),
        None => Game::new(assets, BasicPartitioner::new(), LogAudio),
    };
    let mut demo = Demo::build(game)
        .with_context(|| format!("building the demo level from {}", args.assets.display()))?;
    for frame in 0..args.ticks {
        demo.step(frame);
    }
    demo.report();
    Ok(())
}
