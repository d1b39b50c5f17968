use std::path::PathBuf;

use avian3d::prelude::LinearVelocity;
use bevy::prelude::{App, Transform, info};
use clap::Parser;

use shared::animation::LocomotionAnimator;
use shared::controller::{
    DEFAULT_JUMP_STRENGTH, DEFAULT_RUN_SPEED, DEFAULT_WALK_SPEED, PlayerController,
};
use shared::inputs::look::LookSettings;

use crate::{DEFAULT_EYE_HEIGHT, DEFAULT_GRAVITY, LaunchSettings, create_app};

#[derive(Parser)]
#[command(name = "player-controller")]
#[command(version = "0.1")]
#[command(about = "First-person player controller sandbox")]
#[command(long_about = "
First-person player controller sandbox

EXAMPLES:
    cargo run --bin launcher                                        # Walk around the demo floor
    cargo run --bin launcher -- --run-speed 500 --jump-strength 600 # Faster, higher jumps
    cargo run --bin launcher -- --model models/player.glb           # Skinned model with clips
    cargo run --bin launcher -- --headless --ticks 120              # Simulate two seconds and exit
")]
struct Cli {
    #[arg(long, default_value_t = DEFAULT_WALK_SPEED)]
    walk_speed: f32,

    #[arg(long, default_value_t = DEFAULT_RUN_SPEED)]
    run_speed: f32,

    #[arg(long, default_value_t = DEFAULT_JUMP_STRENGTH)]
    jump_strength: f32,

    #[arg(long, default_value_t = DEFAULT_EYE_HEIGHT)]
    #[arg(help = "Eye height above the feet")]
    eye_height: f32,

    #[arg(long, default_value_t = LookSettings::default().sensitivity)]
    #[arg(help = "Degrees turned per unit of look input")]
    sensitivity: f32,

    #[arg(long, default_value_t = false)]
    invert_pitch: bool,

    #[arg(long, default_value_t = DEFAULT_GRAVITY)]
    #[arg(help = "Downward gravity applied while airborne")]
    gravity: f32,

    #[arg(long)]
    #[arg(help = "RON file with the local user's cosmetics loadout")]
    loadout: Option<PathBuf>,

    #[arg(long)]
    #[arg(help = "glTF player model, relative to the asset directory")]
    model: Option<String>,

    #[arg(long, default_value = "assets")]
    assets: String,

    #[arg(long, default_value_t = false)]
    headless: bool,

    #[arg(long)]
    #[arg(help = "Run this many fixed ticks and exit")]
    ticks: Option<u32>,
}

impl Cli {
    fn settings(&self) -> LaunchSettings {
        LaunchSettings {
            headless: self.headless,
            log: true,
            fixed_step_updates: self.ticks.is_some(),
            asset_path: self.assets.clone(),
            walk_speed: self.walk_speed,
            run_speed: self.run_speed,
            jump_strength: self.jump_strength,
            eye_height: self.eye_height,
            gravity: self.gravity,
            look: LookSettings {
                sensitivity: self.sensitivity,
                invert_pitch: self.invert_pitch,
            },
            loadout: self.loadout.clone(),
            model: self.model.clone(),
        }
    }
}

pub fn run() {
    let cli = Cli::parse();
    let mut app = create_app(&cli.settings());

    match cli.ticks {
        Some(ticks) => {
            for _ in 0..ticks {
                app.update();
            }
            log_player_state(&mut app);
        }
        None => {
            app.run();
        }
    }
}

fn log_player_state(app: &mut App) {
    let world = app.world_mut();
    let mut players = world.query::<(
        &Transform,
        &PlayerController,
        Option<&LinearVelocity>,
        Option<&LocomotionAnimator>,
    )>();

    for (transform, controller, velocity, animator) in players.iter(world) {
        info!(
            "Player at {} facing {:?}, velocity {:?}, grounded {:?}",
            transform.translation,
            controller.eye_angles,
            velocity.map(|velocity| velocity.0),
            animator.map(|animator| animator.is_grounded),
        );
    }
}
