//! Headless idle tour
//!
//! Раскладывает кольцо waypoint'ов по seed'у и гоняет камеру по нему без рендера

use idle_tour::scene::{ring_layout, spawn_waypoint_loop};
use idle_tour::{
    create_headless_app, DeterministicRng, TourController, TourProfile, TourStats, TICK_HZ,
};
use bevy::prelude::*;

const WAYPOINT_COUNT: usize = 6;
const TICKS: usize = 3600;

fn main() {
    let seed = 42;
    println!("Starting idle tour headless run (seed: {})", seed);

    let mut app = create_headless_app(seed);

    let positions = {
        let mut rng = app.world_mut().resource_mut::<DeterministicRng>();
        ring_layout(&mut rng.rng, WAYPOINT_COUNT, 20.0, 3.0)
    };
    let waypoints = spawn_waypoint_loop(app.world_mut(), &positions);

    let controller = match TourController::from_profile(TourProfile::default()) {
        Ok(controller) => controller,
        Err(err) => {
            eprintln!("Invalid tour profile: {}", err);
            std::process::exit(1);
        }
    };
    let camera = app
        .world_mut()
        .spawn((
            Transform::from_xyz(0.0, 5.0, 0.0),
            controller.with_start_waypoint(waypoints[0]),
        ))
        .id();

    for tick in 0..TICKS {
        app.update();

        if tick % TICK_HZ as usize == 0 {
            let world = app.world();
            let (Some(transform), Some(controller)) = (
                world.get::<Transform>(camera),
                world.get::<TourController>(camera),
            ) else {
                continue;
            };
            println!(
                "Tick {}: {:?} → {:?} at {:.2}",
                tick,
                controller.phase(),
                controller.current_waypoint(),
                transform.translation
            );
        }
    }

    let stats = app
        .world()
        .get::<TourController>(camera)
        .map(TourController::stats)
        .unwrap_or_default();
    print_summary(stats);
}

fn print_summary(stats: TourStats) {
    println!(
        "Tour complete! legs: {}, arrivals: {}, revolutions: {}, timeouts: {}",
        stats.legs_started, stats.arrivals, stats.revolutions, stats.timeouts
    );
}
