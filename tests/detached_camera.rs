//! Detached orbit camera tests: mode transitions, orbit input gating, and
//! the exactness of the enter/exit pose transaction.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;

use planetwalk_controller::prelude::*;

// ==================== Harness ====================

/// Height of the flat test surface, `None` for a bottomless world.
#[derive(Resource, Debug, Clone, Copy)]
struct TestGround(Option<f32>);

struct TestGroundBackend;

impl SurfaceProbeBackend for TestGroundBackend {
    fn plugin() -> impl Plugin {
        TestGroundPlugin
    }
}

struct TestGroundPlugin;

impl Plugin for TestGroundPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(FixedUpdate, ground_probes.in_set(PlanetWalkSet::Probes));
    }
}

fn ground_probes(
    ground: Res<TestGround>,
    mut q_characters: Query<(&MovementConfig, &SpawnPoint, &VerticalState, &mut SurfaceProbes)>,
) {
    for (config, spawn, vertical, mut probes) in &mut q_characters {
        probes.ground = ground.0.map(|surface| {
            let origin = vertical.height + config.ground_probe_lift;
            SurfaceHit::new(origin - surface, spawn.anchor_at(surface), Vec3::Y, None)
        });
    }
}

fn create_app(ground: Option<f32>) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
        1.0 / 60.0,
    )));
    app.insert_resource(Time::<Fixed>::from_hz(60.0));
    app.insert_resource(TestGround(ground));
    app.add_plugins(PlanetWalkPlugin::<TestGroundBackend>::default());
    app
}

fn spawn_character(app: &mut App, height: f32) -> Entity {
    let spawn = SpawnPoint::new(Quat::IDENTITY, 0.0, height, Vec3::ZERO);
    app.world_mut()
        .spawn(PlanetCharacterBundle::from_spawn(spawn))
        .id()
}

fn spawn_camera(app: &mut App) -> Entity {
    app.world_mut()
        .spawn((
            Transform::default(),
            PlanetCameraBundle::new(CameraConfig::default()),
        ))
        .id()
}

fn run_frames(app: &mut App, frames: usize) {
    for _ in 0..frames {
        app.update();
    }
}

fn mode(app: &App) -> CameraMode {
    app.world().resource::<CameraModeState>().0
}

fn rig(app: &App, camera: Entity) -> CameraRig {
    *app.world().get::<CameraRig>(camera).unwrap()
}

fn orientation(app: &App, character: Entity) -> PlanetOrientation {
    *app.world().get::<PlanetOrientation>(character).unwrap()
}

fn toggle(app: &mut App) {
    app.world_mut().send_event(ToggleDetachedCamera);
    app.update();
}

/// Grounded character plus camera, walked for a bit so the planet rotation
/// is not identity.
fn walked_scene(app: &mut App) -> (Entity, Entity) {
    let character = spawn_character(app, 0.5);
    let camera = spawn_camera(app);
    run_frames(app, 60);
    assert!(
        app.world().get::<VerticalState>(character).unwrap().grounded,
        "fixture failed to land"
    );

    {
        let mut intent = app.world_mut().get_mut::<LocomotionIntent>(character).unwrap();
        intent.set_move(true, false);
        intent.set_turn(true, false);
    }
    run_frames(app, 90);

    app.world_mut()
        .get_mut::<LocomotionIntent>(character)
        .unwrap()
        .clear();
    app.update();
    (character, camera)
}

// ==================== Mode transitions ====================

#[test]
fn toggle_enters_detached_and_seeds_orbit() {
    let mut app = create_app(Some(0.0));
    let (character, camera) = walked_scene(&mut app);
    let before = orientation(&app, character);
    let config = *app.world().get::<CameraConfig>(camera).unwrap();

    toggle(&mut app);

    assert_eq!(mode(&app), CameraMode::Detached);
    let rig_state = rig(&app, camera);
    assert!(rig_state.saved.is_some());
    assert_eq!(rig_state.orbit_rotation, before.rotation());
    assert_eq!(rig_state.zoom, config.initial_zoom);
}

#[test]
fn round_trip_restores_pose_exactly() {
    let mut app = create_app(Some(0.0));
    let (character, camera) = walked_scene(&mut app);
    let saved_orientation = orientation(&app, character);
    let saved_height = app.world().get::<VerticalState>(character).unwrap().height;

    toggle(&mut app);
    app.world_mut().get_mut::<CameraRig>(camera).unwrap().drag_held = true;
    for i in 0..30 {
        app.world_mut().send_event(OrbitDrag {
            delta: Vec2::new(25.0, (i % 7) as f32 - 3.0),
        });
        app.world_mut().send_event(OrbitZoom { delta: -40.0 });
        app.update();
    }
    assert_ne!(
        orientation(&app, character).rotation(),
        saved_orientation.rotation(),
        "orbit dragging should have rotated the planet"
    );

    toggle(&mut app);

    assert_eq!(mode(&app), CameraMode::Follow);
    let restored = orientation(&app, character);
    assert_eq!(restored.rotation(), saved_orientation.rotation());
    assert_eq!(restored.heading(), saved_orientation.heading());
    assert_eq!(
        app.world().get::<VerticalState>(character).unwrap().height,
        saved_height
    );
    assert!(rig(&app, camera).saved.is_none());
}

#[test]
fn character_is_hidden_and_frozen_while_detached() {
    // Bottomless world: an airborne character would fall if physics ran.
    let mut app = create_app(None);
    let character = spawn_character(&mut app, 5.0);
    let _camera = spawn_camera(&mut app);
    let visual = app
        .world_mut()
        .spawn((Transform::default(), Visibility::default(), CharacterVisual))
        .id();
    app.update();

    // The toggle frame itself still runs one fixed tick in follow mode, so
    // the freeze reference is the height at the moment the snapshot landed.
    toggle(&mut app);
    assert_eq!(
        *app.world().get::<Visibility>(visual).unwrap(),
        Visibility::Hidden
    );
    let frozen = app.world().get::<VerticalState>(character).unwrap().height;

    run_frames(&mut app, 60);
    assert_eq!(
        app.world().get::<VerticalState>(character).unwrap().height,
        frozen,
        "character fell while frozen"
    );

    toggle(&mut app);
    assert_eq!(
        *app.world().get::<Visibility>(visual).unwrap(),
        Visibility::Inherited
    );

    // Physics resumes on exit.
    run_frames(&mut app, 30);
    assert!(app.world().get::<VerticalState>(character).unwrap().height < frozen);
}

// ==================== Orbit input gating ====================

#[test]
fn drag_requires_the_pointer_to_be_held() {
    let mut app = create_app(Some(0.0));
    let (_character, camera) = walked_scene(&mut app);

    toggle(&mut app);
    let seeded = rig(&app, camera).orbit_rotation;

    for _ in 0..10 {
        app.world_mut().send_event(OrbitDrag {
            delta: Vec2::new(100.0, 50.0),
        });
        app.update();
    }
    assert_eq!(rig(&app, camera).orbit_rotation, seeded);
}

#[test]
fn orbit_events_in_follow_mode_are_discarded() {
    let mut app = create_app(Some(0.0));
    let (character, camera) = walked_scene(&mut app);

    // Sent while following: must not queue up for later.
    for _ in 0..10 {
        app.world_mut().send_event(OrbitDrag {
            delta: Vec2::new(100.0, 100.0),
        });
        app.world_mut().send_event(OrbitZoom { delta: 1_000.0 });
        app.update();
    }

    let before = orientation(&app, character).rotation();
    toggle(&mut app);
    app.world_mut().get_mut::<CameraRig>(camera).unwrap().drag_held = true;
    app.update();

    let rig_state = rig(&app, camera);
    assert_eq!(rig_state.orbit_rotation, before, "stale drags replayed");
    let config = *app.world().get::<CameraConfig>(camera).unwrap();
    assert_eq!(rig_state.zoom, config.initial_zoom, "stale zooms replayed");
}

#[test]
fn zoom_clamps_to_configured_bounds() {
    let mut app = create_app(Some(0.0));
    let (_character, camera) = walked_scene(&mut app);
    let config = *app.world().get::<CameraConfig>(camera).unwrap();

    toggle(&mut app);

    app.world_mut().send_event(OrbitZoom { delta: 1.0e9 });
    app.update();
    assert_eq!(rig(&app, camera).zoom, config.zoom_max);

    app.world_mut().send_event(OrbitZoom { delta: -1.0e9 });
    app.update();
    assert_eq!(rig(&app, camera).zoom, config.zoom_min);
}

#[test]
fn held_drag_orbits_the_planet_and_camera_watches_center() {
    let mut app = create_app(Some(0.0));
    let (character, camera) = walked_scene(&mut app);
    let before = orientation(&app, character).rotation();

    toggle(&mut app);
    app.world_mut().get_mut::<CameraRig>(camera).unwrap().drag_held = true;
    for _ in 0..20 {
        app.world_mut().send_event(OrbitDrag {
            delta: Vec2::new(30.0, 10.0),
        });
        app.update();
    }

    let state = orientation(&app, character);
    assert_ne!(state.rotation(), before);
    assert!((state.rotation().length() - 1.0).abs() < 1e-5);

    let transform = app.world().get::<Transform>(camera).unwrap();
    let rig_state = rig(&app, camera);
    assert!((transform.translation.length() - rig_state.zoom).abs() < 1e-3);
}

// ==================== Interaction with return-to-spawn ====================

#[test]
fn return_to_spawn_forces_follow_mode() {
    let mut app = create_app(Some(0.0));
    let (character, camera) = walked_scene(&mut app);
    let spawn = *app.world().get::<SpawnPoint>(character).unwrap();

    toggle(&mut app);
    assert_eq!(mode(&app), CameraMode::Detached);

    app.world_mut().send_event(ReturnToSpawn);
    app.update();

    assert_eq!(mode(&app), CameraMode::Follow);
    assert!(rig(&app, camera).saved.is_none());
    let state = orientation(&app, character);
    assert_eq!(state.rotation(), spawn.rotation);
    assert_eq!(state.heading(), spawn.heading);
}
