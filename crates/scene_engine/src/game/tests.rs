use std::cell::RefCell;

use approx::assert_relative_eq;

use super::*;
use crate::assets::{CubemapData, ImageData, MeshData, MtlData, MtlParser, ObjLoader};
use crate::ecs::{ColliderComponent, ColliderKind, LightType};
use crate::foundation::math::utils;
use crate::systems::{ControlMode, MoveKeys};

const CUBE_OBJ: &str = "\
mtllib toon_base.mtl
v -1 -1 -1
v 1 -1 -1
v 1 1 -1
v -1 1 -1
v -1 -1 1
v 1 -1 1
v 1 1 1
v -1 1 1
usemtl Skin
f 1 2 3 4
f 5 6 7 8
f 1 2 6 5
f 4 3 7 8
usemtl Eyes
f 1 4 8 5
f 2 3 7 6
";

const TOON_MTL: &str = "\
newmtl Skin
Kd 0.9 0.7 0.6
newmtl Eyes
Kd 0.1 0.1 0.1
Ns 80
";

/// Parser serving a tiny scene from memory
#[derive(Default)]
struct MemoryParser {
    requested: RefCell<Vec<String>>,
    fail_on: Option<&'static str>,
}

impl MemoryParser {
    fn failing_on(fragment: &'static str) -> Self {
        Self { fail_on: Some(fragment), ..Self::default() }
    }

    fn record(&self, path: &str) -> Result<(), AssetError> {
        self.requested.borrow_mut().push(path.to_string());
        match self.fail_on {
            Some(fragment) if path.contains(fragment) => Err(AssetError::parse(path, "unreadable")),
            _ => Ok(()),
        }
    }

    fn was_requested(&self, fragment: &str) -> bool {
        self.requested.borrow().iter().any(|path| path.contains(fragment))
    }
}

impl AssetParser for MemoryParser {
    fn parse_material_file(&self, dir: &str, file: &str) -> Result<Vec<MtlData>, AssetError> {
        self.record(&format!("{}{}", dir, file))?;
        MtlParser::parse(TOON_MTL).map_err(|message| AssetError::parse(file, message))
    }

    fn parse_mesh(&self, path: &str) -> Result<MeshData, AssetError> {
        self.parse_mesh_multi(path)
    }

    fn parse_mesh_multi(&self, path: &str) -> Result<MeshData, AssetError> {
        self.record(path)?;
        ObjLoader::parse(CUBE_OBJ).map_err(|message| AssetError::parse(path, message))
    }

    fn parse_texture(&self, path: &str) -> Result<ImageData, AssetError> {
        self.record(path)?;
        if path.contains("heightmap") {
            let ramp: Vec<u8> = (0..16u8).map(|i| i * 16).collect();
            Ok(ImageData::from_luminance(4, 4, &ramp))
        } else {
            Ok(ImageData::solid_color(2, 2, [200, 200, 200, 255]))
        }
    }

    fn read_shader_source(&self, path: &str) -> Result<String, AssetError> {
        self.record(path)?;
        Ok("void main() {}".to_string())
    }

    fn parse_cubemap(&self, faces: &[String; 6]) -> Result<CubemapData, AssetError> {
        for face in faces {
            self.record(face)?;
        }
        Ok(CubemapData { faces: std::array::from_fn(|_| ImageData::solid_color(1, 1, [0, 0, 255, 255])) })
    }
}

fn test_config() -> GameConfig {
    let mut config = GameConfig::default();
    config.terrain.resolution = 8;
    config.particles.capacity = 32;
    config
}

fn bootstrapped() -> (Game, MemoryParser) {
    let parser = MemoryParser::default();
    let mut game = Game::new(test_config());
    game.init(1280, 720, &parser).expect("bootstrap should succeed");
    (game, parser)
}

fn main_camera(game: &Game) -> &CameraComponent {
    let id = game.world().main_camera().expect("main camera should be set");
    game.world().get(id).expect("main camera should resolve")
}

#[test]
fn test_bootstrap_sets_single_main_camera() {
    let (game, _) = bootstrapped();

    assert!(game.is_initialized());
    assert_eq!(game.world().count::<CameraComponent>(), 1);
    let camera_entity = game.world().find_entity("PlayerFree").expect("free camera entity");
    let id = game.world().main_camera().expect("main camera should be set");
    assert_eq!(game.world().owner(id), Some(camera_entity));
}

#[test]
fn test_bootstrap_builds_scene_contents() {
    let (game, parser) = bootstrapped();
    let world = game.world();
    let graphics = game.graphics();

    let toon = world.find_entity("toon").expect("toon entity");
    let toon_mesh = world.get_component::<MeshComponent>(toon).expect("toon mesh");
    assert!(toon_mesh.material.is_none());
    let toon_geometry = graphics.geometry(toon_mesh.geometry).expect("toon geometry");
    assert_eq!(toon_geometry.material_sets.len(), 2);
    assert_eq!(toon_geometry.blend_shapes.len(), 1);
    let transform = world.get_component::<TransformComponent>(toon).expect("toon transform");
    assert_relative_eq!(transform.position, Vec3::new(500.0, 0.0, 0.0));
    let shapes = world.get_component::<BlendShapesComponent>(toon).expect("toon blend shapes");
    assert_eq!(shapes.names, vec!["happy", "angry", "base"]);
    assert!(shapes.weights.iter().all(|&w| w == 0.0));

    let terrain_material = graphics.material_by_name("Terrain").expect("terrain material");
    let terrain_material = graphics.material(terrain_material).expect("terrain material resolves");
    assert_relative_eq!(terrain_material.height, 20.0);
    assert_relative_eq!(terrain_material.uv_scale, Vec2::new(100.0, 100.0));
    assert!(terrain_material.noise_map.is_some());
    assert!(graphics.material_by_name("Blue").is_some());
    assert!(graphics.material_by_name("Skin").is_some());

    let terrain = world.find_entity("Terrain").expect("terrain entity");
    let terrain_mesh = world.get_component::<MeshComponent>(terrain).expect("terrain mesh");
    assert_eq!(terrain_mesh.render_mode, RenderMode::Forward);

    let light = world.find_entity("Directional Light").expect("light entity");
    let light = world.get_component::<LightComponent>(light).expect("light component");
    assert_eq!(light.light_type, LightType::Directional);

    assert!(graphics.environment().is_some());
    assert_relative_eq!(graphics.screen_background_color, Vec4::new(1.0, 1.0, 1.0, 1.0));
    assert!(game.debug().is_active());
    assert!(game.particles().is_some());
    assert!(parser.was_requested("reflection.frag"));
    assert!(parser.was_requested("skybox/back.tga"));
    assert!(parser.was_requested("toon/toon_happy.obj"));
}

#[test]
fn test_bootstrap_free_camera_pose() {
    let (game, _) = bootstrapped();
    let camera = main_camera(&game);

    assert_eq!(game.control().mode(), ControlMode::Free);
    assert_relative_eq!(camera.position, Vec3::new(13.614, 16.0, 32.0), epsilon = 1e-5);
    assert_relative_eq!(camera.forward, Vec3::new(-0.466, -0.67, -0.579).normalize(), epsilon = 1e-5);
    assert_relative_eq!(camera.fov, utils::deg_to_rad(60.0), epsilon = 1e-6);
    assert_relative_eq!(camera.aspect, 1280.0 / 720.0, epsilon = 1e-6);
}

#[test]
fn test_free_camera_uses_supplied_depth() {
    let (mut game, _) = bootstrapped();

    game.create_free_camera(Vec3::new(1.0, 2.0, -7.5), Vec3::new(0.0, 0.0, -1.0))
        .expect("camera should be created");

    assert_relative_eq!(main_camera(&game).position, Vec3::new(1.0, 2.0, -7.5));
}

#[test]
fn test_double_init_is_rejected() {
    let (mut game, parser) = bootstrapped();
    let entities = game.world().entity_count();

    let result = game.init(800, 600, &parser);

    assert!(matches!(result, Err(GameError::AlreadyInitialized)));
    assert_eq!(game.world().entity_count(), entities);
}

#[test]
fn test_asset_failure_propagates() {
    let parser = MemoryParser::failing_on("cliffs.tga");
    let mut game = Game::new(test_config());

    let result = game.init(1280, 720, &parser);

    assert!(matches!(result, Err(GameError::Asset(AssetError::Parse { .. }))));
    assert!(!game.is_initialized());
}

#[test]
fn test_init_after_failed_bootstrap_is_rejected() {
    let mut game = Game::new(test_config());
    assert!(game.init(1280, 720, &MemoryParser::failing_on("cliffs.tga")).is_err());
    let entities = game.world().entity_count();
    let materials = game.graphics().materials().len();

    let retry = game.init(1280, 720, &MemoryParser::default());

    assert!(matches!(retry, Err(GameError::BootstrapFailed)));
    assert!(!game.is_initialized());
    assert_eq!(game.world().entity_count(), entities);
    assert_eq!(game.graphics().materials().len(), materials);
    let toons = game.world().entities().filter(|&e| game.world().entity_name(e) == Some("toon")).count();
    assert_eq!(toons, 1);
}

#[test]
fn test_frame_without_camera_advances_nothing() {
    let mut game = Game::new(test_config());

    let outcome = game.update(0.016).expect("no-camera frame is not an error");

    assert_eq!(outcome, FrameOutcome::NoCamera);
    assert_eq!(game.frame_count(), 0);
    assert!(game.last_frame_stages().is_empty());
}

#[test]
fn test_camera_before_bootstrap_is_not_initialized() {
    let mut game = Game::new(test_config());
    game.create_free_camera(Vec3::zeros(), Vec3::new(0.0, 0.0, -1.0)).unwrap();

    assert!(matches!(game.update(0.016), Err(GameError::NotInitialized)));
}

#[test]
fn test_tick_runs_every_stage_in_order() {
    let (mut game, _) = bootstrapped();
    let camera_before = game.world().main_camera();
    let position_before = main_camera(&game).position;

    let outcome = game.update(0.016).expect("frame should run");

    assert_eq!(outcome, FrameOutcome::Advanced);
    assert_eq!(game.frame_count(), 1);
    assert_eq!(game.last_frame_stages(), FrameSchedule::standard().stages());
    assert_eq!(game.world().main_camera(), camera_before);
    assert_relative_eq!(main_camera(&game).position, position_before, epsilon = 1e-5);
    assert!(!game.graphics().draw_list().is_empty());
}

#[test]
fn test_collision_sees_movement_from_same_tick() {
    let (mut game, _) = bootstrapped();
    game.create_player().unwrap();
    let wall = game.world_mut().create_entity("Wall");
    game.world_mut().get_component_mut::<TransformComponent>(wall).unwrap().position = Vec3::new(0.0, 3.0, 3.8);
    game.world_mut()
        .add_component(wall, ColliderComponent::aabb(Vec3::zeros(), Vec3::new(1.0, 1.0, 0.1)))
        .unwrap();
    let forward_ray = game.control().fps_colliders.forward.unwrap();

    // Out of reach from the start position, within reach after half a unit
    game.control_mut().press(MoveKeys::FORWARD);
    game.update(0.05).unwrap();

    let player_z = main_camera(&game).position.z;
    let ray: &ColliderComponent = game.world().get(forward_ray).unwrap();
    assert_relative_eq!(player_z, 4.5, epsilon = 1e-4);
    assert!(ray.colliding);
    assert_eq!(ray.collided_with, Some(wall));
    assert_relative_eq!(ray.collision_distance, 0.6, epsilon = 1e-4);
}

#[test]
fn test_player_rig_sensor_rays() {
    let (mut game, _) = bootstrapped();

    let player = game.create_player().expect("player should be created");
    let world = game.world();
    let player_transform = world.component_id::<TransformComponent>(player).expect("player transform");
    let slots = game.control().fps_colliders;

    assert_eq!(game.control().mode(), ControlMode::Fps);
    assert!(slots.is_complete());
    assert_eq!(world.owner(world.main_camera().unwrap()), Some(player));

    let expected = [
        (slots.down, "Down Ray", Vec3::new(0.0, -1.0, 0.0), 100.0),
        (slots.left, "Left Ray", Vec3::new(-1.0, 0.0, 0.0), 1.0),
        (slots.right, "Right Ray", Vec3::new(1.0, 0.0, 0.0), 1.0),
        (slots.forward, "Forward Ray", Vec3::new(0.0, 0.0, -1.0), 1.0),
        (slots.back, "Back Ray", Vec3::new(0.0, 0.0, 1.0), 1.0),
    ];
    for (slot, label, direction, max_distance) in expected {
        let id = slot.unwrap();
        let collider: &ColliderComponent = world.get(id).unwrap();
        let owner = world.owner(id).unwrap();
        let transform = world.get_component::<TransformComponent>(owner).unwrap();

        assert_eq!(world.entity_name(owner), Some(label));
        assert_eq!(collider.kind, ColliderKind::Ray);
        assert_relative_eq!(collider.direction, direction);
        assert_relative_eq!(collider.max_distance, max_distance);
        assert_eq!(transform.parent, Some(player_transform));
    }
}

#[test]
fn test_control_mode_follows_last_composed_camera() {
    let (mut game, _) = bootstrapped();

    game.create_player().unwrap();
    assert_eq!(game.control().mode(), ControlMode::Fps);

    let free = game.create_free_camera(Vec3::new(0.0, 10.0, 0.0), Vec3::new(0.0, 0.0, -1.0)).unwrap();
    assert_eq!(game.control().mode(), ControlMode::Free);
    assert_eq!(game.world().owner(game.world().main_camera().unwrap()), Some(free));
}

#[test]
fn test_resize_is_idempotent_and_resets_clip_planes() {
    let (mut game, _) = bootstrapped();
    game.create_player().unwrap();

    game.update_viewports(1920, 1080);
    let first: Vec<CameraComponent> = game.world().components::<CameraComponent>().cloned().collect();
    game.update_viewports(1920, 1080);
    let second: Vec<CameraComponent> = game.world().components::<CameraComponent>().cloned().collect();

    assert_eq!(first.len(), 2);
    assert_eq!(first, second);
    for camera in &second {
        assert_relative_eq!(camera.aspect, 1920.0 / 1080.0, epsilon = 1e-6);
        assert_relative_eq!(camera.fov, utils::deg_to_rad(60.0), epsilon = 1e-6);
        assert_relative_eq!(camera.near, 0.01);
        assert_relative_eq!(camera.far, 10000.0);
    }
    assert_eq!(game.graphics().viewport(), (1920, 1080));
    assert_eq!(game.window_size(), (1920, 1080));
}

#[test]
fn test_resize_moves_free_camera_to_fixed_clip_planes() {
    let (mut game, _) = bootstrapped();
    assert_relative_eq!(main_camera(&game).near, 0.1);

    game.update_viewports(1920, 1080);

    assert_relative_eq!(main_camera(&game).near, 0.01);
    assert_relative_eq!(main_camera(&game).far, 10000.0);
}

#[test]
fn test_zero_height_resize_is_ignored() {
    let (mut game, _) = bootstrapped();
    let before = main_camera(&game).clone();

    game.update_viewports(1920, 0);

    assert_eq!(main_camera(&game), &before);
    assert_eq!(game.window_size(), (1280, 720));
}

#[test]
fn test_parent_chain_round_trip() {
    let (mut game, _) = bootstrapped();
    let player = game.create_player().unwrap();
    let world = game.world();
    let player_transform = world.component_id::<TransformComponent>(player).unwrap();
    let down = world.owner(game.control().fps_colliders.down.unwrap()).unwrap();
    let down_transform = world.component_id::<TransformComponent>(down).unwrap();

    let chain: Vec<_> = world.ancestors(down_transform).collect();

    assert_eq!(chain, vec![player_transform]);
    let matrix = world.entity_world_matrix(down).unwrap();
    assert_relative_eq!(matrix[(1, 3)], 3.0);
}

#[test]
fn test_invalid_schedule_is_rejected() {
    let mut game = Game::new(test_config());
    let out_of_order = FrameSchedule::from_stages(vec![FrameStage::Rendering, FrameStage::Control]);

    assert!(out_of_order.is_err());
    assert!(game.set_schedule(FrameSchedule::standard()).is_ok());
}
