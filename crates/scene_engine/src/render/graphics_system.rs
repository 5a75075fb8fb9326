//! Graphics system
//!
//! Owns the resource registries and the per-frame draw list. There is no GPU
//! backend here: `update` produces the ordered list of draws and the main
//! camera matrices a backend would consume.

use std::path::Path;

use crate::assets::{AssetError, AssetParser, ImageData};
use crate::ecs::{CameraComponent, Entity, MeshComponent, RenderMode, World};
use crate::foundation::math::{Mat4, Vec4};
use crate::render::{
    Geometry, GeometryId, Material, MaterialId, ShaderId, ShaderProgram, Texture, TextureData, TextureId,
};

/// Skybox state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Environment {
    /// Cubemap texture
    pub cubemap: TextureId,
    /// Geometry the cubemap is drawn on
    pub geometry: GeometryId,
    /// Shader drawing it
    pub shader: ShaderId,
}

/// One entry of the frame's draw list
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    /// Entity owning the mesh
    pub entity: Entity,
    /// Geometry to draw
    pub geometry: GeometryId,
    /// Material override, `None` for multi-material geometry
    pub material: Option<MaterialId>,
    /// Render path
    pub render_mode: RenderMode,
    /// Model matrix including parents
    pub model: Mat4,
}

/// Counters for the last rendered frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Frames rendered so far
    pub frames: u64,
    /// Draw commands in the last frame
    pub draw_calls: usize,
    /// Triangles submitted in the last frame
    pub triangles: usize,
}

/// Rendering collaborator
#[derive(Debug, Default)]
pub struct GraphicsSystem {
    /// Clear colour
    pub screen_background_color: Vec4,
    viewport_width: u32,
    viewport_height: u32,
    asset_root: String,
    shaders: Vec<ShaderProgram>,
    materials: Vec<Material>,
    textures: Vec<Texture>,
    geometries: Vec<Geometry>,
    environment: Option<Environment>,
    fallback_material: Option<MaterialId>,
    draw_list: Vec<DrawCommand>,
    view_projection: Option<Mat4>,
    stats: FrameStats,
}

impl GraphicsSystem {
    /// Create an empty graphics system
    pub fn new() -> Self {
        Self::default()
    }

    /// Record surface size and asset root
    pub fn init(&mut self, width: u32, height: u32, asset_root: &str) {
        self.viewport_width = width;
        self.viewport_height = height;
        self.asset_root = asset_root.to_string();
        log::info!("Graphics initialized at {}x{} (assets in '{}')", width, height, asset_root);
    }

    /// Asset root given at init
    pub fn asset_root(&self) -> &str {
        &self.asset_root
    }

    /// Current main viewport size
    pub fn viewport(&self) -> (u32, u32) {
        (self.viewport_width, self.viewport_height)
    }

    /// Resize the main viewport
    pub fn update_main_viewport(&mut self, width: u32, height: u32) {
        self.viewport_width = width;
        self.viewport_height = height;
        log::debug!("Main viewport resized to {}x{}", width, height);
    }

    // Shaders

    /// Load and register a shader program
    pub fn load_shader(&mut self, parser: &dyn AssetParser, vertex_path: &str, fragment_path: &str) -> Result<ShaderId, AssetError> {
        let program = ShaderProgram::load(parser, vertex_path, fragment_path)?;
        self.shaders.push(program);
        let id = ShaderId::from_index(self.shaders.len() - 1);
        log::debug!("Loaded shader {} ({} + {})", id, vertex_path, fragment_path);
        Ok(id)
    }

    /// Shader program by id
    pub fn shader(&self, id: ShaderId) -> Option<&ShaderProgram> {
        self.shaders.get(id.index())
    }

    // Materials

    /// Register a material
    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.materials.push(material);
        MaterialId::from_index(self.materials.len() - 1)
    }

    /// Register a plain material and return its id
    pub fn create_material(&mut self, name: &str, shader: ShaderId) -> MaterialId {
        self.add_material(Material::new(name, shader))
    }

    /// Material by id
    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.index())
    }

    /// Mutable material by id
    pub fn material_mut(&mut self, id: MaterialId) -> Result<&mut Material, AssetError> {
        self.materials.get_mut(id.index()).ok_or_else(|| id.unknown())
    }

    /// First material with the given name
    pub fn material_by_name(&self, name: &str) -> Option<MaterialId> {
        self.materials
            .iter()
            .position(|material| material.name == name)
            .map(MaterialId::from_index)
    }

    /// All registered materials
    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    /// Parse an MTL library and register every material it defines
    pub fn load_material_library(
        &mut self,
        parser: &dyn AssetParser,
        dir: &str,
        file: &str,
        shader: ShaderId,
    ) -> Result<Vec<MaterialId>, AssetError> {
        let parsed = parser.parse_material_file(dir, file)?;
        let mut ids = Vec::with_capacity(parsed.len());

        for data in &parsed {
            let mut material = Material::from_mtl(data, shader);
            if let Some(map) = &data.diffuse_map {
                material.diffuse_map = Some(self.load_texture(parser, &join(dir, map))?);
            }
            if let Some(map) = &data.specular_map {
                material.specular_map = Some(self.load_texture(parser, &join(dir, map))?);
            }
            if let Some(map) = &data.normal_map {
                material.normal_map = Some(self.load_texture(parser, &join(dir, map))?);
            }
            ids.push(self.add_material(material));
        }

        log::info!("Loaded {} material(s) from {}{}", ids.len(), dir, file);
        Ok(ids)
    }

    // Textures

    /// Parse and register a 2D texture
    pub fn load_texture(&mut self, parser: &dyn AssetParser, path: &str) -> Result<TextureId, AssetError> {
        let image = parser.parse_texture(path)?;
        Ok(self.create_texture(path, image))
    }

    /// Parse and register a 2D texture, also handing back a copy of its pixels
    pub fn load_texture_with_pixels(&mut self, parser: &dyn AssetParser, path: &str) -> Result<(TextureId, ImageData), AssetError> {
        let image = parser.parse_texture(path)?;
        let pixels = image.clone();
        Ok((self.create_texture(path, image), pixels))
    }

    /// Register a 2D texture from pixels
    pub fn create_texture(&mut self, name: &str, image: ImageData) -> TextureId {
        self.push_texture(name, TextureData::Flat(image))
    }

    /// Parse and register a cubemap
    pub fn load_cubemap(&mut self, parser: &dyn AssetParser, faces: &[String; 6]) -> Result<TextureId, AssetError> {
        let cube = parser.parse_cubemap(faces)?;
        Ok(self.push_texture(&faces[0], TextureData::Cube(cube)))
    }

    /// Texture by id
    pub fn texture(&self, id: TextureId) -> Option<&Texture> {
        self.textures.get(id.index())
    }

    fn push_texture(&mut self, name: &str, data: TextureData) -> TextureId {
        self.textures.push(Texture { name: name.to_string(), data });
        TextureId::from_index(self.textures.len() - 1)
    }

    // Geometry

    /// Register a geometry
    pub fn add_geometry(&mut self, geometry: Geometry) -> GeometryId {
        log::debug!("Registered geometry '{}' ({} vertices)", geometry.name, geometry.vertex_count());
        self.geometries.push(geometry);
        GeometryId::from_index(self.geometries.len() - 1)
    }

    /// Load a single-material mesh
    pub fn create_geometry_from_file(&mut self, parser: &dyn AssetParser, path: &str) -> Result<GeometryId, AssetError> {
        let mesh = parser.parse_mesh(path)?;
        Ok(self.add_geometry(Geometry::from_mesh(path, &mesh, &[])))
    }

    /// Load a mesh whose `usemtl` groups bind registered materials by name
    ///
    /// Groups naming an unknown material draw with a shared fallback material.
    pub fn create_multi_material_geometry(&mut self, parser: &dyn AssetParser, path: &str) -> Result<GeometryId, AssetError> {
        let mesh = parser.parse_mesh_multi(path)?;
        let mut materials = Vec::with_capacity(mesh.groups.len());
        for group in &mesh.groups {
            let id = match self.material_by_name(&group.material_name) {
                Some(id) => id,
                None => {
                    log::warn!("{}: unknown material '{}', using fallback", path, group.material_name);
                    self.fallback_material()
                }
            };
            materials.push(Some(id));
        }
        Ok(self.add_geometry(Geometry::from_mesh(path, &mesh, &materials)))
    }

    /// Parse a mesh and attach its positions as a morph target of `geometry`
    pub fn add_blend_shape_from_file(&mut self, parser: &dyn AssetParser, geometry: GeometryId, path: &str) -> Result<usize, AssetError> {
        let mesh = parser.parse_mesh(path)?;
        let target = self.geometry_mut(geometry)?;
        let index = target.add_blend_shape(mesh.positions)?;
        log::debug!("Morph target {} from {} attached to {}", index, path, geometry);
        Ok(index)
    }

    /// Generate height-field terrain; the elevation map is consumed
    pub fn create_terrain_geometry(&mut self, resolution: u32, uv_density: f32, height: f32, elevation: ImageData) -> GeometryId {
        let geometry = Geometry::terrain(resolution, uv_density, height, elevation);
        log::info!("Generated terrain {}x{} ({} bytes)", resolution, resolution, geometry.byte_size());
        self.add_geometry(geometry)
    }

    /// Geometry by id
    pub fn geometry(&self, id: GeometryId) -> Option<&Geometry> {
        self.geometries.get(id.index())
    }

    /// Mutable geometry by id
    pub fn geometry_mut(&mut self, id: GeometryId) -> Result<&mut Geometry, AssetError> {
        self.geometries.get_mut(id.index()).ok_or_else(|| id.unknown())
    }

    // Environment

    /// Set the skybox
    pub fn set_environment(&mut self, cubemap: TextureId, geometry: GeometryId, shader: ShaderId) {
        self.environment = Some(Environment { cubemap, geometry, shader });
    }

    /// Current skybox
    pub fn environment(&self) -> Option<Environment> {
        self.environment
    }

    // Frame

    /// Check every mesh entity against the registries
    pub fn late_init(&mut self, world: &World) -> Result<(), AssetError> {
        for (entity, mesh) in world.query::<MeshComponent>() {
            if self.geometry(mesh.geometry).is_none() {
                log::error!("Entity {} references missing {}", entity, mesh.geometry);
                return Err(mesh.geometry.unknown());
            }
            if let Some(material) = mesh.material {
                if self.material(material).is_none() {
                    log::error!("Entity {} references missing {}", entity, material);
                    return Err(material.unknown());
                }
            }
        }

        if let Some(env) = self.environment {
            if self.geometry(env.geometry).is_none() {
                return Err(env.geometry.unknown());
            }
        }

        let bytes: usize = self.geometries.iter().map(Geometry::byte_size).sum();
        log::info!(
            "Graphics late init: {} shaders, {} materials, {} textures, {} geometries ({} bytes)",
            self.shaders.len(),
            self.materials.len(),
            self.textures.len(),
            self.geometries.len(),
            bytes
        );
        Ok(())
    }

    /// Build this frame's draw list from the world
    ///
    /// Deferred meshes come first, forward meshes after them.
    pub fn update(&mut self, world: &World, _dt: f32) {
        self.view_projection = world
            .main_camera()
            .and_then(|id| world.get::<CameraComponent>(id))
            .map(CameraComponent::view_projection);

        self.draw_list.clear();
        for (entity, mesh) in world.query::<MeshComponent>() {
            let model = world.entity_world_matrix(entity).unwrap_or_else(Mat4::identity);
            self.draw_list.push(DrawCommand {
                entity,
                geometry: mesh.geometry,
                material: mesh.material,
                render_mode: mesh.render_mode,
                model,
            });
        }
        self.draw_list.sort_by_key(|draw| draw.render_mode == RenderMode::Forward);

        self.stats.frames += 1;
        self.stats.draw_calls = self.draw_list.len();
        self.stats.triangles = self
            .draw_list
            .iter()
            .filter_map(|draw| self.geometries.get(draw.geometry.index()))
            .map(|geometry| geometry.indices.len() / 3)
            .sum();
    }

    /// Draw list built by the last `update`
    pub fn draw_list(&self) -> &[DrawCommand] {
        &self.draw_list
    }

    /// Main camera projection × view from the last `update`
    pub fn view_projection(&self) -> Option<&Mat4> {
        self.view_projection.as_ref()
    }

    /// Counters for the last frame
    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    fn fallback_material(&mut self) -> MaterialId {
        if let Some(id) = self.fallback_material {
            return id;
        }
        let shader = ShaderId::from_index(0);
        let id = self.create_material("Default", shader);
        self.fallback_material = Some(id);
        id
    }
}

fn join(dir: &str, file: &str) -> String {
    Path::new(dir).join(file).to_string_lossy().into_owned()
}
