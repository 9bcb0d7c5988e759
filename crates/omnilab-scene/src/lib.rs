#![warn(missing_docs)]

//! Retained scene graph for the omnilab engine.
//!
//! The scene is a slotmap arena of nodes — groups and meshes — with local
//! transforms composed down the hierarchy. At most one subtree at a time is
//! the *active assembly*: the currently fabricated object, replaced
//! wholesale on each spawn. Named sub-parts of the assembly are addressed
//! through the [`PartRegistry`], which is reset atomically whenever the
//! assembly changes. Slotmap keys are generational, so a leaked `NodeId`
//! from a discarded assembly can never resolve to a live node.

use omnilab_math::{Color, Point3, Transform as Affine, Vec3};
use omnilab_mesh::TriangleMesh;
use slotmap::SlotMap;
use std::collections::HashMap;

pub mod camera;

pub use camera::{Camera, Grid, Light};

slotmap::new_key_type! {
    /// Generational key identifying a node in the scene arena.
    pub struct NodeId;
}

/// Local transform of a node relative to its parent.
///
/// Rotation is Euler angles in radians, applied X, then Y, then Z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Position relative to parent.
    pub position: Vec3,
    /// Euler rotation in radians (applied X, then Y, then Z).
    pub rotation: Vec3,
    /// Per-axis scale.
    pub scale: Vec3,
}

impl Transform {
    /// Identity transform: origin, no rotation, unit scale.
    pub const IDENTITY: Transform = Transform {
        position: Vec3::new(0.0, 0.0, 0.0),
        rotation: Vec3::new(0.0, 0.0, 0.0),
        scale: Vec3::new(1.0, 1.0, 1.0),
    };

    /// Transform at a position with no rotation.
    pub fn from_position(x: f64, y: f64, z: f64) -> Self {
        Self {
            position: Vec3::new(x, y, z),
            ..Self::IDENTITY
        }
    }

    /// Transform with a rotation about the X axis.
    pub fn from_rotation_x(angle: f64) -> Self {
        Self {
            rotation: Vec3::new(angle, 0.0, 0.0),
            ..Self::IDENTITY
        }
    }

    /// Convert to an affine matrix: translation * Rz * Ry * Rx * scale.
    pub fn to_matrix(&self) -> Affine {
        Affine::translation(self.position.x, self.position.y, self.position.z)
            .then(&Affine::rotation_z(self.rotation.z))
            .then(&Affine::rotation_y(self.rotation.y))
            .then(&Affine::rotation_x(self.rotation.x))
            .then(&Affine::scale(self.scale.x, self.scale.y, self.scale.z))
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Surface appearance of a mesh node.
///
/// Every material carries an emissive channel; the diagnostic drives the
/// emissive color and intensity of all assembly meshes while running.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Base color.
    pub color: Color,
    /// Metallic factor (0.0 = dielectric, 1.0 = metal).
    pub metalness: f64,
    /// Roughness factor (0.0 = mirror, 1.0 = diffuse).
    pub roughness: f64,
    /// Emissive color.
    pub emissive: Color,
    /// Emissive intensity multiplier.
    pub emissive_intensity: f64,
    /// Opacity in `0.0..=1.0`; below 1.0 the surface renders translucent.
    pub opacity: f64,
}

impl Material {
    /// Matte surface of the given color.
    pub fn matte(color: Color) -> Self {
        Self {
            color,
            metalness: 0.0,
            roughness: 0.8,
            emissive: Color::BLACK,
            emissive_intensity: 0.0,
            opacity: 1.0,
        }
    }

    /// Polished metal of the given color.
    pub fn metal(color: Color) -> Self {
        Self {
            metalness: 1.0,
            roughness: 0.2,
            ..Self::matte(color)
        }
    }

    /// Self-lit surface.
    pub fn glowing(color: Color, emissive: Color, intensity: f64) -> Self {
        Self {
            emissive,
            emissive_intensity: intensity,
            ..Self::matte(color)
        }
    }

    /// Translucent surface with the given opacity.
    pub fn translucent(color: Color, opacity: f64) -> Self {
        Self {
            opacity,
            ..Self::matte(color)
        }
    }
}

/// What a node holds: child structure only, or renderable geometry.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Structural node grouping children.
    Group,
    /// Renderable triangle mesh with a material.
    Mesh {
        /// The geometry.
        mesh: TriangleMesh,
        /// The surface appearance.
        material: Material,
    },
}

/// A node in the scene arena.
#[derive(Debug, Clone)]
pub struct Node {
    /// Optional human-readable name.
    pub name: Option<String>,
    /// Local transform relative to the parent.
    pub transform: Transform,
    /// Group or mesh payload.
    pub kind: NodeKind,
    /// Parent link; `None` for roots.
    pub parent: Option<NodeId>,
    /// Child links, in attach order.
    pub children: Vec<NodeId>,
}

/// The root container of all visible geometry plus camera, lights, and grid.
///
/// One per session; created at boot and never destroyed during the session.
#[derive(Debug)]
pub struct Scene {
    nodes: SlotMap<NodeId, Node>,
    roots: Vec<NodeId>,
    /// The viewing camera.
    pub camera: Camera,
    /// Scene lights.
    pub lights: Vec<Light>,
    /// Ground-reference grid description.
    pub grid: Grid,
    active_assembly: Option<NodeId>,
}

impl Scene {
    /// Create a scene with the default camera pose, lights, and ground grid.
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            roots: Vec::new(),
            camera: Camera::new(),
            lights: vec![
                Light::Ambient {
                    color: Color::gray(0.25),
                    intensity: 2.0,
                },
                Light::Directional {
                    color: Color::WHITE,
                    intensity: 2.0,
                    direction: Vec3::new(-5.0, -10.0, -7.0),
                },
            ],
            grid: Grid::default(),
            active_assembly: None,
        }
    }

    /// Recompute the camera aspect for new viewport dimensions.
    ///
    /// Has no effect on assembly state; degenerate dimensions are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.camera.aspect = width as f64 / height as f64;
        }
    }

    /// Add a group node, attached under `parent` or as a root.
    pub fn add_group(
        &mut self,
        name: Option<&str>,
        transform: Transform,
        parent: Option<NodeId>,
    ) -> NodeId {
        self.insert(
            Node {
                name: name.map(str::to_string),
                transform,
                kind: NodeKind::Group,
                parent,
                children: Vec::new(),
            },
            parent,
        )
    }

    /// Add a mesh node, attached under `parent` or as a root.
    pub fn add_mesh(
        &mut self,
        name: Option<&str>,
        mesh: TriangleMesh,
        material: Material,
        transform: Transform,
        parent: Option<NodeId>,
    ) -> NodeId {
        self.insert(
            Node {
                name: name.map(str::to_string),
                transform,
                kind: NodeKind::Mesh { mesh, material },
                parent,
                children: Vec::new(),
            },
            parent,
        )
    }

    fn insert(&mut self, node: Node, parent: Option<NodeId>) -> NodeId {
        let id = self.nodes.insert(node);
        match parent {
            Some(p) => self.nodes[p].children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    /// Whether `id` resolves to a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Borrow a node.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Mutably borrow a node.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    /// Root node ids, in attach order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Total number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Detach and drop the subtree rooted at `id`, including `id` itself.
    ///
    /// The subtree owns its nodes exclusively, so the whole thing goes.
    pub fn remove_subtree(&mut self, id: NodeId) {
        let Some(parent) = self.nodes.get(id).map(|node| node.parent) else {
            return;
        };
        match parent {
            Some(p) => {
                if let Some(parent) = self.nodes.get_mut(p) {
                    parent.children.retain(|&c| c != id);
                }
            }
            None => self.roots.retain(|&r| r != id),
        }

        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(current) {
                stack.extend(node.children);
            }
        }

        if self.active_assembly == Some(id) {
            self.active_assembly = None;
        }
    }

    /// The active assembly root, if one is attached.
    pub fn active_assembly(&self) -> Option<NodeId> {
        self.active_assembly.filter(|&id| self.nodes.contains_key(id))
    }

    /// Mark `id` as the active assembly root.
    pub fn set_active_assembly(&mut self, id: NodeId) {
        self.active_assembly = Some(id);
    }

    /// World transform of a node: the product of its ancestor chain.
    pub fn world_transform(&self, id: NodeId) -> Option<Affine> {
        let mut chain = Vec::new();
        let mut current = Some(id);
        while let Some(c) = current {
            let node = self.nodes.get(c)?;
            chain.push(node.transform.to_matrix());
            current = node.parent;
        }
        let mut world = Affine::identity();
        for local in chain.iter().rev() {
            world = world.then(local);
        }
        Some(world)
    }

    /// World-space position of a node's origin.
    pub fn world_position(&self, id: NodeId) -> Option<Point3> {
        self.world_transform(id)
            .map(|t| t.apply_point(&Point3::origin()))
    }

    /// Ids of all mesh nodes in the subtree rooted at `id` (depth-first).
    pub fn subtree_meshes(&self, id: NodeId) -> Vec<NodeId> {
        let mut meshes = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get(current) {
                if matches!(node.kind, NodeKind::Mesh { .. }) {
                    meshes.push(current);
                }
                stack.extend(node.children.iter().copied());
            }
        }
        meshes
    }

    /// Number of nodes in the subtree rooted at `id`, including `id`.
    pub fn subtree_len(&self, id: NodeId) -> usize {
        let mut count = 0;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get(current) {
                count += 1;
                stack.extend(node.children.iter().copied());
            }
        }
        count
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

/// Mapping from symbolic part names to live nodes of the current assembly.
///
/// Invariant: contents are always consistent with the current assembly —
/// the registry is cleared before a replacement assembly registers its
/// parts, so no entry from a prior assembly can resolve.
#[derive(Debug, Default)]
pub struct PartRegistry {
    entries: HashMap<String, NodeId>,
}

impl PartRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `id` under `name`, replacing any previous entry.
    pub fn register(&mut self, name: &str, id: NodeId) {
        self.entries.insert(name.to_string(), id);
    }

    /// Resolve `name` to a node that is still live in `scene`.
    pub fn resolve(&self, scene: &Scene, name: &str) -> Option<NodeId> {
        self.entries
            .get(name)
            .copied()
            .filter(|&id| scene.contains(id))
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use omnilab_mesh::cuboid;
    use std::f64::consts::PI;

    fn unit_mesh() -> TriangleMesh {
        cuboid(1.0, 1.0, 1.0)
    }

    #[test]
    fn remove_subtree_drops_descendants() {
        let mut scene = Scene::new();
        let root = scene.add_group(Some("assembly"), Transform::IDENTITY, None);
        let child = scene.add_mesh(
            None,
            unit_mesh(),
            Material::matte(Color::WHITE),
            Transform::IDENTITY,
            Some(root),
        );
        let grandchild = scene.add_group(None, Transform::IDENTITY, Some(child));

        scene.remove_subtree(root);
        assert!(scene.is_empty());
        assert!(!scene.contains(child));
        assert!(!scene.contains(grandchild));
        assert!(scene.roots().is_empty());
    }

    #[test]
    fn stale_id_never_resolves() {
        let mut scene = Scene::new();
        let old = scene.add_group(Some("a"), Transform::IDENTITY, None);
        scene.remove_subtree(old);

        // Fill the freed slot; the generational key still must not resolve.
        let replacement = scene.add_group(Some("b"), Transform::IDENTITY, None);
        assert!(!scene.contains(old));
        assert!(scene.contains(replacement));
        assert_ne!(old, replacement);
    }

    #[test]
    fn registry_scoped_to_scene_liveness() {
        let mut scene = Scene::new();
        let mut registry = PartRegistry::new();
        let root = scene.add_group(None, Transform::IDENTITY, None);
        let core = scene.add_mesh(
            Some("core"),
            unit_mesh(),
            Material::matte(Color::WHITE),
            Transform::IDENTITY,
            Some(root),
        );
        registry.register("core", core);
        assert_eq!(registry.resolve(&scene, "core"), Some(core));

        scene.remove_subtree(root);
        // Entry still present but no longer resolves to a live node.
        assert_eq!(registry.resolve(&scene, "core"), None);
    }

    #[test]
    fn world_position_composes_hierarchy() {
        let mut scene = Scene::new();
        let root = scene.add_group(None, Transform::from_position(100.0, 0.0, 0.0), None);
        let child = scene.add_group(None, Transform::from_position(10.0, 0.0, 0.0), Some(root));
        let p = scene.world_position(child).unwrap();
        assert_relative_eq!(p.x, 110.0, epsilon = 1e-12);
    }

    #[test]
    fn world_position_applies_parent_rotation() {
        let mut scene = Scene::new();
        let mut pivot_transform = Transform::IDENTITY;
        pivot_transform.rotation.z = PI / 2.0;
        let pivot = scene.add_group(None, pivot_transform, None);
        let child = scene.add_group(None, Transform::from_position(1.0, 0.0, 0.0), Some(pivot));
        let p = scene.world_position(child).unwrap();
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn subtree_meshes_finds_only_meshes() {
        let mut scene = Scene::new();
        let root = scene.add_group(None, Transform::IDENTITY, None);
        let _sub = scene.add_group(None, Transform::IDENTITY, Some(root));
        let m1 = scene.add_mesh(
            None,
            unit_mesh(),
            Material::matte(Color::WHITE),
            Transform::IDENTITY,
            Some(root),
        );
        let m2 = scene.add_mesh(
            None,
            unit_mesh(),
            Material::matte(Color::WHITE),
            Transform::IDENTITY,
            Some(_sub),
        );
        let mut found = scene.subtree_meshes(root);
        found.sort();
        let mut expected = vec![m1, m2];
        expected.sort();
        assert_eq!(found, expected);
        assert_eq!(scene.subtree_len(root), 4);
    }

    #[test]
    fn resize_ignores_degenerate_dimensions() {
        let mut scene = Scene::new();
        let before = scene.camera.aspect;
        scene.resize(1920, 0);
        assert_relative_eq!(scene.camera.aspect, before);
        scene.resize(1920, 1080);
        assert_relative_eq!(scene.camera.aspect, 1920.0 / 1080.0);
    }

    #[test]
    fn active_assembly_cleared_on_removal() {
        let mut scene = Scene::new();
        let root = scene.add_group(Some("band"), Transform::IDENTITY, None);
        scene.set_active_assembly(root);
        assert_eq!(scene.active_assembly(), Some(root));
        scene.remove_subtree(root);
        assert_eq!(scene.active_assembly(), None);
    }
}
