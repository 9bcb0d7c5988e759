//! Assembly recipes: pure construction of multi-part prototypes.
//!
//! Each recipe builds a hierarchical group of primitive meshes in a Z-up
//! local frame and tilts the root so local +Z becomes world +Y. Sub-parts
//! that are later targets for animation or camera focus are registered in
//! the part registry under fixed keys; everything else is cosmetic.

use omnilab_math::{Color, Point3, Vec3};
use omnilab_mesh::{arc_tube, cuboid, cylinder, dome, sphere_patch, torus};
use omnilab_scene::{Material, NodeId, PartRegistry, Scene, Transform};
use std::f64::consts::{FRAC_PI_2, PI};

/// Registry key of the time band's central core.
pub const PART_CORE: &str = "core";
/// Registry key of the time band's holographic lens.
pub const PART_LENS: &str = "lens";
/// Registry key of the helmet's faceplate hinge pivot.
///
/// The registered node is the pivot group, not the plate mesh: rotating
/// the pivot about X swings the plate around the hinge at the top-front
/// of the dome.
pub const PART_FACEPLATE: &str = "faceplate";

/// Hinge angle of a fully opened faceplate, radians about X.
pub const FACEPLATE_OPEN_ANGLE: f64 = -72.0 * PI / 180.0;

/// Number of peripheral chips on a time band.
const CHIP_COUNT: usize = 6;

/// The assemblies the lab can fabricate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblyKind {
    /// Ring-shaped wearable device with a holographic core.
    TimeBand,
    /// Helmet with a hinged faceplate.
    Helmet,
    /// A kind with no recipe. Spawning it still clears the previous
    /// assembly and then builds nothing — a documented quirk, kept.
    Unknown,
}

impl AssemblyKind {
    /// Display name used for the HUD project field.
    pub fn project_name(&self) -> Option<&'static str> {
        match self {
            AssemblyKind::TimeBand => Some("TIME BAND"),
            AssemblyKind::Helmet => Some("HELMET MK-II"),
            AssemblyKind::Unknown => None,
        }
    }

    /// Narration line emitted when the build completes.
    pub fn build_line(&self) -> Option<&'static str> {
        match self {
            AssemblyKind::TimeBand => Some("Time band prototype assembled."),
            AssemblyKind::Helmet => Some("Helmet prototype assembled."),
            AssemblyKind::Unknown => None,
        }
    }
}

/// Build the assembly for `kind`, registering its named parts.
///
/// Returns the new assembly root, or `None` for a kind with no recipe.
/// The caller is responsible for having detached the previous assembly
/// and reset the registry first.
pub fn build(scene: &mut Scene, registry: &mut PartRegistry, kind: AssemblyKind) -> Option<NodeId> {
    match kind {
        AssemblyKind::TimeBand => Some(build_time_band(scene, registry)),
        AssemblyKind::Helmet => Some(build_helmet(scene, registry)),
        AssemblyKind::Unknown => None,
    }
}

/// Tilt a root group so the recipe's local +Z axis points at world +Y.
fn tilted_root(scene: &mut Scene, name: &str) -> NodeId {
    scene.add_group(Some(name), Transform::from_rotation_x(-FRAC_PI_2), None)
}

fn build_time_band(scene: &mut Scene, registry: &mut PartRegistry) -> NodeId {
    let root = tilted_root(scene, "time_band");

    // Chassis ring.
    scene.add_mesh(
        Some("chassis"),
        torus(1.5, 0.4, 16, 48),
        Material::metal(Color::gray(0.67)),
        Transform::IDENTITY,
        Some(root),
    );

    // Central core, the primary focus target.
    let core = scene.add_mesh(
        Some(PART_CORE),
        cylinder(0.8, 0.5, 32),
        Material::glowing(Color::gray(0.07), Color::CYAN, 0.3),
        Transform::IDENTITY,
        Some(root),
    );
    registry.register(PART_CORE, core);

    // Holographic emitter dome above the core.
    let lens = scene.add_mesh(
        Some(PART_LENS),
        dome(0.6, 24),
        Material {
            emissive: Color::CYAN,
            emissive_intensity: 0.8,
            ..Material::translucent(Color::CYAN, 0.35)
        },
        Transform::from_position(0.0, 0.0, 0.25),
        Some(root),
    );
    registry.register(PART_LENS, lens);

    // Peripheral chips seated on the ring, each wired to the core.
    for i in 0..CHIP_COUNT {
        let angle = i as f64 / CHIP_COUNT as f64 * 2.0 * PI;
        let (sin, cos) = angle.sin_cos();

        let mut chip_transform = Transform::from_position(1.5 * cos, 1.5 * sin, 0.45);
        chip_transform.rotation.z = angle;
        scene.add_mesh(
            None,
            cuboid(0.3, 0.2, 0.1),
            Material::matte(Color::gray(0.13)),
            chip_transform,
            Some(root),
        );

        scene.add_mesh(
            None,
            arc_tube(
                Point3::new(1.5 * cos, 1.5 * sin, 0.45),
                Point3::new(0.7 * cos, 0.7 * sin, 0.3),
                Vec3::new(0.0, 0.0, 0.4),
                0.03,
                12,
                8,
            ),
            Material::glowing(Color::gray(0.1), Color::CYAN, 0.6),
            Transform::IDENTITY,
            Some(root),
        );
    }

    root
}

fn build_helmet(scene: &mut Scene, registry: &mut PartRegistry) -> NodeId {
    let root = tilted_root(scene, "helmet");

    // Dome shell: a sphere cut a little below the equator. Local -Y is the
    // face direction (world +Z after the root tilt).
    scene.add_mesh(
        Some("dome"),
        sphere_patch(1.2, 0.0, 2.0 * PI, 0.0, 0.62 * PI, 32, 16),
        Material::metal(Color::new(0.55, 0.06, 0.06)),
        Transform::IDENTITY,
        Some(root),
    );

    // Hinge pivot at the top-front of the dome. The plate mesh is offset
    // by the negated hinge position so its geometry stays centered on the
    // dome while the pivot carries the rotation.
    let hinge = Vec3::new(0.0, -0.75, 0.9);
    let pivot = scene.add_group(
        Some(PART_FACEPLATE),
        Transform::from_position(hinge.x, hinge.y, hinge.z),
        Some(root),
    );
    registry.register(PART_FACEPLATE, pivot);

    scene.add_mesh(
        Some("faceplate_shell"),
        sphere_patch(
            1.22,
            -140.0 * PI / 180.0,
            100.0 * PI / 180.0,
            20.0 * PI / 180.0,
            75.0 * PI / 180.0,
            24,
            12,
        ),
        Material::metal(Color::new(0.83, 0.68, 0.21)),
        Transform::from_position(-hinge.x, -hinge.y, -hinge.z),
        Some(pivot),
    );

    // Eye slits, fixed to the dome.
    for x in [-0.45, 0.45] {
        scene.add_mesh(
            None,
            cuboid(0.3, 0.08, 0.12),
            Material::glowing(Color::gray(0.9), Color::CYAN, 1.5),
            Transform::from_position(x, -1.1, 0.15),
            Some(root),
        );
    }

    root
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn time_band_registers_core_and_lens() {
        let mut scene = Scene::new();
        let mut registry = PartRegistry::new();
        let root = build(&mut scene, &mut registry, AssemblyKind::TimeBand).unwrap();

        assert_eq!(registry.names(), vec!["core", "lens"]);
        let core = registry.resolve(&scene, PART_CORE).unwrap();
        assert!(scene.contains(core));
        // Root + chassis + core + lens + 6 chips + 6 wires.
        assert_eq!(scene.subtree_len(root), 16);
    }

    #[test]
    fn helmet_registers_pivot_not_plate() {
        let mut scene = Scene::new();
        let mut registry = PartRegistry::new();
        let root = build(&mut scene, &mut registry, AssemblyKind::Helmet).unwrap();

        assert_eq!(registry.names(), vec!["faceplate"]);
        let pivot = registry.resolve(&scene, PART_FACEPLATE).unwrap();
        let node = scene.node(pivot).unwrap();
        assert!(matches!(node.kind, omnilab_scene::NodeKind::Group));
        // The plate mesh hangs under the pivot.
        assert_eq!(node.children.len(), 1);
        assert_eq!(scene.subtree_len(root), 6);
    }

    #[test]
    fn helmet_plate_counter_offsets_hinge() {
        let mut scene = Scene::new();
        let mut registry = PartRegistry::new();
        build(&mut scene, &mut registry, AssemblyKind::Helmet).unwrap();

        let pivot = registry.resolve(&scene, PART_FACEPLATE).unwrap();
        let plate = scene.node(pivot).unwrap().children[0];
        // With the pivot at rest, the plate's origin coincides with the
        // assembly center.
        let p = scene.world_position(plate).unwrap();
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(p.y, 0.0, epsilon = 1e-9);
        assert_relative_eq!(p.z, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn unknown_kind_builds_nothing() {
        let mut scene = Scene::new();
        let mut registry = PartRegistry::new();
        assert!(build(&mut scene, &mut registry, AssemblyKind::Unknown).is_none());
        assert!(scene.is_empty());
        assert!(registry.is_empty());
    }

    #[test]
    fn root_tilt_maps_local_z_to_world_y() {
        let mut scene = Scene::new();
        let mut registry = PartRegistry::new();
        let root = build(&mut scene, &mut registry, AssemblyKind::TimeBand).unwrap();

        // The lens sits above the core along local +Z; in world space that
        // must come out as +Y.
        let lens = registry.resolve(&scene, PART_LENS).unwrap();
        assert_eq!(scene.node(lens).unwrap().parent, Some(root));
        let p = scene.world_position(lens).unwrap();
        assert_relative_eq!(p.y, 0.25, epsilon = 1e-9);
        assert_relative_eq!(p.z, 0.0, epsilon = 1e-9);
    }
}
