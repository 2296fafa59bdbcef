// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scene graph for the hero landing page.
//!
//! This module describes what the renderer draws:
//! - Starfield, textured planet, title label split into glyphs
//! - Transparent click-catcher sphere enclosing everything
//! - Camera, scene root and lights
//!
//! Every node owns its [`Transform`]. Mounting the graph attaches those
//! transforms to the nodes' [`TargetRef`] slots so animation code can reach
//! them; unmounting detaches them again.

use cosmos_intro_sequencer::{SharedTransform, TargetRef, Transform};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;
use uuid::Uuid;

/// Unique identifier for scene nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// Fresnel glow material parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlowMaterial {
    /// Base color
    pub color: [f32; 3],
    /// Rim glow color
    pub glow_color: [f32; 3],
    /// Rim falloff offset
    pub coefficient: f32,
    /// Rim falloff exponent
    pub power: f32,
}

impl Default for GlowMaterial {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            glow_color: [0.1, 0.1, 1.0],
            coefficient: 0.5,
            power: 2.0,
        }
    }
}

/// Starfield point cloud
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarfieldSettings {
    /// Inner radius of the shell
    pub radius: f32,
    /// Shell depth
    pub depth: f32,
    /// Number of stars
    pub count: u32,
    /// Star size factor
    pub factor: f32,
    /// Color saturation
    pub saturation: f32,
    /// Whether stars fade toward the edge
    pub fade: bool,
    /// Twinkle speed
    pub speed: f32,
    /// Continuous rotation about Y, radians per second
    pub angular_velocity: f32,
}

impl Default for StarfieldSettings {
    fn default() -> Self {
        Self {
            radius: 100.0,
            depth: 50.0,
            count: 5000,
            factor: 4.0,
            saturation: 0.0,
            fade: true,
            speed: 1.0,
            angular_velocity: 0.02,
        }
    }
}

/// Textured planet sphere
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanetSettings {
    /// Group position
    pub position: [f32; 3],
    /// Texture asset path
    pub texture: String,
    /// Sphere radius
    pub size: f32,
    /// Width and height segments
    pub segments: u32,
    /// Continuous rotation about Y, radians per second
    pub angular_velocity: f32,
    /// Glow material instead of the standard textured one
    pub glow: Option<GlowMaterial>,
}

impl Default for PlanetSettings {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            texture: "/assets/images/3D/planet.jpg".to_string(),
            size: 1.5,
            segments: 32,
            angular_velocity: 0.1,
            glow: None,
        }
    }
}

/// Title label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelSettings {
    /// Text
    pub text: String,
    /// Anchor position (centered)
    pub position: [f32; 3],
    /// Font size in world units
    pub font_size: f32,
    /// CSS color name
    pub color: String,
    /// Horizontal advance per glyph, as a fraction of the font size
    pub glyph_advance: f32,
}

impl Default for LabelSettings {
    fn default() -> Self {
        Self {
            text: "Welcome to Our Universe".to_string(),
            position: [0.0, 2.0, 0.0],
            font_size: 0.5,
            color: "white".to_string(),
            glyph_advance: 0.6,
        }
    }
}

/// Scene composition parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Initial camera position
    pub camera_position: [f32; 3],
    /// Starfield
    pub starfield: StarfieldSettings,
    /// Planet
    pub planet: PlanetSettings,
    /// Title label
    pub label: LabelSettings,
    /// Radius of the click-catcher sphere
    pub backdrop_radius: f32,
    /// Ambient light intensity
    pub ambient_intensity: f32,
    /// Point light position
    pub point_light: [f32; 3],
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            camera_position: [0.0, 0.0, 5.0],
            starfield: StarfieldSettings::default(),
            planet: PlanetSettings::default(),
            label: LabelSettings::default(),
            backdrop_radius: 1000.0,
            ambient_intensity: 1.0,
            point_light: [10.0, 10.0, 10.0],
        }
    }
}

/// Renderable primitive attached to a node
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    /// Grouping node
    Group,
    /// Perspective camera
    Camera,
    /// Star point cloud
    Starfield(StarfieldSettings),
    /// Planet sphere
    Planet(PlanetSettings),
    /// Text label; its glyphs are child nodes
    Label {
        /// Full text
        text: String,
        /// Font size
        font_size: f32,
        /// Color
        color: String,
    },
    /// Single character of a label
    Glyph(char),
    /// Invisible back-side sphere receiving clicks
    Backdrop {
        /// Sphere radius
        radius: f32,
    },
    /// Ambient light
    AmbientLight {
        /// Intensity
        intensity: f32,
    },
    /// Point light
    PointLight,
}

/// A node in the scene graph
#[derive(Debug)]
pub struct SceneNode {
    /// Display name
    pub name: String,
    /// What is drawn
    pub primitive: Primitive,
    /// Parent node
    pub parent: Option<NodeId>,
    /// Child nodes in insertion order
    pub children: Vec<NodeId>,
    transform: SharedTransform,
    target: TargetRef,
}

impl SceneNode {
    /// Animation handle for this node
    pub fn target(&self) -> &TargetRef {
        &self.target
    }

    /// Current transform
    pub fn transform(&self) -> Transform {
        *self.transform.borrow()
    }
}

/// Scene graph with a root group and a camera
#[derive(Debug)]
pub struct SceneGraph {
    nodes: IndexMap<NodeId, SceneNode>,
    root: NodeId,
    camera: NodeId,
    mounted: bool,
}

impl SceneGraph {
    /// Create a graph holding a scene root and a camera at `camera_position`
    pub fn new(camera_position: [f32; 3]) -> Self {
        let mut graph = Self {
            nodes: IndexMap::new(),
            root: NodeId::new(),
            camera: NodeId::new(),
            mounted: false,
        };
        graph.root = graph.insert("Scene", Primitive::Group, None, Transform::default());
        graph.camera = graph.insert(
            "Camera",
            Primitive::Camera,
            None,
            Transform::from_position(camera_position),
        );
        graph
    }

    fn insert(
        &mut self,
        name: &str,
        primitive: Primitive,
        parent: Option<NodeId>,
        transform: Transform,
    ) -> NodeId {
        let id = NodeId::new();
        let node = SceneNode {
            name: name.to_string(),
            primitive,
            parent,
            children: Vec::new(),
            transform: Rc::new(RefCell::new(transform)),
            target: TargetRef::new(),
        };
        if self.mounted {
            node.target.mount(Rc::clone(&node.transform));
        }
        if let Some(parent) = parent.and_then(|p| self.nodes.get_mut(&p)) {
            parent.children.push(id);
        }
        self.nodes.insert(id, node);
        id
    }

    /// Add a node under `parent`
    pub fn add(&mut self, name: &str, primitive: Primitive, parent: NodeId, transform: Transform) -> NodeId {
        self.insert(name, primitive, Some(parent), transform)
    }

    /// Attach every node's transform to its target slot
    pub fn mount(&mut self) {
        for node in self.nodes.values() {
            node.target.mount(Rc::clone(&node.transform));
        }
        self.mounted = true;
        tracing::debug!("Mounted scene ({} nodes)", self.nodes.len());
    }

    /// Detach every target slot
    pub fn unmount(&mut self) {
        for node in self.nodes.values() {
            node.target.unmount();
        }
        self.mounted = false;
        tracing::debug!("Unmounted scene");
    }

    /// Whether the graph is mounted
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Scene root node
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Camera node
    pub fn camera(&self) -> NodeId {
        self.camera
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    /// Animation handle of a node.
    ///
    /// Node IDs are only handed out by this graph, so a miss yields a fresh,
    /// never-mounted slot.
    pub fn target(&self, id: NodeId) -> TargetRef {
        self.nodes
            .get(&id)
            .map(|n| n.target.clone())
            .unwrap_or_default()
    }

    /// Find the first node with `name`
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(_, n)| n.name == name)
            .map(|(id, _)| *id)
    }

    /// Iterate nodes in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &SceneNode)> {
        self.nodes.iter()
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Node IDs of the hero scene's parts
#[derive(Debug, Clone)]
pub struct HeroNodes {
    /// Starfield
    pub stars: NodeId,
    /// Planet sphere
    pub planet: NodeId,
    /// Title label
    pub label: NodeId,
    /// Label glyphs, in reading order
    pub glyphs: Vec<NodeId>,
    /// Click-catcher sphere
    pub backdrop: NodeId,
}

/// Assemble the hero scene under the graph's root
pub fn compose(graph: &mut SceneGraph, config: &SceneConfig) -> HeroNodes {
    let root = graph.root();

    graph.add(
        "Ambient Light",
        Primitive::AmbientLight {
            intensity: config.ambient_intensity,
        },
        root,
        Transform::default(),
    );
    graph.add(
        "Point Light",
        Primitive::PointLight,
        root,
        Transform::from_position(config.point_light),
    );

    let stars = graph.add(
        "Stars",
        Primitive::Starfield(config.starfield.clone()),
        root,
        Transform::default(),
    );

    let planet_group = graph.add(
        "Planet Group",
        Primitive::Group,
        root,
        Transform::from_position(config.planet.position),
    );
    let planet = graph.add(
        "Planet",
        Primitive::Planet(config.planet.clone()),
        planet_group,
        Transform::default(),
    );

    let label_settings = &config.label;
    let label = graph.add(
        "Label",
        Primitive::Label {
            text: label_settings.text.clone(),
            font_size: label_settings.font_size,
            color: label_settings.color.clone(),
        },
        root,
        Transform::from_position(label_settings.position),
    );

    // centered single-line layout, whitespace advances but gets no node
    let advance = label_settings.font_size * label_settings.glyph_advance;
    let characters: Vec<char> = label_settings.text.chars().collect();
    let half_width = (characters.len().saturating_sub(1)) as f32 * advance * 0.5;
    let glyphs = characters
        .iter()
        .enumerate()
        .filter(|(_, c)| !c.is_whitespace())
        .map(|(column, &c)| {
            let x = column as f32 * advance - half_width;
            graph.add(
                &format!("Glyph {column}"),
                Primitive::Glyph(c),
                label,
                Transform::from_position([x, 0.0, 0.0]),
            )
        })
        .collect();

    let backdrop = graph.add(
        "Backdrop",
        Primitive::Backdrop {
            radius: config.backdrop_radius,
        },
        root,
        Transform::default().with_uniform_scale(config.backdrop_radius),
    );

    HeroNodes {
        stars,
        planet,
        label,
        glyphs,
        backdrop,
    }
}
