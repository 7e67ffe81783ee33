use nalgebra::Point3;

use crate::geometry::{
    capsule::Capsule,
    extent::{merge_bounds, Extent},
    helix::HelixChain,
    sphere::Sphere,
    tube::Tube,
};

/// Nodes that may throw a shadow when the renderer has shadows enabled.
pub trait ShadowCaster {
    fn casts_shadow(&self) -> bool;
}

impl ShadowCaster for Tube {
    fn casts_shadow(&self) -> bool {
        true
    }
}

impl ShadowCaster for Sphere {
    fn casts_shadow(&self) -> bool {
        true
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Group {
    pub label: String,
    pub children: Vec<SceneNode>,
}

impl ShadowCaster for Group {
    // Groups have no surface of their own.
    fn casts_shadow(&self) -> bool {
        false
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SceneNode {
    Tube(Tube),
    Sphere(Sphere),
    Group(Group),
}

/// Typed traversal over a scene tree.
pub trait NodeVisitor {
    fn visit_tube(&mut self, _tube: &Tube) {}
    fn visit_sphere(&mut self, _sphere: &Sphere) {}
    fn enter_group(&mut self, _group: &Group) {}
    fn leave_group(&mut self, _group: &Group) {}
}

impl SceneNode {
    pub fn accept<V: NodeVisitor + ?Sized>(&self, visitor: &mut V) {
        match self {
            SceneNode::Tube(t) => visitor.visit_tube(t),
            SceneNode::Sphere(s) => visitor.visit_sphere(s),
            SceneNode::Group(g) => {
                visitor.enter_group(g);
                for child in &g.children {
                    child.accept(visitor);
                }
                visitor.leave_group(g);
            }
        }
    }

    pub fn as_shadow_caster(&self) -> &dyn ShadowCaster {
        match self {
            SceneNode::Tube(t) => t,
            SceneNode::Sphere(s) => s,
            SceneNode::Group(g) => g,
        }
    }

    pub fn bounds(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        match self {
            SceneNode::Tube(t) => Some(t.bounds()),
            SceneNode::Sphere(s) => Some(s.bounds()),
            SceneNode::Group(g) => merge_bounds(g.children.iter().filter_map(|c| c.bounds())),
        }
    }
}

impl From<Tube> for SceneNode {
    fn from(t: Tube) -> Self {
        SceneNode::Tube(t)
    }
}

impl Capsule {
    pub fn to_node(&self, label: impl Into<String>) -> SceneNode {
        let mut children = vec![SceneNode::Tube(self.tube)];
        children.extend(self.caps().map(|s| SceneNode::Sphere(*s)));
        SceneNode::Group(Group {
            label: label.into(),
            children,
        })
    }
}

impl HelixChain {
    pub fn to_node(&self, label: impl Into<String>) -> SceneNode {
        let label = label.into();
        let children = self
            .capsules
            .iter()
            .enumerate()
            .map(|(i, c)| c.to_node(format!("{label}/{i}")))
            .collect();
        SceneNode::Group(Group { label, children })
    }
}

/// The root of everything placed in the world.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    pub nodes: Vec<SceneNode>,
}

impl Scene {
    pub fn push(&mut self, node: SceneNode) {
        self.nodes.push(node);
    }

    pub fn accept<V: NodeVisitor + ?Sized>(&self, visitor: &mut V) {
        for node in &self.nodes {
            node.accept(visitor);
        }
    }

    pub fn bounds(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        merge_bounds(self.nodes.iter().filter_map(|n| n.bounds()))
    }
}

/// Decides shadow casting per primitive through the `ShadowCaster` capability.
pub struct ShadowVisitor {
    pub shadows_enabled: bool,
    pub casters: usize,
    pub non_casters: usize,
}

impl ShadowVisitor {
    pub fn new(shadows_enabled: bool) -> Self {
        ShadowVisitor {
            shadows_enabled,
            casters: 0,
            non_casters: 0,
        }
    }

    pub fn should_cast<S: ShadowCaster + ?Sized>(&self, node: &S) -> bool {
        self.shadows_enabled && node.casts_shadow()
    }

    fn count<S: ShadowCaster + ?Sized>(&mut self, node: &S) {
        if self.should_cast(node) {
            self.casters += 1;
        } else {
            self.non_casters += 1;
        }
    }
}

impl NodeVisitor for ShadowVisitor {
    fn visit_tube(&mut self, tube: &Tube) {
        self.count(tube);
    }

    fn visit_sphere(&mut self, sphere: &Sphere) {
        self.count(sphere);
    }
}
