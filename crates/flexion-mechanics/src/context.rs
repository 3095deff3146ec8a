//! Scene context: where components find their collaborators.
//!
//! A [`NodeContext`] is one node of the owning scene graph, reduced to
//! what the engine consumes: an optional motion state on the node itself
//! and an optional quadrature volume provider, which is searched for
//! upward through the parent chain.

use std::fmt;
use std::rc::Rc;

use flexion_math::DataTypes;
use flexion_types::{NodeId, Scalar};

use crate::state::StateHandle;

/// Supplies one quadrature weight per element.
pub trait VolumeProvider {
    /// Weight of every element, index-aligned with the motion state.
    fn volumes(&self) -> &[Scalar];

    /// Returns the provider's name.
    fn name(&self) -> &str;
}

/// Volume provider holding precomputed Gauss point weights.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussPointSampler {
    volumes: Vec<Scalar>,
}

impl GaussPointSampler {
    pub fn new(volumes: Vec<Scalar>) -> Self {
        Self { volumes }
    }

    /// `n` elements sharing the same weight.
    pub fn uniform(n: usize, volume: Scalar) -> Self {
        Self {
            volumes: vec![volume; n],
        }
    }
}

impl VolumeProvider for GaussPointSampler {
    fn volumes(&self) -> &[Scalar] {
        &self.volumes
    }

    fn name(&self) -> &str {
        "gauss_point_sampler"
    }
}

/// One node of the scene graph.
pub struct NodeContext<T: DataTypes> {
    id: NodeId,
    name: String,
    parent: Option<Rc<NodeContext<T>>>,
    state: Option<StateHandle<T>>,
    volume_provider: Option<Rc<dyn VolumeProvider>>,
}

impl<T: DataTypes> NodeContext<T> {
    /// Creates a root node with no collaborators.
    pub fn new(id: NodeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            parent: None,
            state: None,
            volume_provider: None,
        }
    }

    /// Creates a child of `parent`.
    pub fn child_of(parent: &Rc<Self>, id: NodeId, name: impl Into<String>) -> Self {
        Self {
            parent: Some(Rc::clone(parent)),
            ..Self::new(id, name)
        }
    }

    /// Attaches a motion state to this node.
    pub fn with_state(mut self, state: StateHandle<T>) -> Self {
        self.state = Some(state);
        self
    }

    /// Attaches a volume provider to this node.
    pub fn with_volume_provider(mut self, provider: Rc<dyn VolumeProvider>) -> Self {
        self.volume_provider = Some(provider);
        self
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<&Rc<NodeContext<T>>> {
        self.parent.as_ref()
    }

    /// Motion state attached to this node (not searched upward).
    pub fn mechanical_state(&self) -> Option<StateHandle<T>> {
        self.state.clone()
    }

    /// Nearest volume provider on this node or any ancestor.
    pub fn find_volume_provider(&self) -> Option<Rc<dyn VolumeProvider>> {
        let mut node = Some(self);
        while let Some(n) = node {
            if let Some(provider) = &n.volume_provider {
                return Some(Rc::clone(provider));
            }
            node = n.parent.as_deref();
        }
        None
    }

    /// Number of ancestors.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut node = self.parent.as_deref();
        while let Some(n) = node {
            depth += 1;
            node = n.parent.as_deref();
        }
        depth
    }
}

impl<T: DataTypes> fmt::Debug for NodeContext<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeContext")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("depth", &self.depth())
            .field("has_state", &self.state.is_some())
            .field("has_volume_provider", &self.volume_provider.is_some())
            .finish()
    }
}
