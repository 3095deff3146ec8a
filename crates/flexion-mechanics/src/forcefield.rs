//! Material force field: per-element forces and their linear operators.
//!
//! [`MaterialForceField`] owns one material block per element of its motion
//! state and turns them into forces (`add_force`), linearized forces
//! (`add_dforce`), and block-diagonal operators K, B, C.
//!
//! ## Operator policy
//!
//! - An operator flagged in [`ForceFieldConfig`] is rebuilt by `reinit`, and
//!   again after every `add_force` when the material's stiffness depends on
//!   state, so assembled operators track the last force evaluation.
//! - An operator not flagged is rebuilt on demand by its accessor, on every
//!   call.
//! - Under `is_compliance` the field applies no force at all; the compliance
//!   operator is expected to be consumed as a constraint elsewhere.

use flexion_material::MaterialBlock;
use flexion_material::traits::{CoordOf, DerivOf};
use flexion_math::{BlockSparseMatrix, DataTypes};
use flexion_types::Scalar;
use tracing::{debug, error, warn};

use crate::assembly::{OperatorKind, rebuild_operator};
use crate::config::{ForceFieldConfig, LinearizationFactors};
use crate::context::NodeContext;
use crate::state::StateHandle;
use crate::traits::ForceField;

/// Force field evaluating a material block per element.
#[derive(Debug)]
pub struct MaterialForceField<M: MaterialBlock> {
    name: String,
    config: ForceFieldConfig,
    /// Block cloned into every new element slot.
    prototype: M,
    /// One block per element, index-aligned with the state.
    material: Vec<M>,
    state: Option<StateHandle<M::Types>>,
    /// C, K, B in [`OperatorKind::slot`] order.
    operators: [BlockSparseMatrix; 3],
    rebuilds: [u64; 3],
}

impl<M: MaterialBlock> MaterialForceField<M> {
    /// Creates an unbound field. `prototype` parameterizes every element.
    pub fn new(name: impl Into<String>, prototype: M, config: ForceFieldConfig) -> Self {
        Self {
            name: name.into(),
            config,
            prototype,
            material: Vec::new(),
            state: None,
            operators: std::array::from_fn(|_| BlockSparseMatrix::for_types::<M::Types>()),
            rebuilds: [0; 3],
        }
    }

    /// Binds a state up front; `init` then skips the context lookup.
    pub fn with_state(mut self, state: StateHandle<M::Types>) -> Self {
        self.state = Some(state);
        self
    }

    /// True once a motion state is bound.
    pub fn is_bound(&self) -> bool {
        self.state.is_some()
    }

    pub fn config(&self) -> ForceFieldConfig {
        self.config
    }

    /// Replaces the flags and rebuilds whatever they enable.
    pub fn set_config(&mut self, config: ForceFieldConfig) {
        self.config = config;
        self.reinit();
    }

    /// Per-element material blocks.
    pub fn material(&self) -> &[M] {
        &self.material
    }

    /// Mutable blocks, for per-element parameter edits. Call `reinit` afterwards.
    pub fn material_mut(&mut self) -> &mut [M] {
        &mut self.material
    }

    /// Last built operator of `kind`, without triggering a rebuild.
    pub fn cached_operator(&self, kind: OperatorKind) -> &BlockSparseMatrix {
        &self.operators[kind.slot()]
    }

    /// Number of times the operator of `kind` has been rebuilt.
    pub fn rebuild_count(&self, kind: OperatorKind) -> u64 {
        self.rebuilds[kind.slot()]
    }

    /// Sum of the elastic energies of every element at coordinates `x`.
    pub fn potential_energy(&self, x: &[CoordOf<M>]) -> Scalar {
        self.material
            .iter()
            .zip(x)
            .map(|(block, x)| block.potential_energy(x))
            .sum()
    }

    /// `f += force(x, v)` with `x` and `v` read from the bound state.
    ///
    /// Does nothing on an unbound field.
    pub fn add_state_force(&mut self, f: &mut [DerivOf<M>]) {
        let Some(state) = self.state.clone() else {
            return;
        };
        let state = state.borrow();
        self.add_force(f, state.positions(), state.velocities());
    }

    fn is_assembled(&self, kind: OperatorKind) -> bool {
        match kind {
            OperatorKind::Compliance => self.config.assemble_compliance,
            OperatorKind::Stiffness => self.config.assemble_stiffness,
            OperatorKind::Damping => self.config.assemble_damping,
        }
    }

    fn update_assembled_operators(&mut self) {
        for kind in OperatorKind::ALL {
            if self.is_assembled(kind) {
                self.update_operator(kind);
            }
        }
    }

    /// Grows or truncates the material to the state size. Blocks added
    /// here are unweighted until the next `init`.
    fn sync_material_size(&mut self) {
        let Some(state) = &self.state else {
            return;
        };
        let n = state.borrow().size();
        if n != self.material.len() {
            debug!(field = %self.name, from = self.material.len(), to = n, "material resized to state");
            self.material.resize(n, self.prototype.clone());
        }
    }

    fn update_operator(&mut self, kind: OperatorKind) {
        self.sync_material_size();
        let slot = kind.slot();
        match rebuild_operator(&mut self.operators[slot], kind, &self.material) {
            Ok(()) => {
                self.rebuilds[slot] += 1;
                debug!(
                    field = %self.name,
                    operator = kind.label(),
                    blocks = self.operators[slot].nnz_blocks(),
                    "operator rebuilt"
                );
            }
            Err(e) => {
                warn!(field = %self.name, operator = kind.label(), error = %e, "operator rebuild failed");
            }
        }
    }

    fn apply_operator(&self, kind: OperatorKind, df: &mut [DerivOf<M>], dx: &[DerivOf<M>], factor: Scalar) {
        if let Err(e) = self.operators[kind.slot()].add_mult::<M::Types>(df, dx, factor) {
            warn!(field = %self.name, operator = kind.label(), error = %e, "operator product skipped");
        }
    }
}

impl<M: MaterialBlock> ForceField<M::Types> for MaterialForceField<M> {
    fn init(&mut self, ctx: &NodeContext<M::Types>) {
        if self.state.is_none() {
            self.state = ctx.mechanical_state();
        }
        let Some(state) = self.state.clone() else {
            error!(field = %self.name, node = ctx.name(), "motion state not found");
            return;
        };

        let n = state.borrow().size();
        self.material.resize(n, self.prototype.clone());

        match ctx.find_volume_provider() {
            Some(provider) => {
                let volumes = provider.volumes();
                if volumes.len() < n {
                    warn!(
                        field = %self.name,
                        provider = provider.name(),
                        volumes = volumes.len(),
                        elements = n,
                        "fewer volumes than elements, missing ones are unweighted"
                    );
                }
                for (i, block) in self.material.iter_mut().enumerate() {
                    block.set_volume(volumes.get(i).copied());
                }
            }
            None => {
                warn!(field = %self.name, "quadrature volume provider not found, using unit volumes");
                for block in &mut self.material {
                    block.set_volume(None);
                }
            }
        }

        debug!(
            field = %self.name,
            material = self.prototype.name(),
            types = <M::Types as DataTypes>::name(),
            elements = n,
            "force field initialized"
        );
        self.reinit();
    }

    fn reinit(&mut self) {
        self.update_assembled_operators();
    }

    fn add_force(&mut self, f: &mut [DerivOf<M>], x: &[CoordOf<M>], v: &[DerivOf<M>]) {
        if self.config.is_compliance {
            return;
        }

        let n = self.material.len();
        if f.len() < n || x.len() < n || v.len() < n {
            warn!(
                field = %self.name,
                elements = n,
                f = f.len(),
                x = x.len(),
                v = v.len(),
                "buffers shorter than material, trailing elements skipped"
            );
        }
        for (((block, f), x), v) in self.material.iter_mut().zip(f.iter_mut()).zip(x).zip(v) {
            block.add_force(f, x, v);
        }

        if !M::CONSTANT_STIFFNESS {
            self.update_assembled_operators();
        }
    }

    fn add_dforce(&self, df: &mut [DerivOf<M>], dx: &[DerivOf<M>], factors: LinearizationFactors) {
        if self.config.is_compliance {
            return;
        }

        if self.config.assemble_stiffness {
            self.apply_operator(OperatorKind::Stiffness, df, dx, factors.k_factor);
            if self.config.assemble_damping {
                self.apply_operator(OperatorKind::Damping, df, dx, factors.b_factor);
            }
        } else {
            for ((block, df), dx) in self.material.iter().zip(df.iter_mut()).zip(dx) {
                block.add_dforce(df, dx, factors.k_factor, factors.b_factor);
            }
        }
    }

    fn stiffness_matrix(&mut self) -> Option<&BlockSparseMatrix> {
        if self.config.is_compliance {
            return None;
        }
        if !self.config.assemble_stiffness {
            self.update_operator(OperatorKind::Stiffness);
        }
        Some(&self.operators[OperatorKind::Stiffness.slot()])
    }

    fn damping_matrix(&mut self) -> Option<&BlockSparseMatrix> {
        if !self.config.assemble_damping {
            self.update_operator(OperatorKind::Damping);
        }
        Some(&self.operators[OperatorKind::Damping.slot()])
    }

    fn compliance_matrix(&mut self) -> Option<&BlockSparseMatrix> {
        if !self.config.is_compliance {
            return None;
        }
        if !self.config.assemble_compliance {
            self.update_operator(OperatorKind::Compliance);
        }
        Some(&self.operators[OperatorKind::Compliance.slot()])
    }

    fn name(&self) -> &str {
        &self.name
    }
}
