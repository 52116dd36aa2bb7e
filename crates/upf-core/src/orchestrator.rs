// ─────────────────────────────────────────────────────────────────────
// Universal Projection Field — Homeostasis Orchestrator
// ─────────────────────────────────────────────────────────────────────
//! One orchestrator step:
//!   1. Adapter: raw → (u_pos_in, u_neg_in), DOC
//!   2. Blend policy with fresh inputs
//!   3. drive = tanh(2(u_pos_used − α·u_neg_used))
//!   4. Field core step → S_layers, S_sum
//!   5. Homeostatic policy update from S_target − S_sum
//!   6. Adapter: state + S_layers → actions
//!   7. Assemble the step record

use std::sync::Arc;

use upf_physics::ProjectionFieldCore;
use upf_types::{HomeostasisConfig, RawInputs, StepRecord, UpfResult};

use crate::adapter::DomainAdapter;
use crate::homeostasis::{drive_from, PolicyState};

/// Drives a projection field core toward a target aggregate output.
pub struct HomeostasisOrchestrator {
    core: ProjectionFieldCore,
    adapter: Arc<dyn DomainAdapter>,
    config: HomeostasisConfig,
    policy: PolicyState,
}

impl HomeostasisOrchestrator {
    pub fn new(
        core: ProjectionFieldCore,
        adapter: Arc<dyn DomainAdapter>,
        config: HomeostasisConfig,
    ) -> UpfResult<Self> {
        config.validate()?;
        log::info!(
            "orchestrator[{}]: S_target={:.3} band={:.3}",
            adapter.name(),
            config.s_target,
            config.s_band
        );
        Ok(Self {
            core,
            adapter,
            config,
            policy: PolicyState::default(),
        })
    }

    /// Advance one step from raw domain measurements.
    ///
    /// Adapter errors are returned unchanged. On an adapter error before
    /// the core step, neither the core nor the policy is touched.
    pub fn step(&mut self, raw: &RawInputs) -> UpfResult<StepRecord> {
        let (u_pos_in, u_neg_in) = self.adapter.normalize_inputs(raw)?;
        let doc = self.adapter.doc_from_raw(raw)?;

        let (u_pos_used, u_neg_used) = self.policy.blend(u_pos_in, u_neg_in);
        let drive = drive_from(u_pos_used, u_neg_used, self.core.config().alpha);

        let s_layers = self.core.step(drive, doc);
        let s_sum: f64 = s_layers.iter().sum();

        let delta = self.policy.update(&self.config, s_sum);
        log::debug!(
            "orchestrator[{}] step {}: S_sum={s_sum:.4} err={:.4} band={} u_pos={:.4} u_neg={:.4}",
            self.adapter.name(),
            self.core.step_count(),
            delta.err,
            delta.in_band,
            self.policy.u_pos,
            self.policy.u_neg
        );

        let state = self.core.snapshot();
        let actions = self.adapter.interpret(&state, &s_layers)?;

        Ok(StepRecord {
            domain: self.adapter.name().to_string(),
            doc,
            s_layers,
            s_sum,
            u_pos_used,
            u_neg_used,
            u_pos_policy: self.policy.u_pos,
            u_neg_policy: self.policy.u_neg,
            drive,
            actions,
            state,
        })
    }

    /// Run a sequence of raw inputs, stopping at the first adapter error.
    pub fn run(&mut self, inputs: &[RawInputs]) -> UpfResult<Vec<StepRecord>> {
        inputs.iter().map(|raw| self.step(raw)).collect()
    }

    pub fn policy(&self) -> PolicyState {
        self.policy
    }

    /// Return the policy to neutral. The core is not touched.
    pub fn reset_policy(&mut self) {
        self.policy = PolicyState::default();
    }

    pub fn core(&self) -> &ProjectionFieldCore {
        &self.core
    }

    pub fn into_core(self) -> ProjectionFieldCore {
        self.core
    }

    pub fn config(&self) -> &HomeostasisConfig {
        &self.config
    }

    pub fn adapter(&self) -> &dyn DomainAdapter {
        self.adapter.as_ref()
    }
}
