// ─────────────────────────────────────────────────────────────────────
// Universal Projection Field — Domain Adapter Interface
// ─────────────────────────────────────────────────────────────────────
//! Domain adapter trait and the reference fusion/quantum adapters.
//!
//! An adapter maps raw domain measurements into the two normalized drive
//! inputs and a degradation scalar, and maps the resulting field state
//! back into named domain quantities. Adapters are stateless.

use upf_types::{clamp_bounded, clamp_unit, Actions, FieldState, RawInputs, UpfError, UpfResult};

/// Trait for domain adapters.
pub trait DomainAdapter: Send + Sync {
    fn name(&self) -> &str;

    /// Returns `(u_pos_input, u_neg_input)`, both in [0, 1].
    fn normalize_inputs(&self, raw: &RawInputs) -> UpfResult<(f64, f64)>;

    /// Degradation in [0, 1].
    fn doc_from_raw(&self, raw: &RawInputs) -> UpfResult<f64>;

    /// Map post-step field state and layer outputs to domain quantities.
    fn interpret(&self, state: &FieldState, s_layers: &[f64]) -> UpfResult<Actions>;
}

fn field_or(raw: &RawInputs, key: &str, default: f64) -> f64 {
    raw.get(key).copied().unwrap_or(default)
}

fn layer(values: &[f64], ell: usize) -> UpfResult<f64> {
    values.get(ell).copied().ok_or(UpfError::Shape {
        expected: ell + 1,
        got: values.len(),
    })
}

/// Magnetic-confinement fusion plasma.
pub struct FusionAdapter;

impl DomainAdapter for FusionAdapter {
    fn name(&self) -> &str {
        "fusion"
    }

    fn normalize_inputs(&self, raw: &RawInputs) -> UpfResult<(f64, f64)> {
        Ok((
            clamp_unit(field_or(raw, "confinement", 0.6)),
            clamp_unit(field_or(raw, "instability", 0.4)),
        ))
    }

    fn doc_from_raw(&self, raw: &RawInputs) -> UpfResult<f64> {
        Ok(clamp_unit(field_or(raw, "impurities", 0.35)))
    }

    fn interpret(&self, state: &FieldState, s_layers: &[f64]) -> UpfResult<Actions> {
        let e1 = layer(&state.e, 1)?;
        let c1 = layer(&state.c, 1)?;
        let s_sum: f64 = s_layers.iter().sum();

        let mut actions = Actions::new();
        actions.insert(
            "pellet_injection_rate".into(),
            clamp_bounded(100.0 * (e1 - 0.30), 0.0, 100.0),
        );
        actions.insert(
            "rf_power_boost".into(),
            clamp_bounded(100.0 * (0.55 - c1), 0.0, 100.0),
        );
        actions.insert(
            "efficiency_score".into(),
            clamp_bounded(100.0 * (s_sum / 2.6), 0.0, 100.0),
        );
        Ok(actions)
    }
}

/// Driven quantum-coherent system.
pub struct QuantumAdapter;

impl DomainAdapter for QuantumAdapter {
    fn name(&self) -> &str {
        "quantum"
    }

    fn normalize_inputs(&self, raw: &RawInputs) -> UpfResult<(f64, f64)> {
        Ok((
            clamp_unit(field_or(raw, "pump_rate", 0.7)),
            clamp_unit(field_or(raw, "decoherence", 0.3)),
        ))
    }

    fn doc_from_raw(&self, raw: &RawInputs) -> UpfResult<f64> {
        Ok(clamp_unit(field_or(raw, "temperature_noise", 0.25)))
    }

    fn interpret(&self, state: &FieldState, _s_layers: &[f64]) -> UpfResult<Actions> {
        let c0 = layer(&state.c, 0)?;
        let c1 = layer(&state.c, 1)?;
        let e1 = layer(&state.e, 1)?;

        let mut actions = Actions::new();
        actions.insert(
            "coherence_time_ms".into(),
            clamp_bounded(500.0 * c1, 10.0, 2000.0),
        );
        actions.insert(
            "stability_index".into(),
            clamp_bounded(100.0 * (1.0 - e1 / 2.0), 0.0, 100.0),
        );
        actions.insert("orch_or_score".into(), clamp_bounded(100.0 * c0, 0.0, 100.0));
        Ok(actions)
    }
}

type NormalizeFn = Box<dyn Fn(&RawInputs) -> UpfResult<(f64, f64)> + Send + Sync>;
type DocFn = Box<dyn Fn(&RawInputs) -> UpfResult<f64> + Send + Sync>;
type InterpretFn = Box<dyn Fn(&FieldState, &[f64]) -> UpfResult<Actions> + Send + Sync>;

/// Adapter assembled from caller-supplied functions.
///
/// Normalized inputs and degradation are clamped to [0, 1] on the way
/// out; interpretation is passed through untouched.
pub struct ExternalAdapter {
    name: String,
    normalize_fn: NormalizeFn,
    doc_fn: DocFn,
    interpret_fn: InterpretFn,
}

impl ExternalAdapter {
    pub fn new(
        name: impl Into<String>,
        normalize_fn: impl Fn(&RawInputs) -> UpfResult<(f64, f64)> + Send + Sync + 'static,
        doc_fn: impl Fn(&RawInputs) -> UpfResult<f64> + Send + Sync + 'static,
        interpret_fn: impl Fn(&FieldState, &[f64]) -> UpfResult<Actions> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            normalize_fn: Box::new(normalize_fn),
            doc_fn: Box::new(doc_fn),
            interpret_fn: Box::new(interpret_fn),
        }
    }
}

impl DomainAdapter for ExternalAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn normalize_inputs(&self, raw: &RawInputs) -> UpfResult<(f64, f64)> {
        let (pos, neg) = (self.normalize_fn)(raw)?;
        Ok((clamp_unit(pos), clamp_unit(neg)))
    }

    fn doc_from_raw(&self, raw: &RawInputs) -> UpfResult<f64> {
        Ok(clamp_unit((self.doc_fn)(raw)?))
    }

    fn interpret(&self, state: &FieldState, s_layers: &[f64]) -> UpfResult<Actions> {
        (self.interpret_fn)(state, s_layers)
    }
}
