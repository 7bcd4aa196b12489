use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use spp_core::errors::{ErrorInfo, SppError};
use spp_core::{Resonance, SingleResonanceXSec, XSecIntegrator};

use crate::catalog::ResonanceList;
use crate::codec::Format;
use crate::engine::{Binding, ReinSeghalSppXSec};
use crate::integrate::{MonteCarloIntegrator, MonteCarloParams, SimpsonIntegrator, SimpsonParams};
use crate::model::{BreitWignerParams, BreitWignerResonanceModel};
use crate::weights::{ChannelTables, WeightTableSpec};

fn default_resonances() -> Vec<Resonance> {
    Resonance::ALL.to_vec()
}

fn default_model() -> AlgorithmSpec {
    AlgorithmSpec::named("breit-wigner")
}

fn default_integrator() -> AlgorithmSpec {
    AlgorithmSpec::named("simpson")
}

/// Name of a registered algorithm and its free-form parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmSpec {
    /// Registry name.
    pub name: String,
    /// Parameters handed to the registered factory.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub params: Value,
}

impl AlgorithmSpec {
    /// Algorithm with default parameters.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Value::Null,
        }
    }

    /// Algorithm with explicit parameters.
    pub fn with_params(name: impl Into<String>, params: Value) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }
}

/// YAML/JSON configuration of a summation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Resonances to sum, by name; repeated names are dropped.
    #[serde(default = "default_resonances")]
    pub resonances: Vec<Resonance>,
    /// Single-resonance model.
    #[serde(default = "default_model")]
    pub model: AlgorithmSpec,
    /// Phase-space integrator.
    #[serde(default = "default_integrator")]
    pub integrator: AlgorithmSpec,
    /// Upper cut on the hadronic invariant mass (GeV).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wcut: Option<f64>,
    /// Weight table override; the standard tables apply when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<WeightTableSpec>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            resonances: default_resonances(),
            model: default_model(),
            integrator: default_integrator(),
            wcut: None,
            weights: None,
        }
    }
}

impl EngineConfig {
    /// Parses a YAML document.
    pub fn from_yaml_str(text: &str) -> Result<Self, SppError> {
        Format::Yaml.decode(text.as_bytes())
    }

    /// Parses a JSON document.
    pub fn from_json_str(text: &str) -> Result<Self, SppError> {
        Format::Json.decode(text.as_bytes())
    }

    /// Reads a configuration file; `.json` files are parsed as JSON and
    /// everything else as YAML.
    pub fn from_path(path: &Path) -> Result<Self, SppError> {
        let bytes = std::fs::read(path).map_err(|err| {
            SppError::Config(
                ErrorInfo::new("config-read", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        Format::from_path(path).decode(&bytes)
    }

    /// Serializes the configuration as YAML.
    pub fn to_yaml_string(&self) -> Result<String, SppError> {
        Format::Yaml.encode(self)
    }

    /// Catalog built from the configured resonance names.
    pub fn catalog(&self) -> ResonanceList {
        ResonanceList::from_resonances(self.resonances.iter().copied())
    }
}

type ModelFactory =
    Box<dyn Fn(&Value) -> Result<Arc<dyn SingleResonanceXSec>, SppError> + Send + Sync>;
type IntegratorFactory =
    Box<dyn Fn(&Value) -> Result<Arc<dyn XSecIntegrator>, SppError> + Send + Sync>;

/// Decodes factory parameters, treating `null` as "all defaults".
pub fn decode_params<T: DeserializeOwned + Default>(params: &Value) -> Result<T, SppError> {
    if params.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(params.clone()).map_err(|err| {
        SppError::Config(ErrorInfo::new("invalid-parameters", err.to_string()))
    })
}

/// Name-indexed factories for single-resonance models and integrators.
#[derive(Default)]
pub struct AlgorithmRegistry {
    models: BTreeMap<String, ModelFactory>,
    integrators: BTreeMap<String, IntegratorFactory>,
}

impl fmt::Debug for AlgorithmRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlgorithmRegistry")
            .field("models", &self.model_names())
            .field("integrators", &self.integrator_names())
            .finish()
    }
}

impl AlgorithmRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in model and integrators.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register_model("breit-wigner", |params| {
            let params: BreitWignerParams = decode_params(params)?;
            Ok(Arc::new(BreitWignerResonanceModel::new(params)?) as Arc<dyn SingleResonanceXSec>)
        });
        registry.register_integrator("simpson", |params| {
            let params: SimpsonParams = decode_params(params)?;
            Ok(Arc::new(SimpsonIntegrator::new(params)?) as Arc<dyn XSecIntegrator>)
        });
        registry.register_integrator("monte-carlo", |params| {
            let params: MonteCarloParams = decode_params(params)?;
            Ok(Arc::new(MonteCarloIntegrator::new(params)?) as Arc<dyn XSecIntegrator>)
        });
        registry
    }

    /// Registers (or replaces) a model factory.
    pub fn register_model<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(&Value) -> Result<Arc<dyn SingleResonanceXSec>, SppError> + Send + Sync + 'static,
    {
        self.models.insert(name.into(), Box::new(factory));
    }

    /// Registers (or replaces) an integrator factory.
    pub fn register_integrator<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(&Value) -> Result<Arc<dyn XSecIntegrator>, SppError> + Send + Sync + 'static,
    {
        self.integrators.insert(name.into(), Box::new(factory));
    }

    /// Registered model names.
    pub fn model_names(&self) -> Vec<&str> {
        self.models.keys().map(String::as_str).collect()
    }

    /// Registered integrator names.
    pub fn integrator_names(&self) -> Vec<&str> {
        self.integrators.keys().map(String::as_str).collect()
    }

    /// Instantiates a model by spec.
    pub fn model(&self, spec: &AlgorithmSpec) -> Result<Arc<dyn SingleResonanceXSec>, SppError> {
        let factory = self.models.get(&spec.name).ok_or_else(|| {
            SppError::Binding(
                ErrorInfo::new("unknown-model", format!("no model named '{}'", spec.name))
                    .with_hint(format!("registered: {}", self.model_names().join(", "))),
            )
        })?;
        factory(&spec.params).map_err(|err| rejected("model", &spec.name, err))
    }

    /// Instantiates an integrator by spec.
    pub fn integrator(&self, spec: &AlgorithmSpec) -> Result<Arc<dyn XSecIntegrator>, SppError> {
        let factory = self.integrators.get(&spec.name).ok_or_else(|| {
            SppError::Binding(
                ErrorInfo::new(
                    "unknown-integrator",
                    format!("no integrator named '{}'", spec.name),
                )
                .with_hint(format!(
                    "registered: {}",
                    self.integrator_names().join(", ")
                )),
            )
        })?;
        factory(&spec.params).map_err(|err| rejected("integrator", &spec.name, err))
    }

    /// Resolves every collaborator named by the configuration.
    pub fn resolve(&self, config: &EngineConfig) -> Result<Binding, SppError> {
        let model = self.model(&config.model)?;
        let integrator = self.integrator(&config.integrator)?;
        let tables = match &config.weights {
            Some(spec) => Arc::new(
                ChannelTables::from_spec(spec)
                    .map_err(|err| rejected("weights", "override", err))?,
            ),
            None => ChannelTables::shared_standard(),
        };
        Ok(Binding::new(config.catalog(), model, integrator)
            .with_tables(tables)
            .with_wcut(config.wcut))
    }
}

fn rejected(kind: &str, name: &str, err: SppError) -> SppError {
    let info = err.info();
    let mut wrapped = ErrorInfo::new("rejected-dependency", info.message.clone())
        .with_context("kind", kind)
        .with_context("name", name)
        .with_context("cause", info.code.clone());
    for (key, value) in &info.context {
        wrapped = wrapped.with_context(key.clone(), value.clone());
    }
    SppError::Binding(wrapped)
}

impl ReinSeghalSppXSec {
    /// Resolves the configuration against the registry and binds the result.
    pub fn configure(
        &self,
        config: &EngineConfig,
        registry: &AlgorithmRegistry,
    ) -> Result<(), SppError> {
        let binding = registry.resolve(config)?;
        self.bind(binding)
    }

    /// Creates an engine from a configuration in one step.
    pub fn from_config(
        config: &EngineConfig,
        registry: &AlgorithmRegistry,
    ) -> Result<Self, SppError> {
        let engine = Self::new();
        engine.configure(config, registry)?;
        Ok(engine)
    }
}
