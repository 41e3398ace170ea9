//! # CLI Configuration
//!
//! The optional `--config` YAML file:
//!
//! ```yaml
//! validation:
//!   max_nesting_depth: 8
//! custom_types:
//!   - type: x-acme-sensor
//!     class: observable
//!     properties:
//!       - name: serial
//!         kind: string
//!         required: true
//!     id_contributing: [serial]
//! ```
//!
//! Custom types are registered on top of the built-ins and the resulting
//! registry is installed as the process-wide registry before any record is
//! parsed.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use stix_model::{install_global, CustomType, TypeRegistry, ValidationConfig};

/// Contents of the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// Validation engine settings.
    pub validation: ValidationConfig,
    /// Additional object types.
    pub custom_types: Vec<CustomType>,
}

impl CliConfig {
    /// Read and parse a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&text)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        tracing::debug!(
            path = %path.display(),
            custom_types = config.custom_types.len(),
            max_nesting_depth = config.validation.max_nesting_depth,
            "loaded configuration"
        );
        Ok(config)
    }

    /// Built-in types plus every configured custom type.
    pub fn build_registry(&self) -> Result<TypeRegistry> {
        let mut registry = TypeRegistry::with_builtins();
        for decl in &self.custom_types {
            registry
                .register_custom(decl.clone())
                .with_context(|| format!("failed to register custom type \"{}\"", decl.type_name))?;
        }
        Ok(registry)
    }

    /// Install the configured registry as the process-wide registry.
    ///
    /// Without custom types the built-in registry is left to initialize on
    /// first use.
    pub fn install(&self) -> Result<()> {
        if self.custom_types.is_empty() {
            return Ok(());
        }
        let registry = self.build_registry()?;
        install_global(registry).context("failed to install type registry")?;
        tracing::info!(custom_types = self.custom_types.len(), "installed custom types");
        Ok(())
    }
}
