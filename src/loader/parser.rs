//! YAML parser for resource definitions
//!
//! Parses and validates resource YAML files.

use crate::error::{Error, Result, ResultExt};
use crate::http::ID_PLACEHOLDER;
use crate::loader::types::ResourceDefinition;
use std::fs;
use std::path::Path;
use tracing::debug;
use url::Url;

/// Load a resource definition from a file path
///
/// # Examples
///
/// ```ignore
/// let resource = load_resource("./users.yaml")?;
/// let client = resource.client()?;
/// ```
pub fn load_resource(path: impl AsRef<Path>) -> Result<ResourceDefinition> {
    let path = path.as_ref();
    let content = match fs::read_to_string(path) {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }
        read => read.with_context(|| format!("Failed to read resource file '{}'", path.display()))?,
    };
    debug!(path = %path.display(), "Loaded resource file");
    load_resource_from_str(&content)
}

/// Load a resource definition from a YAML string
pub fn load_resource_from_str(yaml: &str) -> Result<ResourceDefinition> {
    let def: ResourceDefinition =
        serde_yaml::from_str(yaml).context("Failed to parse resource YAML")?;

    validate_resource(&def)?;
    Ok(def)
}

/// Validate a resource definition
pub fn validate_resource(def: &ResourceDefinition) -> Result<()> {
    if def.name.trim().is_empty() {
        return Err(Error::config("Resource name cannot be empty"));
    }

    if def.base_url.is_empty() {
        return Err(Error::missing_field("base_url"));
    }
    Url::parse(&def.base_url)
        .map_err(|e| Error::invalid_value("base_url", format!("{e}")))?;

    if def.path.trim().is_empty() {
        return Err(Error::config(format!(
            "Resource '{}' path cannot be empty",
            def.name
        )));
    }

    if def.id_field.trim().is_empty() {
        return Err(Error::invalid_value("id_field", "cannot be empty"));
    }

    if def.per_page == 0 {
        return Err(Error::invalid_value("per_page", "must be greater than 0"));
    }

    if let Some(detail_path) = &def.detail_path {
        if !detail_path.contains(ID_PLACEHOLDER) {
            return Err(Error::invalid_value(
                "detail_path",
                format!("'{detail_path}' must contain {ID_PLACEHOLDER}"),
            ));
        }
    }

    if def.sort.iter().any(|s| s.trim_start_matches('-').is_empty()) {
        return Err(Error::invalid_value("sort", "empty sort field"));
    }

    Ok(())
}
