// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Deployment manifest templates.
//!
//! Templates are plain YAML with `{{.Field}}` actions for the five
//! [`ManifestValues`] fields. Go-style trim markers (`{{- .Name -}}`) strip the
//! whitespace next to the action. Anything else inside `{{ }}` is rejected
//! when the template is parsed.

use crate::constants::manifest::FILE_SUFFIX;
use crate::error::{DeployError, Result};
use regex::Regex;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, info, instrument};

static ACTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{(-\s)?\s*([^{}]*?)\s*(\s-)?\}\}").expect("action pattern is valid")
});

/// Values substituted into a deployment template
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestValues {
    pub subscription_id: String,
    pub resource_group: String,
    pub client_id: String,
    pub name: String,
    pub identity_binding: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    SubscriptionId,
    ResourceGroup,
    ClientId,
    Name,
    IdentityBinding,
}

impl Field {
    fn from_key(key: &str) -> Option<Self> {
        match key {
            "SubscriptionID" => Some(Field::SubscriptionId),
            "ResourceGroup" => Some(Field::ResourceGroup),
            "ClientID" => Some(Field::ClientId),
            "Name" => Some(Field::Name),
            "IdentityBinding" => Some(Field::IdentityBinding),
            _ => None,
        }
    }
}

impl ManifestValues {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::SubscriptionId => &self.subscription_id,
            Field::ResourceGroup => &self.resource_group,
            Field::ClientId => &self.client_id,
            Field::Name => &self.name,
            Field::IdentityBinding => &self.identity_binding,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Field(Field),
}

#[derive(Debug, Clone)]
pub struct ManifestTemplate {
    name: String,
    segments: Vec<Segment>,
}

impl ManifestTemplate {
    /// Read and parse a template file
    pub async fn from_file(path: &Path) -> Result<Self> {
        let source = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| DeployError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        Self::parse(&path.display().to_string(), &source)
    }

    pub fn parse(name: &str, source: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut cursor = 0;
        let mut trim_next = false;

        for caps in ACTION.captures_iter(source) {
            let whole = caps.get(0).expect("capture 0 is the whole match");
            let mut text = &source[cursor..whole.start()];
            check_no_open_action(name, source, cursor, text)?;

            if trim_next {
                text = text.trim_start();
            }
            if caps.get(1).is_some() {
                text = text.trim_end();
            }
            if !text.is_empty() {
                segments.push(Segment::Text(text.to_string()));
            }

            let action = caps.get(2).map_or("", |m| m.as_str());
            let field = action
                .strip_prefix('.')
                .and_then(Field::from_key)
                .ok_or_else(|| {
                    DeployError::Template(format!(
                        "{}:{}: unsupported action {{{{{}}}}}",
                        name,
                        line_of(source, whole.start()),
                        action
                    ))
                })?;
            segments.push(Segment::Field(field));

            trim_next = caps.get(3).is_some();
            cursor = whole.end();
        }

        let mut tail = &source[cursor..];
        check_no_open_action(name, source, cursor, tail)?;
        if trim_next {
            tail = tail.trim_start();
        }
        if !tail.is_empty() {
            segments.push(Segment::Text(tail.to_string()));
        }

        Ok(Self {
            name: name.to_string(),
            segments,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Substitute every action and check that the result is valid YAML
    pub fn render(&self, values: &ManifestValues) -> Result<String> {
        let rendered: String = self
            .segments
            .iter()
            .map(|segment| match segment {
                Segment::Text(text) => text.as_str(),
                Segment::Field(field) => values.get(*field),
            })
            .collect();

        for document in serde_yaml::Deserializer::from_str(&rendered) {
            serde_yaml::Value::deserialize(document).map_err(|e| {
                DeployError::Template(format!(
                    "{} did not render to valid YAML: {}",
                    self.name, e
                ))
            })?;
        }

        Ok(rendered)
    }

    /// Render into `<output_dir>/<name>-deployment.yaml` and return that path
    #[instrument(skip(self, values, output_dir), fields(template = %self.name, name = %values.name))]
    pub async fn render_to_dir(&self, values: &ManifestValues, output_dir: &Path) -> Result<PathBuf> {
        let rendered = self.render(values)?;
        let path = manifest_path(output_dir, &values.name);

        tokio::fs::create_dir_all(output_dir)
            .await
            .map_err(|source| DeployError::Io {
                path: output_dir.to_path_buf(),
                source,
            })?;
        tokio::fs::write(&path, rendered)
            .await
            .map_err(|source| DeployError::Io {
                path: path.clone(),
                source,
            })?;

        info!("Wrote manifest {}", path.display());
        Ok(path)
    }
}

/// Where the manifest for deployment `name` is written
pub fn manifest_path(output_dir: &Path, name: &str) -> PathBuf {
    output_dir.join(format!("{}{}", name, FILE_SUFFIX))
}

/// Reject names that are blank or would place the manifest outside its directory
pub fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() || name.contains(['/', '\\', '\0']) || name.contains("..") {
        return Err(DeployError::InvalidName(name.to_string()));
    }
    Ok(())
}

fn check_no_open_action(name: &str, source: &str, offset: usize, text: &str) -> Result<()> {
    match text.find("{{") {
        Some(pos) => {
            debug!("Unterminated action in {}", name);
            Err(DeployError::Template(format!(
                "{}:{}: unterminated or malformed action",
                name,
                line_of(source, offset + pos)
            )))
        }
        None => Ok(()),
    }
}

fn line_of(source: &str, offset: usize) -> usize {
    source[..offset].matches('\n').count() + 1
}
