// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::assemble::OutputMode;
use crate::constants::{env as vars, INLINE_TEMPLATE_NAME};
use crate::error::{ProvisionError, Result};
use crate::template::Template;
use std::env;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

/// Where template text comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// A single template given as text
    Inline(String),
    /// Ordered file names resolved against a base directory
    Files { dir: PathBuf, names: Vec<String> },
}

impl TemplateSource {
    /// Pick a source from the raw settings. Empty values count as unset.
    pub fn resolve(
        dir: Option<String>,
        file_list: Option<String>,
        inline: Option<String>,
    ) -> Result<Self> {
        let non_empty = |v: Option<String>| v.filter(|s| !s.is_empty());

        match (non_empty(dir), non_empty(file_list), non_empty(inline)) {
            (Some(_), None, _) => Err(ProvisionError::Config(format!(
                "{} is set but {} is not",
                vars::TEMPLATE_DIR,
                vars::TEMPLATE_FILE_LIST
            ))),
            (dir, Some(list), _) => {
                let names: Vec<String> = list
                    .split(',')
                    .map(str::trim)
                    .filter(|n| !n.is_empty())
                    .map(String::from)
                    .collect();
                if names.is_empty() {
                    return Err(ProvisionError::Config(format!(
                        "{} does not name any templates",
                        vars::TEMPLATE_FILE_LIST
                    )));
                }
                Ok(TemplateSource::Files {
                    dir: dir.map(PathBuf::from).unwrap_or_default(),
                    names,
                })
            }
            (None, None, Some(content)) => Ok(TemplateSource::Inline(content)),
            (None, None, None) => Err(ProvisionError::Config(
                "template environment variables undefined".to_string(),
            )),
        }
    }

    /// Read and parse every template, in configured order
    pub fn load(&self) -> Result<Vec<Template>> {
        match self {
            TemplateSource::Inline(content) => {
                Ok(vec![Template::parse(INLINE_TEMPLATE_NAME, content)?])
            }
            TemplateSource::Files { dir, names } => names
                .iter()
                .map(|name| {
                    let path = dir.join(name);
                    debug!("Loading template {}", path.display());
                    let content = fs::read_to_string(&path)
                        .map_err(|source| ProvisionError::Io { path, source })?;
                    Template::parse(name.as_str(), &content)
                })
                .collect(),
        }
    }
}

/// Generator configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub source: TemplateSource,
    pub output: OutputMode,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let source = TemplateSource::resolve(
            lookup(vars::TEMPLATE_DIR),
            lookup(vars::TEMPLATE_FILE_LIST),
            lookup(vars::TEMPLATE_CONTENT),
        )?;

        let output = match lookup(vars::FLAT_OUTPUT).as_deref().map(str::trim) {
            None | Some("") => OutputMode::default(),
            Some(value) => match value.parse::<bool>() {
                Ok(true) => OutputMode::Flat,
                Ok(false) => OutputMode::Nested,
                Err(_) => {
                    return Err(ProvisionError::Config(format!(
                        "{} must be true or false, got '{}'",
                        vars::FLAT_OUTPUT,
                        value
                    )))
                }
            },
        };

        info!(
            "Configuration loaded: source={}, output={:?}",
            source_kind(&source),
            output
        );
        Ok(Config { source, output })
    }
}

fn source_kind(source: &TemplateSource) -> String {
    match source {
        TemplateSource::Inline(_) => "inline".to_string(),
        TemplateSource::Files { dir, names } => {
            format!("{} template(s) in '{}'", names.len(), dir.display())
        }
    }
}
