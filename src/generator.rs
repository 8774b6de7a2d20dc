// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! End-to-end manifest generation for one request

use crate::assemble::{assemble, OutputMode};
use crate::config::Config;
use crate::error::Result;
use crate::render::render;
use crate::request::ManifestRequest;
use crate::template::Template;
use tracing::{info, instrument};

/// An ordered set of parsed templates plus the output shape
#[derive(Debug, Clone)]
pub struct Generator {
    templates: Vec<Template>,
    mode: OutputMode,
}

impl Generator {
    pub fn new(templates: Vec<Template>, mode: OutputMode) -> Self {
        Self { templates, mode }
    }

    /// Load and parse every configured template source
    pub fn from_config(config: &Config) -> Result<Self> {
        let templates = config.source.load()?;
        Ok(Self::new(templates, config.output))
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    /// Render every template in order and assemble the results.
    /// Any failure aborts the whole run; no partial document is returned.
    #[instrument(skip_all, fields(project = %request.project_name()))]
    pub fn generate(&self, request: &ManifestRequest) -> Result<String> {
        let fragments = self
            .templates
            .iter()
            .map(|template| render(template, request))
            .collect::<Result<Vec<_>>>()?;

        let entries: usize = fragments.iter().map(|f| f.entries().len()).sum();
        info!(
            "Rendered {} manifests from {} templates",
            entries,
            fragments.len()
        );

        assemble(fragments, self.mode)
    }

    /// Render against an empty request to expose template defaults
    pub fn show_defaults(&self) -> Result<String> {
        self.generate(&ManifestRequest::show_defaults())
    }
}
