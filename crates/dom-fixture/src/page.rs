use std::collections::BTreeMap;
use std::path::Path;

use hintkit_core_types::Viewport;
use serde::{Deserialize, Serialize};

use crate::errors::FixtureError;

/// Serializable description of a page and its frames.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PageFixture {
    pub url: Option<String>,
    pub viewport: Viewport,
    pub html: String,
    pub frames: BTreeMap<String, PageFixture>,
}

impl PageFixture {
    pub fn new(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            ..Self::default()
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_viewport(mut self, width: f64, height: f64) -> Self {
        self.viewport.width = width;
        self.viewport.height = height;
        self
    }

    pub fn with_scroll(mut self, x: f64, y: f64) -> Self {
        self.viewport.scroll_x = x;
        self.viewport.scroll_y = y;
        self
    }

    pub fn with_frame(mut self, name: impl Into<String>, frame: PageFixture) -> Self {
        self.frames.insert(name.into(), frame);
        self
    }

    pub fn from_yaml(raw: &str) -> Result<Self, FixtureError> {
        Ok(serde_yaml::from_str(raw)?)
    }

    pub fn from_json(raw: &str) -> Result<Self, FixtureError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Load a `.json` file as JSON and anything else as YAML.
    pub fn from_path(path: &Path) -> Result<Self, FixtureError> {
        let raw = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json(&raw),
            _ => Self::from_yaml(&raw),
        }
    }
}
