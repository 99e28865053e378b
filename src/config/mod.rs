//! JSON configuration of the command-line tool.
//!
//! ```json
//! {
//!   "input": "chart.png",
//!   "text_regions": "chart.ocr.json",
//!   "params": { "shapes": { "min_area": 400.0 } },
//!   "output": {
//!     "graph_json": "out/chart.graph.json",
//!     "mermaid": "out/chart.mmd",
//!     "diagnostics_json": "out/chart.diagnostics.json",
//!     "ink_mask": "out/chart.mask.png"
//!   }
//! }
//! ```
//!
//! Relative paths are resolved against the directory holding the config file.

use crate::error::{ExtractError, Result};
use crate::pipeline::ExtractorParams;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Deserialize)]
pub struct RuntimeConfig {
    pub input: PathBuf,
    /// JSON array of recognized text regions for `input`.
    #[serde(default)]
    pub text_regions: Option<PathBuf>,
    #[serde(default)]
    pub params: ExtractorParams,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Where to write results. Missing entries are skipped.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub graph_json: Option<PathBuf>,
    pub mermaid: Option<PathBuf>,
    pub diagnostics_json: Option<PathBuf>,
    /// Binarized image, useful when tuning the threshold.
    pub ink_mask: Option<PathBuf>,
}

impl RuntimeConfig {
    fn resolve_paths(&mut self, base: &Path) {
        let join = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        join(&mut self.input);
        self.text_regions.iter_mut().for_each(join);
        for p in [
            &mut self.output.graph_json,
            &mut self.output.mermaid,
            &mut self.output.diagnostics_json,
            &mut self.output.ink_mask,
        ] {
            p.iter_mut().for_each(join);
        }
    }
}

pub fn load_config(path: &Path) -> Result<RuntimeConfig> {
    let data = fs::read_to_string(path).map_err(|e| ExtractError::io(path, e))?;
    let mut config = parse_config(&data)
        .map_err(|e| ExtractError::Config(format!("{}: {e}", path.display())))?;
    if let Some(base) = path.parent() {
        config.resolve_paths(base);
    }
    Ok(config)
}

/// Parse a config document without touching the filesystem.
pub fn parse_config(json: &str) -> Result<RuntimeConfig> {
    let config: RuntimeConfig = serde_json::from_str(json)?;
    if config.params.shapes.min_area < 0.0 {
        return Err(ExtractError::Config(format!(
            "shapes.min_area must be non-negative, got {}",
            config.params.shapes.min_area
        )));
    }
    if config.params.binarize.block_size % 2 == 0 {
        return Err(ExtractError::Config(format!(
            "binarize.block_size must be odd, got {}",
            config.params.binarize.block_size
        )));
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_uses_defaults() {
        let cfg = parse_config(r#"{"input": "a.png"}"#).expect("parse");
        assert_eq!(cfg.input, PathBuf::from("a.png"));
        assert!(cfg.text_regions.is_none());
        assert!(cfg.output.graph_json.is_none());
        assert_eq!(cfg.params.shapes.min_area, ExtractorParams::default().shapes.min_area);
    }

    #[test]
    fn relative_paths_follow_the_config_file() {
        let mut cfg = parse_config(
            r#"{"input": "a.png", "text_regions": "/abs/t.json", "output": {"mermaid": "out/a.mmd"}}"#,
        )
        .expect("parse");
        cfg.resolve_paths(Path::new("/data/run"));
        assert_eq!(cfg.input, PathBuf::from("/data/run/a.png"));
        assert_eq!(cfg.text_regions, Some(PathBuf::from("/abs/t.json")));
        assert_eq!(cfg.output.mermaid, Some(PathBuf::from("/data/run/out/a.mmd")));
    }

    #[test]
    fn invalid_values_are_config_errors() {
        let even = r#"{"input": "a.png", "params": {"binarize": {"block_size": 40}}}"#;
        assert!(matches!(parse_config(even), Err(ExtractError::Config(_))));
        assert!(matches!(parse_config("{}"), Err(ExtractError::Json(_))));
    }
}
