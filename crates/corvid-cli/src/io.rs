//! Reading and writing MIR files.

use anyhow::Context;
use clap::ValueEnum;
use corvid_mir::serial::{from_json, to_json};
use corvid_mir::{decode_body, encode_body, FunctionBody};
use std::path::Path;

/// On-disk encoding of a function body
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// `CMIR` tagged binary records
    Bin,
    /// serde JSON
    Json,
}

impl Format {
    /// `.json` files are JSON, everything else is binary
    pub fn from_path(path: &Path) -> Format {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Format::Json,
            _ => Format::Bin,
        }
    }

    fn resolve(explicit: Option<Format>, path: &Path) -> Format {
        explicit.unwrap_or_else(|| Format::from_path(path))
    }
}

pub fn load(path: &Path, format: Option<Format>) -> anyhow::Result<FunctionBody> {
    let format = Format::resolve(format, path);
    tracing::debug!(path = %path.display(), ?format, "loading body");

    let body = match format {
        Format::Bin => {
            let bytes =
                std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
            decode_body(&bytes)
        }
        Format::Json => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            from_json(&text)
        }
    };
    body.with_context(|| format!("Failed to load {}", path.display()))
}

pub fn save(path: &Path, body: &FunctionBody, format: Option<Format>) -> anyhow::Result<()> {
    let format = Format::resolve(format, path);
    tracing::debug!(path = %path.display(), ?format, "saving body");

    let bytes = match format {
        Format::Bin => encode_body(body),
        Format::Json => {
            let mut text = to_json(body)?;
            text.push('\n');
            text.into_bytes()
        }
    };
    std::fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))
}
