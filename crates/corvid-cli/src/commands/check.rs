//! `corvid-mir check` - Validate bodies.
//!
//! Every file is checked even after a failure. Returns whether all of them
//! passed.

use crate::io::{self, Format};
use serde_json::json;
use std::path::PathBuf;

pub fn execute(files: &[PathBuf], format: Option<Format>, as_json: bool) -> anyhow::Result<bool> {
    let mut report = Vec::with_capacity(files.len());
    let mut all_ok = true;

    for file in files {
        let result = io::load(file, format).and_then(|body| {
            body.validate()?;
            Ok(body)
        });
        match result {
            Ok(body) => {
                if !as_json {
                    println!(
                        "ok: {} ({} blocks, {} statements)",
                        file.display(),
                        body.block_count(),
                        body.statement_count()
                    );
                }
                report.push(json!({
                    "file": file.display().to_string(),
                    "ok": true,
                    "blocks": body.block_count(),
                    "statements": body.statement_count(),
                }));
            }
            Err(e) => {
                all_ok = false;
                if !as_json {
                    eprintln!("error: {}: {:#}", file.display(), e);
                }
                report.push(json!({
                    "file": file.display().to_string(),
                    "ok": false,
                    "error": format!("{:#}", e),
                }));
            }
        }
    }

    if as_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(all_ok)
}
