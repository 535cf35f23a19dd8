//! `corvid-mir convert` - Re-encode a body in another format.

use crate::io::{self, Format};
use std::path::Path;

pub fn execute(
    input: &Path,
    output: &Path,
    from: Option<Format>,
    to: Option<Format>,
) -> anyhow::Result<()> {
    let body = io::load(input, from)?;
    io::save(output, &body, to)?;
    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        blocks = body.block_count(),
        "converted body"
    );
    Ok(())
}
