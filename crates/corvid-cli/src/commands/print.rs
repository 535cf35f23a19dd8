//! `corvid-mir print` - Show a body as a readable listing.

use crate::io::{self, Format};
use corvid_mir::PrettyPrint;
use std::path::Path;

pub fn execute(file: &Path, format: Option<Format>) -> anyhow::Result<()> {
    let body = io::load(file, format)?;
    print!("{}", body.pretty_print());
    Ok(())
}
