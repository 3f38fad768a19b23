//! Version command

use crate::error::Result;

/// Print version information
pub fn run() -> Result<()> {
    println!("claudekit {}", env!("CARGO_PKG_VERSION"));
    Ok(())
}
