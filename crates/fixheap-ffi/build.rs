//! Writes `include/fixheap.h` for C callers.

use std::error::Error;
use std::fs;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn Error>> {
    println!("cargo:rerun-if-changed=src");
    println!("cargo:rerun-if-changed=cbindgen.toml");

    let crate_dir = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR")?);
    let include = crate_dir.join("include");
    fs::create_dir_all(&include)?;

    let config = cbindgen::Config::from_file(crate_dir.join("cbindgen.toml"))?;
    cbindgen::generate_with_config(&crate_dir, config)?.write_to_file(include.join("fixheap.h"));
    Ok(())
}
