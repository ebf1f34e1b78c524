//! Build script for simpletools
//!
//! Handles:
//! - Linker search path for the embedded target (memory.x is generated by embassy-stm32)
//! - Cortex-M linker scripts for the demo binary

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Host builds (tests, sim) need no linker configuration
    if std::env::var_os("CARGO_FEATURE_EMBEDDED").is_none() {
        return;
    }

    println!("cargo:rerun-if-changed=memory.x");

    if let Ok(dir) = std::env::var("CARGO_MANIFEST_DIR") {
        println!("cargo:rustc-link-search={dir}");
    }

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
}
