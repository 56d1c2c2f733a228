//! Captures compiler identity at build time.
//!
//! The handshake platform string advertises the compiler that produced the
//! driver. Cargo does not expose the rustc version to the compiled crate, so
//! this script asks the compiler directly and forwards the answer (plus any
//! user-supplied `RUSTFLAGS`) through `rustc-env`.

use std::env;
use std::process::Command;

fn rustc_version() -> Option<String> {
    let rustc = env::var_os("RUSTC")?;
    let output = Command::new(rustc).arg("--version").output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?;
    Some(text.trim().to_string())
}

fn main() {
    println!("cargo:rerun-if-env-changed=RUSTC");
    println!("cargo:rerun-if-env-changed=RUSTFLAGS");

    let version = rustc_version().unwrap_or_default();
    println!("cargo:rustc-env=PLATFORM_RUSTC_VERSION={version}");

    let rustflags = env::var("RUSTFLAGS").unwrap_or_default();
    println!("cargo:rustc-env=PLATFORM_RUSTFLAGS={rustflags}");
}
