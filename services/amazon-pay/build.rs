fn main() {
    // Reported as the runtime version in the `user-agent` header.
    let version = rustc_version::version().expect("rustc version must be detectable");
    println!("cargo:rustc-env=PAYSIGN_RUSTC_VERSION={version}");
    println!("cargo:rerun-if-changed=build.rs");
}
