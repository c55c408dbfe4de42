fn main() {
    // SITEGENIE_VERSION from the environment wins over the package version
    let version = std::env::var("SITEGENIE_VERSION")
        .unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_string());

    println!("cargo:rustc-env=SITEGENIE_VERSION={}", version);
    println!("cargo:rerun-if-env-changed=SITEGENIE_VERSION");
    println!("cargo:rerun-if-changed=Cargo.toml");
}
