//! Exposes the compiler version to the crate as `VERGEN_RUSTC_SEMVER`.

fn main() {
    use vergen::{vergen, Config};

    let mut config = Config::default();

    let rustc = config.rustc_mut();
    *rustc.enabled_mut() = true;
    *rustc.channel_mut() = false;
    *rustc.commit_date_mut() = false;
    *rustc.host_triple_mut() = false;
    *rustc.llvm_version_mut() = false;
    *rustc.semver_mut() = true;
    *rustc.sha_mut() = true; // required for semver to be available
    *rustc.skip_if_error_mut() = true;

    // The crate falls back to its declared rust-version without it.
    if let Err(err) = vergen(config) {
        println!("cargo:warning=could not read the rustc version: {err}");
    }
}
