use std::process::Command;

#[test]
fn cli_compiles_without_warnings() {
    let status = Command::new(env!("CARGO"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args(["check", "--quiet", "--bin", "fish-survivor"])
        .status()
        .expect("failed to invoke cargo check for fish-survivor CLI binary");

    assert!(
        status.success(),
        "cargo check --bin fish-survivor should succeed"
    );
}
