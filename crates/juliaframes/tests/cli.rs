use std::process::Command;

use tempfile::TempDir;

fn juliaframes() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_juliaframes"));
    command.env("RUST_LOG", "error");
    command
}

#[test]
fn zero_frames_is_rejected_before_rendering() {
    let output_root = TempDir::new().unwrap();
    let output_dir = output_root.path().join("renders");

    let output = juliaframes()
        .args(["--frames", "0", "--output"])
        .arg(&output_dir)
        .output()
        .expect("failed to run juliaframes");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("frame count"), "stderr: {stderr}");
    assert!(!output_dir.exists());
}

#[test]
fn missing_shader_names_the_path() {
    let root = TempDir::new().unwrap();
    let missing = root.path().join("absent.vert.glsl");

    let output = juliaframes()
        .arg("--vertex")
        .arg(&missing)
        .arg("--output")
        .arg(root.path().join("renders"))
        .output()
        .expect("failed to run juliaframes");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("absent.vert.glsl"), "stderr: {stderr}");
    assert!(!root.path().join("renders").exists());
}

#[test]
fn help_lists_the_render_flags() {
    let output = juliaframes()
        .arg("--help")
        .output()
        .expect("failed to run juliaframes");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for flag in ["--frames", "--seed", "--cam-pos", "--variant", "--gpu-power"] {
        assert!(stdout.contains(flag), "missing {flag} in help");
    }
}
