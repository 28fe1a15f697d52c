use assert_cmd::Command;
use predicates::str::contains;
use std::error::Error;
use tempfile::tempdir;

// Helper function to get the path to the compiled binary
fn vidpress_cmd() -> Command {
    let mut cmd = Command::cargo_bin("vidpress").expect("Failed to find vidpress binary");
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_flags() {
    vidpress_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("--source"))
        .stdout(contains("--destination"))
        .stdout(contains("--process-dir"))
        .stdout(contains("--delete-original"))
        .stdout(contains("--crf"))
        .stdout(contains("--preset"))
        .stdout(contains("--scale"));
}

#[test]
fn test_empty_source_succeeds() -> Result<(), Box<dyn Error>> {
    let source = tempdir()?;
    std::fs::write(source.path().join("notes.txt"), "not a video")?;

    vidpress_cmd()
        .arg("--source")
        .arg(source.path())
        .assert()
        .success()
        .stdout(contains("will compress 0 videos"));

    // Nothing was created
    assert_eq!(std::fs::read_dir(source.path())?.count(), 1);
    Ok(())
}

#[test]
fn test_crf_out_of_range_fails() -> Result<(), Box<dyn Error>> {
    let source = tempdir()?;
    std::fs::write(source.path().join("clip.mp4"), "dummy content")?;

    vidpress_cmd()
        .arg("-f")
        .arg(source.path())
        .args(["--crf", "40"])
        .assert()
        .code(1)
        .stderr(contains("Invalid parameter"));

    // Validation happens before any file is touched
    assert_eq!(std::fs::read_dir(source.path())?.count(), 1);
    Ok(())
}

#[test]
fn test_crf_outside_u8_range_fails() -> Result<(), Box<dyn Error>> {
    let source = tempdir()?;

    for crf in ["300", "-1"] {
        vidpress_cmd()
            .arg("-f")
            .arg(source.path())
            .args(["--crf", crf])
            .assert()
            .code(1)
            .stderr(contains("Invalid parameter"));
    }
    Ok(())
}

#[test]
fn test_scale_out_of_range_fails() -> Result<(), Box<dyn Error>> {
    let source = tempdir()?;

    vidpress_cmd()
        .arg("-f")
        .arg(source.path())
        .args(["--scale", "3"])
        .assert()
        .code(1)
        .stderr(contains("scale"));
    Ok(())
}

#[test]
fn test_unknown_preset_fails() -> Result<(), Box<dyn Error>> {
    let source = tempdir()?;

    vidpress_cmd()
        .arg("-f")
        .arg(source.path())
        .args(["--preset", "placebo"])
        .assert()
        .code(1)
        .stderr(contains("placebo"));
    Ok(())
}

#[test]
fn test_missing_source_fails() {
    vidpress_cmd()
        .args(["--source", "/surely/this/does/not/exist/42"])
        .assert()
        .code(1)
        .stderr(contains("Invalid source directory"));
}

#[test]
fn test_missing_destination_fails() -> Result<(), Box<dyn Error>> {
    let source = tempdir()?;

    vidpress_cmd()
        .arg("-f")
        .arg(source.path())
        .args(["-t", "/surely/this/does/not/exist/42"])
        .assert()
        .code(1)
        .stderr(contains("Invalid destination directory"));
    Ok(())
}
