//! CLI subprocess integration tests.
//!
//! These tests invoke the `hashsum` binary as a subprocess and verify exit
//! codes, stdout content, and the manifests left on disk.

use std::path::Path;
use std::process::Command;

const SHA1_ABC: &str = "a9993e364706816aba3e25717850c26c9cd0d89d";

fn hashsum_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_hashsum"));
    cmd.env_remove("HASHSUM_LOG");
    cmd
}

fn write_tree(dir: &Path) {
    std::fs::create_dir_all(dir.join("b")).unwrap();
    std::fs::write(dir.join("a.txt"), "abc").unwrap();
    std::fs::write(dir.join("b/b.txt"), "xyz").unwrap();
}

#[test]
fn cli_version_exits_zero() {
    let output = hashsum_bin().arg("--version").output().unwrap();
    assert!(output.status.success(), "hashsum --version must exit 0");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("hashsum"), "version output: {stdout}");
}

#[test]
fn cli_help_lists_commands() {
    let output = hashsum_bin().arg("--help").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("generate"));
    assert!(stdout.contains("completions"));
}

#[test]
fn cli_generate_writes_sha1sums() {
    let dir = tempfile::tempdir().unwrap();
    write_tree(dir.path());

    let output = hashsum_bin()
        .arg("generate")
        .arg(dir.path())
        .arg("--dest")
        .arg(dir.path())
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("wrote "), "stdout: {stdout}");

    let text = std::fs::read_to_string(dir.path().join("SHA1SUMS")).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], format!("{SHA1_ABC}  a.txt"));
    assert!(lines[1].ends_with("  b/b.txt"));
}

#[test]
fn cli_second_run_reports_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    write_tree(dir.path());

    let run = || {
        hashsum_bin()
            .arg("generate")
            .arg(dir.path())
            .arg("--dest")
            .arg(dir.path())
            .output()
            .unwrap()
    };

    assert!(run().status.success());
    let second = run();
    assert!(second.status.success());
    let stdout = String::from_utf8_lossy(&second.stdout);
    assert!(stdout.starts_with("unchanged "), "stdout: {stdout}");
}

#[test]
fn cli_force_rewrites() {
    let dir = tempfile::tempdir().unwrap();
    write_tree(dir.path());

    for _ in 0..2 {
        let output = hashsum_bin()
            .arg("generate")
            .arg(dir.path())
            .arg("--dest")
            .arg(dir.path())
            .arg("--force")
            .output()
            .unwrap();
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.starts_with("wrote "), "stdout: {stdout}");
    }
}

#[test]
fn cli_stream_prints_json_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    write_tree(dir.path());

    let output = hashsum_bin()
        .arg("generate")
        .arg(dir.path())
        .arg("--dest")
        .arg(dir.path())
        .arg("--json")
        .arg("--stream")
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(!dir.path().join("SHA1SUMS").exists());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["a.txt"], SHA1_ABC);
    assert!(value["b/b.txt"].is_string());
}

#[test]
fn cli_config_file_selects_algorithm() {
    let dir = tempfile::tempdir().unwrap();
    write_tree(dir.path());
    let config = dir.path().join("hashsum.toml");
    std::fs::write(&config, "hash = \"md5\"\nfilename = \"checksums.md5\"\n").unwrap();

    let output = hashsum_bin()
        .arg("generate")
        .arg(dir.path().join("a.txt"))
        .arg("--dest")
        .arg(dir.path())
        .arg("--config")
        .arg(&config)
        .output()
        .unwrap();

    assert!(output.status.success());
    let text = std::fs::read_to_string(dir.path().join("checksums.md5")).unwrap();
    assert_eq!(text, "900150983cd24fb0d6963f7d28e17f72  a.txt\n");
}

#[test]
fn cli_unknown_algorithm_exits_with_config_error() {
    let dir = tempfile::tempdir().unwrap();
    write_tree(dir.path());

    let output = hashsum_bin()
        .arg("generate")
        .arg(dir.path())
        .arg("--dest")
        .arg(dir.path())
        .arg("--hash")
        .arg("whirlpool")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unsupported hash algorithm"), "stderr: {stderr}");
    assert!(!dir.path().join("WHIRLPOOLSUMS").exists());
}

#[test]
fn cli_unwritable_destination_exits_with_write_error() {
    let dir = tempfile::tempdir().unwrap();
    write_tree(dir.path());
    std::fs::write(dir.path().join("blocker"), "x").unwrap();

    let output = hashsum_bin()
        .arg("generate")
        .arg(dir.path().join("a.txt"))
        .arg("--dest")
        .arg(dir.path())
        .arg("--filename")
        .arg("blocker/SHA1SUMS")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(3));
}

#[cfg(target_os = "linux")]
#[test]
fn cli_non_utf8_file_name_is_reported_and_exits_one() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = tempfile::tempdir().unwrap();
    write_tree(dir.path());
    std::fs::write(dir.path().join(OsStr::from_bytes(b"bad\xff")), "1").unwrap();
    std::fs::write(dir.path().join(OsStr::from_bytes(b"bad\xfe")), "2").unwrap();

    let output = hashsum_bin()
        .arg("generate")
        .arg(dir.path())
        .arg("--dest")
        .arg(dir.path())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("not valid UTF-8").count(), 2, "stderr: {stderr}");

    let text = std::fs::read_to_string(dir.path().join("SHA1SUMS")).unwrap();
    assert_eq!(text.lines().count(), 2);
    assert!(text.starts_with(&format!("{SHA1_ABC}  a.txt\n")));
}

#[cfg(unix)]
#[test]
fn cli_absolute_paths_work_from_deleted_working_directory() {
    let src = tempfile::tempdir().unwrap();
    write_tree(src.path());
    let gone = tempfile::tempdir().unwrap();
    let gone_path = gone.path().to_path_buf();

    let output = Command::new("sh")
        .arg("-c")
        .arg(r#"cd "$1" && rmdir "$1" && exec "$2" generate "$3" --dest "$3""#)
        .arg("sh")
        .arg(&gone_path)
        .arg(env!("CARGO_BIN_EXE_hashsum"))
        .arg(src.path())
        .env_remove("HASHSUM_LOG")
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let text = std::fs::read_to_string(src.path().join("SHA1SUMS")).unwrap();
    assert!(text.starts_with(&format!("{SHA1_ABC}  a.txt\n")));
}

#[test]
fn cli_completions_bash() {
    let output = hashsum_bin().args(["completions", "bash"]).output().unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("hashsum"));
}

#[test]
fn cli_man_pages_written() {
    let dir = tempfile::tempdir().unwrap();
    let output = hashsum_bin()
        .arg("man-pages")
        .arg(dir.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(dir.path().join("hashsum.1").exists());
    assert!(dir.path().join("hashsum-generate.1").exists());
}
