use std::fs;
use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

fn stdout_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn populate(data_dir: &Path, n: usize) {
    cargo_bin_cmd!("alkanes")
        .arg("--data-dir")
        .arg(data_dir)
        .arg(n.to_string())
        .assert()
        .success();
}

#[test]
fn count_prints_result_line() {
    let tmp = TempDir::new().expect("tempdir");
    let data = tmp.path().join("data");

    let output = cargo_bin_cmd!("alkanes")
        .arg("--data-dir")
        .arg(&data)
        .arg("7")
        .assert()
        .success()
        .get_output()
        .clone();
    let stdout = stdout_of(&output);

    assert!(stdout.contains("Generating size 7: 9 unique trees"), "{stdout}");
    assert!(stdout.contains("Structural isomers of C7H16: 9"), "{stdout}");
    for size in 1..=7 {
        assert!(data.join(format!("size_{size}.json")).is_file());
    }
}

#[test]
fn count_subcommand_resumes() {
    let tmp = TempDir::new().expect("tempdir");
    populate(tmp.path(), 5);

    let output = cargo_bin_cmd!("alkanes")
        .arg("--data-dir")
        .arg(tmp.path())
        .args(["count", "6"])
        .assert()
        .success()
        .get_output()
        .clone();
    let stdout = stdout_of(&output);

    assert!(stdout.contains("Resumed from size 5"), "{stdout}");
    assert!(stdout.contains("Structural isomers of C6H14: 5"), "{stdout}");
}

#[test]
fn count_rejects_non_positive_n() {
    let tmp = TempDir::new().expect("tempdir");
    for bad in ["0", "abc"] {
        cargo_bin_cmd!("alkanes")
            .arg("--data-dir")
            .arg(tmp.path())
            .arg(bad)
            .assert()
            .failure();
    }
    assert!(fs::read_dir(tmp.path()).expect("read dir").next().is_none());
}

#[test]
fn validate_with_data_dir_before_subcommand() {
    let tmp = TempDir::new().expect("tempdir");
    populate(tmp.path(), 5);

    let output = cargo_bin_cmd!("alkanes")
        .arg("--data-dir")
        .arg(tmp.path())
        .arg("validate")
        .assert()
        .success()
        .get_output()
        .clone();
    let stdout = stdout_of(&output);

    assert_eq!(stdout.lines().filter(|l| l.starts_with("OK: ")).count(), 5, "{stdout}");
}

#[test]
fn validate_with_data_dir_after_subcommand() {
    let tmp = TempDir::new().expect("tempdir");
    populate(tmp.path(), 3);

    cargo_bin_cmd!("alkanes")
        .arg("validate")
        .arg("--data-dir")
        .arg(tmp.path())
        .assert()
        .success();
}

#[test]
fn validate_flags_files_resume_would_refuse() {
    let tmp = TempDir::new().expect("tempdir");
    populate(tmp.path(), 4);
    let cases: [(&str, &[u8], &str); 4] = [
        ("size_3.json", b"[]", "no trees stored"),
        ("size_3.json", b"[[[1],[0,2],[1]],[[2],[2],[0,1]]]", "entry 1 is isomorphic to entry 0"),
        ("size_3.json", b"[[[1],[0]]]", "entry 0 has 2 nodes, expected 3"),
        ("size_2.json", b"[[[-1],[0]]]", "entry 0 is not a valid tree"),
    ];

    for (name, payload, reason) in cases {
        let path = tmp.path().join(name);
        let saved = fs::read(&path).expect("read checkpoint");
        fs::write(&path, payload).expect("write checkpoint");

        let output = cargo_bin_cmd!("alkanes")
            .arg("--data-dir")
            .arg(tmp.path())
            .arg("validate")
            .assert()
            .code(2)
            .get_output()
            .clone();
        let stderr = stderr_of(&output);
        assert!(stderr.contains(&format!("INVALID: {}", path.display())), "{stderr}");
        assert!(stderr.contains(reason), "{stderr}");
        assert_eq!(stdout_of(&output).lines().count(), 3);

        fs::write(&path, saved).expect("restore checkpoint");
    }
}

#[test]
fn validate_missing_file_and_missing_dir() {
    let tmp = TempDir::new().expect("tempdir");

    cargo_bin_cmd!("alkanes")
        .arg("validate")
        .arg(tmp.path().join("size_9.json"))
        .assert()
        .code(2);

    cargo_bin_cmd!("alkanes")
        .arg("--data-dir")
        .arg(tmp.path().join("absent"))
        .arg("validate")
        .assert()
        .code(1);
}

#[test]
fn show_pages_through_generation() {
    let tmp = TempDir::new().expect("tempdir");
    populate(tmp.path(), 7);

    let output = cargo_bin_cmd!("alkanes")
        .arg("--data-dir")
        .arg(tmp.path())
        .args(["show", "7", "--page", "2", "--page-size", "4"])
        .assert()
        .success()
        .get_output()
        .clone();
    let stdout = stdout_of(&output);

    assert!(stdout.starts_with("C7H16: 9 isomers, page 2/3"), "{stdout}");
    let shown: Vec<&str> = stdout.lines().filter(|l| l.starts_with('#')).collect();
    assert_eq!(shown.len(), 4, "{stdout}");
    assert!(shown[0].starts_with("#5 ("));
    assert!(shown[3].starts_with("#8 ("));

    cargo_bin_cmd!("alkanes")
        .arg("--data-dir")
        .arg(tmp.path())
        .args(["show", "7", "--page", "4", "--page-size", "4"])
        .assert()
        .code(1);
}

#[test]
fn show_missing_size() {
    let tmp = TempDir::new().expect("tempdir");
    populate(tmp.path(), 3);

    let output = cargo_bin_cmd!("alkanes")
        .arg("--data-dir")
        .arg(tmp.path())
        .args(["show", "4"])
        .assert()
        .code(1)
        .get_output()
        .clone();
    assert!(stderr_of(&output).contains("available: [1, 2, 3]"));
}
