use predicates::str::contains;
use std::fs;
use tempfile::tempdir;

#[test]
fn ask_requires_an_api_key() {
    let tmp = tempdir().expect("tempdir");

    assert_cmd::cargo::cargo_bin_cmd!("promptdock")
        .current_dir(tmp.path())
        .env("PROMPTDOCK_HOME", tmp.path())
        .env_remove("OPENAI_API_KEY")
        .args(["ask", "hello"])
        .assert()
        .failure()
        .stderr(contains("OPENAI_API_KEY"));
}

#[test]
fn ask_rejects_an_unknown_profile() {
    let tmp = tempdir().expect("tempdir");
    fs::write(
        tmp.path().join("profiles.json5"),
        r#"{ writing: { model: "gpt-4.1" } }"#,
    )
    .expect("write profiles");

    assert_cmd::cargo::cargo_bin_cmd!("promptdock")
        .current_dir(tmp.path())
        .env("PROMPTDOCK_HOME", tmp.path())
        .env("OPENAI_API_KEY", "test-key")
        .args(["ask", "--profile", "missing", "hello"])
        .assert()
        .failure()
        .stderr(contains("profile `missing`"));
}

#[test]
fn ask_fails_fast_on_a_missing_attachment() {
    let tmp = tempdir().expect("tempdir");

    assert_cmd::cargo::cargo_bin_cmd!("promptdock")
        .current_dir(tmp.path())
        .env("PROMPTDOCK_HOME", tmp.path())
        .env("OPENAI_API_KEY", "test-key")
        .args(["ask", "--no-summary-files", "absent.txt", "hello"])
        .assert()
        .failure()
        .stderr(contains("uploaded file missing"));
}
