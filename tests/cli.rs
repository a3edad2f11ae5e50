use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::{
    matchers::{header, method},
    Mock, MockServer, ResponseTemplate,
};

/// `limma` isolated from the user's config directory, `.env` and credentials
fn limma(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("limma").unwrap();
    cmd.current_dir(home.path())
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env_remove("LIMMA_API_KEY")
        .env_remove("GEMINI_API_KEY")
        .env_remove("LIMMA_MODEL")
        .env_remove("LIMMA_BASE_URL");
    cmd
}

#[test]
fn test_version() {
    let home = TempDir::new().unwrap();
    limma(&home)
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_speak_rejects_blank_text() {
    let home = TempDir::new().unwrap();
    limma(&home)
        .args(["speak", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("text cannot be empty"));
}

#[test]
fn test_speak_rejects_out_of_range_volume() {
    let home = TempDir::new().unwrap();
    limma(&home)
        .args(["speak", "hi", "--volume", "1.5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("volume out of range"));
}

#[test]
fn test_speak_rejects_negative_rate() {
    let home = TempDir::new().unwrap();
    limma(&home)
        .args(["speak", "hi", "--rate", "-5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("rate out of range"));
}

#[test]
fn test_generate_without_api_key() {
    let home = TempDir::new().unwrap();
    limma(&home)
        .args(["generate", "hello"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing API key"));
}

#[test]
fn test_config_set_then_get() {
    let home = TempDir::new().unwrap();
    limma(&home)
        .args(["config", "--set", "model", "--value", "gemini-1.5-pro"])
        .assert()
        .success();

    limma(&home)
        .args(["config", "--get", "model"])
        .assert()
        .success()
        .stdout(predicate::str::contains("model = gemini-1.5-pro"));
}

#[test]
fn test_config_without_action_fails() {
    let home = TempDir::new().unwrap();
    limma(&home)
        .arg("config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--get"))
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_speak_female_flags_conflict() {
    let home = TempDir::new().unwrap();
    limma(&home)
        .args(["speak", "hi", "--female", "--no-female"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_config_list_masks_api_key() {
    let home = TempDir::new().unwrap();
    limma(&home)
        .env("LIMMA_API_KEY", "AIzaSecret1234")
        .args(["config", "--list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("api_key = **********1234"))
        .stdout(predicate::str::contains("AIzaSecret").not());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_generate_prints_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("x-goog-api-key", "cli-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [{"text": "LED is on"}]}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let base_url = format!("{}/generate", server.uri());
    let output = tokio::task::spawn_blocking(move || {
        let home = TempDir::new().unwrap();
        limma(&home)
            .env("LIMMA_API_KEY", "cli-key")
            .env("LIMMA_BASE_URL", base_url)
            .args(["generate", "turn on the led"])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "LED is on");
}
