//! Integration tests for config discovery and source layering.

use polypage_config::ConfigDiscovery;
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use tempfile::TempDir;

fn test_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

// set_var/remove_var are unsafe in edition 2024; all env-touching tests
// serialize on `test_lock`.
fn set_env(key: &str, value: &str) {
    unsafe { std::env::set_var(key, value) }
}

fn clear_env(key: &str) {
    unsafe { std::env::remove_var(key) }
}

#[test]
fn load_parses_toml_config() {
    let _guard = test_lock().lock().expect("lock");
    clear_env("POLYPAGE_BUILD__PRODUCTION_GZIP");
    let dir = TempDir::new().expect("tempdir");
    fs::write(
        dir.path().join("polypage.toml"),
        r#"
[webpack.entry]
app = "src/main.ts"

[build]
production_gzip = true
production_gzip_extensions = ["js", "css", "html"]

[settings]
enable_eslint = false
"#,
    )
    .expect("write config");

    let config = ConfigDiscovery::new(dir.path()).load().expect("load");

    assert_eq!(config.webpack.entry.len(), 1);
    assert!(config.build.production_gzip);
    assert_eq!(
        config.build.production_gzip_extensions,
        vec!["js", "css", "html"]
    );
    assert!(!config.settings.enable_eslint);
}

#[test]
fn load_applies_defaults_for_missing_sections() {
    let _guard = test_lock().lock().expect("lock");
    clear_env("POLYPAGE_BUILD__ASSETS_ROOT");
    let dir = TempDir::new().expect("tempdir");
    fs::write(
        dir.path().join("polypage.toml"),
        r#"
[env_params]
API_HOST = "https://example.test"
"#,
    )
    .expect("write config");

    let config = ConfigDiscovery::new(dir.path()).load().expect("load");

    assert_eq!(config.build.assets_root, PathBuf::from("dist"));
    assert_eq!(config.build.assets_sub_directory, PathBuf::from("static"));
    assert_eq!(config.build.node_env, "production");
    assert!(config.settings.enable_eslint);
    assert_eq!(
        config.env_params.get("API_HOST").map(String::as_str),
        Some("https://example.test")
    );
}

#[test]
fn env_vars_override_file_values() {
    let _guard = test_lock().lock().expect("lock");
    let dir = TempDir::new().expect("tempdir");
    fs::write(
        dir.path().join("polypage.toml"),
        r#"
[build]
production_gzip = false
"#,
    )
    .expect("write config");

    set_env("POLYPAGE_BUILD__PRODUCTION_GZIP", "true");
    let config = ConfigDiscovery::new(dir.path()).load().expect("load");
    clear_env("POLYPAGE_BUILD__PRODUCTION_GZIP");

    assert!(config.build.production_gzip);
}

#[test]
fn load_from_package_json_section() {
    let _guard = test_lock().lock().expect("lock");
    clear_env("POLYPAGE_BUILD__PRODUCTION_GZIP");
    let dir = TempDir::new().expect("tempdir");
    fs::write(
        dir.path().join("package.json"),
        r#"{
            "name": "test",
            "polypage": {
                "webpack": {
                    "entry": {
                        "app": "src/main.ts",
                        "admin": ["polyfill.js", "src/admin.ts"]
                    }
                }
            }
        }"#,
    )
    .expect("write config");

    let config = ConfigDiscovery::new(dir.path()).load().expect("load");
    let names: Vec<_> = config.webpack.entry.names().cloned().collect();
    assert_eq!(names, vec!["app", "admin"]);
}

#[test]
fn toml_config_wins_over_package_json() {
    let _guard = test_lock().lock().expect("lock");
    let dir = TempDir::new().expect("tempdir");
    fs::write(
        dir.path().join("package.json"),
        r#"{ "polypage": { "build": { "NODE_ENV": "from-pkg" } } }"#,
    )
    .expect("write package.json");
    fs::write(
        dir.path().join("polypage.toml"),
        r#"
[build]
NODE_ENV = "from-toml"
"#,
    )
    .expect("write toml");

    let config = ConfigDiscovery::new(dir.path()).load().expect("load");
    assert_eq!(config.build.node_env, "from-toml");
}
