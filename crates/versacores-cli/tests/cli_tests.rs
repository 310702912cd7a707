//! Integration tests for the `versacores` binary.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

// ── helpers ───────────────────────────────────────────────────────────────────

/// A scratch tree of core directories plus an isolated config home.
struct Cores {
    temp: TempDir,
}

impl Cores {
    fn new() -> Self {
        Self {
            temp: TempDir::new().unwrap(),
        }
    }

    fn path(&self, rel: &str) -> PathBuf {
        self.temp.path().join(rel)
    }

    fn file(&self, rel: &str, content: &str) -> &Self {
        let path = self.path(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
        self
    }

    fn core(&self, dir: &str, name: &str, hooks: &str) -> &Self {
        self.file(
            &format!("{dir}/{name}.versacore"),
            &format!(
                "NAME = \"{name}\"\nVERSION = \"0.1.0\"\nAPI_VERSION = \"0.1\"\nDESCRIPTION = \"test core\"\n{hooks}\n"
            ),
        )
    }

    /// `versacores` running in `dir` with no ambient configuration.
    fn cmd(&self, dir: &str) -> Command {
        let mut cmd = Command::cargo_bin("versacores").unwrap();
        cmd.current_dir(self.path(dir))
            .env_remove("VERSACORES_PATH")
            .env_remove("RUST_LOG")
            .env("XDG_CONFIG_HOME", self.path("xdg"))
            .env("HOME", self.temp.path())
            .env("NO_COLOR", "1");
        cmd
    }
}

fn leaf_hooks(file: &str) -> String {
    format!("CREATE = []\nGENERATE = [ {{ add_files = {{ globs = [\"{file}\"] }} }}, {{ set_top = \"{file}\" }} ]")
}

fn exists(path: &Path) -> bool {
    path.exists()
}

// ── basics ────────────────────────────────────────────────────────────────────

#[test]
fn help_lists_commands() {
    let cores = Cores::new();
    cores.file("x/.keep", "");
    cores
        .cmd("x")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("build"))
        .stdout(predicate::str::contains("graph"))
        .stdout(predicate::str::contains("--dir"));
}

#[test]
fn version_flag() {
    let cores = Cores::new();
    cores.file("x/.keep", "");
    cores
        .cmd("x")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn bad_arguments_exit_2() {
    let cores = Cores::new();
    cores.file("x/.keep", "");
    cores
        .cmd("x")
        .args(["build", "--no-such-flag"])
        .assert()
        .code(2);
}

#[test]
fn shell_completions() {
    let cores = Cores::new();
    cores.file("x/.keep", "");
    cores
        .cmd("x")
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("versacores"));
}

// ── build ─────────────────────────────────────────────────────────────────────

#[test]
fn build_is_the_default_command() {
    let cores = Cores::new();
    cores.core("soc", "soc", &leaf_hooks("soc.sv")).file("soc/soc.sv", "");

    cores
        .cmd("soc")
        .assert()
        .success()
        .stdout(predicate::str::contains("soc 0.1.0"))
        .stdout(predicate::str::contains("hdl 1"))
        .stdout(predicate::str::contains("1 cores generated, 1 files registered"));
}

#[test]
fn dependencies_resolve_through_versacores_path() {
    let cores = Cores::new();
    cores
        .core(
            "soc",
            "soc",
            "CREATE = [ { depend_on = { name = \"uart\" } } ]\nGENERATE = []",
        )
        .core("lib/uart", "uart", &leaf_hooks("uart.sv"))
        .file("lib/uart/uart.sv", "");

    cores
        .cmd("soc")
        .env("VERSACORES_PATH", cores.path("lib/uart"))
        .arg("build")
        .assert()
        .success()
        .stdout(predicate::str::contains("  uart 0.1.0"))
        .stdout(predicate::str::contains("2 cores generated, 1 files registered"));
}

#[test]
fn dependencies_resolve_through_config_file() {
    let cores = Cores::new();
    cores
        .core(
            "soc",
            "soc",
            "CREATE = [ { depend_on = { name = \"uart\" } } ]\nGENERATE = []",
        )
        .core("lib/uart", "uart", &leaf_hooks("uart.sv"))
        .file("lib/uart/uart.sv", "")
        .file(
            "versacores.toml",
            &format!(
                "[cores]\nsearch_paths = [{:?}]\n",
                cores.path("lib/uart").display().to_string()
            ),
        );

    cores
        .cmd("soc")
        .arg("--config")
        .arg(cores.path("versacores.toml"))
        .assert()
        .success();
}

#[test]
fn dir_flag_selects_the_top_directory() {
    let cores = Cores::new();
    cores.core("soc", "soc", &leaf_hooks("soc.sv")).file("soc/soc.sv", "");
    cores.file("elsewhere/.keep", "");

    cores
        .cmd("elsewhere")
        .args(["-C", "../soc", "build"])
        .assert()
        .success();
}

#[test]
fn json_output_is_parseable() {
    let cores = Cores::new();
    cores.core("soc", "soc", &leaf_hooks("soc.sv")).file("soc/soc.sv", "");

    let out = cores
        .cmd("soc")
        .args(["--output-format", "json", "build"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let summaries: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(summaries[0]["name"], "soc");
    assert_eq!(summaries[0]["files"][0]["category"], "hdl");
    assert_eq!(summaries[0]["files"][0]["usage"], "all");
}

#[test]
fn quiet_build_prints_nothing() {
    let cores = Cores::new();
    cores.core("soc", "soc", &leaf_hooks("soc.sv")).file("soc/soc.sv", "");

    cores
        .cmd("soc")
        .arg("-q")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

// ── graph & clean ─────────────────────────────────────────────────────────────

#[test]
fn graph_does_not_generate() {
    let cores = Cores::new();
    cores.core(
        "soc",
        "soc",
        "CREATE = []\nGENERATE = [ { run = \"touch generated.sv\" } ]",
    );

    cores
        .cmd("soc")
        .arg("graph")
        .assert()
        .success()
        .stdout(predicate::str::contains("soc 0.1.0"));
    assert!(!exists(&cores.path("soc/generated.sv")));
}

#[test]
fn clean_runs_clean_hooks() {
    let cores = Cores::new();
    cores.core(
        "soc",
        "soc",
        "CREATE = []\nGENERATE = []\nCLEAN = [ { run = \"touch cleaned\" } ]",
    );

    cores
        .cmd("soc")
        .arg("clean")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleaned 1 cores"));
    assert!(exists(&cores.path("soc/cleaned")));
}

// ── failures and exit codes ───────────────────────────────────────────────────

#[test]
fn missing_dependency_exits_3() {
    let cores = Cores::new();
    cores.core(
        "soc",
        "soc",
        "CREATE = [ { depend_on = { name = \"ghost\" } } ]\nGENERATE = []",
    );

    cores
        .cmd("soc")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Core 'ghost' not found"))
        .stderr(predicate::str::contains("VERSACORES_PATH"));
}

#[test]
fn directory_without_descriptor_exits_3() {
    let cores = Cores::new();
    cores.file("empty/README.md", "");
    cores
        .cmd("empty")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("No top level core"));
}

#[test]
fn invalid_dir_flag_exits_3() {
    let cores = Cores::new();
    cores.file("x/.keep", "");
    cores.cmd("x").args(["-C", "nowhere"]).assert().code(3);
}

#[test]
fn missing_default_target_exits_4() {
    let cores = Cores::new();
    cores.core(
        "soc",
        "soc",
        "TOP = [ { define_target = { name = \"sim\" } } ]\nCREATE = []\nGENERATE = []",
    );

    cores.cmd("soc").assert().code(4);
}

#[test]
fn unknown_config_key_exits_4() {
    let cores = Cores::new();
    cores.file("x/.keep", "");
    cores
        .cmd("x")
        .args(["config", "get", "nope"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn malformed_descriptor_exits_5() {
    let cores = Cores::new();
    cores.file("soc/soc.versacore", "NAME = \"soc\"\nCREATE = []\nGENERATE = []\n");

    cores
        .cmd("soc")
        .assert()
        .code(5)
        .stderr(predicate::str::contains("missing required attribute 'VERSION'"));
}

#[test]
fn failing_command_exits_6() {
    let cores = Cores::new();
    cores.core("soc", "soc", "CREATE = []\nGENERATE = [ { run = \"false\" } ]");

    cores
        .cmd("soc")
        .assert()
        .code(6)
        .stderr(predicate::str::contains("Command 'false' failed"));
}

#[test]
fn dependency_cycle_exits_3() {
    let cores = Cores::new();
    cores
        .core(
            "a",
            "a",
            "CREATE = [ { depend_on = { name = \"b\" } } ]\nGENERATE = []",
        )
        .core(
            "b",
            "b",
            "CREATE = [ { depend_on = { name = \"a\" } } ]\nGENERATE = []",
        );

    let path = std::env::join_paths([cores.path("a"), cores.path("b")]).unwrap();
    cores
        .cmd("a")
        .env("VERSACORES_PATH", path)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Dependency cycle: a -> b -> a"));
}
