//! End-to-end builds over real descriptor trees on disk.

#![cfg(unix)]

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;
use versacores_adapters::local_orchestrator;
use versacores_core::prelude::*;

// ============================================================================
// Fixture
// ============================================================================

/// A scratch directory of cores, one subdirectory per core.
struct Workspace {
    temp: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            temp: TempDir::new().unwrap(),
        }
    }

    fn dir(&self, core_dir: &str) -> PathBuf {
        self.temp.path().join(core_dir).canonicalize().unwrap()
    }

    /// Write `<core_dir>/<file_name>` with standard metadata and `hooks`.
    fn descriptor(&self, core_dir: &str, file_name: &str, name: &str, hooks: &str) -> &Self {
        let content = format!(
            "NAME = \"{name}\"\nVERSION = \"1.0.0\"\nAPI_VERSION = \"0.1\"\nDESCRIPTION = \"{name} core\"\n{hooks}\n"
        );
        self.file(core_dir, file_name, &content)
    }

    fn file(&self, core_dir: &str, rel: &str, content: &str) -> &Self {
        let path = self.temp.path().join(core_dir).join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
        self
    }

    fn locations(&self, core_dirs: &[&str]) -> Vec<PathBuf> {
        core_dirs.iter().map(|d| self.dir(d)).collect()
    }
}

fn app_err<T: std::fmt::Debug>(result: VersaResult<T>) -> ApplicationError {
    match result {
        Err(VersaError::Application(e)) => e,
        other => panic!("expected an application error, got {other:?}"),
    }
}

fn file_names(summary: &CoreSummary) -> Vec<String> {
    summary
        .files
        .iter()
        .map(|f| f.path.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

fn soc_workspace() -> Workspace {
    let ws = Workspace::new();
    ws.descriptor(
        "soc",
        "soc.versacore",
        "soc",
        r#"
TOP = [ { define_target = { name = "arty", params = { board = "arty" } } }, { set_default_target = "arty" } ]
CREATE = [ { depend_on = { name = "uart", params = { board = "{{board}}" } } } ]
GENERATE = [ { add_files = { globs = ["soc.sv", "soc.xdc"] } }, { set_top = "soc.sv" } ]
"#,
    )
    .file("soc", "soc.sv", "")
    .file("soc", "soc.xdc", "");

    ws.descriptor(
        "uart",
        "uart.versacore",
        "uart",
        r#"
CREATE = [ { depend_on = { name = "fifo", params = { depth = 16 } } } ]
GENERATE = [ { add_files = { globs = ["rtl/*.sv"] } }, { set_top = "rtl/uart.sv" } ]
"#,
    )
    .file("uart", "rtl/uart.sv", "")
    .file("uart", "rtl/uart_tx.sv", "");

    ws.descriptor(
        "fifo",
        "fifo.versacore",
        "fifo",
        r#"
CREATE = []
GENERATE = [ { run = "touch fifo_{{depth}}.sv" }, { add_files = { globs = ["*.sv"] } }, { set_top = "fifo_{{depth}}.sv" } ]
"#,
    );
    ws
}

// ============================================================================
// Builds
// ============================================================================

#[tokio::test]
async fn builds_a_three_level_tree() {
    let ws = soc_workspace();
    let orchestrator = local_orchestrator(ws.locations(&["uart", "fifo"]));

    let report = orchestrator.run(&ws.dir("soc")).await.unwrap();
    let summaries = report.summaries();

    let names: Vec<_> = summaries.iter().map(|s| (s.depth, s.name.as_str())).collect();
    assert_eq!(names, [(0, "soc"), (1, "uart"), (2, "fifo")]);

    let soc = &summaries[0];
    assert_eq!(soc.target.as_deref(), Some("arty"));
    assert_eq!(soc.dependencies, ["uart"]);
    assert_eq!(file_names(soc), ["soc.sv", "soc.xdc"]);
    assert_eq!(soc.file_counts[&FileCategory::Constraint], 1);
    assert_eq!(soc.top, Some(ws.dir("soc").join("soc.sv")));

    let uart = &summaries[1];
    assert_eq!(file_names(uart), ["uart.sv", "uart_tx.sv"]);
    assert_eq!(uart.top, Some(ws.dir("uart").join("rtl/uart.sv")));

    // The generated file exists only because the command ran in fifo's directory.
    let fifo = &summaries[2];
    assert_eq!(file_names(fifo), ["fifo_16.sv"]);
    assert!(ws.dir("fifo").join("fifo_16.sv").is_file());

    assert_eq!(report.total_files(), 5);
    assert!(report.graph().iter().all(|n| n.phase() == Phase::Generated));
}

#[tokio::test]
async fn params_render_through_the_tree() {
    let ws = soc_workspace();
    let orchestrator = local_orchestrator(ws.locations(&["uart", "fifo"]));
    let session = orchestrator.create_in(&ws.dir("soc")).unwrap();

    let uart = session
        .graph()
        .iter()
        .find(|n| n.name() == "uart")
        .unwrap();
    assert_eq!(uart.params.get("board"), Some(&ParamValue::from("arty")));
}

#[tokio::test]
async fn sources_are_fetched_before_generation() {
    let ws = Workspace::new();
    ws.descriptor(
        "ip",
        "ip.versacore",
        "ip",
        r#"
GET_SOURCES = [ { run = "touch fetched.sv" } ]
PREPARE_SOURCES = [ { run = "touch prepared.sv" } ]
CREATE = []
GENERATE = [ { add_files = { globs = ["*.sv"] } } ]
"#,
    );

    let report = local_orchestrator(Vec::new())
        .run(&ws.dir("ip"))
        .await
        .unwrap();
    assert_eq!(file_names(&report.summaries()[0]), ["fetched.sv", "prepared.sv"]);
}

#[tokio::test]
async fn clean_runs_every_clean_hook() {
    let ws = Workspace::new();
    ws.descriptor(
        "top",
        "top.versacore",
        "top",
        r#"
CREATE = [ { depend_on = { name = "leaf" } } ]
GENERATE = []
CLEAN = [ { run = "touch top.cleaned" } ]
"#,
    )
    .descriptor(
        "leaf",
        "leaf.versacore",
        "leaf",
        r#"
CREATE = []
GENERATE = []
CLEAN = [ { run = "touch leaf.cleaned" } ]
"#,
    );

    let cleaned = local_orchestrator(ws.locations(&["leaf"]))
        .clean(&ws.dir("top"))
        .await
        .unwrap();
    assert_eq!(cleaned, 2);
    assert!(ws.dir("top").join("top.cleaned").is_file());
    assert!(ws.dir("leaf").join("leaf.cleaned").is_file());
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn dependency_cycle_is_reported_with_its_chain() {
    let ws = Workspace::new();
    ws.descriptor(
        "a",
        "a.versacore",
        "a",
        "CREATE = [ { depend_on = { name = \"b\" } } ]\nGENERATE = []",
    )
    .descriptor(
        "b",
        "b.versacore",
        "b",
        "CREATE = [ { depend_on = { name = \"a\" } } ]\nGENERATE = []",
    );

    let err = app_err(
        local_orchestrator(ws.locations(&["a", "b"]))
            .run(&ws.dir("a"))
            .await,
    );
    assert_eq!(
        err,
        ApplicationError::DependencyCycle {
            chain: vec!["a".into(), "b".into(), "a".into()],
        }
    );
}

#[tokio::test]
async fn failing_generate_command_aborts_the_build() {
    let ws = Workspace::new();
    ws.descriptor(
        "bad",
        "bad.versacore",
        "bad",
        "CREATE = []\nGENERATE = [ { run = \"false\" } ]",
    );

    let err = app_err(local_orchestrator(Vec::new()).run(&ws.dir("bad")).await);
    assert_eq!(
        err,
        ApplicationError::CommandFailed {
            command: "false".into(),
            code: Some(1),
        }
    );
}

#[tokio::test]
async fn illegal_descriptor_name_is_rejected() {
    let ws = Workspace::new();
    ws.descriptor(
        "x",
        "soc.a.b.versacore",
        "soc",
        "CREATE = []\nGENERATE = []",
    );

    let err = app_err(local_orchestrator(Vec::new()).run(&ws.dir("x")).await);
    assert!(matches!(err, ApplicationError::IllegalDescriptorName { .. }));
}

#[tokio::test]
async fn missing_dependency_names_the_search_locations() {
    let ws = Workspace::new();
    ws.descriptor(
        "top",
        "top.versacore",
        "top",
        "CREATE = [ { depend_on = { name = \"ghost\" } } ]\nGENERATE = []",
    )
    .file("lib", ".keep", "");

    let locations = ws.locations(&["lib"]);
    let err = app_err(
        local_orchestrator(locations.clone())
            .run(&ws.dir("top"))
            .await,
    );
    assert_eq!(
        err,
        ApplicationError::CoreNotFound {
            name: "ghost".into(),
            searched: locations,
        }
    );
}

#[tokio::test]
async fn duplicate_file_registration_fails() {
    let ws = Workspace::new();
    ws.descriptor(
        "dup",
        "dup.versacore",
        "dup",
        r#"CREATE = []
GENERATE = [ { add_files = { globs = ["a.sv"] } }, { add_files = { globs = ["*.sv"] } } ]"#,
    )
    .file("dup", "a.sv", "");

    let err = local_orchestrator(Vec::new())
        .run(&ws.dir("dup"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        VersaError::Domain(DomainError::DuplicateFile { .. })
    ));
}

#[test]
fn directory_without_descriptor() {
    let ws = Workspace::new();
    ws.file("empty", "README.md", "");
    let err = app_err(local_orchestrator(Vec::new()).create_in(&ws.dir("empty")));
    assert!(matches!(err, ApplicationError::TopCoreNotFound { .. }));
}
