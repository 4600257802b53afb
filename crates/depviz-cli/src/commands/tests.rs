//! Unit tests for CLI commands.

use super::*;
use crate::output::OutputHandler;
use depviz_graph::{compare_with_reference, find_cycles, load_order};
use tempfile::TempDir;

const REPOSITORY: &str = "\
# app depends on a small web stack
app: web, log
web: http, log
http: app
log
";

/// Create a test command context in a temporary directory with a test repository
async fn create_test_context() -> (TempDir, CommandContext) {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    tokio::fs::write(temp_dir.path().join("repo.txt"), REPOSITORY)
        .await
        .unwrap();

    let cwd = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
    let ctx = CommandContext {
        cwd,
        config_file: None,
        env_overrides: HashMap::new(),
        output: OutputHandler::plain(),
    };
    (temp_dir, ctx)
}

fn fixture_args(output: &str) -> AnalysisArgs {
    AnalysisArgs {
        package: Some("app".to_string()),
        repo_path: Some("repo.txt".to_string()),
        test_repo: true,
        output: Some(output.to_string()),
        ..AnalysisArgs::default()
    }
}

#[tokio::test]
async fn test_explore_fixture_repository() {
    let (_temp_dir, ctx) = create_test_context().await;
    let run = ctx.run_config(&fixture_args("graph.dot")).await.unwrap();

    let graph = ctx.explore(&run).await.unwrap();

    assert_eq!(graph.keys().collect::<Vec<_>>(), vec!["app", "web", "log", "http"]);
    assert_eq!(find_cycles(&graph).len(), 1);
    assert_eq!(load_order(&graph, "app").as_slice(), ["http", "log", "web", "app"]);
}

#[tokio::test]
async fn test_filter_and_depth_flow_into_builder() {
    let (_temp_dir, ctx) = create_test_context().await;
    let args = AnalysisArgs {
        filter: Some("log".to_string()),
        max_depth: Some(1),
        ..fixture_args("graph.dot")
    };
    let run = ctx.run_config(&args).await.unwrap();

    let graph = ctx.explore(&run).await.unwrap();

    assert_eq!(graph.dependencies_of("app").unwrap(), ["web"]);
    assert_eq!(graph.dependencies_of("web").unwrap(), ["http"]);
    assert!(!graph.is_explored("http"));
}

#[tokio::test]
async fn test_graph_command_writes_dot_file() {
    let (temp_dir, ctx) = create_test_context().await;

    graph::execute(&fixture_args("out/deps.dot"), &ctx).await.unwrap();

    let dot = tokio::fs::read_to_string(temp_dir.path().join("out/deps.dot"))
        .await
        .unwrap();
    assert!(dot.contains("label = \"http\""));
}

#[tokio::test]
async fn test_analyze_command_runs_every_report() {
    let (temp_dir, ctx) = create_test_context().await;

    analyze::execute(&fixture_args("report.dot"), true, &ctx).await.unwrap();

    assert!(temp_dir.path().join("report.dot").exists());
}

#[tokio::test]
async fn test_analysis_report_contents() {
    let (_temp_dir, ctx) = create_test_context().await;
    let run = ctx.run_config(&fixture_args("graph.dot")).await.unwrap();
    let graph = ctx.explore(&run).await.unwrap();
    let order = load_order(&graph, &run.package);

    let report = analyze::AnalysisReport::new(&run, &graph, &order);
    let json: serde_json::Value = serde_json::from_str(&to_json(&report).unwrap()).unwrap();

    assert_eq!(json["package"], "app");
    assert_eq!(json["direct_dependencies"], serde_json::json!(["web", "log"]));
    assert_eq!(json["graph"]["http"], serde_json::json!(["app"]));
    assert_eq!(json["cycles"], serde_json::json!([["app", "web", "http"]]));
    assert_eq!(json["load_order"]["start_position"], 4);

    let text = report.render_text(true, &order);
    assert!(text.contains("Direct dependencies of app (2):"));
    assert!(text.contains("app -> web -> http -> app"));
    assert!(text.contains("app loads at position 4 of 4"));
}

#[tokio::test]
async fn test_other_commands_succeed() {
    let (_temp_dir, ctx) = create_test_context().await;
    let args = fixture_args("graph.dot");

    deps::execute(&args, &ctx).await.unwrap();
    cycles::execute(&args, &ctx).await.unwrap();
    order::execute(&args, None, &ctx).await.unwrap();
    config::execute(&args, &ctx).await.unwrap();
}

#[tokio::test]
async fn test_order_with_reference_file() {
    let (temp_dir, ctx) = create_test_context().await;
    tokio::fs::write(temp_dir.path().join("npm-order.txt"), "log\nhttp\nweb\napp\n")
        .await
        .unwrap();

    order::execute(&fixture_args("graph.dot"), Some(Utf8Path::new("npm-order.txt")), &ctx)
        .await
        .unwrap();

    let missing = order::execute(&fixture_args("graph.dot"), Some(Utf8Path::new("nope.txt")), &ctx).await;
    assert!(matches!(missing, Err(DepvizError::Io { .. })));
}

#[tokio::test]
async fn test_invalid_configuration_fails_before_exploring() {
    let (_temp_dir, ctx) = create_test_context().await;
    let args = AnalysisArgs {
        max_depth: Some(0),
        ..fixture_args("graph.dot")
    };

    let result = graph::execute(&args, &ctx).await;
    assert!(matches!(result, Err(DepvizError::ConfigValidation { .. })));
}

#[tokio::test]
async fn test_malformed_fixture_is_reported() {
    let (temp_dir, ctx) = create_test_context().await;
    tokio::fs::write(temp_dir.path().join("bad.txt"), "a: b\n: c\n").await.unwrap();
    let args = AnalysisArgs {
        repo_path: Some("bad.txt".to_string()),
        ..fixture_args("graph.dot")
    };

    let result = cycles::execute(&args, &ctx).await;
    assert!(matches!(result, Err(DepvizError::FixtureParse { line: 2, .. })));
}

#[tokio::test]
async fn test_environment_layer_is_used() {
    let (_temp_dir, mut ctx) = create_test_context().await;
    ctx.env_overrides.insert("DEPVIZ_PACKAGE".to_string(), "web".to_string());
    let args = AnalysisArgs {
        package: None,
        ..fixture_args("graph.dot")
    };

    let run = ctx.run_config(&args).await.unwrap();
    assert_eq!(run.package, "web");
}

#[test]
fn test_render_direct() {
    assert_eq!(deps::render_direct("solo", &[]), "solo has no direct dependencies");
    assert_eq!(
        deps::render_direct("app", &["web".to_string(), "log".to_string()]),
        "Direct dependencies of app (2):\n  - web\n  - log"
    );
}

#[test]
fn test_render_cycles() {
    assert_eq!(cycles::render_cycles(&[]), "No cycles found");
}

#[test]
fn test_render_adjacency() {
    let graph: DependencyGraph = [("a", vec!["b", "c"]), ("b", vec![])].into_iter().collect();

    assert_eq!(
        graph::render_adjacency(&graph),
        "a -> b, c\nb -> (none)\nnot explored: c"
    );
}

#[test]
fn test_parse_reference() {
    assert_eq!(
        order::parse_reference("# npm ls order\nlog\n\n  http  \nweb # root dep\n"),
        vec!["log", "http", "web"]
    );
}

#[test]
fn test_render_comparison() {
    let names = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    let same = compare_with_reference(&names(&["a", "b"]), &names(&["a", "b"]));
    assert_eq!(order::render_comparison(&same), "Reference order agrees on all 2 packages");

    let swapped = compare_with_reference(&names(&["a", "b"]), &names(&["b", "a", "c"]));
    let text = order::render_comparison(&swapped);
    assert!(text.contains("only reference: c"));
    assert!(text.contains("a before b here"));
}

#[test]
fn test_resolve_path() {
    let ctx = CommandContext {
        cwd: Utf8PathBuf::from("/work"),
        config_file: None,
        env_overrides: HashMap::new(),
        output: OutputHandler::plain(),
    };

    assert_eq!(ctx.resolve_path(Utf8Path::new("g.dot")), Utf8PathBuf::from("/work/g.dot"));
    assert_eq!(ctx.resolve_path(Utf8Path::new("/tmp/g.dot")), Utf8PathBuf::from("/tmp/g.dot"));
}
