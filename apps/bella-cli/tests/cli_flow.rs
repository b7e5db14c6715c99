//! Drives the CLI end to end against a data directory in a temp dir.

use bella_cli::cli::Cli;
use bella_cli::execute;
use clap::Parser;
use serde_json::Value;
use std::path::{Path, PathBuf};

struct Workspace {
    _dir: tempfile::TempDir,
    config: PathBuf,
    data: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("data");
        let config = dir.path().join("config.toml");
        std::fs::write(
            &config,
            format!(
                "data_dir = {:?}\nutc_offset = \"-03:00\"\n",
                data.display().to_string()
            ),
        )
        .unwrap();
        Workspace {
            _dir: dir,
            config,
            data,
        }
    }

    fn run(&self, args: &[&str]) -> Result<Value, bella_cli::error::ApiError> {
        let mut argv = vec!["bella", "--config", self.config.to_str().unwrap()];
        argv.extend_from_slice(args);
        let cli = Cli::try_parse_from(argv).unwrap();
        execute(cli).map(|out| serde_json::from_str(&out).unwrap())
    }

    fn ok(&self, args: &[&str]) -> Value {
        self.run(args).unwrap()
    }
}

fn id(value: &Value) -> String {
    value["id"].as_str().unwrap().to_string()
}

fn snapshot_file(data: &Path) -> PathBuf {
    data.join("bellagestao_v1.json")
}

#[test]
fn sale_on_installments_through_the_cli() {
    let ws = Workspace::new();

    let ana = id(&ws.ok(&["customer", "add", "--name", "Ana", "--phone", "11988887777"]));
    let kit = id(&ws.ok(&[
        "product",
        "add",
        "--name",
        "Kit Skincare",
        "--category",
        "Pele",
        "--price-cents",
        "15000",
        "--stock",
        "5",
    ]));

    let item = format!("{}:2", kit);
    let sale = ws.ok(&[
        "sale",
        "create",
        "--customer",
        &ana,
        "--item",
        &item,
        "--payment",
        "credit_card",
        "--installments",
        "3",
    ]);
    assert_eq!(sale["sale"]["totalCents"], 30000);
    assert_eq!(sale["installments"].as_array().unwrap().len(), 3);
    assert_eq!(sale["stockChanges"][0]["after"], 3);

    let account = ws.ok(&["customer", "show", &ana]);
    assert_eq!(account["customer"]["status"], "pendente");
    assert_eq!(account["customer"]["balanceCents"], 30000);

    let first = sale["installments"][0]["id"].as_str().unwrap().to_string();
    let paid = ws.ok(&["installment", "pay", &first]);
    assert_eq!(paid["paid"], true);

    let pending = ws.ok(&["installment", "pending"]);
    assert_eq!(pending.as_array().unwrap().len(), 2);

    let dashboard = ws.ok(&["dashboard"]);
    assert_eq!(dashboard["totalReceivable"]["cents"], 20000);

    // Every command above ran against a fresh store opened from disk.
    assert!(snapshot_file(&ws.data).exists());
}

#[test]
fn unknown_ids() {
    let ws = Workspace::new();

    assert_eq!(ws.ok(&["installment", "pay", "missing"]), Value::Null);
    assert_eq!(ws.ok(&["product", "restock", "missing", "5"]), Value::Null);
    assert_eq!(ws.ok(&["customer", "delete", "missing"]), Value::Null);

    let err = ws.run(&["customer", "show", "missing"]).unwrap_err();
    assert_eq!(err.code, bella_cli::error::ErrorCode::NotFound);

    let err = ws
        .run(&["sale", "create", "--customer", "missing", "--item", "p:1"])
        .unwrap_err();
    assert_eq!(err.code, bella_cli::error::ErrorCode::NotFound);
}

#[test]
fn profile_survives_restart() {
    let ws = Workspace::new();

    ws.ok(&["profile", "set", "--business-name", "Bella Cosméticos", "--theme", "dark"]);
    let profile = ws.ok(&["profile", "show"]);
    assert_eq!(profile["businessName"], "Bella Cosméticos");
    assert_eq!(profile["theme"], "dark");
    assert_eq!(profile["name"], "Consultora Bella");
}

#[test]
fn config_show_reports_data_dir() {
    let ws = Workspace::new();
    let shown = ws.ok(&["config", "show"]);
    assert_eq!(shown["utc_offset"], "-03:00");
    assert_eq!(
        shown["resolved_data_dir"].as_str().unwrap(),
        ws.data.to_str().unwrap()
    );
}
