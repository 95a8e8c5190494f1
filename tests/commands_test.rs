//! コマンド実行の統合テスト（メモリ上のストア）

use glass_estimate::cli::{Cli, Commands, CustomArg, ExportFormat, GlassArg, StoreCommand};
use glass_estimate::commands::{
    self, apply_config_changes, configure, form_from_args, format_config, ConfigChanges,
};
use glass_estimate::config::Config;
use glass_estimate::error::GlassEstimateError;
use glass_estimate::store::{InvoiceStore, MemoryStore};
use clap::Parser;
use glass_estimate_common::ItemKind;
use tempfile::tempdir;

fn parse(args: &[&str]) -> StoreCommand {
    let mut full = vec!["glass-estimate"];
    full.extend_from_slice(args);
    match Cli::try_parse_from(full).expect("引数解析失敗").command {
        Commands::Store(command) => command,
        _ => panic!("ストアを使うコマンドではありません: {:?}", args),
    }
}

fn glass(s: &str) -> GlassArg {
    s.parse().unwrap()
}

fn custom(s: &str) -> CustomArg {
    s.parse().unwrap()
}

#[test]
fn test_new_from_flags_saves_invoice() {
    let mut store = MemoryStore::new();
    let config = Config::default();

    let command = parse(&[
        "new",
        "--name",
        "Jadhav",
        "--date",
        "2024-10-01",
        "--glass",
        "Clear,24,36,2,50,20",
        "--custom",
        "Discount,-100",
    ]);
    commands::run(command, &config, &mut store).expect("作成失敗");

    let list = store.list().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].customer.name, "Jadhav");
    assert_eq!(list[0].grand_total.to_string(), "900.00");

    let record = store.get(list[0].id).unwrap();
    assert_eq!(record.invoice.totals.glass_cost_sum.to_string(), "600.00");
    assert_eq!(record.invoice.totals.edge_cost_sum.to_string(), "400.00");
}

#[test]
fn test_new_without_rows_is_rejected() {
    let mut store = MemoryStore::new();
    let result = commands::run(parse(&["new", "--name", "X"]), &Config::default(), &mut store);
    assert!(matches!(result, Err(GlassEstimateError::InvalidItem(_))));
    assert!(store.is_empty());
}

#[test]
fn test_form_from_args_keeps_row_order() {
    let form = form_from_args(
        "A".into(),
        String::new(),
        String::new(),
        &[glass("One,12,12,1,10,0"), glass("Two,12,12,1,10,0")],
        &[custom("Three,5")],
    )
    .unwrap();

    let kinds: Vec<ItemKind> = form.items().iter().map(|i| i.kind()).collect();
    assert_eq!(kinds, vec![ItemKind::Glass, ItemKind::Glass, ItemKind::Custom]);
    let names: Vec<&str> = form.items().iter().map(|i| i.particular()).collect();
    assert_eq!(names, vec!["One", "Two", "Three"]);
    assert_eq!(form.totals().grand_total.to_string(), "25.00");
}

#[test]
fn test_form_from_args_without_rows_has_empty_glass_row() {
    let form = form_from_args("A".into(), String::new(), String::new(), &[], &[]).unwrap();
    assert_eq!(form.items().len(), 1);
    assert_eq!(form.items()[0].kind(), ItemKind::Glass);
}

#[test]
fn test_show_and_delete_by_prefix() {
    let mut store = MemoryStore::new();
    let config = Config::default();
    commands::run(
        parse(&["new", "--name", "Pawar", "--custom", "Fitting,200"]),
        &config,
        &mut store,
    )
    .unwrap();
    let id = store.list().unwrap()[0].id;
    let prefix = id.to_string()[..6].to_string();

    commands::run(parse(&["show", prefix.as_str()]), &config, &mut store).expect("表示失敗");
    commands::run(parse(&["delete", prefix.as_str(), "--yes"]), &config, &mut store).expect("削除失敗");

    assert!(store.list().unwrap().is_empty());
    let result = commands::run(parse(&["show", id.to_string().as_str()]), &config, &mut store);
    assert!(matches!(result, Err(GlassEstimateError::NotFound(_))));
}

#[test]
fn test_export_writes_default_named_pdf() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut store = MemoryStore::new();
    let config = Config::default();
    commands::run(
        parse(&["new", "--name", "More", "--glass", "Clear,24,36,2,50,20"]),
        &config,
        &mut store,
    )
    .unwrap();
    let id = store.list().unwrap()[0].id;

    let paths = commands::export_record(&store, &config, id, ExportFormat::Pdf, dir.path())
        .expect("出力失敗");
    assert_eq!(paths.len(), 1);
    let name = paths[0].file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("estimate-More-"), "{}", name);
    assert!(name.ends_with(".pdf"));
}

#[test]
fn test_quote_does_not_touch_store() {
    let config = Config {
        currency_symbol: "Rs ".into(),
        ..Default::default()
    };
    let out = commands::quote("24", "36", "2", "50", "20", &config);
    assert!(out.contains("Rs 1000.00"));
}

#[test]
fn test_config_changes() {
    let mut config = Config::default();
    assert!(!apply_config_changes(&mut config, ConfigChanges::default()));

    let changed = apply_config_changes(
        &mut config,
        ConfigChanges {
            shop_name: Some("Shiv Glass".into()),
            format: Some(ExportFormat::Excel),
            ..Default::default()
        },
    );
    assert!(changed);
    assert_eq!(config.shop_name, "Shiv Glass");
    assert_eq!(config.default_export_format, ExportFormat::Excel);
}

#[test]
fn test_config_show_uses_data_dir_override() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut config = Config::default();

    configure(&mut config, ConfigChanges::default(), true, Some(dir.path())).expect("表示失敗");

    let out = format_config(&config, Some(dir.path())).expect("表示失敗");
    assert!(out.contains(&dir.path().display().to_string()));
    assert!(out.contains(&config.shop_name));
}
