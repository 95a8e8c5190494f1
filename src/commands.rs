//! サブコマンドの実行
//!
//! ストアは `InvoiceStore` として受け取るので、テストではメモリ上のストアで動かせる。

use crate::cli::{Commands, CustomArg, ExportFormat, GlassArg, StoreCommand};
use crate::config::Config;
use crate::editor;
use crate::error::{GlassEstimateError, Result};
use crate::export;
use crate::report;
use crate::store::{resolve_id, InvoiceStore, JsonFileStore};
use dialoguer::Confirm;
use glass_estimate_common::{
    CustomerField, FormEvent, GlassItem, InvoiceForm, ItemField, ItemKind,
};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// コマンドを実行する（ストアを使うコマンドはデータ保存先のストアを開く）
pub fn execute(command: Commands, config: &mut Config, data_dir: Option<&Path>) -> Result<()> {
    match command {
        Commands::Store(command) => {
            let dir = config.resolve_data_dir(data_dir)?;
            let mut store = JsonFileStore::open(&dir)?;
            run(command, config, &mut store)
        }
        Commands::Quote {
            x,
            y,
            quantity,
            rate,
            edge_rate,
        } => {
            print!("{}", quote(&x, &y, &quantity, &rate, &edge_rate, config));
            Ok(())
        }
        Commands::Config {
            show,
            set_shop_name,
            set_data_dir,
            set_currency,
            set_format,
        } => {
            let changes = ConfigChanges {
                shop_name: set_shop_name,
                data_dir: set_data_dir,
                currency: set_currency,
                format: set_format,
            };
            configure(config, changes, show, data_dir)
        }
    }
}

/// ストアを使うコマンドを実行
pub fn run(command: StoreCommand, config: &Config, store: &mut dyn InvoiceStore) -> Result<()> {
    match command {
        StoreCommand::List => {
            let summaries = store.list()?;
            print!("{}", report::format_list(&summaries, &config.currency_symbol));
        }

        StoreCommand::New {
            name,
            date,
            mobile,
            glass,
            custom,
            interactive,
        } => {
            let form = form_from_args(name, date, mobile, &glass, &custom)?;
            let form = if interactive {
                match editor::run_editor(form, &config.currency_symbol)? {
                    Some(form) => form,
                    None => {
                        println!("保存せずに終了しました");
                        return Ok(());
                    }
                }
            } else if glass.is_empty() && custom.is_empty() {
                return Err(GlassEstimateError::InvalidItem(
                    "明細がありません（--glass / --custom を指定するか --interactive で入力）".into(),
                ));
            } else {
                form
            };

            let id = store.create(form.to_invoice())?;
            println!("✔ 見積書を保存しました: {}", id);
            println!(
                "  合計: {}{}",
                config.currency_symbol,
                glass_estimate_common::format_money(form.totals().grand_total)
            );
        }

        StoreCommand::Edit { id } => {
            let id = resolve_id(store, &id)?;
            let record = store.get(id)?;
            let form = InvoiceForm::from_invoice(&record.invoice);
            match editor::run_editor(form, &config.currency_symbol)? {
                Some(form) => {
                    store.update(id, form.to_invoice())?;
                    println!("✔ 見積書を更新しました: {}", id);
                }
                None => println!("変更を破棄しました"),
            }
        }

        StoreCommand::Show { id } => {
            let id = resolve_id(store, &id)?;
            let record = store.get(id)?;
            print!("{}", report::format_invoice(&record, &config.currency_symbol));
        }

        StoreCommand::Delete { id, yes } => {
            let id = resolve_id(store, &id)?;
            let record = store.get(id)?;
            if !yes {
                let confirmed = Confirm::new()
                    .with_prompt(format!(
                        "{} ({}) を削除しますか?",
                        record.invoice.customer.name, id
                    ))
                    .default(false)
                    .interact()?;
                if !confirmed {
                    println!("削除を取り消しました");
                    return Ok(());
                }
            }
            delete(store, id)?;
        }

        StoreCommand::Export { id, format, output } => {
            let id = resolve_id(store, &id)?;
            let format = format.unwrap_or(config.default_export_format);
            let output = output.unwrap_or_else(|| PathBuf::from("."));
            export_record(store, config, id, format, &output)?;
        }
    }

    Ok(())
}

/// フラグで指定された内容からフォームを組み立てる
///
/// 明細の指定がなければ新規フォームと同じく空のガラス行を1行持つ。
pub fn form_from_args(
    name: String,
    date: String,
    mobile: String,
    glass: &[GlassArg],
    custom: &[CustomArg],
) -> Result<InvoiceForm> {
    let mut events = vec![
        FormEvent::SetCustomer(CustomerField::Name, name),
        FormEvent::SetCustomer(CustomerField::Date, date),
        FormEvent::SetCustomer(CustomerField::Mobile, mobile),
    ];

    if !glass.is_empty() || !custom.is_empty() {
        events.push(FormEvent::RemoveItem(0));
    }

    let mut index = 0;
    for row in glass {
        events.push(FormEvent::AddItem(ItemKind::Glass));
        for (field, value) in [
            (ItemField::Particular, &row.particular),
            (ItemField::X, &row.x),
            (ItemField::Y, &row.y),
            (ItemField::Quantity, &row.quantity),
            (ItemField::Rate, &row.rate),
            (ItemField::EdgeRate, &row.edge_rate),
        ] {
            events.push(FormEvent::SetItemField {
                index,
                field,
                value: value.clone(),
            });
        }
        index += 1;
    }
    for row in custom {
        events.push(FormEvent::AddItem(ItemKind::Custom));
        for (field, value) in [
            (ItemField::Particular, &row.particular),
            (ItemField::LineTotal, &row.line_total),
        ] {
            events.push(FormEvent::SetItemField {
                index,
                field,
                value: value.clone(),
            });
        }
        index += 1;
    }

    let mut form = InvoiceForm::new();
    for event in events {
        form = form.apply(event)?;
    }
    Ok(form)
}

pub fn delete(store: &mut dyn InvoiceStore, id: Uuid) -> Result<()> {
    store.delete(id)?;
    println!("✔ 見積書を削除しました: {}", id);
    Ok(())
}

/// 保存済みの見積書を出力
pub fn export_record(
    store: &dyn InvoiceStore,
    config: &Config,
    id: Uuid,
    format: ExportFormat,
    output: &Path,
) -> Result<Vec<PathBuf>> {
    let record = store.get(id)?;
    let stem = export::default_file_stem(&record.invoice);
    export::export_invoice(&record.invoice, format, output, &stem, config)
}

/// ガラス1行の見積り（保存しない）
pub fn quote(x: &str, y: &str, quantity: &str, rate: &str, edge_rate: &str, config: &Config) -> String {
    let item = GlassItem::new("", x, y, quantity, rate, edge_rate);
    report::format_quote(&item, &config.currency_symbol)
}

/// `config` コマンドで指定された変更
#[derive(Debug, Default)]
pub struct ConfigChanges {
    pub shop_name: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub currency: Option<String>,
    pub format: Option<ExportFormat>,
}

/// 設定を変更して保存し、変更がなければ（または `show` 指定時は）内容を表示する
pub fn configure(
    config: &mut Config,
    changes: ConfigChanges,
    show: bool,
    data_dir: Option<&Path>,
) -> Result<()> {
    let changed = apply_config_changes(config, changes);
    if changed {
        config.save()?;
        println!("✔ 設定を保存しました");
    }
    if show || !changed {
        print!("{}", format_config(config, data_dir)?);
    }
    Ok(())
}

/// 変更を適用し、何か変わったかを返す
pub fn apply_config_changes(config: &mut Config, changes: ConfigChanges) -> bool {
    let mut changed = false;
    if let Some(shop_name) = changes.shop_name {
        config.shop_name = shop_name;
        changed = true;
    }
    if let Some(dir) = changes.data_dir {
        config.data_dir = Some(dir);
        changed = true;
    }
    if let Some(currency) = changes.currency {
        config.currency_symbol = currency;
        changed = true;
    }
    if let Some(format) = changes.format {
        config.default_export_format = format;
        changed = true;
    }
    changed
}

/// 設定内容の表示
pub fn format_config(config: &Config, data_dir: Option<&Path>) -> Result<String> {
    let mut out = String::from("設定:\n");
    out.push_str(&format!("  店名: {}\n", config.shop_name));
    out.push_str(&format!("  通貨記号: {}\n", config.currency_symbol));
    out.push_str(&format!("  出力形式: {}\n", config.default_export_format));
    out.push_str(&format!(
        "  データ保存先: {}\n",
        config.resolve_data_dir(data_dir)?.display()
    ));
    out.push_str("  約款:\n");
    for term in &config.terms {
        out.push_str(&format!("    - {}\n", term));
    }
    Ok(out)
}
