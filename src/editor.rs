//! 対話式の見積書編集
//!
//! 画面の入力欄に相当する操作を `FormEvent` に変換し、すべて
//! `InvoiceForm::apply` を通して反映する。保存するまでストアには触らない。

use crate::error::Result;
use crate::report;
use dialoguer::{Confirm, Input};
use glass_estimate_common::{
    CustomerField, FormEvent, InvoiceForm, ItemField, ItemKind, LineItem,
};

/// 対話アクション（行番号は0始まりに変換済み）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    /// ガラス行を追加
    AddGlass,
    /// 自由入力行を追加
    AddCustom,
    /// 行を編集
    Edit(usize),
    /// 行を削除
    Remove(usize),
    /// 顧客情報を編集
    Customer,
    /// 合計を表示
    Totals,
    /// 保存して終了
    Save,
    /// 保存せず終了
    Quit,
}

const ACTION_HELP: &str =
    "操作: [g]ガラス行追加 [c]自由行追加 [e N]行編集 [r N]行削除 [n]顧客 [t]合計 [s]保存 [q]破棄";

/// 入力文字列をアクションに変換
///
/// 行番号は画面表示と同じ1始まりで受け取る。
pub fn parse_action(input: &str, item_count: usize) -> std::result::Result<EditorAction, String> {
    let mut parts = input.split_whitespace();
    let command = parts.next().unwrap_or("");
    let arg = parts.next();

    let row = |arg: Option<&str>| -> std::result::Result<usize, String> {
        let raw = arg.ok_or_else(|| "行番号を指定してください".to_string())?;
        let number: usize = raw
            .parse()
            .map_err(|_| format!("行番号が不正です: {}", raw))?;
        if number == 0 || number > item_count {
            return Err(format!("行 {} はありません（1-{}）", number, item_count));
        }
        Ok(number - 1)
    };

    match command {
        "g" | "glass" => Ok(EditorAction::AddGlass),
        "c" | "custom" => Ok(EditorAction::AddCustom),
        "e" | "edit" => row(arg).map(EditorAction::Edit),
        "r" | "rm" | "remove" => row(arg).map(EditorAction::Remove),
        "n" | "customer" => Ok(EditorAction::Customer),
        "t" | "totals" => Ok(EditorAction::Totals),
        "s" | "save" => Ok(EditorAction::Save),
        "q" | "quit" => Ok(EditorAction::Quit),
        "" => Err(ACTION_HELP.to_string()),
        other => Err(format!("不明な操作: {}", other)),
    }
}

/// 行の欄の現在値
pub fn field_value(item: &LineItem, field: ItemField) -> String {
    match item {
        LineItem::Glass(glass) => match field {
            ItemField::Particular => glass.particular.clone(),
            ItemField::X => glass.x.clone(),
            ItemField::Y => glass.y.clone(),
            ItemField::Quantity => glass.quantity.clone(),
            ItemField::Rate => glass.rate.clone(),
            ItemField::EdgeRate => glass.edge_rate.clone(),
            ItemField::LineTotal => glass.pricing.line_total.to_string(),
        },
        LineItem::Custom(custom) => match field {
            ItemField::Particular => custom.particular.clone(),
            ItemField::X => custom.x.clone(),
            ItemField::Y => custom.y.clone(),
            ItemField::Quantity => custom.quantity.clone(),
            ItemField::Rate => custom.rate.clone(),
            ItemField::EdgeRate => custom.edge_rate.clone(),
            ItemField::LineTotal => custom.line_total.clone(),
        },
    }
}

fn customer_value(form: &InvoiceForm, field: CustomerField) -> &str {
    let customer = form.customer();
    match field {
        CustomerField::Name => &customer.name,
        CustomerField::Date => &customer.date,
        CustomerField::Mobile => &customer.mobile,
    }
}

fn customer_label(field: CustomerField) -> &'static str {
    match field {
        CustomerField::Name => "Name",
        CustomerField::Date => "Date",
        CustomerField::Mobile => "Mobile",
    }
}

fn prompt_text(label: &str, current: &str) -> Result<String> {
    let value: String = Input::new()
        .with_prompt(label)
        .with_initial_text(current)
        .allow_empty(true)
        .interact_text()?;
    Ok(value)
}

/// 1件ずつ適用し、失敗した変更は表示して読み飛ばす
fn apply_all(form: InvoiceForm, events: Vec<FormEvent>) -> InvoiceForm {
    events.into_iter().fold(form, |form, event| match form.apply(event) {
        Ok(next) => next,
        Err(e) => {
            println!("  ✗ {}", e);
            form
        }
    })
}

fn edit_customer(form: InvoiceForm) -> Result<InvoiceForm> {
    let mut events = Vec::new();
    for field in [CustomerField::Name, CustomerField::Date, CustomerField::Mobile] {
        let value = prompt_text(customer_label(field), customer_value(&form, field))?;
        events.push(FormEvent::SetCustomer(field, value));
    }
    Ok(apply_all(form, events))
}

fn edit_row(form: InvoiceForm, index: usize) -> Result<InvoiceForm> {
    let Some(item) = form.items().get(index) else {
        return Ok(form);
    };

    let mut events = Vec::new();
    for &field in ItemField::fields_for(item.kind()) {
        let value = prompt_text(field.label(), &field_value(item, field))?;
        events.push(FormEvent::SetItemField { index, field, value });
    }
    Ok(apply_all(form, events))
}

/// 対話式編集を実行
///
/// 保存を選んだ場合は編集後のフォーム、破棄した場合は `None` を返す。
pub fn run_editor(form: InvoiceForm, currency: &str) -> Result<Option<InvoiceForm>> {
    let mut form = form;
    println!("{}", ACTION_HELP);

    loop {
        println!();
        print!("{}", report::format_customer(form.customer()));
        print!("{}", report::format_items(form.items(), &form.totals(), currency));

        let input: String = Input::new()
            .with_prompt("操作")
            .allow_empty(true)
            .interact_text()?;

        let action = match parse_action(input.trim(), form.items().len()) {
            Ok(action) => action,
            Err(message) => {
                println!("  {}", message);
                continue;
            }
        };
        tracing::debug!(?action, "editor action");

        form = match action {
            EditorAction::AddGlass => apply_all(form, vec![FormEvent::AddItem(ItemKind::Glass)]),
            EditorAction::AddCustom => apply_all(form, vec![FormEvent::AddItem(ItemKind::Custom)]),
            EditorAction::Edit(index) => edit_row(form, index)?,
            EditorAction::Remove(index) => apply_all(form, vec![FormEvent::RemoveItem(index)]),
            EditorAction::Customer => edit_customer(form)?,
            EditorAction::Totals => form,
            EditorAction::Save => return Ok(Some(form)),
            EditorAction::Quit => {
                let discard = Confirm::new()
                    .with_prompt("変更を破棄して終了しますか?")
                    .default(false)
                    .interact()?;
                if discard {
                    return Ok(None);
                }
                form
            }
        };
    }
}
