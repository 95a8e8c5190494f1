//! 単価計算
//!
//! ガラス行の金額は入力5項目（X, Y, 数量, ガラス単価, 磨き単価）だけから決まる。
//!
//! ```text
//! 面積(sqft)     = (X * Y / 144) * 数量
//! ガラス代       = 面積 * ガラス単価
//! 磨き長さ(RFT)  = ((X/12 + Y/12) * 2) * 数量
//! 磨き代         = 磨き長さ * 磨き単価
//! 行合計         = ガラス代 + 磨き代
//! ```
//!
//! 磨き長さには数量を掛ける（数量を掛けない旧版の式は採用しない）。
//! 各値は小数第2位に四捨五入。行合計は丸め後のガラス代と磨き代の和なので、
//! 表示上も `行合計 == ガラス代 + 磨き代` が常に成り立つ。

use crate::money::{add, div, mul, parse_non_negative, parse_or_zero, round_money};
use crate::types::{GlassItem, GlassPricing, LineItem, Totals};
use rust_decimal::Decimal;

/// 1平方フィート = 144平方インチ
const SQ_INCHES_PER_SQ_FT: Decimal = Decimal::from_parts(144, 0, 0, false, 0);
/// 1フィート = 12インチ
const INCHES_PER_FT: Decimal = Decimal::from_parts(12, 0, 0, false, 0);
const TWO: Decimal = Decimal::from_parts(2, 0, 0, false, 0);

/// ガラス行の計算
pub fn compute_glass(item: &GlassItem) -> GlassPricing {
    let x = parse_non_negative(&item.x);
    let y = parse_non_negative(&item.y);
    let quantity = parse_non_negative(&item.quantity);
    let rate = parse_non_negative(&item.rate);
    let edge_rate = parse_non_negative(&item.edge_rate);

    let area = mul(div(mul(x, y), SQ_INCHES_PER_SQ_FT), quantity);
    let glass_cost = round_money(mul(area, rate));

    let perimeter_ft = mul(add(div(x, INCHES_PER_FT), div(y, INCHES_PER_FT)), TWO);
    let edge_length = mul(perimeter_ft, quantity);
    let edge_cost = round_money(mul(edge_length, edge_rate));

    GlassPricing {
        area_sq_ft: round_money(area),
        glass_cost,
        edge_length_ft: round_money(edge_length),
        edge_cost,
        line_total: round_money(add(glass_cost, edge_cost)),
    }
}

/// 1行を計算する（各行は独立して計算される）
///
/// 自由入力行は計算対象外なのでそのまま返す。
pub fn compute(item: &LineItem) -> LineItem {
    match item {
        LineItem::Glass(glass) => LineItem::Glass(GlassItem {
            pricing: compute_glass(glass),
            ..glass.clone()
        }),
        LineItem::Custom(custom) => LineItem::Custom(custom.clone()),
    }
}

/// 明細行から合計欄を集計
///
/// 小計（ガラス代・磨き代）はガラス行のみ、総合計は自由入力行の手入力額も含む。
pub fn aggregate(items: &[LineItem]) -> Totals {
    let mut glass_cost_sum = Decimal::ZERO;
    let mut edge_cost_sum = Decimal::ZERO;
    let mut grand_total = Decimal::ZERO;

    for item in items {
        match item {
            LineItem::Glass(glass) => {
                glass_cost_sum = add(glass_cost_sum, glass.pricing.glass_cost);
                edge_cost_sum = add(edge_cost_sum, glass.pricing.edge_cost);
                grand_total = add(grand_total, glass.pricing.line_total);
            }
            LineItem::Custom(custom) => {
                grand_total = add(grand_total, parse_or_zero(&custom.line_total));
            }
        }
    }

    Totals {
        glass_cost_sum: round_money(glass_cost_sum),
        edge_cost_sum: round_money(edge_cost_sum),
        grand_total: round_money(grand_total),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CustomItem;
    use proptest::prelude::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn glass(x: &str, y: &str, qty: &str, rate: &str, edge_rate: &str) -> GlassItem {
        GlassItem {
            x: x.into(),
            y: y.into(),
            quantity: qty.into(),
            rate: rate.into(),
            edge_rate: edge_rate.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_reference_order_24x36_qty2() {
        let pricing = compute_glass(&glass("24", "36", "2", "50", "20"));
        assert_eq!(pricing.area_sq_ft.to_string(), "12.00");
        assert_eq!(pricing.glass_cost.to_string(), "600.00");
        assert_eq!(pricing.edge_length_ft.to_string(), "20.00");
        assert_eq!(pricing.edge_cost.to_string(), "400.00");
        assert_eq!(pricing.line_total.to_string(), "1000.00");
    }

    /// 磨き長さは数量倍（数量を掛けない旧版なら10.00 / 200.00になる）
    #[test]
    fn test_edge_length_is_multiplied_by_quantity() {
        let single = compute_glass(&glass("24", "36", "1", "0", "20"));
        let double = compute_glass(&glass("24", "36", "2", "0", "20"));
        assert_eq!(single.edge_length_ft, dec("10"));
        assert_eq!(double.edge_length_ft, dec("20"));
        assert_ne!(double.edge_cost, dec("200"));
        assert_eq!(double.edge_cost, dec("400"));
    }

    #[test]
    fn test_rounding_half_up() {
        // 面積 = 10*10/144 = 0.69444..., ガラス代 = 0.69444... * 3 = 2.08333...
        let pricing = compute_glass(&glass("10", "10", "1", "3", "0"));
        assert_eq!(pricing.area_sq_ft.to_string(), "0.69");
        assert_eq!(pricing.glass_cost.to_string(), "2.08");
        assert_eq!(pricing.line_total.to_string(), "2.08");

        // 12*6/144 = 0.5 sqft * 0.01 = 0.005 → 0.01
        let pricing = compute_glass(&glass("12", "6", "1", "0.01", "0"));
        assert_eq!(pricing.glass_cost.to_string(), "0.01");
    }

    #[test]
    fn test_unparseable_inputs_are_zero() {
        let pricing = compute_glass(&glass("abc", "", "two", "50", "20"));
        assert_eq!(pricing, GlassPricing {
            area_sq_ft: dec("0.00"),
            glass_cost: dec("0.00"),
            edge_length_ft: dec("0.00"),
            edge_cost: dec("0.00"),
            line_total: dec("0.00"),
        });
    }

    #[test]
    fn test_missing_quantity_zeroes_row() {
        let pricing = compute_glass(&glass("24", "36", "", "50", "20"));
        assert_eq!(pricing.line_total, Decimal::ZERO);
    }

    #[test]
    fn test_negative_inputs_clamped() {
        let pricing = compute_glass(&glass("-24", "36", "2", "50", "20"));
        assert_eq!(pricing.area_sq_ft, Decimal::ZERO);
        // 幅36のみ: (0 + 3) * 2 * 2 = 12ft
        assert_eq!(pricing.edge_length_ft, dec("12"));
    }

    #[test]
    fn test_compute_custom_unchanged() {
        let item = LineItem::Custom(CustomItem {
            particular: "Fitting charge".into(),
            x: "n/a".into(),
            line_total: "450".into(),
            ..Default::default()
        });
        assert_eq!(compute(&item), item);
    }

    #[test]
    fn test_compute_replaces_stale_pricing() {
        let mut stale = glass("24", "36", "2", "50", "20");
        stale.pricing.line_total = dec("1.00");
        let computed = compute(&LineItem::Glass(stale));
        assert_eq!(computed.line_total(), dec("1000"));
    }

    /// 桁あふれは上限値に張り付く（この場合は合計＝ガラス代＋磨き代にならない）
    #[test]
    fn test_huge_inputs_saturate() {
        let nines = "9".repeat(27);
        let pricing = compute_glass(&glass(&nines, &nines, &nines, &nines, &nines));
        assert_eq!(pricing.glass_cost, Decimal::MAX);
        assert_eq!(pricing.edge_cost, Decimal::MAX);
        assert_eq!(pricing.line_total, Decimal::MAX);
        assert!(pricing.glass_cost.checked_add(pricing.edge_cost).is_none());
    }

    #[test]
    fn test_aggregate_empty() {
        let totals = aggregate(&[]);
        assert_eq!(totals.glass_cost_sum, Decimal::ZERO);
        assert_eq!(totals.edge_cost_sum, Decimal::ZERO);
        assert_eq!(totals.grand_total, Decimal::ZERO);
    }

    #[test]
    fn test_aggregate_custom_only() {
        let items = vec![
            LineItem::Custom(CustomItem::new("Labour", "10.00")),
            LineItem::Custom(CustomItem::new("Delivery", "15.50")),
        ];
        let totals = aggregate(&items);
        assert_eq!(totals.grand_total.to_string(), "25.50");
        assert_eq!(totals.glass_cost_sum, Decimal::ZERO);
        assert_eq!(totals.edge_cost_sum, Decimal::ZERO);
    }

    #[test]
    fn test_aggregate_subtotals_exclude_custom_rows() {
        let items = vec![
            compute(&LineItem::Glass(glass("24", "36", "2", "50", "20"))),
            LineItem::Custom(CustomItem::new("Hardware", "250")),
            LineItem::Custom(CustomItem::new("Note", "call before delivery")),
        ];
        let totals = aggregate(&items);
        assert_eq!(totals.glass_cost_sum.to_string(), "600.00");
        assert_eq!(totals.edge_cost_sum.to_string(), "400.00");
        assert_eq!(totals.grand_total.to_string(), "1250.00");
    }

    #[test]
    fn test_aggregate_custom_discount_keeps_sign() {
        let items = vec![
            compute(&LineItem::Glass(glass("12", "12", "1", "100", "0"))),
            LineItem::Custom(CustomItem::new("Discount", "-20")),
        ];
        assert_eq!(aggregate(&items).grand_total.to_string(), "80.00");
    }

    fn money_input() -> impl Strategy<Value = String> {
        (0u32..100_000, 0u32..100).prop_map(|(whole, cents)| format!("{}.{:02}", whole, cents))
    }

    proptest! {
        #[test]
        fn prop_line_total_is_sum_of_costs(
            x in money_input(),
            y in money_input(),
            qty in 0u32..1_000,
            rate in money_input(),
            edge_rate in money_input(),
        ) {
            let pricing = compute_glass(&glass(&x, &y, &qty.to_string(), &rate, &edge_rate));
            prop_assert_eq!(pricing.line_total, pricing.glass_cost + pricing.edge_cost);
            prop_assert!(pricing.line_total >= Decimal::ZERO);
            prop_assert_eq!(pricing.line_total.scale(), 2);
        }

        #[test]
        fn prop_compute_is_idempotent(
            x in money_input(),
            y in money_input(),
            qty in 0u32..1_000,
            rate in money_input(),
            edge_rate in money_input(),
        ) {
            let item = LineItem::Glass(glass(&x, &y, &qty.to_string(), &rate, &edge_rate));
            let once = compute(&item);
            let twice = compute(&once);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_grand_total_covers_all_rows(
            rows in proptest::collection::vec((money_input(), money_input(), 0u32..50), 0..8),
            manual in proptest::collection::vec(money_input(), 0..4),
        ) {
            let mut items: Vec<LineItem> = rows
                .iter()
                .map(|(x, y, q)| compute(&LineItem::Glass(glass(x, y, &q.to_string(), "45", "12"))))
                .collect();
            items.extend(manual.iter().map(|t| LineItem::Custom(CustomItem::new("extra", t.clone()))));

            let totals = aggregate(&items);
            let manual_sum: Decimal = manual.iter().map(|t| parse_or_zero(t)).sum();
            prop_assert_eq!(
                totals.grand_total,
                totals.glass_cost_sum + totals.edge_cost_sum + manual_sum
            );
        }
    }
}
