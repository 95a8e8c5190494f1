//! 数値入力と金額の丸め
//!
//! 入力欄の文字列はすべて `parse_or_zero` を通して数値化する。
//! 解析できない値はエラーにせず0として扱う。

use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// 金額・面積・長さの表示桁数
pub const MONEY_SCALE: u32 = 2;

/// 指数の上限。これを超える指数は Decimal に収まらない
const MAX_EXPONENT: u32 = 64;

/// 入力文字列の先頭にある数値を解析する（解析できなければ0）
///
/// 先頭の空白は読み飛ばし、`[+-]数字[.数字][(e|E)[+-]数字]` の最長一致部分だけを使う。
/// `"12abc"` は12、`".5"` は0.5、`"1e3"` は1000、`"abc"` や空文字は0になる。
/// 指数に数字が続かなければ指数部は無視する（`"1e"` は1）。
/// Decimal に収まらない値は0。
pub fn parse_or_zero(input: &str) -> Decimal {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut pos = 0;

    let negative = match bytes.first() {
        Some(b'-') => {
            pos = 1;
            true
        }
        Some(b'+') => {
            pos = 1;
            false
        }
        _ => false,
    };

    let int_start = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    let int_part = &s[int_start..pos];

    let mut frac_part = "";
    if pos < bytes.len() && bytes[pos] == b'.' {
        let frac_start = pos + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        frac_part = &s[frac_start..frac_end];
        pos = frac_end;
    }

    if int_part.is_empty() && frac_part.is_empty() {
        return Decimal::ZERO;
    }

    let normalized = format!(
        "{}{}.{}",
        if negative { "-" } else { "" },
        if int_part.is_empty() { "0" } else { int_part },
        if frac_part.is_empty() { "0" } else { frac_part },
    );

    let exponent = parse_exponent(&s[pos..]);
    match Decimal::from_str(&normalized) {
        Ok(mantissa) => scale_by_power_of_ten(mantissa, exponent),
        Err(_) => Decimal::ZERO,
    }
}

/// 仮数部の直後にある `(e|E)[+-]数字` を読む。なければ0
fn parse_exponent(rest: &str) -> i64 {
    let bytes = rest.as_bytes();
    if !matches!(bytes.first(), Some(b'e' | b'E')) {
        return 0;
    }

    let mut pos = 1;
    let negative = match bytes.get(pos) {
        Some(b'-') => {
            pos += 1;
            true
        }
        Some(b'+') => {
            pos += 1;
            false
        }
        _ => false,
    };

    let digits_start = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    if pos == digits_start {
        return 0;
    }

    // 桁の多い指数は上限に丸める
    let magnitude = rest[digits_start..pos]
        .parse::<u32>()
        .unwrap_or(u32::MAX)
        .min(MAX_EXPONENT + 1);
    let magnitude = i64::from(magnitude);
    if negative { -magnitude } else { magnitude }
}

fn scale_by_power_of_ten(mantissa: Decimal, exponent: i64) -> Decimal {
    if mantissa.is_zero() || exponent.unsigned_abs() > u64::from(MAX_EXPONENT) {
        return Decimal::ZERO;
    }

    let mut value = mantissa;
    for _ in 0..exponent.unsigned_abs() {
        let next = if exponent > 0 {
            value.checked_mul(Decimal::TEN)
        } else {
            value.checked_div(Decimal::TEN)
        };
        match next {
            Some(next) => value = next,
            None => return Decimal::ZERO,
        }
    }
    value
}

/// 寸法・数量・単価用: 負の値は0に切り上げる
pub fn parse_non_negative(input: &str) -> Decimal {
    parse_or_zero(input).max(Decimal::ZERO)
}

/// 小数第2位に四捨五入（0.005 → 0.01）し、スケールを2に揃える
pub fn round_money(value: Decimal) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(MONEY_SCALE);
    rounded
}

/// 表示用: 常に小数2桁
pub fn format_money(value: Decimal) -> String {
    round_money(value).to_string()
}

// 桁あふれは上限値に張り付ける（入力は非負なので上側だけ考えればよい）

pub(crate) fn mul(a: Decimal, b: Decimal) -> Decimal {
    a.checked_mul(b).unwrap_or(Decimal::MAX)
}

pub(crate) fn div(a: Decimal, b: Decimal) -> Decimal {
    a.checked_div(b).unwrap_or(Decimal::ZERO)
}

pub(crate) fn add(a: Decimal, b: Decimal) -> Decimal {
    a.checked_add(b).unwrap_or(if b.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    })
}
