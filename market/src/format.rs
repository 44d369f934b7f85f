//! Display formatting shared by every renderer.

use chrono::Timelike;

/// `67245.89` → `"67,245.89"`, `178.93` → `"178.93"`, `0.5234` → `"0.5234"`.
pub fn format_price(price: f64) -> String {
    if price >= 1_000.0 {
        group_thousands(&format!("{price:.2}"))
    } else if price >= 1.0 {
        format!("{price:.2}")
    } else {
        format!("{price:.4}")
    }
}

/// `$X.XXT` from 1e12, `$X.XB` from 1e9, `$X.XM` below.
pub fn format_market_cap(cap: f64) -> String {
    if cap >= 1e12 {
        format!("${:.2}T", cap / 1e12)
    } else if cap >= 1e9 {
        format!("${:.1}B", cap / 1e9)
    } else {
        format!("${:.1}M", cap / 1e6)
    }
}

/// Row badge: direction arrow plus magnitude, e.g. `"▼ 1.28%"`.
pub fn format_change(change: f64) -> String {
    let arrow = if change >= 0.0 { '▲' } else { '▼' };
    format!("{arrow} {:.2}%", change.abs())
}

/// Header figure: explicit `+` for non-negative values, e.g. `"+1.57%"`.
pub fn format_avg_change(change: f64) -> String {
    let sign = if change >= 0.0 { "+" } else { "" };
    format!("{sign}{change:.2}%")
}

pub fn format_block_height(height: u64) -> String {
    group_thousands(&height.to_string())
}

/// 24-hour `HH:MM:SS`.
pub fn format_clock<T: Timelike>(t: &T) -> String {
    format!("{:02}:{:02}:{:02}", t.hour(), t.minute(), t.second())
}

/// Insert `,` every three digits of the integer part of a plain decimal string.
fn group_thousands(s: &str) -> String {
    let (sign, rest) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s),
    };
    let (int, frac) = match rest.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (rest, None),
    };

    let mut grouped = String::with_capacity(s.len() + int.len() / 3);
    grouped.push_str(sign);

    for (i, ch) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if let Some(frac) = frac {
        grouped.push('.');
        grouped.push_str(frac);
    }
    grouped
}
