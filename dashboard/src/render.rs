//! Plain-text rendering of a [`Frame`].
//!
//! Purely a consumer of the core: it reads the frame and never touches the
//! store or the effect state.

use market::format::{
    format_avg_change, format_block_height, format_change, format_market_cap, format_price,
};
use market::trend_window::TrendHistory;
use market::view::SortKey;

use crate::session::{Frame, FrameRow};

const SPARK_BLOCKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Decorative constant carried on the status bar.
const GAS_GWEI: u32 = 23;

const TITLE: &str = "CRYPTO";
const TITLE_SUFFIX: &str = "_FEED";

pub fn render_frame(frame: &Frame) -> String {
    let mut lines = Vec::with_capacity(frame.rows.len() + 10);

    lines.push(status_bar(frame));
    lines.push("DECENTRALIZED PRICE FEED v2.4.1".to_string());
    lines.push(title(frame.glitched));
    lines.push(format!(
        "TOTAL MCAP: {}   AVG 24H: {}",
        format_market_cap(frame.totals.total_market_cap),
        format_avg_change(frame.totals.avg_change_24h),
    ));
    lines.push(format!(
        "SEARCH: {}   SORT: {}",
        if frame.view.search_term.is_empty() {
            "-"
        } else {
            frame.view.search_term.as_str()
        },
        sort_selector(frame.view.sort_key),
    ));
    lines.push(String::new());

    lines.push(format!(
        "  {:>2}  {:<6} {:<10} {:>14} {:>9} {:>9}  {}",
        "#", "ASSET", "", "PRICE", "24H", "MCAP", "TREND"
    ));

    if frame.rows.is_empty() {
        lines.push("NO ASSETS FOUND".to_string());
    } else {
        lines.extend(frame.rows.iter().map(row));
    }

    lines.push(String::new());
    lines.push(footer(frame));

    lines.join("\n")
}

fn status_bar(frame: &Frame) -> String {
    format!(
        "STATUS: CONNECTED | BLOCK: {} | GAS: {GAS_GWEI} GWEI | {}",
        format_block_height(frame.block_height),
        frame.clock.as_deref().unwrap_or("--:--:--"),
    )
}

/// Glitched titles strike through the first word.
fn title(glitched: bool) -> String {
    if !glitched {
        return format!("{TITLE}{TITLE_SUFFIX}");
    }

    let mut out: String = TITLE.chars().flat_map(|c| [c, '\u{0336}']).collect();
    out.push_str(TITLE_SUFFIX);
    out
}

fn sort_selector(active: SortKey) -> String {
    SortKey::ALL
        .iter()
        .map(|k| {
            if *k == active {
                format!("[{}]", k.label())
            } else {
                k.label().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn row(r: &FrameRow) -> String {
    let rec = &r.record;
    let marker = if r.flashing { '*' } else { ' ' };

    format!(
        "{marker} {:>2}  {:<6} {:<10} {:>14} {:>9} {:>9}  {}",
        r.rank,
        rec.symbol,
        rec.name,
        format!("${}", format_price(rec.price)),
        format_change(rec.change_24h),
        format_market_cap(rec.market_cap),
        sparkline(&rec.trend),
    )
}

/// One block glyph per trend point, on a 0..100 scale.
pub fn sparkline(trend: &TrendHistory) -> String {
    let top = SPARK_BLOCKS.len() - 1;

    trend
        .iter()
        .map(|v| {
            let level = (v / 100.0 * SPARK_BLOCKS.len() as f64).floor();
            SPARK_BLOCKS[(level.max(0.0) as usize).min(top)]
        })
        .collect()
}

fn footer(frame: &Frame) -> String {
    format!(
        "[ LIVE ] • REFRESHING EVERY {}S • {} ASSETS TRACKED",
        frame.tick_interval_ms as f64 / 1000.0,
        frame.totals.asset_count,
    )
}
