#![allow(clippy::format_push_string)]

use hl_screen_core::{AssetRecord, Recommendation};

/// Renders the top of the record set as a fixed-width summary table.
#[must_use]
pub fn format_records(records: &[AssetRecord], top: usize) -> String {
    let mut output = String::new();

    output.push('\n');
    output.push_str("═══════════════════════════════════════════════════════════════\n");
    output.push_str("                    SCREENING RESULTS                          \n");
    output.push_str("═══════════════════════════════════════════════════════════════\n");
    output.push_str(&format!(
        "{:<4} {:<12} {:>5} {:>7} {:>8}  {}\n",
        "#", "Symbol", "Lev", "Strict", "Score", "Recommendation"
    ));
    output.push_str("───────────────────────────────────────────────────────────────\n");

    for (rank, record) in records.iter().take(top).enumerate() {
        output.push_str(&format!(
            "{:<4} {:<12} {:>5} {:>7} {:>8.1}  {}\n",
            rank + 1,
            record.coin,
            record.max_leverage,
            if record.strict { "yes" } else { "" },
            record.score,
            record.recommendation.label(),
        ));
    }

    output.push_str("───────────────────────────────────────────────────────────────\n");
    let count = |rec: Recommendation| records.iter().filter(|r| r.recommendation == rec).count();
    output.push_str(&format!(
        "{} assets | list: {}  inc: {}  dec: {}  delist: {}\n",
        records.len(),
        count(Recommendation::List),
        count(Recommendation::IncreaseLeverage),
        count(Recommendation::DecreaseLeverage),
        count(Recommendation::Delist),
    ));

    output
}
