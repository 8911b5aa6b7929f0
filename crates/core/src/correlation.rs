//! Pearson correlation matrix across score columns, for the secondary
//! report output.

use std::collections::BTreeMap;

use crate::records::AssetRecord;

/// Correlation of score columns over currently listed assets, as Pearson r
/// scaled by 100 and rounded to integer. Columns are every category score,
/// every per-metric level, and the total. Entries with undefined correlation
/// (zero variance or fewer than two listed assets) are `None`.
///
/// Unlisted assets are excluded: their venue-dependent columns are zeroed
/// by construction and would only manufacture spurious correlation.
#[must_use]
pub fn score_correlation_matrix(
    records: &[AssetRecord],
) -> BTreeMap<String, BTreeMap<String, Option<i64>>> {
    let listed: Vec<&AssetRecord> = records.iter().filter(|r| r.max_leverage > 0).collect();

    let mut columns: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for record in &listed {
        for (name, value) in &record.category_scores {
            columns.entry(name.clone()).or_default().push(f64::from(*value));
        }
        for (name, value) in &record.metric_levels {
            columns.entry(name.clone()).or_default().push(f64::from(*value));
        }
        columns.entry("Score".to_string()).or_default().push(record.score);
    }

    let mut matrix = BTreeMap::new();
    for (row_name, row_values) in &columns {
        let mut row = BTreeMap::new();
        for (col_name, col_values) in &columns {
            let cell = pearson(row_values, col_values).map(|r| (r * 100.0).round() as i64);
            row.insert(col_name.clone(), cell);
        }
        matrix.insert(row_name.clone(), row);
    }
    matrix
}

/// Pearson correlation coefficient; `None` when undefined.
fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys.iter()) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        covariance += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denominator = (var_x * var_y).sqrt();
    if denominator < f64::EPSILON {
        return None;
    }
    Some(covariance / denominator)
}
