//! CSV Output
//!
//! One row per calibrated A² value, in draw order, alongside its value after
//! folding around the distribution mean.

use adphase_stats::{NullDistribution, fold_around_mean};

const HEADER: &str = "index,statistic,folded_statistic";

/// Render the null distribution as CSV
pub fn generate_csv_report(null: &NullDistribution) -> String {
    let (_, folded) = fold_around_mean(&null.values);

    let mut output = String::with_capacity(HEADER.len() + 1 + null.values.len() * 40);
    output.push_str(HEADER);
    output.push('\n');

    for (index, (raw, folded)) in null.values.iter().zip(&folded).enumerate() {
        output.push_str(&format!("{},{},{}\n", index, raw, folded));
    }

    output
}
