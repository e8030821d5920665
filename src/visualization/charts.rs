use colored::Colorize;

use crate::models::{GrowthPredictionResult, PointKind};

const BAR_WIDTH: usize = 40;

/// Format a text bar chart of the weight timeline as a string. Observed
/// weights are drawn in green, predictions in blue.
pub fn format_weight_chart(result: &GrowthPredictionResult) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n{}\n", "Weight Curve".bold().green()));
    output.push_str(&format!("{}\n", "=".repeat(60)));

    if result.predictions.is_empty() {
        output.push_str("  No data available.\n");
        return output;
    }

    let max_weight = result
        .predictions
        .iter()
        .map(|p| p.weight)
        .fold(0.0f64, f64::max);

    output.push_str(&format!("  {:>6}  {:>8}  Weight\n", "Day", "kg"));
    output.push_str(&format!("  {}\n", "-".repeat(60)));

    for point in &result.predictions {
        let bar_len = if max_weight > 0.0 {
            ((point.weight / max_weight) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        let bar = match point.kind {
            PointKind::Observed => "\u{2588}".repeat(bar_len).green(),
            PointKind::Predicted => "\u{2592}".repeat(bar_len).blue(),
        };

        output.push_str(&format!(
            "  {:>6}  {:>8.2}  {}\n",
            point.age_in_days, point.weight, bar
        ));
    }

    output.push('\n');
    output
}

/// Print the weight timeline chart.
pub fn print_weight_chart(result: &GrowthPredictionResult) {
    print!("{}", format_weight_chart(result));
}
