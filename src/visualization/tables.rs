use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, ContentArrangement, Table};

use crate::models::{BreedTable, GrowthPredictionResult, PointKind};

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

/// Format the headline figures of a prediction as a string.
pub fn format_prediction_summary(result: &GrowthPredictionResult) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n{}\n", "Growth Prediction".bold().green()));
    output.push_str(&format!(
        "{}\n",
        format!("Breed: {} | Method: {}", result.breed.name, result.source).dimmed()
    ));
    output.push_str(&format!("{}\n", "=".repeat(50)));

    let mut table = new_table(vec!["Metric", "Value", "Unit"]);

    if let Some(current) = result.current() {
        table.add_row(vec![
            Cell::new("Current Weight"),
            Cell::new(format!("{:.2}", current.weight)),
            Cell::new("kg"),
        ]);
        table.add_row(vec![
            Cell::new("Current Age"),
            Cell::new(format!("{}", current.age_in_days)),
            Cell::new("days"),
        ]);
    }
    table.add_row(vec![
        Cell::new("Growth Phase"),
        Cell::new(result.current_growth_phase.to_string()),
        Cell::new(""),
    ]);
    table.add_row(vec![
        Cell::new("Weekly Growth"),
        Cell::new(format!("{:.2}", result.current_weekly_growth_rate)),
        Cell::new("kg/week"),
    ]);
    table.add_row(vec![
        Cell::new("Predicted Adult Weight"),
        Cell::new(format!("{:.1}", result.predicted_adult_weight)),
        Cell::new("kg"),
    ]);
    table.add_row(vec![
        Cell::new("Estimated Maturity"),
        Cell::new(format!("{}", result.estimated_maturity_age_days)),
        Cell::new("days"),
    ]);
    table.add_row(vec![
        Cell::new("R²"),
        Cell::new(format!("{:.3}", result.fit_quality.r_squared)),
        Cell::new(""),
    ]);
    table.add_row(vec![
        Cell::new("RMSE"),
        Cell::new(format!("{:.3}", result.fit_quality.rmse)),
        Cell::new("kg"),
    ]);

    output.push_str(&format!("{table}"));
    output
}

/// Print the prediction summary table.
pub fn print_prediction_summary(result: &GrowthPredictionResult) {
    print!("{}", format_prediction_summary(result));
}

/// Format every timeline point with its confidence bounds as a string.
pub fn format_prediction_table(result: &GrowthPredictionResult) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n{}\n", "Weight Timeline".bold().green()));
    output.push_str(&format!("{}\n", "=".repeat(70)));

    let mut table = new_table(vec!["Date", "Age (days)", "Weight (kg)", "Kind", "Lower", "Upper"]);

    let mut band_index = 0;
    for point in &result.predictions {
        let (lower, upper) = match point.kind {
            PointKind::Observed => (String::new(), String::new()),
            PointKind::Predicted => {
                let bounds = (
                    result.confidence_band.lower.get(band_index),
                    result.confidence_band.upper.get(band_index),
                );
                band_index += 1;
                match bounds {
                    (Some(lo), Some(hi)) => (format!("{lo:.2}"), format!("{hi:.2}")),
                    _ => (String::new(), String::new()),
                }
            }
        };
        table.add_row(vec![
            Cell::new(point.date.to_string()),
            Cell::new(format!("{}", point.age_in_days)),
            Cell::new(format!("{:.2}", point.weight)),
            Cell::new(point.kind.to_string()),
            Cell::new(lower),
            Cell::new(upper),
        ]);
    }

    output.push_str(&format!("{table}"));
    output
}

/// Print the weight timeline table.
pub fn print_prediction_table(result: &GrowthPredictionResult) {
    print!("{}", format_prediction_table(result));
}

/// Format the breed category table as a string.
pub fn format_breed_table(table: &BreedTable) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n{}\n", "Breed Categories".bold().green()));
    output.push_str(&format!("{}\n", "=".repeat(70)));

    let mut rendered = new_table(vec![
        "Category",
        "Male (kg)",
        "Female (kg)",
        "Maturity (months)",
        "Phase Ends (weeks)",
    ]);

    for row in table.sorted() {
        rendered.add_row(vec![
            Cell::new(row.category.to_string()),
            Cell::new(format!("{:.1}-{:.1}", row.male.min, row.male.max)),
            Cell::new(format!("{:.1}-{:.1}", row.female.min, row.female.max)),
            Cell::new(format!("{:.0}", row.maturity_months)),
            Cell::new(format!(
                "{:.0}/{:.0}/{:.0}",
                row.phases.rapid_growth_end_weeks,
                row.phases.steady_growth_end_weeks,
                row.phases.slowing_growth_end_weeks
            )),
        ]);
    }

    output.push_str(&format!("{rendered}"));
    output
}

/// Print the breed category table.
pub fn print_breed_table(table: &BreedTable) {
    print!("{}", format_breed_table(table));
}
