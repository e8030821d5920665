mod tables;
mod charts;

pub use tables::{
    format_prediction_summary, print_prediction_summary,
    format_prediction_table, print_prediction_table,
    format_breed_table, print_breed_table,
};
pub use charts::{format_weight_chart, print_weight_chart};
