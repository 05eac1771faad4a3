pub mod formatter;

pub use formatter::{
    format_age, format_json, format_matrix, format_metric_list, format_score, format_scorecard,
    format_tsv, should_use_colors, truncate,
};
