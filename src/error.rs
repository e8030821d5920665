use thiserror::Error;

/// Errors that can occur while reading observations or predicting growth.
#[derive(Error, Debug)]
pub enum GrowthError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Analysis error: {0}")]
    AnalysisError(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message_kind(err: &GrowthError) -> &str {
        let msg = err.to_string();
        match msg.split_once(':') {
            Some((kind, _)) => match kind {
                "IO error" => "io",
                "CSV error" => "csv",
                "JSON error" => "json",
                "Config error" => "config",
                "Parse error" => "parse",
                "Validation error" => "validation",
                "Analysis error" => "analysis",
                "Insufficient data" => "data",
                _ => "unknown",
            },
            None => "unknown",
        }
    }

    #[test]
    fn test_string_variants_prefix_their_kind() {
        let cases = [
            (GrowthError::ParseError("Unknown sex: 'x'".into()), "parse"),
            (GrowthError::ValidationError("weight must be positive".into()), "validation"),
            (GrowthError::AnalysisError("no finite error".into()), "analysis"),
            (GrowthError::InsufficientData("got 1".into()), "data"),
        ];
        for (err, kind) in &cases {
            assert_eq!(message_kind(err), *kind, "{err}");
        }
        assert_eq!(
            GrowthError::InsufficientData("got 1".into()).to_string(),
            "Insufficient data: got 1"
        );
    }

    #[test]
    fn test_csv_row_error_converts() {
        let mut rdr = csv::Reader::from_reader("date,weight\n2026-01-08,heavy\n".as_bytes());
        let row: Result<(String, f64), csv::Error> = rdr.deserialize().next().unwrap();
        let err: GrowthError = row.unwrap_err().into();
        assert!(matches!(err, GrowthError::Csv(_)));
        assert_eq!(message_kind(&err), "csv");
    }

    #[test]
    fn test_observation_json_error_converts() {
        let parsed: Result<Vec<crate::models::WeightObservation>, _> =
            serde_json::from_str(r#"[{"date": "2026-01-08"}]"#);
        let err: GrowthError = parsed.unwrap_err().into();
        assert!(matches!(err, GrowthError::Json(_)));
        assert!(err.to_string().contains("weight"));
    }

    #[test]
    fn test_config_toml_error_converts() {
        let parsed: Result<toml::Value, _> = toml::from_str("[forecast\nstep_days = 7");
        let err: GrowthError = parsed.unwrap_err().into();
        assert!(matches!(err, GrowthError::Toml(_)));
        assert_eq!(message_kind(&err), "config");
    }

    #[test]
    fn test_io_error_converts() {
        let err: GrowthError =
            std::io::Error::new(std::io::ErrorKind::NotFound, "weights.csv").into();
        assert!(matches!(err, GrowthError::Io(_)));
        assert!(err.to_string().ends_with("weights.csv"));
    }
}
