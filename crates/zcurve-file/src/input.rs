//! 运行输入读取
//!
//! 输入为 JSON 对象：
//!
//! ```json
//! {
//!   "parameter": 0.25,
//!   "overrides": {
//!     "lines": {
//!       "additions": [{ "id": "a", "value": { "start": [0, 0, 0], "end": [10, 0, 0] } }],
//!       "removals": ["b"],
//!       "edits": []
//!     }
//!   },
//!   "config": { "include_baseline": false }
//! }
//! ```

use crate::error::FileError;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use zcurve_core::pipeline::RunInput;

/// 从文件加载运行输入
pub fn load_input(path: &Path) -> Result<RunInput, FileError> {
    let reader = BufReader::new(File::open(path)?);
    let input: RunInput = serde_json::from_reader(reader)?;
    validate(&input)?;

    tracing::info!(
        "Loaded {} override records (parameter {}) from {}",
        input.overrides.record_count(),
        input.parameter,
        path.display()
    );

    Ok(input)
}

/// 从字符串解析运行输入
pub fn parse_input(text: &str) -> Result<RunInput, FileError> {
    let input: RunInput = serde_json::from_str(text)?;
    validate(&input)?;
    Ok(input)
}

fn validate(input: &RunInput) -> Result<(), FileError> {
    if !input.parameter.is_finite() || !(0.0..=1.0).contains(&input.parameter) {
        return Err(FileError::InvalidInput(format!(
            "parameter {} is outside [0, 1]",
            input.parameter
        )));
    }
    if input.config.placement.size <= 0.0 || input.config.placement.sub_size <= 0.0 {
        return Err(FileError::InvalidInput(
            "marker sizes must be positive".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zcurve_core::curve::Curve;
    use zcurve_core::pipeline::run;

    const SAMPLE: &str = r#"{
        "parameter": 0.25,
        "overrides": {
            "lines": {
                "additions": [{ "id": "a", "value": { "start": [0, 0, 0], "end": [10, 0, 0] } }],
                "removals": ["b"]
            },
            "beziers": {
                "edits": [{ "id": "z", "value": { "vertices": [[0, 0, 0], [1, 2, 0], [2, 0, 0]] } }]
            }
        },
        "config": { "include_baseline": false, "placement": { "size": 2.0 } }
    }"#;

    #[test]
    fn test_parse_sample() {
        let input = parse_input(SAMPLE).unwrap();
        assert_eq!(input.parameter, 0.25);
        assert_eq!(input.overrides.lines.additions.len(), 1);
        assert_eq!(input.overrides.lines.removals[0].as_str(), "b");
        assert_eq!(input.overrides.beziers.edits.len(), 1);
        assert_eq!(input.overrides.beziers.edits[0].value.polyline().vertex_count(), 3);
        assert!(input.overrides.polylines.is_empty());
        assert!(!input.config.include_baseline);
        assert_eq!(input.config.placement.size, 2.0);
        // 未给出的字段使用默认值
        assert_eq!(input.config.placement.sub_size, 0.5);
        assert_eq!(input.config.ellipse_divisions, 40);

        let added = &input.overrides.lines.additions[0].value;
        assert!((Curve::Line(added.clone()).length() - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_object_uses_defaults() {
        let input = parse_input("{}").unwrap();
        assert_eq!(input.parameter, 0.0);
        assert!(input.overrides.is_empty());
        assert!(input.config.include_baseline);
    }

    #[test]
    fn test_parameter_out_of_range() {
        let result = parse_input(r#"{ "parameter": 1.5 }"#);
        assert!(matches!(result, Err(FileError::InvalidInput(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let input = load_input(file.path()).unwrap();
        assert_eq!(input.overrides.record_count(), 3);
    }

    #[test]
    fn test_tangent_step_not_configurable() {
        let input = parse_input(
            r#"{
                "parameter": 0.5,
                "overrides": {
                    "lines": { "additions": [{ "id": "a", "value": { "start": [0, 0, 0], "end": [4, 0, 0] } }] }
                },
                "config": { "include_baseline": false, "placement": { "probe_epsilon": 0 } }
            }"#,
        )
        .unwrap();

        let output = run(&input, Vec::new());
        assert!(output.errors.is_empty(), "{:?}", output.errors);
        assert_eq!(output.placements.len(), 1);
        assert!((output.placements[0].direction.x - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(parse_input("{ not json"), Err(FileError::Json(_))));
    }
}
