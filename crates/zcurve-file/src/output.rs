//! 运行结果写出

use crate::error::FileError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use zcurve_core::pipeline::RunOutput;
use zcurve_core::placement::{PlacementAnchor, PlacementRequest};
use zcurve_core::work::CurveWork;

/// 被跳过的放置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedPlacement {
    pub identity: String,
    pub anchor: PlacementAnchor,
    pub reason: String,
}

/// 可序列化的运行结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputDocument {
    pub elements: Vec<CurveWork>,
    pub placements: Vec<PlacementRequest>,
    pub skipped: Vec<SkippedPlacement>,
}

impl From<&RunOutput> for OutputDocument {
    fn from(output: &RunOutput) -> Self {
        Self {
            elements: output.elements().cloned().collect(),
            placements: output.placements.clone(),
            skipped: output
                .errors
                .iter()
                .map(|error| SkippedPlacement {
                    identity: error.identity.to_string(),
                    anchor: error.anchor,
                    reason: error.source.to_string(),
                })
                .collect(),
        }
    }
}

/// 把运行结果以 JSON 写入任意输出流
pub fn write_output(output: &RunOutput, writer: impl Write) -> Result<(), FileError> {
    let document = OutputDocument::from(output);
    serde_json::to_writer_pretty(writer, &document)?;
    Ok(())
}

/// 保存运行结果到文件
pub fn save_output(output: &RunOutput, path: &Path) -> Result<(), FileError> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_output(output, &mut writer)?;
    writer.flush()?;

    tracing::info!(
        "Saved {} elements, {} placements to {}",
        output.element_count(),
        output.placements.len(),
        path.display()
    );

    Ok(())
}
