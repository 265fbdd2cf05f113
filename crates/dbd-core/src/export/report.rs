use super::serialization::write_text_artifact;
use crate::domain::{DbdError, DbdResult};
use crate::model::Evaluation;
use std::path::Path;

pub fn report_json(evaluation: &Evaluation) -> DbdResult<String> {
    serde_json::to_string_pretty(evaluation).map_err(|source| {
        DbdError::internal(
            "SYS.REPORT_SERIALIZE",
            format!("failed to encode evaluation report: {source}"),
        )
    })
}

pub fn write_report(path: &Path, evaluation: &Evaluation) -> DbdResult<()> {
    write_text_artifact(path, &report_json(evaluation)?)?;
    tracing::info!(path = %path.display(), "wrote evaluation report");
    Ok(())
}
