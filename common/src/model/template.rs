use crate::model::record_type::RecordType;
use serde::{Deserialize, Serialize};

/// Describes one downloadable example spreadsheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateInfo {
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub name: String,
    pub description: String,
    pub file_name: String,
}
