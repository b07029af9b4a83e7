use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Upload category. Each one has its own header table, schema and template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordType {
    Students,
    Grades,
    Goals,
}

impl RecordType {
    pub const ALL: [RecordType; 3] = [RecordType::Students, RecordType::Grades, RecordType::Goals];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::Students => "students",
            RecordType::Grades => "grades",
            RecordType::Goals => "goals",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRecordType(pub String);

impl fmt::Display for UnknownRecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown record type '{}'", self.0)
    }
}

impl std::error::Error for UnknownRecordType {}

impl FromStr for RecordType {
    type Err = UnknownRecordType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "students" => Ok(RecordType::Students),
            "grades" => Ok(RecordType::Grades),
            "goals" => Ok(RecordType::Goals),
            other => Err(UnknownRecordType(other.to_string())),
        }
    }
}
