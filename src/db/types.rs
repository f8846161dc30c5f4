use serde::{Deserialize, Serialize};
use sqlx::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "kebab-case")]
#[sqlx(type_name = "studentstatus", rename_all = "kebab-case")]
pub(crate) enum StudentStatus {
    Online,
    NeedHelp,
    Absent,
}
