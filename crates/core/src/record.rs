use serde::{Deserialize, Serialize};

/// Structured attendance data recovered from one scanned timecard.
///
/// Every field defaults to the empty string, never `None`: downstream
/// consumers (form pre-fill, CSV/spreadsheet export) read the fields directly
/// and must not have to distinguish "absent" from "empty". Serialized field
/// names are camelCase to match the wire shape the export layer expects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    /// Alphanumeric employee identifier.
    pub employee_id: String,
    /// Human name, 2–20 script characters once extracted.
    pub employee_name: String,
    /// Organizational unit, often ending in 部/課/室/チーム/グループ.
    pub department: String,
    /// Canonical `YYYY-MM-DD`, or `YYYY-MM` when only an era year+month was
    /// recovered, or the raw matched substring if normalization failed.
    pub work_date: String,
    /// Canonical `HH:MM`, 24-hour.
    pub start_time: String,
    /// Canonical `HH:MM`, 24-hour.
    pub end_time: String,
    /// Break duration in whole minutes, rendered as a decimal string.
    pub break_time: String,
    /// Free text.
    pub remarks: String,
    /// Reconstructed, human-readable transcript of the sheet. This is the
    /// text a reviewer edits downstream; the structured fields above are
    /// secondary whenever it is non-empty.
    pub formatted_text: String,
}

impl AttendanceRecord {
    /// Whether the scan produced anything a human can work with.
    ///
    /// A non-empty reconstructed transcript satisfies this on its own,
    /// regardless of the individual structured fields; otherwise any single
    /// populated field does.
    pub fn is_usable(&self) -> bool {
        if !self.formatted_text.trim().is_empty() {
            return true;
        }
        [
            &self.employee_id,
            &self.employee_name,
            &self.department,
            &self.work_date,
            &self.start_time,
            &self.end_time,
            &self.break_time,
            &self.remarks,
        ]
        .iter()
        .any(|field| !field.is_empty())
    }
}
