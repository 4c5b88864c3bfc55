//! Attendance roster and AI attendance insights

use crate::error::ToolError;
use chrono::NaiveDate;
use edugen_ai::{parse_structured, GenerationError, Generator};
use edugen_schema::attendance_insight_schema;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentAttendance {
    pub id: String,
    pub name: String,
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttendanceStats {
    pub total: usize,
    pub present: usize,
    pub absent: usize,
    pub late: usize,
}

/// One day's attendance for a class.
#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceRoster {
    pub date: NaiveDate,
    pub students: Vec<StudentAttendance>,
}

impl AttendanceRoster {
    pub fn new(date: NaiveDate, students: Vec<StudentAttendance>) -> Self {
        Self { date, students }
    }

    pub fn stats(&self) -> AttendanceStats {
        let count = |status| self.students.iter().filter(|s| s.status == status).count();
        AttendanceStats {
            total: self.students.len(),
            present: count(AttendanceStatus::Present),
            absent: count(AttendanceStatus::Absent),
            late: count(AttendanceStatus::Late),
        }
    }

    pub fn absent_names(&self) -> Vec<&str> {
        self.students
            .iter()
            .filter(|s| s.status == AttendanceStatus::Absent)
            .map(|s| s.name.as_str())
            .collect()
    }

    /// Update one student's status. Returns false if the id is unknown.
    pub fn set_status(&mut self, id: &str, status: AttendanceStatus) -> bool {
        match self.students.iter_mut().find(|s| s.id == id) {
            Some(student) => {
                student.status = status;
                true
            }
            None => false,
        }
    }

    /// Students whose name contains `query`, ignoring case.
    pub fn search(&self, query: &str) -> Vec<&StudentAttendance> {
        let query = query.to_lowercase();
        self.students
            .iter()
            .filter(|s| s.name.to_lowercase().contains(&query))
            .collect()
    }

    /// Late students count as neither present nor absent.
    pub fn build_prompt(&self) -> String {
        let stats = self.stats();
        let absent = self.absent_names();
        let absent_list = if absent.is_empty() {
            "none".to_string()
        } else {
            absent.join(", ")
        };

        format!(
            "Review the following attendance for today ({date}):\n\
             Total students: {total},\n\
             Present: {present},\n\
             Absent: {absent_list}.\n\
             Provide a concise AI summary and draft professional parent notification emails for each absent student.",
            date = self.date.format("%Y-%m-%d"),
            total = stats.total,
            present = stats.present,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentNotification {
    pub student_name: String,
    pub draft_email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceInsights {
    pub summary: String,
    pub notifications: Vec<ParentNotification>,
}

impl AttendanceInsights {
    pub fn render_text(&self) -> String {
        let mut sections = vec![format!("SUMMARY:\n{}", self.summary)];
        for notification in &self.notifications {
            sections.push(format!(
                "NOTIFICATION: {}\n{}",
                notification.student_name, notification.draft_email
            ));
        }
        sections.join("\n\n")
    }
}

/// Parse a sanitized insights reply.
///
/// An object carrying neither `summary` nor `notifications` (including the
/// `{}` substituted for an empty reply) means "no insights".
pub fn parse_insights(text: &str) -> Result<Option<AttendanceInsights>, GenerationError> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    if let Some(fields) = value.as_object() {
        if !fields.contains_key("summary") && !fields.contains_key("notifications") {
            return Ok(None);
        }
    }
    parse_structured(text, attendance_insight_schema()).map(Some)
}

/// Ask the model for a summary of the roster and parent notification drafts.
pub async fn generate_insights(
    generator: &Generator,
    roster: &AttendanceRoster,
) -> Result<Option<AttendanceInsights>, ToolError> {
    let prompt = roster.build_prompt();
    let text = generator
        .generate(&prompt, Some(attendance_insight_schema()))
        .await?;
    let insights = parse_insights(&text)?;

    match &insights {
        Some(i) => info!(
            "Generated attendance insights with {} notifications",
            i.notifications.len()
        ),
        None => info!("Model returned no attendance insights"),
    }
    Ok(insights)
}
