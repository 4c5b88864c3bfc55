//! Edugen Tools - the teacher-facing generation workflows
//!
//! Each workflow assembles a prompt from a typed request, asks the
//! generator for schema-constrained JSON, and parses the reply into its
//! typed output.

pub mod attendance;
pub mod error;
pub mod lesson_plan;
pub mod question_paper;

pub use attendance::{
    generate_insights, AttendanceInsights, AttendanceRoster, AttendanceStats, AttendanceStatus,
    ParentNotification, StudentAttendance,
};
pub use error::ToolError;
pub use lesson_plan::{generate_lesson_plan, LessonPlanOutput, LessonPlanRequest, TeachingStyle};
pub use question_paper::{
    generate_question_paper, Difficulty, Question, QuestionPaperOutput, QuestionPaperRequest,
};
