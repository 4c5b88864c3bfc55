//! Registry of the artifact schemas

use crate::descriptor::SchemaDescriptor;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;

static ATTENDANCE_INSIGHT: LazyLock<SchemaDescriptor> = LazyLock::new(|| {
    SchemaDescriptor::object(
        [
            (
                "summary",
                SchemaDescriptor::string()
                    .describe("A summary of today's attendance patterns and concerns."),
            ),
            (
                "notifications",
                SchemaDescriptor::array(SchemaDescriptor::object(
                    [
                        ("studentName", SchemaDescriptor::string()),
                        (
                            "draftEmail",
                            SchemaDescriptor::string()
                                .describe("Professional draft to parents regarding absence."),
                        ),
                    ],
                    &["studentName", "draftEmail"],
                )),
            ),
        ],
        &["summary", "notifications"],
    )
});

static LESSON_PLAN: LazyLock<SchemaDescriptor> = LazyLock::new(|| {
    SchemaDescriptor::object(
        [
            (
                "objectives",
                SchemaDescriptor::array(SchemaDescriptor::string())
                    .describe("List of learning objectives"),
            ),
            (
                "activities",
                SchemaDescriptor::array(SchemaDescriptor::string())
                    .describe("List of classroom activities"),
            ),
            (
                "teachingMethod",
                SchemaDescriptor::string().describe("Proposed teaching methodology"),
            ),
            (
                "assessment",
                SchemaDescriptor::string().describe("Methods for assessing student understanding"),
            ),
        ],
        &["objectives", "activities", "teachingMethod", "assessment"],
    )
});

static QUESTION_PAPER: LazyLock<SchemaDescriptor> = LazyLock::new(|| {
    SchemaDescriptor::object(
        [
            ("title", SchemaDescriptor::string()),
            ("instructions", SchemaDescriptor::string()),
            (
                "questions",
                SchemaDescriptor::array(SchemaDescriptor::object(
                    [
                        ("number", SchemaDescriptor::number()),
                        ("text", SchemaDescriptor::string()),
                        ("marks", SchemaDescriptor::number()),
                        ("type", SchemaDescriptor::string()),
                    ],
                    &["number", "text", "marks", "type"],
                )),
            ),
        ],
        &["title", "instructions", "questions"],
    )
});

/// Shape of the attendance summary plus parent notification drafts.
pub fn attendance_insight_schema() -> &'static SchemaDescriptor {
    &ATTENDANCE_INSIGHT
}

/// Shape of a generated lesson plan.
pub fn lesson_plan_schema() -> &'static SchemaDescriptor {
    &LESSON_PLAN
}

/// Shape of a generated question paper.
pub fn question_paper_schema() -> &'static SchemaDescriptor {
    &QUESTION_PAPER
}

/// Names under which the registry schemas can be looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaName {
    AttendanceInsights,
    LessonPlan,
    QuestionPaper,
}

impl SchemaName {
    pub const ALL: [SchemaName; 3] = [
        SchemaName::AttendanceInsights,
        SchemaName::LessonPlan,
        SchemaName::QuestionPaper,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SchemaName::AttendanceInsights => "attendance-insights",
            SchemaName::LessonPlan => "lesson-plan",
            SchemaName::QuestionPaper => "question-paper",
        }
    }

    pub fn descriptor(self) -> &'static SchemaDescriptor {
        match self {
            SchemaName::AttendanceInsights => attendance_insight_schema(),
            SchemaName::LessonPlan => lesson_plan_schema(),
            SchemaName::QuestionPaper => question_paper_schema(),
        }
    }
}

impl fmt::Display for SchemaName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown schema '{0}' (expected one of: attendance-insights, lesson-plan, question-paper)")]
pub struct UnknownSchema(pub String);

impl FromStr for SchemaName {
    type Err = UnknownSchema;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SchemaName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| UnknownSchema(s.to_string()))
    }
}

/// Look up a registry schema by its kebab-case name.
pub fn lookup(name: &str) -> Option<&'static SchemaDescriptor> {
    name.parse::<SchemaName>().ok().map(SchemaName::descriptor)
}
