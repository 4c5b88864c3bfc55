//! Lesson plan generation

use crate::error::{require, ToolError};
use edugen_ai::Generator;
use edugen_schema::lesson_plan_schema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::info;

pub const DEFAULT_DURATION: &str = "45 mins";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TeachingStyle {
    #[default]
    Interactive,
    LectureBased,
    Collaborative,
    Practical,
}

impl TeachingStyle {
    pub const ALL: [TeachingStyle; 4] = [
        TeachingStyle::Interactive,
        TeachingStyle::LectureBased,
        TeachingStyle::Collaborative,
        TeachingStyle::Practical,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TeachingStyle::Interactive => "Interactive",
            TeachingStyle::LectureBased => "Lecture-based",
            TeachingStyle::Collaborative => "Collaborative",
            TeachingStyle::Practical => "Practical",
        }
    }
}

impl fmt::Display for TeachingStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TeachingStyle {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TeachingStyle::ALL
            .into_iter()
            .find(|style| style.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ToolError::UnknownOption {
                kind: "teaching style",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LessonPlanRequest {
    pub subject: String,
    pub grade: String,
    pub topic: String,
    /// Free text such as "45 mins".
    pub duration: String,
    pub style: TeachingStyle,
}

impl LessonPlanRequest {
    pub fn new(
        subject: impl Into<String>,
        grade: impl Into<String>,
        topic: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            grade: grade.into(),
            topic: topic.into(),
            duration: DEFAULT_DURATION.to_string(),
            style: TeachingStyle::default(),
        }
    }

    pub fn validate(&self) -> Result<(), ToolError> {
        require(&self.subject, "subject")?;
        require(&self.grade, "grade")?;
        require(&self.topic, "topic")?;
        require(&self.duration, "duration")
    }

    pub fn build_prompt(&self) -> String {
        format!(
            "Generate a structured lesson plan for {subject}, Grade {grade}, on the topic \"{topic}\". \
             The duration is {duration}. Teaching style should be {style}. \
             Format it as JSON with fields: objectives (array), activities (array), teachingMethod (string), and assessment (string).",
            subject = self.subject,
            grade = self.grade,
            topic = self.topic,
            duration = self.duration,
            style = self.style,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonPlanOutput {
    pub objectives: Vec<String>,
    pub activities: Vec<String>,
    pub teaching_method: String,
    pub assessment: String,
}

impl LessonPlanOutput {
    /// Plain-text export of the plan, headed by the request it answers.
    pub fn render_text(&self, request: &LessonPlanRequest) -> String {
        format!(
            "LESSON PLAN: {topic} ({subject} - Grade {grade})\n\n\
             OBJECTIVES:\n{objectives}\n\n\
             ACTIVITIES:\n{activities}\n\n\
             TEACHING METHOD:\n{method}\n\n\
             ASSESSMENT:\n{assessment}",
            topic = request.topic,
            subject = request.subject,
            grade = request.grade,
            objectives = bullet_list(&self.objectives),
            activities = bullet_list(&self.activities),
            method = self.teaching_method,
            assessment = self.assessment,
        )
    }
}

fn bullet_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("- {}", item))
        .collect::<Vec<_>>()
        .join("\n")
}

pub async fn generate_lesson_plan(
    generator: &Generator,
    request: &LessonPlanRequest,
) -> Result<LessonPlanOutput, ToolError> {
    request.validate()?;

    let plan: LessonPlanOutput = generator
        .generate_structured(&request.build_prompt(), lesson_plan_schema())
        .await?;

    info!(
        "Generated lesson plan for '{}' with {} objectives and {} activities",
        request.topic,
        plan.objectives.len(),
        plan.activities.len()
    );
    Ok(plan)
}
