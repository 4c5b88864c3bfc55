//! Question paper generation

use crate::error::{require, ToolError};
use edugen_ai::Generator;
use edugen_schema::question_paper_schema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{info, warn};

pub const DEFAULT_TOTAL_MARKS: u32 = 50;
pub const DEFAULT_QUESTION_TYPE: &str = "Mixed";
pub const TIME_ALLOWED: &str = "3 Hours";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ToolError::UnknownOption {
                kind: "difficulty",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuestionPaperRequest {
    pub subject: String,
    pub grade: String,
    /// Topics or focus area, free text.
    pub topic: String,
    pub total_marks: u32,
    pub difficulty: Difficulty,
    /// Preferred question type, e.g. "Mixed", "MCQ", "Short answer".
    pub question_type: String,
}

impl QuestionPaperRequest {
    pub fn new(
        subject: impl Into<String>,
        grade: impl Into<String>,
        topic: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            grade: grade.into(),
            topic: topic.into(),
            total_marks: DEFAULT_TOTAL_MARKS,
            difficulty: Difficulty::default(),
            question_type: DEFAULT_QUESTION_TYPE.to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), ToolError> {
        require(&self.subject, "subject")?;
        require(&self.grade, "grade")?;
        require(&self.topic, "topic")?;
        require(&self.question_type, "question type")?;
        if self.total_marks == 0 {
            return Err(ToolError::InvalidTotalMarks);
        }
        Ok(())
    }

    pub fn build_prompt(&self) -> String {
        format!(
            "Create a question paper for {subject}, Grade {grade}, focusing on \"{topic}\". \
             Total marks: {marks}. Difficulty level: {difficulty}. Question type preference: {kind}. \
             Format as JSON with fields: title, instructions, and questions (array of objects with number, text, marks, type).",
            subject = self.subject,
            grade = self.grade,
            topic = self.topic,
            marks = self.total_marks,
            difficulty = self.difficulty,
            kind = self.question_type,
        )
    }
}

/// Numbers and marks stay `f64` to match the NUMBER schema fields, so half
/// marks survive. `Display` prints whole values without a trailing `.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub number: f64,
    pub text: String,
    pub marks: f64,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionPaperOutput {
    pub title: String,
    pub instructions: String,
    pub questions: Vec<Question>,
}

impl QuestionPaperOutput {
    /// Sum of the marks of every question.
    pub fn total_marks(&self) -> f64 {
        self.questions.iter().map(|q| q.marks).sum()
    }

    /// Printable paper with the request's header details.
    pub fn render_text(&self, request: &QuestionPaperRequest) -> String {
        let mut lines = vec![
            self.title.clone(),
            format!("Subject: {}", request.subject),
            format!("Class: {}", request.grade),
            format!("Time Allowed: {}", TIME_ALLOWED),
            format!("Total Marks: {}", request.total_marks),
            String::new(),
            format!("Instructions: {}", self.instructions),
            String::new(),
        ];

        for question in &self.questions {
            lines.push(format!(
                "Q{}. {} [{} marks] ({})",
                question.number, question.text, question.marks, question.kind
            ));
        }

        lines.push(String::new());
        lines.push("End of Question Paper".to_string());
        lines.join("\n")
    }
}

pub async fn generate_question_paper(
    generator: &Generator,
    request: &QuestionPaperRequest,
) -> Result<QuestionPaperOutput, ToolError> {
    request.validate()?;

    let paper: QuestionPaperOutput = generator
        .generate_structured(&request.build_prompt(), question_paper_schema())
        .await?;

    let awarded = paper.total_marks();
    if awarded != f64::from(request.total_marks) {
        warn!(
            "Question marks add up to {} but {} were requested",
            awarded, request.total_marks
        );
    }
    info!(
        "Generated question paper '{}' with {} questions",
        paper.title,
        paper.questions.len()
    );
    Ok(paper)
}
