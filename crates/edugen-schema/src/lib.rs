//! Edugen Schema - response shapes for generated teaching artifacts
//!
//! This crate provides:
//! - A closed, recursive schema descriptor type
//! - The registry of the three artifact schemas (attendance insights,
//!   lesson plan, question paper)
//! - Structural validation of parsed JSON against a descriptor

pub mod descriptor;
pub mod registry;
pub mod validation;

pub use descriptor::{SchemaDescriptor, SchemaKind};
pub use registry::{
    attendance_insight_schema, lesson_plan_schema, lookup, question_paper_schema, SchemaName,
    UnknownSchema,
};
pub use validation::{SchemaViolation, ViolationKind};
