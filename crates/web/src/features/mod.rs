pub mod assessments;
pub mod tools;
