pub mod analytics;
pub mod dashboard;
pub mod goal;
pub mod grade;
pub mod record_type;
pub mod student;
pub mod template;
pub mod upload;
