pub mod local;
pub mod seaorm;
