pub mod feedback_log;
