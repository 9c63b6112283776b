pub mod allocation;
pub mod feedback;
pub mod illustration;
pub mod price;
pub mod questionnaire;
pub mod risk;
pub mod session;
pub mod settings;
pub mod simulation;
