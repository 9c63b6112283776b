pub mod allocation_service;
pub mod market_data_service;
pub mod scoring_service;
pub mod simulation_service;
