pub mod ar_viewer;
pub mod assessment;
pub mod assistant;
pub mod dashboard;
pub mod generator;
pub mod login;
