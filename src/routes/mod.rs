pub mod health;
pub mod interview_routes;
