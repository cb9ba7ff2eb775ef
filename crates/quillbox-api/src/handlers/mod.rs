pub mod browse;
pub mod health;
pub mod upload;
