pub mod admin;
pub mod attempt;
pub mod health;
pub mod review;
pub mod session;
