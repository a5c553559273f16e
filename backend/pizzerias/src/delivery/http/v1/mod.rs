pub mod achievements;
pub mod admin;
pub mod middleware;
pub mod pizzerias;
pub mod ratings;
pub mod saved;
pub mod styles;
pub mod users;
