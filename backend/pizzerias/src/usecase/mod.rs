pub mod achievements;
pub mod contracts;
pub mod discovery;
pub mod dough_styles;
pub mod error;
pub mod jwt;
pub mod overpass;
pub mod pizzerias;
pub mod ratings;
pub mod saved;
pub mod users;
