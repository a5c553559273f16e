pub mod achievement;
pub mod dough_style;
pub mod geo;
pub mod pizzeria;
pub mod rating;
pub mod saved;
pub mod user;
