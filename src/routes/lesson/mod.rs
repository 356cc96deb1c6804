mod handler;
mod model;

pub use handler::{generate_lesson, parse_lesson};
