pub mod model;
mod render;

pub use render::{render_http, HttpRequest};
