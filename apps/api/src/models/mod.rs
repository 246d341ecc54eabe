pub mod cv;
pub mod lenient;
pub mod template;
