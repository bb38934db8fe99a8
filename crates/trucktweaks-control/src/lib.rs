mod output;
mod performer;

pub use output::{MouseButton, Output};
pub use performer::Performer;
