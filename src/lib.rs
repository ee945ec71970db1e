pub mod api;
pub mod builder;
pub mod error;
pub mod lexer;
pub mod options;
pub mod path;
pub mod render;
pub mod utils;
pub mod value;
mod serialization;

pub use api::{parse, parse_named, parse_with, Parsed};
pub use builder::build;
pub use error::{AccessError, Error, ParseError, ParseFailure};
pub use lexer::tokenize;
pub use options::{DuplicateKeys, ParseOptions};
pub use path::{get_path, get_path_mut, remove_path, set_path};
pub use render::{render, render_pretty};
pub use value::{Value, ValueKind};
