//! Configuration section definitions.

mod images;
mod inline;
mod minify;
mod paths;

pub use images::ImagesConfig;
pub use inline::InlineConfig;
pub use minify::MinifyConfig;
pub use paths::PathsConfig;
