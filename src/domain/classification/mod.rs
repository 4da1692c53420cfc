//! Content and URL classification through a generative model

mod category;
mod classifier;
mod prompt;

pub use category::UrlCategory;
pub use classifier::{has_http_scheme, Classifier, UrlVerdict, CONTENT_FALLBACK, URL_FALLBACK};
pub use prompt::{content_prompt, url_prompt};
