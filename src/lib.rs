pub(crate) use thiserror::Error as ImplError;

// --------------------------------------------------

mod config;
mod params;
mod segment;
mod template;
mod tokenizer;

pub use config::{DelimiterConfig, DelimiterError};
pub use params::{Param, Params, ParamsDeserializerError, ParamsIter};
pub use template::{RouteTemplate, TemplateError};
