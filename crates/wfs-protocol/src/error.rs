//! Parse errors for WFS responses and GML fragments.

use plot_common::PlotError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("XML error at position {position}: {message}")]
    Xml { position: usize, message: String },

    #[error("Unclosed element <{0}>")]
    UnclosedElement(String),

    #[error("Document has no root element")]
    NoRootElement,

    #[error("Element nesting exceeds {limit} levels at position {position}")]
    TooDeep { limit: usize, position: usize },

    #[error("Failed to serialize fragment: {0}")]
    Serialize(String),
}

impl From<ParseError> for PlotError {
    fn from(err: ParseError) -> Self {
        PlotError::ParseFailure(err.to_string())
    }
}
