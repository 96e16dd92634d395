//! Storage module for template/data loading and preview export

mod md;
mod parser;
mod writer;

pub use md::{markdown_content, write_markdown};
pub use parser::{
    parse_data, parse_data_content, parse_empty_range, parse_template, parse_template_content,
};
pub use writer::{listing_content, write_listing};
