//! Page records and pipeline results
//!
//! This module defines the tagged page record produced for every URL and
//! the keyed result set a pipeline run returns.

mod page;
mod result;

pub use page::{
    humanize_slug, last_path_segment, title_from_url, BlogDetails, CategoryDetails, PageKind,
    PagePayload, PageRecord, PlainDetails, ProductDetails,
};
pub use result::{PipelineResult, PipelineStats};
