use super::*;

mod dom;
mod html;

pub(crate) use html::parse_html;
