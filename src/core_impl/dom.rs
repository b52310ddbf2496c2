use super::html::is_void_tag;
use super::*;

mod class_and_query;
mod selector_matching;
mod style_and_layout;
mod text_and_dump;
