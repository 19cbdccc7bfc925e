//! 提取模块：从响应体中提取匹配所需的字段
pub mod html_extractor;

pub use self::html_extractor::{TitleExtractor, extract_title};
