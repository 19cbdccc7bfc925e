//! 工具模块
pub mod body_codec;
pub mod domain;

pub use self::body_codec::{decode_body, encode_body};
pub use self::domain::split_host;
