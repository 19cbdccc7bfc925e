//! 响应体编解码工具
//! 探测记录中的响应体以base64文本保存

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// 将原始响应体编码为base64文本
pub fn encode_body(raw: &[u8]) -> String {
    STANDARD.encode(raw)
}

/// 解码base64响应体为文本（非UTF-8字节做有损替换）
///
/// 编码非法时返回 `None`，由调用方按“条件不满足”处理。
pub fn decode_body(encoded: &str) -> Option<String> {
    let bytes = STANDARD.decode(encoded.trim()).ok()?;
    Some(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_body() {
        let encoded = encode_body(b"NoSuchBucket");
        assert_eq!(decode_body(&encoded).as_deref(), Some("NoSuchBucket"));
    }

    #[test]
    fn test_decode_invalid_body() {
        assert_eq!(decode_body("not*base64!"), None);
    }

    #[test]
    fn test_decode_non_utf8_body() {
        let encoded = encode_body(&[0x66, 0x6f, 0xff, 0x6f]);
        assert_eq!(decode_body(&encoded).as_deref(), Some("fo\u{fffd}o"));
    }
}
