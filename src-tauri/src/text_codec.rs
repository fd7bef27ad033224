/*
  文本编码/解码核心（Rust 后端执行）：
  - 需求要求：
    1) 入库前对明文做 Base64 编码，查看时再解码还原
    2) 编码是无密钥的可逆变换：只做混淆，不提供任何保密性（历史原因沿用“加密”叫法，
       不能换成真正的加密算法，否则旧数据库里的数据将无法还原）
    3) 解码失败不允许向上抛错：统一返回占位文本，保证记录列表永远可以展示
  - 错误策略：
    - Base64 解不开 → 返回 DECODE_FAIL_PLACEHOLDER
    - Base64 解开但不是合法 UTF-8 → 按有损方式展示（替换字符），与旧版行为一致
*/

use base64::{engine::general_purpose::STANDARD as B64, Engine};

/// 解码失败时的统一占位文本：展示层直接显示，绝不报错。
pub const DECODE_FAIL_PLACEHOLDER: &str = "!! INVALID DATA !!";

/// 文本编码：明文 → Base64 字符串（入库格式）。
pub fn encode_text(input: &str) -> String {
    B64.encode(input.as_bytes())
}

/// 文本解码：Base64 字符串 → 明文。
///
/// 说明：
/// - 表里的数据可能被外部工具改坏，因此解码必须“永不失败”；
/// - 调用方拿到的要么是原文，要么是占位文本，不需要再做错误处理。
pub fn decode_text(token: &str) -> String {
    match B64.decode(token.trim()) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(_) => DECODE_FAIL_PLACEHOLDER.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_restores_original_text() {
        for text in ["hello", "你好，世界", "line1\nline2", "  spaced  ", "a"] {
            assert_eq!(decode_text(&encode_text(text)), text);
        }
    }

    #[test]
    fn encode_is_plain_base64() {
        assert_eq!(encode_text("hello"), "aGVsbG8=");
    }

    #[test]
    fn decode_invalid_input_yields_placeholder() {
        for garbage in ["this is not base64!!!", "%%%", "aGVsbG8", "===="] {
            assert_eq!(decode_text(garbage), DECODE_FAIL_PLACEHOLDER);
        }
    }

    #[test]
    fn decode_empty_token_is_empty_text() {
        // 空串是合法 Base64（零字节），不应触发占位文本。
        assert_eq!(decode_text(""), "");
    }
}
