//! HTML标题提取器
//! 负责从HTML中提取第一个title标签的文本

use std::cell::{Cell, RefCell};
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, Tag, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts
};
use tendril::StrTendril;

#[derive(Debug, Default, Clone)]
pub struct TitleExtractor {
    in_title: Cell<bool>,
    finished: Cell<bool>,
    title: RefCell<Option<String>>,
}

impl TokenSink for TitleExtractor {
    type Handle = ();

    fn process_token(&self, token: Token, _line: u64) -> TokenSinkResult<()> {
        if self.finished.get() {
            return TokenSinkResult::Continue;
        }

        match token {
            Token::TagToken(Tag { kind: TagKind::StartTag, name, self_closing, .. }) if !self_closing => {
                // 按HTML规范切换原始文本状态，脚本与样式中的标签不会被当作title
                match &*name {
                    "title" => {
                        self.in_title.set(true);
                        self.title.borrow_mut().get_or_insert_with(String::new);
                        return TokenSinkResult::RawData(RawKind::Rcdata);
                    }
                    "textarea" => return TokenSinkResult::RawData(RawKind::Rcdata),
                    "script" => return TokenSinkResult::RawData(RawKind::ScriptData),
                    "style" | "xmp" | "iframe" | "noembed" | "noframes" => {
                        return TokenSinkResult::RawData(RawKind::Rawtext);
                    }
                    _ => {}
                }
            }
            Token::TagToken(Tag { kind: TagKind::EndTag, name, .. }) if &*name == "title" => {
                // 只取第一个title
                if self.in_title.get() {
                    self.in_title.set(false);
                    self.finished.set(true);
                }
            }
            Token::CharacterTokens(text) if self.in_title.get() => {
                if let Some(title) = self.title.borrow_mut().as_mut() {
                    title.push_str(&text);
                }
            }
            _ => {}
        }
        TokenSinkResult::Continue
    }
}

impl TitleExtractor {
    /// 创建新的提取器
    pub fn new() -> Self {
        Self::default()
    }

    /// 从HTML字符串提取标题
    pub fn extract(&self, html: &str) -> Self {
        let tokenizer = Tokenizer::new(self.clone(), TokenizerOpts::default());
        let queue = BufferQueue::default();
        queue.push_back(StrTendril::from(html));

        let _ = tokenizer.feed(&queue);
        tokenizer.end();

        tokenizer.sink
    }

    /// 获取提取到的标题（仅去除首尾空白，空标题视为缺失）
    pub fn get_title(&self) -> Option<String> {
        self.title
            .borrow()
            .as_ref()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    }
}

/// 从原始响应体提取标题（非UTF-8字节做有损替换）
pub fn extract_title(body: &[u8]) -> Option<String> {
    let html = String::from_utf8_lossy(body);
    TitleExtractor::new().extract(&html).get_title()
}
