//! HTML标签提取器
//! 负责从HTML中提取script-src、元素id、class与外部资源引用

use std::cell::RefCell;
use std::collections::HashSet;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, Tag, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts
};
use markup5ever::interface::Attribute;
use tendril::StrTendril;

/// 解析后的可查询文档
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDocument {
    script_srcs: Vec<String>,
    element_ids: HashSet<String>,
    class_names: HashSet<String>,
    // script/img/iframe/link 的 src/href（文档顺序）
    resource_refs: Vec<String>,
}

impl ParsedDocument {
    /// 任一script src包含子串
    pub fn script_src_contains(&self, needle: &str) -> bool {
        self.script_srcs.iter().any(|src| src.contains(needle))
    }

    /// 存在id完全相等的元素
    pub fn has_element_id(&self, id: &str) -> bool {
        self.element_ids.contains(id)
    }

    /// 存在class列表包含该类名的元素
    pub fn has_class(&self, class_name: &str) -> bool {
        self.class_names.contains(class_name)
    }

    pub fn script_srcs(&self) -> &[String] {
        &self.script_srcs
    }

    /// 外部资源引用（文档顺序）
    pub fn resource_refs(&self) -> &[String] {
        &self.resource_refs
    }
}

#[derive(Debug, Default, Clone)]
pub struct HtmlExtractor {
    document: RefCell<ParsedDocument>,
}

impl TokenSink for HtmlExtractor {
    type Handle = ();

    fn process_token(&self, token: Token, _line: u64) -> TokenSinkResult<()> {
        if let Token::TagToken(Tag {
            kind: TagKind::StartTag,
            name,
            attrs,
            ..
        }) = token
        {
            self.collect_identity(&attrs);

            // 与浏览器一致：这些元素的内容按原始文本处理，字符串里的标签不会被当作元素
            return match name.as_ref() {
                "script" => {
                    self.collect_script_src(&attrs);
                    self.collect_resource(&attrs);
                    TokenSinkResult::RawData(RawKind::ScriptData)
                }
                "iframe" => {
                    self.collect_resource(&attrs);
                    TokenSinkResult::RawData(RawKind::Rawtext)
                }
                "img" | "link" => {
                    self.collect_resource(&attrs);
                    TokenSinkResult::Continue
                }
                "style" | "xmp" | "noembed" | "noframes" | "noscript" => {
                    TokenSinkResult::RawData(RawKind::Rawtext)
                }
                "textarea" | "title" => TokenSinkResult::RawData(RawKind::Rcdata),
                _ => TokenSinkResult::Continue,
            };
        }
        TokenSinkResult::Continue
    }
}

impl HtmlExtractor {
    /// 创建新的提取器
    pub fn new() -> Self {
        Self::default()
    }

    /// 解析HTML，解析错误由分词器容错处理，不会失败
    pub fn parse(html: &str) -> ParsedDocument {
        Self::new().extract(html).document.into_inner()
    }

    /// 从HTML字符串提取标签
    pub fn extract(&self, html: &str) -> Self {
        let tokenizer = Tokenizer::new(self.clone(), TokenizerOpts::default());
        let queue = BufferQueue::default();
        queue.push_back(StrTendril::from(html));

        let _ = tokenizer.feed(&queue);
        tokenizer.end();

        tokenizer.sink
    }

    /// 提取id与class
    fn collect_identity(&self, attrs: &[Attribute]) {
        let mut document = self.document.borrow_mut();
        for attr in attrs {
            match attr.name.local.as_ref() {
                "id" if !attr.value.is_empty() => {
                    document.element_ids.insert(attr.value.to_string());
                }
                "class" => {
                    for class_name in attr.value.split_ascii_whitespace() {
                        document.class_names.insert(class_name.to_string());
                    }
                }
                _ => {}
            }
        }
    }

    /// 提取script-src
    fn collect_script_src(&self, attrs: &[Attribute]) {
        for attr in attrs {
            if attr.name.local.as_ref() == "src" {
                self.document.borrow_mut().script_srcs.push(attr.value.to_string());
                break;
            }
        }
    }

    /// 提取src/href资源引用
    fn collect_resource(&self, attrs: &[Attribute]) {
        let mut document = self.document.borrow_mut();
        for attr in attrs {
            if matches!(attr.name.local.as_ref(), "src" | "href") {
                let value = attr.value.trim();
                if !value.is_empty() {
                    document.resource_refs.push(value.to_string());
                }
            }
        }
    }
}
