use serde::{Deserialize, Serialize};

/// 注音文本的最小单位: 普通文本或 `漢字(かな)` 形式的注音
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnnotatedSpan {
    Plain { text: String },
    Ruby { base: String, reading: String },
}

impl AnnotatedSpan {
    pub fn plain(text: impl Into<String>) -> Self {
        AnnotatedSpan::Plain { text: text.into() }
    }

    pub fn ruby(base: impl Into<String>, reading: impl Into<String>) -> Self {
        AnnotatedSpan::Ruby {
            base: base.into(),
            reading: reading.into(),
        }
    }

    /// 还原为带注音的原始写法
    pub fn markup(&self) -> String {
        match self {
            AnnotatedSpan::Plain { text } => text.clone(),
            AnnotatedSpan::Ruby { base, reading } => format!("{base}({reading})"),
        }
    }
}

pub fn render_spans(spans: &[AnnotatedSpan]) -> String {
    spans.iter().map(AnnotatedSpan::markup).collect()
}

/// 当前所在的分区
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Section {
    #[default]
    None,
    Words,
    Phrases,
}

/// 单字或片语条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyEntry {
    pub surface_form: String,
    pub reading: String,
    pub meaning: String,
    pub example: Vec<AnnotatedSpan>,
    pub example_translation: String,
}

impl VocabularyEntry {
    pub fn example_text(&self) -> String {
        render_spans(&self.example)
    }

    pub fn is_valid(&self) -> bool {
        !self.surface_form.is_empty() && !self.reading.is_empty() && !self.meaning.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedContent {
    pub words: Vec<VocabularyEntry>,
    pub phrases: Vec<VocabularyEntry>,
}

impl ParsedContent {
    pub fn len(&self) -> usize {
        self.words.len() + self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty() && self.phrases.is_empty()
    }
}

/// 解析统计, 格式不完整的条目会被跳过并计入 `dropped`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ParseReport {
    pub accepted: usize,
    pub dropped: usize,
}
