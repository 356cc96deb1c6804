//! 语音合成前的发音修正
//!
//! 部分语音引擎会读错连续的拗音与长音, 合成前按顺序执行若干替换表。
//! 规则集可以从 JSON 文件加载, 以便不同的合成后端使用各自的修正表。

pub mod rules;

use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum PhoneticError {
    #[error("failed to read phonetic rules: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid phonetic rules: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplacementRule {
    pub from: String,
    pub to: String,
}

/// 一轮替换, 规则按定义顺序执行, 靠前的规则优先
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplacementTable {
    pub name: String,
    pub rules: Vec<ReplacementRule>,
}

impl ReplacementTable {
    pub fn apply(&self, text: &str) -> String {
        self.rules
            .iter()
            .filter(|rule| !rule.from.is_empty())
            .fold(text.to_string(), |acc, rule| {
                if acc.contains(&rule.from) {
                    acc.replace(&rule.from, &rule.to)
                } else {
                    acc
                }
            })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneticRuleset {
    pub passes: Vec<ReplacementTable>,
}

impl PhoneticRuleset {
    pub fn new(passes: Vec<ReplacementTable>) -> Self {
        Self { passes }
    }

    /// 日语合成引擎的默认修正: 先拗音, 后长音
    pub fn japanese_tts() -> Self {
        Self::new(vec![rules::contracted_sounds(), rules::long_vowels()])
    }

    pub fn from_json(json: &str) -> Result<Self, PhoneticError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PhoneticError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn preprocess(&self, text: &str) -> String {
        self.passes
            .iter()
            .fold(text.to_string(), |acc, table| table.apply(&acc))
    }

    pub fn rule_count(&self) -> usize {
        self.passes.iter().map(|table| table.rules.len()).sum()
    }
}
