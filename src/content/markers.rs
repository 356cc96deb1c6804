/// 可识别的分区标题
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heading {
    Words,
    Phrases,
    Dialogue,
}

/// 分区标题与例句前缀
///
/// 标题行去掉 Markdown 修饰(`#`、`**`、`【】`、结尾冒号)后与关键字比较, 忽略 ASCII 大小写;
/// 关键字后面允许跟括号说明, 如 `關聯單字 (Vocabulary)`。
#[derive(Debug, Clone)]
pub struct SectionMarkers {
    pub words: Vec<String>,
    pub phrases: Vec<String>,
    pub dialogue: Vec<String>,
    pub example_prefixes: Vec<String>,
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| (*item).to_string()).collect()
}

impl Default for SectionMarkers {
    fn default() -> Self {
        Self {
            words: owned(&[
                "關聯單字",
                "相關單字",
                "关联单词",
                "相关单词",
                "単語",
                "vocabulary",
                "related words",
                "words",
            ]),
            phrases: owned(&[
                "重要片語",
                "實用片語",
                "片語",
                "重要短语",
                "实用短语",
                "フレーズ",
                "important phrases",
                "useful phrases",
                "phrases",
            ]),
            dialogue: owned(&[
                "情境對話",
                "對話",
                "情景对话",
                "对话",
                "会話",
                "dialogue",
                "conversation",
            ]),
            example_prefixes: owned(&["例句", "例文", "例", "example", "ex"]),
        }
    }
}

fn heading_text(line: &str) -> &str {
    line.trim()
        .trim_start_matches(|c: char| matches!(c, '#' | '*' | '【' | '[' | '>') || c.is_whitespace())
        .trim_end_matches(|c: char| {
            matches!(c, '*' | '】' | ']' | ':' | '：') || c.is_whitespace()
        })
}

fn is_decorated(line: &str) -> bool {
    line.trim_start()
        .starts_with(|c: char| matches!(c, '#' | '*' | '【' | '['))
}

// `1.`、`2)`、`一、` 这类编号
fn strip_enumeration(text: &str) -> &str {
    let rest = text.trim_start_matches(|c: char| {
        c.is_ascii_digit()
            || matches!(c, '一' | '二' | '三' | '四' | '五' | '六' | '七' | '八' | '九' | '十')
    });
    if rest.len() == text.len() {
        return text;
    }
    rest.strip_prefix(|c: char| matches!(c, '.' | '．' | '、' | ')' | '）'))
        .map(str::trim_start)
        .unwrap_or(text)
}

fn matches_keyword(text: &str, keyword: &str) -> bool {
    let Some(head) = text.get(..keyword.len()) else {
        return false;
    };
    if !head.eq_ignore_ascii_case(keyword) {
        return false;
    }
    let rest = text[keyword.len()..].trim_start();
    rest.is_empty()
        || (rest.starts_with(['(', '（']) && rest.ends_with([')', '）']))
}

impl SectionMarkers {
    pub fn classify(&self, line: &str) -> Option<Heading> {
        let mut text = heading_text(line);
        // 编号只在带标题修饰时去掉, 否则会和词条行混淆
        if is_decorated(line) {
            text = strip_enumeration(text);
        }
        if text.is_empty() {
            return None;
        }
        let hit = |keywords: &Vec<String>| keywords.iter().any(|k| matches_keyword(text, k));

        if hit(&self.words) {
            Some(Heading::Words)
        } else if hit(&self.phrases) {
            Some(Heading::Phrases)
        } else if hit(&self.dialogue) {
            Some(Heading::Dialogue)
        } else {
            None
        }
    }

    /// 例句行去掉 `例句：` 之类的前缀后返回剩余内容
    pub fn strip_example_prefix<'a>(&self, line: &'a str) -> Option<&'a str> {
        let line = line
            .trim()
            .trim_start_matches(|c: char| matches!(c, '-' | '*' | '•' | '・') || c.is_whitespace());

        self.example_prefixes.iter().find_map(|prefix| {
            let head = line.get(..prefix.len())?;
            if !head.eq_ignore_ascii_case(prefix) {
                return None;
            }
            let rest = line[prefix.len()..].trim_start();
            rest.strip_prefix(':')
                .or_else(|| rest.strip_prefix('：'))
                .map(str::trim)
        })
    }
}
