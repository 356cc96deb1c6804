use std::sync::LazyLock;

use regex::Regex;

use super::annotation::{parse_spans, to_reading, to_surface};
use super::markers::{Heading, SectionMarkers};
use super::models::{AnnotatedSpan, ParseReport, ParsedContent, Section, VocabularyEntry};

static ENUMERATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\s*").expect("enumeration pattern is valid"));

const MEANING_SEPARATOR: &str = " - ";

/// 解析生成的学习内容
///
/// 单次顺序扫描, 只向后看一行。格式不完整的条目直接跳过, 解析本身不会失败。
#[derive(Debug, Clone, Default)]
pub struct ContentParser {
    markers: SectionMarkers,
}

impl ContentParser {
    pub fn new(markers: SectionMarkers) -> Self {
        Self { markers }
    }

    pub fn markers(&self) -> &SectionMarkers {
        &self.markers
    }

    pub fn parse(&self, raw: &str) -> ParsedContent {
        self.parse_with_report(raw).0
    }

    pub fn parse_with_report(&self, raw: &str) -> (ParsedContent, ParseReport) {
        let lines: Vec<&str> = raw.lines().map(str::trim).collect();
        let mut content = ParsedContent::default();
        let mut report = ParseReport::default();
        let mut section = Section::None;

        for (index, line) in lines.iter().enumerate() {
            if let Some(heading) = self.markers.classify(line) {
                section = match heading {
                    Heading::Words => Section::Words,
                    Heading::Phrases => Section::Phrases,
                    Heading::Dialogue => Section::None,
                };
                continue;
            }

            let target = match section {
                Section::Words => &mut content.words,
                Section::Phrases => &mut content.phrases,
                Section::None => continue,
            };
            let Some(body) = ENUMERATION.find(line).map(|m| &line[m.end()..]) else {
                continue;
            };

            let lookahead = lines.get(index + 1).copied();
            match self.parse_entry(body, lookahead) {
                Some(entry) => {
                    target.push(entry);
                    report.accepted += 1;
                }
                None => {
                    tracing::debug!("skipping malformed entry on line {}: {}", index + 1, line);
                    report.dropped += 1;
                }
            }
        }

        (content, report)
    }

    fn parse_entry(&self, body: &str, lookahead: Option<&str>) -> Option<VocabularyEntry> {
        let (annotated, meaning) = body.rsplit_once(MEANING_SEPARATOR)?;

        let (example, example_translation) = lookahead
            .and_then(|next| self.markers.strip_example_prefix(next))
            .map(split_example)
            .unwrap_or_default();

        let entry = VocabularyEntry {
            surface_form: to_surface(annotated),
            reading: to_reading(annotated),
            meaning: meaning.trim().to_string(),
            example,
            example_translation,
        };
        entry.is_valid().then_some(entry)
    }

    /// 去掉单字与片语分区以及对话标题, 保留其余内容
    pub fn filter_residual(&self, raw: &str) -> String {
        let mut skipping = false;
        let mut kept: Vec<&str> = Vec::new();

        for line in raw.lines() {
            match self.markers.classify(line) {
                Some(Heading::Words | Heading::Phrases) => skipping = true,
                Some(Heading::Dialogue) => skipping = false,
                None if !skipping => kept.push(line),
                None => {}
            }
        }

        let is_filler = |line: &&str| {
            let trimmed = line.trim();
            trimmed.is_empty() || is_horizontal_rule(trimmed)
        };
        let start = kept.iter().position(|line| !is_filler(line)).unwrap_or(kept.len());
        let end = kept.iter().rposition(|line| !is_filler(line)).map_or(start, |i| i + 1);

        kept[start..end].join("\n").trim().to_string()
    }
}

// `例文 - 翻譯`, 没有翻译时只保留例句
fn split_example(text: &str) -> (Vec<AnnotatedSpan>, String) {
    match text.rsplit_once(MEANING_SEPARATOR) {
        Some((sentence, translation)) => (parse_spans(sentence.trim()), translation.trim().to_string()),
        None => (parse_spans(text.trim()), String::new()),
    }
}

fn is_horizontal_rule(line: &str) -> bool {
    line.len() >= 3
        && (line.chars().all(|c| c == '-')
            || line.chars().all(|c| c == '*')
            || line.chars().all(|c| c == '='))
}

/// 使用默认分区标题解析
pub fn parse(raw: &str) -> ParsedContent {
    ContentParser::default().parse(raw)
}

pub fn filter_residual(raw: &str) -> String {
    ContentParser::default().filter_residual(raw)
}
