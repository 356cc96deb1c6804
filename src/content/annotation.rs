use std::sync::LazyLock;

use regex::Regex;

use super::models::AnnotatedSpan;

// 漢字(かな) / 漢字（かな）
static RUBY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([\p{Han}々〆ヶ]+)[(（]([\p{Hiragana}\p{Katakana}ー]+)[)）]")
        .expect("ruby pattern is valid")
});

// HTML 标签、Markdown 强调与反引号
static MARKUP_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>|\*\*|__|\*|`").expect("markup pattern is valid"));

fn strip_markup(text: &str) -> String {
    MARKUP_PATTERN.replace_all(text, "").trim().to_string()
}

/// 把注音换成假名, 得到整段读音
pub fn to_reading(text: &str) -> String {
    strip_markup(&RUBY_PATTERN.replace_all(text, "$2"))
}

/// 去掉注音, 只保留原文
pub fn to_surface(text: &str) -> String {
    strip_markup(&RUBY_PATTERN.replace_all(text, "$1"))
}

/// 拆分为普通文本与注音片段
pub fn parse_spans(text: &str) -> Vec<AnnotatedSpan> {
    let mut spans = Vec::new();
    let mut cursor = 0;

    for caps in RUBY_PATTERN.captures_iter(text) {
        let (Some(whole), Some(base), Some(reading)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            continue;
        };
        if whole.start() > cursor {
            spans.push(AnnotatedSpan::plain(&text[cursor..whole.start()]));
        }
        spans.push(AnnotatedSpan::ruby(base.as_str(), reading.as_str()));
        cursor = whole.end();
    }
    if cursor < text.len() {
        spans.push(AnnotatedSpan::plain(&text[cursor..]));
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::models::render_spans;

    #[test]
    fn derives_reading_and_surface() {
        let text = "商品(しょうひん)は人気(にんき)";
        assert_eq!(to_reading(text), "しょうひんはにんき");
        assert_eq!(to_surface(text), "商品は人気");
    }

    #[test]
    fn accepts_full_width_parentheses_and_markup() {
        assert_eq!(to_reading("**勉強（べんきょう）する**"), "べんきょうする");
        assert_eq!(to_surface("<b>勉強（べんきょう）</b>する"), "勉強する");
    }

    #[test]
    fn ignores_non_kana_parentheticals() {
        assert_eq!(to_reading("人気(noun)"), "人気(noun)");
        assert_eq!(to_surface("人気(noun)"), "人気(noun)");
    }

    #[test]
    fn splits_spans_in_order() {
        let spans = parse_spans("この商品(しょうひん)は人気(にんき)です。");
        assert_eq!(
            spans,
            vec![
                AnnotatedSpan::plain("この"),
                AnnotatedSpan::ruby("商品", "しょうひん"),
                AnnotatedSpan::plain("は"),
                AnnotatedSpan::ruby("人気", "にんき"),
                AnnotatedSpan::plain("です。"),
            ]
        );
        assert_eq!(render_spans(&spans), "この商品(しょうひん)は人気(にんき)です。");
    }

    #[test]
    fn plain_text_is_a_single_span() {
        assert_eq!(parse_spans("はい"), vec![AnnotatedSpan::plain("はい")]);
        assert!(parse_spans("").is_empty());
    }
}
