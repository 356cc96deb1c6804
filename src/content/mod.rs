// 学习内容解析模块
// 把生成的注音文本转换为单字与片语条目

pub mod annotation;
pub mod markers;
pub mod models;
pub mod parser;

pub use markers::{Heading, SectionMarkers};
pub use models::{AnnotatedSpan, ParseReport, ParsedContent, Section, VocabularyEntry};
pub use parser::{ContentParser, filter_residual, parse};
