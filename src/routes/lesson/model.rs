use serde::{Deserialize, Serialize};

use crate::content::{ParseReport, VocabularyEntry};

#[derive(Debug, Deserialize)]
pub struct ParseLessonRequest {
    pub raw_text: String,
}

#[derive(Debug, Serialize)]
pub struct ParseLessonResponse {
    pub words: Vec<VocabularyEntry>,
    pub phrases: Vec<VocabularyEntry>,
    pub dialogue: String,
    pub report: ParseReport,
}
