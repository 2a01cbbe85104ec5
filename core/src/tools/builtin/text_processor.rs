//! Text statistics tool

use crate::error::Result;
use crate::router::TEXT_PROCESSOR;
use crate::tools::{Tool, ToolExample};
use async_trait::async_trait;

/// Reports word, character and case statistics of the whole query
#[derive(Debug, Default)]
pub struct TextProcessorTool;

impl TextProcessorTool {
    pub fn new() -> Self {
        Self
    }

    fn analyze(query: &str) -> String {
        let word_count = query.split_whitespace().count();
        let char_count = query.chars().count();
        let upper_count = query.chars().filter(|c| c.is_uppercase()).count();
        let lower_count = query.chars().filter(|c| c.is_lowercase()).count();

        format!(
            "텍스트 분석 결과:\n\
             - 단어 수: {}\n\
             - 문자 수: {}\n\
             - 대문자 수: {}\n\
             - 소문자 수: {}\n\
             - 대문자로 변환: {}\n\
             - 소문자로 변환: {}",
            word_count,
            char_count,
            upper_count,
            lower_count,
            query.to_uppercase(),
            query.to_lowercase()
        )
    }
}

#[async_trait]
impl Tool for TextProcessorTool {
    fn name(&self) -> &str {
        TEXT_PROCESSOR
    }

    fn description(&self) -> &str {
        "텍스트 처리를 수행합니다. 단어 수 세기, 대소문자 변환 등"
    }

    async fn run(&self, query: &str) -> Result<String> {
        Ok(Self::analyze(query))
    }

    fn examples(&self) -> Vec<ToolExample> {
        vec![ToolExample::new(
            "Analyze a sentence",
            "Hello World 텍스트를 분석해줘",
            "Word, character and case counts",
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_analysis_output() {
        let result = TextProcessorTool::new()
            .run("Hello World 텍스트를 분석해줘")
            .await
            .unwrap();

        assert_eq!(
            result,
            "텍스트 분석 결과:\n\
             - 단어 수: 4\n\
             - 문자 수: 21\n\
             - 대문자 수: 2\n\
             - 소문자 수: 8\n\
             - 대문자로 변환: HELLO WORLD 텍스트를 분석해줘\n\
             - 소문자로 변환: hello world 텍스트를 분석해줘"
        );
    }

    #[test]
    fn test_empty_query() {
        let result = TextProcessorTool::analyze("");
        assert!(result.contains("- 단어 수: 0\n"));
        assert!(result.contains("- 문자 수: 0\n"));
    }
}
