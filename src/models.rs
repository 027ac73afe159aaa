//! The fixed catalog of selectable completion models.

use std::fmt;

/// One of the models the completion endpoint accepts. The API identifier is
/// an opaque string as far as this crate is concerned; the label is what the
/// toolbar and footer show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelId {
    DeepseekChatV31,
    GptOss20b,
    Llama33_8bInstruct,
}

impl ModelId {
    pub const ALL: [ModelId; 3] = [
        ModelId::DeepseekChatV31,
        ModelId::GptOss20b,
        ModelId::Llama33_8bInstruct,
    ];

    /// Identifier sent over the wire.
    pub fn api_id(self) -> &'static str {
        match self {
            ModelId::DeepseekChatV31 => "deepseek/deepseek-chat-v3.1:free",
            ModelId::GptOss20b => "openai/gpt-oss-20b:free",
            ModelId::Llama33_8bInstruct => "meta-llama/llama-3.3-8b-instruct:free",
        }
    }

    /// Human-readable label for toolbars and footers.
    pub fn label(self) -> &'static str {
        match self {
            ModelId::DeepseekChatV31 => "DeepSeek Chat V3.1 (Free)",
            ModelId::GptOss20b => "GPT-OSS-20B (Free)",
            ModelId::Llama33_8bInstruct => "LLaMA 3.3 8B (Free)",
        }
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_ids_are_pairwise_distinct() {
        for (i, a) in ModelId::ALL.iter().enumerate() {
            for b in ModelId::ALL.iter().skip(i + 1) {
                assert_ne!(a.api_id(), b.api_id());
                assert_ne!(a.label(), b.label());
            }
        }
    }

    #[test]
    fn display_matches_label() {
        for model in ModelId::ALL {
            assert_eq!(model.to_string(), model.label());
        }
    }
}
