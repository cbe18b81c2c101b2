//! Analysis tasks and their fixed instructions.
//!
//! Each task pairs one accessibility-oriented instruction with the names used
//! for it on the wire and in storage.

use sightmate_core::RecordKind;

/// The analyses a client can request for an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalysisTask {
    Objects,
    Currency,
    Text,
    Colors,
}

const OBJECTS_PROMPT: &str = "\
You are an AI assistant helping visually impaired people. Analyze this image and describe what you see in a clear, helpful way.

Focus on:
1. Main objects and their approximate locations (left, right, center, near, far)
2. People (how many, what they're doing, approximate distance)
3. Important details for navigation and safety
4. Any text or signs visible

Keep the description concise but informative. Speak as if you're helping someone navigate their environment.
Start with the most important things they should know about first.";

const CURRENCY_PROMPT: &str = "\
You are helping a visually impaired person identify money and currency.

Analyze this image and tell me:
1. Any paper bills - what denomination and currency (dollars, euros, etc.)
2. Any coins - what type and value
3. Any digital displays showing amounts
4. Any credit cards or payment cards visible

Be very specific about amounts and currency types. If you can't clearly identify the denomination, say so.
Speak as if you're directly helping them handle their money safely.";

const TEXT_PROMPT: &str = "\
You are helping a visually impaired person read text.

Extract ALL text from this image and organize it in a clear, readable way.
- If it's a document, read it in logical order (top to bottom, left to right)
- If it's a sign or label, be clear about what it says
- If text is partially obscured or unclear, mention that
- Include any numbers, prices, or important details

Present the text as if you're reading it aloud to help them understand the content.";

const COLORS_PROMPT: &str = "\
You are helping a visually impaired person understand colors in their environment.

Analyze this image and describe:
1. The main colors you see (be specific: light blue, dark red, etc.)
2. What objects have which colors
3. The overall lighting (bright, dim, natural light, artificial light)
4. Any color patterns or interesting color combinations

Speak clearly and be descriptive about the colors as if helping someone visualize their surroundings.";

impl AnalysisTask {
    pub const ALL: [AnalysisTask; 4] = [Self::Objects, Self::Currency, Self::Text, Self::Colors];

    /// Instruction sent to the model alongside the image.
    pub fn prompt(&self) -> &'static str {
        match self {
            Self::Objects => OBJECTS_PROMPT,
            Self::Currency => CURRENCY_PROMPT,
            Self::Text => TEXT_PROMPT,
            Self::Colors => COLORS_PROMPT,
        }
    }

    /// Value of `type` in API responses.
    pub fn response_type(&self) -> &'static str {
        match self {
            Self::Objects => "objects",
            Self::Currency => "currency",
            Self::Text => "text",
            Self::Colors => "colors",
        }
    }

    /// Response and record field carrying the model's text.
    pub fn result_field(&self) -> &'static str {
        match self {
            Self::Objects | Self::Currency => "description",
            Self::Text => "text_content",
            Self::Colors => "color_description",
        }
    }

    pub fn record_kind(&self) -> RecordKind {
        match self {
            Self::Objects => RecordKind::ObjectDetection,
            Self::Currency => RecordKind::CurrencyDetection,
            Self::Text => RecordKind::TextReading,
            Self::Colors => RecordKind::ColorDetection,
        }
    }

    /// Human-readable name used in error messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Objects => "Object detection",
            Self::Currency => "Currency detection",
            Self::Text => "Text reading",
            Self::Colors => "Color detection",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_task_has_a_distinct_prompt() {
        let prompts: std::collections::HashSet<_> =
            AnalysisTask::ALL.iter().map(|t| t.prompt()).collect();
        assert_eq!(prompts.len(), 4);
        assert!(AnalysisTask::ALL
            .iter()
            .all(|t| t.prompt().contains("visually impaired")));
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(AnalysisTask::Text.response_type(), "text");
        assert_eq!(AnalysisTask::Text.result_field(), "text_content");
        assert_eq!(AnalysisTask::Text.record_kind(), RecordKind::TextReading);
        assert_eq!(AnalysisTask::Colors.result_field(), "color_description");
        assert_eq!(AnalysisTask::Currency.result_field(), "description");
    }
}
