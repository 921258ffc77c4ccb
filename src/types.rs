// types.rs - Inputs and outputs of the generation operations
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Idea stage output
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoIdea {
    pub title: String,
    pub concept: String,
}

/// Script stage inputs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptBrief {
    pub niche: String,
    pub tone: String,
    pub length: ScriptLength,
}

impl Default for ScriptBrief {
    fn default() -> Self {
        Self {
            niche: String::new(),
            tone: "Engaging and Energetic".to_string(),
            length: ScriptLength::new("8-10 minutes"),
        }
    }
}

/// Free-form length label as picked by the user ("Short (5 min)", "8-10 minutes", "15+ minutes")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScriptLength(String);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthTarget {
    pub min_words: u32,
    pub sections: u32,
}

impl ScriptLength {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn label(&self) -> &str {
        &self.0
    }

    /// Minimum narration length and body section count for this bucket
    pub fn target(&self) -> LengthTarget {
        if self.0.contains("15+") {
            LengthTarget { min_words: 5000, sections: 10 }
        } else if self.0.contains("8-10") {
            LengthTarget { min_words: 3000, sections: 7 }
        } else if self.0.contains("Short") {
            LengthTarget { min_words: 1500, sections: 4 }
        } else {
            LengthTarget { min_words: 1500, sections: 5 }
        }
    }
}

impl fmt::Display for ScriptLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Speaking-style knobs, passed to the TTS model as plain-language directions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceCustomization {
    pub accent: String,
    pub age: String,
    pub pacing: String,
}

impl Default for VoiceCustomization {
    fn default() -> Self {
        Self {
            accent: "Neutral".to_string(),
            age: "Default".to_string(),
            pacing: "Normal".to_string(),
        }
    }
}

impl VoiceCustomization {
    /// Style fragments for every knob that differs from its neutral value
    pub fn directives(&self) -> Vec<String> {
        let mut styles = Vec::new();
        if !self.accent.is_empty() && self.accent != "Neutral" {
            styles.push(format!("{} accent", self.accent));
        }
        if !self.age.is_empty() && self.age != "Default" {
            styles.push(format!("{} voice", self.age));
        }
        if !self.pacing.is_empty() && self.pacing != "Normal" {
            styles.push(format!("speak {}", self.pacing));
        }
        styles
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrebuiltVoice {
    pub name: &'static str,
    pub gender: &'static str,
    pub style: &'static str,
}

pub const DEFAULT_VOICE: &str = "Kore";

pub const PREBUILT_VOICES: [PrebuiltVoice; 5] = [
    PrebuiltVoice { name: "Puck", gender: "Male", style: "Deep, Storytelling" },
    PrebuiltVoice { name: "Charon", gender: "Male", style: "Authoritative, News" },
    PrebuiltVoice { name: "Kore", gender: "Female", style: "Calm, Soothing" },
    PrebuiltVoice { name: "Fenrir", gender: "Male", style: "Energetic, Intense" },
    PrebuiltVoice { name: "Zephyr", gender: "Female", style: "Friendly, Conversational" },
];

pub const ACCENTS: [&str; 6] = ["Neutral", "American", "British", "Australian", "Indian", "Transatlantic"];
pub const AGES: [&str; 5] = ["Default", "Youthful", "Mid-Life", "Elderly", "Gravelly"];
pub const PACING: [&str; 4] = ["Normal", "Fast", "Slow", "Dramatic Pause"];

pub fn find_voice(name: &str) -> Option<&'static PrebuiltVoice> {
    PREBUILT_VOICES.iter().find(|v| v.name.eq_ignore_ascii_case(name))
}

/// Target platform for the visual prompts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VideoPlatform {
    #[default]
    Veo,
    Sora,
    Wan,
    Grok,
    Midjourney,
    Runway,
}

impl VideoPlatform {
    pub const ALL: [VideoPlatform; 6] = [
        VideoPlatform::Veo,
        VideoPlatform::Sora,
        VideoPlatform::Wan,
        VideoPlatform::Grok,
        VideoPlatform::Midjourney,
        VideoPlatform::Runway,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            VideoPlatform::Veo => "Veo 3.1",
            VideoPlatform::Sora => "Sora 2.0",
            VideoPlatform::Wan => "Wan 2.2",
            VideoPlatform::Grok => "Grok AI",
            VideoPlatform::Midjourney => "Midjourney (Video)",
            VideoPlatform::Runway => "Runway Gen-3",
        }
    }

    /// Case-insensitive match on the display name or its first word
    pub fn parse(value: &str) -> Option<Self> {
        let wanted = value.trim().to_lowercase();
        Self::ALL.into_iter().find(|p| {
            let name = p.display_name().to_lowercase();
            name == wanted || name.split_whitespace().next() == Some(wanted.as_str())
        })
    }
}

impl fmt::Display for VideoPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Visual-prompt stage inputs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptBrief {
    pub platform: VideoPlatform,
    pub count: u32,
}

impl Default for PromptBrief {
    fn default() -> Self {
        Self {
            platform: VideoPlatform::default(),
            count: 5,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeoMetadata {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThumbnailConcept {
    pub headline: String,
    pub visual_description: String,
    pub reasoning: String,
}

/// Target publish date and time for the launch schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishSlot {
    pub date: NaiveDate,
    pub time: NaiveTime,
}

impl PublishSlot {
    pub fn new(date: NaiveDate, time: NaiveTime) -> Self {
        Self { date, time }
    }

    /// Parse `YYYY-MM-DD` and `HH:MM`
    pub fn parse(date: &str, time: &str) -> Result<Self, chrono::ParseError> {
        Ok(Self {
            date: NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")?,
            time: NaiveTime::parse_from_str(time.trim(), "%H:%M")?,
        })
    }

    pub fn date_label(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    pub fn time_label(&self) -> String {
        self.time.format("%H:%M").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_buckets() {
        assert_eq!(ScriptLength::new("15+ minutes").target(), LengthTarget { min_words: 5000, sections: 10 });
        assert_eq!(ScriptLength::new("8-10 minutes").target(), LengthTarget { min_words: 3000, sections: 7 });
        assert_eq!(ScriptLength::new("Short (5 min)").target(), LengthTarget { min_words: 1500, sections: 4 });
        assert_eq!(ScriptLength::new("about 12 minutes").target(), LengthTarget { min_words: 1500, sections: 5 });
    }

    #[test]
    fn test_customization_directives_skip_neutral_values() {
        assert!(VoiceCustomization::default().directives().is_empty());

        let custom = VoiceCustomization {
            accent: "British".into(),
            age: "Elderly".into(),
            pacing: "Slow".into(),
        };
        assert_eq!(custom.directives(), vec!["British accent", "Elderly voice", "speak Slow"]);
    }

    #[test]
    fn test_platform_parse() {
        assert_eq!(VideoPlatform::parse("sora"), Some(VideoPlatform::Sora));
        assert_eq!(VideoPlatform::parse("Runway Gen-3"), Some(VideoPlatform::Runway));
        assert_eq!(VideoPlatform::parse("vimeo"), None);
    }

    #[test]
    fn test_concept_uses_camel_case_on_the_wire() {
        let json = r#"{"headline":"STOP","visualDescription":"A hand","reasoning":"contrast"}"#;
        let concept: ThumbnailConcept = serde_json::from_str(json).unwrap();
        assert_eq!(concept.visual_description, "A hand");
    }

    #[test]
    fn test_publish_slot_parse() {
        let slot = PublishSlot::parse("2026-11-02", "18:30").unwrap();
        assert_eq!(slot.date_label(), "2026-11-02");
        assert_eq!(slot.time_label(), "18:30");
        assert!(PublishSlot::parse("tomorrow", "18:30").is_err());
    }

    #[test]
    fn test_voice_lookup() {
        assert_eq!(find_voice("kore").map(|v| v.gender), Some("Female"));
        assert!(find_voice("Alloy").is_none());
    }
}
