use serenity::all::{Colour, CreateEmbed};

/// Discord's limit on embed field values.
const FIELD_VALUE_LIMIT: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Warning,
    Error,
    Info,
}

impl Tone {
    fn colour(self) -> Colour {
        match self {
            Tone::Success => Colour::new(0x2ECC71),
            Tone::Warning => Colour::new(0xF1C40F),
            Tone::Error => Colour::new(0xE74C3C),
            Tone::Info => Colour::new(0x8B4513),
        }
    }
}

/// Response to a slash command, independent of how it is sent.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub tone: Tone,
    pub title: String,
    pub description: String,
    /// `(name, value, inline)`
    pub fields: Vec<(String, String, bool)>,
}

impl Reply {
    pub fn new(tone: Tone, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            tone,
            title: title.into(),
            description: description.into(),
            fields: Vec::new(),
        }
    }

    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(Tone::Success, title, description)
    }

    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(Tone::Info, title, description)
    }

    pub fn error(description: impl Into<String>) -> Self {
        Self::new(Tone::Error, "❌ Error", description)
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.fields
            .push((name.into(), truncate(value.into(), FIELD_VALUE_LIMIT), inline));
        self
    }

    pub fn to_embed(&self) -> CreateEmbed {
        let mut embed = CreateEmbed::new()
            .title(&self.title)
            .colour(self.tone.colour());
        if !self.description.is_empty() {
            embed = embed.description(&self.description);
        }
        embed.fields(self.fields.clone())
    }
}

/// Cuts `value` to at most `limit` characters, marking the cut.
fn truncate(value: String, limit: usize) -> String {
    if value.chars().count() <= limit {
        return value;
    }
    let mut cut: String = value.chars().take(limit.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
