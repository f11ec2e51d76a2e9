//! Discord rendering of sticky messages.

use serenity::all::{Colour, CreateEmbed, CreateEmbedFooter, CreateMessage};

use crate::model::sticky::StickyBody;

const STICKY_FOOTER: &str = "📌 Sticky Message";

/// Builds the message a sticky is sent as.
pub fn render_sticky(body: &StickyBody) -> CreateMessage {
    match body {
        StickyBody::Rich {
            title,
            description,
            image_url,
            color,
        } => {
            let mut embed = CreateEmbed::new()
                .title(title)
                .description(description)
                .colour(Colour::new(*color))
                .footer(CreateEmbedFooter::new(STICKY_FOOTER));
            if let Some(url) = image_url {
                embed = embed.image(url);
            }
            CreateMessage::new().embed(embed)
        }
        StickyBody::Plain { text, image_url } => {
            let message = CreateMessage::new().content(text);
            match image_url {
                Some(url) => message.embed(CreateEmbed::new().image(url)),
                None => message,
            }
        }
    }
}
