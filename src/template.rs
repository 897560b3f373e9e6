//! Canned message templates sent by `/messagesend`.
//!
//! A template is a JSON file using Discord's own message shape: optional
//! `content`, optional `tts` and a list of `embeds`.

use poise::serenity_prelude::{CreateEmbed, CreateEmbedAuthor, CreateEmbedFooter, CreateMessage};
use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MessageTemplate {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tts: bool,
    #[serde(default)]
    pub embeds: Vec<EmbedTemplate>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EmbedTemplate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub color: Option<u32>,
    #[serde(default)]
    pub footer: Option<FooterTemplate>,
    #[serde(default)]
    pub image: Option<MediaTemplate>,
    #[serde(default)]
    pub thumbnail: Option<MediaTemplate>,
    #[serde(default)]
    pub author: Option<AuthorTemplate>,
    #[serde(default)]
    pub fields: Vec<FieldTemplate>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FooterTemplate {
    pub text: String,
    #[serde(default)]
    pub icon_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MediaTemplate {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthorTemplate {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub icon_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FieldTemplate {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub inline: bool,
}

impl MessageTemplate {
    /// Parse a template from its JSON text
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// A template must carry something to send
    pub fn is_empty(&self) -> bool {
        self.content.as_deref().is_none_or(str::is_empty) && self.embeds.is_empty()
    }

    pub fn to_message(&self) -> CreateMessage {
        let mut message = CreateMessage::new().tts(self.tts);
        if let Some(content) = &self.content {
            message = message.content(content);
        }
        if !self.embeds.is_empty() {
            message = message.embeds(self.embeds.iter().map(EmbedTemplate::to_embed).collect());
        }
        message
    }
}

impl EmbedTemplate {
    pub fn to_embed(&self) -> CreateEmbed {
        let mut embed = CreateEmbed::new();
        if let Some(title) = &self.title {
            embed = embed.title(title);
        }
        if let Some(description) = &self.description {
            embed = embed.description(description);
        }
        if let Some(url) = &self.url {
            embed = embed.url(url);
        }
        if let Some(color) = self.color {
            embed = embed.colour(color);
        }
        if let Some(footer) = &self.footer {
            let mut create_footer = CreateEmbedFooter::new(&footer.text);
            if let Some(icon_url) = &footer.icon_url {
                create_footer = create_footer.icon_url(icon_url);
            }
            embed = embed.footer(create_footer);
        }
        if let Some(image) = &self.image {
            embed = embed.image(&image.url);
        }
        if let Some(thumbnail) = &self.thumbnail {
            embed = embed.thumbnail(&thumbnail.url);
        }
        if let Some(author) = &self.author {
            let mut create_author = CreateEmbedAuthor::new(&author.name);
            if let Some(url) = &author.url {
                create_author = create_author.url(url);
            }
            if let Some(icon_url) = &author.icon_url {
                create_author = create_author.icon_url(icon_url);
            }
            embed = embed.author(create_author);
        }
        for field in &self.fields {
            embed = embed.field(&field.name, &field.value, field.inline);
        }
        embed
    }
}
