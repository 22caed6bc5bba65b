//! @acp:module "Slide Preview"
//! @acp:summary "Populate layout templates into a visual tree for on-screen preview"
//! @acp:domain preview
//! @acp:layer render
//!
//! [`render_slide`] turns one slide into a [`SlideView`]: the template's
//! regions with plan text, palette colors and image URLs filled in. The view
//! is then drawn by the terminal renderer or written into the HTML deck.

pub mod html;
pub mod terminal;

use serde::{Deserialize, Serialize};

use crate::layout::{self, Fill, Frame, Paint, RegionKind, TextStyle};
use crate::plan::{LayoutTag, Palette, PaletteRole, Slide};

pub use html::render_deck_html;
pub use terminal::render_slide_text;

/// Closing line under the action roadmap, in the terminal and in HTML
pub const CLOSING_NOTE: &str = "Remember, your style is defined by what you refuse to include.";

/// @acp:summary "Preview settings (image source)"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PreviewOptions {
    /// Base URL of the seeded placeholder image service
    pub image_base: String,
    /// Multiplier applied to the slide position to derive an image seed
    pub seed_multiplier: usize,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self {
            image_base: "https://picsum.photos/seed".to_string(),
            seed_multiplier: 123,
        }
    }
}

impl PreviewOptions {
    /// Grayscale placeholder image for a position
    pub fn image_url(&self, position: usize) -> String {
        format!(
            "{}/{}/1200/800?grayscale",
            self.image_base.trim_end_matches('/'),
            position * self.seed_multiplier
        )
    }
}

/// A color resolved against the palette, as CSS hex
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Color {
    pub css: String,
    pub opacity: Option<u8>,
}

impl Color {
    fn resolve(fill: Fill, palette: &Palette) -> Self {
        let css = match fill.paint {
            Paint::Palette(role) => palette.css(role),
            Paint::Fixed(hex) => format!("#{}", hex),
        };
        Self {
            css,
            opacity: fill.opacity,
        }
    }
}

/// Drawable content of one node
#[derive(Debug, Clone, PartialEq)]
pub enum NodeContent {
    Text {
        text: String,
        color: Color,
        style: TextStyle,
        backing: Option<Color>,
    },
    Image {
        url: String,
        opacity: Option<u8>,
    },
    Rule {
        color: Color,
        weight: f32,
    },
    Panel {
        color: Color,
    },
}

/// @acp:summary "One populated template region"
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewNode {
    pub region: &'static str,
    pub frame: Frame,
    pub content: NodeContent,
}

/// @acp:summary "Visual tree for one slide"
#[derive(Debug, Clone, PartialEq)]
pub struct SlideView {
    /// Zero-based position in the deck
    pub index: usize,
    pub tag: LayoutTag,
    pub background: String,
    pub foreground: String,
    pub border: String,
    pub nodes: Vec<PreviewNode>,
}

impl SlideView {
    pub fn node(&self, region: &str) -> Option<&PreviewNode> {
        self.nodes.iter().find(|n| n.region == region)
    }

    /// Text of a text node, if present
    pub fn text(&self, region: &str) -> Option<&str> {
        match &self.node(region)?.content {
            NodeContent::Text { text, .. } => Some(text),
            _ => None,
        }
    }
}

/// @acp:summary "Select the slide's template and populate it"
///
/// Returns `None` for layout tags outside the closed set; that is not an error.
pub fn render_slide(
    slide: &Slide,
    palette: &Palette,
    index: usize,
    options: &PreviewOptions,
) -> Option<SlideView> {
    let template = layout::template_for(slide.layout_type)?;

    let nodes = template
        .regions
        .iter()
        .map(|region| {
            let content = match region.kind {
                RegionKind::Text {
                    source,
                    style,
                    fill,
                } => NodeContent::Text {
                    text: source.resolve(slide, index),
                    color: Color::resolve(style.color, palette),
                    style,
                    backing: fill.map(|f| Color::resolve(f, palette)),
                },
                RegionKind::Image {
                    offset, opacity, ..
                } => NodeContent::Image {
                    url: options.image_url(index + offset),
                    opacity,
                },
                RegionKind::Rule { color, weight } => NodeContent::Rule {
                    color: Color::resolve(color, palette),
                    weight,
                },
                RegionKind::Panel { fill } => NodeContent::Panel {
                    color: Color::resolve(fill, palette),
                },
            };
            PreviewNode {
                region: region.name,
                frame: region.frame,
                content,
            }
        })
        .collect();

    Some(SlideView {
        index,
        tag: slide.layout_type,
        background: palette.css(PaletteRole::Background),
        foreground: palette.css(PaletteRole::Text),
        border: palette.css(PaletteRole::Accent),
        nodes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::fixtures;

    #[test]
    fn test_every_known_tag_renders_non_empty_tree() {
        let plan = fixtures::velvet_and_ink();
        for tag in LayoutTag::KNOWN {
            let slide = fixtures::slide("T", "S", "B", tag);
            let view = render_slide(&slide, &plan.color_palette, 0, &PreviewOptions::default())
                .expect("view");
            assert!(!view.nodes.is_empty(), "{}", tag);
            assert_eq!(view.tag, tag);
        }
    }

    #[test]
    fn test_unknown_tag_renders_nothing() {
        let plan = fixtures::velvet_and_ink();
        let slide = fixtures::slide("T", "S", "B", LayoutTag::Unknown);
        assert!(render_slide(&slide, &plan.color_palette, 0, &PreviewOptions::default()).is_none());
    }

    #[test]
    fn test_split_populates_text_pane() {
        let plan = fixtures::velvet_and_ink();
        let view =
            render_slide(&plan.slides[1], &plan.color_palette, 1, &PreviewOptions::default())
                .unwrap();
        assert_eq!(view.text("title"), Some("Window Light"));
        assert_eq!(view.text("subtitle"), Some("Series I"));
        assert_eq!(view.text("body"), Some("North light on linen."));
        assert_eq!(view.text("visual-note"), Some("Window Light in low light"));
        assert_eq!(view.background, "#0B0B0B");
    }

    #[test]
    fn test_images_keyed_by_position() {
        let plan = fixtures::velvet_and_ink();
        let options = PreviewOptions::default();
        let view = render_slide(&plan.slides[2], &plan.color_palette, 2, &options).unwrap();
        match &view.node("image-2").unwrap().content {
            NodeContent::Image { url, .. } => {
                assert_eq!(url, "https://picsum.photos/seed/492/1200/800?grayscale")
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_quote_uses_body_then_title() {
        let plan = fixtures::velvet_and_ink();
        let options = PreviewOptions::default();
        let view = render_slide(&plan.slides[3], &plan.color_palette, 3, &options).unwrap();
        assert_eq!(view.text("quote"), Some("Style is refusal."));
        assert_eq!(view.text("attribution"), Some("Ni Zan"));

        let empty = fixtures::slide("Emptiness", "Ni Zan", "", LayoutTag::Quote);
        let view = render_slide(&empty, &plan.color_palette, 0, &options).unwrap();
        assert_eq!(view.text("quote"), Some("Emptiness"));
    }
}
