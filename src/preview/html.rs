//! @acp:module "HTML Preview"
//! @acp:summary "Write the whole plan as a standalone HTML deck page"
//! @acp:domain preview
//! @acp:layer render

use handlebars::Handlebars;
use serde::Serialize;

use super::{render_slide, Color, NodeContent, PreviewNode, PreviewOptions, CLOSING_NOTE};
use crate::error::Result;
use crate::layout::Align;
use crate::plan::{PaletteRole, Plan};

const DECK_TEMPLATE: &str = include_str!("../../templates/deck.html.hbs");

#[derive(Serialize)]
struct DeckData<'a> {
    title: &'a str,
    concept: &'a str,
    keywords: &'a [String],
    swatches: Vec<SwatchData>,
    slides: Vec<SlideData>,
    total: usize,
    steps: &'a [String],
    closing: &'static str,
}

#[derive(Serialize)]
struct SwatchData {
    name: &'static str,
    css: String,
}

#[derive(Serialize)]
struct SlideData {
    number: usize,
    total: usize,
    rendered: bool,
    background: String,
    foreground: String,
    border: String,
    nodes: Vec<NodeData>,
}

#[derive(Serialize)]
struct NodeData {
    region: &'static str,
    style: String,
    is_image: bool,
    url: String,
    text: String,
}

fn rgba(color: &Color) -> String {
    match color.opacity {
        Some(opacity) => {
            let alpha = (opacity.min(100) as u32 * 255 / 100) as u8;
            format!("{}{:02X}", color.css, alpha)
        }
        None => color.css.clone(),
    }
}

fn position(node: &PreviewNode) -> String {
    let f = node.frame;
    format!(
        "left: {}%; top: {}%; width: {}%; height: {}%;",
        f.x, f.y, f.w, f.h
    )
}

fn node_data(node: &PreviewNode) -> NodeData {
    let mut style = position(node);
    let mut data = NodeData {
        region: node.region,
        style: String::new(),
        is_image: false,
        url: String::new(),
        text: String::new(),
    };

    match &node.content {
        NodeContent::Text {
            text,
            color,
            style: text_style,
            backing,
        } => {
            // Slide is 10in wide; express point sizes relative to its width
            let vw = text_style.size / 720.0 * 100.0;
            style.push_str(&format!(
                " color: {}; font-size: {:.2}cqw; font-family: {}; text-align: {};",
                rgba(color),
                vw,
                text_style.face.css_stack(),
                match text_style.align {
                    Align::Left => "left",
                    Align::Center => "center",
                    Align::Right => "right",
                }
            ));
            if text_style.italic {
                style.push_str(" font-style: italic;");
            }
            if text_style.uppercase {
                style.push_str(" text-transform: uppercase;");
            }
            if text_style.spacing > 0.0 {
                style.push_str(&format!(" letter-spacing: {}pt;", text_style.spacing));
            }
            if let Some(backing) = backing {
                style.push_str(&format!(" background: {}; padding: 1.5%;", rgba(backing)));
            }
            data.text = text.clone();
        }
        NodeContent::Image { url, opacity } => {
            if let Some(opacity) = opacity {
                style.push_str(&format!(" opacity: {};", *opacity as f32 / 100.0));
            }
            data.is_image = true;
            data.url = url.clone();
        }
        NodeContent::Rule { color, weight } => {
            style.push_str(&format!(" border-top: {}pt solid {};", weight, rgba(color)));
        }
        NodeContent::Panel { color } => {
            style.push_str(&format!(" background: {};", rgba(color)));
        }
    }

    data.style = style;
    data
}

/// @acp:summary "Render concept, every slide and the roadmap into one HTML page"
pub fn render_deck_html(plan: &Plan, options: &PreviewOptions) -> Result<String> {
    let palette = &plan.color_palette;
    let total = plan.slides.len();

    let slides = plan
        .slides
        .iter()
        .enumerate()
        .map(|(index, slide)| match render_slide(slide, palette, index, options) {
            Some(view) => SlideData {
                number: index + 1,
                total,
                rendered: true,
                background: view.background.clone(),
                foreground: view.foreground.clone(),
                border: view.border.clone(),
                nodes: view.nodes.iter().map(node_data).collect(),
            },
            None => SlideData {
                number: index + 1,
                total,
                rendered: false,
                background: String::new(),
                foreground: String::new(),
                border: String::new(),
                nodes: Vec::new(),
            },
        })
        .collect();

    let data = DeckData {
        title: &plan.title,
        concept: &plan.concept_description,
        keywords: &plan.keywords,
        swatches: PaletteRole::ALL
            .iter()
            .map(|role| SwatchData {
                name: role.name(),
                css: palette.css(*role),
            })
            .collect(),
        slides,
        total,
        steps: &plan.action_plan,
        closing: CLOSING_NOTE,
    };

    let mut registry = Handlebars::new();
    registry.register_template_string("deck", DECK_TEMPLATE)?;
    Ok(registry.render("deck", &data)?)
}
