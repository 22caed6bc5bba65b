//! @acp:module "Terminal Preview"
//! @acp:summary "Draw a slide view as styled terminal text"
//! @acp:domain preview
//! @acp:layer render

use console::{style, Style};

use super::{Color, NodeContent, SlideView};
use crate::layout::Align;
use crate::plan::normalize_hex;

/// Map a CSS hex color onto the 6x6x6 ANSI-256 cube
pub fn ansi256(css: &str) -> u8 {
    let hex = normalize_hex(css).unwrap_or_else(|| crate::plan::FALLBACK_HEX.to_string());
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).unwrap_or(128);
    let scale = |v: u8| ((v as u16 * 5 + 127) / 255) as u8;
    16 + 36 * scale(channel(0)) + 6 * scale(channel(2)) + scale(channel(4))
}

/// Style that paints text in a palette color
pub fn color_style(color: &Color) -> Style {
    Style::new().color256(ansi256(&color.css))
}

/// Word-wrap to `width` columns
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            if !line.is_empty() && line.chars().count() + 1 + word.chars().count() > width {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
        }
        lines.push(line);
    }
    lines
}

fn aligned(line: &str, align: Align, width: usize) -> String {
    let len = line.chars().count();
    let pad = width.saturating_sub(len);
    match align {
        Align::Left => line.to_string(),
        Align::Center => format!("{}{}", " ".repeat(pad / 2), line),
        Align::Right => format!("{}{}", " ".repeat(pad), line),
    }
}

/// @acp:summary "Render a slide view as a framed block of terminal text"
///
/// Regions are drawn top to bottom by frame position. Images and panels are
/// shown as labeled placeholders since a terminal cannot show them.
pub fn render_slide_text(view: &SlideView, total: usize, width: usize) -> String {
    let inner = width.saturating_sub(4).max(20);
    let border = style(format!("+{}+", "-".repeat(inner + 2))).dim();
    let mut out = Vec::new();

    out.push(border.to_string());
    out.push(format!(
        "| {} |",
        aligned(
            &format!("{} / {}  [{}]", view.index + 1, total, view.tag),
            Align::Right,
            inner
        )
    ));

    let mut nodes: Vec<_> = view.nodes.iter().collect();
    nodes.sort_by(|a, b| {
        a.frame
            .y
            .partial_cmp(&b.frame.y)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.frame.x.partial_cmp(&b.frame.x).unwrap_or(std::cmp::Ordering::Equal))
    });

    for node in nodes {
        let lines: Vec<String> = match &node.content {
            NodeContent::Text {
                text, color, style: text_style, ..
            } => {
                if text.trim().is_empty() {
                    continue;
                }
                let text = if text_style.uppercase {
                    text.to_uppercase()
                } else {
                    text.clone()
                };
                let mut painter = color_style(color);
                if text_style.italic {
                    painter = painter.italic();
                }
                if text_style.size >= 24.0 {
                    painter = painter.bold();
                }
                wrap(&text, inner)
                    .iter()
                    .map(|l| {
                        let padded = aligned(l, text_style.align, inner);
                        let fill = inner.saturating_sub(padded.chars().count());
                        format!("{}{}", painter.apply_to(padded), " ".repeat(fill))
                    })
                    .collect()
            }
            NodeContent::Image { url, opacity } => {
                let label = match opacity {
                    Some(o) => format!("[backdrop {}%] {}", o, url),
                    None => format!("[{}] {}", node.region, url),
                };
                wrap(&label, inner)
                    .into_iter()
                    .map(|l| {
                        let fill = inner.saturating_sub(l.chars().count());
                        format!("{}{}", style(l).dim(), " ".repeat(fill))
                    })
                    .collect()
            }
            NodeContent::Rule { color, .. } => {
                let rule = aligned(&"-".repeat(inner / 8), Align::Center, inner);
                let fill = inner.saturating_sub(rule.chars().count());
                vec![format!("{}{}", color_style(color).apply_to(rule), " ".repeat(fill))]
            }
            // Tints carry no content
            NodeContent::Panel { .. } => continue,
        };
        for line in lines {
            out.push(format!("| {} |", line));
        }
    }

    out.push(border.to_string());
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::fixtures;
    use crate::preview::{render_slide, PreviewOptions};

    #[test]
    fn test_ansi256_extremes() {
        assert_eq!(ansi256("#000000"), 16);
        assert_eq!(ansi256("#FFFFFF"), 231);
        assert_eq!(ansi256("#FF0000"), 196);
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap("one two three", 7), vec!["one two", "three"]);
        assert_eq!(wrap("a\nb", 10), vec!["a", "b"]);
    }

    #[test]
    fn test_render_contains_position_and_text() {
        console::set_colors_enabled(false);
        let plan = fixtures::velvet_and_ink();
        let view = render_slide(&plan.slides[0], &plan.color_palette, 0, &PreviewOptions::default())
            .unwrap();
        let text = render_slide_text(&view, 4, 72);
        assert!(text.contains("1 / 4"));
        assert!(text.contains("Velvet & Ink"));
        assert!(text.contains("A PORTFOLIO"));
    }
}
