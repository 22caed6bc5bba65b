//! @acp:module "Export"
//! @acp:summary "Map a plan onto static slides and write a PPTX template"
//! @acp:domain export
//! @acp:layer service
//!
//! Export is two steps:
//!
//! 1. [`build_deck`] walks the shared layout templates and produces a
//!    [`Deck`] of positioned rectangles, lines and text boxes. Image regions
//!    become labeled placeholder boxes; nothing is fetched.
//! 2. [`pptx::encode`] writes the deck as an OOXML package.
//!
//! [`export_plan`] does both and writes `<slug>_portfolio_template.pptx`.

pub mod pptx;

use std::path::PathBuf;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{AtelierError, Result};
use crate::layout::{self, Align, Fill, Frame, Paint, RegionKind, Typeface};
use crate::plan::{LayoutTag, Palette, PaletteRole, Plan, Slide};

/// Suffix appended to the slugified plan title
pub const FILE_SUFFIX: &str = "_portfolio_template.pptx";

/// @acp:summary "Export settings"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportOptions {
    /// Directory the template file is written into
    pub output_dir: PathBuf,
    /// Author recorded in the document properties
    pub author: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            author: "L'Âme Silencieuse".to_string(),
        }
    }
}

/// Result of a successful export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub path: PathBuf,
    pub slide_count: usize,
}

/// Hex color (no `#`) with optional opacity in percent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolidFill {
    pub hex: String,
    pub alpha: Option<u8>,
}

impl SolidFill {
    fn resolve(fill: Fill, palette: &Palette) -> Self {
        let hex = match fill.paint {
            Paint::Palette(role) => palette.hex(role),
            Paint::Fixed(hex) => hex.to_string(),
        };
        Self {
            hex,
            alpha: fill.opacity,
        }
    }

    fn fixed(hex: &str) -> Self {
        Self {
            hex: hex.to_string(),
            alpha: None,
        }
    }
}

/// Formatted text inside a shape
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    /// Points
    pub size: f32,
    pub color: SolidFill,
    pub align: Align,
    pub face: Typeface,
    pub italic: bool,
    pub all_caps: bool,
    /// Points
    pub spacing: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    /// Rectangle, optionally filled, optionally carrying text
    Rect {
        fill: Option<SolidFill>,
        text: Option<TextRun>,
    },
    Line {
        color: SolidFill,
        weight: f32,
    },
}

/// @acp:summary "One positioned shape on an exported slide"
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub name: String,
    pub frame: Frame,
    pub kind: ShapeKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeckSlide {
    pub tag: LayoutTag,
    /// Hex color (no `#`)
    pub background: String,
    pub shapes: Vec<Shape>,
}

impl DeckSlide {
    pub fn shape(&self, name: &str) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.name == name)
    }
}

/// @acp:summary "Static slide deck ready for encoding"
#[derive(Debug, Clone, PartialEq)]
pub struct Deck {
    pub title: String,
    pub subject: String,
    pub author: String,
    pub slides: Vec<DeckSlide>,
}

/// @acp:summary "Slug used for the export file name"
///
/// ASCII letters and digits are kept (lower-cased), each whitespace
/// character becomes `_`, everything else is dropped.
pub fn slugify(title: &str) -> String {
    title
        .chars()
        .filter_map(|c| {
            if c.is_ascii_alphanumeric() {
                Some(c.to_ascii_lowercase())
            } else if c.is_whitespace() {
                Some('_')
            } else {
                None
            }
        })
        .collect()
}

/// File name for a plan title
pub fn export_file_name(title: &str) -> String {
    let slug = slugify(title.trim());
    let slug = if slug.is_empty() {
        "untitled".to_string()
    } else {
        slug
    };
    format!("{}{}", slug, FILE_SUFFIX)
}

fn region_shape(kind: &RegionKind, slide: &Slide, index: usize, palette: &Palette) -> ShapeKind {
    match *kind {
        RegionKind::Text {
            source,
            style,
            fill,
        } => ShapeKind::Rect {
            fill: fill.map(|f| SolidFill::resolve(f, palette)),
            text: Some(TextRun {
                text: source.resolve(slide, index),
                size: style.size,
                color: SolidFill::resolve(style.color, palette),
                align: style.align,
                face: style.face,
                italic: style.italic,
                all_caps: style.uppercase,
                spacing: style.spacing,
            }),
        },
        RegionKind::Image {
            label,
            placeholder,
            opacity,
            ..
        } => ShapeKind::Rect {
            fill: Some(SolidFill {
                hex: placeholder.to_string(),
                alpha: opacity,
            }),
            text: label.map(|label| TextRun {
                text: label.to_string(),
                size: 14.0,
                color: SolidFill::fixed("FFFFFF"),
                align: Align::Center,
                face: Typeface::Sans,
                italic: false,
                all_caps: false,
                spacing: 2.0,
            }),
        },
        RegionKind::Rule { color, weight } => ShapeKind::Line {
            color: SolidFill::resolve(color, palette),
            weight,
        },
        RegionKind::Panel { fill } => ShapeKind::Rect {
            fill: Some(SolidFill::resolve(fill, palette)),
            text: None,
        },
    }
}

/// @acp:summary "Map every plan slide, in order, onto a static slide"
///
/// Slides whose tag has no template keep their background and number only.
pub fn build_deck(plan: &Plan, author: &str) -> Deck {
    let palette = &plan.color_palette;
    let background = palette.hex(PaletteRole::Background);

    let slides = plan
        .slides
        .iter()
        .enumerate()
        .map(|(index, slide)| {
            let regions = layout::template_for(slide.layout_type)
                .map(|t| t.regions)
                .unwrap_or(&[]);
            if regions.is_empty() {
                tracing::debug!(
                    "Slide {} has no template for {:?}; exporting background only",
                    index + 1,
                    slide.layout_type
                );
            }

            let shapes = regions
                .iter()
                .chain(std::iter::once(&layout::SLIDE_NUMBER))
                .map(|region| Shape {
                    name: region.name.to_string(),
                    frame: region.frame,
                    kind: region_shape(&region.kind, slide, index, palette),
                })
                .collect();

            DeckSlide {
                tag: slide.layout_type,
                background: background.clone(),
                shapes,
            }
        })
        .collect();

    Deck {
        title: plan.title.clone(),
        subject: plan.concept_description.clone(),
        author: author.to_string(),
        slides,
    }
}

/// @acp:summary "Write the plan as a PPTX template into the output directory"
pub fn export_plan(plan: &Plan, options: &ExportOptions) -> Result<ExportReport> {
    let deck = build_deck(plan, &options.author);
    let bytes = pptx::encode(&deck, Utc::now())?;

    if !options.output_dir.as_os_str().is_empty() && !options.output_dir.exists() {
        std::fs::create_dir_all(&options.output_dir).map_err(|e| {
            AtelierError::Export(format!(
                "cannot create {}: {}",
                options.output_dir.display(),
                e
            ))
        })?;
    }

    let path = options.output_dir.join(export_file_name(&plan.title));
    std::fs::write(&path, bytes)
        .map_err(|e| AtelierError::Export(format!("cannot write {}: {}", path.display(), e)))?;

    tracing::info!(
        "Exported {} slides to {}",
        deck.slides.len(),
        path.display()
    );

    Ok(ExportReport {
        path,
        slide_count: deck.slides.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::fixtures;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Velvet & Ink"), "velvet__ink");
        assert_eq!(slugify("Silent Rebellion"), "silent_rebellion");
        assert_eq!(slugify("L'Âme 1993"), "lme_1993");
    }

    #[test]
    fn test_export_file_name() {
        assert_eq!(
            export_file_name("Velvet & Ink"),
            "velvet__ink_portfolio_template.pptx"
        );
        assert_eq!(export_file_name("&&&"), "untitled_portfolio_template.pptx");
    }

    #[test]
    fn test_deck_keeps_slide_order_and_tags() {
        let plan = fixtures::velvet_and_ink();
        let deck = build_deck(&plan, "Studio");
        let tags: Vec<LayoutTag> = deck.slides.iter().map(|s| s.tag).collect();
        assert_eq!(
            tags,
            vec![LayoutTag::Title, LayoutTag::Split, LayoutTag::Grid, LayoutTag::Quote]
        );
        assert_eq!(deck.author, "Studio");
        assert_eq!(deck.subject, plan.concept_description);
    }

    #[test]
    fn test_colors_are_stripped_of_prefix() {
        let plan = fixtures::velvet_and_ink();
        let deck = build_deck(&plan, "Studio");
        assert_eq!(deck.slides[0].background, "0B0B0B");
        match &deck.slides[0].shape("heading").unwrap().kind {
            ShapeKind::Rect { text: Some(run), .. } => {
                assert_eq!(run.color.hex, "C9A227");
                assert_eq!(run.text, "Velvet & Ink");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_image_regions_become_labeled_boxes() {
        let plan = fixtures::velvet_and_ink();
        let deck = build_deck(&plan, "Studio");
        match &deck.slides[1].shape("image").unwrap().kind {
            ShapeKind::Rect {
                fill: Some(fill),
                text: Some(run),
            } => {
                assert_eq!(fill.hex, "333333");
                assert_eq!(run.text, "PLACE IMAGE HERE");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_every_slide_is_numbered() {
        let plan = fixtures::velvet_and_ink();
        let deck = build_deck(&plan, "Studio");
        for (i, slide) in deck.slides.iter().enumerate() {
            match &slide.shape("slide-number").unwrap().kind {
                ShapeKind::Rect { text: Some(run), .. } => {
                    assert_eq!(run.text, (i + 1).to_string())
                }
                other => panic!("unexpected {:?}", other),
            }
        }
    }

    #[test]
    fn test_unknown_tag_keeps_background_and_number() {
        let mut plan = fixtures::velvet_and_ink();
        plan.slides[2].layout_type = LayoutTag::Unknown;
        let deck = build_deck(&plan, "Studio");
        assert_eq!(deck.slides.len(), 4);
        assert_eq!(deck.slides[2].shapes.len(), 1);
    }

    #[test]
    fn test_shapes_mirror_preview_regions() {
        use crate::preview::{render_slide, PreviewOptions};

        let plan = fixtures::velvet_and_ink();
        let deck = build_deck(&plan, "Studio");
        for (index, slide) in plan.slides.iter().enumerate() {
            let view =
                render_slide(slide, &plan.color_palette, index, &PreviewOptions::default()).unwrap();
            for node in &view.nodes {
                let shape = deck.slides[index].shape(node.region).expect(node.region);
                assert_eq!(shape.frame, node.frame);
            }
        }
    }

    #[test]
    fn test_export_writes_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let options = ExportOptions {
            output_dir: dir.path().join("out"),
            author: "Studio".to_string(),
        };
        let report = export_plan(&fixtures::velvet_and_ink(), &options).unwrap();
        assert_eq!(report.slide_count, 4);
        assert!(report.path.ends_with("velvet__ink_portfolio_template.pptx"));
        assert!(report.path.exists());
    }
}
