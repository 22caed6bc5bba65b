//! @acp:module "Layout Templates"
//! @acp:summary "Declarative description of the four slide templates"
//! @acp:domain layout
//! @acp:layer model
//!
//! Each template is a list of named regions. A region has a frame in percent
//! of the slide (16:9), a kind (text, image, rule or panel) and, for text,
//! the plan field that fills it. The on-screen preview and the PPTX encoder
//! both walk these tables, so a tag or region added here shows up in both.
//!
//! Regions are listed back to front.

use crate::plan::{LayoutTag, PaletteRole, Slide};

/// Frame in percent of slide width/height
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

const fn frame(x: f32, y: f32, w: f32, h: f32) -> Frame {
    Frame { x, y, w, h }
}

/// Where a color comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paint {
    Palette(PaletteRole),
    /// Fixed hex color (no `#`)
    Fixed(&'static str),
}

/// A color with optional opacity in percent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fill {
    pub paint: Paint,
    pub opacity: Option<u8>,
}

const fn solid(paint: Paint) -> Fill {
    Fill { paint, opacity: None }
}

const fn tinted(paint: Paint, opacity: u8) -> Fill {
    Fill { paint, opacity: Some(opacity) }
}

/// Slide content that populates a text region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSource {
    Title,
    Subtitle,
    Body,
    /// Body, or title when the body is empty
    QuoteText,
    VisualDirection,
    /// "Visual Direction: ..." footer
    VisualDirectionNote,
    /// One-based slide position
    SlideNumber,
    Literal(&'static str),
}

impl TextSource {
    /// Resolve the text for one slide at a zero-based position
    pub fn resolve(&self, slide: &Slide, index: usize) -> String {
        match self {
            TextSource::Title => slide.title.clone(),
            TextSource::Subtitle => slide.subtitle.clone(),
            TextSource::Body => slide.body.clone(),
            TextSource::QuoteText => slide.quote_text().to_string(),
            TextSource::VisualDirection => slide.visual_direction.clone(),
            TextSource::VisualDirectionNote => {
                format!("Visual Direction: {}", slide.visual_direction)
            }
            TextSource::SlideNumber => (index + 1).to_string(),
            TextSource::Literal(text) => text.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Typeface {
    Serif,
    Sans,
}

impl Typeface {
    /// Font family written into exported documents
    pub fn family(self) -> &'static str {
        match self {
            Typeface::Serif => "Times New Roman",
            Typeface::Sans => "Arial",
        }
    }

    /// CSS font stack for the HTML preview
    pub fn css_stack(self) -> &'static str {
        match self {
            Typeface::Serif => "'Times New Roman', Georgia, serif",
            Typeface::Sans => "Arial, Helvetica, sans-serif",
        }
    }
}

/// Text appearance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Points
    pub size: f32,
    pub color: Fill,
    pub align: Align,
    pub face: Typeface,
    pub italic: bool,
    pub uppercase: bool,
    /// Letter spacing in points
    pub spacing: f32,
}

const fn text(size: f32, color: Fill) -> TextStyle {
    TextStyle {
        size,
        color,
        align: Align::Left,
        face: Typeface::Sans,
        italic: false,
        uppercase: false,
        spacing: 0.0,
    }
}

impl TextStyle {
    const fn centered(mut self) -> Self {
        self.align = Align::Center;
        self
    }

    const fn right(mut self) -> Self {
        self.align = Align::Right;
        self
    }

    const fn serif(mut self) -> Self {
        self.face = Typeface::Serif;
        self
    }

    const fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    const fn caps(mut self, spacing: f32) -> Self {
        self.uppercase = true;
        self.spacing = spacing;
        self
    }
}

/// What a region draws
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RegionKind {
    Text {
        source: TextSource,
        style: TextStyle,
        /// Optional backing fill behind the text
        fill: Option<Fill>,
    },
    /// Image slot keyed by slide position plus `offset`.
    ///
    /// Exported as a rectangle of `placeholder` color carrying `label`.
    Image {
        offset: usize,
        label: Option<&'static str>,
        placeholder: &'static str,
        /// Opacity in percent for faint backdrops
        opacity: Option<u8>,
    },
    /// Horizontal rule, weight in points
    Rule { color: Fill, weight: f32 },
    /// Flat colored panel
    Panel { fill: Fill },
}

/// @acp:summary "A named, positioned element of a template"
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub name: &'static str,
    pub frame: Frame,
    pub kind: RegionKind,
}

/// @acp:summary "Ordered regions for one layout tag"
#[derive(Debug)]
pub struct LayoutTemplate {
    pub tag: LayoutTag,
    pub regions: &'static [Region],
}

impl LayoutTemplate {
    pub fn region(&self, name: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.name == name)
    }
}

const PRIMARY: Paint = Paint::Palette(PaletteRole::Primary);
const SECONDARY: Paint = Paint::Palette(PaletteRole::Secondary);
const ACCENT: Paint = Paint::Palette(PaletteRole::Accent);
const TEXT: Paint = Paint::Palette(PaletteRole::Text);

const VISUAL_NOTE: Region = Region {
    name: "visual-note",
    frame: frame(5.0, 90.0, 90.0, 7.1),
    kind: RegionKind::Text {
        source: TextSource::VisualDirectionNote,
        style: text(9.0, solid(Paint::Fixed("666666"))).centered().italic(),
        fill: None,
    },
};

/// Drawn on every slide regardless of template
pub const SLIDE_NUMBER: Region = Region {
    name: "slide-number",
    frame: frame(95.0, 95.0, 5.0, 5.0),
    kind: RegionKind::Text {
        source: TextSource::SlideNumber,
        style: text(8.0, solid(ACCENT)).right(),
        fill: None,
    },
};

static TITLE_REGIONS: [Region; 5] = [
    Region {
        name: "backdrop",
        frame: frame(0.0, 0.0, 100.0, 100.0),
        kind: RegionKind::Image {
            offset: 0,
            label: None,
            placeholder: "333333",
            opacity: Some(10),
        },
    },
    Region {
        name: "heading",
        frame: frame(5.0, 40.0, 90.0, 16.0),
        kind: RegionKind::Text {
            source: TextSource::Title,
            style: text(48.0, solid(PRIMARY)).centered().serif(),
            fill: None,
        },
    },
    Region {
        name: "rule",
        frame: frame(45.0, 58.0, 10.0, 0.0),
        kind: RegionKind::Rule {
            color: solid(ACCENT),
            weight: 2.0,
        },
    },
    Region {
        name: "subtitle",
        frame: frame(5.0, 62.0, 90.0, 8.9),
        kind: RegionKind::Text {
            source: TextSource::Subtitle,
            style: text(16.0, solid(SECONDARY)).centered().caps(4.0),
            fill: None,
        },
    },
    VISUAL_NOTE,
];

static SPLIT_REGIONS: [Region; 5] = [
    Region {
        name: "image",
        frame: frame(0.0, 0.0, 50.0, 100.0),
        kind: RegionKind::Image {
            offset: 0,
            label: Some("PLACE IMAGE HERE"),
            placeholder: "333333",
            opacity: None,
        },
    },
    Region {
        name: "title",
        frame: frame(55.0, 8.9, 40.0, 17.8),
        kind: RegionKind::Text {
            source: TextSource::Title,
            style: text(32.0, solid(PRIMARY)).serif(),
            fill: None,
        },
    },
    Region {
        name: "subtitle",
        frame: frame(55.0, 26.7, 40.0, 7.1),
        kind: RegionKind::Text {
            source: TextSource::Subtitle,
            style: text(10.0, solid(ACCENT)).caps(3.0),
            fill: None,
        },
    },
    Region {
        name: "body",
        frame: frame(55.0, 35.6, 40.0, 44.4),
        kind: RegionKind::Text {
            source: TextSource::Body,
            style: text(14.0, solid(TEXT)).serif(),
            fill: None,
        },
    },
    Region {
        name: "visual-note",
        frame: frame(55.0, 82.0, 40.0, 10.0),
        kind: RegionKind::Text {
            source: TextSource::VisualDirection,
            style: text(9.0, tinted(TEXT, 70)).italic(),
            fill: None,
        },
    },
];

static GRID_REGIONS: [Region; 6] = [
    Region {
        name: "title",
        frame: frame(5.0, 5.3, 60.0, 8.9),
        kind: RegionKind::Text {
            source: TextSource::Title,
            style: text(24.0, solid(PRIMARY)).serif(),
            fill: None,
        },
    },
    Region {
        name: "subtitle",
        frame: frame(65.0, 5.3, 30.0, 8.9),
        kind: RegionKind::Text {
            source: TextSource::Subtitle,
            style: text(10.0, tinted(TEXT, 60)).right().caps(2.0),
            fill: None,
        },
    },
    Region {
        name: "image-1",
        frame: frame(5.0, 21.3, 45.0, 66.7),
        kind: RegionKind::Image {
            offset: 1,
            label: Some("Image 1"),
            placeholder: "222222",
            opacity: None,
        },
    },
    Region {
        name: "body",
        frame: frame(52.0, 21.3, 43.0, 26.7),
        kind: RegionKind::Text {
            source: TextSource::Body,
            style: text(11.0, solid(TEXT)).centered().serif().italic(),
            fill: Some(tinted(ACCENT, 20)),
        },
    },
    Region {
        name: "image-2",
        frame: frame(52.0, 51.6, 43.0, 36.4),
        kind: RegionKind::Image {
            offset: 2,
            label: Some("Image 2"),
            placeholder: "333333",
            opacity: None,
        },
    },
    VISUAL_NOTE,
];

static QUOTE_REGIONS: [Region; 6] = [
    Region {
        name: "side-panel",
        frame: frame(66.7, 0.0, 33.3, 100.0),
        kind: RegionKind::Panel {
            fill: tinted(ACCENT, 5),
        },
    },
    Region {
        name: "glyph",
        frame: frame(5.0, 12.0, 90.0, 17.8),
        kind: RegionKind::Text {
            source: TextSource::Literal("\u{201C}"),
            style: text(80.0, tinted(ACCENT, 25)).centered().serif(),
            fill: None,
        },
    },
    Region {
        name: "quote",
        frame: frame(10.0, 30.0, 80.0, 33.0),
        kind: RegionKind::Text {
            source: TextSource::QuoteText,
            style: text(32.0, solid(PRIMARY)).centered().serif().italic(),
            fill: None,
        },
    },
    Region {
        name: "rule",
        frame: frame(45.0, 65.0, 10.0, 0.0),
        kind: RegionKind::Rule {
            color: solid(ACCENT),
            weight: 1.0,
        },
    },
    Region {
        name: "attribution",
        frame: frame(10.0, 70.0, 80.0, 8.9),
        kind: RegionKind::Text {
            source: TextSource::Subtitle,
            style: text(10.0, solid(TEXT)).centered().caps(3.0),
            fill: None,
        },
    },
    VISUAL_NOTE,
];

static TEMPLATES: [LayoutTemplate; 4] = [
    LayoutTemplate {
        tag: LayoutTag::Title,
        regions: &TITLE_REGIONS,
    },
    LayoutTemplate {
        tag: LayoutTag::Split,
        regions: &SPLIT_REGIONS,
    },
    LayoutTemplate {
        tag: LayoutTag::Grid,
        regions: &GRID_REGIONS,
    },
    LayoutTemplate {
        tag: LayoutTag::Quote,
        regions: &QUOTE_REGIONS,
    },
];

/// @acp:summary "Template for a layout tag; None for tags outside the closed set"
pub fn template_for(tag: LayoutTag) -> Option<&'static LayoutTemplate> {
    TEMPLATES.iter().find(|t| t.tag == tag)
}

/// All templates in tag order
pub fn templates() -> &'static [LayoutTemplate] {
    &TEMPLATES
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::fixtures;

    #[test]
    fn test_every_known_tag_has_template() {
        for tag in LayoutTag::KNOWN {
            let template = template_for(tag).expect("template");
            assert_eq!(template.tag, tag);
            assert!(!template.regions.is_empty());
        }
        assert!(template_for(LayoutTag::Unknown).is_none());
    }

    #[test]
    fn test_frames_stay_on_slide() {
        for template in templates() {
            for region in template.regions {
                let f = region.frame;
                assert!(f.x >= 0.0 && f.y >= 0.0, "{}:{}", template.tag, region.name);
                assert!(f.x + f.w <= 100.01, "{}:{}", template.tag, region.name);
                assert!(f.y + f.h <= 100.01, "{}:{}", template.tag, region.name);
            }
        }
    }

    #[test]
    fn test_region_names_unique_per_template() {
        for template in templates() {
            let mut names: Vec<&str> = template.regions.iter().map(|r| r.name).collect();
            names.sort();
            names.dedup();
            assert_eq!(names.len(), template.regions.len(), "{}", template.tag);
        }
    }

    #[test]
    fn test_text_sources_resolve() {
        let plan = fixtures::velvet_and_ink();
        let slide = &plan.slides[1];
        assert_eq!(TextSource::SlideNumber.resolve(slide, 1), "2");
        assert_eq!(
            TextSource::VisualDirectionNote.resolve(slide, 1),
            "Visual Direction: Window Light in low light"
        );
        assert_eq!(TextSource::QuoteText.resolve(&plan.slides[0], 0), "Velvet & Ink");
    }

    #[test]
    fn test_grid_keys_images_by_offset() {
        let grid = template_for(LayoutTag::Grid).unwrap();
        let offsets: Vec<usize> = grid
            .regions
            .iter()
            .filter_map(|r| match r.kind {
                RegionKind::Image { offset, .. } => Some(offset),
                _ => None,
            })
            .collect();
        assert_eq!(offsets, vec![1, 2]);
        assert!(grid.region("body").is_some());
    }
}
