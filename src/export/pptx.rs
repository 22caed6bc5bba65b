//! @acp:module "PPTX Encoder"
//! @acp:summary "Write a static deck as an Office Open XML presentation package"
//! @acp:domain export
//! @acp:layer encode
//!
//! The package holds one master, one blank layout, one theme and one slide
//! part per deck slide. Shapes are absolute-positioned; frames in percent
//! are converted to EMU against a 10in x 5.625in (16:9) slide.

use std::io::{Cursor, Write};

use chrono::{DateTime, Utc};
use quick_xml::escape::escape;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::{Deck, DeckSlide, Shape, ShapeKind, SolidFill, TextRun};
use crate::error::Result;
use crate::layout::{Align, Frame};

/// Slide width in EMU (10in)
pub const SLIDE_CX: i64 = 9_144_000;
/// Slide height in EMU (5.625in)
pub const SLIDE_CY: i64 = 5_143_500;

const EMU_PER_POINT: f32 = 12_700.0;

const XML_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
const NS_REL: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

const CT_SLIDE: &str = "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";

/// Zip container that accepts named XML parts
struct PptxWriter {
    zip: ZipWriter<Cursor<Vec<u8>>>,
    options: SimpleFileOptions,
}

impl PptxWriter {
    fn new() -> Self {
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
            options: SimpleFileOptions::default().compression_method(CompressionMethod::Deflated),
        }
    }

    fn part(&mut self, name: &str, xml: &str) -> Result<()> {
        self.zip.start_file(name, self.options)?;
        self.zip.write_all(XML_HEADER.as_bytes())?;
        self.zip.write_all(xml.as_bytes())?;
        Ok(())
    }

    fn finish(self) -> Result<Vec<u8>> {
        Ok(self.zip.finish()?.into_inner())
    }
}

/// @acp:summary "Encode a deck into PPTX bytes"
pub fn encode(deck: &Deck, created: DateTime<Utc>) -> Result<Vec<u8>> {
    let mut writer = PptxWriter::new();
    let count = deck.slides.len();

    writer.part("[Content_Types].xml", &content_types(count))?;
    writer.part("_rels/.rels", &root_rels())?;
    writer.part("docProps/core.xml", &core_props(deck, created))?;
    writer.part("docProps/app.xml", &app_props(count))?;
    writer.part("ppt/presentation.xml", &presentation(count))?;
    writer.part("ppt/_rels/presentation.xml.rels", &presentation_rels(count))?;
    writer.part("ppt/slideMasters/slideMaster1.xml", &slide_master())?;
    writer.part(
        "ppt/slideMasters/_rels/slideMaster1.xml.rels",
        &relationships(&[
            ("rId1", "slideLayout", "../slideLayouts/slideLayout1.xml"),
            ("rId2", "theme", "../theme/theme1.xml"),
        ]),
    )?;
    writer.part("ppt/slideLayouts/slideLayout1.xml", &slide_layout())?;
    writer.part(
        "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
        &relationships(&[("rId1", "slideMaster", "../slideMasters/slideMaster1.xml")]),
    )?;
    writer.part("ppt/theme/theme1.xml", THEME)?;

    for (i, slide) in deck.slides.iter().enumerate() {
        let n = i + 1;
        writer.part(&format!("ppt/slides/slide{}.xml", n), &slide_xml(slide))?;
        writer.part(
            &format!("ppt/slides/_rels/slide{}.xml.rels", n),
            &relationships(&[("rId1", "slideLayout", "../slideLayouts/slideLayout1.xml")]),
        )?;
    }

    writer.finish()
}

fn content_types(count: usize) -> String {
    let mut xml = String::from(
        r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    );
    xml.push_str(r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#);
    xml.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);
    let overrides = [
        ("/ppt/presentation.xml", "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"),
        ("/ppt/slideMasters/slideMaster1.xml", "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml"),
        ("/ppt/slideLayouts/slideLayout1.xml", "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"),
        ("/ppt/theme/theme1.xml", "application/vnd.openxmlformats-officedocument.theme+xml"),
        ("/docProps/core.xml", "application/vnd.openxmlformats-package.core-properties+xml"),
        ("/docProps/app.xml", "application/vnd.openxmlformats-officedocument.extended-properties+xml"),
    ];
    for (part, content_type) in overrides {
        xml.push_str(&format!(
            r#"<Override PartName="{}" ContentType="{}"/>"#,
            part, content_type
        ));
    }
    for n in 1..=count {
        xml.push_str(&format!(
            r#"<Override PartName="/ppt/slides/slide{}.xml" ContentType="{}"/>"#,
            n, CT_SLIDE
        ));
    }
    xml.push_str("</Types>");
    xml
}

fn root_rels() -> String {
    format!(
        concat!(
            r#"<Relationships xmlns="{rel}">"#,
            r#"<Relationship Id="rId1" Type="{base}/officeDocument" Target="ppt/presentation.xml"/>"#,
            r#"<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>"#,
            r#"<Relationship Id="rId3" Type="{base}/extended-properties" Target="docProps/app.xml"/>"#,
            "</Relationships>"
        ),
        rel = NS_REL,
        base = REL_BASE
    )
}

fn relationships(rels: &[(&str, &str, &str)]) -> String {
    let mut xml = format!(r#"<Relationships xmlns="{}">"#, NS_REL);
    for (id, kind, target) in rels {
        xml.push_str(&format!(
            r#"<Relationship Id="{}" Type="{}/{}" Target="{}"/>"#,
            id, REL_BASE, kind, target
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

/// Escaped text with characters XML 1.0 cannot carry removed
fn xml_text(raw: &str) -> String {
    let kept: String = raw
        .chars()
        .filter(|c| match c {
            '\t' | '\n' | '\r' => true,
            '\u{FFFE}' | '\u{FFFF}' => false,
            c => *c >= ' ',
        })
        .collect();
    escape(kept.as_str()).into_owned()
}

fn core_props(deck: &Deck, created: DateTime<Utc>) -> String {
    let stamp = created.format("%Y-%m-%dT%H:%M:%SZ").to_string();
    format!(
        concat!(
            r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" "#,
            r#"xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" "#,
            r#"xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
            "<dc:title>{title}</dc:title>",
            "<dc:subject>{subject}</dc:subject>",
            "<dc:creator>{author}</dc:creator>",
            "<cp:lastModifiedBy>{author}</cp:lastModifiedBy>",
            "<cp:revision>1</cp:revision>",
            r#"<dcterms:created xsi:type="dcterms:W3CDTF">{stamp}</dcterms:created>"#,
            r#"<dcterms:modified xsi:type="dcterms:W3CDTF">{stamp}</dcterms:modified>"#,
            "</cp:coreProperties>"
        ),
        title = xml_text(&deck.title),
        subject = xml_text(&deck.subject),
        author = xml_text(&deck.author),
        stamp = stamp
    )
}

fn app_props(count: usize) -> String {
    format!(
        concat!(
            r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" "#,
            r#"xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">"#,
            "<Application>atelier</Application>",
            "<PresentationFormat>On-screen Show (16:9)</PresentationFormat>",
            "<Slides>{}</Slides>",
            "</Properties>"
        ),
        count
    )
}

fn presentation(count: usize) -> String {
    let mut xml = format!(
        r#"<p:presentation xmlns:a="{}" xmlns:r="{}" xmlns:p="{}" saveSubsetFonts="1">"#,
        NS_A, NS_R, NS_P
    );
    xml.push_str(r#"<p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>"#);
    if count > 0 {
        xml.push_str("<p:sldIdLst>");
        for n in 0..count {
            xml.push_str(&format!(
                r#"<p:sldId id="{}" r:id="rId{}"/>"#,
                256 + n,
                n + 2
            ));
        }
        xml.push_str("</p:sldIdLst>");
    }
    xml.push_str(&format!(
        r#"<p:sldSz cx="{}" cy="{}"/><p:notesSz cx="6858000" cy="9144000"/>"#,
        SLIDE_CX, SLIDE_CY
    ));
    xml.push_str("</p:presentation>");
    xml
}

fn presentation_rels(count: usize) -> String {
    let slide_targets: Vec<(String, String)> = (1..=count)
        .map(|n| (format!("rId{}", n + 1), format!("slides/slide{}.xml", n)))
        .collect();
    let theme_id = format!("rId{}", count + 2);

    let mut rels = vec![("rId1", "slideMaster", "slideMasters/slideMaster1.xml")];
    rels.extend(
        slide_targets
            .iter()
            .map(|(id, target)| (id.as_str(), "slide", target.as_str())),
    );
    rels.push((theme_id.as_str(), "theme", "theme/theme1.xml"));
    relationships(&rels)
}

const EMPTY_GROUP: &str = concat!(
    r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#,
    r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/>"#,
    r#"<a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#
);

fn slide_master() -> String {
    format!(
        concat!(
            r#"<p:sldMaster xmlns:a="{a}" xmlns:r="{r}" xmlns:p="{p}">"#,
            r#"<p:cSld><p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg>"#,
            "<p:spTree>{group}</p:spTree></p:cSld>",
            r#"<p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" "#,
            r#"accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/>"#,
            r#"<p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst>"#,
            "</p:sldMaster>"
        ),
        a = NS_A,
        r = NS_R,
        p = NS_P,
        group = EMPTY_GROUP
    )
}

fn slide_layout() -> String {
    format!(
        concat!(
            r#"<p:sldLayout xmlns:a="{a}" xmlns:r="{r}" xmlns:p="{p}" type="blank" preserve="1">"#,
            r#"<p:cSld name="Blank"><p:spTree>{group}</p:spTree></p:cSld>"#,
            "<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>",
            "</p:sldLayout>"
        ),
        a = NS_A,
        r = NS_R,
        p = NS_P,
        group = EMPTY_GROUP
    )
}

fn emu(percent: f32, extent: i64) -> i64 {
    (percent.max(0.0) / 100.0 * extent as f32).round() as i64
}

fn xfrm(frame: Frame) -> String {
    format!(
        r#"<a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm>"#,
        emu(frame.x, SLIDE_CX),
        emu(frame.y, SLIDE_CY),
        emu(frame.w, SLIDE_CX),
        emu(frame.h, SLIDE_CY)
    )
}

fn solid_fill(fill: &SolidFill) -> String {
    match fill.alpha {
        Some(alpha) => format!(
            r#"<a:solidFill><a:srgbClr val="{}"><a:alpha val="{}"/></a:srgbClr></a:solidFill>"#,
            fill.hex,
            alpha.min(100) as u32 * 1000
        ),
        None => format!(
            r#"<a:solidFill><a:srgbClr val="{}"/></a:solidFill>"#,
            fill.hex
        ),
    }
}

fn text_body(run: &TextRun) -> String {
    let algn = match run.align {
        Align::Left => "l",
        Align::Center => "ctr",
        Align::Right => "r",
    };

    let mut attrs = format!(
        r#"lang="en-US" sz="{}""#,
        (run.size * 100.0).round() as i64
    );
    if run.italic {
        attrs.push_str(r#" i="1""#);
    }
    if run.all_caps {
        attrs.push_str(r#" cap="all""#);
    }
    if run.spacing > 0.0 {
        attrs.push_str(&format!(r#" spc="{}""#, (run.spacing * 100.0).round() as i64));
    }
    let props = format!(
        r#"<a:rPr {} dirty="0">{}<a:latin typeface="{}"/></a:rPr>"#,
        attrs,
        solid_fill(&run.color),
        run.face.family()
    );

    let mut xml = String::from(
        r#"<p:txBody><a:bodyPr wrap="square" lIns="91440" tIns="45720" rIns="91440" bIns="45720" anchor="ctr"><a:normAutofit/></a:bodyPr><a:lstStyle/>"#,
    );
    if run.text.is_empty() {
        xml.push_str(&format!(
            r#"<a:p><a:pPr algn="{}"/><a:endParaRPr lang="en-US"/></a:p>"#,
            algn
        ));
    }
    for line in run.text.lines() {
        xml.push_str(&format!(
            r#"<a:p><a:pPr algn="{}"/><a:r>{}<a:t>{}</a:t></a:r></a:p>"#,
            algn,
            props,
            xml_text(line)
        ));
    }
    xml.push_str("</p:txBody>");
    xml
}

fn shape_xml(shape: &Shape, id: usize) -> String {
    let name = xml_text(&shape.name);
    match &shape.kind {
        ShapeKind::Rect { fill, text } => {
            let fill = fill
                .as_ref()
                .map(solid_fill)
                .unwrap_or_else(|| "<a:noFill/>".to_string());
            let tx_box = if text.is_some() { r#" txBox="1""# } else { "" };
            format!(
                concat!(
                    r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="{name}"/><p:cNvSpPr{tx_box}/><p:nvPr/></p:nvSpPr>"#,
                    r#"<p:spPr>{xfrm}<a:prstGeom prst="rect"><a:avLst/></a:prstGeom>{fill}</p:spPr>"#,
                    "{body}</p:sp>"
                ),
                id = id,
                name = name,
                tx_box = tx_box,
                xfrm = xfrm(shape.frame),
                fill = fill,
                body = text.as_ref().map(text_body).unwrap_or_default()
            )
        }
        ShapeKind::Line { color, weight } => format!(
            concat!(
                r#"<p:cxnSp><p:nvCxnSpPr><p:cNvPr id="{id}" name="{name}"/><p:cNvCxnSpPr/><p:nvPr/></p:nvCxnSpPr>"#,
                r#"<p:spPr>{xfrm}<a:prstGeom prst="line"><a:avLst/></a:prstGeom>"#,
                r#"<a:ln w="{w}">{fill}</a:ln></p:spPr></p:cxnSp>"#
            ),
            id = id,
            name = name,
            xfrm = xfrm(shape.frame),
            w = (weight * EMU_PER_POINT).round() as i64,
            fill = solid_fill(color)
        ),
    }
}

fn slide_xml(slide: &DeckSlide) -> String {
    let shapes: String = slide
        .shapes
        .iter()
        .enumerate()
        .map(|(i, shape)| shape_xml(shape, i + 2))
        .collect();

    format!(
        concat!(
            r#"<p:sld xmlns:a="{a}" xmlns:r="{r}" xmlns:p="{p}">"#,
            "<p:cSld><p:bg><p:bgPr>{bg}<a:effectLst/></p:bgPr></p:bg>",
            "<p:spTree>{group}{shapes}</p:spTree></p:cSld>",
            "<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>",
            "</p:sld>"
        ),
        a = NS_A,
        r = NS_R,
        p = NS_P,
        bg = solid_fill(&SolidFill {
            hex: slide.background.clone(),
            alpha: None,
        }),
        group = EMPTY_GROUP,
        shapes = shapes
    )
}

const THEME: &str = concat!(
    r#"<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Atelier">"#,
    "<a:themeElements>",
    r#"<a:clrScheme name="Atelier">"#,
    r#"<a:dk1><a:srgbClr val="000000"/></a:dk1><a:lt1><a:srgbClr val="FFFFFF"/></a:lt1>"#,
    r#"<a:dk2><a:srgbClr val="1A1A1A"/></a:dk2><a:lt2><a:srgbClr val="F4F1EA"/></a:lt2>"#,
    r#"<a:accent1><a:srgbClr val="C9A227"/></a:accent1><a:accent2><a:srgbClr val="8C8C8C"/></a:accent2>"#,
    r#"<a:accent3><a:srgbClr val="7A1F2B"/></a:accent3><a:accent4><a:srgbClr val="333333"/></a:accent4>"#,
    r#"<a:accent5><a:srgbClr val="666666"/></a:accent5><a:accent6><a:srgbClr val="999999"/></a:accent6>"#,
    r#"<a:hlink><a:srgbClr val="C9A227"/></a:hlink><a:folHlink><a:srgbClr val="8C8C8C"/></a:folHlink>"#,
    "</a:clrScheme>",
    r#"<a:fontScheme name="Atelier">"#,
    r#"<a:majorFont><a:latin typeface="Times New Roman"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont>"#,
    r#"<a:minorFont><a:latin typeface="Arial"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont>"#,
    "</a:fontScheme>",
    r#"<a:fmtScheme name="Atelier">"#,
    "<a:fillStyleLst>",
    r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#,
    r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#,
    r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#,
    "</a:fillStyleLst>",
    "<a:lnStyleLst>",
    r#"<a:ln w="6350"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>"#,
    r#"<a:ln w="12700"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>"#,
    r#"<a:ln w="19050"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>"#,
    "</a:lnStyleLst>",
    "<a:effectStyleLst>",
    "<a:effectStyle><a:effectLst/></a:effectStyle>",
    "<a:effectStyle><a:effectLst/></a:effectStyle>",
    "<a:effectStyle><a:effectLst/></a:effectStyle>",
    "</a:effectStyleLst>",
    "<a:bgFillStyleLst>",
    r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#,
    r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#,
    r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#,
    "</a:bgFillStyleLst>",
    "</a:fmtScheme>",
    "</a:themeElements>",
    "</a:theme>"
);
