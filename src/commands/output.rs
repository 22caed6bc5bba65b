//! @acp:module "Output Formatting"
//! @acp:summary "Console rendering of the concept, slides and roadmap tabs"
//! @acp:domain cli
//! @acp:layer presentation

use console::{style, Style, Term};

use crate::plan::{Palette, PaletteRole, Plan};
use crate::preview::terminal::{ansi256, wrap};
use crate::preview::{render_slide, render_slide_text, PreviewOptions, CLOSING_NOTE};

/// Width used for framed output; falls back to 80 when not a terminal
pub fn terminal_width() -> usize {
    let (_, cols) = Term::stdout().size();
    (cols as usize).clamp(40, 100)
}

fn eyebrow(text: &str) -> String {
    style(text.to_uppercase()).yellow().dim().to_string()
}

fn print_wrapped(text: &str, indent: usize, width: usize) {
    let pad = " ".repeat(indent);
    for line in wrap(text, width.saturating_sub(indent)) {
        println!("{}{}", pad, line);
    }
}

/// One swatch per palette role: a colored block and the role name
pub fn format_palette(palette: &Palette) -> String {
    PaletteRole::ALL
        .iter()
        .map(|role| {
            let block = Style::new()
                .bg(console::Color::Color256(ansi256(palette.get(*role))))
                .apply_to("    ");
            format!("{} {} {}", block, role.name(), style(palette.css(*role)).dim())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// @acp:summary "Concept tab: title, description, keywords and palette"
pub fn print_concept(plan: &Plan) {
    let width = terminal_width();
    println!("\n{}", eyebrow("Identity Analysis"));
    println!("{}\n", style(&plan.title).bold());
    print_wrapped(&plan.concept_description, 2, width);

    println!("\n{}", eyebrow("Keywords"));
    println!(
        "  {}",
        plan.keywords
            .iter()
            .map(|k| format!("({})", k))
            .collect::<Vec<_>>()
            .join(" ")
    );

    println!("\n{}", eyebrow("Color Palette"));
    for line in format_palette(&plan.color_palette).lines() {
        println!("  {}", line);
    }
    println!();
}

/// @acp:summary "Slides tab: framed preview, caption and details panel"
pub fn print_slide(plan: &Plan, index: usize, options: &PreviewOptions) {
    let width = terminal_width();
    let Some(slide) = plan.slides.get(index) else {
        println!("{} This plan has no slides", style("⚠").yellow());
        return;
    };

    println!();
    match render_slide(slide, &plan.color_palette, index, options) {
        Some(view) => println!("{}", render_slide_text(&view, plan.slide_count(), width)),
        None => println!(
            "{} No template for layout '{}'",
            style("⚠").yellow(),
            slide.layout_type
        ),
    }
    println!(
        "{}",
        style(format!("SLIDE {} / {}", index + 1, plan.slide_count())).dim()
    );

    for (label, text) in [
        ("Structure", slide.title.as_str()),
        ("Content Strategy", slide.body.as_str()),
        ("Visual Direction", slide.visual_direction.as_str()),
    ] {
        println!("\n{}", eyebrow(label));
        print_wrapped(text, 2, width);
    }
    println!();
}

/// Roadmap tab text: heading, numbered steps wrapped to `width`, closing note
pub fn format_roadmap(plan: &Plan, width: usize) -> String {
    let mut lines = vec![
        String::new(),
        eyebrow("Execution Strategy"),
        style(format!("How to build \"{}\"", plan.title)).bold().to_string(),
        String::new(),
    ];
    for (i, step) in plan.action_plan.iter().enumerate() {
        let number = format!("{:>2}. ", i + 1);
        let mut wrapped = wrap(step, width.saturating_sub(6)).into_iter();
        if let Some(first) = wrapped.next() {
            lines.push(format!("  {}{}", style(number).yellow(), first));
        }
        lines.extend(wrapped.map(|line| format!("      {}", line)));
        lines.push(String::new());
    }
    lines.push(format!("  {}", style(format!("\"{}\"", CLOSING_NOTE)).italic().dim()));
    lines.join("\n")
}

/// @acp:summary "Roadmap tab: numbered action steps"
pub fn print_roadmap(plan: &Plan) {
    println!("{}\n", format_roadmap(plan, terminal_width()));
}
