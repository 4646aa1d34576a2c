//! Landing page rendering: group talks by year and splice them into the
//! site template.
//!
//! The template is a complete HTML document; only the body of its
//! `talks-by-year` section and its `Last updated:` marker are rewritten, so
//! the surrounding document stays byte-identical across runs.

use anyhow::{bail, Context, Result};
use chrono::Datelike;
use pulldown_cmark::{html, Parser};
use regex::{NoExpand, Regex};
use std::path::Path;

use crate::process::TalkRecord;

const TEMPLATE_FILE: &str = "landing.html";
const STYLE_FILE: &str = "style.css";
const HERO_FILE: &str = "hero.jpg";

/// Render the landing page for `records` into `output_root/index.html`.
///
/// A missing template is an error and nothing is written; a partial landing
/// page is worse than none.
pub fn render_landing(
    records: &[TalkRecord],
    template_dir: &Path,
    output_root: &Path,
) -> Result<()> {
    let template_file = template_dir.join(TEMPLATE_FILE);
    if !template_file.exists() {
        bail!("template file not found: {}", template_file.display());
    }
    let template = std::fs::read_to_string(&template_file)
        .with_context(|| format!("read template: {}", template_file.display()))?;

    let stamp = chrono::Local::now().format("%a %b %d %Y").to_string();
    let updated = substitute(&template, &talks_list_html(records), &stamp)?;

    let out_file = output_root.join("index.html");
    std::fs::write(&out_file, updated)
        .with_context(|| format!("write landing page: {}", out_file.display()))?;
    tracing::info!("wrote landing page with {} talk(s)", records.len());
    Ok(())
}

/// Copy the stylesheet and hero image next to the landing page.
/// Missing assets are skipped, not errors.
pub fn copy_assets(template_dir: &Path, output_root: &Path) -> Result<()> {
    for name in [STYLE_FILE, HERO_FILE] {
        let src = template_dir.join(name);
        if src.exists() {
            std::fs::copy(&src, output_root.join(name))
                .with_context(|| format!("copy asset: {}", src.display()))?;
        }
    }
    Ok(())
}

/// Talks sorted newest-first and grouped by year, years descending.
/// Outcomes arrive in completion order, which varies run to run; sorting by
/// handle before the stable date sort keeps repeated runs byte-identical.
fn grouped_by_year(records: &[TalkRecord]) -> Vec<(i32, Vec<TalkRecord>)> {
    let mut sorted: Vec<TalkRecord> = records.to_vec();
    sorted.sort_by(|a, b| a.handle.cmp(&b.handle));
    sorted.sort_by(|a, b| b.meta.date.cmp(&a.meta.date));

    let mut groups: Vec<(i32, Vec<TalkRecord>)> = Vec::new();
    for talk in sorted {
        let year = talk.meta.date.year();
        match groups.last_mut() {
            Some((y, talks)) if *y == year => talks.push(talk),
            _ => groups.push((year, vec![talk])),
        }
    }
    groups
}

/// The zero-padded thumbnail filename for a talk's highlight slide.
/// The conversion tool pads to 2 digits below 100 slides and 3 from 100 up;
/// this must match its naming exactly or the image link breaks.
fn highlight_image(highlight: u32, slide_count: usize) -> String {
    let width = if slide_count >= 100 { 3 } else { 2 };
    format!("slide-{highlight:0width$}.png")
}

/// Markdown to HTML, with a single wrapping paragraph stripped so the
/// description reads inline inside the entry markup.
fn markdown_inline(text: &str) -> String {
    let mut out = String::new();
    html::push_html(&mut out, Parser::new(text));
    let out = out.trim();
    match out
        .strip_prefix("<p>")
        .and_then(|rest| rest.strip_suffix("</p>"))
    {
        Some(inner) if !inner.contains("<p>") => inner.to_string(),
        _ => out.to_string(),
    }
}

fn talk_entry_html(talk: &TalkRecord) -> String {
    let handle = &talk.handle;
    let description = markdown_inline(&talk.meta.description);
    let image = highlight_image(talk.meta.highlight, talk.slide_count);

    let mut links = format!("<a href=\"{handle}/{}\">PDF</a>", talk.meta.pdf);
    if let Some(video) = &talk.meta.video {
        links.push_str(&format!(", <a href=\"{video}\">Video</a>"));
    }

    format!(
        r#"            <li class="talk-entry">
                <a href="{handle}/index.html">{title}</a>  ({links})
                <p class="talk-desc">
                    {description}
                </p>
                <figure>
                    <a href="{handle}/index.html" class="img-link"><img src="{handle}/{image}"></img></a>
                </figure>
            </li>"#,
        title = talk.meta.title,
    )
}

/// The full `<ol>` of year headings and talk entries.
fn talks_list_html(records: &[TalkRecord]) -> String {
    let mut entries = Vec::new();
    for (year, talks) in grouped_by_year(records) {
        entries.push(format!(
            "            <li class=\"year-heading\">{year}</li>"
        ));
        for talk in &talks {
            entries.push(talk_entry_html(talk));
        }
    }
    format!(
        "        <ol type=\"1\">\n{}\n        </ol>",
        entries.join("\n")
    )
}

/// Splice the talk list into the `talks-by-year` section and refresh the
/// `Last updated:` marker, leaving the rest of the template untouched.
fn substitute(template: &str, talks_html: &str, stamp: &str) -> Result<String> {
    let section_re =
        Regex::new(r#"(?s)(<section id="talks-by-year" class="level1">)(.*?)(</section>)"#)
            .context("compile section pattern")?;
    let updated = section_re.replace(template, |caps: &regex::Captures| {
        format!("{}\n{talks_html}\n    {}", &caps[1], &caps[3])
    });

    let stamp_re = Regex::new(r"(?s)Last updated:.*?</div>").context("compile stamp pattern")?;
    let updated = stamp_re.replace(
        &updated,
        NoExpand(&format!("Last updated: {stamp}\n</div>")),
    );

    Ok(updated.into_owned())
}
