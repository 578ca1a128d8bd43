//! Plain-text PDF creation using lopdf
//!
//! Renders pre-formatted text (the email converter's output) across letter
//! pages with a simple print layout: Helvetica 10pt, 13pt leading, 1-inch
//! side margins. Uses the standard Type1 Helvetica font, which every PDF
//! viewer supplies, so nothing has to be embedded.

use std::path::Path;

use lopdf::{Dictionary, Document, Object, Stream};

use crate::error::Result;

/// US Letter, in points
const PAGE_WIDTH: f64 = 612.0;
const PAGE_HEIGHT: f64 = 792.0;

const LEFT_MARGIN: f64 = 72.0;
const RIGHT_MARGIN: f64 = 72.0;
/// First baseline, 10.5 inches up the page
const TOP_Y: f64 = 756.0;
const BOTTOM_MARGIN: f64 = 72.0;

const FONT_SIZE: f64 = 10.0;
const LEADING: f64 = 13.0;

/// Write `text` to a multi-page PDF and return the number of pages used.
///
/// Line breaks in the input are honored; lines wider than the text area are
/// word-wrapped using measured Helvetica widths.
pub fn write_text_pdf(output: &Path, text: &str) -> Result<usize> {
    let usable_width = PAGE_WIDTH - LEFT_MARGIN - RIGHT_MARGIN;
    let lines = wrap_text_lines(text, usable_width, FONT_SIZE);
    let pages = paginate(&lines);

    let mut doc = Document::with_version("1.5");

    let font_id = doc.add_object(helvetica_font());
    let pages_id = doc.new_object_id();

    let mut kids: Vec<Object> = Vec::new();
    for page_lines in &pages {
        let content = render_page_content(page_lines);
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

        let mut resources = Dictionary::new();
        let mut fonts = Dictionary::new();
        fonts.set("F1", Object::Reference(font_id));
        resources.set("Font", Object::Dictionary(fonts));

        let mut page = Dictionary::new();
        page.set("Type", Object::Name(b"Page".to_vec()));
        page.set("Parent", Object::Reference(pages_id));
        page.set(
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(PAGE_WIDTH as i64),
                Object::Integer(PAGE_HEIGHT as i64),
            ]),
        );
        page.set("Resources", Object::Dictionary(resources));
        page.set("Contents", Object::Reference(content_id));

        let page_id = doc.add_object(Object::Dictionary(page));
        kids.push(Object::Reference(page_id));
    }

    let mut pages_object = Dictionary::new();
    pages_object.set("Type", Object::Name(b"Pages".to_vec()));
    pages_object.set("Count", Object::Integer(pages.len() as i64));
    pages_object.set("Kids", Object::Array(kids));
    doc.objects
        .insert(pages_id, Object::Dictionary(pages_object));

    let catalog_id = doc.new_object_id();
    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", Object::Reference(pages_id));
    doc.objects.insert(catalog_id, Object::Dictionary(catalog));
    doc.trailer.set("Root", Object::Reference(catalog_id));

    doc.compress();
    doc.save(output)?;

    Ok(pages.len())
}

/// Standard Type1 Helvetica with WinAnsiEncoding
fn helvetica_font() -> Dictionary {
    let mut font = Dictionary::new();
    font.set("Type", Object::Name(b"Font".to_vec()));
    font.set("Subtype", Object::Name(b"Type1".to_vec()));
    font.set("BaseFont", Object::Name(b"Helvetica".to_vec()));
    font.set("Encoding", Object::Name(b"WinAnsiEncoding".to_vec()));
    font
}

/// Split lines across pages: a line that would land below the bottom margin
/// starts a new page.
fn paginate(lines: &[String]) -> Vec<Vec<String>> {
    let mut pages: Vec<Vec<String>> = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut y = TOP_Y;

    for line in lines {
        if y < BOTTOM_MARGIN {
            pages.push(std::mem::take(&mut current));
            y = TOP_Y;
        }
        current.push(line.clone());
        y -= LEADING;
    }
    pages.push(current);

    pages
}

/// Build the content stream for one page of lines
fn render_page_content(lines: &[String]) -> String {
    let mut content = String::new();
    content.push_str("BT\n");
    content.push_str(&format!("/F1 {} Tf\n", FONT_SIZE));
    content.push_str(&format!("{} TL\n", LEADING));
    content.push_str(&format!("1 0 0 1 {} {} Tm\n", LEFT_MARGIN, TOP_Y));

    for line in lines {
        if line.is_empty() {
            content.push_str("T*\n");
        } else {
            content.push_str(&format!("({}) Tj T*\n", escape_pdf_string(line)));
        }
    }

    content.push_str("ET\n");
    content
}

/// Escape a string for a PDF literal, mapping unencodable characters to '?'
fn escape_pdf_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '(' => out.push_str("\\("),
            ')' => out.push_str("\\)"),
            ' '..='~' => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

/// Wrap text so every line fits within `max_width` points at `font_size`.
///
/// Wrapping is word-based: a word that would push the current line past the
/// limit starts a new line. Existing line breaks are kept.
pub fn wrap_text_lines(text: &str, max_width: f64, font_size: f64) -> Vec<String> {
    let mut lines = Vec::new();

    for raw_line in text.lines() {
        let line = raw_line.trim_end_matches('\r');
        if line.is_empty() {
            lines.push(String::new());
            continue;
        }

        let mut current = String::new();
        for word in line.split(' ') {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };
            if string_width(&candidate, font_size) <= max_width {
                current = candidate;
            } else {
                if !current.is_empty() {
                    lines.push(current);
                }
                current = word.to_string();
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }

    lines
}

/// Measured width of `text` in points at `font_size`
pub fn string_width(text: &str, font_size: f64) -> f64 {
    let units: u32 = text.chars().map(helvetica_width).sum();
    units as f64 / 1000.0 * font_size
}

/// Helvetica glyph width in 1/1000ths of the em square
///
/// Covers the ASCII printable range; anything else gets an average width,
/// which is plenty for wrapping purposes.
fn helvetica_width(c: char) -> u32 {
    const WIDTHS: [u32; 95] = [
        278, // 32 space
        278, // 33 !
        355, // 34 "
        556, // 35 #
        556, // 36 $
        889, // 37 %
        667, // 38 &
        191, // 39 '
        333, // 40 (
        333, // 41 )
        389, // 42 *
        584, // 43 +
        278, // 44 ,
        333, // 45 -
        278, // 46 .
        278, // 47 /
        556, // 48 0
        556, // 49 1
        556, // 50 2
        556, // 51 3
        556, // 52 4
        556, // 53 5
        556, // 54 6
        556, // 55 7
        556, // 56 8
        556, // 57 9
        278, // 58 :
        278, // 59 ;
        584, // 60 <
        584, // 61 =
        584, // 62 >
        556, // 63 ?
        1015, // 64 @
        667, // 65 A
        667, // 66 B
        722, // 67 C
        722, // 68 D
        667, // 69 E
        611, // 70 F
        778, // 71 G
        722, // 72 H
        278, // 73 I
        500, // 74 J
        667, // 75 K
        556, // 76 L
        833, // 77 M
        722, // 78 N
        778, // 79 O
        667, // 80 P
        778, // 81 Q
        722, // 82 R
        667, // 83 S
        611, // 84 T
        722, // 85 U
        667, // 86 V
        944, // 87 W
        667, // 88 X
        667, // 89 Y
        611, // 90 Z
        278, // 91 [
        278, // 92 \
        278, // 93 ]
        469, // 94 ^
        556, // 95 _
        333, // 96 `
        556, // 97 a
        556, // 98 b
        500, // 99 c
        556, // 100 d
        556, // 101 e
        278, // 102 f
        556, // 103 g
        556, // 104 h
        222, // 105 i
        222, // 106 j
        500, // 107 k
        222, // 108 l
        833, // 109 m
        556, // 110 n
        556, // 111 o
        556, // 112 p
        556, // 113 q
        333, // 114 r
        500, // 115 s
        278, // 116 t
        556, // 117 u
        500, // 118 v
        722, // 119 w
        500, // 120 x
        500, // 121 y
        500, // 122 z
        334, // 123 {
        260, // 124 |
        334, // 125 }
        584, // 126 ~
    ];

    let code = c as u32;
    if (32..=126).contains(&code) {
        WIDTHS[(code - 32) as usize]
    } else {
        556
    }
}
