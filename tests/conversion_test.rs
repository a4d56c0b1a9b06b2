//! End-to-end conversion tests.
//!
//! Convert small books (the fixture under `tests/fixtures/book` or books
//! written into a temp dir) and inspect the LaTeX tree that comes out.

use std::collections::HashSet;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use folio::{Config, Error, convert_book};
use image::{ImageFormat, Rgba, RgbaImage};
use tempfile::TempDir;

fn fixture_book() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/book")
}

fn read(path: impl AsRef<Path>) -> String {
    fs::read_to_string(path).unwrap()
}

fn write_book(dir: &Path, files: &[(&str, &str)]) {
    for (name, content) in files {
        let path = dir.join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
}

// ============================================================================
// Fixture Book
// ============================================================================

#[test]
fn test_master_inputs_chapters_in_toc_order() {
    let output = TempDir::new().unwrap();
    let config = Config::new(fixture_book()).with_output_dir(output.path());

    let report = convert_book(&config).unwrap();

    assert_eq!(report.chapters, vec!["ch1", "ch2"]);
    assert_eq!(report.skipped, vec!["练习"]);
    assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);
    assert_eq!(
        read(output.path().join("body.tex")),
        "\\input{out/ch1}\n\\input{out/ch2}\n"
    );
}

#[test]
fn test_chapter_starts_with_heading_and_anchor() {
    let output = TempDir::new().unwrap();
    let config = Config::new(fixture_book()).with_output_dir(output.path());
    convert_book(&config).unwrap();

    let ch1 = read(output.path().join("out/ch1.tex"));
    assert!(ch1.starts_with("\\chapter{Intro}\n\\hypertarget{ch1}{\\label{ch1}}"));

    let ch2 = read(output.path().join("out/ch2.tex"));
    assert!(ch2.starts_with("\\section{Writing\\_Systems}\n\\hypertarget{ch2}{\\label{ch2}}"));
    assert!(ch2.contains("\\hypertarget{ch2-kana}{\\label{ch2-kana}}\\subsection{Kana}\n"));
}

#[test]
fn test_chapter_body_translation() {
    let output = TempDir::new().unwrap();
    let config = Config::new(fixture_book()).with_output_dir(output.path());
    convert_book(&config).unwrap();
    let ch1 = read(output.path().join("out/ch1.tex"));

    // Navigation, attribution and the exercise menu are gone.
    assert!(!ch1.contains("Tae Kim"));
    assert!(!ch1.contains("练习"));
    assert!(!ch1.contains("目录"));

    assert!(ch1.contains(
        "\\hypertarget{ch1-why-japanese}{\\label{ch1-why-japanese}}\\section{Why learn Japanese?}\n"
    ));
    assert!(ch1.contains(
        "Japanese uses {\\jpb}「かな」{\\jpb}、{\\jpb}and kanji. Costs 100\\%\\footnote{Not really.}"
    ));
    assert_eq!(ch1.matches("Not really.").count(), 1);
    assert!(ch1.contains("\\tkboxheader{Tip}"));
    assert!(ch1.contains("\\begin{itemize}\n\\item \\textbf{Hiragana}\n\\item \\textit{Katakana}\n\\end{itemize}\n"));
    assert!(ch1.contains("\\hyperlink{ch2-kana}{kana}\\linktarget{ (P\\pageref{ch2-kana})}"));
    assert!(ch1.contains(
        "\\href{https://example.com/guide}{the guide}\\linktarget{\\footnote{\\url{https://example.com/guide}}}"
    ));
}

#[test]
fn test_table_rows_match_header() {
    let output = TempDir::new().unwrap();
    let config = Config::new(fixture_book()).with_output_dir(output.path());
    convert_book(&config).unwrap();
    let ch1 = read(output.path().join("out/ch1.tex"));

    let start = ch1.find("\\begin{tabular}{ccc}\n").unwrap();
    let end = ch1.find("\\end{tabular}").unwrap();
    let rows: Vec<_> = ch1[start..end]
        .lines()
        .skip(1)
        .filter(|line| !line.is_empty())
        .collect();

    assert_eq!(rows.len(), 3);
    for row in rows {
        assert_eq!(row.matches(" & ").count(), 2, "row: {row}");
        assert!(row.ends_with("\\\\"));
    }
}

#[test]
fn test_cross_references_resolve_to_labels() {
    let output = TempDir::new().unwrap();
    let config = Config::new(fixture_book()).with_output_dir(output.path());
    convert_book(&config).unwrap();

    let all = read(output.path().join("out/ch1.tex")) + &read(output.path().join("out/ch2.tex"));
    let labels: Vec<_> = all
        .match_indices("\\label{")
        .map(|(i, m)| all[i + m.len()..].split('}').next().unwrap())
        .collect();
    let unique: HashSet<_> = labels.iter().collect();
    assert_eq!(unique.len(), labels.len(), "duplicate labels: {labels:?}");

    for target in all
        .match_indices("\\hyperlink{")
        .map(|(i, m)| all[i + m.len()..].split('}').next().unwrap())
    {
        assert!(unique.contains(&target), "dangling link to {target}");
    }
}

#[test]
fn test_custom_chapter_dir() {
    let output = TempDir::new().unwrap();
    let config = Config::new(fixture_book())
        .with_output_dir(output.path())
        .with_chapter_dir("chapters");
    convert_book(&config).unwrap();

    assert_eq!(
        read(output.path().join("body.tex")),
        "\\input{chapters/ch1}\n\\input{chapters/ch2}\n"
    );
    assert!(output.path().join("chapters/ch2.tex").is_file());
}

// ============================================================================
// Assets
// ============================================================================

#[test]
fn test_gif_is_converted_and_referenced() {
    let source = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_book(
        source.path(),
        &[
            ("index.html", r#"<h2>目录</h2><ul><li><a href="ch2.html">Kana</a></li></ul>"#),
            ("ch2.html", r#"<h1>Kana</h1><p><img src="ch2/foo.gif"></p>"#),
        ],
    );
    let mut gif = Cursor::new(Vec::new());
    RgbaImage::from_pixel(4, 4, Rgba([0, 0, 255, 255]))
        .write_to(&mut gif, ImageFormat::Gif)
        .unwrap();
    fs::create_dir_all(source.path().join("ch2")).unwrap();
    fs::write(source.path().join("ch2/foo.gif"), gif.into_inner()).unwrap();

    let config = Config::new(source.path()).with_output_dir(output.path());
    convert_book(&config).unwrap();

    let png = output.path().join("out/ch2/foo.png");
    assert!(png.is_file());
    assert_eq!(image::open(&png).unwrap().width(), 4);
    assert!(read(output.path().join("out/ch2.tex")).contains(
        "\\begin{center}\\includegraphics[width=0.5\\textwidth]{out/ch2/foo.png}\\end{center}"
    ));
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_missing_chapter_file_aborts() {
    let source = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_book(
        source.path(),
        &[("index.html", r#"<h2>目录</h2><ul><li><a href="gone.html">Gone</a></li></ul>"#)],
    );

    let config = Config::new(source.path()).with_output_dir(output.path());
    let err = convert_book(&config).unwrap_err();
    assert!(matches!(err, Error::Io { ref path, .. } if path.ends_with("gone.html")));
}

#[test]
fn test_chapter_without_h1_aborts() {
    let source = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_book(
        source.path(),
        &[
            ("index.html", r#"<h2>目录</h2><ul><li><a href="a.html">A</a></li></ul>"#),
            ("a.html", "<p>untitled</p>"),
        ],
    );

    let config = Config::new(source.path()).with_output_dir(output.path());
    assert!(matches!(convert_book(&config), Err(Error::MissingElement(_))));
}

#[test]
fn test_toc_deeper_than_sectioning_aborts() {
    let source = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let nested = format!(
        "<h2>目录</h2>{}<li><a href=\"a.html\">A</a></li>{}",
        "<ul>".repeat(7),
        "</ul>".repeat(7)
    );
    write_book(
        source.path(),
        &[("index.html", nested.as_str()), ("a.html", "<h1>A</h1>")],
    );

    let config = Config::new(source.path()).with_output_dir(output.path());
    assert!(matches!(convert_book(&config), Err(Error::HeadingDepth(7))));
}
