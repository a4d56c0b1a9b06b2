//! Benchmarks for chapter translation.
//!
//! Run with: cargo bench

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};

use folio::dom::parse_html;
use folio::latex::{AssetStore, TranslationContext, Translator, escape_tex};
use folio::{Markers, Result};

const CHAPTER: &str = include_str!("../tests/fixtures/book/ch1.html");

struct NoAssets;

impl AssetStore for NoAssets {
    fn store_image(&mut self, src: &str) -> Result<String> {
        Ok(src.to_string())
    }
}

/// The fixture chapter repeated until it resembles a long grammar chapter.
fn long_chapter() -> String {
    let body_start = CHAPTER.find("<h2").unwrap();
    let body_end = CHAPTER.find("</body>").unwrap();
    let body = &CHAPTER[body_start..body_end];
    let mut html = String::from("<html><body><h1>Long</h1>");
    for _ in 0..200 {
        html.push_str(body);
    }
    html.push_str("</body></html>");
    html
}

fn bench_parse(c: &mut Criterion) {
    let html = long_chapter();
    c.bench_function("parse_chapter", |b| {
        b.iter(|| parse_html(black_box(&html)));
    });
}

fn bench_translate(c: &mut Criterion) {
    let html = long_chapter();
    let dom = parse_html(&html);
    let h1 = dom.find_by_tag("h1").unwrap();
    let markers = Markers::default();

    c.bench_function("translate_chapter", |b| {
        b.iter(|| {
            let mut assets = NoAssets;
            let mut translator = Translator::new(&dom, "long", &markers, &mut assets);
            translator
                .translate(Some(h1), 2, TranslationContext::default())
                .unwrap()
        });
    });
}

fn bench_escape(c: &mut Criterion) {
    let text = "日本語の「です」、100% of {braces} & <tags> | x^2 ~ a_b ".repeat(500);
    c.bench_function("escape_tex", |b| {
        b.iter(|| escape_tex(black_box(&text)));
    });
}

criterion_group!(benches, bench_parse, bench_translate, bench_escape);
criterion_main!(benches);
