use scraper::{Html, Selector};

/// Parsed view of a fetched page: the title tag, the body text with the
/// title excluded, and the raw anchor targets in document order.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub title: Option<String>,
    pub text: String,
    pub links: Vec<String>,
}

pub fn parse_page(bytes: &[u8]) -> Page {
    let raw = String::from_utf8_lossy(bytes);
    let doc = Html::parse_document(&raw);

    let sel_title = Selector::parse("title").expect("valid selector");
    let sel_body = Selector::parse("body").expect("valid selector");
    let sel_a = Selector::parse("a").expect("valid selector");

    let title = doc
        .select(&sel_title)
        .next()
        .map(|n| n.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty());

    // Plain-text responses also end up inside an implicit <body>.
    let text = doc
        .select(&sel_body)
        .next()
        .map(|n| n.text().collect::<String>())
        .unwrap_or_default();

    let links = doc
        .select(&sel_a)
        .filter_map(|a| a.value().attr("href"))
        .map(str::to_string)
        .collect();

    Page { title, text, links }
}
