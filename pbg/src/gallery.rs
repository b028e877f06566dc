use itertools::Itertools;
use pixabay::Hit;

/// Marker class on the full-size link of every card; the lightbox finds
/// its images through it.
pub const LINK_CLASS: &str = "gallery__link";

#[derive(Debug, Clone)]
struct Card {
    href: String,
    markup: String,
}

fn render_card(hit: &Hit) -> Card {
    let markup = format!(
        r#"
      <a class="{LINK_CLASS}" href="{large}">
        <div class="gallery__photo-card">
          <div class="gallery__image-container">
            <img class="gallery__image" src="{src}" alt="{tags}" loading="lazy" />
          </div>
          <div class="gallery__info">
            <p class="gallery__info-item">
              <b>Likes<br>{likes}</b>
            </p>
            <p class="gallery__info-item">
              <b>Views<br>{views}</b>
            </p>
            <p class="gallery__info-item">
              <b>Comments<br>{comments}</b>
            </p>
            <p class="gallery__info-item">
              <b>Downloads<br>{downloads}</b>
            </p>
          </div>
        </div>
      </a>"#,
        large = hit.large_image_url,
        src = hit.webformat_url,
        tags = hit.tags,
        likes = hit.likes,
        views = hit.views,
        comments = hit.comments,
        downloads = hit.downloads,
    );
    Card {
        href: hit.large_image_url.clone(),
        markup,
    }
}

/// The gallery container: an append-only list of rendered cards plus the
/// loading indicator next to it.
#[derive(Debug, Default)]
pub struct Gallery {
    cards: Vec<Card>,
    loading: bool,
}

impl Gallery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one card per hit after the existing ones.
    pub fn append(&mut self, hits: &[Hit]) {
        self.cards.extend(hits.iter().map(render_card));
        debug!("gallery: +{} cards, {} total", hits.len(), self.cards.len());
    }

    pub fn clear(&mut self) {
        if !self.cards.is_empty() {
            debug!("gallery: cleared {} cards", self.cards.len());
        }
        self.cards.clear();
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Full-size hrefs of every marked link, in document order.
    pub fn links(&self) -> impl Iterator<Item = &str> {
        self.cards.iter().map(|c| c.href.as_str())
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Inner markup of the gallery container.
    pub fn markup(&self) -> String {
        self.cards.iter().map(|c| c.markup.as_str()).join("")
    }

    /// A standalone page holding the search form, the gallery and its
    /// loading indicator and sentinel.
    pub fn document(&self, query: &str) -> String {
        let hidden = if self.loading { "" } else { " is-hidden" };
        format!(
            r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="UTF-8" />
    <title>{title}</title>
  </head>
  <body>
    <form id="search-form">
      <input type="text" name="searchQuery" value="{query}" autocomplete="off" placeholder="Search images..." />
      <button type="submit">Search</button>
    </form>
    <div class="gallery">{cards}
    </div>
    <div class="gallery__sentinel"></div>
    <div class="gallery__loading{hidden}"></div>
  </body>
</html>
"#,
            title = if query.is_empty() { "Image search" } else { query },
            cards = self.markup(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(id: u64) -> Hit {
        Hit {
            id,
            webformat_url: format!("https://cdn.example/{id}_640.jpg"),
            large_image_url: format!("https://cdn.example/{id}_1280.jpg"),
            tags: format!("tag{id}, cat"),
            likes: id,
            views: id * 10,
            comments: 1,
            downloads: 2,
            ..Default::default()
        }
    }

    #[test]
    fn card_exposes_marked_full_size_link() {
        let mut g = Gallery::new();
        g.append(&[hit(7)]);
        let m = g.markup();
        assert!(m.contains(r#"<a class="gallery__link" href="https://cdn.example/7_1280.jpg">"#));
        assert!(m.contains(r#"src="https://cdn.example/7_640.jpg" alt="tag7, cat" loading="lazy""#));
        assert!(m.contains("<b>Likes<br>7</b>"));
        assert!(m.contains("<b>Views<br>70</b>"));
        assert!(m.contains("<b>Comments<br>1</b>"));
        assert!(m.contains("<b>Downloads<br>2</b>"));
    }

    #[test]
    fn append_preserves_prior_cards() {
        let mut g = Gallery::new();
        g.append(&[hit(1), hit(2)]);
        let first = g.markup();
        g.append(&[hit(3)]);
        assert_eq!(g.len(), 3);
        assert!(g.markup().starts_with(&first));
        let links: Vec<_> = g.links().collect();
        assert_eq!(
            links,
            [
                "https://cdn.example/1_1280.jpg",
                "https://cdn.example/2_1280.jpg",
                "https://cdn.example/3_1280.jpg"
            ]
        );
    }

    #[test]
    fn missing_fields_render_empty() {
        let mut g = Gallery::new();
        g.append(&[Hit::default()]);
        assert!(g.markup().contains(r#"href="""#));
        assert!(g.markup().contains(r#"alt="""#));
    }

    #[test]
    fn clear_and_document() {
        let mut g = Gallery::new();
        g.append(&[hit(1)]);
        g.set_loading(true);
        let doc = g.document("cats");
        assert!(doc.contains(r#"name="searchQuery" value="cats""#));
        assert!(doc.contains(r#"<div class="gallery__loading"></div>"#));
        assert!(doc.contains("gallery__sentinel"));
        g.set_loading(false);
        g.clear();
        assert!(g.is_empty());
        let doc = g.document("");
        assert!(doc.contains("gallery__loading is-hidden"));
        assert!(!doc.contains(LINK_CLASS));
    }
}
