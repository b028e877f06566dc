use crate::gallery::Gallery;

/// Click-to-enlarge viewer over the gallery's marked links.
///
/// The index of viewable images is a snapshot; call [`Lightbox::refresh`]
/// after appending cards so the new ones become reachable.
#[derive(Debug, Default)]
pub struct Lightbox {
    items: Vec<String>,
    current: Option<usize>,
}

impl Lightbox {
    pub fn new(gallery: &Gallery) -> Self {
        let mut lb = Self::default();
        lb.refresh(gallery);
        lb
    }

    pub fn refresh(&mut self, gallery: &Gallery) {
        self.items = gallery.links().map(str::to_owned).collect();
        if self.current.is_some_and(|i| i >= self.items.len()) {
            self.current = None;
        }
        debug!("lightbox: {} images", self.items.len());
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn open(&mut self, index: usize) -> Option<&str> {
        if index < self.items.len() {
            self.current = Some(index);
        }
        self.current()
    }

    pub fn close(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&str> {
        self.current.map(|i| self.items[i].as_str())
    }

    pub fn position(&self) -> Option<usize> {
        self.current
    }

    pub fn next(&mut self) -> Option<&str> {
        let n = self.items.len();
        self.current = self.current.map(|i| (i + 1) % n);
        self.current()
    }

    pub fn prev(&mut self) -> Option<&str> {
        let n = self.items.len();
        self.current = self.current.map(|i| (i + n - 1) % n);
        self.current()
    }
}
