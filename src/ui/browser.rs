use iced::widget::{button, center, column, container, mouse_area, opaque, row, scrollable, stack, text};
use iced::{Color, Element, Length};
use iced_aw::Wrap;
use std::cell::Cell;
use std::rc::Rc;

use super::detail::DetailView;
use super::{badge, heading, picture};
use crate::images::ImageCache;
use crate::state::{Item, ItemStore, ListenerId};
use crate::Message;

const CARD_WIDTH: f32 = 240.0;
const EXCERPT_CHARS: usize = 90;

/// Catalog grid of item cards plus at most one open detail view
#[derive(Debug, Default)]
pub struct CatalogBrowser {
    items: Vec<Item>,
    /// Set by the store listener when the collection changed
    stale: Rc<Cell<bool>>,
    listener: Option<ListenerId>,
    detail: Option<DetailView>,
}

impl CatalogBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Listen for store changes so the next sync re-reads the items
    pub fn attach(&mut self, store: &mut ItemStore) {
        let stale = self.stale.clone();
        self.listener = Some(store.subscribe(move |_| stale.set(true)));
    }

    pub fn detach(&mut self, store: &mut ItemStore) {
        if let Some(id) = self.listener.take() {
            store.unsubscribe(id);
        }
    }

    /// Entering the catalog: read the items and close any open detail
    pub fn activate(&mut self, store: &ItemStore) {
        self.detail = None;
        self.pull(store);
    }

    /// Re-read the items if the store reported a change.
    /// Returns whether a refresh happened.
    pub fn sync(&mut self, store: &ItemStore) -> bool {
        if self.stale.get() {
            self.pull(store);
            true
        } else {
            false
        }
    }

    fn pull(&mut self, store: &ItemStore) {
        self.items = store.items().to_vec();
        self.stale.set(false);
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn cover_urls(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|item| item.cover_image.as_str())
    }

    /// Open the detail of the item with `id`, replacing any open one
    pub fn open(&mut self, store: &ItemStore, id: &str) -> Option<&DetailView> {
        let item = store.get(id)?.clone();
        self.detail = Some(DetailView::open(item));
        self.detail.as_ref()
    }

    pub fn close(&mut self) {
        self.detail = None;
    }

    pub fn detail(&self) -> Option<&DetailView> {
        self.detail.as_ref()
    }

    pub fn detail_mut(&mut self) -> Option<&mut DetailView> {
        self.detail.as_mut()
    }

    pub fn view<'a>(&'a self, images: &'a ImageCache) -> Element<'a, Message> {
        let header = heading(
            "View Items",
            format!("Browse through our collection of {} amazing items", self.items.len()),
        );

        let body: Element<'a, Message> = if self.items.is_empty() {
            container(text("No items found. Add some items to get started!").size(18))
                .center_x(Length::Fill)
                .padding(48)
                .into()
        } else {
            let cards = self.items.iter().map(|item| card(item, images)).collect();
            Wrap::with_elements(cards).spacing(16.0).line_spacing(16.0).into()
        };

        let page: Element<'a, Message> = scrollable(column![header, body].spacing(24).padding(24))
            .height(Length::Fill)
            .into();

        match &self.detail {
            Some(detail) => modal(page, detail.view(images), Message::CloseItem),
            None => page,
        }
    }
}

/// Clickable summary of one item
fn card<'a>(item: &'a Item, images: &'a ImageCache) -> Element<'a, Message> {
    let content = column![
        picture(images, &item.cover_image, CARD_WIDTH, CARD_WIDTH),
        row![text(&item.name).size(18).width(Length::Fill), badge(&item.item_type)].spacing(8),
        text(excerpt(&item.description)).size(13),
    ]
    .spacing(8)
    .width(Length::Fixed(CARD_WIDTH));

    button(content)
        .on_press(Message::OpenItem(item.id.clone()))
        .style(button::secondary)
        .padding(8)
        .into()
}

/// First sentence-ish of a description, cut on a char boundary
fn excerpt(description: &str) -> String {
    if description.chars().count() <= EXCERPT_CHARS {
        return description.to_string();
    }
    let cut: String = description.chars().take(EXCERPT_CHARS).collect();
    format!("{}...", cut.trim_end())
}

/// Show `content` above `base` on a dimmed backdrop; clicking the backdrop closes it
fn modal<'a>(base: Element<'a, Message>, content: Element<'a, Message>, on_blur: Message) -> Element<'a, Message> {
    stack![
        base,
        opaque(
            mouse_area(center(opaque(content)).style(|_theme| container::Style {
                background: Some(Color { a: 0.8, ..Color::BLACK }.into()),
                ..container::Style::default()
            }))
            .on_press(on_blur)
        )
    ]
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{NewItem, SqliteStorage};

    fn open_store() -> ItemStore {
        ItemStore::open(SqliteStorage::in_memory().unwrap()).unwrap().0
    }

    fn scarf() -> NewItem {
        NewItem {
            name: "Scarf".to_string(),
            item_type: "Accessories".to_string(),
            description: "Warm".to_string(),
            cover_image: "http://a/scarf.png".to_string(),
            additional_images: vec!["http://a/scarf.png".to_string()],
        }
    }

    #[test]
    fn test_activate_pulls_items() {
        let store = open_store();
        let mut browser = CatalogBrowser::new();

        browser.activate(&store);

        assert_eq!(browser.items(), store.items());
        assert_eq!(browser.cover_urls().count(), 4);
    }

    #[test]
    fn test_sync_after_store_notification() {
        let mut store = open_store();
        let mut browser = CatalogBrowser::new();
        browser.attach(&mut store);
        browser.activate(&store);

        assert!(!browser.sync(&store));

        let added = store.append(scarf()).unwrap();
        assert!(browser.sync(&store));
        assert_eq!(browser.items()[0], added);

        browser.detach(&mut store);
        store.append(scarf()).unwrap();
        assert!(!browser.sync(&store));
        assert_eq!(browser.items().len(), 5);
    }

    #[test]
    fn test_single_selection() {
        let store = open_store();
        let mut browser = CatalogBrowser::new();
        browser.activate(&store);

        assert!(browser.open(&store, "1").is_some());
        assert!(browser.open(&store, "2").is_some());
        assert_eq!(browser.detail().unwrap().item().id, "2");

        assert!(browser.open(&store, "missing").is_none());
        assert_eq!(browser.detail().unwrap().item().id, "2");

        browser.close();
        assert!(browser.detail().is_none());
    }

    #[test]
    fn test_reactivation_closes_detail() {
        let store = open_store();
        let mut browser = CatalogBrowser::new();
        browser.activate(&store);
        browser.open(&store, "3");

        browser.activate(&store);

        assert!(browser.detail().is_none());
    }

    #[test]
    fn test_excerpt_cuts_long_text() {
        assert_eq!(excerpt("short"), "short");

        let long = "word ".repeat(40);
        let cut = excerpt(&long);
        assert!(cut.ends_with("..."));
        assert!(cut.chars().count() <= EXCERPT_CHARS + 3);
    }
}
