use iced::widget::{button, column, container, horizontal_space, row, scrollable, text, Row};
use iced::{Alignment, Element, Length};

use super::{badge, picture, Notice};
use crate::images::ImageCache;
use crate::state::Item;
use crate::Message;

/// Side length of the carousel picture
const PICTURE_SIZE: f32 = 420.0;

/// Cyclic cursor over an item's images
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Carousel {
    len: usize,
    cursor: usize,
}

impl Carousel {
    pub fn new(len: usize) -> Self {
        Self { len, cursor: 0 }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Navigation is only offered with more than one image
    pub fn has_controls(&self) -> bool {
        self.len > 1
    }

    pub fn next(&mut self) {
        if self.len > 0 {
            self.cursor = (self.cursor + 1) % self.len;
        }
    }

    pub fn previous(&mut self) {
        if self.len > 0 {
            self.cursor = (self.cursor + self.len - 1) % self.len;
        }
    }

    /// Jump to `index`; out-of-range indices are ignored
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.len {
            self.cursor = index;
            true
        } else {
            false
        }
    }
}

/// Full view of one item with its image carousel
#[derive(Debug, Clone)]
pub struct DetailView {
    item: Item,
    carousel: Carousel,
}

impl DetailView {
    pub fn open(item: Item) -> Self {
        let carousel = Carousel::new(item.images().len());
        Self { item, carousel }
    }

    pub fn item(&self) -> &Item {
        &self.item
    }

    pub fn carousel_mut(&mut self) -> &mut Carousel {
        &mut self.carousel
    }

    pub fn image_urls(&self) -> Vec<&str> {
        self.item.images()
    }

    /// URL under the cursor
    pub fn current_image(&self) -> &str {
        self.item
            .images()
            .get(self.carousel.cursor())
            .copied()
            .unwrap_or(&self.item.cover_image)
    }

    /// Acknowledge an enquiry. Nothing is sent anywhere.
    pub fn enquiry_notice(&self) -> Notice {
        Notice::success(
            "Enquiry Sent!",
            format!(
                "Your enquiry about \"{}\" has been sent to our team. We'll get back to you soon!",
                self.item.name
            ),
        )
    }

    pub fn view<'a>(&'a self, images: &'a ImageCache) -> Element<'a, Message> {
        let item = &self.item;
        let count = self.carousel.len();

        let mut gallery = column![picture(images, self.current_image(), PICTURE_SIZE, PICTURE_SIZE)]
            .spacing(12)
            .align_x(Alignment::Center);

        if self.carousel.has_controls() {
            let indicators = (0..count).fold(Row::new().spacing(6), |indicators, index| {
                let style = if index == self.carousel.cursor() {
                    button::primary
                } else {
                    button::secondary
                };
                indicators.push(
                    button(text(format!("{}", index + 1)).size(12))
                        .on_press(Message::SelectImage(index))
                        .style(style)
                        .padding([2, 8]),
                )
            });

            gallery = gallery.push(
                row![
                    button(text("<")).on_press(Message::PreviousImage),
                    indicators,
                    button(text(">")).on_press(Message::NextImage),
                ]
                .spacing(12)
                .align_y(Alignment::Center),
            );
        }

        let plural = if count == 1 { "" } else { "s" };
        let details = column![
            badge(&item.item_type),
            text("Description").size(20),
            text(&item.description).size(15),
            text("Details").size(18),
            detail_row("Item Type:", item.item_type.clone()),
            detail_row(
                "Added:",
                item.created_at
                    .with_timezone(&chrono::Local)
                    .format("%x")
                    .to_string(),
            ),
            detail_row("Images:", format!("{} image{}", count, plural)),
            button(text("Enquire"))
                .on_press(Message::Enquire)
                .width(Length::Fill)
                .padding(10),
        ]
        .spacing(12)
        .width(Length::Fixed(320.0));

        let content = column![
            row![
                text(&item.name).size(28),
                horizontal_space(),
                button(text("Close"))
                    .on_press(Message::CloseItem)
                    .style(button::secondary),
            ]
            .align_y(Alignment::Center),
            row![gallery, details].spacing(24),
        ]
        .spacing(16);

        container(scrollable(content))
            .padding(24)
            .max_width(820)
            .style(container::rounded_box)
            .into()
    }
}

fn detail_row<'a>(label: &'a str, value: String) -> Element<'a, Message> {
    row![text(label).size(14), horizontal_space(), text(value).size(14)].into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn item_with_images(additional: &[&str]) -> Item {
        Item {
            id: "1".to_string(),
            name: "Yoga Mat".to_string(),
            item_type: "Sports Gear".to_string(),
            description: "Non-slip".to_string(),
            cover_image: "http://a/cover.png".to_string(),
            additional_images: additional.iter().map(|url| url.to_string()).collect(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_next_wraps_around() {
        let mut carousel = Carousel::new(3);
        for _ in 0..3 {
            carousel.next();
        }
        assert_eq!(carousel.cursor(), 0);
    }

    #[test]
    fn test_previous_wraps_to_end() {
        let mut carousel = Carousel::new(3);
        carousel.previous();
        assert_eq!(carousel.cursor(), 2);
    }

    #[test]
    fn test_select_jumps_directly() {
        let mut carousel = Carousel::new(3);

        assert!(carousel.select(2));
        assert_eq!(carousel.cursor(), 2);

        assert!(!carousel.select(3));
        assert_eq!(carousel.cursor(), 2);
    }

    #[test]
    fn test_single_image_has_no_controls() {
        let detail = DetailView::open(item_with_images(&[]));

        assert!(!detail.carousel.has_controls());
        assert_eq!(detail.current_image(), "http://a/cover.png");
    }

    #[test]
    fn test_cursor_follows_images() {
        let mut detail = DetailView::open(item_with_images(&["http://a/1.png", "http://a/2.png"]));
        assert_eq!(detail.current_image(), "http://a/1.png");

        detail.carousel_mut().next();
        assert_eq!(detail.current_image(), "http://a/2.png");
    }

    #[test]
    fn test_enquiry_mentions_item() {
        let detail = DetailView::open(item_with_images(&[]));
        let notice = detail.enquiry_notice();

        assert_eq!(notice.title, "Enquiry Sent!");
        assert!(notice.body.contains("\"Yoga Mat\""));
    }
}
