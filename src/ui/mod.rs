/// User interface module
///
/// Views and the pieces they share:
/// - Landing page (home.rs)
/// - Catalog browser with item cards (browser.rs)
/// - Item detail with the image carousel (detail.rs)
/// - Intake form for new items (intake.rs)

pub mod browser;
pub mod detail;
pub mod home;
pub mod intake;

use iced::widget::{button, column, container, horizontal_space, image, row, text, Column};
use iced::{Alignment, Color, ContentFit, Element, Length, Task};
use std::time::Duration;

use crate::images::{ImageCache, Lookup};
use crate::Message;

/// Screens reachable from the navigation bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    ViewItems,
    AddItem,
}

impl Route {
    pub const ALL: [Route; 3] = [Route::Home, Route::ViewItems, Route::AddItem];

    pub fn path(self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::ViewItems => "/view-items",
            Route::AddItem => "/add-item",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Route::Home => "Home",
            Route::ViewItems => "View Items",
            Route::AddItem => "Add Item",
        }
    }
}

/// Brand plus one link per route, the current one highlighted
pub fn nav_bar<'a>(current: Route) -> Element<'a, Message> {
    let links = Route::ALL.iter().fold(row![].spacing(8), |links, &route| {
        let style = if route == current {
            button::primary
        } else {
            button::text
        };
        links.push(
            button(text(route.label()).size(14))
                .on_press(Message::Navigate(route))
                .style(style)
                .padding([6, 12]),
        )
    });

    container(
        row![
            button(text("ItemShowcase").size(24))
                .on_press(Message::Navigate(Route::Home))
                .style(button::text),
            horizontal_space(),
            links,
        ]
        .align_y(Alignment::Center),
    )
    .padding([8, 24])
    .width(Length::Fill)
    .style(container::rounded_box)
    .into()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Info,
}

/// A transient message shown at the bottom of the window
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub body: String,
}

impl Notice {
    pub fn success(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(NoticeKind::Success, title, body)
    }

    pub fn error(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(NoticeKind::Error, title, body)
    }

    pub fn info(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(NoticeKind::Info, title, body)
    }

    fn new(kind: NoticeKind, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            body: body.into(),
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let accent = match self.kind {
            NoticeKind::Success => Color::from_rgb(0.30, 0.75, 0.40),
            NoticeKind::Error => Color::from_rgb(0.90, 0.30, 0.30),
            NoticeKind::Info => Color::from_rgb(0.35, 0.55, 0.95),
        };

        container(
            column![
                text(&self.title).size(16).color(accent),
                text(&self.body).size(14),
            ]
            .spacing(4),
        )
        .padding(12)
        .width(Length::Fill)
        .style(container::rounded_box)
        .into()
    }
}

/// A one-shot delayed message that can be cancelled before it fires.
///
/// Each schedule gets a fresh token; only the most recent token is honored,
/// so a stale or cancelled timer firing later has no effect.
#[derive(Debug, Default)]
pub struct Deferred {
    next_token: u64,
    pending: Option<u64>,
}

impl Deferred {
    /// Reserve a token for a new schedule, replacing any pending one
    pub fn arm(&mut self) -> u64 {
        self.next_token += 1;
        self.pending = Some(self.next_token);
        self.next_token
    }

    /// Schedule `on_fire(token)` after `delay`
    pub fn schedule(&mut self, delay: Duration, on_fire: fn(u64) -> Message) -> Task<Message> {
        let token = self.arm();
        Task::perform(
            async move { tokio::time::sleep(delay).await },
            move |_| on_fire(token),
        )
    }

    /// Forget the pending schedule, returning whether there was one
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Consume a fired token, returning true if it is still current
    pub fn fire(&mut self, token: u64) -> bool {
        if self.pending == Some(token) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    /// Token of the schedule that would currently be honored
    #[cfg(test)]
    pub fn pending_token(&self) -> Option<u64> {
        self.pending
    }
}

/// An image from the cache, or a placeholder box while it loads
pub fn picture<'a>(images: &'a ImageCache, url: &str, width: f32, height: f32) -> Element<'a, Message> {
    let label = match images.lookup(url) {
        Lookup::Ready(handle) => {
            return image(handle.clone())
                .width(Length::Fixed(width))
                .height(Length::Fixed(height))
                .content_fit(ContentFit::Cover)
                .into();
        }
        Lookup::Loading => "Loading...",
        Lookup::Missing => "Image unavailable",
    };

    container(text(label).size(14))
        .center_x(Length::Fixed(width))
        .center_y(Length::Fixed(height))
        .style(container::rounded_box)
        .into()
}

/// Small rounded label, used for item types
pub fn badge<'a>(label: &'a str) -> Element<'a, Message> {
    container(text(label).size(12))
        .padding([2, 8])
        .style(container::rounded_box)
        .into()
}

/// Page heading with a subtitle underneath
pub fn heading<'a>(title: &'a str, subtitle: String) -> Column<'a, Message> {
    column![text(title).size(32), text(subtitle).size(16)].spacing(6)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_paths() {
        let paths: Vec<_> = Route::ALL.iter().map(|route| route.path()).collect();
        assert_eq!(paths, vec!["/", "/view-items", "/add-item"]);
    }

    #[test]
    fn test_deferred_fires_once() {
        let mut timer = Deferred::default();
        let token = timer.arm();

        assert_eq!(timer.pending_token(), Some(token));
        assert!(timer.fire(token));
        assert!(!timer.fire(token));
        assert_eq!(timer.pending_token(), None);
    }

    #[test]
    fn test_deferred_cancel() {
        let mut timer = Deferred::default();
        let token = timer.arm();

        assert!(timer.cancel());
        assert!(!timer.cancel());
        assert!(!timer.fire(token));
    }

    #[test]
    fn test_deferred_rearm_ignores_stale_token() {
        let mut timer = Deferred::default();
        let first = timer.arm();
        let second = timer.arm();

        assert!(!timer.fire(first));
        assert!(timer.fire(second));
    }
}
