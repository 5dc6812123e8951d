use anyhow::Context;
use iced::widget::{column, container};
use iced::{Element, Length, Task, Theme};

mod config;
mod images;
mod state;
mod ui;

use config::{Config, ThemeChoice};
use images::{DecodedImage, ImageCache, ImageError};
use state::{ItemStore, LoadOutcome, SqliteStorage};
use ui::browser::CatalogBrowser;
use ui::intake::{IntakeForm, IntakeMessage, SubmitError};
use ui::{Deferred, Notice, Route};

/// Main application state
struct ItemShowcase {
    /// The catalog, owned here for the whole session
    store: ItemStore,
    config: Config,
    route: Route,
    browser: CatalogBrowser,
    intake: IntakeForm,
    images: ImageCache,
    notice: Option<Notice>,
    notice_timer: Deferred,
    /// Switch to the catalog shortly after a successful submit
    redirect: Deferred,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    Navigate(Route),
    OpenItem(String),
    CloseItem,
    NextImage,
    PreviousImage,
    SelectImage(usize),
    Enquire,
    Intake(IntakeMessage),
    Submit,
    RedirectElapsed(u64),
    DismissNotice(u64),
    ImageLoaded(String, Result<DecodedImage, ImageError>),
}

impl ItemShowcase {
    fn new(mut store: ItemStore, outcome: LoadOutcome, config: Config) -> (Self, Task<Message>) {
        let mut browser = CatalogBrowser::new();
        browser.attach(&mut store);

        let images = ImageCache::new(config.fallback_image.clone());

        let mut app = ItemShowcase {
            store,
            config,
            route: Route::Home,
            browser,
            intake: IntakeForm::new(),
            images,
            notice: None,
            notice_timer: Deferred::default(),
            redirect: Deferred::default(),
        };

        let task = match outcome {
            LoadOutcome::Reset { .. } => app.show_notice(Notice::info(
                "Catalog reset",
                "Saved items could not be read, so the demonstration items were restored.",
            )),
            LoadOutcome::Seeded | LoadOutcome::Restored { .. } => Task::none(),
        };

        (app, task)
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        let task = match message {
            Message::Navigate(route) => self.navigate(route),
            Message::OpenItem(id) => match self.browser.open(&self.store, &id) {
                Some(detail) => images::request_all(
                    &mut self.images,
                    detail.image_urls(),
                    Message::ImageLoaded,
                ),
                None => {
                    tracing::warn!(%id, "selected item is no longer listed");
                    Task::none()
                }
            },
            Message::CloseItem => {
                self.browser.close();
                Task::none()
            }
            Message::NextImage => {
                if let Some(detail) = self.browser.detail_mut() {
                    detail.carousel_mut().next();
                }
                Task::none()
            }
            Message::PreviousImage => {
                if let Some(detail) = self.browser.detail_mut() {
                    detail.carousel_mut().previous();
                }
                Task::none()
            }
            Message::SelectImage(index) => {
                if let Some(detail) = self.browser.detail_mut() {
                    detail.carousel_mut().select(index);
                }
                Task::none()
            }
            Message::Enquire => {
                let notice = self.browser.detail().map(|detail| {
                    tracing::info!(id = %detail.item().id, name = %detail.item().name, "enquiry acknowledged");
                    detail.enquiry_notice()
                });
                match notice {
                    Some(notice) => self.show_notice(notice),
                    None => Task::none(),
                }
            }
            Message::Intake(edit) => {
                self.intake.update(edit);
                Task::none()
            }
            Message::Submit => self.submit(),
            Message::RedirectElapsed(token) => {
                if self.redirect.fire(token) {
                    self.navigate(Route::ViewItems)
                } else {
                    Task::none()
                }
            }
            Message::DismissNotice(token) => {
                if self.notice_timer.fire(token) {
                    self.notice = None;
                }
                Task::none()
            }
            Message::ImageLoaded(url, result) => match self.images.resolve(url, result) {
                Some(fallback) => images::load(fallback, Message::ImageLoaded),
                None => Task::none(),
            },
        };

        if self.browser.sync(&self.store) {
            tracing::debug!(items = self.browser.items().len(), "catalog refreshed");
        }

        task
    }

    fn navigate(&mut self, route: Route) -> Task<Message> {
        if self.redirect.cancel() {
            tracing::debug!("pending redirect cancelled");
        }

        tracing::info!(path = route.path(), "navigate");
        self.route = route;

        match route {
            Route::ViewItems => {
                self.browser.activate(&self.store);
                images::request_all(&mut self.images, self.browser.cover_urls(), Message::ImageLoaded)
            }
            Route::AddItem => {
                self.intake.reset();
                Task::none()
            }
            Route::Home => Task::none(),
        }
    }

    fn submit(&mut self) -> Task<Message> {
        match self.intake.submit(&mut self.store) {
            Ok(_) => {
                let notice = self.show_notice(Notice::success("Success!", "Item successfully added"));
                let redirect = self
                    .redirect
                    .schedule(self.config.redirect_delay(), Message::RedirectElapsed);
                Task::batch([notice, redirect])
            }
            Err(SubmitError::Validation(e)) => {
                tracing::debug!(error = %e, "submission rejected");
                self.show_notice(Notice::error(
                    "Validation Error",
                    "Please fill in all required fields.",
                ))
            }
            Err(e @ SubmitError::Store(_)) => {
                tracing::error!(error = %e, "failed to add item");
                self.show_notice(Notice::error("Error", "Failed to add item. Please try again."))
            }
        }
    }

    /// Replace the current notice and schedule its dismissal
    fn show_notice(&mut self, notice: Notice) -> Task<Message> {
        self.notice = Some(notice);
        self.notice_timer
            .schedule(self.config.notice_duration(), Message::DismissNotice)
    }

    /// Build the user interface
    fn view(&self) -> Element<'_, Message> {
        let page = match self.route {
            Route::Home => ui::home::view(),
            Route::ViewItems => self.browser.view(&self.images),
            Route::AddItem => self.intake.view(),
        };

        let mut content = column![
            ui::nav_bar(self.route),
            container(page).width(Length::Fill).height(Length::Fill),
        ];

        if let Some(notice) = &self.notice {
            content = content.push(container(notice.view()).padding(12));
        }

        content.into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        match self.config.theme {
            ThemeChoice::Dark => Theme::Dark,
            ThemeChoice::Light => Theme::Light,
        }
    }
}

impl Drop for ItemShowcase {
    fn drop(&mut self) {
        self.browser.detach(&mut self.store);
        tracing::info!(items = self.store.len(), "item store closed");
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = Config::load().context("failed to load configuration")?;
    let data_dir = config.data_dir()?;

    let storage = SqliteStorage::open(&data_dir).context("failed to open item database")?;
    if let Some(path) = storage.path() {
        tracing::info!(path = %path.display(), "using item database");
    }

    let (store, outcome) = ItemStore::open(storage).context("failed to load items")?;
    tracing::info!(items = store.len(), ?outcome, "Item Showcase initialized");

    iced::application("Item Showcase", ItemShowcase::update, ItemShowcase::view)
        .theme(ItemShowcase::theme)
        .centered()
        .run_with(move || ItemShowcase::new(store, outcome, config))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ui::NoticeKind;

    fn app() -> ItemShowcase {
        let (store, outcome) = ItemStore::open(SqliteStorage::in_memory().unwrap()).unwrap();
        ItemShowcase::new(store, outcome, Config::default()).0
    }

    fn fill_form(app: &mut ItemShowcase) {
        let _ = app.update(Message::Navigate(Route::AddItem));
        let edits = [
            IntakeMessage::NameChanged("Hat".to_string()),
            IntakeMessage::TypeSelected("Accessories".to_string()),
            IntakeMessage::DescriptionChanged("Wide brim".to_string()),
            IntakeMessage::CoverImageChanged("http://a/hat.png".to_string()),
        ];
        for edit in edits {
            let _ = app.update(Message::Intake(edit));
        }
    }

    /// Submit a valid item and return the redirect token
    fn submit_valid(app: &mut ItemShowcase) -> u64 {
        fill_form(app);
        let _ = app.update(Message::Submit);
        app.redirect.pending_token().expect("redirect scheduled")
    }

    #[test]
    fn test_submit_schedules_redirect() {
        let mut app = app();
        submit_valid(&mut app);

        assert_eq!(app.store.len(), 5);
        assert_eq!(app.route, Route::AddItem);
        let notice = app.notice.as_ref().unwrap();
        assert_eq!(notice.kind, NoticeKind::Success);
        assert_eq!(notice.title, "Success!");
    }

    #[test]
    fn test_redirect_lands_on_catalog() {
        let mut app = app();
        let token = submit_valid(&mut app);

        let _ = app.update(Message::RedirectElapsed(token));

        assert_eq!(app.route, Route::ViewItems);
        assert_eq!(app.browser.items().len(), 5);
        assert_eq!(app.browser.items()[0].name, "Hat");
    }

    #[test]
    fn test_navigating_away_cancels_redirect() {
        let mut app = app();
        let token = submit_valid(&mut app);

        let _ = app.update(Message::Navigate(Route::Home));
        assert_eq!(app.redirect.pending_token(), None);

        let _ = app.update(Message::RedirectElapsed(token));
        assert_eq!(app.route, Route::Home);
    }

    #[test]
    fn test_invalid_submit_leaves_store_alone() {
        let mut app = app();
        fill_form(&mut app);
        let _ = app.update(Message::Intake(IntakeMessage::NameChanged(String::new())));

        let _ = app.update(Message::Submit);

        assert_eq!(app.store.len(), 4);
        assert_eq!(app.redirect.pending_token(), None);
        assert_eq!(app.route, Route::AddItem);
        let notice = app.notice.as_ref().unwrap();
        assert_eq!(notice.kind, NoticeKind::Error);
        assert_eq!(notice.title, "Validation Error");
    }

    #[test]
    fn test_stale_dismissal_keeps_newer_notice() {
        let mut app = app();
        fill_form(&mut app);
        let _ = app.update(Message::Intake(IntakeMessage::NameChanged(String::new())));

        let _ = app.update(Message::Submit);
        let first = app.notice_timer.pending_token().unwrap();
        let _ = app.update(Message::Submit);
        let second = app.notice_timer.pending_token().unwrap();

        let _ = app.update(Message::DismissNotice(first));
        assert!(app.notice.is_some());

        let _ = app.update(Message::DismissNotice(second));
        assert!(app.notice.is_none());
    }

    #[test]
    fn test_open_item_from_catalog() {
        let mut app = app();
        let _ = app.update(Message::Navigate(Route::ViewItems));

        let _ = app.update(Message::OpenItem("2".to_string()));
        assert_eq!(app.browser.detail().unwrap().item().id, "2");

        let _ = app.update(Message::OpenItem("missing".to_string()));
        assert_eq!(app.browser.detail().unwrap().item().id, "2");
    }
}
