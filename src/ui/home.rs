use iced::widget::{button, column, container, row, text};
use iced::{Alignment, Element, Length};

use super::Route;
use crate::Message;

/// Landing page
pub fn view<'a>() -> Element<'a, Message> {
    let content = column![
        text("Welcome to ItemShowcase").size(48),
        text(
            "Your destination for managing and showcasing items. \
             Add new products, browse collections, and discover amazing items.",
        )
        .size(18),
        row![
            button(text("Browse Items").size(18))
                .on_press(Message::Navigate(Route::ViewItems))
                .padding([10, 24]),
            button(text("Add New Item").size(18))
                .on_press(Message::Navigate(Route::AddItem))
                .style(button::secondary)
                .padding([10, 24]),
        ]
        .spacing(16),
    ]
    .spacing(24)
    .max_width(720)
    .align_x(Alignment::Center);

    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}
