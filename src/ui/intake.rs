use iced::widget::{button, column, container, pick_list, row, scrollable, text, text_input, Column};
use iced::{Element, Length};
use thiserror::Error;

use super::heading;
use crate::state::{Item, ItemStore, NewItem, StoreError, ITEM_TYPES};
use crate::Message;

/// Edits to the intake draft
#[derive(Debug, Clone, PartialEq)]
pub enum IntakeMessage {
    NameChanged(String),
    TypeSelected(String),
    DescriptionChanged(String),
    CoverImageChanged(String),
    AdditionalImageChanged(usize, String),
    AddImageField,
    RemoveImageField(usize),
}

/// Required fields left blank
#[derive(Debug, Clone, PartialEq, Error)]
#[error("missing required fields: {}", .missing.join(", "))]
pub struct ValidationError {
    pub missing: Vec<&'static str>,
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("failed to save item: {0}")]
    Store(#[from] StoreError),
}

/// The values typed into the form so far
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    pub name: String,
    pub item_type: String,
    pub description: String,
    pub cover_image: String,
    /// Always holds at least one (possibly blank) entry
    pub additional_images: Vec<String>,
}

impl Default for Draft {
    fn default() -> Self {
        Self {
            name: String::new(),
            item_type: String::new(),
            description: String::new(),
            cover_image: String::new(),
            additional_images: vec![String::new()],
        }
    }
}

impl Draft {
    /// Check required fields and build the item candidate.
    ///
    /// Blank additional image entries are dropped; with none left the
    /// cover image becomes the only additional image.
    pub fn validate(&self) -> Result<NewItem, ValidationError> {
        let required = [
            ("name", &self.name),
            ("type", &self.item_type),
            ("description", &self.description),
            ("cover image", &self.cover_image),
        ];
        let missing: Vec<&'static str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(field, _)| *field)
            .collect();

        if !missing.is_empty() {
            return Err(ValidationError { missing });
        }

        let mut additional_images: Vec<String> = self
            .additional_images
            .iter()
            .filter(|url| !url.trim().is_empty())
            .cloned()
            .collect();
        if additional_images.is_empty() {
            additional_images.push(self.cover_image.clone());
        }

        Ok(NewItem {
            name: self.name.clone(),
            item_type: self.item_type.clone(),
            description: self.description.clone(),
            cover_image: self.cover_image.clone(),
            additional_images,
        })
    }
}

/// Form for adding a new item
#[derive(Debug, Default)]
pub struct IntakeForm {
    draft: Draft,
    /// Set once an item was added, until the form is reset
    submitted: bool,
}

impl IntakeForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start over with a blank draft
    pub fn reset(&mut self) {
        self.draft = Draft::default();
        self.submitted = false;
    }

    pub fn update(&mut self, message: IntakeMessage) {
        let draft = &mut self.draft;
        match message {
            IntakeMessage::NameChanged(value) => draft.name = value,
            IntakeMessage::TypeSelected(value) => draft.item_type = value,
            IntakeMessage::DescriptionChanged(value) => draft.description = value,
            IntakeMessage::CoverImageChanged(value) => draft.cover_image = value,
            IntakeMessage::AdditionalImageChanged(index, value) => {
                if let Some(entry) = draft.additional_images.get_mut(index) {
                    *entry = value;
                }
            }
            IntakeMessage::AddImageField => draft.additional_images.push(String::new()),
            IntakeMessage::RemoveImageField(index) => {
                if draft.additional_images.len() > 1 && index < draft.additional_images.len() {
                    draft.additional_images.remove(index);
                }
            }
        }
    }

    /// Validate the draft and append it to `store`.
    ///
    /// Nothing reaches the store when validation fails, and the draft is
    /// kept for correction on any error.
    pub fn submit(&mut self, store: &mut ItemStore) -> Result<Item, SubmitError> {
        let new_item = self.draft.validate()?;
        let item = store.append(new_item)?;

        self.draft = Draft::default();
        self.submitted = true;
        Ok(item)
    }

    pub fn view(&self) -> Element<'_, Message> {
        let draft = &self.draft;
        let edit = |message: IntakeMessage| Message::Intake(message);

        let image_fields = draft.additional_images.iter().enumerate().fold(
            Column::new().spacing(8),
            |fields, (index, url)| {
                let mut line = row![text_input("https://example.com/image.jpg", url)
                    .on_input(move |value| edit(IntakeMessage::AdditionalImageChanged(index, value)))
                    .padding(8)]
                .spacing(8);
                if draft.additional_images.len() > 1 {
                    line = line.push(
                        button(text("Remove"))
                            .on_press(edit(IntakeMessage::RemoveImageField(index)))
                            .style(button::secondary),
                    );
                }
                fields.push(line)
            },
        );

        let selected_type = ITEM_TYPES.iter().copied().find(|t| *t == draft.item_type);

        let submit_label = if self.submitted { "Item added" } else { "Add Item" };
        let submit = button(text(submit_label))
            .on_press_maybe((!self.submitted).then_some(Message::Submit))
            .width(Length::Fill)
            .padding(10);

        let form = column![
            field(
                "Item Name *",
                text_input("Enter item name", &draft.name)
                    .on_input(move |value| edit(IntakeMessage::NameChanged(value)))
                    .padding(8),
            ),
            field(
                "Item Type *",
                pick_list(ITEM_TYPES, selected_type, move |value: &'static str| {
                    edit(IntakeMessage::TypeSelected(value.to_string()))
                })
                .placeholder("Select item type")
                .width(Length::Fill),
            ),
            field(
                "Item Description *",
                text_input("Describe the item in detail", &draft.description)
                    .on_input(move |value| edit(IntakeMessage::DescriptionChanged(value)))
                    .padding(8),
            ),
            field(
                "Cover Image URL *",
                text_input("https://example.com/image.jpg", &draft.cover_image)
                    .on_input(move |value| edit(IntakeMessage::CoverImageChanged(value)))
                    .padding(8),
            ),
            field(
                "Additional Images",
                column![
                    image_fields,
                    button(text("+ Add Another Image"))
                        .on_press(edit(IntakeMessage::AddImageField))
                        .style(button::secondary),
                ]
                .spacing(8),
            ),
            submit,
        ]
        .spacing(20);

        let page = column![
            heading(
                "Add New Item",
                "Fill in the details below to add a new item to your collection".to_string(),
            ),
            container(form).padding(20).style(container::rounded_box),
        ]
        .spacing(24)
        .padding(24)
        .max_width(720);

        scrollable(container(page).center_x(Length::Fill))
            .height(Length::Fill)
            .into()
    }
}

fn field<'a>(label: &'a str, input: impl Into<Element<'a, Message>>) -> Element<'a, Message> {
    column![text(label).size(14), input.into()].spacing(6).into()
}
