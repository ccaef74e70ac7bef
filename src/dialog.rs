use crate::{
    modules::workspaces::Message,
    theme::{SwitcherTheme, confirm_button_style, outline_button_style, text_input_style},
};
use iced::{
    Alignment, Element, Length,
    widget::{button, column, horizontal_space, row, text, text_input},
};

const DIALOG_WIDTH: f32 = 350.;

pub fn rename_input_id() -> text_input::Id {
    text_input::Id::new("rename-workspace")
}

/// State of an open rename dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameDialog {
    /// Index of the workspace that was active when the dialog opened.
    pub index: usize,
    pub current: String,
    pub input: String,
}

impl RenameDialog {
    pub fn new(index: usize, current: String) -> Self {
        Self {
            index,
            input: current.clone(),
            current,
        }
    }
}

pub fn rename_view<'a>(dialog: &'a RenameDialog, theme: &SwitcherTheme) -> Element<'a, Message> {
    column!(
        text("Rename Workspace").size(theme.font_size.lg),
        text(format!(
            "Enter new name for workspace {}:",
            dialog.index + 1
        )),
        text_input("", &dialog.input)
            .id(rename_input_id())
            .size(theme.font_size.md)
            .padding([theme.space.xs, theme.space.md])
            .style(text_input_style)
            .on_input(Message::RenameInput)
            .on_submit(Message::RenameSubmit),
        buttons(
            theme,
            ("Cancel", Message::RenameCancel),
            ("Rename", Message::RenameSubmit)
        )
    )
    .spacing(theme.space.md)
    .padding(theme.space.md)
    .max_width(DIALOG_WIDTH)
    .into()
}

pub fn confirm_remove_view<'a>(name: &str, theme: &SwitcherTheme) -> Element<'a, Message> {
    column!(
        text("Remove Workspace").size(theme.font_size.lg),
        text(format!("Are you sure you want to remove workspace \"{name}\"?")),
        buttons(
            theme,
            ("Cancel", Message::CancelRemove),
            ("Remove", Message::ConfirmRemove)
        )
    )
    .spacing(theme.space.md)
    .padding(theme.space.md)
    .max_width(DIALOG_WIDTH)
    .into()
}

fn buttons<'a>(
    theme: &SwitcherTheme,
    cancel: (&'a str, Message),
    confirm: (&'a str, Message),
) -> Element<'a, Message> {
    row!(
        horizontal_space(),
        button(text(cancel.0).align_x(Alignment::Center))
            .padding([theme.space.xxs, theme.space.md])
            .style(outline_button_style)
            .on_press(cancel.1),
        button(text(confirm.0).align_x(Alignment::Center))
            .padding([theme.space.xxs, theme.space.md])
            .style(confirm_button_style)
            .on_press(confirm.1)
    )
    .spacing(theme.space.xs)
    .width(Length::Fill)
    .align_y(Alignment::Center)
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_dialog_is_prefilled_with_current_name() {
        let dialog = RenameDialog::new(2, "Mail".to_owned());
        assert_eq!(dialog.input, "Mail");
        assert_eq!(dialog.current, "Mail");
        assert_eq!(dialog.index, 2);
    }
}
