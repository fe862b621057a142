use crossterm::event::KeyCode;
use tui::{
    Frame,
    backend::Backend,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, ListState},
};

use crate::models::{MAX_REMOTE_ACCESS, RemoteAccess};

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum AccessField {
    Id,
    Password,
}

/// Editable list of remote-access entries for one vendor. Enforces the
/// per-vendor cap of 6 entries.
pub struct AccessListState {
    label: &'static str,
    entries: Vec<RemoteAccess>,
    list_state: ListState,
    editing: Option<AccessField>,
}

impl AccessListState {
    pub fn new(label: &'static str, entries: Vec<RemoteAccess>) -> Self {
        let mut list_state = ListState::default();
        if !entries.is_empty() {
            list_state.select(Some(0));
        }

        Self {
            label,
            entries,
            list_state,
            editing: None,
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn entries(&self) -> &[RemoteAccess] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn editing(&self) -> Option<AccessField> {
        self.editing
    }

    /// Append a blank entry and start editing it. Returns false when the
    /// list is already at the cap.
    pub fn add(&mut self) -> bool {
        if self.entries.len() >= MAX_REMOTE_ACCESS {
            return false;
        }
        self.entries.push(RemoteAccess::default());
        self.list_state.select(Some(self.entries.len() - 1));
        self.editing = Some(AccessField::Id);
        true
    }

    pub fn remove_selected(&mut self) {
        if let Some(selected) = self.list_state.selected() {
            if selected < self.entries.len() {
                self.entries.remove(selected);

                // Adjust selection after deletion
                if !self.entries.is_empty() {
                    let new_selection = if selected >= self.entries.len() {
                        self.entries.len() - 1
                    } else {
                        selected
                    };
                    self.list_state.select(Some(new_selection));
                } else {
                    self.list_state.select(None);
                }

                self.editing = None;
            }
        }
    }

    pub fn next(&mut self) {
        if self.entries.is_empty() {
            return;
        }

        let i = match self.list_state.selected() {
            Some(i) => {
                if i >= self.entries.len() - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.entries.is_empty() {
            return;
        }

        let i = match self.list_state.selected() {
            Some(i) => {
                if i == 0 {
                    self.entries.len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn start_editing(&mut self) {
        if self.is_empty() {
            return;
        }
        if self.list_state.selected().is_none() {
            self.list_state.select(Some(0));
        }
        self.editing = Some(AccessField::Id);
    }

    pub fn stop_editing(&mut self) {
        self.editing = None;
    }

    /// Move from the id field to the password field; editing ends after
    /// the password.
    pub fn advance_field(&mut self) {
        self.editing = match self.editing {
            Some(AccessField::Id) => Some(AccessField::Password),
            Some(AccessField::Password) => None,
            None => None,
        };
    }

    pub fn handle_edit_key(&mut self, key: KeyCode) {
        let (Some(field), Some(selected)) = (self.editing, self.list_state.selected()) else {
            return;
        };
        let Some(entry) = self.entries.get_mut(selected) else {
            return;
        };

        let value = match field {
            AccessField::Id => &mut entry.id,
            AccessField::Password => &mut entry.password,
        };

        match key {
            KeyCode::Char(c) => {
                value.push(c);
            }
            KeyCode::Backspace => {
                value.pop();
            }
            _ => {}
        }
    }
}

pub fn render_access_list<B: Backend>(
    frame: &mut Frame<B>,
    area: Rect,
    state: &mut AccessListState,
    focused: bool,
) {
    let items: Vec<ListItem> = state
        .entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let is_selected = state.list_state.selected() == Some(i);
            let id_cursor = is_selected && state.editing == Some(AccessField::Id);
            let password_cursor = is_selected && state.editing == Some(AccessField::Password);

            let id = if entry.id.is_empty() && !id_cursor {
                "(vazio)".to_string()
            } else {
                format!("{}{}", entry.id, if id_cursor { "|" } else { "" })
            };
            let password = if entry.password.is_empty() && !password_cursor {
                "(vazia)".to_string()
            } else {
                format!("{}{}", entry.password, if password_cursor { "|" } else { "" })
            };

            let style = if id_cursor || password_cursor {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            ListItem::new(Spans::from(vec![
                Span::styled(format!("ID: {}", id), style),
                Span::raw("  "),
                Span::styled(format!("Senha: {}", password), style),
            ]))
        })
        .collect();

    let border_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let list = List::new(items)
        .block(
            Block::default()
                .title(format!(
                    "{} ({}/{})",
                    state.label(),
                    state.len(),
                    MAX_REMOTE_ACCESS
                ))
                .borders(Borders::ALL)
                .border_style(border_style),
        )
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_stateful_widget(list, area, &mut state.list_state);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_respects_the_cap() {
        let mut state = AccessListState::new("TeamViewer", Vec::new());
        for _ in 0..MAX_REMOTE_ACCESS {
            assert!(state.add());
        }
        assert_eq!(state.len(), MAX_REMOTE_ACCESS);
        // Seventh entry is rejected
        assert!(!state.add());
        assert_eq!(state.len(), MAX_REMOTE_ACCESS);
    }

    #[test]
    fn add_starts_editing_the_new_entry() {
        let mut state = AccessListState::new("AnyDesk", Vec::new());
        assert!(state.add());
        assert_eq!(state.editing(), Some(AccessField::Id));

        state.handle_edit_key(KeyCode::Char('9'));
        state.handle_edit_key(KeyCode::Char('8'));
        state.advance_field();
        state.handle_edit_key(KeyCode::Char('s'));
        state.advance_field();

        assert_eq!(state.editing(), None);
        assert_eq!(state.entries()[0].id, "98");
        assert_eq!(state.entries()[0].password, "s");
    }

    #[test]
    fn remove_adjusts_selection() {
        let entries = vec![
            RemoteAccess {
                id: "1".to_string(),
                password: "a".to_string(),
            },
            RemoteAccess {
                id: "2".to_string(),
                password: "b".to_string(),
            },
        ];
        let mut state = AccessListState::new("TeamViewer", entries);

        state.next();
        state.remove_selected();
        assert_eq!(state.len(), 1);
        assert_eq!(state.entries()[0].id, "1");

        state.remove_selected();
        assert!(state.is_empty());

        // Removing with nothing selected is a no-op
        state.remove_selected();
        assert!(state.is_empty());
    }

    #[test]
    fn backspace_edits_the_selected_field() {
        let mut state = AccessListState::new("TeamViewer", Vec::new());
        state.add();
        state.handle_edit_key(KeyCode::Char('1'));
        state.handle_edit_key(KeyCode::Char('2'));
        state.handle_edit_key(KeyCode::Backspace);
        assert_eq!(state.entries()[0].id, "1");
    }
}
