use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    Frame,
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Paragraph},
};

use crate::models::NewUser;

#[derive(Clone, Copy, PartialEq)]
enum RegisterField {
    Username,
    Email,
    Password,
}

// Represents the state of the account creation screen
pub struct RegisterState {
    username: String,
    email: String,
    password: String,
    current_field: RegisterField,
    error: Option<String>,
}

impl RegisterState {
    pub fn new() -> Self {
        Self {
            username: String::new(),
            email: String::new(),
            password: String::new(),
            current_field: RegisterField::Username,
            error: None,
        }
    }

    pub fn set_error(&mut self, message: String) {
        self.error = Some(message);
    }

    fn next_field(&mut self) {
        self.current_field = match self.current_field {
            RegisterField::Username => RegisterField::Email,
            RegisterField::Email => RegisterField::Password,
            RegisterField::Password => RegisterField::Username,
        };
    }

    fn current_value_mut(&mut self) -> &mut String {
        match self.current_field {
            RegisterField::Username => &mut self.username,
            RegisterField::Email => &mut self.email,
            RegisterField::Password => &mut self.password,
        }
    }

    fn new_user(&self) -> Option<NewUser> {
        if self.username.trim().is_empty()
            || self.email.trim().is_empty()
            || self.password.is_empty()
        {
            return None;
        }
        Some(NewUser {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        })
    }
}

pub enum RegisterAction {
    Submit(NewUser),
    Cancel,
}

pub fn render_register<B: Backend>(frame: &mut Frame<B>, state: &mut RegisterState) {
    let area = centered_rect(60, 60, frame.size());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Length(2),
            ]
            .as_ref(),
        )
        .split(area);

    let block = Block::default()
        .title("Agenda Digital - Nova Conta")
        .borders(Borders::ALL);
    frame.render_widget(block, area);

    render_field(
        frame,
        chunks[0],
        "Usuário",
        &state.username,
        state.current_field == RegisterField::Username,
    );
    render_field(
        frame,
        chunks[1],
        "E-mail",
        &state.email,
        state.current_field == RegisterField::Email,
    );
    let masked = "*".repeat(state.password.chars().count());
    render_field(
        frame,
        chunks[2],
        "Senha",
        &masked,
        state.current_field == RegisterField::Password,
    );

    let status = match &state.error {
        Some(error) => Spans::from(Span::styled(
            error.as_str(),
            Style::default().fg(Color::Red),
        )),
        None => Spans::from(""),
    };
    frame.render_widget(Paragraph::new(status), chunks[3]);

    let help = Paragraph::new("Enter - Criar conta | Tab - Trocar campo | Esc - Voltar")
        .style(Style::default().fg(Color::Gray));
    frame.render_widget(help, chunks[4]);
}

fn render_field<B: Backend>(
    frame: &mut Frame<B>,
    area: Rect,
    label: &str,
    value: &str,
    focused: bool,
) {
    let (style, cursor) = if focused {
        (
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            "|",
        )
    } else {
        (Style::default(), "")
    };

    let field = Paragraph::new(format!("{}{}", value, cursor))
        .block(Block::default().title(label).borders(Borders::ALL).border_style(style));
    frame.render_widget(field, area);
}

// Helper function to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

pub fn handle_input(state: &mut RegisterState) -> Result<Option<RegisterAction>> {
    if let Event::Key(key) = event::read()? {
        match key.code {
            KeyCode::Esc => return Ok(Some(RegisterAction::Cancel)),
            KeyCode::Tab | KeyCode::Down | KeyCode::Up => state.next_field(),
            KeyCode::Enter => match state.new_user() {
                Some(new_user) => return Ok(Some(RegisterAction::Submit(new_user))),
                None => state.set_error("Preencha usuário, e-mail e senha".to_string()),
            },
            KeyCode::Char(c) => {
                state.current_value_mut().push(c);
            }
            KeyCode::Backspace => {
                state.current_value_mut().pop();
            }
            _ => {}
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_fields_are_required() {
        let mut state = RegisterState::new();
        assert!(state.new_user().is_none());

        state.username = "ana".to_string();
        state.email = "ana@example.com".to_string();
        assert!(state.new_user().is_none());

        state.password = "segredo".to_string();
        let new_user = state.new_user().unwrap();
        assert_eq!(new_user.username, "ana");
    }
}
