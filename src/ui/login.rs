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

use crate::models::Credentials;

#[derive(Clone, Copy, PartialEq)]
enum LoginField {
    Email,
    Password,
}

// Represents the state of the login screen
pub struct LoginState {
    email: String,
    password: String,
    current_field: LoginField,
    error: Option<String>,
    info: Option<String>,
}

impl LoginState {
    pub fn new() -> Self {
        Self {
            email: String::new(),
            password: String::new(),
            current_field: LoginField::Email,
            error: None,
            info: None,
        }
    }

    /// Login screen shown right after a successful registration.
    pub fn with_info(message: String) -> Self {
        let mut state = Self::new();
        state.info = Some(message);
        state
    }

    pub fn set_error(&mut self, message: String) {
        self.info = None;
        self.error = Some(message);
    }

    fn next_field(&mut self) {
        self.current_field = match self.current_field {
            LoginField::Email => LoginField::Password,
            LoginField::Password => LoginField::Email,
        };
    }

    fn current_value_mut(&mut self) -> &mut String {
        match self.current_field {
            LoginField::Email => &mut self.email,
            LoginField::Password => &mut self.password,
        }
    }

    fn credentials(&self) -> Option<Credentials> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return None;
        }
        Some(Credentials {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        })
    }
}

pub enum LoginAction {
    Submit(Credentials),
    Register,
    Exit,
}

pub fn render_login<B: Backend>(frame: &mut Frame<B>, state: &mut LoginState) {
    let area = centered_rect(60, 50, frame.size());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Length(2),
            ]
            .as_ref(),
        )
        .split(area);

    let block = Block::default()
        .title("Agenda Digital - Login")
        .borders(Borders::ALL);
    frame.render_widget(block, area);

    render_field(
        frame,
        chunks[0],
        "E-mail",
        &state.email,
        state.current_field == LoginField::Email,
    );
    // The password is never echoed
    let masked = "*".repeat(state.password.chars().count());
    render_field(
        frame,
        chunks[1],
        "Senha",
        &masked,
        state.current_field == LoginField::Password,
    );

    let status = if let Some(error) = &state.error {
        Spans::from(Span::styled(
            error.as_str(),
            Style::default().fg(Color::Red),
        ))
    } else if let Some(info) = &state.info {
        Spans::from(Span::styled(
            info.as_str(),
            Style::default().fg(Color::Green),
        ))
    } else {
        Spans::from("")
    };
    frame.render_widget(Paragraph::new(status), chunks[2]);

    let help = Paragraph::new("Enter - Entrar | Tab - Trocar campo | F2 - Criar conta | Esc - Sair")
        .style(Style::default().fg(Color::Gray));
    frame.render_widget(help, chunks[3]);
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

pub fn handle_input(state: &mut LoginState) -> Result<Option<LoginAction>> {
    if let Event::Key(key) = event::read()? {
        match key.code {
            KeyCode::Esc => return Ok(Some(LoginAction::Exit)),
            KeyCode::F(2) => return Ok(Some(LoginAction::Register)),
            KeyCode::Tab | KeyCode::Down | KeyCode::Up => state.next_field(),
            KeyCode::Enter => match state.credentials() {
                Some(credentials) => return Ok(Some(LoginAction::Submit(credentials))),
                None => state.set_error("Informe e-mail e senha".to_string()),
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
    fn blank_credentials_do_not_submit() {
        let state = LoginState::new();
        assert!(state.credentials().is_none());

        let mut state = LoginState::new();
        state.email = "ana@example.com".to_string();
        assert!(state.credentials().is_none());

        state.password = "segredo".to_string();
        let credentials = state.credentials().unwrap();
        assert_eq!(credentials.email, "ana@example.com");
        assert_eq!(credentials.password, "segredo");
    }

    #[test]
    fn email_is_trimmed_on_submit() {
        let mut state = LoginState::new();
        state.email = "  ana@example.com ".to_string();
        state.password = "segredo".to_string();
        assert_eq!(state.credentials().unwrap().email, "ana@example.com");
    }
}
