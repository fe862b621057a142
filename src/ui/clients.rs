use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    Frame,
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::models::{Client, ClientPage};

// Represents the state of the client list screen
pub struct ClientsState {
    clients: Vec<Client>,
    list_state: ListState,
    page: u32,
    total_pages: u32,
    total: i64,
    query: String,
    searching: bool,
    show_delete_confirmation: bool,
    error: Option<String>,
    info: Option<String>,
}

impl ClientsState {
    pub fn new(page: ClientPage, query: String) -> Self {
        let mut list_state = ListState::default();
        if !page.items.is_empty() {
            list_state.select(Some(0));
        }

        Self {
            total_pages: page.total_pages(),
            total: page.total,
            page: page_number(page.page),
            clients: page.items,
            list_state,
            query,
            searching: false,
            show_delete_confirmation: false,
            error: None,
            info: None,
        }
    }

    pub fn set_error(&mut self, message: String) {
        self.info = None;
        self.error = Some(message);
    }

    pub fn set_info(&mut self, message: String) {
        self.error = None;
        self.info = Some(message);
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn next(&mut self) {
        if self.clients.is_empty() {
            return;
        }

        let i = match self.list_state.selected() {
            Some(i) => {
                if i >= self.clients.len() - 1 {
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
        if self.clients.is_empty() {
            return;
        }

        let i = match self.list_state.selected() {
            Some(i) => {
                if i == 0 {
                    self.clients.len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn toggle_delete_confirmation(&mut self) {
        self.show_delete_confirmation = !self.show_delete_confirmation;
    }

    pub fn selected_client(&self) -> Option<&Client> {
        self.list_state.selected().and_then(|i| self.clients.get(i))
    }

    pub fn selected_client_id(&self) -> Option<i32> {
        self.selected_client().map(|c| c.id)
    }
}

fn page_number(page: u32) -> u32 {
    if page == 0 { 1 } else { page }
}

pub enum ClientAction {
    NewClient,
    EditClient(i32),
    ViewClient(i32),
    DeleteClient(i32),
    Search(String),
    Page(u32),
    Logout,
    Exit,
}

pub fn render_clients<B: Backend>(frame: &mut Frame<B>, state: &mut ClientsState) {
    let size = frame.size();

    // Create the layout
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(1),
                Constraint::Length(1),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(size);

    // Search bar
    let search_text = if state.searching {
        Spans::from(vec![
            Span::raw("Buscar: "),
            Span::styled(
                format!("{}|", state.query),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ])
    } else if state.query.is_empty() {
        Spans::from(Span::styled(
            "Buscar: (pressione / para buscar por nome, e-mail ou empresa)",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Spans::from(vec![Span::raw("Buscar: "), Span::raw(state.query.as_str())])
    };

    let search = Paragraph::new(search_text)
        .block(Block::default().title("Agenda Digital - Clientes").borders(Borders::ALL));
    frame.render_widget(search, chunks[0]);

    // Create and render the clients list
    let items: Vec<ListItem> = state
        .clients
        .iter()
        .map(|client| {
            let mut spans = vec![Span::raw(client.display_name().to_string())];
            if !client.city.is_empty() {
                spans.push(Span::styled(
                    format!("  {}/{}", client.city, client.state),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            ListItem::new(Spans::from(spans))
        })
        .collect();

    let title = format!(
        "Clientes ({} no total) - Página {} de {}",
        state.total, state.page, state.total_pages
    );
    let clients_list = List::new(items)
        .block(Block::default().title(title).borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_stateful_widget(clients_list, chunks[1], &mut state.list_state);

    // Status line for per-action errors and confirmations
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
    } else if state.clients.is_empty() {
        Spans::from("Nenhum cliente cadastrado")
    } else {
        Spans::from("")
    };
    frame.render_widget(Paragraph::new(status), chunks[2]);

    // Create and render the buttons
    let buttons_text = if state.searching {
        "Enter - Buscar | Esc - Cancelar busca".to_string()
    } else if state.selected_client().is_some() {
        "<N> Novo | <E> Editar | <D> Excluir | <Enter> Visualizar | </> Buscar | <PgUp/PgDn> Página | <L> Encerrar sessão | <Esc> Sair".to_string()
    } else {
        "<N> Novo | </> Buscar | <L> Encerrar sessão | <Esc> Sair".to_string()
    };

    let buttons = Paragraph::new(buttons_text)
        .block(Block::default().borders(Borders::TOP))
        .style(Style::default().fg(Color::White));

    frame.render_widget(buttons, chunks[3]);

    // Render delete confirmation popup if needed
    if state.show_delete_confirmation {
        render_delete_confirmation(frame, size);
    }
}

fn render_delete_confirmation<B: Backend>(frame: &mut Frame<B>, size: Rect) {
    let popup_area = centered_rect(50, 20, size);

    let popup = Paragraph::new(vec![
        Spans::from(""),
        Spans::from("Tem certeza de que deseja excluir este cliente?"),
        Spans::from(""),
        Spans::from("Os acessos remotos cadastrados também serão removidos."),
        Spans::from(""),
        Spans::from("<Y> Sim  <N> Não"),
    ])
    .block(Block::default().title("Confirmar Exclusão").borders(Borders::ALL))
    .style(Style::default().fg(Color::White).bg(Color::Black));

    frame.render_widget(popup, popup_area);
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

pub fn handle_input(state: &mut ClientsState) -> Result<Option<ClientAction>> {
    if let Event::Key(key) = event::read()? {
        if state.searching {
            match key.code {
                KeyCode::Enter => {
                    state.searching = false;
                    return Ok(Some(ClientAction::Search(state.query.clone())));
                }
                KeyCode::Esc => {
                    state.searching = false;
                }
                KeyCode::Char(c) => {
                    state.query.push(c);
                }
                KeyCode::Backspace => {
                    state.query.pop();
                }
                _ => {}
            }
            return Ok(None);
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                if state.show_delete_confirmation {
                    state.toggle_delete_confirmation();
                } else {
                    return Ok(Some(ClientAction::Exit));
                }
            }
            KeyCode::Char('/') => {
                if !state.show_delete_confirmation {
                    state.searching = true;
                }
            }
            KeyCode::Char('n') => {
                if state.show_delete_confirmation {
                    state.toggle_delete_confirmation();
                } else {
                    return Ok(Some(ClientAction::NewClient));
                }
            }
            KeyCode::Char('e') => {
                if !state.show_delete_confirmation && state.selected_client().is_some() {
                    if let Some(id) = state.selected_client_id() {
                        return Ok(Some(ClientAction::EditClient(id)));
                    }
                }
            }
            KeyCode::Char('d') => {
                if !state.show_delete_confirmation && state.selected_client().is_some() {
                    state.toggle_delete_confirmation();
                }
            }
            KeyCode::Char('y') => {
                if state.show_delete_confirmation {
                    if let Some(id) = state.selected_client_id() {
                        state.toggle_delete_confirmation();
                        return Ok(Some(ClientAction::DeleteClient(id)));
                    }
                }
            }
            KeyCode::Char('l') => {
                if !state.show_delete_confirmation {
                    return Ok(Some(ClientAction::Logout));
                }
            }
            KeyCode::PageDown | KeyCode::Right => {
                if !state.show_delete_confirmation && state.page < state.total_pages {
                    return Ok(Some(ClientAction::Page(state.page + 1)));
                }
            }
            KeyCode::PageUp | KeyCode::Left => {
                if !state.show_delete_confirmation && state.page > 1 {
                    return Ok(Some(ClientAction::Page(state.page - 1)));
                }
            }
            KeyCode::Down => {
                if !state.show_delete_confirmation {
                    state.next();
                }
            }
            KeyCode::Up => {
                if !state.show_delete_confirmation {
                    state.previous();
                }
            }
            KeyCode::Enter => {
                if !state.show_delete_confirmation {
                    if let Some(id) = state.selected_client_id() {
                        return Ok(Some(ClientAction::ViewClient(id)));
                    }
                }
            }
            _ => {}
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_of(names: &[&str]) -> ClientPage {
        ClientPage {
            items: names
                .iter()
                .map(|name| {
                    let mut client = Client::new();
                    client.name = name.to_string();
                    client
                })
                .collect(),
            total: names.len() as i64,
            page: 1,
            per_page: 20,
        }
    }

    #[test]
    fn selection_wraps_around() {
        let mut state = ClientsState::new(page_of(&["A", "B", "C"]), String::new());
        assert_eq!(state.selected_client().unwrap().name, "A");

        state.previous();
        assert_eq!(state.selected_client().unwrap().name, "C");
        state.next();
        assert_eq!(state.selected_client().unwrap().name, "A");
    }

    #[test]
    fn empty_page_has_no_selection() {
        let mut state = ClientsState::new(page_of(&[]), String::new());
        assert!(state.selected_client().is_none());
        state.next();
        assert!(state.selected_client().is_none());
    }

    #[test]
    fn zero_page_from_the_api_displays_as_one() {
        let mut page = page_of(&[]);
        page.page = 0;
        let state = ClientsState::new(page, String::new());
        assert_eq!(state.page(), 1);
    }
}
