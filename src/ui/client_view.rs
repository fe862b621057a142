use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    Frame,
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::models::{Client, RemoteAccess};

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum RemoteVendor {
    TeamViewer,
    AnyDesk,
}

// Represents the state of the read-only client detail screen
pub struct ClientViewState {
    client: Client,
    error: Option<String>,
    info: Option<String>,
}

impl ClientViewState {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            error: None,
            info: None,
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn set_error(&mut self, message: String) {
        self.info = None;
        self.error = Some(message);
    }

    pub fn set_info(&mut self, message: String) {
        self.error = None;
        self.info = Some(message);
    }

    /// TeamViewer entries first, then AnyDesk; the list screens and the
    /// 1-9 connect keys share this numbering.
    pub fn remote_entries(&self) -> Vec<(RemoteVendor, &RemoteAccess)> {
        self.client
            .teamviewer
            .iter()
            .map(|e| (RemoteVendor::TeamViewer, e))
            .chain(
                self.client
                    .anydesk
                    .iter()
                    .map(|e| (RemoteVendor::AnyDesk, e)),
            )
            .collect()
    }

    /// Number to reach on WhatsApp: the mobile, falling back to phone 1.
    pub fn whatsapp_number(&self) -> Option<&str> {
        pick_number(&self.client.mobile, &self.client.phone)
    }

    /// Number to dial: phone 1, falling back to the mobile.
    pub fn phone_number(&self) -> Option<&str> {
        pick_number(&self.client.phone, &self.client.mobile)
    }
}

fn pick_number<'a>(first: &'a str, second: &'a str) -> Option<&'a str> {
    if !first.trim().is_empty() {
        Some(first)
    } else if !second.trim().is_empty() {
        Some(second)
    } else {
        None
    }
}

pub enum ClientViewAction {
    Back,
    Edit(i32),
    OpenWhatsApp,
    CallPhone,
    SendEmail,
    ConnectRemote(usize),
}

pub fn render_client_view<B: Backend>(frame: &mut Frame<B>, state: &mut ClientViewState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(1),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(frame.size());

    let title = Paragraph::new(state.client.display_name().to_string())
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, chunks[0]);

    let client = &state.client;
    let address = format_address(client);
    let mut lines = vec![
        detail_line("CNPJ", &client.cnpj),
        detail_line("Razão Social", &client.name),
        detail_line("Nome Fantasia", &client.fantasy_name),
        detail_line("Inscrição Estadual", &client.state_registration),
        detail_line("Inscrição Municipal", &client.municipal_registration),
        detail_line("Endereço", &address),
        detail_line("E-mail", &client.email),
        detail_line("Telefone 1", &client.phone),
        detail_line("Telefone 2", &client.phone2),
        detail_line("Celular", &client.mobile),
        detail_line("Tipo de Pagamento", &client.payment_type),
        detail_line("Mensalidade (R$)", &client.monthly_fee),
        detail_line("Tipo de Contrato", &client.contract_type),
    ];

    lines.push(Spans::from(""));
    lines.push(Spans::from(Span::styled(
        "Acesso Remoto",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    let entries = state.remote_entries();
    if entries.is_empty() {
        lines.push(Spans::from(Span::styled(
            "  Nenhum acesso cadastrado",
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        for (i, (vendor, entry)) in entries.iter().enumerate() {
            let vendor = match vendor {
                RemoteVendor::TeamViewer => "TeamViewer",
                RemoteVendor::AnyDesk => "AnyDesk",
            };
            lines.push(Spans::from(format!(
                "  [{}] {} {} (senha: {})",
                i + 1,
                vendor,
                entry.id,
                entry.password
            )));
        }
    }

    if !client.notes.is_empty() {
        lines.push(Spans::from(""));
        lines.push(Spans::from(Span::styled(
            "Observações",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        lines.push(Spans::from(format!("  {}", client.notes)));
    }

    let details = Paragraph::new(lines)
        .block(Block::default().title("Dados do Cliente").borders(Borders::ALL))
        .wrap(Wrap { trim: false });
    frame.render_widget(details, chunks[1]);

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

    let help = Paragraph::new(
        "<W> WhatsApp | <T> Ligar | <M> E-mail | <1-9> Conectar acesso | <E> Editar | <Esc> Voltar",
    )
    .style(Style::default().fg(Color::Gray))
    .block(Block::default().borders(Borders::TOP));
    frame.render_widget(help, chunks[3]);
}

fn detail_line<'a>(label: &'a str, value: &'a str) -> Spans<'a> {
    let value = if value.is_empty() { "-" } else { value };
    Spans::from(vec![
        Span::styled(
            format!("{}: ", label),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(value),
    ])
}

fn format_address(client: &Client) -> String {
    let mut address = client.address.clone();
    if !client.number.is_empty() {
        address = format!("{}, {}", address, client.number);
    }
    if !client.complement.is_empty() {
        address = format!("{} {}", address, client.complement);
    }
    if !client.neighborhood.is_empty() {
        address = format!("{} - {}", address, client.neighborhood);
    }
    if !client.city.is_empty() {
        address = format!("{} - {}/{}", address, client.city, client.state);
    }
    if !client.cep.is_empty() {
        address = format!("{} - CEP {}", address, client.cep);
    }
    address
}

pub fn handle_input(state: &mut ClientViewState) -> Result<Option<ClientViewAction>> {
    if let Event::Key(key) = event::read()? {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return Ok(Some(ClientViewAction::Back)),
            KeyCode::Char('e') => return Ok(Some(ClientViewAction::Edit(state.client.id))),
            KeyCode::Char('w') => return Ok(Some(ClientViewAction::OpenWhatsApp)),
            KeyCode::Char('t') => return Ok(Some(ClientViewAction::CallPhone)),
            KeyCode::Char('m') => return Ok(Some(ClientViewAction::SendEmail)),
            KeyCode::Char(c) if c.is_ascii_digit() && c != '0' => {
                let index = (c as usize) - ('1' as usize);
                if index < state.remote_entries().len() {
                    return Ok(Some(ClientViewAction::ConnectRemote(index)));
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

    fn client_with_contacts() -> Client {
        let mut client = Client::new();
        client.id = 3;
        client.name = "Empresa Exemplo".to_string();
        client.phone = "(11) 3322-1100".to_string();
        client.mobile = "(11) 98765-4321".to_string();
        client.teamviewer = vec![RemoteAccess {
            id: "111".to_string(),
            password: "a".to_string(),
        }];
        client.anydesk = vec![
            RemoteAccess {
                id: "222".to_string(),
                password: "b".to_string(),
            },
            RemoteAccess {
                id: "333".to_string(),
                password: "c".to_string(),
            },
        ];
        client
    }

    #[test]
    fn remote_entries_number_across_both_vendors() {
        let state = ClientViewState::new(client_with_contacts());
        let entries = state.remote_entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].0, RemoteVendor::TeamViewer);
        assert_eq!(entries[1].0, RemoteVendor::AnyDesk);
        assert_eq!(entries[2].1.id, "333");
    }

    #[test]
    fn whatsapp_prefers_the_mobile_number() {
        let state = ClientViewState::new(client_with_contacts());
        assert_eq!(state.whatsapp_number(), Some("(11) 98765-4321"));
        assert_eq!(state.phone_number(), Some("(11) 3322-1100"));

        let mut client = client_with_contacts();
        client.mobile = String::new();
        let state = ClientViewState::new(client);
        assert_eq!(state.whatsapp_number(), Some("(11) 3322-1100"));

        let mut client = client_with_contacts();
        client.mobile = String::new();
        client.phone = String::new();
        let state = ClientViewState::new(client);
        assert!(state.whatsapp_number().is_none());
    }

    #[test]
    fn address_formats_the_filled_parts_only() {
        let mut client = Client::new();
        client.address = "Avenida Paulista".to_string();
        client.number = "1000".to_string();
        client.city = "São Paulo".to_string();
        client.state = "SP".to_string();
        assert_eq!(
            format_address(&client),
            "Avenida Paulista, 1000 - São Paulo/SP"
        );
    }
}
