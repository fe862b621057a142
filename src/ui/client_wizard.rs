use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    Frame,
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, Paragraph, Tabs},
};

use crate::api::{AddressInfo, CompanyInfo};
use crate::models::{Client, MAX_REMOTE_ACCESS};
use crate::ui::components::access_list::{AccessListState, render_access_list};
use crate::validation;

pub enum ClientWizardAction {
    Cancel,
    Save(Client),
    LookupCnpj(String),
    LookupCep(String),
}

#[derive(Clone, Copy, PartialEq)]
pub enum WizardTab {
    Cliente,
    Financeiro,
    Acesso,
}

impl WizardTab {
    fn index(self) -> usize {
        match self {
            WizardTab::Cliente => 0,
            WizardTab::Financeiro => 1,
            WizardTab::Acesso => 2,
        }
    }

    fn next(self) -> Self {
        match self {
            WizardTab::Cliente => WizardTab::Financeiro,
            WizardTab::Financeiro => WizardTab::Acesso,
            WizardTab::Acesso => WizardTab::Cliente,
        }
    }

    fn previous(self) -> Self {
        match self {
            WizardTab::Cliente => WizardTab::Acesso,
            WizardTab::Financeiro => WizardTab::Cliente,
            WizardTab::Acesso => WizardTab::Financeiro,
        }
    }
}

#[derive(Clone, Copy, PartialEq)]
pub enum ClientField {
    Cnpj,
    StateRegistration,
    Name,
    FantasyName,
    Cep,
    Address,
    Number,
    Complement,
    Neighborhood,
    City,
    Uf,
    Phone,
    Phone2,
    Mobile,
    Email,
    MunicipalRegistration,
    Notes,
    PaymentType,
    MonthlyFee,
    ContractType,
}

const CLIENTE_FIELDS: [ClientField; 17] = [
    ClientField::Cnpj,
    ClientField::StateRegistration,
    ClientField::Name,
    ClientField::FantasyName,
    ClientField::Cep,
    ClientField::Address,
    ClientField::Number,
    ClientField::Complement,
    ClientField::Neighborhood,
    ClientField::City,
    ClientField::Uf,
    ClientField::Phone,
    ClientField::Phone2,
    ClientField::Mobile,
    ClientField::Email,
    ClientField::MunicipalRegistration,
    ClientField::Notes,
];

const FINANCEIRO_FIELDS: [ClientField; 3] = [
    ClientField::PaymentType,
    ClientField::MonthlyFee,
    ClientField::ContractType,
];

// Fields that must be filled before the record can be saved
const REQUIRED_FIELDS: [ClientField; 14] = [
    ClientField::Cnpj,
    ClientField::Name,
    ClientField::FantasyName,
    ClientField::Cep,
    ClientField::Address,
    ClientField::Number,
    ClientField::Neighborhood,
    ClientField::City,
    ClientField::Uf,
    ClientField::Phone,
    ClientField::Email,
    ClientField::PaymentType,
    ClientField::MonthlyFee,
    ClientField::ContractType,
];

pub const PAYMENT_TYPES: [&str; 3] = ["boleto", "cartao", "transferencia"];
pub const CONTRACT_TYPES: [&str; 2] = ["mensal", "anual"];

impl ClientField {
    fn label(self) -> &'static str {
        match self {
            ClientField::Cnpj => "CNPJ",
            ClientField::StateRegistration => "Inscrição Estadual",
            ClientField::Name => "Razão Social / Nome",
            ClientField::FantasyName => "Nome Fantasia",
            ClientField::Cep => "CEP",
            ClientField::Address => "Endereço",
            ClientField::Number => "Número",
            ClientField::Complement => "Complemento",
            ClientField::Neighborhood => "Bairro",
            ClientField::City => "Cidade",
            ClientField::Uf => "UF",
            ClientField::Phone => "Telefone 1",
            ClientField::Phone2 => "Telefone 2",
            ClientField::Mobile => "Celular",
            ClientField::Email => "E-mail",
            ClientField::MunicipalRegistration => "Inscrição Municipal",
            ClientField::Notes => "Observações",
            ClientField::PaymentType => "Tipo de Pagamento",
            ClientField::MonthlyFee => "Valor da Mensalidade (R$)",
            ClientField::ContractType => "Tipo de Contrato",
        }
    }

    fn tab(self) -> WizardTab {
        match self {
            ClientField::PaymentType | ClientField::MonthlyFee | ClientField::ContractType => {
                WizardTab::Financeiro
            }
            _ => WizardTab::Cliente,
        }
    }

    // Selection fields cycle through fixed options instead of free text
    fn options(self) -> Option<&'static [&'static str]> {
        match self {
            ClientField::PaymentType => Some(&PAYMENT_TYPES),
            ClientField::ContractType => Some(&CONTRACT_TYPES),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, PartialEq)]
enum AccessFocus {
    TeamViewer,
    AnyDesk,
}

pub struct ValidationFailure {
    pub tab: WizardTab,
    pub field: Option<ClientField>,
    pub message: String,
}

pub struct ClientWizardState {
    client: Client,
    tab: WizardTab,
    current_field: ClientField,
    editing: bool,
    teamviewer: AccessListState,
    anydesk: AccessListState,
    access_focus: AccessFocus,
    error: Option<String>,
    info: Option<String>,
}

impl ClientWizardState {
    pub fn new() -> Self {
        Self::from_existing(Client::new())
    }

    pub fn from_existing(mut client: Client) -> Self {
        let teamviewer = std::mem::take(&mut client.teamviewer);
        let anydesk = std::mem::take(&mut client.anydesk);

        Self {
            client,
            tab: WizardTab::Cliente,
            current_field: ClientField::Cnpj,
            editing: false,
            teamviewer: AccessListState::new("TeamViewer", teamviewer),
            anydesk: AccessListState::new("AnyDesk", anydesk),
            access_focus: AccessFocus::TeamViewer,
            error: None,
            info: None,
        }
    }

    pub fn is_new(&self) -> bool {
        self.client.id == 0
    }

    pub fn set_error(&mut self, message: String) {
        self.info = None;
        self.error = Some(message);
    }

    fn clear_messages(&mut self) {
        self.error = None;
        self.info = None;
    }

    fn next_tab(&mut self) {
        self.set_tab(self.tab.next());
    }

    fn previous_tab(&mut self) {
        self.set_tab(self.tab.previous());
    }

    fn set_tab(&mut self, tab: WizardTab) {
        self.tab = tab;
        self.editing = false;
        match tab {
            WizardTab::Cliente => self.current_field = CLIENTE_FIELDS[0],
            WizardTab::Financeiro => self.current_field = FINANCEIRO_FIELDS[0],
            WizardTab::Acesso => {}
        }
    }

    fn fields(&self) -> &'static [ClientField] {
        match self.tab {
            WizardTab::Financeiro => &FINANCEIRO_FIELDS,
            _ => &CLIENTE_FIELDS,
        }
    }

    fn next_field(&mut self) {
        let fields = self.fields();
        let i = fields
            .iter()
            .position(|f| *f == self.current_field)
            .unwrap_or(0);
        self.current_field = fields[(i + 1) % fields.len()];
    }

    fn previous_field(&mut self) {
        let fields = self.fields();
        let i = fields
            .iter()
            .position(|f| *f == self.current_field)
            .unwrap_or(0);
        self.current_field = fields[(i + fields.len() - 1) % fields.len()];
    }

    fn field_value(&self, field: ClientField) -> &str {
        match field {
            ClientField::Cnpj => &self.client.cnpj,
            ClientField::StateRegistration => &self.client.state_registration,
            ClientField::Name => &self.client.name,
            ClientField::FantasyName => &self.client.fantasy_name,
            ClientField::Cep => &self.client.cep,
            ClientField::Address => &self.client.address,
            ClientField::Number => &self.client.number,
            ClientField::Complement => &self.client.complement,
            ClientField::Neighborhood => &self.client.neighborhood,
            ClientField::City => &self.client.city,
            ClientField::Uf => &self.client.state,
            ClientField::Phone => &self.client.phone,
            ClientField::Phone2 => &self.client.phone2,
            ClientField::Mobile => &self.client.mobile,
            ClientField::Email => &self.client.email,
            ClientField::MunicipalRegistration => &self.client.municipal_registration,
            ClientField::Notes => &self.client.notes,
            ClientField::PaymentType => &self.client.payment_type,
            ClientField::MonthlyFee => &self.client.monthly_fee,
            ClientField::ContractType => &self.client.contract_type,
        }
    }

    fn field_value_mut(&mut self, field: ClientField) -> &mut String {
        match field {
            ClientField::Cnpj => &mut self.client.cnpj,
            ClientField::StateRegistration => &mut self.client.state_registration,
            ClientField::Name => &mut self.client.name,
            ClientField::FantasyName => &mut self.client.fantasy_name,
            ClientField::Cep => &mut self.client.cep,
            ClientField::Address => &mut self.client.address,
            ClientField::Number => &mut self.client.number,
            ClientField::Complement => &mut self.client.complement,
            ClientField::Neighborhood => &mut self.client.neighborhood,
            ClientField::City => &mut self.client.city,
            ClientField::Uf => &mut self.client.state,
            ClientField::Phone => &mut self.client.phone,
            ClientField::Phone2 => &mut self.client.phone2,
            ClientField::Mobile => &mut self.client.mobile,
            ClientField::Email => &mut self.client.email,
            ClientField::MunicipalRegistration => &mut self.client.municipal_registration,
            ClientField::Notes => &mut self.client.notes,
            ClientField::PaymentType => &mut self.client.payment_type,
            ClientField::MonthlyFee => &mut self.client.monthly_fee,
            ClientField::ContractType => &mut self.client.contract_type,
        }
    }

    fn cycle_option(&mut self, field: ClientField) {
        let Some(options) = field.options() else {
            return;
        };
        let current = self.field_value(field);
        let next = match options.iter().position(|o| *o == current) {
            Some(i) => options[(i + 1) % options.len()],
            None => options[0],
        };
        *self.field_value_mut(field) = next.to_string();
    }

    fn edit_current_field(&mut self, key: KeyCode) {
        if !self.editing {
            return;
        }

        let value = self.field_value_mut(self.current_field);
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

    fn focused_access_list(&mut self) -> &mut AccessListState {
        match self.access_focus {
            AccessFocus::TeamViewer => &mut self.teamviewer,
            AccessFocus::AnyDesk => &mut self.anydesk,
        }
    }

    pub fn add_access_entry(&mut self) {
        let list = self.focused_access_list();
        let label = list.label();
        if !list.add() {
            self.set_error(format!(
                "{}: limite de {} acessos atingido",
                label, MAX_REMOTE_ACCESS
            ));
        }
    }

    /// Auto-fill from the company-registry lookup. Only fields the lookup
    /// actually returned are overwritten.
    pub fn apply_company(&mut self, info: &CompanyInfo) {
        let cep = info.cep.as_deref().map(|c| validation::format_cep(c));
        let fills = [
            (ClientField::Name, info.razao_social.as_deref()),
            (ClientField::FantasyName, info.nome_fantasia.as_deref()),
            (ClientField::Cep, cep.as_deref()),
            (ClientField::Address, info.logradouro.as_deref()),
            (ClientField::Number, info.numero.as_deref()),
            (ClientField::Complement, info.complemento.as_deref()),
            (ClientField::Neighborhood, info.bairro.as_deref()),
            (ClientField::City, info.municipio.as_deref()),
            (ClientField::Uf, info.uf.as_deref()),
        ];
        self.fill_fields(&fills);
        self.error = None;
        self.info = Some("Dados do CNPJ preenchidos.".to_string());
    }

    /// Auto-fill from the postal-code lookup.
    pub fn apply_address(&mut self, info: &AddressInfo) {
        let fills = [
            (ClientField::Address, info.logradouro.as_deref()),
            (ClientField::Neighborhood, info.bairro.as_deref()),
            (ClientField::City, info.localidade.as_deref()),
            (ClientField::Uf, info.uf.as_deref()),
        ];
        self.fill_fields(&fills);
        self.error = None;
        self.info = Some("CEP consultado e endereço preenchido.".to_string());
    }

    fn fill_fields(&mut self, fills: &[(ClientField, Option<&str>)]) {
        for (field, value) in fills {
            if let Some(value) = value {
                if !value.trim().is_empty() {
                    *self.field_value_mut(*field) = value.trim().to_string();
                }
            }
        }
    }

    pub fn validate(&self) -> Result<(), ValidationFailure> {
        for field in REQUIRED_FIELDS {
            if self.field_value(field).trim().is_empty() {
                return Err(ValidationFailure {
                    tab: field.tab(),
                    field: Some(field),
                    message: format!("Campo obrigatório: {}", field.label()),
                });
            }
        }

        if !validation::is_valid_cnpj(&self.client.cnpj) {
            return Err(ValidationFailure {
                tab: WizardTab::Cliente,
                field: Some(ClientField::Cnpj),
                message: "CNPJ inválido".to_string(),
            });
        }
        if !validation::is_valid_cep(&self.client.cep) {
            return Err(ValidationFailure {
                tab: WizardTab::Cliente,
                field: Some(ClientField::Cep),
                message: "CEP inválido".to_string(),
            });
        }

        for (list, label) in [(&self.teamviewer, "TeamViewer"), (&self.anydesk, "AnyDesk")] {
            for (i, entry) in list.entries().iter().enumerate() {
                if entry.id.trim().is_empty() || entry.password.trim().is_empty() {
                    return Err(ValidationFailure {
                        tab: WizardTab::Acesso,
                        field: None,
                        message: format!("{}: preencha ID e senha no item {}", label, i + 1),
                    });
                }
            }
        }

        Ok(())
    }

    fn apply_failure(&mut self, failure: ValidationFailure) {
        self.set_tab(failure.tab);
        if let Some(field) = failure.field {
            self.current_field = field;
        }
        self.set_error(failure.message);
    }

    /// The record as it will be submitted: documents normalized, access
    /// lists folded back in.
    pub fn assembled_client(&self) -> Client {
        let mut client = self.client.clone();
        client.cnpj = validation::format_cnpj(&client.cnpj);
        client.cep = validation::format_cep(&client.cep);
        client.teamviewer = self.teamviewer.entries().to_vec();
        client.anydesk = self.anydesk.entries().to_vec();
        client
    }

    pub fn cnpj(&self) -> &str {
        &self.client.cnpj
    }

    pub fn cep(&self) -> &str {
        &self.client.cep
    }

    fn try_save(&mut self) -> Option<ClientWizardAction> {
        match self.validate() {
            Ok(()) => Some(ClientWizardAction::Save(self.assembled_client())),
            Err(failure) => {
                self.apply_failure(failure);
                None
            }
        }
    }
}

pub fn render_client_wizard<B: Backend>(f: &mut Frame<B>, state: &mut ClientWizardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(1),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(f.size());

    // Title with appropriate text based on whether we're editing or creating
    let title_text = if state.is_new() {
        "Cadastro de Cliente"
    } else {
        "Edição de Cliente"
    };

    let title = Paragraph::new(title_text)
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let tabs = Tabs::new(
        ["Dados do Cliente", "Financeiro", "Acesso Remoto"]
            .iter()
            .map(|t| Spans::from(*t))
            .collect(),
    )
    .select(state.tab.index())
    .block(Block::default().borders(Borders::ALL))
    .highlight_style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );
    f.render_widget(tabs, chunks[1]);

    match state.tab {
        WizardTab::Cliente | WizardTab::Financeiro => render_form(f, state, chunks[2]),
        WizardTab::Acesso => render_access_tab(f, state, chunks[2]),
    }

    // One-line status: validation/lookup errors or lookup confirmations
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
    f.render_widget(Paragraph::new(status), chunks[3]);

    let help_text = if state.tab == WizardTab::Acesso {
        if state.focused_access_list().editing().is_some() {
            "Enter - Próximo campo | Esc - Concluir edição"
        } else {
            "A - Adicionar | R - Remover | Enter - Editar | ←/→ - Alternar lista | Tab - Mudar aba | S - Salvar | Esc - Cancelar"
        }
    } else if state.editing {
        "Enter - Concluir edição | Esc - Cancelar edição"
    } else if state.current_field.options().is_some() {
        "Enter - Alternar opção | ↑/↓ - Campos | Tab - Mudar aba | S - Salvar | Esc - Cancelar"
    } else {
        "Enter - Editar campo | ↑/↓ - Campos | Tab - Mudar aba | F5 - Consultar CNPJ/CEP | S - Salvar | Esc - Cancelar"
    };

    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[4]);
}

fn render_form<B: Backend>(f: &mut Frame<B>, state: &mut ClientWizardState, area: Rect) {
    let items: Vec<ListItem> = state
        .fields()
        .iter()
        .map(|field| {
            let is_current = *field == state.current_field;
            let value = state.field_value(*field);

            let content = if is_current && state.editing {
                Spans::from(vec![
                    Span::styled(
                        format!("{}: ", field.label()),
                        Style::default().fg(Color::Yellow),
                    ),
                    Span::styled(
                        format!("{}|", value),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                ])
            } else {
                let style = if is_current {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default()
                };

                Spans::from(vec![
                    Span::styled(format!("{}: ", field.label()), style),
                    Span::raw(value),
                ])
            };

            ListItem::new(content)
        })
        .collect();

    let title = match state.tab {
        WizardTab::Financeiro => "Financeiro",
        _ => "Dados do Cliente",
    };

    let form_list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().fg(Color::Yellow));

    f.render_widget(form_list, area);
}

fn render_access_tab<B: Backend>(f: &mut Frame<B>, state: &mut ClientWizardState, area: Rect) {
    let halves = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(area);

    let focus = state.access_focus;
    render_access_list(
        f,
        halves[0],
        &mut state.teamviewer,
        focus == AccessFocus::TeamViewer,
    );
    render_access_list(
        f,
        halves[1],
        &mut state.anydesk,
        focus == AccessFocus::AnyDesk,
    );
}

pub fn handle_input(state: &mut ClientWizardState) -> Result<Option<ClientWizardAction>> {
    if let Event::Key(key) = event::read()? {
        // Lookups fire from the CNPJ/CEP fields regardless of edit mode
        if key.code == KeyCode::F(5) && state.tab == WizardTab::Cliente {
            match state.current_field {
                ClientField::Cnpj => {
                    return Ok(Some(ClientWizardAction::LookupCnpj(state.cnpj().to_string())));
                }
                ClientField::Cep => {
                    return Ok(Some(ClientWizardAction::LookupCep(state.cep().to_string())));
                }
                _ => {}
            }
        }

        if key.code == KeyCode::F(8) {
            return Ok(state.try_save());
        }

        if state.tab == WizardTab::Acesso {
            return handle_access_input(state, key.code);
        }

        match key.code {
            KeyCode::Esc => {
                if state.editing {
                    state.editing = false;
                } else {
                    return Ok(Some(ClientWizardAction::Cancel));
                }
            }
            KeyCode::Tab if !state.editing => {
                state.next_tab();
            }
            KeyCode::BackTab if !state.editing => {
                state.previous_tab();
            }
            KeyCode::Enter => {
                if state.current_field.options().is_some() {
                    state.cycle_option(state.current_field);
                } else {
                    state.clear_messages();
                    state.editing = !state.editing;
                }
            }
            KeyCode::Up if !state.editing => {
                state.previous_field();
            }
            KeyCode::Down if !state.editing => {
                state.next_field();
            }
            KeyCode::Char('s') if !state.editing => {
                return Ok(state.try_save());
            }
            _ if state.editing => {
                state.edit_current_field(key.code);
            }
            _ => {}
        }
    }

    Ok(None)
}

fn handle_access_input(
    state: &mut ClientWizardState,
    key: KeyCode,
) -> Result<Option<ClientWizardAction>> {
    if state.focused_access_list().editing().is_some() {
        match key {
            KeyCode::Esc => state.focused_access_list().stop_editing(),
            KeyCode::Enter | KeyCode::Tab => state.focused_access_list().advance_field(),
            other => state.focused_access_list().handle_edit_key(other),
        }
        return Ok(None);
    }

    match key {
        KeyCode::Esc => return Ok(Some(ClientWizardAction::Cancel)),
        KeyCode::Tab => state.next_tab(),
        KeyCode::BackTab => state.previous_tab(),
        KeyCode::Left | KeyCode::Right => {
            state.access_focus = match state.access_focus {
                AccessFocus::TeamViewer => AccessFocus::AnyDesk,
                AccessFocus::AnyDesk => AccessFocus::TeamViewer,
            };
        }
        KeyCode::Up => state.focused_access_list().previous(),
        KeyCode::Down => state.focused_access_list().next(),
        KeyCode::Enter => state.focused_access_list().start_editing(),
        KeyCode::Char('a') => {
            state.clear_messages();
            state.add_access_entry();
        }
        KeyCode::Char('r') => state.focused_access_list().remove_selected(),
        KeyCode::Char('s') => return Ok(state.try_save()),
        _ => {}
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RemoteAccess;

    fn filled_state() -> ClientWizardState {
        let mut client = Client::new();
        client.cnpj = "11.222.333/0001-81".to_string();
        client.name = "Empresa Exemplo Ltda".to_string();
        client.fantasy_name = "Exemplo".to_string();
        client.cep = "01310-100".to_string();
        client.address = "Avenida Paulista".to_string();
        client.number = "1000".to_string();
        client.neighborhood = "Bela Vista".to_string();
        client.city = "São Paulo".to_string();
        client.state = "SP".to_string();
        client.phone = "(11) 3322-1100".to_string();
        client.email = "contato@exemplo.com.br".to_string();
        client.payment_type = "boleto".to_string();
        client.monthly_fee = "350".to_string();
        client.contract_type = "mensal".to_string();
        ClientWizardState::from_existing(client)
    }

    #[test]
    fn missing_required_field_blocks_save_with_message() {
        let mut state = filled_state();
        *state.field_value_mut(ClientField::Name) = String::new();

        let failure = state.validate().err().expect("validation should fail");
        assert_eq!(failure.message, "Campo obrigatório: Razão Social / Nome");
        assert!(failure.tab == WizardTab::Cliente);
    }

    #[test]
    fn missing_billing_field_points_at_the_financeiro_tab() {
        let mut state = filled_state();
        *state.field_value_mut(ClientField::PaymentType) = String::new();

        let failure = state.validate().err().expect("validation should fail");
        assert_eq!(failure.message, "Campo obrigatório: Tipo de Pagamento");
        assert!(failure.tab == WizardTab::Financeiro);
        assert!(failure.field == Some(ClientField::PaymentType));
    }

    #[test]
    fn bad_check_digits_block_save() {
        let mut state = filled_state();
        *state.field_value_mut(ClientField::Cnpj) = "11.222.333/0001-82".to_string();

        let failure = state.validate().err().expect("validation should fail");
        assert_eq!(failure.message, "CNPJ inválido");
    }

    #[test]
    fn incomplete_access_entry_points_at_the_acesso_tab() {
        let mut state = filled_state();
        state.teamviewer = AccessListState::new(
            "TeamViewer",
            vec![RemoteAccess {
                id: "123456789".to_string(),
                password: String::new(),
            }],
        );

        let failure = state.validate().err().expect("validation should fail");
        assert_eq!(failure.message, "TeamViewer: preencha ID e senha no item 1");
        assert!(failure.tab == WizardTab::Acesso);
        assert!(failure.field.is_none());
    }

    #[test]
    fn assembled_client_normalizes_documents_and_folds_access_lists() {
        let mut state = filled_state();
        *state.field_value_mut(ClientField::Cnpj) = "11222333000181".to_string();
        *state.field_value_mut(ClientField::Cep) = "01310100".to_string();
        state.anydesk = AccessListState::new(
            "AnyDesk",
            vec![RemoteAccess {
                id: "987654321".to_string(),
                password: "pw".to_string(),
            }],
        );

        let client = state.assembled_client();
        assert_eq!(client.cnpj, "11.222.333/0001-81");
        assert_eq!(client.cep, "01310-100");
        assert_eq!(client.anydesk.len(), 1);
        assert!(client.teamviewer.is_empty());
    }

    #[test]
    fn company_lookup_fills_only_returned_fields() {
        let mut state = filled_state();
        *state.field_value_mut(ClientField::Number) = "99".to_string();

        let info = CompanyInfo {
            razao_social: Some("NOVA RAZAO LTDA".to_string()),
            nome_fantasia: None,
            cep: Some("01310100".to_string()),
            logradouro: Some("AVENIDA PAULISTA".to_string()),
            numero: None,
            complemento: Some("  ".to_string()),
            bairro: None,
            municipio: None,
            uf: None,
        };
        state.apply_company(&info);

        assert_eq!(state.field_value(ClientField::Name), "NOVA RAZAO LTDA");
        assert_eq!(state.field_value(ClientField::Cep), "01310-100");
        // Absent or blank lookup fields leave the form untouched
        assert_eq!(state.field_value(ClientField::FantasyName), "Exemplo");
        assert_eq!(state.field_value(ClientField::Number), "99");
        assert_eq!(state.field_value(ClientField::Complement), "");
    }

    #[test]
    fn address_lookup_fills_the_address_fields() {
        let mut state = filled_state();
        let info = AddressInfo {
            logradouro: Some("Rua Augusta".to_string()),
            complemento: None,
            bairro: Some("Consolação".to_string()),
            localidade: Some("São Paulo".to_string()),
            uf: Some("SP".to_string()),
            erro: false,
        };
        state.apply_address(&info);

        assert_eq!(state.field_value(ClientField::Address), "Rua Augusta");
        assert_eq!(state.field_value(ClientField::Neighborhood), "Consolação");
    }

    #[test]
    fn enter_cycles_selection_fields() {
        let mut state = filled_state();
        state.cycle_option(ClientField::PaymentType);
        assert_eq!(state.field_value(ClientField::PaymentType), "cartao");
        state.cycle_option(ClientField::PaymentType);
        assert_eq!(state.field_value(ClientField::PaymentType), "transferencia");
        state.cycle_option(ClientField::PaymentType);
        assert_eq!(state.field_value(ClientField::PaymentType), "boleto");
    }

    #[test]
    fn adding_past_the_cap_sets_an_error() {
        let mut state = ClientWizardState::new();
        for _ in 0..MAX_REMOTE_ACCESS {
            state.add_access_entry();
        }
        assert!(state.error.is_none());

        state.add_access_entry();
        assert_eq!(
            state.error.as_deref(),
            Some("TeamViewer: limite de 6 acessos atingido")
        );
        assert_eq!(state.teamviewer.len(), MAX_REMOTE_ACCESS);
    }
}
