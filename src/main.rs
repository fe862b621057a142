mod api;
mod config;
mod launcher;
mod models;
mod session;
mod ui;
mod validation;

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use tracing_subscriber::EnvFilter;
use tui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
};

use crate::api::{ApiClient, ApiError, LookupClient};
use crate::models::ClientPage;
use crate::session::{Session, SessionStore};
use crate::ui::{
    client_view::{
        ClientViewAction, ClientViewState, RemoteVendor,
        handle_input as handle_client_view_input, render_client_view,
    },
    client_wizard::{
        ClientWizardAction, ClientWizardState, handle_input as handle_client_wizard_input,
        render_client_wizard,
    },
    clients::{ClientAction, ClientsState, handle_input as handle_clients_input, render_clients},
    login::{LoginAction, LoginState, handle_input as handle_login_input, render_login},
    register::{
        RegisterAction, RegisterState, handle_input as handle_register_input, render_register,
    },
};

const PER_PAGE: u32 = 20;

/// Agenda Digital - gerenciador de clientes no terminal
#[derive(Parser, Debug)]
#[command(name = "agenda-digital", version)]
struct Args {
    /// Overrides the API base URL (API_URL)
    #[arg(long)]
    api_url: Option<String>,
    /// Overrides the session file path (SESSION_FILE)
    #[arg(long)]
    session_file: Option<PathBuf>,
}

// Represents the current screen in the app
enum AppScreen {
    Login,
    Register,
    Clients,
    ClientWizard,
    ClientView,
}

// Main application state
struct AppState {
    api: ApiClient,
    lookup: LookupClient,
    session_store: SessionStore,
    screen: AppScreen,
    list_page: u32,
    list_query: String,
    login_state: Option<LoginState>,
    register_state: Option<RegisterState>,
    clients_state: Option<ClientsState>,
    client_wizard_state: Option<ClientWizardState>,
    client_view_state: Option<ClientViewState>,
}

impl AppState {
    fn new(api: ApiClient, lookup: LookupClient, session_store: SessionStore) -> Self {
        Self {
            api,
            lookup,
            session_store,
            screen: AppScreen::Login,
            list_page: 1,
            list_query: String::new(),
            login_state: Some(LoginState::new()),
            register_state: None,
            clients_state: None,
            client_wizard_state: None,
            client_view_state: None,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration; CLI flags win over the environment
    let mut config = config::init()?;
    if let Some(api_url) = args.api_url {
        config.api_url = api_url;
    }
    if let Some(session_file) = args.session_file {
        config.session_file = Some(session_file);
    }

    init_tracing(config.log_file.as_deref())?;
    println!("Iniciando a Agenda Digital...");

    let api = ApiClient::new(&config.api_url)?;
    let lookup = LookupClient::new(&config.cnpj_lookup_url, &config.cep_lookup_url)?;
    let session_store = SessionStore::new(config.session_file.clone())?;

    // Create app state
    let mut app_state = AppState::new(api, lookup, session_store);

    // Resume a stored session, otherwise start at the login screen
    if let Some(session) = app_state.session_store.load() {
        app_state.api.set_token(&session.token);
        load_clients_screen(&mut app_state, 1, String::new()).await?;
    }

    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the main app loop
    let result = run_app(&mut terminal, &mut app_state).await;

    // Restore terminal
    terminal::disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    // Show any error message
    if let Err(err) = result {
        println!("Erro: {}", err);
    }

    println!("Obrigado por usar a Agenda Digital!");

    Ok(())
}

// The terminal owns stdout, so tracing goes to a file when configured
fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app_state: &mut AppState) -> Result<()> {
    loop {
        // Render current screen
        terminal.draw(|f| {
            match app_state.screen {
                AppScreen::Login => {
                    if let Some(state) = &mut app_state.login_state {
                        render_login(f, state);
                    }
                }
                AppScreen::Register => {
                    if let Some(state) = &mut app_state.register_state {
                        render_register(f, state);
                    }
                }
                AppScreen::Clients => {
                    if let Some(state) = &mut app_state.clients_state {
                        render_clients(f, state);
                    }
                }
                AppScreen::ClientWizard => {
                    if let Some(state) = &mut app_state.client_wizard_state {
                        render_client_wizard(f, state);
                    }
                }
                AppScreen::ClientView => {
                    if let Some(state) = &mut app_state.client_view_state {
                        render_client_view(f, state);
                    }
                }
            }
        })?;

        // Handle input for current screen
        let should_quit = match app_state.screen {
            AppScreen::Login => handle_login_screen(app_state).await?,
            AppScreen::Register => handle_register_screen(app_state).await?,
            AppScreen::Clients => handle_clients_screen(app_state).await?,
            AppScreen::ClientWizard => handle_client_wizard_screen(app_state).await?,
            AppScreen::ClientView => handle_client_view_screen(app_state).await?,
        };

        if should_quit {
            break;
        }
    }

    Ok(())
}

async fn load_clients_screen(app_state: &mut AppState, page: u32, query: String) -> Result<()> {
    let trimmed = query.trim().to_string();
    let search = if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.as_str())
    };

    match app_state.api.list_clients(page, PER_PAGE, search).await {
        Ok(client_page) => {
            app_state.list_page = page;
            app_state.list_query = query.clone();
            app_state.clients_state = Some(ClientsState::new(client_page, query));
            app_state.screen = AppScreen::Clients;
        }
        Err(ApiError::Unauthorized) => expire_session(app_state)?,
        Err(err) => {
            // Keep the screen usable; the failure shows inline
            let empty = ClientPage {
                items: Vec::new(),
                total: 0,
                page,
                per_page: PER_PAGE,
            };
            let mut state = ClientsState::new(empty, query.clone());
            state.set_error(err.to_string());
            app_state.list_page = page;
            app_state.list_query = query;
            app_state.clients_state = Some(state);
            app_state.screen = AppScreen::Clients;
        }
    }

    Ok(())
}

async fn reload_clients_screen(app_state: &mut AppState) -> Result<()> {
    let page = app_state.list_page;
    let query = app_state.list_query.clone();
    load_clients_screen(app_state, page, query).await
}

// A 401 anywhere drops the stored session and returns to the login screen
fn expire_session(app_state: &mut AppState) -> Result<()> {
    app_state.api.clear_token();
    app_state.session_store.clear()?;

    let mut login = LoginState::new();
    login.set_error("Sessão expirada. Faça login novamente.".to_string());
    app_state.login_state = Some(login);
    app_state.screen = AppScreen::Login;

    Ok(())
}

async fn handle_login_screen(app_state: &mut AppState) -> Result<bool> {
    if let Some(state) = &mut app_state.login_state {
        match handle_login_input(state)? {
            Some(LoginAction::Exit) => {
                return Ok(true);
            }
            Some(LoginAction::Register) => {
                app_state.register_state = Some(RegisterState::new());
                app_state.screen = AppScreen::Register;
            }
            Some(LoginAction::Submit(credentials)) => {
                match app_state.api.login(&credentials).await {
                    Ok(response) => {
                        app_state.api.set_token(&response.token);
                        let session = Session {
                            token: response.token,
                            user: response.user,
                        };
                        // A failed write only costs the next startup a login
                        if let Err(err) = app_state.session_store.save(&session) {
                            tracing::warn!("failed to persist session: {:#}", err);
                        }
                        load_clients_screen(app_state, 1, String::new()).await?;
                    }
                    Err(err) => state.set_error(err.to_string()),
                }
            }
            None => {}
        }
    }

    Ok(false)
}

async fn handle_register_screen(app_state: &mut AppState) -> Result<bool> {
    if let Some(state) = &mut app_state.register_state {
        match handle_register_input(state)? {
            Some(RegisterAction::Cancel) => {
                app_state.login_state = Some(LoginState::new());
                app_state.screen = AppScreen::Login;
            }
            Some(RegisterAction::Submit(new_user)) => {
                match app_state.api.register(&new_user).await {
                    Ok(user) => {
                        app_state.login_state = Some(LoginState::with_info(format!(
                            "Conta criada para {}. Faça login para continuar.",
                            user.username
                        )));
                        app_state.screen = AppScreen::Login;
                    }
                    Err(err) => state.set_error(err.to_string()),
                }
            }
            None => {}
        }
    }

    Ok(false)
}

async fn handle_clients_screen(app_state: &mut AppState) -> Result<bool> {
    if let Some(state) = &mut app_state.clients_state {
        match handle_clients_input(state)? {
            Some(ClientAction::Exit) => {
                return Ok(true);
            }
            Some(ClientAction::Logout) => {
                // Logout clears the persisted session and returns to login
                app_state.api.clear_token();
                app_state.session_store.clear()?;
                app_state.login_state = Some(LoginState::new());
                app_state.screen = AppScreen::Login;
            }
            Some(ClientAction::NewClient) => {
                app_state.client_wizard_state = Some(ClientWizardState::new());
                app_state.screen = AppScreen::ClientWizard;
            }
            Some(ClientAction::EditClient(client_id)) => {
                // Load the client from the API
                match app_state.api.get_client(client_id).await {
                    Ok(client) => {
                        app_state.client_wizard_state =
                            Some(ClientWizardState::from_existing(client));
                        app_state.screen = AppScreen::ClientWizard;
                    }
                    Err(ApiError::Unauthorized) => expire_session(app_state)?,
                    Err(err) => state.set_error(err.to_string()),
                }
            }
            Some(ClientAction::ViewClient(client_id)) => {
                match app_state.api.get_client(client_id).await {
                    Ok(client) => {
                        app_state.client_view_state = Some(ClientViewState::new(client));
                        app_state.screen = AppScreen::ClientView;
                    }
                    Err(ApiError::Unauthorized) => expire_session(app_state)?,
                    Err(err) => state.set_error(err.to_string()),
                }
            }
            Some(ClientAction::DeleteClient(client_id)) => {
                match app_state.api.delete_client(client_id).await {
                    Ok(()) => {
                        reload_clients_screen(app_state).await?;
                        if let Some(state) = &mut app_state.clients_state {
                            if !state.has_error() {
                                state.set_info("Cliente excluído com sucesso.".to_string());
                            }
                        }
                    }
                    Err(ApiError::Unauthorized) => expire_session(app_state)?,
                    Err(err) => state.set_error(err.to_string()),
                }
            }
            Some(ClientAction::Search(query)) => {
                // Search always restarts from the first page
                load_clients_screen(app_state, 1, query).await?;
            }
            Some(ClientAction::Page(page)) => {
                let query = app_state.list_query.clone();
                load_clients_screen(app_state, page, query).await?;
            }
            None => {}
        }
    }

    Ok(false)
}

async fn handle_client_wizard_screen(app_state: &mut AppState) -> Result<bool> {
    if let Some(state) = &mut app_state.client_wizard_state {
        match handle_client_wizard_input(state)? {
            Some(ClientWizardAction::Cancel) => {
                reload_clients_screen(app_state).await?;
            }
            Some(ClientWizardAction::Save(client)) => {
                let result = if client.id == 0 {
                    // Create new client
                    app_state.api.create_client(&client).await
                } else {
                    // Update existing client
                    app_state.api.update_client(&client).await
                };

                match result {
                    Ok(saved) => {
                        reload_clients_screen(app_state).await?;
                        if let Some(list) = &mut app_state.clients_state {
                            if !list.has_error() {
                                list.set_info(format!(
                                    "Cliente \"{}\" salvo com sucesso.",
                                    saved.display_name()
                                ));
                            }
                        }
                    }
                    Err(ApiError::Unauthorized) => expire_session(app_state)?,
                    Err(err) => state.set_error(err.to_string()),
                }
            }
            Some(ClientWizardAction::LookupCnpj(cnpj)) => {
                match app_state.lookup.lookup_cnpj(&cnpj).await {
                    Ok(info) => state.apply_company(&info),
                    Err(err) => state.set_error(err.to_string()),
                }
            }
            Some(ClientWizardAction::LookupCep(cep)) => {
                match app_state.lookup.lookup_cep(&cep).await {
                    Ok(info) => state.apply_address(&info),
                    Err(err) => state.set_error(err.to_string()),
                }
            }
            None => {}
        }
    }

    Ok(false)
}

async fn handle_client_view_screen(app_state: &mut AppState) -> Result<bool> {
    if let Some(state) = &mut app_state.client_view_state {
        match handle_client_view_input(state)? {
            Some(ClientViewAction::Back) => {
                reload_clients_screen(app_state).await?;
            }
            Some(ClientViewAction::Edit(client_id)) => {
                match app_state.api.get_client(client_id).await {
                    Ok(client) => {
                        app_state.client_wizard_state =
                            Some(ClientWizardState::from_existing(client));
                        app_state.screen = AppScreen::ClientWizard;
                    }
                    Err(ApiError::Unauthorized) => expire_session(app_state)?,
                    Err(err) => state.set_error(err.to_string()),
                }
            }
            Some(ClientViewAction::OpenWhatsApp) => match state.whatsapp_number() {
                Some(number) => {
                    let link = launcher::whatsapp_link(number, None);
                    match launcher::open(&link) {
                        Ok(()) => state.set_info("Abrindo conversa no WhatsApp...".to_string()),
                        Err(err) => state.set_error(err.to_string()),
                    }
                }
                None => state.set_error("Nenhum telefone cadastrado".to_string()),
            },
            Some(ClientViewAction::CallPhone) => match state.phone_number() {
                Some(number) => {
                    let link = launcher::tel_link(number);
                    match launcher::open(&link) {
                        Ok(()) => state.set_info("Iniciando ligação...".to_string()),
                        Err(err) => state.set_error(err.to_string()),
                    }
                }
                None => state.set_error("Nenhum telefone cadastrado".to_string()),
            },
            Some(ClientViewAction::SendEmail) => {
                let email = state.client().email.clone();
                if email.trim().is_empty() {
                    state.set_error("Nenhum e-mail cadastrado".to_string());
                } else {
                    match launcher::open(&launcher::mailto_link(&email)) {
                        Ok(()) => state.set_info(format!("Escrevendo para {}...", email.trim())),
                        Err(err) => state.set_error(err.to_string()),
                    }
                }
            }
            Some(ClientViewAction::ConnectRemote(index)) => {
                let target = state
                    .remote_entries()
                    .get(index)
                    .map(|(vendor, entry)| (*vendor, entry.id.clone()));

                match target {
                    Some((RemoteVendor::TeamViewer, id)) => {
                        let result = launcher::open_with_fallback(
                            &launcher::teamviewer_link(&id),
                            &launcher::teamviewer_web_link(&id),
                        );
                        match result {
                            Ok(()) => {
                                state.set_info(format!("Conectando ao TeamViewer {}...", id));
                            }
                            Err(err) => state.set_error(err.to_string()),
                        }
                    }
                    Some((RemoteVendor::AnyDesk, id)) => {
                        let result = launcher::open_with_fallback(
                            &launcher::anydesk_link(&id),
                            &launcher::anydesk_web_link(),
                        );
                        match result {
                            Ok(()) => {
                                state.set_info(format!("Conectando ao AnyDesk {}...", id));
                            }
                            Err(err) => state.set_error(err.to_string()),
                        }
                    }
                    None => {}
                }
            }
            None => {}
        }
    }

    Ok(false)
}
