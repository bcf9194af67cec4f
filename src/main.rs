//! Tutor Chat - terminal front end
//!
//! Lists modules, opens one, and relays learner input to the tutor.
//! Lines starting with `/` are commands; everything else is sent as a
//! message to the active conversation.

use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tutor_chat::auth::{AuthStatus, TokenAuthGate};
use tutor_chat::catalog::{find_module, load_modules, HttpModuleCatalog, ModuleInfo};
use tutor_chat::chat::{ChatController, ChatError, SubmitOutcome};
use tutor_chat::config::ClientConfig;
use tutor_chat::conversation::{ConversationId, Message};
use tutor_chat::export::{write_transcript, ExportFormat};
use tutor_chat::session::SessionManager;
use tutor_chat::tutor::{HttpTutorClient, LoggingTutor};

type Tutor = Arc<LoggingTutor<HttpTutorClient>>;

const HELP: &str = "\
Commands:
  /modules           list modules
  /open <id>         open a module
  /new               start a new conversation
  /threads           list conversations in this module
  /switch <n>        make conversation n active
  /rename <title>    rename the active conversation
  /export [txt]      write the active conversation to a file
  /help              show this help
  /quit              exit";

/// A parsed input line
enum Command<'a> {
    Help,
    Modules,
    Open(&'a str),
    New,
    Threads,
    Switch(&'a str),
    Rename(&'a str),
    Export(&'a str),
    Quit,
    Unknown(&'a str),
    Say(&'a str),
}

impl<'a> Command<'a> {
    fn parse(line: &'a str) -> Self {
        let Some(rest) = line.trim_start().strip_prefix('/') else {
            return Command::Say(line);
        };
        let (name, arg) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
        let arg = arg.trim();
        match name {
            "help" | "?" => Command::Help,
            "modules" => Command::Modules,
            "open" => Command::Open(arg),
            "new" => Command::New,
            "threads" => Command::Threads,
            "switch" => Command::Switch(arg),
            "rename" => Command::Rename(arg),
            "export" => Command::Export(arg),
            "quit" | "exit" => Command::Quit,
            other => Command::Unknown(other),
        }
    }
}

struct App {
    config: ClientConfig,
    auth: Arc<TokenAuthGate>,
    modules: Vec<ModuleInfo>,
    sessions: SessionManager,
    tutor: Tutor,
    controller: Option<ChatController<Tutor>>,
}

impl App {
    fn open(&mut self, id: &str) {
        let Some(module) = find_module(&self.modules, id).cloned() else {
            println!("No module with id {id}. Try /modules.");
            return;
        };
        let session = self.sessions.on_module_opened(&module);
        self.controller = Some(ChatController::new(
            session.module_id().clone(),
            session.store(),
            Arc::clone(&self.tutor),
        ));
        println!("\n== {} ==", module.display_name());
    }

    async fn print_active(&self) {
        let Some(controller) = &self.controller else {
            return;
        };
        let store = controller.store().lock().await;
        for message in store.get_active().messages() {
            print_message(message);
        }
    }

    async fn handle(&mut self, line: &str) -> Result<bool, Box<dyn std::error::Error>> {
        let command = match Command::parse(line) {
            Command::Quit => return Ok(false),
            Command::Help => {
                println!("{HELP}");
                return Ok(true);
            }
            Command::Modules => {
                print_modules(&self.modules);
                return Ok(true);
            }
            Command::Unknown(name) => {
                println!("Unknown command /{name}. Try /help.");
                return Ok(true);
            }
            Command::Open(id) => {
                self.open(id);
                self.print_active().await;
                return Ok(true);
            }
            command => command,
        };

        let Some(controller) = &self.controller else {
            println!("Open a module first with /open <id>.");
            return Ok(true);
        };
        match command {
            Command::New => {
                let conversation = controller.store().lock().await.create_conversation();
                println!("-- conversation {} --", conversation.id());
                conversation.messages().iter().for_each(print_message);
            }
            Command::Threads => {
                for row in controller.store().lock().await.list() {
                    println!(
                        "{} {:>3}  {}  ({} messages{})",
                        if row.active { '*' } else { ' ' },
                        row.id,
                        row.title,
                        row.message_count,
                        if row.state.is_working() { ", waiting for tutor" } else { "" }
                    );
                }
            }
            Command::Switch(arg) => {
                let mut store = controller.store().lock().await;
                let target = store
                    .list()
                    .into_iter()
                    .find(|row| row.id.to_string() == arg)
                    .map(|row| row.id);
                match target {
                    Some(id) => {
                        store.set_active(id)?;
                        println!("-- conversation {id} --");
                        store.get_active().messages().iter().for_each(print_message);
                    }
                    None => println!("No conversation {arg}. Try /threads."),
                }
            }
            Command::Rename(title) => {
                let mut store = controller.store().lock().await;
                let id = store.active_id();
                match store.rename(id, title) {
                    Ok(()) => println!("Renamed conversation {id}."),
                    Err(e) => println!("{e}"),
                }
            }
            Command::Export(format) => {
                self.export(controller, format).await;
            }
            Command::Say(text) => self.say(text).await,
            // Handled before a module is required
            Command::Quit
            | Command::Help
            | Command::Modules
            | Command::Unknown(_)
            | Command::Open(_) => {}
        }
        Ok(true)
    }

    /// Write the active thread to the export directory. Failures are reported
    /// and the session carries on.
    async fn export(&self, controller: &ChatController<Tutor>, format: &str) -> Option<PathBuf> {
        let format = match format.parse::<ExportFormat>() {
            Ok(format) => format,
            Err(e) => {
                println!("{e}");
                return None;
            }
        };
        let store = controller.store().lock().await;
        match write_transcript(&self.config.export_dir, store.module(), store.get_active(), format) {
            Ok(path) => {
                println!("Saved {}", path.display());
                Some(path)
            }
            Err(e) => {
                tracing::warn!(dir = %self.config.export_dir.display(), error = %e, "Export failed");
                println!("{e}");
                None
            }
        }
    }

    async fn say(&self, text: &str) {
        let Some(controller) = &self.controller else {
            return;
        };
        let target = match controller.submit(text).await {
            Ok(SubmitOutcome::Ignored) => return,
            Ok(
                SubmitOutcome::Replied { conversation_id }
                | SubmitOutcome::FellBack {
                    conversation_id, ..
                },
            ) => conversation_id,
            Err(ChatError::Busy(id)) => {
                println!("Conversation {id} is still waiting for the tutor.");
                return;
            }
            Err(e) => {
                tracing::error!(error = %e, "Submission failed");
                return;
            }
        };
        print_latest(controller, target).await;

        if self.auth.status().await == AuthStatus::Expired {
            println!("(Your session has expired. Set TUTOR_API_TOKEN and restart to sign in again.)");
        }
    }
}

async fn print_latest(controller: &ChatController<Tutor>, id: ConversationId) {
    let store = controller.store().lock().await;
    if let Some(message) = store.get(id).ok().and_then(|c| c.messages().last()) {
        print_message(message);
    }
}

fn print_message(message: &Message) {
    println!("\n{}: {}", message.role().as_str().to_uppercase(), message.content());
}

fn print_modules(modules: &[ModuleInfo]) {
    for module in modules {
        if module.description.is_empty() {
            println!("{:>4}  {}", module.id, module.display_name());
        } else {
            println!(
                "{:>4}  {} - {}",
                module.id,
                module.display_name(),
                module.description
            );
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so the transcript on stdout stays readable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tutor_chat=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ClientConfig::from_env();
    tracing::info!(api_url = %config.api_url, timeout = ?config.timeout, "Starting tutor chat");

    let auth = Arc::new(TokenAuthGate::new(config.api_token.clone()));
    let catalog = HttpModuleCatalog::new(&config.api_url, config.timeout, auth.clone())?;
    let modules = load_modules(&catalog).await;
    let tutor = Arc::new(LoggingTutor::new(HttpTutorClient::new(
        &config.api_url,
        config.timeout,
        auth.clone(),
    )?));

    let mut app = App {
        config,
        auth,
        modules,
        sessions: SessionManager::new(),
        tutor,
        controller: None,
    };

    print_modules(&app.modules);
    match std::env::args().nth(1) {
        Some(id) => {
            app.open(&id);
            app.print_active().await;
        }
        None => println!("\nOpen a module with /open <id>, or /help for commands."),
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if !app.handle(&line).await? {
            break;
        }
    }

    if let Some(module) = app.sessions.on_module_closed() {
        tracing::debug!(module_id = %module.id, "Session ended");
    }
    Ok(())
}
