//! Command-line surface and dispatch.

use crate::console::ConsolePrompter;
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use savedlists_core::db::open_db;
use savedlists_core::{
    default_log_level, init_logging, ListId, ListPicker, ListService, SelectListRequest,
    SqliteListStore, STANDARD_LIST_ID,
};
use std::io;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "savedlists")]
#[command(version, about = "Manage saved lists")]
#[command(propagate_version = true)]
pub struct Cli {
    /// SQLite database file
    #[arg(long, env = "SAVEDLISTS_DB", global = true, default_value = "savedlists.sqlite3")]
    pub db: PathBuf,

    /// Directory for rotating log files; logging is off when omitted
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long, env = "SAVEDLISTS_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show all lists in display order
    Lists {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Pick a list interactively and print its id
    Pick {
        /// Prompt title
        #[arg(long, default_value = "Select a list")]
        prompt: String,

        /// Hide the "all lists" option
        #[arg(long)]
        only_concrete: bool,

        /// List id to leave out of the choices
        #[arg(long)]
        except: Option<ListId>,

        /// Pre-filled name when creating a new list
        #[arg(long, default_value = "")]
        new_name: String,
    },

    /// Create a list
    Create {
        /// List title
        name: String,
    },

    /// Rename a list interactively
    Rename {
        /// List id
        id: ListId,
    },

    /// Delete a list; its items move to the standard list
    Delete {
        /// List id
        id: ListId,
    },

    /// Save an item into a list
    Save {
        /// Item key
        item: String,

        /// Target list id; pseudo-lists resolve to the standard list
        #[arg(long, default_value_t = STANDARD_LIST_ID)]
        list: ListId,
    },

    /// Show the item keys stored in a list
    Items {
        /// List id
        id: ListId,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        start_logging(level, log_dir)?;
    }

    let conn = open_db(&cli.db)
        .with_context(|| format!("failed to open list database `{}`", cli.db.display()))?;
    let store = SqliteListStore::try_new(&conn)?;

    match cli.command {
        Commands::Lists { json } => {
            let lists = ListService::new(&store).sorted_lists()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&lists)?);
            } else {
                for list in &lists {
                    println!("{}\t{}", list.id, list.title_and_count());
                }
            }
        }
        Commands::Pick {
            prompt,
            only_concrete,
            except,
            new_name,
        } => {
            let mut request = SelectListRequest::new(prompt).new_list_name(new_name);
            if only_concrete {
                request = request.only_concrete_lists();
            }
            if let Some(except) = except {
                request = request.except_list(except);
            }

            let mut selected = None;
            let mut picker = ListPicker::new(&store, console_prompter());
            picker.select_list(&request, |list_id| selected = Some(list_id));
            match selected {
                Some(list_id) => println!("{list_id}"),
                None => eprintln!("No list selected."),
            }
        }
        Commands::Create { name } => {
            let list = ListService::new(&store).create_list(name)?;
            println!("{}\t{}", list.id, list.title_and_count());
        }
        Commands::Rename { id } => {
            let mut renamed = false;
            let mut picker = ListPicker::new(&store, console_prompter());
            picker.rename_list(id, || renamed = true);
            if !renamed {
                return Err(anyhow!("list {id} was not renamed"));
            }
            let list = ListService::new(&store).get_list(id)?;
            println!("{}\t{}", list.id, list.title_and_count());
        }
        Commands::Delete { id } => {
            ListService::new(&store).delete_list(id)?;
            println!("Deleted list {id}.");
        }
        Commands::Save { item, list } => {
            let stored_in = ListService::new(&store).save_item(item, list)?;
            println!("{stored_in}");
        }
        Commands::Items { id } => {
            for item in ListService::new(&store).items_in_list(id)? {
                println!("{item}");
            }
        }
    }

    Ok(())
}

fn console_prompter() -> ConsolePrompter<io::StdinLock<'static>, io::Stderr> {
    ConsolePrompter::new(io::stdin().lock(), io::stderr())
}

fn start_logging(level: &str, log_dir: &Path) -> Result<()> {
    let log_dir = if log_dir.is_absolute() {
        log_dir.to_path_buf()
    } else {
        std::env::current_dir()?.join(log_dir)
    };
    let log_dir = log_dir
        .to_str()
        .ok_or_else(|| anyhow!("log directory must be valid UTF-8"))?;
    init_logging(level, log_dir).map_err(|message| anyhow!(message))
}
