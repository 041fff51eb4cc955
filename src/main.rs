use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use serde::Serialize;
use tracing::info;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use studybuilder::config::Config;
use studybuilder::database::migrations::Migrator;
use studybuilder::database::{establish_connection, get_database_url, migrate_database, MigrateDirection};
use studybuilder::domain::kinds::{
    StudyActivityFields, StudyArmFields, StudyBranchArmFields, StudyCohortFields,
    StudyCompoundFields, StudyCriteriaFields, StudyElementFields, StudyEndpointFields,
    StudyObjectiveFields,
};
use studybuilder::domain::SelectionFields;
use studybuilder::repositories::SelectionFilter;
use studybuilder::services::{StudySelectionService, StudyService};

#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    #[clap(short, long, global = true)]
    log_level: Option<String>,
    /// TOML config file
    #[clap(short, long, global = true)]
    config: Option<PathBuf>,
    /// Database path or sqlite URL, overrides the config file
    #[clap(short, long, global = true)]
    database: Option<String>,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Db {
        #[clap(subcommand)]
        command: DbCommands,
    },
    Project {
        #[clap(subcommand)]
        command: ProjectCommands,
    },
    Study {
        #[clap(subcommand)]
        command: StudyCommands,
    },
    Selections {
        #[clap(subcommand)]
        command: SelectionCommands,
    },
}

#[derive(Subcommand, Debug)]
enum DbCommands {
    Init,
    Migrate {
        #[clap(subcommand)]
        direction: MigrateDirection,
    },
}

#[derive(Subcommand, Debug)]
enum ProjectCommands {
    Create {
        #[clap(long)]
        number: String,
        #[clap(long)]
        name: String,
    },
}

#[derive(Subcommand, Debug)]
enum StudyCommands {
    Create {
        #[clap(long)]
        project: String,
        #[clap(long)]
        number: Option<String>,
        #[clap(long)]
        acronym: Option<String>,
        #[clap(long)]
        author: String,
    },
    Lock {
        uid: String,
        #[clap(long)]
        author: String,
        #[clap(long)]
        description: String,
    },
    Unlock {
        uid: String,
        #[clap(long)]
        author: String,
    },
    Release {
        uid: String,
        #[clap(long)]
        author: String,
        #[clap(long)]
        description: String,
    },
    Show {
        uid: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SelectionKind {
    Objective,
    Endpoint,
    Compound,
    Criteria,
    Activity,
    Arm,
    BranchArm,
    Cohort,
    Element,
}

#[derive(Subcommand, Debug)]
enum SelectionCommands {
    /// Current selections of one study, or of every study when `--study` is omitted
    List {
        #[clap(long, value_enum)]
        kind: SelectionKind,
        #[clap(long)]
        study: Option<String>,
        /// Read a locked or released version instead of the current draft
        #[clap(long, requires = "study")]
        version: Option<String>,
        #[clap(long)]
        project_name: Option<String>,
        #[clap(long)]
        project_number: Option<String>,
    },
    History {
        #[clap(long, value_enum)]
        kind: SelectionKind,
        #[clap(long)]
        study: String,
        #[clap(long)]
        selection: Option<String>,
    },
    /// Append a selection; `fields` is the kind's field object as JSON
    Add {
        #[clap(long, value_enum)]
        kind: SelectionKind,
        #[clap(long)]
        study: String,
        #[clap(long)]
        fields: String,
        #[clap(long)]
        author: String,
    },
    Update {
        #[clap(long, value_enum)]
        kind: SelectionKind,
        #[clap(long)]
        study: String,
        #[clap(long)]
        selection: String,
        #[clap(long)]
        fields: String,
        #[clap(long)]
        author: String,
    },
    Remove {
        #[clap(long, value_enum)]
        kind: SelectionKind,
        #[clap(long)]
        study: String,
        #[clap(long)]
        selection: String,
        #[clap(long)]
        author: String,
    },
    Reorder {
        #[clap(long, value_enum)]
        kind: SelectionKind,
        #[clap(long)]
        study: String,
        #[clap(long)]
        selection: String,
        #[clap(long)]
        order: i32,
        #[clap(long)]
        author: String,
    },
    Accept {
        #[clap(long, value_enum)]
        kind: SelectionKind,
        #[clap(long)]
        study: String,
        #[clap(long)]
        selection: String,
        #[clap(long)]
        author: String,
    },
}

impl SelectionCommands {
    fn kind(&self) -> SelectionKind {
        match self {
            SelectionCommands::List { kind, .. }
            | SelectionCommands::History { kind, .. }
            | SelectionCommands::Add { kind, .. }
            | SelectionCommands::Update { kind, .. }
            | SelectionCommands::Remove { kind, .. }
            | SelectionCommands::Reorder { kind, .. }
            | SelectionCommands::Accept { kind, .. } => *kind,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(level) = args.log_level {
        config.log_level = level;
    }
    if let Some(database) = args.database {
        config.database_url = database;
    }
    setup_logging(&config.log_level);

    let database_url = get_database_url(Some(&config.database_url));

    match args.command {
        Commands::Db { command } => match command {
            DbCommands::Init => {
                info!("Initializing database: {}", database_url);
                migrate_database(&database_url, config.max_connections, MigrateDirection::Up)
                    .await?;
            }
            DbCommands::Migrate { direction } => {
                info!("Running database migration: {:?}", direction);
                migrate_database(&database_url, config.max_connections, direction).await?;
            }
        },
        Commands::Project { command } => {
            let db = connect(&database_url, &config).await?;
            let studies = StudyService::new(db);
            match command {
                ProjectCommands::Create { number, name } => {
                    print_json(&studies.create_project(&number, &name).await?)?;
                }
            }
        }
        Commands::Study { command } => {
            let db = connect(&database_url, &config).await?;
            let studies = StudyService::new(db);
            let study = match command {
                StudyCommands::Create {
                    project,
                    number,
                    acronym,
                    author,
                } => {
                    studies
                        .create_study(&project, number.as_deref(), acronym.as_deref(), &author)
                        .await?
                }
                StudyCommands::Lock {
                    uid,
                    author,
                    description,
                } => studies.lock_study(&uid, &author, &description).await?,
                StudyCommands::Unlock { uid, author } => studies.unlock_study(&uid, &author).await?,
                StudyCommands::Release {
                    uid,
                    author,
                    description,
                } => studies.release_study(&uid, &author, &description).await?,
                StudyCommands::Show { uid } => studies.get_study(&uid).await?,
            };
            print_json(&study)?;
        }
        Commands::Selections { command } => {
            let db = connect(&database_url, &config).await?;
            match command.kind() {
                SelectionKind::Objective => {
                    run_selection_command::<StudyObjectiveFields>(db, command).await?
                }
                SelectionKind::Endpoint => {
                    run_selection_command::<StudyEndpointFields>(db, command).await?
                }
                SelectionKind::Compound => {
                    run_selection_command::<StudyCompoundFields>(db, command).await?
                }
                SelectionKind::Criteria => {
                    run_selection_command::<StudyCriteriaFields>(db, command).await?
                }
                SelectionKind::Activity => {
                    run_selection_command::<StudyActivityFields>(db, command).await?
                }
                SelectionKind::Arm => run_selection_command::<StudyArmFields>(db, command).await?,
                SelectionKind::BranchArm => {
                    run_selection_command::<StudyBranchArmFields>(db, command).await?
                }
                SelectionKind::Cohort => {
                    run_selection_command::<StudyCohortFields>(db, command).await?
                }
                SelectionKind::Element => {
                    run_selection_command::<StudyElementFields>(db, command).await?
                }
            }
        }
    }

    Ok(())
}

async fn connect(database_url: &str, config: &Config) -> Result<DatabaseConnection> {
    let db = establish_connection(database_url, config.max_connections).await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}

async fn run_selection_command<F: SelectionFields>(
    db: DatabaseConnection,
    command: SelectionCommands,
) -> Result<()> {
    let service = StudySelectionService::<F>::new(db);

    match command {
        SelectionCommands::List {
            study: Some(study),
            version: Some(version),
            ..
        } => print_json(&service.get_selections_for_version(&study, &version).await?),
        SelectionCommands::List {
            study: Some(study), ..
        } => print_json(&service.get_selections(&study).await?),
        SelectionCommands::List {
            project_name,
            project_number,
            ..
        } => {
            let filter = SelectionFilter {
                project_name,
                project_number,
            };
            let lists: Vec<_> = service
                .get_all(&filter)
                .await?
                .into_iter()
                .map(|aggregate| aggregate.selections().to_vec())
                .collect();
            print_json(&lists)
        }
        SelectionCommands::History {
            study, selection, ..
        } => print_json(&service.get_history(&study, selection.as_deref()).await?),
        SelectionCommands::Add {
            study,
            fields,
            author,
            ..
        } => {
            let fields: F = serde_json::from_str(&fields)?;
            print_json(&service.add_selection(&study, fields, &author).await?)
        }
        SelectionCommands::Update {
            study,
            selection,
            fields,
            author,
            ..
        } => {
            let fields: F = serde_json::from_str(&fields)?;
            print_json(
                &service
                    .update_selection(&study, &selection, fields, &author)
                    .await?,
            )
        }
        SelectionCommands::Remove {
            study,
            selection,
            author,
            ..
        } => {
            service.remove_selection(&study, &selection, &author).await?;
            print_json(&service.get_selections(&study).await?)
        }
        SelectionCommands::Reorder {
            study,
            selection,
            order,
            author,
            ..
        } => {
            service
                .set_new_order(&study, &selection, order, &author)
                .await?;
            print_json(&service.get_selections(&study).await?)
        }
        SelectionCommands::Accept {
            study,
            selection,
            author,
            ..
        } => print_json(&service.accept_version(&study, &selection, &author).await?),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn setup_logging(log_level: &str) {
    let log_level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!("sqlx=warn,{}", log_level)))
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}
