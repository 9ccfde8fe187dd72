//! Operator CLI for the course catalog.
//!
//! Every command prints its result as JSON on stdout; logs go to stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use sqlx::PgPool;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use academy_catalog::config::{CatalogConfig, LogFormat};
use academy_catalog::{CategoryService, CourseService, EnrollmentService, SearchService};
use academy_core::roles::{ActorContext, Role};
use academy_core::search::CourseSort;
use academy_core::types::DbId;
use academy_db::models::course::AdminCourseFilter;
use academy_db::repositories::UserRepo;

#[derive(Parser)]
#[command(name = "academy-catalog")]
#[command(about = "Course catalog maintenance and inspection")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,

    /// Print the category tree (or the flat admin table with --flat)
    Categories {
        #[arg(long)]
        flat: bool,
    },

    /// Full-text search over visible courses
    Search {
        keyword: String,
        /// rating | price | newest | bestseller
        #[arg(long)]
        sort: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: i64,
        #[arg(long)]
        limit: Option<i64>,
    },

    /// List the visible courses of a category and its children
    CategoryCourses {
        category_id: DbId,
        #[arg(long)]
        sort: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: i64,
        #[arg(long)]
        limit: Option<i64>,
    },

    /// Admin course listing
    AdminCourses {
        /// Acting admin user id
        #[arg(long = "as-user", env = "ACADEMY_ADMIN_USER_ID")]
        as_user: DbId,
        #[arg(long)]
        keyword: Option<String>,
        #[arg(long)]
        category_id: Option<DbId>,
        #[arg(long)]
        instructor_id: Option<DbId>,
        #[arg(long)]
        exclude_removed: bool,
        #[arg(long)]
        limit: Option<i64>,
        #[arg(long)]
        offset: Option<i64>,
    },

    /// A learner's enrolled courses with completion percentages
    Progress { user_id: DbId },

    /// Delete a category that has neither children nor courses
    DeleteCategory {
        id: DbId,
        /// Acting admin user id
        #[arg(long = "as-user", env = "ACADEMY_ADMIN_USER_ID")]
        as_user: DbId,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // --- Configuration ---
    let config = CatalogConfig::from_env().context("Invalid configuration")?;

    // --- Tracing ---
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "academy_catalog=info,academy_db=info".into());
    let registry = tracing_subscriber::registry().with(filter);
    match config.log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }

    // --- Database ---
    let pool = academy_db::create_pool(&config.database_url, config.db_max_connections)
        .await
        .context("Failed to connect to database")?;
    academy_db::health_check(&pool)
        .await
        .context("Database health check failed")?;
    tracing::debug!(max_connections = config.db_max_connections, "Database pool ready");

    let limit = |requested: Option<i64>| Some(requested.unwrap_or(config.default_page_size));

    match cli.command {
        Commands::Migrate => {
            academy_db::run_migrations(&pool)
                .await
                .context("Failed to run database migrations")?;
            tracing::info!("Database migrations applied");
            print_json(&serde_json::json!({ "success": true }))?;
        }
        Commands::Categories { flat } => {
            if flat {
                print_json(&CategoryService::list_with_parent(&pool).await?)?;
            } else {
                print_json(&CategoryService::build_tree(&pool).await?)?;
            }
        }
        Commands::Search {
            keyword,
            sort,
            page,
            limit: requested,
        } => {
            let sort = CourseSort::parse_lenient(sort.as_deref());
            let result =
                SearchService::search_page(&pool, &keyword, sort, page, limit(requested)).await?;
            print_json(&result)?;
        }
        Commands::CategoryCourses {
            category_id,
            sort,
            page,
            limit: requested,
        } => {
            let sort = CourseSort::parse_lenient(sort.as_deref());
            let result =
                SearchService::list_by_category(&pool, category_id, sort, page, limit(requested))
                    .await?;
            print_json(&result)?;
        }
        Commands::AdminCourses {
            as_user,
            keyword,
            category_id,
            instructor_id,
            exclude_removed,
            limit: requested,
            offset,
        } => {
            let actor = load_actor(&pool, as_user).await?;
            let filter = AdminCourseFilter {
                keyword,
                category_id,
                instructor_id,
                include_removed: Some(!exclude_removed),
            };
            let listing =
                CourseService::list_admin(&pool, &actor, &filter, limit(requested), offset).await?;
            print_json(&listing)?;
        }
        Commands::Progress { user_id } => {
            print_json(&EnrollmentService::my_courses_with_progress(&pool, user_id).await?)?;
        }
        Commands::DeleteCategory { id, as_user } => {
            let actor = load_actor(&pool, as_user).await?;
            match CategoryService::safe_delete(&pool, &actor, id).await {
                Ok(()) => print_json(&serde_json::json!({ "success": true, "id": id }))?,
                Err(err) => print_json(&serde_json::json!({
                    "success": false,
                    "code": err.code(),
                    "error": err.to_string(),
                }))?,
            }
        }
    }

    Ok(())
}

/// Build the actor context for a stored user.
async fn load_actor(pool: &PgPool, user_id: DbId) -> Result<ActorContext> {
    let user = UserRepo::find_by_id(pool, user_id)
        .await?
        .with_context(|| format!("User {user_id} not found"))?;
    let role = Role::from_str_value(&user.role)?;
    Ok(ActorContext::new(user.id, role))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
