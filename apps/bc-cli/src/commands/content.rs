// content.rs - Trek and expedition subcommands: list, check, can, set-status.
//
// The same subcommands serve both kinds; `execute` is generic over the
// record type and the caller picks `Trek` or `Expedition`.

use bc_api::{LifecycleService, ListQuery, ResourceApi, TransitionOutcome};
use bc_content::{EntityId, Lifecycle, Publishable};
use clap::Subcommand;

use super::{print_json, truncate};

#[derive(Subcommand)]
pub enum ContentCommands {
    /// List records, newest first.
    List {
        /// Filter by status (e.g., "draft", "published").
        #[arg(long)]
        status: Option<String>,
        /// Case-insensitive name search.
        #[arg(long)]
        search: Option<String>,
        #[arg(long, default_value_t = 0)]
        skip: u32,
        /// Page size (defaults to the configured page size).
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Show the publish-readiness checklist for a record.
    Check {
        id: EntityId,
    },
    /// Ask whether one status may follow another. Table lookup only.
    Can {
        current: String,
        target: String,
    },
    /// Move a record to a new status.
    SetStatus {
        id: EntityId,
        /// Target status (e.g., "published", "archived").
        target: String,
    },
}

pub async fn execute<E, A>(
    cmd: &ContentCommands,
    service: &LifecycleService<A>,
    page_size: u32,
    json: bool,
) -> anyhow::Result<()>
where
    E: Publishable,
    A: ResourceApi<E>,
{
    match cmd {
        ContentCommands::List {
            status,
            search,
            skip,
            limit,
        } => {
            let mut query = ListQuery::default().page(*skip, limit.unwrap_or(page_size));
            query.status = status.clone();
            query.search = search.clone();
            list::<E, A>(service, &query, json).await
        }
        ContentCommands::Check { id } => check::<E, A>(service, *id, json).await,
        ContentCommands::Can { current, target } => {
            let check = service.check(E::KIND, current, target);
            if json {
                return print_json(&check);
            }
            if check.allowed {
                println!("{}: {} -> {} is allowed.", E::KIND, current, target);
            } else {
                println!("{}: {} -> {} is not allowed.", E::KIND, current, target);
                println!("Valid statuses: {}", E::KIND.statuses().join(", "));
            }
            Ok(())
        }
        ContentCommands::SetStatus { id, target } => {
            set_status::<E, A>(service, *id, target, json).await
        }
    }
}

async fn list<E, A>(
    service: &LifecycleService<A>,
    query: &ListQuery,
    json: bool,
) -> anyhow::Result<()>
where
    E: Publishable,
    A: ResourceApi<E>,
{
    let page = ResourceApi::<E>::list(service.api(), query).await?;
    if json {
        return print_json(&page);
    }

    if page.items.is_empty() {
        println!("No {} found.", E::KIND.collection());
        return Ok(());
    }

    println!("{:<8} {:<40} {:<12}", "ID", "NAME", "STATUS");
    println!("{}", "-".repeat(62));
    for item in &page.items {
        println!(
            "{:<8} {:<40} {:<12}",
            item.id(),
            truncate(item.name(), 38),
            item.status().as_str(),
        );
    }
    println!(
        "\nShowing {} of {} {}.",
        page.items.len(),
        page.total,
        E::KIND.collection()
    );

    Ok(())
}

async fn check<E, A>(service: &LifecycleService<A>, id: EntityId, json: bool) -> anyhow::Result<()>
where
    E: Publishable,
    A: ResourceApi<E>,
{
    let report = service.readiness::<E>(id).await?;
    if json {
        return print_json(&report);
    }

    if report.can_publish {
        println!("{} {} is ready to publish.", E::KIND.label(), id);
    } else {
        println!("{} {} cannot be published yet:", E::KIND.label(), id);
        for reason in &report.reasons {
            println!("  - {}", reason);
        }
    }
    Ok(())
}

async fn set_status<E, A>(
    service: &LifecycleService<A>,
    id: EntityId,
    target: &str,
    json: bool,
) -> anyhow::Result<()>
where
    E: Publishable,
    A: ResourceApi<E>,
{
    let target: E::Status = target.parse()?;

    match service.transition::<E>(id, target).await? {
        TransitionOutcome::Applied { entity, from } => {
            if json {
                return print_json(&entity);
            }
            println!(
                "{} {} ({}): {} -> {}",
                E::KIND.label(),
                id,
                entity.name(),
                from,
                entity.status()
            );
            Ok(())
        }
        TransitionOutcome::Rejected(verdict) => {
            if json {
                print_json(&verdict)?;
            } else {
                println!("Status change rejected:");
                for reason in &verdict.reasons {
                    println!("  - {}", reason);
                }
            }
            anyhow::bail!(
                "{} {} was not moved from {} to {}",
                E::KIND.label(),
                id,
                verdict.from,
                verdict.to
            )
        }
    }
}
