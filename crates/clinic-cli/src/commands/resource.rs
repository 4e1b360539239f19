use std::fs;
use std::io::{self, Read};
use std::sync::Arc;

use anyhow::{Context, Result};
use clinic_client::session::store;
use clinic_client::{ActiveQuery, ApiClient, ResourceStore, StoreOptions};
use clinic_core::{
    Appointment, ClinicService, Episode, EpisodeTemplate, OperationResult, Pagination, Patient,
    Resource, ResourceKind, Role, Staff,
};

use crate::cli::{ListArgs, OutputFormat, ResourceAction};
use crate::output::{print_count, print_page, print_result, print_value};

/// Everything a resource command needs besides its arguments.
pub struct CommandContext {
    pub client: Arc<ApiClient>,
    pub page_size: u32,
    pub format: OutputFormat,
}

/// Run `action` against the store for `kind`. Returns the operation's result
/// so the caller can pick the exit code.
pub async fn run(
    ctx: &CommandContext,
    kind: ResourceKind,
    action: &ResourceAction,
) -> Result<OperationResult> {
    match kind {
        ResourceKind::Patient => run_for::<Patient>(ctx, action).await,
        ResourceKind::Staff => run_for::<Staff>(ctx, action).await,
        ResourceKind::Role => run_for::<Role>(ctx, action).await,
        ResourceKind::Episode => run_for::<Episode>(ctx, action).await,
        ResourceKind::EpisodeTemplate => run_for::<EpisodeTemplate>(ctx, action).await,
        ResourceKind::Appointment => run_for::<Appointment>(ctx, action).await,
        ResourceKind::Service => run_for::<ClinicService>(ctx, action).await,
    }
}

async fn run_for<R: Resource>(
    ctx: &CommandContext,
    action: &ResourceAction,
) -> Result<OperationResult> {
    let page_size = match action {
        ResourceAction::List(args) => args.size.unwrap_or(ctx.page_size),
        _ => ctx.page_size,
    };
    let store: ResourceStore<R> = store(
        &ctx.client,
        StoreOptions {
            pagination: Pagination::new(page_size)?,
            ..StoreOptions::default()
        },
    );
    let collection = R::KIND.collection();

    let result = match action {
        ResourceAction::List(args) => return list(ctx, &store, args).await,
        ResourceAction::Get(args) => {
            let record = store
                .fetch_by_id(&args.id)
                .await
                .with_context(|| format!("Failed to fetch {collection}/{}", args.id))?;
            print_value(&serde_json::to_value(&record)?, ctx.format);
            return Ok(OperationResult::success(
                format!("Fetched {collection}/{}", args.id),
                200,
            ));
        }
        ResourceAction::Create(args) => {
            let input: R = read_record(&args.file)?;
            store.create(&input).await
        }
        ResourceAction::Update(args) => {
            let input: R = read_record(&args.file)?;
            store.update(&args.id, &input).await
        }
        ResourceAction::Enable(args) => store.enable(&args.id).await,
        ResourceAction::Disable(args) => store.disable(&args.id).await,
        ResourceAction::Delete(args) => store.remove(&args.id).await,
        ResourceAction::Count => {
            let result = store.fetch_count().await;
            if let Some(count) = store.count() {
                print_count(&count, ctx.format);
            }
            result
        }
    };

    print_result(&result);
    Ok(result)
}

async fn list<R: Resource>(
    ctx: &CommandContext,
    store: &ResourceStore<R>,
    args: &ListArgs,
) -> Result<OperationResult> {
    let query = if args.active {
        ActiveQuery::Active
    } else {
        ActiveQuery::search(args.search.as_deref().unwrap_or_default())
    };
    let result = store.load(query, args.page).await;
    if result.is_error() {
        print_result(&result);
        return Ok(result);
    }

    let records = match &args.filter {
        Some(text) => store.filtered(text),
        None => store.items(),
    };
    print_value(&serde_json::to_value(&records)?, ctx.format);
    print_page(&store.pagination());
    Ok(result)
}

fn read_record<R: Resource>(file: &Option<String>) -> Result<R> {
    let content = match file {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))?
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            buf
        }
    };
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid {} JSON", R::KIND.as_str()))
}
