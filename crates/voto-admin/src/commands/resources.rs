//! List, show, delete and form submission shared by every resource

use anyhow::Result;
use std::iter;
use tracing::info;

use voto_client::{
    EntityEditor, Form, FormController, FormOutcome, ListPage, ListQuery, LoadState, Resource,
    Table,
};

use super::{AdminContext, confirm, rejected};
use crate::cli::CommonAction;

pub async fn handle_common_action<R: Resource>(
    ctx: &AdminContext,
    action: CommonAction,
) -> Result<()> {
    match action {
        CommonAction::List {
            search,
            page,
            limit,
        } => list::<R>(ctx, &search, page, limit).await,
        CommonAction::Show { id } => show::<R>(ctx, id).await,
        CommonAction::Delete { id, yes } => delete::<R>(ctx, id, yes).await,
    }
}

async fn list<R: Resource>(
    ctx: &AdminContext,
    search: &str,
    page: Option<u32>,
    limit: Option<u32>,
) -> Result<()> {
    let list = ListPage::<R>::new(ctx.resource(), ctx.notifier());
    list.set_query(ListQuery {
        search: None,
        page,
        limit,
    });

    if list.load().await == LoadState::Loaded {
        print!("{}", list.table(search));
        if let (Some(page), Some(limit)) = (page, limit) {
            println!("Página {} ({} por página)", page, limit);
        }
    }
    Ok(())
}

/// Entity behind an edit route; `None` after an error notification
pub async fn load<R: Resource>(ctx: &AdminContext, id: u64) -> Option<R::Entity> {
    EntityEditor::<R>::new(ctx.resource(), ctx.notifier(), ctx.session.clone())
        .load(id)
        .await
}

async fn show<R: Resource>(ctx: &AdminContext, id: u64) -> Result<()> {
    if let Some(entity) = load::<R>(ctx, id).await {
        print!(
            "{}",
            Table::from_items(iter::once(&entity), R::KIND.empty_message())
        );
    }
    Ok(())
}

async fn delete<R: Resource>(ctx: &AdminContext, id: u64, yes: bool) -> Result<()> {
    // Fetched by id so entities past the first page of the list can be removed
    let Some(entity) = load::<R>(ctx, id).await else {
        return Ok(());
    };
    let list = ListPage::<R>::new(ctx.resource(), ctx.notifier());
    let dialog = list.delete_dialog(&entity);

    if !yes && !confirm(&dialog.message)? {
        list.cancel_delete(dialog);
        println!("Remoção cancelada.");
        return Ok(());
    }

    if list.confirm_delete(dialog).await {
        info!("{} {} deleted", R::KIND.singular(), id);
        print!("{}", list.table(""));
    }
    Ok(())
}

/// Validate `input` and create (no `id`) or update the entity
pub async fn submit<F, R>(
    ctx: &AdminContext,
    form: &FormController<F>,
    input: &F::Input,
    id: Option<u64>,
) -> Result<()>
where
    F: Form<Output = R::Draft>,
    R: Resource,
{
    let editor = EntityEditor::<R>::new(ctx.resource(), ctx.notifier(), ctx.session.clone());
    let editor = &editor;

    let outcome = form
        .submit(input, move |draft| async move {
            match id {
                Some(id) => editor.update(id, draft).await,
                None => editor.create(draft).await,
            }
        })
        .await;

    match outcome {
        FormOutcome::Submitted(Some(entity)) => {
            print!(
                "{}",
                Table::from_items(iter::once(&entity), R::KIND.empty_message())
            );
            Ok(())
        }
        FormOutcome::Submitted(None) | FormOutcome::Cancelled => Ok(()),
        FormOutcome::Invalid(errors) => Err(rejected(&errors)),
    }
}
