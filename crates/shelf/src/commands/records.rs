//! Handlers shared by the resource commands.
//!
//! Each resource module supplies its table row and detail view; the
//! store calls, rendering and confirmation flow live here.

use tabled::Tabled;

use shelf_core::{Backend, Fields, ListStore, Record, RecordId};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn list<F, R>(
    store: &ListStore<F>,
    global: &GlobalOpts,
    to_row: impl Fn(&Record<F>) -> R,
) -> Result<(), CliError>
where
    F: Fields,
    R: Tabled,
{
    let records = store.fetch_all().await?;
    let out = output::render_list(&global.output(), &records, to_row, |r| r.id.to_string())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn get<F: Fields>(
    store: &ListStore<F>,
    id: &str,
    global: &GlobalOpts,
    detail: impl Fn(&Record<F>) -> String,
) -> Result<(), CliError> {
    let record = store.get(&RecordId::from(id)).await?;
    show(&record, global, detail)
}

pub async fn add<F: Fields>(
    store: &ListStore<F>,
    fields: F,
    global: &GlobalOpts,
    detail: impl Fn(&Record<F>) -> String,
) -> Result<(), CliError> {
    let record = store.create(&fields).await?;
    output::success(
        global,
        &format!(
            "Created {} record {} ({})",
            store.backend().resource(),
            record.id,
            record.fields.label()
        ),
    );
    show(&record, global, detail)
}

/// Read the current record, apply `patch`, and write every field back.
pub async fn edit<F: Fields>(
    store: &ListStore<F>,
    id: &str,
    patch: impl FnOnce(&mut F),
    global: &GlobalOpts,
    detail: impl Fn(&Record<F>) -> String,
) -> Result<(), CliError> {
    let id = RecordId::from(id);
    let mut fields = store.get(&id).await?.fields;
    patch(&mut fields);

    let record = store.update(&id, &fields).await?;
    output::success(
        global,
        &format!(
            "Updated {} record {} ({})",
            store.backend().resource(),
            record.id,
            record.fields.label()
        ),
    );
    show(&record, global, detail)
}

pub async fn remove<F: Fields>(
    store: &ListStore<F>,
    id: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let id = RecordId::from(id);
    let resource = store.backend().resource().to_owned();

    if !global.yes {
        let record = store.get(&id).await?;
        let prompt = format!("Delete {resource} record {id} ({})?", record.fields.label());
        if !util::confirm(&prompt, &format!("{resource} rm"), false)? {
            return Ok(());
        }
    }

    store.delete(&id).await?;
    output::success(global, &format!("Deleted {resource} record {id}"));
    Ok(())
}

fn show<F: Fields>(
    record: &Record<F>,
    global: &GlobalOpts,
    detail: impl Fn(&Record<F>) -> String,
) -> Result<(), CliError> {
    let out = output::render_single(&global.output(), record, detail, |r| r.id.to_string())?;
    output::print_output(&out, global.quiet);
    Ok(())
}
