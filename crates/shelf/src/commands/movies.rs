//! Movie command handlers.

use tabled::Tabled;

use shelf_core::{ListStore, Movie, Record};

use crate::cli::{GlobalOpts, MoviesArgs, MoviesCommand};
use crate::error::CliError;
use crate::output;

use super::{records, util};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct MovieRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Nombre")]
    nombre: String,
    #[tabled(rename = "Sinopsis")]
    sinopsis: String,
    #[tabled(rename = "URL")]
    url: String,
}

impl From<&Record<Movie>> for MovieRow {
    fn from(r: &Record<Movie>) -> Self {
        Self {
            id: r.id.to_string(),
            nombre: r.fields.nombre.clone(),
            sinopsis: util::truncate(&r.fields.sinopsis, 48),
            url: util::truncate(&r.fields.url, 40),
        }
    }
}

fn detail(r: &Record<Movie>) -> String {
    output::detail_lines(&[
        ("ID", r.id.to_string()),
        ("Nombre", r.fields.nombre.clone()),
        ("URL", r.fields.url.clone()),
        ("Sinopsis", r.fields.sinopsis.clone()),
    ])
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    store: &ListStore<Movie>,
    args: MoviesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        MoviesCommand::List => records::list(store, global, |r| MovieRow::from(r)).await,

        MoviesCommand::Get { id } => records::get(store, &id, global, detail).await,

        MoviesCommand::Add {
            nombre,
            url,
            sinopsis,
        } => records::add(store, Movie::new(nombre, url, sinopsis), global, detail).await,

        MoviesCommand::Edit {
            id,
            nombre,
            url,
            sinopsis,
        } => {
            util::require_change(
                nombre.is_some() || url.is_some() || sinopsis.is_some(),
                "--nombre, --url, --sinopsis",
            )?;
            let patch = |movie: &mut Movie| {
                if let Some(nombre) = nombre {
                    movie.nombre = nombre;
                }
                if let Some(url) = url {
                    movie.url = url;
                }
                if let Some(sinopsis) = sinopsis {
                    movie.sinopsis = sinopsis;
                }
            };
            records::edit(store, &id, patch, global, detail).await
        }

        MoviesCommand::Rm { id } => records::remove(store, &id, global).await,
    }
}
