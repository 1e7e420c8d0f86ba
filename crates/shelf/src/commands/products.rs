//! Product command handlers.

use tabled::Tabled;

use shelf_core::{ListStore, Product, Record};

use crate::cli::{GlobalOpts, ProductsArgs, ProductsCommand};
use crate::error::CliError;
use crate::output;

use super::{records, util};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ProductRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Nombre")]
    nombre: String,
    #[tabled(rename = "Precio")]
    precio: String,
    #[tabled(rename = "Imagen")]
    imagen: String,
}

impl From<&Record<Product>> for ProductRow {
    fn from(r: &Record<Product>) -> Self {
        Self {
            id: r.id.to_string(),
            nombre: r.fields.nombre.clone(),
            precio: format!("{:.2}", r.fields.precio),
            imagen: util::truncate(&r.fields.imagen, 40),
        }
    }
}

fn detail(r: &Record<Product>) -> String {
    output::detail_lines(&[
        ("ID", r.id.to_string()),
        ("Nombre", r.fields.nombre.clone()),
        ("Precio", format!("{:.2}", r.fields.precio)),
        ("Imagen", r.fields.imagen.clone()),
    ])
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    store: &ListStore<Product>,
    args: ProductsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ProductsCommand::List => records::list(store, global, |r| ProductRow::from(r)).await,

        ProductsCommand::Get { id } => records::get(store, &id, global, detail).await,

        ProductsCommand::Add {
            nombre,
            precio,
            imagen,
        } => records::add(store, Product::new(nombre, precio, imagen), global, detail).await,

        ProductsCommand::Edit {
            id,
            nombre,
            precio,
            imagen,
        } => {
            util::require_change(
                nombre.is_some() || precio.is_some() || imagen.is_some(),
                "--nombre, --precio, --imagen",
            )?;
            let patch = |product: &mut Product| {
                if let Some(nombre) = nombre {
                    product.nombre = nombre;
                }
                if let Some(precio) = precio {
                    product.precio = precio;
                }
                if let Some(imagen) = imagen {
                    product.imagen = imagen;
                }
            };
            records::edit(store, &id, patch, global, detail).await
        }

        ProductsCommand::Rm { id } => records::remove(store, &id, global).await,
    }
}
