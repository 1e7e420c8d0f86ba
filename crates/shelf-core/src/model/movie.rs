use serde::{Deserialize, Serialize};

use super::record::Fields;

/// A film in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    /// Title.
    pub nombre: String,
    /// Poster image URL.
    pub url: String,
    /// Synopsis.
    pub sinopsis: String,
}

impl Movie {
    pub fn new(
        nombre: impl Into<String>,
        url: impl Into<String>,
        sinopsis: impl Into<String>,
    ) -> Self {
        Self {
            nombre: nombre.into(),
            url: url.into(),
            sinopsis: sinopsis.into(),
        }
    }
}

impl Fields for Movie {
    const RESOURCE: &'static str = "movies";
    const DEFAULT_ORDER: &'static str = "nombre";

    fn label(&self) -> String {
        self.nombre.clone()
    }

    fn demo_catalog() -> Vec<Self> {
        vec![
            Movie::new(
                "El Padrino",
                "https://via.placeholder.com/300x450/000000/FFFFFF?text=El+Padrino",
                "La historia de la familia Corleone, una de las cinco familias de la mafia de Nueva York.",
            ),
            Movie::new(
                "Pulp Fiction",
                "https://via.placeholder.com/300x450/000000/FFFFFF?text=Pulp+Fiction",
                "Varias historias entrelazadas de criminales en Los Ángeles.",
            ),
            Movie::new(
                "Forrest Gump",
                "https://via.placeholder.com/300x450/000000/FFFFFF?text=Forrest+Gump",
                "La vida de Forrest Gump, un hombre con un coeficiente intelectual bajo pero un gran corazón.",
            ),
        ]
    }
}
