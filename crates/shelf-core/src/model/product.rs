use serde::{Deserialize, Serialize};

use super::record::Fields;

/// An item in the store catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub nombre: String,
    /// Unit price.
    pub precio: f64,
    /// Image URL.
    pub imagen: String,
}

impl Product {
    pub fn new(nombre: impl Into<String>, precio: f64, imagen: impl Into<String>) -> Self {
        Self {
            nombre: nombre.into(),
            precio,
            imagen: imagen.into(),
        }
    }
}

impl Fields for Product {
    const RESOURCE: &'static str = "products";
    const DEFAULT_ORDER: &'static str = "id";

    fn label(&self) -> String {
        format!("{} (${:.2})", self.nombre, self.precio)
    }

    fn demo_catalog() -> Vec<Self> {
        const IMAGE: &str = "https://via.placeholder.com/150";
        vec![
            Product::new("Laptop", 800.0, IMAGE),
            Product::new("Mouse", 25.0, IMAGE),
            Product::new("Teclado", 40.0, IMAGE),
            Product::new("Monitor", 300.0, IMAGE),
            Product::new("Auriculares", 60.0, IMAGE),
            Product::new("Webcam", 80.0, IMAGE),
        ]
    }
}
