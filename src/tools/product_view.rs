use anyhow::Result;
use serde::Deserialize;

use super::{ToolSchema, ToolStatus};
use crate::error::ValidationError;
use crate::parser::is_url;
use crate::tools::status_view::StatusDisplay;
use crate::view::View;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Whole units; kept as a JSON number so `3.5` is reported, not truncated
    #[serde(default)]
    pub stock: Option<f64>,
}

/// Arguments of the `product_view` tool
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProductViewArgs {
    pub products: Vec<Product>,
}

impl ToolSchema for ProductViewArgs {
    fn validate(&self) -> Result<(), ValidationError> {
        for (i, product) in self.products.iter().enumerate() {
            if let Some(price) = product.price {
                if !(price >= 0.0) {
                    return Err(ValidationError::invalid(
                        format!("products[{i}].price"),
                        "must be a non-negative number",
                    ));
                }
            }
            if let Some(url) = &product.image_url {
                if !is_url(url) {
                    return Err(ValidationError::invalid(
                        format!("products[{i}].imageUrl"),
                        "must be a URL",
                    ));
                }
            }
            if let Some(stock) = product.stock {
                if stock.fract() != 0.0 || stock < 0.0 {
                    return Err(ValidationError::invalid(
                        format!("products[{i}].stock"),
                        "must be a non-negative integer",
                    ));
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductLayout {
    /// One product, full-width card
    Single,
    /// Several products side by side; `navigation` adds previous/next controls
    Carousel { navigation: bool },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductCard {
    pub name: String,
    pub description: Option<String>,
    pub price: Option<String>,
    pub stock: Option<String>,
    pub image_url: Option<String>,
    pub aria_label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductGallery {
    pub layout: ProductLayout,
    pub cards: Vec<ProductCard>,
}

impl ProductCard {
    fn from_product(product: &Product) -> Self {
        let price = product
            .price
            .filter(|p| *p != 0.0)
            .map(|p| format!("${p:.2}"));
        let stock = product.stock.map(|s| format!("{s:.0} units"));

        let price_text = product
            .price
            .map(|p| p.to_string())
            .unwrap_or_else(|| "price unknown".to_string());
        // zero stock reads as unknown in the label, but still shows "0 units"
        let stock_text = product
            .stock
            .filter(|s| *s != 0.0)
            .map(|s| format!("{s:.0}"))
            .unwrap_or_else(|| "unknown".to_string());

        ProductCard {
            name: product.name.clone(),
            description: product.description.clone(),
            price,
            stock,
            image_url: product.image_url.clone(),
            aria_label: format!(
                "{}, {}, {} units in stock",
                product.name, price_text, stock_text
            ),
        }
    }
}

pub fn product_view(args: &ProductViewArgs) -> Result<View> {
    if args.products.is_empty() {
        return Ok(View::Status(StatusDisplay::new(
            ToolStatus::Error,
            Some("No products found"),
            None,
        )));
    }

    let layout = match args.products.len() {
        1 => ProductLayout::Single,
        n => ProductLayout::Carousel { navigation: n > 2 },
    };

    Ok(View::Products(ProductGallery {
        layout,
        cards: args.products.iter().map(ProductCard::from_product).collect(),
    }))
}
