use crate::errors::SizingError;
use anyhow::{bail, Context};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::io::Read;

/// A panel product offered in quotes.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PanelProduct {
    pub brand: String,
    /// Nameplate output of one panel under standard test conditions, in W.
    pub wattage_w: f64,
    /// Physical footprint of one panel in m2, excluding installation
    /// spacing (walkways and tilt clearance are applied at sizing time).
    pub unit_area_m2: f64,
}

/// The catalog of panel products a quote can draw from, keyed by brand.
#[derive(Clone, Debug, Default)]
pub struct PanelCatalog {
    products: IndexMap<String, PanelProduct>,
}

impl PanelCatalog {
    /// Read the catalog from CSV with `brand`, `wattage_w` and
    /// `unit_area_m2` columns.
    pub fn new(csv: impl Read) -> anyhow::Result<Self> {
        let products = csv::Reader::from_reader(csv)
            .deserialize::<PanelProduct>()
            .collect::<Result<Vec<_>, _>>()
            .context("Reading the panel catalog failed")?;
        Self::from_products(products)
    }

    pub fn from_products(
        products: impl IntoIterator<Item = PanelProduct>,
    ) -> anyhow::Result<Self> {
        let mut catalog: IndexMap<String, PanelProduct> = Default::default();
        for product in products {
            if product.wattage_w <= 0. {
                bail!(
                    "Panel wattage for {} must be positive (got {})",
                    product.brand,
                    product.wattage_w
                );
            }
            if product.unit_area_m2 <= 0. {
                bail!(
                    "Panel unit area for {} must be positive (got {})",
                    product.brand,
                    product.unit_area_m2
                );
            }
            catalog.insert(product.brand.trim().to_lowercase(), product);
        }
        Ok(Self { products: catalog })
    }

    /// Look a product up by brand, case-insensitively.
    pub fn find(&self, brand: &str) -> Result<&PanelProduct, SizingError> {
        self.products
            .get(&brand.trim().to_lowercase())
            .ok_or_else(|| {
                SizingError::invalid(format!("Panel brand {brand:?} is not in the catalog"))
            })
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
