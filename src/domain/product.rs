use bigdecimal::BigDecimal;
use uuid::Uuid;

labelled_enum! {
    pub enum StockStatus {
        InStock => "in_stock",
        OutOfStock => "out_of_stock",
    }
}

labelled_enum! {
    /// Catalog categories configured for this deployment.
    pub enum Category {
        LegumeConservateHoreca => "legume-conservate-horeca",
        SosuriHoreca => "sosuri-horeca",
        Dulceturi => "dulceturi",
        LegumeConservate => "legume-conservate",
        ProduseDinBranza => "produse-din-branza",
        DulciuriSiSnacks => "dulciuri-si-snacks-uri",
        CafeaSiBauturi => "cafea-si-bauturi",
        Sosuri => "sosuri",
        Masline => "masline",
        AlimenteCuAmidon => "alimente-cu-amidon",
        Placinta => "placinta",
    }
}

/// A catalog entry as the order pipeline sees it. Never mutated by order placement.
#[derive(Debug, Clone)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub price: BigDecimal,
    pub units_per_box: Option<u32>,
    pub box_per_palet: Option<u32>,
    pub stock: StockStatus,
    pub category: Category,
    pub barcode: Option<String>,
    pub image: Option<String>,
}

impl Product {
    /// Units in one box; products without a usable multiplier sell by the unit.
    pub fn effective_units_per_box(&self) -> u32 {
        self.units_per_box.unwrap_or(1)
    }
}

/// Parses a packaging multiplier stored as free text.
///
/// Only positive integers that fit a 32-bit column count; blanks, zero,
/// negatives and garbage are absent.
pub fn parse_packaging(raw: Option<&str>) -> Option<u32> {
    raw.map(str::trim)
        .and_then(|s| s.parse::<i32>().ok())
        .filter(|n| *n > 0)
        .and_then(|n| u32::try_from(n).ok())
}

/// Fields the fulfillment side needs from the live product behind an order line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductReference {
    pub barcode: Option<String>,
    pub units_per_box: Option<u32>,
}

impl From<&Product> for ProductReference {
    fn from(p: &Product) -> Self {
        Self {
            barcode: p.barcode.clone(),
            units_per_box: p.units_per_box,
        }
    }
}
