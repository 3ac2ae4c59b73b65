// Price, category and sort transforms applied on top of the display source
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::product::Product;

pub trait Filter {
    fn matches(&self, product: &Product) -> bool;
}

/// Inclusive price bounds; an unset side is unbounded
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl PriceRange {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Result<Self> {
        for bound in [min, max].into_iter().flatten() {
            if !bound.is_finite() || bound < 0.0 {
                return Err(Error::InvalidPrice(bound.to_string()));
            }
        }
        Ok(Self { min, max })
    }

    #[inline]
    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

impl Filter for PriceRange {
    fn matches(&self, product: &Product) -> bool {
        let above_min = self.min.map(|min| product.price >= min).unwrap_or(true);
        let below_max = self.max.map(|max| product.price <= max).unwrap_or(true);
        above_min && below_max
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOption {
    /// Keep the source order (relevance order for AI results)
    #[default]
    Default,
    PriceAsc,
    PriceDesc,
    RatingDesc,
}

impl SortOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOption::Default => "default",
            SortOption::PriceAsc => "price-asc",
            SortOption::PriceDesc => "price-desc",
            SortOption::RatingDesc => "rating-desc",
        }
    }

    /// Stable sort; ties keep their incoming order.
    pub fn sort(&self, products: &mut [&Product]) {
        match self {
            SortOption::Default => {}
            SortOption::PriceAsc => products.sort_by(|a, b| a.price.total_cmp(&b.price)),
            SortOption::PriceDesc => products.sort_by(|a, b| b.price.total_cmp(&a.price)),
            SortOption::RatingDesc => {
                products.sort_by(|a, b| b.rating.rate.total_cmp(&a.rating.rate))
            }
        }
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOption {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "default" => Ok(SortOption::Default),
            "price-asc" => Ok(SortOption::PriceAsc),
            "price-desc" => Ok(SortOption::PriceDesc),
            "rating-desc" => Ok(SortOption::RatingDesc),
            other => Err(Error::InvalidSortOption(other.to_string())),
        }
    }
}

/// User-controlled filter and sort state, independent of search results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    #[serde(default)]
    pub price: PriceRange,
    /// Exact category match; `None` shows every category
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub sort: SortOption,
}

impl FilterState {
    pub fn set_price_range(&mut self, min: Option<f64>, max: Option<f64>) -> Result<()> {
        self.price = PriceRange::new(min, max)?;
        Ok(())
    }

    pub fn set_category(&mut self, category: Option<String>) {
        self.category = category;
    }

    pub fn set_sort(&mut self, sort: SortOption) {
        self.sort = sort;
    }

    /// Filter then order `source`. The input order survives for
    /// `SortOption::Default` and for ties under the other options.
    pub fn apply<'a, I>(&self, source: I) -> Vec<&'a Product>
    where
        I: IntoIterator<Item = &'a Product>,
    {
        let mut products: Vec<&Product> = source.into_iter().filter(|p| self.matches(p)).collect();
        self.sort.sort(&mut products);
        products
    }
}

impl Filter for FilterState {
    fn matches(&self, product: &Product) -> bool {
        let in_category = self
            .category
            .as_deref()
            .map(|c| product.category == c)
            .unwrap_or(true);
        in_category && self.price.matches(product)
    }
}
