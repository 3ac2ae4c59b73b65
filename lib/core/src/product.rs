use ahash::AHashMap;
use serde::{Deserialize, Serialize, Serializer};

/// Provider-assigned product identifier
pub type ProductId = u64;

/// Aggregate review score for a product
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    /// Average score in `[0, 5]`
    pub rate: f64,
    /// Number of reviews behind the average
    pub count: u64,
}

/// A catalog entry as returned by the product-listing endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: f64,
    pub description: String,
    pub category: String,
    pub image: String,
    pub rating: Rating,
}

impl Product {
    #[inline]
    #[must_use]
    pub fn new(id: ProductId, title: impl Into<String>, price: f64) -> Self {
        Self {
            id,
            title: title.into(),
            price,
            description: String::new(),
            category: String::new(),
            image: String::new(),
            rating: Rating { rate: 0.0, count: 0 },
        }
    }

    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[inline]
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    #[inline]
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    #[inline]
    #[must_use]
    pub fn with_rating(mut self, rate: f64, count: u64) -> Self {
        self.rating = Rating { rate, count };
        self
    }
}

/// The session's product list, kept in provider order.
///
/// Serializes as a plain JSON array so it can be embedded in requests and
/// prompts verbatim. Lookups by id go through a side index; when the provider
/// repeats an id the first occurrence wins.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "Vec<Product>")]
pub struct Catalog {
    products: Vec<Product>,
    index: AHashMap<ProductId, usize>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        let mut index = AHashMap::with_capacity(products.len());
        for (pos, product) in products.iter().enumerate() {
            index.entry(product.id).or_insert(pos);
        }
        Self { products, index }
    }

    #[inline]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.index.get(&id).map(|&pos| &self.products[pos])
    }

    #[inline]
    pub fn contains(&self, id: ProductId) -> bool {
        self.index.contains_key(&id)
    }

    #[inline]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Product> {
        self.products.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl From<Vec<Product>> for Catalog {
    fn from(products: Vec<Product>) -> Self {
        Catalog::new(products)
    }
}

impl FromIterator<Product> for Catalog {
    fn from_iter<I: IntoIterator<Item = Product>>(iter: I) -> Self {
        Catalog::new(iter.into_iter().collect())
    }
}

impl Serialize for Catalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.products.serialize(serializer)
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Product;
    type IntoIter = std::slice::Iter<'a, Product>;

    fn into_iter(self) -> Self::IntoIter {
        self.products.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decodes_listing_payload() {
        let payload = json!([{
            "id": 1,
            "title": "Fjallraven Backpack",
            "price": 109.95,
            "description": "Your perfect pack for everyday use",
            "category": "men's clothing",
            "image": "https://example.com/1.jpg",
            "rating": { "rate": 3.9, "count": 120 }
        }]);

        let catalog: Catalog = serde_json::from_value(payload).unwrap();
        assert_eq!(catalog.len(), 1);
        let product = catalog.get(1).unwrap();
        assert_eq!(product.title, "Fjallraven Backpack");
        assert_eq!(product.rating.count, 120);
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let catalog = Catalog::new(vec![Product::new(7, "Mug", 4.5)]);
        let value = serde_json::to_value(&catalog).unwrap();
        assert!(value.is_array());
        assert_eq!(value[0]["id"], 7);
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let catalog = Catalog::new(vec![
            Product::new(1, "first", 1.0),
            Product::new(1, "second", 2.0),
        ]);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(1).unwrap().title, "first");
        assert!(!catalog.contains(2));
    }
}
