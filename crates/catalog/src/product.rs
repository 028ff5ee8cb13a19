use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use factory_core::{DomainResult, Entity, RecordId, Timestamps};

use crate::category::CategoryId;
use crate::fields::{nullable, optional_text, required_text};

/// Product identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub RecordId);

impl ProductId {
    pub fn new(id: RecordId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl core::str::FromStr for ProductId {
    type Err = factory_core::DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    /// Price in the smallest currency unit (e.g. cents).
    pub price: u64,
    pub category: Option<CategoryId>,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> ProductId {
        self.id
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: u64,
    #[serde(default)]
    pub category: Option<CategoryId>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub price: Option<u64>,
    #[serde(default, deserialize_with = "nullable")]
    pub category: Option<Option<CategoryId>>,
}

impl Product {
    pub fn create(id: ProductId, input: ProductInput, now: DateTime<Utc>) -> DomainResult<Self> {
        Ok(Self {
            id,
            name: required_text("name", &input.name)?,
            description: optional_text(input.description),
            price: input.price,
            category: input.category,
            timestamps: Timestamps::at(now),
        })
    }

    pub fn replace(&mut self, input: ProductInput, now: DateTime<Utc>) -> DomainResult<()> {
        self.name = required_text("name", &input.name)?;
        self.description = optional_text(input.description);
        self.price = input.price;
        self.category = input.category;
        self.timestamps.touch(now);
        Ok(())
    }

    pub fn patch(&mut self, patch: ProductPatch, now: DateTime<Utc>) -> DomainResult<()> {
        let name = patch
            .name
            .map(|n| required_text("name", &n))
            .transpose()?;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = optional_text(description);
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        self.timestamps.touch(now);
        Ok(())
    }

    /// The category this product would point at after `patch`.
    pub fn category_after(&self, patch: &ProductPatch) -> Option<CategoryId> {
        match patch.category {
            Some(next) => next,
            None => self.category,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bolt() -> Product {
        let input: ProductInput = serde_json::from_value(json!({
            "name": "M8 bolt",
            "price": 25,
        }))
        .unwrap();
        Product::create(ProductId::new(RecordId::new()), input, Utc::now()).unwrap()
    }

    #[test]
    fn optional_fields_default_to_none() {
        let p = bolt();
        assert_eq!(p.description, None);
        assert_eq!(p.category, None);
        assert_eq!(p.price, 25);
    }

    #[test]
    fn price_is_required_on_input() {
        let res = serde_json::from_value::<ProductInput>(json!({ "name": "M8 bolt" }));
        assert!(res.is_err());
    }

    #[test]
    fn negative_price_does_not_deserialize() {
        let res = serde_json::from_value::<ProductInput>(json!({ "name": "M8 bolt", "price": -1 }));
        assert!(res.is_err());
    }

    #[test]
    fn patch_can_clear_category() {
        let mut p = bolt();
        let cat = CategoryId::new(RecordId::new());
        p.category = Some(cat);

        let keep: ProductPatch = serde_json::from_value(json!({ "price": 30 })).unwrap();
        assert_eq!(p.category_after(&keep), Some(cat));

        let clear: ProductPatch = serde_json::from_value(json!({ "category": null })).unwrap();
        assert_eq!(p.category_after(&clear), None);
        p.patch(clear, Utc::now()).unwrap();
        assert_eq!(p.category, None);
    }

    #[test]
    fn replace_resets_omitted_optionals() {
        let mut p = bolt();
        p.description = Some("zinc plated".to_string());

        let input: ProductInput =
            serde_json::from_value(json!({ "name": "M10 bolt", "price": 40 })).unwrap();
        p.replace(input, Utc::now()).unwrap();

        assert_eq!(p.name, "M10 bolt");
        assert_eq!(p.description, None);
        assert_eq!(p.price, 40);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: a patch touches exactly the fields it names.
            #[test]
            fn patch_only_changes_named_fields(
                name in proptest::option::of("[A-Za-z][A-Za-z0-9 ]{0,40}"),
                price in proptest::option::of(0u64..1_000_000),
            ) {
                let mut p = bolt();
                let before = p.clone();
                let patch = ProductPatch {
                    name: name.clone(),
                    price,
                    ..ProductPatch::default()
                };
                p.patch(patch, Utc::now()).unwrap();

                prop_assert_eq!(&p.name, &name.map(|n| n.trim().to_string()).unwrap_or(before.name.clone()));
                prop_assert_eq!(p.price, price.unwrap_or(before.price));
                prop_assert_eq!(&p.description, &before.description);
                prop_assert_eq!(p.category, before.category);
                prop_assert_eq!(p.timestamps.created_at, before.timestamps.created_at);
            }
        }
    }
}
