use crate::random::{chance, date_before, pick, rand_amount};
use anyhow::Result;
use fake::faker::company::en::CompanyName;
use fake::faker::lorem::en::Words;
use fake::Fake;
use rand::Rng;
use sea_orm::entity::prelude::*;
use serde::Serialize;

pub const CATEGORIES: &[&str] = &[
    "Electronics",
    "Home",
    "Fashion",
    "Sports",
    "Beauty",
    "Books",
    "Toys",
];

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub product_id: i64,
    pub name: String,
    pub category: String,
    pub brand: String,
    pub price: f64,
    pub stock: i64,
    pub weight_kg: f64,
    #[serde(serialize_with = "super::serialize_date")]
    pub created_at: Date,
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn rand_fake_new<R: Rng + ?Sized>(
        product_id: i64,
        reference: Date,
        rng: &mut R,
    ) -> Result<Self> {
        let words: Vec<String> = Words(3..4).fake_with_rng(rng);
        Ok(Self {
            product_id,
            name: capitalize(&words.join(" ")),
            category: pick(rng, CATEGORIES)?.to_owned(),
            brand: CompanyName().fake_with_rng(rng),
            price: rand_amount(rng, 5.0, 800.0),
            stock: rng.gen_range(0..=500),
            weight_kg: rand_amount(rng, 0.1, 10.0),
            created_at: date_before(rng, reference, 2 * 365),
            is_active: chance(rng, 0.90),
        })
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
