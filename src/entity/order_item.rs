use super::product;
use crate::random::{rand_amount, rand_id, round2};
use anyhow::{Context, Result};
use rand::Rng;
use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "order_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub order_item_id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price: f64,
    pub discount_rate: f64,
    pub line_total: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub fn line_total(quantity: i64, unit_price: f64, discount_rate: f64) -> f64 {
    round2(quantity as f64 * unit_price * (1.0 - discount_rate))
}

impl Model {
    /// The unit price is copied from the chosen product.
    pub fn rand_fake_new<R: Rng + ?Sized>(
        order_item_id: i64,
        order_count: usize,
        products: &[product::Model],
        rng: &mut R,
    ) -> Result<Self> {
        let order_id = rand_id(rng, order_count);
        let product_id = rand_id(rng, products.len());
        let product = usize::try_from(product_id - 1)
            .ok()
            .and_then(|index| products.get(index))
            .with_context(|| format!("product {product_id} does not exist"))?;
        let quantity = rng.gen_range(1..=5);
        let discount_rate = rand_amount(rng, 0.0, 0.25);
        Ok(Self {
            order_item_id,
            order_id,
            product_id,
            quantity,
            unit_price: product.price,
            discount_rate,
            line_total: line_total(quantity, product.price, discount_rate),
        })
    }
}
