use super::Address;
use crate::random::{chance, datetime_before, pick_weighted, rand_id};
use anyhow::Result;
use chrono::Duration;
use rand::Rng;
use sea_orm::entity::prelude::*;
use serde::Serialize;

pub const STATUS_WEIGHTS: &[(&str, u32)] = &[
    ("pending", 15),
    ("processing", 20),
    ("shipped", 20),
    ("delivered", 30),
    ("cancelled", 10),
    ("returned", 5),
];

/// Share of orders that have not shipped yet.
pub const UNSHIPPED_PROBABILITY: f64 = 0.1;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub order_id: i64,
    pub user_id: i64,
    #[serde(serialize_with = "super::serialize_datetime")]
    pub order_date: DateTime,
    #[serde(serialize_with = "super::serialize_opt_datetime")]
    pub ship_date: Option<DateTime>,
    pub status: String,
    pub shipping_address: String,
    pub shipping_city: String,
    pub shipping_state: String,
    pub shipping_postal_code: String,
    pub shipping_country: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Placed within the 18 months before `reference` by one of `user_count` users.
    pub fn rand_fake_new<R: Rng + ?Sized>(
        order_id: i64,
        user_count: usize,
        reference: Date,
        rng: &mut R,
    ) -> Result<Self> {
        let user_id = rand_id(rng, user_count);
        let order_date = datetime_before(rng, reference, 18 * 30)?;
        let ship_date = order_date + Duration::days(rng.gen_range(1..=7));
        let ship_date = if chance(rng, UNSHIPPED_PROBABILITY) {
            None
        } else {
            Some(ship_date)
        };
        let status = pick_weighted(rng, STATUS_WEIGHTS)?.to_owned();
        let address = Address::rand_fake_new(rng);
        Ok(Self {
            order_id,
            user_id,
            order_date,
            ship_date,
            status,
            shipping_address: address.street,
            shipping_city: address.city,
            shipping_state: address.state,
            shipping_postal_code: address.postal_code,
            shipping_country: address.country,
        })
    }
}
