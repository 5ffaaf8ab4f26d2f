use crate::random::{datetime_before, pick, pick_weighted, rand_amount, rand_id, uuid_v4};
use anyhow::Result;
use rand::Rng;
use sea_orm::entity::prelude::*;
use serde::Serialize;

pub const CURRENCY: &str = "USD";

pub const METHODS: &[&str] = &["card", "paypal", "apple_pay", "google_pay", "bank_transfer"];

pub const STATUS_WEIGHTS: &[(&str, u32)] = &[
    ("authorized", 50),
    ("captured", 35),
    ("refunded", 10),
    ("failed", 5),
];

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub payment_id: i64,
    pub order_id: i64,
    pub amount: f64,
    pub currency: String,
    pub payment_method: String,
    pub status: String,
    pub transaction_id: String,
    #[serde(serialize_with = "super::serialize_datetime")]
    pub payment_date: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn rand_fake_new<R: Rng + ?Sized>(
        payment_id: i64,
        order_count: usize,
        reference: Date,
        rng: &mut R,
    ) -> Result<Self> {
        Ok(Self {
            payment_id,
            order_id: rand_id(rng, order_count),
            amount: rand_amount(rng, 10.0, 1500.0),
            currency: CURRENCY.to_owned(),
            payment_method: pick(rng, METHODS)?.to_owned(),
            status: pick_weighted(rng, STATUS_WEIGHTS)?.to_owned(),
            transaction_id: uuid_v4(rng),
            payment_date: datetime_before(rng, reference, 18 * 30)?,
        })
    }
}
