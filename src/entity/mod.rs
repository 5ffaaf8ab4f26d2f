use fake::faker::address::en::{
    BuildingNumber, CitySuffix, CountryName, PostCode, StateAbbr, StreetName,
};
use fake::faker::name::en::LastName;
use fake::Fake;
use rand::Rng;
use sea_orm::entity::prelude::{Date, DateTime};
use serde::Serializer;

pub mod order;
pub mod order_item;
pub mod payment;
pub mod product;
pub mod user;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Postal address shared by users and order shipping fields.
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

impl Address {
    pub fn rand_fake_new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let number: String = BuildingNumber().fake_with_rng(rng);
        let street: String = StreetName().fake_with_rng(rng);
        Self {
            street: format!("{number} {street}"),
            city: city_name(rng),
            state: StateAbbr().fake_with_rng(rng),
            postal_code: PostCode().fake_with_rng(rng),
            country: CountryName().fake_with_rng(rng),
        }
    }
}

/// Surname joined to a town suffix, e.g. "Welchfurt".
fn city_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    let stem: String = LastName().fake_with_rng(rng);
    let suffix: String = CitySuffix().fake_with_rng(rng);
    format!("{stem}{}", suffix.trim())
}

// CSV cell formats shared by every entity; the store keeps them as TEXT.

pub(crate) fn serialize_date<S: Serializer>(
    value: &Date,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&value.format(DATE_FORMAT))
}

pub(crate) fn serialize_datetime<S: Serializer>(
    value: &DateTime,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&value.format(DATETIME_FORMAT))
}

pub(crate) fn serialize_opt_datetime<S: Serializer>(
    value: &Option<DateTime>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(value) => serialize_datetime(value, serializer),
        None => serializer.serialize_none(),
    }
}
