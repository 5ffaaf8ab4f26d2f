use crate::entity::{order, order_item, payment, product, user};
use crate::random::seeded_rng;
use anyhow::{ensure, Context, Result};
use chrono::NaiveDate;
use rand_chacha::ChaCha8Rng;
use sea_orm::{EntityTrait, IdenStatic, Iterable};
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub seed: u64,
    pub reference_date: NaiveDate,
    pub users: usize,
    pub products: usize,
    pub orders: usize,
    pub order_items: usize,
    pub payments: usize,
}

impl From<&super::Args> for Config {
    fn from(args: &super::Args) -> Self {
        let (seed, reference_date, users, products, orders, order_items, payments) =
            match args.command {
                super::SubCommandArgs::Generate {
                    seed,
                    reference_date,
                    users,
                    products,
                    orders,
                    order_items,
                    payments,
                } => (
                    seed,
                    reference_date,
                    users,
                    products,
                    orders,
                    order_items,
                    payments,
                ),
                super::SubCommandArgs::Load { .. } => unreachable!(),
            };
        Self {
            data_dir: args.data_dir.clone(),
            seed,
            reference_date,
            users,
            products,
            orders,
            order_items,
            payments,
        }
    }
}

/// All five tables, each with dense ids starting at 1.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub users: Vec<user::Model>,
    pub products: Vec<product::Model>,
    pub orders: Vec<order::Model>,
    pub order_items: Vec<order_item::Model>,
    pub payments: Vec<payment::Model>,
}

#[derive(Debug, Clone)]
pub struct WrittenFile {
    pub path: PathBuf,
    pub rows: usize,
}

pub fn execute<T: Into<Config>>(config: T) -> Result<Vec<WrittenFile>> {
    let config = config.into();
    let dataset = build(&config).context("Failed to build dataset")?;
    let written = write(&dataset, &config.data_dir)?;
    for file in &written {
        println!("Saved {:4} rows -> {}", file.rows, file.path.display());
    }
    Ok(written)
}

pub fn build(config: &Config) -> Result<Dataset> {
    ensure!(
        config.users > 0 || config.orders == 0,
        "orders need at least one user"
    );
    ensure!(
        config.orders > 0 || (config.order_items == 0 && config.payments == 0),
        "order items and payments need at least one order"
    );
    ensure!(
        config.products > 0 || config.order_items == 0,
        "order items need at least one product"
    );
    info!(seed = config.seed, reference_date = %config.reference_date, "building dataset");

    let mut rng = seeded_rng(config.seed);
    let users = build_users(config, &mut rng);
    let products = (1..=config.products as i64)
        .map(|id| product::Model::rand_fake_new(id, config.reference_date, &mut rng))
        .collect::<Result<Vec<_>>>()?;
    let orders = (1..=config.orders as i64)
        .map(|id| {
            order::Model::rand_fake_new(id, users.len(), config.reference_date, &mut rng)
        })
        .collect::<Result<Vec<_>>>()?;
    let order_items = (1..=config.order_items as i64)
        .map(|id| order_item::Model::rand_fake_new(id, orders.len(), &products, &mut rng))
        .collect::<Result<Vec<_>>>()?;
    let payments = (1..=config.payments as i64)
        .map(|id| {
            payment::Model::rand_fake_new(id, orders.len(), config.reference_date, &mut rng)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Dataset {
        users,
        products,
        orders,
        order_items,
        payments,
    })
}

fn build_users(config: &Config, rng: &mut ChaCha8Rng) -> Vec<user::Model> {
    let mut emails = HashSet::with_capacity(config.users);
    (1..=config.users as i64)
        .map(|id| {
            let mut user = user::Model::rand_fake_new(id, config.reference_date, rng);
            if !emails.insert(user.email.clone()) {
                // the faker repeats addresses on larger runs
                user.email = format!("{id}.{}", user.email);
                emails.insert(user.email.clone());
            }
            user
        })
        .collect()
}

/// Writes one `<table>.csv` per entity into `dir`, creating it if absent.
pub fn write(dataset: &Dataset, dir: &Path) -> Result<Vec<WrittenFile>> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    Ok(vec![
        write_table(dir, user::Entity, &dataset.users)?,
        write_table(dir, product::Entity, &dataset.products)?,
        write_table(dir, order::Entity, &dataset.orders)?,
        write_table(dir, order_item::Entity, &dataset.order_items)?,
        write_table(dir, payment::Entity, &dataset.payments)?,
    ])
}

fn write_table<E>(dir: &Path, entity: E, rows: &[E::Model]) -> Result<WrittenFile>
where
    E: EntityTrait,
    E::Model: Serialize,
{
    let path = dir.join(format!("{}.csv", entity.table_name()));
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(&path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    // written explicitly so empty tables still carry their columns
    writer.write_record(E::Column::iter().map(|column| column.as_str().to_owned()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    debug!(
        table = entity.table_name(),
        rows = rows.len(),
        path = %path.display(),
        "table written"
    );
    Ok(WrittenFile {
        path,
        rows: rows.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(data_dir: &Path, seed: u64) -> Config {
        Config {
            data_dir: data_dir.to_path_buf(),
            seed,
            reference_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            users: 40,
            products: 30,
            orders: 50,
            order_items: 120,
            payments: 60,
        }
    }

    fn read_dir_files(dir: &Path) -> Vec<(String, Vec<u8>)> {
        let mut files = fs::read_dir(dir)
            .unwrap()
            .map(|entry| {
                let path = entry.unwrap().path();
                let name = path.file_name().unwrap().to_string_lossy().into_owned();
                (name, fs::read(&path).unwrap())
            })
            .collect::<Vec<_>>();
        files.sort();
        files
    }

    #[test]
    fn test_counts_match_config() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = build(&config(dir.path(), 42)).unwrap();
        assert_eq!(dataset.users.len(), 40);
        assert_eq!(dataset.products.len(), 30);
        assert_eq!(dataset.orders.len(), 50);
        assert_eq!(dataset.order_items.len(), 120);
        assert_eq!(dataset.payments.len(), 60);
        let ids = dataset.orders.iter().map(|o| o.order_id).collect::<Vec<_>>();
        assert_eq!(ids, (1..=50).collect::<Vec<_>>());
    }

    #[test]
    fn test_same_seed_is_byte_identical() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        execute(config(first.path(), 42)).unwrap();
        execute(config(second.path(), 42)).unwrap();
        let first = read_dir_files(first.path());
        assert_eq!(first.len(), 5);
        assert_eq!(first, read_dir_files(second.path()));
    }

    #[test]
    fn test_different_seed_differs() {
        let dir = tempfile::tempdir().unwrap();
        let a = build(&config(dir.path(), 1)).unwrap();
        let b = build(&config(dir.path(), 2)).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_line_totals() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = build(&config(dir.path(), 42)).unwrap();
        for item in &dataset.order_items {
            assert_eq!(
                item.line_total,
                crate::random::round2(
                    item.quantity as f64 * item.unit_price * (1.0 - item.discount_rate)
                )
            );
            assert!((1..=5).contains(&item.quantity));
            assert!((0.0..=0.25).contains(&item.discount_rate));
            let product = &dataset.products[(item.product_id - 1) as usize];
            assert_eq!(item.unit_price, product.price);
        }
    }

    #[test]
    fn test_references_in_range() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = build(&config(dir.path(), 42)).unwrap();
        let users = dataset.users.len() as i64;
        let orders = dataset.orders.len() as i64;
        let products = dataset.products.len() as i64;
        assert!(dataset.orders.iter().all(|o| (1..=users).contains(&o.user_id)));
        assert!(dataset
            .order_items
            .iter()
            .all(|i| (1..=orders).contains(&i.order_id) && (1..=products).contains(&i.product_id)));
        assert!(dataset.payments.iter().all(|p| (1..=orders).contains(&p.order_id)));
    }

    #[test]
    fn test_field_domains() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = build(&config(dir.path(), 42)).unwrap();
        let statuses = order::STATUS_WEIGHTS.iter().map(|(s, _)| *s).collect::<Vec<_>>();
        for order in &dataset.orders {
            assert!(statuses.contains(&order.status.as_str()));
            if let Some(ship_date) = order.ship_date {
                let days = (ship_date - order.order_date).num_days();
                assert!((1..=7).contains(&days));
            }
        }
        let transactions = dataset
            .payments
            .iter()
            .map(|p| p.transaction_id.as_str())
            .collect::<HashSet<_>>();
        assert_eq!(transactions.len(), dataset.payments.len());
        assert!(dataset.payments.iter().all(|p| p.currency == "USD"));
        assert!(dataset
            .payments
            .iter()
            .all(|p| payment::METHODS.contains(&p.payment_method.as_str())));
        let emails = dataset.users.iter().map(|u| &u.email).collect::<HashSet<_>>();
        assert_eq!(emails.len(), dataset.users.len());
    }

    #[test]
    fn test_csv_layout() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(dir.path(), 42);
        config.orders = 30;
        execute(config).unwrap();
        let orders = fs::read_to_string(dir.path().join("orders.csv")).unwrap();
        let mut lines = orders.lines();
        assert_eq!(
            lines.next().unwrap(),
            "order_id,user_id,order_date,ship_date,status,shipping_address,shipping_city,\
             shipping_state,shipping_postal_code,shipping_country"
        );
        assert_eq!(orders.lines().count(), 31);
        let users = fs::read_to_string(dir.path().join("users.csv")).unwrap();
        let first = users.lines().nth(1).unwrap();
        assert!(first.starts_with("1,"));
        assert!(first.ends_with(",true") || first.ends_with(",false"));
    }

    #[test]
    fn test_empty_table_keeps_header() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(dir.path(), 42);
        config.payments = 0;
        let written = execute(config).unwrap();
        assert_eq!(written[4].rows, 0);
        let payments = fs::read_to_string(dir.path().join("payments.csv")).unwrap();
        assert_eq!(payments.lines().count(), 1);
        assert!(payments.starts_with("payment_id,order_id,amount"));
    }

    #[test]
    fn test_orders_without_users_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(dir.path(), 42);
        config.users = 0;
        assert!(build(&config).is_err());
    }
}
