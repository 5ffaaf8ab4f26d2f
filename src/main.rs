mod entity;
mod generate;
mod infer;
mod load;
mod random;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sea_orm::Database;
use std::path::PathBuf;

/// Generate a fake e-commerce dataset as CSV and load it into a database
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    #[clap(subcommand)]
    command: SubCommandArgs,
    #[clap(short = 'd', long, default_value = "data")]
    data_dir: PathBuf,
    #[clap(
        short = 'u',
        long,
        env = "DATABASE_URL",
        default_value = "sqlite://ecommerce.db?mode=rwc"
    )]
    db_url: String,
}

#[derive(Subcommand, Debug)]
enum SubCommandArgs {
    /// Write users, products, orders, order items and payments as CSV files
    Generate {
        #[clap(long, default_value = "42")]
        seed: u64,
        /// Generated dates fall before this day
        #[clap(long, default_value = "2025-01-01")]
        reference_date: chrono::NaiveDate,
        #[clap(long, default_value = "200")]
        users: usize,
        #[clap(long, default_value = "150")]
        products: usize,
        #[clap(long, default_value = "180")]
        orders: usize,
        #[clap(long, default_value = "400")]
        order_items: usize,
        #[clap(long, default_value = "220")]
        payments: usize,
    },
    /// Replace one table per CSV file in the database
    Load {
        #[clap(short = 's', long, default_value = "256")]
        batch_size: usize,
    },
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();
    let args = Args::parse();
    match args.command {
        SubCommandArgs::Generate { .. } => {
            generate::execute(&args).context("Failed to generate data")?;
        }
        SubCommandArgs::Load { .. } => {
            let db = Database::connect(&args.db_url)
                .await
                .context("Failed to connect to database")?;
            load::execute(&db, &args)
                .await
                .context("Failed to load data")?;
            println!("Database ready at {}", args.db_url);
        }
    }
    Ok(())
}
