//! Fill the catalogue with sample products and services.
//!
//! Usage: `seed [products] [services]` (both default to 15).

use anyhow::Context;
use dotenvy::dotenv;
use models::errors::ModelError;
use models::{product, service};
use rand::Rng;
use sea_orm::{ActiveModelTrait, Set};
use tracing::{info, warn};

const ADJECTIVES: &[&str] = &["Silky", "Golden", "Herbal", "Classic", "Radiant", "Velvet", "Pure", "Royal"];
const PRODUCT_NOUNS: &[&str] = &["Shampoo", "Conditioner", "Hair Oil", "Body Butter", "Serum", "Face Mask", "Comb", "Wig"];
const SERVICE_NOUNS: &[&str] = &["Braids", "Manicure", "Pedicure", "Facial", "Massage", "Haircut", "Makeup", "Locs"];
const CATEGORIES: &[(&str, &str)] = &[("Hair", "Care"), ("Skin", "Treatment"), ("Nails", "Art"), ("Spa", "Relax")];

fn count_arg(pos: usize) -> anyhow::Result<usize> {
    match std::env::args().nth(pos) {
        Some(v) => v.parse().with_context(|| format!("argument {pos} must be a number, got '{v}'")),
        None => Ok(15),
    }
}

fn pick<'a, T>(rng: &mut impl Rng, items: &'a [T]) -> &'a T {
    // lists above are non-empty constants
    &items[rng.gen_range(0..items.len())]
}

async fn seed_products(db: &sea_orm::DatabaseConnection, n: usize) -> anyhow::Result<usize> {
    let mut rng = rand::thread_rng();
    let mut created = 0;
    for i in 0..n {
        let (category, sub) = *pick(&mut rng, CATEGORIES);
        let name = format!("{} {} {}", pick(&mut rng, ADJECTIVES), pick(&mut rng, PRODUCT_NOUNS), i + 1);
        let price = (rng.gen_range(10.0..1000.0_f64) * 100.0).round() / 100.0;
        let new = product::NewProduct {
            name: name.clone(),
            category_name: category.into(),
            subcategory_name: sub.into(),
            description: format!("{name} for everyday {}", category.to_lowercase()),
            price,
            image_url: Some(format!("https://picsum.photos/seed/p{}/400/400", i + 1)),
        };
        match product::create(db, new).await {
            Ok(p) => {
                let mut am: product::ActiveModel = p.into();
                am.clicks = Set(rng.gen_range(0..=100));
                am.update(db).await?;
                created += 1;
            }
            Err(ModelError::Conflict(_)) => warn!(%name, "product exists, skipped"),
            Err(e) => return Err(e.into()),
        }
    }
    Ok(created)
}

async fn seed_services(db: &sea_orm::DatabaseConnection, n: usize) -> anyhow::Result<usize> {
    let mut rng = rand::thread_rng();
    let mut created = 0;
    for i in 0..n {
        let (category, sub) = *pick(&mut rng, CATEGORIES);
        let noun = *pick(&mut rng, SERVICE_NOUNS);
        let name = format!("{} {} {}", pick(&mut rng, ADJECTIVES), noun, i + 1);
        let new = service::NewService {
            name: name.clone(),
            description: Some(format!("{noun} session by our {} team", category.to_lowercase())),
            price: (rng.gen_range(20.0..500.0_f64) * 100.0).round() / 100.0,
            category_name: category.into(),
            subcategory_name: sub.into(),
            before_service_image: Some(format!("https://picsum.photos/seed/b{}/400/400", i + 1)),
            after_service_image: Some(format!("https://picsum.photos/seed/a{}/400/400", i + 1)),
        };
        match service::create(db, new).await {
            Ok(s) => {
                let mut am: service::ActiveModel = s.into();
                am.clicks = Set(rng.gen_range(0..=100));
                am.update(db).await?;
                created += 1;
            }
            Err(ModelError::Conflict(_)) => warn!(%name, "service exists, skipped"),
            Err(e) => return Err(e.into()),
        }
    }
    Ok(created)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    common::utils::logging::init_logging_default();

    let products = count_arg(1)?;
    let services = count_arg(2)?;
    let cfg = configs::AppConfig::load()?;
    let db = models::db::connect_with_config(&cfg.database).await?;
    models::db::migrate(&db).await?;

    let p = seed_products(&db, products).await?;
    let s = seed_services(&db, services).await?;
    info!(event = "seeded", products = p, services = s, "sample data inserted");
    Ok(())
}
