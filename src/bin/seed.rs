use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use lanchonete_api::{
    config::AppConfig,
    db::{create_pool, run_migrations},
};
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    run_migrations(&pool).await?;

    let admin_id = ensure_user(&pool, "Administrador", "0000000000", "admin123", true).await?;
    let user_id = ensure_user(&pool, "Cliente Demo", "24999990000", "cliente123", false).await?;
    seed_catalog(&pool).await?;

    println!("Seed completed. Admin ID: {admin_id}, User ID: {user_id}");
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    name: &str,
    phone: &str,
    password: &str,
    is_admin: bool,
) -> anyhow::Result<Uuid> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    let (user_id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO users (id, name, phone, password_hash, is_admin)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (phone) DO UPDATE SET is_admin = EXCLUDED.is_admin
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(phone)
    .bind(password_hash)
    .bind(is_admin)
    .fetch_one(pool)
    .await?;

    println!("Ensured user {name} (phone={phone}, admin={is_admin})");
    Ok(user_id)
}

async fn seed_catalog(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let (existing,): (i64,) = sqlx::query_as("SELECT count(*) FROM categories")
        .fetch_one(pool)
        .await?;
    if existing > 0 {
        println!("Catalog already seeded");
        return Ok(());
    }

    let categories = [("Lanches", 0), ("Porções", 1), ("Bebidas", 2)];

    let mut category_ids = Vec::new();
    for (name, display_order) in categories {
        let (id,): (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO categories (id, name, display_order)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(display_order)
        .fetch_one(pool)
        .await?;
        category_ids.push(id);
    }

    let products = [
        ("X-Burguer", "Pão, hambúrguer e queijo", "18.50", 0usize),
        ("X-Tudo", "Completo, com tudo dentro", "27.00", 0),
        ("Batata Frita", "Porção grande, bem crocante", "22.00", 1),
        ("Refrigerante Lata", "350ml, gelado", "6.50", 2),
    ];

    for (name, description, price, category_idx) in products {
        sqlx::query(
            r#"
            INSERT INTO products (id, name, description, price, image, category_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(description)
        .bind(Decimal::from_str(price)?)
        .bind("https://example.com/images/placeholder.png")
        .bind(category_ids[category_idx])
        .execute(pool)
        .await?;
    }

    println!("Seeded categories and products");
    Ok(())
}
