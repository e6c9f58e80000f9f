use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use storefront_api::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    entity::{
        products::{ActiveModel as ProductActive, Column as ProductCol, Entity as Products},
        users::{ActiveModel as UserActive, Column as UserCol, Entity as Users},
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url, 1).await?;
    // Ensure migrations are applied.
    run_migrations(&orm).await?;

    let user_id = ensure_user(&orm, "demo|0001", "demo@example.com", "Demo Customer").await?;
    seed_products(&orm).await?;

    println!("Seed completed. Demo user ID: {user_id}");
    Ok(())
}

async fn ensure_user(
    orm: &DatabaseConnection,
    external_id: &str,
    email: &str,
    name: &str,
) -> anyhow::Result<i32> {
    if let Some(existing) = Users::find()
        .filter(UserCol::ExternalId.eq(external_id))
        .one(orm)
        .await?
    {
        println!("User {email} already present");
        return Ok(existing.id);
    }

    let now = Utc::now();
    let user = UserActive {
        id: NotSet,
        external_id: Set(external_id.to_string()),
        email: Set(email.to_string()),
        name: Set(Some(name.to_string())),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(orm)
    .await?;

    println!("Ensured user {email}");
    Ok(user.id)
}

async fn seed_products(orm: &DatabaseConnection) -> anyhow::Result<()> {
    let products = vec![
        ("Axum Hoodie", "Warm hoodie for Rustaceans", 5500),
        ("Ferris Mug", "Coffee tastes better with Ferris", 1200),
        ("Rust Sticker Pack", "Decorate your laptop", 500),
        ("E-book: Async Rust", "Learn async Rust patterns", 2500),
    ];

    for (name, desc, price) in products {
        let exists = Products::find()
            .filter(ProductCol::Name.eq(name))
            .one(orm)
            .await?
            .is_some();
        if exists {
            continue;
        }

        let now = Utc::now();
        ProductActive {
            id: NotSet,
            name: Set(name.to_string()),
            description: Set(Some(desc.to_string())),
            price: Set(price),
            payment_product_id: Set(None),
            payment_price_id: Set(None),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(orm)
        .await?;
    }

    println!("Seeded products");
    Ok(())
}
