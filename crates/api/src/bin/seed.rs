//! Populate the database with a sample catalog: categories, locations,
//! races, modalities, and instances.
//!
//! Usage: `DATABASE_URL=postgres://... cargo run --bin seed`

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dorsal_core::catalog::{
    CategoryDraft, InstanceDraft, LocationDraft, ModalityDraft, RaceDraft,
};
use dorsal_core::types::{DbId, Timestamp};
use dorsal_db::repositories::{CategoryRepo, InstanceRepo, LocationRepo, ModalityRepo, RaceRepo};
use dorsal_db::DbPool;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seed=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = dorsal_db::create_pool(&database_url)
        .await
        .context("failed to connect to database")?;
    dorsal_db::run_migrations(&pool)
        .await
        .context("failed to run migrations")?;

    let categories = create_categories(&pool).await?;
    let locations = create_locations(&pool).await?;
    let races = create_races(&pool, &categories).await?;
    let modalities = create_modalities(&pool, &races, &locations).await?;
    create_instances(&pool, &modalities).await?;

    tracing::info!("Sample catalog loaded");
    Ok(())
}

async fn create_category(pool: &DbPool, name: &str, description: &str) -> anyhow::Result<DbId> {
    let created = CategoryRepo::create(
        pool,
        &CategoryDraft {
            name: name.to_string(),
            description: Some(description.to_string()),
        },
    )
    .await?;
    tracing::info!(name, "Added category");
    Ok(created.id)
}

async fn create_categories(pool: &DbPool) -> anyhow::Result<Vec<DbId>> {
    tracing::info!("Adding categories");
    let mut ids = Vec::new();
    ids.push(create_category(pool, "Road Running",
        "Road running involves racing on paved roads and is popular for events ranging from 5Ks to marathons. \
         The surfaces are usually flat and smooth, making it ideal for fast pacing and consistent running conditions.").await?);
    ids.push(create_category(pool, "Trail Running",
        "Trail running takes place on hiking trails, mountain paths, or forest routes, often featuring challenging \
         terrains such as hills, mud, and obstacles like roots and rocks.").await?);
    ids.push(create_category(pool, "Obstacle Course Racing (OCR)",
        "Obstacle course racing combines running with physical challenges that test strength, endurance, and agility, \
         with obstacles such as walls to climb, weights to carry, and mud pits to cross.").await?);
    Ok(ids)
}

async fn create_locations(pool: &DbPool) -> anyhow::Result<Vec<DbId>> {
    tracing::info!("Adding locations");
    let seed: &[(&str, &str)] = &[
        ("Granada", "Andalucía"),
        ("Valencia", "Comunidad Valenciana"),
        ("Sevilla", "Andalucía"),
        ("Castellón", "Comunidad Valenciana"),
        ("Palas de Rei", "Galicia"),
        ("Irún", "País Vasco"),
        ("Guipúzcoa", "País Vasco"),
        ("Benia de Onís", "Asturias"),
        ("Huesca", "Aragón"),
        ("La Palma", "Islas Canarias"),
        ("Monzón", "Aragón"),
        ("Madrid", "Comunidad de Madrid"),
        ("Ponferrada", "Castilla y Leon"),
        ("Getxo", "País Vasco"),
        ("Alicante", "Comunidad Valenciana"),
        ("Melide", "Galicia"),
        ("San Sebastián", "País Vasco"),
    ];

    let mut ids = Vec::new();
    for (city, community) in seed {
        let created = LocationRepo::create(
            pool,
            &LocationDraft {
                city: city.to_string(),
                community: community.to_string(),
            },
        )
        .await?;
        tracing::info!(%city, %community, "Added location");
        ids.push(created.id);
    }
    Ok(ids)
}

async fn create_races(pool: &DbPool, categories: &[DbId]) -> anyhow::Result<Vec<DbId>> {
    tracing::info!("Adding races");
    // (name, category index, description)
    let seed: &[(&str, usize, &str)] = &[
        ("Maratón de Valencia", 0,
         "Held annually in the historic city of Valencia which, with its entirely flat circuit and perfect November \
          temperature, represents the ideal setting for a long-distance challenge."),
        ("Maratón de Sevilla", 0,
         "The flattest marathon in Europe and the second fastest in Spain, the perfect place to run a personal best."),
        ("Maratón de Castellón", 0,
         "A WA Bronze Label race gathering more than 5000 runners from around the world."),
        ("Os 21 Do Camiño", 0,
         "A half marathon through Galician nature along El Camino de Santiago."),
        ("Behobia", 0,
         "A very demanding route with two major summits, Gaintxurizketa and Alto de Miracruz, and a positive climb of 192 m."),
        ("Ultra Trail Sierra Nevada", 1,
         "An experience full of nature, culture and high summits. From the foot of the Alhambra to the Veleta Peak."),
        ("Zegama Aizkorri", 1,
         "An international skyrunning competition running from Zegama up to Aizkorri, part of the Skyrunner World Series."),
        ("Gran Trail Picos de Europa", 1,
         "A spectacular route through the Western Massif of the Picos de Europa, starting in Benia de Onís."),
        ("Gran Trail del Aneto", 1,
         "Runs through all types of terrain around the two highest peaks of the Pyrenees, the Aneto and the Posets."),
        ("Transvulcania", 1,
         "A long distance race held annually on La Palma, considered one of the hardest mountain ultramarathons in the world."),
        ("Templar Race Monzón", 2,
         "A tough circuit with obstacles, passing through the monumental Castle of Monzón, finishing with a brutal leg killer."),
        ("Spartan Race Madrid", 2,
         "Tests participants on rugged trails that require a mix of strength, agility, and speed."),
        ("Farinato Race Ponferrada", 2,
         "An obstacle race through Ponferrada."),
        ("Desafío de Guerreros Getxo", 2,
         "Team sports and obstacle racing surrounded by nature, with water, mud, and impressive obstacles."),
        ("Survivor Race Alicante", 2,
         "Distances of 6km, 10km, and 15km full of obstacles offering different levels of difficulty and fun."),
    ];

    let mut ids = Vec::new();
    for (name, category_index, description) in seed {
        let created = RaceRepo::create(
            pool,
            &RaceDraft {
                name: name.to_string(),
                category_id: categories[*category_index],
                description: Some(description.to_string()),
                image_url: None,
            },
        )
        .await?;
        tracing::info!(%name, "Added race");
        ids.push(created.id);
    }
    Ok(ids)
}

async fn create_modalities(
    pool: &DbPool,
    races: &[DbId],
    locations: &[DbId],
) -> anyhow::Result<Vec<DbId>> {
    tracing::info!("Adding modalities");
    // (race index, location index, distance km, elevation m)
    let seed: &[(usize, usize, f64, f64)] = &[
        (0, 1, 42.195, 0.0),
        (1, 2, 42.195, 0.0),
        (2, 3, 42.195, 0.0),
        (3, 4, 21.0, 0.0),
        (4, 5, 20.0, 192.0),
        (5, 6, 105.0, 0.0),
    ];

    let mut ids = Vec::new();
    for (race_index, location_index, distance, elevation) in seed {
        let created = ModalityRepo::create(
            pool,
            &ModalityDraft {
                race_id: races[*race_index],
                start_location_id: locations[*location_index],
                end_location_id: locations[*location_index],
                distance: *distance,
                elevation: *elevation,
                track: "Route description pending publication by the organizers.".to_string(),
            },
        )
        .await?;
        tracing::info!(race_id = created.race_id, distance = *distance, "Added modality");
        ids.push(created.id);
    }
    Ok(ids)
}

async fn create_instances(pool: &DbPool, modalities: &[DbId]) -> anyhow::Result<()> {
    tracing::info!("Adding instances");
    let date: Timestamp = "2022-12-01T00:00:00Z".parse()?;
    let prices = [60.0, 60.0, 60.0, 30.0, 30.0, 30.0];

    for (modality_id, price) in modalities.iter().zip(prices) {
        let created = InstanceRepo::create(
            pool,
            &InstanceDraft {
                modality_id: *modality_id,
                date,
                price,
            },
        )
        .await?;
        tracing::info!(id = created.id, modality_id = created.modality_id, "Added instance");
    }
    Ok(())
}
