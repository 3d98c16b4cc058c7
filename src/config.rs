// src/config.rs

use std::sync::Arc;
use std::{env, time::Duration};

use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::{
    db::{BusinessRepository, PgScheduleStore, UserRepository},
    services::{
        auth::AuthService, availability::AvailabilityService, booking::BookingService,
        schedule::ScheduleService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub user_repo: UserRepository,
    pub business_repo: BusinessRepository,
    pub auth_service: AuthService,
    pub availability_service: AvailabilityService<PgScheduleStore>,
    pub booking_service: Arc<BookingService<PgScheduleStore>>,
    pub schedule_service: ScheduleService<PgScheduleStore>,
    pub schedule_store: Arc<PgScheduleStore>,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let business_repo = BusinessRepository::new(db_pool.clone());
        let auth_service = AuthService::new(user_repo.clone(), jwt_secret);

        let schedule_store = Arc::new(PgScheduleStore::new(db_pool.clone()));
        let availability_service = AvailabilityService::new(schedule_store.clone());
        let booking_service = Arc::new(BookingService::new(schedule_store.clone()));
        let schedule_service = ScheduleService::new(schedule_store.clone());

        Ok(Self {
            db_pool,
            user_repo,
            business_repo,
            auth_service,
            availability_service,
            booking_service,
            schedule_service,
            schedule_store,
        })
    }
}
