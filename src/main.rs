//src/main.rs

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
};
use tokio::net::TcpListener;

// Declaração dos nossos módulos
mod common;
mod config;
mod db;
mod handlers;
mod middleware;
mod models;
mod services;

// Importações principais
use crate::config::AppState;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    // Inicializa o logger
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Define as rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    // Define as rotas de usuário (protegidas pelo middleware)
    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Rotas públicas do cliente final: disponibilidade e reserva.
    let public_routes = Router::new()
        .route(
            "/availability/{employee_id}",
            get(handlers::public::get_availability),
        )
        .route("/bookings", post(handlers::public::create_booking));

    // Rotas do empregado: agendas e turnos próprios.
    let schedule_routes = Router::new()
        .route(
            "/windows",
            post(handlers::schedule::create_window).get(handlers::schedule::list_my_windows),
        )
        .route("/windows/{window_id}", put(handlers::schedule::replace_window))
        .route("/bookings", get(handlers::schedule::list_my_bookings))
        .route(
            "/bookings/{booking_id}/time",
            put(handlers::schedule::reschedule_booking),
        )
        .route(
            "/bookings/{booking_id}/status",
            put(handlers::schedule::update_booking_status),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Rotas do admin do negócio: CRUD de empregados.
    let employee_routes = Router::new()
        .route(
            "/",
            post(handlers::employees::create_employee).get(handlers::employees::list_employees),
        )
        .route("/{employee_id}", delete(handlers::employees::delete_employee))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Rotas do super admin: tudo, em todos os tenants.
    let superadmin_routes = Router::new()
        .route(
            "/businesses",
            post(handlers::superadmin::create_business).get(handlers::superadmin::list_businesses),
        )
        .route(
            "/businesses/{business_id}",
            put(handlers::superadmin::update_business)
                .delete(handlers::superadmin::delete_business),
        )
        .route("/employees", get(handlers::superadmin::list_all_employees))
        .route(
            "/employees/{employee_id}",
            put(handlers::superadmin::update_employee)
                .delete(handlers::superadmin::delete_any_employee),
        )
        .route(
            "/services",
            post(handlers::superadmin::create_service).get(handlers::superadmin::list_services),
        )
        .route(
            "/services/{service_id}",
            put(handlers::superadmin::update_service).delete(handlers::superadmin::delete_service),
        )
        .route(
            "/bookings",
            post(handlers::superadmin::create_booking)
                .get(handlers::superadmin::list_all_bookings),
        )
        .route(
            "/bookings/{booking_id}/time",
            put(handlers::superadmin::reschedule_booking),
        )
        .route(
            "/bookings/{booking_id}/status",
            put(handlers::superadmin::update_booking_status),
        )
        .route(
            "/bookings/{booking_id}",
            delete(handlers::superadmin::delete_booking),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/public", public_routes)
        .nest("/api/schedule", schedule_routes)
        .nest("/api/employees", employee_routes)
        .nest("/api/superadmin", superadmin_routes)
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
