use gymdesk_backend::api::{
    AttendanceApi, AuthApi, BillingApi, CatalogApi, DietsApi, HealthApi, LeadsApi, MembersApi,
    MembershipsApi, NotificationsApi, ReportsApi, StaffApi, TrainersApi, WorkoutsApi,
};
use gymdesk_backend::auth::SessionGuard;
use gymdesk_backend::config::{self, BootstrapSettings};
use gymdesk_backend::AppData;
use poem::middleware::Tracing;
use poem::{listener::TcpListener, EndpointExt, Route, Server};
use poem_openapi::OpenApiService;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    dotenv::dotenv().ok();

    if let Err(e) = config::init_logging() {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let settings = match BootstrapSettings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!(error = %e, "configuration error");
            std::process::exit(1);
        }
    };

    let db = match config::database::connect(&settings).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!(error = %e, "failed to connect to database");
            std::process::exit(1);
        }
    };
    if let Err(e) = config::database::migrate(&db).await {
        tracing::error!(error = %e, "failed to run migrations");
        std::process::exit(1);
    }

    let app_data = AppData::init(db, &settings);

    // Catalog defaults are safe to seed on every boot.
    if let Err(e) = app_data.catalog.seed_default_goals().await {
        tracing::warn!(error = %e, "failed to seed fitness goals");
    }
    if let Err(e) = app_data.catalog.seed_default_diet_types().await {
        tracing::warn!(error = %e, "failed to seed diet types");
    }
    if let Err(e) = app_data.catalog.seed_default_exercises().await {
        tracing::warn!(error = %e, "failed to seed exercises");
    }

    let api_service = OpenApiService::new(
        (
            HealthApi,
            AuthApi::new(app_data.auth_service.clone(), app_data.tokens.clone()),
            LeadsApi::new(
                app_data.leads.clone(),
                app_data.lead_conversion.clone(),
                app_data.tokens.clone(),
            ),
            MembersApi::new(
                app_data.members.clone(),
                app_data.notifications.clone(),
                app_data.tokens.clone(),
            ),
            StaffApi::new(app_data.users.clone(), app_data.tokens.clone()),
            TrainersApi::new(app_data.users.clone(), app_data.tokens.clone()),
            MembershipsApi::new(app_data.memberships.clone(), app_data.tokens.clone()),
            BillingApi::new(app_data.payments.clone(), app_data.tokens.clone()),
            AttendanceApi::new(app_data.attendance.clone(), app_data.tokens.clone()),
            CatalogApi::new(app_data.catalog.clone(), app_data.tokens.clone()),
            WorkoutsApi::new(app_data.plans.clone(), app_data.tokens.clone()),
            DietsApi::new(app_data.plans.clone(), app_data.tokens.clone()),
            NotificationsApi::new(app_data.notifications.clone(), app_data.tokens.clone()),
            ReportsApi::new(app_data.reports.clone(), app_data.tokens.clone()),
        ),
        "Gymdesk API",
        "1.0.0",
    )
    .server("http://localhost:3000");

    let ui = api_service.swagger_ui();

    // Every route passes through the session guard; the guard's own
    // decision table exempts the public API prefix and the auth pages.
    let app = Route::new()
        .nest("/swagger", ui)
        .nest("/", api_service)
        .with(SessionGuard::new(app_data.tokens.clone()))
        .with(Tracing);

    let bind_address = settings.bind_address().to_string();
    tracing::info!(address = %bind_address, "starting server");

    Server::new(TcpListener::bind(bind_address)).run(app).await
}
