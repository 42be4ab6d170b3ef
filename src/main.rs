use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use lavajato_backend::config::{DatabaseConfig, EnvironmentConfig, StoreBackend};
use lavajato_backend::database::DatabaseConnection;
use lavajato_backend::models::auth::UserRole;
use lavajato_backend::repositories::{MemoryOrderStore, OrderStore, ServiceOrderRepository};
use lavajato_backend::routes::create_app_router;
use lavajato_backend::state::AppState;
use lavajato_backend::utils::jwt::generate_token;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging (RUST_LOG o info por defecto)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    info!("🚿 Lava-jato - API de órdenes de servicio");
    info!("================================================");

    let config = EnvironmentConfig::from_env()?;
    info!(
        "⚙️ Entorno: {} | almacén: {:?} | política: {}",
        config.environment,
        config.order_store,
        config.transition_policy.as_str()
    );

    let store = build_store(&config).await?;
    let state = AppState::new(store, config.clone());

    if config.order_store == StoreBackend::Memory && config.is_development() {
        let token = generate_token(Uuid::new_v4(), Uuid::new_v4(), UserRole::Owner, &state.jwt)?;
        warn!("🧪 Modo demo en memoria. Token de desarrollo: {}", token);
    }

    let app = create_app_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    info!("🌐 Servidor iniciando en http://{}", config.server_url());
    info!("🔍 Endpoints disponibles:");
    info!("   GET   /health - Health check");
    info!("🧾 Endpoints - Órdenes de servicio:");
    info!("   GET   /api/orders - Listar órdenes");
    info!("   GET   /api/orders/board - Columnas del tablero");
    info!("   POST  /api/orders - Crear orden");
    info!("   GET   /api/orders/:id - Obtener orden");
    info!("   PATCH /api/orders/:id/status - Cambiar estado");
    info!("   GET   /api/orders/:id/history - Historial de estados");
    info!("   GET   /api/orders/:id/transitions - Estados permitidos");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Error del servidor: {}", e);
        return Err(e.into());
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Elegir el almacén de órdenes según ORDER_STORE
async fn build_store(config: &EnvironmentConfig) -> Result<Arc<dyn OrderStore>> {
    match config.order_store {
        StoreBackend::Memory => {
            info!("🧠 Usando almacén en memoria");
            Ok(Arc::new(MemoryOrderStore::new()))
        }
        StoreBackend::Postgres => {
            let url = config
                .database_url
                .clone()
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL es requerido para ORDER_STORE=postgres"))?;

            let connection = match DatabaseConnection::new(&DatabaseConfig::new(url)).await {
                Ok(conn) => conn,
                Err(e) => {
                    error!("❌ Error conectando a la base de datos: {}", e);
                    return Err(anyhow::anyhow!("Error de base de datos: {}", e));
                }
            };
            connection.run_migrations().await?;

            Ok(Arc::new(ServiceOrderRepository::new(connection.pool().clone())))
        }
    }
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el handler de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
