//src/main.rs

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use taller::{
    config::{AppState, Settings},
    routes,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("taller=info")))
        .with_target(false)
        .compact()
        .init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let settings = Settings::from_env().expect("Configuração inválida.");
    let app_state = AppState::new(&settings)
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    if let Some(pool) = &app_state.db_pool {
        sqlx::migrate!()
            .run(pool)
            .await
            .expect("Falha ao rodar as migrações do banco de dados.");
        tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");
    }

    // Carga inicial dos dois quadros; se falhar, a primeira requisição tenta de novo
    if let Err(e) = app_state.appointment_board.load().await {
        tracing::warn!("Falha na carga inicial das citas: {:?}", e);
    }
    if let Err(e) = app_state.shop_board.refresh().await {
        tracing::warn!("Falha na carga inicial da oficina: {:?}", e);
    }
    app_state.shop_board.spawn_periodic_refresh(settings.shop_refresh_interval);

    let app = routes::app(app_state);

    let listener = TcpListener::bind(&settings.bind_addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    match listener.local_addr() {
        Ok(addr) => tracing::info!("🚀 Servidor escutando em {}", addr),
        Err(_) => tracing::info!("🚀 Servidor escutando em {}", settings.bind_addr),
    }
    axum::serve(listener, app).await.expect("Erro no servidor Axum");
}
