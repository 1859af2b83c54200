use crate::auth::TokenService;
use crate::config::Config;
use crate::db::Store;

/// Process-wide shared state: the connection pool and the signing keys.
/// Both are read-only after startup; per-request state lives in request
/// extensions.
#[derive(Clone)]
pub struct SharedState {
    pub config: Config,

    pub store: Store,

    pub tokens: TokenService,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.database.url,
            config.database.max_connections,
            config.database.min_connections,
        )
        .await?;

        let tokens = TokenService::new(
            &config.auth.access_token_secret,
            &config.auth.refresh_token_secret,
        );

        Ok(Self {
            config,
            store,
            tokens,
        })
    }
}
