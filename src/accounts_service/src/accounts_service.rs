use accounts_adapters::{
    config::AllowedOrigins,
    http::{
        TokenGuard, require_auth,
        routes::{
            change_password, check_otp, confirm_password_reset, get_profile, health, login,
            logout, refresh_token, register, request_otp, update_profile,
        },
    },
};
use accounts_core::{BannedTokenStore, EmailClient, OtpPolicy, OtpStore, TokenIssuer, UserStore};
use axum::{
    Router,
    http::{HeaderValue, Method, header, request},
    middleware,
    routing::{get, post, put},
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::telemetry::{make_span_with_request_id, on_request, on_response};

/// The accounts HTTP API: registration, login, profile and OTP flows.
pub struct AccountsService {
    router: Router,
}

impl AccountsService {
    /// Wire every route to the stores it needs.
    ///
    /// Stores implement Clone via internal Arc, so each route gets its own
    /// handle. Routes under the token guard see the caller as an
    /// `AuthenticatedUser` extension.
    pub fn new<U, O, B, E, T>(
        user_store: U,
        otp_store: O,
        banned_token_store: B,
        email_client: E,
        token_issuer: T,
        otp_policy: OtpPolicy,
    ) -> Self
    where
        U: UserStore + Clone + 'static,
        O: OtpStore + Clone + 'static,
        B: BannedTokenStore + Clone + 'static,
        E: EmailClient + Clone + 'static,
        T: TokenIssuer + Clone + 'static,
    {
        let token_guard = TokenGuard::new(token_issuer.clone(), banned_token_store.clone());

        let protected = Router::new()
            .route("/logout", post(logout::<B>))
            .with_state(banned_token_store.clone())
            .route(
                "/profile",
                get(get_profile::<U>)
                    .put(update_profile::<U>)
                    .patch(update_profile::<U>),
            )
            .with_state(user_store.clone())
            .route("/change-password", put(change_password::<U>))
            .with_state(user_store.clone())
            .route_layer(middleware::from_fn_with_state(
                token_guard,
                require_auth::<T, B>,
            ));

        let router = Router::new()
            .route("/health", get(health))
            .route("/register", post(register::<U, O, E>))
            .with_state((
                user_store.clone(),
                otp_store.clone(),
                email_client.clone(),
                otp_policy,
            ))
            .route("/login", post(login::<U, T>))
            .with_state((user_store.clone(), token_issuer.clone()))
            .route("/token/refresh", post(refresh_token::<U, B, T>))
            .with_state((user_store.clone(), banned_token_store, token_issuer))
            .route("/otp-request", post(request_otp::<U, O, E>))
            .with_state((
                user_store.clone(),
                otp_store.clone(),
                email_client,
                otp_policy,
            ))
            .route("/check-otp", post(check_otp::<U, O>))
            .with_state((user_store.clone(), otp_store.clone()))
            .route(
                "/password-reset/confirm",
                post(confirm_password_reset::<U, O>),
            )
            .with_state((user_store, otp_store))
            .merge(protected);

        Self { router }
    }

    fn with_trace_layer(mut self) -> Self {
        self.router = self.router.layer(
            TraceLayer::new_for_http()
                .make_span_with(make_span_with_request_id)
                .on_request(on_request)
                .on_response(on_response),
        );
        self
    }

    /// Convert the service into a router that can be mounted on another router
    ///
    /// # Arguments
    /// * `allowed_origins` - Browser origins allowed by CORS, `None` disables CORS
    pub fn as_nested_router(mut self, allowed_origins: Option<AllowedOrigins>) -> Router {
        if let Some(allowed_origins) = allowed_origins {
            let cors = CorsLayer::new()
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH])
                .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
                .allow_credentials(true)
                .allow_origin(AllowOrigin::predicate(
                    move |origin: &HeaderValue, _request_parts: &request::Parts| {
                        allowed_origins.contains(origin)
                    },
                ));

            self.router = self.router.layer(cors);
        }
        self.with_trace_layer().router
    }

    /// Run the service as a standalone server on `listener`.
    pub async fn run_standalone(
        self,
        listener: TcpListener,
        allowed_origins: Option<AllowedOrigins>,
    ) -> Result<(), std::io::Error> {
        let router = self.as_nested_router(allowed_origins);

        tracing::info!("Accounts service listening on {}", listener.local_addr()?);

        axum::serve(listener, router).await
    }
}
