//! Composition roots: each binary builds its components here and wires
//! them together by constructor injection.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use subtrack_core::clock::{Clock, SystemClock};
use subtrack_core::publisher::{EventHandler, EventPublisher};
use subtrack_core::repository::SubscriptionRepository;
use subtrack_core::resolver::StaticServiceResolver;
use subtrack_creation::application::startup;
use subtrack_events::{ConsumerStats, DiscardingEventPublisher, LocalEventChannel};
use subtrack_store::PgSubscriptionRepository;
use subtrack_store::schema::run_migrations;
use subtrack_sync::{ReconciliationReport, SyncListener, reconcile};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::app::{creation_app, query_app};
use crate::config::{
    AllInOneConfig, CreationConfig, EventConfig, EventTransport, QueryConfig, ReconcileConfig,
};
use crate::creation_client::{HttpCreationClient, InProcessCreationClient};
use crate::error::AppError;
use crate::state::{CreationState, QueryState};

/// Opens a pool and applies pending migrations.
///
/// # Errors
///
/// Returns `AppError::Database` or `AppError::Migrate` on failure.
pub async fn connect(database_url: &str) -> Result<PgPool, AppError> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;
    run_migrations(&pool).await?;
    Ok(pool)
}

#[cfg(feature = "kafka")]
fn kafka_settings(events: &EventConfig) -> subtrack_events::kafka::KafkaSettings {
    subtrack_events::kafka::KafkaSettings {
        brokers: events.brokers.clone(),
        topic: events.topic.clone(),
        group_id: events.group_id.clone(),
    }
}

#[cfg(not(feature = "kafka"))]
fn kafka_disabled() -> AppError {
    AppError::Config(
        "EVENT_TRANSPORT=kafka needs a build with the `kafka` feature; use EVENT_TRANSPORT=none to run without a channel"
            .to_owned(),
    )
}

/// Builds the publisher selected by `events`.
///
/// # Errors
///
/// Returns `AppError::Config` if Kafka was requested but not compiled in,
/// or `AppError::Domain` if the producer cannot be created.
pub fn build_publisher(events: &EventConfig) -> Result<Arc<dyn EventPublisher>, AppError> {
    match events.transport {
        EventTransport::None => {
            warn!("no event channel configured, creations will not reach the replica");
            Ok(Arc::new(DiscardingEventPublisher))
        }
        #[cfg(feature = "kafka")]
        EventTransport::Kafka => Ok(Arc::new(subtrack_events::kafka::KafkaEventPublisher::new(
            &kafka_settings(events),
        )?)),
        #[cfg(not(feature = "kafka"))]
        EventTransport::Kafka => Err(kafka_disabled()),
    }
}

/// Starts the sync consumer selected by `events`, feeding `handler`.
/// Returns `None` when no channel is configured.
///
/// # Errors
///
/// Returns `AppError::Config` if Kafka was requested but not compiled in,
/// or `AppError::Domain` if the consumer cannot subscribe.
pub fn spawn_sync_consumer(
    events: &EventConfig,
    handler: Arc<dyn EventHandler>,
    shutdown: CancellationToken,
) -> Result<Option<JoinHandle<ConsumerStats>>, AppError> {
    match events.transport {
        EventTransport::None => {
            warn!("no event channel configured, the replica only changes through this service");
            drop((handler, shutdown));
            Ok(None)
        }
        #[cfg(feature = "kafka")]
        EventTransport::Kafka => {
            let consumer = subtrack_events::kafka::sync_consumer(&kafka_settings(events))?;
            Ok(Some(tokio::spawn(async move {
                subtrack_events::kafka::run_kafka_consumer(consumer, &*handler, shutdown).await
            })))
        }
        #[cfg(not(feature = "kafka"))]
        EventTransport::Kafka => Err(kafka_disabled()),
    }
}

/// Cancels `shutdown` on Ctrl-C.
pub fn cancel_on_ctrl_c(shutdown: CancellationToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("shutdown signal received"),
            Err(e) => error!(error = %e, "failed to listen for shutdown signal"),
        }
        shutdown.cancel();
    });
}

/// Serves `app` on `addr` until `shutdown` fires.
///
/// # Errors
///
/// Returns `AppError::Server` if the address cannot be bound or the
/// server fails.
pub async fn serve(
    service: &'static str,
    addr: SocketAddr,
    app: Router,
    shutdown: CancellationToken,
) -> Result<(), AppError> {
    let listener = TcpListener::bind(addr).await?;
    info!(service, %addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;
    info!(service, "stopped");
    Ok(())
}

/// Seeds and republishes as configured. Republish failures are counted,
/// never fatal.
///
/// # Errors
///
/// Returns `AppError::Domain` if the store cannot be read or written.
pub async fn run_startup_jobs(
    clock: &dyn Clock,
    repository: &dyn SubscriptionRepository,
    publisher: &dyn EventPublisher,
    seed_demo_data: bool,
    republish_on_startup: bool,
) -> Result<(), AppError> {
    if seed_demo_data {
        startup::seed_demo_subscriptions(clock, repository).await?;
    }
    if republish_on_startup {
        let report = startup::republish_existing(clock, repository, publisher).await?;
        if report.failed > 0 {
            warn!(failed = report.failed, "some rows were not republished");
        }
    }
    Ok(())
}

async fn log_consumer_exit(consumer: Option<JoinHandle<ConsumerStats>>) {
    if let Some(handle) = consumer {
        match handle.await {
            Ok(stats) => info!(
                applied = stats.applied,
                failed = stats.failed,
                undecodable = stats.undecodable,
                "sync consumer finished"
            ),
            Err(e) => error!(error = %e, "sync consumer task panicked"),
        }
    }
}

/// Runs the Creation Service until Ctrl-C.
///
/// # Errors
///
/// Returns an `AppError` if startup fails or the server stops abnormally.
pub async fn run_creation_service(config: CreationConfig) -> Result<(), AppError> {
    let pool = connect(&config.database_url).await?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let repository: Arc<dyn SubscriptionRepository> = Arc::new(PgSubscriptionRepository::new(pool));
    let publisher = build_publisher(&config.events)?;

    run_startup_jobs(
        clock.as_ref(),
        &*repository,
        &*publisher,
        config.seed_demo_data,
        config.republish_on_startup,
    )
    .await?;

    let shutdown = CancellationToken::new();
    cancel_on_ctrl_c(shutdown.clone());

    let app = creation_app(CreationState::new(clock, repository, publisher));
    serve(
        subtrack_core::resolver::CREATION_SERVICE,
        config.bind_addr,
        app,
        shutdown,
    )
    .await
}

/// Runs the Read/Query Service and its sync consumer until Ctrl-C.
///
/// # Errors
///
/// Returns an `AppError` if startup fails or the server stops abnormally.
pub async fn run_query_service(config: QueryConfig) -> Result<(), AppError> {
    let pool = connect(&config.database_url).await?;
    let replica: Arc<dyn SubscriptionRepository> = Arc::new(PgSubscriptionRepository::new(pool));
    let resolver = StaticServiceResolver::new().with_service(
        subtrack_core::resolver::CREATION_SERVICE,
        config.creation_service_url.as_str(),
    );
    let creation_client = Arc::new(HttpCreationClient::from_resolver(&resolver)?);

    let shutdown = CancellationToken::new();
    cancel_on_ctrl_c(shutdown.clone());

    let listener: Arc<dyn EventHandler> = Arc::new(SyncListener::new(Arc::clone(&replica)));
    let consumer = spawn_sync_consumer(&config.events, listener, shutdown.clone())?;

    let app = query_app(QueryState::new(replica, creation_client));
    let served = serve(
        subtrack_core::resolver::QUERY_SERVICE,
        config.bind_addr,
        app,
        shutdown.clone(),
    )
    .await;

    shutdown.cancel();
    log_consumer_exit(consumer).await;
    served
}

/// Runs both services in one process, joined by the in-process channel.
///
/// # Errors
///
/// Returns an `AppError` if startup fails or either server stops abnormally.
pub async fn run_all_in_one(config: AllInOneConfig) -> Result<(), AppError> {
    let creation_pool = connect(&config.creation_database_url).await?;
    let query_pool = connect(&config.query_database_url).await?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let source: Arc<dyn SubscriptionRepository> =
        Arc::new(PgSubscriptionRepository::new(creation_pool));
    let replica: Arc<dyn SubscriptionRepository> =
        Arc::new(PgSubscriptionRepository::new(query_pool));

    let shutdown = CancellationToken::new();
    cancel_on_ctrl_c(shutdown.clone());

    let (publisher, receiver) = LocalEventChannel::new();
    let publisher: Arc<dyn EventPublisher> = Arc::new(publisher);
    let listener = SyncListener::new(Arc::clone(&replica));
    let consumer_shutdown = shutdown.clone();
    let consumer = tokio::spawn(async move { receiver.run(&listener, consumer_shutdown).await });

    run_startup_jobs(
        clock.as_ref(),
        &*source,
        &*publisher,
        config.seed_demo_data,
        config.republish_on_startup,
    )
    .await?;

    let creation_client = Arc::new(InProcessCreationClient::new(
        Arc::clone(&clock),
        Arc::clone(&source),
        Arc::clone(&publisher),
    ));
    let creation = creation_app(CreationState::new(clock, source, publisher));
    let query = query_app(QueryState::new(replica, creation_client));

    let served = tokio::try_join!(
        serve(
            subtrack_core::resolver::CREATION_SERVICE,
            config.creation_addr,
            creation,
            shutdown.clone(),
        ),
        serve(
            subtrack_core::resolver::QUERY_SERVICE,
            config.query_addr,
            query,
            shutdown.clone(),
        ),
    );

    shutdown.cancel();
    log_consumer_exit(Some(consumer)).await;
    served.map(|_| ())
}

/// Compares the creation store with the replica.
///
/// # Errors
///
/// Returns an `AppError` if either store cannot be reached.
pub async fn run_reconcile(config: &ReconcileConfig) -> Result<ReconciliationReport, AppError> {
    let source = PgSubscriptionRepository::new(connect(&config.creation_database_url).await?);
    let replica = PgSubscriptionRepository::new(connect(&config.query_database_url).await?);
    Ok(reconcile(&source, &replica).await?)
}
