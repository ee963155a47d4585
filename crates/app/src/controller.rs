//! Application controller: maps user actions to data store calls.
//!
//! Every store call completes with a `Result`; failures are logged and
//! returned, never retried.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use tokio::task::JoinHandle;
use tokio_stream::StreamExt;

use orderapp_core::{Model, ObserveQueryOptions, QueryOptions, Time};
use orderapp_datastore::{Cancelable, DataStore, DataStoreError, QuerySnapshot, QuerySubscription};
use orderapp_events::{DataStoreChannelEventName, EventBus, Hub, ListenerHandle, spawn_listener};
use orderapp_models::{AccountRepresentative, Address, Blog, Customer, Employee, Inventory, Order, Product, Warehouse};

use crate::action::{Action, ActionOutcome, AddRecordsReport};
use crate::config::ControllerConfig;
use crate::connectivity::{ConnectivityMonitor, ConnectivityProbe, StaticProbe, TcpProbe};

const STATUS_IN_PROCESS: &str = "InProcess";
const STATUS_PROCESSED: &str = "Processed";

/// Latest values seen by the live queries.
#[derive(Debug, Default)]
struct Observed {
    order: Option<Order>,
    blog: Option<Blog>,
    blog_count: usize,
}

/// A live query drained by a background task.
#[derive(Debug)]
struct Observer {
    cancelable: Cancelable,
    task: JoinHandle<()>,
}

impl Observer {
    fn spawn<M, F>(mut subscription: QuerySubscription<M>, mut on_snapshot: F) -> Self
    where
        M: Model,
        F: FnMut(QuerySnapshot<M>) + Send + 'static,
    {
        let cancelable = subscription.cancelable();
        let task = tokio::spawn(async move {
            tracing::debug!("observation of {} started", M::SCHEMA.plural_name);
            while let Some(next) = subscription.next().await {
                match next {
                    Ok(snapshot) => on_snapshot(snapshot),
                    Err(e) => tracing::error!("error on {} snapshot: {}", M::SCHEMA.name, e),
                }
            }
            tracing::debug!("observation of {} complete", M::SCHEMA.plural_name);
        });
        Self { cancelable, task }
    }

    async fn shutdown(mut self) {
        self.cancelable.cancel();
        let _ = (&mut self.task).await;
    }
}

impl Drop for Observer {
    fn drop(&mut self) {
        self.cancelable.cancel();
        self.task.abort();
    }
}

/// Tasks owned by a started controller.
#[derive(Debug)]
struct Background {
    network: ListenerHandle,
    monitor: ConnectivityMonitor,
    observers: Vec<Observer>,
}

/// Drives the demo workflow against any [`DataStore`].
///
/// `start()` wires up the hub listener, the live queries and the connectivity
/// monitor; `handle()` runs one user action; `shutdown()` tears everything
/// down again.
pub struct Controller<S> {
    store: S,
    hub: Hub,
    config: ControllerConfig,
    probe: Arc<dyn ConnectivityProbe>,
    observed: Arc<Mutex<Observed>>,
    background: Mutex<Option<Background>>,
}

impl<S> core::fmt::Debug for Controller<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Controller")
            .field("config", &self.config)
            .field("started", &self.is_started())
            .finish()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<S> Controller<S> {
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn is_started(&self) -> bool {
        lock(&self.background).is_some()
    }

    /// First order of the most recent non-empty order snapshot.
    pub fn latest_order(&self) -> Option<Order> {
        lock(&self.observed).order.clone()
    }

    /// First blog of the most recent non-empty blog snapshot.
    pub fn latest_blog(&self) -> Option<Blog> {
        lock(&self.observed).blog.clone()
    }

    /// Size of the most recent non-empty blog snapshot.
    pub fn observed_blog_count(&self) -> usize {
        lock(&self.observed).blog_count
    }
}

impl<S: DataStore> Controller<S> {
    /// A controller whose probe follows `config.probe_addr` (online when unset).
    pub fn new(store: S, hub: Hub, config: ControllerConfig) -> Self {
        let probe: Arc<dyn ConnectivityProbe> = match &config.probe_addr {
            Some(addr) => Arc::new(TcpProbe::new(addr.clone())),
            None => Arc::new(StaticProbe::new(true)),
        };
        Self::with_probe(store, hub, config, probe)
    }

    pub fn with_probe(store: S, hub: Hub, config: ControllerConfig, probe: Arc<dyn ConnectivityProbe>) -> Self {
        Self {
            store,
            hub,
            config,
            probe,
            observed: Arc::new(Mutex::new(Observed::default())),
            background: Mutex::new(None),
        }
    }

    /// Startup sequence: hub listener, live queries, connectivity monitor,
    /// then the startup blog. Calling it again while started is a no-op.
    pub async fn start(&self) -> Result<(), DataStoreError> {
        if self.is_started() {
            tracing::warn!("controller already started");
            return Ok(());
        }

        let network = spawn_listener(
            self.hub
                .subscribe_to(DataStoreChannelEventName::NetworkStatus.as_str()),
            |event| {
                if let Some(status) = event.network_status_event() {
                    tracing::info!("user has a network connection: {}", status.active);
                }
            },
        );
        let observers = self.observe().await?;
        let monitor = ConnectivityMonitor::spawn(
            self.probe.clone(),
            self.hub.clone(),
            self.config.connectivity_interval,
        );

        {
            let mut background = lock(&self.background);
            if background.is_some() {
                // Lost a race with a concurrent start; the new tasks abort on drop.
                return Ok(());
            }
            *background = Some(Background {
                network,
                monitor,
                observers,
            });
        }
        tracing::info!("controller started");

        let blog = Blog::builder().name(self.config.startup_blog_name.clone()).build();
        match self.store.save(blog).await {
            Ok(saved) => {
                tracing::info!("saved startup blog {}", saved.id());
                Ok(())
            }
            Err(e) => {
                tracing::error!("startup blog save failed: {}", e);
                Err(e)
            }
        }
    }

    /// Open the order and blog live queries, each retaining its first item.
    async fn observe(&self) -> Result<Vec<Observer>, DataStoreError> {
        let orders = self
            .store
            .observe_query::<Order>(ObserveQueryOptions::new())
            .await
            .inspect_err(|e| tracing::error!("order observation failed: {}", e))?;
        let observed = self.observed.clone();
        let order_observer = Observer::spawn(orders, move |snapshot: QuerySnapshot<Order>| {
            tracing::debug!("order snapshot with {} item(s)", snapshot.len());
            if let Some(first) = snapshot.items().first() {
                lock(&observed).order = Some(first.clone());
            }
        });

        let blogs = self
            .store
            .observe_query::<Blog>(ObserveQueryOptions::new())
            .await
            .inspect_err(|e| tracing::error!("blog observation failed: {}", e))?;
        let observed = self.observed.clone();
        let blog_observer = Observer::spawn(blogs, move |snapshot: QuerySnapshot<Blog>| {
            if let Some(first) = snapshot.items().first() {
                tracing::info!("observe total count {}", snapshot.len());
                let mut observed = lock(&observed);
                observed.blog = Some(first.clone());
                observed.blog_count = snapshot.len();
            }
        });

        Ok(vec![order_observer, blog_observer])
    }

    /// Run exactly one action.
    pub async fn handle(&self, action: Action) -> Result<ActionOutcome, DataStoreError> {
        tracing::info!("{} button clicked", action);
        match action {
            Action::AddRecords => Ok(ActionOutcome::RecordsAdded(self.add_records().await)),
            Action::CreateOrders => self.create_orders().await.map(ActionOutcome::OrdersCreated),
            Action::DeleteBlog => self.delete_blog().await.map(ActionOutcome::BlogDeleted),
            Action::ClearDataStore => self.clear_data_store().await.map(|()| ActionOutcome::Cleared),
            Action::TotalOrders => self.total_orders().await.map(ActionOutcome::TotalOrders),
        }
    }

    async fn save_logged<M: Model>(&self, model: M) -> Option<M> {
        match self.store.save(model).await {
            Ok(saved) => {
                tracing::debug!("{} {} saved", M::SCHEMA.name, saved.id());
                Some(saved)
            }
            Err(e) => {
                tracing::error!("{} save failed: {}", M::SCHEMA.name, e);
                None
            }
        }
    }

    /// Save one warehouse, product, inventory, employee, customer, address
    /// and account representative per configured record id. Failures are
    /// logged and counted; the run always finishes.
    pub async fn add_records(&self) -> AddRecordsReport {
        let mut report = AddRecordsReport::default();
        let mut tally = |ok: bool| {
            if ok {
                report.saved += 1;
            } else {
                report.failed += 1;
            }
        };

        for i in self.config.record_ids.clone() {
            let warehouse_id = format!("WareHouse{i}");
            let product_id = format!("P{i}");
            let customer_id = format!("c{i}");
            let rep_id = format!("AR{i}");

            let warehouse = Warehouse::builder().id(warehouse_id.clone()).build();
            tally(self.save_logged(warehouse).await.is_some());

            let product = Product::builder()
                .name(format!("Product{i}"))
                .id(product_id.clone())
                .build();
            tally(self.save_logged(product).await.is_some());

            let inventory = Inventory::builder()
                .product_id(product_id)
                .warehouse_id(warehouse_id.clone())
                .inventory_amount(100)
                .build();
            tally(self.save_logged(inventory).await.is_some());

            let employee = Employee::builder()
                .name(format!("Employee{i}"))
                .start_date("2022-01-2022")
                .phone_number("123-456-7890")
                .warehouse_id(warehouse_id)
                .job_title("Helper")
                .new_hire("no")
                .id(i.to_string())
                .build();
            tally(self.save_logged(employee).await.is_some());

            let customer = Customer::builder()
                .name(format!("Customer {i}"))
                .account_representative_id(rep_id.clone())
                .phone_number("123-456-7890")
                .id(customer_id.clone())
                .build();
            tally(self.save_logged(customer).await.is_some());

            let address = Address::builder()
                .address("123 Street")
                .city("city")
                .state("State")
                .customer_id(customer_id)
                .build();
            tally(self.save_logged(address).await.is_some());

            let rep = AccountRepresentative::builder()
                .id(rep_id)
                .sales_period("2022")
                .build();
            tally(self.save_logged(rep).await.is_some());
        }

        tracing::info!(saved = report.saved, failed = report.failed, "records added");
        report
    }

    /// Save the sample blogs and orders, then move the first `InProcess`
    /// order to `Processed` through a copy. Returns the updated order.
    pub async fn create_orders(&self) -> Result<Option<Order>, DataStoreError> {
        for i in self.config.order_ids.clone() {
            let blog = Blog::builder()
                .name("blog1")
                .aws_time_value(self.config.sample_blog_time)
                .id(i.to_string())
                .build();
            self.save_logged(blog).await;
            self.log_blog_times().await;

            let order = Order::builder()
                .customer_id("c1")
                .account_representative_id("AR1")
                .product_id("P1")
                .status(STATUS_IN_PROCESS)
                .amount(10)
                .date(Utc::now().date_naive().to_string())
                .aws_time_value(Time::now())
                .id(i.to_string())
                .build();
            self.save_logged(order).await;
        }

        let options = QueryOptions::matching(Order::STATUS.eq(STATUS_IN_PROCESS)).sorted_by(Order::ID.ascending());
        let first = self
            .store
            .query::<Order>(options)
            .await
            .inspect_err(|e| tracing::error!("order query failed: {}", e))?
            .next();

        let Some(order) = first else {
            tracing::info!("no {} order to update", STATUS_IN_PROCESS);
            return Ok(None);
        };

        let updated = order.copy_of_builder().status(STATUS_PROCESSED).build();
        let saved = self
            .store
            .save(updated)
            .await
            .inspect_err(|e| tracing::error!("order update failed: {}", e))?;
        tracing::info!("updated order {} to {}", saved.id(), saved.status());
        Ok(Some(saved))
    }

    async fn log_blog_times(&self) {
        match self.store.query::<Blog>(QueryOptions::all()).await {
            Ok(blogs) => {
                for blog in blogs {
                    match blog.aws_time_value() {
                        Some(time) => tracing::debug!("blog {} time {}", blog.id(), time),
                        None => tracing::debug!("blog {} has no time", blog.id()),
                    }
                }
            }
            Err(e) => tracing::error!("blog query failed: {}", e),
        }
    }

    /// Delete the first blog named `config.delete_blog_name`, if any.
    pub async fn delete_blog(&self) -> Result<bool, DataStoreError> {
        let name = self.config.delete_blog_name.as_str();
        let first = self
            .store
            .query::<Blog>(QueryOptions::matching(Blog::NAME.eq(name)))
            .await
            .inspect_err(|e| tracing::error!("blog query failed: {}", e))?
            .next();

        let Some(blog) = first else {
            tracing::info!("no blog named '{}' to delete", name);
            return Ok(false);
        };

        self.store
            .delete(blog.reference())
            .await
            .inspect_err(|e| tracing::error!("delete failed: {}", e))?;
        tracing::info!("deleted blog {}", blog.id());
        Ok(true)
    }

    /// Clear the store and start it again. When the controller is started,
    /// the live queries the clear completed are opened again.
    pub async fn clear_data_store(&self) -> Result<(), DataStoreError> {
        self.store
            .clear()
            .await
            .inspect_err(|e| tracing::error!("error clearing data store: {}", e))?;
        tracing::info!("start time --> {}", Utc::now());

        self.store
            .start()
            .await
            .inspect_err(|e| tracing::error!("error starting data store: {}", e))?;
        tracing::info!("data store started");
        tracing::info!("end time --> {}", Utc::now());

        let stale = lock(&self.background)
            .as_mut()
            .map(|background| std::mem::take(&mut background.observers));
        let Some(stale) = stale else {
            *lock(&self.observed) = Observed::default();
            return Ok(());
        };
        for observer in stale {
            observer.shutdown().await;
        }
        *lock(&self.observed) = Observed::default();

        let fresh = self.observe().await?;
        if let Some(background) = lock(&self.background).as_mut() {
            background.observers = fresh;
        }
        Ok(())
    }

    /// Number of stored blogs.
    pub async fn total_orders(&self) -> Result<usize, DataStoreError> {
        let count = self
            .store
            .query::<Blog>(QueryOptions::all())
            .await
            .inspect_err(|e| tracing::error!("blog query failed: {}", e))?
            .count();
        tracing::info!("query count {}", count);
        Ok(count)
    }

    /// Cancel the live queries, stop the monitor and drop the hub listener.
    pub async fn shutdown(&self) {
        let Some(background) = lock(&self.background).take() else {
            return;
        };

        for observer in background.observers {
            observer.shutdown().await;
        }
        background.monitor.shutdown().await;
        background.network.shutdown().await;
        tracing::info!("controller stopped");
    }
}
