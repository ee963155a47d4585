use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Value as JsonValue, json};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::mpsc;

use orderapp_core::model::{from_json, to_json};
use orderapp_core::query::sort_records;
use orderapp_core::{Model, ModelId, ModelRef, ObserveQueryOptions, Page, QueryOptions, QueryPredicate, QuerySortBy};
use orderapp_events::{DataStoreEvent, EventBus, Hub};

use crate::error::DataStoreError;
use crate::store::observe::{Cancelable, QuerySnapshot, QuerySubscription};
use crate::store::results::QueryResults;
use crate::store::r#trait::DataStore;

type Table = BTreeMap<ModelId, JsonValue>;

/// Internal change feed driving live queries.
#[derive(Debug, Clone)]
enum StoreChange {
    Modified { model: &'static str },
    Cleared,
    Stopped,
}

/// Tuning knobs for [`InMemoryDataStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InMemoryStoreConfig {
    /// Snapshots a live query may buffer before its producer waits.
    pub snapshot_buffer: usize,
    /// Capacity of the internal change feed. Live queries that fall further
    /// behind than this re-snapshot instead of replaying.
    pub change_buffer: usize,
}

impl Default for InMemoryStoreConfig {
    fn default() -> Self {
        Self {
            snapshot_buffer: 16,
            change_buffer: 1024,
        }
    }
}

#[derive(Debug)]
struct Inner {
    tables: RwLock<HashMap<&'static str, Table>>,
    running: AtomicBool,
    changes: broadcast::Sender<StoreChange>,
    hub: Option<Hub>,
    config: InMemoryStoreConfig,
}

/// In-memory data store.
///
/// Records live as JSON objects keyed by model name and id. Intended for
/// tests/dev and as the local half of a synchronizing store; nothing is
/// persisted across process restarts.
///
/// Cloning is cheap and every clone shares the same data.
#[derive(Debug, Clone)]
pub struct InMemoryDataStore {
    inner: Arc<Inner>,
}

impl Default for InMemoryDataStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryDataStore {
    pub fn new() -> Self {
        Self::build(None, InMemoryStoreConfig::default())
    }

    /// A store that announces `ready` and `cleared` on `hub`.
    pub fn with_hub(hub: Hub) -> Self {
        Self::build(Some(hub), InMemoryStoreConfig::default())
    }

    pub fn with_config(hub: Option<Hub>, config: InMemoryStoreConfig) -> Self {
        Self::build(hub, config)
    }

    fn build(hub: Option<Hub>, config: InMemoryStoreConfig) -> Self {
        let (changes, _) = broadcast::channel(config.change_buffer.max(1));
        Self {
            inner: Arc::new(Inner {
                tables: RwLock::new(HashMap::new()),
                running: AtomicBool::new(false),
                changes,
                hub,
                config,
            }),
        }
    }

    pub fn is_running(&self) -> bool {
        self.inner.running.load(Ordering::SeqCst)
    }

    /// Number of stored records of `M`.
    pub fn count<M: Model>(&self) -> Result<usize, DataStoreError> {
        let tables = self.inner.tables.read().map_err(|_| DataStoreError::poisoned())?;
        Ok(tables.get(M::SCHEMA.name).map_or(0, BTreeMap::len))
    }

    fn ensure_started(&self) {
        if !self.inner.running.swap(true, Ordering::SeqCst) {
            tracing::info!("data store started");
            self.inner.publish(DataStoreEvent::ready());
        }
    }

    fn validate<M: Model>(predicate: &QueryPredicate, sort: &[QuerySortBy]) -> Result<(), DataStoreError> {
        let fields = predicate
            .fields()
            .into_iter()
            .chain(sort.iter().map(|s| s.field));
        for field in fields {
            if field.model_name() != M::SCHEMA.name {
                return Err(DataStoreError::invalid_query(format!(
                    "field '{}.{}' used in a {} query",
                    field.model_name(),
                    field.name(),
                    M::SCHEMA.name
                )));
            }
            if M::SCHEMA.field(field.name()).is_none() {
                return Err(DataStoreError::invalid_query(format!(
                    "{} has no field '{}'",
                    M::SCHEMA.name,
                    field.name()
                )));
            }
        }
        Ok(())
    }

    fn put<M: Model>(&self, model: M) -> Result<M, DataStoreError> {
        let mut tables = self.inner.tables.write().map_err(|_| DataStoreError::poisoned())?;
        let table = tables.entry(M::SCHEMA.name).or_default();

        let now = Utc::now();
        let created_at = table
            .get(model.id())
            .and_then(|existing| existing.get("createdAt"))
            .and_then(|v| serde_json::from_value::<DateTime<Utc>>(v.clone()).ok())
            .unwrap_or(now);

        // Timestamps have no setter on the records; they enter through the
        // stored form only.
        let mut record = to_json(&model)?;
        if let Some(fields) = record.as_object_mut() {
            fields.insert("createdAt".to_string(), json!(created_at));
            fields.insert("updatedAt".to_string(), json!(now));
        }
        let saved: M = from_json(record.clone())?;
        table.insert(saved.id().clone(), record);
        Ok(saved)
    }

    fn remove<M: Model>(&self, reference: &ModelRef<M>) -> Result<(), DataStoreError> {
        let mut tables = self.inner.tables.write().map_err(|_| DataStoreError::poisoned())?;
        let removed = tables
            .get_mut(M::SCHEMA.name)
            .and_then(|table| table.remove(reference.id()));
        match removed {
            Some(_) => Ok(()),
            None => Err(DataStoreError::NotFound {
                model: M::SCHEMA.name,
                id: reference.id().clone(),
            }),
        }
    }
}

impl Inner {
    fn publish(&self, event: DataStoreEvent) {
        if let Some(hub) = &self.hub {
            let _ = hub.publish(event);
        }
    }

    fn notify(&self, change: StoreChange) {
        // No live queries means no receivers; that is fine.
        let _ = self.changes.send(change);
    }

    /// Filter, sort, paginate, then decode.
    fn select<M: Model>(
        &self,
        predicate: &QueryPredicate,
        sort: &[QuerySortBy],
        page: Option<Page>,
    ) -> Result<Vec<M>, DataStoreError> {
        let mut rows: Vec<JsonValue> = {
            let tables = self.tables.read().map_err(|_| DataStoreError::poisoned())?;
            tables
                .get(M::SCHEMA.name)
                .map(|table| table.values().filter(|row| predicate.evaluate(row)).cloned().collect())
                .unwrap_or_default()
        };

        sort_records(&mut rows, sort);

        if let Some(page) = page {
            rows = rows
                .into_iter()
                .skip(page.offset())
                .take(page.limit as usize)
                .collect();
        }

        rows.into_iter()
            .map(|row| from_json::<M>(row).map_err(DataStoreError::from))
            .collect()
    }
}

#[async_trait]
impl DataStore for InMemoryDataStore {
    async fn start(&self) -> Result<(), DataStoreError> {
        self.ensure_started();
        Ok(())
    }

    async fn stop(&self) -> Result<(), DataStoreError> {
        if self.inner.running.swap(false, Ordering::SeqCst) {
            tracing::info!("data store stopped");
            self.inner.notify(StoreChange::Stopped);
        }
        Ok(())
    }

    async fn clear(&self) -> Result<(), DataStoreError> {
        {
            let mut tables = self.inner.tables.write().map_err(|_| DataStoreError::poisoned())?;
            tables.clear();
        }
        self.inner.running.store(false, Ordering::SeqCst);
        self.inner.notify(StoreChange::Cleared);
        self.inner.publish(DataStoreEvent::cleared());
        tracing::info!("data store cleared");
        Ok(())
    }

    async fn save<M: Model>(&self, model: M) -> Result<M, DataStoreError> {
        self.ensure_started();
        let saved = self.put(model)?;
        tracing::debug!(model = M::SCHEMA.name, id = %saved.id(), "saved");
        self.inner.notify(StoreChange::Modified { model: M::SCHEMA.name });
        Ok(saved)
    }

    async fn delete<M: Model>(&self, reference: ModelRef<M>) -> Result<(), DataStoreError> {
        self.ensure_started();
        self.remove(&reference)?;
        tracing::debug!(model = M::SCHEMA.name, id = %reference.id(), "deleted");
        self.inner.notify(StoreChange::Modified { model: M::SCHEMA.name });
        Ok(())
    }

    async fn query<M: Model>(&self, options: QueryOptions) -> Result<QueryResults<M>, DataStoreError> {
        self.ensure_started();
        Self::validate::<M>(&options.predicate, &options.sort)?;
        let items = self.inner.select::<M>(&options.predicate, &options.sort, options.page)?;
        Ok(QueryResults::new(items))
    }

    async fn observe_query<M: Model>(
        &self,
        options: ObserveQueryOptions,
    ) -> Result<QuerySubscription<M>, DataStoreError> {
        self.ensure_started();
        Self::validate::<M>(&options.predicate, &options.sort)?;

        // Subscribe before the first snapshot so no change slips in between.
        let mut changes = self.inner.changes.subscribe();
        let initial = self.inner.select::<M>(&options.predicate, &options.sort, None)?;

        let (tx, rx) = mpsc::channel(self.inner.config.snapshot_buffer.max(1));
        let (cancelable, mut cancel) = Cancelable::new();
        let _ = tx.try_send(Ok(QuerySnapshot::new(initial)));

        let inner = Arc::clone(&self.inner);
        let ObserveQueryOptions { predicate, sort } = options;
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    change = changes.recv() => match change {
                        Ok(StoreChange::Modified { model }) if model == M::SCHEMA.name => {}
                        Ok(StoreChange::Modified { .. }) => continue,
                        Ok(StoreChange::Cleared) | Ok(StoreChange::Stopped) => break,
                        Err(RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, model = M::SCHEMA.name, "live query lagged; re-snapshotting");
                        }
                        Err(RecvError::Closed) => break,
                    },
                }

                let snapshot = inner.select::<M>(&predicate, &sort, None);
                let failed = snapshot.is_err();
                let sent = tokio::select! {
                    _ = cancel.cancelled() => false,
                    res = tx.send(snapshot.map(QuerySnapshot::new)) => res.is_ok(),
                };
                if !sent || failed {
                    break;
                }
            }
            tracing::debug!(model = M::SCHEMA.name, "live query completed");
        });

        Ok(QuerySubscription::new(rx, cancelable))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use orderapp_core::Time;
    use orderapp_events::DataStoreChannelEventName;
    use orderapp_models::{Blog, Order, Product};

    async fn next<M>(sub: &mut QuerySubscription<M>) -> Option<Result<QuerySnapshot<M>, DataStoreError>> {
        tokio::time::timeout(Duration::from_secs(1), sub.next_snapshot())
            .await
            .expect("snapshot timed out")
    }

    #[tokio::test]
    async fn save_assigns_and_preserves_timestamps() {
        let store = InMemoryDataStore::new();
        let blog = Blog::builder().name("blog1").id("b1").build();

        let first = store.save(blog.clone()).await.unwrap();
        let created = first.created_at().unwrap();
        assert_eq!(first.updated_at(), Some(created));

        tokio::time::sleep(Duration::from_millis(2)).await;
        let second = store.save(first.copy_of_builder().name("blog2").build()).await.unwrap();
        assert_eq!(second.created_at(), Some(created));
        assert!(second.updated_at().unwrap() > created);
        assert_eq!(store.count::<Blog>().unwrap(), 1);
    }

    #[tokio::test]
    async fn save_overrides_decoded_timestamps() {
        let store = InMemoryDataStore::new();
        let forged: Blog = from_json(serde_json::json!({
            "id": "b1",
            "name": "blog1",
            "createdAt": "2000-01-01T00:00:00Z",
            "updatedAt": "2000-01-01T00:00:00Z",
        }))
        .unwrap();

        let saved = store.save(forged.clone()).await.unwrap();
        assert!(saved.created_at() > forged.created_at());
        assert_eq!(saved.created_at(), saved.updated_at());
        assert_eq!(saved.name(), "blog1");
    }

    #[tokio::test]
    async fn save_replaces_by_id() {
        let store = InMemoryDataStore::new();
        store.save(Blog::builder().name("a").id("x").build()).await.unwrap();
        store.save(Blog::builder().name("b").id("x").build()).await.unwrap();

        let all: Vec<Blog> = store.query::<Blog>(QueryOptions::all()).await.unwrap().collect();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name(), "b");
    }

    #[tokio::test]
    async fn delete_missing_is_not_found() {
        let store = InMemoryDataStore::new();
        let err = store.delete(Blog::just_id("nope")).await.unwrap_err();
        assert!(matches!(err, DataStoreError::NotFound { model: "Blog", .. }));
    }

    #[tokio::test]
    async fn delete_by_just_id() {
        let store = InMemoryDataStore::new();
        store.save(Blog::builder().name("a").id("x").build()).await.unwrap();
        store.delete(Blog::just_id("x")).await.unwrap();
        assert_eq!(store.count::<Blog>().unwrap(), 0);
    }

    #[tokio::test]
    async fn query_filters_sorts_and_pages() {
        let store = InMemoryDataStore::new();
        for (id, name) in [("1", "c"), ("2", "a"), ("3", "b"), ("4", "other")] {
            store.save(Product::builder().name(name).id(id).build()).await.unwrap();
        }

        let options = QueryOptions::matching(Product::NAME.ne("other"))
            .sorted_by(Product::NAME.ascending())
            .paginated(Page::new(Some(2), Some(0)));
        let names: Vec<String> = store
            .query::<Product>(options)
            .await
            .unwrap()
            .map(|p| p.name().to_string())
            .collect();
        assert_eq!(names, ["a", "b"]);

        let second = QueryOptions::matching(Product::NAME.ne("other"))
            .sorted_by(Product::NAME.ascending())
            .paginated(Page::new(Some(2), Some(1)));
        let results = store.query::<Product>(second).await.unwrap();
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn query_rejects_foreign_fields() {
        let store = InMemoryDataStore::new();
        let err = store
            .query::<Blog>(QueryOptions::matching(Product::NAME.eq("x")))
            .await
            .unwrap_err();
        assert!(matches!(err, DataStoreError::InvalidQuery(_)));
    }

    #[tokio::test]
    async fn first_operation_publishes_ready_once() {
        let hub = Hub::new();
        let mut ready = hub.subscribe_to(DataStoreChannelEventName::Ready.as_str());
        let store = InMemoryDataStore::with_hub(hub.clone());

        store.save(Blog::builder().name("a").build()).await.unwrap();
        store.start().await.unwrap();

        assert!(ready.recv_timeout(Duration::from_millis(100)).await.is_some());
        assert!(ready.try_recv().is_none());
        assert!(store.is_running());
    }

    #[tokio::test]
    async fn clear_stops_and_announces() {
        let hub = Hub::new();
        let mut cleared = hub.subscribe_to(DataStoreChannelEventName::Cleared.as_str());
        let store = InMemoryDataStore::with_hub(hub);
        store.save(Blog::builder().name("a").build()).await.unwrap();

        store.clear().await.unwrap();

        assert!(!store.is_running());
        assert_eq!(store.count::<Blog>().unwrap(), 0);
        assert!(cleared.recv_timeout(Duration::from_millis(100)).await.is_some());
    }

    #[tokio::test]
    async fn observe_delivers_initial_then_updates() {
        let store = InMemoryDataStore::new();
        store.save(Blog::builder().name("old").id("1").build()).await.unwrap();

        let mut sub = store.observe_query::<Blog>(ObserveQueryOptions::new()).await.unwrap();
        let initial = next(&mut sub).await.unwrap().unwrap();
        assert_eq!(initial.len(), 1);

        let time: Time = "21:37:56.955359000".parse().unwrap();
        store
            .save(Blog::builder().name("new blog 7").id("2").aws_time_value(time).build())
            .await
            .unwrap();
        let updated = next(&mut sub).await.unwrap().unwrap();
        assert_eq!(updated.len(), 2);
        assert!(updated.items().iter().any(|b| b.name() == "new blog 7"));
    }

    #[tokio::test]
    async fn observe_ignores_other_models() {
        let store = InMemoryDataStore::new();
        let mut sub = store.observe_query::<Blog>(ObserveQueryOptions::new()).await.unwrap();
        assert!(next(&mut sub).await.unwrap().unwrap().is_empty());

        let order = Order::builder()
            .customer_id("c1")
            .account_representative_id("AR1")
            .product_id("p1")
            .status("InProcess")
            .amount(1)
            .date("2022-01-01")
            .build();
        store.save(order).await.unwrap();

        let idle = tokio::time::timeout(Duration::from_millis(50), sub.next_snapshot()).await;
        assert!(idle.is_err());
    }

    #[tokio::test]
    async fn cancel_completes_the_stream() {
        let store = InMemoryDataStore::new();
        let mut sub = store.observe_query::<Blog>(ObserveQueryOptions::new()).await.unwrap();
        next(&mut sub).await.unwrap().unwrap();

        let handle = sub.cancelable();
        handle.cancel();
        handle.cancel();
        assert!(handle.is_cancelled());
        assert!(next(&mut sub).await.is_none());
    }

    #[tokio::test]
    async fn clear_completes_live_queries() {
        let store = InMemoryDataStore::new();
        let mut sub = store.observe_query::<Blog>(ObserveQueryOptions::new()).await.unwrap();
        next(&mut sub).await.unwrap().unwrap();

        store.clear().await.unwrap();
        assert!(next(&mut sub).await.is_none());
    }

    #[tokio::test]
    async fn observe_applies_predicate_and_sort() {
        let store = InMemoryDataStore::new();
        let options = ObserveQueryOptions::matching(Blog::NAME.begins_with("new"))
            .sorted_by(Blog::NAME.descending());
        let mut sub = store.observe_query::<Blog>(options).await.unwrap();
        next(&mut sub).await.unwrap().unwrap();

        store.save(Blog::builder().name("new blog 6").build()).await.unwrap();
        next(&mut sub).await.unwrap().unwrap();
        store.save(Blog::builder().name("new blog 7").build()).await.unwrap();
        next(&mut sub).await.unwrap().unwrap();
        store.save(Blog::builder().name("blog1").build()).await.unwrap();

        let names: Vec<String> = next(&mut sub)
            .await
            .unwrap()
            .unwrap()
            .into_items()
            .into_iter()
            .map(|b| b.name().to_string())
            .collect();
        assert_eq!(names, ["new blog 7", "new blog 6"]);
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn order(i: usize, amount: i32) -> Order {
            Order::builder()
                .customer_id("c1")
                .account_representative_id("AR1")
                .product_id("P1")
                .status("InProcess")
                .amount(amount)
                .date("2022-01-20")
                .id(format!("o{i:03}"))
                .build()
        }

        fn seeded(amounts: &[i32]) -> (tokio::runtime::Runtime, InMemoryDataStore) {
            let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
            let store = InMemoryDataStore::new();
            rt.block_on(async {
                for (i, amount) in amounts.iter().enumerate() {
                    store.save(order(i, *amount)).await.unwrap();
                }
            });
            (rt, store)
        }

        fn ids(orders: impl IntoIterator<Item = Order>) -> Vec<String> {
            orders.into_iter().map(|o| o.id().as_str().to_string()).collect()
        }

        proptest! {
            /// Walking every page returns the unpaged sorted result, in order.
            #[test]
            fn pages_concatenate_to_the_full_result(
                amounts in proptest::collection::vec(0i32..100, 0..40),
                limit in 1u32..8,
            ) {
                let (rt, store) = seeded(&amounts);
                let sorted = QueryOptions::all().sorted_by(Order::ID.descending());

                let full = rt.block_on(store.query::<Order>(sorted.clone())).unwrap();
                let full = ids(full);

                let mut paged = Vec::new();
                for index in 0.. {
                    let page = Page::new(Some(limit), Some(index));
                    let chunk = rt.block_on(store.query::<Order>(sorted.clone().paginated(page))).unwrap();
                    if chunk.len() == 0 {
                        break;
                    }
                    prop_assert!(chunk.len() <= limit as usize);
                    paged.extend(ids(chunk));
                }
                prop_assert_eq!(paged, full);
            }

            /// A range query keeps exactly the records a plain filter keeps.
            #[test]
            fn range_query_matches_a_linear_filter(
                amounts in proptest::collection::vec(0i32..100, 0..40),
                low in 0i32..100,
                span in 0i32..50,
            ) {
                let (rt, store) = seeded(&amounts);
                let high = low + span;
                let options = QueryOptions::matching(Order::AMOUNT.between(low, high))
                    .sorted_by(Order::ID.ascending());

                let found = ids(rt.block_on(store.query::<Order>(options)).unwrap());
                let expected: Vec<String> = amounts
                    .iter()
                    .enumerate()
                    .filter(|(_, a)| (low..=high).contains(*a))
                    .map(|(i, _)| format!("o{i:03}"))
                    .collect();
                prop_assert_eq!(found, expected);
            }
        }
    }
}
