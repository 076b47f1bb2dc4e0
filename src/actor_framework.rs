use std::collections::BTreeMap;
use std::fmt::{Debug, Display};
use std::hash::Hash;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, instrument, warn};

// =============================================================================
// 1. THE ABSTRACTION (Traits with Hooks, Params, and Actions)
// =============================================================================

/// Trait that any record must implement to be managed by [`ResourceActor`].
///
/// The actor owns every record of one kind and handles one request at a time,
/// so a hook or action runs with exclusive access to the record it touches.
pub trait Entity: Clone + Debug + Send + Sync + 'static {
    /// Name used in log fields.
    const KIND: &'static str;

    type Id: Eq + Hash + Ord + Clone + Send + Sync + Display + Debug;
    type CreateParams: Send + Sync + Debug;
    type Patch: Send + Sync + Debug;

    // --- Custom Actions ---
    type Action: Send + Sync + Debug;
    type ActionResult: Send + Sync + Debug;

    /// Domain error raised by hooks and actions.
    type Error: std::error::Error + Clone + Send + Sync + 'static;

    /// Construct the full record from the assigned id and creation params.
    fn from_create_params(id: Self::Id, params: Self::CreateParams) -> Result<Self, Self::Error>;

    // --- Lifecycle Hooks ---

    fn on_create(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
    fn on_update(&mut self, patch: Self::Patch) -> Result<(), Self::Error>;
    fn on_delete(&self) -> Result<(), Self::Error> {
        Ok(())
    }

    // --- Action Handler ---

    /// Handle a domain-specific action. A rejected action must leave `self` unchanged.
    fn handle_action(&mut self, action: Self::Action) -> Result<Self::ActionResult, Self::Error>;
}

/// Failures surfaced by [`ResourceClient`].
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FrameworkError<T: Entity> {
    #[error("Record not found: {0}")]
    NotFound(T::Id),
    #[error("{0}")]
    Rejected(T::Error),
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped")]
    ActorDropped,
}

// =============================================================================
// 2. THE GENERIC MESSAGES
// =============================================================================

pub type Response<R, T> = oneshot::Sender<Result<R, FrameworkError<T>>>;

#[derive(Debug)]
pub enum ResourceRequest<T: Entity> {
    Create {
        params: T::CreateParams,
        respond_to: Response<T::Id, T>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>, T>,
    },
    List {
        respond_to: Response<Vec<T>, T>,
    },
    Update {
        id: T::Id,
        patch: T::Patch,
        respond_to: Response<T, T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<(), T>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult, T>,
    },
}

// =============================================================================
// 3. THE GENERIC ACTOR SERVER
// =============================================================================

pub struct ResourceActor<T: Entity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: BTreeMap<T::Id, T>,
    next_id_fn: Box<dyn Fn() -> T::Id + Send + Sync>,
}

impl<T: Entity> ResourceActor<T> {
    pub fn new(
        buffer_size: usize,
        next_id_fn: impl Fn() -> T::Id + Send + Sync + 'static,
    ) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: BTreeMap::new(),
            next_id_fn: Box::new(next_id_fn),
        };
        let client = ResourceClient::new(sender);
        (actor, client)
    }

    /// Runs until every client has been dropped.
    #[instrument(name = "resource_actor", skip(self), fields(kind = T::KIND))]
    pub async fn run(mut self) {
        info!("ResourceActor starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    let _ = respond_to.send(self.handle_create(params));
                }
                ResourceRequest::Get { id, respond_to } => {
                    debug!(id = %id, "Processing get request");
                    let _ = respond_to.send(Ok(self.store.get(&id).cloned()));
                }
                ResourceRequest::List { respond_to } => {
                    debug!(count = self.store.len(), "Processing list request");
                    let _ = respond_to.send(Ok(self.store.values().cloned().collect()));
                }
                ResourceRequest::Update { id, patch, respond_to } => {
                    let _ = respond_to.send(self.handle_update(id, patch));
                }
                ResourceRequest::Delete { id, respond_to } => {
                    let _ = respond_to.send(self.handle_delete(id));
                }
                ResourceRequest::Action { id, action, respond_to } => {
                    let _ = respond_to.send(self.handle_action(id, action));
                }
            }
        }

        info!("ResourceActor stopped");
    }

    fn handle_create(&mut self, params: T::CreateParams) -> Result<T::Id, FrameworkError<T>> {
        let id = (self.next_id_fn)();
        let mut item = T::from_create_params(id.clone(), params).map_err(FrameworkError::Rejected)?;
        item.on_create().map_err(FrameworkError::Rejected)?;
        self.store.insert(id.clone(), item);
        info!(id = %id, "Created");
        Ok(id)
    }

    fn handle_update(&mut self, id: T::Id, patch: T::Patch) -> Result<T, FrameworkError<T>> {
        let item = self
            .store
            .get_mut(&id)
            .ok_or_else(|| FrameworkError::NotFound(id.clone()))?;

        // Patch a copy so a rejected update leaves the stored record untouched.
        let mut updated = item.clone();
        updated.on_update(patch).map_err(FrameworkError::Rejected)?;
        *item = updated.clone();
        Ok(updated)
    }

    fn handle_delete(&mut self, id: T::Id) -> Result<(), FrameworkError<T>> {
        let item = self
            .store
            .get(&id)
            .ok_or_else(|| FrameworkError::NotFound(id.clone()))?;
        item.on_delete().map_err(FrameworkError::Rejected)?;
        self.store.remove(&id);
        info!(id = %id, "Deleted");
        Ok(())
    }

    fn handle_action(
        &mut self,
        id: T::Id,
        action: T::Action,
    ) -> Result<T::ActionResult, FrameworkError<T>> {
        let item = self
            .store
            .get_mut(&id)
            .ok_or_else(|| FrameworkError::NotFound(id.clone()))?;
        item.handle_action(action).map_err(|e| {
            warn!(id = %id, error = %e, "Action rejected");
            FrameworkError::Rejected(e)
        })
    }
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

#[derive(Clone)]
pub struct ResourceClient<T: Entity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

impl<T: Entity> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(Response<R, T>) -> ResourceRequest<T>,
    ) -> Result<R, FrameworkError<T>> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn create(&self, params: T::CreateParams) -> Result<T::Id, FrameworkError<T>> {
        self.request(|respond_to| ResourceRequest::Create { params, respond_to }).await
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, FrameworkError<T>> {
        self.request(|respond_to| ResourceRequest::Get { id, respond_to }).await
    }

    pub async fn list(&self) -> Result<Vec<T>, FrameworkError<T>> {
        self.request(|respond_to| ResourceRequest::List { respond_to }).await
    }

    pub async fn update(&self, id: T::Id, patch: T::Patch) -> Result<T, FrameworkError<T>> {
        self.request(|respond_to| ResourceRequest::Update { id, patch, respond_to }).await
    }

    pub async fn delete(&self, id: T::Id) -> Result<(), FrameworkError<T>> {
        self.request(|respond_to| ResourceRequest::Delete { id, respond_to }).await
    }

    pub async fn perform_action(
        &self,
        id: T::Id,
        action: T::Action,
    ) -> Result<T::ActionResult, FrameworkError<T>> {
        self.request(|respond_to| ResourceRequest::Action { id, action, respond_to }).await
    }
}

// =============================================================================
// 5. EXAMPLE USAGE (Test)
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    // --- Record Definition ---

    #[derive(Clone, Debug, PartialEq)]
    struct Bin {
        id: u64,
        label: String,
        units: u32,
    }

    #[derive(Debug)]
    struct BinCreate {
        label: String,
        units: u32,
    }

    #[derive(Debug)]
    struct BinPatch {
        label: Option<String>,
    }

    #[derive(Debug)]
    enum BinAction {
        Take(u32),
    }

    #[derive(Debug, Clone, PartialEq, Error)]
    enum BinError {
        #[error("label must not be empty")]
        EmptyLabel,
        #[error("only {0} units left")]
        Short(u32),
    }

    impl Entity for Bin {
        const KIND: &'static str = "bin";

        type Id = u64;
        type CreateParams = BinCreate;
        type Patch = BinPatch;
        type Action = BinAction;
        type ActionResult = u32;
        type Error = BinError;

        fn from_create_params(id: u64, params: BinCreate) -> Result<Self, BinError> {
            Ok(Self { id, label: params.label, units: params.units })
        }

        fn on_update(&mut self, patch: BinPatch) -> Result<(), BinError> {
            if let Some(label) = patch.label {
                if label.is_empty() {
                    return Err(BinError::EmptyLabel);
                }
                self.label = label;
            }
            Ok(())
        }

        fn handle_action(&mut self, action: BinAction) -> Result<u32, BinError> {
            match action {
                BinAction::Take(n) if n <= self.units => {
                    self.units -= n;
                    Ok(self.units)
                }
                BinAction::Take(_) => Err(BinError::Short(self.units)),
            }
        }
    }

    fn start() -> ResourceClient<Bin> {
        let counter = Arc::new(AtomicU64::new(1));
        let next_id = move || counter.fetch_add(1, Ordering::SeqCst);
        let (actor, client) = ResourceActor::new(10, next_id);
        tokio::spawn(actor.run());
        client
    }

    // --- Tests ---

    #[tokio::test]
    async fn test_resource_actor_with_actions() {
        let client = start();

        let id = client.create(BinCreate { label: "a".into(), units: 5 }).await.unwrap();
        assert_eq!(id, 1);

        let left = client.perform_action(id, BinAction::Take(3)).await.unwrap();
        assert_eq!(left, 2);

        let err = client.perform_action(id, BinAction::Take(3)).await.unwrap_err();
        assert_eq!(err, FrameworkError::Rejected(BinError::Short(2)));

        let bin = client.get(id).await.unwrap().unwrap();
        assert_eq!(bin.units, 2);
    }

    #[tokio::test]
    async fn test_rejected_update_keeps_record() {
        let client = start();
        let id = client.create(BinCreate { label: "keep".into(), units: 1 }).await.unwrap();

        let err = client.update(id, BinPatch { label: Some(String::new()) }).await.unwrap_err();
        assert_eq!(err, FrameworkError::Rejected(BinError::EmptyLabel));
        assert_eq!(client.get(id).await.unwrap().unwrap().label, "keep");
    }

    #[tokio::test]
    async fn test_missing_ids_and_listing_order() {
        let client = start();
        for label in ["x", "y", "z"] {
            client.create(BinCreate { label: label.into(), units: 0 }).await.unwrap();
        }
        client.delete(2).await.unwrap();

        let labels: Vec<String> = client.list().await.unwrap().into_iter().map(|b| b.label).collect();
        assert_eq!(labels, vec!["x", "z"]);

        assert_eq!(client.delete(2).await, Err(FrameworkError::NotFound(2)));
        assert!(matches!(
            client.perform_action(42, BinAction::Take(1)).await,
            Err(FrameworkError::NotFound(_))
        ));
    }
}
