use std::collections::HashMap;

use tokio::sync::RwLock;
use uuid::Uuid;

/// A persisted record with a stable identity.
pub trait Document: Clone + Send + Sync + 'static {
    fn id(&self) -> Uuid;
}

/// A typed document collection. Find/update-by-id/create semantics, with
/// per-document write atomicity and nothing more (no cross-document
/// transactions).
pub struct Collection<T> {
    docs: RwLock<HashMap<Uuid, T>>,
}

impl<T: Document> Collection<T> {
    pub fn new() -> Self {
        Self {
            docs: RwLock::new(HashMap::new()),
        }
    }

    pub async fn insert(&self, doc: T) -> T {
        let mut docs = self.docs.write().await;
        docs.insert(doc.id(), doc.clone());
        doc
    }

    pub async fn get(&self, id: &Uuid) -> Option<T> {
        self.docs.read().await.get(id).cloned()
    }

    pub async fn all(&self) -> Vec<T> {
        self.docs.read().await.values().cloned().collect()
    }

    pub async fn filter<P>(&self, pred: P) -> Vec<T>
    where
        P: Fn(&T) -> bool,
    {
        self.docs
            .read()
            .await
            .values()
            .filter(|d| pred(d))
            .cloned()
            .collect()
    }

    pub async fn find_one<P>(&self, pred: P) -> Option<T>
    where
        P: Fn(&T) -> bool,
    {
        self.docs.read().await.values().find(|d| pred(d)).cloned()
    }

    pub async fn count<P>(&self, pred: P) -> usize
    where
        P: Fn(&T) -> bool,
    {
        self.docs.read().await.values().filter(|d| pred(d)).count()
    }

    /// Applies `f` to the document under the write lock. Returns the updated
    /// document, or `None` when the id does not resolve.
    pub async fn update<F>(&self, id: &Uuid, f: F) -> Option<T>
    where
        F: FnOnce(&mut T),
    {
        let mut docs = self.docs.write().await;
        let doc = docs.get_mut(id)?;
        f(doc);
        Some(doc.clone())
    }

    /// Conditional update: `f` runs against a working copy under the write
    /// lock and the result is committed only on `Ok`. On `Err` the stored
    /// document is left untouched.
    pub async fn try_update<F, E>(&self, id: &Uuid, f: F) -> Option<Result<T, E>>
    where
        F: FnOnce(&mut T) -> Result<(), E>,
    {
        let mut docs = self.docs.write().await;
        let doc = docs.get_mut(id)?;
        let mut candidate = doc.clone();
        Some(match f(&mut candidate) {
            Ok(()) => {
                *doc = candidate.clone();
                Ok(candidate)
            }
            Err(e) => Err(e),
        })
    }

    /// Applies `f` to every document matching `pred`; returns how many
    /// were touched.
    pub async fn update_where<P, F>(&self, pred: P, f: F) -> usize
    where
        P: Fn(&T) -> bool,
        F: Fn(&mut T),
    {
        let mut docs = self.docs.write().await;
        let mut touched = 0;
        for doc in docs.values_mut().filter(|d| pred(d)) {
            f(doc);
            touched += 1;
        }
        touched
    }

    /// Updates the first document matching `pred`, or inserts the one
    /// produced by `insert` when none matches. Runs under a single write
    /// lock so concurrent intakes of the same batch cannot duplicate it.
    pub async fn upsert_where<P, F, I>(&self, pred: P, update: F, insert: I) -> (T, bool)
    where
        P: Fn(&T) -> bool,
        F: FnOnce(&mut T),
        I: FnOnce() -> T,
    {
        let mut docs = self.docs.write().await;
        if let Some(doc) = docs.values_mut().find(|d| pred(d)) {
            update(doc);
            return (doc.clone(), false);
        }
        let doc = insert();
        docs.insert(doc.id(), doc.clone());
        (doc, true)
    }

    pub async fn remove(&self, id: &Uuid) -> Option<T> {
        self.docs.write().await.remove(id)
    }
}

impl<T: Document> Default for Collection<T> {
    fn default() -> Self {
        Self::new()
    }
}
