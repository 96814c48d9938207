//! Record Store
//!
//! The source of truth for product records, plus the startup seeding routine.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{AppError, Result};
use crate::models::Product;

// == Product Repository ==
/// Key-value access to stored products.
#[async_trait]
pub trait ProductRepository: Send + Sync + 'static {
    async fn find_by_id(&self, id: &str) -> Result<Option<Product>>;

    /// Every stored product, ordered by id.
    async fn find_all(&self) -> Result<Vec<Product>>;

    async fn save(&self, product: Product) -> Result<()>;

    async fn save_all(&self, products: Vec<Product>) -> Result<()> {
        for product in products {
            self.save(product).await?;
        }
        Ok(())
    }
}

// == In-Memory Repository ==
/// A `BTreeMap`-backed repository that counts reads and can be taken offline.
///
/// An optional per-read latency stands in for the round trip to a remote store.
#[derive(Debug)]
pub struct InMemoryProductRepository {
    products: RwLock<BTreeMap<String, Product>>,
    reads: AtomicU64,
    available: AtomicBool,
    read_latency: Option<Duration>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self {
            products: RwLock::new(BTreeMap::new()),
            reads: AtomicU64::new(0),
            available: AtomicBool::new(true),
            read_latency: None,
        }
    }

    pub fn with_read_latency(mut self, latency: Duration) -> Self {
        self.read_latency = Some(latency);
        self
    }

    /// Number of `find_by_id` calls that reached the store.
    pub fn read_count(&self) -> u64 {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn ensure_available(&self) -> Result<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(AppError::StoreUnavailable(
                "product store is not reachable".to_string(),
            ))
        }
    }
}

impl Default for InMemoryProductRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<Product>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.read_latency {
            tokio::time::sleep(latency).await;
        }
        self.ensure_available()?;
        Ok(self.products.read().await.get(id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Product>> {
        self.ensure_available()?;
        Ok(self.products.read().await.values().cloned().collect())
    }

    async fn save(&self, product: Product) -> Result<()> {
        self.ensure_available()?;
        self.products
            .write()
            .await
            .insert(product.id.clone(), product);
        Ok(())
    }

    async fn save_all(&self, products: Vec<Product>) -> Result<()> {
        self.ensure_available()?;
        let mut stored = self.products.write().await;
        for product in products {
            stored.insert(product.id.clone(), product);
        }
        Ok(())
    }
}

// == Seeding ==
/// Writes products `1..=size` to the repository.
///
/// Product `i` is named `Product {i} name`, described as
/// `Product {i} description` and priced at `i`.
pub async fn seed_catalog(repository: &dyn ProductRepository, size: usize) -> Result<()> {
    debug!(
        "Storing product catalog with {} products (this may take a while)",
        size
    );

    let products = (1..=size)
        .map(|i| {
            Product::new(
                i.to_string(),
                format!("Product {} name", i),
                format!("Product {} description", i),
                i as f64,
            )
        })
        .collect::<Result<Vec<_>>>()?;

    repository.save_all(products).await?;
    debug!("Product catalog stored");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_find_by_id_counts_reads() {
        let repo = InMemoryProductRepository::new();
        repo.save(Product::new("1", "Name 1", "Description 1", 1.0).unwrap())
            .await
            .unwrap();

        assert!(repo.find_by_id("1").await.unwrap().is_some());
        assert!(repo.find_by_id("2").await.unwrap().is_none());
        assert_eq!(repo.read_count(), 2);
    }

    #[tokio::test]
    async fn test_unavailable_store_fails_reads() {
        let repo = InMemoryProductRepository::new();
        repo.set_available(false);

        assert!(matches!(
            repo.find_by_id("1").await,
            Err(AppError::StoreUnavailable(_))
        ));
        assert!(repo.find_all().await.is_err());
    }

    #[tokio::test]
    async fn test_seed_catalog() {
        let repo = InMemoryProductRepository::new();
        seed_catalog(&repo, 25).await.unwrap();

        let all = repo.find_all().await.unwrap();
        assert_eq!(all.len(), 25);

        let product = repo.find_by_id("7").await.unwrap().unwrap();
        assert_eq!(product.name, "Product 7 name");
        assert_eq!(product.description, "Product 7 description");
        assert_eq!(product.price, 7.0);
    }

    #[tokio::test]
    async fn test_default_save_all_delegates_to_save() {
        struct Counting(RwLock<Vec<Product>>);

        #[async_trait]
        impl ProductRepository for Counting {
            async fn find_by_id(&self, _id: &str) -> Result<Option<Product>> {
                Ok(None)
            }
            async fn find_all(&self) -> Result<Vec<Product>> {
                Ok(self.0.read().await.clone())
            }
            async fn save(&self, product: Product) -> Result<()> {
                self.0.write().await.push(product);
                Ok(())
            }
        }

        let repo = Counting(RwLock::new(Vec::new()));
        seed_catalog(&repo, 3).await.unwrap();
        assert_eq!(repo.find_all().await.unwrap().len(), 3);
    }
}
