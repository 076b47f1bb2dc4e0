use tracing::{debug, instrument};

use crate::actor_framework::ResourceClient;
use crate::domain::{Product, ProductCreate, ProductId};
use crate::product_actor::{ProductAction, ProductActionResult, ProductError};

/// Client for the catalog actor. Every stock change goes through one of the
/// stock actions so it is applied atomically by the actor.
#[derive(Clone)]
pub struct ProductClient {
    inner: ResourceClient<Product>,
}

impl_basic_client!(ProductClient, Product, ProductError, product);

fn unexpected(result: ProductActionResult) -> ProductError {
    ProductError::ActorCommunicationError(format!("Unexpected result: {:?}", result))
}

impl ProductClient {
    #[instrument(skip(self), fields(name = %params.name))]
    pub async fn create_product(&self, params: ProductCreate) -> Result<ProductId, ProductError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(ProductError::from)
    }

    #[instrument(skip(self))]
    pub async fn check_stock(&self, id: ProductId) -> Result<u32, ProductError> {
        debug!("Sending request");
        match self.inner.perform_action(id, ProductAction::CheckStock).await? {
            ProductActionResult::CheckStock(level) => Ok(level),
            other => Err(unexpected(other)),
        }
    }

    /// Takes `quantity` units out of stock, returning what is left.
    #[instrument(skip(self))]
    pub async fn reserve_stock(&self, id: ProductId, quantity: u32) -> Result<u32, ProductError> {
        debug!("Sending request");
        match self.inner.perform_action(id, ProductAction::ReserveStock(quantity)).await? {
            ProductActionResult::ReserveStock(remaining) => Ok(remaining),
            other => Err(unexpected(other)),
        }
    }

    /// Puts `quantity` units back into stock, returning the new level.
    #[instrument(skip(self))]
    pub async fn release_stock(&self, id: ProductId, quantity: u32) -> Result<u32, ProductError> {
        debug!("Sending request");
        match self.inner.perform_action(id, ProductAction::ReleaseStock(quantity)).await? {
            ProductActionResult::ReleaseStock(level) => Ok(level),
            other => Err(unexpected(other)),
        }
    }

    /// Products whose name or description contains `query`. An empty query matches nothing.
    #[instrument(skip(self))]
    pub async fn search_products(&self, query: &str) -> Result<Vec<Product>, ProductError> {
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let products = self.list_products().await?;
        Ok(products.into_iter().filter(|p| p.matches(query)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_framework::{create_mock_client, expect_list};
    use rust_decimal_macros::dec;

    fn product(id: ProductId, name: &str, description: &str) -> Product {
        Product {
            id,
            name: name.to_string(),
            description: description.to_string(),
            price: dec!(1.00),
            stock: 1,
        }
    }

    #[tokio::test]
    async fn test_search_filters_name_and_description() {
        let (inner, mut receiver) = create_mock_client::<Product>(10);
        let client = ProductClient::new(inner);

        let search = tokio::spawn(async move { client.search_products("tea").await });

        let responder = expect_list(&mut receiver).await.expect("Expected List request");
        responder
            .send(Ok(vec![
                product(1, "Green tea", ""),
                product(2, "Mug", "for tea and coffee"),
                product(3, "Teapot", "cast iron"),
            ]))
            .unwrap();

        let found: Vec<ProductId> = search.await.unwrap().unwrap().into_iter().map(|p| p.id).collect();
        assert_eq!(found, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_empty_search_skips_the_actor() {
        let (inner, mut receiver) = create_mock_client::<Product>(10);
        let client = ProductClient::new(inner);

        assert_eq!(client.search_products("").await, Ok(vec![]));
        drop(client);
        assert!(receiver.recv().await.is_none());
    }
}
