use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use shared::{
    domain::{AddressId, CustomerId},
    error::{ApiError, ErrorBody},
    protocol::{
        Address, AddressDraft, AddressSearchHit, AddressSearchParams, CreatedCustomer, Customer,
        CustomerDraft, CustomerListParams, DataEnvelope, ListBody, PageResult, PaginatedEnvelope,
    },
};
use tracing::{debug, warn};

pub mod address_editor;
pub mod address_search;
pub mod detail;
pub mod error;
pub mod form;
pub mod listing;
pub mod outcome;
pub mod validation;
pub mod wizard;

pub use error::GatewayError;

pub type GatewayResult<T> = std::result::Result<T, GatewayError>;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// The remote customer/address service as the controllers see it.
#[async_trait]
pub trait CrmApi: Send + Sync {
    async fn list_customers(&self, params: &CustomerListParams)
        -> GatewayResult<PageResult<Customer>>;
    async fn get_customer(&self, id: CustomerId) -> GatewayResult<Customer>;
    async fn create_customer(&self, draft: &CustomerDraft) -> GatewayResult<CustomerId>;
    async fn update_customer(&self, id: CustomerId, draft: &CustomerDraft) -> GatewayResult<()>;
    async fn delete_customer(&self, id: CustomerId) -> GatewayResult<()>;
    async fn list_addresses(&self, customer_id: CustomerId) -> GatewayResult<Vec<Address>>;
    async fn add_address(&self, customer_id: CustomerId, draft: &AddressDraft)
        -> GatewayResult<()>;
    async fn update_address(&self, address_id: AddressId, draft: &AddressDraft)
        -> GatewayResult<()>;
    async fn delete_address(&self, address_id: AddressId) -> GatewayResult<()>;
    async fn search_addresses(
        &self,
        params: &AddressSearchParams,
    ) -> GatewayResult<Vec<AddressSearchHit>>;
    async fn customers_with_multiple_addresses(&self) -> GatewayResult<Vec<Customer>>;
    async fn customers_with_single_address(&self) -> GatewayResult<Vec<Customer>>;
}

/// `CrmApi` over HTTP/JSON.
#[derive(Debug, Clone)]
pub struct HttpCrmClient {
    http: Client,
    base_url: String,
}

impl HttpCrmClient {
    pub fn new(base_url: impl Into<String>) -> GatewayResult<Self> {
        Self::with_timeout(base_url, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> GatewayResult<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_http_client(http, base_url))
    }

    pub fn with_http_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        debug!(method = %method, path, "api request");
        self.http
            .request(method, format!("{}{path}", self.base_url))
    }

    async fn send(&self, request: RequestBuilder) -> GatewayResult<Response> {
        let response = request.send().await.map_err(|err| {
            warn!(error = %err, "api transport failure");
            GatewayError::Transport(err)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let raw = response.bytes().await.unwrap_or_default();
        let body = serde_json::from_slice::<ErrorBody>(&raw).unwrap_or_default();
        let api = ApiError::from_response(status.as_u16(), &body);
        warn!(status = status.as_u16(), message = %api.message, "api error response");
        Err(GatewayError::Remote(api))
    }

    async fn read_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        context: &'static str,
    ) -> GatewayResult<T> {
        let raw = self.send(request).await?.bytes().await?;
        serde_json::from_slice(&raw).map_err(|source| GatewayError::Decode { context, source })
    }

    async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> GatewayResult<Response> {
        self.send(self.request(method, path).json(body)).await
    }
}

#[async_trait]
impl CrmApi for HttpCrmClient {
    async fn list_customers(
        &self,
        params: &CustomerListParams,
    ) -> GatewayResult<PageResult<Customer>> {
        let envelope: PaginatedEnvelope<Customer> = self
            .read_json(
                self.request(Method::GET, "/customers").query(params),
                "customer list",
            )
            .await?;
        Ok(envelope.into_page(params.page))
    }

    async fn get_customer(&self, id: CustomerId) -> GatewayResult<Customer> {
        let envelope: DataEnvelope<Customer> = self
            .read_json(
                self.request(Method::GET, &format!("/customers/{id}")),
                "customer",
            )
            .await?;
        Ok(envelope.data)
    }

    async fn create_customer(&self, draft: &CustomerDraft) -> GatewayResult<CustomerId> {
        let raw = self
            .send_json(Method::POST, "/customers", draft)
            .await?
            .bytes()
            .await?;
        let created: CreatedCustomer = serde_json::from_slice(&raw).map_err(|source| {
            GatewayError::Decode {
                context: "created customer",
                source,
            }
        })?;
        Ok(created.id)
    }

    async fn update_customer(&self, id: CustomerId, draft: &CustomerDraft) -> GatewayResult<()> {
        self.send_json(Method::PUT, &format!("/customers/{id}"), draft)
            .await?;
        Ok(())
    }

    async fn delete_customer(&self, id: CustomerId) -> GatewayResult<()> {
        self.send(self.request(Method::DELETE, &format!("/customers/{id}")))
            .await?;
        Ok(())
    }

    async fn list_addresses(&self, customer_id: CustomerId) -> GatewayResult<Vec<Address>> {
        let body: ListBody<Address> = self
            .read_json(
                self.request(Method::GET, &format!("/customers/{customer_id}/addresses")),
                "address list",
            )
            .await?;
        Ok(body.into_vec())
    }

    async fn add_address(
        &self,
        customer_id: CustomerId,
        draft: &AddressDraft,
    ) -> GatewayResult<()> {
        self.send_json(
            Method::POST,
            &format!("/customers/{customer_id}/addresses"),
            draft,
        )
        .await?;
        Ok(())
    }

    async fn update_address(
        &self,
        address_id: AddressId,
        draft: &AddressDraft,
    ) -> GatewayResult<()> {
        self.send_json(
            Method::PUT,
            &format!("/customers/addresses/{address_id}"),
            draft,
        )
        .await?;
        Ok(())
    }

    async fn delete_address(&self, address_id: AddressId) -> GatewayResult<()> {
        self.send(self.request(
            Method::DELETE,
            &format!("/customers/addresses/{address_id}"),
        ))
        .await?;
        Ok(())
    }

    async fn search_addresses(
        &self,
        params: &AddressSearchParams,
    ) -> GatewayResult<Vec<AddressSearchHit>> {
        let body: ListBody<AddressSearchHit> = self
            .read_json(
                self.request(Method::GET, "/addresses/search").query(params),
                "address search",
            )
            .await?;
        Ok(body.into_vec())
    }

    async fn customers_with_multiple_addresses(&self) -> GatewayResult<Vec<Customer>> {
        let body: ListBody<Customer> = self
            .read_json(
                self.request(Method::GET, "/customers/multiple-addresses"),
                "multiple-address customers",
            )
            .await?;
        Ok(body.into_vec())
    }

    async fn customers_with_single_address(&self) -> GatewayResult<Vec<Customer>> {
        let body: ListBody<Customer> = self
            .read_json(
                self.request(Method::GET, "/customers/single-address"),
                "single-address customers",
            )
            .await?;
        Ok(body.into_vec())
    }
}

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
