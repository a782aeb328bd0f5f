//! Recording in-memory `CrmApi` for controller tests.

use std::{collections::HashSet, sync::Mutex};

use async_trait::async_trait;
use shared::{
    domain::{AddressId, CustomerId},
    error::{ApiError, ErrorCode},
    protocol::{
        Address, AddressDraft, AddressSearchHit, AddressSearchParams, Customer, CustomerDraft,
        CustomerListParams, PageResult,
    },
};

use crate::{CrmApi, GatewayError, GatewayResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListCustomers(CustomerListParams),
    GetCustomer(CustomerId),
    CreateCustomer(CustomerDraft),
    UpdateCustomer(CustomerId, CustomerDraft),
    DeleteCustomer(CustomerId),
    ListAddresses(CustomerId),
    AddAddress(CustomerId, AddressDraft),
    UpdateAddress(AddressId, AddressDraft),
    DeleteAddress(AddressId),
    SearchAddresses(AddressSearchParams),
    MultipleAddresses,
    SingleAddress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    ListCustomers,
    GetCustomer,
    CreateCustomer,
    UpdateCustomer,
    DeleteCustomer,
    ListAddresses,
    AddAddress,
    UpdateAddress,
    SearchAddresses,
}

pub struct RecordingApi {
    calls: Mutex<Vec<Call>>,
    failing: HashSet<Op>,
    failure_message: Option<String>,
    pub new_customer_id: CustomerId,
    pub hits: Vec<AddressSearchHit>,
}

impl Default for RecordingApi {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failing: HashSet::new(),
            failure_message: None,
            new_customer_id: CustomerId(501),
            hits: Vec::new(),
        }
    }
}

impl RecordingApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(mut self, op: Op) -> Self {
        self.failing.insert(op);
        self
    }

    /// Message carried by injected failures; `None` means an empty error body.
    pub fn with_failure_message(mut self, message: impl Into<String>) -> Self {
        self.failure_message = Some(message.into());
        self
    }

    pub fn with_hits(mut self, hits: Vec<AddressSearchHit>) -> Self {
        self.hits = hits;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn record(&self, op: Option<Op>, call: Call) -> GatewayResult<()> {
        self.calls.lock().expect("calls lock").push(call);
        match op {
            Some(op) if self.failing.contains(&op) => Err(GatewayError::Remote(ApiError::new(
                ErrorCode::Internal,
                self.failure_message.clone().unwrap_or_default(),
            ))),
            _ => Ok(()),
        }
    }
}

pub fn sample_customer(id: i64) -> Customer {
    Customer {
        id: CustomerId(id),
        first_name: "Asha".into(),
        last_name: "Rao".into(),
        phone_number: "9876543210".into(),
        email: Some("asha@example.in".into()),
        created_at: None,
        updated_at: None,
        address_count: 1,
        has_only_one_address: true,
    }
}

pub fn sample_address(id: i64, customer_id: i64) -> Address {
    Address {
        id: AddressId(id),
        customer_id: CustomerId(customer_id),
        address_details: "12 MG Road".into(),
        city: "Pune".into(),
        state: "MH".into(),
        pin_code: "411001".into(),
        is_primary: true,
        created_at: None,
    }
}

pub fn sample_hit(id: i64) -> AddressSearchHit {
    AddressSearchHit {
        address: sample_address(id, 1),
        first_name: "Asha".into(),
        last_name: "Rao".into(),
        phone_number: "9876543210".into(),
    }
}

#[async_trait]
impl CrmApi for RecordingApi {
    async fn list_customers(
        &self,
        params: &CustomerListParams,
    ) -> GatewayResult<PageResult<Customer>> {
        self.record(Some(Op::ListCustomers), Call::ListCustomers(params.clone()))?;
        Ok(PageResult {
            items: vec![sample_customer(1)],
            total_items: 41,
            total_pages: 5,
            current_page: params.page,
        })
    }

    async fn get_customer(&self, id: CustomerId) -> GatewayResult<Customer> {
        self.record(Some(Op::GetCustomer), Call::GetCustomer(id))?;
        Ok(sample_customer(id.0))
    }

    async fn create_customer(&self, draft: &CustomerDraft) -> GatewayResult<CustomerId> {
        self.record(Some(Op::CreateCustomer), Call::CreateCustomer(draft.clone()))?;
        Ok(self.new_customer_id)
    }

    async fn update_customer(&self, id: CustomerId, draft: &CustomerDraft) -> GatewayResult<()> {
        self.record(Some(Op::UpdateCustomer), Call::UpdateCustomer(id, draft.clone()))
    }

    async fn delete_customer(&self, id: CustomerId) -> GatewayResult<()> {
        self.record(Some(Op::DeleteCustomer), Call::DeleteCustomer(id))
    }

    async fn list_addresses(&self, customer_id: CustomerId) -> GatewayResult<Vec<Address>> {
        self.record(Some(Op::ListAddresses), Call::ListAddresses(customer_id))?;
        Ok(vec![
            sample_address(10, customer_id.0),
            sample_address(11, customer_id.0),
        ])
    }

    async fn add_address(
        &self,
        customer_id: CustomerId,
        draft: &AddressDraft,
    ) -> GatewayResult<()> {
        self.record(Some(Op::AddAddress), Call::AddAddress(customer_id, draft.clone()))
    }

    async fn update_address(
        &self,
        address_id: AddressId,
        draft: &AddressDraft,
    ) -> GatewayResult<()> {
        self.record(
            Some(Op::UpdateAddress),
            Call::UpdateAddress(address_id, draft.clone()),
        )
    }

    async fn delete_address(&self, address_id: AddressId) -> GatewayResult<()> {
        self.record(None, Call::DeleteAddress(address_id))
    }

    async fn search_addresses(
        &self,
        params: &AddressSearchParams,
    ) -> GatewayResult<Vec<AddressSearchHit>> {
        self.record(Some(Op::SearchAddresses), Call::SearchAddresses(params.clone()))?;
        Ok(self.hits.clone())
    }

    async fn customers_with_multiple_addresses(&self) -> GatewayResult<Vec<Customer>> {
        self.record(None, Call::MultipleAddresses)?;
        Ok(vec![sample_customer(8)])
    }

    async fn customers_with_single_address(&self) -> GatewayResult<Vec<Customer>> {
        self.record(None, Call::SingleAddress)?;
        Ok(vec![sample_customer(9)])
    }
}
