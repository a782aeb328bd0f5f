use serde::Serialize;
use shared::{
    domain::CustomerId,
    protocol::{Address, Customer},
};

use crate::{CrmApi, GatewayResult};

/// One customer together with all of their addresses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerDetail {
    pub customer: Customer,
    pub addresses: Vec<Address>,
}

impl CustomerDetail {
    pub fn primary_address(&self) -> Option<&Address> {
        self.addresses.iter().find(|address| address.is_primary)
    }
}

/// Both requests run concurrently; either failing fails the whole load.
pub async fn load_customer_detail(
    api: &dyn CrmApi,
    id: CustomerId,
) -> GatewayResult<CustomerDetail> {
    let (customer, addresses) = futures::try_join!(api.get_customer(id), api.list_addresses(id))?;
    Ok(CustomerDetail {
        customer,
        addresses,
    })
}

#[cfg(test)]
#[path = "tests/detail_tests.rs"]
mod tests;
