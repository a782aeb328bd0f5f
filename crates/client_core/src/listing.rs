//! Customer list state: filters, sort and the pagination cursor.

use std::{fmt, str::FromStr};

use shared::{
    domain::{SortField, SortOrder},
    protocol::{Customer, CustomerListParams, PageResult},
};

use crate::{validation::UnknownField, CrmApi, GatewayResult};

pub const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListFilter {
    Search,
    City,
    State,
    PinCode,
}

impl ListFilter {
    pub const ALL: [ListFilter; 4] = [
        ListFilter::Search,
        ListFilter::City,
        ListFilter::State,
        ListFilter::PinCode,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ListFilter::Search => "search",
            ListFilter::City => "city",
            ListFilter::State => "state",
            ListFilter::PinCode => "pin_code",
        }
    }
}

impl fmt::Display for ListFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListFilter {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|filter| filter.as_str().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| UnknownField {
                kind: "filter",
                name: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub search: String,
    pub city: String,
    pub state: String,
    pub pin_code: String,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
    pub page: u32,
    pub page_size: u32,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            city: String::new(),
            state: String::new(),
            pin_code: String::new(),
            sort_by: SortField::default(),
            sort_order: SortOrder::default(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Any change to what is being listed sends the cursor back to page 1;
/// moving the cursor itself touches nothing else.
#[derive(Debug, Clone, Default)]
pub struct CustomerListController {
    query: ListQuery,
}

impl CustomerListController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page_size(page_size: u32) -> Self {
        let mut controller = Self::new();
        controller.set_page_size(page_size);
        controller
    }

    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    pub fn filter(&self, filter: ListFilter) -> &str {
        match filter {
            ListFilter::Search => &self.query.search,
            ListFilter::City => &self.query.city,
            ListFilter::State => &self.query.state,
            ListFilter::PinCode => &self.query.pin_code,
        }
    }

    pub fn set_filter(&mut self, filter: ListFilter, value: impl Into<String>) {
        let value = value.into();
        match filter {
            ListFilter::Search => self.query.search = value,
            ListFilter::City => self.query.city = value,
            ListFilter::State => self.query.state = value,
            ListFilter::PinCode => self.query.pin_code = value,
        }
        self.query.page = 1;
    }

    pub fn set_sort_by(&mut self, field: SortField) {
        self.query.sort_by = field;
        self.query.page = 1;
    }

    pub fn set_sort_order(&mut self, order: SortOrder) {
        self.query.sort_order = order;
        self.query.page = 1;
    }

    pub fn set_page(&mut self, page: u32) {
        self.query.page = page.max(1);
    }

    pub fn set_page_size(&mut self, page_size: u32) {
        self.query.page_size = page_size.max(1);
        self.query.page = 1;
    }

    /// Back to the default filters and sort. The page size is kept.
    pub fn clear(&mut self) {
        self.query = ListQuery {
            page_size: self.query.page_size,
            ..ListQuery::default()
        };
    }

    pub fn build_request_params(&self) -> CustomerListParams {
        let q = &self.query;
        CustomerListParams {
            page: q.page,
            limit: q.page_size,
            search: q.search.clone(),
            city: q.city.clone(),
            state: q.state.clone(),
            pin_code: q.pin_code.clone(),
            sort_by: q.sort_by,
            sort_order: q.sort_order,
        }
    }

    pub async fn fetch(&self, api: &dyn CrmApi) -> GatewayResult<PageResult<Customer>> {
        api.list_customers(&self.build_request_params()).await
    }
}

#[cfg(test)]
#[path = "tests/listing_tests.rs"]
mod tests;
