use super::*;
use crate::test_support::{Call, RecordingApi};

#[test]
fn defaults_sort_newest_first_on_page_one() {
    let params = CustomerListController::new().build_request_params();
    assert_eq!(params.page, 1);
    assert_eq!(params.limit, 10);
    assert_eq!(params.sort_by, SortField::CreatedAt);
    assert_eq!(params.sort_order, SortOrder::Desc);
    assert!(params.search.is_empty() && params.city.is_empty());
}

#[test]
fn filter_change_resets_page() {
    let mut list = CustomerListController::new();
    list.set_page(4);
    list.set_filter(ListFilter::City, "Pune");

    let params = list.build_request_params();
    assert_eq!(params.city, "Pune");
    assert_eq!(params.page, 1);
}

#[test]
fn sort_change_resets_page_but_paging_keeps_everything_else() {
    let mut list = CustomerListController::new();
    list.set_filter(ListFilter::Search, "asha");
    list.set_page(3);
    assert_eq!(list.query().page, 3);
    assert_eq!(list.filter(ListFilter::Search), "asha");

    list.set_sort_by(SortField::LastName);
    assert_eq!(list.query().page, 1);
    list.set_page(2);
    list.set_sort_order(SortOrder::Asc);
    assert_eq!(list.query().page, 1);
}

#[test]
fn page_zero_is_clamped() {
    let mut list = CustomerListController::with_page_size(0);
    list.set_page(0);
    assert_eq!(list.query().page, 1);
    assert_eq!(list.query().page_size, 1);
}

#[test]
fn clear_restores_defaults_and_keeps_page_size() {
    let mut list = CustomerListController::with_page_size(25);
    list.set_filter(ListFilter::PinCode, "411001");
    list.set_sort_by(SortField::PhoneNumber);
    list.set_page(6);

    list.clear();

    let expected = ListQuery {
        page_size: 25,
        ..ListQuery::default()
    };
    assert_eq!(list.query(), &expected);
}

#[test]
fn filter_names_parse_with_dashes() {
    assert_eq!("pin-code".parse::<ListFilter>(), Ok(ListFilter::PinCode));
    assert!("zip".parse::<ListFilter>().is_err());
}

#[tokio::test]
async fn fetch_passes_server_totals_through() {
    let api = RecordingApi::new();
    let mut list = CustomerListController::new();
    list.set_filter(ListFilter::State, "MH");
    list.set_page(2);

    let page = list.fetch(&api).await.expect("fetch");

    assert_eq!(page.total_items, 41);
    assert_eq!(page.total_pages, 5);
    assert_eq!(page.current_page, 2);
    assert_eq!(api.calls(), vec![Call::ListCustomers(list.build_request_params())]);
}
