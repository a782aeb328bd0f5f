//! Plain-text tables and JSON output for command results.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use client_core::{
    detail::CustomerDetail,
    outcome::{Notice, Severity},
};
use serde::Serialize;
use shared::protocol::{Address, AddressSearchHit, Customer, PageResult};

fn date(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|at| at.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".into())
}

fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() {
        "-"
    } else {
        value
    }
}

/// Left-aligned columns sized to their widest cell.
fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &widths, headers.iter().copied());
    for row in rows {
        push_row(&mut out, &widths, row.iter().map(String::as_str));
    }
    out
}

fn push_row<'a>(out: &mut String, widths: &[usize], cells: impl Iterator<Item = &'a str>) {
    let rendered: Vec<String> = cells
        .zip(widths.iter().copied())
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect();
    out.push_str(rendered.join("  ").trim_end());
    out.push('\n');
}

fn address_kind(customer: &Customer) -> String {
    match customer.address_count {
        0 => "none".into(),
        1 => "1 (single)".into(),
        n => format!("{n} (multiple)"),
    }
}

pub fn customers(customers: &[Customer]) -> String {
    if customers.is_empty() {
        return "No customers found.\n".into();
    }
    let rows: Vec<Vec<String>> = customers
        .iter()
        .map(|c| {
            vec![
                c.id.to_string(),
                c.full_name(),
                c.phone_number.clone(),
                or_dash(c.email.as_deref().unwrap_or_default()).to_string(),
                address_kind(c),
                date(c.created_at),
            ]
        })
        .collect();
    table(
        &["ID", "NAME", "PHONE", "EMAIL", "ADDRESSES", "CREATED"],
        &rows,
    )
}

pub fn customer_page(page: &PageResult<Customer>) -> String {
    let mut out = customers(&page.items);
    let _ = write!(
        out,
        "Page {} of {} ({} customers)",
        page.current_page,
        page.total_pages.max(1),
        page.total_items
    );
    if page.has_previous() {
        let _ = write!(out, "  previous: --page {}", page.current_page - 1);
    }
    if page.has_next() {
        let _ = write!(out, "  next: --page {}", page.current_page + 1);
    }
    out.push('\n');
    out
}

pub fn addresses(addresses: &[Address]) -> String {
    if addresses.is_empty() {
        return "No addresses on file.\n".into();
    }
    let rows: Vec<Vec<String>> = addresses
        .iter()
        .map(|a| {
            vec![
                a.id.to_string(),
                a.address_details.clone(),
                a.city.clone(),
                a.state.clone(),
                a.pin_code.clone(),
                if a.is_primary { "yes" } else { "" }.to_string(),
            ]
        })
        .collect();
    table(
        &["ID", "ADDRESS", "CITY", "STATE", "PIN", "PRIMARY"],
        &rows,
    )
}

pub fn search_hits(hits: &[AddressSearchHit]) -> String {
    if hits.is_empty() {
        return "No addresses matched.\n".into();
    }
    let rows: Vec<Vec<String>> = hits
        .iter()
        .map(|hit| {
            vec![
                hit.address.customer_id.to_string(),
                format!("{} {}", hit.first_name, hit.last_name),
                hit.phone_number.clone(),
                hit.address.address_details.clone(),
                hit.address.city.clone(),
                hit.address.state.clone(),
                hit.address.pin_code.clone(),
            ]
        })
        .collect();
    table(
        &["CUSTOMER", "NAME", "PHONE", "ADDRESS", "CITY", "STATE", "PIN"],
        &rows,
    )
}

pub fn customer_detail(detail: &CustomerDetail) -> String {
    let c = &detail.customer;
    let mut out = String::new();
    let _ = writeln!(out, "Customer #{}  {}", c.id, c.full_name());
    let _ = writeln!(out, "  Phone    {}", c.phone_number);
    let _ = writeln!(out, "  Email    {}", or_dash(c.email.as_deref().unwrap_or_default()));
    let _ = writeln!(out, "  Created  {}", date(c.created_at));
    let _ = writeln!(out, "  Updated  {}", date(c.updated_at));
    out.push('\n');
    out.push_str(&addresses(&detail.addresses));
    out
}

pub fn notice(notice: &Notice) -> String {
    let tag = match notice.severity {
        Severity::Success => "ok",
        Severity::Warning => "warning",
        Severity::Error => "error",
    };
    format!("{tag}: {}", notice.message)
}

pub fn json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
