//! Package-to-plan mapping.
//!
//! Converts the backend's raw [`PackageRow`] records into the display-ready
//! [`UiPlan`] shape used by templates and `/api/plans`.

use rust_decimal::Decimal;

use proxies_seller_core::{PackageRow, PriceUnit, ProxyCategory, Rotation, UiPlan};

/// Map a backend package row to a UI plan.
///
/// Pricing is `price_cents / 100`, rounded to two decimal places. Rotation is
/// inferred from the category (datacenter packages are static, everything
/// else rotates). Protocol and country are fixed defaults the backend does
/// not yet report per-package.
#[must_use]
pub fn map_package_to_plan(row: &PackageRow) -> UiPlan {
    let category = ProxyCategory::from_backend(&row.category);
    let rotation = if category.is_static() {
        Rotation::Static
    } else {
        Rotation::Rotating
    };

    let features = vec![
        "Instant activation".to_owned(),
        "Dedicated credentials".to_owned(),
        "24/7 Support".to_owned(),
        if category.is_static() {
            "Static IPs".to_owned()
        } else {
            "Rotation options".to_owned()
        },
    ];

    UiPlan {
        id: row.id.clone(),
        name: row.name.clone(),
        price: (Decimal::from(row.price_cents.max(0)) / Decimal::from(100)).round_dp(2),
        price_unit: PriceUnit::PerMonth,
        rotation,
        protocol: "http/socks5".to_owned(),
        country: "US".to_owned(),
        features,
        popular: category == ProxyCategory::Residential,
        category,
    }
}

/// Map a full package list, preserving backend order.
#[must_use]
pub fn map_packages(rows: &[PackageRow]) -> Vec<UiPlan> {
    rows.iter().map(map_package_to_plan).collect()
}

/// Filter plans by category, case-insensitively. An empty filter passes
/// everything through.
#[must_use]
pub fn filter_by_category(plans: Vec<UiPlan>, filter: Option<&str>) -> Vec<UiPlan> {
    match filter.map(str::trim) {
        None | Some("") => plans,
        Some(filter) => plans
            .into_iter()
            .filter(|p| p.category.matches(filter))
            .collect(),
    }
}
