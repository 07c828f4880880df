//! Orders, their line items, and the presentation orderings over `orderSum`.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::UserName;

/// Store-generated order identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Wrap an identifier received from a client or a store.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Borrow the identifier.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Beer name to bottle count. Keys are unique; iteration order carries no
/// meaning.
pub type BeerLines = BTreeMap<String, i64>;

/// Delivery metadata carried through the pipeline untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryDetails {
    pub phone_number: Option<String>,
    pub destination_address: Option<String>,
    pub order_method: Option<String>,
}

/// Client-submitted order before validation and pricing.
///
/// `order_sum` is accepted so callers can round-trip a stored order, but the
/// pipeline always discards it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub id: Option<OrderId>,
    #[schema(value_type = String)]
    pub user_name: UserName,
    #[serde(default)]
    pub beers_ordered: BeerLines,
    #[serde(default)]
    pub order_sum: Option<f64>,
    #[serde(default)]
    pub date_of_order: Option<DateTime<Utc>>,
    #[serde(default, flatten)]
    pub delivery: DeliveryDetails,
}

/// Validated order whose sum was derived from its line items.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedOrder {
    pub user_name: UserName,
    pub beers_ordered: BeerLines,
    pub order_sum: f64,
    pub date_of_order: Option<DateTime<Utc>>,
    pub delivery: DeliveryDetails,
}

impl PricedOrder {
    /// Total number of bottles across all lines.
    pub fn bottle_quantity(&self) -> i64 {
        bottle_quantity(&self.beers_ordered)
    }

    /// Attach a store identifier and a definite order date.
    pub fn into_order(self, id: OrderId, placed_at: DateTime<Utc>) -> Order {
        Order {
            id,
            user_name: self.user_name,
            beers_ordered: self.beers_ordered,
            order_sum: self.order_sum,
            date_of_order: self.date_of_order.unwrap_or(placed_at),
            delivery: self.delivery,
        }
    }
}

/// Persisted order.
///
/// ## Invariants
/// - `order_sum` equals the configured unit price times the total bottle
///   count of `beers_ordered`; it is recomputed on every create and update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[schema(value_type = String)]
    pub id: OrderId,
    #[schema(value_type = String)]
    pub user_name: UserName,
    pub beers_ordered: BeerLines,
    pub order_sum: f64,
    pub date_of_order: DateTime<Utc>,
    #[serde(flatten)]
    pub delivery: DeliveryDetails,
}

impl Order {
    /// Total number of bottles across all lines.
    pub fn bottle_quantity(&self) -> i64 {
        bottle_quantity(&self.beers_ordered)
    }
}

/// Sum of every line's quantity. Non-positive quantities are summed as given.
///
/// # Examples
/// ```
/// use beerorder::domain::{BeerLines, bottle_quantity};
///
/// let lines = BeerLines::from([("IPA".to_owned(), 3), ("Stout".to_owned(), 2)]);
/// assert_eq!(bottle_quantity(&lines), 5);
/// ```
pub fn bottle_quantity(lines: &BeerLines) -> i64 {
    lines.values().copied().fold(0_i64, i64::saturating_add)
}

/// Natural ordering: smaller `orderSum` first.
pub fn by_sum_ascending(a: &Order, b: &Order) -> Ordering {
    a.order_sum.total_cmp(&b.order_sum)
}

/// Reverse ordering: larger `orderSum` first.
pub fn by_sum_descending(a: &Order, b: &Order) -> Ordering {
    b.order_sum.total_cmp(&a.order_sum)
}

/// Requested presentation order for order listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Sort `orders` in place by `orderSum`.
    pub fn sort(self, orders: &mut [Order]) {
        match self {
            Self::Asc => orders.sort_by(by_sum_ascending),
            Self::Desc => orders.sort_by(by_sum_descending),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    fn order_with_sum(sum: f64) -> Order {
        Order {
            id: OrderId::random(),
            user_name: UserName::new("ada").expect("name"),
            beers_ordered: BeerLines::new(),
            order_sum: sum,
            date_of_order: Utc
                .with_ymd_and_hms(2021, 5, 1, 12, 0, 0)
                .single()
                .expect("valid timestamp"),
            delivery: DeliveryDetails::default(),
        }
    }

    #[fixture]
    fn orders() -> Vec<Order> {
        [10.0, 5.0, 20.0].into_iter().map(order_with_sum).collect()
    }

    fn sums(orders: &[Order]) -> Vec<f64> {
        orders.iter().map(|order| order.order_sum).collect()
    }

    #[rstest]
    fn ascending_sorts_smallest_first(mut orders: Vec<Order>) {
        SortDirection::Asc.sort(&mut orders);
        assert_eq!(sums(&orders), vec![5.0, 10.0, 20.0]);
    }

    #[rstest]
    fn descending_sorts_largest_first(mut orders: Vec<Order>) {
        SortDirection::Desc.sort(&mut orders);
        assert_eq!(sums(&orders), vec![20.0, 10.0, 5.0]);
    }

    #[rstest]
    fn orderings_are_mutual_reverses() {
        let small = order_with_sum(1.0);
        let large = order_with_sum(2.0);
        assert_eq!(by_sum_ascending(&small, &large), Ordering::Less);
        assert_eq!(by_sum_descending(&small, &large), Ordering::Greater);
        assert_eq!(by_sum_ascending(&small, &small), Ordering::Equal);
    }

    #[rstest]
    #[case(&[], 0)]
    #[case(&[("IPA", 3), ("Stout", 2)], 5)]
    #[case(&[("IPA", 4), ("Stout", -1), ("Porter", 0)], 3)]
    fn bottle_quantity_sums_lines_as_given(#[case] lines: &[(&str, i64)], #[case] expected: i64) {
        let lines: BeerLines = lines
            .iter()
            .map(|(name, qty)| ((*name).to_owned(), *qty))
            .collect();
        assert_eq!(bottle_quantity(&lines), expected);
    }

    #[rstest]
    fn draft_decodes_with_flattened_delivery() {
        let payload = r#"{
            "userName": "ada",
            "beersOrdered": { "IPA": 3 },
            "orderSum": 999.0,
            "phoneNumber": "555-0100",
            "destinationAddress": "1 Brew St"
        }"#;
        let draft: OrderDraft = serde_json::from_str(payload).expect("decode draft");
        assert_eq!(draft.order_sum, Some(999.0));
        assert_eq!(draft.delivery.phone_number.as_deref(), Some("555-0100"));
        assert!(draft.id.is_none());
    }

    #[rstest]
    fn sort_direction_parses_lowercase() {
        let direction: SortDirection = serde_json::from_str("\"desc\"").expect("direction");
        assert_eq!(direction, SortDirection::Desc);
    }
}
