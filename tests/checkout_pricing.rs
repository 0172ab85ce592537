// tests/checkout_pricing.rs

//! Checkout money rules end to end: discount first (rupees), then the GST
//! split over the paise total, then the order-number sequence.

use rasoi_storefront::services::orders::next_order_number;
use rasoi_storefront::services::pricing::{apply_discount, discount_percent, gst_split, LEAD_DISCOUNT_CODE};
use rasoi_storefront::services::settings::DEFAULT_ORDER_NUMBER_FLOOR;

#[test]
fn discounted_checkout_splits_cleanly() {
  // 499 rupees with the lead code -> 449 rupees -> 44900 paise at 5% GST.
  let percent = discount_percent(LEAD_DISCOUNT_CODE).expect("lead code is valid");
  let discounted_rupees = apply_discount(499, percent);
  assert_eq!(discounted_rupees, 449);

  let amount_paise = discounted_rupees * 100;
  let (base, tax) = gst_split(amount_paise, 5.0);
  assert_eq!(base + tax, amount_paise);
  assert_eq!(base, 42_762); // round(44900 / 1.05)
}

#[test]
fn gst_split_matches_published_example() {
  let (base, tax) = gst_split(49_900, 5.0);
  assert_eq!((base, tax), (47_524, 2_376));
}

#[test]
fn unknown_codes_do_not_discount() {
  assert_eq!(discount_percent("WELCOME50"), None);
  assert_eq!(discount_percent("satvik"), None);
}

#[test]
fn order_numbers_are_strictly_increasing() {
  let mut highest: Option<i64> = None;
  let mut issued = Vec::new();
  for _ in 0..5 {
    let next = next_order_number(highest, DEFAULT_ORDER_NUMBER_FLOOR);
    issued.push(next);
    highest = Some(next);
  }
  assert_eq!(issued, vec![1113, 1114, 1115, 1116, 1117]);
}
