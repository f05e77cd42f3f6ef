//! Discount and reward arithmetic. Pure functions, no persisted state.

/// Discount granted to the referred customer
pub fn compute_discount(order_amount: f64, referred_percentage: f64) -> f64 {
    order_amount * referred_percentage / 100.0
}

/// Reward credited to the referrer, scaled from the discount that was given.
///
/// Returns exactly `0.0` when the referred percentage is not positive, since the
/// ratio is undefined there.
pub fn compute_reward(discount_amount: f64, referrer_percentage: f64, referred_percentage: f64) -> f64 {
    if referred_percentage <= 0.0 {
        return 0.0;
    }
    discount_amount * referrer_percentage / referred_percentage
}
