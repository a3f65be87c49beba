//! 配送员绩效统计

use shared::models::{Order, OrderStatus, PartnerStats};
use shared::util::MINUTE_MS;

/// Trailing window for totals and delivery metrics
pub const STATS_WINDOW_DAYS: i64 = 30;

const DAY_MS: i64 = 24 * 60 * MINUTE_MS;

/// Compute stats over a partner's orders.
///
/// `activeOrders` counts every current active order; the other figures only
/// consider orders created within the last [`STATS_WINDOW_DAYS`].
/// A delivery is on time when it lands at or before the dispatch estimate.
pub fn partner_stats(orders: &[Order], now: i64) -> PartnerStats {
    let since = now - STATS_WINDOW_DAYS * DAY_MS;
    let active_orders = orders.iter().filter(|o| o.status.is_active()).count() as i64;

    let recent: Vec<&Order> = orders.iter().filter(|o| o.created_at >= since).collect();
    let delivered: Vec<&Order> = recent
        .iter()
        .copied()
        .filter(|o| o.status == OrderStatus::Delivered)
        .collect();

    let durations: Vec<i64> = delivered
        .iter()
        .filter_map(|o| Some(o.actual_delivery_time? - o.assigned_at?))
        .collect();
    let average_delivery_minutes = if durations.is_empty() {
        0.0
    } else {
        durations.iter().sum::<i64>() as f64 / durations.len() as f64 / MINUTE_MS as f64
    };

    let on_time = delivered
        .iter()
        .filter(|o| matches!((o.actual_delivery_time, o.dispatch_time), (Some(a), Some(d)) if a <= d))
        .count();
    let on_time_percentage = if delivered.is_empty() {
        0.0
    } else {
        on_time as f64 * 100.0 / delivered.len() as f64
    };

    PartnerStats {
        total_orders: recent.len() as i64,
        completed_orders: delivered.len() as i64,
        active_orders,
        average_delivery_minutes,
        on_time_percentage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use shared::models::Customer;

    const NOW: i64 = 100 * DAY_MS;

    fn order(status: OrderStatus, created_at: i64) -> Order {
        Order {
            id: format!("ORD{created_at}"),
            items: vec![],
            customer: Customer {
                name: "C".into(),
                phone: "1".into(),
                address: "A".into(),
            },
            total_amount: Decimal::ZERO,
            prep_time: 10,
            status,
            assigned_partner: Some(5),
            assigned_at: Some(created_at),
            dispatch_time: Some(created_at + 30 * MINUTE_MS),
            actual_delivery_time: None,
            created_at,
            updated_at: created_at,
        }
    }

    fn delivered_after(created_at: i64, minutes: i64) -> Order {
        let mut o = order(OrderStatus::Delivered, created_at);
        o.actual_delivery_time = Some(created_at + minutes * MINUTE_MS);
        o
    }

    #[test]
    fn empty_history() {
        let stats = partner_stats(&[], NOW);
        assert_eq!(stats.total_orders, 0);
        assert_eq!(stats.average_delivery_minutes, 0.0);
        assert_eq!(stats.on_time_percentage, 0.0);
    }

    #[test]
    fn averages_and_on_time_rate() {
        let orders = vec![
            delivered_after(NOW - DAY_MS, 20),
            delivered_after(NOW - 2 * DAY_MS, 40),
            order(OrderStatus::OnRoute, NOW - 1_000),
            // outside the window
            delivered_after(NOW - 40 * DAY_MS, 90),
        ];
        let stats = partner_stats(&orders, NOW);

        assert_eq!(stats.total_orders, 3);
        assert_eq!(stats.completed_orders, 2);
        assert_eq!(stats.active_orders, 1);
        assert_eq!(stats.average_delivery_minutes, 30.0);
        assert_eq!(stats.on_time_percentage, 50.0);
    }

    #[test]
    fn active_count_ignores_window() {
        let orders = vec![order(OrderStatus::Assigned, NOW - 45 * DAY_MS)];
        let stats = partner_stats(&orders, NOW);
        assert_eq!(stats.active_orders, 1);
        assert_eq!(stats.total_orders, 0);
    }
}
