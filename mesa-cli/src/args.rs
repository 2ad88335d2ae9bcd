//! Argument value parsers

use shared::models::{CartLine, OrderStatus};

/// `ITEM=QTY`, e.g. `item-1=2`
pub fn parse_split_line(s: &str) -> Result<(String, u32), String> {
    let (item_id, qty) = s
        .split_once('=')
        .ok_or_else(|| format!("expected ITEM=QTY, got '{}'", s))?;
    let item_id = item_id.trim();
    if item_id.is_empty() {
        return Err(format!("missing item id in '{}'", s));
    }
    let quantity = qty
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("invalid quantity in '{}'", s))?;
    Ok((item_id.to_string(), quantity))
}

/// `MENU_ITEM=QTY@PRICE`, e.g. `m1=2@10.50`
pub fn parse_cart_line(s: &str) -> Result<CartLine, String> {
    let (item, price) = s
        .rsplit_once('@')
        .ok_or_else(|| format!("expected MENU_ITEM=QTY@PRICE, got '{}'", s))?;
    let (menu_item_id, quantity) = parse_split_line(item)?;
    let unit_price = price
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite() && *p >= 0.0)
        .ok_or_else(|| format!("invalid price in '{}'", s))?;
    Ok(CartLine {
        menu_item_id,
        quantity,
        unit_price,
    })
}

pub fn parse_status(s: &str) -> Result<OrderStatus, String> {
    match s.to_ascii_lowercase().as_str() {
        "active" => Ok(OrderStatus::Active),
        "paid" | "closed" => Ok(OrderStatus::Paid),
        "cancelled" | "canceled" => Ok(OrderStatus::Cancelled),
        other => Err(format!("unknown order status '{}'", other)),
    }
}
