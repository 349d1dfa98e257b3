//! Terminal rendering of backend payloads

use serde_json::Value;
use shop_core::format::{format_date, format_price, status_text};
use shop_http::ShopClient;

/// Payload inside the backend's `data` envelope, or the value itself
pub fn unwrap_data(value: &Value) -> &Value {
    value.get("data").unwrap_or(value)
}

pub fn print_json(value: &Value) {
    match serde_json::to_string_pretty(unwrap_data(value)) {
        Ok(text) => println!("{text}"),
        Err(_) => println!("{value}"),
    }
}

/// One line per product with its resolved image URL
pub fn print_products(client: &ShopClient, value: &Value) {
    let Some(products) = unwrap_data(value).as_array() else {
        print_json(value);
        return;
    };

    if products.is_empty() {
        println!("No products");
    }
    for product in products {
        println!("{}", product_line(client, product));
    }
}

/// One line per order with a readable status and date
pub fn print_orders(value: &Value) {
    match unwrap_data(value) {
        Value::Array(orders) if orders.is_empty() => println!("No orders"),
        Value::Array(orders) => {
            for order in orders {
                println!("{}", order_line(order));
            }
        }
        Value::Object(_) => println!("{}", order_line(unwrap_data(value))),
        _ => print_json(value),
    }
}

fn product_line(client: &ShopClient, product: &Value) -> String {
    let mut line = format!(
        "#{} {}",
        display(&product["id"]),
        product["name"].as_str().unwrap_or("?")
    );
    if let Some(price) = product["price"].as_f64() {
        line.push_str(&format!("  {}", format_price(price)));
    }
    if let Some(stock) = product["stock"].as_i64() {
        line.push_str(&format!("  stock {stock}"));
    }
    if let Some(url) = client.image_url(product["imgUrl"].as_str()) {
        line.push_str(&format!("  {url}"));
    }
    line
}

fn order_line(order: &Value) -> String {
    let mut line = format!("#{}", display(&order["id"]));
    if let Some(status) = order["status"].as_str() {
        line.push_str(&format!("  {}", status_text(status)));
    }
    if let Some(total) = ["totalAmount", "totalPrice", "total"]
        .iter()
        .find_map(|key| order[*key].as_f64())
    {
        line.push_str(&format!("  {}", format_price(total)));
    }
    if let Some(date) = order["createdAt"].as_str().and_then(format_date) {
        line.push_str(&format!("  {date}"));
    }
    line
}

fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "?".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_is_unwrapped() {
        let wrapped = json!({ "code": 200, "data": [1, 2] });
        assert_eq!(unwrap_data(&wrapped), &json!([1, 2]));

        let bare = json!([3]);
        assert_eq!(unwrap_data(&bare), &json!([3]));
    }

    #[test]
    fn order_line_uses_labels_and_dates() {
        let order = json!({
            "id": 12,
            "status": "PAID",
            "totalAmount": 25.0,
            "createdAt": "2024-05-01T08:30:00"
        });
        assert_eq!(order_line(&order), "#12  已支付  ¥25.00  2024/05/01 08:30");
    }

    #[test]
    fn order_line_tolerates_missing_fields() {
        assert_eq!(order_line(&json!({ "id": 1, "status": "LOST" })), "#1  LOST");
    }
}
